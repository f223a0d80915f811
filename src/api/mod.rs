// ==========================================
// 医药销售分析决策支持系统 - API 层
// ==========================================
// 职责: 面向壳层的分析门面与结果导出
// ==========================================

pub mod analysis_api;
pub mod error;
pub mod export;

// 重导出
pub use analysis_api::AnalysisApi;
pub use error::{ApiError, ApiResult};
