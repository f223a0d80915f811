// ==========================================
// 医药销售分析决策支持系统 - 配置层
// ==========================================

pub mod analysis_config;

pub use analysis_config::{AnalysisConfig, ExpiryWindow, ForecastConfig};
