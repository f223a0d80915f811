// ==========================================
// 医药销售分析决策支持系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型, 转换引擎/导入层错误为用户友好的错误消息
// 规则: 所有错误信息必须包含显式原因
// ==========================================

use crate::engine::error::AnalysisError;
use crate::importer::error::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 数据错误
    // ==========================================
    /// 必需列缺失或输入表形态不合法
    #[error("数据错误: {0}")]
    DataError(String),

    // ==========================================
    // 对账错误
    // ==========================================
    /// 瀑布合计不平（绝不自动修正）
    #[error("对账失败: {0}")]
    ReconciliationError(String),

    // ==========================================
    // 调用方参数错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportFailure(String),

    // ==========================================
    // 配置错误
    // ==========================================
    #[error("配置无效: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 AnalysisError 转换
// 目的: 将引擎层错误归类为API层错误语义
// ==========================================
impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        let message = err.to_string();
        match err {
            AnalysisError::MissingColumn(_)
            | AnalysisError::EmptyInput(_)
            | AnalysisError::UnknownMonth(_) => ApiError::DataError(message),

            AnalysisError::Reconciliation { .. } => ApiError::ReconciliationError(message),

            AnalysisError::ThresholdOutOfRange { .. } | AnalysisError::ShapeMismatch { .. } => {
                ApiError::InvalidInput(message)
            }

            AnalysisError::InvalidConfig(_) => ApiError::ConfigError(message),

            AnalysisError::Other(inner) => ApiError::Other(inner),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        let message = err.to_string();
        match err {
            ImportError::MissingColumn(_) => ApiError::DataError(message),
            ImportError::Other(inner) => ApiError::Other(inner),
            _ => ApiError::ImportFailure(message),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
