// ==========================================
// 医药销售分析决策支持系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 对账失败绝不自动修正，必须向调用方传播
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum AnalysisError {
    // ===== 输入数据错误 =====
    #[error("缺少必需列: {0}")]
    MissingColumn(String),

    #[error("输入数据为空: {0}")]
    EmptyInput(String),

    #[error("未知月份标签: {0}")]
    UnknownMonth(String),

    // ===== 对账错误 =====
    // 预算合计 + 三项影响合计 与实际合计偏差超出容差,
    // 多由上游缺行或缺失值污染导致
    #[error("瀑布对账失败: 预算合计 {budget_total} + 影响合计 {impact_sum} = {recomputed}, 实际合计 {actual_total}")]
    Reconciliation {
        budget_total: f64,
        impact_sum: f64,
        recomputed: f64,
        actual_total: f64,
    },

    // ===== 调用方参数错误 =====
    #[error("阈值超出范围: {value} (允许区间 [{min}, {max}])")]
    ThresholdOutOfRange { value: f64, min: f64, max: f64 },

    #[error("序列形状不匹配: 数值序列长度 {series_len} 与标签数 {label_len} 不一致")]
    ShapeMismatch { series_len: usize, label_len: usize },

    // ===== 配置错误 =====
    #[error("配置无效: {0}")]
    InvalidConfig(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type AnalysisResult<T> = Result<T, AnalysisError>;
