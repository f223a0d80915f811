// ==========================================
// 医药销售分析决策支持系统 - 客户视角对象
// ==========================================
// 职责: RFM 分层与 NPS 的输入行/结果行
// ==========================================

use crate::domain::types::CustomerSegment;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 发票记录（RFM 输入，一行 = 一次开票）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// 客户名称
    pub customer_name: String,
    /// 开票日期
    pub invoice_date: NaiveDate,
    /// 销量（件）
    pub units_sold: f64,
}

/// 单客户 RFM 结果行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfmRow {
    pub customer_name: String,
    /// 最近一次开票距基准日的天数
    pub recency_days: i64,
    /// 开票次数
    pub frequency: i64,
    /// 总销量
    pub monetary_value: f64,
    /// RFM 总分 = R + F + M（各取整数部分相加）
    pub rfm_score: i64,
    /// 分层标签
    pub segment: CustomerSegment,
}

/// 分层汇总行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub segment: CustomerSegment,
    /// 平均 Recency（天）
    pub avg_recency_days: f64,
    /// 平均 Frequency（次）
    pub avg_frequency: f64,
    /// 平均 Monetary（件）
    pub avg_monetary_value: f64,
    /// 客户数
    pub customer_count: usize,
    /// 客户数占比（百分比）
    pub customer_share_pct: f64,
}

/// NPS 问卷响应（一行 = 一份 0-10 评分）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpsResponse {
    /// 统计期间标签
    pub period: String,
    /// 评分（0-10）
    pub score: i32,
}

/// 单期间 NPS 结果行
///
/// NPS = (推荐者 - 贬损者) / 响应数 × 100，
/// 推荐者评分 >= 9，贬损者评分 <= 6。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpsRow {
    pub period: String,
    pub promoters: usize,
    pub detractors: usize,
    pub responses: usize,
    pub nps: f64,
}
