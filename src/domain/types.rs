// ==========================================
// 医药销售分析决策支持系统 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 影响方向 (Impact Sign)
// ==========================================
// 用于瀑布图配色: 中性柱（预算/实际合计）与正负影响柱区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImpactSign {
    Neutral,  // 合计柱（灰）
    Positive, // 正向影响（绿）
    Negative, // 负向影响（红）
}

impl fmt::Display for ImpactSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpactSign::Neutral => write!(f, "NEUTRAL"),
            ImpactSign::Positive => write!(f, "POSITIVE"),
            ImpactSign::Negative => write!(f, "NEGATIVE"),
        }
    }
}

// ==========================================
// 瀑布柱类型 (Waterfall Bar Kind)
// ==========================================
// Absolute: 从零轴起画（预算合计/实际合计）
// Delta: 从累计基线起画（三个影响柱）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BarKind {
    Absolute,
    Delta,
}

impl fmt::Display for BarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarKind::Absolute => write!(f, "ABSOLUTE"),
            BarKind::Delta => write!(f, "DELTA"),
        }
    }
}

// ==========================================
// 报告月份 (Reporting Month)
// ==========================================
// 扫描类引擎统一支持对最后一个月或倒数第二个月出报告
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportingMonth {
    Last,       // 最后一个月
    BeforeLast, // 倒数第二个月
}

impl ReportingMonth {
    /// 在长度为 `month_count` 的月份轴上的下标
    ///
    /// # 返回
    /// - `Some(index)`: 月份轴足够长
    /// - `None`: 月份轴不足（Last 需要至少 1 个月, BeforeLast 需要至少 2 个月）
    pub fn index(&self, month_count: usize) -> Option<usize> {
        match self {
            ReportingMonth::Last => month_count.checked_sub(1),
            ReportingMonth::BeforeLast => month_count.checked_sub(2),
        }
    }

    /// 期间描述（用于告警叙述）
    pub fn description(&self) -> &'static str {
        match self {
            ReportingMonth::Last => "最后一个月",
            ReportingMonth::BeforeLast => "倒数第二个月",
        }
    }
}

impl fmt::Display for ReportingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportingMonth::Last => write!(f, "LAST"),
            ReportingMonth::BeforeLast => write!(f, "BEFORE_LAST"),
        }
    }
}

// ==========================================
// 批次效期状态 (Expiry Status)
// ==========================================
// 规则: 距效期 <3 个月不可售, [3,12] 个月预警, 其余正常
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpiryStatus {
    Salable,    // 正常
    AlertWindow, // 预警窗口
    Unsalable,  // 不可售
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryStatus::Salable => write!(f, "SALABLE"),
            ExpiryStatus::AlertWindow => write!(f, "ALERT_WINDOW"),
            ExpiryStatus::Unsalable => write!(f, "UNSALABLE"),
        }
    }
}

// ==========================================
// 客户分层 (Customer Segment)
// ==========================================
// 由 RFM 总分阈值划分
// 顺序: Sleeping < AtRisk < PotentialLoyalist < HighValue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerSegment {
    Sleeping,          // 沉睡客户
    AtRisk,            // 流失风险
    PotentialLoyalist, // 潜力客户
    HighValue,         // 高价值客户
}

impl CustomerSegment {
    /// 由 RFM 总分划分客户分层
    ///
    /// # 阈值
    /// - >=450: 高价值客户
    /// - [340, 450): 潜力客户
    /// - [280, 340): 流失风险
    /// - 其余: 沉睡客户
    pub fn from_rfm_score(score: i64) -> Self {
        if score >= 450 {
            CustomerSegment::HighValue
        } else if score >= 340 {
            CustomerSegment::PotentialLoyalist
        } else if score >= 280 {
            CustomerSegment::AtRisk
        } else {
            CustomerSegment::Sleeping
        }
    }
}

impl fmt::Display for CustomerSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerSegment::Sleeping => write!(f, "SLEEPING"),
            CustomerSegment::AtRisk => write!(f, "AT_RISK"),
            CustomerSegment::PotentialLoyalist => write!(f, "POTENTIAL_LOYALIST"),
            CustomerSegment::HighValue => write!(f, "HIGH_VALUE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_thresholds() {
        assert_eq!(CustomerSegment::from_rfm_score(450), CustomerSegment::HighValue);
        assert_eq!(
            CustomerSegment::from_rfm_score(449),
            CustomerSegment::PotentialLoyalist
        );
        assert_eq!(CustomerSegment::from_rfm_score(340), CustomerSegment::PotentialLoyalist);
        assert_eq!(CustomerSegment::from_rfm_score(339), CustomerSegment::AtRisk);
        assert_eq!(CustomerSegment::from_rfm_score(280), CustomerSegment::AtRisk);
        assert_eq!(CustomerSegment::from_rfm_score(279), CustomerSegment::Sleeping);
    }

    #[test]
    fn test_segment_ordering() {
        assert!(CustomerSegment::HighValue > CustomerSegment::Sleeping);
    }
}
