// ==========================================
// 医药销售分析决策支持系统 - 库存批次对象
// ==========================================
// 职责: 效期告警的输入批次与派生行
// ==========================================

use crate::domain::types::ExpiryStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 库存批次
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockBatch {
    /// 产品标识
    pub product: String,
    /// 批号
    pub batch_number: String,
    /// 在库数量
    pub stocks: f64,
    /// 效期日期
    pub expiry_date: NaiveDate,
}

/// 效期派生行（批次 + 距效期月数 + 状态分类）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpiryRow {
    pub batch: StockBatch,
    /// 距效期月数（(效期-基准日).days / 30，向下取整，已过期为负）
    pub months_to_expiry: i64,
    /// 状态分类
    pub status: ExpiryStatus,
}

impl ExpiryRow {
    /// 人类可读叙述
    pub fn narrative(&self) -> String {
        match self.status {
            ExpiryStatus::Unsalable => format!(
                "告警: {} 批次 {} ({} 件) 距效期不足 3 个月，不可售",
                self.batch.product, self.batch.batch_number, self.batch.stocks
            ),
            ExpiryStatus::AlertWindow => format!(
                "告警: {} 批次 {} ({} 件) 距效期 {} 个月，处于预警窗口",
                self.batch.product,
                self.batch.batch_number,
                self.batch.stocks,
                self.months_to_expiry
            ),
            ExpiryStatus::Salable => format!(
                "{} 批次 {} 距效期 {} 个月，状态正常",
                self.batch.product, self.batch.batch_number, self.months_to_expiry
            ),
        }
    }
}
