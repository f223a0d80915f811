// ==========================================
// 医药销售分析决策支持系统 - 效期告警引擎
// ==========================================
// 职责: 库存批次的距效期月数推导与状态分类
// 规则: 基准日为显式参数, 分类路径内不读系统时钟
// ==========================================

use crate::config::ExpiryWindow;
use crate::domain::stock::{ExpiryRow, StockBatch};
use crate::domain::types::ExpiryStatus;
use chrono::NaiveDate;

// ==========================================
// ExpiryEngine - 效期告警引擎
// ==========================================
pub struct ExpiryEngine;

impl ExpiryEngine {
    /// 创建新的效期告警引擎
    pub fn new() -> Self {
        Self
    }

    /// 距效期月数（(效期 − 基准日).days / 30, 向下取整）
    ///
    /// 已过期批次为负数。
    pub fn months_to_expiry(expiry_date: NaiveDate, reference_date: NaiveDate) -> i64 {
        (expiry_date - reference_date).num_days().div_euclid(30)
    }

    /// 评估全部批次
    ///
    /// # 参数
    /// - `reference_date`: 基准日（通常为当天, 由调用方提供）
    /// - `window`: 预警窗口（默认 [3, 12] 个月）
    pub fn evaluate(
        &self,
        batches: &[StockBatch],
        reference_date: NaiveDate,
        window: &ExpiryWindow,
    ) -> Vec<ExpiryRow> {
        batches
            .iter()
            .map(|batch| {
                let months = Self::months_to_expiry(batch.expiry_date, reference_date);
                ExpiryRow {
                    batch: batch.clone(),
                    months_to_expiry: months,
                    status: Self::classify(months, window),
                }
            })
            .collect()
    }

    /// 预警窗口内的批次（距效期 [min, max] 个月）
    pub fn alert_window<'a>(rows: &'a [ExpiryRow]) -> Vec<&'a ExpiryRow> {
        rows.iter()
            .filter(|r| r.status == ExpiryStatus::AlertWindow)
            .collect()
    }

    /// 不可售批次（距效期不足 min 个月, 含已过期）
    pub fn unsalable<'a>(rows: &'a [ExpiryRow]) -> Vec<&'a ExpiryRow> {
        rows.iter()
            .filter(|r| r.status == ExpiryStatus::Unsalable)
            .collect()
    }

    /// 状态分类
    fn classify(months_to_expiry: i64, window: &ExpiryWindow) -> ExpiryStatus {
        if months_to_expiry < window.min_months {
            ExpiryStatus::Unsalable
        } else if months_to_expiry <= window.max_months {
            ExpiryStatus::AlertWindow
        } else {
            ExpiryStatus::Salable
        }
    }
}
