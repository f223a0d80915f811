// ==========================================
// 医药销售分析决策支持系统 - 销量低于均值告警引擎
// ==========================================
// 职责: 报告月销量低于该实体月均水平时告警
// ==========================================

use crate::domain::alert::SalesDipAlert;
use crate::domain::sales::SalesDataset;
use crate::domain::types::ReportingMonth;
use crate::engine::error::{AnalysisError, AnalysisResult};
use std::cmp::Ordering;

// ==========================================
// SalesDipEngine - 销量低于均值告警引擎
// ==========================================
pub struct SalesDipEngine;

impl SalesDipEngine {
    /// 创建新的销量低于均值告警引擎
    pub fn new() -> Self {
        Self
    }

    /// 扫描报告月低于月均的实体
    ///
    /// 实体 = (药房, 产品)。月均按有限值月份计算；
    /// 缺口四舍五入到整数件后进入告警与排序。
    pub fn scan(
        &self,
        dataset: &SalesDataset,
        reporting_month: ReportingMonth,
        top_n: usize,
    ) -> AnalysisResult<Vec<SalesDipAlert>> {
        let month_index = reporting_month
            .index(dataset.month_count())
            .ok_or_else(|| AnalysisError::UnknownMonth(reporting_month.to_string()))?;
        let month_label = dataset.month_labels[month_index].clone();

        let mut alerts = Vec::new();
        for ((pharmacy_name, product_name), records) in dataset.group_by_pharmacy_product() {
            // 组内按月汇总
            let month_count = dataset.month_count();
            let mut monthly = vec![0.0; month_count];
            for record in &records {
                for (i, v) in record.monthly_units.iter().enumerate() {
                    if let Some(x) = v.finite() {
                        monthly[i] += x;
                    }
                }
            }

            let average = monthly.iter().sum::<f64>() / month_count as f64;
            let month_units = monthly[month_index];
            if month_units < average {
                alerts.push(SalesDipAlert {
                    pharmacy_name,
                    product_name,
                    month_label: month_label.clone(),
                    average_units: average,
                    dip_units: (average - month_units).round() as i64,
                });
            }
        }

        alerts.sort_by(|a, b| {
            b.dip_units
                .cmp(&a.dip_units)
                .then_with(|| a.pharmacy_name.cmp(&b.pharmacy_name))
        });
        alerts.truncate(top_n);
        Ok(alerts)
    }
}
