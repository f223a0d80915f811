// ==========================================
// 医药销售分析决策支持系统 - 退货告警引擎
// ==========================================
// 职责: 报告月销量为负的 (药房, 产品) 实体告警
// 规则: 负值表示退货, 告警携带退货绝对量
// ==========================================

use crate::domain::alert::ReturnAlert;
use crate::domain::sales::SalesDataset;
use crate::domain::types::ReportingMonth;
use crate::engine::error::{AnalysisError, AnalysisResult};
use std::cmp::Ordering;

// ==========================================
// ReturnsEngine - 退货告警引擎
// ==========================================
pub struct ReturnsEngine;

impl ReturnsEngine {
    /// 创建新的退货告警引擎
    pub fn new() -> Self {
        Self
    }

    /// 扫描报告月的退货
    ///
    /// # 参数
    /// - `reporting_month`: 最后一个月或倒数第二个月
    /// - `top_n`: 按退货量降序截断
    ///
    /// # 返回
    /// - `Err(UnknownMonth)`: 月份轴长度不足以定位报告月
    pub fn scan(
        &self,
        dataset: &SalesDataset,
        reporting_month: ReportingMonth,
        top_n: usize,
    ) -> AnalysisResult<Vec<ReturnAlert>> {
        let month_index = reporting_month
            .index(dataset.month_count())
            .ok_or_else(|| AnalysisError::UnknownMonth(reporting_month.to_string()))?;
        let month_label = dataset.month_labels[month_index].clone();

        let mut alerts = Vec::new();
        for ((pharmacy_name, product_name), records) in dataset.group_by_pharmacy_product() {
            // 组内按月汇总后检查负值
            let month_units: f64 = records
                .iter()
                .filter_map(|r| r.monthly_units[month_index].finite())
                .sum();
            if month_units < 0.0 {
                alerts.push(ReturnAlert {
                    pharmacy_name,
                    product_name,
                    month_label: month_label.clone(),
                    returned_units: month_units.abs(),
                });
            }
        }

        alerts.sort_by(|a, b| {
            b.returned_units
                .partial_cmp(&a.returned_units)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.pharmacy_name.cmp(&b.pharmacy_name))
        });
        alerts.truncate(top_n);

        if alerts.is_empty() {
            tracing::info!(month = %month_label, "报告月无退货");
        }
        Ok(alerts)
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sales::SalesRecord;
    use crate::domain::value::CellValue;

    fn make(pharmacy: &str, product: &str, units: &[f64]) -> SalesRecord {
        SalesRecord {
            customer_code: "C1".to_string(),
            pharmacy_name: pharmacy.to_string(),
            town: "Harare".to_string(),
            product_code: "P1".to_string(),
            product_name: product.to_string(),
            monthly_units: units.iter().map(|u| CellValue::from_f64(*u)).collect(),
        }
    }

    fn make_dataset() -> SalesDataset {
        SalesDataset {
            month_labels: vec!["Jan-24".to_string(), "Feb-24".to_string()],
            records: vec![
                make("药房A", "Amoxil 500", &[10.0, -12.0]),
                make("药房B", "Amoxil 500", &[5.0, 5.0]),
                make("药房B", "Paracetamol", &[-3.0, -4.0]),
            ],
            coercion_warnings: 0,
        }
    }

    #[test]
    fn test_last_month_returns() {
        let alerts = ReturnsEngine::new()
            .scan(&make_dataset(), ReportingMonth::Last, 20)
            .unwrap();
        assert_eq!(alerts.len(), 2);
        // 按退货量降序
        assert_eq!(alerts[0].pharmacy_name, "药房A");
        assert_eq!(alerts[0].returned_units, 12.0);
        assert_eq!(alerts[0].month_label, "Feb-24");
        assert_eq!(alerts[1].returned_units, 4.0);
    }

    #[test]
    fn test_before_last_month_returns() {
        let alerts = ReturnsEngine::new()
            .scan(&make_dataset(), ReportingMonth::BeforeLast, 20)
            .unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].product_name, "Paracetamol");
        assert_eq!(alerts[0].returned_units, 3.0);
        assert_eq!(alerts[0].month_label, "Jan-24");
    }

    #[test]
    fn test_top_n_truncation() {
        let alerts = ReturnsEngine::new()
            .scan(&make_dataset(), ReportingMonth::Last, 1)
            .unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].returned_units, 12.0);
    }

    #[test]
    fn test_short_axis_rejected() {
        let mut ds = make_dataset();
        ds.month_labels = vec!["Jan-24".to_string()];
        for r in &mut ds.records {
            r.monthly_units.truncate(1);
        }
        assert!(ReturnsEngine::new()
            .scan(&ds, ReportingMonth::Last, 20)
            .is_ok());
        assert!(matches!(
            ReturnsEngine::new().scan(&ds, ReportingMonth::BeforeLast, 20),
            Err(AnalysisError::UnknownMonth(_))
        ));
    }
}
