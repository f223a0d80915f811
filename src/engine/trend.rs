// ==========================================
// 医药销售分析决策支持系统 - 趋势分析引擎
// ==========================================
// 职责: 按月合计与产品维度趋势序列
// 输入: 销售数据集（可由调用方先行筛选）
// 输出: 图表就绪的月度序列
// ==========================================

use crate::domain::sales::SalesDataset;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 月度序列（一条趋势线/柱序列）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySeries {
    /// 序列标签（产品名或 "All Products"）
    pub label: String,
    /// 月份轴
    pub month_labels: Vec<String>,
    /// 月度数值
    pub values: Vec<f64>,
}

impl MonthlySeries {
    /// 序列合计
    pub fn total(&self) -> f64 {
        self.values.iter().filter(|v| v.is_finite()).sum()
    }
}

// ==========================================
// TrendEngine - 趋势分析引擎
// ==========================================
pub struct TrendEngine;

impl TrendEngine {
    /// 创建新的趋势分析引擎
    pub fn new() -> Self {
        Self
    }

    /// 全量按月合计（跨产品与药房）
    pub fn monthly_totals(&self, dataset: &SalesDataset) -> MonthlySeries {
        MonthlySeries {
            label: "All Products".to_string(),
            month_labels: dataset.month_labels.clone(),
            values: dataset.monthly_totals(),
        }
    }

    /// 单产品按月序列
    pub fn product_series(&self, dataset: &SalesDataset, product_name: &str) -> MonthlySeries {
        let filtered = dataset.filter_product(product_name);
        MonthlySeries {
            label: product_name.to_string(),
            month_labels: dataset.month_labels.clone(),
            values: filtered.monthly_totals(),
        }
    }

    /// 销量前 N 产品及其月度序列（按总量降序, 同量按名称升序）
    pub fn top_products(&self, dataset: &SalesDataset, top_n: usize) -> Vec<MonthlySeries> {
        let mut series: Vec<MonthlySeries> = dataset
            .product_names()
            .iter()
            .map(|name| self.product_series(dataset, name))
            .collect();

        series.sort_by(|a, b| {
            b.total()
                .partial_cmp(&a.total())
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.label.cmp(&b.label))
        });
        series.truncate(top_n);
        series
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

    fn make_dataset() -> SalesDataset {
        let make = |pharmacy: &str, product: &str, units: &[f64]| SalesRecord {
            customer_code: "C1".to_string(),
            pharmacy_name: pharmacy.to_string(),
            town: "Harare".to_string(),
            product_code: "P1".to_string(),
            product_name: product.to_string(),
            monthly_units: units.iter().map(|u| CellValue::from_f64(*u)).collect(),
        };
        SalesDataset {
            month_labels: vec!["Jan-24".to_string(), "Feb-24".to_string()],
            records: vec![
                make("药房A", "Amoxil 500", &[10.0, 20.0]),
                make("药房B", "Amoxil 500", &[5.0, 5.0]),
                make("药房A", "Paracetamol", &[100.0, 100.0]),
            ],
            coercion_warnings: 0,
        }
    }

    #[test]
    fn test_monthly_totals() {
        let series = TrendEngine::new().monthly_totals(&make_dataset());
        assert_eq!(series.values, vec![115.0, 125.0]);
        assert_eq!(series.total(), 240.0);
    }

    #[test]
    fn test_product_series() {
        let series = TrendEngine::new().product_series(&make_dataset(), "Amoxil 500");
        assert_eq!(series.values, vec![15.0, 25.0]);
    }

    #[test]
    fn test_top_products_order() {
        let top = TrendEngine::new().top_products(&make_dataset(), 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].label, "Paracetamol");
        assert_eq!(top[1].label, "Amoxil 500");
    }
}
