// ==========================================
// 医药销售分析决策支持系统 - 地域分析引擎
// ==========================================
// 职责: 城镇维度的销量汇总与产品分布
// ==========================================

use crate::domain::sales::SalesDataset;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// 城镇合计行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TownTotal {
    pub town: String,
    pub total_units: f64,
}

// ==========================================
// GeographyEngine - 地域分析引擎
// ==========================================
pub struct GeographyEngine;

impl GeographyEngine {
    /// 创建新的地域分析引擎
    pub fn new() -> Self {
        Self
    }

    /// 按城镇汇总销量
    ///
    /// # 参数
    /// - `towns`: 城镇选择, 空切片表示全部城镇
    ///
    /// # 返回
    /// 按总量降序（同量按城镇名升序）的合计行
    pub fn town_totals(&self, dataset: &SalesDataset, towns: &[String]) -> Vec<TownTotal> {
        let filtered = if towns.is_empty() {
            dataset.clone()
        } else {
            dataset.filter(|r| towns.iter().any(|t| *t == r.town))
        };

        let mut by_town: BTreeMap<String, f64> = BTreeMap::new();
        for record in &filtered.records {
            *by_town.entry(record.town.clone()).or_insert(0.0) += record.total_units();
        }

        let mut totals: Vec<TownTotal> = by_town
            .into_iter()
            .map(|(town, total_units)| TownTotal { town, total_units })
            .collect();
        totals.sort_by(|a, b| {
            b.total_units
                .partial_cmp(&a.total_units)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.town.cmp(&b.town))
        });
        totals
    }

    /// 单产品在选定城镇的分布
    pub fn product_distribution(
        &self,
        dataset: &SalesDataset,
        product_name: &str,
        towns: &[String],
    ) -> Vec<TownTotal> {
        self.town_totals(&dataset.filter_product(product_name), towns)
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
        let make = |town: &str, product: &str, units: &[f64]| SalesRecord {
            customer_code: "C1".to_string(),
            pharmacy_name: "药房A".to_string(),
            town: town.to_string(),
            product_code: "P1".to_string(),
            product_name: product.to_string(),
            monthly_units: units.iter().map(|u| CellValue::from_f64(*u)).collect(),
        };
        SalesDataset {
            month_labels: vec!["Jan-24".to_string(), "Feb-24".to_string()],
            records: vec![
                make("Harare", "Amoxil 500", &[10.0, 20.0]),
                make("Bulawayo", "Amoxil 500", &[50.0, 50.0]),
                make("Harare", "Paracetamol", &[5.0, 5.0]),
            ],
            coercion_warnings: 0,
        }
    }

    #[test]
    fn test_town_totals_all() {
        let totals = GeographyEngine::new().town_totals(&make_dataset(), &[]);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].town, "Bulawayo");
        assert_eq!(totals[0].total_units, 100.0);
        assert_eq!(totals[1].town, "Harare");
        assert_eq!(totals[1].total_units, 40.0);
    }

    #[test]
    fn test_town_selection() {
        let selection = vec!["Harare".to_string()];
        let totals = GeographyEngine::new().town_totals(&make_dataset(), &selection);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total_units, 40.0);
    }

    #[test]
    fn test_product_distribution() {
        let totals =
            GeographyEngine::new().product_distribution(&make_dataset(), "Amoxil 500", &[]);
        assert_eq!(totals[0].town, "Bulawayo");
        assert_eq!(totals[1].town, "Harare");
        assert_eq!(totals[1].total_units, 30.0);
    }
}
