// ==========================================
// 医药销售分析决策支持系统 - 业绩排名引擎
// ==========================================
// 职责: 药房/产品维度的排名、单月切片与全月覆盖筛查
// ==========================================

use crate::domain::sales::SalesDataset;
use crate::engine::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// 实体合计行（药房或产品）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityTotal {
    pub name: String,
    pub total_units: f64,
}

/// 实体月度行（含逐月数值与合计）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMonthly {
    pub name: String,
    pub monthly_units: Vec<f64>,
    pub total_units: f64,
}

/// 单月切片行（药房 × 产品在某一月份的销量）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthSliceRow {
    pub pharmacy_name: String,
    pub product_name: String,
    pub units: f64,
}

// ==========================================
// PerformanceEngine - 业绩排名引擎
// ==========================================
pub struct PerformanceEngine;

impl PerformanceEngine {
    /// 创建新的业绩排名引擎
    pub fn new() -> Self {
        Self
    }

    /// 药房排名（前 N, 按总量降序）
    ///
    /// # 参数
    /// - `product_filter`: 产品筛选, None 表示全部产品
    pub fn pharmacy_ranking(
        &self,
        dataset: &SalesDataset,
        product_filter: Option<&str>,
        top_n: usize,
    ) -> Vec<EntityTotal> {
        let filtered = match product_filter {
            Some(product) => dataset.filter_product(product),
            None => dataset.clone(),
        };
        Self::rank(Self::totals_by(&filtered, |r| r.pharmacy_name.clone()), top_n)
    }

    /// 产品排名（前 N, 按总量降序）
    pub fn product_ranking(&self, dataset: &SalesDataset, top_n: usize) -> Vec<EntityTotal> {
        Self::rank(Self::totals_by(dataset, |r| r.product_name.clone()), top_n)
    }

    /// 前 N 药房的月度趋势表
    pub fn pharmacy_monthly_trends(
        &self,
        dataset: &SalesDataset,
        top_n: usize,
    ) -> Vec<EntityMonthly> {
        let ranking = self.pharmacy_ranking(dataset, None, top_n);
        ranking
            .iter()
            .map(|entity| {
                let filtered = dataset.filter_pharmacy(&entity.name);
                let monthly = filtered.monthly_totals();
                EntityMonthly {
                    name: entity.name.clone(),
                    total_units: monthly.iter().sum(),
                    monthly_units: monthly,
                }
            })
            .collect()
    }

    /// 单月切片: 某月份销量前 N 的 (药房, 产品) 行
    ///
    /// # 返回
    /// - `Err(UnknownMonth)`: 月份标签不在数据集月份轴上
    pub fn top_for_month(
        &self,
        dataset: &SalesDataset,
        month_label: &str,
        top_n: usize,
    ) -> AnalysisResult<Vec<MonthSliceRow>> {
        let month_index = dataset
            .month_labels
            .iter()
            .position(|l| l == month_label)
            .ok_or_else(|| AnalysisError::UnknownMonth(month_label.to_string()))?;

        let mut by_pair: BTreeMap<(String, String), f64> = BTreeMap::new();
        for record in &dataset.records {
            if let Some(units) = record.monthly_units[month_index].finite() {
                *by_pair
                    .entry((record.pharmacy_name.clone(), record.product_name.clone()))
                    .or_insert(0.0) += units;
            }
        }

        let mut rows: Vec<MonthSliceRow> = by_pair
            .into_iter()
            .map(|((pharmacy_name, product_name), units)| MonthSliceRow {
                pharmacy_name,
                product_name,
                units,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.units
                .partial_cmp(&a.units)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.pharmacy_name.cmp(&b.pharmacy_name))
        });
        rows.truncate(top_n);
        Ok(rows)
    }

    /// 全月覆盖药房: 每个月都有正销量的药房, 按总量降序取前 N
    pub fn full_coverage_pharmacies(
        &self,
        dataset: &SalesDataset,
        top_n: usize,
    ) -> Vec<EntityMonthly> {
        let mut rows: Vec<EntityMonthly> = dataset
            .pharmacy_names()
            .iter()
            .filter_map(|name| {
                let monthly = dataset.filter_pharmacy(name).monthly_totals();
                if monthly.iter().all(|m| *m > 0.0) {
                    Some(EntityMonthly {
                        name: name.clone(),
                        total_units: monthly.iter().sum(),
                        monthly_units: monthly,
                    })
                } else {
                    None
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            b.total_units
                .partial_cmp(&a.total_units)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        rows.truncate(top_n);
        rows
    }

    /// 按键汇总总量
    fn totals_by<F>(dataset: &SalesDataset, key: F) -> BTreeMap<String, f64>
    where
        F: Fn(&crate::domain::sales::SalesRecord) -> String,
    {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for record in &dataset.records {
            *totals.entry(key(record)).or_insert(0.0) += record.total_units();
        }
        totals
    }

    /// 排序并截断
    fn rank(totals: BTreeMap<String, f64>, top_n: usize) -> Vec<EntityTotal> {
        let mut rows: Vec<EntityTotal> = totals
            .into_iter()
            .map(|(name, total_units)| EntityTotal { name, total_units })
            .collect();
        rows.sort_by(|a, b| {
            b.total_units
                .partial_cmp(&a.total_units)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        rows.truncate(top_n);
        rows
    }
}
