// ==========================================
// 医药销售分析决策支持系统 - 销售数据集
// ==========================================
// 职责: 宽表销售数据的内存表示与纯函数筛选
// 红线: 月份轴固定且全表共享; 筛选永远返回新数据集, 不原地修改
// ==========================================

use crate::domain::value::CellValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 销售记录（一行 = 产品 × 药房 × 报表行）
///
/// `monthly_units` 与数据集的月份轴一一对应，长度固定；
/// 空白月份在导入时补 0，负值表示退货。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRecord {
    /// 客户编码 (C-CODE)
    pub customer_code: String,
    /// 药房名称 (NAME)
    pub pharmacy_name: String,
    /// 城镇 (TOWN)
    pub town: String,
    /// 产品编码 (P-CODE)
    pub product_code: String,
    /// 产品描述 (DISCRIPTION)
    pub product_name: String,
    /// 按月销量（与月份轴等长，按时间升序）
    pub monthly_units: Vec<CellValue>,
}

impl SalesRecord {
    /// 记录总销量（缺失值不计入合计）
    pub fn total_units(&self) -> f64 {
        self.monthly_units
            .iter()
            .filter_map(|v| v.finite())
            .sum()
    }

    /// 按月销量转为 f64 序列（Missing 转 NaN，供逐期分析使用）
    pub fn monthly_series(&self) -> Vec<f64> {
        self.monthly_units.iter().map(|v| v.to_f64()).collect()
    }
}

/// 销售数据集（整张宽表 + 共享月份轴）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesDataset {
    /// 月份轴标签（按时间升序，如 "Nov-22".."Nov-23"）
    pub month_labels: Vec<String>,
    /// 数据行
    pub records: Vec<SalesRecord>,
    /// 导入时的数值强转警告数（非数值单元格 → Missing）
    pub coercion_warnings: u32,
}

impl SalesDataset {
    /// 月份数
    pub fn month_count(&self) -> usize {
        self.month_labels.len()
    }

    /// 行数
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 通用筛选（返回新数据集）
    pub fn filter<F>(&self, keep: F) -> SalesDataset
    where
        F: Fn(&SalesRecord) -> bool,
    {
        SalesDataset {
            month_labels: self.month_labels.clone(),
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
            coercion_warnings: self.coercion_warnings,
        }
    }

    /// 按城镇筛选
    pub fn filter_town(&self, town: &str) -> SalesDataset {
        self.filter(|r| r.town == town)
    }

    /// 按产品描述筛选
    pub fn filter_product(&self, product_name: &str) -> SalesDataset {
        self.filter(|r| r.product_name == product_name)
    }

    /// 按药房名称筛选
    pub fn filter_pharmacy(&self, pharmacy_name: &str) -> SalesDataset {
        self.filter(|r| r.pharmacy_name == pharmacy_name)
    }

    /// 去重后的产品描述列表（升序）
    pub fn product_names(&self) -> Vec<String> {
        let set: std::collections::BTreeSet<String> = self
            .records
            .iter()
            .map(|r| r.product_name.clone())
            .collect();
        set.into_iter().collect()
    }

    /// 去重后的城镇列表（升序，空值剔除）
    pub fn towns(&self) -> Vec<String> {
        let set: std::collections::BTreeSet<String> = self
            .records
            .iter()
            .filter(|r| !r.town.is_empty())
            .map(|r| r.town.clone())
            .collect();
        set.into_iter().collect()
    }

    /// 去重后的药房名称列表（升序）
    pub fn pharmacy_names(&self) -> Vec<String> {
        let set: std::collections::BTreeSet<String> = self
            .records
            .iter()
            .map(|r| r.pharmacy_name.clone())
            .collect();
        set.into_iter().collect()
    }

    /// 按 (药房, 产品) 分组
    ///
    /// BTreeMap 保证实体扫描顺序稳定（按标识符升序）。
    pub fn group_by_pharmacy_product(&self) -> BTreeMap<(String, String), Vec<&SalesRecord>> {
        let mut groups: BTreeMap<(String, String), Vec<&SalesRecord>> = BTreeMap::new();
        for record in &self.records {
            groups
                .entry((record.pharmacy_name.clone(), record.product_name.clone()))
                .or_default()
                .push(record);
        }
        groups
    }

    /// 按月合计（缺失值不计入合计）
    ///
    /// # 返回
    /// 与月份轴等长的合计序列
    pub fn monthly_totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.month_count()];
        for record in &self.records {
            for (i, v) in record.monthly_units.iter().enumerate() {
                if let Some(x) = v.finite() {
                    totals[i] += x;
                }
            }
        }
        totals
    }
}
