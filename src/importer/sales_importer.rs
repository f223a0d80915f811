// ==========================================
// 医药销售分析决策支持系统 - 销售宽表导入器
// ==========================================
// 职责: 原始字符串表 → SalesDataset
// 规则: 空白月份补 0; 非数值月份强转为 Missing 并计入警告, 行保留
// ==========================================

use crate::domain::sales::{SalesDataset, SalesRecord};
use crate::domain::value::CellValue;
use crate::importer::column_map::SalesColumnMap;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::RawTable;
use uuid::Uuid;

// ==========================================
// SalesImporter - 销售宽表导入器
// ==========================================
pub struct SalesImporter;

impl SalesImporter {
    /// 创建新的销售宽表导入器
    pub fn new() -> Self {
        Self
    }

    /// 导入销售宽表
    ///
    /// # 参数
    /// - `table`: 文件解析产出的原始字符串表
    /// - `map`: 语义列映射
    ///
    /// # 返回
    /// - `Ok(SalesDataset)`: 月份轴固定、行列完整的数据集
    /// - `Err(MissingColumn)`: 标识列或指定月份列不在表头中
    pub fn import(&self, table: &RawTable, map: &SalesColumnMap) -> ImportResult<SalesDataset> {
        table.require_columns(&map.id_columns())?;

        // 月份轴: 显式清单, 或标识列之外的全部表头列（保序）
        let month_labels: Vec<String> = match &map.month_columns {
            Some(columns) => {
                let names: Vec<&str> = columns.iter().map(|c| c.as_str()).collect();
                table.require_columns(&names)?;
                columns.clone()
            }
            None => {
                let id_columns = map.id_columns();
                table
                    .headers
                    .iter()
                    .filter(|h| !id_columns.contains(&h.as_str()))
                    .cloned()
                    .collect()
            }
        };

        let mut coercion_warnings = 0u32;
        let mut records = Vec::with_capacity(table.records.len());
        for raw in &table.records {
            let mut monthly_units = Vec::with_capacity(month_labels.len());
            for month in &month_labels {
                let cell = table.cell(raw, month);
                if cell.is_empty() {
                    // 缺失月份按 0 处理, 不是缺失值
                    monthly_units.push(CellValue::Finite(0.0));
                    continue;
                }
                let value = CellValue::parse(cell);
                if value.is_missing() {
                    coercion_warnings += 1;
                }
                monthly_units.push(value);
            }

            records.push(SalesRecord {
                customer_code: table.cell(raw, &map.customer_code).to_string(),
                pharmacy_name: table.cell(raw, &map.pharmacy_name).to_string(),
                town: table.cell(raw, &map.town).to_string(),
                product_code: table.cell(raw, &map.product_code).to_string(),
                product_name: table.cell(raw, &map.product_name).to_string(),
                monthly_units,
            });
        }

        let batch_id = Uuid::new_v4();
        tracing::info!(
            %batch_id,
            rows = records.len(),
            months = month_labels.len(),
            coercion_warnings,
            "销售宽表导入完成"
        );
        if coercion_warnings > 0 {
            tracing::warn!(coercion_warnings, "存在非数值月份单元格, 已强转为 Missing");
        }

        Ok(SalesDataset {
            month_labels,
            records,
            coercion_warnings,
        })
    }
}
