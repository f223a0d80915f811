// ==========================================
// 医药销售分析决策支持系统 - 窄表导入器
// ==========================================
// 职责: 原始字符串表 → PVM 输入行 / 库存批次 / 发票记录 / NPS 响应
// 规则: PVM 数值列强转失败 → Missing + 警告;
//       日期与强类型字段解析失败 → 行级错误（带行号与字段名）
// ==========================================

use crate::domain::customer::{InvoiceRecord, NpsResponse};
use crate::domain::pvm::PvmInputRow;
use crate::domain::stock::StockBatch;
use crate::domain::value::CellValue;
use crate::importer::column_map::{InvoiceColumnMap, NpsColumnMap, PvmColumnMap, StockColumnMap};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawTable;
use chrono::NaiveDate;

/// 库存批次效期日期格式
pub const STOCK_EXPIRY_DATE_FORMAT: &str = "%Y-%m-%d";
/// 发票日期格式
pub const INVOICE_DATE_FORMAT: &str = "%d/%m/%Y";

// ==========================================
// PvmImporter - PVM 输入表导入器
// ==========================================
pub struct PvmImporter;

impl PvmImporter {
    /// 创建新的 PVM 输入表导入器
    pub fn new() -> Self {
        Self
    }

    /// 导入 PVM 输入行
    ///
    /// # 返回
    /// - `Err(MissingColumn)`: 六个必需列任一不在表头中
    pub fn import(&self, table: &RawTable, map: &PvmColumnMap) -> ImportResult<Vec<PvmInputRow>> {
        table.require_columns(&map.required_columns())?;

        let mut coercion_warnings = 0u32;
        let rows = table
            .records
            .iter()
            .map(|raw| {
                let mut parse_numeric = |column: &str| {
                    let value = CellValue::parse(table.cell(raw, column));
                    if value.is_missing() {
                        coercion_warnings += 1;
                    }
                    value
                };
                PvmInputRow {
                    product: table.cell(raw, &map.product).to_string(),
                    product_family: table.cell(raw, &map.product_family).to_string(),
                    budget_price: parse_numeric(&map.budget_price),
                    actual_price: parse_numeric(&map.actual_price),
                    budget_volume: parse_numeric(&map.budget_volume),
                    actual_volume: parse_numeric(&map.actual_volume),
                }
            })
            .collect();

        if coercion_warnings > 0 {
            tracing::warn!(coercion_warnings, "PVM 输入存在非数值单元格, 已强转为 Missing");
        }
        Ok(rows)
    }
}

// ==========================================
// StockImporter - 库存批次表导入器
// ==========================================
pub struct StockImporter;

impl StockImporter {
    /// 创建新的库存批次表导入器
    pub fn new() -> Self {
        Self
    }

    /// 导入库存批次
    pub fn import(&self, table: &RawTable, map: &StockColumnMap) -> ImportResult<Vec<StockBatch>> {
        table.require_columns(&[
            map.product.as_str(),
            map.batch_number.as_str(),
            map.stocks.as_str(),
            map.expiry_date.as_str(),
        ])?;

        table
            .records
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                let row = idx + 2; // 表头占第 1 行
                let stocks_cell = table.cell(raw, &map.stocks);
                let stocks = stocks_cell.parse::<f64>().map_err(|e| {
                    ImportError::TypeConversionError {
                        row,
                        field: map.stocks.clone(),
                        message: e.to_string(),
                    }
                })?;

                let expiry_cell = table.cell(raw, &map.expiry_date);
                let expiry_date = NaiveDate::parse_from_str(expiry_cell, STOCK_EXPIRY_DATE_FORMAT)
                    .map_err(|_| ImportError::DateFormatError {
                        row,
                        field: map.expiry_date.clone(),
                        expected: STOCK_EXPIRY_DATE_FORMAT.to_string(),
                        value: expiry_cell.to_string(),
                    })?;

                Ok(StockBatch {
                    product: table.cell(raw, &map.product).to_string(),
                    batch_number: table.cell(raw, &map.batch_number).to_string(),
                    stocks,
                    expiry_date,
                })
            })
            .collect()
    }
}

// ==========================================
// InvoiceImporter - 发票表导入器 (RFM 输入)
// ==========================================
pub struct InvoiceImporter;

impl InvoiceImporter {
    /// 创建新的发票表导入器
    pub fn new() -> Self {
        Self
    }

    /// 导入发票记录
    pub fn import(
        &self,
        table: &RawTable,
        map: &InvoiceColumnMap,
    ) -> ImportResult<Vec<InvoiceRecord>> {
        table.require_columns(&[
            map.customer_name.as_str(),
            map.invoice_date.as_str(),
            map.units_sold.as_str(),
        ])?;

        table
            .records
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                let row = idx + 2;
                let date_cell = table.cell(raw, &map.invoice_date);
                let invoice_date = NaiveDate::parse_from_str(date_cell, INVOICE_DATE_FORMAT)
                    .map_err(|_| ImportError::DateFormatError {
                        row,
                        field: map.invoice_date.clone(),
                        expected: INVOICE_DATE_FORMAT.to_string(),
                        value: date_cell.to_string(),
                    })?;

                let units_cell = table.cell(raw, &map.units_sold);
                let units_sold = units_cell.parse::<f64>().map_err(|e| {
                    ImportError::TypeConversionError {
                        row,
                        field: map.units_sold.clone(),
                        message: e.to_string(),
                    }
                })?;

                Ok(InvoiceRecord {
                    customer_name: table.cell(raw, &map.customer_name).to_string(),
                    invoice_date,
                    units_sold,
                })
            })
            .collect()
    }
}

// ==========================================
// NpsImporter - NPS 问卷表导入器
// ==========================================
pub struct NpsImporter;

impl NpsImporter {
    /// 创建新的 NPS 问卷表导入器
    pub fn new() -> Self {
        Self
    }

    /// 导入 NPS 响应
    pub fn import(&self, table: &RawTable, map: &NpsColumnMap) -> ImportResult<Vec<NpsResponse>> {
        table.require_columns(&[map.period.as_str(), map.score.as_str()])?;

        table
            .records
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                let row = idx + 2;
                let score_cell = table.cell(raw, &map.score);
                let score = score_cell.parse::<i32>().map_err(|e| {
                    ImportError::TypeConversionError {
                        row,
                        field: map.score.clone(),
                        message: e.to_string(),
                    }
                })?;

                Ok(NpsResponse {
                    period: table.cell(raw, &map.period).to_string(),
                    score,
                })
            })
            .collect()
    }
}
