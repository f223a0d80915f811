// ==========================================
// 医药销售分析决策支持系统 - 文件解析器
// ==========================================
// 职责: 把 CSV / Excel 文件解析为原始字符串表
// 支持: Excel (.xlsx) / CSV (.csv)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 原始字符串表（表头 + 行记录）
///
/// 表头保序, 单元格统一 TRIM; 列存在性校验由映射层基于表头完成。
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<HashMap<String, String>>,
}

impl RawTable {
    /// 表头是否包含某列
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// 校验一组必需列
    pub fn require_columns(&self, names: &[&str]) -> ImportResult<()> {
        for name in names {
            if !self.has_column(name) {
                return Err(ImportError::MissingColumn((*name).to_string()));
            }
        }
        Ok(())
    }

    /// 读取某行某列（缺失按空字符串）
    pub fn cell<'a>(&'a self, record: &'a HashMap<String, String>, column: &str) -> &'a str {
        record.get(column).map(|s| s.as_str()).unwrap_or("")
    }
}

// ==========================================
// CSV 解析
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 解析 CSV 文件为原始字符串表
    pub fn parse(&self, file_path: &Path) -> ImportResult<RawTable> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row_map = HashMap::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }
            records.push(row_map);
        }

        Ok(RawTable { headers, records })
    }
}

// ==========================================
// Excel 解析
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 解析 Excel 文件的第一个工作表为原始字符串表
    pub fn parse(&self, file_path: &Path) -> ImportResult<RawTable> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let mut workbook: Xlsx<_> = open_workbook(file_path)
            .map_err(|e: calamine::XlsxError| ImportError::ExcelParseError(e.to_string()))?;

        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError("Excel 文件无工作表".to_string()));
        }
        let sheet_name = sheet_names[0].clone();
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut records = Vec::new();
        for data_row in rows {
            let mut row_map = HashMap::new();
            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), cell.to_string().trim().to_string());
                }
            }
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }
            records.push(row_map);
        }

        Ok(RawTable { headers, records })
    }
}

// ==========================================
// 按扩展名自动选择解析器
// ==========================================

/// 解析表格文件（根据扩展名选择 CSV / Excel 解析器）
pub fn parse_table_file(file_path: &Path) -> ImportResult<RawTable> {
    let ext = file_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => CsvParser.parse(file_path),
        "xlsx" | "xls" => ExcelParser.parse(file_path),
        other => Err(ImportError::UnsupportedFormat(other.to_string())),
    }
}
