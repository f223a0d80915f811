// ==========================================
// 医药销售分析决策支持系统 - 导入层
// ==========================================
// 职责: 文件解析 + 语义列映射 + 类型化导入
// 规则: 这是唯一接触文件系统的层, 核心引擎只见类型化行
// ==========================================

pub mod column_map;
pub mod error;
pub mod file_parser;
pub mod sales_importer;
pub mod table_importer;

// 重导出
pub use column_map::{
    InvoiceColumnMap, NpsColumnMap, PvmColumnMap, SalesColumnMap, StockColumnMap,
};
pub use error::{ImportError, ImportResult};
pub use file_parser::{parse_table_file, CsvParser, ExcelParser, RawTable};
pub use sales_importer::SalesImporter;
pub use table_importer::{
    InvoiceImporter, NpsImporter, PvmImporter, StockImporter, INVOICE_DATE_FORMAT,
    STOCK_EXPIRY_DATE_FORMAT,
};
