// ==========================================
// 医药销售分析决策支持系统 - 领域层
// ==========================================
// 职责: 实体与类型定义, 不含业务规则
// ==========================================

pub mod alert;
pub mod customer;
pub mod pvm;
pub mod sales;
pub mod stock;
pub mod types;
pub mod value;

// 重导出核心类型
pub use alert::{DropAlert, ReturnAlert, SalesDipAlert};
pub use customer::{InvoiceRecord, NpsResponse, NpsRow, RfmRow, SegmentSummary};
pub use pvm::{PvmInputRow, PvmResultRow, PvmTable, PvmTotalRow, WaterfallStep, TOTAL_ROW_LABEL};
pub use sales::{SalesDataset, SalesRecord};
pub use stock::{ExpiryRow, StockBatch};
pub use types::{BarKind, CustomerSegment, ExpiryStatus, ImpactSign, ReportingMonth};
pub use value::CellValue;
