// ==========================================
// 医药销售分析决策支持系统 - 核心库
// ==========================================
// 技术栈: Rust (纯同步分析核心)
// 系统定位: 决策支持系统 (分析结果供壳层展示, 壳层自行持有选择状态)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 分析规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 策略旋钮
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 分析门面
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    BarKind, CellValue, CustomerSegment, DropAlert, ExpiryRow, ExpiryStatus, ImpactSign,
    InvoiceRecord, NpsResponse, NpsRow, PvmInputRow, PvmResultRow, PvmTable, PvmTotalRow,
    ReportingMonth, ReturnAlert, RfmRow, SalesDataset, SalesDipAlert, SalesRecord,
    SegmentSummary, StockBatch, WaterfallStep,
};

// 引擎
pub use engine::{
    AnalysisError, AnalysisResult, DropDetector, ExpiryEngine, ForecastEngine, GeographyEngine,
    NpsEngine, PerformanceEngine, PvmEngine, ReturnsEngine, RfmEngine, SalesDipEngine,
    TrendEngine, WaterfallEngine,
};

// 导入
pub use importer::{
    parse_table_file, ImportError, ImportResult, InvoiceImporter, NpsImporter, PvmImporter,
    SalesImporter, StockImporter,
};

// 配置
pub use config::{AnalysisConfig, ExpiryWindow, ForecastConfig};

// API
pub use api::{AnalysisApi, ApiError, ApiResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "医药销售分析决策支持系统";

// ==========================================
// 预编译检查
// ==========================================
