// ==========================================
// 医药销售分析决策支持系统 - 引擎层
// ==========================================
// 职责: 实现分析规则引擎, 不做 I/O
// 红线: 引擎全部为无状态纯函数, 每次调用产出新表, 不原地修改输入
// ==========================================

pub mod drop_detector;
pub mod error;
pub mod expiry;
pub mod forecast;
pub mod geography;
pub mod nps;
pub mod performance;
pub mod pvm;
pub mod returns;
pub mod sales_dip;
pub mod segmentation;
pub mod trend;
pub mod waterfall;

// 重导出核心引擎
pub use drop_detector::{
    DropDetector, DROP_THRESHOLD_MAX_PCT, DROP_THRESHOLD_MIN_PCT, MIN_QUALIFYING_MONTHS,
};
pub use error::{AnalysisError, AnalysisResult};
pub use expiry::ExpiryEngine;
pub use forecast::{ForecastEngine, ForecastMetrics, ForecastResult};
pub use geography::{GeographyEngine, TownTotal};
pub use nps::NpsEngine;
pub use performance::{EntityMonthly, EntityTotal, MonthSliceRow, PerformanceEngine};
pub use pvm::PvmEngine;
pub use returns::ReturnsEngine;
pub use sales_dip::SalesDipEngine;
pub use segmentation::RfmEngine;
pub use trend::{MonthlySeries, TrendEngine};
pub use waterfall::{WaterfallEngine, RECONCILE_REL_TOLERANCE, WATERFALL_LABELS};
