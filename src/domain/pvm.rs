// ==========================================
// 医药销售分析决策支持系统 - PVM 领域对象
// ==========================================
// 职责: 价格/销量/结构 (Price-Volume-Mix) 分解的输入行、结果行与瀑布步
// 红线: 计算表全程携带原始数值; 两位小数仅存在于展示投影
// ==========================================

use crate::domain::types::{BarKind, ImpactSign};
use crate::domain::value::CellValue;
use serde::{Deserialize, Serialize};

/// 合计行标签（与数据行明确区分）
pub const TOTAL_ROW_LABEL: &str = "Total";

/// PVM 输入行（按产品或产品族口径）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PvmInputRow {
    /// 产品标识
    pub product: String,
    /// 产品族标识
    pub product_family: String,
    /// 预算单价
    pub budget_price: CellValue,
    /// 实际单价
    pub actual_price: CellValue,
    /// 预算销量
    pub budget_volume: CellValue,
    /// 实际销量
    pub actual_volume: CellValue,
}

/// PVM 结果行（输入行 + 四个派生字段，未取整）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PvmResultRow {
    pub product: String,
    pub product_family: String,
    pub budget_price: CellValue,
    pub actual_price: CellValue,
    pub budget_volume: CellValue,
    pub actual_volume: CellValue,
    /// 价格影响 = (实际单价 - 预算单价) × 预算销量
    pub price_impact: CellValue,
    /// 销量影响 = 预算单价 × (实际销量 - 预算销量)
    pub volume_impact: CellValue,
    /// 结构影响 = (实际单价 - 预算单价) × (实际销量 - 预算销量)
    pub mix_impact: CellValue,
    /// 合计影响 = 价格影响 + 销量影响 + 结构影响
    pub total_impact: CellValue,
}

impl PvmResultRow {
    /// 展示投影: 所有数值字段四舍五入到两位小数
    pub fn rounded(&self) -> PvmResultRow {
        PvmResultRow {
            product: self.product.clone(),
            product_family: self.product_family.clone(),
            budget_price: self.budget_price.round2(),
            actual_price: self.actual_price.round2(),
            budget_volume: self.budget_volume.round2(),
            actual_volume: self.actual_volume.round2(),
            price_impact: self.price_impact.round2(),
            volume_impact: self.volume_impact.round2(),
            mix_impact: self.mix_impact.round2(),
            total_impact: self.total_impact.round2(),
        }
    }
}

/// 合成合计行
///
/// 仅汇总预算销量、实际销量与合计影响，
/// 不由汇总后的单价重新推导三个影响分量。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PvmTotalRow {
    /// 行标签（固定为 [`TOTAL_ROW_LABEL`]）
    pub label: String,
    pub budget_volume: CellValue,
    pub actual_volume: CellValue,
    pub total_impact: CellValue,
}

impl PvmTotalRow {
    /// 展示投影
    pub fn rounded(&self) -> PvmTotalRow {
        PvmTotalRow {
            label: self.label.clone(),
            budget_volume: self.budget_volume.round2(),
            actual_volume: self.actual_volume.round2(),
            total_impact: self.total_impact.round2(),
        }
    }
}

/// PVM 结果表
///
/// 生命周期: 每次分析调用按筛选片重新计算, 不持久化。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PvmTable {
    /// 数据行（原始数值）
    pub rows: Vec<PvmResultRow>,
    /// 合成合计行（由原始数值汇总后生成）
    pub total_row: PvmTotalRow,
    /// 数值强转警告数（非数值 → Missing 的单元格数）
    pub coercion_warnings: u32,
}

impl PvmTable {
    /// 展示投影: 数据行取整视图（取整只发生在恒等式与对账校验之后）
    pub fn display_rows(&self) -> Vec<PvmResultRow> {
        self.rows.iter().map(|r| r.rounded()).collect()
    }

    /// 展示投影: 合计行取整视图
    pub fn display_total(&self) -> PvmTotalRow {
        self.total_row.rounded()
    }
}

/// 瀑布图步骤（供外部绘图协作方直接消费）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterfallStep {
    /// 类目标签
    pub label: String,
    /// 柱值
    pub value: f64,
    /// 起画基线（Absolute 柱恒为 0）
    pub baseline: f64,
    /// 柱类型
    pub kind: BarKind,
    /// 方向配色类别
    pub sign: ImpactSign,
}
