// ==========================================
// 医药销售分析决策支持系统 - PVM 分解引擎
// ==========================================
// 职责: 预算/实际收入差异的价格-销量-结构三项分解
// 输入: PVM 输入行（按产品或产品族口径, 上游已筛选）
// 输出: PvmTable（数据行 + 合成合计行, 原始数值）
// ==========================================
// 红线: 无状态引擎, 所有方法都是纯函数
// 红线: 取整只发生在展示投影, 引擎内部不取整
// ==========================================

use crate::domain::pvm::{PvmInputRow, PvmResultRow, PvmTable, PvmTotalRow, TOTAL_ROW_LABEL};
use crate::domain::value::CellValue;
use crate::engine::error::{AnalysisError, AnalysisResult};

// ==========================================
// PvmEngine - PVM 分解引擎
// ==========================================
// 分解公式 (对收入差异 ΔR = AP·AV − BP·BV 的加法分解):
//   PriceImpact  = (AP − BP) · BV
//   VolumeImpact = BP · (AV − BV)
//   MixImpact    = (AP − BP) · (AV − BV)
//   TotalImpact  = PriceImpact + VolumeImpact + MixImpact ≡ ΔR (代数恒等, 无残差项)
pub struct PvmEngine;

impl PvmEngine {
    /// 创建新的 PVM 分解引擎
    pub fn new() -> Self {
        Self
    }

    /// 对输入行集执行 PVM 分解
    ///
    /// # 参数
    /// - `rows`: 输入行（四个数值字段允许 Missing, 缺失向四个派生字段传播）
    ///
    /// # 返回
    /// - `Ok(PvmTable)`: 数据行 + 合成合计行, 均为原始数值
    /// - `Err(EmptyInput)`: 输入行集为空
    ///
    /// # 合计行
    /// 仅汇总预算销量、实际销量与合计影响（有限值口径），
    /// 不由汇总后的单价重新推导三个影响分量。
    pub fn compute(&self, rows: &[PvmInputRow]) -> AnalysisResult<PvmTable> {
        if rows.is_empty() {
            return Err(AnalysisError::EmptyInput("PVM 输入行集为空".to_string()));
        }

        let mut result_rows = Vec::with_capacity(rows.len());
        let mut coercion_warnings = 0u32;

        for row in rows {
            // 统计缺失输入单元格（上游强转为 Missing 的非数值单元格）
            for value in [
                row.budget_price,
                row.actual_price,
                row.budget_volume,
                row.actual_volume,
            ] {
                if value.is_missing() {
                    coercion_warnings += 1;
                }
            }

            let price_delta = row.actual_price - row.budget_price;
            let volume_delta = row.actual_volume - row.budget_volume;

            let price_impact = price_delta * row.budget_volume;
            let volume_impact = row.budget_price * volume_delta;
            let mix_impact = price_delta * volume_delta;
            let total_impact = price_impact + volume_impact + mix_impact;

            result_rows.push(PvmResultRow {
                product: row.product.clone(),
                product_family: row.product_family.clone(),
                budget_price: row.budget_price,
                actual_price: row.actual_price,
                budget_volume: row.budget_volume,
                actual_volume: row.actual_volume,
                price_impact,
                volume_impact,
                mix_impact,
                total_impact,
            });
        }

        if coercion_warnings > 0 {
            tracing::warn!(
                coercion_warnings,
                rows = rows.len(),
                "PVM 输入存在缺失数值单元格, 相关行的派生字段为 Missing"
            );
        }

        let total_row = Self::build_total_row(&result_rows);

        Ok(PvmTable {
            rows: result_rows,
            total_row,
            coercion_warnings,
        })
    }

    /// 行级恒等式残差: TotalImpact − (AP·AV − BP·BV)
    ///
    /// # 返回
    /// - `Some(residual)`: 四个输入均为有限值
    /// - `None`: 行含缺失值（两侧同为缺失, 恒等式无可比项）
    pub fn identity_residual(row: &PvmResultRow) -> Option<f64> {
        let revenue_delta =
            row.actual_price * row.actual_volume - row.budget_price * row.budget_volume;
        match (row.total_impact.finite(), revenue_delta.finite()) {
            (Some(total), Some(delta)) => Some(total - delta),
            _ => None,
        }
    }

    /// 合成合计行（有限值口径求和）
    fn build_total_row(rows: &[PvmResultRow]) -> PvmTotalRow {
        let sum_finite = |pick: fn(&PvmResultRow) -> CellValue| -> f64 {
            rows.iter().filter_map(|r| pick(r).finite()).sum()
        };

        PvmTotalRow {
            label: TOTAL_ROW_LABEL.to_string(),
            budget_volume: CellValue::Finite(sum_finite(|r| r.budget_volume)),
            actual_volume: CellValue::Finite(sum_finite(|r| r.actual_volume)),
            total_impact: CellValue::Finite(sum_finite(|r| r.total_impact)),
        }
    }
}
