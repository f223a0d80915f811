// ==========================================
// 医药销售分析决策支持系统 - 瀑布对账引擎
// ==========================================
// 职责: 由 PVM 结果表推导五步瀑布序列并对账
// 输入: PvmTable（原始数值）
// 输出: 五个有序 WaterfallStep, 可直接交给外部绘图协作方
// ==========================================
// 红线: 对账失败绝不取整凑平, 必须以错误传播
// ==========================================

use crate::domain::pvm::{PvmTable, WaterfallStep};
use crate::domain::types::{BarKind, ImpactSign};
use crate::domain::value::CellValue;
use crate::engine::error::{AnalysisError, AnalysisResult};

/// 对账相对容差
pub const RECONCILE_REL_TOLERANCE: f64 = 1e-6;

/// 瀑布类目标签（顺序固定）
pub const WATERFALL_LABELS: [&str; 5] = [
    "Budget Total",
    "PriceImpact",
    "VolumeImpact",
    "MixImpact",
    "Actual Total",
];

// ==========================================
// WaterfallEngine - 瀑布对账引擎
// ==========================================
pub struct WaterfallEngine;

impl WaterfallEngine {
    /// 创建新的瀑布对账引擎
    pub fn new() -> Self {
        Self
    }

    /// 推导五步瀑布序列
    ///
    /// # 算法
    /// 1. 预算合计 = Σ(预算单价 × 预算销量)（独立于 PVM 引擎重新计算）
    /// 2. 实际合计 = Σ(实际单价 × 实际销量)
    /// 3. 三个影响柱 = Σ(价格影响) / Σ(销量影响) / Σ(结构影响)
    /// 4. 对账: 预算合计 + 三项影响合计 必须在 1e-6 相对容差内等于实际合计
    /// 5. 合计柱从零轴起画; 影响柱自预算合计起逐柱累计基线
    ///
    /// # 返回
    /// - `Ok`: 恰好五个步骤
    /// - `Err(Reconciliation)`: 合计不平（缺失值污染或上游缺行），不自动修正
    pub fn build(&self, table: &PvmTable) -> AnalysisResult<Vec<WaterfallStep>> {
        if table.rows.is_empty() {
            return Err(AnalysisError::EmptyInput("PVM 结果表无数据行".to_string()));
        }

        // 缺失值参与求和即传播, 使污染在对账处显形
        let mut budget_total = CellValue::Finite(0.0);
        let mut actual_total = CellValue::Finite(0.0);
        let mut price_sum = CellValue::Finite(0.0);
        let mut volume_sum = CellValue::Finite(0.0);
        let mut mix_sum = CellValue::Finite(0.0);

        for row in &table.rows {
            budget_total = budget_total + row.budget_price * row.budget_volume;
            actual_total = actual_total + row.actual_price * row.actual_volume;
            price_sum = price_sum + row.price_impact;
            volume_sum = volume_sum + row.volume_impact;
            mix_sum = mix_sum + row.mix_impact;
        }

        let budget_total_f = budget_total.to_f64();
        let actual_total_f = actual_total.to_f64();
        let impact_sum = (price_sum + volume_sum + mix_sum).to_f64();
        let recomputed = budget_total_f + impact_sum;

        // 对账校验（相对容差, 以 1.0 为绝对下限）
        let tolerance = RECONCILE_REL_TOLERANCE * actual_total_f.abs().max(1.0);
        let balanced = (recomputed - actual_total_f).abs() <= tolerance;
        if !balanced {
            tracing::error!(
                budget_total = budget_total_f,
                impact_sum,
                recomputed,
                actual_total = actual_total_f,
                "瀑布对账失败"
            );
            return Err(AnalysisError::Reconciliation {
                budget_total: budget_total_f,
                impact_sum,
                recomputed,
                actual_total: actual_total_f,
            });
        }

        let price_f = price_sum.to_f64();
        let volume_f = volume_sum.to_f64();
        let mix_f = mix_sum.to_f64();

        let steps = vec![
            WaterfallStep {
                label: WATERFALL_LABELS[0].to_string(),
                value: budget_total_f,
                baseline: 0.0,
                kind: BarKind::Absolute,
                sign: ImpactSign::Neutral,
            },
            WaterfallStep {
                label: WATERFALL_LABELS[1].to_string(),
                value: price_f,
                baseline: budget_total_f,
                kind: BarKind::Delta,
                sign: Self::sign_of(price_f),
            },
            WaterfallStep {
                label: WATERFALL_LABELS[2].to_string(),
                value: volume_f,
                baseline: budget_total_f + price_f,
                kind: BarKind::Delta,
                sign: Self::sign_of(volume_f),
            },
            WaterfallStep {
                label: WATERFALL_LABELS[3].to_string(),
                value: mix_f,
                baseline: budget_total_f + price_f + volume_f,
                kind: BarKind::Delta,
                sign: Self::sign_of(mix_f),
            },
            WaterfallStep {
                label: WATERFALL_LABELS[4].to_string(),
                value: recomputed,
                baseline: 0.0,
                kind: BarKind::Absolute,
                sign: ImpactSign::Neutral,
            },
        ];

        Ok(steps)
    }

    /// 影响柱方向分类（负值标红, 其余标绿）
    fn sign_of(value: f64) -> ImpactSign {
        if value < 0.0 {
            ImpactSign::Negative
        } else {
            ImpactSign::Positive
        }
    }
}
