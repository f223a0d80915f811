// ==========================================
// 医药销售分析决策支持系统 - 净推荐值引擎 (NPS)
// ==========================================
// 职责: 按期间计算 NPS
// 口径: 推荐者评分 >= 9, 贬损者评分 <= 6 (0-10 分制)
// ==========================================

use crate::domain::customer::{NpsResponse, NpsRow};
use crate::engine::error::{AnalysisError, AnalysisResult};
use std::collections::BTreeMap;

/// 推荐者评分下界
pub const PROMOTER_MIN_SCORE: i32 = 9;
/// 贬损者评分上界
pub const DETRACTOR_MAX_SCORE: i32 = 6;

// ==========================================
// NpsEngine - 净推荐值引擎
// ==========================================
pub struct NpsEngine;

impl NpsEngine {
    /// 创建新的净推荐值引擎
    pub fn new() -> Self {
        Self
    }

    /// 按期间计算 NPS
    ///
    /// NPS = (推荐者数 − 贬损者数) / 响应数 × 100
    ///
    /// # 返回
    /// 按期间标签升序的结果行
    pub fn compute(&self, responses: &[NpsResponse]) -> AnalysisResult<Vec<NpsRow>> {
        if responses.is_empty() {
            return Err(AnalysisError::EmptyInput("NPS 响应为空".to_string()));
        }

        let mut by_period: BTreeMap<String, Vec<i32>> = BTreeMap::new();
        for response in responses {
            by_period
                .entry(response.period.clone())
                .or_default()
                .push(response.score);
        }

        let rows = by_period
            .into_iter()
            .map(|(period, scores)| {
                let promoters = scores.iter().filter(|s| **s >= PROMOTER_MIN_SCORE).count();
                let detractors = scores.iter().filter(|s| **s <= DETRACTOR_MAX_SCORE).count();
                let responses = scores.len();
                let nps =
                    (promoters as f64 - detractors as f64) / responses as f64 * 100.0;
                NpsRow {
                    period,
                    promoters,
                    detractors,
                    responses,
                    nps,
                }
            })
            .collect();

        Ok(rows)
    }
}
