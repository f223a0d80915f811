// ==========================================
// 医药销售分析决策支持系统 - 销量预测引擎
// ==========================================
// 职责: 单序列简单指数平滑预测 + 评估指标
// 规则: 模型选择属外部协作方, 本引擎只提供固定的简单平滑
// ==========================================

use crate::engine::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};

/// 预测期数允许区间下界
pub const FORECAST_HORIZON_MIN: usize = 1;
/// 预测期数允许区间上界
pub const FORECAST_HORIZON_MAX: usize = 12;

/// 预测结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    /// 平滑后的末期水平
    pub level: f64,
    /// 各期预测值（简单指数平滑为水平外推）
    pub forecasts: Vec<f64>,
    /// 取整到整数件的预测值（展示口径）
    pub forecasts_rounded: Vec<i64>,
}

/// 评估指标
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastMetrics {
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
    /// 平均绝对百分比误差（分母加 epsilon 防零）
    pub mape_pct: f64,
}

// ==========================================
// ForecastEngine - 销量预测引擎
// ==========================================
pub struct ForecastEngine;

impl ForecastEngine {
    /// 创建新的销量预测引擎
    pub fn new() -> Self {
        Self
    }

    /// 简单指数平滑预测
    ///
    /// # 参数
    /// - `series`: 月度销量序列（NaN 月份沿用上一期水平）
    /// - `horizon`: 预测期数（[1, 12]）
    /// - `alpha`: 平滑系数（(0, 1]）
    ///
    /// # 返回
    /// - `Err(EmptyInput)`: 序列中无有限值
    /// - `Err(ThresholdOutOfRange)`: 期数或平滑系数越界
    pub fn forecast(
        &self,
        series: &[f64],
        horizon: usize,
        alpha: f64,
    ) -> AnalysisResult<ForecastResult> {
        if !(FORECAST_HORIZON_MIN..=FORECAST_HORIZON_MAX).contains(&horizon) {
            return Err(AnalysisError::ThresholdOutOfRange {
                value: horizon as f64,
                min: FORECAST_HORIZON_MIN as f64,
                max: FORECAST_HORIZON_MAX as f64,
            });
        }
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "平滑系数越界: {} (允许区间 (0, 1])",
                alpha
            )));
        }

        let mut level: Option<f64> = None;
        for &value in series {
            if !value.is_finite() {
                continue;
            }
            level = Some(match level {
                None => value,
                Some(current) => alpha * value + (1.0 - alpha) * current,
            });
        }

        let level = level.ok_or_else(|| {
            AnalysisError::EmptyInput("预测序列中没有有限数值".to_string())
        })?;

        let forecasts = vec![level; horizon];
        let forecasts_rounded = forecasts.iter().map(|v| v.round() as i64).collect();
        Ok(ForecastResult {
            level,
            forecasts,
            forecasts_rounded,
        })
    }

    /// 评估预测（对齐序列逐期比较）
    ///
    /// # 返回
    /// - `Err(ShapeMismatch)`: 实际序列与预测序列长度不一致
    /// - `Err(EmptyInput)`: 序列为空
    pub fn evaluate(&self, actual: &[f64], forecast: &[f64]) -> AnalysisResult<ForecastMetrics> {
        if actual.len() != forecast.len() {
            return Err(AnalysisError::ShapeMismatch {
                series_len: actual.len(),
                label_len: forecast.len(),
            });
        }
        if actual.is_empty() {
            return Err(AnalysisError::EmptyInput("评估序列为空".to_string()));
        }

        let n = actual.len() as f64;
        let mut abs_sum = 0.0;
        let mut sq_sum = 0.0;
        let mut pct_sum = 0.0;
        for (a, f) in actual.iter().zip(forecast) {
            let err = a - f;
            abs_sum += err.abs();
            sq_sum += err * err;
            pct_sum += (err / (a + f64::EPSILON)).abs();
        }

        let mae = abs_sum / n;
        let mse = sq_sum / n;
        Ok(ForecastMetrics {
            mae,
            mse,
            rmse: mse.sqrt(),
            mape_pct: pct_sum / n * 100.0,
        })
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_series_forecast() {
        let engine = ForecastEngine::new();
        let result = engine.forecast(&[50.0, 50.0, 50.0], 3, 0.3).unwrap();
        assert_eq!(result.level, 50.0);
        assert_eq!(result.forecasts, vec![50.0, 50.0, 50.0]);
        assert_eq!(result.forecasts_rounded, vec![50, 50, 50]);
    }

    #[test]
    fn test_smoothing_moves_toward_recent() {
        let engine = ForecastEngine::new();
        // 水平从 100 向 200 移动, 末期水平应位于两者之间且高于 100
        let result = engine.forecast(&[100.0, 100.0, 200.0, 200.0], 1, 0.5).unwrap();
        assert!(result.level > 100.0 && result.level < 200.0);
    }

    #[test]
    fn test_nan_months_skipped() {
        let engine = ForecastEngine::new();
        let result = engine
            .forecast(&[100.0, f64::NAN, 100.0], 2, 0.3)
            .unwrap();
        assert_eq!(result.level, 100.0);
    }

    #[test]
    fn test_horizon_bounds() {
        let engine = ForecastEngine::new();
        assert!(matches!(
            engine.forecast(&[1.0], 0, 0.3),
            Err(AnalysisError::ThresholdOutOfRange { .. })
        ));
        assert!(matches!(
            engine.forecast(&[1.0], 13, 0.3),
            Err(AnalysisError::ThresholdOutOfRange { .. })
        ));
    }

    #[test]
    fn test_metrics() {
        let engine = ForecastEngine::new();
        let metrics = engine
            .evaluate(&[100.0, 110.0], &[90.0, 120.0])
            .unwrap();
        assert_eq!(metrics.mae, 10.0);
        assert_eq!(metrics.mse, 100.0);
        assert_eq!(metrics.rmse, 10.0);
        assert!(metrics.mape_pct > 0.0);
    }

    #[test]
    fn test_metrics_shape_mismatch() {
        let engine = ForecastEngine::new();
        assert!(matches!(
            engine.evaluate(&[1.0, 2.0], &[1.0]),
            Err(AnalysisError::ShapeMismatch { .. })
        ));
    }
}
