// ==========================================
// 医药销售分析决策支持系统 - 分析配置
// ==========================================
// 职责: 策略旋钮的类型化配置与加载校验
// 规则: 非法取值在加载时拒绝, 不进入引擎
// ==========================================

use crate::engine::drop_detector::{DROP_THRESHOLD_MAX_PCT, DROP_THRESHOLD_MIN_PCT};
use crate::engine::error::{AnalysisError, AnalysisResult};
use crate::engine::forecast::{FORECAST_HORIZON_MAX, FORECAST_HORIZON_MIN};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 效期预警窗口（距效期月数闭区间）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpiryWindow {
    /// 窗口下界（低于该值为不可售）
    #[serde(default = "ExpiryWindow::default_min")]
    pub min_months: i64,
    /// 窗口上界
    #[serde(default = "ExpiryWindow::default_max")]
    pub max_months: i64,
}

impl ExpiryWindow {
    fn default_min() -> i64 {
        3
    }

    fn default_max() -> i64 {
        12
    }
}

impl Default for ExpiryWindow {
    fn default() -> Self {
        Self {
            min_months: Self::default_min(),
            max_months: Self::default_max(),
        }
    }
}

/// 预测参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// 平滑系数（(0, 1]）
    #[serde(default = "ForecastConfig::default_alpha")]
    pub alpha: f64,
    /// 默认预测期数
    #[serde(default = "ForecastConfig::default_horizon")]
    pub horizon: usize,
}

impl ForecastConfig {
    fn default_alpha() -> f64 {
        0.3
    }

    fn default_horizon() -> usize {
        3
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            alpha: Self::default_alpha(),
            horizon: Self::default_horizon(),
        }
    }
}

/// 分析配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// 下滑告警阈值（百分比, [10, 30]）
    #[serde(default = "AnalysisConfig::default_drop_threshold")]
    pub drop_threshold_pct: f64,

    /// 告警类结果默认截断条数
    #[serde(default = "AnalysisConfig::default_alert_top_n")]
    pub alert_top_n: usize,

    /// 排名类结果默认截断条数
    #[serde(default = "AnalysisConfig::default_ranking_top_n")]
    pub ranking_top_n: usize,

    /// 趋势类结果默认序列条数
    #[serde(default = "AnalysisConfig::default_trend_top_n")]
    pub trend_top_n: usize,

    /// 效期预警窗口
    #[serde(default)]
    pub expiry_window: ExpiryWindow,

    /// 预测参数
    #[serde(default)]
    pub forecast: ForecastConfig,
}

impl AnalysisConfig {
    fn default_drop_threshold() -> f64 {
        25.0
    }

    fn default_alert_top_n() -> usize {
        20
    }

    fn default_ranking_top_n() -> usize {
        10
    }

    fn default_trend_top_n() -> usize {
        5
    }

    /// 从 JSON 文件加载并校验
    pub fn load_from_path(path: &Path) -> AnalysisResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::InvalidConfig(format!("配置文件读取失败 {}: {}", path.display(), e))
        })?;
        let config: AnalysisConfig = serde_json::from_str(&content)
            .map_err(|e| AnalysisError::InvalidConfig(format!("配置解析失败: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 校验全部旋钮取值
    pub fn validate(&self) -> AnalysisResult<()> {
        if !(DROP_THRESHOLD_MIN_PCT..=DROP_THRESHOLD_MAX_PCT).contains(&self.drop_threshold_pct) {
            return Err(AnalysisError::InvalidConfig(format!(
                "下滑阈值越界: {} (允许区间 [{}, {}])",
                self.drop_threshold_pct, DROP_THRESHOLD_MIN_PCT, DROP_THRESHOLD_MAX_PCT
            )));
        }
        if self.alert_top_n == 0 || self.ranking_top_n == 0 || self.trend_top_n == 0 {
            return Err(AnalysisError::InvalidConfig(
                "截断条数必须为正数".to_string(),
            ));
        }
        if self.expiry_window.min_months > self.expiry_window.max_months {
            return Err(AnalysisError::InvalidConfig(format!(
                "效期预警窗口无效: [{}, {}]",
                self.expiry_window.min_months, self.expiry_window.max_months
            )));
        }
        if !(self.forecast.alpha > 0.0 && self.forecast.alpha <= 1.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "平滑系数越界: {} (允许区间 (0, 1])",
                self.forecast.alpha
            )));
        }
        if !(FORECAST_HORIZON_MIN..=FORECAST_HORIZON_MAX).contains(&self.forecast.horizon) {
            return Err(AnalysisError::InvalidConfig(format!(
                "预测期数越界: {} (允许区间 [{}, {}])",
                self.forecast.horizon, FORECAST_HORIZON_MIN, FORECAST_HORIZON_MAX
            )));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            drop_threshold_pct: Self::default_drop_threshold(),
            alert_top_n: Self::default_alert_top_n(),
            ranking_top_n: Self::default_ranking_top_n(),
            trend_top_n: Self::default_trend_top_n(),
            expiry_window: ExpiryWindow::default(),
            forecast: ForecastConfig::default(),
        }
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_threshold_rejected() {
        let mut config = AnalysisConfig::default();
        config.drop_threshold_pct = 5.0;
        assert!(config.validate().is_err());
        config.drop_threshold_pct = 35.0;
        assert!(config.validate().is_err());
        config.drop_threshold_pct = 10.0;
        assert!(config.validate().is_ok());
        config.drop_threshold_pct = 30.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"drop_threshold_pct": 20.0}"#).unwrap();
        assert_eq!(config.drop_threshold_pct, 20.0);
        assert_eq!(config.alert_top_n, 20);
        assert_eq!(config.expiry_window.min_months, 3);
        assert_eq!(config.forecast.horizon, 3);
    }

    #[test]
    fn test_invalid_window_rejected() {
        let mut config = AnalysisConfig::default();
        config.expiry_window.min_months = 13;
        assert!(config.validate().is_err());
    }
}
