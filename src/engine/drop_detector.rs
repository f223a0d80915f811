// ==========================================
// 医药销售分析决策支持系统 - 销量下滑侦测引擎
// ==========================================
// 职责: 扫描单实体月度销量序列, 两个及以上月份环比跌幅达标即告警
// 输入: 月度销量序列 + 月份标签 + 阈值百分比
// 输出: 达标月份标签列表 / DropAlert
// ==========================================
// 规则: 达标月份按总数计数, 不要求月份相邻
// 规则: 上月销量为 0 时环比无定义, 按缺失处理, 永不达标
// ==========================================

use crate::domain::alert::DropAlert;
use crate::domain::sales::SalesDataset;
use crate::engine::error::{AnalysisError, AnalysisResult};

/// 阈值允许区间下界（百分比）
pub const DROP_THRESHOLD_MIN_PCT: f64 = 10.0;
/// 阈值允许区间上界（百分比）
pub const DROP_THRESHOLD_MAX_PCT: f64 = 30.0;

/// 触发告警所需的最少达标月份数
pub const MIN_QUALIFYING_MONTHS: usize = 2;

// ==========================================
// DropDetector - 销量下滑侦测引擎
// ==========================================
pub struct DropDetector;

impl DropDetector {
    /// 创建新的下滑侦测引擎
    pub fn new() -> Self {
        Self
    }

    /// 校验阈值范围（闭区间 [10, 30]）
    pub fn validate_threshold(threshold_pct: f64) -> AnalysisResult<()> {
        if !(DROP_THRESHOLD_MIN_PCT..=DROP_THRESHOLD_MAX_PCT).contains(&threshold_pct) {
            return Err(AnalysisError::ThresholdOutOfRange {
                value: threshold_pct,
                min: DROP_THRESHOLD_MIN_PCT,
                max: DROP_THRESHOLD_MAX_PCT,
            });
        }
        Ok(())
    }

    /// 环比变化序列
    ///
    /// - `pct[0] = 0`（无上月）
    /// - `pct[i] = (s[i] − s[i−1]) / s[i−1]`
    /// - 上月为 0 或任一侧缺失 ⇒ NaN
    pub fn pct_changes(series: &[f64]) -> Vec<f64> {
        let mut changes = Vec::with_capacity(series.len());
        for (i, &current) in series.iter().enumerate() {
            if i == 0 {
                changes.push(0.0);
                continue;
            }
            let previous = series[i - 1];
            if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
                changes.push(f64::NAN);
            } else {
                changes.push((current - previous) / previous);
            }
        }
        changes
    }

    /// 侦测单实体序列
    ///
    /// # 参数
    /// - `series`: 月度销量序列（与标签等长）
    /// - `month_labels`: 月份标签
    /// - `threshold_pct`: 跌幅阈值百分比（25 表示 -25%）
    ///
    /// # 返回
    /// - `Ok(Some(labels))`: 达标月份数 >= 2, 返回达标月份标签
    /// - `Ok(None)`: 未触发
    /// - `Err(ThresholdOutOfRange)` / `Err(ShapeMismatch)`: 调用方参数错误
    pub fn detect(
        &self,
        series: &[f64],
        month_labels: &[String],
        threshold_pct: f64,
    ) -> AnalysisResult<Option<Vec<String>>> {
        Self::validate_threshold(threshold_pct)?;
        if series.len() != month_labels.len() {
            return Err(AnalysisError::ShapeMismatch {
                series_len: series.len(),
                label_len: month_labels.len(),
            });
        }
        Ok(self.detect_unchecked(series, month_labels, threshold_pct))
    }

    /// 侦测内核（参数已校验）
    fn detect_unchecked(
        &self,
        series: &[f64],
        month_labels: &[String],
        threshold_pct: f64,
    ) -> Option<Vec<String>> {
        let drop_threshold = -threshold_pct / 100.0;
        let changes = Self::pct_changes(series);

        // NaN 与阈值比较恒为 false, 除零月份天然不达标
        let qualifying: Vec<String> = changes
            .iter()
            .zip(month_labels)
            .filter(|(pct, _)| **pct <= drop_threshold)
            .map(|(_, label)| label.clone())
            .collect();

        if qualifying.len() >= MIN_QUALIFYING_MONTHS {
            Some(qualifying)
        } else {
            None
        }
    }

    /// 扫描整个数据集
    ///
    /// 实体 = 数据行 (药房 × 产品)。扫描顺序按 (药房, 产品) 稳定升序,
    /// 迭代顺序只影响展示顺序, 不影响结果。
    ///
    /// # 返回
    /// 触发告警的实体列表（可为空）
    pub fn scan(
        &self,
        dataset: &SalesDataset,
        threshold_pct: f64,
    ) -> AnalysisResult<Vec<DropAlert>> {
        Self::validate_threshold(threshold_pct)?;

        let mut records: Vec<&crate::domain::sales::SalesRecord> =
            dataset.records.iter().collect();
        records.sort_by(|a, b| {
            (&a.pharmacy_name, &a.product_name).cmp(&(&b.pharmacy_name, &b.product_name))
        });

        let mut alerts = Vec::new();
        for record in records {
            let series = record.monthly_series();
            if series.len() != dataset.month_labels.len() {
                return Err(AnalysisError::ShapeMismatch {
                    series_len: series.len(),
                    label_len: dataset.month_labels.len(),
                });
            }
            if let Some(drop_months) =
                self.detect_unchecked(&series, &dataset.month_labels, threshold_pct)
            {
                alerts.push(DropAlert {
                    pharmacy_name: record.pharmacy_name.clone(),
                    product_name: record.product_name.clone(),
                    town: record.town.clone(),
                    threshold_pct,
                    drop_months,
                });
            }
        }

        tracing::info!(
            entities = dataset.len(),
            alerts = alerts.len(),
            threshold_pct,
            "下滑扫描完成"
        );
        Ok(alerts)
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("M{:02}", i)).collect()
    }

    #[test]
    fn test_two_qualifying_months_flagged() {
        let detector = DropDetector::new();
        // 环比: [0, 0, -0.30, -0.30] ⇒ 两个达标月份
        let series = [100.0, 100.0, 70.0, 49.0];
        let result = detector.detect(&series, &labels(4), 25.0).unwrap();
        assert_eq!(result, Some(vec!["M03".to_string(), "M04".to_string()]));
    }

    #[test]
    fn test_single_drop_not_flagged() {
        let detector = DropDetector::new();
        // 环比: [0, -0.30, +0.14] ⇒ 仅一个达标月份
        let series = [100.0, 70.0, 80.0];
        let result = detector.detect(&series, &labels(3), 25.0).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_non_adjacent_months_counted() {
        let detector = DropDetector::new();
        // 达标月份不相邻, 仍按总数计数
        let series = [100.0, 70.0, 100.0, 60.0];
        let result = detector.detect(&series, &labels(4), 25.0).unwrap();
        assert_eq!(result, Some(vec!["M02".to_string(), "M04".to_string()]));
    }

    #[test]
    fn test_division_by_zero_is_safe() {
        let detector = DropDetector::new();
        let series = [0.0, 50.0];
        let changes = DropDetector::pct_changes(&series);
        assert!(changes[1].is_nan());
        let result = detector.detect(&series, &labels(2), 25.0).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_threshold_bounds() {
        let detector = DropDetector::new();
        let series = [100.0, 70.0];

        assert!(matches!(
            detector.detect(&series, &labels(2), 5.0),
            Err(AnalysisError::ThresholdOutOfRange { .. })
        ));
        assert!(matches!(
            detector.detect(&series, &labels(2), 35.0),
            Err(AnalysisError::ThresholdOutOfRange { .. })
        ));
        // 边界值可接受
        assert!(detector.detect(&series, &labels(2), 10.0).is_ok());
        assert!(detector.detect(&series, &labels(2), 30.0).is_ok());
    }

    #[test]
    fn test_shape_mismatch() {
        let detector = DropDetector::new();
        let series = [100.0, 70.0, 49.0];
        assert!(matches!(
            detector.detect(&series, &labels(2), 25.0),
            Err(AnalysisError::ShapeMismatch { series_len: 3, label_len: 2 })
        ));
    }

    #[test]
    fn test_exact_threshold_qualifies() {
        let detector = DropDetector::new();
        // 恰好 -25% 也达标 (<=)
        let series = [100.0, 75.0, 100.0, 75.0];
        let result = detector.detect(&series, &labels(4), 25.0).unwrap();
        assert_eq!(result, Some(vec!["M02".to_string(), "M04".to_string()]));
    }
}
