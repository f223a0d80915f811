// ==========================================
// 医药销售分析决策支持系统 - 客户分层引擎 (RFM)
// ==========================================
// 职责: 由发票记录派生 RFM 指标并按阈值分层
// 规则: 基准日 = 数据集中最晚开票日 + 1 天
// 规则: 聚类算法属外部协作方, 本引擎只做打分与阈值分层
// ==========================================

use crate::domain::customer::{InvoiceRecord, RfmRow, SegmentSummary};
use crate::domain::types::CustomerSegment;
use crate::engine::error::{AnalysisError, AnalysisResult};
use chrono::Duration;
use std::cmp::Ordering;
use std::collections::BTreeMap;

// ==========================================
// RfmEngine - 客户分层引擎
// ==========================================
pub struct RfmEngine;

impl RfmEngine {
    /// 创建新的客户分层引擎
    pub fn new() -> Self {
        Self
    }

    /// 计算每个客户的 RFM 行
    ///
    /// # 指标口径
    /// - Recency: 最近一次开票距基准日的天数
    /// - Frequency: 开票次数
    /// - Monetary: 销量合计
    /// - RFM 总分 = R + F + M（各取整数部分相加）
    ///
    /// # 返回
    /// 按客户名升序的 RFM 行
    pub fn compute(&self, invoices: &[InvoiceRecord]) -> AnalysisResult<Vec<RfmRow>> {
        if invoices.is_empty() {
            return Err(AnalysisError::EmptyInput("发票记录为空".to_string()));
        }

        // 基准日 = 最晚开票日 + 1 天
        let latest = invoices
            .iter()
            .map(|r| r.invoice_date)
            .max()
            .ok_or_else(|| AnalysisError::EmptyInput("发票记录为空".to_string()))?;
        let reference_date = latest + Duration::days(1);

        // 按客户聚合（BTreeMap 保证输出顺序稳定）
        let mut by_customer: BTreeMap<String, Vec<&InvoiceRecord>> = BTreeMap::new();
        for invoice in invoices {
            by_customer
                .entry(invoice.customer_name.clone())
                .or_default()
                .push(invoice);
        }

        let rows = by_customer
            .into_iter()
            .map(|(customer_name, records)| {
                let last_invoice = records
                    .iter()
                    .map(|r| r.invoice_date)
                    .max()
                    .unwrap_or(latest);
                let recency_days = (reference_date - last_invoice).num_days();
                let frequency = records.len() as i64;
                let monetary_value: f64 = records.iter().map(|r| r.units_sold).sum();
                let rfm_score = recency_days + frequency + monetary_value as i64;

                RfmRow {
                    customer_name,
                    recency_days,
                    frequency,
                    monetary_value,
                    rfm_score,
                    segment: CustomerSegment::from_rfm_score(rfm_score),
                }
            })
            .collect();

        Ok(rows)
    }

    /// 分层汇总表（按客户数降序）
    pub fn segment_summary(&self, rows: &[RfmRow]) -> Vec<SegmentSummary> {
        let mut by_segment: BTreeMap<CustomerSegment, Vec<&RfmRow>> = BTreeMap::new();
        for row in rows {
            by_segment.entry(row.segment).or_default().push(row);
        }

        let total_customers = rows.len();
        let mut summaries: Vec<SegmentSummary> = by_segment
            .into_iter()
            .map(|(segment, members)| {
                let count = members.len();
                let mean = |pick: fn(&RfmRow) -> f64| -> f64 {
                    members.iter().map(|r| pick(r)).sum::<f64>() / count as f64
                };
                SegmentSummary {
                    segment,
                    avg_recency_days: mean(|r| r.recency_days as f64),
                    avg_frequency: mean(|r| r.frequency as f64),
                    avg_monetary_value: mean(|r| r.monetary_value),
                    customer_count: count,
                    customer_share_pct: count as f64 / total_customers as f64 * 100.0,
                }
            })
            .collect();

        summaries.sort_by(|a, b| {
            b.customer_count
                .cmp(&a.customer_count)
                .then_with(|| a.segment.cmp(&b.segment).reverse())
        });
        summaries
    }
}
