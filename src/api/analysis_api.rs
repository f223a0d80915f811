// ==========================================
// 医药销售分析决策支持系统 - 分析接口层
// ==========================================
// 职责: 面向编排壳层的纯函数门面, 组合引擎并统一日志
// 规则: 门面不持有数据集状态, 每次调用是输入表的纯函数;
//       筛选参数显式传入, 选择状态由调用方自行持有
// ==========================================

use crate::config::AnalysisConfig;
use crate::domain::alert::{DropAlert, ReturnAlert, SalesDipAlert};
use crate::domain::customer::{InvoiceRecord, NpsResponse, NpsRow, RfmRow, SegmentSummary};
use crate::domain::pvm::{PvmInputRow, PvmTable, WaterfallStep};
use crate::domain::sales::SalesDataset;
use crate::domain::stock::{ExpiryRow, StockBatch};
use crate::domain::types::ReportingMonth;
use crate::engine::{
    DropDetector, ExpiryEngine, ForecastEngine, ForecastMetrics, ForecastResult, GeographyEngine,
    MonthlySeries, NpsEngine, PerformanceEngine, PvmEngine, ReturnsEngine, RfmEngine,
    SalesDipEngine, TrendEngine, WaterfallEngine,
};
use crate::engine::performance::{EntityMonthly, EntityTotal, MonthSliceRow};
use crate::engine::geography::TownTotal;
use crate::importer::column_map::PvmColumnMap;
use crate::importer::file_parser::RawTable;
use crate::importer::table_importer::PvmImporter;
use crate::api::error::ApiResult;
use chrono::NaiveDate;

// ==========================================
// AnalysisApi - 分析门面
// ==========================================
pub struct AnalysisApi {
    config: AnalysisConfig,
}

impl AnalysisApi {
    /// 创建分析门面（加载时校验配置）
    pub fn new(config: AnalysisConfig) -> ApiResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// 使用默认配置创建
    pub fn with_defaults() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }

    /// 当前配置
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    // ==========================================
    // PVM 分析
    // ==========================================

    /// 从原始字符串表直接做 PVM 分解（列映射由调用方提供）
    ///
    /// # 返回
    /// - `Err(DataError)`: 映射指向的必需列不在表头中
    pub fn compute_pvm_from_table(
        &self,
        table: &RawTable,
        map: &PvmColumnMap,
    ) -> ApiResult<PvmTable> {
        let rows = PvmImporter::new().import(table, map)?;
        Ok(PvmEngine::new().compute(&rows)?)
    }

    /// 按产品族口径的 PVM 分解
    ///
    /// # 参数
    /// - `family_filter`: None 表示全部产品族
    pub fn compute_pvm_by_family(
        &self,
        rows: &[PvmInputRow],
        family_filter: Option<&str>,
    ) -> ApiResult<PvmTable> {
        let filtered = Self::filter_rows(rows, |r| {
            family_filter.map_or(true, |f| r.product_family == f)
        });
        tracing::info!(
            rows = filtered.len(),
            family = family_filter.unwrap_or("All"),
            "PVM 产品族分析"
        );
        Ok(PvmEngine::new().compute(&filtered)?)
    }

    /// 按单产品口径的 PVM 分解
    pub fn compute_pvm_by_product(
        &self,
        rows: &[PvmInputRow],
        product_filter: Option<&str>,
    ) -> ApiResult<PvmTable> {
        let filtered = Self::filter_rows(rows, |r| {
            product_filter.map_or(true, |p| r.product == p)
        });
        tracing::info!(
            rows = filtered.len(),
            product = product_filter.unwrap_or("All"),
            "PVM 单产品分析"
        );
        Ok(PvmEngine::new().compute(&filtered)?)
    }

    /// 由 PVM 结果表推导瀑布序列（含对账）
    pub fn build_waterfall(&self, table: &PvmTable) -> ApiResult<Vec<WaterfallStep>> {
        Ok(WaterfallEngine::new().build(table)?)
    }

    // ==========================================
    // 下滑侦测
    // ==========================================

    /// 侦测单实体序列（返回达标月份标签）
    pub fn detect_drops(
        &self,
        series: &[f64],
        month_labels: &[String],
        threshold_pct: f64,
    ) -> ApiResult<Option<Vec<String>>> {
        Ok(DropDetector::new().detect(series, month_labels, threshold_pct)?)
    }

    /// 按产品与城镇筛选后扫描下滑告警
    ///
    /// # 参数
    /// - `threshold_pct`: None 时使用配置默认阈值
    pub fn scan_drops(
        &self,
        dataset: &SalesDataset,
        product_filter: Option<&str>,
        town_filter: Option<&str>,
        threshold_pct: Option<f64>,
    ) -> ApiResult<Vec<DropAlert>> {
        let threshold = threshold_pct.unwrap_or(self.config.drop_threshold_pct);
        let mut filtered = dataset.clone();
        if let Some(product) = product_filter {
            filtered = filtered.filter_product(product);
        }
        if let Some(town) = town_filter {
            filtered = filtered.filter_town(town);
        }
        Ok(DropDetector::new().scan(&filtered, threshold)?)
    }

    // ==========================================
    // 趋势与地域
    // ==========================================

    /// 全量按月合计
    pub fn trend_monthly_totals(&self, dataset: &SalesDataset) -> MonthlySeries {
        TrendEngine::new().monthly_totals(dataset)
    }

    /// 单产品月度序列
    pub fn trend_for_product(&self, dataset: &SalesDataset, product: &str) -> MonthlySeries {
        TrendEngine::new().product_series(dataset, product)
    }

    /// 销量前 N 产品趋势（N 为 None 时取配置默认）
    pub fn trend_top_products(
        &self,
        dataset: &SalesDataset,
        top_n: Option<usize>,
    ) -> Vec<MonthlySeries> {
        TrendEngine::new().top_products(dataset, top_n.unwrap_or(self.config.trend_top_n))
    }

    /// 城镇销量合计
    pub fn town_totals(&self, dataset: &SalesDataset, towns: &[String]) -> Vec<TownTotal> {
        GeographyEngine::new().town_totals(dataset, towns)
    }

    /// 单产品在城镇选择内的分布
    pub fn product_distribution(
        &self,
        dataset: &SalesDataset,
        product: &str,
        towns: &[String],
    ) -> Vec<TownTotal> {
        GeographyEngine::new().product_distribution(dataset, product, towns)
    }

    // ==========================================
    // 业绩排名
    // ==========================================

    /// 药房排名
    pub fn pharmacy_ranking(
        &self,
        dataset: &SalesDataset,
        product_filter: Option<&str>,
        top_n: Option<usize>,
    ) -> Vec<EntityTotal> {
        PerformanceEngine::new().pharmacy_ranking(
            dataset,
            product_filter,
            top_n.unwrap_or(self.config.ranking_top_n),
        )
    }

    /// 产品排名
    pub fn product_ranking(
        &self,
        dataset: &SalesDataset,
        top_n: Option<usize>,
    ) -> Vec<EntityTotal> {
        PerformanceEngine::new().product_ranking(dataset, top_n.unwrap_or(self.config.ranking_top_n))
    }

    /// 前 N 药房月度趋势表
    pub fn pharmacy_monthly_trends(
        &self,
        dataset: &SalesDataset,
        top_n: Option<usize>,
    ) -> Vec<EntityMonthly> {
        PerformanceEngine::new()
            .pharmacy_monthly_trends(dataset, top_n.unwrap_or(self.config.ranking_top_n))
    }

    /// 单月切片前 N 行
    pub fn top_for_month(
        &self,
        dataset: &SalesDataset,
        month_label: &str,
        top_n: Option<usize>,
    ) -> ApiResult<Vec<MonthSliceRow>> {
        Ok(PerformanceEngine::new().top_for_month(
            dataset,
            month_label,
            top_n.unwrap_or(self.config.ranking_top_n),
        )?)
    }

    /// 全月覆盖药房
    pub fn full_coverage_pharmacies(
        &self,
        dataset: &SalesDataset,
        top_n: Option<usize>,
    ) -> Vec<EntityMonthly> {
        PerformanceEngine::new()
            .full_coverage_pharmacies(dataset, top_n.unwrap_or(self.config.ranking_top_n))
    }

    // ==========================================
    // 告警扫描
    // ==========================================

    /// 退货告警
    pub fn return_alerts(
        &self,
        dataset: &SalesDataset,
        reporting_month: ReportingMonth,
        top_n: Option<usize>,
    ) -> ApiResult<Vec<ReturnAlert>> {
        Ok(ReturnsEngine::new().scan(
            dataset,
            reporting_month,
            top_n.unwrap_or(self.config.alert_top_n),
        )?)
    }

    /// 销量低于均值告警
    pub fn sales_dip_alerts(
        &self,
        dataset: &SalesDataset,
        reporting_month: ReportingMonth,
        top_n: Option<usize>,
    ) -> ApiResult<Vec<SalesDipAlert>> {
        Ok(SalesDipEngine::new().scan(
            dataset,
            reporting_month,
            top_n.unwrap_or(self.config.alert_top_n),
        )?)
    }

    /// 效期报告（全部批次的派生行）
    pub fn expiry_report(
        &self,
        batches: &[StockBatch],
        reference_date: NaiveDate,
    ) -> Vec<ExpiryRow> {
        ExpiryEngine::new().evaluate(batches, reference_date, &self.config.expiry_window)
    }

    // ==========================================
    // 客户视角
    // ==========================================

    /// RFM 行
    pub fn rfm_rows(&self, invoices: &[InvoiceRecord]) -> ApiResult<Vec<RfmRow>> {
        Ok(RfmEngine::new().compute(invoices)?)
    }

    /// RFM 分层汇总
    pub fn rfm_segments(&self, rows: &[RfmRow]) -> Vec<SegmentSummary> {
        RfmEngine::new().segment_summary(rows)
    }

    /// 按期间 NPS
    pub fn nps(&self, responses: &[NpsResponse]) -> ApiResult<Vec<NpsRow>> {
        Ok(NpsEngine::new().compute(responses)?)
    }

    // ==========================================
    // 预测
    // ==========================================

    /// 单产品销量预测（期数为 None 时取配置默认）
    pub fn forecast_product(
        &self,
        dataset: &SalesDataset,
        product: &str,
        horizon: Option<usize>,
    ) -> ApiResult<ForecastResult> {
        let series = TrendEngine::new().product_series(dataset, product);
        Ok(ForecastEngine::new().forecast(
            &series.values,
            horizon.unwrap_or(self.config.forecast.horizon),
            self.config.forecast.alpha,
        )?)
    }

    /// 预测评估
    pub fn evaluate_forecast(
        &self,
        actual: &[f64],
        forecast: &[f64],
    ) -> ApiResult<ForecastMetrics> {
        Ok(ForecastEngine::new().evaluate(actual, forecast)?)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 行筛选（保持输入不变）
    fn filter_rows<F>(rows: &[PvmInputRow], keep: F) -> Vec<PvmInputRow>
    where
        F: Fn(&PvmInputRow) -> bool,
    {
        rows.iter().filter(|r| keep(r)).cloned().collect()
    }
}
