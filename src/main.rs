// ==========================================
// 医药销售分析决策支持系统 - CLI 入口
// ==========================================
// 用法: pharma-sales-dss <sales.csv> [--pvm <pvm.csv>] [--threshold <pct>]
// 职责: 薄壳, 只做导入、调用分析门面、打印摘要; 全部计算走纯函数 API
// ==========================================

use anyhow::{bail, Context, Result};
use pharma_sales_dss::api::export;
use pharma_sales_dss::domain::types::ReportingMonth;
use pharma_sales_dss::importer::{
    parse_table_file, PvmColumnMap, PvmImporter, SalesColumnMap, SalesImporter,
};
use pharma_sales_dss::{logging, AnalysisApi, AnalysisConfig, APP_NAME, VERSION};
use std::path::PathBuf;

/// 命令行参数
struct CliArgs {
    sales_path: PathBuf,
    pvm_path: Option<PathBuf>,
    threshold_pct: Option<f64>,
}

fn parse_args() -> Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let sales_path = match args.next() {
        Some(p) => PathBuf::from(p),
        None => bail!("用法: pharma-sales-dss <sales.csv> [--pvm <pvm.csv>] [--threshold <pct>]"),
    };

    let mut pvm_path = None;
    let mut threshold_pct = None;
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--pvm" => {
                let value = args.next().context("--pvm 需要文件路径")?;
                pvm_path = Some(PathBuf::from(value));
            }
            "--threshold" => {
                let value = args.next().context("--threshold 需要百分比数值")?;
                threshold_pct = Some(value.parse::<f64>().context("--threshold 解析失败")?);
            }
            other => bail!("未知参数: {}", other),
        }
    }

    Ok(CliArgs {
        sales_path,
        pvm_path,
        threshold_pct,
    })
}

fn main() -> Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", APP_NAME);
    tracing::info!("系统版本: {}", VERSION);
    tracing::info!("==================================================");

    let args = parse_args()?;
    let api = AnalysisApi::new(AnalysisConfig::default())?;

    // 导入销售宽表
    let raw = parse_table_file(&args.sales_path)
        .with_context(|| format!("销售数据导入失败: {}", args.sales_path.display()))?;
    let dataset = SalesImporter::new().import(&raw, &SalesColumnMap::default())?;
    tracing::info!(
        rows = dataset.len(),
        months = dataset.month_count(),
        coercion_warnings = dataset.coercion_warnings,
        "销售数据就绪"
    );

    // 按月合计
    let totals = api.trend_monthly_totals(&dataset);
    println!("== 按月合计 ==");
    for (label, value) in totals.month_labels.iter().zip(&totals.values) {
        println!("{:>8}  {:>12.0}", label, value);
    }

    // 产品排名
    println!("\n== 产品销量排名 ==");
    for entry in api.product_ranking(&dataset, None) {
        println!("{:>12.0}  {}", entry.total_units, entry.name);
    }

    // 退货告警（最后一个月）
    println!("\n== 退货告警（最后一个月）==");
    let returns = api.return_alerts(&dataset, ReportingMonth::Last, None)?;
    if returns.is_empty() {
        println!("无退货");
    }
    for alert in &returns {
        println!("{}", alert.narrative());
    }

    // 销量低于均值告警（最后一个月）
    println!("\n== 销量低于均值告警（最后一个月）==");
    for alert in api.sales_dip_alerts(&dataset, ReportingMonth::Last, None)? {
        println!("{}", alert.narrative());
    }

    // 连续下滑告警
    let threshold = args.threshold_pct;
    println!("\n== 销量下滑告警 ==");
    let drops = api.scan_drops(&dataset, None, None, threshold)?;
    if drops.is_empty() {
        println!("无下滑告警");
    }
    for alert in &drops {
        println!("{}", alert.narrative());
    }

    // PVM 分析（可选）
    if let Some(pvm_path) = &args.pvm_path {
        let raw = parse_table_file(pvm_path)
            .with_context(|| format!("PVM 数据导入失败: {}", pvm_path.display()))?;
        let rows = PvmImporter::new().import(&raw, &PvmColumnMap::default())?;
        let table = api.compute_pvm_by_family(&rows, None)?;
        let steps = api.build_waterfall(&table)?;

        println!("\n== PVM 分析 ==");
        print!("{}", export::pvm_table_to_csv(&table)?);
        println!("\n== 瀑布序列 ==");
        print!("{}", export::waterfall_to_csv(&steps)?);
    }

    Ok(())
}
