// ==========================================
// AnalysisApi 门面集成测试
// ==========================================
// 测试目标: 壳层视角的端到端调用链（筛选 → 引擎 → 导出）
// 覆盖范围: PVM 口径筛选 / 瀑布 / 下滑扫描 / 告警 / 效期 / RFM / NPS / 预测
// ==========================================

mod helpers;

use chrono::NaiveDate;
use helpers::test_data_builder::{PvmRowBuilder, SalesDatasetBuilder, SalesRecordBuilder};
use pharma_sales_dss::api::export;
use pharma_sales_dss::domain::customer::{InvoiceRecord, NpsResponse};
use pharma_sales_dss::domain::stock::StockBatch;
use pharma_sales_dss::domain::types::{CustomerSegment, ExpiryStatus, ReportingMonth};
use pharma_sales_dss::{AnalysisApi, AnalysisConfig, ApiError};

fn sample_dataset() -> pharma_sales_dss::SalesDataset {
    SalesDatasetBuilder::new(&["Aug-23", "Sep-23", "Oct-23", "Nov-23"])
        .record(
            SalesRecordBuilder::new("药房甲", "Amoxil 500")
                .town("Harare")
                .units(&[100.0, 100.0, 70.0, 49.0])
                .build(),
        )
        .record(
            SalesRecordBuilder::new("药房乙", "Amoxil 500")
                .town("Bulawayo")
                .units(&[40.0, 45.0, 50.0, -6.0])
                .build(),
        )
        .record(
            SalesRecordBuilder::new("药房甲", "Paracetamol")
                .town("Harare")
                .units(&[200.0, 210.0, 220.0, 230.0])
                .build(),
        )
        .build()
}

// ==========================================
// 测试用例 1: PVM 口径筛选 + 瀑布 + 导出
// ==========================================

#[test]
fn test_pvm_family_filter_waterfall_export() {
    let api = AnalysisApi::with_defaults();
    let rows = vec![
        PvmRowBuilder::new("Amoxil 500", "Antibiotics")
            .prices(10.0, 12.0)
            .volumes(100.0, 110.0)
            .build(),
        PvmRowBuilder::new("Cipro 250", "Antibiotics")
            .prices(20.0, 19.0)
            .volumes(50.0, 60.0)
            .build(),
        PvmRowBuilder::new("Paracetamol", "Analgesics")
            .prices(1.0, 1.1)
            .volumes(9999.0, 9999.0)
            .build(),
    ];

    // 族口径筛选只改变参与行, 不改变公式
    let table = api
        .compute_pvm_by_family(&rows, Some("Antibiotics"))
        .unwrap();
    assert_eq!(table.rows.len(), 2);

    let steps = api.build_waterfall(&table).unwrap();
    assert_eq!(steps.len(), 5);
    let budget = steps[0].value;
    let actual = steps[4].value;
    assert!((budget - (10.0 * 100.0 + 20.0 * 50.0)).abs() < 1e-9);
    assert!((actual - (12.0 * 110.0 + 19.0 * 60.0)).abs() < 1e-9);

    // 导出走展示投影
    let csv_text = export::pvm_table_to_csv(&table).unwrap();
    assert!(csv_text.lines().count() >= 4); // 表头 + 两行 + 合计行

    // 单产品口径
    let table = api.compute_pvm_by_product(&rows, Some("Paracetamol")).unwrap();
    assert_eq!(table.rows.len(), 1);
}

// ==========================================
// 测试用例 2: 下滑扫描（配置默认阈值与覆盖）
// ==========================================

#[test]
fn test_scan_drops_with_config_threshold() {
    let api = AnalysisApi::with_defaults();
    let dataset = sample_dataset();

    // 默认阈值 25%: 仅 药房甲×Amoxil 触发（-30%, -30%）
    let alerts = api.scan_drops(&dataset, None, None, None).unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].pharmacy_name, "药房甲");
    assert_eq!(alerts[0].product_name, "Amoxil 500");
    assert_eq!(alerts[0].drop_months, vec!["Oct-23", "Nov-23"]);

    // 城镇筛选后无触发实体
    let alerts = api
        .scan_drops(&dataset, None, Some("Bulawayo"), None)
        .unwrap();
    assert!(alerts.is_empty());

    // 越界阈值覆盖 ⇒ InvalidInput
    let result = api.scan_drops(&dataset, None, None, Some(50.0));
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

// ==========================================
// 测试用例 3: 告警扫描（退货与低于均值）
// ==========================================

#[test]
fn test_alert_scans() {
    let api = AnalysisApi::with_defaults();
    let dataset = sample_dataset();

    let returns = api
        .return_alerts(&dataset, ReportingMonth::Last, None)
        .unwrap();
    assert_eq!(returns.len(), 1);
    assert_eq!(returns[0].pharmacy_name, "药房乙");
    assert_eq!(returns[0].returned_units, 6.0);

    let dips = api
        .sales_dip_alerts(&dataset, ReportingMonth::Last, None)
        .unwrap();
    // 药房甲×Amoxil: 均值 79.75, 最后月 49 ⇒ 缺口 31
    // 药房乙×Amoxil: 均值 32.25, 最后月 -6 ⇒ 缺口 38
    assert_eq!(dips.len(), 2);
    assert_eq!(dips[0].pharmacy_name, "药房乙");
    assert_eq!(dips[0].dip_units, 38);
    assert_eq!(dips[1].dip_units, 31);
}

// ==========================================
// 测试用例 4: 效期报告
// ==========================================

#[test]
fn test_expiry_report() {
    let api = AnalysisApi::with_defaults();
    let reference = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let batches = vec![
        StockBatch {
            product: "Amoxil 500".to_string(),
            batch_number: "B01".to_string(),
            stocks: 100.0,
            expiry_date: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
        },
        StockBatch {
            product: "Paracetamol".to_string(),
            batch_number: "B02".to_string(),
            stocks: 300.0,
            expiry_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
        },
        StockBatch {
            product: "Ibuprofen 200".to_string(),
            batch_number: "B03".to_string(),
            stocks: 50.0,
            expiry_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        },
    ];

    let rows = api.expiry_report(&batches, reference);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].status, ExpiryStatus::Unsalable);
    assert_eq!(rows[1].status, ExpiryStatus::AlertWindow);
    assert_eq!(rows[2].status, ExpiryStatus::Salable);

    let csv_text = export::expiry_rows_to_csv(&rows).unwrap();
    assert!(csv_text.contains("UNSALABLE"));
}

// ==========================================
// 测试用例 5: RFM 与 NPS
// ==========================================

#[test]
fn test_rfm_and_nps() {
    let api = AnalysisApi::with_defaults();

    let invoice = |c: &str, ymd: (i32, u32, u32), units: f64| InvoiceRecord {
        customer_name: c.to_string(),
        invoice_date: NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).unwrap(),
        units_sold: units,
    };
    let invoices = vec![
        invoice("客户A", (2024, 1, 20), 480.0),
        invoice("客户A", (2024, 1, 10), 20.0),
        invoice("客户B", (2023, 12, 1), 100.0),
    ];

    let rows = api.rfm_rows(&invoices).unwrap();
    assert_eq!(rows.len(), 2);
    // 客户A: R=1, F=2, M=500 ⇒ 503 ⇒ 高价值
    assert_eq!(rows[0].rfm_score, 503);
    assert_eq!(rows[0].segment, CustomerSegment::HighValue);

    let summary = api.rfm_segments(&rows);
    let total: usize = summary.iter().map(|s| s.customer_count).sum();
    assert_eq!(total, 2);

    let nps_rows = api
        .nps(&[
            NpsResponse { period: "Q1".to_string(), score: 10 },
            NpsResponse { period: "Q1".to_string(), score: 2 },
            NpsResponse { period: "Q1".to_string(), score: 8 },
        ])
        .unwrap();
    assert_eq!(nps_rows.len(), 1);
    assert!((nps_rows[0].nps - 0.0).abs() < 1e-9); // (1-1)/3 × 100
}

// ==========================================
// 测试用例 6: 趋势 + 预测
// ==========================================

#[test]
fn test_trend_and_forecast() {
    let api = AnalysisApi::with_defaults();
    let dataset = sample_dataset();

    let totals = api.trend_monthly_totals(&dataset);
    assert_eq!(totals.values, vec![340.0, 355.0, 340.0, 273.0]);

    let top = api.trend_top_products(&dataset, Some(1));
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].label, "Paracetamol");

    // 平稳序列的预测水平落在观测范围内
    let forecast = api
        .forecast_product(&dataset, "Paracetamol", Some(3))
        .unwrap();
    assert_eq!(forecast.forecasts.len(), 3);
    assert!(forecast.level >= 200.0 && forecast.level <= 230.0);

    let metrics = api
        .evaluate_forecast(&[100.0, 110.0], &[90.0, 120.0])
        .unwrap();
    assert_eq!(metrics.mae, 10.0);
}

// ==========================================
// 测试用例 7: 配置校验在门面入口处拒绝
// ==========================================

#[test]
fn test_invalid_config_rejected_at_construction() {
    let mut config = AnalysisConfig::default();
    config.drop_threshold_pct = 99.0;
    let result = AnalysisApi::new(config);
    assert!(matches!(result, Err(ApiError::ConfigError(_))));
}
