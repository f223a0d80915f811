// ==========================================
// 医药销售分析决策支持系统 - 结果表 CSV 导出
// ==========================================
// 职责: 把派生结果表渲染为 CSV 字符串（下载动作由壳层负责）
// 规则: PVM 表导出一律走展示投影（两位小数）; 缺失值导出为空串
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::alert::{DropAlert, ReturnAlert, SalesDipAlert};
use crate::domain::customer::{NpsRow, RfmRow, SegmentSummary};
use crate::domain::pvm::{PvmTable, WaterfallStep};
use crate::domain::stock::ExpiryRow;
use crate::domain::value::CellValue;
use crate::engine::performance::{EntityMonthly, EntityTotal};
use crate::engine::trend::MonthlySeries;

/// 单元格导出格式（两位小数, 缺失导出为空串）
fn cell(value: CellValue) -> String {
    match value {
        CellValue::Finite(v) => format!("{:.2}", v),
        CellValue::Missing => String::new(),
    }
}

/// f64 导出格式
fn num(value: f64) -> String {
    format!("{:.2}", value)
}

/// 把写好的 Writer 收尾为字符串
fn finish(writer: csv::Writer<Vec<u8>>) -> ApiResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::InternalError(format!("CSV 写出失败: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| ApiError::InternalError(format!("CSV 编码失败: {}", e)))
}

/// 写一行（统一错误转换）
fn write_row(writer: &mut csv::Writer<Vec<u8>>, fields: &[String]) -> ApiResult<()> {
    writer
        .write_record(fields)
        .map_err(|e| ApiError::InternalError(format!("CSV 写出失败: {}", e)))
}

/// PVM 结果表导出（展示投影 + 合计行）
pub fn pvm_table_to_csv(table: &PvmTable) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    write_row(
        &mut writer,
        &[
            "Product".to_string(),
            "Product_Family".to_string(),
            "Budget_Price".to_string(),
            "Actual_Price".to_string(),
            "Budget_Volume".to_string(),
            "Actual_Volume".to_string(),
            "PriceImpact".to_string(),
            "VolumeImpact".to_string(),
            "MixImpact".to_string(),
            "TotalImpact".to_string(),
        ],
    )?;

    for row in table.display_rows() {
        write_row(
            &mut writer,
            &[
                row.product.clone(),
                row.product_family.clone(),
                cell(row.budget_price),
                cell(row.actual_price),
                cell(row.budget_volume),
                cell(row.actual_volume),
                cell(row.price_impact),
                cell(row.volume_impact),
                cell(row.mix_impact),
                cell(row.total_impact),
            ],
        )?;
    }

    let total = table.display_total();
    write_row(
        &mut writer,
        &[
            total.label.clone(),
            String::new(),
            String::new(),
            String::new(),
            cell(total.budget_volume),
            cell(total.actual_volume),
            String::new(),
            String::new(),
            String::new(),
            cell(total.total_impact),
        ],
    )?;

    finish(writer)
}

/// 瀑布序列导出
pub fn waterfall_to_csv(steps: &[WaterfallStep]) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    write_row(
        &mut writer,
        &[
            "Category".to_string(),
            "Value".to_string(),
            "Baseline".to_string(),
            "Kind".to_string(),
            "Sign".to_string(),
        ],
    )?;
    for step in steps {
        write_row(
            &mut writer,
            &[
                step.label.clone(),
                num(step.value),
                num(step.baseline),
                step.kind.to_string(),
                step.sign.to_string(),
            ],
        )?;
    }
    finish(writer)
}

/// 下滑告警导出
pub fn drop_alerts_to_csv(alerts: &[DropAlert]) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    write_row(
        &mut writer,
        &[
            "Pharmacy".to_string(),
            "Product".to_string(),
            "Town".to_string(),
            "Threshold(%)".to_string(),
            "Drop Months".to_string(),
        ],
    )?;
    for alert in alerts {
        write_row(
            &mut writer,
            &[
                alert.pharmacy_name.clone(),
                alert.product_name.clone(),
                alert.town.clone(),
                num(alert.threshold_pct),
                alert.drop_months_joined(),
            ],
        )?;
    }
    finish(writer)
}

/// 退货告警导出
pub fn return_alerts_to_csv(alerts: &[ReturnAlert]) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    write_row(
        &mut writer,
        &[
            "Pharmacy".to_string(),
            "Product".to_string(),
            "Month".to_string(),
            "Returns".to_string(),
        ],
    )?;
    for alert in alerts {
        write_row(
            &mut writer,
            &[
                alert.pharmacy_name.clone(),
                alert.product_name.clone(),
                alert.month_label.clone(),
                num(alert.returned_units),
            ],
        )?;
    }
    finish(writer)
}

/// 销量低于均值告警导出
pub fn dip_alerts_to_csv(alerts: &[SalesDipAlert]) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    write_row(
        &mut writer,
        &[
            "Pharmacy".to_string(),
            "Product".to_string(),
            "Month".to_string(),
            "Average".to_string(),
            "Sales Dip".to_string(),
        ],
    )?;
    for alert in alerts {
        write_row(
            &mut writer,
            &[
                alert.pharmacy_name.clone(),
                alert.product_name.clone(),
                alert.month_label.clone(),
                num(alert.average_units),
                alert.dip_units.to_string(),
            ],
        )?;
    }
    finish(writer)
}

/// 效期报告导出
pub fn expiry_rows_to_csv(rows: &[ExpiryRow]) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    write_row(
        &mut writer,
        &[
            "Product".to_string(),
            "Batch_Number".to_string(),
            "Stocks".to_string(),
            "Months to Expiry".to_string(),
            "Status".to_string(),
        ],
    )?;
    for row in rows {
        write_row(
            &mut writer,
            &[
                row.batch.product.clone(),
                row.batch.batch_number.clone(),
                num(row.batch.stocks),
                row.months_to_expiry.to_string(),
                row.status.to_string(),
            ],
        )?;
    }
    finish(writer)
}

/// RFM 行导出
pub fn rfm_rows_to_csv(rows: &[RfmRow]) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    write_row(
        &mut writer,
        &[
            "Name".to_string(),
            "Recency".to_string(),
            "Frequency".to_string(),
            "MonetaryValue".to_string(),
            "RFM_SCORE".to_string(),
            "Segment".to_string(),
        ],
    )?;
    for row in rows {
        write_row(
            &mut writer,
            &[
                row.customer_name.clone(),
                row.recency_days.to_string(),
                row.frequency.to_string(),
                num(row.monetary_value),
                row.rfm_score.to_string(),
                row.segment.to_string(),
            ],
        )?;
    }
    finish(writer)
}

/// 分层汇总导出
pub fn segment_summary_to_csv(rows: &[SegmentSummary]) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    write_row(
        &mut writer,
        &[
            "Segment".to_string(),
            "Average Recency".to_string(),
            "Average Frequency".to_string(),
            "Average Monetary Value".to_string(),
            "Customer Count".to_string(),
            "% Customer Count".to_string(),
        ],
    )?;
    for row in rows {
        write_row(
            &mut writer,
            &[
                row.segment.to_string(),
                num(row.avg_recency_days),
                num(row.avg_frequency),
                num(row.avg_monetary_value),
                row.customer_count.to_string(),
                num(row.customer_share_pct),
            ],
        )?;
    }
    finish(writer)
}

/// NPS 结果导出
pub fn nps_to_csv(rows: &[NpsRow]) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    write_row(
        &mut writer,
        &[
            "Period".to_string(),
            "Promoters".to_string(),
            "Detractors".to_string(),
            "Responses".to_string(),
            "NPS".to_string(),
        ],
    )?;
    for row in rows {
        write_row(
            &mut writer,
            &[
                row.period.clone(),
                row.promoters.to_string(),
                row.detractors.to_string(),
                row.responses.to_string(),
                num(row.nps),
            ],
        )?;
    }
    finish(writer)
}

/// 月度序列导出（月份为行）
pub fn monthly_series_to_csv(series: &MonthlySeries) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    write_row(&mut writer, &["Month".to_string(), series.label.clone()])?;
    for (label, value) in series.month_labels.iter().zip(&series.values) {
        write_row(&mut writer, &[label.clone(), num(*value)])?;
    }
    finish(writer)
}

/// 实体合计排名导出
pub fn entity_totals_to_csv(rows: &[EntityTotal], entity_header: &str) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    write_row(
        &mut writer,
        &[entity_header.to_string(), "Total Units".to_string()],
    )?;
    for row in rows {
        write_row(&mut writer, &[row.name.clone(), num(row.total_units)])?;
    }
    finish(writer)
}

/// 实体月度表导出（含合计列）
pub fn entity_monthly_to_csv(
    rows: &[EntityMonthly],
    entity_header: &str,
    month_labels: &[String],
) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    let mut header = vec![entity_header.to_string()];
    header.extend(month_labels.iter().cloned());
    header.push("Total Sales".to_string());
    write_row(&mut writer, &header)?;

    for row in rows {
        let mut fields = vec![row.name.clone()];
        fields.extend(row.monthly_units.iter().map(|v| num(*v)));
        fields.push(num(row.total_units));
        write_row(&mut writer, &fields)?;
    }
    finish(writer)
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pvm::PvmInputRow;
    use crate::engine::PvmEngine;

    #[test]
    fn test_pvm_export_rounded_with_total_row() {
        let rows = vec![PvmInputRow {
            product: "Amoxil 500".to_string(),
            product_family: "Antibiotics".to_string(),
            budget_price: CellValue::Finite(10.111),
            actual_price: CellValue::Finite(12.222),
            budget_volume: CellValue::Finite(3.0),
            actual_volume: CellValue::Finite(4.0),
        }];
        let table = PvmEngine::new().compute(&rows).unwrap();
        let csv_text = pvm_table_to_csv(&table).unwrap();

        let mut lines = csv_text.lines();
        assert!(lines.next().unwrap().starts_with("Product,"));
        let data_line = lines.next().unwrap();
        assert!(data_line.contains("6.33")); // PriceImpact 展示投影
        let total_line = lines.next().unwrap();
        assert!(total_line.starts_with("Total,"));
    }

    #[test]
    fn test_missing_exported_as_empty() {
        let rows = vec![PvmInputRow {
            product: "P".to_string(),
            product_family: "F".to_string(),
            budget_price: CellValue::Missing,
            actual_price: CellValue::Finite(1.0),
            budget_volume: CellValue::Finite(1.0),
            actual_volume: CellValue::Finite(1.0),
        }];
        let table = PvmEngine::new().compute(&rows).unwrap();
        let csv_text = pvm_table_to_csv(&table).unwrap();
        let data_line = csv_text.lines().nth(1).unwrap();
        // 预算单价与四个派生字段导出为空串
        assert!(data_line.starts_with("P,F,,1.00,1.00,1.00,,,,"));
    }

    #[test]
    fn test_drop_alerts_export() {
        let alerts = vec![DropAlert {
            pharmacy_name: "药房A".to_string(),
            product_name: "Amoxil 500".to_string(),
            town: "Harare".to_string(),
            threshold_pct: 25.0,
            drop_months: vec!["Jan-24".to_string(), "Mar-24".to_string()],
        }];
        let csv_text = drop_alerts_to_csv(&alerts).unwrap();
        assert!(csv_text.contains("\"Jan-24, Mar-24\""));
    }
}
