// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use pharma_sales_dss::domain::pvm::PvmInputRow;
use pharma_sales_dss::domain::sales::{SalesDataset, SalesRecord};
use pharma_sales_dss::domain::value::CellValue;

// ==========================================
// SalesRecord 构建器
// ==========================================

pub struct SalesRecordBuilder {
    customer_code: String,
    pharmacy_name: String,
    town: String,
    product_code: String,
    product_name: String,
    monthly_units: Vec<CellValue>,
}

impl SalesRecordBuilder {
    pub fn new(pharmacy_name: &str, product_name: &str) -> Self {
        Self {
            customer_code: format!("C-{}", pharmacy_name),
            pharmacy_name: pharmacy_name.to_string(),
            town: "Harare".to_string(),
            product_code: format!("P-{}", product_name),
            product_name: product_name.to_string(),
            monthly_units: Vec::new(),
        }
    }

    pub fn town(mut self, town: &str) -> Self {
        self.town = town.to_string();
        self
    }

    pub fn units(mut self, units: &[f64]) -> Self {
        self.monthly_units = units.iter().map(|u| CellValue::from_f64(*u)).collect();
        self
    }

    pub fn missing_month(mut self, index: usize) -> Self {
        self.monthly_units[index] = CellValue::Missing;
        self
    }

    pub fn build(self) -> SalesRecord {
        SalesRecord {
            customer_code: self.customer_code,
            pharmacy_name: self.pharmacy_name,
            town: self.town,
            product_code: self.product_code,
            product_name: self.product_name,
            monthly_units: self.monthly_units,
        }
    }
}

// ==========================================
// SalesDataset 构建器
// ==========================================

pub struct SalesDatasetBuilder {
    month_labels: Vec<String>,
    records: Vec<SalesRecord>,
}

impl SalesDatasetBuilder {
    pub fn new(month_labels: &[&str]) -> Self {
        Self {
            month_labels: month_labels.iter().map(|l| l.to_string()).collect(),
            records: Vec::new(),
        }
    }

    pub fn record(mut self, record: SalesRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn build(self) -> SalesDataset {
        SalesDataset {
            month_labels: self.month_labels,
            records: self.records,
            coercion_warnings: 0,
        }
    }
}

// ==========================================
// PvmInputRow 构建器
// ==========================================

pub struct PvmRowBuilder {
    product: String,
    product_family: String,
    budget_price: CellValue,
    actual_price: CellValue,
    budget_volume: CellValue,
    actual_volume: CellValue,
}

impl PvmRowBuilder {
    pub fn new(product: &str, family: &str) -> Self {
        Self {
            product: product.to_string(),
            product_family: family.to_string(),
            budget_price: CellValue::Finite(0.0),
            actual_price: CellValue::Finite(0.0),
            budget_volume: CellValue::Finite(0.0),
            actual_volume: CellValue::Finite(0.0),
        }
    }

    pub fn prices(mut self, budget: f64, actual: f64) -> Self {
        self.budget_price = CellValue::Finite(budget);
        self.actual_price = CellValue::Finite(actual);
        self
    }

    pub fn volumes(mut self, budget: f64, actual: f64) -> Self {
        self.budget_volume = CellValue::Finite(budget);
        self.actual_volume = CellValue::Finite(actual);
        self
    }

    pub fn missing_actual_price(mut self) -> Self {
        self.actual_price = CellValue::Missing;
        self
    }

    pub fn build(self) -> PvmInputRow {
        PvmInputRow {
            product: self.product,
            product_family: self.product_family,
            budget_price: self.budget_price,
            actual_price: self.actual_price,
            budget_volume: self.budget_volume,
            actual_volume: self.actual_volume,
        }
    }
}
