// ==========================================
// 医药销售分析决策支持系统 - 语义列映射
// ==========================================
// 职责: 由调用方提供"语义字段 → 表头列名"的映射
// 规则: 具体表头列名是调用方配置, 不属于核心契约
// ==========================================

use serde::{Deserialize, Serialize};

/// 销售宽表列映射
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesColumnMap {
    pub customer_code: String,
    pub pharmacy_name: String,
    pub town: String,
    pub product_code: String,
    pub product_name: String,
    /// 月份列清单（按时间升序）; None 表示取标识列之外的全部表头列
    #[serde(default)]
    pub month_columns: Option<Vec<String>>,
}

impl Default for SalesColumnMap {
    fn default() -> Self {
        Self {
            customer_code: "C-CODE".to_string(),
            pharmacy_name: "NAME".to_string(),
            town: "TOWN".to_string(),
            product_code: "P-CODE".to_string(),
            product_name: "DISCRIPTION".to_string(),
            month_columns: None,
        }
    }
}

impl SalesColumnMap {
    /// 标识列清单
    pub fn id_columns(&self) -> [&str; 5] {
        [
            self.customer_code.as_str(),
            self.pharmacy_name.as_str(),
            self.town.as_str(),
            self.product_code.as_str(),
            self.product_name.as_str(),
        ]
    }
}

/// PVM 输入表列映射
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PvmColumnMap {
    pub product: String,
    pub product_family: String,
    pub budget_price: String,
    pub actual_price: String,
    pub budget_volume: String,
    pub actual_volume: String,
}

impl Default for PvmColumnMap {
    fn default() -> Self {
        Self {
            product: "Product".to_string(),
            product_family: "Product_Family".to_string(),
            budget_price: "Budget_Price".to_string(),
            actual_price: "Actual_Price".to_string(),
            budget_volume: "Budget_Volume".to_string(),
            actual_volume: "Actual_Volume".to_string(),
        }
    }
}

impl PvmColumnMap {
    /// 全部必需列
    pub fn required_columns(&self) -> [&str; 6] {
        [
            self.product.as_str(),
            self.product_family.as_str(),
            self.budget_price.as_str(),
            self.actual_price.as_str(),
            self.budget_volume.as_str(),
            self.actual_volume.as_str(),
        ]
    }
}

/// 库存批次表列映射
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockColumnMap {
    pub product: String,
    pub batch_number: String,
    pub stocks: String,
    pub expiry_date: String,
}

impl Default for StockColumnMap {
    fn default() -> Self {
        Self {
            product: "Product".to_string(),
            batch_number: "Batch_Number".to_string(),
            stocks: "Stocks".to_string(),
            expiry_date: "Expiry_Date".to_string(),
        }
    }
}

/// 发票表列映射（RFM 输入）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceColumnMap {
    pub customer_name: String,
    pub invoice_date: String,
    pub units_sold: String,
}

impl Default for InvoiceColumnMap {
    fn default() -> Self {
        Self {
            customer_name: "Name".to_string(),
            invoice_date: "Invoice Date".to_string(),
            units_sold: "Units Sold".to_string(),
        }
    }
}

/// NPS 问卷表列映射
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpsColumnMap {
    pub period: String,
    pub score: String,
}

impl Default for NpsColumnMap {
    fn default() -> Self {
        Self {
            period: "Period".to_string(),
            score: "Score".to_string(),
        }
    }
}
