// ==========================================
// 医药销售分析决策支持系统 - 告警对象
// ==========================================
// 职责: 各类扫描引擎的告警输出行
// 红线: 每条告警必须可给出人类可读叙述 (narrative)
// ==========================================

use serde::{Deserialize, Serialize};

/// 连续下滑告警
///
/// 实体 = (药房, 产品)。`drop_months` 为达标月份标签列表，
/// 两个及以上达标月份才会产生本告警。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropAlert {
    /// 药房名称
    pub pharmacy_name: String,
    /// 产品描述
    pub product_name: String,
    /// 城镇
    pub town: String,
    /// 触发阈值（百分比，如 25 表示 -25%）
    pub threshold_pct: f64,
    /// 达标月份标签
    pub drop_months: Vec<String>,
}

impl DropAlert {
    /// 达标月份的逗号拼接（展示/导出格式）
    pub fn drop_months_joined(&self) -> String {
        self.drop_months.join(", ")
    }

    /// 人类可读叙述
    pub fn narrative(&self) -> String {
        format!(
            "客户 {} 的 {} 在 {} 出现不低于 {}% 的销量下滑，涉及月份: {}",
            self.pharmacy_name,
            self.product_name,
            self.town,
            self.threshold_pct,
            self.drop_months_joined()
        )
    }
}

/// 退货告警（某月销量为负）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnAlert {
    pub pharmacy_name: String,
    pub product_name: String,
    /// 涉及月份标签
    pub month_label: String,
    /// 退货量（绝对值）
    pub returned_units: f64,
}

impl ReturnAlert {
    /// 人类可读叙述
    pub fn narrative(&self) -> String {
        format!(
            "告警: {} 在 {} - {} 退货 {} 件",
            self.product_name, self.pharmacy_name, self.month_label, self.returned_units
        )
    }
}

/// 销量低于均值告警
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesDipAlert {
    pub pharmacy_name: String,
    pub product_name: String,
    /// 被比较的月份标签
    pub month_label: String,
    /// 该行的月均销量
    pub average_units: f64,
    /// 低于均值的缺口（四舍五入到整数件）
    pub dip_units: i64,
}

impl SalesDipAlert {
    /// 人类可读叙述
    pub fn narrative(&self) -> String {
        format!(
            "告警: {} 在 {} - {} 销量低于月均 {} 件",
            self.product_name, self.pharmacy_name, self.month_label, self.dip_units
        )
    }
}
