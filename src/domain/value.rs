// ==========================================
// 医药销售分析决策支持系统 - 数值单元类型
// ==========================================
// 职责: 表格单元格数值的显式缺失语义
// 红线: 缺失值显式传播，绝不静默替换为 0
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// 表格单元格数值
///
/// 无法解析为有限数值的单元格统一收敛为 `Missing`，
/// 参与运算时向结果传播（而不是丢弃行或补零）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// 有限数值
    Finite(f64),
    /// 缺失（无法解析/除零等）
    Missing,
}

impl CellValue {
    /// 从原始字符串解析
    ///
    /// # 返回
    /// - `Finite`: 解析成功且为有限数值
    /// - `Missing`: 空白、非数值或非有限（NaN/Inf）
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return CellValue::Missing;
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => CellValue::Finite(v),
            _ => CellValue::Missing,
        }
    }

    /// 从 f64 收敛（NaN/Inf 归为 Missing）
    pub fn from_f64(v: f64) -> Self {
        if v.is_finite() {
            CellValue::Finite(v)
        } else {
            CellValue::Missing
        }
    }

    /// 是否缺失
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// 取出有限数值
    pub fn finite(&self) -> Option<f64> {
        match self {
            CellValue::Finite(v) => Some(*v),
            CellValue::Missing => None,
        }
    }

    /// 转为 f64（Missing 转为 NaN，供展示/导出层使用）
    pub fn to_f64(&self) -> f64 {
        match self {
            CellValue::Finite(v) => *v,
            CellValue::Missing => f64::NAN,
        }
    }

    /// 四舍五入到两位小数（展示层投影，Missing 保持缺失）
    pub fn round2(&self) -> Self {
        match self {
            CellValue::Finite(v) => CellValue::Finite((v * 100.0).round() / 100.0),
            CellValue::Missing => CellValue::Missing,
        }
    }
}

// ==========================================
// 算术运算
// ==========================================
// 规则: 任一操作数缺失则结果缺失

impl Add for CellValue {
    type Output = CellValue;

    fn add(self, rhs: CellValue) -> CellValue {
        match (self, rhs) {
            (CellValue::Finite(a), CellValue::Finite(b)) => CellValue::from_f64(a + b),
            _ => CellValue::Missing,
        }
    }
}

impl Sub for CellValue {
    type Output = CellValue;

    fn sub(self, rhs: CellValue) -> CellValue {
        match (self, rhs) {
            (CellValue::Finite(a), CellValue::Finite(b)) => CellValue::from_f64(a - b),
            _ => CellValue::Missing,
        }
    }
}

impl Mul for CellValue {
    type Output = CellValue;

    fn mul(self, rhs: CellValue) -> CellValue {
        match (self, rhs) {
            (CellValue::Finite(a), CellValue::Finite(b)) => CellValue::from_f64(a * b),
            _ => CellValue::Missing,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Finite(v) => write!(f, "{:.2}", v),
            CellValue::Missing => write!(f, "NaN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_finite() {
        assert_eq!(CellValue::parse("12.5"), CellValue::Finite(12.5));
        assert_eq!(CellValue::parse("  -3 "), CellValue::Finite(-3.0));
    }

    #[test]
    fn test_parse_missing() {
        assert!(CellValue::parse("").is_missing());
        assert!(CellValue::parse("abc").is_missing());
        assert!(CellValue::parse("NaN").is_missing());
    }

    #[test]
    fn test_missing_propagation() {
        let a = CellValue::Finite(2.0);
        let m = CellValue::Missing;
        assert!((a * m).is_missing());
        assert!((m - a).is_missing());
        assert!((a + m).is_missing());
    }

    #[test]
    fn test_round2() {
        assert_eq!(CellValue::Finite(2.344).round2(), CellValue::Finite(2.34));
        assert_eq!(CellValue::Finite(2.345).round2(), CellValue::Finite(2.35));
        assert!(CellValue::Missing.round2().is_missing());
    }
}
