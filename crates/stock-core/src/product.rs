//! 產品模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 產品（參考資料，核心計算不會修改）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// 產品ID（分組鍵）
    pub id: String,

    /// 名稱
    pub name: String,

    /// 類別
    pub category: String,

    /// 計量單位
    pub unit: String,

    /// 臨界庫存量（未設定時無法分類）
    pub critical_level: Option<Decimal>,

    /// 增值稅率（0.20 = 20%）
    pub vat_rate: Decimal,
}

impl Product {
    /// 創建新的產品
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            category: String::new(),
            unit: String::new(),
            critical_level: None,
            vat_rate: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置類別
    pub fn with_category(mut self, category: String) -> Self {
        self.category = category;
        self
    }

    /// 建構器模式：設置計量單位
    pub fn with_unit(mut self, unit: String) -> Self {
        self.unit = unit;
        self
    }

    /// 建構器模式：設置臨界庫存量
    pub fn with_critical_level(mut self, level: Decimal) -> Self {
        self.critical_level = Some(level);
        self
    }

    /// 建構器模式：設置增值稅率
    pub fn with_vat_rate(mut self, rate: Decimal) -> Self {
        self.vat_rate = rate;
        self
    }

    /// 取得有效的臨界庫存量（必須大於 0）
    pub fn effective_critical_level(&self) -> Option<Decimal> {
        self.critical_level.filter(|level| *level > Decimal::ZERO)
    }
}
