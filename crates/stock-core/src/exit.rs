//! 出庫記錄模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 出庫記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitRecord {
    /// 出庫ID
    pub id: Uuid,

    /// 產品ID
    pub product_id: String,

    /// 出庫數量
    pub quantity: Decimal,

    /// 出庫日期
    pub date: NaiveDate,

    /// 出庫成本
    #[serde(default)]
    pub total_cost: Decimal,

    /// 是否為清潔用品（不計入餐食成本）
    #[serde(default)]
    pub cleaning: bool,
}

impl ExitRecord {
    /// 創建新的出庫記錄
    pub fn new(product_id: String, quantity: Decimal, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            quantity,
            date,
            total_cost: Decimal::ZERO,
            cleaning: false,
        }
    }

    /// 建構器模式：設置出庫成本
    pub fn with_total_cost(mut self, total_cost: Decimal) -> Self {
        self.total_cost = total_cost;
        self
    }

    /// 建構器模式：標記為清潔用品
    pub fn as_cleaning(mut self) -> Self {
        self.cleaning = true;
        self
    }
}
