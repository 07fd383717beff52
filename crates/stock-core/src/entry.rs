//! 入庫記錄模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::supply::SupplyChannel;

/// 入庫記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    /// 入庫ID
    pub id: Uuid,

    /// 產品ID
    pub product_id: String,

    /// 來源管道
    pub source: SupplyChannel,

    /// 來源供應記錄
    pub supply_id: Option<Uuid>,

    /// 預算
    pub budget_id: Option<Uuid>,

    /// 入庫數量
    pub quantity: Decimal,

    /// 剩餘數量（出庫時依先進先出扣減）
    pub remaining_quantity: Decimal,

    /// 未稅單價
    pub unit_price: Decimal,

    /// 增值稅率
    pub vat_rate: Decimal,

    /// 記錄的總價（含稅）
    pub total_price: Decimal,

    /// 入庫日期
    pub entry_date: NaiveDate,

    /// 有效期限
    pub expiry_date: Option<NaiveDate>,
}

impl MaterialEntry {
    /// 創建新的入庫記錄（總價 = 數量 × 單價 × (1 + 稅率)）
    pub fn new(
        product_id: String,
        source: SupplyChannel,
        quantity: Decimal,
        unit_price: Decimal,
        vat_rate: Decimal,
        entry_date: NaiveDate,
    ) -> Self {
        let total_price = quantity * unit_price * (Decimal::ONE + vat_rate);
        Self {
            id: Uuid::new_v4(),
            product_id,
            source,
            supply_id: None,
            budget_id: None,
            quantity,
            remaining_quantity: quantity,
            unit_price,
            vat_rate,
            total_price,
            entry_date,
            expiry_date: None,
        }
    }

    /// 建構器模式：設置來源供應記錄
    pub fn with_supply_id(mut self, supply_id: Uuid) -> Self {
        self.supply_id = Some(supply_id);
        self
    }

    /// 建構器模式：設置預算
    pub fn with_budget_id(mut self, budget_id: Uuid) -> Self {
        self.budget_id = Some(budget_id);
        self
    }

    /// 建構器模式：設置有效期限
    pub fn with_expiry_date(mut self, expiry_date: NaiveDate) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }

    /// 建構器模式：覆寫記錄的總價
    pub fn with_total_price(mut self, total_price: Decimal) -> Self {
        self.total_price = total_price;
        self
    }

    /// 含稅單價
    pub fn unit_price_including_vat(&self) -> Decimal {
        self.unit_price * (Decimal::ONE + self.vat_rate)
    }

    /// 是否仍有庫存
    pub fn has_stock(&self) -> bool {
        self.remaining_quantity > Decimal::ZERO
    }
}
