//! 餐券銷售模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 餐券銷售明細
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketSale {
    /// 銷售ID
    pub id: Uuid,

    /// 銷售日期
    pub sale_date: NaiveDate,

    /// 餐券類型
    pub ticket_type: String,

    /// 售出張數
    pub tickets_sold: u32,

    /// 用餐人數
    pub persons_served: u32,

    /// 銷售總額
    pub total_price: Decimal,
}

impl TicketSale {
    /// 創建新的銷售明細
    pub fn new(
        sale_date: NaiveDate,
        ticket_type: String,
        tickets_sold: u32,
        persons_served: u32,
        total_price: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sale_date,
            ticket_type,
            tickets_sold,
            persons_served,
            total_price,
        }
    }
}
