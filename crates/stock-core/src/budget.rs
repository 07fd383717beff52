//! 預算模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 預算（支出不儲存在預算本身，一律由入庫記錄重新計算）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// 預算ID
    pub id: Uuid,

    /// 名稱
    pub name: String,

    /// 上限金額
    pub ceiling: Decimal,

    /// 有效期開始
    pub start_date: NaiveDate,

    /// 有效期結束
    pub end_date: NaiveDate,
}

impl Budget {
    /// 創建新的預算
    pub fn new(name: String, ceiling: Decimal, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            ceiling,
            start_date,
            end_date,
        }
    }

    /// 是否在有效期內
    pub fn is_open(&self, today: NaiveDate) -> bool {
        self.start_date <= today && today <= self.end_date
    }
}
