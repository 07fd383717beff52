//! 到期提醒

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use stock_core::{MaterialEntry, Product};
use uuid::Uuid;

/// 即將到期的入庫記錄
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpiryAlert {
    pub entry_id: Uuid,
    pub product_id: String,
    pub expiry_date: NaiveDate,
    pub days_left: i64,
    pub remaining_quantity: Decimal,
    pub message: String,
}

pub struct ExpiryWatch;

impl ExpiryWatch {
    /// 找出在 `1..=horizon_days` 天內到期且仍有庫存的入庫記錄（最早到期在前）
    pub fn scan(
        entries: &[MaterialEntry],
        products: &[Product],
        today: NaiveDate,
        horizon_days: i64,
    ) -> Vec<ExpiryAlert> {
        let names: HashMap<&str, &str> = products
            .iter()
            .map(|p| (p.id.as_str(), p.name.as_str()))
            .collect();

        let mut alerts: Vec<ExpiryAlert> = entries
            .iter()
            .filter(|entry| entry.has_stock())
            .filter_map(|entry| {
                let expiry_date = entry.expiry_date?;
                let days_left = (expiry_date - today).num_days();
                if !(1..=horizon_days).contains(&days_left) {
                    return None;
                }

                let name = names
                    .get(entry.product_id.as_str())
                    .copied()
                    .unwrap_or(entry.product_id.as_str());

                Some(ExpiryAlert {
                    entry_id: entry.id,
                    product_id: entry.product_id.clone(),
                    expiry_date,
                    days_left,
                    remaining_quantity: entry.remaining_quantity,
                    message: format!(
                        "{} 將於 {} 天後到期（{}，剩餘：{}）",
                        name, days_left, expiry_date, entry.remaining_quantity
                    ),
                })
            })
            .collect();

        alerts.sort_by_key(|alert| alert.days_left);
        alerts
    }
}
