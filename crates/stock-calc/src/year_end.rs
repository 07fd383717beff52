//! 年度結轉

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use stock_core::{MaterialEntry, Result, StockError, SupplyChannel, SupplyRecord};

use crate::ledger::StockBalance;

/// 年度結轉
pub struct YearEndTransfer;

impl YearEndTransfer {
    /// 將剩餘庫存結轉到下一年度
    ///
    /// 每個剩餘量為正的產品產生一筆結轉記錄，單價為仍有庫存之入庫記錄的未稅加權平均單價。
    pub fn carry_over(
        balances: &[StockBalance],
        entries: &[MaterialEntry],
        fiscal_year: i32,
    ) -> Result<Vec<SupplyRecord>> {
        let next_year = fiscal_year + 1;
        let (start, end) = NaiveDate::from_ymd_opt(next_year, 1, 1)
            .zip(NaiveDate::from_ymd_opt(next_year, 12, 31))
            .ok_or_else(|| StockError::InvalidDateRange(format!("年度 {}", next_year)))?;

        let mut weighted: HashMap<&str, (Decimal, Decimal)> = HashMap::new();
        for entry in entries.iter().filter(|e| e.has_stock()) {
            let (value, quantity) = weighted.entry(entry.product_id.as_str()).or_default();
            *value += entry.remaining_quantity * entry.unit_price;
            *quantity += entry.remaining_quantity;
        }

        let records: Vec<SupplyRecord> = balances
            .iter()
            .filter(|balance| balance.remaining > Decimal::ZERO)
            .map(|balance| {
                let unit_price = weighted
                    .get(balance.product_id.as_str())
                    .filter(|(_, quantity)| *quantity > Decimal::ZERO)
                    .map(|(value, quantity)| *value / *quantity)
                    .unwrap_or(Decimal::ZERO);

                SupplyRecord::new(
                    balance.product_id.clone(),
                    SupplyChannel::CarryOver,
                    balance.remaining,
                    unit_price,
                    start,
                    end,
                )
                .with_company_name(format!("{} 年度結轉", fiscal_year))
            })
            .collect();

        tracing::info!("{} 年度結轉 {} 個產品", fiscal_year, records.len());
        Ok(records)
    }
}
