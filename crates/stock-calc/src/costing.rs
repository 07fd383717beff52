//! 先進先出出庫成本

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use stock_core::{ExitRecord, MaterialEntry, Result, StockError};
use uuid::Uuid;

/// 從單筆入庫記錄扣減的數量
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FifoDraw {
    pub entry_id: Uuid,
    pub quantity: Decimal,
    /// 含稅單價
    pub unit_price: Decimal,
    pub cost: Decimal,
}

/// 一次出庫的成本
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExitCost {
    pub product_id: String,
    pub quantity: Decimal,
    pub total_cost: Decimal,
    pub average_unit_price: Decimal,
    pub draws: Vec<FifoDraw>,
}

/// 先進先出成本計算
pub struct FifoCosting;

impl FifoCosting {
    /// 可用庫存（該產品所有入庫記錄的剩餘數量）
    pub fn available(entries: &[MaterialEntry], product_id: &str) -> Decimal {
        entries
            .iter()
            .filter(|e| e.product_id == product_id && e.has_stock())
            .map(|e| e.remaining_quantity)
            .sum()
    }

    /// 依入庫日期由舊到新扣減數量
    ///
    /// 庫存不足時不修改任何入庫記錄
    pub fn consume(
        entries: &mut [MaterialEntry],
        product_id: &str,
        quantity: Decimal,
    ) -> Result<ExitCost> {
        if quantity <= Decimal::ZERO {
            return Err(StockError::InvalidQuantity(quantity));
        }

        let available = Self::available(entries, product_id);
        if available < quantity {
            return Err(StockError::InsufficientStock {
                product_id: product_id.to_string(),
                requested: quantity,
                available,
            });
        }

        let mut queue: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.product_id == product_id && e.has_stock())
            .map(|(idx, _)| idx)
            .collect();
        queue.sort_by_key(|idx| entries[*idx].entry_date);

        let mut outstanding = quantity;
        let mut draws = Vec::new();
        for idx in queue {
            if outstanding.is_zero() {
                break;
            }
            let entry = &mut entries[idx];
            let taken = outstanding.min(entry.remaining_quantity);
            let unit_price = entry.unit_price_including_vat();

            entry.remaining_quantity -= taken;
            outstanding -= taken;
            draws.push(FifoDraw {
                entry_id: entry.id,
                quantity: taken,
                unit_price,
                cost: taken * unit_price,
            });
        }

        let total_cost: Decimal = draws.iter().map(|d| d.cost).sum();
        tracing::debug!(
            "產品 {} 出庫 {}，扣減 {} 筆入庫，成本 {}",
            product_id,
            quantity,
            draws.len(),
            total_cost
        );

        Ok(ExitCost {
            product_id: product_id.to_string(),
            quantity,
            total_cost,
            average_unit_price: total_cost / quantity,
            draws,
        })
    }

    /// 扣減庫存並產生帶成本的出庫記錄
    pub fn exit_record(
        entries: &mut [MaterialEntry],
        product_id: &str,
        quantity: Decimal,
        date: NaiveDate,
    ) -> Result<ExitRecord> {
        let cost = Self::consume(entries, product_id, quantity)?;
        Ok(ExitRecord::new(product_id.to_string(), quantity, date).with_total_cost(cost.total_cost))
    }
}
