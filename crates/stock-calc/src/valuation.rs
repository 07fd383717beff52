//! 庫存價值

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use stock_core::MaterialEntry;

pub struct StockValuation;

impl StockValuation {
    /// 倉庫總價值 = Σ 剩餘數量 × 未稅單價
    pub fn total_value(entries: &[MaterialEntry]) -> Decimal {
        entries
            .iter()
            .map(|e| e.remaining_quantity * e.unit_price)
            .sum()
    }

    /// 依產品的庫存價值
    pub fn value_by_product(entries: &[MaterialEntry]) -> BTreeMap<String, Decimal> {
        let mut values = BTreeMap::new();
        for entry in entries.iter().filter(|e| e.has_stock()) {
            *values.entry(entry.product_id.clone()).or_insert(Decimal::ZERO) +=
                entry.remaining_quantity * entry.unit_price;
        }
        values
    }
}
