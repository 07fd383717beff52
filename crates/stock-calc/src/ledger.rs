//! 數量帳彙總
//!
//! 依產品彙總三個供應管道的入庫量與出庫量，得到剩餘餘額。
//! 剩餘量保留真實的正負號，超量出庫在這裡不會被歸零。

use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use stock_core::{ExitRecord, Product, SupplyChannel, SupplyRecord};

/// 產品庫存餘額（衍生資料，不持久化）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockBalance {
    /// 產品ID
    pub product_id: String,
    /// 結轉合計
    pub total_carry_over: Decimal,
    /// 直接採購合計
    pub total_direct_procurement: Decimal,
    /// 招標合計
    pub total_tender: Decimal,
    /// 入庫總量（三個管道之和）
    pub total_received: Decimal,
    /// 出庫總量
    pub total_exit: Decimal,
    /// 剩餘（可能為負）
    pub remaining: Decimal,
    /// 臨界庫存量
    pub critical_level: Option<Decimal>,
    /// 庫存百分比（剩餘 / 臨界量 × 100）
    pub stock_percentage: Option<Decimal>,
}

impl StockBalance {
    /// 創建空的餘額
    pub fn new(product_id: String) -> Self {
        Self {
            product_id,
            total_carry_over: Decimal::ZERO,
            total_direct_procurement: Decimal::ZERO,
            total_tender: Decimal::ZERO,
            total_received: Decimal::ZERO,
            total_exit: Decimal::ZERO,
            remaining: Decimal::ZERO,
            critical_level: None,
            stock_percentage: None,
        }
    }

    /// 建構器模式：設置臨界庫存量並計算庫存百分比
    pub fn with_critical_level(mut self, critical_level: Option<Decimal>) -> Self {
        self.critical_level = critical_level;
        self.stock_percentage = critical_level
            .filter(|level| *level > Decimal::ZERO)
            .map(|level| self.remaining / level * Decimal::ONE_HUNDRED);
        self
    }

    /// 是否超量出庫（出庫大於入庫）
    pub fn is_over_exited(&self) -> bool {
        self.remaining.is_sign_negative() && !self.remaining.is_zero()
    }

    /// 顯示用剩餘量（歸零，僅供顯示層使用）
    pub fn display_remaining(&self) -> Decimal {
        self.remaining.max(Decimal::ZERO)
    }

    fn add_supply(&mut self, channel: SupplyChannel, quantity: Decimal) {
        match channel {
            SupplyChannel::CarryOver => self.total_carry_over += quantity,
            SupplyChannel::DirectProcurement => self.total_direct_procurement += quantity,
            SupplyChannel::Tender => self.total_tender += quantity,
        }
    }

    fn add_exit(&mut self, quantity: Decimal) {
        self.total_exit += quantity;
    }

    fn settle(&mut self) {
        self.total_received =
            self.total_carry_over + self.total_direct_procurement + self.total_tender;
        self.remaining = self.total_received - self.total_exit;
    }
}

/// 數量帳彙總器
pub struct LedgerAggregator;

impl LedgerAggregator {
    /// 彙總每個產品的餘額（依產品ID排序，與輸入順序無關）
    pub fn aggregate(supplies: &[SupplyRecord], exits: &[ExitRecord]) -> Vec<StockBalance> {
        let mut balances: BTreeMap<&str, StockBalance> = BTreeMap::new();

        for supply in supplies {
            balances
                .entry(supply.product_id.as_str())
                .or_insert_with(|| StockBalance::new(supply.product_id.clone()))
                .add_supply(supply.channel, supply.total_quantity);
        }

        for exit in exits {
            balances
                .entry(exit.product_id.as_str())
                .or_insert_with(|| StockBalance::new(exit.product_id.clone()))
                .add_exit(exit.quantity);
        }

        balances
            .into_values()
            .map(|mut balance| {
                balance.settle();
                Self::log_over_exit(&balance);
                balance
            })
            .collect()
    }

    /// 並行彙總（結果與 [`LedgerAggregator::aggregate`] 相同）
    pub fn aggregate_parallel(
        supplies: &[SupplyRecord],
        exits: &[ExitRecord],
    ) -> Vec<StockBalance> {
        let mut groups: BTreeMap<&str, (Vec<&SupplyRecord>, Vec<&ExitRecord>)> = BTreeMap::new();
        for supply in supplies {
            groups.entry(supply.product_id.as_str()).or_default().0.push(supply);
        }
        for exit in exits {
            groups.entry(exit.product_id.as_str()).or_default().1.push(exit);
        }

        let groups: Vec<_> = groups.into_iter().collect();
        tracing::debug!("並行彙總 {} 個產品", groups.len());

        groups
            .par_iter()
            .map(|(product_id, (product_supplies, product_exits))| {
                let balance = Self::settle_product(
                    product_id,
                    product_supplies.iter().copied(),
                    product_exits.iter().copied(),
                );
                Self::log_over_exit(&balance);
                balance
            })
            .collect()
    }

    /// 計算單一產品的餘額
    pub fn balance_for<'a>(
        product_id: &str,
        supplies: impl IntoIterator<Item = &'a SupplyRecord>,
        exits: impl IntoIterator<Item = &'a ExitRecord>,
    ) -> StockBalance {
        Self::settle_product(
            product_id,
            supplies.into_iter().filter(|s| s.product_id == product_id),
            exits.into_iter().filter(|e| e.product_id == product_id),
        )
    }

    /// 附加臨界庫存量，並為沒有任何記錄的產品補上零餘額
    pub fn attach_products(balances: Vec<StockBalance>, products: &[Product]) -> Vec<StockBalance> {
        let mut by_product: HashMap<String, StockBalance> = balances
            .into_iter()
            .map(|balance| (balance.product_id.clone(), balance))
            .collect();

        let mut result: Vec<StockBalance> = products
            .iter()
            .map(|product| {
                by_product
                    .remove(&product.id)
                    .unwrap_or_else(|| StockBalance::new(product.id.clone()))
                    .with_critical_level(product.critical_level)
            })
            .collect();

        // 目錄外的產品保留，但沒有臨界量
        result.extend(by_product.into_values());
        result.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        result
    }

    fn settle_product<'a>(
        product_id: &str,
        supplies: impl Iterator<Item = &'a SupplyRecord>,
        exits: impl Iterator<Item = &'a ExitRecord>,
    ) -> StockBalance {
        let mut balance = StockBalance::new(product_id.to_string());
        for supply in supplies {
            balance.add_supply(supply.channel, supply.total_quantity);
        }
        for exit in exits {
            balance.add_exit(exit.quantity);
        }
        balance.settle();
        balance
    }

    fn log_over_exit(balance: &StockBalance) {
        if balance.is_over_exited() {
            tracing::warn!(
                "產品 {} 出庫超過入庫：入庫 {}，出庫 {}，剩餘 {}",
                balance.product_id,
                balance.total_received,
                balance.total_exit,
                balance.remaining
            );
        }
    }
}
