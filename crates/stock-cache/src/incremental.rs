//! 增量數量帳
//!
//! 依產品保存供應與出庫記錄，只重算被異動的產品。

use std::collections::{BTreeMap, HashMap};

use stock_calc::{LedgerAggregator, StockBalance};
use stock_core::{ExitRecord, SupplyRecord};
use uuid::Uuid;

use crate::dirty_tracking::DirtyTracker;

#[derive(Debug, Default)]
struct ProductRecords {
    supplies: BTreeMap<Uuid, SupplyRecord>,
    exits: BTreeMap<Uuid, ExitRecord>,
}

impl ProductRecords {
    fn is_empty(&self) -> bool {
        self.supplies.is_empty() && self.exits.is_empty()
    }
}

/// 增量數量帳
#[derive(Debug, Default)]
pub struct IncrementalLedger {
    records: HashMap<String, ProductRecords>,
    supply_index: HashMap<Uuid, String>,
    exit_index: HashMap<Uuid, String>,
    cache: BTreeMap<String, StockBalance>,
    tracker: DirtyTracker,
    last_recomputed: usize,
}

impl IncrementalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 從既有記錄建立（全部產品為髒）
    pub fn from_records(supplies: Vec<SupplyRecord>, exits: Vec<ExitRecord>) -> Self {
        let mut ledger = Self::new();
        for supply in supplies {
            ledger.upsert_supply(supply);
        }
        for exit in exits {
            ledger.upsert_exit(exit);
        }
        ledger
    }

    /// 新增或取代供應記錄
    pub fn upsert_supply(&mut self, supply: SupplyRecord) {
        if let Some(previous) = self.supply_index.get(&supply.id).cloned() {
            if previous != supply.product_id {
                self.remove_supply(supply.id);
            }
        }

        self.tracker.mark_dirty(&supply.product_id);
        self.supply_index.insert(supply.id, supply.product_id.clone());
        self.records
            .entry(supply.product_id.clone())
            .or_default()
            .supplies
            .insert(supply.id, supply);
    }

    /// 移除供應記錄
    pub fn remove_supply(&mut self, supply_id: Uuid) -> Option<SupplyRecord> {
        let product_id = self.supply_index.remove(&supply_id)?;
        self.tracker.mark_dirty(&product_id);
        self.records
            .get_mut(&product_id)
            .and_then(|records| records.supplies.remove(&supply_id))
    }

    /// 新增或取代出庫記錄
    pub fn upsert_exit(&mut self, exit: ExitRecord) {
        if let Some(previous) = self.exit_index.get(&exit.id).cloned() {
            if previous != exit.product_id {
                self.remove_exit(exit.id);
            }
        }

        self.tracker.mark_dirty(&exit.product_id);
        self.exit_index.insert(exit.id, exit.product_id.clone());
        self.records
            .entry(exit.product_id.clone())
            .or_default()
            .exits
            .insert(exit.id, exit);
    }

    /// 移除出庫記錄
    pub fn remove_exit(&mut self, exit_id: Uuid) -> Option<ExitRecord> {
        let product_id = self.exit_index.remove(&exit_id)?;
        self.tracker.mark_dirty(&product_id);
        self.records
            .get_mut(&product_id)
            .and_then(|records| records.exits.remove(&exit_id))
    }

    /// 是否有待重算的產品
    pub fn is_dirty(&self, product_id: &str) -> bool {
        self.tracker.is_dirty(product_id)
    }

    /// 上一次 [`IncrementalLedger::balances`] 重算的產品數
    pub fn last_recomputed(&self) -> usize {
        self.last_recomputed
    }

    /// 全部餘額（依產品ID排序），只重算髒產品
    pub fn balances(&mut self) -> Vec<StockBalance> {
        self.refresh();
        self.cache.values().cloned().collect()
    }

    /// 單一產品的餘額
    pub fn balance(&mut self, product_id: &str) -> Option<StockBalance> {
        self.refresh();
        self.cache.get(product_id).cloned()
    }

    fn refresh(&mut self) {
        let dirty = self.tracker.take_dirty();
        self.last_recomputed = dirty.len();
        if dirty.is_empty() {
            return;
        }

        tracing::debug!("增量重算 {} 個產品", dirty.len());

        for product_id in dirty {
            match self.records.get(&product_id) {
                Some(records) if !records.is_empty() => {
                    let balance = LedgerAggregator::balance_for(
                        &product_id,
                        records.supplies.values(),
                        records.exits.values(),
                    );
                    self.cache.insert(product_id, balance);
                }
                _ => {
                    self.records.remove(&product_id);
                    self.cache.remove(&product_id);
                }
            }
        }
    }
}
