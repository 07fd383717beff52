//! 需求核准流程
//!
//! 核准 = 驗證需求 → 從供應記錄分配 → 標記需求。
//! 分配失敗時需求維持待審核，供應記錄不變。

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use rust_decimal::Decimal;
use stock_core::{MaterialDemand, Result, StockError, SupplyRecord};
use uuid::Uuid;

/// 需求核准
pub struct DemandApproval;

impl DemandApproval {
    /// 核准需求並分配容量
    ///
    /// `approved_quantity` 為空時使用申請數量，返回實際核准的數量
    pub fn approve(
        demand: &mut MaterialDemand,
        supply: &mut SupplyRecord,
        approved_quantity: Option<Decimal>,
    ) -> Result<Decimal> {
        if !demand.is_pending() {
            return Err(StockError::DemandAlreadyProcessed(demand.id));
        }
        if demand.supply_id != supply.id || demand.product_id != supply.product_id {
            return Err(StockError::SupplyMismatch {
                demand_id: demand.id,
                supply_id: supply.id,
            });
        }

        let quantity = approved_quantity.unwrap_or(demand.requested_quantity);
        supply.allocate(quantity)?;
        demand.mark_approved(quantity)?;

        tracing::debug!(
            "需求 {} 已核准 {}，記錄 {} 剩餘 {}",
            demand.id,
            quantity,
            supply.id,
            supply.remaining_quantity
        );

        Ok(quantity)
    }

    /// 拒絕需求（不影響任何容量）
    pub fn reject(demand: &mut MaterialDemand, reason: String) -> Result<()> {
        demand.mark_rejected(reason)
    }
}

/// 以記錄為單位加鎖的採購記錄簿
///
/// 同一筆記錄上的分配與增量依序執行，不同記錄之間互不阻塞。
pub struct ProcurementBook {
    records: HashMap<Uuid, Mutex<SupplyRecord>>,
    order: Vec<Uuid>,
    max_increase_percentage: Decimal,
}

impl ProcurementBook {
    /// 創建記錄簿
    pub fn new(records: Vec<SupplyRecord>) -> Self {
        let order = records.iter().map(|record| record.id).collect();
        let records = records
            .into_iter()
            .map(|record| (record.id, Mutex::new(record)))
            .collect();

        Self {
            records,
            order,
            max_increase_percentage: stock_core::config::MAX_INCREASE_PERCENTAGE,
        }
    }

    /// 建構器模式：設置增量上限
    pub fn with_max_increase_percentage(mut self, max_increase_percentage: Decimal) -> Self {
        self.max_increase_percentage = max_increase_percentage;
        self
    }

    /// 核准需求（鎖定需求所引用的記錄）
    pub fn approve(
        &self,
        demand: &mut MaterialDemand,
        approved_quantity: Option<Decimal>,
    ) -> Result<Decimal> {
        let mut supply = self.lock(demand.supply_id)?;
        DemandApproval::approve(demand, &mut supply, approved_quantity)
    }

    /// 直接分配
    pub fn allocate(&self, supply_id: Uuid, quantity: Decimal) -> Result<()> {
        self.lock(supply_id)?.allocate(quantity)
    }

    /// 容量增量，返回更新後的記錄
    pub fn increase(&self, supply_id: Uuid, percentage: Decimal) -> Result<SupplyRecord> {
        let mut supply = self.lock(supply_id)?;
        supply.increase_within(percentage, self.max_increase_percentage)?;
        Ok(supply.clone())
    }

    /// 讀取單筆記錄
    pub fn record(&self, supply_id: Uuid) -> Result<SupplyRecord> {
        Ok(self.lock(supply_id)?.clone())
    }

    /// 依建立順序複製全部記錄
    pub fn snapshot(&self) -> Result<Vec<SupplyRecord>> {
        self.order.iter().map(|id| self.record(*id)).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn lock(&self, supply_id: Uuid) -> Result<MutexGuard<'_, SupplyRecord>> {
        self.records
            .get(&supply_id)
            .ok_or(StockError::UnknownSupply(supply_id))?
            .lock()
            .map_err(|_| StockError::LockPoisoned(supply_id))
    }
}
