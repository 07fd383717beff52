//! 資料快照（匯入邊界）
//!
//! 核心計算只接受通過 [`StockSnapshot::validate`] 的快照，
//! 參照缺失或數量非法的資料在這裡被拒絕。

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Budget, ExitRecord, MaterialDemand, MaterialEntry, Product, Result, StockError, SupplyRecord,
    TicketSale,
};

/// 一次計算所需的全部記錄
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StockSnapshot {
    pub products: Vec<Product>,
    pub supplies: Vec<SupplyRecord>,
    pub exits: Vec<ExitRecord>,
    pub demands: Vec<MaterialDemand>,
    pub budgets: Vec<Budget>,
    pub entries: Vec<MaterialEntry>,
    pub ticket_sales: Vec<TicketSale>,
}

impl StockSnapshot {
    /// 創建空快照
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 解析並驗證
    pub fn from_json(raw: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(raw)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// 驗證參照完整性與數量（以快照自帶的產品為目錄）
    pub fn validate(&self) -> Result<()> {
        self.validate_with(&self.products)
    }

    /// 以外部產品目錄驗證參照完整性與數量
    pub fn validate_with(&self, catalogue: &[Product]) -> Result<()> {
        let product_ids: HashSet<&str> = catalogue.iter().map(|p| p.id.as_str()).collect();
        let supply_ids: HashSet<Uuid> = self.supplies.iter().map(|s| s.id).collect();
        let budget_ids: HashSet<Uuid> = self.budgets.iter().map(|b| b.id).collect();

        let known_product = |id: &str| -> Result<()> {
            if product_ids.contains(id) {
                Ok(())
            } else {
                Err(StockError::UnknownProduct(id.to_string()))
            }
        };

        for supply in &self.supplies {
            known_product(&supply.product_id)?;
            if !supply.is_consistent() {
                return Err(StockError::InvalidQuantity(supply.remaining_quantity));
            }
        }

        for exit in &self.exits {
            known_product(&exit.product_id)?;
            if exit.quantity.is_sign_negative() {
                return Err(StockError::InvalidQuantity(exit.quantity));
            }
        }

        for demand in &self.demands {
            known_product(&demand.product_id)?;
            if !supply_ids.contains(&demand.supply_id) {
                return Err(StockError::UnknownSupply(demand.supply_id));
            }
        }

        for entry in &self.entries {
            known_product(&entry.product_id)?;
            if let Some(budget_id) = entry.budget_id {
                if !budget_ids.contains(&budget_id) {
                    return Err(StockError::UnknownBudget(budget_id));
                }
            }
        }

        Ok(())
    }

    /// 依ID尋找產品
    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }
}
