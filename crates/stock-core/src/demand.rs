//! 物料需求模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, StockError};

/// 需求狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandStatus {
    /// 待審核
    Pending,
    /// 已核准
    Approved,
    /// 已拒絕
    Rejected,
}

/// 物料需求（從指定招標/直接採購記錄提取數量的內部申請）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDemand {
    /// 需求ID
    pub id: Uuid,

    /// 產品ID
    pub product_id: String,

    /// 申請數量
    pub requested_quantity: Decimal,

    /// 核准數量（核准時設定）
    pub approved_quantity: Option<Decimal>,

    /// 狀態
    pub status: DemandStatus,

    /// 來源供應記錄
    pub supply_id: Uuid,

    /// 拒絕原因
    pub rejection_reason: Option<String>,
}

impl MaterialDemand {
    /// 創建新的需求（待審核）
    pub fn new(product_id: String, requested_quantity: Decimal, supply_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            requested_quantity,
            approved_quantity: None,
            status: DemandStatus::Pending,
            supply_id,
            rejection_reason: None,
        }
    }

    /// 是否待審核
    pub fn is_pending(&self) -> bool {
        self.status == DemandStatus::Pending
    }

    /// 實際生效的數量（核准數量優先）
    pub fn effective_quantity(&self) -> Decimal {
        self.approved_quantity.unwrap_or(self.requested_quantity)
    }

    /// 核准數量是否與申請數量不同
    pub fn is_adjusted(&self) -> bool {
        self.approved_quantity
            .is_some_and(|approved| approved != self.requested_quantity)
    }

    /// 標記為已核准（只允許從待審核轉換一次）
    pub fn mark_approved(&mut self, quantity: Decimal) -> Result<()> {
        self.ensure_pending()?;
        self.approved_quantity = Some(quantity);
        self.status = DemandStatus::Approved;
        Ok(())
    }

    /// 標記為已拒絕
    pub fn mark_rejected(&mut self, reason: String) -> Result<()> {
        self.ensure_pending()?;
        self.rejection_reason = Some(reason);
        self.status = DemandStatus::Rejected;
        Ok(())
    }

    pub(crate) fn ensure_pending(&self) -> Result<()> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(StockError::DemandAlreadyProcessed(self.id))
        }
    }
}
