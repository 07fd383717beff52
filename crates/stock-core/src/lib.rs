//! # Stock Core
//!
//! 倉庫庫存、採購（招標/直接採購）與預算的核心資料模型

pub mod budget;
pub mod config;
pub mod demand;
pub mod entry;
pub mod exit;
pub mod product;
pub mod snapshot;
pub mod supply;
pub mod ticket;

// Re-export 主要類型
pub use budget::Budget;
pub use config::{PolicyKind, StockConfig};
pub use demand::{DemandStatus, MaterialDemand};
pub use entry::MaterialEntry;
pub use exit::ExitRecord;
pub use product::Product;
pub use snapshot::StockSnapshot;
pub use supply::{SupplyChannel, SupplyRecord};
pub use ticket::TicketSale;

use rust_decimal::Decimal;
use uuid::Uuid;

/// 庫存引擎錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum StockError {
    #[error("可分配數量不足：記錄 {supply_id}，需要 {requested}，剩餘 {remaining}")]
    InsufficientCapacity {
        supply_id: Uuid,
        requested: Decimal,
        remaining: Decimal,
    },

    #[error("無效的增量百分比: {0}")]
    InvalidIncreasePercentage(Decimal),

    #[error("增量已被分配，無法縮減：記錄 {supply_id}，缺口 {shortfall}")]
    IncreaseAlreadyAllocated { supply_id: Uuid, shortfall: Decimal },

    #[error("此供應管道不支援容量操作: {0:?}")]
    UnsupportedChannel(SupplyChannel),

    #[error("無效的數量: {0}")]
    InvalidQuantity(Decimal),

    #[error("需求已處理: {0}")]
    DemandAlreadyProcessed(Uuid),

    #[error("需求 {demand_id} 不屬於供應記錄 {supply_id}")]
    SupplyMismatch { demand_id: Uuid, supply_id: Uuid },

    #[error("找不到產品: {0}")]
    UnknownProduct(String),

    #[error("找不到供應記錄: {0}")]
    UnknownSupply(Uuid),

    #[error("找不到預算: {0}")]
    UnknownBudget(Uuid),

    #[error("庫存不足：產品 {product_id}，需要 {requested}，可用 {available}")]
    InsufficientStock {
        product_id: String,
        requested: Decimal,
        available: Decimal,
    },

    #[error("無效的日期區間: {0}")]
    InvalidDateRange(String),

    #[error("報表期間沒有資料: {0}")]
    NoReportData(String),

    #[error("供應記錄鎖已損壞: {0}")]
    LockPoisoned(Uuid),

    #[error("資料解析錯誤: {0}")]
    Ingestion(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StockError>;
