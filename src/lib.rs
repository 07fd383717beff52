//! # stockrecon
//!
//! 倉庫庫存對帳與採購容量引擎
//!
//! * [`model`]：資料模型、錯誤、配置、快照匯入
//! * [`calc`]：數量帳、臨界分類、容量追蹤、預算支出與對帳流程
//! * [`cache`]：增量數量帳

pub use stock_cache as cache;
pub use stock_calc as calc;
pub use stock_core as model;

pub use stock_cache::IncrementalLedger;
pub use stock_calc::{ReconciliationResult, StockCalculator};
pub use stock_core::{Result, StockConfig, StockError, StockSnapshot};
