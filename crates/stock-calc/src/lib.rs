//! # Stock Calculation Engine
//!
//! 庫存對帳與採購容量計算引擎

pub mod approval;
pub mod budget;
pub mod calculator;
pub mod capacity;
pub mod classifier;
pub mod costing;
pub mod expiry;
pub mod ledger;
pub mod meal_cost;
pub mod valuation;
pub mod year_end;

use serde::Serialize;

// Re-export 主要類型
pub use approval::{DemandApproval, ProcurementBook};
pub use budget::{BudgetAggregator, BudgetSpend};
pub use calculator::StockCalculator;
pub use capacity::{CapacityState, CapacityStatus, CapacityTracker};
pub use classifier::{
    Classification, CriticalLevelClassifier, StockAlert, StockLevelPolicy, StockStatus,
    ThresholdPolicy,
};
pub use costing::{ExitCost, FifoCosting, FifoDraw};
pub use expiry::{ExpiryAlert, ExpiryWatch};
pub use ledger::{LedgerAggregator, StockBalance};
pub use meal_cost::{MealCostReport, ReportPeriod};
pub use valuation::StockValuation;
pub use year_end::YearEndTransfer;

/// 對帳計算結果
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationResult {
    /// 每個產品的庫存餘額
    pub balances: Vec<StockBalance>,

    /// 依顯示順序排列的分類結果
    pub classifications: Vec<Classification>,

    /// 臨界/偏低提醒
    pub alerts: Vec<StockAlert>,

    /// 即將到期的入庫記錄
    pub expiring: Vec<ExpiryAlert>,

    /// 每筆採購記錄的容量狀態
    pub capacity: Vec<CapacityState>,

    /// 每個預算的支出
    pub budgets: Vec<BudgetSpend>,

    /// 全部預算的總使用率
    pub total_budget_utilization: Option<rust_decimal::Decimal>,

    /// 警告信息
    pub warnings: Vec<StockWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl ReconciliationResult {
    /// 創建空的結果
    pub fn empty() -> Self {
        Self {
            balances: Vec::new(),
            classifications: Vec::new(),
            alerts: Vec::new(),
            expiring: Vec::new(),
            capacity: Vec::new(),
            budgets: Vec::new(),
            total_budget_utilization: None,
            warnings: Vec::new(),
            calculation_time_ms: None,
        }
    }

    /// 通知徽章數量（臨界提醒 + 到期提醒）
    pub fn notification_count(&self) -> usize {
        self.alerts.len() + self.expiring.len()
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: StockWarning) {
        self.warnings.push(warning);
    }

    /// 是否有錯誤級別的警告
    pub fn has_errors(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.severity == WarningSeverity::Error)
    }
}

/// 資料完整性警告
#[derive(Debug, Clone, Serialize)]
pub struct StockWarning {
    pub subject: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl StockWarning {
    pub fn new(subject: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            subject,
            message,
            severity,
        }
    }

    pub fn info(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Info)
    }

    pub fn warning(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Warning)
    }

    pub fn error(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}
