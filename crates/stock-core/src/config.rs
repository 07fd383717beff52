//! 引擎配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Result;

/// 容量增量百分比上限
pub const MAX_INCREASE_PERCENTAGE: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// 庫存分類規則
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyKind {
    /// 儀表板規則：剩餘 <= 臨界量 × 比例 為臨界，剩餘 <= 臨界量 為偏低
    Dashboard,
    /// 庫存狀態表規則：剩餘 < 臨界量 為臨界，剩餘 < 臨界量 + 固定邊際 為偏低
    StockStatus,
}

/// 庫存引擎配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StockConfig {
    /// 分類規則
    pub policy: PolicyKind,

    /// 儀表板規則的臨界比例
    pub critical_ratio: Decimal,

    /// 庫存狀態表規則的固定邊際
    pub near_critical_margin: Decimal,

    /// 容量增量百分比上限
    pub max_increase_percentage: Decimal,

    /// 到期提醒天數
    pub expiry_warning_days: i64,

    /// 是否以並行方式彙總
    pub parallel: bool,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::Dashboard,
            critical_ratio: Decimal::new(5, 1),
            near_critical_margin: Decimal::from(100),
            max_increase_percentage: MAX_INCREASE_PERCENTAGE,
            expiry_warning_days: 30,
            parallel: false,
        }
    }
}

impl StockConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 載入配置（缺少的欄位使用預設值）
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// 建構器模式：設置分類規則
    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    /// 建構器模式：設置臨界比例
    pub fn with_critical_ratio(mut self, ratio: Decimal) -> Self {
        self.critical_ratio = ratio;
        self
    }

    /// 建構器模式：設置固定邊際
    pub fn with_near_critical_margin(mut self, margin: Decimal) -> Self {
        self.near_critical_margin = margin;
        self
    }

    /// 建構器模式：設置增量上限
    pub fn with_max_increase_percentage(mut self, percentage: Decimal) -> Self {
        self.max_increase_percentage = percentage;
        self
    }

    /// 建構器模式：設置到期提醒天數
    pub fn with_expiry_warning_days(mut self, days: i64) -> Self {
        self.expiry_warning_days = days;
        self
    }

    /// 建構器模式：設置並行彙總
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
