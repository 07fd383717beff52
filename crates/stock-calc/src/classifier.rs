//! 臨界庫存分類
//!
//! 兩種分類規則以同一個帶狀門檻策略表示，呼叫端依名稱選用：
//! * 儀表板：剩餘 <= 臨界量 × 0.5 為臨界，剩餘 <= 臨界量 為偏低
//! * 庫存狀態表：剩餘 < 臨界量 為臨界，剩餘 < 臨界量 + 100 為偏低

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use stock_core::{PolicyKind, Product, StockConfig};

use crate::ledger::StockBalance;

/// 庫存狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StockStatus {
    /// 臨界
    Critical,
    /// 偏低
    NearCritical,
    /// 正常
    Normal,
    /// 未設定臨界量
    Undefined,
}

impl StockStatus {
    /// 顯示排序（臨界在前）
    pub fn display_rank(&self) -> u8 {
        match self {
            StockStatus::Critical => 0,
            StockStatus::NearCritical => 1,
            StockStatus::Normal => 2,
            StockStatus::Undefined => 3,
        }
    }

    /// 是否需要提醒
    pub fn is_alerting(&self) -> bool {
        matches!(self, StockStatus::Critical | StockStatus::NearCritical)
    }
}

/// 庫存水位分類策略
pub trait StockLevelPolicy {
    /// 策略類型
    fn kind(&self) -> PolicyKind;

    /// 依剩餘量與臨界量分類
    fn classify(&self, remaining: Decimal, critical_level: Option<Decimal>) -> StockStatus;
}

/// 門檻帶：`臨界量 × factor + margin`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub factor: Decimal,
    pub margin: Decimal,
    pub inclusive: bool,
}

impl Band {
    pub fn new(factor: Decimal, margin: Decimal, inclusive: bool) -> Self {
        Self {
            factor,
            margin,
            inclusive,
        }
    }

    fn contains(&self, remaining: Decimal, critical_level: Decimal) -> bool {
        let bound = critical_level * self.factor + self.margin;
        if self.inclusive {
            remaining <= bound
        } else {
            remaining < bound
        }
    }
}

/// 雙門檻分類策略
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPolicy {
    kind: PolicyKind,
    critical: Band,
    near_critical: Band,
}

impl ThresholdPolicy {
    pub fn new(kind: PolicyKind, critical: Band, near_critical: Band) -> Self {
        Self {
            kind,
            critical,
            near_critical,
        }
    }

    /// 儀表板規則（預設比例 0.5）
    pub fn dashboard() -> Self {
        Self::dashboard_with_ratio(Decimal::new(5, 1))
    }

    pub fn dashboard_with_ratio(ratio: Decimal) -> Self {
        Self::new(
            PolicyKind::Dashboard,
            Band::new(ratio, Decimal::ZERO, true),
            Band::new(Decimal::ONE, Decimal::ZERO, true),
        )
    }

    /// 庫存狀態表規則（預設邊際 100）
    pub fn stock_status() -> Self {
        Self::stock_status_with_margin(Decimal::from(100))
    }

    pub fn stock_status_with_margin(margin: Decimal) -> Self {
        Self::new(
            PolicyKind::StockStatus,
            Band::new(Decimal::ONE, Decimal::ZERO, false),
            Band::new(Decimal::ONE, margin, false),
        )
    }

    /// 依配置選用規則
    pub fn from_config(config: &StockConfig) -> Self {
        match config.policy {
            PolicyKind::Dashboard => Self::dashboard_with_ratio(config.critical_ratio),
            PolicyKind::StockStatus => Self::stock_status_with_margin(config.near_critical_margin),
        }
    }
}

impl StockLevelPolicy for ThresholdPolicy {
    fn kind(&self) -> PolicyKind {
        self.kind
    }

    fn classify(&self, remaining: Decimal, critical_level: Option<Decimal>) -> StockStatus {
        let Some(level) = critical_level.filter(|level| *level > Decimal::ZERO) else {
            return StockStatus::Undefined;
        };

        if self.critical.contains(remaining, level) {
            StockStatus::Critical
        } else if self.near_critical.contains(remaining, level) {
            StockStatus::NearCritical
        } else {
            StockStatus::Normal
        }
    }
}

/// 單一產品的分類結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub product_id: String,
    pub product_name: String,
    pub unit: String,
    pub remaining: Decimal,
    pub critical_level: Option<Decimal>,
    pub stock_percentage: Option<Decimal>,
    pub status: StockStatus,
}

/// 通知列表中的提醒
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockAlert {
    pub product_id: String,
    pub status: StockStatus,
    pub message: String,
}

/// 臨界庫存分類器
pub struct CriticalLevelClassifier;

impl CriticalLevelClassifier {
    /// 分類單一餘額
    pub fn classify(
        balance: &StockBalance,
        product: Option<&Product>,
        policy: &dyn StockLevelPolicy,
    ) -> Classification {
        let critical_level = product
            .and_then(|p| p.critical_level)
            .or(balance.critical_level);
        let stock_percentage = critical_level
            .filter(|level| *level > Decimal::ZERO)
            .map(|level| balance.remaining / level * Decimal::ONE_HUNDRED);

        Classification {
            product_id: balance.product_id.clone(),
            product_name: product
                .map(|p| p.name.clone())
                .unwrap_or_else(|| balance.product_id.clone()),
            unit: product.map(|p| p.unit.clone()).unwrap_or_default(),
            remaining: balance.remaining,
            critical_level,
            stock_percentage,
            status: policy.classify(balance.remaining, critical_level),
        }
    }

    /// 分類全部餘額，並依顯示順序排列
    pub fn classify_all(
        balances: &[StockBalance],
        products: &[Product],
        policy: &dyn StockLevelPolicy,
    ) -> Vec<Classification> {
        let catalogue: HashMap<&str, &Product> =
            products.iter().map(|p| (p.id.as_str(), p)).collect();

        let mut classifications: Vec<Classification> = balances
            .iter()
            .map(|balance| {
                Self::classify(
                    balance,
                    catalogue.get(balance.product_id.as_str()).copied(),
                    policy,
                )
            })
            .collect();

        Self::sort_for_display(&mut classifications);

        tracing::debug!(
            "分類完成（{:?}）：{} 個產品",
            policy.kind(),
            classifications.len()
        );

        classifications
    }

    /// 臨界在前、偏低其次、正常最後（同組內保持原順序）
    pub fn sort_for_display(classifications: &mut [Classification]) {
        classifications.sort_by_key(|c| c.status.display_rank());
    }

    /// 為臨界與偏低的產品產生提醒
    pub fn alerts(classifications: &[Classification]) -> Vec<StockAlert> {
        classifications
            .iter()
            .filter(|c| c.status.is_alerting())
            .filter_map(|c| {
                let level = c.critical_level?;
                let message = match c.status {
                    StockStatus::Critical => format!(
                        "{} 低於臨界庫存！（剩餘：{}，臨界：{}）",
                        c.product_name, c.remaining, level
                    ),
                    _ => format!(
                        "{} 接近臨界庫存（剩餘：{}，臨界：{}）",
                        c.product_name, c.remaining, level
                    ),
                };
                Some(StockAlert {
                    product_id: c.product_id.clone(),
                    status: c.status,
                    message,
                })
            })
            .collect()
    }
}
