//! 預算支出彙總

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use stock_core::{Budget, MaterialEntry};
use uuid::Uuid;

/// 單一預算的支出摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSpend {
    pub budget_id: Uuid,
    pub name: String,
    pub ceiling: Decimal,
    /// 已支出（入庫記錄的總價合計）
    pub spent: Decimal,
    /// 剩餘 = max(0, 上限 - 已支出)
    pub remaining: Decimal,
    /// 使用率（限制在 0..=100，供顯示）
    pub utilization_percent: Option<Decimal>,
    /// 未限制的使用率（供警示）
    pub raw_utilization_percent: Option<Decimal>,
    pub entry_count: usize,
}

impl BudgetSpend {
    fn new(budget: &Budget, spent: Decimal, entry_count: usize) -> Self {
        let raw = (budget.ceiling > Decimal::ZERO)
            .then(|| spent / budget.ceiling * Decimal::ONE_HUNDRED);

        Self {
            budget_id: budget.id,
            name: budget.name.clone(),
            ceiling: budget.ceiling,
            spent,
            remaining: (budget.ceiling - spent).max(Decimal::ZERO),
            utilization_percent: raw.map(|pct| pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)),
            raw_utilization_percent: raw,
            entry_count,
        }
    }

    /// 是否超出預算
    pub fn is_over_budget(&self) -> bool {
        self.raw_utilization_percent
            .is_some_and(|pct| pct > Decimal::ONE_HUNDRED)
    }
}

/// 預算支出彙總器
pub struct BudgetAggregator;

impl BudgetAggregator {
    /// 依預算彙總入庫記錄的總價（輸出順序與預算列表相同）
    pub fn summarize(budgets: &[Budget], entries: &[MaterialEntry]) -> Vec<BudgetSpend> {
        let mut spent: HashMap<Uuid, (Decimal, usize)> =
            budgets.iter().map(|b| (b.id, (Decimal::ZERO, 0))).collect();

        for entry in entries {
            let Some(budget_id) = entry.budget_id else {
                continue;
            };
            match spent.get_mut(&budget_id) {
                Some((total, count)) => {
                    *total += entry.total_price;
                    *count += 1;
                }
                None => tracing::warn!("入庫記錄 {} 引用未知預算 {}，已略過", entry.id, budget_id),
            }
        }

        budgets
            .iter()
            .map(|budget| {
                let (total, count) = spent.get(&budget.id).copied().unwrap_or_default();
                let summary = BudgetSpend::new(budget, total, count);
                if summary.is_over_budget() {
                    tracing::warn!(
                        "預算 {} 超支：上限 {}，已支出 {}",
                        summary.name,
                        summary.ceiling,
                        summary.spent
                    );
                }
                summary
            })
            .collect()
    }

    /// 全部預算的總使用率（總支出 / 總上限 × 100）
    pub fn total_utilization(spends: &[BudgetSpend]) -> Option<Decimal> {
        let ceiling: Decimal = spends.iter().map(|s| s.ceiling).sum();
        let spent: Decimal = spends.iter().map(|s| s.spent).sum();

        (ceiling > Decimal::ZERO).then(|| spent / ceiling * Decimal::ONE_HUNDRED)
    }
}
