//! 庫存對帳主計算器

use std::collections::HashSet;

use chrono::NaiveDate;
use stock_core::{Product, StockConfig, StockSnapshot};

use crate::{
    BudgetAggregator, CapacityTracker, CriticalLevelClassifier, ExpiryWatch, LedgerAggregator,
    ReconciliationResult, StockLevelPolicy, StockWarning, ThresholdPolicy,
};

/// 庫存對帳計算器
pub struct StockCalculator {
    /// 產品目錄
    products: Vec<Product>,

    /// 引擎配置
    config: StockConfig,

    /// 分類規則
    policy: ThresholdPolicy,
}

impl StockCalculator {
    /// 創建新的計算器（分類規則取自配置）
    pub fn new(products: Vec<Product>, config: StockConfig) -> Self {
        let policy = ThresholdPolicy::from_config(&config);
        Self {
            products,
            config,
            policy,
        }
    }

    /// 建構器模式：覆寫分類規則
    pub fn with_policy(mut self, policy: ThresholdPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 主對帳計算入口
    ///
    /// 快照中的產品會補入目錄（目錄已有的產品以目錄為準）
    pub fn calculate(
        &self,
        snapshot: &StockSnapshot,
        today: NaiveDate,
    ) -> stock_core::Result<ReconciliationResult> {
        tracing::info!(
            "開始庫存對帳：供應 {} 筆，出庫 {} 筆，入庫 {} 筆，預算 {} 筆",
            snapshot.supplies.len(),
            snapshot.exits.len(),
            snapshot.entries.len(),
            snapshot.budgets.len()
        );

        let start_time = std::time::Instant::now();

        // Step 1: 驗證快照
        tracing::debug!("Step 1: 驗證快照");
        let catalogue = self.catalogue(snapshot);
        snapshot.validate_with(&catalogue)?;

        // Step 2: 數量帳彙總
        tracing::debug!("Step 2: 數量帳彙總（並行：{}）", self.config.parallel);
        let balances = if self.config.parallel {
            LedgerAggregator::aggregate_parallel(&snapshot.supplies, &snapshot.exits)
        } else {
            LedgerAggregator::aggregate(&snapshot.supplies, &snapshot.exits)
        };
        let balances = LedgerAggregator::attach_products(balances, &catalogue);

        let mut result = ReconciliationResult::empty();
        for balance in balances.iter().filter(|b| b.is_over_exited()) {
            result.add_warning(StockWarning::warning(
                balance.product_id.clone(),
                format!(
                    "出庫超過入庫：入庫 {}，出庫 {}，剩餘 {}",
                    balance.total_received, balance.total_exit, balance.remaining
                ),
            ));
        }

        // Step 3: 臨界庫存分類
        tracing::debug!("Step 3: 臨界庫存分類（{:?}）", self.policy.kind());
        let classifications =
            CriticalLevelClassifier::classify_all(&balances, &catalogue, &self.policy);
        let alerts = CriticalLevelClassifier::alerts(&classifications);

        // Step 4: 到期提醒
        tracing::debug!("Step 4: 到期提醒（{} 天）", self.config.expiry_warning_days);
        let expiring = ExpiryWatch::scan(
            &snapshot.entries,
            &catalogue,
            today,
            self.config.expiry_warning_days,
        );

        // Step 5: 採購容量
        tracing::debug!("Step 5: 採購容量");
        let capacity = CapacityTracker::summarize(&snapshot.supplies, today);

        // Step 6: 預算支出
        tracing::debug!("Step 6: 預算支出");
        let budgets = BudgetAggregator::summarize(&snapshot.budgets, &snapshot.entries);
        for spend in budgets.iter().filter(|s| s.is_over_budget()) {
            result.add_warning(StockWarning::error(
                spend.name.clone(),
                format!("預算超支：上限 {}，已支出 {}", spend.ceiling, spend.spent),
            ));
        }

        result.total_budget_utilization = BudgetAggregator::total_utilization(&budgets);
        result.balances = balances;
        result.classifications = classifications;
        result.alerts = alerts;
        result.expiring = expiring;
        result.capacity = capacity;
        result.budgets = budgets;
        result.calculation_time_ms = Some(start_time.elapsed().as_millis());

        tracing::info!("庫存對帳完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "提醒 {} 筆，警告 {} 筆",
            result.notification_count(),
            result.warnings.len()
        );

        Ok(result)
    }

    /// 獲取配置引用
    pub fn config(&self) -> &StockConfig {
        &self.config
    }

    /// 獲取分類規則
    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    fn catalogue(&self, snapshot: &StockSnapshot) -> Vec<Product> {
        let known: HashSet<&str> = self.products.iter().map(|p| p.id.as_str()).collect();
        self.products
            .iter()
            .chain(snapshot.products.iter().filter(|p| !known.contains(p.id.as_str())))
            .cloned()
            .collect()
    }
}
