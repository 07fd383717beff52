//! 供應記錄模型（結轉、直接採購、招標）

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::MAX_INCREASE_PERCENTAGE;
use crate::{Result, StockError};

/// 供應管道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SupplyChannel {
    /// 上年度結轉
    CarryOver,
    /// 直接採購
    DirectProcurement,
    /// 招標
    Tender,
}

impl SupplyChannel {
    /// 是否為採購管道（可被需求分配、可增量）
    pub fn is_procurement(&self) -> bool {
        matches!(self, SupplyChannel::DirectProcurement | SupplyChannel::Tender)
    }
}

/// 供應記錄
///
/// 不變量：`0 <= remaining_quantity <= total_quantity`。
/// 剩餘量只會因需求分配而減少，只會因容量增量而增加。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyRecord {
    /// 記錄ID
    pub id: Uuid,

    /// 產品ID
    pub product_id: String,

    /// 供應管道
    pub channel: SupplyChannel,

    /// 總數量
    pub total_quantity: Decimal,

    /// 剩餘可分配數量
    pub remaining_quantity: Decimal,

    /// 單價
    pub unit_price: Decimal,

    /// 有效期開始
    pub start_date: NaiveDate,

    /// 有效期結束
    pub end_date: NaiveDate,

    /// 供應商
    pub company_name: String,

    /// 是否啟用
    pub active: bool,

    /// 是否已增量
    pub increased: bool,

    /// 最近一次增量百分比
    pub increase_percentage: Option<Decimal>,

    /// 增量前的總數量（增量期間保存，用於更新與取消）
    pub baseline_total: Option<Decimal>,
}

impl SupplyRecord {
    /// 創建新的供應記錄
    pub fn new(
        product_id: String,
        channel: SupplyChannel,
        quantity: Decimal,
        unit_price: Decimal,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            channel,
            total_quantity: quantity,
            remaining_quantity: quantity,
            unit_price,
            start_date,
            end_date,
            company_name: String::new(),
            active: true,
            increased: false,
            increase_percentage: None,
            baseline_total: None,
        }
    }

    /// 建構器模式：設置供應商
    pub fn with_company_name(mut self, company_name: String) -> Self {
        self.company_name = company_name;
        self
    }

    /// 建構器模式：設置剩餘數量（載入已部分分配的記錄）
    pub fn with_remaining(mut self, remaining: Decimal) -> Self {
        self.remaining_quantity = remaining;
        self
    }

    /// 建構器模式：設置為停用
    pub fn as_inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// 已分配數量
    pub fn allocated_quantity(&self) -> Decimal {
        self.total_quantity - self.remaining_quantity
    }

    /// 增量前的總數量
    pub fn pre_increase_total(&self) -> Decimal {
        self.baseline_total.unwrap_or(self.total_quantity)
    }

    /// 總金額（每次依目前總數量重新計算）
    pub fn total_amount(&self) -> Decimal {
        self.unit_price * self.total_quantity
    }

    /// 檢查剩餘數量是否符合不變量
    pub fn is_consistent(&self) -> bool {
        self.remaining_quantity >= Decimal::ZERO && self.remaining_quantity <= self.total_quantity
    }

    /// 是否已過期
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        today > self.end_date
    }

    /// 是否在有效期內
    pub fn is_within_window(&self, today: NaiveDate) -> bool {
        self.start_date <= today && today <= self.end_date
    }

    /// 分配數量（需求核准）
    ///
    /// 失敗時不修改任何狀態
    pub fn allocate(&mut self, quantity: Decimal) -> Result<()> {
        self.ensure_procurement()?;

        if quantity <= Decimal::ZERO {
            return Err(StockError::InvalidQuantity(quantity));
        }

        if quantity > self.remaining_quantity {
            return Err(StockError::InsufficientCapacity {
                supply_id: self.id,
                requested: quantity,
                remaining: self.remaining_quantity,
            });
        }

        self.remaining_quantity -= quantity;
        Ok(())
    }

    /// 容量增量（上限 20%）
    pub fn increase(&mut self, percentage: Decimal) -> Result<()> {
        self.increase_within(percentage, MAX_INCREASE_PERCENTAGE)
    }

    /// 容量增量（自訂上限）
    ///
    /// * 增量以增量前總數量為基準，不疊加
    /// * `percentage = 0` 取消先前的增量
    pub fn increase_within(&mut self, percentage: Decimal, max_percentage: Decimal) -> Result<()> {
        self.ensure_procurement()?;

        if percentage < Decimal::ZERO || percentage > max_percentage {
            return Err(StockError::InvalidIncreasePercentage(percentage));
        }

        let baseline = self.pre_increase_total();
        let current_added = self.total_quantity - baseline;
        let new_added = baseline * percentage / Decimal::ONE_HUNDRED;
        let new_remaining = self.remaining_quantity - current_added + new_added;

        if new_remaining < Decimal::ZERO {
            return Err(StockError::IncreaseAlreadyAllocated {
                supply_id: self.id,
                shortfall: -new_remaining,
            });
        }

        self.total_quantity = baseline + new_added;
        self.remaining_quantity = new_remaining;

        if percentage.is_zero() {
            self.increased = false;
            self.increase_percentage = None;
            self.baseline_total = None;
        } else {
            self.increased = true;
            self.increase_percentage = Some(percentage);
            self.baseline_total = Some(baseline);
        }

        Ok(())
    }

    /// 更新合約條款，保留已消耗數量
    ///
    /// 新剩餘量 = max(0, 新數量 - 已消耗)，增量基準會被重設
    pub fn update_terms(
        &mut self,
        quantity: Decimal,
        unit_price: Decimal,
        start_date: NaiveDate,
        end_date: NaiveDate,
        company_name: String,
    ) -> Result<()> {
        if quantity <= Decimal::ZERO {
            return Err(StockError::InvalidQuantity(quantity));
        }
        if start_date > end_date {
            return Err(StockError::InvalidDateRange(format!(
                "{} > {}",
                start_date, end_date
            )));
        }

        let consumed = self.allocated_quantity();
        self.total_quantity = quantity;
        self.remaining_quantity = (quantity - consumed).max(Decimal::ZERO);
        self.unit_price = unit_price;
        self.start_date = start_date;
        self.end_date = end_date;
        self.company_name = company_name;
        self.increased = false;
        self.increase_percentage = None;
        self.baseline_total = None;

        Ok(())
    }

    fn ensure_procurement(&self) -> Result<()> {
        if self.channel.is_procurement() {
            Ok(())
        } else {
            Err(StockError::UnsupportedChannel(self.channel))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn tender(quantity: i64) -> SupplyRecord {
        SupplyRecord::new(
            "RICE-001".to_string(),
            SupplyChannel::Tender,
            Decimal::from(quantity),
            Decimal::from(45),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        )
    }

    #[test]
    fn test_create_supply_record() {
        let record = tender(100).with_company_name("Anadolu Gıda".to_string());

        assert_eq!(record.total_quantity, Decimal::from(100));
        assert_eq!(record.remaining_quantity, Decimal::from(100));
        assert_eq!(record.total_amount(), Decimal::from(4500));
        assert!(record.active);
        assert!(!record.increased);
        assert!(record.is_consistent());
    }

    #[test]
    fn test_allocate() {
        let mut record = tender(100);

        assert!(record.allocate(Decimal::from(40)).is_ok());
        assert_eq!(record.remaining_quantity, Decimal::from(60));
        assert_eq!(record.allocated_quantity(), Decimal::from(40));

        // 超量分配應該失敗且不修改狀態
        let err = record.allocate(Decimal::from(61)).unwrap_err();
        assert!(matches!(err, StockError::InsufficientCapacity { .. }));
        assert_eq!(record.remaining_quantity, Decimal::from(60));

        // 剛好分配完
        assert!(record.allocate(Decimal::from(60)).is_ok());
        assert_eq!(record.remaining_quantity, Decimal::ZERO);
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    fn test_allocate_rejects_non_positive(#[case] quantity: i64) {
        let mut record = tender(100);
        let err = record.allocate(Decimal::from(quantity)).unwrap_err();
        assert!(matches!(err, StockError::InvalidQuantity(_)));
        assert_eq!(record.remaining_quantity, Decimal::from(100));
    }

    #[test]
    fn test_carry_over_is_not_allocatable() {
        let mut record = tender(100);
        record.channel = SupplyChannel::CarryOver;

        assert!(matches!(
            record.allocate(Decimal::from(1)),
            Err(StockError::UnsupportedChannel(SupplyChannel::CarryOver))
        ));
        assert!(matches!(
            record.increase(Decimal::from(10)),
            Err(StockError::UnsupportedChannel(SupplyChannel::CarryOver))
        ));
    }

    #[test]
    fn test_increase_preserves_allocated_quantity() {
        let mut record = tender(100);
        record.allocate(Decimal::from(30)).unwrap();

        record.increase(Decimal::from(20)).unwrap();

        // 總量 100 -> 120，剩餘 70 + 20 = 90
        assert_eq!(record.total_quantity, Decimal::from(120));
        assert_eq!(record.remaining_quantity, Decimal::from(90));
        assert_eq!(record.allocated_quantity(), Decimal::from(30));
        assert_eq!(record.total_amount(), Decimal::from(5400));
        assert!(record.increased);
        assert_eq!(record.increase_percentage, Some(Decimal::from(20)));
        assert_eq!(record.pre_increase_total(), Decimal::from(100));
    }

    #[rstest]
    #[case(-1)]
    #[case(21)]
    #[case(100)]
    fn test_increase_rejects_out_of_range(#[case] percentage: i64) {
        let mut record = tender(100);
        let before = record.clone();

        let err = record.increase(Decimal::from(percentage)).unwrap_err();
        assert!(matches!(err, StockError::InvalidIncreasePercentage(_)));
        assert_eq!(record, before);
    }

    #[test]
    fn test_increase_replaces_previous_increase() {
        let mut record = tender(200);
        record.increase(Decimal::from(5)).unwrap();
        record.increase(Decimal::from(10)).unwrap();

        assert_eq!(record.total_quantity, Decimal::from(220));
        assert_eq!(record.remaining_quantity, Decimal::from(220));
        assert_eq!(record.increase_percentage, Some(Decimal::from(10)));
    }

    #[test]
    fn test_cancel_increase() {
        let mut record = tender(100);
        record.allocate(Decimal::from(10)).unwrap();
        record.increase(Decimal::from(15)).unwrap();
        record.increase(Decimal::ZERO).unwrap();

        assert_eq!(record.total_quantity, Decimal::from(100));
        assert_eq!(record.remaining_quantity, Decimal::from(90));
        assert!(!record.increased);
        assert_eq!(record.increase_percentage, None);
        assert_eq!(record.baseline_total, None);
    }

    #[test]
    fn test_cancel_fails_when_increase_is_consumed() {
        let mut record = tender(100);
        record.increase(Decimal::from(20)).unwrap();
        record.allocate(Decimal::from(110)).unwrap();
        let before = record.clone();

        let err = record.increase(Decimal::ZERO).unwrap_err();
        match err {
            StockError::IncreaseAlreadyAllocated { shortfall, .. } => {
                assert_eq!(shortfall, Decimal::from(10));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(record, before);
    }

    #[test]
    fn test_update_terms_keeps_consumed() {
        let mut record = tender(100);
        record.allocate(Decimal::from(70)).unwrap();

        record
            .update_terms(
                Decimal::from(150),
                Decimal::from(50),
                NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 11, 30).unwrap(),
                "Yeni Firma".to_string(),
            )
            .unwrap();
        assert_eq!(record.remaining_quantity, Decimal::from(80));
        assert_eq!(record.total_amount(), Decimal::from(7500));

        // 新數量小於已消耗：剩餘歸零
        record
            .update_terms(
                Decimal::from(50),
                Decimal::from(50),
                NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 11, 30).unwrap(),
                "Yeni Firma".to_string(),
            )
            .unwrap();
        assert_eq!(record.remaining_quantity, Decimal::ZERO);
    }

    #[test]
    fn test_update_terms_rejects_inverted_window() {
        let mut record = tender(100);
        let err = record
            .update_terms(
                Decimal::from(100),
                Decimal::from(50),
                NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                String::new(),
            )
            .unwrap_err();
        assert!(matches!(err, StockError::InvalidDateRange(_)));
    }

    proptest! {
        #[test]
        fn prop_increase_then_cancel_restores(
            total in 1i64..100_000,
            allocated_share in 0i64..=100,
            pct_cents in 1i64..=2_000,
        ) {
            let mut record = tender(total);
            let allocated = Decimal::from(total) * Decimal::from(allocated_share) / Decimal::ONE_HUNDRED;
            if allocated > Decimal::ZERO {
                record.allocate(allocated).unwrap();
            }
            let before = record.clone();

            record.increase(Decimal::new(pct_cents, 2)).unwrap();
            record.increase(Decimal::ZERO).unwrap();

            prop_assert_eq!(record.total_quantity, before.total_quantity);
            prop_assert_eq!(record.remaining_quantity, before.remaining_quantity);
            prop_assert!(!record.increased);
        }

        #[test]
        fn prop_increase_replaces_not_compounds(
            total in 1i64..100_000,
            first in 1i64..=20,
            second in 1i64..=20,
        ) {
            let mut twice = tender(total);
            twice.increase(Decimal::from(first)).unwrap();
            twice.increase(Decimal::from(second)).unwrap();

            let mut once = tender(total);
            once.increase(Decimal::from(second)).unwrap();

            prop_assert_eq!(twice.total_quantity, once.total_quantity);
            prop_assert_eq!(twice.remaining_quantity, once.remaining_quantity);
            prop_assert_eq!(twice.baseline_total, once.baseline_total);
        }

        #[test]
        fn prop_failed_allocation_does_not_mutate(
            total in 1i64..10_000,
            extra in 1i64..10_000,
            attempts in 1usize..5,
        ) {
            let mut record = tender(total);
            let before = record.clone();
            for _ in 0..attempts {
                prop_assert!(record.allocate(Decimal::from(total + extra)).is_err());
            }
            prop_assert_eq!(record, before);
        }
    }
}
