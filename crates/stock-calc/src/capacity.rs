//! 招標/直接採購容量追蹤

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use stock_core::{SupplyChannel, SupplyRecord};
use uuid::Uuid;

/// 採購記錄的容量狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CapacityStatus {
    /// 尚未開始
    Scheduled,
    /// 可分配
    Active,
    /// 已分配完
    Exhausted,
    /// 已過期
    Expired,
    /// 已停用
    Inactive,
}

/// 單筆採購記錄的容量摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityState {
    pub supply_id: Uuid,
    pub product_id: String,
    pub channel: SupplyChannel,
    pub status: CapacityStatus,
    pub total_quantity: Decimal,
    pub remaining_quantity: Decimal,
    pub allocated_quantity: Decimal,
    pub total_amount: Decimal,
    /// 是否已增量（與狀態正交）
    pub increased: bool,
    pub increase_percentage: Option<Decimal>,
}

/// 容量追蹤器
pub struct CapacityTracker;

impl CapacityTracker {
    /// 判斷單筆記錄的狀態
    ///
    /// 優先順序：停用 > 過期 > 尚未開始 > 已分配完 > 可分配
    pub fn status(record: &SupplyRecord, today: NaiveDate) -> CapacityStatus {
        if !record.active {
            CapacityStatus::Inactive
        } else if record.is_expired(today) {
            CapacityStatus::Expired
        } else if today < record.start_date {
            CapacityStatus::Scheduled
        } else if record.remaining_quantity <= Decimal::ZERO {
            CapacityStatus::Exhausted
        } else {
            CapacityStatus::Active
        }
    }

    pub fn state(record: &SupplyRecord, today: NaiveDate) -> CapacityState {
        CapacityState {
            supply_id: record.id,
            product_id: record.product_id.clone(),
            channel: record.channel,
            status: Self::status(record, today),
            total_quantity: record.total_quantity,
            remaining_quantity: record.remaining_quantity,
            allocated_quantity: record.allocated_quantity(),
            total_amount: record.total_amount(),
            increased: record.increased,
            increase_percentage: record.increase_percentage,
        }
    }

    /// 彙總所有採購記錄（結轉記錄不參與容量追蹤）
    pub fn summarize(records: &[SupplyRecord], today: NaiveDate) -> Vec<CapacityState> {
        let states: Vec<CapacityState> = records
            .iter()
            .filter(|record| record.channel.is_procurement())
            .map(|record| Self::state(record, today))
            .collect();

        tracing::debug!("容量摘要：{} 筆採購記錄", states.len());
        states
    }

    /// 關閉過期記錄；年度最後一天關閉全部記錄
    ///
    /// 返回本次被停用的記錄ID
    pub fn close_expired(records: &mut [SupplyRecord], today: NaiveDate) -> Vec<Uuid> {
        let fiscal_year_end = today.month() == 12 && today.day() == 31;

        let closed: Vec<Uuid> = records
            .iter_mut()
            .filter(|record| record.active && (fiscal_year_end || record.is_expired(today)))
            .map(|record| {
                record.active = false;
                record.id
            })
            .collect();

        if !closed.is_empty() {
            tracing::info!("{} 停用 {} 筆供應記錄", today, closed.len());
        }

        closed
    }

    /// 新需求可以使用的記錄
    pub fn open_for_product<'a>(
        records: &'a [SupplyRecord],
        product_id: &str,
        today: NaiveDate,
    ) -> Vec<&'a SupplyRecord> {
        records
            .iter()
            .filter(|record| record.product_id == product_id && record.channel.is_procurement())
            .filter(|record| Self::status(record, today) == CapacityStatus::Active)
            .collect()
    }
}
