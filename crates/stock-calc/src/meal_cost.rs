//! 餐食成本報表（日/週/月）

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stock_core::{ExitRecord, Result, StockError, TicketSale};

/// 報表期間
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportPeriod {
    Daily,
    /// ISO 週（週一到週日）
    Weekly,
    Monthly,
}

impl ReportPeriod {
    /// 包含 `anchor` 的期間（起訖皆含）
    pub fn range(&self, anchor: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        match self {
            ReportPeriod::Daily => Ok((anchor, anchor)),
            ReportPeriod::Weekly => {
                let monday =
                    anchor - Duration::days(i64::from(anchor.weekday().num_days_from_monday()));
                Ok((monday, monday + Duration::days(6)))
            }
            ReportPeriod::Monthly => {
                let (year, month) = (anchor.year(), anchor.month());
                let (next_year, next_month) = if month == 12 {
                    (year + 1, 1)
                } else {
                    (year, month + 1)
                };
                let first = NaiveDate::from_ymd_opt(year, month, 1);
                let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
                    .and_then(|next| next.pred_opt());
                first
                    .zip(last)
                    .ok_or_else(|| StockError::InvalidDateRange(anchor.to_string()))
            }
        }
    }
}

/// 餐食成本報表
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealCostReport {
    pub period: ReportPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// 材料成本（不含清潔用品）
    pub material_cost: Decimal,
    pub persons_served: u64,
    pub tickets_sold: u64,
    pub ticket_revenue: Decimal,
    pub cost_per_person: Decimal,
    pub cost_per_ticket: Decimal,
    /// 剩餘餐數 = 用餐人數 - 售出餐券（可能為負）
    pub leftover_meals: i64,
}

impl MealCostReport {
    pub fn compute(
        period: ReportPeriod,
        anchor: NaiveDate,
        exits: &[ExitRecord],
        sales: &[TicketSale],
    ) -> Result<Self> {
        let (start_date, end_date) = period.range(anchor)?;
        let in_period = |date: NaiveDate| start_date <= date && date <= end_date;

        let material_cost: Decimal = exits
            .iter()
            .filter(|exit| !exit.cleaning && in_period(exit.date))
            .map(|exit| exit.total_cost)
            .sum();

        let period_sales: Vec<&TicketSale> =
            sales.iter().filter(|sale| in_period(sale.sale_date)).collect();
        let persons_served: u64 = period_sales.iter().map(|s| u64::from(s.persons_served)).sum();
        let tickets_sold: u64 = period_sales.iter().map(|s| u64::from(s.tickets_sold)).sum();
        let ticket_revenue: Decimal = period_sales.iter().map(|s| s.total_price).sum();

        if persons_served == 0 && tickets_sold == 0 && material_cost.is_zero() {
            return Err(StockError::NoReportData(format!("{} ~ {}", start_date, end_date)));
        }

        let per = |count: u64| {
            if count == 0 {
                Decimal::ZERO
            } else {
                material_cost / Decimal::from(count)
            }
        };

        let leftover_meals = i64::try_from(persons_served)
            .unwrap_or(i64::MAX)
            .saturating_sub(i64::try_from(tickets_sold).unwrap_or(i64::MAX));

        Ok(Self {
            period,
            start_date,
            end_date,
            material_cost,
            persons_served,
            tickets_sold,
            ticket_revenue,
            cost_per_person: per(persons_served),
            cost_per_ticket: per(tickets_sold),
            leftover_meals,
        })
    }
}
