//! 集成測試

use chrono::NaiveDate;
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use stockrecon::calc::{
    CapacityStatus, CapacityTracker, DemandApproval, FifoCosting, LedgerAggregator,
    MealCostReport, ProcurementBook, ReportPeriod, StockStatus, StockValuation, YearEndTransfer,
};
use stockrecon::model::{
    Budget, DemandStatus, ExitRecord, MaterialDemand, MaterialEntry, PolicyKind, Product,
    SupplyChannel, SupplyRecord, TicketSale,
};
use stockrecon::{IncrementalLedger, StockCalculator, StockConfig, StockError, StockSnapshot};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, m, d).unwrap()
}

fn supply(product_id: &str, channel: SupplyChannel, quantity: i64, price: i64) -> SupplyRecord {
    SupplyRecord::new(
        product_id.to_string(),
        channel,
        Decimal::from(quantity),
        Decimal::from(price),
        date(1, 1),
        date(12, 31),
    )
}

#[test]
fn test_end_to_end_reconciliation() {
    init_tracing();

    // 產品 P：臨界量 20；結轉 10、招標 15、無直接採購；之後出庫 12
    let product = Product::new("P".to_string(), "Pirinç".to_string())
        .with_unit("kg".to_string())
        .with_critical_level(Decimal::from(20));
    let snapshot = StockSnapshot {
        products: vec![product.clone()],
        supplies: vec![
            supply("P", SupplyChannel::CarryOver, 10, 30),
            supply("P", SupplyChannel::Tender, 15, 32),
        ],
        exits: vec![ExitRecord::new("P".to_string(), Decimal::from(12), date(2, 10))],
        ..StockSnapshot::default()
    };

    let calculator = StockCalculator::new(vec![product], StockConfig::default());
    let result = calculator.calculate(&snapshot, date(2, 11)).unwrap();

    let balance = &result.balances[0];
    assert_eq!(balance.total_carry_over, Decimal::from(10));
    assert_eq!(balance.total_tender, Decimal::from(15));
    assert_eq!(balance.total_direct_procurement, Decimal::ZERO);
    assert_eq!(balance.total_received, Decimal::from(25));
    assert_eq!(balance.total_exit, Decimal::from(12));
    assert_eq!(balance.remaining, Decimal::from(13));
    assert_eq!(balance.stock_percentage, Some(Decimal::from(65)));

    // 13 <= 20 但 > 10
    assert_eq!(result.classifications[0].status, StockStatus::NearCritical);
    assert_eq!(result.alerts.len(), 1);
    let message = &result.alerts[0].message;
    assert!(message.contains("Pirinç"), "{message}");
    assert!(message.contains("13"), "{message}");
    assert!(message.contains("20"), "{message}");
    assert_eq!(result.notification_count(), 1);
    assert!(!result.has_errors());
}

#[test]
fn test_reconciliation_from_json() -> anyhow::Result<()> {
    init_tracing();

    let raw = serde_json::json!({
        "products": [
            {"id": "OIL-001", "name": "Ayçiçek Yağı", "category": "Yağlar", "unit": "lt",
             "critical_level": "50", "vat_rate": "0.01"},
            {"id": "SALT-001", "name": "Tuz", "category": "Baharat", "unit": "kg",
             "critical_level": null, "vat_rate": "0.01"}
        ],
        "supplies": [
            {"id": "6a3a3f8e-0d55-4a55-9f7e-6f1f3b8b7b01", "product_id": "OIL-001",
             "channel": "Tender", "total_quantity": "120", "remaining_quantity": "70",
             "unit_price": "85.50", "start_date": "2025-01-01", "end_date": "2025-12-31",
             "company_name": "Marmara Yağ", "active": true, "increased": false,
             "increase_percentage": null, "baseline_total": null}
        ],
        "exits": [
            {"id": "0b6f3f0e-4a57-4a53-9d0b-0f3c1c0a7c11", "product_id": "OIL-001",
             "quantity": "45", "date": "2025-05-02"},
            {"id": "0b6f3f0e-4a57-4a53-9d0b-0f3c1c0a7c12", "product_id": "SALT-001",
             "quantity": "2", "date": "2025-05-02"}
        ]
    })
    .to_string();

    let config = StockConfig::from_json(r#"{"policy": "StockStatus", "parallel": true}"#)?;
    let snapshot = StockSnapshot::from_json(&raw)?;
    let result = StockCalculator::new(Vec::new(), config).calculate(&snapshot, date(5, 3))?;

    let oil = result
        .classifications
        .iter()
        .find(|c| c.product_id == "OIL-001")
        .ok_or_else(|| anyhow::anyhow!("OIL-001 missing"))?;
    // 75 不小於 50，但小於 150
    assert_eq!(oil.remaining, Decimal::from(75));
    assert_eq!(oil.status, StockStatus::NearCritical);

    let salt = result
        .classifications
        .iter()
        .find(|c| c.product_id == "SALT-001")
        .ok_or_else(|| anyhow::anyhow!("SALT-001 missing"))?;
    assert_eq!(salt.status, StockStatus::Undefined);

    // 超量出庫只產生警告，剩餘量保留負號
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].subject, "SALT-001");
    assert_eq!(result.capacity[0].allocated_quantity, Decimal::from(50));

    let json = serde_json::to_value(&result)?;
    assert!(json["balances"].is_array());
    Ok(())
}

#[test]
fn test_demand_approval_workflow() {
    init_tracing();

    let tender = supply("MEAT-001", SupplyChannel::Tender, 100, 320);
    let tender_id = tender.id;
    let book = ProcurementBook::new(vec![tender]);

    // 1. 核准 60
    let mut first = MaterialDemand::new("MEAT-001".to_string(), Decimal::from(60), tender_id);
    book.approve(&mut first, None).unwrap();
    assert_eq!(first.status, DemandStatus::Approved);

    // 2. 剩餘 40，申請 50 失敗
    let mut second = MaterialDemand::new("MEAT-001".to_string(), Decimal::from(50), tender_id);
    let err = book.approve(&mut second, None).unwrap_err();
    assert!(matches!(err, StockError::InsufficientCapacity { .. }));
    assert!(second.is_pending());

    // 3. 增量 20%：總量 120，剩餘 60，已分配不變
    let increased = book.increase(tender_id, Decimal::from(20)).unwrap();
    assert_eq!(increased.total_quantity, Decimal::from(120));
    assert_eq!(increased.remaining_quantity, Decimal::from(60));
    assert_eq!(increased.total_amount(), Decimal::from(38400));

    // 4. 現在可以核准 50
    book.approve(&mut second, None).unwrap();
    assert_eq!(book.record(tender_id).unwrap().remaining_quantity, Decimal::from(10));

    // 5. 增量已被使用，不能取消
    let err = book.increase(tender_id, Decimal::ZERO).unwrap_err();
    assert!(matches!(err, StockError::IncreaseAlreadyAllocated { .. }));
    assert_eq!(book.record(tender_id).unwrap().total_quantity, Decimal::from(120));

    // 6. 拒絕不影響容量
    let mut third = MaterialDemand::new("MEAT-001".to_string(), Decimal::from(5), tender_id);
    DemandApproval::reject(&mut third, "stok yeterli".to_string()).unwrap();
    assert_eq!(book.record(tender_id).unwrap().remaining_quantity, Decimal::from(10));
}

#[test]
fn test_capacity_over_fiscal_year() {
    let mut records = vec![
        supply("FISH-001", SupplyChannel::DirectProcurement, 40, 210),
        supply("FISH-001", SupplyChannel::Tender, 200, 190),
    ];
    records[0].end_date = date(6, 30);

    let states = CapacityTracker::summarize(&records, date(7, 15));
    assert_eq!(states[0].status, CapacityStatus::Expired);
    assert_eq!(states[1].status, CapacityStatus::Active);
    assert_eq!(
        CapacityTracker::open_for_product(&records, "FISH-001", date(7, 15)).len(),
        1
    );

    let closed = CapacityTracker::close_expired(&mut records, date(12, 31));
    assert_eq!(closed.len(), 2);
    let states = CapacityTracker::summarize(&records, date(12, 31));
    assert!(states.iter().all(|s| s.status == CapacityStatus::Inactive));
}

#[test]
fn test_warehouse_day() {
    init_tracing();

    let today = date(3, 12);
    let budget = Budget::new("Gıda 2025".to_string(), Decimal::from(10_000), date(1, 1), date(12, 31));
    let mut entries = vec![
        MaterialEntry::new(
            "BREAD-001".to_string(),
            SupplyChannel::Tender,
            Decimal::from(100),
            Decimal::from(10),
            Decimal::new(1, 2),
            date(3, 1),
        )
        .with_budget_id(budget.id)
        .with_expiry_date(date(3, 20)),
        MaterialEntry::new(
            "SOAP-001".to_string(),
            SupplyChannel::DirectProcurement,
            Decimal::from(20),
            Decimal::from(25),
            Decimal::new(2, 1),
            date(3, 1),
        )
        .with_budget_id(budget.id),
    ];

    // 出庫：FIFO 成本，清潔用品不計入餐食成本
    let bread = FifoCosting::exit_record(&mut entries, "BREAD-001", Decimal::from(40), today).unwrap();
    let soap = FifoCosting::exit_record(&mut entries, "SOAP-001", Decimal::from(2), today)
        .unwrap()
        .as_cleaning();
    assert_eq!(bread.total_cost, Decimal::new(404, 0));
    assert_eq!(soap.total_cost, Decimal::from(60));

    let sales = vec![TicketSale::new(today, "Öğrenci".to_string(), 95, 101, Decimal::from(1900))];
    let report =
        MealCostReport::compute(ReportPeriod::Daily, today, &[bread.clone(), soap.clone()], &sales)
            .unwrap();
    assert_eq!(report.material_cost, Decimal::from(404));
    assert_eq!(report.cost_per_person, Decimal::from(4));
    assert_eq!(report.leftover_meals, 6);

    assert_eq!(StockValuation::total_value(&entries), Decimal::from(1050));

    let products = vec![
        Product::new("BREAD-001".to_string(), "Ekmek".to_string())
            .with_critical_level(Decimal::from(30)),
        Product::new("SOAP-001".to_string(), "Sabun".to_string()),
    ];
    let snapshot = StockSnapshot {
        products: products.clone(),
        supplies: vec![
            supply("BREAD-001", SupplyChannel::Tender, 100, 10),
            supply("SOAP-001", SupplyChannel::DirectProcurement, 20, 25),
        ],
        exits: vec![bread, soap],
        budgets: vec![budget],
        entries,
        ..StockSnapshot::default()
    };

    let result = StockCalculator::new(products, StockConfig::default())
        .calculate(&snapshot, today)
        .unwrap();

    assert_eq!(result.expiring.len(), 1);
    assert_eq!(result.expiring[0].days_left, 8);
    assert_eq!(result.budgets[0].spent, Decimal::from(1610));
    assert_eq!(result.notification_count(), 1);

    // 年底結轉剩餘庫存
    let carried = YearEndTransfer::carry_over(&result.balances, &snapshot.entries, 2025).unwrap();
    assert_eq!(carried.len(), 2);
    assert!(carried.iter().all(|r| r.channel == SupplyChannel::CarryOver));
    assert_eq!(carried[0].total_quantity, Decimal::from(60));
    assert_eq!(carried[0].unit_price, Decimal::from(10));
}

#[rstest]
#[case(PolicyKind::Dashboard, 100, StockStatus::NearCritical)]
#[case(PolicyKind::Dashboard, 50, StockStatus::Critical)]
#[case(PolicyKind::Dashboard, 101, StockStatus::Normal)]
#[case(PolicyKind::StockStatus, 100, StockStatus::NearCritical)]
#[case(PolicyKind::StockStatus, 99, StockStatus::Critical)]
#[case(PolicyKind::StockStatus, 200, StockStatus::Normal)]
fn test_policy_selection(
    #[case] policy: PolicyKind,
    #[case] received: i64,
    #[case] expected: StockStatus,
) {
    let product = Product::new("X".to_string(), "Un".to_string())
        .with_critical_level(Decimal::from(100));
    let snapshot = StockSnapshot {
        products: vec![product.clone()],
        supplies: vec![supply("X", SupplyChannel::Tender, received, 1)],
        ..StockSnapshot::default()
    };

    let result = StockCalculator::new(vec![product], StockConfig::default().with_policy(policy))
        .calculate(&snapshot, date(6, 1))
        .unwrap();

    assert_eq!(result.classifications[0].status, expected);
}

#[test]
fn test_incremental_ledger_follows_snapshot() {
    let mut supplies = vec![
        supply("A", SupplyChannel::Tender, 50, 1),
        supply("B", SupplyChannel::CarryOver, 5, 1),
    ];
    let exits = vec![ExitRecord::new("A".to_string(), Decimal::from(7), date(2, 2))];
    let mut ledger = IncrementalLedger::from_records(supplies.clone(), exits.clone());
    assert_eq!(ledger.balances(), LedgerAggregator::aggregate(&supplies, &exits));

    supplies[0].increase(Decimal::from(10)).unwrap();
    ledger.upsert_supply(supplies[0].clone());
    assert_eq!(ledger.balances(), LedgerAggregator::aggregate(&supplies, &exits));
    assert_eq!(ledger.last_recomputed(), 1);
}

proptest! {
    #[test]
    fn prop_allocation_monotonic(
        total in 1i64..10_000,
        requests in prop::collection::vec(1i64..3_000, 1..20),
    ) {
        let record = supply("Z", SupplyChannel::DirectProcurement, total, 1);
        let id = record.id;
        let book = ProcurementBook::new(vec![record]);

        for request in requests {
            let before = book.record(id).unwrap().remaining_quantity;
            let quantity = Decimal::from(request);
            match book.allocate(id, quantity) {
                Ok(()) => {
                    prop_assert_eq!(book.record(id).unwrap().remaining_quantity, before - quantity);
                }
                Err(_) => {
                    prop_assert!(quantity > before);
                    prop_assert_eq!(book.record(id).unwrap().remaining_quantity, before);
                }
            }
            prop_assert!(book.record(id).unwrap().is_consistent());
        }
    }
}
