//! 集成測試

use std::sync::Arc;

use chrono::NaiveDate;
use kitchen::model::{LineItem, Order, Product, ProductionStatus};
use kitchen::session::PurgeAllCommand;
use kitchen::{logging, FixedClock, InMemoryStore, ProductionStore, SchedulingSession};
use serde_json::json;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
}

fn tea_shop() -> Arc<InMemoryStore> {
    Arc::new(
        InMemoryStore::new()
            .with_products(vec![
                Product::new(1, "Milk Tea").with_stock(1, 5),
                Product::new(2, "Green Tea").with_stock(5, 0),
                Product::new(3, "Oolong").with_stock(0, 0),
            ])
            .with_orders(vec![
                Order::new(101, date(3)).with_items(vec![
                    LineItem::new("Milk Tea", 3),
                    LineItem::new("Green Tea", 2),
                ]),
                Order::new(102, date(4)).with_items(vec![
                    LineItem::new("milk  tea", 2),
                    LineItem::new("Green Tea", 4),
                ]),
                Order::new(103, date(4)).with_item(LineItem::new("Oolong", 1)),
            ]),
    )
}

async fn open(store: &Arc<InMemoryStore>) -> SchedulingSession {
    logging::init_test();
    let mut session = SchedulingSession::new(store.clone(), Arc::new(FixedClock(date(5))));
    session.refresh().await;
    session
}

#[tokio::test]
async fn test_end_to_end_scheduling() {
    // 場景：11/03 與 11/04 兩天的訂單一起排入 11/05 生產
    let store = tea_shop();
    let mut session = open(&store).await;
    assert_eq!(session.pool().len(), 3);

    session.select(101);
    session.select(102);
    let report = session.preview();

    // Milk Tea: 需求 5，可用 1 → 4；Green Tea: 需求 6，可用 5 → 1；Oolong 未選取 → 0
    assert_eq!(report.requirement("Milk Tea").unwrap().final_required, 4);
    assert_eq!(report.requirement("Green Tea").unwrap().final_required, 1);
    assert_eq!(report.requirement("Oolong").unwrap().final_required, 0);
    assert!(report.requirement("Milk Tea").unwrap().low_stock);

    session.set_manufacturing_date(Some(date(5)));
    session.set_delivery_date(Some(date(6)));
    let receipt = session.commit().await.unwrap();
    assert_eq!(receipt.inserted_products, 2);

    let plan = store.production_plan(date(5)).await.unwrap();
    assert_eq!(plan.quantity_for("Milk Tea"), 4);
    assert_eq!(plan.quantity_for("Green Tea"), 1);
    assert_eq!(plan.quantity_for("Oolong"), 0);
    assert_eq!(plan.delivery_date, Some(date(6)));

    // 已排產的訂單不會再出現在訂單池
    session.refresh_pool().await;
    assert_eq!(session.pool().len(), 1);
    assert!(session.pool().contains(103));
    assert!(session.selection().is_empty());
}

#[tokio::test]
async fn test_daily_scenario_across_window() {
    // 今天 11/10：一筆兩天前的訂單與一筆明天的訂單一起排產
    logging::init_test();
    let today = date(10);
    let store = Arc::new(
        InMemoryStore::new()
            .with_products(vec![
                Product::new(1, "Milk Tea").with_stock(4, 0),
                Product::new(2, "Green Tea").with_stock(0, 0),
            ])
            .with_orders(vec![
                Order::new(1, date(8)).with_item(LineItem::new("Milk Tea", 5)),
                Order::new(2, date(11)).with_items(vec![
                    LineItem::new("Milk Tea", 3),
                    LineItem::new("Green Tea", 2),
                ]),
            ]),
    );
    let mut session = SchedulingSession::new(store.clone(), Arc::new(FixedClock(today)));
    session.refresh().await;
    assert!(session.pool().contains(1));
    assert!(session.pool().contains(2));

    session.select(1);
    session.select(2);
    let report = session.preview();
    assert_eq!(report.requirement("Milk Tea").unwrap().demand, 8);
    assert_eq!(report.requirement("Milk Tea").unwrap().final_required, 4);
    assert_eq!(report.requirement("Green Tea").unwrap().final_required, 2);

    // 奶茶改為 10，差值 6；取消訂單 2 後 base 變 1，仍加上同一個差值
    assert_eq!(session.set_manufacturing_quantity("Milk Tea", 10), 10);
    assert_eq!(session.adjustments().delta("Milk Tea"), 6);
    session.deselect(2);
    let report = session.preview();
    assert_eq!(report.requirement("Milk Tea").unwrap().base_required, 1);
    assert_eq!(report.requirement("Milk Tea").unwrap().final_required, 7);

    session.set_manufacturing_date(Some(today));
    session.set_delivery_date(Some(date(11)));
    session.commit().await.unwrap();
    assert_eq!(
        store.production_plan(today).await.unwrap().quantity_for("Milk Tea"),
        7
    );

    let tracker = session.status_tracker();
    tracker
        .set_status(today, "Milk Tea", ProductionStatus::Completed)
        .await
        .unwrap();
    let lines = tracker.production_list(today).await.unwrap();
    let milk = lines.iter().find(|l| l.product_name == "Milk Tea").unwrap();
    assert_eq!(milk.total_quantity, 7);
    assert_eq!(milk.pending_quantity, 0);
    assert_eq!(milk.completed_quantity, milk.total_quantity);
}

#[tokio::test]
async fn test_manual_adjustment_is_kept_as_delta() {
    let store = tea_shop();
    let mut session = open(&store).await;
    session.select(101);
    session.select(102);

    // base 4 → 10，差值 6
    assert_eq!(session.set_manufacturing_quantity("Milk Tea", 10), 10);

    // 取消 101 後需求 2，base 1 → 1 + 6
    session.deselect(101);
    assert_eq!(
        session.preview().requirement("Milk Tea").unwrap().final_required,
        7
    );

    // 減到 0 以下會停在 0
    for _ in 0..10 {
        session.decrement("Milk Tea");
    }
    let report = session.preview();
    assert_eq!(report.requirement("Milk Tea").unwrap().final_required, 0);
    assert!(report.committable_quantities().contains_key("Milk Tea"));
}

#[tokio::test]
async fn test_production_status_round() {
    let store = tea_shop();
    let mut session = open(&store).await;
    session.select_all_on(date(3));
    session.set_manufacturing_date(Some(date(5)));
    session.set_delivery_date(Some(date(6)));
    session.commit().await.unwrap();

    let tracker = session.status_tracker();
    tracker
        .set_status(date(5), "Milk Tea", ProductionStatus::Completed)
        .await
        .unwrap();

    let lines = tracker.production_list(date(5)).await.unwrap();
    let milk = lines.iter().find(|l| l.product_name == "Milk Tea").unwrap();
    assert_eq!(milk.total_quantity, 2);
    assert_eq!(milk.completed_quantity, 2);
    assert_eq!(milk.pending_quantity, 0);

    let week = tracker.weekly_overview(date(5)).await;
    assert_eq!(week.len(), 7);
    assert_eq!(week[0].completed_quantity, 2);
    assert_eq!(week[1].total_quantity, 0);
}

#[tokio::test]
async fn test_delete_day_and_purge_all() {
    let store = tea_shop();
    let mut session = open(&store).await;

    for (day, order) in [(5, 101), (6, 103)] {
        session.select(order);
        session.set_manufacturing_date(Some(date(day)));
        session.set_delivery_date(Some(date(day + 1)));
        session.commit().await.unwrap();
    }
    store
        .set_production_status(date(5), "Milk Tea", ProductionStatus::Completed)
        .await
        .unwrap();

    session.delete_day(date(5)).await.unwrap();
    assert!(store.production_plan(date(5)).await.unwrap().is_empty());
    assert!(store.production_statuses(date(5)).await.unwrap().is_empty());
    assert!(session.pool().contains(101));
    assert!(!store.production_plan(date(6)).await.unwrap().is_empty());

    let command = PurgeAllCommand::new();
    assert!(session.purge_all(&command, "not the token").await.is_err());
    assert!(!store.production_plan(date(6)).await.unwrap().is_empty());

    session.purge_all(&command, &command.token()).await.unwrap();
    assert!(store.production_plan(date(6)).await.unwrap().is_empty());
    assert!(session.pool().contains(103));
}

#[tokio::test]
async fn test_commit_preconditions_do_not_touch_store() {
    let store = tea_shop();
    let mut session = open(&store).await;
    let calls = store.call_count().await;

    // 未選取訂單
    session.set_manufacturing_date(Some(date(5)));
    session.set_delivery_date(Some(date(6)));
    assert!(session.commit().await.unwrap_err().is_validation());

    // 缺少配送日期
    session.select(101);
    session.set_delivery_date(None);
    assert!(session.commit().await.unwrap_err().is_validation());

    assert_eq!(store.call_count().await, calls);
    assert!(session.selection().is_selected(101));
}

#[tokio::test]
async fn test_shipping_gate_against_store() {
    let store = tea_shop();
    let session = open(&store).await;
    let desk = session.shipping_desk();

    // 101 需要 Milk Tea 3，只有 1
    let check = desk.check(101).await.unwrap();
    assert!(!check.shippable);
    assert_eq!(check.shortages[0].have, 1);
    assert_eq!(check.shortages[0].need, 3);
    assert!(desk.mark_shipped(101).await.is_err());

    store.set_stock("Milk Tea", 3).await;
    desk.mark_shipped(101).await.unwrap();
    assert!(store.order(101).await.unwrap().is_shipped());
}

#[test]
fn test_order_rows_accept_string_and_array_items() {
    let from_string: Order = serde_json::from_value(json!({
        "id": 1,
        "order_date": "2025-11-03",
        "items": "[{\"product_name\": \"Milk Tea\", \"quantity\": 2}]"
    }))
    .unwrap();
    let from_array: Order = serde_json::from_value(json!({
        "id": 2,
        "order_date": "2025-11-03",
        "items": [{"product_name": "Milk Tea", "quantity": 2}]
    }))
    .unwrap();
    let broken: Order = serde_json::from_value(json!({
        "id": 3,
        "order_date": "2025-11-03",
        "items": "not json"
    }))
    .unwrap();

    assert_eq!(from_string.items, from_array.items);
    assert!(broken.items.is_empty());
}
