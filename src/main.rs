//! 排產操作命令列
//!
//! # 用法
//!
//! ```bash
//! # 未排產訂單池
//! kitchen pool
//!
//! # 預覽 11/03 全部訂單加上訂單 42 的淨需求，並把奶茶改為 10
//! kitchen preview --date 2025-11-03 --order 42 --set "Milk Tea=10"
//!
//! # 確認排產
//! kitchen commit --date 2025-11-03 --manufacturing-date 2025-11-04 --delivery-date 2025-11-05
//!
//! # 生產清單與週概況
//! kitchen production 2025-11-04
//! kitchen overview 2025-11-03
//! ```
//!
//! 環境變數：`KITCHEN_PROFILE`（local / hosted）、`KITCHEN_API_URL`、`RUST_LOG`。

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use kitchen::calc::NettingReport;
use kitchen::model::calendar::parse_date;
use kitchen::model::{ClientConfig, LineItem, OrderId, ProductionStatus, SystemClock};
use kitchen::session::{PurgeAllCommand, SchedulingSession};
use kitchen::{logging, HttpStore};
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(name = "kitchen")]
#[command(author, version, about = "每日排產工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 列出未排產訂單池與訂單日曆
    Pool,
    /// 預覽淨需求
    Preview(SelectionArgs),
    /// 確認排產
    Commit {
        #[command(flatten)]
        selection: SelectionArgs,

        /// 生產日期
        #[arg(long, value_parser = parse_date)]
        manufacturing_date: Option<NaiveDate>,

        /// 配送日期
        #[arg(long, value_parser = parse_date)]
        delivery_date: Option<NaiveDate>,
    },
    /// 顯示指定生產日期的計劃
    Plan {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    /// 顯示指定生產日期的生產清單
    Production {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    /// 更新生產狀態
    Status {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        product: String,
        /// pending 或 completed
        status: ProductionStatus,
    },
    /// 七天生產概況（預設從今天開始）
    Overview {
        #[arg(value_parser = parse_date)]
        start: Option<NaiveDate>,
    },
    /// 刪除指定生產日期的計劃
    DeleteDay {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    /// 刪除所有計劃（需輸入確認碼）
    PurgeAll,
    /// 檢查訂單能否出貨
    CanShip { order_id: OrderId },
    /// 標記訂單已出貨
    Ship { order_id: OrderId },
    /// 將訂單改回待出貨
    Unship { order_id: OrderId },
}

#[derive(Args)]
struct SelectionArgs {
    /// 選取指定日期的所有訂單（可重複）
    #[arg(long = "date", value_parser = parse_date)]
    dates: Vec<NaiveDate>,

    /// 選取指定訂單（可重複）
    #[arg(long = "order")]
    orders: Vec<OrderId>,

    /// 手動指定生產數量，格式 `產品=數量`（可重複）
    #[arg(long = "set", value_parser = parse_assignment)]
    assignments: Vec<(String, i64)>,
}

fn parse_assignment(raw: &str) -> Result<(String, i64), String> {
    let (name, quantity) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("格式應為 產品=數量: {raw}"))?;
    let quantity = quantity
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("無效的數量 `{quantity}`: {e}"))?;
    Ok((name.trim().to_string(), quantity))
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("執行失敗: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ClientConfig::from_env().context("讀取 API 設定失敗")?;
    tracing::debug!(profile = %config.profile, base_url = %config.base_url, "API 設定");

    let store = Arc::new(HttpStore::new(config));
    let mut session = SchedulingSession::new(store, Arc::new(SystemClock));

    match cli.command {
        Commands::Pool => {
            session.refresh_pool().await;
            print_pool(&session);
            for count in session.order_counts().await {
                println!("{}  {} 筆", count.date, count.count);
            }
        }
        Commands::Preview(selection) => {
            prepare(&mut session, &selection).await?;
            print_report(&session.preview());
        }
        Commands::Commit {
            selection,
            manufacturing_date,
            delivery_date,
        } => {
            prepare(&mut session, &selection).await?;
            session.set_manufacturing_date(manufacturing_date);
            session.set_delivery_date(delivery_date);
            print_report(&session.preview());

            let receipt = session.commit().await?;
            println!(
                "已確認排產：{} 項產品（排程 {}）",
                receipt.inserted_products,
                receipt
                    .schedule_id
                    .map_or_else(|| "-".to_string(), |id| id.to_string())
            );
        }
        Commands::Plan { date } => {
            let plan = session.status_tracker().plan(date).await?;
            match plan.delivery_date {
                Some(delivery) => println!("生產日期 {date}，配送日期 {delivery}"),
                None => println!("生產日期 {date}"),
            }
            for entry in &plan.entries {
                println!("  {:<24} {:>6}", entry.product_name, entry.scheduled_quantity);
            }
            println!("  合計 {}", plan.total_quantity());
        }
        Commands::Production { date } => {
            let lines = session.status_tracker().production_list(date).await?;
            println!("{:<24} {:>6} {:>6} {:>6}", "產品", "總數", "待生產", "已完成");
            for line in lines {
                println!(
                    "{:<24} {:>6} {:>6} {:>6}",
                    line.product_name, line.total_quantity, line.pending_quantity, line.completed_quantity
                );
            }
        }
        Commands::Status {
            date,
            product,
            status,
        } => {
            session
                .status_tracker()
                .set_status(date, &product, status)
                .await?;
        }
        Commands::Overview { start } => {
            let start = start.unwrap_or_else(|| session.today());
            for day in session.status_tracker().weekly_overview(start).await {
                let mark = if day.is_finished() { "✓" } else { " " };
                println!(
                    "{} {} {} 項產品，{}/{} 已完成",
                    mark, day.date, day.product_count, day.completed_quantity, day.total_quantity
                );
            }
        }
        Commands::DeleteDay { date } => {
            session.delete_day(date).await?;
            println!("已刪除 {date} 的生產計劃");
        }
        Commands::PurgeAll => {
            let command = PurgeAllCommand::new();
            println!("此操作會刪除所有生產計劃與生產狀態。");
            println!("請輸入確認碼以繼續：{}", command.token());
            print!("> ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().lock().read_line(&mut input)?;
            let deleted = session.purge_all(&command, &input).await?;
            println!("已刪除 {deleted} 筆");
        }
        Commands::CanShip { order_id } => {
            let check = session.shipping_desk().check(order_id).await?;
            let verdict = if check.shippable { "可以出貨" } else { "不可出貨" };
            println!("訂單 {order_id}：{verdict}，{}", check.reason());
        }
        Commands::Ship { order_id } => {
            session.shipping_desk().mark_shipped(order_id).await?;
            println!("訂單 {order_id} 已出貨");
        }
        Commands::Unship { order_id } => {
            session.shipping_desk().mark_pending(order_id).await?;
            println!("訂單 {order_id} 已改回待出貨");
        }
    }

    Ok(())
}

/// 載入資料並套用選取與手動數量
async fn prepare(session: &mut SchedulingSession, args: &SelectionArgs) -> anyhow::Result<()> {
    session.refresh().await;

    for &date in &args.dates {
        session.select_all_on(date);
    }
    for &id in &args.orders {
        if !session.pool().contains(id) {
            bail!("訂單 {id} 不在未排產訂單池中");
        }
        session.select(id);
    }
    for (product, quantity) in &args.assignments {
        session.set_manufacturing_quantity(product, *quantity);
    }
    Ok(())
}

fn print_pool(session: &SchedulingSession) {
    for day in session.pool().days() {
        if day.failed {
            println!("{}  （讀取失敗）", day.date);
            continue;
        }
        if day.orders.is_empty() {
            continue;
        }
        println!("{}", day.date);
        for order in &day.orders {
            let amount: Decimal = order.items.iter().map(LineItem::subtotal).sum();
            println!(
                "  #{:<6} {:<16} {:>4} 件  {}",
                order.id,
                order.customer_name.as_deref().unwrap_or("-"),
                order.total_quantity(),
                amount
            );
        }
    }
}

fn print_report(report: &NettingReport) {
    println!(
        "{:<24} {:>6} {:>6} {:>6} {:>6} {:>6}",
        "產品", "需求", "可用", "基礎", "調整", "生產"
    );
    for r in &report.requirements {
        let flag = if r.low_stock { " (低庫存)" } else { "" };
        println!(
            "{:<24} {:>6} {:>6} {:>6} {:>+6} {:>6}{}",
            r.product_name, r.demand, r.available, r.base_required, r.adjustment, r.final_required, flag
        );
    }
    for warning in &report.warnings {
        println!("! {}: {}", warning.product_name, warning.message);
    }
    println!("合計生產 {}", report.total_to_manufacture());
}
