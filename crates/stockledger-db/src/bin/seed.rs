//! # Seed Data Generator
//!
//! Fills a development database with a catalog and a little sales history.
//!
//! ## Usage
//! ```bash
//! # 200 products, 25 sales (defaults)
//! cargo run -p stockledger-db --bin seed
//!
//! # Custom amounts
//! cargo run -p stockledger-db --bin seed -- --count 1000 --sales 100
//!
//! # Specify database path
//! cargo run -p stockledger-db --bin seed -- --db ./data/stockledger.db
//! ```
//!
//! Products are named `{item} {size}`, priced 1.99 to 9.99 plus a size
//! addon, with 0 to 50 units in stock. Sales go through the Inventory
//! Service, so every sold unit also lands in the sales ledger.

use std::env;

use stockledger_core::{BillItemRequest, CoreError, Money, Product, Rate, DEFAULT_TAX_RATE_BPS};
use stockledger_db::{Database, DbConfig, DbError};

const ITEMS: &[&str] = &[
    "Mineral Water",
    "Orange Juice",
    "Iced Tea",
    "Coffee Beans",
    "Green Tea",
    "Potato Chips",
    "Salted Pretzels",
    "Chocolate Bar",
    "Oat Cookies",
    "Gummy Bears",
    "Whole Milk",
    "Greek Yogurt",
    "Cheddar",
    "Butter",
    "Eggs",
    "White Bread",
    "Spaghetti",
    "Basmati Rice",
    "Canned Tomatoes",
    "Peanut Butter",
];

/// Size name and price addon in cents.
const SIZES: &[(&str, i64)] = &[
    ("Small", 0),
    ("Medium", 100),
    ("Large", 200),
    ("Family", 350),
    ("Multipack", 500),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut sales: usize = 25;
    let mut db_path = String::from("./stockledger_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(count);
                    i += 1;
                }
            }
            "--sales" | "-s" => {
                if i + 1 < args.len() {
                    sales = args[i + 1].parse().unwrap_or(sales);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("StockLedger Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -s, --sales <N>    Number of bills to record (default: 25)");
                println!("  -d, --db <PATH>    Database file path (default: ./stockledger_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("StockLedger Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!("Bills:    {}", sales);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let inventory = db.inventory();
    let start = std::time::Instant::now();

    let mut catalog: Vec<Product> = Vec::with_capacity(count);
    for seed in 0..count {
        let item = ITEMS[seed % ITEMS.len()];
        let (size, addon) = SIZES[(seed / ITEMS.len()) % SIZES.len()];
        let batch = seed / (ITEMS.len() * SIZES.len());

        let name = if batch == 0 {
            format!("{item} {size}")
        } else {
            format!("{item} {size} #{}", batch + 1)
        };
        let price = Money::from_cents(199 + ((seed * 17) % 800) as i64 + addon);
        let quantity = (seed % 51) as i64;

        match inventory.add_product(&name, price, quantity).await {
            Ok(product) => catalog.push(product),
            Err(e) => eprintln!("Failed to insert {}: {}", name, e),
        }
    }
    println!("✓ Generated {} products in {:?}", catalog.len(), start.elapsed());

    let tax_rate = Rate::from_bps(DEFAULT_TAX_RATE_BPS);
    let in_stock: Vec<&Product> = catalog.iter().filter(|p| p.quantity > 0).collect();
    let mut recorded = 0;

    for n in 0..sales {
        if in_stock.is_empty() {
            break;
        }
        let items: Vec<BillItemRequest> = (0..1 + n % 3)
            .map(|k| {
                let product = in_stock[(n * 7 + k * 13) % in_stock.len()];
                BillItemRequest {
                    product_id: product.id,
                    product_name: product.name.clone(),
                    quantity: 1,
                    price_per_item: product.price(),
                }
            })
            .collect();

        match inventory.create_bill(&items, tax_rate, Rate::zero()).await {
            Ok(_) => recorded += 1,
            // A product drawn twice can run dry; skip that bill.
            Err(DbError::Domain(CoreError::InsufficientStock { .. })) => {}
            Err(e) => return Err(e.into()),
        }
    }
    println!("✓ Recorded {} bills", recorded);

    let ledger = db.ledger().count().await?;
    println!("  Sales ledger entries: {}", ledger);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
