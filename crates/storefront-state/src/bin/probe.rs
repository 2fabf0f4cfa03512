//! # Storefront Probe
//!
//! Boots a storefront against a backend and prints what it sees. Useful for
//! checking a backend deployment or a config file without a UI.
//!
//! ## Usage
//! ```bash
//! # Probe the backend from the default config
//! cargo run -p storefront-state --bin probe
//!
//! # Use a specific config file
//! cargo run -p storefront-state --bin probe -- --config ./storefront.toml
//!
//! # Override the backend and add products to the cart
//! cargo run -p storefront-state --bin probe -- --backend http://localhost:4000 --add gd46g23h
//! ```
//!
//! `RUST_LOG` controls log output (default: `info,storefront_state=debug`).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use storefront_state::{CatalogSource, Storefront, StorefrontConfig};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront_state=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn print_help() {
    println!("Storefront Probe");
    println!();
    println!("Usage: probe [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>    Config file (default: platform config dir)");
    println!("  -b, --backend <URL>    Backend base URL override");
    println!("  -f, --fixture          Load the catalog from the bundled fixture");
    println!("  -a, --add <ID>         Add one unit of a product (repeatable)");
    println!("  -h, --help             Show this help message");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut backend: Option<String> = None;
    let mut fixture = false;
    let mut add: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--backend" | "-b" => {
                if i + 1 < args.len() {
                    backend = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--fixture" | "-f" => fixture = true,
            "--add" | "-a" => {
                if i + 1 < args.len() {
                    add.push(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    init_tracing();

    let mut config = StorefrontConfig::load(config_path)?;
    if let Some(backend) = backend {
        config.api.base_url = backend;
    }
    if fixture {
        config.catalog.source = CatalogSource::Fixture;
    }
    config.validate()?;

    println!("Storefront Probe");
    println!("================");
    println!("Backend:  {}", config.base_url());
    println!("Catalog:  {}", config.catalog_source());
    println!();

    let store = Storefront::connect(config)?;
    let sync = store.start().await;

    match store.user() {
        Some(user) => println!("✓ Signed in as {} <{}>", user.name, user.email),
        None => println!("• Not signed in"),
    }
    println!("• Seller: {}", if store.is_seller() { "yes" } else { "no" });
    println!("✓ {} products in catalog", store.products().len());

    for product_id in &add {
        store.add_to_cart(product_id);
    }

    println!();
    println!("Cart: {} item(s)", store.cart_count());
    for (product_id, quantity) in store.cart().iter() {
        let name = store
            .find_product(product_id)
            .map(|p| p.name)
            .unwrap_or_else(|| "(unknown product)".to_string());
        println!("  {:>3} × {} [{}]", quantity, name, product_id);
    }
    match store.formatted_cart_amount() {
        Ok(amount) => println!("Total: {}", amount),
        Err(e) => println!("Total: unavailable ({})", e),
    }

    // Give in-flight cart pushes a chance to land before exiting.
    if !add.is_empty() {
        tokio::time::sleep(Duration::from_millis(500)).await;
        let status = sync.status();
        println!();
        println!(
            "Sync: {} pushed, {} ok, {} failed",
            status.pushes_started, status.pushes_succeeded, status.pushes_failed
        );
    }

    sync.shutdown().await?;
    Ok(())
}
