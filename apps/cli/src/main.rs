use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{HttpCatalogTransport, ProductMirror};
use shared::domain::{NewProduct, ProductId};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "catalog", about = "Inspect and edit a running product catalog")]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Print every product.
    List,
    /// Create a product; the server assigns its id.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value_t = 0)]
        stock: i64,
    },
    /// Overwrite the stock of an existing product.
    SetStock { id: i64, stock: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let mirror = ProductMirror::connect(&args.server_url)
        .with_context(|| format!("cannot use server url '{}'", args.server_url))?;
    run(&mirror, args.command).await?;

    println!("{}", serde_json::to_string_pretty(&mirror.products())?);
    Ok(())
}

async fn run(mirror: &ProductMirror<HttpCatalogTransport>, command: Command) -> Result<()> {
    mirror
        .fetch_all()
        .await
        .context("failed to load products")?;

    match command {
        Command::List => {}
        Command::Add { name, price, stock } => {
            let created = mirror
                .add_product(NewProduct::new(name, price, stock))
                .await
                .context("failed to add product")?;
            info!(product_id = %created.id, "created");
        }
        Command::SetStock { id, stock } => {
            mirror
                .update_stock(ProductId(id), stock)
                .await
                .with_context(|| format!("failed to update stock of product {id}"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_default_stock() {
        let args = Args::try_parse_from(["catalog", "add", "--name", "C", "--price", "9.99"])
            .expect("args");
        assert_eq!(args.server_url, "http://127.0.0.1:3000");
        assert_eq!(
            args.command,
            Command::Add {
                name: "C".into(),
                price: 9.99,
                stock: 0,
            }
        );
    }

    #[test]
    fn parses_set_stock_positionals() {
        let args = Args::try_parse_from([
            "catalog",
            "--server-url",
            "http://10.0.0.2:3000",
            "set-stock",
            "3",
            "10",
        ])
        .expect("args");
        assert_eq!(args.server_url, "http://10.0.0.2:3000");
        assert_eq!(args.command, Command::SetStock { id: 3, stock: 10 });
    }

    #[test]
    fn add_requires_a_price() {
        assert!(Args::try_parse_from(["catalog", "add", "--name", "C"]).is_err());
    }
}
