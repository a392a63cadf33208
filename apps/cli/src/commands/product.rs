//! Catalog management commands.

use smartmart_core::inventory::ProductPatch;
use smartmart_core::types::Product;
use smartmart_store::{csv, StoreResult};

use crate::args::ProductCommand;
use crate::commands::Context;

pub fn run(ctx: &Context, cmd: ProductCommand) -> StoreResult<()> {
    match cmd {
        ProductCommand::Add {
            name,
            category,
            quantity,
            price,
            supplier,
            barcode,
        } => {
            let mut state = ctx.load_state()?;
            let id = state.inventory.add(
                &name,
                &category,
                quantity,
                price,
                &supplier,
                barcode.as_deref(),
            )?;
            ctx.store.commit(&state)?;
            println!("added product #{id}: {name}");
            Ok(())
        }

        ProductCommand::Update {
            product_id,
            name,
            category,
            quantity,
            price,
            supplier,
            barcode,
        } => {
            let mut state = ctx.load_state()?;
            state.inventory.update(
                product_id,
                ProductPatch {
                    name,
                    category,
                    quantity,
                    price_cents: price.map(|p| p.cents()),
                    supplier,
                    barcode,
                },
            )?;
            ctx.store.commit(&state)?;
            println!("updated product #{product_id}");
            Ok(())
        }

        ProductCommand::Delete { product_id } => {
            let mut state = ctx.load_state()?;
            let removed = state.inventory.delete(product_id)?;
            ctx.store.commit(&state)?;
            println!("deleted product #{product_id}: {}", removed.name);
            Ok(())
        }

        ProductCommand::List { query } => {
            let state = ctx.load_state()?;
            let products: Vec<&Product> = match &query {
                Some(q) => state.inventory.search(q),
                None => state.inventory.products().iter().collect(),
            };
            print_table(&products);
            Ok(())
        }

        ProductCommand::LowStock { threshold } => {
            let state = ctx.load_state()?;
            let products = state.inventory.low_stock(threshold);
            if products.is_empty() {
                println!("no products at or below {threshold}");
            } else {
                print_table(&products);
            }
            Ok(())
        }

        ProductCommand::Import { file } => {
            ctx.require_admin("import the product catalog")?;
            let mut state = ctx.load_state()?;
            let count = csv::import_products_from_path(&mut state.inventory, &file)?;
            ctx.store.commit(&state)?;
            println!("imported {count} products from {}", file.display());
            Ok(())
        }

        ProductCommand::Export { file } => {
            let state = ctx.load_state()?;
            csv::export_products_to_path(&state.inventory, &file)?;
            println!(
                "exported {} products to {}",
                state.inventory.len(),
                file.display()
            );
            Ok(())
        }
    }
}

fn print_table(products: &[&Product]) {
    println!(
        "{:>5}  {:<30} {:<12} {:>6} {:>10}  {:<20} {:<12}",
        "ID", "Name", "Category", "Qty", "Price", "Supplier", "Barcode"
    );
    for p in products {
        println!(
            "{:>5}  {:<30} {:<12} {:>6} {:>10}  {:<20} {:<12}",
            p.product_id,
            truncate(&p.name, 30),
            truncate(&p.category, 12),
            p.quantity,
            p.price().to_decimal_string(),
            truncate(&p.supplier, 20),
            p.barcode,
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
