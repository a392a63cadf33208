//! Order inspection commands.

use std::fs;

use smartmart_core::invoice;
use smartmart_core::CoreError;
use smartmart_store::{csv, StoreResult};

use crate::args::OrdersCommand;
use crate::commands::Context;

pub fn run(ctx: &Context, cmd: OrdersCommand) -> StoreResult<()> {
    let state = ctx.load_state()?;
    match cmd {
        OrdersCommand::List => {
            println!(
                "{:>6}  {:<24} {:<20} {:>5} {:>12}  {:<8}",
                "Order", "Customer", "Date", "Items", "Total", "Payment"
            );
            for order in state.ledger.orders() {
                println!(
                    "{:>6}  {:<24} {:<20} {:>5} {:>12}  {:<8}",
                    order.order_id,
                    order.customer.chars().take(24).collect::<String>(),
                    order.created_at.format("%Y-%m-%dT%H:%M:%S"),
                    order.item_count(),
                    order.total().to_decimal_string(),
                    order.payment.method.to_string(),
                );
            }
            Ok(())
        }

        OrdersCommand::Invoice {
            order_id,
            invoice_dir,
        } => {
            let order = state
                .ledger
                .get(order_id)
                .ok_or(CoreError::OrderNotFound(order_id))?;
            let text = invoice::render_text(order);
            print!("{text}");
            if let Some(dir) = invoice_dir {
                let path = dir.join(invoice::invoice_file_name(order_id));
                fs::write(&path, &text)?;
                println!("invoice saved to {}", path.display());
            }
            Ok(())
        }

        OrdersCommand::Export { file } => {
            csv::export_orders_to_path(&state.ledger, &file)?;
            println!("exported {} orders to {}", state.ledger.len(), file.display());
            Ok(())
        }
    }
}
