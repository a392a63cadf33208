//! Read-side reports over the order ledger.

use smartmart_store::StoreResult;

use crate::args::ReportCommand;
use crate::commands::Context;

pub fn run(ctx: &Context, cmd: ReportCommand) -> StoreResult<()> {
    let state = ctx.load_state()?;
    match cmd {
        ReportCommand::Summary => {
            println!("orders:      {}", state.ledger.len());
            println!("items sold:  {}", state.ledger.total_items_sold());
            println!(
                "total sales: {}",
                state.ledger.total_sales().to_decimal_string()
            );
        }

        ReportCommand::TopSelling { limit } => {
            println!("{:<40} {:>8}", "Product", "Units");
            for (name, qty) in state.ledger.top_selling(limit) {
                println!("{name:<40} {qty:>8}");
            }
        }

        ReportCommand::TopCustomers { limit } => {
            println!("{:<30} {:>12}", "Customer", "Spend");
            for (name, spend) in state.ledger.top_customers(limit) {
                println!("{:<30} {:>12}", name, spend.to_decimal_string());
            }
        }

        ReportCommand::Daily => {
            println!("{:<12} {:>12}", "Date", "Sales");
            for (date, total) in state.ledger.daily_totals() {
                println!("{:<12} {:>12}", date, total.to_decimal_string());
            }
        }
    }
    Ok(())
}

pub fn loyalty(ctx: &Context, customer: &str) -> StoreResult<()> {
    let state = ctx.load_state()?;
    println!(
        "loyalty balance for {customer}: {} points",
        state.loyalty.balance(customer)
    );
    Ok(())
}
