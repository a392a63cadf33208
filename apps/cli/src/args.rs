//! Command-line surface.
//!
//! Everything here is parsing only; the handlers in [`crate::commands`]
//! own the calls into the engine.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};
use smartmart_core::money::{Money, Percent};

/// SmartMart point-of-sale
#[derive(Parser, Debug)]
#[command(name = "smartmart")]
#[command(about = "SmartMart point-of-sale: inventory, checkout, orders, reports", long_about = None)]
pub struct Cli {
    /// Directory holding the JSON collections
    #[arg(long = "data-dir", value_name = "DIR", default_value = "./data", global = true)]
    pub data_dir: PathBuf,

    /// Operator username, checked against users.json for gated commands
    #[arg(long = "user", value_name = "NAME", default_value = "admin", global = true)]
    pub user: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the product catalog
    #[command(subcommand)]
    Product(ProductCommand),

    /// Run one checkout: build a cart, take payment, print the invoice
    Checkout(CheckoutArgs),

    /// Inspect finalized orders
    #[command(subcommand)]
    Orders(OrdersCommand),

    /// Sales reports
    #[command(subcommand)]
    Report(ReportCommand),

    /// Show a customer's loyalty balance
    Loyalty {
        /// Customer base name (without any city suffix)
        customer: String,
    },

    /// Manage operator accounts
    #[command(subcommand)]
    User(UserCommand),

    /// Backup, restore, export, import, or clear the data directory
    #[command(subcommand)]
    Data(DataCommand),
}

// =============================================================================
// product
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum ProductCommand {
    /// Add a product to the catalog
    Add {
        #[arg(long)]
        name: String,
        /// Defaults to "General" when omitted
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long)]
        quantity: i64,
        /// Unit price in rupees, e.g. 1200.00
        #[arg(long)]
        price: Money,
        #[arg(long, default_value = "")]
        supplier: String,
        /// Defaults to the product id when omitted
        #[arg(long)]
        barcode: Option<String>,
    },

    /// Update fields of an existing product
    Update {
        product_id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        quantity: Option<i64>,
        #[arg(long)]
        price: Option<Money>,
        #[arg(long)]
        supplier: Option<String>,
        #[arg(long)]
        barcode: Option<String>,
    },

    /// Remove a product (past orders keep their snapshots)
    Delete { product_id: u64 },

    /// List the catalog, optionally filtered by a search query
    List {
        #[arg(long)]
        query: Option<String>,
    },

    /// List products at or below the stock threshold
    LowStock {
        #[arg(long, default_value_t = smartmart_core::LOW_STOCK_THRESHOLD_DEFAULT)]
        threshold: i64,
    },

    /// Replace the entire catalog from a CSV file (admin)
    Import { file: PathBuf },

    /// Export the catalog to a CSV file
    Export { file: PathBuf },
}

// =============================================================================
// checkout
// =============================================================================

#[derive(Args, Debug)]
pub struct CheckoutArgs {
    /// Customer name
    #[arg(long)]
    pub customer: String,

    /// Optional customer city, shown as "Name (City)" on the order
    #[arg(long)]
    pub city: Option<String>,

    /// Line item as ID:QTY or ID:QTY:DISC%, repeatable
    #[arg(long = "item", value_name = "ID:QTY[:DISC]")]
    pub items: Vec<ItemSpec>,

    /// Line item by barcode as CODE:QTY or CODE:QTY:DISC%, repeatable
    #[arg(long = "barcode", value_name = "CODE:QTY[:DISC]")]
    pub barcodes: Vec<BarcodeSpec>,

    /// Order-level discount percent
    #[arg(long = "order-discount", value_name = "PCT", default_value = "0")]
    pub order_discount: Percent,

    /// Payment method
    #[arg(long = "pay", value_enum, default_value = "cash")]
    pub pay: PayMethod,

    /// Free-form payment reference (txn id, auth code)
    #[arg(long, default_value = "")]
    pub reference: String,

    /// First sub-method of a split payment
    #[arg(long = "split-method", value_name = "METHOD", default_value = "Cash")]
    pub split_method: String,

    /// Amount covered by the first sub-method, in rupees
    #[arg(long = "split-amount", value_name = "AMOUNT")]
    pub split_amount: Option<Money>,

    /// Where invoice_<id>.txt is written
    #[arg(long = "invoice-dir", value_name = "DIR", default_value = ".")]
    pub invoice_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PayMethod {
    Cash,
    Card,
    Upi,
    Split,
}

/// `ID:QTY` or `ID:QTY:DISC` from the command line.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemSpec {
    pub product_id: u64,
    pub quantity: i64,
    pub discount: Percent,
}

impl FromStr for ItemSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, qty, disc) = split_spec(s)?;
        let product_id = id
            .parse()
            .map_err(|_| format!("'{id}' is not a product id"))?;
        Ok(ItemSpec {
            product_id,
            quantity: qty,
            discount: disc,
        })
    }
}

/// `CODE:QTY` or `CODE:QTY:DISC` from the command line.
#[derive(Clone, Debug, PartialEq)]
pub struct BarcodeSpec {
    pub barcode: String,
    pub quantity: i64,
    pub discount: Percent,
}

impl FromStr for BarcodeSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (code, qty, disc) = split_spec(s)?;
        Ok(BarcodeSpec {
            barcode: code.to_string(),
            quantity: qty,
            discount: disc,
        })
    }
}

fn split_spec(s: &str) -> Result<(&str, i64, Percent), String> {
    let mut parts = s.split(':');
    let head = parts.next().filter(|p| !p.is_empty()).ok_or_else(|| {
        format!("'{s}' should look like ID:QTY or ID:QTY:DISC")
    })?;
    let qty: i64 = parts
        .next()
        .ok_or_else(|| format!("'{s}' is missing a quantity"))?
        .parse()
        .map_err(|_| format!("'{s}' has a non-numeric quantity"))?;
    let disc = match parts.next() {
        Some(p) => p
            .parse()
            .map_err(|_| format!("'{s}' has an invalid discount percent"))?,
        None => Percent::zero(),
    };
    if parts.next().is_some() {
        return Err(format!("'{s}' has too many ':' separated fields"));
    }
    Ok((head, qty, disc))
}

// =============================================================================
// orders / report / user / data
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum OrdersCommand {
    /// List all finalized orders
    List,
    /// Print (and re-save) the invoice for one order
    Invoice {
        order_id: u64,
        #[arg(long = "invoice-dir", value_name = "DIR")]
        invoice_dir: Option<PathBuf>,
    },
    /// Export an order summary CSV
    Export { file: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum ReportCommand {
    /// Totals: sales, orders, items sold
    Summary,
    /// Best selling products by units
    TopSelling {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Highest spending customers
    TopCustomers {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Sales per calendar day
    Daily,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Register a new operator account (admin)
    Add {
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_enum, default_value = "cashier")]
        role: RoleArg,
    },
    /// List accounts and roles
    List,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RoleArg {
    Admin,
    Cashier,
}

impl From<RoleArg> for smartmart_store::Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => smartmart_store::Role::Admin,
            RoleArg::Cashier => smartmart_store::Role::Cashier,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum DataCommand {
    /// Rewrite the full-state backup mirror from the live collections
    Backup,
    /// Replay the backup mirror over the live collections (admin)
    Restore,
    /// Export the full state to a single JSON file
    Export { file: PathBuf },
    /// Import a full-state JSON file as the new live state (admin)
    Import { file: PathBuf },
    /// Delete everything and reset allocators (admin)
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_item_spec_parsing() {
        let spec: ItemSpec = "7:2".parse().unwrap();
        assert_eq!(spec.product_id, 7);
        assert_eq!(spec.quantity, 2);
        assert!(spec.discount.is_zero());

        let spec: ItemSpec = "7:2:10".parse().unwrap();
        assert_eq!(spec.discount, Percent::from_percent(10.0));

        assert!("".parse::<ItemSpec>().is_err());
        assert!("7".parse::<ItemSpec>().is_err());
        assert!("x:2".parse::<ItemSpec>().is_err());
        assert!("7:two".parse::<ItemSpec>().is_err());
        assert!("7:2:10:9".parse::<ItemSpec>().is_err());
    }

    #[test]
    fn test_barcode_spec_keeps_code_verbatim() {
        let spec: BarcodeSpec = "8901234:1:5".parse().unwrap();
        assert_eq!(spec.barcode, "8901234");
        assert_eq!(spec.quantity, 1);
        assert_eq!(spec.discount, Percent::from_percent(5.0));
    }

    #[test]
    fn test_checkout_parses() {
        let cli = Cli::try_parse_from([
            "smartmart",
            "checkout",
            "--customer",
            "Asha",
            "--item",
            "1:2:10",
            "--order-discount",
            "5",
            "--pay",
            "cash",
        ])
        .unwrap();
        match cli.command {
            Command::Checkout(args) => {
                assert_eq!(args.customer, "Asha");
                assert_eq!(args.items.len(), 1);
                assert_eq!(args.order_discount, Percent::from_percent(5.0));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
