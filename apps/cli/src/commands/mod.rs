//! Command handlers.
//!
//! Each handler follows the same shape: load state from the data store,
//! call into the engine, commit, print. No business state lives here.

pub mod checkout;
pub mod data;
pub mod orders;
pub mod product;
pub mod report;
pub mod user;

use smartmart_core::LOW_STOCK_THRESHOLD_DEFAULT;
use smartmart_store::{DataStore, PosState, StoreResult};
use tracing::warn;

use crate::args::{Cli, Command};

/// Shared handler context: the opened data store and the operator name.
pub struct Context {
    pub store: DataStore,
    pub user: String,
}

impl Context {
    pub fn open(cli: &Cli) -> StoreResult<Self> {
        Ok(Context {
            store: DataStore::open(&cli.data_dir)?,
            user: cli.user.clone(),
        })
    }

    /// Loads state and surfaces low-stock warnings on stderr, the way a
    /// shift would start at the till.
    pub fn load_state(&self) -> StoreResult<PosState> {
        let state = self.store.load()?;
        for product in state.inventory.low_stock(LOW_STOCK_THRESHOLD_DEFAULT) {
            warn!(
                product = %product.name,
                quantity = product.quantity,
                "low stock"
            );
            eprintln!(
                "warning: low stock: {} ({} left)",
                product.name, product.quantity
            );
        }
        Ok(state)
    }

    /// Admin gate for destructive or catalog-replacing commands.
    pub fn require_admin(&self, action: &str) -> StoreResult<()> {
        self.store.load_users()?.require_admin(&self.user, action)
    }
}

/// Routes a parsed command line to its handler.
pub fn dispatch(cli: Cli) -> StoreResult<()> {
    let ctx = Context::open(&cli)?;
    match cli.command {
        Command::Product(cmd) => product::run(&ctx, cmd),
        Command::Checkout(args) => checkout::run(&ctx, args),
        Command::Orders(cmd) => orders::run(&ctx, cmd),
        Command::Report(cmd) => report::run(&ctx, cmd),
        Command::Loyalty { customer } => report::loyalty(&ctx, &customer),
        Command::User(cmd) => user::run(&ctx, cmd),
        Command::Data(cmd) => data::run(&ctx, cmd),
    }
}
