//! Whole-data-directory operations: backup, restore, export, import, clear.

use smartmart_store::StoreResult;

use crate::args::DataCommand;
use crate::commands::Context;

pub fn run(ctx: &Context, cmd: DataCommand) -> StoreResult<()> {
    match cmd {
        DataCommand::Backup => {
            // commit rewrites the mirror from the live collections
            let state = ctx.store.load()?;
            ctx.store.commit(&state)?;
            println!("backup written");
            Ok(())
        }

        DataCommand::Restore => {
            ctx.require_admin("restore from backup")?;
            let state = ctx.store.restore_from_backup()?;
            println!(
                "restored: {} products, {} orders, {} customers",
                state.inventory.len(),
                state.ledger.len(),
                state.loyalty.len()
            );
            Ok(())
        }

        DataCommand::Export { file } => {
            let state = ctx.store.load()?;
            ctx.store.export_to(&state, &file)?;
            println!("exported full state to {}", file.display());
            Ok(())
        }

        DataCommand::Import { file } => {
            ctx.require_admin("import a full-state file")?;
            let state = ctx.store.import_from(&file)?;
            println!(
                "imported: {} products, {} orders, {} customers",
                state.inventory.len(),
                state.ledger.len(),
                state.loyalty.len()
            );
            Ok(())
        }

        DataCommand::Clear => {
            ctx.require_admin("clear all data")?;
            ctx.store.clear()?;
            println!("all collections cleared");
            Ok(())
        }
    }
}
