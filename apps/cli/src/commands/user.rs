//! Operator account commands.

use smartmart_store::StoreResult;

use crate::args::UserCommand;
use crate::commands::Context;

pub fn run(ctx: &Context, cmd: UserCommand) -> StoreResult<()> {
    match cmd {
        UserCommand::Add {
            username,
            password,
            role,
        } => {
            ctx.require_admin("register users")?;
            let mut users = ctx.store.load_users()?;
            users.register(&username, &password, role.into())?;
            ctx.store.save_users(&users)?;
            println!("registered '{username}'");
            Ok(())
        }

        UserCommand::List => {
            let users = ctx.store.load_users()?;
            for (name, role) in users.list() {
                println!("{name:<20} {role}");
            }
            Ok(())
        }
    }
}
