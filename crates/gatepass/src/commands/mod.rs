//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod card;
pub mod config_cmd;
pub mod issue;
pub mod passes;
pub mod qr;
pub mod scan;
pub mod util;
pub mod verify;

use crate::cli::{Command, GlobalOpts};
use crate::config::Context;
use crate::error::CliError;

/// Dispatch a store-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Issue(args) => issue::handle(ctx, args, global).await,
        Command::Passes(args) => passes::handle(ctx, args, global).await,
        Command::Qr(args) => qr::handle(ctx, &args, global),
        Command::Card(args) => card::handle(ctx, args, global).await,
        Command::Verify(args) => verify::handle(ctx, &args, global).await,
        // Config, Scan, and Completions are handled before dispatch
        Command::Config(_) | Command::Scan(_) | Command::Completions(_) => unreachable!(),
    }
}
