//! QR rendering handler.
//!
//! Renders the verification URL for a token straight to a PNG. Works
//! offline: the store is never queried, so this also serves tokens that
//! were issued elsewhere.

use gatepass_core::{encode, verification_url};

use crate::cli::{GlobalOpts, QrArgs};
use crate::config::Context;
use crate::error::CliError;

pub fn handle(ctx: &Context, args: &QrArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let token = super::util::parse_token(&args.token)?;
    let url = verification_url(&ctx.link, &token);

    let img = encode::render_qr(&url).map_err(CliError::from)?;
    img.save(&args.out)?;

    if !global.quiet {
        eprintln!("{url}");
        eprintln!("QR code written to {}", args.out.display());
    }
    Ok(())
}
