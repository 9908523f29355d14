//! Shareable card composition handler.

use std::path::PathBuf;

use gatepass_core::{
    PassRecord, PassStore,
    card::{CardText, FontRasterizer, compose_share_card},
    encode, verification_url,
};

use crate::cli::{CardArgs, GlobalOpts};
use crate::config::Context;
use crate::error::CliError;

pub async fn handle(ctx: &Context, args: CardArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let token = super::util::parse_token(&args.token)?;
    let record = ctx
        .store
        .pass_by_token(&token)
        .await
        .map_err(|e| CliError::from(gatepass_core::CoreError::from(e)))?
        .ok_or_else(|| CliError::NotFound {
            resource_type: "pass".into(),
            identifier: token.to_string(),
            list_command: "passes list".into(),
        })?;

    let written = compose_to(ctx, &record, args.out).await?;
    if !global.quiet {
        eprintln!("Card written to {}", written.display());
    }
    Ok(())
}

/// Compose the card for a record and write it to `out` (or the
/// visitor-named default). Shared with `issue --card`.
pub async fn compose_to(
    ctx: &Context,
    record: &PassRecord,
    out: Option<PathBuf>,
) -> Result<PathBuf, CliError> {
    let font_path = ctx.font_path.as_ref().ok_or_else(|| CliError::FontUnavailable {
        reason: "no font_path configured in the active profile".into(),
    })?;
    let bytes = std::fs::read(font_path)?;
    let raster = FontRasterizer::from_bytes(bytes).map_err(CliError::from)?;

    // address join is best-effort, same as verification
    let host_address = match ctx.store.host_profile(record.host_id).await {
        Ok(Some(profile)) => profile.address,
        Ok(None) => None,
        Err(e) => {
            tracing::debug!(error = %e, "address join failed while composing card");
            None
        }
    };

    let url = verification_url(&ctx.link, &record.pass_token);
    let qr = encode::render_qr(&url).map_err(CliError::from)?;
    let text = CardText::for_pass(&ctx.community, record, host_address.as_deref());
    let card = compose_share_card(&text, &qr, &raster);

    let path = out.unwrap_or_else(|| PathBuf::from(encode::share_filename(&record.visitor_name)));
    card.save(&path)?;
    Ok(path)
}
