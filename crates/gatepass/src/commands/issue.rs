//! Pass issuance handler.

use chrono::Local;

use gatepass_core::{PassDirectory, PassDraft, encode, verification_url};

use crate::cli::{GlobalOpts, IssueArgs};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::{card, passes, util};

pub async fn handle(ctx: &Context, args: IssueArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let scheduled_date = match args.date.as_deref() {
        Some(raw) => util::parse_date(raw)?,
        None => Local::now().date_naive(),
    };

    let draft = PassDraft {
        visitor_name: args.visitor,
        visitor_phone: args.phone,
        vehicle_plate: args.plate,
        vehicle_type: util::parse_vehicle(&args.vehicle)?,
        scheduled_date,
        reason: args.reason,
    };

    let host = ctx.host().await?;
    let directory = PassDirectory::new(ctx.store.clone());
    let record = directory.issue(&host, draft).await?;

    let out = output::render_single(
        &global.output,
        &record,
        |p| passes::detail(p, &ctx.link),
        |p| p.pass_token.to_string(),
    );
    output::print_output(&out, global.quiet);

    if let Some(path) = args.qr {
        let url = verification_url(&ctx.link, &record.pass_token);
        let img = encode::render_qr(&url).map_err(CliError::from)?;
        img.save(&path)?;
        if !global.quiet {
            eprintln!("QR code written to {}", path.display());
        }
    }

    if let Some(path) = args.card {
        let written = card::compose_to(ctx, &record, Some(path)).await?;
        if !global.quiet {
            eprintln!("Card written to {}", written.display());
        }
    }

    Ok(())
}
