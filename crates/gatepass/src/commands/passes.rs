//! Pass listing, inspection, and revocation handlers.

use tabled::Tabled;

use gatepass_core::{LinkConfig, PassDirectory, PassRecord, PassStore, verification_url};

use crate::cli::{GlobalOpts, PassesArgs, PassesCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct PassRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Visitor")]
    visitor: String,
    #[tabled(rename = "Plate")]
    plate: String,
    #[tabled(rename = "Vehicle")]
    vehicle: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

impl From<&PassRecord> for PassRow {
    fn from(p: &PassRecord) -> Self {
        Self {
            id: p.id.to_string(),
            visitor: p.visitor_name.clone(),
            plate: p.vehicle_plate.clone(),
            vehicle: p.vehicle_type.to_string(),
            date: p.scheduled_date.to_string(),
            reason: p.reason.clone(),
        }
    }
}

pub fn detail(p: &PassRecord, link: &LinkConfig) -> String {
    [
        format!("ID:       {}", p.id),
        format!("Token:    {}", p.pass_token),
        format!("Visitor:  {}", p.visitor_name),
        format!("Phone:    {}", p.visitor_phone),
        format!("Vehicle:  {} ({})", p.vehicle_plate, p.vehicle_type),
        format!("Date:     {}", p.scheduled_date),
        format!("Reason:   {}", p.reason),
        format!("Host:     {}", p.host_name),
        format!("Link:     {}", verification_url(link, &p.pass_token)),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: PassesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let directory = PassDirectory::new(ctx.store.clone());

    match args.command {
        PassesCommand::List => {
            let host = ctx.host().await?;
            let passes = directory.list_for_host(host.id).await?;
            let out = output::render_list(
                &global.output,
                &passes,
                |p| PassRow::from(p),
                |p| p.pass_token.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PassesCommand::Get { token } => {
            let token = util::parse_token(&token)?;
            let found = ctx.store.pass_by_token(&token).await.map_err(|e| {
                CliError::from(gatepass_core::CoreError::from(e))
            })?;

            match found {
                Some(pass) => {
                    let out = output::render_single(
                        &global.output,
                        &pass,
                        |p| detail(p, &ctx.link),
                        |p| p.pass_token.to_string(),
                    );
                    output::print_output(&out, global.quiet);
                    Ok(())
                }
                None => Err(CliError::NotFound {
                    resource_type: "pass".into(),
                    identifier: token.to_string(),
                    list_command: "passes list".into(),
                }),
            }
        }

        PassesCommand::Revoke { id } => {
            if !util::confirm(&format!("Revoke pass {id}?"), global.yes)? {
                return Ok(());
            }
            directory.revoke(id).await?;
            if !global.quiet {
                eprintln!("Pass revoked");
            }
            Ok(())
        }
    }
}
