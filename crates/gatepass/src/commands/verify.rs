//! Gate verification handler.

use owo_colors::OwoColorize;

use gatepass_core::{PassStatus, VerificationOutcome, Verifier};

use crate::cli::{GlobalOpts, VerifyArgs};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

fn status_label(status: PassStatus, color: bool) -> String {
    if !color {
        return status.to_string();
    }
    match status {
        PassStatus::Valid => status.to_string().green().bold().to_string(),
        PassStatus::FutureDated => status.to_string().yellow().bold().to_string(),
        PassStatus::Expired | PassStatus::Invalid => status.to_string().red().bold().to_string(),
    }
}

pub(crate) fn detail(outcome: &VerificationOutcome, color: bool) -> String {
    let mut lines = vec![format!("Status:   {}", status_label(outcome.status, color))];

    if let Some(ref message) = outcome.message {
        lines.push(format!("Note:     {message}"));
    }

    if let Some(ref record) = outcome.record {
        lines.push(format!("Visitor:  {}", record.visitor_name));
        lines.push(format!("Phone:    {}", record.visitor_phone));
        lines.push(format!(
            "Vehicle:  {} ({})",
            record.vehicle_plate, record.vehicle_type
        ));
        lines.push(format!("Date:     {}", record.scheduled_date));
        lines.push(format!("Reason:   {}", record.reason));
        lines.push(format!("Host:     {}", record.host_name));
        if let Some(ref address) = outcome.host_address {
            lines.push(format!("Address:  {address}"));
        }
    }

    lines.join("\n")
}

pub async fn handle(ctx: &Context, args: &VerifyArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let verifier = Verifier::new(ctx.store.clone());

    let outcome = match args.date.as_deref() {
        Some(raw) => {
            let date = util::parse_date(raw)?;
            verifier.resolve_on(&args.input, date).await
        }
        None => verifier.resolve(&args.input).await,
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &outcome,
        |o| detail(o, color),
        |o| o.status.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
