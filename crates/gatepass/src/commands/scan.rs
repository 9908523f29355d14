//! Frame scanning handler.
//!
//! Replays captured frame images through the scan session, exactly as a
//! live camera feed would be: frames are decoded one at a time until one
//! yields a QR payload. With `--verify` the payload is then resolved
//! against the record store.

use std::collections::VecDeque;
use std::path::PathBuf;

use gatepass_core::{CoreError, Frame, FrameSource, ScanOutcome, ScanSession, Verifier};

use crate::cli::{GlobalOpts, ScanArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::{util, verify};

/// Frame source over saved image files.
struct FileFrameSource {
    paths: VecDeque<PathBuf>,
}

impl FrameSource for FileFrameSource {
    async fn acquire(&mut self) -> Result<(), CoreError> {
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Option<Frame>, CoreError> {
        let Some(path) = self.paths.pop_front() else {
            return Ok(None);
        };
        tracing::debug!(path = %path.display(), "loading frame");
        let img = image::open(&path)?.to_luma8();
        Ok(Some(Frame::from_luma(img.width(), img.height(), img.into_raw())))
    }

    async fn release(&mut self) {}
}

pub async fn handle(args: ScanArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let frame_count = args.frames.len();
    let source = FileFrameSource {
        paths: args.frames.into(),
    };

    let mut session = ScanSession::new(source);
    let outcome = session.start().await.map_err(CliError::from)?;

    let payload = match outcome {
        ScanOutcome::Decoded(payload) => payload,
        ScanOutcome::Cancelled => {
            return Err(CliError::NoCodeDetected {
                frames: frame_count,
            });
        }
    };

    if !args.verify {
        output::print_output(&payload, global.quiet);
        return Ok(());
    }

    let ctx = config::build_context(global)?;
    let verifier = Verifier::new(ctx.store.clone());
    let resolved = match args.date.as_deref() {
        Some(raw) => {
            let date = util::parse_date(raw)?;
            verifier.resolve_on(&payload, date).await
        }
        None => verifier.resolve(&payload).await,
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &resolved,
        |o| verify::detail(o, color),
        |o| o.status.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
