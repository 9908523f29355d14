// ── Live scan session ──
//
// Pulls greyscale frames from a `FrameSource` and runs QR detection on
// each until one decodes or the session is cancelled. Decode is
// single-flight: the loop is sequential, so at most one frame is being
// analyzed at any time and frames arriving meanwhile are simply not
// pulled.
//
// States: Idle -> Scanning -> Decoded | Cancelled. Every exit path
// releases the frame source, and a decode that completes after
// cancellation is discarded rather than published.

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::CoreError;

/// One greyscale camera frame.
#[derive(Debug, Clone)]
pub struct Frame {
    width: u32,
    height: u32,
    luma: Vec<u8>,
}

impl Frame {
    /// Wrap a row-major 8-bit luma buffer.
    ///
    /// # Panics
    ///
    /// Panics unless the buffer length is exactly `width * height`;
    /// the decoder indexes the buffer by those dimensions.
    #[must_use]
    pub fn from_luma(width: u32, height: u32, luma: Vec<u8>) -> Self {
        assert_eq!(
            luma.len(),
            width as usize * height as usize,
            "luma buffer does not match frame dimensions"
        );
        Self {
            width,
            height,
            luma,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Exclusive handle on a frame producer (camera device, file replay).
///
/// Sessions take the source by value, so holding a `ScanSession` is
/// holding the device.
pub trait FrameSource: Send {
    /// Open the underlying device.
    fn acquire(&mut self) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Next frame, or `None` when the producer is exhausted.
    fn next_frame(&mut self) -> impl Future<Output = Result<Option<Frame>, CoreError>> + Send;

    /// Close the underlying device. Idempotent.
    fn release(&mut self) -> impl Future<Output = ()> + Send;
}

/// Observable session state, published through a watch channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning,
    Decoded(String),
    Cancelled,
}

/// Terminal result of a scan run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Decoded(String),
    Cancelled,
}

/// Owns a frame source and drives the scan loop over it.
///
/// The source stays acquired across a successful decode, so `reset`
/// followed by another `start` rescans on the same open device.
/// Cancellation and errors release it.
pub struct ScanSession<S: FrameSource> {
    source: S,
    acquired: bool,
    state: watch::Sender<ScanState>,
    cancel: CancellationToken,
}

impl<S: FrameSource> ScanSession<S> {
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(ScanState::Idle);
        Self {
            source,
            acquired: false,
            state,
            cancel: CancellationToken::new(),
        }
    }

    /// Subscribe to state transitions.
    pub fn state(&self) -> watch::Receiver<ScanState> {
        self.state.subscribe()
    }

    /// Token that cancels a running `start` call from another task.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Discard a previous outcome and rearm for another run on the same
    /// open source. A spent cancellation token is replaced.
    pub fn reset(&mut self) {
        self.cancel = CancellationToken::new();
        self.state.send_replace(ScanState::Idle);
    }

    /// Release the source and hand it back.
    pub async fn into_source(mut self) -> S {
        if self.acquired {
            self.source.release().await;
        }
        self.source
    }

    /// Scan until a frame decodes or the session is cancelled. The
    /// source is acquired on the first run only; an exhausted source
    /// counts as cancellation.
    pub async fn start(&mut self) -> Result<ScanOutcome, CoreError> {
        if !self.acquired {
            self.source.acquire().await?;
            self.acquired = true;
        }
        self.state.send_replace(ScanState::Scanning);

        let outcome = loop {
            tokio::select! {
                biased;

                () = self.cancel.cancelled() => {
                    break ScanOutcome::Cancelled;
                }

                frame = self.source.next_frame() => {
                    match frame {
                        Ok(Some(frame)) => {
                            if let Some(content) = decode_frame(&frame) {
                                // A cancel that raced the decode wins.
                                if self.cancel.is_cancelled() {
                                    break ScanOutcome::Cancelled;
                                }
                                break ScanOutcome::Decoded(content);
                            }
                        }
                        Ok(None) => {
                            tracing::debug!("frame source exhausted before a decode");
                            break ScanOutcome::Cancelled;
                        }
                        Err(e) => {
                            self.teardown().await;
                            return Err(e);
                        }
                    }
                }
            }
        };

        match outcome {
            // keep the source open for a rescan
            ScanOutcome::Decoded(ref content) => {
                self.state.send_replace(ScanState::Decoded(content.clone()));
            }
            ScanOutcome::Cancelled => self.teardown().await,
        }
        Ok(outcome)
    }

    async fn teardown(&mut self) {
        if self.acquired {
            self.source.release().await;
            self.acquired = false;
        }
        self.state.send_replace(ScanState::Cancelled);
    }
}

/// Run QR detection over a single frame. Returns the first payload that
/// both detects and decodes; detection hits that fail to decode are
/// skipped.
#[must_use]
pub fn decode_frame(frame: &Frame) -> Option<String> {
    let width = frame.width as usize;
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        width,
        frame.height as usize,
        |x, y| frame.luma[y * width + x],
    );
    for grid in prepared.detect_grids() {
        match grid.decode() {
            Ok((_, content)) => return Some(content),
            Err(e) => tracing::debug!(error = %e, "grid detected but failed to decode"),
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::encode::render_qr_text;

    fn qr_frame(payload: &str) -> Frame {
        let img = render_qr_text(payload).unwrap();
        Frame::from_luma(img.width(), img.height(), img.into_raw())
    }

    fn blank_frame() -> Frame {
        Frame::from_luma(64, 64, vec![0xff; 64 * 64])
    }

    /// Replays a fixed frame list, counting acquire/release calls.
    struct ReplaySource {
        frames: std::collections::VecDeque<Result<Option<Frame>, CoreError>>,
        acquires: usize,
        releases: usize,
    }

    impl ReplaySource {
        fn new(frames: Vec<Result<Option<Frame>, CoreError>>) -> Self {
            Self {
                frames: frames.into(),
                acquires: 0,
                releases: 0,
            }
        }
    }

    impl FrameSource for ReplaySource {
        async fn acquire(&mut self) -> Result<(), CoreError> {
            self.acquires += 1;
            Ok(())
        }

        async fn next_frame(&mut self) -> Result<Option<Frame>, CoreError> {
            match self.frames.pop_front() {
                Some(item) => item,
                None => std::future::pending().await,
            }
        }

        async fn release(&mut self) {
            self.releases += 1;
        }
    }

    #[test]
    #[should_panic(expected = "luma buffer does not match frame dimensions")]
    fn undersized_luma_buffer_is_rejected_at_construction() {
        let _ = Frame::from_luma(64, 64, vec![0xff; 16]);
    }

    #[test]
    fn blank_frame_does_not_decode() {
        assert_eq!(decode_frame(&blank_frame()), None);
    }

    #[test]
    fn qr_frame_decodes_to_its_payload() {
        let frame = qr_frame("hello scanner");
        assert_eq!(decode_frame(&frame).as_deref(), Some("hello scanner"));
    }

    #[tokio::test]
    async fn session_skips_undecodable_frames_until_a_hit() {
        let source = ReplaySource::new(vec![
            Ok(Some(blank_frame())),
            Ok(Some(blank_frame())),
            Ok(Some(qr_frame("payload-42"))),
        ]);
        let mut session = ScanSession::new(source);
        let state = session.state();

        let outcome = session.start().await.unwrap();
        assert_eq!(outcome, ScanOutcome::Decoded("payload-42".into()));
        assert_eq!(*state.borrow(), ScanState::Decoded("payload-42".into()));

        let source = session.into_source().await;
        assert_eq!(source.acquires, 1);
        assert_eq!(source.releases, 1);
    }

    #[tokio::test]
    async fn rescan_after_decode_keeps_the_source_open() {
        let source = ReplaySource::new(vec![
            Ok(Some(qr_frame("first"))),
            Ok(Some(blank_frame())),
            Ok(Some(qr_frame("second"))),
        ]);
        let mut session = ScanSession::new(source);

        assert_eq!(
            session.start().await.unwrap(),
            ScanOutcome::Decoded("first".into())
        );
        session.reset();
        assert_eq!(
            session.start().await.unwrap(),
            ScanOutcome::Decoded("second".into())
        );

        let source = session.into_source().await;
        assert_eq!(source.acquires, 1, "rescan must reuse the open source");
        assert_eq!(source.releases, 1);
    }

    #[tokio::test]
    async fn pre_cancelled_session_never_pulls_a_frame() {
        let source = ReplaySource::new(vec![Ok(Some(qr_frame("should-not-see")))]);
        let mut session = ScanSession::new(source);
        let state = session.state();

        session.cancel_handle().cancel();
        let outcome = session.start().await.unwrap();
        assert_eq!(outcome, ScanOutcome::Cancelled);
        assert_eq!(*state.borrow(), ScanState::Cancelled);

        // biased cancel arm ran first, so the decodable frame is untouched
        let source = session.into_source().await;
        assert_eq!(source.frames.len(), 1);
    }

    #[tokio::test]
    async fn cancel_from_another_task_stops_a_waiting_session() {
        // no frames at all: next_frame parks forever
        let source = ReplaySource::new(vec![]);
        let mut session = ScanSession::new(source);
        let handle = session.cancel_handle();

        tokio::spawn(async move {
            tokio::task::yield_now().await;
            handle.cancel();
        });

        let outcome = session.start().await.unwrap();
        assert_eq!(outcome, ScanOutcome::Cancelled);
    }

    #[tokio::test]
    async fn exhausted_source_ends_as_cancelled() {
        let source = ReplaySource::new(vec![Ok(Some(blank_frame())), Ok(None)]);
        let mut session = ScanSession::new(source);
        let state = session.state();

        let outcome = session.start().await.unwrap();
        assert_eq!(outcome, ScanOutcome::Cancelled);
        assert_eq!(*state.borrow(), ScanState::Cancelled);
    }

    #[tokio::test]
    async fn source_error_propagates_and_releases() {
        let source = ReplaySource::new(vec![Err(CoreError::Camera {
            message: "device unplugged".into(),
        })]);
        let mut session = ScanSession::new(source);
        let state = session.state();

        let err = session.start().await.unwrap_err();
        assert!(matches!(err, CoreError::Camera { .. }));
        assert_eq!(*state.borrow(), ScanState::Cancelled);

        let source = session.into_source().await;
        assert_eq!(source.releases, 1);
    }

    #[tokio::test]
    async fn reset_rearms_a_cancelled_session() {
        let source = ReplaySource::new(vec![Ok(Some(qr_frame("second-run")))]);
        let mut session = ScanSession::new(source);

        session.cancel_handle().cancel();
        assert_eq!(session.start().await.unwrap(), ScanOutcome::Cancelled);

        session.reset();
        assert_eq!(*session.state().borrow(), ScanState::Idle);
        assert_eq!(
            session.start().await.unwrap(),
            ScanOutcome::Decoded("second-run".into())
        );
    }
}
