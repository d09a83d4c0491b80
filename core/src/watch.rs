//! The watch-mode refresh loop.
//!
//! Each cycle gets the height of the frame drawn by the previous cycle so it
//! can erase exactly that many lines before drawing. Cycles start on a fixed
//! cadence measured from the start of the previous cycle; a cycle that
//! overruns the interval is followed immediately by the next one.
//!
//! The loop ends when its [`CancellationToken`] fires, which is checked only
//! between cycles: a frame that has started drawing is always finished.

use std::future::Future;
use std::io::{self, Read};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Number of terminal lines a drawn frame occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameHeight(pub usize);

/// Time left to sleep once a cycle took `elapsed` out of `interval`.
pub fn idle_wait(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}

/// Returns a token that is cancelled once `reader` reaches end of input (or
/// fails). Anything read is discarded.
///
/// The read happens on a plain thread because standard input has no
/// cancellable async form; the thread ends with the input.
pub fn cancel_on_eof<R>(mut reader: R) -> CancellationToken
where
    R: Read + Send + 'static,
{
    let token = CancellationToken::new();
    let trigger = token.clone();
    std::thread::spawn(move || {
        let drained = io::copy(&mut reader, &mut io::sink());
        debug!(?drained, "input closed, stopping refresh loop");
        trigger.cancel();
    });
    token
}

pub struct RefreshLoop {
    interval: Duration,
    cancel: CancellationToken,
}

impl RefreshLoop {
    pub fn new(interval: Duration, cancel: CancellationToken) -> Self {
        Self { interval, cancel }
    }

    /// Runs `cycle` until cancelled and returns how many cycles completed.
    /// The first error from `cycle` stops the loop and is returned as is.
    pub async fn run<F, Fut, E>(&self, mut cycle: F) -> Result<usize, E>
    where
        F: FnMut(Option<FrameHeight>) -> Fut,
        Fut: Future<Output = Result<FrameHeight, E>>,
    {
        let mut previous = None;
        let mut completed = 0;

        while !self.cancel.is_cancelled() {
            let started = Instant::now();
            previous = Some(cycle(previous).await?);
            completed += 1;

            let wait = idle_wait(self.interval, started.elapsed());
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(wait) => {}
            }
        }

        debug!(cycles = completed, "refresh loop finished");
        Ok(completed)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
