//! The sampling loop.
//!
//! Shutdown is cooperative: a signal handler sets the shared stop flag and the
//! loop notices it at the start of the next tick, never in the middle of a read.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::report::StatusLine;
use crate::sampler::Sampler;

/// Errors that end the sampling loop.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Collect(#[from] crate::error::CollectError),

    #[error("failed to write status line: {0}")]
    Output(#[from] std::io::Error),
}

/// Samples, renders and sleeps until `stop` is set or `count` samples were shown.
///
/// Returns the number of rendered samples. On a fatal collection error the
/// open status line is terminated before the error is returned.
pub async fn run<W: Write>(
    sampler: &mut Sampler,
    status: &mut StatusLine<W>,
    interval: Duration,
    count: Option<u64>,
    stop: Arc<AtomicBool>,
) -> Result<u64, RunError> {
    let mut ticks = 0u64;

    while !stop.load(Ordering::SeqCst) {
        let sample = match sampler.sample() {
            Ok(sample) => sample,
            Err(e) => {
                status.abort()?;
                debug!("Sampling aborted after {} samples: {}", ticks, e);
                return Err(e.into());
            }
        };

        status.render(&sample)?;
        ticks += 1;
        debug!("tick {}: {:?}", ticks, sample);

        if count.is_some_and(|limit| ticks >= limit) {
            debug!("Sample count of {} reached", ticks);
            break;
        }

        tokio::time::sleep(interval).await;
    }

    status.finish()?;
    info!("Sampling stopped after {} samples", ticks);
    Ok(ticks)
}
