//! External region segmentation with a wall-clock budget.
//!
//! Heavier segmenters (atlas or network based) run behind the
//! [`SegmentationBackend`] trait on a dedicated worker thread. The caller
//! waits at most the configured timeout; a worker that overruns is detached
//! and its eventual result is dropped.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{info, warn};
use volume_types::ScalarVolume;

use crate::error::{SegmentError, SegmentResult};
use crate::regions::{classify_regions, RegionVolume};

/// Budget for one backend call: ten minutes.
pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(600);

/// Error type returned by backend implementations.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// A region segmenter that may be slow or unavailable.
pub trait SegmentationBackend: Send + Sync {
    /// Short name used in logs and in [`RegionSource::Backend`].
    fn name(&self) -> &str;

    /// Produce a label map with the same shape as `volume`.
    ///
    /// # Errors
    ///
    /// Any error is treated as a recoverable backend failure.
    fn label_regions(&self, volume: &ScalarVolume) -> Result<RegionVolume, BackendError>;
}

/// Which path produced a label map.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RegionSource {
    /// The named external backend.
    Backend(String),
    /// Built-in intensity thresholding.
    Threshold,
}

/// A label map and its provenance.
#[derive(Debug, Clone)]
pub struct RegionSegmentation {
    /// Voxel labels.
    pub regions: RegionVolume,
    /// Which path produced them.
    pub source: RegionSource,
    /// Why the backend was not used, when a backend was configured.
    pub fallback_reason: Option<String>,
}

/// Run `backend` on a worker thread and wait at most `timeout`.
///
/// # Errors
///
/// - [`SegmentError::BackendTimeout`] if no answer arrives in time
/// - [`SegmentError::BackendFailed`] if the backend errors, panics, or
///   returns a label map whose shape differs from the volume
pub fn run_backend(
    backend: &Arc<dyn SegmentationBackend>,
    volume: &ScalarVolume,
    timeout: Duration,
) -> SegmentResult<RegionVolume> {
    let name = backend.name().to_string();
    let failed = |reason: String| SegmentError::BackendFailed {
        backend: name.clone(),
        reason,
    };

    let (tx, rx) = mpsc::channel();
    let worker = Arc::clone(backend);
    let input = volume.clone();
    thread::Builder::new()
        .name(format!("segment-{name}"))
        .spawn(move || {
            let result = worker.label_regions(&input).map_err(|e| e.to_string());
            // The receiver is gone if the caller already timed out.
            let _ = tx.send(result);
        })
        .map_err(|e| failed(format!("could not start worker: {e}")))?;

    match rx.recv_timeout(timeout) {
        Ok(Ok(regions)) if regions.shape() == volume.shape() => Ok(regions),
        Ok(Ok(regions)) => Err(failed(format!(
            "label map shape {} does not match volume {}",
            regions.shape(),
            volume.shape()
        ))),
        Ok(Err(reason)) => Err(failed(reason)),
        Err(RecvTimeoutError::Timeout) => Err(SegmentError::BackendTimeout {
            backend: name.clone(),
            timeout,
        }),
        Err(RecvTimeoutError::Disconnected) => Err(failed("worker exited without a result".into())),
    }
}

/// Label regions with `backend` when given, falling back to
/// [`classify_regions`] on absence, timeout or failure.
#[must_use]
pub fn segment_regions(
    backend: Option<&Arc<dyn SegmentationBackend>>,
    volume: &ScalarVolume,
    timeout: Duration,
) -> RegionSegmentation {
    let Some(backend) = backend else {
        return RegionSegmentation {
            regions: classify_regions(volume),
            source: RegionSource::Threshold,
            fallback_reason: None,
        };
    };

    match run_backend(backend, volume, timeout) {
        Ok(regions) => {
            info!(backend = backend.name(), "Backend segmentation complete");
            RegionSegmentation {
                regions,
                source: RegionSource::Backend(backend.name().to_string()),
                fallback_reason: None,
            }
        }
        Err(err) => {
            warn!(error = %err, "Backend segmentation unavailable, using thresholding");
            RegionSegmentation {
                regions: classify_regions(volume),
                source: RegionSource::Threshold,
                fallback_reason: Some(err.to_string()),
            }
        }
    }
}
