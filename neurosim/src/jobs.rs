//! Background region-export jobs.
//!
//! The registry is plain owned state: construct one per process (or per
//! test) and share it by reference. Jobs are keyed by case identifier; a
//! case has at most one job in flight.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use hashbrown::HashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use volume_io::{discover_case, load_case};
use volume_segment::SegmentationBackend;

use crate::error::{PipelineError, PipelineResult};
use crate::export::{export_region_meshes, RegionArtifact};
use crate::params::PipelineParams;

/// State of a case's export job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    /// Still running.
    Processing,
    /// Finished; the written artifacts.
    Completed {
        /// Region surfaces written.
        artifacts: Vec<RegionArtifact>,
    },
    /// Finished with an error.
    Failed {
        /// Error message.
        reason: String,
    },
}

impl JobStatus {
    /// Whether the job has finished, successfully or not.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        !matches!(self, Self::Processing)
    }
}

/// What a region-export job works on.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    /// Case identifier the job is keyed by.
    pub case_id: String,
    /// Directory holding the case's imaging input.
    pub case_dir: PathBuf,
    /// Directory receiving the STL files.
    pub out_dir: PathBuf,
}

#[derive(Default)]
struct Registry {
    status: HashMap<String, JobStatus>,
    handles: HashMap<String, JoinHandle<()>>,
}

/// Tracks background region-export jobs.
#[derive(Clone, Default)]
pub struct JobRegistry {
    inner: Arc<Mutex<Registry>>,
    backend: Option<Arc<dyn SegmentationBackend>>,
}

impl std::fmt::Debug for JobRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRegistry")
            .field("jobs", &self.inner.lock().status.len())
            .field("backend", &self.backend.as_ref().map(|b| b.name().to_string()))
            .finish()
    }
}

impl JobRegistry {
    /// An empty registry using threshold segmentation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route region labelling through `backend`.
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn SegmentationBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Start exporting region surfaces for a case and return at once.
    ///
    /// If a job for the same case is still running, no new job is started.
    /// Either way the returned status is [`JobStatus::Processing`].
    pub fn spawn_region_export(&self, request: ExportRequest, params: PipelineParams) -> JobStatus {
        let backend = self.backend.clone();
        let case_id = request.case_id.clone();
        self.spawn_job(case_id, move || run_export(&request, backend.as_ref(), &params))
    }

    fn spawn_job<F>(&self, case_id: String, job: F) -> JobStatus
    where
        F: FnOnce() -> PipelineResult<Vec<RegionArtifact>> + Send + 'static,
    {
        let mut registry = self.inner.lock();
        registry.reap();
        if registry.status.get(&case_id) == Some(&JobStatus::Processing) {
            return JobStatus::Processing;
        }
        registry.status.insert(case_id.clone(), JobStatus::Processing);

        let inner = Arc::clone(&self.inner);
        let job_case = case_id.clone();
        let spawned = thread::Builder::new()
            .name(format!("region-export-{case_id}"))
            .spawn(move || {
                let status = match job() {
                    Ok(artifacts) => {
                        info!(case = %job_case, regions = artifacts.len(), "Export job finished");
                        JobStatus::Completed { artifacts }
                    }
                    Err(err) => {
                        error!(case = %job_case, error = %err, "Export job failed");
                        JobStatus::Failed {
                            reason: err.to_string(),
                        }
                    }
                };
                inner.lock().status.insert(job_case, status);
            });

        match spawned {
            Ok(handle) => {
                registry.handles.insert(case_id, handle);
            }
            Err(err) => {
                error!(case = %case_id, error = %err, "Could not start export job");
                registry.status.insert(
                    case_id,
                    JobStatus::Failed {
                        reason: err.to_string(),
                    },
                );
            }
        }
        JobStatus::Processing
    }

    /// Current status of a case's job, or `None` if none was started.
    #[must_use]
    pub fn status(&self, case_id: &str) -> Option<JobStatus> {
        let mut registry = self.inner.lock();
        registry.reap();
        registry.status.get(case_id).cloned()
    }

    /// Block until a case's job finishes and return its final status.
    #[must_use]
    pub fn wait(&self, case_id: &str) -> Option<JobStatus> {
        let handle = self.inner.lock().handles.remove(case_id);
        if let Some(handle) = handle {
            if handle.join().is_err() {
                self.inner.lock().record_panic(case_id);
            }
        }
        self.status(case_id)
    }
}

impl Registry {
    /// Join threads that have exited. A thread that exits without
    /// recording a final status panicked.
    fn reap(&mut self) {
        let finished: Vec<String> = self
            .handles
            .iter()
            .filter(|(_, handle)| handle.is_finished())
            .map(|(case_id, _)| case_id.clone())
            .collect();
        for case_id in finished {
            let Some(handle) = self.handles.remove(&case_id) else {
                continue;
            };
            if handle.join().is_err() {
                self.record_panic(&case_id);
            }
        }
    }

    fn record_panic(&mut self, case_id: &str) {
        error!(case = %case_id, "Export job panicked");
        self.status.insert(
            case_id.to_string(),
            JobStatus::Failed {
                reason: "export job panicked".to_string(),
            },
        );
    }
}

fn run_export(
    request: &ExportRequest,
    backend: Option<&Arc<dyn SegmentationBackend>>,
    params: &PipelineParams,
) -> Result<Vec<RegionArtifact>, PipelineError> {
    let input = discover_case(&request.case_dir).ok_or_else(|| PipelineError::InputAbsent {
        path: request.case_dir.clone(),
    })?;
    let loaded = load_case(&input)?;
    let export = export_region_meshes(&loaded.volume, &request.out_dir, backend, params)?;
    Ok(export.artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_case_fails() {
        let out = tempfile::tempdir().unwrap();
        let registry = JobRegistry::new();
        let request = ExportRequest {
            case_id: "case-x".into(),
            case_dir: PathBuf::from("/nonexistent/case-x"),
            out_dir: out.path().to_path_buf(),
        };

        assert_eq!(
            registry.spawn_region_export(request, PipelineParams::default()),
            JobStatus::Processing
        );
        let status = registry.wait("case-x").unwrap();
        assert!(status.is_finished());
        assert!(matches!(status, JobStatus::Failed { reason } if reason.contains("no imaging input")));
    }

    #[test]
    fn panicked_job_is_reaped() {
        let registry = JobRegistry::new();
        registry.spawn_job("case-p".into(), || panic!("segmentation blew up"));

        let mut status = registry.status("case-p");
        for _ in 0..500 {
            if status != Some(JobStatus::Processing) {
                break;
            }
            thread::sleep(std::time::Duration::from_millis(10));
            status = registry.status("case-p");
        }
        assert_eq!(
            status,
            Some(JobStatus::Failed {
                reason: "export job panicked".to_string()
            })
        );
        assert!(registry.inner.lock().handles.is_empty());

        // The case accepts a new job once the panicked one is recorded.
        registry.spawn_job("case-p".into(), || Ok(Vec::new()));
        assert_eq!(
            registry.wait("case-p"),
            Some(JobStatus::Completed { artifacts: Vec::new() })
        );
    }

    #[test]
    fn unknown_case_has_no_status() {
        let registry = JobRegistry::new();
        assert_eq!(registry.status("nope"), None);
        assert_eq!(registry.wait("nope"), None);
    }

    #[test]
    fn status_serializes_with_tag() {
        let json = serde_json::to_string(&JobStatus::Processing).unwrap();
        assert_eq!(json, r#"{"status":"processing"}"#);
    }
}
