use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::RaytraceConfig;
use crate::export::{ExportError, SceneExporter};
use crate::texture::OutputTexture;

/// Lifecycle of one external render job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Idle, no output
    Ready,
    /// Worker executing
    Running,
    /// Cancellation requested; the worker is still executing but its result
    /// will be discarded
    Canceled,
    /// Worker finished, output file ready to decode
    Done,
}

#[derive(Debug, Clone, Copy)]
enum JobEvent {
    Start,
    Stop,
    WorkerFinished,
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// `start` was called before the bridge was observed back in
    /// `Ready`/`Done`
    #[error("a render job is already in flight")]
    Busy,
    #[error("scene export failed: {0}")]
    Export(#[from] ExportError),
    #[error("failed to spawn worker: {0}")]
    Io(#[from] std::io::Error),
}

impl JobState {
    /// Validate a transition; every legal move goes through here
    fn apply(self, event: JobEvent) -> Result<JobState, JobError> {
        use JobEvent::*;
        use JobState::*;
        match (self, event) {
            (Ready | Done, Start) => Ok(Running),
            (Running | Canceled, Start) => Err(JobError::Busy),
            (Running, Stop) => Ok(Canceled),
            (Done, Stop) => Ok(Ready),
            (Ready | Canceled, Stop) => Ok(self),
            (Running, WorkerFinished) => Ok(Done),
            (Canceled, WorkerFinished) => Ok(Ready),
            // Completion events are per-job channels drained before the job
            // is replaced, so these never fire; ignore rather than fail.
            (Ready | Done, WorkerFinished) => Ok(self),
        }
    }
}

/// What the worker reported when it finished
enum WorkerOutcome {
    Exited { success: bool },
    TimedOut,
    Failed(String),
}

/// Everything the worker thread needs, snapshotted at start
struct WorkerSpec {
    program: String,
    antialias_threshold: f32,
    timeout: Option<Duration>,
    scene_path: PathBuf,
    image_path: PathBuf,
    log_path: PathBuf,
    width: u32,
    height: u32,
}

struct Job {
    image_path: PathBuf,
    log_path: PathBuf,
    done_rx: mpsc::Receiver<WorkerOutcome>,
    worker: Option<JoinHandle<()>>,
    completed_ok: bool,
}

/// Bridge to the external ray-tracing program
///
/// At most one job is in flight per instance. The caller thread owns all
/// state; the worker thread only reports completion over a channel, so the
/// two never mutate shared data. Cancellation is advisory: the external
/// process is not signaled (unless the configured timeout fires), the
/// worker simply finishes and its result is thrown away.
///
/// Every job gets fresh scene/image/log paths, so a canceled worker that is
/// still running cannot touch a successor's files.
pub struct Raytracer {
    config: RaytraceConfig,
    state: JobState,
    job: Option<Job>,
    texture: Option<OutputTexture>,
    next_job_id: u64,
}

impl Raytracer {
    pub fn new(config: RaytraceConfig) -> Self {
        Self {
            config,
            state: JobState::Ready,
            job: None,
            texture: None,
            next_job_id: 0,
        }
    }

    /// Start a render job in the background
    ///
    /// Accepted only from `Ready` or `Done`; while a worker is in flight
    /// (`Running` or `Canceled`) this returns [`JobError::Busy`], so callers
    /// must poll [`is_idle`](Self::is_idle) rather than assume cancellation
    /// is instantaneous. Exports the scene on the calling thread, then
    /// spawns a worker that runs the renderer and waits for it to exit.
    pub fn start(
        &mut self,
        exporter: &dyn SceneExporter,
        width: u32,
        height: u32,
    ) -> Result<(), JobError> {
        self.poll();
        let next = self.state.apply(JobEvent::Start)?;

        // Whatever we produced before is invalid for the new job. Should
        // export or spawn fail below, the bridge is left idle with the old
        // output already discarded.
        self.texture = None;
        self.job = None;
        self.state = JobState::Ready;

        let id = self.next_job_id;
        self.next_job_id += 1;
        let scene_path = self.config.work_dir.join(format!("preview-{id:04}.pov"));
        let image_path = self.config.work_dir.join(format!("preview-{id:04}.png"));
        let log_path = self.config.work_dir.join(format!("preview-{id:04}.log"));

        exporter.export(&scene_path, width, height)?;

        let (done_tx, done_rx) = mpsc::channel();
        let spec = WorkerSpec {
            program: self.config.program.clone(),
            antialias_threshold: self.config.antialias_threshold,
            timeout: self.config.timeout(),
            scene_path,
            image_path: image_path.clone(),
            log_path: log_path.clone(),
            width,
            height,
        };
        let worker = thread::Builder::new()
            .name(format!("raytrace-{id}"))
            .spawn(move || {
                let _ = done_tx.send(run_renderer(spec));
            })?;

        tracing::debug!("[raytrace] job {id} started ({width}x{height})");
        self.job = Some(Job {
            image_path,
            log_path,
            done_rx,
            worker: Some(worker),
            completed_ok: false,
        });
        self.state = next;
        Ok(())
    }

    /// Request cancellation, or discard a finished job's output
    ///
    /// From `Running` this marks the job `Canceled`; the worker keeps
    /// running and its result is discarded when it finishes. From `Done`
    /// this drops the output and returns to `Ready`. Otherwise a no-op.
    pub fn stop(&mut self) {
        self.poll();
        self.texture = None;
        if let Ok(next) = self.state.apply(JobEvent::Stop) {
            if next != self.state {
                tracing::debug!("[raytrace] {:?} -> {:?}", self.state, next);
                self.state = next;
            }
            if self.state == JobState::Ready {
                self.job = None;
            }
        }
    }

    /// Absorb a pending worker completion and return the current state
    pub fn poll(&mut self) -> JobState {
        if let Some(job) = &mut self.job {
            if let Ok(outcome) = job.done_rx.try_recv() {
                // The worker has sent its one event; join it so no handle
                // dangles past completion.
                if let Some(worker) = job.worker.take() {
                    let _ = worker.join();
                }
                match outcome {
                    WorkerOutcome::Exited { success } => job.completed_ok = success,
                    WorkerOutcome::TimedOut => job.completed_ok = false,
                    WorkerOutcome::Failed(reason) => {
                        tracing::error!("[raytrace] worker failed: {}", reason);
                        job.completed_ok = false;
                    }
                }
                if let Ok(next) = self.state.apply(JobEvent::WorkerFinished) {
                    self.state = next;
                }
                if self.state == JobState::Ready {
                    // Canceled job: the output is unusable by contract.
                    self.job = None;
                }
            }
        }
        self.state
    }

    /// True iff a new `start` would be accepted
    pub fn is_idle(&mut self) -> bool {
        matches!(self.poll(), JobState::Ready | JobState::Done)
    }

    /// The finished image as a displayable texture
    ///
    /// `None` unless the state is `Done`. The first access decodes the
    /// output file and caches it; later calls return the cached texture
    /// until the job is restarted or stopped. A renderer that exited
    /// nonzero (or an undecodable file) yields `None`; absence of output
    /// is the only failure signal callers get.
    pub fn get_output(&mut self) -> Option<&OutputTexture> {
        if self.poll() != JobState::Done {
            return None;
        }
        if self.texture.is_none() {
            let job = self.job.as_ref()?;
            if !job.completed_ok {
                return None;
            }
            match OutputTexture::from_file(&job.image_path) {
                Ok(texture) => self.texture = Some(texture),
                Err(e) => {
                    tracing::error!(
                        "[raytrace] failed to decode {}: {}",
                        job.image_path.display(),
                        e
                    );
                    return None;
                }
            }
        }
        self.texture.as_ref()
    }

    /// Path the current job's image is (or will be) written to
    pub fn output_path(&self) -> Option<&Path> {
        self.job.as_ref().map(|job| job.image_path.as_path())
    }

    /// Path the current job's renderer output is logged to
    pub fn log_path(&self) -> Option<&Path> {
        self.job.as_ref().map(|job| job.log_path.as_path())
    }
}

/// Run the external renderer to completion and report how it went
///
/// Runs on the worker thread. Stdout/stderr go to the job's log file; a
/// configured timeout kills the child, otherwise we wait however long the
/// renderer takes.
fn run_renderer(spec: WorkerSpec) -> WorkerOutcome {
    let stdout = match File::create(&spec.log_path) {
        Ok(file) => file,
        Err(e) => return WorkerOutcome::Failed(format!("failed to create log file: {}", e)),
    };
    let stderr = match stdout.try_clone() {
        Ok(file) => file,
        Err(e) => return WorkerOutcome::Failed(format!("failed to clone log handle: {}", e)),
    };

    let mut command = Command::new(&spec.program);
    command
        .arg(format!("-W{}", spec.width))
        .arg(format!("-H{}", spec.height))
        .arg(format!("+A{}", spec.antialias_threshold))
        .arg("-D")
        .arg("+UA")
        .arg(format!("+O{}", spec.image_path.display()))
        .arg(&spec.scene_path)
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr));
    tracing::debug!("[raytrace] running {:?}", command);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            return WorkerOutcome::Failed(format!("failed to spawn {}: {}", spec.program, e));
        }
    };

    let status = match spec.timeout {
        None => child.wait(),
        Some(limit) => {
            let deadline = Instant::now() + limit;
            loop {
                match child.try_wait() {
                    Ok(Some(status)) => break Ok(status),
                    Ok(None) => {
                        if Instant::now() >= deadline {
                            tracing::error!(
                                "[raytrace] renderer exceeded {:?}, killing it",
                                limit
                            );
                            let _ = child.kill();
                            let _ = child.wait();
                            return WorkerOutcome::TimedOut;
                        }
                        thread::sleep(Duration::from_millis(50));
                    }
                    Err(e) => break Err(e),
                }
            }
        }
    };

    match status {
        Ok(status) if status.success() => WorkerOutcome::Exited { success: true },
        Ok(status) => {
            tracing::error!(
                "[raytrace] renderer exited with {}, see {}",
                status,
                spec.log_path.display()
            );
            WorkerOutcome::Exited { success: false }
        }
        Err(e) => WorkerOutcome::Failed(format!("failed to wait for renderer: {}", e)),
    }
}
