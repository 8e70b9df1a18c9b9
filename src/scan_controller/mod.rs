//! ScanController - scan/pause/resume state machine
//!
//! ## Responsibilities
//!
//! - Own the decode feed lifecycle (acquire at start, release on pause/stop,
//!   re-acquire on resume)
//! - Suppress repeat reads of the same code within the dedup window
//! - Invoke the injected handler once per accepted scan
//! - Draw the transient bounding-box highlight
//!
//! One active decode loop per session. The loop task owns the `FrameDecoder`
//! handle, so stopping or aborting the task releases the camera binding. After an
//! accepted scan the loop returns and a one-shot timer re-acquires the feed after
//! the cooldown; `stop()` aborts that timer before it can fire.

pub mod overlay;
pub mod types;
pub mod wedge;


use crate::error::{Error, Result};
use crate::state::ScanTuning;
use overlay::OverlaySurface;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};
use types::{
    CameraSource, DecodeOutcome, Detection, ScanEvent, ScanHandler, ScanType, SessionState,
};

/// User-facing message for camera acquisition failure
const CAMERA_ERROR_MSG: &str = "No se pudo acceder a la cámara. Verifica permisos.";

/// Prefix for unexpected decoder faults
const SCANNER_ERROR_PREFIX: &str = "Ocurrió un problema con el escáner: ";

/// Scan session controller
#[derive(Clone)]
pub struct ScanController {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn CameraSource>,
    handler: Arc<dyn ScanHandler>,
    overlay: Arc<dyn OverlaySurface>,
    tuning: ScanTuning,
    /// Read at decode time, not captured at loop start
    scan_type: RwLock<ScanType>,
    state: RwLock<SessionState>,
    running: RwLock<bool>,
    last_scan: RwLock<Option<ScanEvent>>,
    decode_task: Mutex<Option<JoinHandle<()>>>,
    resume_timer: Mutex<Option<JoinHandle<()>>>,
    overlay_timer: Mutex<Option<JoinHandle<()>>>,
}

impl ScanController {
    /// Create a new controller; no resources are acquired until `start`
    pub fn new(
        source: Arc<dyn CameraSource>,
        handler: Arc<dyn ScanHandler>,
        overlay: Arc<dyn OverlaySurface>,
        tuning: ScanTuning,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                handler,
                overlay,
                tuning,
                scan_type: RwLock::new(ScanType::default()),
                state: RwLock::new(SessionState::Idle),
                running: RwLock::new(false),
                last_scan: RwLock::new(None),
                decode_task: Mutex::new(None),
                resume_timer: Mutex::new(None),
                overlay_timer: Mutex::new(None),
            }),
        }
    }

    /// Acquire the camera and begin continuous decoding
    ///
    /// Acquisition failure is terminal for this session: the state becomes
    /// `Faulted` with a user-facing message and no retry is attempted.
    pub async fn start(&self) -> Result<()> {
        {
            let mut running = self.inner.running.write().await;
            if *running {
                warn!("Scan session already running");
                return Ok(());
            }
            *running = true;
        }

        self.inner.set_state(SessionState::Starting).await;

        match self.inner.source.open().await {
            Ok(decoder) => {
                self.inner.set_state(SessionState::Scanning).await;
                let task = tokio::spawn(run_decode_loop(self.inner.clone(), decoder));
                *self.inner.decode_task.lock().await = Some(task);
                info!("Scan session started");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Camera acquisition failed");
                *self.inner.running.write().await = false;
                self.inner
                    .set_state(SessionState::Faulted(CAMERA_ERROR_MSG.to_string()))
                    .await;
                Err(Error::Camera(e.0))
            }
        }
    }

    /// Tear the session down
    ///
    /// Cancels the pending resume and overlay timers and aborts the decode loop
    /// (dropping its feed handle). No callback fires after this returns.
    pub async fn stop(&self) {
        *self.inner.running.write().await = false;

        if let Some(timer) = self.inner.resume_timer.lock().await.take() {
            timer.abort();
        }
        if let Some(timer) = self.inner.overlay_timer.lock().await.take() {
            timer.abort();
        }
        if let Some(task) = self.inner.decode_task.lock().await.take() {
            task.abort();
        }

        self.inner.set_state(SessionState::Stopped).await;
        info!("Scan session stopped");
    }

    /// Switch the mode applied to the next accepted scan
    ///
    /// Takes effect at the next decode; the running loop is not re-registered.
    pub async fn set_scan_type(&self, scan_type: ScanType) {
        *self.inner.scan_type.write().await = scan_type;
        info!(scan_type = %scan_type, "Scan type switched");
    }

    /// Currently selected scan mode
    pub async fn scan_type(&self) -> ScanType {
        *self.inner.scan_type.read().await
    }

    /// Current lifecycle state
    pub async fn state(&self) -> SessionState {
        self.inner.state.read().await.clone()
    }

    /// User-facing message if the session has faulted
    pub async fn error_message(&self) -> Option<String> {
        match &*self.inner.state.read().await {
            SessionState::Faulted(msg) => Some(msg.clone()),
            _ => None,
        }
    }
}

impl Inner {
    async fn set_state(&self, state: SessionState) {
        *self.state.write().await = state;
    }

    /// Same code as the last acceptance, still inside the dedup window
    async fn is_duplicate(&self, code: &str) -> bool {
        match &*self.last_scan.read().await {
            Some(last) => last.code == code && last.at.elapsed() < self.tuning.dedup_window,
            None => false,
        }
    }

    /// Draw the highlight and arm its auto-clear, replacing any stale timer
    async fn draw_highlight(&self, points: Vec<types::Point>, frame: (u32, u32)) {
        overlay::draw_bounding_box(self.overlay.as_ref(), &points, frame);

        let surface = self.overlay.clone();
        let delay = self.tuning.overlay_clear;
        let timer = tokio::spawn(async move {
            sleep(delay).await;
            surface.clear();
        });

        if let Some(stale) = self.overlay_timer.lock().await.replace(timer) {
            stale.abort();
        }
    }

    /// Arm the one-shot cooldown timer that re-acquires the feed
    async fn arm_resume(inner: Arc<Inner>) {
        let handle = inner.clone();
        let timer = tokio::spawn(async move {
            let inner = handle;
            sleep(inner.tuning.cooldown).await;

            if !*inner.running.read().await {
                return;
            }

            match inner.source.open().await {
                Ok(decoder) => {
                    inner.set_state(SessionState::Scanning).await;
                    debug!("Decode loop resumed after cooldown");
                    let task = tokio::spawn(run_decode_loop(inner.clone(), decoder));
                    *inner.decode_task.lock().await = Some(task);
                }
                Err(e) => {
                    error!(error = %e, "Camera re-acquisition failed on resume");
                    *inner.running.write().await = false;
                    inner
                        .set_state(SessionState::Faulted(CAMERA_ERROR_MSG.to_string()))
                        .await;
                }
            }
        });

        *inner.resume_timer.lock().await = Some(timer);
    }

    /// One accepted scan: record, highlight, dispatch, pause
    async fn accept(inner: &Arc<Inner>, detection: Detection, frame: (u32, u32)) {
        let Detection { text, points } = detection;

        *inner.last_scan.write().await = Some(ScanEvent {
            code: text.clone(),
            at: Instant::now(),
        });

        if points.len() >= 2 {
            inner.draw_highlight(points, frame).await;
        }

        let scan_type = *inner.scan_type.read().await;
        info!(code = %text, scan_type = %scan_type, "Scan accepted");

        // Fire and forget: the cooldown is fixed-duration, independent of the
        // handler's latency.
        let handler = inner.handler.clone();
        tokio::spawn(async move {
            handler.on_scan(&text, scan_type).await;
        });

        inner.set_state(SessionState::Paused).await;
        Inner::arm_resume(inner.clone()).await;
    }
}

/// Continuous decode loop
///
/// Owns the feed handle; returning from this function releases it.
///
/// Returns a boxed future to break the `Send` inference cycle with
/// `arm_resume`, which re-spawns this loop.
fn run_decode_loop(
    inner: Arc<Inner>,
    decoder: Box<dyn types::FrameDecoder>,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> {
    Box::pin(async move {
    loop {
        if !*inner.running.read().await {
            return;
        }

        match decoder.decode_frame().await {
            Ok(DecodeOutcome::Empty) => continue,
            Ok(DecodeOutcome::Detection(detection)) => {
                if inner.is_duplicate(&detection.text).await {
                    debug!(code = %detection.text, "Repeat read inside dedup window, ignored");
                    continue;
                }

                Inner::accept(&inner, detection, decoder.frame_size()).await;
                // Pause: drop the feed until the cooldown timer re-acquires it
                return;
            }
            Err(e) if e.is_benign() => continue,
            Err(e) => {
                error!(name = %e.name, message = %e.message, "Decoder fault, halting session");
                *inner.running.write().await = false;
                inner
                    .set_state(SessionState::Faulted(format!(
                        "{}{}",
                        SCANNER_ERROR_PREFIX, e.message
                    )))
                    .await;
                // Fatal faults release the feed rather than leaving it attached
                return;
            }
        }
    }
    })
}
