//! ScanController type definitions
//!
//! Data types and the collaborator seams: the camera/decoder pair that feeds the
//! loop and the handler invoked per accepted scan.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Scan mode for an accepted code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanType {
    Ingreso,
    Salida,
}

impl ScanType {
    /// Wire flag submitted as `tipoRegistro`
    pub fn tipo_registro(self) -> i32 {
        match self {
            Self::Ingreso => 1,
            Self::Salida => 2,
        }
    }
}

impl Default for ScanType {
    fn default() -> Self {
        Self::Ingreso
    }
}

impl std::fmt::Display for ScanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ingreso => write!(f, "ingreso"),
            Self::Salida => write!(f, "salida"),
        }
    }
}

/// Last accepted scan, overwritten on each new acceptance
#[derive(Debug, Clone)]
pub struct ScanEvent {
    pub code: String,
    pub at: Instant,
}

/// Session lifecycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not yet started
    Idle,
    /// Camera acquisition in progress
    Starting,
    /// Decode loop attached and processing frames
    Scanning,
    /// Cooldown after an accepted scan, decode feed released
    Paused,
    /// Terminal failure with a user-facing message
    Faulted(String),
    /// Torn down; no further callbacks fire
    Stopped,
}

/// Frame-local pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// A decoded code plus optional corner geometry
#[derive(Debug, Clone)]
pub struct Detection {
    pub text: String,
    pub points: Vec<Point>,
}

/// Outcome of a single decode attempt
#[derive(Debug, Clone)]
pub enum DecodeOutcome {
    /// No barcode in this frame
    Empty,
    /// A code was decoded
    Detection(Detection),
}

/// Decoder failure, classified by name/message substrings
#[derive(Debug, Clone, thiserror::Error)]
#[error("{name}: {message}")]
pub struct DecodeError {
    pub name: String,
    pub message: String,
}

impl DecodeError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Expected per-frame noise: no barcode in view, checksum/format mismatch.
    ///
    /// These occur on nearly every frame without a code and must not surface.
    pub fn is_benign(&self) -> bool {
        let name = self.name.to_lowercase();
        let message = self.message.to_lowercase();

        name.contains("notfound")
            || name.contains("checksum")
            || name.contains("format")
            || message.contains("no multiformat readers")
            || message.contains("checksum")
            || message.contains("not found")
            || message.contains("format exception")
    }
}

/// Camera acquisition failure
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct CameraError(pub String);

/// A live decode feed
///
/// Owned by the decode-loop task; dropping it releases the camera binding.
#[async_trait]
pub trait FrameDecoder: Send + Sync {
    /// Process the next frame, blocking until one is available
    async fn decode_frame(&self) -> Result<DecodeOutcome, DecodeError>;

    /// Native pixel dimensions of the live feed
    fn frame_size(&self) -> (u32, u32);
}

/// Acquires a decode feed
///
/// Called once at start and again at every resume; acquisition may fail
/// (permissions, device busy).
#[async_trait]
pub trait CameraSource: Send + Sync {
    async fn open(&self) -> Result<Box<dyn FrameDecoder>, CameraError>;
}

/// Callback invoked per accepted scan
///
/// May do real work (network round-trip); it is spawned, never awaited, so the
/// fixed cooldown is independent of handler latency.
#[async_trait]
pub trait ScanHandler: Send + Sync {
    async fn on_scan(&self, code: &str, scan_type: ScanType);
}
