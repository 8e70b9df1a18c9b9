//! Keyboard-wedge scan source
//!
//! USB barcode scanners commonly present as keyboards, emitting one line per
//! read. This source adapts stdin to the camera/decoder seam so the kiosk binary
//! runs without a camera integration: non-empty line = detection (no geometry),
//! blank line = empty frame, EOF = fatal decoder fault.
//!
//! The line stream is shared, so re-opening on resume picks up where the previous
//! feed left off.

use super::types::{CameraError, CameraSource, DecodeError, DecodeOutcome, Detection, FrameDecoder};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

type SharedLines = Arc<Mutex<Lines<BufReader<Stdin>>>>;

/// Stdin-backed scan source
pub struct KeyboardWedgeSource {
    lines: SharedLines,
}

impl KeyboardWedgeSource {
    pub fn new() -> Self {
        Self {
            lines: Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines())),
        }
    }
}

impl Default for KeyboardWedgeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CameraSource for KeyboardWedgeSource {
    async fn open(&self) -> Result<Box<dyn FrameDecoder>, CameraError> {
        Ok(Box::new(WedgeFeed {
            lines: self.lines.clone(),
        }))
    }
}

struct WedgeFeed {
    lines: SharedLines,
}

#[async_trait]
impl FrameDecoder for WedgeFeed {
    async fn decode_frame(&self) -> Result<DecodeOutcome, DecodeError> {
        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) => {
                let code = line.trim();
                if code.is_empty() {
                    Ok(DecodeOutcome::Empty)
                } else {
                    Ok(DecodeOutcome::Detection(Detection {
                        text: code.to_string(),
                        points: Vec::new(),
                    }))
                }
            }
            Ok(None) => Err(DecodeError::new("InputClosed", "wedge input stream ended")),
            Err(e) => Err(DecodeError::new("IoError", e.to_string())),
        }
    }

    /// No camera feed behind a wedge, so there is no native resolution
    fn frame_size(&self) -> (u32, u32) {
        (0, 0)
    }
}
