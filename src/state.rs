//! Application configuration
//!
//! Env-var driven settings for the kiosk binary plus the scan timing knobs.

use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend API base URL
    pub api_base_url: String,
    /// Institution this kiosk records marcaciones for
    pub institucion_id: i64,
    /// Marcación type submitted with each registration
    pub tipo_marcacion_id: i64,
    /// Scan loop timing knobs
    pub tuning: ScanTuning,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: std::env::var("MARCACION_API_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
            institucion_id: std::env::var("INSTITUCION_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            tipo_marcacion_id: std::env::var("TIPO_MARCACION_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            tuning: ScanTuning::default(),
        }
    }
}

/// Scan loop timing knobs
///
/// Defaults mirror the kiosk contract: a 5 s window during which the same code is
/// treated as the same physical scan lingering in frame, a 3 s cooldown before
/// decoding resumes after an accepted scan, and a 300 ms transient highlight.
#[derive(Debug, Clone, Copy)]
pub struct ScanTuning {
    /// Window during which an identical code is treated as a repeat
    pub dedup_window: Duration,
    /// Pause after an accepted scan before decoding resumes
    pub cooldown: Duration,
    /// How long the bounding-box highlight stays on the overlay
    pub overlay_clear: Duration,
}

impl Default for ScanTuning {
    fn default() -> Self {
        Self {
            dedup_window: Duration::from_secs(5),
            cooldown: Duration::from_secs(3),
            overlay_clear: Duration::from_millis(300),
        }
    }
}
