//! Marcación Kiosk Library
//!
//! Attendance scan kiosk core: scan a student's QR/barcode and record an ingreso
//! (check-in) or salida (check-out) marcación against the school backend.
//!
//! ## Components
//!
//! 1. MarcacionClient - stateless mapper over the three backend endpoints
//! 2. ScanController - decode loop with dedup window and pause/resume cooldown
//!
//! ## Design Principles
//!
//! - The camera, barcode decoder, overlay surface and scan handler are trait
//!   seams; this crate owns only the control flow between them
//! - Registration failures are values, never panics: the scan loop must survive
//!   any backend condition

pub mod error;
pub mod marcacion_client;
pub mod scan_controller;
pub mod state;

pub use error::{Error, Result};
pub use marcacion_client::MarcacionClient;
pub use scan_controller::ScanController;
pub use state::{AppConfig, ScanTuning};
