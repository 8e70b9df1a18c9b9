//! Marcación Kiosk
//!
//! Main entry point: wires the keyboard-wedge scan source to the backend client
//! and runs the scan session until Ctrl-C.

use marcacion_kiosk::{
    marcacion_client::{MarcacionClient, RegistrarMarcacionRequest},
    scan_controller::{
        overlay::LogOverlay,
        types::{ScanHandler, ScanType},
        wedge::KeyboardWedgeSource,
        ScanController,
    },
    state::AppConfig,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Handler run per accepted scan: submits the marcación and logs the outcome
struct RegistrarHandler {
    client: Arc<MarcacionClient>,
    institucion_id: i64,
    tipo_marcacion_id: i64,
}

#[async_trait]
impl ScanHandler for RegistrarHandler {
    async fn on_scan(&self, code: &str, scan_type: ScanType) {
        let alumno_id: i64 = match code.parse() {
            Ok(id) => id,
            Err(_) => {
                tracing::warn!(code = %code, "Scanned code is not a student id, skipping");
                return;
            }
        };

        let request = RegistrarMarcacionRequest {
            institucion_id: self.institucion_id,
            alumno_id,
            tipo_marcacion_id: self.tipo_marcacion_id,
            tipo_registro: scan_type.tipo_registro(),
        };

        let response = self.client.registrar(&request).await;
        if response.error {
            tracing::warn!(
                alumno_id,
                scan_type = %scan_type,
                mensaje = %response.mensaje,
                "Marcación rejected"
            );
        } else {
            let nombre = response
                .alumno
                .as_ref()
                .map(|a| a.nombre_completo.as_str())
                .unwrap_or("(sin datos)");
            tracing::info!(
                alumno_id,
                scan_type = %scan_type,
                alumno = %nombre,
                mensaje = %response.mensaje,
                "Marcación registered"
            );
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marcacion_kiosk=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Marcación Kiosk v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::default();
    tracing::info!(
        api_base_url = %config.api_base_url,
        institucion_id = config.institucion_id,
        tipo_marcacion_id = config.tipo_marcacion_id,
        "Configuration loaded"
    );

    let client = Arc::new(MarcacionClient::new(&config.api_base_url));

    // Catalog fetch doubles as a backend reachability check
    match client.obtener_tipos().await {
        Ok(tipos) => {
            for tipo in &tipos {
                tracing::info!(
                    tipo_marcacion_id = tipo.tipo_marcacion_id,
                    descripcion = %tipo.descripcion,
                    "Marcación type available"
                );
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not fetch marcación types, continuing");
        }
    }

    let handler = Arc::new(RegistrarHandler {
        client: client.clone(),
        institucion_id: config.institucion_id,
        tipo_marcacion_id: config.tipo_marcacion_id,
    });

    let controller = ScanController::new(
        Arc::new(KeyboardWedgeSource::new()),
        handler,
        Arc::new(LogOverlay),
        config.tuning,
    );

    controller.start().await?;
    tracing::info!("Scanning. Present a code (or type one per line), Ctrl-C to exit");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    controller.stop().await;

    // Day summary on the way out
    match client.obtener_marcaciones_del_dia(config.institucion_id).await {
        Ok(marcaciones) => {
            let tardanzas = marcaciones.iter().filter(|m| m.tardanza != 0).count();
            tracing::info!(
                fecha = %chrono::Local::now().format("%Y-%m-%d"),
                total = marcaciones.len(),
                tardanzas,
                "Today's marcaciones"
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not fetch today's marcaciones");
        }
    }

    Ok(())
}
