//! MarcacionClient HTTP client
//!
//! ## Responsibilities
//!
//! - Fetch the marcación type catalog
//! - Register a marcación per accepted scan
//! - List the day's marcaciones
//!
//! Only `registrar` normalizes failures into a value: it runs synchronously in
//! response to a live scan and must never crash the scan loop. The two listing
//! calls propagate transport errors to the caller unmodified.

pub mod types;

use crate::error::Result;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

pub use types::{
    AlumnoInfo, Marcacion, RegistrarMarcacionRequest, RegistrarMarcacionResponse, TipoMarcacion,
};

/// Fallback message when the backend gives nothing usable
const FALLBACK_REGISTRO_MSG: &str = "Error al registrar marcación";

/// Backend API client
#[derive(Clone)]
pub struct MarcacionClient {
    http: Client,
    base_url: String,
}

impl MarcacionClient {
    /// Create a new client against the given API base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the marcación type catalog
    ///
    /// `GET /Marcacion/ObtenerTipoMarcacion`
    pub async fn obtener_tipos(&self) -> Result<Vec<TipoMarcacion>> {
        let url = format!("{}/Marcacion/ObtenerTipoMarcacion", self.base_url);
        debug!(url = %url, "Fetching marcación types");

        let tipos = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<TipoMarcacion>>()
            .await?;

        debug!(count = tipos.len(), "Fetched marcación types");
        Ok(tipos)
    }

    /// Register a marcación
    ///
    /// `POST /Marcacion/RegistrarMarcacion`
    ///
    /// Never fails: transport errors, non-success statuses and unparseable bodies
    /// are all absorbed into a `RegistrarMarcacionResponse` with `error: true` and
    /// a human-readable `mensaje`.
    pub async fn registrar(&self, req: &RegistrarMarcacionRequest) -> RegistrarMarcacionResponse {
        let url = format!("{}/Marcacion/RegistrarMarcacion", self.base_url);
        debug!(
            alumno_id = req.alumno_id,
            tipo_registro = req.tipo_registro,
            "Registering marcación"
        );

        let response = match self.http.post(&url).json(req).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Registration transport failure");
                return Self::failure(FALLBACK_REGISTRO_MSG.to_string());
            }
        };

        let status = response.status();
        let body = response.json::<serde_json::Value>().await.ok();

        if !status.is_success() {
            let mensaje = derive_error_message(body.as_ref());
            warn!(status = %status, mensaje = %mensaje, "Registration rejected");
            return Self::failure(mensaje);
        }

        match body {
            Some(v) => {
                let mensaje = v["mensaje"].as_str().unwrap_or_default().to_string();
                let alumno = serde_json::from_value::<Option<AlumnoInfo>>(v["alumno"].clone())
                    .unwrap_or(None);
                RegistrarMarcacionResponse {
                    mensaje,
                    alumno,
                    error: false,
                }
            }
            None => {
                warn!(status = %status, "Registration response body unparseable");
                Self::failure(FALLBACK_REGISTRO_MSG.to_string())
            }
        }
    }

    /// List the day's marcaciones for an institution
    ///
    /// `GET /Marcacion/ObtenerMarcacionesDelDia?institucionId=`
    pub async fn obtener_marcaciones_del_dia(&self, institucion_id: i64) -> Result<Vec<Marcacion>> {
        let url = format!("{}/Marcacion/ObtenerMarcacionesDelDia", self.base_url);

        let marcaciones = self
            .http
            .get(&url)
            .query(&[("institucionId", institucion_id)])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Marcacion>>()
            .await?;

        debug!(
            institucion_id,
            count = marcaciones.len(),
            "Fetched day's marcaciones"
        );
        Ok(marcaciones)
    }

    fn failure(mensaje: String) -> RegistrarMarcacionResponse {
        RegistrarMarcacionResponse {
            mensaje,
            alumno: None,
            error: true,
        }
    }
}

/// Extract a human-readable message from a failure body
///
/// Priority: backend `error` field, then `message` field, then the fixed fallback.
fn derive_error_message(body: Option<&serde_json::Value>) -> String {
    body.and_then(|v| {
        v["error"]
            .as_str()
            .or_else(|| v["message"].as_str())
            .map(|s| s.to_string())
    })
    .unwrap_or_else(|| FALLBACK_REGISTRO_MSG.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_field_takes_priority() {
        let body = json!({"error": "Alumno no encontrado", "message": "otro"});
        assert_eq!(derive_error_message(Some(&body)), "Alumno no encontrado");
    }

    #[test]
    fn test_message_field_when_no_error_field() {
        let body = json!({"message": "Institución inválida"});
        assert_eq!(derive_error_message(Some(&body)), "Institución inválida");
    }

    #[test]
    fn test_fallback_when_body_has_neither() {
        let body = json!({"detail": 42});
        assert_eq!(derive_error_message(Some(&body)), FALLBACK_REGISTRO_MSG);
    }

    #[test]
    fn test_fallback_when_no_body() {
        assert_eq!(derive_error_message(None), FALLBACK_REGISTRO_MSG);
    }

    #[test]
    fn test_non_string_error_field_falls_through() {
        let body = json!({"error": true, "message": "texto"});
        assert_eq!(derive_error_message(Some(&body)), "texto");
    }
}
