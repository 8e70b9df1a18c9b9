//! MarcacionClient type definitions
//!
//! Wire types for the three backend endpoints. Field names follow the backend's
//! camelCase contract via serde renames.

use serde::{Deserialize, Serialize};

/// Marcación type catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TipoMarcacion {
    pub tipo_marcacion_id: i64,
    pub descripcion: String,
}

/// Registration request, passed through unchanged to the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarMarcacionRequest {
    pub institucion_id: i64,
    pub alumno_id: i64,
    pub tipo_marcacion_id: i64,
    /// Record-type flag: 1 = ingreso, 2 = salida
    pub tipo_registro: i32,
}

/// Student info returned on a successful registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlumnoInfo {
    pub nombre_completo: String,
    pub nombre_alumno_corto: String,
    #[serde(default)]
    pub ids_apoderado: Vec<i64>,
    #[serde(default)]
    pub apoderados: Vec<String>,
}

/// Uniform registration result
///
/// Always returned by `registrar`, success or failure; failure is encoded in the
/// `error` flag rather than raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarMarcacionResponse {
    pub mensaje: String,
    pub alumno: Option<AlumnoInfo>,
    #[serde(default)]
    pub error: bool,
}

/// One marcación record from the day listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marcacion {
    pub marcacion_id: i64,
    pub matricula_id: i64,
    pub fecha: String,
    pub hora_ingreso: Option<String>,
    pub hora_salida: Option<String>,
    pub tardanza: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let req = RegistrarMarcacionRequest {
            institucion_id: 7,
            alumno_id: 1234,
            tipo_marcacion_id: 1,
            tipo_registro: 2,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["institucionId"], 7);
        assert_eq!(v["alumnoId"], 1234);
        assert_eq!(v["tipoMarcacionId"], 1);
        assert_eq!(v["tipoRegistro"], 2);
    }

    #[test]
    fn test_tipo_marcacion_deserialize() {
        let tipos: Vec<TipoMarcacion> = serde_json::from_str(
            r#"[{"tipoMarcacionId": 1, "descripcion": "Regular"},
                {"tipoMarcacionId": 2, "descripcion": "Taller"}]"#,
        )
        .unwrap();
        assert_eq!(tipos.len(), 2);
        assert_eq!(tipos[0].tipo_marcacion_id, 1);
        assert_eq!(tipos[1].descripcion, "Taller");
    }

    #[test]
    fn test_marcacion_deserialize_with_null_salida() {
        let m: Marcacion = serde_json::from_str(
            r#"{"marcacionId": 10, "matriculaId": 55, "fecha": "2026-08-24",
                "horaIngreso": "08:02:11", "horaSalida": null, "tardanza": 1}"#,
        )
        .unwrap();
        assert_eq!(m.marcacion_id, 10);
        assert_eq!(m.hora_ingreso.as_deref(), Some("08:02:11"));
        assert!(m.hora_salida.is_none());
        assert_eq!(m.tardanza, 1);
    }
}
