//! MarcacionClient integration tests against a stub backend
//!
//! Spins a local axum server with the three `/Marcacion` endpoints and checks the
//! client's response reshaping, in particular that `registrar` never fails and
//! derives its message with the documented precedence.

use axum::{
    extract::Query,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use marcacion_kiosk::marcacion_client::{MarcacionClient, RegistrarMarcacionRequest};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use tokio::net::TcpListener;

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> MarcacionClient {
    MarcacionClient::new(format!("http://{}", addr))
}

fn registro_request() -> RegistrarMarcacionRequest {
    RegistrarMarcacionRequest {
        institucion_id: 3,
        alumno_id: 1001,
        tipo_marcacion_id: 1,
        tipo_registro: 1,
    }
}

#[tokio::test]
async fn obtener_tipos_returns_catalog_in_order() {
    let router = Router::new().route(
        "/Marcacion/ObtenerTipoMarcacion",
        get(|| async {
            Json(json!([
                {"tipoMarcacionId": 1, "descripcion": "Regular"},
                {"tipoMarcacionId": 2, "descripcion": "Taller extracurricular"}
            ]))
        }),
    );
    let client = client_for(serve(router).await);

    let tipos = client.obtener_tipos().await.unwrap();
    assert_eq!(tipos.len(), 2);
    assert_eq!(tipos[0].tipo_marcacion_id, 1);
    assert_eq!(tipos[0].descripcion, "Regular");
    assert_eq!(tipos[1].descripcion, "Taller extracurricular");
}

#[tokio::test]
async fn obtener_tipos_propagates_transport_failure() {
    // Nothing listens on port 1
    let client = MarcacionClient::new("http://127.0.0.1:1");
    assert!(client.obtener_tipos().await.is_err());
}

#[tokio::test]
async fn registrar_success_passes_body_through() {
    let router = Router::new().route(
        "/Marcacion/RegistrarMarcacion",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["institucionId"], 3);
            assert_eq!(body["alumnoId"], 1001);
            assert_eq!(body["tipoRegistro"], 1);
            Json(json!({
                "mensaje": "Ingreso registrado",
                "alumno": {
                    "nombreCompleto": "Ana María Quispe",
                    "nombreAlumnoCorto": "Ana Q.",
                    "idsApoderado": [77],
                    "apoderados": ["María Quispe"]
                }
            }))
        }),
    );
    let client = client_for(serve(router).await);

    let response = client.registrar(&registro_request()).await;
    assert!(!response.error);
    assert_eq!(response.mensaje, "Ingreso registrado");
    let alumno = response.alumno.unwrap();
    assert_eq!(alumno.nombre_completo, "Ana María Quispe");
    assert_eq!(alumno.ids_apoderado, vec![77]);
}

#[tokio::test]
async fn registrar_uses_backend_error_field() {
    let router = Router::new().route(
        "/Marcacion/RegistrarMarcacion",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Alumno no encontrado", "message": "otro"})),
            )
        }),
    );
    let client = client_for(serve(router).await);

    let response = client.registrar(&registro_request()).await;
    assert!(response.error);
    assert!(response.alumno.is_none());
    assert_eq!(response.mensaje, "Alumno no encontrado");
}

#[tokio::test]
async fn registrar_falls_back_to_message_field() {
    let router = Router::new().route(
        "/Marcacion/RegistrarMarcacion",
        post(|| async {
            (
                StatusCode::CONFLICT,
                Json(json!({"message": "Marcación duplicada"})),
            )
        }),
    );
    let client = client_for(serve(router).await);

    let response = client.registrar(&registro_request()).await;
    assert!(response.error);
    assert_eq!(response.mensaje, "Marcación duplicada");
}

#[tokio::test]
async fn registrar_uses_fixed_fallback_without_usable_body() {
    let router = Router::new().route(
        "/Marcacion/RegistrarMarcacion",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let client = client_for(serve(router).await);

    let response = client.registrar(&registro_request()).await;
    assert!(response.error);
    assert!(response.alumno.is_none());
    assert_eq!(response.mensaje, "Error al registrar marcación");
}

#[tokio::test]
async fn registrar_absorbs_transport_failure() {
    let client = MarcacionClient::new("http://127.0.0.1:1");

    let response = client.registrar(&registro_request()).await;
    assert!(response.error);
    assert!(response.alumno.is_none());
    assert_eq!(response.mensaje, "Error al registrar marcación");
}

#[tokio::test]
async fn obtener_marcaciones_del_dia_passes_institution_id() {
    let router = Router::new().route(
        "/Marcacion/ObtenerMarcacionesDelDia",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            assert_eq!(params.get("institucionId").map(String::as_str), Some("3"));
            Json(json!([
                {
                    "marcacionId": 10,
                    "matriculaId": 55,
                    "fecha": "2026-08-24",
                    "horaIngreso": "08:02:11",
                    "horaSalida": null,
                    "tardanza": 1
                },
                {
                    "marcacionId": 11,
                    "matriculaId": 56,
                    "fecha": "2026-08-24",
                    "horaIngreso": "07:55:40",
                    "horaSalida": "14:31:02",
                    "tardanza": 0
                }
            ]))
        }),
    );
    let client = client_for(serve(router).await);

    let marcaciones = client.obtener_marcaciones_del_dia(3).await.unwrap();
    assert_eq!(marcaciones.len(), 2);
    assert_eq!(marcaciones[0].marcacion_id, 10);
    assert!(marcaciones[0].hora_salida.is_none());
    assert_eq!(marcaciones[1].hora_salida.as_deref(), Some("14:31:02"));
}
