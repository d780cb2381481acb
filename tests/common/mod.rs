#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use bufete_api::auth::{generate_jwt, Claims, Role};
use bufete_api::config::SecurityConfig;
use bufete_api::database::MemoryStore;
use bufete_api::{app, bootstrap, AppState};

pub fn security() -> SecurityConfig {
    SecurityConfig {
        jwt_secret: "integration-test-secret".to_string(),
        jwt_expiry_hours: 1,
        bcrypt_cost: 4,
        enable_cors: false,
        cors_origins: vec![],
    }
}

/// The real router over a fresh in-memory store.
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(Arc::new(MemoryStore::new()), security());
        let router = app(state.clone());
        Self { state, router }
    }

    /// Fresh app with roles 1 abogado, 2 asistente, 3 cliente.
    pub async fn with_roles() -> Result<Self> {
        let app = Self::new();
        bootstrap::seed_roles(&app.state).await?;
        Ok(app)
    }

    /// Token for a principal that need not exist in the store.
    pub fn token(&self, role: Role) -> String {
        self.token_for("9999999", role)
    }

    pub fn token_for(&self, numero_identificacion: &str, role: Role) -> String {
        let claims = Claims::new(
            numero_identificacion.to_string(),
            "Prueba".to_string(),
            "Integracion".to_string(),
            "prueba@bufete.co".to_string(),
            "3000000000".to_string(),
            role.as_str().to_string(),
            1,
        );
        generate_jwt(&claims, &self.state.security).expect("token")
    }

    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, token);
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => request.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body from {}", uri))?
        };
        Ok((status, value))
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, uri, token, None).await
    }
}

pub fn usuario(numero_identificacion: &str, email: &str, telefono: &str, id_rol: i64) -> Value {
    json!({
        "numeroIdentificacion": numero_identificacion,
        "nombres": "Laura",
        "apellidos": "Gomez",
        "telefono": telefono,
        "email": email,
        "password": "secreto1",
        "id_rol": id_rol,
    })
}

/// Creates a client user 1234567, a lawyer user 7654321 with their profile
/// records, and process type 1 "Notariales".
pub async fn seed_parties(app: &TestApp) -> Result<()> {
    let asistente = app.token(Role::Asistente);
    let token = Some(asistente.as_str());

    let steps = [
        ("/api/usuarios", usuario("1234567", "cliente@bufete.co", "3001111111", 3)),
        ("/api/usuarios", usuario("7654321", "abogado@bufete.co", "3002222222", 1)),
        (
            "/api/clientes",
            json!({ "numeroIdentificacion": "1234567", "direccion": "Calle 1" }),
        ),
        (
            "/api/abogados",
            json!({
                "numeroIdentificacion": "7654321",
                "especialidad": "Civil",
                "area_juridica": "Familia",
                "experiencia": "Diez años",
            }),
        ),
        ("/api/tipoprocesos", json!({ "id_tipo": 1, "nombre": "Notariales" })),
    ];
    for (uri, body) in steps {
        let (status, body) = app.post(uri, token, body).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "{} returned {}: {}", uri, status, body);
    }
    Ok(())
}

pub fn proceso(id_proceso: i64) -> Value {
    json!({
        "id_proceso": id_proceso,
        "descripcion": "Sucesion familiar",
        "fecha_inicio": "2024-03-01",
        "estado": "activo",
        "numeroIdentificacionCliente": "1234567",
        "numeroIdentificacionAbogado": "7654321",
        "id_tipo": 1,
    })
}

/// Parties plus process `id_proceso`.
pub async fn seed_proceso(app: &TestApp, id_proceso: i64) -> Result<()> {
    seed_parties(app).await?;
    let asistente = app.token(Role::Asistente);
    let (status, body) = app.post("/api/procesos", Some(&asistente), proceso(id_proceso)).await?;
    anyhow::ensure!(status == StatusCode::CREATED, "process create returned {}: {}", status, body);
    Ok(())
}
