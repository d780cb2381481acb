use std::sync::Arc;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::database::{Document, DocumentStore, Repository};
use crate::handlers::{
    abogados, agendas, asistentes, autenticacion, clientes, docesp, facturas, procesoabogados, procesos, roles,
    subprocesos, tareas, tipoprocesos, usuarios,
};
use crate::policy::{guard, Policy};

/// Shared request state: the document store plus the token/hash settings.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub security: Arc<SecurityConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, security: SecurityConfig) -> Self {
        Self {
            store,
            security: Arc::new(security),
        }
    }

    pub fn repo<T: Document>(&self) -> Repository<T> {
        Repository::new(self.store.clone())
    }
}

/// Builds the full router. Every route carries its access policy.
pub fn app(state: AppState) -> Router {
    let cors = state.security.enable_cors.then(|| cors_layer(&state.security));

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(autenticacion_routes(&state))
        .merge(usuarios_routes(&state))
        .merge(roles_routes(&state))
        .merge(personas_routes(&state))
        .merge(catalogo_routes(&state))
        .merge(procesos_routes(&state))
        .merge(facturas_routes(&state))
        .merge(agendas_routes(&state))
        .merge(tareas_routes(&state))
        .with_state(state);

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };
    router.layer(TraceLayer::new_for_http())
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if crate::is_development!() || security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::permissive().allow_origin(origins)
}

fn autenticacion_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/autenticacion", guard(post(autenticacion::login), state, Policy::PUBLIC))
        .route(
            "/api/autenticacion/perfil",
            guard(get(autenticacion::perfil), state, Policy::AUTHENTICATED),
        )
}

fn usuarios_routes(state: &AppState) -> Router<AppState> {
    let create = || guard(post(usuarios::create), state, Policy::ASISTENTE);

    Router::new()
        .route(
            "/api/usuarios",
            create().merge(guard(get(usuarios::list), state, Policy::PUBLIC)),
        )
        .route("/api/usuarios/create", create())
        .route(
            "/api/usuarios/:numeroIdentificacion",
            guard(get(usuarios::get), state, Policy::ASISTENTE_CLIENTE)
                .merge(guard(axum::routing::put(usuarios::update), state, Policy::PUBLIC))
                .merge(guard(axum::routing::delete(usuarios::delete), state, Policy::ASISTENTE)),
        )
}

fn roles_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/rols",
            guard(post(roles::create).get(roles::list), state, Policy::ASISTENTE),
        )
        .route(
            "/api/rols/:id_rol",
            guard(
                get(roles::get).put(roles::update).delete(roles::delete),
                state,
                Policy::ASISTENTE,
            ),
        )
}

/// Lawyers, assistants and clients.
fn personas_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/abogados",
            guard(post(abogados::create).get(abogados::list), state, Policy::ASISTENTE),
        )
        .route(
            "/api/abogados/:numeroIdentificacion",
            guard(get(abogados::get), state, Policy::PUBLIC)
                .merge(guard(axum::routing::put(abogados::update), state, Policy::ASISTENTE)),
        )
        .route("/api/asistentes", guard(post(asistentes::create), state, Policy::ASISTENTE))
        .route(
            "/api/asistentes/:numeroIdentificacion",
            guard(get(asistentes::get).put(asistentes::update), state, Policy::ASISTENTE),
        )
        .route(
            "/api/clientes",
            guard(post(clientes::create).get(clientes::list), state, Policy::ASISTENTE),
        )
        .route(
            "/api/clientes/:numeroIdentificacion",
            guard(get(clientes::get).put(clientes::update), state, Policy::ASISTENTE),
        )
}

/// Process types, sub-processes and special documents.
fn catalogo_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/tipoprocesos",
            guard(post(tipoprocesos::create), state, Policy::ASISTENTE)
                .merge(guard(get(tipoprocesos::list), state, Policy::ASISTENTE_ABOGADO)),
        )
        .route(
            "/api/tipoprocesos/:id_tipo",
            guard(get(tipoprocesos::get), state, Policy::ASISTENTE_ABOGADO)
                .merge(guard(axum::routing::delete(tipoprocesos::delete), state, Policy::ASISTENTE)),
        )
        .route(
            "/api/subprocesos",
            guard(post(subprocesos::create), state, Policy::ASISTENTE)
                .merge(guard(get(subprocesos::list), state, Policy::ASISTENTE_ABOGADO)),
        )
        .route(
            "/api/subprocesos/tipo/:id_tipo",
            guard(get(subprocesos::list_by_tipo), state, Policy::ASISTENTE),
        )
        .route(
            "/api/subprocesos/:id_subproceso",
            guard(get(subprocesos::get), state, Policy::ASISTENTE_ABOGADO)
                .merge(guard(axum::routing::delete(subprocesos::delete), state, Policy::ASISTENTE)),
        )
        .route(
            "/api/docesp",
            guard(post(docesp::create), state, Policy::ASISTENTE)
                .merge(guard(get(docesp::list), state, Policy::ASISTENTE_ABOGADO)),
        )
        .route(
            "/api/docesp/subproceso/:id_subproceso",
            guard(get(docesp::list_by_subproceso), state, Policy::ASISTENTE),
        )
        .route(
            "/api/docesp/:id_docesp",
            guard(get(docesp::get), state, Policy::ASISTENTE_ABOGADO)
                .merge(guard(axum::routing::delete(docesp::delete), state, Policy::ASISTENTE)),
        )
}

fn procesos_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/procesos",
            guard(post(procesos::create), state, Policy::ASISTENTE)
                .merge(guard(get(procesos::list), state, Policy::PUBLIC)),
        )
        .route(
            "/api/procesos/abogado/:numeroIdentificacionAbogado",
            guard(get(procesos::list_by_abogado), state, Policy::PUBLIC),
        )
        .route(
            "/api/procesos/:id_proceso",
            guard(get(procesos::get).put(procesos::update), state, Policy::PUBLIC)
                .merge(guard(axum::routing::delete(procesos::delete), state, Policy::ASISTENTE)),
        )
        .route(
            "/api/procesoabogados",
            guard(
                post(procesoabogados::create).get(procesoabogados::list),
                state,
                Policy::ASISTENTE,
            ),
        )
        .route(
            "/api/procesoabogados/:id_procesoabogado",
            guard(
                get(procesoabogados::get)
                    .put(procesoabogados::update)
                    .delete(procesoabogados::delete),
                state,
                Policy::ASISTENTE,
            ),
        )
}

fn facturas_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/facturas",
            guard(post(facturas::create).get(facturas::list), state, Policy::PUBLIC),
        )
        .route(
            "/api/facturas/:id_factura",
            guard(get(facturas::get), state, Policy::PUBLIC).merge(guard(
                axum::routing::put(facturas::update).delete(facturas::delete),
                state,
                Policy::ASISTENTE,
            )),
        )
}

fn agendas_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/agendas",
            guard(post(agendas::create).get(agendas::list), state, Policy::PUBLIC),
        )
        .route(
            "/api/agendas/abogado/:numeroIdentificacionAbogado",
            guard(get(agendas::list_by_abogado), state, Policy::PUBLIC),
        )
        .route(
            "/api/agendas/:id_agenda",
            guard(
                get(agendas::get).put(agendas::update).delete(agendas::delete),
                state,
                Policy::PUBLIC,
            ),
        )
}

fn tareas_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/tareas",
            guard(post(tareas::create).get(tareas::list), state, Policy::PUBLIC),
        )
        .route(
            "/api/tareas/:id_tarea",
            guard(
                get(tareas::get).put(tareas::update).delete(tareas::delete),
                state,
                Policy::PUBLIC,
            ),
        )
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Bufete API",
            "version": version,
            "description": "Law office management backend (Axum)",
            "endpoints": {
                "auth": "/api/autenticacion, /api/autenticacion/perfil",
                "people": "/api/usuarios, /api/rols, /api/abogados, /api/asistentes, /api/clientes",
                "catalog": "/api/tipoprocesos, /api/subprocesos, /api/docesp",
                "cases": "/api/procesos, /api/procesoabogados",
                "billing": "/api/facturas",
                "schedule": "/api/agendas, /api/tareas",
                "health": "/health",
            }
        }
    }))
}

async fn health(axum::extract::State(state): axum::extract::State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": true,
                "message": "database unavailable",
                "code": "SERVICE_UNAVAILABLE",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
