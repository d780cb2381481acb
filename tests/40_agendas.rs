mod common;

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{json, Value};

use bufete_api::auth::Role;
use common::{seed_proceso, TestApp};

fn agenda(id_proceso: i64, descripcion: &str) -> Value {
    json!({
        "fecha": "2024-05-10",
        "hora": "9:30",
        "descripcion": descripcion,
        "estado": "programada",
        "id_proceso": id_proceso,
    })
}

#[tokio::test]
async fn agenda_ids_are_assigned_sequentially() -> Result<()> {
    let app = TestApp::with_roles().await?;
    seed_proceso(&app, 10).await?;

    let (status, body) = app.post("/api/agendas", None, agenda(10, "Audiencia inicial")).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id_agenda"], 1);

    let (_, body) = app.post("/api/agendas", None, agenda(10, "Firma de poder")).await?;
    assert_eq!(body["data"]["id_agenda"], 2);

    let (status, _) = app.delete("/api/agendas/2", None).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.post("/api/agendas", None, agenda(10, "Firma de poder")).await?;
    assert_eq!(body["data"]["id_agenda"], 2);

    let mut with_id = agenda(10, "Con id propio");
    with_id["id_agenda"] = json!(50);
    let (status, _) = app.post("/api/agendas", None, with_id).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_never_share_an_id() -> Result<()> {
    let app = Arc::new(TestApp::with_roles().await?);
    seed_proceso(&app, 10).await?;

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let app = app.clone();
            tokio::spawn(async move { app.post("/api/agendas", None, agenda(10, &format!("Cita {}", n))).await })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        let (status, _) = handle.await??;
        // Losers of the read-max race fail on the unique id.
        assert!(
            status == StatusCode::CREATED || status == StatusCode::INTERNAL_SERVER_ERROR,
            "unexpected status {}",
            status
        );
        if status == StatusCode::CREATED {
            created += 1;
        }
    }
    assert!(created >= 1);

    let (_, body) = app.get("/api/agendas", None).await?;
    let ids: Vec<i64> = body["data"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|a| a["id_agenda"].as_i64())
        .collect();
    assert_eq!(ids.len(), created);
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), created);
    Ok(())
}

#[tokio::test]
async fn agendas_need_a_process_and_a_valid_time() -> Result<()> {
    let app = TestApp::with_roles().await?;
    seed_proceso(&app, 10).await?;

    let (status, _) = app.post("/api/agendas", None, agenda(99, "Audiencia")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut body = agenda(10, "Audiencia");
    body["hora"] = json!("25:00");
    let (status, _) = app.post("/api/agendas", None, body).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post("/api/agendas", None, agenda(10, "No")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn agenda_views_carry_process_parties() -> Result<()> {
    let app = TestApp::with_roles().await?;
    seed_proceso(&app, 10).await?;
    app.post("/api/agendas", None, agenda(10, "Audiencia inicial")).await?;

    let (status, body) = app.get("/api/agendas?estado=programada", None).await?;
    assert_eq!(status, StatusCode::OK);
    let first = &body["data"][0];
    assert_eq!(first["procesoDescripcion"], "Sucesion familiar");
    assert_eq!(first["numeroIdentificacionCliente"], "1234567");
    assert_eq!(first["numeroIdentificacionAbogado"], "7654321");

    let (status, body) = app.get("/api/agendas/abogado/7654321", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (status, body) = app.get("/api/agendas/abogado/1111111", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, body) = app.get("/api/agendas/abogado/%20%20", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["numeroIdentificacionAbogado"].is_string());

    let (status, body) = app.get("/api/agendas/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["agenda"]["descripcion"], "Audiencia inicial");
    assert_eq!(body["data"]["proceso"]["id_proceso"], 10);
    Ok(())
}

#[tokio::test]
async fn agenda_of_a_deleted_process_reads_as_missing() -> Result<()> {
    let app = TestApp::with_roles().await?;
    seed_proceso(&app, 10).await?;
    app.post("/api/agendas", None, agenda(10, "Audiencia inicial")).await?;

    let asistente = app.token(Role::Asistente);
    app.delete("/api/procesos/10", Some(&asistente)).await?;

    let (status, _) = app.get("/api/agendas/1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/api/agendas", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"][0]["procesoDescripcion"].is_null());
    Ok(())
}

#[tokio::test]
async fn agenda_update_keeps_fields_sent_empty() -> Result<()> {
    let app = TestApp::with_roles().await?;
    seed_proceso(&app, 10).await?;
    app.post("/api/agendas", None, agenda(10, "Audiencia inicial")).await?;

    let (status, body) = app
        .put("/api/agendas/1", None, json!({ "estado": "cancelada", "id_proceso": 0 }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["estado"], "cancelada");
    assert_eq!(body["data"]["id_proceso"], 10);

    let (status, _) = app.put("/api/agendas/7", None, json!({ "estado": "cancelada" })).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
