mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{json, Value};

use bufete_api::auth::Role;
use common::{seed_proceso, TestApp};

fn factura(id_factura: i64, id_proceso: i64) -> Value {
    json!({
        "id_factura": id_factura,
        "monto": "1500000",
        "fecha_emision": "2024-04-01",
        "fecha_vencimiento": "2024-05-01",
        "estado": "sin cancelar",
        "metodo_pago": "transferencia",
        "id_proceso": id_proceso,
    })
}

fn tarea(id_tarea: i64, fecha: &str, hora_inicio: &str) -> Value {
    json!({
        "id_tarea": id_tarea,
        "titulo": "Revisar expediente",
        "descripcion": "Leer las piezas procesales",
        "fecha": fecha,
        "hora_inicio": hora_inicio,
        "hora_fin": "18:00",
        "estado": "Pendiente",
    })
}

#[tokio::test]
async fn invoices_belong_to_an_existing_process() -> Result<()> {
    let app = TestApp::with_roles().await?;
    seed_proceso(&app, 10).await?;

    let (status, _) = app.post("/api/facturas", None, factura(1, 99)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.post("/api/facturas", None, factura(1, 10)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["estado"], "sin cancelar");
    assert!(body["data"]["createdAt"].is_string());

    let (status, body) = app.post("/api/facturas", None, factura(1, 10)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DUPLICATE");

    let mut bad = factura(2, 10);
    bad["metodo_pago"] = json!("cheque");
    let (status, _) = app.post("/api/facturas", None, bad).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/api/facturas/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["factura"]["monto"], "1500000");
    assert_eq!(body["data"]["proceso"]["descripcion"], "Sucesion familiar");
    Ok(())
}

#[tokio::test]
async fn invoice_filters_and_assistant_only_edits() -> Result<()> {
    let app = TestApp::with_roles().await?;
    seed_proceso(&app, 10).await?;
    app.post("/api/facturas", None, factura(1, 10)).await?;
    let mut pagada = factura(2, 10);
    pagada["estado"] = json!("cancelada");
    pagada["metodo_pago"] = json!("efectivo");
    app.post("/api/facturas", None, pagada).await?;

    let (_, body) = app.get("/api/facturas?estado=cancelada", None).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"][0]["id_factura"], 2);
    let (_, body) = app.get("/api/facturas?id_proceso=10&metodo_pago=transferencia", None).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let update = json!({ "estado": "cancelada", "id_proceso": 0 });
    let (status, _) = app.put("/api/facturas/1", None, update.clone()).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let cliente = app.token(Role::Cliente);
    let (status, _) = app.put("/api/facturas/1", Some(&cliente), update.clone()).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let asistente = app.token(Role::Asistente);
    let (status, body) = app.put("/api/facturas/1", Some(&asistente), update).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["estado"], "cancelada");
    assert_eq!(body["data"]["id_proceso"], 10);

    let (status, _) = app.delete("/api/facturas/1", Some(&asistente)).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get("/api/facturas/1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn tasks_get_defaults_and_optional_process() -> Result<()> {
    let app = TestApp::with_roles().await?;
    seed_proceso(&app, 10).await?;

    let (status, body) = app.post("/api/tareas", None, tarea(1, "2024-06-01", "8:00")).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["creado_por"], "Sistema");
    assert_eq!(body["data"]["todo_el_dia"], false);
    assert_eq!(body["data"]["vincular_expediente"], false);

    let (status, body) = app.get("/api/tareas/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tarea"]["titulo"], "Revisar expediente");
    assert!(body["data"]["proceso"].is_null());

    let mut linked = tarea(2, "2024-06-01", "9:00");
    linked["id_proceso"] = json!(99);
    let (status, _) = app.post("/api/tareas", None, linked.clone()).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    linked["id_proceso"] = json!(10);
    linked["estado"] = json!("En revisión");
    let (status, _) = app.post("/api/tareas", None, linked).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = app.get("/api/tareas/2", None).await?;
    assert_eq!(body["data"]["proceso"]["id_proceso"], 10);

    let (status, _) = app.post("/api/tareas", None, tarea(2, "2024-06-02", "9:00")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad = tarea(3, "2024-06-02", "9:00");
    bad["estado"] = json!("Terminada");
    let (status, _) = app.post("/api/tareas", None, bad).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A zero process id counts as unlinked.
    let mut unlinked = tarea(4, "2024-06-02", "9:00");
    unlinked["id_proceso"] = json!(0);
    let (status, _) = app.post("/api/tareas", None, unlinked).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = app.get("/api/tareas/4", None).await?;
    assert!(body["data"]["proceso"].is_null());
    Ok(())
}

#[tokio::test]
async fn tasks_list_by_date_then_start_time() -> Result<()> {
    let app = TestApp::with_roles().await?;
    app.post("/api/tareas", None, tarea(1, "2024-06-03", "10:00")).await?;
    app.post("/api/tareas", None, tarea(2, "2024-06-01", "11:00")).await?;
    app.post("/api/tareas", None, tarea(3, "2024-06-01", "10:30")).await?;

    let (status, body) = app.get("/api/tareas", None).await?;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body["data"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|t| t["id_tarea"].as_i64())
        .collect();
    assert_eq!(ids, vec![3, 2, 1]);

    let (_, body) = app.get("/api/tareas?estado=Pendiente&_=1717200000", None).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(3));
    let (_, body) = app.get("/api/tareas?estado=Resultado", None).await?;
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn task_update_applies_false_values() -> Result<()> {
    let app = TestApp::with_roles().await?;
    let mut body = tarea(1, "2024-06-01", "8:00");
    body["todo_el_dia"] = json!(true);
    body["creado_por"] = json!("Laura");
    app.post("/api/tareas", None, body).await?;

    let (status, body) = app
        .put("/api/tareas/1", None, json!({ "todo_el_dia": false, "estado": "En progreso" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["todo_el_dia"], false);
    assert_eq!(body["data"]["estado"], "En progreso");
    assert_eq!(body["data"]["creado_por"], "Laura");

    let (status, _) = app.put("/api/tareas/1", None, json!({ "creado_por": "Otro" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.delete("/api/tareas/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id_tarea"], 1);
    let (status, _) = app.delete("/api/tareas/1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
