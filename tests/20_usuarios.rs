mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use bufete_api::auth::Role;
use common::{usuario, TestApp};

#[tokio::test]
async fn client_registration_and_cascade_delete() -> Result<()> {
    let app = TestApp::new();
    let asistente = app.token(Role::Asistente);
    let token = Some(asistente.as_str());

    let (status, _) = app.post("/api/rols", token, json!({ "id_rol": 1, "nombre": "cliente" })).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post("/api/usuarios", token, usuario("1234567", "laura@bufete.co", "3001234567", 1))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["rol"], "cliente");
    assert!(body["data"].get("password").is_none());

    let (status, body) = app
        .post(
            "/api/clientes",
            token,
            json!({
                "numeroIdentificacion": "1234567",
                "direccion": "Calle 1",
                "estado": "activo",
                "estado_cliente": "potencial",
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["estado_cliente"], "potencial");

    let (status, body) = app.get("/api/clientes/1234567", token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["direccion"], "Calle 1");
    assert_eq!(body["data"]["usuario"]["nombres"], "Laura");
    assert_eq!(body["data"]["usuario"]["apellidos"], "Gomez");

    let (status, body) = app.delete("/api/usuarios/1234567", token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["numeroIdentificacion"], "1234567");

    let (status, _) = app.get("/api/clientes/1234567", token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get("/api/usuarios/1234567", token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn user_creation_rejects_duplicates_and_unknown_roles() -> Result<()> {
    let app = TestApp::with_roles().await?;
    let asistente = app.token(Role::Asistente);
    let token = Some(asistente.as_str());

    let (status, _) = app
        .post("/api/usuarios", token, usuario("1234567", "laura@bufete.co", "3001234567", 9))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/usuarios", token, usuario("1234567", "laura@bufete.co", "3001234567", 3))
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    for body in [
        usuario("1234567", "otra@bufete.co", "3009999999", 3),
        usuario("7777777", "laura@bufete.co", "3009999999", 3),
        usuario("7777777", "otra@bufete.co", "3001234567", 3),
    ] {
        let (status, body) = app.post("/api/usuarios/create", token, body).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "DUPLICATE");
    }

    let (_, body) = app.get("/api/usuarios", None).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn user_input_is_validated() -> Result<()> {
    let app = TestApp::with_roles().await?;
    let asistente = app.token(Role::Asistente);

    let mut body = usuario("123", "laura@bufete.co", "3001234567", 3);
    let (status, response) = app.post("/api/usuarios", Some(&asistente), body.clone()).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "VALIDATION_ERROR");
    assert!(response["field_errors"]["numeroIdentificacion"].is_string());

    body["numeroIdentificacion"] = json!("1234567");
    body["telefono"] = json!("300-123");
    let (status, _) = app.post("/api/usuarios", Some(&asistente), body.clone()).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    body["telefono"] = json!("3001234567");
    body["apodo"] = json!("Lau");
    let (status, _) = app.post("/api/usuarios", Some(&asistente), body).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn user_lookup_is_limited_to_assistants_and_clients() -> Result<()> {
    let app = TestApp::with_roles().await?;
    let asistente = app.token(Role::Asistente);
    app.post("/api/usuarios", Some(&asistente), usuario("1234567", "laura@bufete.co", "3001234567", 3))
        .await?;

    let cliente = app.token(Role::Cliente);
    let (status, body) = app.get("/api/usuarios/1234567", Some(&cliente)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rol"], "cliente");

    let abogado = app.token(Role::Abogado);
    let (status, _) = app.get("/api/usuarios/1234567", Some(&abogado)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn user_update_requires_a_known_role_and_rehashes_the_password() -> Result<()> {
    let app = TestApp::with_roles().await?;
    let asistente = app.token(Role::Asistente);
    app.post("/api/usuarios", Some(&asistente), usuario("1234567", "laura@bufete.co", "3001234567", 3))
        .await?;

    let (status, _) = app.put("/api/usuarios/1234567", None, json!({ "nombres": "Lucia" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put("/api/usuarios/1234567", None, json!({ "password": "nueva-clave", "id_rol": 8 }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .put("/api/usuarios/1234567", None, json!({ "password": "nueva-clave", "id_rol": 1 }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rol"], "abogado");

    let (status, _) = app
        .post("/api/autenticacion", None, json!({ "email": "laura@bufete.co", "password": "nueva-clave" }))
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.put("/api/usuarios/7777777", None, json!({ "id_rol": 1 })).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn assistants_and_lawyers_need_an_existing_user() -> Result<()> {
    let app = TestApp::with_roles().await?;
    let asistente = app.token(Role::Asistente);
    let token = Some(asistente.as_str());

    let (status, _) = app.post("/api/asistentes", token, json!({ "numeroIdentificacion": "1234567" })).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.post("/api/usuarios", token, usuario("1234567", "laura@bufete.co", "3001234567", 2))
        .await?;
    let (status, _) = app.post("/api/asistentes", token, json!({ "numeroIdentificacion": "1234567" })).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.post("/api/asistentes", token, json!({ "numeroIdentificacion": "1234567" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/api/asistentes/1234567", token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["usuario"]["nombres"], "Laura");

    let abogado = json!({
        "numeroIdentificacion": "7654321",
        "especialidad": "Penal",
        "area_juridica": "Delitos",
        "experiencia": "Cinco años",
    });
    let (status, _) = app.post("/api/abogados", token, abogado.clone()).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.post("/api/usuarios", token, usuario("7654321", "abogado@bufete.co", "3007654321", 1))
        .await?;
    let (status, _) = app.post("/api/abogados", token, abogado).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.get("/api/abogados", token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["usuario"]["apellidos"], "Gomez");

    let (status, body) = app
        .put("/api/abogados/7654321", token, json!({ "especialidad": "Laboral", "experiencia": "" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    let (status, body) = app
        .put("/api/abogados/7654321", token, json!({ "especialidad": "Laboral" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["especialidad"], "Laboral");
    assert_eq!(body["data"]["experiencia"], "Cinco años");

    let (status, body) = app.get("/api/abogados/7654321", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["especialidad"], "Laboral");
    Ok(())
}

#[tokio::test]
async fn roles_are_managed_by_assistants_with_unique_ids_and_names() -> Result<()> {
    let app = TestApp::new();
    let asistente = app.token(Role::Asistente);
    let token = Some(asistente.as_str());

    let (status, body) = app.post("/api/rols", token, json!({ "id_rol": 1, "nombre": "abogado" })).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["nombre"], "abogado");

    let (status, body) = app.post("/api/rols", token, json!({ "id_rol": 1, "nombre": "cliente" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DUPLICATE");
    let (status, body) = app.post("/api/rols", token, json!({ "id_rol": 2, "nombre": "abogado" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DUPLICATE");
    let (status, _) = app.post("/api/rols", token, json!({ "id_rol": 2, "nombre": "root" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.post("/api/rols", token, json!({ "id_rol": 2, "nombre": "cliente" })).await?;
    let (status, body) = app.get("/api/rols", token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id_rol"], 1);
    assert_eq!(body["data"][1]["id_rol"], 2);

    let (status, body) = app.put("/api/rols/1", token, json!({ "nombre": "asistente" })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nombre"], "asistente");
    let (_, body) = app.get("/api/rols/1", token).await?;
    assert_eq!(body["data"]["nombre"], "asistente");

    let (status, _) = app.put("/api/rols/9", token, json!({ "nombre": "abogado" })).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete("/api/rols/2", token).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get("/api/rols/2", token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.delete("/api/rols/2", token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn assistant_moves_to_a_new_identity_number() -> Result<()> {
    let app = TestApp::with_roles().await?;
    let asistente = app.token(Role::Asistente);
    let token = Some(asistente.as_str());

    for (id, email, telefono) in [
        ("1234567", "laura@bufete.co", "3001234567"),
        ("2345678", "marta@bufete.co", "3002345678"),
    ] {
        app.post("/api/usuarios", token, usuario(id, email, telefono, 2)).await?;
        let (status, _) = app.post("/api/asistentes", token, json!({ "numeroIdentificacion": id })).await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app
        .put("/api/asistentes/1234567", token, json!({ "nuevoNumeroIdentificacion": "2345678" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DUPLICATE");

    let (status, body) = app
        .put("/api/asistentes/1234567", token, json!({ "nuevoNumeroIdentificacion": "3456789" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["numeroIdentificacion"], "3456789");

    let (status, _) = app.get("/api/asistentes/1234567", token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get("/api/asistentes/3456789", token).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .put("/api/asistentes/1234567", token, json!({ "nuevoNumeroIdentificacion": "4567890" }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn client_defaults_and_truthy_update() -> Result<()> {
    let app = TestApp::with_roles().await?;
    let asistente = app.token(Role::Asistente);
    let token = Some(asistente.as_str());

    app.post("/api/usuarios", token, usuario("1234567", "laura@bufete.co", "3001234567", 3))
        .await?;
    let (status, body) = app
        .post("/api/clientes", token, json!({ "numeroIdentificacion": "1234567", "direccion": "Calle 1" }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["estado"], "activo");
    assert_eq!(body["data"]["estado_cliente"], "potencial");

    let (status, _) = app
        .post("/api/clientes", token, json!({ "numeroIdentificacion": "1234567", "direccion": "Calle 2" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // An empty address keeps the stored one.
    let (status, body) = app
        .put("/api/clientes/1234567", token, json!({ "direccion": "", "estado_cliente": "cliente" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["direccion"], "Calle 1");
    assert_eq!(body["data"]["estado_cliente"], "cliente");
    assert_eq!(body["data"]["estado"], "activo");

    let (status, body) = app.get("/api/clientes", token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["estado_cliente"], "cliente");
    assert_eq!(body["data"][0]["usuario"]["nombres"], "Laura");

    let (status, _) = app.get("/api/clientes/7777777", token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.put("/api/clientes/7777777", token, json!({ "direccion": "Calle 3" })).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
