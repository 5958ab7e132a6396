mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use common::{change_payload, delete, get, patch_json, post_json, put_json, spawn_app};

#[tokio::test]
async fn create_defaults_to_pending_with_generated_number() {
    let app = spawn_app();

    let (status, body) = post_json(&app, "/api/changes", change_payload("Atualizar PostgreSQL")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Change criada com sucesso");
    assert_eq!(body["data"]["numero"], "CHG-001");
    assert_eq!(body["data"]["status"], "pendente");
    assert!(body["data"]["data_programada"].is_null());

    let (_, body) = post_json(&app, "/api/changes", change_payload("Segunda")).await;
    assert_eq!(body["data"]["numero"], "CHG-002");
}

#[tokio::test]
async fn invalid_scheduled_date_is_rejected() {
    let app = spawn_app();

    let mut payload = change_payload("Data ruim");
    payload["data_programada"] = json!("amanhã cedo");
    let (status, body) = post_json(&app, "/api/changes", payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "validation_error");
    assert!(body["details"]["data_programada"].is_array());
}

#[tokio::test]
async fn transitions_overwrite_status_unconditionally() {
    let app = spawn_app();

    let (_, body) = post_json(&app, "/api/changes", change_payload("Ciclo")).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = patch_json(&app, &format!("/api/changes/{}/complete", id), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Change concluída com sucesso");
    assert_eq!(body["data"]["status"], "concluida");

    let (_, body) = patch_json(&app, &format!("/api/changes/{}/approve", id), json!({})).await;
    assert_eq!(body["data"]["status"], "aprovada");

    let (_, body) = patch_json(&app, &format!("/api/changes/{}/start", id), json!({})).await;
    assert_eq!(body["data"]["status"], "em_execucao");

    let (status, body) = patch_json(
        &app,
        &format!("/api/changes/{}/status", id),
        json!({ "status": "Cancelada" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cancelada");

    let (status, _) = patch_json(
        &app,
        &format!("/api/changes/{}/status", id),
        json!({ "status": "arquivada" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn transitions_on_missing_change_are_not_found() {
    let app = spawn_app();

    let id = uuid::Uuid::new_v4();
    let (status, body) = patch_json(&app, &format!("/api/changes/{}/approve", id), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Change não encontrada");
}

#[tokio::test]
async fn update_and_delete() {
    let app = spawn_app();

    let (_, body) = post_json(&app, "/api/changes", change_payload("Original")).await;
    let uri = format!("/api/changes/{}", body["data"]["id"].as_str().unwrap());

    let (status, body) = put_json(&app, &uri, json!({ "impacto": "alto" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["impacto"], "alto");
    assert_eq!(body["data"]["titulo"], "Original");

    let (status, _) = delete(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = delete(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_by_status_label() {
    let app = spawn_app();

    let (_, body) = post_json(&app, "/api/changes", change_payload("Vai executar")).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    patch_json(&app, &format!("/api/changes/{}/start", id), json!({})).await;
    post_json(&app, "/api/changes", change_payload("Fica pendente")).await;

    let (status, body) = get(&app, "/api/changes?status=Em%20execu%C3%A7%C3%A3o").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["titulo"], "Vai executar");

    let (_, body) = get(&app, "/api/changes?tipo=ATUALIZACAO&impacto=M%C3%A9dio").await;
    assert_eq!(body["pagination"]["total"], 2);

    let (_, body) = get(&app, "/api/changes?tipo=inexistente").await;
    assert_eq!(body["pagination"]["total"], 2);
    assert_eq!(body["filters"]["tipo"], "inexistente");
}

#[tokio::test]
async fn upcoming_lists_approved_changes_in_window() {
    let app = spawn_app();

    let schedule = |titulo: &str, days: i64| {
        let mut payload = change_payload(titulo);
        payload["data_programada"] = json!((Utc::now() + Duration::days(days)).to_rfc3339());
        payload
    };

    let (_, body) = post_json(&app, "/api/changes", schedule("Daqui a 5 dias", 5)).await;
    let perto = body["data"]["id"].as_str().unwrap().to_string();
    let (_, body) = post_json(&app, "/api/changes", schedule("Daqui a 2 dias", 2)).await;
    let mais_perto = body["data"]["id"].as_str().unwrap().to_string();
    let (_, body) = post_json(&app, "/api/changes", schedule("Daqui a 20 dias", 20)).await;
    let longe = body["data"]["id"].as_str().unwrap().to_string();
    // Pendente: não entra
    post_json(&app, "/api/changes", schedule("Pendente", 1)).await;

    patch_json(&app, &format!("/api/changes/{}/approve", perto), json!({})).await;
    patch_json(&app, &format!("/api/changes/{}/start", mais_perto), json!({})).await;
    patch_json(&app, &format!("/api/changes/{}/approve", longe), json!({})).await;

    let (status, body) = get(&app, "/api/changes/upcoming").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["days"], 7);
    let titulos: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["titulo"].as_str().unwrap())
        .collect();
    assert_eq!(titulos, ["Daqui a 2 dias", "Daqui a 5 dias"]);

    let (_, body) = get(&app, "/api/changes/upcoming?days=30").await;
    assert_eq!(body["days"], 30);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    // Fora da faixa volta para 7
    let (status, body) = get(&app, "/api/changes/upcoming?days=90").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["days"], 7);

    let (_, body) = get(&app, "/api/changes/upcoming?days=abc").await;
    assert_eq!(body["days"], 7);
}

#[tokio::test]
async fn stats_count_by_status() {
    let app = spawn_app();

    let (_, body) = post_json(&app, "/api/changes", change_payload("Aprovar")).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    patch_json(&app, &format!("/api/changes/{}/approve", id), json!({})).await;
    post_json(&app, "/api/changes", change_payload("Pendente")).await;

    let (status, body) = get(&app, "/api/changes/stats/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["changes_pendentes"], 1);
    assert_eq!(body["data"]["changes_aprovadas"], 1);
    assert_eq!(body["data"]["total_changes"], 2);
}

#[tokio::test]
async fn free_form_numero_does_not_break_generation() {
    let app = spawn_app();

    let mut payload = change_payload("Legado");
    payload["numero"] = json!("CHG-MIGRACAO-2023");
    let (status, _) = post_json(&app, "/api/changes", payload).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = post_json(&app, "/api/changes", change_payload("Primeira")).await;
    assert_eq!(body["data"]["numero"], "CHG-001");
    let (_, body) = post_json(&app, "/api/changes", change_payload("Segunda")).await;
    assert_eq!(body["data"]["numero"], "CHG-002");
}
