mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{delete, get, incident_payload, patch_json, post_json, put_json, spawn_app};

#[tokio::test]
async fn create_then_get_returns_same_fields() {
    let app = spawn_app();

    let (status, body) = post_json(&app, "/api/incidentes", incident_payload("Falha no PDV")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Incidente criado com sucesso");

    let created = &body["data"];
    assert_eq!(created["numero"], "INC-001");
    assert_eq!(created["status"], "aberto");
    assert_eq!(created["incidente_vendas"], false);

    let id = created["id"].as_str().unwrap();
    let (status, body) = get(&app, &format!("/api/incidentes/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["titulo"], "Falha no PDV");
    assert_eq!(body["data"]["prioridade"], "alta");
    assert_eq!(body["data"]["grupo_designado"], "TI Sistemas");
    assert_eq!(body["data"]["local_problema"], "fila_p2k");
}

#[tokio::test]
async fn numbers_increase_sequentially() {
    let app = spawn_app();

    let mut numeros = Vec::new();
    for titulo in ["Primeiro", "Segundo", "Terceiro"] {
        let (_, body) = post_json(&app, "/api/incidentes", incident_payload(titulo)).await;
        numeros.push(body["data"]["numero"].as_str().unwrap().to_string());
    }

    assert_eq!(numeros, ["INC-001", "INC-002", "INC-003"]);
}

#[tokio::test]
async fn explicit_duplicate_numero_is_a_value_error() {
    let app = spawn_app();

    let mut payload = incident_payload("Com número");
    payload["numero"] = json!("INC-900");
    let (status, _) = post_json(&app, "/api/incidentes", payload.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(&app, "/api/incidentes", payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "value_error");

    // O próximo gerado continua a partir do maior número
    let (_, body) = post_json(&app, "/api/incidentes", incident_payload("Gerado")).await;
    assert_eq!(body["data"]["numero"], "INC-901");
}

#[tokio::test]
async fn priority_is_normalized_and_bad_values_rejected() {
    let app = spawn_app();

    let mut payload = incident_payload("Maiúsculas");
    payload["prioridade"] = json!("ALTA");
    let (status, body) = post_json(&app, "/api/incidentes", payload).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["prioridade"], "alta");

    let mut payload = incident_payload("Inválida");
    payload["prioridade"] = json!("urgentissima");
    let (status, body) = post_json(&app, "/api/incidentes", payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "validation_error");
    assert!(body["details"]["prioridade"].is_array());
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let app = spawn_app();

    let (_, body) = post_json(&app, "/api/incidentes", incident_payload("Original")).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert!(body["data"]["updated_at"].is_null());

    let (status, body) = put_json(
        &app,
        &format!("/api/incidentes/{}", id),
        json!({ "descricao": "Nova descrição" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Incidente atualizado com sucesso");
    assert_eq!(body["data"]["descricao"], "Nova descrição");
    assert_eq!(body["data"]["titulo"], "Original");
    assert_eq!(body["data"]["prioridade"], "alta");
    assert!(body["data"]["updated_at"].is_string());
}

#[tokio::test]
async fn empty_update_is_rejected() {
    let app = spawn_app();

    let (_, body) = post_json(&app, "/api/incidentes", incident_payload("Sem mudanças")).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = put_json(&app, &format!("/api/incidentes/{}", id), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "validation_error");
    assert_eq!(body["message"], "Dados de atualização são obrigatórios");
}

#[tokio::test]
async fn delete_twice_returns_not_found() {
    let app = spawn_app();

    let (_, body) = post_json(&app, "/api/incidentes", incident_payload("Temporário")).await;
    let uri = format!("/api/incidentes/{}", body["data"]["id"].as_str().unwrap());

    let (status, body) = delete(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Incidente deletado com sucesso");

    let (status, body) = delete(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["type"], "not_found");

    let (status, _) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_id_is_a_validation_error() {
    let app = spawn_app();

    let (status, body) = get(&app, "/api/incidentes/nao-e-um-id").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "validation_error");
    assert_eq!(body["message"], "ID de incidente inválido");
}

#[tokio::test]
async fn status_and_assign_shortcuts() {
    let app = spawn_app();

    let (_, body) = post_json(&app, "/api/incidentes", incident_payload("Atalhos")).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = patch_json(&app, &format!("/api/incidentes/{}/status", id), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Status é obrigatório");

    // Sem máquina de estados: qualquer status vale a qualquer momento
    let (status, body) = patch_json(
        &app,
        &format!("/api/incidentes/{}/status", id),
        json!({ "status": "fechado" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "fechado");

    let (status, body) = patch_json(
        &app,
        &format!("/api/incidentes/{}/assign", id),
        json!({ "atribuido": "  joao.silva  " }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Incidente atribuído com sucesso");
    assert_eq!(body["data"]["atribuido"], "joao.silva");

    let (status, _) = patch_json(
        &app,
        &format!("/api/incidentes/{}/assign", id),
        json!({ "atribuido": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_filters_by_labels_and_ignores_unknown_values() {
    let app = spawn_app();

    post_json(&app, "/api/incidentes", incident_payload("Aberto 1")).await;
    post_json(&app, "/api/incidentes", incident_payload("Aberto 2")).await;
    let (_, body) = post_json(&app, "/api/incidentes", incident_payload("Em andamento")).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    patch_json(
        &app,
        &format!("/api/incidentes/{}/status", id),
        json!({ "status": "em_andamento" }),
    )
    .await;

    let (status, body) = get(&app, "/api/incidentes?status=Aberto").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 2);
    assert_eq!(body["filters"]["status"], "Aberto");

    let (_, body) = get(&app, "/api/incidentes?status=Em%20andamento&fila=P2K").await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["titulo"], "Em andamento");

    // Valor desconhecido: o filtro some
    let (status, body) = get(&app, "/api/incidentes?prioridade=Desconhecida").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 3);
}

#[tokio::test]
async fn pagination_is_clamped() {
    let app = spawn_app();

    for titulo in ["A", "B", "C"] {
        post_json(&app, "/api/incidentes", incident_payload(titulo)).await;
    }

    let (_, body) = get(&app, "/api/incidentes?page=2&per_page=2").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["pagination"]["pages"], 2);

    let (_, body) = get(&app, "/api/incidentes?per_page=1000").await;
    assert_eq!(body["pagination"]["per_page"], 100);
}

#[tokio::test]
async fn stats_count_by_queue_priority_and_status() {
    let app = spawn_app();

    let mut vendas = incident_payload("Vendas");
    vendas["incidente_vendas"] = json!(true);
    vendas["prioridade"] = json!("critica");
    post_json(&app, "/api/incidentes", vendas).await;
    post_json(&app, "/api/incidentes", incident_payload("Normal")).await;

    let (status, body) = get(&app, "/api/incidentes/stats/summary").await;
    assert_eq!(status, StatusCode::OK);

    let stats = &body["data"];
    assert_eq!(stats["incidentes_vendas"], 1);
    assert_eq!(stats["filas"]["fila_p2k"], 2);
    assert_eq!(stats["prioridades"]["critica"], 1);
    assert_eq!(stats["prioridades"]["alta"], 1);
    assert_eq!(stats["status"]["aberto"], 2);
}

#[tokio::test]
async fn free_form_numero_does_not_break_generation() {
    let app = spawn_app();

    for numero in ["INC-LEGADO-ANTIGO", "INC-18446744073709551615"] {
        let mut payload = incident_payload("Legado");
        payload["numero"] = json!(numero);
        let (status, _) = post_json(&app, "/api/incidentes", payload).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let mut numeros = Vec::new();
    for titulo in ["Primeiro", "Segundo", "Terceiro"] {
        let (status, body) = post_json(&app, "/api/incidentes", incident_payload(titulo)).await;
        assert_eq!(status, StatusCode::CREATED);
        numeros.push(body["data"]["numero"].as_str().unwrap().to_string());
    }

    assert_eq!(numeros, ["INC-001", "INC-002", "INC-003"]);
}
