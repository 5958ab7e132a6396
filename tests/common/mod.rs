#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chamados::config::{AppState, Config};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

// Custo mínimo aceito pelo bcrypt, para os testes não ficarem lentos
const TEST_BCRYPT_COST: u32 = 4;

pub fn spawn_app() -> Router {
    let config = Config {
        jwt_secret: "segredo-de-teste".to_string(),
        bcrypt_cost: TEST_BCRYPT_COST,
        ..Config::default()
    };

    chamados::routes::router(AppState::in_memory(config))
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_with_token(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn request_json(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    request_json(app, "POST", uri, body).await
}

pub async fn put_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    request_json(app, "PUT", uri, body).await
}

pub async fn patch_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    request_json(app, "PATCH", uri, body).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().method("DELETE").uri(uri).body(Body::empty()).unwrap()).await
}

pub fn incident_payload(titulo: &str) -> Value {
    json!({
        "titulo": titulo,
        "descricao": "Sistema de vendas fora do ar",
        "prioridade": "alta",
        "tipo_tarefa": "suporte",
        "grupo_designado": "TI Sistemas",
        "local_problema": "fila_p2k",
    })
}

pub fn change_payload(titulo: &str) -> Value {
    json!({
        "titulo": titulo,
        "descricao": "Atualização do servidor de banco",
        "tipo": "atualizacao",
        "prioridade": "media",
        "grupo_responsavel": "TI Infraestrutura",
        "impacto": "medio",
    })
}

pub fn user_payload(username: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{}@empresa.com", username.to_lowercase()),
        "nome_completo": "Maria Souza",
        "grupo": "TI Sistemas",
        "password": "segredo123",
    })
}
