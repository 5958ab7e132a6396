mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{delete, get, get_with_token, patch_json, post_json, put_json, spawn_app, user_payload};

#[tokio::test]
async fn create_never_exposes_the_password() {
    let app = spawn_app();

    let (status, body) = post_json(&app, "/api/usuarios", user_payload("MariaS")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Usuário criado com sucesso");

    let user = &body["data"];
    assert_eq!(user["username"], "marias");
    assert_eq!(user["ativo"], true);
    assert_eq!(user["grupo"], "TI Sistemas");
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());

    let (_, body) = get(&app, &format!("/api/usuarios/{}", user["id"].as_str().unwrap())).await;
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_username_or_email_is_a_value_error() {
    let app = spawn_app();

    post_json(&app, "/api/usuarios", user_payload("carlos")).await;

    // Username é comparado já normalizado
    let mut payload = user_payload("CARLOS");
    payload["email"] = json!("outro@empresa.com");
    let (status, body) = post_json(&app, "/api/usuarios", payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "value_error");

    let mut payload = user_payload("carlos2");
    payload["email"] = json!("carlos@empresa.com");
    let (status, body) = post_json(&app, "/api/usuarios", payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "value_error");
}

#[tokio::test]
async fn invalid_group_and_username_are_rejected() {
    let app = spawn_app();

    let mut payload = user_payload("ana");
    payload["grupo"] = json!("Marketing");
    let (status, body) = post_json(&app, "/api/usuarios", payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "validation_error");

    let (status, _) = post_json(&app, "/api/usuarios", user_payload("ana.paula")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_issues_token_accepted_by_profile() {
    let app = spawn_app();
    post_json(&app, "/api/usuarios", user_payload("pedro")).await;

    let (status, body) = post_json(
        &app,
        "/api/usuarios/login",
        json!({ "username": "Pedro", "password": "segredo123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login realizado com sucesso");
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert!(body["data"]["usuario"]["last_login"].is_string());

    let token = body["data"]["token"].as_str().unwrap().to_string();
    let (status, body) = get_with_token(&app, "/api/usuarios/profile", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "pedro");
}

#[tokio::test]
async fn profile_requires_a_valid_token() {
    let app = spawn_app();

    let (status, body) = get(&app, "/api/usuarios/profile").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["type"], "unauthorized");

    let (status, _) = get_with_token(&app, "/api/usuarios/profile", "nao.e.um.jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_and_inactive_user_cannot_login() {
    let app = spawn_app();
    let (_, body) = post_json(&app, "/api/usuarios", user_payload("lucas")).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        &app,
        "/api/usuarios/login",
        json!({ "username": "lucas", "password": "errada" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["type"], "unauthorized");

    let (status, body) = patch_json(&app, &format!("/api/usuarios/{}/deactivate", id), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ativo"], false);

    let (status, _) = post_json(
        &app,
        "/api/usuarios/login",
        json!({ "username": "lucas", "password": "segredo123" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = patch_json(&app, &format!("/api/usuarios/{}/activate", id), json!({})).await;
    assert_eq!(body["message"], "Usuário ativado com sucesso");
    assert_eq!(body["data"]["ativo"], true);
}

#[tokio::test]
async fn change_password_checks_current_one() {
    let app = spawn_app();
    let (_, body) = post_json(&app, "/api/usuarios", user_payload("julia")).await;
    let uri = format!("/api/usuarios/{}/change-password", body["data"]["id"].as_str().unwrap());

    let (status, _) = patch_json(
        &app,
        &uri,
        json!({ "current_password": "errada", "new_password": "novasenha" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = patch_json(
        &app,
        &uri,
        json!({ "current_password": "segredo123", "new_password": "novasenha" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Senha alterada com sucesso");

    let (status, _) = post_json(
        &app,
        "/api/usuarios/login",
        json!({ "username": "julia", "password": "novasenha" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn update_list_and_delete() {
    let app = spawn_app();
    let (_, body) = post_json(&app, "/api/usuarios", user_payload("bruno")).await;
    let uri = format!("/api/usuarios/{}", body["data"]["id"].as_str().unwrap());

    let mut outro = user_payload("clara");
    outro["grupo"] = json!("TI Dados");
    outro["nome_completo"] = json!("Clara Lima");
    post_json(&app, "/api/usuarios", outro).await;

    let (status, body) = put_json(&app, &uri, json!({ "grupo": "TI Vendas" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["grupo"], "TI Vendas");
    assert_eq!(body["data"]["username"], "bruno");

    let (_, body) = get(&app, "/api/usuarios?grupo=TI%20Vendas").await;
    assert_eq!(body["pagination"]["total"], 1);

    let (_, body) = get(&app, "/api/usuarios?search=lima").await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["username"], "clara");

    let (_, body) = get(&app, "/api/usuarios?ativo=talvez").await;
    assert_eq!(body["pagination"]["total"], 2);

    let (status, _) = delete(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = delete(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stats_and_groups() {
    let app = spawn_app();
    post_json(&app, "/api/usuarios", user_payload("rita")).await;

    let (status, body) = get(&app, "/api/usuarios/stats/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_usuarios"], 1);
    assert_eq!(body["data"]["usuarios_ativos"], 1);
    assert_eq!(body["data"]["usuarios_por_grupo"]["TI Sistemas"], 1);

    let (status, body) = get(&app, "/api/usuarios/groups").await;
    assert_eq!(status, StatusCode::OK);
    let groups = body["data"].as_array().unwrap();
    assert_eq!(groups.len(), 7);
    assert!(groups.contains(&json!("TI Segurança")));
}

#[tokio::test]
async fn username_with_surrounding_spaces_is_rejected() {
    let app = spawn_app();

    for username in ["   ", " ab "] {
        let mut payload = user_payload("valido");
        payload["username"] = json!(username);
        let (status, body) = post_json(&app, "/api/usuarios", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "username {:?}", username);
        assert_eq!(body["type"], "validation_error");
    }

    let (_, body) = post_json(&app, "/api/usuarios", user_payload("renata")).await;
    let uri = format!("/api/usuarios/{}", body["data"]["id"].as_str().unwrap());
    let (status, _) = put_json(&app, &uri, json!({ "username": "     " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = get(&app, "/api/usuarios").await;
    assert_eq!(body["pagination"]["total"], 1);
}

#[tokio::test]
async fn update_on_missing_user_is_not_found_even_with_taken_username() {
    let app = spawn_app();
    post_json(&app, "/api/usuarios", user_payload("maria")).await;

    let uri = format!("/api/usuarios/{}", uuid::Uuid::new_v4());
    let (status, body) = put_json(&app, &uri, json!({ "username": "maria" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Usuário não encontrado");
}
