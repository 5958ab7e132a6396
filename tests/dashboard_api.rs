mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{change_payload, get, incident_payload, patch_json, post_json, spawn_app, user_payload};

#[tokio::test]
async fn overview_aggregates_every_area() {
    let app = spawn_app();

    let mut critico = incident_payload("Crítico");
    critico["prioridade"] = json!("critica");
    post_json(&app, "/api/incidentes", critico).await;
    post_json(&app, "/api/incidentes", incident_payload("Alto")).await;
    post_json(&app, "/api/changes", change_payload("Change")).await;
    post_json(&app, "/api/usuarios", user_payload("gestor")).await;

    let (status, body) = get(&app, "/api/dashboard/overview").await;
    assert_eq!(status, StatusCode::OK);

    let overview = &body["data"]["overview"];
    assert_eq!(overview["total_incidents"], 2);
    assert_eq!(overview["total_changes"], 1);
    assert_eq!(overview["total_users"], 1);
    assert_eq!(overview["critical_incidents"], 1);
    assert_eq!(overview["high_priority_incidents"], 1);
    assert_eq!(body["data"]["changes"]["changes_pendentes"], 1);
}

#[tokio::test]
async fn area_dashboards_report_percentages() {
    let app = spawn_app();

    let mut critico = incident_payload("Crítico");
    critico["prioridade"] = json!("critica");
    post_json(&app, "/api/incidentes", critico).await;
    post_json(&app, "/api/incidentes", incident_payload("Alto 1")).await;
    post_json(&app, "/api/incidentes", incident_payload("Alto 2")).await;

    let (status, body) = get(&app, "/api/dashboard/incidentes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["summary"]["total_incidents"], 3);
    assert_eq!(body["data"]["summary"]["critical_percentage"], 33.33);
    assert_eq!(body["data"]["summary"]["high_percentage"], 66.67);

    // Sem registros: percentuais zerados
    let (_, body) = get(&app, "/api/dashboard/changes").await;
    assert_eq!(body["data"]["summary"]["total_changes"], 0);
    assert_eq!(body["data"]["summary"]["pending_percentage"], 0.0);

    post_json(&app, "/api/usuarios", user_payload("ativo")).await;
    let (_, body) = post_json(&app, "/api/usuarios", user_payload("inativo")).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    patch_json(&app, &format!("/api/usuarios/{}/deactivate", id), json!({})).await;

    let (_, body) = get(&app, "/api/dashboard/usuarios").await;
    assert_eq!(body["data"]["summary"]["active_users"], 1);
    assert_eq!(body["data"]["summary"]["active_percentage"], 50.0);
}

#[tokio::test]
async fn alerts_fire_above_thresholds() {
    let app = spawn_app();

    let (status, body) = get(&app, "/api/dashboard/alerts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_alerts"], 0);

    for i in 0..6 {
        let mut payload = incident_payload(&format!("Crítico {}", i));
        payload["prioridade"] = json!("critica");
        post_json(&app, "/api/incidentes", payload).await;
    }

    let (_, body) = get(&app, "/api/dashboard/alerts").await;
    assert_eq!(body["data"]["total_alerts"], 1);
    assert_eq!(body["data"]["alerts"][0]["type"], "critical");
    assert_eq!(body["data"]["alerts"][0]["category"], "incident");
}

#[tokio::test]
async fn metrics_only_fill_requested_area() {
    let app = spawn_app();

    let (status, body) = get(&app, "/api/dashboard/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["metric_type"], "all");
    assert_eq!(body["data"]["time_range"], "today");
    assert!(body["data"]["incidents"].is_object());
    assert!(body["data"]["users"].is_object());

    let (_, body) = get(&app, "/api/dashboard/metrics?type=changes&range=week").await;
    assert_eq!(body["data"]["metric_type"], "changes");
    assert_eq!(body["data"]["time_range"], "week");
    assert!(body["data"]["changes"].is_object());
    assert!(body["data"]["incidents"].is_null());
    assert!(body["data"]["users"].is_null());
}

#[tokio::test]
async fn health_reports_every_service() {
    let app = spawn_app();

    let (status, body) = get(&app, "/api/dashboard/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["services"]["incidents"], "operational");
    assert_eq!(body["data"]["services"]["database"], "operational");
}
