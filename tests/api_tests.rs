//! Testes HTTP ponta a ponta sobre o router completo e o store em memória.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::*;
use locadora_backend::build_router;
use locadora_backend::config::EnvironmentConfig;
use locadora_backend::models::locacao::LocacaoStatus;
use locadora_backend::models::veiculo::VeiculoStatus;
use locadora_backend::routes::cron_routes::CRON_SECRET_HEADER;
use locadora_backend::state::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

fn create_body(veiculo_id: i64, inicio: &str, fim: &str) -> Value {
    json!({
        "cliente_id": CLIENTE,
        "veiculo_id": veiculo_id,
        "data_locacao": inicio,
        "data_entrega": fim,
        "valor_diaria": 100,
        "valor_total": 1000,
        "valor_seguro": 50
    })
}

async fn post_cron(app: axum::Router, secret: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/cron/finalize-locacoes");
    if let Some(secret) = secret {
        builder = builder.header(CRON_SECRET_HEADER, secret);
    }
    app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = build_test_app(seeded_store().await);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = build_test_app(seeded_store().await);
    let response = get(app, "/api/nao-existe").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_locacao_returns_201_and_marks_vehicle() {
    let store = seeded_store().await;
    let app = build_test_app(store.clone());

    let response = post_json(app, "/api/locacoes", create_body(V101, "2025-03-01", "2025-03-10")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["veiculo_id"], V101);
    assert_eq!(body["data"]["status"], "ativa");
    assert_eq!(body["data"]["valor_total"].as_f64(), Some(1000.0));
    assert_eq!(body["data"]["valor_caucao"].as_f64(), Some(0.0));

    let state = store.snapshot().await;
    assert_eq!(state.veiculos[&V101].status, VeiculoStatus::Locado);
    assert_eq!(state.movimentacoes.len(), 2);
}

#[tokio::test]
async fn test_create_overlap_returns_400_with_code() {
    let app = build_test_app(seeded_store().await);

    let response = post_json(app.clone(), "/api/locacoes", create_body(V101, "2025-03-01", "2025-03-10")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(app, "/api/locacoes", create_body(V101, "2025-03-10", "2025-03-15")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "OVERLAP_CONFLICT");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_create_vehicle_unavailable_returns_400() {
    let app = build_test_app(seeded_store().await);

    let response = post_json(app, "/api/locacoes", create_body(VENDIDO, "2025-03-01", "2025-03-10")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VEHICLE_UNAVAILABLE");
}

#[tokio::test]
async fn test_create_validation_errors() {
    let app = build_test_app(seeded_store().await);

    let mut invalido = create_body(V101, "2025-03-10", "2025-03-01");
    invalido["valor_diaria"] = json!(0);
    let response = post_json(app.clone(), "/api/locacoes", invalido).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["details"]["valor_diaria"].is_array());

    let response = post_json(app.clone(), "/api/locacoes", json!({ "cliente_id": CLIENTE })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let mut status_invalido = create_body(V101, "2025-03-01", "2025-03-10");
    status_invalido["status"] = json!("pendente");
    let response = post_json(app, "/api/locacoes", status_invalido).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_missing_locacao_returns_404() {
    let app = build_test_app(seeded_store().await);

    let response = get(app.clone(), "/api/locacoes/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");

    let response = put_json(app.clone(), "/api/locacoes/999", json!({ "observacoes": "x" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(app, "/api/locacoes/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_status_and_empty_patch() {
    let store = seeded_store().await;
    let app = build_test_app(store.clone());

    let response = post_json(app.clone(), "/api/locacoes", create_body(V101, "2025-03-01", "2025-03-10")).await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/locacoes/{}", id);

    let response = put_json(app.clone(), &uri, json!({ "desconhecido": true })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = put_json(app.clone(), &uri, json!({ "status": "finalizada" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "finalizada");
    assert_eq!(body["message"], "Locação atualizada com sucesso");

    let state = store.snapshot().await;
    assert_eq!(state.locacoes[&id].status, LocacaoStatus::Finalizada);
    assert_eq!(state.veiculos[&V101].status, VeiculoStatus::Disponivel);
}

#[tokio::test]
async fn test_list_locacoes_with_filters() {
    let app = build_test_app(seeded_store().await);

    post_json(app.clone(), "/api/locacoes", create_body(V101, "2025-03-01", "2025-03-10")).await;
    post_json(app.clone(), "/api/locacoes", create_body(V102, "2025-03-01", "2025-03-10")).await;

    let response = get(app.clone(), "/api/locacoes?status=todas&search=gol").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["cliente_nome"], "Maria Souza");
    assert!(data[0]["veiculo_info"].as_str().unwrap().contains("XYZ9K87"));

    let response = get(app.clone(), "/api/locacoes?status=cancelada").await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 0);

    let response = get(app, "/api/locacoes?status=pendente").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_locacao_cascades() {
    let store = seeded_store().await;
    let app = build_test_app(store.clone());

    let response = post_json(app.clone(), "/api/locacoes", create_body(V101, "2025-03-01", "2025-03-10")).await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json(
        app.clone(),
        "/api/vistorias",
        json!({
            "locacao_id": id,
            "veiculo_id": V101,
            "cliente_id": CLIENTE,
            "tipo_vistoria": "saida",
            "item_estepe": true
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = delete(app.clone(), &format!("/api/locacoes/{}", id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert!(body.get("data").is_none());

    let state = store.snapshot().await;
    assert!(state.locacoes.is_empty());
    assert!(state.vistorias.is_empty());
    assert!(state.movimentacoes.is_empty());
    assert_eq!(state.veiculos[&V101].status, VeiculoStatus::Disponivel);
}

#[tokio::test]
async fn test_contrato_data_endpoint() {
    let app = build_test_app(seeded_store().await);

    let response = post_json(app.clone(), "/api/locacoes", create_body(V101, "2025-03-01", "2025-03-10")).await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = get(app, &format!("/api/locacoes/{}/contrato-data", id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["cliente_nome"], "Maria Souza");
    assert_eq!(body["data"]["valor_total"], "R$ 1.000,00");
    assert_eq!(body["data"]["valor_caucao"], "ISENTO");
    assert_eq!(body["data"]["data_locacao"], "01/03/2025");
}

#[tokio::test]
async fn test_movimentacoes_by_locacao() {
    let app = build_test_app(seeded_store().await);

    let response = post_json(app.clone(), "/api/locacoes", create_body(V101, "2025-03-01", "2025-03-10")).await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    post_json(app.clone(), "/api/locacoes", create_body(V102, "2025-03-01", "2025-03-10")).await;

    let response = get(app.clone(), &format!("/api/movimentacoes?locacao_id={}", id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert!(data.iter().all(|m| m["locacao_id"] == id && m["tipo"] == "entrada"));

    let response = get(app, "/api/movimentacoes").await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_movimentacao_avulsa_crud() {
    let store = seeded_store().await;
    let app = build_test_app(store.clone());

    let despesa = json!({
        "tipo": "saida",
        "categoria": "manutencao",
        "descricao": "Alinhamento e balanceamento",
        "valor": 180,
        "data_movimentacao": "2025-03-05"
    });
    let response = post_json(app.clone(), "/api/movimentacoes", despesa).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["tipo"], "saida");
    assert!(body["data"]["locacao_id"].is_null());
    let id = body["data"]["id"].as_i64().unwrap();

    let response = put_json(
        app.clone(),
        &format!("/api/movimentacoes/{}", id),
        json!({ "valor": 210.5, "observacoes": "Oficina do bairro" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["valor"].as_f64(), Some(210.5));
    assert_eq!(body["data"]["descricao"], "Alinhamento e balanceamento");

    let response = get(app.clone(), &format!("/api/movimentacoes/{}", id)).await;
    assert_eq!(body_json(response).await["data"]["observacoes"], "Oficina do bairro");

    let response = delete(app.clone(), &format!("/api/movimentacoes/{}", id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(store.snapshot().await.movimentacoes.is_empty());

    let response = delete(app, &format!("/api/movimentacoes/{}", id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_movimentacao_avulsa_invalida() {
    let app = build_test_app(seeded_store().await);

    let response = post_json(
        app.clone(),
        "/api/movimentacoes",
        json!({
            "tipo": "saida",
            "categoria": " ",
            "descricao": "Sem categoria",
            "valor": -10,
            "data_movimentacao": "2025-03-05"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["details"]["categoria"].is_array());
    assert!(body["details"]["valor"].is_array());

    let response = post_json(
        app,
        "/api/movimentacoes",
        json!({
            "tipo": "entrada",
            "categoria": "multa",
            "descricao": "Multa de trânsito repassada",
            "valor": 130,
            "data_movimentacao": "2025-03-05",
            "cliente_id": 999
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_id_invalido_na_rota_usa_envelope() {
    let app = build_test_app(seeded_store().await);

    for uri in ["/api/locacoes/abc", "/api/vistorias/abc", "/api/movimentacoes/abc"] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    let response = put_json(app, "/api/locacoes/1.5", json!({ "observacoes": "x" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);
}

#[tokio::test]
async fn test_vistoria_update_generates_pending_entry() {
    let app = build_test_app(seeded_store().await);

    let response = post_json(app.clone(), "/api/locacoes", create_body(V101, "2025-03-01", "2025-03-10")).await;
    let locacao_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json(
        app.clone(),
        "/api/vistorias",
        json!({
            "locacao_id": locacao_id,
            "veiculo_id": V101,
            "cliente_id": CLIENTE,
            "tipo_vistoria": "saida",
            "quilometragem": 15230,
            "avarias": [{ "tipo": "risco", "x": 0.2, "y": 0.7 }],
            "item_pneu": true,
            "item_documentos": true
        }),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["nome_vistoriador"], "Sistema");
    let saida_id = body["data"]["id"].as_i64().unwrap();

    let response = put_json(
        app.clone(),
        &format!("/api/vistorias/{}", saida_id),
        json!({ "nome_vistoriador": "João", "checklist": { "item_som": true } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["item_som"], true);
    assert_eq!(body["data"]["item_pneu"], true);

    let response = get(
        app,
        &format!("/api/vistorias?locacao_id={}&tipo_vistoria=entrada", locacao_id),
    )
    .await;
    let body = body_json(response).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["nome_vistoriador"], "Sistema");
    assert_eq!(data[0]["quilometragem"], 15230);
    assert_eq!(data[0]["avarias"][0]["tipo"], "risco");
    assert_eq!(data[0]["item_som"], true);
}

#[tokio::test]
async fn test_cron_requires_secret() {
    let app = build_test_app(seeded_store().await);

    let response = post_cron(app.clone(), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");

    let response = post_cron(app, Some("errado")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cron_without_configured_secret_returns_500() {
    let config = EnvironmentConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://localhost/locadora_test".to_string()),
        _ => None,
    })
    .unwrap();
    let app = build_router(AppState::new(seeded_store().await, config));

    let response = post_cron(app, Some(CRON_SECRET)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn test_cron_finalizes_expired_locacoes() {
    let store = seeded_store().await;
    let app = build_test_app(store.clone());

    // Período bem no passado: vencido para qualquer data atual
    let response = post_json(app.clone(), "/api/locacoes", create_body(V101, "2020-01-01", "2020-01-05")).await;
    let vencida = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_cron(app.clone(), Some(CRON_SECRET)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["finalizadas"], json!([vencida]));

    let state = store.snapshot().await;
    assert_eq!(state.locacoes[&vencida].status, LocacaoStatus::Finalizada);
    assert_eq!(state.veiculos[&V101].status, VeiculoStatus::Disponivel);

    let response = post_cron(app, Some(CRON_SECRET)).await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["finalizadas"], json!([]));
    assert_eq!(body["message"], "Nenhuma locação expirada encontrada.");
}
