// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::routing::get;
use axum::Router;

use super::*;
use crate::error::ErrorKind;

fn server_for(base_url: String) -> Server {
    Server {
        base_url,
        auth_token: "secret-token".to_string(),
        insecure: false,
        grpc_web: false,
        ca_cert_path: None,
        ca_path: None,
        client_cert_path: None,
        client_key_path: None,
        context_name: "default".to_string(),
        request_timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn get_succeeds_against_fixture_server() {
    let app = Router::new().route(
        "/api/v1/applications",
        get(|| async { axum::Json(serde_json::json!({"items": []})) }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let transport = Transport::new(&server_for(format!("http://{addr}"))).unwrap();
    let bytes = transport.get("/api/v1/applications").await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["items"], serde_json::json!([]));
}

#[tokio::test]
async fn expired_token_body_promotes_401_to_auth() {
    let app = Router::new().route(
        "/api/v1/applications",
        get(|| async {
            (
                axum::http::StatusCode::UNAUTHORIZED,
                axum::Json(serde_json::json!({
                    "error": "invalid session: token has invalid claims: token is expired"
                })),
            )
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let transport = Transport::new(&server_for(format!("http://{addr}"))).unwrap();
    let err = transport.get("/api/v1/applications").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Auth);
    assert_eq!(err.user_action.as_deref(), Some("argocd login <server>"));
}

#[tokio::test]
async fn server_message_preserved_verbatim_for_other_http_errors() {
    let app = Router::new().route(
        "/api/v1/applications/demo",
        get(|| async {
            (
                axum::http::StatusCode::NOT_FOUND,
                axum::Json(serde_json::json!({"message": "applications.argoproj.io \"demo\" not found"})),
            )
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let transport = Transport::new(&server_for(format!("http://{addr}"))).unwrap();
    let err = transport.get("/api/v1/applications/demo").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Http(404));
    assert_eq!(err.message, "applications.argoproj.io \"demo\" not found");
}

#[tokio::test]
async fn connection_refused_classified_as_network() {
    let transport = Transport::new(&server_for("http://127.0.0.1:1".to_string())).unwrap();
    let err = transport.get("/api/v1/applications").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
    assert!(err.user_action.unwrap().contains("correct Argo CD context"));
}

#[tokio::test]
async fn version_accepts_either_casing() {
    let app = Router::new().route("/api/version", get(|| async { axum::Json(serde_json::json!({"Version": "v2.9.0"})) }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let transport = Transport::new(&server_for(format!("http://{addr}"))).unwrap();
    assert_eq!(transport.version().await.unwrap(), "v2.9.0");
}
