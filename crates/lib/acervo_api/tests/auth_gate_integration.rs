//! Integration tests for the authorization gate and upload validation.
//!
//! The router is built with a lazy pool that never connects: every path
//! exercised here must accept or reject before a single query runs,
//! which is exactly the property under test.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use acervo_api::{AppState, config::ApiConfig};
use acervo_core::auth::token::generate_token;
use acervo_core::models::user::UserRole;
use acervo_core::storage::Storage;

const SECRET: &str = "test-secret";

fn test_state(upload_root: &std::path::Path, max_file_size: u64) -> AppState {
    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        database_url: "postgres://localhost:5432/acervo_test".into(),
        jwt_secret: SECRET.into(),
        token_ttl_secs: 180,
        upload_dir: upload_root.to_path_buf(),
        public_base_url: "http://localhost:3001".into(),
        max_file_size,
        cors_origins: vec!["http://localhost:4321".into()],
        environment: "test".into(),
    };
    let storage = Storage::new(config.storage_config());
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("lazy pool");
    AppState {
        pool,
        config,
        storage,
    }
}

fn token_for(role: UserRole, ttl_secs: i64) -> String {
    generate_token(
        "0198c5a6-0000-7000-8000-000000000001",
        "staff@acervo.org",
        role,
        SECRET.as_bytes(),
        ttl_secs,
    )
    .expect("generate token")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse JSON")
}

#[tokio::test]
async fn health_works_without_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let app = acervo_api::router(test_state(dir.path(), 10 * 1024 * 1024));

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "OK");
    assert_eq!(json["environment"], "test");
}

#[tokio::test]
async fn protected_route_rejects_missing_token() {
    let dir = tempfile::tempdir().unwrap();
    let app = acervo_api::router(test_state(dir.path(), 10 * 1024 * 1024));

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/documentos")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["erro"], "Token não fornecido");
}

#[tokio::test]
async fn protected_route_rejects_garbage_token() {
    let dir = tempfile::tempdir().unwrap();
    let app = acervo_api::router(test_state(dir.path(), 10 * 1024 * 1024));

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/documentos")
                .header(header::AUTHORIZATION, "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["erro"], "Token inválido ou expirado");
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = acervo_api::router(test_state(dir.path(), 10 * 1024 * 1024));

    let expired = token_for(UserRole::Admin, -120);
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/documentos")
                .header(header::AUTHORIZATION, format!("Bearer {expired}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["erro"], "Token inválido ou expirado");
}

#[tokio::test]
async fn editor_cannot_reach_admin_routes() {
    let dir = tempfile::tempdir().unwrap();
    let app = acervo_api::router(test_state(dir.path(), 10 * 1024 * 1024));

    let token = token_for(UserRole::Editor, 180);
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/usuarios")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let json = body_json(resp).await;
    assert_eq!(json["erro"], "Acesso negado. Apenas administradores.");
}

#[tokio::test]
async fn admin_passes_the_role_gate() {
    let dir = tempfile::tempdir().unwrap();
    let app = acervo_api::router(test_state(dir.path(), 10 * 1024 * 1024));

    let token = token_for(UserRole::Admin, 180);
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/usuarios")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // No live database behind the lazy pool, so the request cannot
    // succeed — but it must get past both gates.
    assert_ne!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_ne!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn cookie_takes_precedence_over_header() {
    let dir = tempfile::tempdir().unwrap();
    let app = acervo_api::router(test_state(dir.path(), 10 * 1024 * 1024));

    // Valid cookie, garbage header: the cookie must win.
    let token = token_for(UserRole::Admin, 180);
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/usuarios")
                .header(header::COOKIE, format!("token={token}"))
                .header(header::AUTHORIZATION, "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_ne!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_ne!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn login_requires_email_and_password() {
    let dir = tempfile::tempdir().unwrap();
    let app = acervo_api::router(test_state(dir.path(), 10 * 1024 * 1024));

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"email": "  ", "senha": ""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["erro"], "Email e senha são obrigatórios");
}

#[tokio::test]
async fn logout_clears_the_auth_cookie() {
    let dir = tempfile::tempdir().unwrap();
    let app = acervo_api::router(test_state(dir.path(), 10 * 1024 * 1024));

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("Max-Age=0"));

    let json = body_json(resp).await;
    assert_eq!(json["redirect"], "/");
}

#[tokio::test]
async fn unknown_route_is_a_structured_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = acervo_api::router(test_state(dir.path(), 10 * 1024 * 1024));

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/nada")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json = body_json(resp).await;
    assert_eq!(json["erro"], "Rota não encontrada");
}

fn multipart_body(boundary: &str, file_name: &str, mime: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in [
        ("titulo", "Relatório Anual"),
        ("categoria", "Relatorios"),
        ("data", "2026-02"),
    ] {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"arquivo\"; \
             filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[tokio::test]
async fn upload_with_disallowed_type_is_rejected_before_any_write() {
    let dir = tempfile::tempdir().unwrap();
    let app = acervo_api::router(test_state(dir.path(), 10 * 1024 * 1024));

    let token = token_for(UserRole::Editor, 180);
    let boundary = "gate-test-boundary";
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/documentos")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(multipart_body(
                    boundary,
                    "run.exe",
                    "application/octet-stream",
                    b"MZ",
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(
        json["erro"],
        "Tipo de arquivo não permitido. Use PDF, DOC, DOCX ou imagens."
    );

    // Nothing may be left on disk, not even a staged temp file.
    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert!(leftovers.is_empty(), "upload root should be untouched");
}

#[tokio::test]
async fn upload_over_the_size_limit_is_rejected_before_any_write() {
    let dir = tempfile::tempdir().unwrap();
    // One byte over the configured maximum.
    let app = acervo_api::router(test_state(dir.path(), 16));

    let token = token_for(UserRole::Editor, 180);
    let boundary = "gate-test-boundary";
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/documentos")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(multipart_body(
                    boundary,
                    "relatorio.pdf",
                    "application/pdf",
                    &[0u8; 17],
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["erro"], "Arquivo muito grande. Tamanho máximo: 10MB");

    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert!(leftovers.is_empty(), "upload root should be untouched");
}
