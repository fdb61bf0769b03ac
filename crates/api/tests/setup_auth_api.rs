//! HTTP-level tests for setup, login and user administration.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete_auth, get, get_auth, post_json, post_json_auth, put_json_auth,
};
use serde_json::json;
use sqlx::PgPool;

fn setup_body(email: &str) -> serde_json::Value {
    json!({
        "name": "Coordenação",
        "email": email,
        "password": "senha-segura"
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn setup_runs_once(pool: PgPool) {
    let response = get(build_test_app(pool.clone()), "/api/v1/setup").await;
    assert_eq!(body_json(response).await["data"]["configured"], false);

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/setup",
        setup_body("admin@trilha.test"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["role"], "admin");
    assert_eq!(json["data"]["context"]["is_default"], true);
    assert_eq!(json["data"]["context"]["name"], "Padrão");
    assert!(json["data"]["user"].get("password_hash").is_none());

    let managers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM context_managers")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(managers, 1);

    // Different, non-conflicting input still fails.
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/setup",
        setup_body("outra@trilha.test"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "Sistema já configurado");

    let response = get(build_test_app(pool), "/api/v1/setup").await;
    assert_eq!(body_json(response).await["data"]["configured"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn setup_with_taken_email_is_409_and_writes_nothing(pool: PgPool) {
    sqlx::query(
        "INSERT INTO users (name, email, password_hash, role) \
         VALUES ('Existente', 'admin@trilha.test', 'x', 'user')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/setup",
        setup_body("Admin@Trilha.test"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["error"],
        "Já existe um usuário com esse email"
    );

    let contexts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contexts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(contexts, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_after_setup_issues_a_working_token(pool: PgPool) {
    post_json(
        build_test_app(pool.clone()),
        "/api/v1/setup",
        setup_body("admin@trilha.test"),
    )
    .await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/auth/login",
        json!({ "email": "ADMIN@trilha.test", "password": "senha-segura" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let token = json["data"]["access_token"].as_str().unwrap().to_string();
    assert_eq!(json["data"]["user"]["email"], "admin@trilha.test");

    let response = get_auth(build_test_app(pool.clone()), "/api/v1/users", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        build_test_app(pool),
        "/api/v1/auth/login",
        json!({ "email": "admin@trilha.test", "password": "errada-errada" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_user_cannot_log_in(pool: PgPool) {
    let (admin_id, token) = common::seed_admin(&pool).await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/users",
        json!({ "name": "Aluno", "email": "aluno@trilha.test", "password": "aluno-senha" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["role"], "user");
    let id = created["data"]["id"].as_i64().unwrap();

    let response =
        delete_auth(build_test_app(pool.clone()), &format!("/api/v1/users/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Without the right password the account state is not revealed.
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/auth/login",
        json!({ "email": "aluno@trilha.test", "password": "chute-errado" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/auth/login",
        json!({ "email": "aluno@trilha.test", "password": "aluno-senha" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admins cannot lock themselves out.
    let response = delete_auth(
        build_test_app(pool),
        &format!("/api/v1/users/{admin_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_cannot_deactivate_or_demote_self_through_update(pool: PgPool) {
    let (admin_id, token) = common::seed_admin(&pool).await;
    let uri = format!("/api/v1/users/{admin_id}");

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &uri,
        json!({ "is_active": false }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &uri,
        json!({ "role": "user" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Harmless self-edits still go through.
    let response = put_json_auth(
        build_test_app(pool.clone()),
        &uri,
        json!({ "name": "Coordenação Geral", "role": "admin", "is_active": true }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let (role, is_active): (String, bool) =
        sqlx::query_as("SELECT role, is_active FROM users WHERE id = $1")
            .bind(admin_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(role, "admin");
    assert!(is_active);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_reports_database(pool: PgPool) {
    let response = get(build_test_app(pool), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["configured"], false);
}
