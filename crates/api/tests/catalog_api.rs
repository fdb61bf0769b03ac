//! HTTP-level tests for tags, genders, contents and forms.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete_auth, get, get_auth, post_json_auth, put_json_auth,
    seed_admin, token_for,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_tag_name_is_409_on_second_create(pool: PgPool) {
    let (_, token) = seed_admin(&pool).await;

    let first = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/tags",
        json!({ "name": "X", "color": "#ff0000" }),
        &token,
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json_auth(
        build_test_app(pool),
        "/api/v1/tags",
        json!({ "name": "X" }),
        &token,
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json = body_json(second).await;
    assert_eq!(json["error"], "Já existe uma tag com esse nome");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn renaming_tag_onto_existing_name_is_409(pool: PgPool) {
    let (_, token) = seed_admin(&pool).await;
    for name in ["Rust", "Go"] {
        post_json_auth(
            build_test_app(pool.clone()),
            "/api/v1/tags",
            json!({ "name": name }),
            &token,
        )
        .await;
    }
    let listed = body_json(get_auth(build_test_app(pool.clone()), "/api/v1/tags", &token).await)
        .await;
    let go_id = listed["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == "Go")
        .unwrap()["id"]
        .as_i64()
        .unwrap();

    let response = put_json_auth(
        build_test_app(pool),
        &format!("/api/v1/tags/{go_id}"),
        json!({ "name": "  Rust  " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tag_with_bad_color_is_400(pool: PgPool) {
    let (_, token) = seed_admin(&pool).await;
    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/tags",
        json!({ "name": "Cor", "color": "red" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inactive_tags_are_listed_only_on_request(pool: PgPool) {
    let (_, token) = seed_admin(&pool).await;
    post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/tags",
        json!({ "name": "Arquivada", "is_active": false }),
        &token,
    )
    .await;

    let active = body_json(get_auth(build_test_app(pool.clone()), "/api/v1/tags", &token).await)
        .await;
    assert!(active["data"].as_array().unwrap().is_empty());

    let all = body_json(
        get_auth(
            build_test_app(pool),
            "/api/v1/tags?include_inactive=true",
            &token,
        )
        .await,
    )
    .await;
    assert_eq!(all["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Genders
// ---------------------------------------------------------------------------

async fn create_gender(pool: &PgPool, token: &str, name: &str) -> i64 {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/genders",
        json!({ "name": name }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn gender_in_use_cannot_be_deleted(pool: PgPool) {
    let (_, token) = seed_admin(&pool).await;
    let gender = create_gender(&pool, &token, "Feminino").await;

    for i in 0..5 {
        let response = post_json_auth(
            build_test_app(pool.clone()),
            "/api/v1/users",
            json!({
                "name": format!("Aluna {i}"),
                "email": format!("aluna{i}@trilha.test"),
                "password": "aluna-password",
                "gender_id": gender
            }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = delete_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/genders/{gender}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains('5'));

    let still_there: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genders WHERE id = $1")
        .bind(gender)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(still_there, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn gender_delete_racing_user_creation_never_errors(pool: PgPool) {
    let (_, token) = seed_admin(&pool).await;
    let gender = create_gender(&pool, &token, "Disputado").await;

    let creates: Vec<_> = (0..4)
        .map(|i| {
            let app = build_test_app(pool.clone());
            let token = token.clone();
            tokio::spawn(async move {
                let body = json!({
                    "name": format!("Aluno {i}"),
                    "email": format!("corrida{i}@trilha.test"),
                    "password": "aluno-password",
                    "gender_id": gender
                });
                post_json_auth(app, "/api/v1/users", body, &token).await.status()
            })
        })
        .collect();
    let delete = {
        let app = build_test_app(pool.clone());
        let token = token.clone();
        tokio::spawn(async move {
            delete_auth(app, &format!("/api/v1/genders/{gender}"), &token)
                .await
                .status()
        })
    };

    let delete_status = delete.await.unwrap();
    assert!(
        [StatusCode::NO_CONTENT, StatusCode::PRECONDITION_FAILED].contains(&delete_status),
        "unexpected delete status {delete_status}"
    );
    for create in creates {
        let status = create.await.unwrap();
        assert!(
            [
                StatusCode::CREATED,
                StatusCode::NOT_FOUND,
                StatusCode::PRECONDITION_FAILED
            ]
            .contains(&status),
            "unexpected create status {status}"
        );
    }

    let (genders, users): (i64, i64) = sqlx::query_as(
        "SELECT (SELECT COUNT(*) FROM genders WHERE id = $1), \
                (SELECT COUNT(*) FROM users WHERE gender_id = $1)",
    )
    .bind(gender)
    .fetch_one(&pool)
    .await
    .unwrap();
    if delete_status == StatusCode::NO_CONTENT {
        assert_eq!((genders, users), (0, 0));
    } else {
        assert_eq!(genders, 1);
        assert!(users > 0);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unused_gender_is_deleted(pool: PgPool) {
    let (_, token) = seed_admin(&pool).await;
    let gender = create_gender(&pool, &token, "Outro").await;

    let uri = format!("/api/v1/genders/{gender}");
    let response = delete_auth(build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(build_test_app(pool), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn public_gender_list_shows_active_only(pool: PgPool) {
    let (_, token) = seed_admin(&pool).await;
    create_gender(&pool, &token, "Masculino").await;
    let hidden = create_gender(&pool, &token, "Oculto").await;
    put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/genders/{hidden}"),
        json!({ "is_active": false }),
        &token,
    )
    .await;

    let response = get(build_test_app(pool), "/api/v1/genders").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Masculino"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_gender_name_is_409(pool: PgPool) {
    let (_, token) = seed_admin(&pool).await;
    create_gender(&pool, &token, "Feminino").await;

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/genders",
        json!({ "name": "Feminino" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["error"],
        "Já existe um gênero com esse nome"
    );
}

// ---------------------------------------------------------------------------
// Contents
// ---------------------------------------------------------------------------

async fn create_tag(pool: &PgPool, token: &str, name: &str) -> i64 {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/tags",
        json!({ "name": name }),
        token,
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

fn tag_ids(content: &serde_json::Value) -> Vec<i64> {
    let mut ids: Vec<i64> = content["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    ids.sort_unstable();
    ids
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn content_slug_is_derived_and_unique(pool: PgPool) {
    let (_, token) = seed_admin(&pool).await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/contents",
        json!({ "title": "Introdução à Programação" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        body_json(response).await["data"]["slug"],
        "introducao-a-programacao"
    );

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/contents",
        json!({ "title": "Outro", "slug": "introducao-a-programacao" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["error"],
        "Já existe um conteúdo com esse slug"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn content_tags_are_replaced_on_update(pool: PgPool) {
    let (_, token) = seed_admin(&pool).await;
    let a = create_tag(&pool, &token, "A").await;
    let b = create_tag(&pool, &token, "B").await;
    let c = create_tag(&pool, &token, "C").await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/contents",
        json!({ "title": "Com tags", "tags": [a, b] }),
        &token,
    )
    .await;
    let created = body_json(response).await["data"].clone();
    assert_eq!(tag_ids(&created), vec![a, b]);
    let id = created["id"].as_i64().unwrap();

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/contents/{id}"),
        json!({ "tags": [c] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(tag_ids(&body_json(response).await["data"]), vec![c]);

    // Without `tags` the set is untouched.
    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/contents/{id}"),
        json!({ "body": "texto" }),
        &token,
    )
    .await;
    assert_eq!(tag_ids(&body_json(response).await["data"]), vec![c]);

    let response = put_json_auth(
        build_test_app(pool),
        &format!("/api/v1/contents/{id}"),
        json!({ "tags": [] }),
        &token,
    )
    .await;
    assert!(tag_ids(&body_json(response).await["data"]).is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn content_with_unknown_tag_is_rejected(pool: PgPool) {
    let (_, token) = seed_admin(&pool).await;
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/contents",
        json!({ "title": "Sem tag", "tags": [424242] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contents")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn form_crud_round_trip(pool: PgPool) {
    let token = token_for(1, "user");

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/forms",
        json!({ "title": "Avaliação", "description": "Final" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/forms/{id}"),
        json!({ "title": "Avaliação final" }),
        &token,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["title"], "Avaliação final");

    let response =
        delete_auth(build_test_app(pool.clone()), &format!("/api/v1/forms/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(build_test_app(pool), "/api/v1/forms", &token).await;
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());
}
