use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{expenses, groups, health, members, settlements};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/groups", get(groups::list).post(groups::create))
        .route(
            "/groups/{group_id}",
            get(groups::get).put(groups::update).delete(groups::remove),
        )
        .route("/groups/{group_id}/members", post(members::add))
        .route(
            "/groups/{group_id}/members/{member_id}",
            axum::routing::delete(members::remove),
        )
        .route(
            "/groups/{group_id}/expenses",
            get(expenses::list).post(expenses::create),
        )
        .route(
            "/groups/{group_id}/expenses/{expense_id}",
            axum::routing::put(expenses::update).delete(expenses::remove),
        )
        .route("/groups/{group_id}/settlements", get(settlements::get))
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::Database;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder().database(db).build();

        router(ServerState {
            engine: Arc::new(engine),
        })
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn healthz_is_ok() {
        let app = test_router().await;

        let response = app.oneshot(get_request("/healthz")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_group_is_404() {
        let app = test_router().await;

        let response = app
            .oneshot(get_request(&format!("/groups/{}", uuid::Uuid::new_v4())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn group_expense_settlement_roundtrip() {
        let app = test_router().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/groups",
                json!({
                    "name": "Trip",
                    "currency": "EUR",
                    "memberNames": ["Alice", "Bob"],
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let group = body_json(response).await;
        assert_eq!(group["currency"], "EUR");
        let group_id = group["id"].as_str().unwrap().to_string();
        let alice = group["members"][0]["id"].as_str().unwrap().to_string();
        let bob = group["members"][1]["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/groups/{group_id}/expenses"),
                json!({
                    "amount": 1000,
                    "description": "Dinner",
                    "paidById": alice,
                    "splitMemberIds": [alice, bob],
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(get_request(&format!("/groups/{group_id}/settlements")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let plan = body_json(response).await;
        assert_eq!(plan["settlements"].as_array().unwrap().len(), 1);
        assert_eq!(plan["settlements"][0]["amount"], 500);
        assert_eq!(plan["settlements"][0]["toMemberId"], Value::String(alice));
        assert_eq!(plan["settlements"][0]["fromMemberId"], Value::String(bob));
    }

    #[tokio::test]
    async fn invalid_expense_amount_is_422() {
        let app = test_router().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/groups",
                json!({ "name": "Trip", "memberNames": ["Alice"] }),
            ))
            .await
            .unwrap();
        let group = body_json(response).await;
        let group_id = group["id"].as_str().unwrap().to_string();
        let alice = group["members"][0]["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/groups/{group_id}/expenses"),
                json!({
                    "amount": 0,
                    "description": "Nothing",
                    "paidById": alice,
                    "splitMemberIds": [alice],
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn duplicate_member_is_409() {
        let app = test_router().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/groups",
                json!({ "name": "Trip", "memberNames": ["Alice"] }),
            ))
            .await
            .unwrap();
        let group = body_json(response).await;
        let group_id = group["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/groups/{group_id}/members"),
                json!({ "memberName": "alice" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
