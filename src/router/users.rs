//! Users-related HTTP API.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::AppState;
use crate::error::Result;
use crate::router::Valid;
use crate::user::{RegisterRequest, UserResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/register", post(register))
}

async fn register(
    State(state): State<AppState>,
    Valid(request): Valid<RegisterRequest>,
) -> Result<Json<UserResponse>> {
    Ok(Json(state.users.register(request).await?))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};

    use crate::{app, make_request, router};

    fn body(username: &str) -> String {
        json!({
            "username": username,
            "password": "hunter2hunter2",
            "email": "grace@x.com",
            "fullName": "Grace Hopper",
            "role": "ADMIN",
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_register_handler_excludes_password() {
        let app = app(router::state());

        let response =
            make_request(app, Method::POST, "/api/users/register", body("grace")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["username"], "grace");
        assert_eq!(value["active"], true);
    }

    #[tokio::test]
    async fn test_register_duplicate_username_conflicts() {
        let app = app(router::state());

        let response = make_request(
            app.clone(),
            Method::POST,
            "/api/users/register",
            body("grace"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response =
            make_request(app, Method::POST, "/api/users/register", body("grace")).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_register_blank_role_rejected() {
        let app = app(router::state());

        let body = json!({
            "username": "grace",
            "password": "hunter2hunter2",
            "fullName": "Grace Hopper",
            "role": "",
        })
        .to_string();

        let response = make_request(app, Method::POST, "/api/users/register", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
