//! Students-related HTTP API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::AppState;
use crate::error::Result;
use crate::router::Valid;
use crate::student::{Student, StudentPayload};

pub fn router() -> Router<AppState> {
    Router::new()
        // `POST /api/students` creates, `GET` lists.
        .route("/", post(create).get(list))
        .route("/{id}", get(get_by_id).put(update).delete(remove))
        .route("/email/{email}", get(get_by_email))
        .route("/department/{department}", get(by_department))
        .route("/status/{status}", get(by_status))
        .route("/search/firstName/{fragment}", get(search_first_name))
        .route("/search/lastName/{fragment}", get(search_last_name))
        .route("/year/{year}", get(by_year))
        .route("/gpa/{min}", get(by_minimum_gpa))
}

async fn create(
    State(state): State<AppState>,
    Valid(payload): Valid<StudentPayload>,
) -> Result<Json<Student>> {
    Ok(Json(state.students.create(payload).await?))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<Student>>> {
    Ok(Json(state.students.list().await?))
}

async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Student>> {
    Ok(Json(state.students.get_by_id(&id).await?))
}

async fn get_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Student>> {
    Ok(Json(state.students.get_by_email(&email).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Valid(payload): Valid<StudentPayload>,
) -> Result<Json<Student>> {
    Ok(Json(state.students.update(&id, payload).await?))
}

async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    state.students.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn by_department(
    State(state): State<AppState>,
    Path(department): Path<String>,
) -> Result<Json<Vec<Student>>> {
    Ok(Json(state.students.by_department(&department).await?))
}

async fn by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<Student>>> {
    Ok(Json(state.students.by_status(&status).await?))
}

async fn search_first_name(
    State(state): State<AppState>,
    Path(fragment): Path<String>,
) -> Result<Json<Vec<Student>>> {
    Ok(Json(state.students.search_by_first_name(&fragment).await?))
}

async fn search_last_name(
    State(state): State<AppState>,
    Path(fragment): Path<String>,
) -> Result<Json<Vec<Student>>> {
    Ok(Json(state.students.search_by_last_name(&fragment).await?))
}

async fn by_year(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<Vec<Student>>> {
    Ok(Json(state.students.by_year(year).await?))
}

async fn by_minimum_gpa(
    State(state): State<AppState>,
    Path(min): Path<f64>,
) -> Result<Json<Vec<Student>>> {
    Ok(Json(state.students.by_minimum_gpa(min).await?))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};

    use crate::student::Student;
    use crate::{app, make_request, router};

    fn body(email: &str, department: &str) -> String {
        json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": email,
            "phoneNumber": "555",
            "address": "1 St",
            "department": department,
            "year": 2,
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_create_handler() {
        let app = app(router::state());

        let response = make_request(
            app,
            Method::POST,
            "/api/students",
            body("ada@x.com", "CS"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let student: Student = serde_json::from_slice(&bytes).unwrap();
        assert!(!student.id.is_empty());
        assert_eq!(student.status.as_deref(), Some("ACTIVE"));
    }

    #[tokio::test]
    async fn test_create_duplicate_email_conflicts() {
        let app = app(router::state());

        let response = make_request(
            app.clone(),
            Method::POST,
            "/api/students",
            body("ada@x.com", "CS"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = make_request(
            app,
            Method::POST,
            "/api/students",
            body("ada@x.com", "CS"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_blank_field_rejected() {
        let app = app(router::state());

        let body = json!({
            "firstName": "  ",
            "lastName": "Lovelace",
            "email": "ada@x.com",
            "phoneNumber": "555",
            "address": "1 St",
            "department": "CS",
            "year": 2,
        })
        .to_string();

        let response = make_request(app, Method::POST, "/api/students", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_unknown_id_not_found() {
        let app = app(router::state());

        let response =
            make_request(app, Method::GET, "/api/students/missing", String::default()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let app = app(router::state());

        let response = make_request(
            app.clone(),
            Method::POST,
            "/api/students",
            body("ada@x.com", "CS"),
        )
        .await;
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let student: Student = serde_json::from_slice(&bytes).unwrap();

        let path = format!("/api/students/{}", student.id);
        let response =
            make_request(app.clone(), Method::DELETE, &path, String::default()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = make_request(app, Method::GET, &path, String::default()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_then_query_by_department() {
        let app = app(router::state());

        let response = make_request(
            app.clone(),
            Method::POST,
            "/api/students",
            body("ada@x.com", "CS"),
        )
        .await;
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let student: Student = serde_json::from_slice(&bytes).unwrap();

        // same email on update is not a conflict.
        let response = make_request(
            app.clone(),
            Method::PUT,
            &format!("/api/students/{}", student.id),
            body("ada@x.com", "Math"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = make_request(
            app,
            Method::GET,
            "/api/students/department/Math",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let students: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(students.as_array().unwrap().len(), 1);
        assert_eq!(students[0]["department"], "Math");
    }

    #[tokio::test]
    async fn test_malformed_year_rejected_before_service() {
        let app = app(router::state());

        let response = make_request(
            app,
            Method::GET,
            "/api/students/year/two",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
