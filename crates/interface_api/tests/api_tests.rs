//! Router tests over the in-memory store

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use domain_gym::{InMemoryGym, RecordingWorkloadNotifier, WorkloadAction};
use interface_api::config::{ApiConfig, StorageKind};
use interface_api::{create_router, AppState};

struct TestApp {
    router: Router,
    workload: Arc<RecordingWorkloadNotifier>,
}

fn app() -> TestApp {
    let config = ApiConfig {
        jwt_secret: "test-secret".to_string(),
        bcrypt_cost: 4,
        storage: StorageKind::Memory,
        ..Default::default()
    };
    let workload = Arc::new(RecordingWorkloadNotifier::new());
    let ports = InMemoryGym::new().into_ports(workload.clone());
    let state = AppState::new(config, ports).unwrap();

    TestApp {
        router: create_router(state),
        workload,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    async fn login_response(&self, username: &str, password: &str) -> Response {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/v1/user/login")
            .header("username", username)
            .header("password", password)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn login(&self, username: &str, password: &str) -> String {
        let response = self.login_response(username, password).await;
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await["token"].as_str().unwrap().to_string()
    }

    async fn register_trainee(&self, first: &str, last: &str) -> (String, String) {
        let response = self
            .call(
                Method::POST,
                "/api/v1/trainee/registration",
                None,
                Some(json!({
                    "firstName": first,
                    "lastName": last,
                    "dateOfBirth": "1995-04-12",
                    "address": "12 Elm Street"
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        credentials(response).await
    }

    async fn register_trainer(&self, first: &str, last: &str, type_id: i64) -> (String, String) {
        let response = self
            .call(
                Method::POST,
                "/api/v1/trainer/registration",
                None,
                Some(json!({"firstName": first, "lastName": last, "trainingTypeId": type_id})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        credentials(response).await
    }
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn credentials(response: Response) -> (String, String) {
    let body = json_body(response).await;
    (
        body["username"].as_str().unwrap().to_string(),
        body["password"].as_str().unwrap().to_string(),
    )
}

mod public_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let app = app();
        let response = app.call(Method::GET, "/health", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-transaction-id"));
        assert_eq!(json_body(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_reports_store() {
        let app = app();
        let response = app.call(Method::GET, "/health/ready", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["store"]["status"], "healthy");
        assert_eq!(body["store"]["adapterId"], "in-memory-gym");
        assert!(body["workload"]["latencyMs"].is_u64());
    }

    #[tokio::test]
    async fn test_registration_returns_generated_credentials() {
        let app = app();
        let (username, password) = app.register_trainee("Anna", "Lee").await;
        assert_eq!(username, "Anna.Lee");
        assert_eq!(password.len(), 10);

        let (second, _) = app.register_trainer("Anna", "Lee", 2).await;
        assert_eq!(second, "Anna.Lee1");
    }

    #[tokio::test]
    async fn test_registration_with_blank_name_rejected() {
        let app = app();
        let response = app
            .call(
                Method::POST,
                "/api/v1/trainee/registration",
                None,
                Some(json!({"firstName": "", "lastName": "Lee"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["details"][0], "First name is required.");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_registration_missing_field_is_json_validation_error() {
        let app = app();
        let response = app
            .call(
                Method::POST,
                "/api/v1/trainee/registration",
                None,
                Some(json!({"firstName": "Ann"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "validation_error");
        assert!(body["message"].as_str().unwrap().contains("lastName"));
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_registration_with_malformed_date_rejected() {
        let app = app();
        let response = app
            .call(
                Method::POST,
                "/api/v1/trainee/registration",
                None,
                Some(json!({"firstName": "Ann", "lastName": "Lee", "dateOfBirth": "12/04/1995"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_trainer_registration_with_unknown_type() {
        let app = app();
        let response = app
            .call(
                Method::POST,
                "/api/v1/trainer/registration",
                None,
                Some(json!({"firstName": "Mia", "lastName": "Stone", "trainingTypeId": 99})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

mod session_tests {
    use super::*;

    #[tokio::test]
    async fn test_login_returns_authorization_header() {
        let app = app();
        let (username, password) = app.register_trainee("Anna", "Lee").await;

        let response = app.login_response(&username, &password).await;
        assert_eq!(response.status(), StatusCode::OK);
        let header = response.headers()[header::AUTHORIZATION].to_str().unwrap().to_string();
        let token = json_body(response).await["token"].as_str().unwrap().to_string();
        assert_eq!(header, format!("Bearer {}", token));
    }

    #[tokio::test]
    async fn test_missing_credentials_rejected() {
        let app = app();
        let response = app.login_response("", "").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_whitespace_password_is_missing_credentials() {
        let app = app();
        let (username, _) = app.register_trainee("Anna", "Lee").await;

        let response = app.login_response(&username, "   ").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let metrics = json_body(app.call(Method::GET, "/metrics", None, None).await).await;
        assert_eq!(metrics["login_failure_total"], 0);
    }

    #[tokio::test]
    async fn test_second_login_conflicts() {
        let app = app();
        let (username, password) = app.register_trainee("Anna", "Lee").await;
        app.login(&username, &password).await;

        let response = app.login_response(&username, &password).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_repeated_failures_block_client() {
        let app = app();
        let (username, password) = app.register_trainee("Anna", "Lee").await;

        for _ in 0..3 {
            let response = app.login_response(&username, "wrong-password").await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        let response = app.login_response(&username, &password).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let metrics = json_body(app.call(Method::GET, "/metrics", None, None).await).await;
        assert_eq!(metrics["login_failure_total"], 3);
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let app = app();
        let response = app.call(Method::GET, "/api/v1/training-types", None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .call(Method::GET, "/api/v1/training-types", Some("not-a-jwt"), None)
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let app = app();
        let (username, password) = app.register_trainee("Anna", "Lee").await;
        let token = app.login(&username, &password).await;

        let response = app.call(Method::POST, "/api/v1/user/logout", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .call(Method::GET, "/api/v1/training-types", Some(&token), None)
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        app.login(&username, &password).await;
    }

    #[tokio::test]
    async fn test_change_login_then_login_with_new_password() {
        let app = app();
        let (username, password) = app.register_trainee("Anna", "Lee").await;
        let token = app.login(&username, &password).await;

        let response = app
            .call(
                Method::PUT,
                "/api/v1/user/change-login",
                Some(&token),
                Some(json!({"username": username, "oldPassword": password, "newPassword": "n3w-Secret"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        app.call(Method::POST, "/api/v1/user/logout", Some(&token), None).await;
        let response = app.login_response(&username, &password).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        app.login(&username, "n3w-Secret").await;
    }

    #[tokio::test]
    async fn test_change_login_for_other_user_forbidden() {
        let app = app();
        let (anna, anna_password) = app.register_trainee("Anna", "Lee").await;
        let (mia, mia_password) = app.register_trainee("Mia", "Stone").await;
        let token = app.login(&anna, &anna_password).await;

        let response = app
            .call(
                Method::PUT,
                "/api/v1/user/change-login",
                Some(&token),
                Some(json!({"username": mia, "oldPassword": mia_password, "newPassword": "x"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

mod profile_tests {
    use super::*;

    #[tokio::test]
    async fn test_trainee_profile_and_update() {
        let app = app();
        let (username, password) = app.register_trainee("Anna", "Lee").await;
        let token = app.login(&username, &password).await;

        let response = app
            .call(Method::GET, &format!("/api/v1/trainee/{}", username), Some(&token), None)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let profile = json_body(response).await;
        assert_eq!(profile["firstName"], "Anna");
        assert_eq!(profile["dateOfBirth"], "1995-04-12");
        assert_eq!(profile["isActive"], true);

        let response = app
            .call(
                Method::PUT,
                "/api/v1/trainee",
                Some(&token),
                Some(json!({
                    "username": username,
                    "firstName": "Annie",
                    "lastName": "Lee",
                    "address": "  ",
                    "isActive": true
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let profile = json_body(response).await;
        assert_eq!(profile["firstName"], "Annie");
        assert!(profile["address"].is_null());
        assert_eq!(profile["username"], "Anna.Lee");
    }

    #[tokio::test]
    async fn test_foreign_profile_mutation_forbidden() {
        let app = app();
        let (anna, password) = app.register_trainee("Anna", "Lee").await;
        let (mia, _) = app.register_trainee("Mia", "Stone").await;
        let token = app.login(&anna, &password).await;

        let response = app
            .call(Method::DELETE, &format!("/api/v1/trainee/{}", mia), Some(&token), None)
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .call(
                Method::PATCH,
                "/api/v1/trainee/status",
                Some(&token),
                Some(json!({"username": mia, "isActive": false})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_trainee_profile_not_found() {
        let app = app();
        let (username, password) = app.register_trainee("Anna", "Lee").await;
        let token = app.login(&username, &password).await;

        let response = app
            .call(Method::GET, "/api/v1/trainee/Nobody.Here", Some(&token), None)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "not_found");
    }

    #[tokio::test]
    async fn test_trainer_status_toggle() {
        let app = app();
        let (username, password) = app.register_trainer("Mia", "Stone", 2).await;
        let token = app.login(&username, &password).await;

        let response = app
            .call(
                Method::PATCH,
                "/api/v1/trainer/status",
                Some(&token),
                Some(json!({"username": username, "isActive": false})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let profile = json_body(
            app.call(Method::GET, &format!("/api/v1/trainer/{}", username), Some(&token), None)
                .await,
        )
        .await;
        assert_eq!(profile["isActive"], false);
        assert_eq!(profile["specialization"]["trainingType"], "Yoga");
    }

    #[tokio::test]
    async fn test_delete_own_trainee_profile() {
        let app = app();
        let (username, password) = app.register_trainee("Anna", "Lee").await;
        let token = app.login(&username, &password).await;

        let response = app
            .call(Method::DELETE, &format!("/api/v1/trainee/{}", username), Some(&token), None)
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.login_response(&username, &password).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

mod assignment_tests {
    use super::*;

    #[tokio::test]
    async fn test_replace_trainers_and_unassigned_list() {
        let app = app();
        let (trainee, password) = app.register_trainee("Anna", "Lee").await;
        let (yoga, _) = app.register_trainer("Mia", "Stone", 2).await;
        let (zumba, _) = app.register_trainer("Leo", "Park", 3).await;
        let token = app.login(&trainee, &password).await;

        let response = app
            .call(
                Method::PUT,
                "/api/v1/trainee/trainers",
                Some(&token),
                Some(json!({"traineeUsername": trainee, "trainerUsernames": [yoga]})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let trainers = json_body(response).await;
        assert_eq!(trainers.as_array().unwrap().len(), 1);
        assert_eq!(trainers[0]["username"], "Mia.Stone");

        let unassigned = json_body(
            app.call(
                Method::GET,
                &format!("/api/v1/trainee/{}/unassigned-trainers", trainee),
                Some(&token),
                None,
            )
            .await,
        )
        .await;
        assert_eq!(unassigned.as_array().unwrap().len(), 1);
        assert_eq!(unassigned[0]["username"], zumba);
    }

    #[tokio::test]
    async fn test_unknown_trainer_names_reported() {
        let app = app();
        let (trainee, password) = app.register_trainee("Anna", "Lee").await;
        let token = app.login(&trainee, &password).await;

        let response = app
            .call(
                Method::PUT,
                "/api/v1/trainee/trainers",
                Some(&token),
                Some(json!({"traineeUsername": trainee, "trainerUsernames": ["Ghost.One"]})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let message = json_body(response).await["message"].as_str().unwrap().to_string();
        assert!(message.contains("Ghost.One"));
    }
}

mod training_tests {
    use super::*;

    #[tokio::test]
    async fn test_training_types_listed() {
        let app = app();
        let (username, password) = app.register_trainee("Anna", "Lee").await;
        let token = app.login(&username, &password).await;

        let types = json_body(
            app.call(Method::GET, "/api/v1/training-types", Some(&token), None)
                .await,
        )
        .await;
        assert_eq!(types.as_array().unwrap().len(), 5);
        assert_eq!(types[0]["trainingType"], "Fitness");
        assert_eq!(types[0]["trainingTypeId"], 1);
    }

    #[tokio::test]
    async fn test_add_query_and_delete_training() {
        let app = app();
        let (trainee, password) = app.register_trainee("Anna", "Lee").await;
        let (trainer, _) = app.register_trainer("Mia", "Stone", 2).await;
        let token = app.login(&trainee, &password).await;

        let response = app
            .call(
                Method::POST,
                "/api/v1/training",
                Some(&token),
                Some(json!({
                    "traineeUsername": trainee,
                    "trainerUsername": trainer,
                    "trainingName": "Morning flow",
                    "trainingDate": "2024-03-10",
                    "trainingDuration": 60
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = json_body(response).await["id"].as_i64().unwrap();

        let uri = format!(
            "/api/v1/training/trainee?traineeName={}&periodFrom=2024-03-01&periodTo=2024-03-31&trainingType=yoga",
            trainee
        );
        let response = app.call(Method::GET, &uri, Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let trainings = json_body(response).await;
        assert_eq!(trainings[0]["trainingName"], "Morning flow");
        assert_eq!(trainings[0]["trainingType"], "Yoga");
        assert_eq!(trainings[0]["trainerUsername"], "Mia.Stone");

        let response = app
            .call(Method::DELETE, &format!("/api/v1/training/{}", id), Some(&token), None)
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let events = app.workload.events().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action_type, WorkloadAction::Add);
        assert_eq!(events[1].action_type, WorkloadAction::Delete);
    }

    #[tokio::test]
    async fn test_empty_training_query_not_found() {
        let app = app();
        let (trainer, password) = app.register_trainer("Mia", "Stone", 2).await;
        let token = app.login(&trainer, &password).await;

        let uri = format!("/api/v1/training/trainer?trainerName={}", trainer);
        let response = app.call(Method::GET, &uri, Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reversed_period_rejected() {
        let app = app();
        let (trainer, password) = app.register_trainer("Mia", "Stone", 2).await;
        let token = app.login(&trainer, &password).await;

        let uri = format!(
            "/api/v1/training/trainer?trainerName={}&periodFrom=2024-05-01&periodTo=2024-04-01",
            trainer
        );
        let response = app.call(Method::GET, &uri, Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_training_for_other_people_forbidden() {
        let app = app();
        let (outsider, password) = app.register_trainee("Anna", "Lee").await;
        let (trainee, _) = app.register_trainee("Mia", "Stone").await;
        let (trainer, _) = app.register_trainer("Leo", "Park", 1).await;
        let token = app.login(&outsider, &password).await;

        let response = app
            .call(
                Method::POST,
                "/api/v1/training",
                Some(&token),
                Some(json!({
                    "traineeUsername": trainee,
                    "trainerUsername": trainer,
                    "trainingName": "Circuit",
                    "trainingDate": "2024-03-10",
                    "trainingDuration": 45
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(app.workload.events().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_training_not_found() {
        let app = app();
        let (username, password) = app.register_trainee("Anna", "Lee").await;
        let token = app.login(&username, &password).await;

        let response = app
            .call(Method::DELETE, "/api/v1/training/4242", Some(&token), None)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_numeric_training_id_rejected() {
        let app = app();
        let (username, password) = app.register_trainee("Anna", "Lee").await;
        let token = app.login(&username, &password).await;

        let response = app
            .call(Method::DELETE, "/api/v1/training/abc", Some(&token), None)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_malformed_period_query_rejected() {
        let app = app();
        let (trainer, password) = app.register_trainer("Mia", "Stone", 2).await;
        let token = app.login(&trainer, &password).await;

        let uri = format!("/api/v1/training/trainer?trainerName={}&periodFrom=01-03-2024", trainer);
        let response = app.call(Method::GET, &uri, Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "validation_error");
    }
}
