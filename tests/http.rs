//! End-to-end dispatch through the axum router. No database is touched.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE, COOKIE, HOST, LOCATION, SET_COOKIE};
use axum::http::{Request, StatusCode};
use front_controller::{
    front_routes, Action, AppConfig, AppError, AppState, Arity, Context, Controller,
    ControllerRegistry, Env, EnvFile,
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

struct NotesController;

const NOTES: &[Action] = &[
    Action::new("index", Arity::NONE),
    Action::new("show", Arity::between(1, 2)),
    Action::new("store", Arity::NONE),
    Action::new("peek", Arity::NONE),
];

#[async_trait]
impl Controller for NotesController {
    fn actions(&self) -> &'static [Action] {
        NOTES
    }

    async fn invoke(
        &mut self,
        action: &str,
        params: Vec<String>,
        cx: &mut Context<'_>,
    ) -> Result<(), AppError> {
        match action {
            "index" => {
                let page = cx.input_or("page", "1");
                cx.json(&json!({ "page": page }), StatusCode::OK)
            }
            "show" => cx.json(&json!({ "params": params }), StatusCode::OK),
            "store" => {
                let title = cx.input_or("title", "").to_string();
                cx.flash("status", &format!("Saved {}", title));
                cx.redirect("notes/peek")
            }
            _ => {
                let status = cx.take_flash("status").unwrap_or_default();
                cx.json(&json!({ "status": status }), StatusCode::OK)
            }
        }
    }
}

fn app(debug: bool) -> axum::Router {
    let config = AppConfig {
        debug,
        base_path: "/app".into(),
        views_dir: std::env::temp_dir().join("front-controller-no-views"),
        body_limit: 64,
        ..AppConfig::default()
    };
    let registry = ControllerRegistry::new().register("NotesController", || NotesController);
    let env = Arc::new(EnvFile::preloaded(Env::default()));
    front_routes(AppState::new(config, env, registry).unwrap())
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(HOST, "example.test")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_get_under_base_path() {
    let response = app(false).oneshot(get("/app/notes?page=3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, r#"{"page":"3"}"#);

    let response = app(false).oneshot(get("/app/notes/show/7/draft")).await.unwrap();
    assert_eq!(body_text(response).await, r#"{"params":["7","draft"]}"#);
}

#[tokio::test]
async fn test_error_statuses() {
    let response = app(false).oneshot(get("/app/notes/bad%20method")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app(false).oneshot(get("/app/missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_text(response).await,
        "404 Not Found - The page you requested could not be found."
    );

    // Default controller is not registered here.
    let response = app(true).oneshot(get("/app/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Missing controller: HomeController"));
}

#[tokio::test]
async fn test_store_flashes_and_redirects() {
    let form = "title=First";
    let request = Request::builder()
        .method("POST")
        .uri("/app/notes/store")
        .header(HOST, "example.test")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap();
    let app = app(false);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(LOCATION).unwrap(),
        "http://example.test/app/notes/peek"
    );
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("fc_session="));

    let mut peek = get("/app/notes/peek");
    peek.headers_mut().insert(COOKIE, cookie.parse().unwrap());
    let response = app.clone().oneshot(peek).await.unwrap();
    assert_eq!(body_text(response).await, r#"{"status":"Saved First"}"#);

    let mut again = get("/app/notes/peek");
    again.headers_mut().insert(COOKIE, cookie.parse().unwrap());
    let response = app.oneshot(again).await.unwrap();
    assert_eq!(body_text(response).await, r#"{"status":""}"#);
}

#[tokio::test]
async fn test_body_limit() {
    let body = format!("title={}", "x".repeat(100));
    let request = Request::builder()
        .method("POST")
        .uri("/app/notes/store")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();
    let response = app(false).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
