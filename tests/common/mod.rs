use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use tawala::gateway::{OutcomeSource, SequenceSource, SimulatedGateway};
use tawala::server::router;
use tawala::web::AppState;
use tokio::time::Duration;
use tower::ServiceExt;

pub fn app_with_draws(draws: Vec<f64>) -> (AppState, Router) {
    app_with_source(Arc::new(SequenceSource::new(draws)))
}

pub fn app_with_source(source: Arc<dyn OutcomeSource>) -> (AppState, Router) {
    let state = AppState::new(SimulatedGateway::new(source), Duration::from_secs(600));
    (state.clone(), router(state))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_form(app: &Router, uri: &str, form: &str) -> TestResponse {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> TestResponse {
    send(app, Request::delete(uri).body(Body::empty()).unwrap()).await
}

/// Opens a checkout page and returns its session id.
pub async fn open_checkout(app: &Router, plan: &str) -> (String, TestResponse) {
    let page = get(app, &format!("/payment?plan={plan}")).await;
    assert_eq!(page.status, StatusCode::OK);
    let marker = r#"hx-delete="/payment/"#;
    let start = page.body.find(marker).expect("session marker") + marker.len();
    let end = start + page.body[start..].find('"').expect("closing quote");
    (page.body[start..end].to_string(), page)
}

/// Lets the simulated gateway delay elapse on a paused clock.
pub async fn settle() {
    tokio::time::sleep(Duration::from_secs(4)).await;
    tokio::task::yield_now().await;
}
