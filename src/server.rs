use anyhow::Context;
use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::catalog::{self, PricingPlan};
use crate::checkout::{PaymentMethod, PaymentOutcome, PaymentStatus};
use crate::config::ServerConfig;
use crate::error::{CheckoutError, SessionError};
use crate::gateway::{run_payment_flow, FlowResult};
use crate::web::{
    render_checkout_content, render_checkout_page, render_landing_page, render_payment_panel,
    AppState, LandingPageContext, PendingPayment, SessionId,
};

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config);
    info!(
        delay_ms = config.gateway.payment_delay_ms,
        success_rate = config.gateway.success_rate,
        seeded = config.gateway.seed.is_some(),
        "simulated payment gateway ready"
    );
    tokio::spawn(sweep_sessions(state.clone()));

    let app = router(state);
    info!("Starting Tawala server on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing))
        .route("/payment", get(checkout_page))
        .route("/payment/:id", delete(close_checkout))
        .route("/payment/:id/method", post(select_method))
        .route("/payment/:id/phone", post(update_phone))
        .route("/payment/:id/submit", post(submit_payment))
        .route("/payment/:id/status", get(payment_status))
        .route("/payment/:id/reset", post(reset_payment))
        .route("/api/plans", get(list_plans))
        .route("/api/checkout/:id", get(checkout_snapshot))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

async fn landing() -> Html<String> {
    Html(render_landing_page(&LandingPageContext::default()))
}

#[derive(Debug, Deserialize)]
struct PlanQuery {
    plan: Option<String>,
}

async fn checkout_page(
    State(state): State<AppState>,
    Query(query): Query<PlanQuery>,
) -> Html<String> {
    let plan = catalog::resolve_plan(query.plan.as_deref());
    let session = state.open_session(plan).await;
    Html(render_checkout_page(&session))
}

#[derive(Debug, Deserialize)]
struct MethodForm {
    method: String,
}

async fn select_method(
    Path(id): Path<SessionId>,
    State(state): State<AppState>,
    Form(form): Form<MethodForm>,
) -> Result<Html<String>, (StatusCode, String)> {
    let method: PaymentMethod = form
        .method
        .parse()
        .map_err(|err: CheckoutError| (StatusCode::BAD_REQUEST, err.to_string()))?;
    let session = state
        .select_method(&id, method)
        .await
        .map_err(session_error)?;
    Ok(Html(render_payment_panel(&session)))
}

#[derive(Debug, Deserialize)]
struct PhoneForm {
    #[serde(default)]
    phone: String,
}

async fn update_phone(
    Path(id): Path<SessionId>,
    State(state): State<AppState>,
    Form(form): Form<PhoneForm>,
) -> Result<Html<String>, (StatusCode, String)> {
    let session = state
        .update_phone(&id, &form.phone)
        .await
        .map_err(session_error)?;
    Ok(Html(render_payment_panel(&session)))
}

async fn submit_payment(
    Path(id): Path<SessionId>,
    State(state): State<AppState>,
) -> Result<Html<String>, (StatusCode, String)> {
    let (session, payment) = state.begin_payment(&id).await.map_err(session_error)?;
    info!(
        session_id = %id,
        plan = payment.request.plan_id,
        method = %payment.request.method,
        attempt = session.state.attempts(),
        "payment submitted"
    );

    tokio::spawn(run_payment(state.clone(), id, payment));

    Ok(Html(render_payment_panel(&session)))
}

async fn payment_status(
    Path(id): Path<SessionId>,
    State(state): State<AppState>,
) -> Result<Response, StatusCode> {
    let session = state.get_session(&id).await.ok_or(StatusCode::NOT_FOUND)?;
    if session.state.status() == PaymentStatus::Success {
        // The confirmation replaces the whole checkout, not just the panel.
        return Ok((
            [("HX-Retarget", "#checkout"), ("HX-Reswap", "innerHTML")],
            Html(render_checkout_content(&session)),
        )
            .into_response());
    }
    Ok(Html(render_payment_panel(&session)).into_response())
}

async fn reset_payment(
    Path(id): Path<SessionId>,
    State(state): State<AppState>,
) -> Result<Html<String>, (StatusCode, String)> {
    let session = state.reset_payment(&id).await.map_err(session_error)?;
    Ok(Html(render_payment_panel(&session)))
}

/// Leaves the checkout. Any payment still in flight is cancelled with the session.
async fn close_checkout(Path(id): Path<SessionId>, State(state): State<AppState>) -> Response {
    if !state.close_session(&id).await {
        warn!(session_id = %id, "close requested for unknown checkout session");
    }
    (StatusCode::OK, [("HX-Redirect", "/")]).into_response()
}

async fn list_plans() -> Json<&'static [PricingPlan]> {
    Json(catalog::plans())
}

#[derive(Debug, Serialize)]
struct CheckoutSnapshot {
    id: SessionId,
    plan_id: Option<&'static str>,
    amount: Option<u32>,
    method: PaymentMethod,
    status: PaymentStatus,
    attempts: u32,
    phone_valid: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

async fn checkout_snapshot(
    Path(id): Path<SessionId>,
    State(state): State<AppState>,
) -> Result<Json<CheckoutSnapshot>, StatusCode> {
    let session = state.get_session(&id).await.ok_or(StatusCode::NOT_FOUND)?;
    let checkout = &session.state;
    Ok(Json(CheckoutSnapshot {
        id: session.id.clone(),
        plan_id: checkout.plan().map(|plan| plan.id),
        amount: checkout.plan().map(|plan| plan.price),
        method: checkout.method(),
        status: checkout.status(),
        attempts: checkout.attempts(),
        phone_valid: checkout.phone().is_valid(),
        created_at: session.created_at,
        updated_at: session.updated_at,
    }))
}

fn session_error(err: SessionError) -> (StatusCode, String) {
    let status = match &err {
        SessionError::NotFound => StatusCode::NOT_FOUND,
        SessionError::Checkout(CheckoutError::PaymentPending)
        | SessionError::Checkout(CheckoutError::InvalidTransition { .. }) => StatusCode::CONFLICT,
        SessionError::Checkout(CheckoutError::UnknownPaymentMethod(_)) => StatusCode::BAD_REQUEST,
        SessionError::Checkout(CheckoutError::PlanUnresolved)
        | SessionError::Checkout(CheckoutError::InvalidPhoneNumber) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    };
    (status, err.to_string())
}

async fn run_payment(state: AppState, id: SessionId, payment: PendingPayment) {
    let gateway = state.gateway().clone();
    let PendingPayment { request, cancel } = payment;

    // A panic inside the flow must still settle the session.
    let flow = tokio::spawn(async move { run_payment_flow(&gateway, request, cancel).await });
    let outcome = match flow.await {
        Ok(FlowResult::Completed(outcome)) => outcome,
        Ok(FlowResult::Cancelled) => {
            info!(session_id = %id, "payment cancelled with its checkout session");
            return;
        }
        Err(err) => {
            error!(session_id = %id, ?err, "payment task aborted");
            PaymentOutcome::Failed {
                reason: "internal error while processing payment".to_string(),
            }
        }
    };

    match &outcome {
        PaymentOutcome::Succeeded { transaction_id } => {
            info!(session_id = %id, transaction_id = %transaction_id, "payment approved")
        }
        PaymentOutcome::Failed { reason } => {
            warn!(session_id = %id, reason = %reason, "payment failed")
        }
    }

    if state.finish_payment(&id, outcome).await.is_none() {
        info!(session_id = %id, "checkout session closed before payment settled");
    }
}

async fn sweep_sessions(state: AppState) {
    let period = (state.session_ttl() / 4).max(Duration::from_secs(1));
    let mut ticker = tokio::time::interval(period);
    loop {
        ticker.tick().await;
        let removed = state.sweep_expired(Utc::now()).await;
        if removed > 0 {
            info!(removed, "expired idle checkout sessions");
        }
    }
}
