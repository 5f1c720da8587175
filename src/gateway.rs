//! Simulated mobile-money/card gateway.
//!
//! Nothing leaves the process: a charge waits out a fixed latency and then asks an
//! [`OutcomeSource`] for a uniform draw. Draws at or below the success probability
//! approve the payment.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tokio::sync::oneshot;
use tokio::time::Duration;
use tracing::debug;

use crate::checkout::{PaymentOutcome, PaymentRequest};
use crate::error::GatewayError;

pub const SIMULATED_LATENCY: Duration = Duration::from_secs(3);
pub const SUCCESS_PROBABILITY: f64 = 0.8;

/// Supplies the random draw that decides a simulated charge.
pub trait OutcomeSource: Send + Sync {
    /// A value in `[0, 1)`. Anything else is treated as a gateway fault.
    fn draw(&self) -> f64;
}

#[derive(Debug, Default)]
pub struct ThreadRngSource;

impl OutcomeSource for ThreadRngSource {
    fn draw(&self) -> f64 {
        rand::thread_rng().gen()
    }
}

#[derive(Debug)]
pub struct SeededSource {
    rng: Mutex<StdRng>,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl OutcomeSource for SeededSource {
    fn draw(&self) -> f64 {
        // A poisoned lock surfaces as a fault rather than a panic.
        self.rng.lock().map(|mut rng| rng.gen()).unwrap_or(f64::NAN)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedSource(pub f64);

impl OutcomeSource for FixedSource {
    fn draw(&self) -> f64 {
        self.0
    }
}

/// Replays a list of draws in order, repeating the last one once exhausted.
#[derive(Debug)]
pub struct SequenceSource {
    draws: Mutex<VecDeque<f64>>,
}

impl SequenceSource {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: Mutex::new(draws.into_iter().collect()),
        }
    }
}

impl OutcomeSource for SequenceSource {
    fn draw(&self) -> f64 {
        let Ok(mut draws) = self.draws.lock() else {
            return f64::NAN;
        };
        match draws.len() {
            0 => f64::NAN,
            1 => draws[0],
            _ => draws.pop_front().unwrap_or(f64::NAN),
        }
    }
}

#[derive(Clone)]
pub struct SimulatedGateway {
    latency: Duration,
    success_probability: f64,
    source: Arc<dyn OutcomeSource>,
}

impl SimulatedGateway {
    pub fn new(source: Arc<dyn OutcomeSource>) -> Self {
        Self {
            latency: SIMULATED_LATENCY,
            success_probability: SUCCESS_PROBABILITY,
            source,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Clamped to `[0, 1]`. A NaN probability keeps the default.
    pub fn with_success_probability(mut self, probability: f64) -> Self {
        self.success_probability = if probability.is_nan() {
            SUCCESS_PROBABILITY
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn success_probability(&self) -> f64 {
        self.success_probability
    }

    /// Runs one simulated charge and returns the fabricated transaction id.
    pub async fn charge(&self, request: &PaymentRequest) -> Result<String, GatewayError> {
        tokio::time::sleep(self.latency).await;

        debug!(
            plan = request.plan_id,
            amount = request.amount,
            method = %request.method,
            phone = request.phone.as_deref().unwrap_or("-"),
            "processing simulated payment"
        );

        let draw = self.source.draw();
        if !(0.0..1.0).contains(&draw) {
            return Err(GatewayError::Fault(format!(
                "outcome source returned {draw}"
            )));
        }
        if draw <= self.success_probability {
            Ok(transaction_id())
        } else {
            Err(GatewayError::Declined)
        }
    }
}

impl std::fmt::Debug for SimulatedGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedGateway")
            .field("latency", &self.latency)
            .field("success_probability", &self.success_probability)
            .finish_non_exhaustive()
    }
}

/// Display-only reference, `TXN<unix millis>`.
pub fn transaction_id() -> String {
    format!("TXN{}", Utc::now().timestamp_millis())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowResult {
    Completed(PaymentOutcome),
    Cancelled,
}

/// Charges `request`, giving up as soon as `cancel` fires or its sender is dropped.
pub async fn run_payment_flow(
    gateway: &SimulatedGateway,
    request: PaymentRequest,
    cancel: oneshot::Receiver<()>,
) -> FlowResult {
    tokio::select! {
        result = gateway.charge(&request) => FlowResult::Completed(match result {
            Ok(transaction_id) => PaymentOutcome::Succeeded { transaction_id },
            Err(err) => PaymentOutcome::Failed { reason: err.to_string() },
        }),
        _ = cancel => FlowResult::Cancelled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::PaymentMethod;
    use tokio::time::Instant;

    fn request() -> PaymentRequest {
        PaymentRequest {
            plan_id: "silver",
            plan_name: "Silver",
            amount: 2000,
            method: PaymentMethod::MobileMoney,
            phone: Some("0712345678".into()),
        }
    }

    fn gateway(draw: f64) -> SimulatedGateway {
        SimulatedGateway::new(Arc::new(FixedSource(draw)))
    }

    #[tokio::test(start_paused = true)]
    async fn approves_draws_up_to_the_threshold() {
        let start = Instant::now();
        let id = gateway(0.8).charge(&request()).await.expect("approved");
        assert!(id.starts_with("TXN"));
        assert!(start.elapsed() >= SIMULATED_LATENCY);
        assert!(gateway(0.0).charge(&request()).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn declines_draws_above_the_threshold() {
        assert_eq!(
            gateway(0.81).charge(&request()).await,
            Err(GatewayError::Declined)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_range_draws_are_faults() {
        for draw in [f64::NAN, -0.1, 1.0, 1.5] {
            let result = gateway(draw).charge(&request()).await;
            assert!(matches!(result, Err(GatewayError::Fault(_))), "{draw}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fault_resolves_flow_to_failure() {
        let (_tx, rx) = oneshot::channel();
        let result = run_payment_flow(&gateway(f64::NAN), request(), rx).await;
        assert!(matches!(
            result,
            FlowResult::Completed(PaymentOutcome::Failed { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_sender_cancels_the_flow() {
        let (tx, rx) = oneshot::channel::<()>();
        let flow =
            tokio::spawn(async move { run_payment_flow(&gateway(0.1), request(), rx).await });
        tokio::time::sleep(Duration::from_secs(1)).await;
        drop(tx);
        assert_eq!(flow.await.expect("join"), FlowResult::Cancelled);
    }

    #[test]
    fn seeded_sources_are_reproducible() {
        let a = SeededSource::new(7);
        let b = SeededSource::new(7);
        for _ in 0..5 {
            let draw = a.draw();
            assert!((0.0..1.0).contains(&draw));
            assert_eq!(draw, b.draw());
        }
    }

    #[test]
    fn sequence_source_repeats_last_draw() {
        let source = SequenceSource::new([0.9, 0.1]);
        assert_eq!(source.draw(), 0.9);
        assert_eq!(source.draw(), 0.1);
        assert_eq!(source.draw(), 0.1);
        assert!(SequenceSource::new([]).draw().is_nan());
    }

    #[test]
    fn probability_is_clamped() {
        let gateway = gateway(0.5).with_success_probability(4.0);
        assert_eq!(gateway.success_probability(), 1.0);
        let gateway = gateway.with_success_probability(-1.0);
        assert_eq!(gateway.success_probability(), 0.0);
    }

    #[test]
    fn nan_probability_keeps_the_default() {
        let gateway = gateway(0.5).with_success_probability(f64::NAN);
        assert_eq!(gateway.success_probability(), SUCCESS_PROBABILITY);
    }
}
