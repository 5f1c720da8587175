pub mod catalog;
pub mod checkout;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod phone;
pub mod server;
pub mod web;

pub use catalog::{find_plan, plans, resolve_plan, PricingPlan};
pub use checkout::{CheckoutState, PaymentMethod, PaymentOutcome, PaymentRequest, PaymentStatus};
pub use config::{GatewayConfig, ServerConfig};
pub use error::{CheckoutError, GatewayError, SessionError};
pub use gateway::{OutcomeSource, SimulatedGateway};
pub use phone::{format_phone_number, is_valid_phone_number, PhoneNumber};
