use thiserror::Error;

use crate::checkout::PaymentStatus;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("no pricing plan selected")]
    PlanUnresolved,
    #[error("please enter a valid phone number")]
    InvalidPhoneNumber,
    #[error("a payment is already being processed")]
    PaymentPending,
    #[error("cannot {action} while payment is {from}")]
    InvalidTransition {
        from: PaymentStatus,
        action: &'static str,
    },
    #[error("unknown payment method `{0}`")]
    UnknownPaymentMethod(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GatewayError {
    #[error("payment was declined by the simulated gateway")]
    Declined,
    #[error("simulated gateway fault: {0}")]
    Fault(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("checkout session not found")]
    NotFound,
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}
