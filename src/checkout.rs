//! Checkout session state machine.
//!
//! ```text
//! none    --submit-->  pending
//! failed  --submit-->  pending
//! pending --resolve--> success | failed
//! failed  --reset-->   none
//! ```
//!
//! Every transition returns a fresh [`CheckoutState`]; the previous record is left
//! untouched so callers can swap it in atomically.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::PricingPlan;
use crate::error::CheckoutError;
use crate::phone::PhoneNumber;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "mpesa")]
    MobileMoney,
    #[serde(rename = "card")]
    Card,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 2] = [PaymentMethod::MobileMoney, PaymentMethod::Card];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::MobileMoney => "mpesa",
            PaymentMethod::Card => "card",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::MobileMoney => "M-Pesa",
            PaymentMethod::Card => "Card Payment",
        }
    }

    pub fn tagline(&self) -> &'static str {
        match self {
            PaymentMethod::MobileMoney => "Pay with M-Pesa",
            PaymentMethod::Card => "Visa, Mastercard",
        }
    }

    pub fn button_label(&self) -> &'static str {
        match self {
            PaymentMethod::MobileMoney => "Pay with M-Pesa",
            PaymentMethod::Card => "Pay with Card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = CheckoutError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mpesa" | "m-pesa" | "mobile-money" => Ok(PaymentMethod::MobileMoney),
            "card" => Ok(PaymentMethod::Card),
            other => Err(CheckoutError::UnknownPaymentMethod(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    None,
    Pending,
    Success,
    Failed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentStatus::None => "none",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        })
    }
}

/// Snapshot of the data handed to the gateway for one attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentRequest {
    pub plan_id: &'static str,
    pub plan_name: &'static str,
    pub amount: u32,
    pub method: PaymentMethod,
    /// Digits only. Present for mobile money.
    pub phone: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentOutcome {
    Succeeded { transaction_id: String },
    Failed { reason: String },
}

/// Shown on the success screen only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub plan_name: &'static str,
    pub amount: u32,
    pub transaction_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckoutState {
    plan: Option<&'static PricingPlan>,
    method: PaymentMethod,
    phone: PhoneNumber,
    status: PaymentStatus,
    attempts: u32,
    last_failure: Option<String>,
    confirmation: Option<Confirmation>,
}

impl CheckoutState {
    pub fn new(plan: Option<&'static PricingPlan>) -> Self {
        Self {
            plan,
            ..Self::default()
        }
    }

    pub fn plan(&self) -> Option<&'static PricingPlan> {
        self.plan
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.status == PaymentStatus::Pending
    }

    pub fn shows_retry(&self) -> bool {
        self.status == PaymentStatus::Failed
    }

    /// Inline hint: a mobile-money number has been typed but has the wrong length.
    pub fn phone_error(&self) -> bool {
        self.method == PaymentMethod::MobileMoney && !self.phone.is_empty() && !self.phone.is_valid()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.check_submit().is_ok()
    }

    pub fn with_method(&self, method: PaymentMethod) -> Result<Self, CheckoutError> {
        self.ensure_editable("change payment method")?;
        Ok(Self {
            method,
            ..self.clone()
        })
    }

    pub fn with_phone(&self, input: &str) -> Result<Self, CheckoutError> {
        self.ensure_editable("edit phone number")?;
        Ok(Self {
            phone: PhoneNumber::parse(input),
            ..self.clone()
        })
    }

    /// Moves to `pending` and captures the request for the gateway.
    ///
    /// On error the state is unchanged.
    pub fn submit(&self) -> Result<(Self, PaymentRequest), CheckoutError> {
        let plan = self.check_submit()?;
        let request = PaymentRequest {
            plan_id: plan.id,
            plan_name: plan.name,
            amount: plan.price,
            method: self.method,
            phone: match self.method {
                PaymentMethod::MobileMoney => Some(self.phone.digits().to_string()),
                PaymentMethod::Card => None,
            },
        };
        let next = Self {
            status: PaymentStatus::Pending,
            attempts: self.attempts + 1,
            last_failure: None,
            ..self.clone()
        };
        Ok((next, request))
    }

    pub fn resolve(&self, outcome: PaymentOutcome) -> Result<Self, CheckoutError> {
        if self.status != PaymentStatus::Pending {
            return Err(CheckoutError::InvalidTransition {
                from: self.status,
                action: "resolve a payment",
            });
        }
        let next = match outcome {
            PaymentOutcome::Succeeded { transaction_id } => Self {
                status: PaymentStatus::Success,
                confirmation: self.plan.map(|plan| Confirmation {
                    plan_name: plan.name,
                    amount: plan.price,
                    transaction_id,
                }),
                ..self.clone()
            },
            PaymentOutcome::Failed { reason } => Self {
                status: PaymentStatus::Failed,
                last_failure: Some(reason),
                ..self.clone()
            },
        };
        Ok(next)
    }

    /// "Try Again": clears a failed attempt.
    pub fn reset(&self) -> Result<Self, CheckoutError> {
        if self.status != PaymentStatus::Failed {
            return Err(CheckoutError::InvalidTransition {
                from: self.status,
                action: "reset",
            });
        }
        Ok(Self {
            status: PaymentStatus::None,
            last_failure: None,
            ..self.clone()
        })
    }

    fn check_submit(&self) -> Result<&'static PricingPlan, CheckoutError> {
        match self.status {
            PaymentStatus::Pending => return Err(CheckoutError::PaymentPending),
            PaymentStatus::Success => {
                return Err(CheckoutError::InvalidTransition {
                    from: self.status,
                    action: "submit",
                })
            }
            PaymentStatus::None | PaymentStatus::Failed => {}
        }
        let plan = self.plan.ok_or(CheckoutError::PlanUnresolved)?;
        if self.method == PaymentMethod::MobileMoney && !self.phone.is_valid() {
            return Err(CheckoutError::InvalidPhoneNumber);
        }
        Ok(plan)
    }

    fn ensure_editable(&self, action: &'static str) -> Result<(), CheckoutError> {
        if self.status == PaymentStatus::Success {
            return Err(CheckoutError::InvalidTransition {
                from: self.status,
                action,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_plan;

    fn silver() -> CheckoutState {
        CheckoutState::new(find_plan("silver"))
    }

    fn failed() -> CheckoutState {
        let (pending, _) = silver()
            .with_phone("0712345678")
            .and_then(|state| state.submit())
            .expect("submit");
        pending
            .resolve(PaymentOutcome::Failed {
                reason: "declined".into(),
            })
            .expect("resolve")
    }

    #[test]
    fn defaults_to_mobile_money_and_no_status() {
        let state = silver();
        assert_eq!(state.method(), PaymentMethod::MobileMoney);
        assert_eq!(state.status(), PaymentStatus::None);
        assert!(!state.can_submit());
    }

    #[test]
    fn invalid_phone_blocks_submission_without_changing_status() {
        let state = silver().with_phone("07123").expect("phone");
        assert!(state.phone_error());
        assert_eq!(state.submit().unwrap_err(), CheckoutError::InvalidPhoneNumber);
        assert_eq!(state.status(), PaymentStatus::None);

        let failed = failed().with_phone("12").expect("phone");
        assert_eq!(failed.submit().unwrap_err(), CheckoutError::InvalidPhoneNumber);
        assert_eq!(failed.status(), PaymentStatus::Failed);
    }

    #[test]
    fn unresolved_plan_blocks_submission() {
        let state = CheckoutState::new(None)
            .with_phone("0712345678")
            .expect("phone");
        assert_eq!(state.submit().unwrap_err(), CheckoutError::PlanUnresolved);
        assert_eq!(state.status(), PaymentStatus::None);
    }

    #[test]
    fn card_payments_do_not_need_a_phone() {
        let state = silver().with_method(PaymentMethod::Card).expect("method");
        let (pending, request) = state.submit().expect("submit");
        assert_eq!(pending.status(), PaymentStatus::Pending);
        assert_eq!(request.phone, None);
        assert_eq!(request.amount, 2000);
    }

    #[test]
    fn submit_captures_normalized_digits() {
        let (_, request) = silver()
            .with_phone("254 712-345-678")
            .and_then(|state| state.submit())
            .expect("submit");
        assert_eq!(request.phone.as_deref(), Some("254712345678"));
        assert_eq!(request.plan_id, "silver");
    }

    #[test]
    fn pending_refuses_second_submission() {
        let (pending, _) = silver()
            .with_phone("0712345678")
            .and_then(|state| state.submit())
            .expect("submit");
        assert!(!pending.can_submit());
        assert_eq!(pending.submit().unwrap_err(), CheckoutError::PaymentPending);
    }

    #[test]
    fn success_records_confirmation_and_is_terminal() {
        let (pending, _) = silver()
            .with_phone("0712345678")
            .and_then(|state| state.submit())
            .expect("submit");
        let done = pending
            .resolve(PaymentOutcome::Succeeded {
                transaction_id: "TXN1".into(),
            })
            .expect("resolve");
        assert_eq!(done.status(), PaymentStatus::Success);
        let confirmation = done.confirmation().expect("confirmation");
        assert_eq!(confirmation.plan_name, "Silver");
        assert_eq!(confirmation.amount, 2000);
        assert!(!done.shows_retry());
        assert!(done.reset().is_err());
        assert!(done.submit().is_err());
        assert!(done.with_method(PaymentMethod::Card).is_err());
    }

    #[test]
    fn failed_can_reset_or_resubmit() {
        let failed = failed();
        assert!(failed.shows_retry());
        assert_eq!(failed.last_failure(), Some("declined"));

        let reset = failed.reset().expect("reset");
        assert_eq!(reset.status(), PaymentStatus::None);
        assert_eq!(reset.last_failure(), None);

        let (again, _) = failed.submit().expect("resubmit");
        assert_eq!(again.status(), PaymentStatus::Pending);
        assert_eq!(again.attempts(), 2);
    }

    #[test]
    fn resolve_requires_pending() {
        let err = silver()
            .resolve(PaymentOutcome::Failed {
                reason: "late".into(),
            })
            .unwrap_err();
        assert_eq!(
            err,
            CheckoutError::InvalidTransition {
                from: PaymentStatus::None,
                action: "resolve a payment",
            }
        );
    }

    #[test]
    fn parses_method_names() {
        assert_eq!("mpesa".parse::<PaymentMethod>(), Ok(PaymentMethod::MobileMoney));
        assert_eq!(" Card ".parse::<PaymentMethod>(), Ok(PaymentMethod::Card));
        assert!(matches!(
            "paypal".parse::<PaymentMethod>(),
            Err(CheckoutError::UnknownPaymentMethod(_))
        ));
    }
}
