use v_htmlescape::escape;

use super::layout::render_document;
use super::state::CheckoutSession;
use crate::catalog::PricingPlan;
use crate::checkout::{PaymentMethod, PaymentStatus};

const CHECKOUT_STYLES: &str = r#"
        main {
            width: min(1000px, 94vw);
            margin: 0 auto;
            padding: 3rem 0;
        }
        .checkout-head { text-align: center; margin-bottom: 3rem; }
        .checkout-head h1 { font-size: clamp(2.25rem, 5vw, 3rem); margin: 0 0 1rem; }
        .checkout-head p { font-size: 1.25rem; color: var(--muted); }
        .back-link {
            background: none; border: none; cursor: pointer; font-size: 1rem;
            color: var(--muted); margin-bottom: 1.5rem;
        }
        .back-link:hover { color: #ca8a04; }
        .checkout-grid { display: grid; gap: 2rem; grid-template-columns: 1fr 2fr; }
        @media (max-width: 900px) { .checkout-grid { grid-template-columns: 1fr; } }
        .summary, #payment-panel { padding: 2rem; }
        .summary { align-self: start; position: sticky; top: 2rem; }
        .summary-plan { border-bottom: 1px solid #e5e7eb; padding-bottom: 1rem; margin-bottom: 1rem; }
        .plan-badge { width: 3rem; height: 3rem; border-radius: 10px; margin-bottom: 0.75rem; }
        .row { display: flex; justify-content: space-between; margin: 0.5rem 0; }
        .row span:first-child { color: var(--muted); }
        .row strong.total { color: #ca8a04; font-size: 1.15rem; }
        .pill { background: #fef9c3; color: #854d0e; font-size: 0.75rem; padding: 0.2rem 0.6rem; border-radius: 999px; }
        .secure-note { margin-top: 1.5rem; padding: 1rem; border-radius: 12px; background: #fefce8; border: 1px solid var(--line); color: #a16207; font-size: 0.9rem; }
        .methods { display: grid; gap: 1rem; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); margin-bottom: 2rem; }
        .method {
            display: flex; gap: 0.75rem; align-items: center; text-align: left;
            padding: 1rem; border-radius: 12px; border: 2px solid #e5e7eb; background: #fff; cursor: pointer;
        }
        .method.selected { border-color: var(--yellow); background: #fefce8; }
        .method-icon { width: 3rem; height: 3rem; border-radius: 10px; color: #fff; display: flex; align-items: center; justify-content: center; font-size: 1.4rem; }
        .method-icon.mpesa { background: #16a34a; }
        .method-icon.card { background: #2563eb; }
        .method small { display: block; color: var(--muted); }
        label.field { display: block; font-size: 0.9rem; font-weight: 500; color: #374151; margin-bottom: 0.5rem; }
        input[type="tel"], input[type="text"] {
            width: 100%; padding: 0.8rem 1rem; border-radius: 10px; border: 1px solid #d1d5db; font-size: 1rem;
        }
        input:focus { outline: none; border-color: transparent; box-shadow: 0 0 0 3px rgba(234, 179, 8, 0.45); }
        .field-error { color: #ef4444; font-size: 0.85rem; margin: 0.4rem 0 0; }
        .field-grid { display: grid; gap: 1rem; grid-template-columns: 1fr 1fr; }
        .stack > * + * { margin-top: 1.5rem; }
        .how-it-works { background: #eff6ff; border: 1px solid #bfdbfe; border-radius: 12px; padding: 1rem; color: #1e40af; font-size: 0.9rem; }
        .how-it-works ol { margin: 0.5rem 0 0; padding-left: 1.2rem; }
        .banner-failed { margin-top: 1.5rem; padding: 1rem; border-radius: 12px; background: #fef2f2; border: 1px solid #fecaca; color: #991b1b; }
        .banner-failed button { background: none; border: none; color: #dc2626; text-decoration: underline; cursor: pointer; padding: 0; margin-top: 0.5rem; }
        .pay-button { width: 100%; margin-top: 2rem; border-radius: 14px; padding: 1.1rem; }
        .pay-button[disabled] { background: #d1d5db; color: #6b7280; cursor: not-allowed; transform: none; }
        .spinner {
            width: 1.1rem; height: 1.1rem; border-radius: 50%;
            border: 3px solid rgba(255, 255, 255, 0.5); border-top-color: #fff;
            animation: spin 0.8s linear infinite;
        }
        @keyframes spin { to { transform: rotate(360deg); } }
        .terms { text-align: center; color: var(--muted); font-size: 0.9rem; margin-top: 1.5rem; }
        .terms a { color: #ca8a04; }
        .confirmation { max-width: 28rem; margin: 4rem auto; padding: 2rem; text-align: center; }
        .confirmation .check {
            width: 4rem; height: 4rem; margin: 0 auto 1.5rem; border-radius: 50%;
            background: #22c55e; color: #fff; display: flex; align-items: center; justify-content: center; font-size: 2rem;
        }
        .receipt { background: #f9fafb; border-radius: 10px; padding: 1rem; margin: 1.5rem 0; }
"#;

pub fn render_checkout_page(session: &CheckoutSession) -> String {
    let body = format!(
        r#"<main id="checkout">{content}</main>"#,
        content = render_checkout_content(session)
    );
    render_document("Complete Your Subscription | Tawala", CHECKOUT_STYLES, &body)
}

/// Inner content of `#checkout`: the confirmation once paid, otherwise the form.
pub fn render_checkout_content(session: &CheckoutSession) -> String {
    if session.state.status() == PaymentStatus::Success {
        return render_confirmation(session);
    }

    let plan_name = session.state.plan().map(|plan| plan.name).unwrap_or_default();
    format!(
        r#"<header class="checkout-head">
    <button class="back-link" hx-delete="/payment/{id}">&larr; Back to Plans</button>
    <h1 class="gradient-text">Complete Your Subscription</h1>
    <p>Subscribe to {plan_name} plan and start your journey with Tawala</p>
</header>
<div class="checkout-grid">
    {summary}
    {panel}
</div>"#,
        id = session.id,
        plan_name = escape(plan_name),
        summary = render_order_summary(session.state.plan()),
        panel = render_payment_panel(session),
    )
}

fn render_order_summary(plan: Option<&PricingPlan>) -> String {
    let amount = plan.map(PricingPlan::amount_label).unwrap_or_default();
    let plan_block = match plan {
        Some(plan) => format!(
            r#"<div class="summary-plan">
            <div class="plan-badge" style="background: linear-gradient(90deg, {from}, {to});"></div>
            <div class="row"><div><strong>{name}</strong><br><small>{description}</small></div>{popular}</div>
            <div style="text-align:right;"><strong style="font-size:1.5rem;">{amount}</strong><small>{period}</small></div>
        </div>"#,
            from = plan.color.0,
            to = plan.color.1,
            name = escape(plan.name),
            description = escape(plan.description),
            popular = if plan.popular {
                r#"<span class="pill">Popular</span>"#
            } else {
                ""
            },
            amount = escape(&amount),
            period = escape(plan.period),
        ),
        None => String::new(),
    };

    format!(
        r#"<aside class="glass summary">
        <h3>Order Summary</h3>
        {plan_block}
        <div class="row"><span>Subtotal</span><strong>{amount}</strong></div>
        <div class="row"><span>Tax</span><strong>KES 0</strong></div>
        <div class="row" style="border-top:1px solid #e5e7eb;padding-top:0.75rem;"><strong>Total</strong><strong class="total">{amount}</strong></div>
        <div class="secure-note"><strong>&#128737; Secure Payment</strong><br>Your payment is protected by industry-standard encryption</div>
    </aside>"#,
        plan_block = plan_block,
        amount = escape(&amount),
    )
}

/// The `#payment-panel` fragment swapped by every checkout interaction.
pub fn render_payment_panel(session: &CheckoutSession) -> String {
    let state = &session.state;
    let id = &session.id;
    let polling = if state.is_pending() {
        format!(
            r#" hx-get="/payment/{id}/status" hx-trigger="every 1s" hx-swap="outerHTML""#
        )
    } else {
        String::new()
    };
    let form = match state.method() {
        PaymentMethod::MobileMoney => render_mpesa_fields(session),
        PaymentMethod::Card => render_card_fields(),
    };
    let banner = if state.shows_retry() {
        format!(
            r##"<div class="banner-failed" role="alert">
            <strong>Payment Failed</strong>
            <p>There was an issue processing your payment. Please try again.</p>
            <button hx-post="/payment/{id}/reset" hx-target="#payment-panel" hx-swap="outerHTML">Try Again</button>
        </div>"##
        )
    } else {
        String::new()
    };

    format!(
        r##"<section id="payment-panel" class="glass" data-status="{status}"{polling}>
        <h3>Payment Information</h3>
        <h4>Select Payment Method</h4>
        <div class="methods">{methods}</div>
        {form}
        {banner}
        {button}
        <p class="terms">By clicking &quot;Pay&quot;, you agree to our <a href="#">Terms of Service</a> and <a href="#">Privacy Policy</a></p>
    </section>"##,
        status = state.status(),
        polling = polling,
        methods = render_method_cards(session),
        form = form,
        banner = banner,
        button = render_pay_button(session),
    )
}

fn render_method_cards(session: &CheckoutSession) -> String {
    PaymentMethod::ALL
        .iter()
        .map(|method| {
            let selected = if *method == session.state.method() {
                " selected"
            } else {
                ""
            };
            let icon = match method {
                PaymentMethod::MobileMoney => "&#128241;",
                PaymentMethod::Card => "&#128179;",
            };
            format!(
                r##"<button class="method{selected}" name="method" value="{value}" hx-vals='{{"method":"{value}"}}' hx-post="/payment/{id}/method" hx-target="#payment-panel" hx-swap="outerHTML">
                <span class="method-icon {value}">{icon}</span>
                <span><strong>{label}</strong><small>{tagline}</small></span>
            </button>"##,
                selected = selected,
                value = method.as_str(),
                id = session.id,
                icon = icon,
                label = method.label(),
                tagline = method.tagline(),
            )
        })
        .collect()
}

fn render_mpesa_fields(session: &CheckoutSession) -> String {
    let phone = session.state.phone();
    let error = if session.state.phone_error() {
        r#"<p class="field-error">&#9888; Please enter a valid phone number</p>"#
    } else {
        ""
    };
    format!(
        r##"<div class="stack">
            <div>
                <label class="field" for="phone">M-Pesa Phone Number</label>
                <input id="phone" type="tel" name="phone" value="{value}" placeholder="254 712 345 678" maxlength="15" autocomplete="tel"
                       hx-post="/payment/{id}/phone" hx-trigger="keyup changed delay:400ms, change" hx-target="#payment-panel" hx-swap="outerHTML">
                {error}
            </div>
            <div class="how-it-works">
                <strong>How it works:</strong>
                <ol>
                    <li>Click &quot;Pay with M-Pesa&quot; button</li>
                    <li>You&#39;ll receive an M-Pesa prompt on your phone</li>
                    <li>Enter your M-Pesa PIN to complete payment</li>
                    <li>Your subscription will be activated instantly</li>
                </ol>
            </div>
        </div>"##,
        value = escape(&phone.display()),
        id = session.id,
        error = error,
    )
}

fn render_card_fields() -> String {
    String::from(
        r#"<div class="stack">
            <div><label class="field">Card Number</label><input type="text" placeholder="1234 5678 9012 3456" autocomplete="off"></div>
            <div class="field-grid">
                <div><label class="field">Expiry Date</label><input type="text" placeholder="MM/YY" autocomplete="off"></div>
                <div><label class="field">CVV</label><input type="text" placeholder="123" autocomplete="off"></div>
            </div>
            <div><label class="field">Cardholder Name</label><input type="text" placeholder="John Doe" autocomplete="off"></div>
        </div>"#,
    )
}

fn render_pay_button(session: &CheckoutSession) -> String {
    let state = &session.state;
    if state.is_pending() {
        return String::from(
            r#"<button class="btn btn-primary pay-button" disabled><span class="spinner"></span><span>Processing Payment...</span></button>"#,
        );
    }
    let disabled = if state.can_submit() { "" } else { " disabled" };
    let amount = state.plan().map(PricingPlan::amount_label).unwrap_or_default();
    format!(
        r##"<button class="btn btn-primary pay-button" hx-post="/payment/{id}/submit" hx-target="#payment-panel" hx-swap="outerHTML"{disabled}><span>{label}</span> <strong>{amount}</strong></button>"##,
        id = session.id,
        disabled = disabled,
        label = state.method().button_label(),
        amount = escape(&amount),
    )
}

pub fn render_confirmation(session: &CheckoutSession) -> String {
    let Some(confirmation) = session.state.confirmation() else {
        return String::new();
    };
    let amount = format!("{} {}", crate::catalog::CURRENCY, confirmation.amount);
    format!(
        r#"<div class="glass confirmation" id="confirmation">
    <div class="check">&#10003;</div>
    <h2>Payment Successful!</h2>
    <p>Your {name} subscription has been activated successfully.</p>
    <div class="receipt">
        <div class="row"><span>Plan:</span><strong>{name}</strong></div>
        <div class="row"><span>Amount:</span><strong>{amount}</strong></div>
        <div class="row"><span>Reference:</span><strong>{reference}</strong></div>
    </div>
    <button class="btn btn-primary" style="width:100%;border-radius:14px;" hx-delete="/payment/{id}">Go to Dashboard</button>
</div>"#,
        name = escape(confirmation.plan_name),
        amount = escape(&amount),
        reference = escape(&confirmation.transaction_id),
        id = session.id,
    )
}
