pub mod landing;
pub mod layout;
pub mod state;
pub mod views;

pub use landing::{render_landing_page, LandingPageContext};
pub use state::{AppState, CheckoutSession, PendingPayment, SessionId};
pub use views::{
    render_checkout_content, render_checkout_page, render_confirmation, render_payment_panel,
};
