pub mod client;
pub mod email_cta;
pub mod error;

pub use client::{client_card, contact_fields, status_badge, status_buttons};
pub use email_cta::email_cta_form;
pub use error::html_error_response;
