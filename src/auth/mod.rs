//! Admin authentication module
//!
//! Session store, cookie helpers, the authentication gate and the login page.

pub mod cookie;
pub mod gate;
pub mod login_page;
pub mod session;

pub use gate::{password_from_form, AdminGate, LoginOutcome};
pub use login_page::render_login_page;
pub use session::SessionStore;
