// handlers/public/auth/mod.rs - Account creation and token acquisition

pub mod login; // POST /login - verify credentials and issue a bearer token
pub mod register; // POST /register - create a new account
pub mod utils;

pub use login::login_post;
pub use register::register_post;
