// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Security Level: None
// Middleware: None. Handlers validate every input themselves.

pub mod auth;

pub use auth::*;
