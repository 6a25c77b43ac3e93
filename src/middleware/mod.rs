pub mod auth;

pub use auth::{current_user_id, jwt_auth_middleware, AuthUser};
