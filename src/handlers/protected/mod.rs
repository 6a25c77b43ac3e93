// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Security Level: JWT authentication required
// Middleware: jwt_auth_middleware injects AuthUser before any handler runs.
//
// Every handler here resolves the caller's id with AuthUser::require_user_id
// and passes it to the repository as the owner. Rows owned by someone else
// are reported exactly like rows that do not exist.

pub mod items;
