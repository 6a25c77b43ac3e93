// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token required)
pub mod public; // Tier 1: registration and token acquisition
pub mod protected; // Tier 2: per-user item operations
