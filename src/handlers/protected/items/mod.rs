// handlers/protected/items/mod.rs - Per-user item CRUD

pub mod collection_get; // GET /Items
pub mod record_delete; // DELETE /Item/:id
pub mod record_get; // GET /Item/:id
pub mod record_post; // POST /Item
pub mod record_put; // PUT /Item/:id?isComplete=

pub use collection_get::collection_get;
pub use record_delete::record_delete;
pub use record_get::record_get;
pub use record_post::record_post;
pub use record_put::record_put;
