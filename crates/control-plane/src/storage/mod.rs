// Storage layer for the profiles control-plane
// Decision: Support both PostgreSQL (production) and in-memory (dev mode)
//
// Profiles are written only by social login; rooms and videos are owned by
// other services and read here.

pub mod backend;
pub mod memory;
pub mod models;
pub mod repositories;

pub use backend::StorageBackend;
pub use memory::InMemoryDatabase;
pub use models::*;
pub use repositories::Database;
