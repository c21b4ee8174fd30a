pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use manager::{Database, DatabaseError};
pub use memory::MemoryRepository;
pub use postgres::PostgresRepository;
pub use repository::{StoreFilter, UserRepository, VaultRepository, RECENT_STORES_LIMIT};
