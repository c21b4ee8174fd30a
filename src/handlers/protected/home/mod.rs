// handlers/protected/home/mod.rs - Vault endpoints under /api/v1/home
//
// Every query is scoped to the principal attached by Authenticate.
pub mod category;
pub mod container;
pub mod store;

pub use category::{categories_get, category_get, category_post};
pub use container::{container_get, container_post};
pub use store::{store_get, store_post, stores_post};
