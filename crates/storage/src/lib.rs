#![forbid(unsafe_code)]

pub mod page;
pub mod repository;
pub mod seed;

pub use page::{ListQuery, Page};
pub use repository::{InMemoryRepository, Storage, StorageError};
pub use seed::SeedData;
