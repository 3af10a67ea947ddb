pub mod category_repository;
pub mod context;
pub mod models;
pub mod product_repository;
pub mod repository;
pub mod unit_of_work;

pub use context::DbError;
pub use repository::{CatalogEntity, Repository, Staged};
pub use unit_of_work::UnitOfWork;
