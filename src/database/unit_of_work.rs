use sqlx::PgPool;

use crate::database::category_repository::CategoryRepository;
use crate::database::context::DbError;
use crate::database::product_repository::ProductRepository;

/// Request-scoped aggregate owning both catalog repositories over one shared
/// pool. Constructed explicitly at the start of each request; `commit`
/// persists every staged change as a single transaction.
pub struct UnitOfWork {
    pool: PgPool,
    categories: CategoryRepository,
    products: ProductRepository,
}

impl UnitOfWork {
    pub fn new(pool: PgPool) -> Self {
        Self {
            categories: CategoryRepository::new(pool.clone()),
            products: ProductRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn categories(&self) -> &CategoryRepository {
        &self.categories
    }

    pub fn products(&self) -> &ProductRepository {
        &self.products
    }

    /// Persist all staged changes atomically. Any store rejection rolls the
    /// whole transaction back and leaves no change applied.
    pub async fn commit(&self) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        // Categories first so products staged in the same scope can reference
        // a category inserted by this commit.
        self.categories.apply(&mut *tx).await?;
        self.products.apply(&mut *tx).await?;

        tx.commit().await?;
        Ok(())
    }
}
