use std::ops::Deref;

use sqlx::PgPool;

use crate::database::context::DbError;
use crate::database::models::Product;
use crate::database::repository::Repository;

/// Product repository: the generic contract plus the price-sorted listing.
pub struct ProductRepository {
    base: Repository<Product>,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            base: Repository::new(pool),
        }
    }

    /// All products ordered by ascending price, id as tie-break.
    pub async fn list_by_price(&self) -> Result<Vec<Product>, DbError> {
        let products = sqlx::query_as("SELECT * FROM product ORDER BY price, id")
            .fetch_all(self.base.pool())
            .await?;
        Ok(products)
    }
}

impl Deref for ProductRepository {
    type Target = Repository<Product>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}
