use std::collections::HashMap;
use std::ops::Deref;

use sqlx::PgPool;

use crate::database::context::DbError;
use crate::database::models::{Category, Product};
use crate::database::repository::Repository;

/// Category repository: the generic contract plus the category-specific reads.
pub struct CategoryRepository {
    base: Repository<Category>,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            base: Repository::new(pool),
        }
    }

    /// All categories, each paired with its first `limit` products by
    /// product id. Categories without products carry an empty list.
    pub async fn with_products(
        &self,
        limit: i64,
    ) -> Result<Vec<(Category, Vec<Product>)>, DbError> {
        let categories = self.base.get().await?;

        let products: Vec<Product> = sqlx::query_as(
            "SELECT id, name, description, price, image_url, stock, register_date, category_id \
             FROM (SELECT *, ROW_NUMBER() OVER (PARTITION BY category_id ORDER BY id) AS rn \
                   FROM product) ranked \
             WHERE rn <= $1 ORDER BY id",
        )
        .bind(limit)
        .fetch_all(self.base.pool())
        .await?;

        let mut by_category: HashMap<i32, Vec<Product>> = HashMap::new();
        for product in products {
            by_category.entry(product.category_id).or_default().push(product);
        }

        Ok(categories
            .into_iter()
            .map(|category| {
                let products = by_category.remove(&category.id).unwrap_or_default();
                (category, products)
            })
            .collect())
    }
}

impl Deref for CategoryRepository {
    type Target = Repository<Category>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}
