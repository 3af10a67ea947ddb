use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection};

use crate::database::repository::CatalogEntity;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    pub stock: f64,
    pub register_date: DateTime<Utc>,
    pub category_id: i32,
}

#[async_trait]
impl CatalogEntity for Product {
    const TABLE: &'static str = "product";

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    async fn insert(&self, conn: &mut PgConnection) -> sqlx::Result<i32> {
        let (id,): (i32,) = sqlx::query_as(
            "INSERT INTO product (name, description, price, image_url, stock, register_date, category_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(&self.name)
        .bind(&self.description)
        .bind(self.price)
        .bind(&self.image_url)
        .bind(self.stock)
        .bind(self.register_date)
        .bind(self.category_id)
        .fetch_one(conn)
        .await?;

        Ok(id)
    }

    async fn persist_update(&self, conn: &mut PgConnection) -> sqlx::Result<()> {
        let result = sqlx::query(
            "UPDATE product SET name = $1, description = $2, price = $3, image_url = $4, \
             stock = $5, register_date = $6, category_id = $7 WHERE id = $8",
        )
        .bind(&self.name)
        .bind(&self.description)
        .bind(self.price)
        .bind(&self.image_url)
        .bind(self.stock)
        .bind(self.register_date)
        .bind(self.category_id)
        .bind(self.id)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }

    async fn persist_delete(id: i32, conn: &mut PgConnection) -> sqlx::Result<()> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }
}
