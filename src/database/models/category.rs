use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection};

use crate::database::repository::CatalogEntity;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub image_url: String,
}

#[async_trait]
impl CatalogEntity for Category {
    const TABLE: &'static str = "category";

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    async fn insert(&self, conn: &mut PgConnection) -> sqlx::Result<i32> {
        let (id,): (i32,) = sqlx::query_as(
            "INSERT INTO category (name, image_url) VALUES ($1, $2) RETURNING id",
        )
        .bind(&self.name)
        .bind(&self.image_url)
        .fetch_one(conn)
        .await?;

        Ok(id)
    }

    async fn persist_update(&self, conn: &mut PgConnection) -> sqlx::Result<()> {
        let result = sqlx::query("UPDATE category SET name = $1, image_url = $2 WHERE id = $3")
            .bind(&self.name)
            .bind(&self.image_url)
            .bind(self.id)
            .execute(conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }

    async fn persist_delete(id: i32, conn: &mut PgConnection) -> sqlx::Result<()> {
        let result = sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }
}
