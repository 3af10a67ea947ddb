use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use sqlx::{postgres::PgRow, FromRow, PgConnection, PgPool};

use crate::database::context::DbError;
use crate::pagination::{PagedList, PageParams};

/// Persistence seam implemented once per catalog entity: the table name, id
/// accessors, and the statements a staged change executes at commit time.
#[async_trait]
pub trait CatalogEntity:
    Clone + Send + Sync + Unpin + for<'r> FromRow<'r, PgRow> + 'static
{
    const TABLE: &'static str;

    fn id(&self) -> i32;
    fn set_id(&mut self, id: i32);

    /// Insert this entity and return its generated id.
    async fn insert(&self, conn: &mut PgConnection) -> sqlx::Result<i32>;

    /// Full-replace update by primary key. Fails with `RowNotFound` when the
    /// row no longer exists, which aborts the surrounding commit.
    async fn persist_update(&self, conn: &mut PgConnection) -> sqlx::Result<()>;

    async fn persist_delete(id: i32, conn: &mut PgConnection) -> sqlx::Result<()>;
}

/// Handle to an entity staged for insertion. The generated id is written back
/// through this handle when the unit of work commits.
#[derive(Debug)]
pub struct Staged<T>(Arc<Mutex<T>>);

impl<T> Clone for Staged<T> {
    fn clone(&self) -> Self {
        Staged(Arc::clone(&self.0))
    }
}

impl<T: Clone> Staged<T> {
    fn new(entity: T) -> Self {
        Staged(Arc::new(Mutex::new(entity)))
    }

    /// Snapshot of the staged entity. After a successful commit this carries
    /// the store-assigned id.
    pub fn entity(&self) -> T {
        lock_unpoisoned(&self.0).clone()
    }
}

enum Change<T> {
    Insert(Staged<T>),
    Update(T),
    Delete(i32),
}

/// Generic repository over one catalog entity type.
///
/// Reads run directly against the pool and never join the write-back
/// transaction. Writes are staged in memory and only touch the store when the
/// owning unit of work commits; staging itself cannot fail.
pub struct Repository<T: CatalogEntity> {
    pool: PgPool,
    staged: Mutex<Vec<Change<T>>>,
}

impl<T: CatalogEntity> Repository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            staged: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// All rows ordered by primary key.
    pub async fn get(&self) -> Result<Vec<T>, DbError> {
        let sql = format!("SELECT * FROM {} ORDER BY id", T::TABLE);
        let rows = sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<T>, DbError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", T::TABLE);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// One page of rows ordered by primary key, plus total-count metadata.
    /// A page past the end comes back empty without error.
    pub async fn paged(&self, params: &PageParams) -> Result<PagedList<T>, DbError> {
        let count_sql = format!("SELECT COUNT(*) FROM {}", T::TABLE);
        let (total_count,): (i64,) = sqlx::query_as(&count_sql).fetch_one(&self.pool).await?;

        let page_sql = format!("SELECT * FROM {} ORDER BY id LIMIT $1 OFFSET $2", T::TABLE);
        let items = sqlx::query_as::<_, T>(&page_sql)
            .bind(i64::from(params.page_size()))
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(PagedList::new(
            items,
            total_count,
            params.page_number,
            params.page_size(),
        ))
    }

    /// Stage an insert. The returned handle yields the generated id once the
    /// unit of work has committed.
    pub fn add(&self, entity: T) -> Staged<T> {
        let staged = Staged::new(entity);
        self.changes().push(Change::Insert(staged.clone()));
        staged
    }

    /// Stage a full-replace update keyed by the entity's id.
    pub fn update(&self, entity: T) {
        self.changes().push(Change::Update(entity));
    }

    /// Stage a delete keyed by the entity's id.
    pub fn delete(&self, entity: T) {
        self.changes().push(Change::Delete(entity.id()));
    }

    pub fn pending_changes(&self) -> usize {
        self.changes().len()
    }

    /// Apply all staged changes on the commit transaction, in staging order.
    pub(crate) async fn apply(&self, conn: &mut PgConnection) -> sqlx::Result<()> {
        let changes = std::mem::take(&mut *self.changes());

        for change in changes {
            match change {
                Change::Insert(staged) => {
                    let entity = staged.entity();
                    let id = entity.insert(conn).await?;
                    lock_unpoisoned(&staged.0).set_id(id);
                }
                Change::Update(entity) => entity.persist_update(conn).await?,
                Change::Delete(id) => T::persist_delete(id, conn).await?,
            }
        }

        Ok(())
    }

    fn changes(&self) -> MutexGuard<'_, Vec<Change<T>>> {
        lock_unpoisoned(&self.staged)
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Category;
    use sqlx::postgres::PgPoolOptions;

    fn lazy_pool() -> PgPool {
        // Never connects; staging is pure in-memory bookkeeping
        PgPoolOptions::new()
            .connect_lazy("postgres://localhost/catalog_test")
            .expect("lazy pool")
    }

    fn sample_category() -> Category {
        Category {
            id: 0,
            name: "Drinks".to_string(),
            image_url: "drinks.jpg".to_string(),
        }
    }

    // connect_lazy spawns pool bookkeeping, so a runtime is still required
    #[tokio::test]
    async fn staging_accumulates_without_touching_the_store() {
        let repo: Repository<Category> = Repository::new(lazy_pool());
        assert_eq!(repo.pending_changes(), 0);

        let staged = repo.add(sample_category());
        repo.update(Category { id: 3, ..sample_category() });
        repo.delete(Category { id: 4, ..sample_category() });

        assert_eq!(repo.pending_changes(), 3);
        // Insert ids are not assigned until commit
        assert_eq!(staged.entity().id, 0);
    }

    #[test]
    fn staged_handle_tracks_writebacks() {
        let staged = Staged::new(sample_category());
        lock_unpoisoned(&staged.0).set_id(42);
        assert_eq!(staged.entity().id, 42);
    }
}
