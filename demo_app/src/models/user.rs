//! `users` table access.

use front_controller::{AppError, Database, Model, Row};

const TABLE: &str = "users";

pub struct User<'db> {
    db: &'db Database,
}

impl<'db> Model<'db> for User<'db> {
    fn with_db(db: &'db Database) -> Self {
        User { db }
    }
}

impl<'db> User<'db> {
    pub async fn first(&self) -> Result<Option<Row>, AppError> {
        self.db.table(TABLE)?.order_by("id", "ASC")?.first().await
    }

    pub async fn find(&self, id: &str) -> Result<Option<Row>, AppError> {
        self.db.table(TABLE)?.where_eq("id", id)?.first().await
    }

    /// One page of users, newest first. `page` starts at 1.
    pub async fn page(&self, page: i64, per_page: i64) -> Result<Vec<Row>, AppError> {
        self.db
            .table(TABLE)?
            .select("id, name, email")?
            .order_by("id", "DESC")?
            .limit(per_page, page_offset(page, per_page))
            .get()
            .await
    }

    /// Returns the new user's id.
    pub async fn create(&self, name: &str, email: &str) -> Result<String, AppError> {
        self.db
            .table(TABLE)?
            .insert([("name", name), ("email", email)])
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<u64, AppError> {
        self.db.table(TABLE)?.where_eq("id", id)?.delete().await
    }
}

/// Row offset of `page` (1-based). Saturates instead of overflowing on huge page numbers.
pub fn page_offset(page: i64, per_page: i64) -> i64 {
    page.max(1).saturating_sub(1).saturating_mul(per_page)
}
