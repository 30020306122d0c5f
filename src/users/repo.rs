use crate::users::repo_types::{User, UserChanges};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

/// Persistence seam for the users table.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<User>>;
    async fn insert(&self, user: &User) -> anyhow::Result<()>;
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<User>>;
    /// Returns the number of rows touched; zero when the id is unknown.
    async fn update(&self, changes: &UserChanges) -> anyhow::Result<u64>;
    async fn delete(&self, id: &str) -> anyhow::Result<u64>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, first_name, last_name, gender, create_at, status
            FROM users
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("select users")?;
        Ok(users)
    }

    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password, first_name, last_name, gender, create_at, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.gender)
        .bind(&user.create_at)
        .bind(&user.status)
        .execute(&self.db)
        .await
        .context("insert user")?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, first_name, last_name, gender, create_at, status
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("select user by id")?;
        Ok(user)
    }

    async fn update(&self, changes: &UserChanges) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, gender = $4, status = $5, create_at = $6
            WHERE id = $1
            "#,
        )
        .bind(&changes.id)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.gender)
        .bind(&changes.status)
        .bind(&changes.create_at)
        .execute(&self.db)
        .await
        .context("update user")?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: &str) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod pg_tests {
    use super::*;
    use crate::users::services::{hash_password, new_user_id, now_timestamp};

    async fn connect() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("connect to database");
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .expect("run migrations");
        db
    }

    fn sample_user() -> User {
        User {
            id: new_user_id(),
            username: "alexey".into(),
            password: hash_password("pw1").unwrap(),
            first_name: "Alexey".into(),
            last_name: "Grigorev".into(),
            gender: "M".into(),
            create_at: now_timestamp().unwrap(),
            status: "1".into(),
        }
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a Postgres instance"]
    async fn pg_store_crud_cycle() {
        let store = PgUserStore::new(connect().await);
        let user = sample_user();

        store.insert(&user).await.unwrap();
        let fetched = store.find_by_id(&user.id).await.unwrap().expect("row exists");
        assert_eq!(fetched, user);
        assert!(store.list().await.unwrap().iter().any(|u| u.id == user.id));

        let changes = UserChanges {
            id: user.id.clone(),
            first_name: "Alex".into(),
            last_name: "G".into(),
            gender: "F".into(),
            status: "0".into(),
            create_at: now_timestamp().unwrap(),
        };
        assert_eq!(store.update(&changes).await.unwrap(), 1);

        let updated = store.find_by_id(&user.id).await.unwrap().expect("row exists");
        assert_eq!(updated.first_name, "Alex");
        assert_eq!(updated.gender, "F");
        assert_eq!(updated.status, "0");
        assert_eq!(updated.create_at, changes.create_at);
        assert_eq!(updated.username, user.username);
        assert_eq!(updated.password, user.password);

        assert_eq!(store.delete(&user.id).await.unwrap(), 1);
        assert_eq!(store.delete(&user.id).await.unwrap(), 0);
        assert!(store.find_by_id(&user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a Postgres instance"]
    async fn pg_store_update_of_missing_id_touches_nothing() {
        let store = PgUserStore::new(connect().await);
        let changes = UserChanges {
            id: new_user_id(),
            first_name: "A".into(),
            last_name: "B".into(),
            gender: "M".into(),
            status: "1".into(),
            create_at: now_timestamp().unwrap(),
        };
        assert_eq!(store.update(&changes).await.unwrap(), 0);
    }
}
