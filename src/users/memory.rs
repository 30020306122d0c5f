use crate::users::repo::UserStore;
use crate::users::repo_types::{User, UserChanges};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// In-memory store used by handler and service tests.
#[derive(Default)]
pub struct MemoryUserStore {
    rows: RwLock<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.rows.read().await.clone())
    }

    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|u| u.id == user.id) {
            anyhow::bail!("duplicate key value violates unique constraint \"users_pkey\"");
        }
        rows.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<User>> {
        Ok(self.rows.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn update(&self, changes: &UserChanges) -> anyhow::Result<u64> {
        let mut rows = self.rows.write().await;
        let mut touched = 0;
        for user in rows.iter_mut().filter(|u| u.id == changes.id) {
            user.first_name = changes.first_name.clone();
            user.last_name = changes.last_name.clone();
            user.gender = changes.gender.clone();
            user.status = changes.status.clone();
            user.create_at = changes.create_at.clone();
            touched += 1;
        }
        Ok(touched)
    }

    async fn delete(&self, id: &str) -> anyhow::Result<u64> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|u| u.id != id);
        Ok((before - rows.len()) as u64)
    }
}
