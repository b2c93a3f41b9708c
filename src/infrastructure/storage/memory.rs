//! In-memory user store

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{DomainResult, RecordStore, Slice, User};

/// Vector-backed store for development and testing.
///
/// Records are kept in insertion order, which is the order pages are served in.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    /// Store pre-filled with `count` generated users with ids `1..=count`.
    pub fn with_demo_users(count: u32) -> Self {
        let now = Utc::now();
        let users = (1..=count)
            .map(|n| User {
                id: n as i32,
                firstname: format!("User{}", n),
                lastname: format!("Demo{}", n),
                email: format!("user{}@example.com", n),
                phone: format!("+1555{:07}", n),
                created_at: now,
                updated_at: now,
            })
            .collect();
        Self::with_users(users)
    }

    pub async fn insert(&self, user: User) {
        self.users.write().await.push(user);
    }
}

#[async_trait]
impl RecordStore for InMemoryUserStore {
    type Record = User;

    async fn find(&self, offset: u64, count: u64) -> DomainResult<Slice<User>> {
        let users = self.users.read().await;
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(count).unwrap_or(usize::MAX);

        Ok(Slice {
            items: users.iter().skip(skip).take(take).cloned().collect(),
            total: users.len() as u64,
        })
    }
}
