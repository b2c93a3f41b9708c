use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use tracing::{debug, info};

use crate::domain::{DomainResult, RecordStore, Slice, User};
use crate::infrastructure::database::entities::user;

/// Rows per INSERT. At six bound columns per row this stays under SQLite's
/// bind parameter limit.
const SEED_BATCH_SIZE: usize = 500;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert `count` generated users if the table is empty.
    ///
    /// Returns the number of rows inserted.
    pub async fn seed_demo_users(&self, count: u32) -> DomainResult<u32> {
        let existing = user::Entity::find().count(&self.db).await?;
        if existing > 0 || count == 0 {
            debug!(existing, "Skipping demo user seeding");
            return Ok(0);
        }

        info!("Seeding {} demo users...", count);
        let now = Utc::now();
        let rows: Vec<user::ActiveModel> = (1..=count)
            .map(|n| user::ActiveModel {
                firstname: Set(format!("User{}", n)),
                lastname: Set(format!("Demo{}", n)),
                email: Set(format!("user{}@example.com", n)),
                phone: Set(format!("+1555{:07}", n)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            })
            .collect();

        let txn = self.db.begin().await?;
        for batch in rows.chunks(SEED_BATCH_SIZE) {
            user::Entity::insert_many(batch.to_vec()).exec(&txn).await?;
        }
        txn.commit().await?;

        Ok(count)
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        firstname: model.firstname,
        lastname: model.lastname,
        email: model.email,
        phone: model.phone,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[async_trait]
impl RecordStore for UserRepository {
    type Record = User;

    async fn find(&self, offset: u64, count: u64) -> DomainResult<Slice<User>> {
        let total = user::Entity::find().count(&self.db).await?;

        // SQLite binds integers as i64; larger values would wrap negative.
        let offset = offset.min(i64::MAX as u64);
        let count = count.min(i64::MAX as u64);

        // Ordered by id so consecutive pages never overlap.
        let models = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .offset(offset)
            .limit(count)
            .all(&self.db)
            .await?;

        let items: Vec<User> = models.into_iter().map(user_model_to_domain).collect();

        Ok(Slice { items, total })
    }
}
