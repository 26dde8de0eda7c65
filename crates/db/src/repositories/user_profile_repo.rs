//! Repository for the `user_profiles` table.

use appgen_core::types::DbId;
use sqlx::PgPool;

use crate::models::user_profile::UserProfile;

const COLUMNS: &str = "id, full_name, avatar_url, projects_count, total_generations, \
                       subscription_tier, subscription_status, stripe_customer_id, \
                       created_at, updated_at";

pub struct UserProfileRepo;

impl UserProfileRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_profiles WHERE id = $1");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Atomically bump `total_generations`. Returns `false` when the user has
    /// no profile row.
    pub async fn increment_generations(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_profiles SET total_generations = total_generations + 1 WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
