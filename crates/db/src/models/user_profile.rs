//! User profile model.

use appgen_core::status::SubscriptionTier;
use appgen_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_profiles` table, keyed by the auth user id.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub projects_count: i32,
    pub total_generations: i32,
    #[sqlx(try_from = "String")]
    pub subscription_tier: SubscriptionTier,
    pub subscription_status: String,
    pub stripe_customer_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
