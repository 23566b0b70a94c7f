use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::insight::{IndustryInsight, NewIndustryInsight};
use crate::models::user::{ProfileUpdate, User, UserIdentity};
use crate::store::{CareerStore, OnboardingUnit, StoreError};

/// Postgres' name for the `UNIQUE` constraint on `users.email`.
const USERS_EMAIL_KEY: &str = "users_email_key";

/// `CareerStore` backed by PostgreSQL.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CareerStore for PgStore {
    async fn find_user_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE external_id = $1")
                .bind(external_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn upsert_user_identity(
        &self,
        external_id: &str,
        identity: &UserIdentity,
    ) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (external_id, email, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (external_id) DO UPDATE
                SET email = EXCLUDED.email,
                    name = EXCLUDED.name,
                    updated_at = now()
            RETURNING *
            "#,
        )
        .bind(external_id)
        .bind(&identity.email)
        .bind(identity.name.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let email_taken = matches!(
                &e,
                sqlx::Error::Database(db) if db.constraint() == Some(USERS_EMAIL_KEY)
            );
            if email_taken {
                StoreError::EmailTaken(identity.email.clone())
            } else {
                StoreError::Database(e)
            }
        })
    }

    async fn find_insight(&self, industry: &str) -> Result<Option<IndustryInsight>, StoreError> {
        Ok(sqlx::query_as::<_, IndustryInsight>(
            "SELECT * FROM industry_insights WHERE industry = $1",
        )
        .bind(industry)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn begin(&self) -> Result<Box<dyn OnboardingUnit>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgOnboardingUnit { tx }))
    }
}

/// One onboarding transaction. sqlx rolls the transaction back when it is
/// dropped without `commit`, which is what happens on error or timeout.
struct PgOnboardingUnit {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl OnboardingUnit for PgOnboardingUnit {
    async fn find_insight(
        &mut self,
        industry: &str,
    ) -> Result<Option<IndustryInsight>, StoreError> {
        Ok(sqlx::query_as::<_, IndustryInsight>(
            "SELECT * FROM industry_insights WHERE industry = $1",
        )
        .bind(industry)
        .fetch_optional(&mut *self.tx)
        .await?)
    }

    async fn create_insight(
        &mut self,
        insight: &NewIndustryInsight,
    ) -> Result<Option<IndustryInsight>, StoreError> {
        // A concurrent transaction inserting the same industry holds the
        // unique index entry; this statement waits for it and then skips.
        Ok(sqlx::query_as::<_, IndustryInsight>(
            r#"
            INSERT INTO industry_insights
                (industry, salary_ranges, growth_rate, demand_level, top_skills,
                 market_outlook, key_trends, recommended_skills, next_update)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (industry) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&insight.industry)
        .bind(Json(&insight.salary_ranges))
        .bind(insight.growth_rate)
        .bind(insight.demand_level)
        .bind(&insight.top_skills)
        .bind(insight.market_outlook)
        .bind(&insight.key_trends)
        .bind(&insight.recommended_skills)
        .bind(insight.next_update)
        .fetch_optional(&mut *self.tx)
        .await?)
    }

    async fn update_user_profile(
        &mut self,
        user_id: Uuid,
        profile: &ProfileUpdate,
    ) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET bio = $1, experience = $2, skills = $3, industry = $4, updated_at = now()
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(profile.bio.as_deref())
        .bind(profile.experience)
        .bind(&profile.skills)
        .bind(&profile.industry)
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| StoreError::RowNotFound(format!("user {user_id}")))
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}
