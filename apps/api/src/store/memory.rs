//! In-process `CareerStore` used by the test suites.
//!
//! A unit of work holds the single owned lock for its whole lifetime, so
//! units run one after another (serializable isolation). Writes land in a
//! working copy that replaces the shared state only on commit.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use sqlx::types::Json;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::models::insight::{
    DemandLevel, IndustryInsight, MarketOutlook, NewIndustryInsight, SalaryRange,
};
use crate::models::user::{ProfileUpdate, User, UserIdentity};
use crate::store::{CareerStore, OnboardingUnit, StoreError};

/// A fully populated insight, as left behind by the enrichment job.
pub fn sample_insight(industry: &str) -> IndustryInsight {
    let now = Utc::now();
    IndustryInsight {
        id: Uuid::new_v4(),
        industry: industry.to_string(),
        salary_ranges: Json(vec![
            SalaryRange {
                role: "Data Analyst".to_string(),
                min: 65000.0,
                max: 110000.0,
                median: 85000.0,
                location: Some("US".to_string()),
            },
            SalaryRange {
                role: "ML Engineer".to_string(),
                min: 120000.0,
                max: 210000.0,
                median: 160500.0,
                location: None,
            },
        ]),
        growth_rate: 12.5,
        demand_level: DemandLevel::High,
        top_skills: vec!["Python".to_string(), "Statistics".to_string()],
        market_outlook: MarketOutlook::Positive,
        key_trends: vec!["LLM adoption".to_string()],
        recommended_skills: vec!["MLOps".to_string()],
        last_updated: now - ChronoDuration::days(2),
        next_update: now + ChronoDuration::days(5),
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub users: HashMap<Uuid, User>,
    pub insights: HashMap<String, IndustryInsight>,
}

/// How the next unit loses the race to create an industry insight.
#[derive(Debug, Clone)]
pub enum CreationRace {
    /// Another transaction commits this row between the unit's lookup and its insert.
    LoseTo(IndustryInsight),
    /// The insert reports a conflict but the conflicting row never becomes visible.
    PhantomConflict,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_after_insight_create: Arc<AtomicBool>,
    stall_next_unit: Arc<AtomicBool>,
    creation_race: Arc<std::sync::Mutex<Option<CreationRace>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, external_id: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            external_id: external_id.to_string(),
            email: format!("{external_id}@example.com"),
            name: None,
            bio: None,
            experience: None,
            skills: Vec::new(),
            industry: None,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.users.insert(user.id, user.clone());
        user
    }

    pub async fn insert_insight(&self, insight: IndustryInsight) {
        self.state
            .lock()
            .await
            .insights
            .insert(insight.industry.clone(), insight);
    }

    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }

    /// Makes the next unit fail right after it creates an insight.
    pub fn fail_after_insight_create(&self) {
        self.fail_after_insight_create.store(true, Ordering::SeqCst);
    }

    /// Makes the next unit miss its first insight lookup and then hit `race` on insert.
    pub fn lose_next_creation_race(&self, race: CreationRace) {
        *self.creation_race.lock().unwrap() = Some(race);
    }

    /// Makes the next `begin` hang for a minute before opening the unit.
    pub fn stall_next_unit(&self) {
        self.stall_next_unit.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CareerStore for MemoryStore {
    async fn find_user_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.external_id == external_id)
            .cloned())
    }

    async fn upsert_user_identity(
        &self,
        external_id: &str,
        identity: &UserIdentity,
    ) -> Result<User, StoreError> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        if state
            .users
            .values()
            .any(|u| u.email == identity.email && u.external_id != external_id)
        {
            return Err(StoreError::EmailTaken(identity.email.clone()));
        }
        if let Some(user) = state
            .users
            .values_mut()
            .find(|u| u.external_id == external_id)
        {
            user.email = identity.email.clone();
            user.name = identity.name.clone();
            user.updated_at = now;
            return Ok(user.clone());
        }
        let user = User {
            id: Uuid::new_v4(),
            external_id: external_id.to_string(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            bio: None,
            experience: None,
            skills: Vec::new(),
            industry: None,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_insight(&self, industry: &str) -> Result<Option<IndustryInsight>, StoreError> {
        Ok(self.state.lock().await.insights.get(industry).cloned())
    }

    async fn begin(&self) -> Result<Box<dyn OnboardingUnit>, StoreError> {
        if self.stall_next_unit.swap(false, Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        let guard = self.state.clone().lock_owned().await;
        let working = (*guard).clone();
        Ok(Box::new(MemoryUnit {
            guard,
            working,
            fail_after_insight_create: self.fail_after_insight_create.swap(false, Ordering::SeqCst),
            creation_race: self.creation_race.lock().unwrap().take(),
            looked_up: false,
        }))
    }
}

struct MemoryUnit {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    fail_after_insight_create: bool,
    creation_race: Option<CreationRace>,
    looked_up: bool,
}

#[async_trait]
impl OnboardingUnit for MemoryUnit {
    async fn find_insight(
        &mut self,
        industry: &str,
    ) -> Result<Option<IndustryInsight>, StoreError> {
        let first = !self.looked_up;
        self.looked_up = true;
        if first && self.creation_race.is_some() {
            return Ok(None);
        }
        Ok(self.working.insights.get(industry).cloned())
    }

    async fn create_insight(
        &mut self,
        insight: &NewIndustryInsight,
    ) -> Result<Option<IndustryInsight>, StoreError> {
        match self.creation_race.take() {
            Some(CreationRace::LoseTo(winner)) => {
                // The winner committed independently of this unit.
                self.guard
                    .insights
                    .insert(winner.industry.clone(), winner.clone());
                self.working.insights.insert(winner.industry.clone(), winner);
                return Ok(None);
            }
            Some(CreationRace::PhantomConflict) => return Ok(None),
            None => {}
        }
        if self.working.insights.contains_key(&insight.industry) {
            return Ok(None);
        }
        let row = IndustryInsight {
            id: Uuid::new_v4(),
            industry: insight.industry.clone(),
            salary_ranges: Json(insight.salary_ranges.clone()),
            growth_rate: insight.growth_rate,
            demand_level: insight.demand_level,
            top_skills: insight.top_skills.clone(),
            market_outlook: insight.market_outlook,
            key_trends: insight.key_trends.clone(),
            recommended_skills: insight.recommended_skills.clone(),
            last_updated: Utc::now(),
            next_update: insight.next_update,
        };
        self.working
            .insights
            .insert(row.industry.clone(), row.clone());
        if self.fail_after_insight_create {
            return Err(StoreError::Injected("connection reset".to_string()));
        }
        Ok(Some(row))
    }

    async fn update_user_profile(
        &mut self,
        user_id: Uuid,
        profile: &ProfileUpdate,
    ) -> Result<User, StoreError> {
        if !self.working.insights.contains_key(&profile.industry) {
            return Err(StoreError::Injected(format!(
                "foreign key violation: industry {}",
                profile.industry
            )));
        }
        let user = self
            .working
            .users
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::RowNotFound(format!("user {user_id}")))?;
        user.bio = profile.bio.clone();
        user.experience = Some(profile.experience);
        user.skills = profile.skills.clone();
        user.industry = Some(profile.industry.clone());
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryUnit {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }
}
