//! Study plan persistence, keyed by user id.
//!
//! Plans go in and come out as owned copies; nothing returned by `load`
//! aliases what the repository holds.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::warn;

use super::database::Database;
use crate::error::Result;
use crate::study_plan::StudyPlan;

pub trait StudyPlanRepository {
    /// Store `plan` under its `user_id`, replacing any previous plan.
    fn save(&self, plan: &StudyPlan) -> Result<()>;

    /// The stored plan, or `None` when there is none or it cannot be read.
    fn load(&self, user_id: &str) -> Option<StudyPlan>;

    fn delete(&self, user_id: &str) -> Result<()>;

    fn exists(&self, user_id: &str) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStudyPlanRepository {
    plans: Arc<Mutex<HashMap<String, StudyPlan>>>,
}

impl InMemoryStudyPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StudyPlan>> {
        self.plans.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StudyPlanRepository for InMemoryStudyPlanRepository {
    fn save(&self, plan: &StudyPlan) -> Result<()> {
        self.lock().insert(plan.user_id.clone(), plan.clone());
        Ok(())
    }

    fn load(&self, user_id: &str) -> Option<StudyPlan> {
        self.lock().get(user_id).cloned()
    }

    fn delete(&self, user_id: &str) -> Result<()> {
        self.lock().remove(user_id);
        Ok(())
    }

    fn exists(&self, user_id: &str) -> bool {
        self.lock().contains_key(user_id)
    }
}

/// Plans as JSON documents in the `study_plans` table.
pub struct SqliteStudyPlanRepository {
    db: Database,
}

impl SqliteStudyPlanRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl StudyPlanRepository for SqliteStudyPlanRepository {
    fn save(&self, plan: &StudyPlan) -> Result<()> {
        let json = serde_json::to_string(plan)?;
        self.db.plan_put(&plan.user_id, &json)?;
        Ok(())
    }

    fn load(&self, user_id: &str) -> Option<StudyPlan> {
        let json = match self.db.plan_get(user_id) {
            Ok(json) => json?,
            Err(e) => {
                warn!(user_id, error = %e, "failed to read study plan");
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(plan) => Some(plan),
            Err(e) => {
                warn!(user_id, error = %e, "failed to parse study plan from storage");
                None
            }
        }
    }

    fn delete(&self, user_id: &str) -> Result<()> {
        self.db.plan_delete(user_id)?;
        Ok(())
    }

    fn exists(&self, user_id: &str) -> bool {
        self.db.plan_exists(user_id).unwrap_or_else(|e| {
            warn!(user_id, error = %e, "failed to check study plan");
            false
        })
    }
}
