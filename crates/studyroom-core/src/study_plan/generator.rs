use chrono::{DateTime, Utc};
use tracing::debug;

use super::strategy::StudyPlanStrategy;
use super::types::{StudyPlan, StudyStrategyType, StudyTopic};

pub const GUEST_USER: &str = "guest-user";

const MS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Builds study plans from topics and a strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct StudyPlanGenerator;

impl StudyPlanGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate_plan(
        &self,
        topics: &[StudyTopic],
        strategy: StudyStrategyType,
        user_id: Option<&str>,
        target_date: Option<DateTime<Utc>>,
    ) -> StudyPlan {
        self.generate_plan_at(topics, strategy, user_id, target_date, Utc::now())
    }

    /// [`generate_plan`](Self::generate_plan) with an explicit "now".
    pub fn generate_plan_at(
        &self,
        topics: &[StudyTopic],
        strategy_type: StudyStrategyType,
        user_id: Option<&str>,
        target_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> StudyPlan {
        let strategy = strategy_type.strategy();
        let days = self.plan_days(topics, strategy, target_date, now);
        let sessions = strategy.distribute_topics(topics, now);

        if let Some(last) = sessions.last() {
            let used = (last.scheduled_date - now).num_days() + 1;
            if used > days {
                debug!(days, used, "study plan runs past its day budget");
            }
        }

        StudyPlan {
            id: format!("plan-{}", now.timestamp_millis()),
            user_id: user_id.unwrap_or(GUEST_USER).to_string(),
            topics: topics.to_vec(),
            sessions,
            strategy: strategy_type,
            created_at: now,
            target_date,
        }
    }

    /// Days available for the plan: whole days until `target_date` (at
    /// least one), or the days needed at the strategy's daily pace.
    pub fn plan_days(
        &self,
        topics: &[StudyTopic],
        strategy: &dyn StudyPlanStrategy,
        target_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> i64 {
        match target_date {
            Some(target) => {
                let diff_ms = (target - now).num_milliseconds() as f64;
                ((diff_ms / MS_PER_DAY).ceil() as i64).max(1)
            }
            None => {
                let total: f64 = topics
                    .iter()
                    .map(|t| t.estimated_hours)
                    .filter(|h| h.is_finite() && *h > 0.0)
                    .sum();
                (total / strategy.daily_hours()).ceil() as i64
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::study_plan::{IntensiveStrategy, Priority, RegularStrategy};
    use chrono::Duration;

    fn topics() -> Vec<StudyTopic> {
        [
            ("1", 10.0, Priority::High),
            ("2", 8.0, Priority::Medium),
            ("3", 6.0, Priority::Low),
        ]
        .into_iter()
        .map(|(id, hours, priority)| StudyTopic {
            id: id.to_string(),
            title: format!("Topic {id}"),
            estimated_hours: hours,
            priority,
            completed: false,
        })
        .collect()
    }

    #[test]
    fn days_from_pace_without_target() {
        let now = Utc::now();
        let g = StudyPlanGenerator::new();
        assert_eq!(g.plan_days(&topics(), &IntensiveStrategy, None, now), 3);
        assert_eq!(g.plan_days(&topics(), &RegularStrategy, None, now), 6);
    }

    #[test]
    fn days_from_target_are_at_least_one() {
        let now = Utc::now();
        let g = StudyPlanGenerator::new();
        let soon = Some(now + Duration::hours(30));
        assert_eq!(g.plan_days(&topics(), &RegularStrategy, soon, now), 2);
        let past = Some(now - Duration::days(3));
        assert_eq!(g.plan_days(&topics(), &RegularStrategy, past, now), 1);
    }

    #[test]
    fn plan_defaults_to_guest_user() {
        let now = Utc::now();
        let plan =
            StudyPlanGenerator::new().generate_plan_at(&topics(), StudyStrategyType::Light, None, None, now);
        assert_eq!(plan.user_id, GUEST_USER);
        assert_eq!(plan.id, format!("plan-{}", now.timestamp_millis()));
        assert_eq!(plan.created_at, now);
        assert!(plan.target_date.is_none());
    }
}
