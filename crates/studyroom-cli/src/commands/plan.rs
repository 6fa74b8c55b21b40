use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Subcommand, ValueEnum};
use serde_json::json;
use studyroom_core::storage::{Database, SqliteStudyPlanRepository, StudyPlanRepository};
use studyroom_core::study_plan::{
    StudyPlanGenerator, StudyPlanOriginator, StudyStrategyType, StudyTopic, GUEST_USER,
};

#[derive(Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Intensive,
    Regular,
    Light,
}

impl From<StrategyArg> for StudyStrategyType {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Intensive => StudyStrategyType::Intensive,
            StrategyArg::Regular => StudyStrategyType::Regular,
            StrategyArg::Light => StudyStrategyType::Light,
        }
    }
}

#[derive(Subcommand)]
pub enum PlanAction {
    /// Build a plan from a JSON array of topics and store it
    Generate {
        /// Topics file (`[{"id", "title", "estimatedHours", "priority"}]`)
        #[arg(long)]
        topics: PathBuf,
        #[arg(long, value_enum, default_value = "regular")]
        strategy: StrategyArg,
        #[arg(long, default_value = GUEST_USER)]
        user: String,
        /// YYYY-MM-DD or RFC 3339
        #[arg(long)]
        target_date: Option<String>,
    },
    /// Print the stored plan and its progress
    Show {
        #[arg(long, default_value = GUEST_USER)]
        user: String,
    },
    /// Mark a session as done
    Complete {
        /// Session ID
        #[arg(long)]
        session: String,
        #[arg(long, default_value = GUEST_USER)]
        user: String,
    },
    /// Delete the stored plan
    Delete {
        #[arg(long, default_value = GUEST_USER)]
        user: String,
    },
}

fn parse_target_date(raw: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("invalid target date '{raw}': {e}"))?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("invalid target date '{raw}'").into())
}

fn missing(user: &str) -> Box<dyn std::error::Error> {
    format!("no study plan for user {user}").into()
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    let repo = SqliteStudyPlanRepository::new(Database::open()?);

    match action {
        PlanAction::Generate {
            topics,
            strategy,
            user,
            target_date,
        } => {
            let topics: Vec<StudyTopic> = serde_json::from_str(&std::fs::read_to_string(topics)?)?;
            let target_date = target_date.as_deref().map(parse_target_date).transpose()?;

            let plan = StudyPlanGenerator::new().generate_plan(
                &topics,
                strategy.into(),
                Some(&user),
                target_date,
            );
            repo.save(&plan)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        PlanAction::Show { user } => {
            let plan = repo.load(&user).ok_or_else(|| missing(&user))?;
            let progress = StudyPlanOriginator::new(plan.clone()).progress();
            let out = json!({ "plan": plan, "progress": progress });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        PlanAction::Complete { session, user } => {
            let plan = repo.load(&user).ok_or_else(|| missing(&user))?;
            let mut originator = StudyPlanOriginator::new(plan);
            if !originator.complete_session(&session) {
                return Err(format!("no open session {session} in plan for {user}").into());
            }
            let progress = originator.progress();
            repo.save(&originator.into_plan())?;
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        PlanAction::Delete { user } => {
            if !repo.exists(&user) {
                return Err(missing(&user));
            }
            repo.delete(&user)?;
            println!("study plan deleted for {user}");
        }
    }
    Ok(())
}
