//! Study plans: topic distribution strategies and editable plan history.

mod generator;
mod memento;
mod strategy;
mod types;

pub use generator::{StudyPlanGenerator, GUEST_USER};
pub use memento::{StudyPlanCaretaker, StudyPlanOriginator};
pub use strategy::{IntensiveStrategy, LightStrategy, RegularStrategy, StudyPlanStrategy};
pub use types::{
    Priority, StudyPlan, StudyPlanMemento, StudyPlanState, StudyProgress, StudySession,
    StudyStrategyType, StudyTopic,
};
