//! ---
//! act_section: "02-scenario-simulation"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Scenario rules and synthetic reading generation."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
//! Scenario-driven simulation core for AirCheck TH.
//!
//! A [`scenario::RunScenario`] describes the monitored site, the date range,
//! and one qualitative [`situation::Situation`] per day. The
//! [`engine::SimulationEngine`] folds the situation through an ordered
//! [`rules::RuleTable`] into a multiplier/offset pair, then evaluates a
//! per-variable formula against a [`baseline::ReferenceBaseline`] plus
//! uniform noise. [`table::assemble_table`] expands the scenario into the
//! hourly output rows.

pub mod baseline;
pub mod engine;
pub mod rules;
pub mod scenario;
pub mod situation;
pub mod table;
pub mod variable;

pub use baseline::{BaselineSource, ReferenceBaseline};
pub use engine::{round2, SimulationEngine};
pub use rules::{RuleOutcome, RuleTable, SituationRule, Trigger, VariableScope};
pub use scenario::{Province, RunScenario};
pub use situation::{
    HeatLevel, LocalEvent, OdorLevel, RainLevel, SiteContext, Situation, SkyLevel, SunLevel,
    WindDirection, WindLevel,
};
pub use table::{assemble_table, SimulatedReading, HOURS_PER_DAY};
pub use variable::Variable;
