//! ---
//! act_section: "02-scenario-simulation"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Scenario rules and synthetic reading generation."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
use aircheck_common::config::RulesConfig;

use crate::situation::{
    HeatLevel, LocalEvent, OdorLevel, RainLevel, SiteContext, Situation, SunLevel, WindLevel,
};
use crate::variable::Variable;

/// Variables a rule applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableScope {
    All,
    Pollutants,
    Only(Vec<Variable>),
    Except(Vec<Variable>),
}

impl VariableScope {
    pub fn covers(&self, variable: Variable) -> bool {
        match self {
            VariableScope::All => true,
            VariableScope::Pollutants => variable.is_pollutant(),
            VariableScope::Only(variables) => variables.contains(&variable),
            VariableScope::Except(variables) => !variables.contains(&variable),
        }
    }
}

/// Condition a rule tests against the day, the hour, and the site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    RainAtLeast(RainLevel),
    RainExactly(RainLevel),
    Sun(SunLevel),
    Wind(WindLevel),
    OdorPresent,
    Heat(HeatLevel),
    Event(LocalEvent),
    NearRoad,
    FactoryDownwind,
    RushHour,
}

impl Trigger {
    pub fn matches(&self, situation: &Situation, hour: u32, site: &SiteContext) -> bool {
        match self {
            Trigger::RainAtLeast(level) => situation.rain >= *level,
            Trigger::RainExactly(level) => situation.rain == *level,
            Trigger::Sun(level) => situation.sun == *level,
            Trigger::Wind(level) => situation.wind == *level,
            Trigger::OdorPresent => situation.odor == OdorLevel::Present,
            Trigger::Heat(level) => situation.heat == *level,
            Trigger::Event(event) => situation.event == *event,
            Trigger::NearRoad => site.near_road,
            Trigger::FactoryDownwind => {
                site.near_factory && situation.wind_direction == site.factory_direction
            }
            Trigger::RushHour => matches!(hour, 7..=9 | 16..=19),
        }
    }
}

/// One row of the situation rule table.
#[derive(Debug, Clone, PartialEq)]
pub struct SituationRule {
    pub name: &'static str,
    pub trigger: Trigger,
    pub scope: VariableScope,
    pub multiplier: f64,
    pub offset: f64,
}

/// Accumulated multiplier/offset pair produced by folding the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleOutcome {
    pub multiplier: f64,
    pub offset: f64,
}

impl RuleOutcome {
    pub const NEUTRAL: RuleOutcome = RuleOutcome {
        multiplier: 1.0,
        offset: 0.0,
    };
}

/// Ordered set of situational rules.
///
/// The rules are data, not control flow: matching rows multiply into a
/// single factor and sum into a single offset, so any subset can be
/// exercised in isolation.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<SituationRule>,
}

impl RuleTable {
    /// Build the standard table from the configured constants.
    ///
    /// Scope notes: rain cooling skips WS (the wind lull is modelled by the
    /// calm-air row), and calm air skips Temp (cooling is the rain row's
    /// job). The remaining rows follow the planner's calibration sheet.
    pub fn standard(config: &RulesConfig) -> Self {
        let mut rules = vec![
            SituationRule {
                name: "rain-washout",
                trigger: Trigger::RainAtLeast(RainLevel::Moderate),
                scope: VariableScope::Pollutants,
                multiplier: config.rain_washout_multiplier,
                offset: 0.0,
            },
            SituationRule {
                name: "rain-cooling",
                trigger: Trigger::RainAtLeast(RainLevel::Moderate),
                scope: VariableScope::Except(vec![Variable::Ws]),
                multiplier: 1.0,
                offset: config.rain_cooling_offset,
            },
            SituationRule {
                name: "drizzle-washout",
                trigger: Trigger::RainExactly(RainLevel::Light),
                scope: VariableScope::Pollutants,
                multiplier: config.drizzle_washout_multiplier,
                offset: 0.0,
            },
            SituationRule {
                name: "strong-sun",
                trigger: Trigger::Sun(SunLevel::Strong),
                scope: VariableScope::All,
                multiplier: config.strong_sun_multiplier,
                offset: config.strong_sun_offset,
            },
            SituationRule {
                name: "light-sun",
                trigger: Trigger::Sun(SunLevel::Light),
                scope: VariableScope::All,
                multiplier: 1.0,
                offset: config.light_sun_offset,
            },
            SituationRule {
                name: "wind-dispersal",
                trigger: Trigger::Wind(WindLevel::Strong),
                scope: VariableScope::Pollutants,
                multiplier: config.wind_dispersal_multiplier,
                offset: 0.0,
            },
            SituationRule {
                name: "wind-gust",
                trigger: Trigger::Wind(WindLevel::Strong),
                scope: VariableScope::Only(vec![Variable::Ws]),
                multiplier: 1.0,
                offset: config.wind_gust_offset,
            },
            SituationRule {
                name: "calm-air",
                trigger: Trigger::Wind(WindLevel::Calm),
                scope: VariableScope::Except(vec![Variable::Temp]),
                multiplier: config.calm_air_multiplier,
                offset: config.calm_air_offset,
            },
            SituationRule {
                name: "extreme-heat",
                trigger: Trigger::Heat(HeatLevel::VeryHot),
                scope: VariableScope::Only(vec![Variable::Temp]),
                multiplier: 1.0,
                offset: config.extreme_heat_offset,
            },
            SituationRule {
                name: "extreme-cold",
                trigger: Trigger::Heat(HeatLevel::Cold),
                scope: VariableScope::Only(vec![Variable::Temp]),
                multiplier: 1.0,
                offset: config.extreme_cold_offset,
            },
            SituationRule {
                name: "odor-event",
                trigger: Trigger::OdorPresent,
                scope: VariableScope::Only(vec![Variable::No2, Variable::So2, Variable::Co]),
                multiplier: config.odor_multiplier,
                offset: 0.0,
            },
            SituationRule {
                name: "heavy-traffic",
                trigger: Trigger::Event(LocalEvent::HeavyTraffic),
                scope: VariableScope::Only(vec![Variable::No, Variable::No2, Variable::Co]),
                multiplier: config.traffic_multiplier,
                offset: 0.0,
            },
            SituationRule {
                name: "open-burning",
                trigger: Trigger::Event(LocalEvent::OpenBurning),
                scope: VariableScope::Only(vec![Variable::Co, Variable::So2, Variable::O3]),
                multiplier: config.burning_multiplier,
                offset: 0.0,
            },
            SituationRule {
                name: "near-road",
                trigger: Trigger::NearRoad,
                scope: VariableScope::Only(vec![Variable::No, Variable::No2, Variable::Co]),
                multiplier: config.near_road_multiplier,
                offset: 0.0,
            },
            SituationRule {
                name: "factory-downwind",
                trigger: Trigger::FactoryDownwind,
                scope: VariableScope::Only(vec![Variable::No2, Variable::So2]),
                multiplier: config.factory_downwind_multiplier,
                offset: 0.0,
            },
        ];
        if config.rush_hour_enabled {
            rules.push(SituationRule {
                name: "rush-hour",
                trigger: Trigger::RushHour,
                scope: VariableScope::Only(vec![Variable::No, Variable::No2, Variable::Co]),
                multiplier: config.rush_hour_multiplier,
                offset: 0.0,
            });
        }
        Self { rules }
    }

    /// Fold every matching rule into a single multiplier/offset pair for
    /// one (variable, situation, hour, site) cell.
    pub fn fold(
        &self,
        variable: Variable,
        situation: &Situation,
        hour: u32,
        site: &SiteContext,
    ) -> RuleOutcome {
        self.rules
            .iter()
            .filter(|rule| rule.trigger.matches(situation, hour, site))
            .filter(|rule| rule.scope.covers(variable))
            .fold(RuleOutcome::NEUTRAL, |outcome, rule| RuleOutcome {
                multiplier: outcome.multiplier * rule.multiplier,
                offset: outcome.offset + rule.offset,
            })
    }

    pub fn rules(&self) -> &[SituationRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
