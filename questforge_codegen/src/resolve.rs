//! Objective and trigger resolution.
//!
//! Both the creation path and the reload path read the same
//! [`ResolvedObjective`] records. Creation applies `initial_state`; reload
//! only ever looks at `rebuild`, which carries no state at all.

use std::collections::HashSet;

use log::debug;
use questforge_data::{FinishDisposition, Location, ObjectiveDef, QuestBlueprint, TriggerDef};

use crate::ident::{ensure_unique, sanitize};
use crate::triggers::{TriggerCatalogEntry, validate_trigger};

/// Title used for the entry synthesized when a quest declares no objectives.
pub const PLACEHOLDER_TITLE: &str = "Complete the task";

/// State an objective is put in by the creation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialState {
    /// Explicitly begun at creation.
    Active,
    /// Left inactive; a start trigger activates it.
    DeferredToTrigger,
    /// Left inactive with nothing to activate it.
    Dormant,
}

impl InitialState {
    pub fn is_active(&self) -> bool {
        matches!(self, InitialState::Active)
    }

    pub fn note(&self) -> Option<&'static str> {
        match self {
            InitialState::Active => None,
            InitialState::DeferredToTrigger => Some("activation deferred to trigger"),
            InitialState::Dormant => Some("no auto-start and no triggers; stays inactive until begun externally"),
        }
    }
}

/// What the reload path re-applies when it has to recreate an entry.
///
/// Carries no state: the host restores state from the save.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RebuildBehavior {
    pub reapply_location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedObjective {
    /// Zero-based position in the quest; also the restored-entry index.
    pub index: usize,
    pub variable: String,
    pub title: String,
    /// Coordinates attached when the entry is created, if any.
    pub poi: Option<Location>,
    pub required_progress: u32,
    pub initial_state: InitialState,
    pub rebuild: RebuildBehavior,
    pub synthesized: bool,
}

/// Derive variable names and states for an ordered objective list.
///
/// Names are made unique against `used`, which callers pre-seed with the
/// member names of the enclosing class. An empty list yields one synthesized
/// placeholder that is created and begun immediately.
pub fn resolve_objectives(objectives: &[ObjectiveDef], used: &mut HashSet<String>) -> Vec<ResolvedObjective> {
    if objectives.is_empty() {
        let variable = ensure_unique("objective1", used, 1);
        return vec![ResolvedObjective {
            index: 0,
            variable,
            title: PLACEHOLDER_TITLE.to_string(),
            poi: None,
            required_progress: 1,
            initial_state: InitialState::Active,
            rebuild: RebuildBehavior::default(),
            synthesized: true,
        }];
    }

    objectives
        .iter()
        .enumerate()
        .map(|(index, objective)| {
            let fallback = format!("objective{}", index + 1);
            let seed = sanitize(&objective.name, &fallback);
            let variable = ensure_unique(&seed, used, index + 1);
            let initial_state = classify(objective);
            debug!("objective #{} '{}' -> {variable} ({initial_state:?})", index + 1, objective.title);
            ResolvedObjective {
                index,
                variable,
                title: objective.title.clone(),
                poi: objective.location.filter(|_| objective.create_poi),
                required_progress: objective.required_progress.max(1),
                initial_state,
                rebuild: RebuildBehavior {
                    reapply_location: objective.location,
                },
                synthesized: false,
            }
        })
        .collect()
}

/// Convenience wrapper with an empty name scope.
pub fn resolve(objectives: &[ObjectiveDef]) -> Vec<ResolvedObjective> {
    resolve_objectives(objectives, &mut HashSet::new())
}

fn classify(objective: &ObjectiveDef) -> InitialState {
    if objective.auto_started() {
        InitialState::Active
    } else if !objective.start_triggers.is_empty() {
        InitialState::DeferredToTrigger
    } else {
        InitialState::Dormant
    }
}

/// What a subscribed trigger does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEffect {
    BeginQuest,
    EndQuest(FinishDisposition),
    BeginObjective(usize),
    EndObjective(usize, FinishDisposition),
}

/// A trigger that passed catalog validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTrigger {
    pub entry: &'static TriggerCatalogEntry,
    pub def: TriggerDef,
    pub effect: TriggerEffect,
}

/// Everything the method and class generators need for one quest.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedQuest {
    pub objectives: Vec<ResolvedObjective>,
    pub triggers: Vec<ResolvedTrigger>,
    /// Effective auto-begin: declared start triggers override the flag.
    pub auto_begin: bool,
    pub warnings: Vec<String>,
}

impl ResolvedQuest {
    pub fn objective(&self, index: usize) -> Option<&ResolvedObjective> {
        self.objectives.get(index)
    }
}

/// Resolve a quest's objectives and validate all of its triggers.
///
/// Invalid triggers are dropped from the output and reported as warnings;
/// the rest of the quest is still generated.
pub fn resolve_quest(quest: &QuestBlueprint, used: &mut HashSet<String>) -> ResolvedQuest {
    let label = quest_label(quest);
    let mut warnings = Vec::new();
    let objectives = resolve_objectives(&quest.objectives, used);
    if quest.objectives.is_empty() {
        warnings.push(format!(
            "{label}: no objectives declared; generated a placeholder objective that begins immediately"
        ));
    }

    let mut triggers = Vec::new();
    let mut take = |defs: &[TriggerDef], effect: &dyn Fn(&TriggerDef) -> TriggerEffect, context: String| -> usize {
        let mut kept = 0usize;
        for def in defs {
            match validate_trigger(def) {
                Ok(entry) => {
                    triggers.push(ResolvedTrigger {
                        entry,
                        def: def.clone(),
                        effect: effect(def),
                    });
                    kept += 1;
                },
                Err(err) => warnings.push(format!("{context}: skipped trigger: {err}")),
            }
        }
        kept
    };

    take(&quest.start_triggers, &|_| TriggerEffect::BeginQuest, format!("{label} start"));
    take(
        &quest.finish_triggers,
        &|def| TriggerEffect::EndQuest(def.disposition),
        format!("{label} finish"),
    );

    let mut stranded = Vec::new();
    for (index, objective) in quest.objectives.iter().enumerate() {
        let context = format!("{label} objective #{} '{}'", index + 1, objective.title);
        let started = take(
            &objective.start_triggers,
            &|_| TriggerEffect::BeginObjective(index),
            format!("{context} start"),
        );
        take(
            &objective.finish_triggers,
            &|def| TriggerEffect::EndObjective(index, def.disposition),
            format!("{context} finish"),
        );
        if !objective.start_triggers.is_empty() && started == 0 {
            stranded.push(context);
        }
    }
    for context in stranded {
        warnings.push(format!(
            "{context}: every start trigger was skipped; the objective stays inactive until begun externally"
        ));
    }

    ResolvedQuest {
        objectives,
        triggers,
        auto_begin: quest.auto_begin && quest.start_triggers.is_empty(),
        warnings,
    }
}

pub(crate) fn quest_label(quest: &QuestBlueprint) -> String {
    if quest.quest_id.trim().is_empty() {
        format!("quest '{}'", quest.title)
    } else {
        format!("quest '{}'", quest.quest_id)
    }
}
