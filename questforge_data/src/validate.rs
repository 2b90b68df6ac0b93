use std::collections::HashSet;
use std::fmt;

use crate::*;

/// Validation error for malformed values or duplicate ids in a Project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateId { kind: &'static str, id: String },
    MissingValue { context: String },
    InvalidValue { context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateId { kind, id } => {
                write!(f, "duplicate {kind} id '{id}'")
            },
            ValidationError::MissingValue { context } => {
                write!(f, "missing value ({context})")
            },
            ValidationError::InvalidValue { context } => {
                write!(f, "invalid value ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate structural invariants of a Project.
///
/// Trigger action names are not checked here; the generator owns the trigger
/// catalog and validates them during resolution.
///
/// ```
/// use questforge_data::{ObjectiveDef, Project, QuestBlueprint, validate_project};
///
/// let project = Project {
///     name: "Demo".into(),
///     quests: vec![QuestBlueprint {
///         class_name: "FirstQuest".into(),
///         quest_id: "first_quest".into(),
///         title: "First Quest".into(),
///         objectives: vec![ObjectiveDef {
///             title: "Say hello".into(),
///             ..ObjectiveDef::default()
///         }],
///         ..QuestBlueprint::default()
///     }],
///     ..Project::default()
/// };
/// assert!(validate_project(&project).is_empty());
/// ```
pub fn validate_project(project: &Project) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if project.name.trim().is_empty() {
        errors.push(ValidationError::MissingValue {
            context: "project name".to_string(),
        });
    }

    let mut quest_ids = HashSet::new();
    let mut npc_ids = HashSet::new();
    track_ids(
        "quest",
        project.quests.iter().map(|q| q.quest_id.as_str()),
        &mut quest_ids,
        &mut errors,
    );
    track_ids(
        "npc",
        project.npcs.iter().map(|n| n.npc_id.as_str()),
        &mut npc_ids,
        &mut errors,
    );

    for (index, quest) in project.quests.iter().enumerate() {
        validate_quest(index, quest, &mut errors);
    }

    for (index, npc) in project.npcs.iter().enumerate() {
        let context = format!("npc #{} '{}'", index + 1, npc.npc_id);
        require_text(&npc.npc_id, format!("{context} id"), &mut errors);
        require_text(&npc.first_name, format!("{context} first name"), &mut errors);
        if let Some(spawn) = &npc.spawn {
            check_location(spawn, format!("{context} spawn"), &mut errors);
        }
    }

    for resource in &project.resources {
        if resource.path.as_os_str().is_empty() {
            errors.push(ValidationError::MissingValue {
                context: "resource path".to_string(),
            });
        }
    }

    errors
}

fn validate_quest(index: usize, quest: &QuestBlueprint, errors: &mut Vec<ValidationError>) {
    let context = format!("quest #{} '{}'", index + 1, quest.quest_id);
    require_text(&quest.quest_id, format!("{context} id"), errors);
    require_text(&quest.title, format!("{context} title"), errors);

    if quest.custom_icon && quest.icon_path.as_ref().is_none_or(|p| p.as_os_str().is_empty()) {
        errors.push(ValidationError::MissingValue {
            context: format!("{context} custom icon path"),
        });
    }

    for trigger in quest.start_triggers.iter().chain(&quest.finish_triggers) {
        validate_trigger_shape(trigger, &context, errors);
    }

    for (obj_index, objective) in quest.objectives.iter().enumerate() {
        let obj_context = format!("{context} objective #{}", obj_index + 1);
        require_text(&objective.title, format!("{obj_context} title"), errors);
        if objective.required_progress == 0 {
            errors.push(ValidationError::InvalidValue {
                context: format!("{obj_context} required progress must be at least 1"),
            });
        }
        if let Some(location) = &objective.location {
            check_location(location, format!("{obj_context} location"), errors);
        }
        for trigger in objective.start_triggers.iter().chain(&objective.finish_triggers) {
            validate_trigger_shape(trigger, &obj_context, errors);
        }
    }

    for reward in &quest.rewards {
        if let RewardDef::Item { item_id, quantity } = reward {
            require_text(item_id, format!("{context} reward item id"), errors);
            if *quantity == 0 {
                errors.push(ValidationError::InvalidValue {
                    context: format!("{context} reward item '{item_id}' quantity is zero"),
                });
            }
        }
    }

    let mut field_names = HashSet::new();
    for field in &quest.data_fields {
        require_text(&field.name, format!("{context} data field name"), errors);
        if !field.name.trim().is_empty() && !field_names.insert(field.name.trim().to_string()) {
            errors.push(ValidationError::DuplicateId {
                kind: "data field",
                id: field.name.clone(),
            });
        }
    }
}

fn validate_trigger_shape(trigger: &TriggerDef, context: &str, errors: &mut Vec<ValidationError>) {
    if trigger.entry_index.is_some() && trigger.quest().is_none() {
        errors.push(ValidationError::InvalidValue {
            context: format!(
                "{context} trigger '{}' has an entry index but no quest id",
                trigger.action
            ),
        });
    }
}

fn track_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
    set: &mut HashSet<String>,
    errors: &mut Vec<ValidationError>,
) {
    for id in ids {
        if id.trim().is_empty() {
            continue;
        }
        if !set.insert(id.to_string()) {
            errors.push(ValidationError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
}

fn require_text(value: &str, context: String, errors: &mut Vec<ValidationError>) {
    if value.trim().is_empty() {
        errors.push(ValidationError::MissingValue { context });
    }
}

fn check_location(location: &Location, context: String, errors: &mut Vec<ValidationError>) {
    if !location.is_finite() {
        errors.push(ValidationError::InvalidValue {
            context: format!("{context} has a non-finite coordinate"),
        });
    }
}
