use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stable identifier used across blueprint references.
pub type Id = String;

/// A full mod project as handed to the generator by the editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub quests: Vec<QuestBlueprint>,
    #[serde(default)]
    pub npcs: Vec<NpcBlueprint>,
    #[serde(default)]
    pub resources: Vec<ResourceDef>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            name: String::new(),
            author: String::new(),
            version: default_version(),
            quests: Vec::new(),
            npcs: Vec::new(),
            resources: Vec::new(),
        }
    }
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// Declarative description of one quest.
///
/// Identity fields are free user text; nothing here is guaranteed to be a
/// valid identifier.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QuestBlueprint {
    pub class_name: String,
    pub quest_id: Id,
    #[serde(default)]
    pub namespace: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub objectives: Vec<ObjectiveDef>,
    #[serde(default)]
    pub start_triggers: Vec<TriggerDef>,
    #[serde(default)]
    pub finish_triggers: Vec<TriggerDef>,
    #[serde(default)]
    pub rewards: Vec<RewardDef>,
    #[serde(default)]
    pub auto_begin: bool,
    #[serde(default)]
    pub generate_data_class: bool,
    #[serde(default)]
    pub data_fields: Vec<DataFieldDef>,
    #[serde(default)]
    pub custom_icon: bool,
    #[serde(default)]
    pub icon_path: Option<PathBuf>,
}

/// One trackable progress step within a quest. Order within the parent is significant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectiveDef {
    pub title: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_required_progress")]
    pub required_progress: u32,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default = "default_true")]
    pub create_poi: bool,
    #[serde(default)]
    pub auto_start: bool,
    #[serde(default)]
    pub start_triggers: Vec<TriggerDef>,
    #[serde(default)]
    pub finish_triggers: Vec<TriggerDef>,
}

impl Default for ObjectiveDef {
    fn default() -> Self {
        Self {
            title: String::new(),
            name: String::new(),
            required_progress: default_required_progress(),
            location: None,
            create_poi: true,
            auto_start: false,
            start_triggers: Vec::new(),
            finish_triggers: Vec::new(),
        }
    }
}

impl ObjectiveDef {
    /// True when the objective begins as soon as the quest is created.
    ///
    /// Explicit start triggers always win over the auto-start flag.
    pub fn auto_started(&self) -> bool {
        self.auto_start && self.start_triggers.is_empty()
    }
}

fn default_required_progress() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// World-space coordinate attached to an objective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Location {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Location {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Reference to one catalog hook plus the context it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TriggerDef {
    pub action: String,
    #[serde(default)]
    pub npc_id: Option<Id>,
    #[serde(default)]
    pub quest_id: Option<Id>,
    #[serde(default)]
    pub entry_index: Option<usize>,
    #[serde(default)]
    pub disposition: FinishDisposition,
}

impl TriggerDef {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn with_npc(mut self, npc_id: impl Into<String>) -> Self {
        self.npc_id = Some(npc_id.into());
        self
    }

    pub fn with_quest(mut self, quest_id: impl Into<String>, entry_index: Option<usize>) -> Self {
        self.quest_id = Some(quest_id.into());
        self.entry_index = entry_index;
        self
    }

    pub fn with_disposition(mut self, disposition: FinishDisposition) -> Self {
        self.disposition = disposition;
        self
    }

    /// The npc id, if one was supplied and is not blank.
    pub fn npc(&self) -> Option<&str> {
        self.npc_id.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// The quest id, if one was supplied and is not blank.
    pub fn quest(&self) -> Option<&str> {
        self.quest_id.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// How a finish trigger ends its quest or objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum FinishDisposition {
    #[default]
    Complete,
    Fail,
    Cancel,
    Expire,
}

/// Reward granted when the quest completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RewardDef {
    Money { amount: u32 },
    Experience { amount: u32 },
    Item { item_id: Id, quantity: u32 },
}

/// A field of the optional persisted quest data type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFieldDef {
    pub name: String,
    pub kind: DataFieldKind,
    #[serde(default)]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataFieldKind {
    Int,
    Float,
    Bool,
    Text,
}

/// Declarative description of one custom NPC.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NpcBlueprint {
    pub class_name: String,
    pub npc_id: Id,
    /// Namespace for the class; empty means the project root namespace.
    #[serde(default)]
    pub namespace: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub spawn: Option<Location>,
    #[serde(default)]
    pub is_customer: bool,
    #[serde(default)]
    pub is_dealer: bool,
    #[serde(default)]
    pub unlocked_by_default: bool,
    #[serde(default)]
    pub greetings: Vec<String>,
}

/// An asset file that is embedded into the generated mod.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDef {
    pub path: PathBuf,
}
