//! Catalog of known host event hooks.
//!
//! The table is hand-maintained so generation never needs the game's
//! assemblies. Parameter types are recorded for generated comments and
//! handler arity only; they play no part in validation.

use questforge_data::TriggerDef;

use crate::error::TriggerError;

/// Formal parameter of a hooked event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerParam {
    pub ty: &'static str,
    pub name: &'static str,
}

/// Which kind of target a trigger must name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerScope {
    /// Static hook; no target id.
    Global,
    /// Hook on a specific NPC; needs an npc id.
    Npc,
    /// Hook on a specific quest (or one of its entries); needs a quest id.
    Quest,
}

impl TriggerScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerScope::Global => "global",
            TriggerScope::Npc => "npc",
            TriggerScope::Quest => "quest",
        }
    }
}

/// One known hook. `action` is `DeclaringType.EventName`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerCatalogEntry {
    pub action: &'static str,
    pub description: &'static str,
    pub source: &'static str,
    pub parameters: &'static [TriggerParam],
    pub requires_npc_id: bool,
    pub requires_quest_id: bool,
    /// Member path from the looked-up target to the object declaring the event.
    pub member_path: Option<&'static str>,
}

impl TriggerCatalogEntry {
    pub fn scope(&self) -> TriggerScope {
        if self.requires_npc_id {
            TriggerScope::Npc
        } else if self.requires_quest_id {
            TriggerScope::Quest
        } else {
            TriggerScope::Global
        }
    }

    pub fn declaring_type(&self) -> &'static str {
        self.action.split_once('.').map_or(self.action, |(ty, _)| ty)
    }

    pub fn event_name(&self) -> &'static str {
        self.action.rsplit_once('.').map_or(self.action, |(_, ev)| ev)
    }

    /// True when the hook lives on a quest entry rather than the quest itself.
    pub fn targets_entry(&self) -> bool {
        self.declaring_type() == "QuestEntry"
    }

    /// `Type.Event(T a, U b)` for generated comments.
    pub fn signature(&self) -> String {
        let params = self
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.ty, p.name))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({params})", self.action)
    }
}

const NO_PARAMS: &[TriggerParam] = &[];

/// The full hook table.
pub static TRIGGER_CATALOG: &[TriggerCatalogEntry] = &[
    TriggerCatalogEntry {
        action: "TimeManager.OnDayPass",
        description: "A new in-game day has started.",
        source: "S1API.GameTime.TimeManager",
        parameters: NO_PARAMS,
        requires_npc_id: false,
        requires_quest_id: false,
        member_path: None,
    },
    TriggerCatalogEntry {
        action: "TimeManager.OnWeekPass",
        description: "A new in-game week has started.",
        source: "S1API.GameTime.TimeManager",
        parameters: NO_PARAMS,
        requires_npc_id: false,
        requires_quest_id: false,
        member_path: None,
    },
    TriggerCatalogEntry {
        action: "TimeManager.OnSleepStart",
        description: "The player went to sleep.",
        source: "S1API.GameTime.TimeManager",
        parameters: NO_PARAMS,
        requires_npc_id: false,
        requires_quest_id: false,
        member_path: None,
    },
    TriggerCatalogEntry {
        action: "TimeManager.OnSleepEnd",
        description: "The player woke up.",
        source: "S1API.GameTime.TimeManager",
        parameters: NO_PARAMS,
        requires_npc_id: false,
        requires_quest_id: false,
        member_path: None,
    },
    TriggerCatalogEntry {
        action: "Player.OnDeath",
        description: "The local player died.",
        source: "S1API.Entities.Player",
        parameters: NO_PARAMS,
        requires_npc_id: false,
        requires_quest_id: false,
        member_path: None,
    },
    TriggerCatalogEntry {
        action: "NPC.OnDeath",
        description: "The NPC died.",
        source: "S1API.Entities.NPC",
        parameters: NO_PARAMS,
        requires_npc_id: true,
        requires_quest_id: false,
        member_path: None,
    },
    TriggerCatalogEntry {
        action: "NPC.OnKnockedOut",
        description: "The NPC was knocked out.",
        source: "S1API.Entities.NPC",
        parameters: NO_PARAMS,
        requires_npc_id: true,
        requires_quest_id: false,
        member_path: None,
    },
    TriggerCatalogEntry {
        action: "NPC.OnInventoryChanged",
        description: "Items were added to or removed from the NPC's inventory.",
        source: "S1API.Entities.NPC",
        parameters: NO_PARAMS,
        requires_npc_id: true,
        requires_quest_id: false,
        member_path: None,
    },
    TriggerCatalogEntry {
        action: "NPCCustomer.OnDealCompleted",
        description: "The player completed a deal with this customer.",
        source: "S1API.Entities.NPCCustomer",
        parameters: NO_PARAMS,
        requires_npc_id: true,
        requires_quest_id: false,
        member_path: Some("Customer"),
    },
    TriggerCatalogEntry {
        action: "NPCCustomer.OnUnlocked",
        description: "The customer became available to the player.",
        source: "S1API.Entities.NPCCustomer",
        parameters: NO_PARAMS,
        requires_npc_id: true,
        requires_quest_id: false,
        member_path: Some("Customer"),
    },
    TriggerCatalogEntry {
        action: "NPCDealer.OnRecruited",
        description: "The player recruited this dealer.",
        source: "S1API.Entities.NPCDealer",
        parameters: NO_PARAMS,
        requires_npc_id: true,
        requires_quest_id: false,
        member_path: Some("Dealer"),
    },
    TriggerCatalogEntry {
        action: "NPCRelationship.OnUnlocked",
        description: "The NPC's relationship was unlocked.",
        source: "S1API.Entities.NPCRelationship",
        parameters: &[TriggerParam {
            ty: "NPCRelationship.UnlockType",
            name: "unlockType",
        }],
        requires_npc_id: true,
        requires_quest_id: false,
        member_path: Some("Relationship"),
    },
    TriggerCatalogEntry {
        action: "NPCRelationship.OnChanged",
        description: "The relationship value with the NPC changed.",
        source: "S1API.Entities.NPCRelationship",
        parameters: &[TriggerParam {
            ty: "float",
            name: "delta",
        }],
        requires_npc_id: true,
        requires_quest_id: false,
        member_path: Some("Relationship"),
    },
    TriggerCatalogEntry {
        action: "Quest.OnComplete",
        description: "Another quest was completed.",
        source: "S1API.Quests.Quest",
        parameters: NO_PARAMS,
        requires_npc_id: false,
        requires_quest_id: true,
        member_path: None,
    },
    TriggerCatalogEntry {
        action: "Quest.OnFail",
        description: "Another quest failed.",
        source: "S1API.Quests.Quest",
        parameters: NO_PARAMS,
        requires_npc_id: false,
        requires_quest_id: true,
        member_path: None,
    },
    TriggerCatalogEntry {
        action: "QuestEntry.OnComplete",
        description: "An entry of another quest was completed (entry index defaults to 0).",
        source: "S1API.Quests.QuestEntry",
        parameters: NO_PARAMS,
        requires_npc_id: false,
        requires_quest_id: true,
        member_path: None,
    },
];

/// Copy of the full catalog.
pub fn available_triggers() -> Vec<TriggerCatalogEntry> {
    TRIGGER_CATALOG.to_vec()
}

/// Catalog entries usable with the given scope.
pub fn triggers_for(scope: TriggerScope) -> Vec<TriggerCatalogEntry> {
    TRIGGER_CATALOG.iter().filter(|e| e.scope() == scope).copied().collect()
}

pub fn find_trigger(action: &str) -> Option<&'static TriggerCatalogEntry> {
    let action = action.trim();
    TRIGGER_CATALOG.iter().find(|e| e.action == action)
}

/// Check a trigger against the catalog and return its entry.
///
/// # Errors
/// - `TriggerError::MissingAction` when the trigger names no action.
/// - `TriggerError::UnknownAction` when the action is not in the catalog.
/// - `TriggerError::MissingNpcId` / `MissingQuestId` when the entry needs a
///   target id the trigger does not supply.
pub fn validate_trigger(trigger: &TriggerDef) -> Result<&'static TriggerCatalogEntry, TriggerError> {
    let action = trigger.action.trim();
    if action.is_empty() {
        return Err(TriggerError::MissingAction);
    }
    let entry = find_trigger(action).ok_or_else(|| TriggerError::UnknownAction {
        action: action.to_string(),
    })?;
    if entry.requires_npc_id && trigger.npc().is_none() {
        return Err(TriggerError::MissingNpcId {
            action: action.to_string(),
        });
    }
    if entry.requires_quest_id && trigger.quest().is_none() {
        return Err(TriggerError::MissingQuestId {
            action: action.to_string(),
        });
    }
    Ok(entry)
}

pub fn is_valid(trigger: &TriggerDef) -> bool {
    validate_trigger(trigger).is_ok()
}
