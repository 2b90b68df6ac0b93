//! Quest lifecycle method emission.
//!
//! Every function here is pure text production over an already resolved
//! quest. Nothing is validated at this stage; `resolve::resolve_quest` has
//! already dropped anything that could not be emitted.
//!
//! The creation path (`OnCreated`) sets objective state. The reload path
//! (`OnLoaded`) recreates entries but never touches their state, because the
//! host restores state from the save after this code runs.

use questforge_data::{FinishDisposition, Location, QuestBlueprint, RewardDef};

use crate::emit::CodeWriter;
use crate::escape::lit;
use crate::resolve::{ResolvedObjective, ResolvedQuest, ResolvedTrigger, TriggerEffect};
use crate::triggers::TriggerScope;

/// Name of the generated method holding every trigger subscription.
pub const SUBSCRIBE_METHOD: &str = "SubscribeTriggers";
/// Name of the generated method re-binding fields to restored entries.
pub const BIND_METHOD: &str = "BindExistingEntries";
/// Name of the generated reward method.
pub const REWARD_METHOD: &str = "GiveRewards";
/// Name of the generated icon loader.
pub const ICON_METHOD: &str = "LoadIcon";
/// Field guarding against duplicate subscriptions.
pub const SUBSCRIBED_FIELD: &str = "_triggersSubscribed";

/// Inputs shared by the method emitters for one quest.
#[derive(Debug, Clone, Copy)]
pub struct QuestContext<'a> {
    pub quest: &'a QuestBlueprint,
    pub resolved: &'a ResolvedQuest,
    /// Manifest resource name of the embedded icon, when the quest has one.
    pub icon_resource: Option<&'a str>,
}

/// C# float literal for a finite coordinate.
pub fn float_lit(value: f32) -> String {
    format!("{value}f")
}

pub fn vector_lit(location: &Location) -> String {
    format!(
        "new Vector3({}, {}, {})",
        float_lit(location.x),
        float_lit(location.y),
        float_lit(location.z)
    )
}

fn add_entry_call(objective: &ResolvedObjective, poi: Option<&Location>) -> String {
    match poi {
        Some(loc) => format!(
            "{} = AddEntry(\"{}\", {});",
            objective.variable,
            lit(&objective.title),
            vector_lit(loc)
        ),
        None => format!("{} = AddEntry(\"{}\");", objective.variable, lit(&objective.title)),
    }
}

/// `OnCreated`: first-creation setup.
///
/// A quest restored from a save already has entries by the time this runs;
/// the guard keeps those and only re-binds and re-subscribes.
pub fn generate_created(ctx: &QuestContext<'_>) -> String {
    let mut w = CodeWriter::new();
    w.open_block("protected override void OnCreated()");
    w.line("base.OnCreated();");
    w.open_block("if (QuestEntries.Count > 0)");
    w.comment("Entries were restored from a save before this ran; keep them.");
    w.line(format!("{BIND_METHOD}();"));
    w.line(format!("{SUBSCRIBE_METHOD}();"));
    w.line("return;");
    w.close_block();
    w.blank();

    for objective in &ctx.resolved.objectives {
        w.line(add_entry_call(objective, objective.poi.as_ref()));
        if objective.initial_state.is_active() {
            w.line(format!("{}.Begin();", objective.variable));
        } else if let Some(note) = objective.initial_state.note() {
            w.comment(format!("{}: {note}", objective.variable));
        }
    }

    w.blank();
    w.line(format!("{SUBSCRIBE_METHOD}();"));
    w.close_block();
    w.finish()
}

/// `OnLoaded`: post-reload rebuild.
///
/// Entries are only recreated when the collection is empty. No state is ever
/// set here.
pub fn generate_loaded(ctx: &QuestContext<'_>) -> String {
    let mut w = CodeWriter::new();
    w.open_block("protected override void OnLoaded()");
    w.line("base.OnLoaded();");
    w.open_block("if (QuestEntries.Count == 0)");
    w.comment("The save cleared our entries; recreate them so saved state can be applied.");
    for objective in &ctx.resolved.objectives {
        w.line(add_entry_call(objective, None));
        if let Some(location) = &objective.rebuild.reapply_location {
            w.line(format!("{}.POIPosition = {};", objective.variable, vector_lit(location)));
        }
    }
    w.line(format!("{SUBSCRIBE_METHOD}();"));
    w.close_block();
    w.close_block();
    w.finish()
}

/// Re-attach objective fields to restored entries by index.
pub fn generate_bind_entries(ctx: &QuestContext<'_>) -> String {
    let mut w = CodeWriter::new();
    w.open_block(format!("private void {BIND_METHOD}()"));
    for objective in &ctx.resolved.objectives {
        w.line(format!(
            "{} = QuestEntries.Count > {idx} ? QuestEntries[{idx}] : null;",
            objective.variable,
            idx = objective.index
        ));
    }
    w.close_block();
    w.finish()
}

/// Reward hook: a completion override that grants every configured reward.
pub fn generate_reward(ctx: &QuestContext<'_>) -> String {
    let mut w = CodeWriter::new();
    w.open_block("protected override void OnComplete()");
    w.line("base.OnComplete();");
    w.line(format!("{REWARD_METHOD}();"));
    w.close_block();
    w.blank();
    w.open_block(format!("private void {REWARD_METHOD}()"));
    if ctx.quest.rewards.is_empty() {
        w.comment("No rewards configured.");
    }
    for reward in &ctx.quest.rewards {
        match reward {
            RewardDef::Money { amount } => {
                w.line(format!("Money.ChangeCashBalance({amount}f);"));
            },
            RewardDef::Experience { amount } => {
                w.line(format!("LevelManager.AddXP({amount});"));
            },
            RewardDef::Item { item_id, quantity } => {
                w.line(format!(
                    "PlayerInventory.AddItem(\"{}\", {quantity});",
                    lit(item_id)
                ));
            },
        }
    }
    w.line(format!(
        "MelonLogger.Msg(\"Rewards granted for {}\");",
        lit(&ctx.quest.title)
    ));
    w.close_block();
    w.finish()
}

/// Icon loading from an embedded resource, with a `null` fallback on any failure.
///
/// Quests without a custom icon get no override and use the host default.
pub fn generate_icon(ctx: &QuestContext<'_>) -> String {
    let Some(resource) = ctx.icon_resource else {
        return String::new();
    };
    let resource = lit(resource);

    let mut w = CodeWriter::new();
    w.line(format!("protected override Sprite? QuestIcon => {ICON_METHOD}();"));
    w.blank();
    w.open_block(format!("private static Sprite? {ICON_METHOD}()"));
    w.open_block("try");
    w.line(format!(
        "using var stream = Assembly.GetExecutingAssembly().GetManifestResourceStream(\"{resource}\");"
    ));
    w.open_block("if (stream == null)");
    w.line(format!("MelonLogger.Warning(\"Icon resource not found: {resource}\");"));
    w.line("return null;");
    w.close_block();
    w.line("var data = new byte[stream.Length];");
    w.line("var read = 0;");
    w.open_block("while (read < data.Length)");
    w.line("var count = stream.Read(data, read, data.Length - read);");
    w.open_block("if (count <= 0)");
    w.line("break;");
    w.close_block();
    w.line("read += count;");
    w.close_block();
    w.line("return ImageUtils.LoadImageRaw(data);");
    w.close_block();
    w.open_block("catch (Exception ex)");
    w.line(format!(
        "MelonLogger.Warning(\"Failed to load icon {resource}: \" + ex.Message);"
    ));
    w.line("return null;");
    w.close_block();
    w.close_block();
    w.finish()
}

/// Every trigger subscription for the quest, guarded so it only runs once.
pub fn generate_subscribe_triggers(ctx: &QuestContext<'_>) -> String {
    let mut w = CodeWriter::new();
    w.line(format!("private bool {SUBSCRIBED_FIELD};"));
    w.blank();
    w.open_block(format!("private void {SUBSCRIBE_METHOD}()"));
    w.open_block(format!("if ({SUBSCRIBED_FIELD})"));
    w.line("return;");
    w.close_block();
    w.line(format!("{SUBSCRIBED_FIELD} = true;"));
    if ctx.resolved.triggers.is_empty() {
        w.comment("No triggers configured.");
    }
    for (n, trigger) in ctx.resolved.triggers.iter().enumerate() {
        w.blank();
        emit_subscription(&mut w, ctx, trigger, n + 1);
    }
    w.close_block();
    w.finish()
}

fn handler_params(trigger: &ResolvedTrigger) -> String {
    match trigger.entry.parameters.len() {
        0 => "()".to_string(),
        1 => "_".to_string(),
        n => format!("({})", vec!["_"; n].join(", ")),
    }
}

fn emit_subscription(w: &mut CodeWriter, ctx: &QuestContext<'_>, trigger: &ResolvedTrigger, n: usize) {
    let entry = trigger.entry;
    w.comment(format!("{} - {}", entry.signature(), entry.description));
    let event = entry.event_name();
    let params = handler_params(trigger);

    let subject = match entry.scope() {
        TriggerScope::Global => None,
        TriggerScope::Npc => {
            let local = format!("_npc{n}");
            let npc_id = lit(trigger.def.npc().unwrap_or_default());
            w.line(format!("var {local} = NPC.All.FirstOrDefault(n => n.ID == \"{npc_id}\");"));
            let target = match entry.member_path {
                Some(path) => format!("{local}.{path}"),
                None => local.clone(),
            };
            let guard = match entry.member_path {
                Some(path) => format!("{local}?.{path} != null"),
                None => format!("{local} != null"),
            };
            Some((guard, target))
        },
        TriggerScope::Quest => {
            let quest_id = lit(trigger.def.quest().unwrap_or_default());
            let local = if entry.targets_entry() {
                let local = format!("_entry{n}");
                let index = trigger.def.entry_index.unwrap_or(0);
                w.line(format!(
                    "var {local} = QuestManager.GetQuestById(\"{quest_id}\")?.QuestEntries.ElementAtOrDefault({index});"
                ));
                local
            } else {
                let local = format!("_quest{n}");
                w.line(format!("var {local} = QuestManager.GetQuestById(\"{quest_id}\");"));
                local
            };
            Some((format!("{local} != null"), local))
        },
    };

    match subject {
        None => {
            let hook = format!("{}.{event} += {params} =>", entry.declaring_type());
            emit_handler(w, ctx, trigger, &hook);
        },
        Some((guard, target)) => {
            w.open_block(format!("if ({guard})"));
            emit_handler(w, ctx, trigger, &format!("{target}.{event} += {params} =>"));
            w.close_block();
        },
    }
}

fn emit_handler(w: &mut CodeWriter, ctx: &QuestContext<'_>, trigger: &ResolvedTrigger, hook: &str) {
    w.open_block(hook);
    match trigger.effect {
        TriggerEffect::BeginQuest => {
            w.open_block("if (State == QuestState.Inactive)");
            w.line("Begin();");
            w.close_block();
        },
        TriggerEffect::EndQuest(disposition) => {
            w.open_block("if (State == QuestState.Active)");
            w.line(format!("{}();", quest_finish_call(disposition)));
            w.close_block();
        },
        TriggerEffect::BeginObjective(index) => {
            if let Some(objective) = ctx.resolved.objective(index) {
                let v = &objective.variable;
                w.open_block(format!(
                    "if (this.{v} != null && this.{v}.State == QuestState.Inactive)"
                ));
                w.line(format!("this.{v}.Begin();"));
                w.close_block();
            }
        },
        TriggerEffect::EndObjective(index, disposition) => {
            if let Some(objective) = ctx.resolved.objective(index) {
                let v = &objective.variable;
                w.open_block(format!(
                    "if (this.{v} != null && this.{v}.State == QuestState.Active)"
                ));
                match disposition {
                    FinishDisposition::Complete => w.line(format!("this.{v}.Complete();")),
                    other => w.line(format!("this.{v}.SetState({});", entry_terminal_state(other))),
                };
                w.close_block();
            }
        },
    }
    w.close_block_with(";");
}

fn quest_finish_call(disposition: FinishDisposition) -> &'static str {
    match disposition {
        FinishDisposition::Complete => "Complete",
        FinishDisposition::Fail => "Fail",
        FinishDisposition::Cancel => "Cancel",
        FinishDisposition::Expire => "Expire",
    }
}

fn entry_terminal_state(disposition: FinishDisposition) -> &'static str {
    match disposition {
        FinishDisposition::Complete => "QuestState.Completed",
        FinishDisposition::Fail => "QuestState.Failed",
        FinishDisposition::Cancel => "QuestState.Cancelled",
        FinishDisposition::Expire => "QuestState.Expired",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use questforge_data::{ObjectiveDef, TriggerDef};

    use super::*;
    use crate::emit::normalize;
    use crate::resolve::resolve_quest;

    fn quest() -> QuestBlueprint {
        let mut talk = ObjectiveDef {
            title: "Talk to \"Kyle\"".into(),
            name: "talk".into(),
            auto_start: true,
            ..ObjectiveDef::default()
        };
        talk.start_triggers
            .push(TriggerDef::new("NPCCustomer.OnDealCompleted").with_npc("kyle"));
        let deliver = ObjectiveDef {
            title: "Deliver".into(),
            name: "deliver".into(),
            auto_start: true,
            location: Some(Location::new(1.5, -2.0, 30.0)),
            ..ObjectiveDef::default()
        };
        QuestBlueprint {
            class_name: "Demo".into(),
            quest_id: "demo".into(),
            title: "Demo".into(),
            objectives: vec![deliver, talk],
            finish_triggers: vec![TriggerDef::new("Player.OnDeath").with_disposition(FinishDisposition::Fail)],
            rewards: vec![
                RewardDef::Money { amount: 250 },
                RewardDef::Item {
                    item_id: "ogkush".into(),
                    quantity: 2,
                },
            ],
            ..QuestBlueprint::default()
        }
    }

    fn with_ctx<R>(quest: &QuestBlueprint, icon: Option<&str>, f: impl FnOnce(&QuestContext<'_>) -> R) -> R {
        let resolved = resolve_quest(quest, &mut HashSet::new());
        let ctx = QuestContext {
            quest,
            resolved: &resolved,
            icon_resource: icon,
        };
        f(&ctx)
    }

    #[test]
    fn created_guards_restored_entries_first() {
        let text = with_ctx(&quest(), None, generate_created);
        let norm = normalize(&text);
        let guard = norm.find("if (QuestEntries.Count > 0)").expect("guard");
        let first_add = norm.find("AddEntry(").expect("add entry");
        assert!(guard < first_add);
        assert!(norm.contains("BindExistingEntries();\nSubscribeTriggers();\nreturn;"));
    }

    #[test]
    fn created_applies_initial_state_in_order() {
        let text = with_ctx(&quest(), None, generate_created);
        let norm = normalize(&text);
        assert!(norm.contains("deliver = AddEntry(\"Deliver\", new Vector3(1.5f, -2f, 30f));\ndeliver.Begin();"));
        assert!(norm.contains("talk = AddEntry(\"Talk to \\\"Kyle\\\"\");\n// talk: activation deferred to trigger"));
        assert!(!norm.contains("talk.Begin();"));
        assert!(norm.trim_end().ends_with("SubscribeTriggers();\n}"));
    }

    #[test]
    fn loaded_never_sets_state() {
        let text = with_ctx(&quest(), None, generate_loaded);
        assert!(!text.contains("Begin("));
        assert!(!text.contains("SetState("));
        assert!(!text.contains("Complete("));
        assert!(text.contains("if (QuestEntries.Count == 0)"));
        assert!(text.contains("deliver = AddEntry(\"Deliver\");"));
        assert!(text.contains("deliver.POIPosition = new Vector3(1.5f, -2f, 30f);"));
        assert!(text.contains("talk = AddEntry("));
    }

    #[test]
    fn bind_entries_uses_objective_order() {
        let text = with_ctx(&quest(), None, generate_bind_entries);
        let norm = normalize(&text);
        assert!(norm.contains("deliver = QuestEntries.Count > 0 ? QuestEntries[0] : null;"));
        assert!(norm.contains("talk = QuestEntries.Count > 1 ? QuestEntries[1] : null;"));
    }

    #[test]
    fn subscriptions_cover_npc_and_global_hooks() {
        let text = with_ctx(&quest(), None, generate_subscribe_triggers);
        let norm = normalize(&text);
        assert!(norm.contains("var _npc2 = NPC.All.FirstOrDefault(n => n.ID == \"kyle\");"));
        assert!(norm.contains("if (_npc2?.Customer != null)"));
        assert!(norm.contains("_npc2.Customer.OnDealCompleted += () =>"));
        assert!(norm.contains("this.talk.Begin();"));
        assert!(norm.contains("Player.OnDeath += () =>"));
        assert!(norm.contains("Fail();"));
        assert_eq!(norm.matches("};").count(), 2);
    }

    #[test]
    fn quest_entry_hooks_default_to_first_entry() {
        let mut q = quest();
        q.objectives[0]
            .finish_triggers
            .push(TriggerDef::new("QuestEntry.OnComplete").with_quest("intro", None));
        let text = with_ctx(&q, None, generate_subscribe_triggers);
        assert!(text.contains("QuestManager.GetQuestById(\"intro\")?.QuestEntries.ElementAtOrDefault(0);"));
        assert!(text.contains("this.deliver.Complete();"));
    }

    #[test]
    fn handler_arity_follows_catalog_parameters() {
        let mut q = quest();
        q.start_triggers
            .push(TriggerDef::new("NPCRelationship.OnChanged").with_npc("kyle"));
        let text = with_ctx(&q, None, generate_subscribe_triggers);
        assert!(text.contains("Relationship.OnChanged += _ =>"));
    }

    #[test]
    fn rewards_are_emitted_in_order() {
        let text = with_ctx(&quest(), None, generate_reward);
        let norm = normalize(&text);
        assert!(norm.contains("Money.ChangeCashBalance(250f);\nPlayerInventory.AddItem(\"ogkush\", 2);"));
        assert!(norm.contains("protected override void OnComplete()"));
    }

    #[test]
    fn icon_is_omitted_without_resource() {
        assert!(with_ctx(&quest(), None, generate_icon).is_empty());
    }

    #[test]
    fn icon_reads_embedded_resource_with_null_fallback() {
        let text = with_ctx(&quest(), Some("My_Mod_.Resources.demo_icon.png"), generate_icon);
        assert!(text.contains("GetManifestResourceStream(\"My_Mod_.Resources.demo_icon.png\")"));
        assert!(text.contains("catch (Exception ex)"));
        assert_eq!(text.matches("return null;").count(), 2);
    }

    #[test]
    fn float_literals_are_csharp_floats() {
        assert_eq!(float_lit(1.0), "1f");
        assert_eq!(float_lit(-0.25), "-0.25f");
    }
}
