//! Quest and NPC class emission.
//!
//! A class file is a header comment, the sorted using block, and one class
//! inside the project namespace. Quest bodies are assembled from the method
//! emitters in [`crate::methods`].

use std::collections::HashSet;

use log::debug;
use questforge_data::{DataFieldDef, DataFieldKind, NpcBlueprint, QuestBlueprint, RewardDef};

use crate::QUESTFORGE_VERSION;
use crate::cleanup::source_file_name;
use crate::emit::{CodeWriter, UsingSet};
use crate::escape::{comment_text, escape_xml, lit};
use crate::ident::{ensure_unique, sanitize, sanitize_namespace};
use crate::methods::{
    self, BIND_METHOD, ICON_METHOD, QuestContext, REWARD_METHOD, SUBSCRIBE_METHOD, SUBSCRIBED_FIELD, float_lit,
    vector_lit,
};
use crate::resolve::{ResolvedQuest, resolve_quest};
use crate::triggers::{TRIGGER_CATALOG, TriggerScope};

/// Sub-namespace for generated quest classes.
pub const QUEST_NAMESPACE: &str = "Quests";
/// Sub-namespace for generated NPC classes.
pub const NPC_NAMESPACE: &str = "NPCs";

/// Host API names a generated member must never shadow.
const RESERVED_MEMBERS: &[&str] = &[
    "QuestId",
    "QuestTitle",
    "Title",
    "Description",
    "AutoBegin",
    "QuestIcon",
    "QuestEntries",
    "State",
    "RequiredProgress",
    "AdvanceObjective",
    "_progress",
    "OnCreated",
    "OnLoaded",
    "OnComplete",
    "Begin",
    "Complete",
    "Fail",
    "Cancel",
    "Expire",
    "AddEntry",
    "Create",
    "Data",
    "_data",
    "Quest",
    "QuestEntry",
    "QuestState",
    "QuestManager",
    "Vector3",
    "NPC",
    "Sprite",
    "MelonLogger",
    "Assembly",
    "Money",
    "LevelManager",
    "PlayerInventory",
    "ImageUtils",
    "Exception",
    "SaveableField",
    "Serializable",
    "GetType",
    "ToString",
    "Equals",
    "GetHashCode",
];

/// Members of a generated NPC class.
const NPC_MEMBERS: &[&str] = &[
    "NpcId",
    "NpcFirstName",
    "NpcLastName",
    "Greetings",
    "ConfigurePrefab",
    "RandomGreeting",
    "Find",
    "Relationship",
];

/// Host types and namespaces the generated classes refer to by simple name.
const HOST_NAMES: &[&str] = &[
    "NPCPrefabBuilder",
    "NPCRelationship",
    "Region",
    "Random",
    "System",
    "UnityEngine",
    "MelonLoader",
    "S1API",
    "Core",
    "Constants",
];

/// One emitted class file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedClass {
    pub class_name: String,
    pub namespace: String,
    pub file_name: String,
    pub source: String,
    pub warnings: Vec<String>,
}

/// Name scope for a quest class body, pre-seeded with everything generated
/// members could collide with.
pub fn quest_member_scope(class_name: &str) -> HashSet<String> {
    let mut used: HashSet<String> = RESERVED_MEMBERS.iter().map(|s| (*s).to_string()).collect();
    used.insert(class_name.to_string());
    used.insert(data_class_name(class_name));
    for name in [BIND_METHOD, SUBSCRIBE_METHOD, REWARD_METHOD, ICON_METHOD, SUBSCRIBED_FIELD] {
        used.insert(name.to_string());
    }
    for entry in TRIGGER_CATALOG {
        used.insert(entry.declaring_type().to_string());
    }
    used
}

/// Names a generated quest or NPC class must not take, ASCII-lowercased.
///
/// A class named after its base type or a host type it calls would not
/// compile, nor would one named after one of its own members.
pub fn class_name_scope() -> HashSet<String> {
    let mut used: HashSet<String> = RESERVED_MEMBERS
        .iter()
        .chain(NPC_MEMBERS)
        .chain(HOST_NAMES)
        .map(|s| s.to_ascii_lowercase())
        .collect();
    for name in [BIND_METHOD, SUBSCRIBE_METHOD, REWARD_METHOD, ICON_METHOD, SUBSCRIBED_FIELD] {
        used.insert(name.to_ascii_lowercase());
    }
    for entry in TRIGGER_CATALOG {
        used.insert(entry.declaring_type().to_ascii_lowercase());
    }
    used
}

fn data_class_name(class_name: &str) -> String {
    format!("{class_name}Data")
}

fn header(w: &mut CodeWriter, kind: &str, id: &str) {
    w.line("// <auto-generated>");
    w.line(format!(
        "//     Generated by questforge {QUESTFORGE_VERSION} from {kind} '{}'.",
        comment_text(id)
    ));
    w.line("//     Changes to this file are overwritten on the next generation run.");
    w.line("// </auto-generated>");
}

fn summary(w: &mut CodeWriter, title: &str, description: &str) {
    w.line("/// <summary>");
    w.line(format!("/// {}", escape_xml(&comment_text(title))));
    for line in description.lines().filter(|l| !l.trim().is_empty()) {
        w.line(format!("/// {}", escape_xml(line.trim())));
    }
    w.line("/// </summary>");
}

fn namespace_of(source: &str) -> &str {
    source.rsplit_once('.').map_or(source, |(ns, _)| ns)
}

/// Using directives a quest class needs, derived from what it emits.
pub fn quest_usings(quest: &QuestBlueprint, resolved: &ResolvedQuest, has_icon: bool) -> UsingSet {
    let mut usings = UsingSet::new();
    usings.extend(["System", "MelonLoader", "S1API.Quests", "UnityEngine"]);
    for trigger in &resolved.triggers {
        usings.add(namespace_of(trigger.entry.source));
        if trigger.entry.scope() != TriggerScope::Global {
            usings.add("System.Linq");
        }
        if trigger.entry.scope() == TriggerScope::Npc {
            usings.add("S1API.Entities");
        }
    }
    for reward in &quest.rewards {
        usings.add(match reward {
            RewardDef::Money { .. } => "S1API.Money",
            RewardDef::Experience { .. } => "S1API.Leveling",
            RewardDef::Item { .. } => "S1API.Items",
        });
    }
    if has_icon {
        usings.extend(["System.Reflection", "S1API.Internal.Utils"]);
    }
    if quest.generate_data_class {
        usings.add("S1API.Saveables");
    }
    usings
}

/// Emit the full class file for a quest.
///
/// `class_name` must already be sanitized and unique within the project.
pub fn generate_quest_class(
    quest: &QuestBlueprint,
    class_name: &str,
    root_namespace: &str,
    icon_resource: Option<&str>,
) -> GeneratedClass {
    let mut used = quest_member_scope(class_name);
    let resolved = resolve_quest(quest, &mut used);
    let mut warnings = resolved.warnings.clone();
    let ctx = QuestContext {
        quest,
        resolved: &resolved,
        icon_resource,
    };
    let namespace = format!("{root_namespace}.{QUEST_NAMESPACE}");
    debug!(
        "generating quest class {namespace}.{class_name} ({} objectives, {} triggers)",
        resolved.objectives.len(),
        resolved.triggers.len()
    );

    let mut w = CodeWriter::new();
    header(&mut w, "quest", &quest.quest_id);
    w.splice(&quest_usings(quest, &resolved, icon_resource.is_some()).render());
    w.blank();
    w.open_block(format!("namespace {namespace}"));
    summary(&mut w, &quest.title, &quest.description);
    w.open_block(format!("public class {class_name} : Quest"));

    w.line(format!("public const string QuestId = \"{}\";", lit(&quest.quest_id)));
    w.line(format!("public const string QuestTitle = \"{}\";", lit(&quest.title)));
    w.blank();
    w.line("protected override string Title => QuestTitle;");
    w.line(format!("protected override string Description => \"{}\";", lit(&quest.description)));
    w.line(format!(
        "protected override bool AutoBegin => {};",
        if resolved.auto_begin { "true" } else { "false" }
    ));
    if quest.auto_begin && !resolved.auto_begin {
        w.comment("Auto-begin is overridden by the quest's start triggers.");
    }
    w.blank();

    let progress = resolved
        .objectives
        .iter()
        .map(|o| o.required_progress.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    w.line(format!("public static readonly int[] RequiredProgress = {{ {progress} }};"));
    w.blank();
    for objective in &resolved.objectives {
        w.line(format!("private QuestEntry? {};", objective.variable));
    }

    let counters: Vec<String> = if quest.generate_data_class {
        w.blank();
        emit_data_class(&mut w, quest, class_name, &resolved, &mut warnings)
            .into_iter()
            .map(|field| format!("_data.{field}"))
            .collect()
    } else {
        w.line("private readonly int[] _progress = new int[RequiredProgress.Length];");
        (0..resolved.objectives.len()).map(|i| format!("_progress[{i}]")).collect()
    };

    for body in [
        methods::generate_created(&ctx),
        methods::generate_loaded(&ctx),
        methods::generate_bind_entries(&ctx),
        methods::generate_subscribe_triggers(&ctx),
        methods::generate_reward(&ctx),
        methods::generate_icon(&ctx),
    ] {
        if body.is_empty() {
            continue;
        }
        w.blank();
        w.splice(&body);
    }

    w.blank();
    emit_advance_objective(&mut w, &resolved, &counters);
    w.blank();
    emit_quest_registration(&mut w, class_name);
    w.close_block();
    w.close_block();

    GeneratedClass {
        class_name: class_name.to_string(),
        namespace,
        file_name: source_file_name(class_name),
        source: w.finish(),
        warnings,
    }
}

/// Counted objectives: each call adds one unit of progress and the entry
/// completes once it reaches its `RequiredProgress`.
fn emit_advance_objective(w: &mut CodeWriter, resolved: &ResolvedQuest, counters: &[String]) {
    w.line("/// <summary>Record one unit of progress on the objective at <paramref name=\"index\"/>.</summary>");
    w.open_block("public void AdvanceObjective(int index)");
    w.open_block("switch (index)");
    for ((position, objective), counter) in resolved.objectives.iter().enumerate().zip(counters) {
        let v = &objective.variable;
        w.line(format!("case {position}:"));
        w.open_block(format!("if (this.{v} == null || this.{v}.State != QuestState.Active)"));
        w.line("break;");
        w.close_block();
        w.line(format!("{counter}++;"));
        w.open_block(format!("if ({counter} >= RequiredProgress[{position}])"));
        w.line(format!("this.{v}.Complete();"));
        w.close_block();
        w.line("break;");
    }
    w.line("default:");
    w.line("MelonLogger.Warning(\"Unknown objective index \" + index + \" in quest \" + QuestId);");
    w.line("break;");
    w.close_block();
    w.close_block();
}

fn emit_quest_registration(w: &mut CodeWriter, class_name: &str) {
    w.line("/// <summary>Create and register a new instance with the quest manager.</summary>");
    w.open_block(format!("public static {class_name}? Create()"));
    w.line(format!("var quest = QuestManager.CreateQuest<{class_name}>(QuestId) as {class_name};"));
    w.open_block("if (quest == null)");
    w.line("MelonLogger.Warning(\"Failed to create quest \" + QuestId);");
    w.close_block();
    w.line("return quest;");
    w.close_block();
}

/// Returns the progress field name of each objective, in objective order.
fn emit_data_class(
    w: &mut CodeWriter,
    quest: &QuestBlueprint,
    class_name: &str,
    resolved: &ResolvedQuest,
    warnings: &mut Vec<String>,
) -> Vec<String> {
    let data_class = data_class_name(class_name);
    let mut fields: HashSet<String> = [data_class.clone()].into_iter().collect();

    w.line("[Serializable]");
    w.open_block(format!("public class {data_class}"));
    for (index, field) in quest.data_fields.iter().enumerate() {
        let name = ensure_unique(&sanitize(&field.name, &format!("field{}", index + 1)), &mut fields, index + 1);
        let (ty, value) = data_field_value(field, warnings, &quest.quest_id);
        w.line(format!("public {ty} {name} = {value};"));
    }
    let mut progress = Vec::with_capacity(resolved.objectives.len());
    for objective in &resolved.objectives {
        let name = ensure_unique(&format!("{}Progress", objective.variable), &mut fields, objective.index + 1);
        w.line(format!("public int {name};"));
        progress.push(name);
    }
    w.close_block();
    w.blank();
    w.line(format!("[SaveableField(\"{data_class}\")]"));
    w.line(format!("private {data_class} _data = new {data_class}();"));
    w.blank();
    w.line(format!("public {data_class} Data => _data;"));
    progress
}

fn data_field_value(field: &DataFieldDef, warnings: &mut Vec<String>, quest_id: &str) -> (&'static str, String) {
    let raw = field.default.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let mut invalid = |kind: &str| {
        warnings.push(format!(
            "quest '{quest_id}': data field '{}' default {:?} is not a valid {kind}; using the type default",
            field.name,
            raw.unwrap_or_default()
        ));
    };
    match field.kind {
        DataFieldKind::Int => match raw.map(str::parse::<i32>) {
            None => ("int", "0".to_string()),
            Some(Ok(v)) => ("int", v.to_string()),
            Some(Err(_)) => {
                invalid("int");
                ("int", "0".to_string())
            },
        },
        DataFieldKind::Float => match raw.map(str::parse::<f32>) {
            None => ("float", "0f".to_string()),
            Some(Ok(v)) if v.is_finite() => ("float", float_lit(v)),
            Some(_) => {
                invalid("float");
                ("float", "0f".to_string())
            },
        },
        DataFieldKind::Bool => match raw.map(str::parse::<bool>) {
            None => ("bool", "false".to_string()),
            Some(Ok(v)) => ("bool", v.to_string()),
            Some(Err(_)) => {
                invalid("bool");
                ("bool", "false".to_string())
            },
        },
        DataFieldKind::Text => ("string", format!("\"{}\"", lit(field.default.as_deref().unwrap_or_default()))),
    }
}

/// Emit the full class file for an NPC.
///
/// The class lives in `<namespace>.NPCs`, where `namespace` is the NPC's own
/// namespace when it declares one and `root_namespace` otherwise.
pub fn generate_npc_class(npc: &NpcBlueprint, class_name: &str, root_namespace: &str) -> GeneratedClass {
    let base = sanitize_namespace(&npc.namespace, root_namespace);
    let namespace = format!("{base}.{NPC_NAMESPACE}");
    debug!("generating npc class {namespace}.{class_name}");

    let mut usings = UsingSet::new();
    usings.extend(["System", "System.Linq", "MelonLoader", "S1API.Entities", "UnityEngine"]);
    if npc.region.is_some() {
        usings.add("S1API.Map");
    }

    let mut w = CodeWriter::new();
    header(&mut w, "npc", &npc.npc_id);
    w.splice(&usings.render());
    w.blank();
    w.open_block(format!("namespace {namespace}"));
    let display = format!("{} {}", npc.first_name, npc.last_name);
    summary(&mut w, display.trim(), "");
    w.open_block(format!("public class {class_name} : NPC"));

    w.line(format!("public const string NpcId = \"{}\";", lit(&npc.npc_id)));
    w.line(format!("public const string NpcFirstName = \"{}\";", lit(&npc.first_name)));
    w.line(format!("public const string NpcLastName = \"{}\";", lit(&npc.last_name)));
    w.blank();
    let greetings = npc
        .greetings
        .iter()
        .map(|g| format!("\"{}\"", lit(g)))
        .collect::<Vec<_>>()
        .join(", ");
    w.line(format!("private static readonly string[] Greetings = {{ {greetings} }};"));
    w.blank();

    w.open_block("protected override void ConfigurePrefab(NPCPrefabBuilder builder)");
    w.line("builder.WithIdentity(NpcId, NpcFirstName, NpcLastName);");
    if let Some(spawn) = &npc.spawn {
        w.line(format!("builder.WithSpawnPosition({});", vector_lit(spawn)));
    }
    if let Some(region) = &npc.region {
        w.line(format!("builder.WithRegion(Region.{});", sanitize(region, "Northtown")));
    }
    if npc.is_customer {
        w.line("builder.EnsureCustomer();");
    }
    if npc.is_dealer {
        w.line("builder.EnsureDealer();");
    }
    w.close_block();
    w.blank();

    w.open_block("protected override void OnCreated()");
    w.line("base.OnCreated();");
    if npc.unlocked_by_default {
        w.line("Relationship.Unlock(NPCRelationship.UnlockType.DirectApproach, false);");
    }
    w.line("MelonLogger.Msg(\"NPC ready: \" + NpcId);");
    w.close_block();
    w.blank();

    w.open_block("public string RandomGreeting()");
    w.open_block("if (Greetings.Length == 0)");
    w.line("return string.Empty;");
    w.close_block();
    w.line("return Greetings[UnityEngine.Random.Range(0, Greetings.Length)];");
    w.close_block();
    w.blank();

    w.line("/// <summary>Find the live instance spawned by the host, if any.</summary>");
    w.line(format!("public static {class_name}? Find() => NPC.All.OfType<{class_name}>().FirstOrDefault();"));
    w.close_block();
    w.close_block();

    GeneratedClass {
        class_name: class_name.to_string(),
        namespace,
        file_name: source_file_name(class_name),
        source: w.finish(),
        warnings: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use questforge_data::{Location, ObjectiveDef, TriggerDef};

    use super::*;
    use crate::emit::normalize;
    use crate::syntax::check_syntax;

    fn quest() -> QuestBlueprint {
        QuestBlueprint {
            class_name: "Welcome".into(),
            quest_id: "welcome".into(),
            title: "Welcome <home>".into(),
            description: "First line\nSecond line".into(),
            auto_begin: true,
            objectives: vec![
                ObjectiveDef {
                    title: "Meet Kyle".into(),
                    name: "Title".into(),
                    auto_start: true,
                    ..ObjectiveDef::default()
                },
                ObjectiveDef {
                    title: "Sell".into(),
                    name: "sell".into(),
                    required_progress: 3,
                    location: Some(Location::new(0.0, 1.0, 2.0)),
                    ..ObjectiveDef::default()
                },
            ],
            ..QuestBlueprint::default()
        }
    }

    #[test]
    fn quest_class_has_header_usings_and_constants() {
        let class = generate_quest_class(&quest(), "Welcome", "My_Mod_", None);
        assert_eq!(class.file_name, "Welcome.cs");
        assert_eq!(class.namespace, "My_Mod_.Quests");
        let text = &class.source;
        assert!(text.starts_with("// <auto-generated>"));
        assert!(text.contains("using MelonLoader;\nusing S1API.Quests;\nusing System;\nusing UnityEngine;\n"));
        assert!(text.contains("namespace My_Mod_.Quests"));
        assert!(text.contains("public class Welcome : Quest"));
        assert!(text.contains("public const string QuestId = \"welcome\";"));
        assert!(text.contains("/// Welcome &lt;home&gt;"));
        assert!(text.contains("/// Second line"));
        assert!(text.contains("protected override bool AutoBegin => true;"));
        assert!(text.contains("RequiredProgress = { 1, 3 };"));
    }

    #[test]
    fn objective_fields_avoid_reserved_members() {
        let class = generate_quest_class(&quest(), "Welcome", "Mod", None);
        assert!(class.source.contains("private QuestEntry? Title_1;"));
        assert!(class.source.contains("private QuestEntry? sell;"));
        assert!(!class.source.contains("private QuestEntry? Title;"));
    }

    #[test]
    fn start_triggers_disable_auto_begin() {
        let mut q = quest();
        q.start_triggers.push(TriggerDef::new("TimeManager.OnDayPass"));
        let class = generate_quest_class(&q, "Welcome", "Mod", None);
        assert!(class.source.contains("protected override bool AutoBegin => false;"));
        assert!(class.source.contains("using S1API.GameTime;"));
    }

    #[test]
    fn methods_appear_in_lifecycle_order() {
        let class = generate_quest_class(&quest(), "Welcome", "Mod", None);
        let norm = normalize(&class.source);
        let positions: Vec<usize> = [
            "void OnCreated()",
            "void OnLoaded()",
            "void BindExistingEntries()",
            "void SubscribeTriggers()",
            "void OnComplete()",
            "public static Welcome? Create()",
        ]
        .iter()
        .map(|needle| norm.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn data_class_is_emitted_on_request() {
        let mut q = quest();
        q.generate_data_class = true;
        q.data_fields = vec![
            DataFieldDef {
                name: "Stage".into(),
                kind: DataFieldKind::Int,
                default: Some("2".into()),
            },
            DataFieldDef {
                name: "Ratio".into(),
                kind: DataFieldKind::Float,
                default: Some("lots".into()),
            },
        ];
        let class = generate_quest_class(&q, "Welcome", "Mod", None);
        let text = &class.source;
        assert!(text.contains("public class WelcomeData"));
        assert!(text.contains("public int Stage = 2;"));
        assert!(text.contains("public float Ratio = 0f;"));
        assert!(text.contains("public int sellProgress;"));
        assert!(text.contains("[SaveableField(\"WelcomeData\")]"));
        assert!(text.contains("using S1API.Saveables;"));
        assert!(class.warnings.iter().any(|w| w.contains("'Ratio'")));
    }

    #[test]
    fn counted_objectives_complete_at_required_progress() {
        let class = generate_quest_class(&quest(), "Welcome", "Mod", None);
        let norm = normalize(&class.source);
        assert!(norm.contains("private readonly int[] _progress = new int[RequiredProgress.Length];"));
        assert!(norm.contains("public void AdvanceObjective(int index)"));
        assert!(norm.contains(concat!(
            "case 1:\n",
            "if (this.sell == null || this.sell.State != QuestState.Active)\n{\nbreak;\n}\n",
            "_progress[1]++;\n",
            "if (_progress[1] >= RequiredProgress[1])\n{\nthis.sell.Complete();\n}",
        )));
        assert!(check_syntax(&class.source).is_ok());
    }

    #[test]
    fn data_class_persists_objective_progress() {
        let mut q = quest();
        q.generate_data_class = true;
        let class = generate_quest_class(&q, "Welcome", "Mod", None);
        assert!(class.source.contains("_data.sellProgress++;"));
        assert!(class.source.contains("if (_data.sellProgress >= RequiredProgress[1])"));
        assert!(!class.source.contains("_progress["));
    }

    #[test]
    fn class_name_scope_blocks_host_types_and_members() {
        let scope = class_name_scope();
        for name in ["quest", "npc", "questmanager", "questid", "npcid", "core", "npccustomer"] {
            assert!(scope.contains(name), "{name} should be reserved");
        }
        assert!(!scope.contains("firstdelivery"));
    }

    #[test]
    fn npc_namespace_overrides_root() {
        let npc = NpcBlueprint {
            class_name: "Kyle".into(),
            npc_id: "kyle".into(),
            namespace: "Other Mod".into(),
            first_name: "Kyle".into(),
            ..NpcBlueprint::default()
        };
        assert_eq!(generate_npc_class(&npc, "Kyle", "Root").namespace, "Other_Mod.NPCs");
    }

    #[test]
    fn icon_resource_adds_loader_and_usings() {
        let class = generate_quest_class(&quest(), "Welcome", "Mod", Some("Mod.Resources.icon.png"));
        assert!(class.source.contains("protected override Sprite? QuestIcon => LoadIcon();"));
        assert!(class.source.contains("using System.Reflection;"));
    }

    #[test]
    fn npc_class_configures_prefab() {
        let npc = NpcBlueprint {
            class_name: "Kyle".into(),
            npc_id: "kyle_cooley".into(),
            first_name: "Kyle".into(),
            last_name: "Cooley".into(),
            region: Some("Northtown".into()),
            spawn: Some(Location::new(1.0, 2.0, 3.0)),
            is_customer: true,
            greetings: vec!["Hey \"friend\"".into()],
            ..NpcBlueprint::default()
        };
        let class = generate_npc_class(&npc, "Kyle", "My_Mod_");
        let text = &class.source;
        assert_eq!(class.namespace, "My_Mod_.NPCs");
        assert!(text.contains("public class Kyle : NPC"));
        assert!(text.contains("builder.WithIdentity(NpcId, NpcFirstName, NpcLastName);"));
        assert!(text.contains("builder.WithSpawnPosition(new Vector3(1f, 2f, 3f));"));
        assert!(text.contains("builder.WithRegion(Region.Northtown);"));
        assert!(text.contains("builder.EnsureCustomer();"));
        assert!(!text.contains("EnsureDealer"));
        assert!(text.contains("{ \"Hey \\\"friend\\\"\" }"));
        assert!(text.contains("using S1API.Map;"));
    }
}
