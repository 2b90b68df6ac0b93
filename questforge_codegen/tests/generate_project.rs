use std::fs;
use std::path::{Path, PathBuf};

use questforge_codegen::emit::normalize;
use questforge_codegen::{GeneratorConfig, MemoryFs, RealFs, generate_project};
use questforge_data::{Location, ObjectiveDef, Project, QuestBlueprint, ResourceDef, TriggerDef};

fn config(out: &Path) -> GeneratorConfig {
    GeneratorConfig {
        output_dir: out.to_path_buf(),
        copy_backoff_ms: 1,
        ..GeneratorConfig::default()
    }
}

fn plain_quest(class_name: &str) -> QuestBlueprint {
    QuestBlueprint {
        class_name: class_name.into(),
        quest_id: class_name.to_lowercase(),
        title: format!("{class_name} quest"),
        objectives: vec![ObjectiveDef {
            title: "Do the thing".into(),
            name: "thing".into(),
            auto_start: true,
            ..ObjectiveDef::default()
        }],
        ..QuestBlueprint::default()
    }
}

/// Text of one method body, from its signature up to the next signature.
fn method<'a>(source: &'a str, signature: &str, next: &str) -> &'a str {
    let start = source.find(signature).unwrap_or_else(|| panic!("missing {signature}"));
    let end = source[start..].find(next).map_or(source.len(), |i| start + i);
    &source[start..end]
}

#[test]
fn two_objective_quest_for_my_mod() {
    let tmp = tempfile::tempdir().unwrap();
    let mut meet = ObjectiveDef {
        title: "Sell to Kyle".into(),
        name: "sell".into(),
        auto_start: true,
        ..ObjectiveDef::default()
    };
    meet.start_triggers
        .push(TriggerDef::new("NPCCustomer.OnDealCompleted").with_npc("kyle_cooley"));
    let plain = ObjectiveDef {
        title: "Head home".into(),
        name: "sell".into(),
        auto_start: true,
        location: Some(Location::new(10.0, 0.5, -3.25)),
        ..ObjectiveDef::default()
    };
    let project = Project {
        name: "My Mod!".into(),
        quests: vec![QuestBlueprint {
            class_name: "My Mod!".into(),
            quest_id: "my_mod_intro".into(),
            title: "Intro".into(),
            objectives: vec![meet, plain],
            ..QuestBlueprint::default()
        }],
        ..Project::default()
    };

    let result = generate_project(&project, &config(tmp.path()), &RealFs);
    assert!(result.is_clean(), "{:?}", result.errors);

    let path = tmp.path().join("Quests").join("My_Mod_.cs");
    assert!(result.generated_files.contains(&path));
    let source = fs::read_to_string(&path).unwrap();
    assert!(source.contains("namespace My_Mod_.Quests"));
    assert!(source.contains("public class My_Mod_ : Quest"));
    assert!(source.contains("private QuestEntry? sell;"));
    assert!(source.contains("private QuestEntry? sell_1;"));

    let created = normalize(method(&source, "void OnCreated()", "void OnLoaded()"));
    assert!(!created.contains("sell.Begin();"));
    assert!(created.contains("sell_1.Begin();"));

    let loaded = method(&source, "void OnLoaded()", "void BindExistingEntries()");
    assert!(!loaded.contains("Begin("));
    assert!(!loaded.contains("SetState("));
    assert!(loaded.contains("sell_1.POIPosition = new Vector3(10f, 0.5f, -3.25f);"));

    let subscribe = method(&source, "void SubscribeTriggers()", "void OnComplete()");
    assert!(subscribe.contains("n.ID == \"kyle_cooley\""));
    assert!(subscribe.contains("this.sell.Begin();"));

    for name in ["My_Mod_.csproj", "My_Mod_.sln", "Constants.cs", "Core.cs"] {
        assert!(tmp.path().join(name).is_file(), "missing {name}");
    }
}

#[test]
fn regeneration_removes_stale_files_and_keeps_unchanged_ones() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = config(tmp.path());
    let both = Project {
        name: "Cleanup".into(),
        quests: vec![plain_quest("Foo"), plain_quest("Bar")],
        ..Project::default()
    };
    let first = generate_project(&both, &cfg, &RealFs);
    assert!(first.is_clean(), "{:?}", first.errors);

    let foo = tmp.path().join("Quests/Foo.cs");
    let bar = tmp.path().join("Quests/Bar.cs");
    let bar_mtime = fs::metadata(&bar).unwrap().modified().unwrap();

    let only_bar = Project {
        quests: vec![plain_quest("Bar")],
        ..both
    };
    let second = generate_project(&only_bar, &cfg, &RealFs);
    assert!(second.success);
    assert!(!foo.exists());
    assert!(second
        .warnings
        .iter()
        .any(|w| w.contains("removed stale file") && w.contains("Foo.cs")));
    assert!(bar.is_file());
    assert_eq!(fs::metadata(&bar).unwrap().modified().unwrap(), bar_mtime);
    assert!(second.generated_files.contains(&bar));

    let third = generate_project(&only_bar, &cfg, &RealFs);
    assert!(third.warnings.iter().all(|w| !w.contains("removed stale file")));
}

#[test]
fn quest_icon_is_copied_and_embedded() {
    let tmp = tempfile::tempdir().unwrap();
    let art = tmp.path().join("art");
    fs::create_dir_all(&art).unwrap();
    fs::write(art.join("Quest Icon.png"), [0x89, b'P', b'N', b'G']).unwrap();

    let mut quest = plain_quest("Iconic");
    quest.custom_icon = true;
    quest.icon_path = Some(art.join("Quest Icon.png"));
    let project = Project {
        name: "Icons".into(),
        quests: vec![quest],
        ..Project::default()
    };
    let out = tmp.path().join("out");
    let result = generate_project(&project, &config(&out), &RealFs);
    assert!(result.is_clean(), "{:?}", result.errors);

    assert!(out.join("Resources/Quest_Icon.png").is_file());
    let csproj = fs::read_to_string(out.join("Icons.csproj")).unwrap();
    assert!(csproj.contains("LogicalName=\"Icons.Resources.Quest_Icon.png\""));
    let class = fs::read_to_string(out.join("Quests/Iconic.cs")).unwrap();
    assert!(class.contains("GetManifestResourceStream(\"Icons.Resources.Quest_Icon.png\")"));

    let again = generate_project(&project, &config(&out), &RealFs);
    assert!(again.warnings.iter().any(|w| w.contains("already up to date")));
}

#[test]
fn locked_resource_fails_alone() {
    let fs = MemoryFs::new();
    fs.insert("art/a.png", vec![1]);
    fs.insert("art/b.png", vec![2]);
    fs.fail_copies_to("out/Resources/a.png", 99);
    let project = Project {
        name: "Locked".into(),
        quests: vec![plain_quest("Only")],
        resources: vec![
            ResourceDef {
                path: PathBuf::from("art/a.png"),
            },
            ResourceDef {
                path: PathBuf::from("art/b.png"),
            },
        ],
        ..Project::default()
    };
    let result = generate_project(&project, &config(Path::new("out")), &fs);
    assert!(result.success);
    assert_eq!(result.errors.len(), 1, "{:?}", result.errors);
    assert!(result.errors[0].contains("a.png"));
    assert_eq!(fs.sleeps().len(), 2);
    assert!(fs.text(Path::new("out/Quests/Only.cs")).is_some());
    assert!(fs.contents(Path::new("out/Resources/b.png")).is_some());
}

#[test]
fn zero_objective_quest_still_generates() {
    let tmp = tempfile::tempdir().unwrap();
    let mut quest = plain_quest("Empty");
    quest.objectives.clear();
    let project = Project {
        name: "Placeholder".into(),
        quests: vec![quest],
        ..Project::default()
    };
    let result = generate_project(&project, &config(tmp.path()), &RealFs);
    assert!(result.is_clean(), "{:?}", result.errors);
    assert!(result.warnings.iter().any(|w| w.contains("placeholder")));
    let source = fs::read_to_string(tmp.path().join("Quests/Empty.cs")).unwrap();
    assert!(source.contains("objective1 = AddEntry(\"Complete the task\");"));
    assert!(source.contains("objective1.Begin();"));
}
