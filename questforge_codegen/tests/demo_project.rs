use std::fs;

use questforge_codegen::emit::normalize;
use questforge_codegen::{GeneratorConfig, RealFs, check_project, generate_project};
use questforge_data::Project;

const DEMO: &str = include_str!("../../demos/first_quest.ron");

fn demo() -> Project {
    ron::from_str(DEMO).expect("demo project parses")
}

#[test]
fn demo_project_checks_clean() {
    let report = check_project(&demo());
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
}

#[test]
fn demo_project_generates() {
    let tmp = tempfile::tempdir().unwrap();
    let config = GeneratorConfig {
        output_dir: tmp.path().to_path_buf(),
        ..GeneratorConfig::default()
    };
    let result = generate_project(&demo(), &config, &RealFs);
    assert!(result.is_clean(), "{:?}", result.errors);

    let quest = fs::read_to_string(tmp.path().join("Quests/FirstDelivery.cs")).unwrap();
    let norm = normalize(&quest);
    assert!(norm.contains("namespace NorthtownStarter.Quests"));
    assert!(norm.contains("protected override bool AutoBegin => true;"));
    assert!(norm.contains("meetKyle.Begin();"));
    assert!(norm.contains("// sellSample: activation deferred to trigger"));
    assert!(norm.contains("public int DeliveriesMade = 0;"));
    assert!(norm.contains("public float Tip = 2.5f;"));
    assert!(norm.contains("Money.ChangeCashBalance(250f);\nLevelManager.AddXP(40);"));
    assert!(norm.contains("if (_npc1 != null)"));
    assert!(norm.contains("_npc1.OnDeath += () =>"));
    assert!(norm.contains("this.sellSample.Complete();"));

    let npc = fs::read_to_string(tmp.path().join("NPCs/KyleCooley.cs")).unwrap();
    assert!(npc.contains("public class KyleCooley : NPC"));
    assert!(npc.contains("builder.EnsureCustomer();"));

    let core = fs::read_to_string(tmp.path().join("Core.cs")).unwrap();
    assert!(core.contains("global::NorthtownStarter.Quests.FirstDelivery.Create()"));
    assert!(tmp.path().join("NorthtownStarter.sln").is_file());
}
