//! Project-level files: build descriptor, solution, constants and bootstrap.
//!
//! These are fixed templates with substitutions. The only conditionals are
//! whether there are quests, resources, or a custom reference path.

use std::fmt::Write as _;

use questforge_data::Project;
use uuid::Uuid;

use crate::QUESTFORGE_VERSION;
use crate::config::GeneratorConfig;
use crate::emit::{CodeWriter, UsingSet};
use crate::escape::{escape_xml, lit};

/// Namespace for solution and project GUIDs.
pub const NAMESPACE_SOLUTION: Uuid = uuid::uuid!("5b0c1f6e-8d4a-5a57-9c1e-3f6a2b7d9e40");

/// Visual Studio project type for SDK-style C# projects.
const CSHARP_PROJECT_TYPE: &str = "9A19103F-16F7-4668-BE54-9A1E7A4F7556";

pub const CONSTANTS_FILE: &str = "Constants.cs";
pub const BOOTSTRAP_FILE: &str = "Core.cs";

/// A generated class as the scaffold sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRef {
    pub class_name: String,
    pub namespace: String,
    pub id: String,
    pub auto_begin: bool,
}

/// One embedded resource entry of the build descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedResource {
    /// Path relative to the project directory.
    pub include: String,
    pub logical_name: String,
}

/// Everything the scaffold templates draw from.
#[derive(Debug, Clone, Copy)]
pub struct ScaffoldInput<'a> {
    pub project: &'a Project,
    pub config: &'a GeneratorConfig,
    pub root_namespace: &'a str,
    pub quests: &'a [ClassRef],
    pub npcs: &'a [ClassRef],
    pub resources: &'a [EmbeddedResource],
}

/// A project-level file, named relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldFile {
    pub file_name: String,
    pub contents: String,
}

impl ScaffoldInput<'_> {
    fn assembly_name(&self) -> &str {
        self.root_namespace
    }

    pub fn project_file_name(&self) -> String {
        format!("{}.csproj", self.assembly_name())
    }

    pub fn solution_file_name(&self) -> String {
        format!("{}.sln", self.assembly_name())
    }
}

/// Stable GUID for a name, braced and upper-case as solution files expect.
pub fn solution_guid(kind: &str, name: &str) -> String {
    let id = Uuid::new_v5(&NAMESPACE_SOLUTION, format!("{kind}:{name}").as_bytes());
    id.hyphenated().to_string().to_ascii_uppercase()
}

/// The `.csproj` build descriptor.
pub fn generate_csproj(input: &ScaffoldInput<'_>) -> String {
    let cfg = input.config;
    let project = input.project;
    let mut out = String::new();
    let _ = writeln!(out, "<Project Sdk=\"Microsoft.NET.Sdk\">");
    let _ = writeln!(out, "  <!-- Generated by questforge {QUESTFORGE_VERSION}. -->");
    let _ = writeln!(out, "  <PropertyGroup>");
    let prop = |out: &mut String, name: &str, value: &str| {
        let _ = writeln!(out, "    <{name}>{}</{name}>", escape_xml(value));
    };
    prop(&mut out, "TargetFramework", &cfg.target_framework);
    prop(&mut out, "LangVersion", &cfg.lang_version);
    prop(&mut out, "Nullable", "enable");
    prop(&mut out, "RootNamespace", input.root_namespace);
    prop(&mut out, "AssemblyName", input.assembly_name());
    prop(&mut out, "Version", &project.version);
    if !project.author.trim().is_empty() {
        prop(&mut out, "Authors", &project.author);
    }
    prop(&mut out, "GameDir", &cfg.game_dir.display().to_string());
    prop(&mut out, "GameReferences", &cfg.reference_dir().display().to_string());
    let _ = writeln!(out, "  </PropertyGroup>");
    if cfg.uses_custom_reference_path() {
        let _ = writeln!(out, "  <!-- Reference assemblies come from a custom path. -->");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "  <ItemGroup>");
    for (name, hint) in [
        ("MelonLoader", "$(GameDir)\\MelonLoader\\net6\\MelonLoader.dll"),
        ("S1API", "$(GameDir)\\Mods\\S1API.dll"),
        ("Assembly-CSharp", "$(GameReferences)\\Assembly-CSharp.dll"),
        ("UnityEngine.CoreModule", "$(GameReferences)\\UnityEngine.CoreModule.dll"),
    ] {
        let _ = writeln!(out, "    <Reference Include=\"{name}\">");
        let _ = writeln!(out, "      <HintPath>{hint}</HintPath>");
        let _ = writeln!(out, "      <Private>False</Private>");
        let _ = writeln!(out, "    </Reference>");
    }
    let _ = writeln!(out, "  </ItemGroup>");

    if !input.resources.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  <ItemGroup>");
        for resource in input.resources {
            let _ = writeln!(
                out,
                "    <EmbeddedResource Include=\"{}\" LogicalName=\"{}\" />",
                escape_xml(&resource.include),
                escape_xml(&resource.logical_name)
            );
        }
        let _ = writeln!(out, "  </ItemGroup>");
    }
    let _ = writeln!(out, "</Project>");
    out
}

/// The `.sln` solution file. GUIDs derive from the assembly name, so
/// regenerating produces the same file.
pub fn generate_solution(input: &ScaffoldInput<'_>) -> String {
    let name = input.assembly_name();
    let project_guid = solution_guid("project", name);
    let solution_guid = solution_guid("solution", name);
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "Microsoft Visual Studio Solution File, Format Version 12.00");
    let _ = writeln!(out, "# Visual Studio Version 17");
    let _ = writeln!(out, "VisualStudioVersion = 17.0.31903.59");
    let _ = writeln!(out, "MinimumVisualStudioVersion = 10.0.40219.1");
    let _ = writeln!(
        out,
        "Project(\"{{{CSHARP_PROJECT_TYPE}}}\") = \"{name}\", \"{}\", \"{{{project_guid}}}\"",
        input.project_file_name()
    );
    let _ = writeln!(out, "EndProject");
    let _ = writeln!(out, "Global");
    let _ = writeln!(out, "\tGlobalSection(SolutionConfigurationPlatforms) = preSolution");
    for config in ["Debug", "Release"] {
        let _ = writeln!(out, "\t\t{config}|Any CPU = {config}|Any CPU");
    }
    let _ = writeln!(out, "\tEndGlobalSection");
    let _ = writeln!(out, "\tGlobalSection(ProjectConfigurationPlatforms) = postSolution");
    for config in ["Debug", "Release"] {
        let _ = writeln!(out, "\t\t{{{project_guid}}}.{config}|Any CPU.ActiveCfg = {config}|Any CPU");
        let _ = writeln!(out, "\t\t{{{project_guid}}}.{config}|Any CPU.Build.0 = {config}|Any CPU");
    }
    let _ = writeln!(out, "\tEndGlobalSection");
    let _ = writeln!(out, "\tGlobalSection(ExtensibleGlobals) = postSolution");
    let _ = writeln!(out, "\t\tSolutionGuid = {{{solution_guid}}}");
    let _ = writeln!(out, "\tEndGlobalSection");
    let _ = writeln!(out, "EndGlobal");
    out
}

fn header(w: &mut CodeWriter) {
    w.line("// <auto-generated>");
    w.line(format!("//     Generated by questforge {QUESTFORGE_VERSION}."));
    w.line("//     Changes to this file are overwritten on the next generation run.");
    w.line("// </auto-generated>");
}

/// `Constants.cs`: mod metadata and the ids of every generated quest and NPC.
pub fn generate_constants(input: &ScaffoldInput<'_>) -> String {
    let project = input.project;
    let cfg = input.config;
    let ids = |refs: &[ClassRef]| {
        refs.iter()
            .map(|r| format!("\"{}\"", lit(&r.id)))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut w = CodeWriter::new();
    header(&mut w);
    w.blank();
    w.open_block(format!("namespace {}", input.root_namespace));
    w.open_block("public static class Constants");
    w.line(format!("public const string ModName = \"{}\";", lit(&project.name)));
    w.line(format!("public const string ModVersion = \"{}\";", lit(&project.version)));
    w.line(format!("public const string ModAuthor = \"{}\";", lit(&project.author)));
    w.line(format!("public const string GameDeveloper = \"{}\";", lit(&cfg.game_developer)));
    w.line(format!("public const string GameName = \"{}\";", lit(&cfg.game_name)));
    w.blank();
    w.line(format!("public static readonly string[] QuestIds = {{ {} }};", ids(input.quests)));
    w.line(format!("public static readonly string[] NpcIds = {{ {} }};", ids(input.npcs)));
    w.close_block();
    w.close_block();
    w.finish()
}

/// `Core.cs`: the mod entry point that registers every quest.
///
/// A quest restored from a save is looked up first; a new instance is only
/// created when none exists.
pub fn generate_bootstrap(input: &ScaffoldInput<'_>) -> String {
    let root = input.root_namespace;
    let mut usings = UsingSet::new();
    usings.add("MelonLoader");
    if !input.quests.is_empty() {
        usings.add("S1API.Quests");
    }

    let mut w = CodeWriter::new();
    header(&mut w);
    w.splice(&usings.render());
    w.blank();
    w.line(format!(
        "[assembly: MelonInfo(typeof(global::{root}.Core), global::{root}.Constants.ModName, global::{root}.Constants.ModVersion, global::{root}.Constants.ModAuthor)]"
    ));
    w.line(format!(
        "[assembly: MelonGame(global::{root}.Constants.GameDeveloper, global::{root}.Constants.GameName)]"
    ));
    w.blank();
    w.open_block(format!("namespace {root}"));
    w.open_block("public class Core : MelonMod");
    w.line("private bool _registered;");
    w.blank();
    w.open_block("public override void OnInitializeMelon()");
    w.line("MelonLogger.Msg(Constants.ModName + \" \" + Constants.ModVersion + \" loaded\");");
    w.close_block();
    w.blank();
    w.open_block("public override void OnSceneWasInitialized(int buildIndex, string sceneName)");
    w.open_block("if (sceneName != \"Main\" || _registered)");
    w.line("return;");
    w.close_block();
    w.line("_registered = true;");
    w.line("RegisterQuests();");
    w.close_block();
    w.blank();
    w.open_block("private static void RegisterQuests()");
    if input.quests.is_empty() {
        w.comment("No quests in this project.");
    }
    for (n, quest) in input.quests.iter().enumerate() {
        let ty = format!("global::{}.{}", quest.namespace, quest.class_name);
        let local = format!("quest{}", n + 1);
        if n > 0 {
            w.blank();
        }
        w.comment(format!("{} ({})", quest.class_name, quest.id));
        w.line(format!("var {local} = QuestManager.GetQuestById({ty}.QuestId) as {ty} ?? {ty}.Create();"));
        w.open_block(format!("if ({local} == null)"));
        w.line(format!("MelonLogger.Warning(\"Could not register quest \" + {ty}.QuestId);"));
        w.close_block();
        if quest.auto_begin {
            w.comment(format!("{} begins itself through its AutoBegin override.", quest.class_name));
        }
    }
    for npc in input.npcs {
        w.comment(format!(
            "NPC {} ({}) is spawned by the host from its prefab configuration.",
            npc.class_name, npc.id
        ));
    }
    w.close_block();
    w.close_block();
    w.close_block();
    w.finish()
}

/// All four project-level files.
pub fn generate_scaffold(input: &ScaffoldInput<'_>) -> Vec<ScaffoldFile> {
    vec![
        ScaffoldFile {
            file_name: input.project_file_name(),
            contents: generate_csproj(input),
        },
        ScaffoldFile {
            file_name: input.solution_file_name(),
            contents: generate_solution(input),
        },
        ScaffoldFile {
            file_name: CONSTANTS_FILE.to_string(),
            contents: generate_constants(input),
        },
        ScaffoldFile {
            file_name: BOOTSTRAP_FILE.to_string(),
            contents: generate_bootstrap(input),
        },
    ]
}
