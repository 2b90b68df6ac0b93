//! `questforge` command-line entry point.
//!
//! Usage:
//!   questforge generate project.ron [--config codegen.toml] [--out DIR]
//!   questforge check project.ron
//!   questforge triggers [--scope npc|quest|global]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use questforge_codegen::triggers::{TriggerCatalogEntry, TriggerScope, available_triggers, triggers_for};
use questforge_codegen::{GeneratorConfig, RealFs, check_project, generate_project};
use questforge_data::Project;

#[derive(Parser)]
#[command(author, version, about = "Generate quest and NPC mod sources from blueprints.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the mod project for a blueprint file.
    Generate {
        /// Project blueprint (RON).
        project: PathBuf,
        /// Generator settings (TOML).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output directory, overriding the config.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Validate a blueprint file without writing anything.
    Check {
        project: PathBuf,
    },
    /// List the known trigger actions.
    Triggers {
        #[arg(long, value_enum)]
        scope: Option<ScopeArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ScopeArg {
    Global,
    Npc,
    Quest,
}

impl From<ScopeArg> for TriggerScope {
    fn from(value: ScopeArg) -> Self {
        match value {
            ScopeArg::Global => TriggerScope::Global,
            ScopeArg::Npc => TriggerScope::Npc,
            ScopeArg::Quest => TriggerScope::Quest,
        }
    }
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate { project, config, out } => run_generate(&project, config.as_deref(), out),
        Commands::Check { project } => run_check(&project),
        Commands::Triggers { scope } => {
            let entries = match scope {
                Some(scope) => triggers_for(scope.into()),
                None => available_triggers(),
            };
            print_triggers(&entries);
            Ok(ExitCode::SUCCESS)
        },
    }
}

/// Read a RON blueprint and anchor its relative resource paths at the file's directory.
fn load_project(path: &Path) -> Result<Project> {
    let text = fs::read_to_string(path).with_context(|| format!("reading project '{}'", path.display()))?;
    let mut project: Project = ron::from_str(&text).with_context(|| format!("parsing project '{}'", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let anchor = |p: &mut PathBuf| {
        if p.is_relative() && !p.as_os_str().is_empty() {
            *p = base.join(&*p);
        }
    };
    for resource in &mut project.resources {
        anchor(&mut resource.path);
    }
    for quest in &mut project.quests {
        if let Some(icon) = quest.icon_path.as_mut() {
            anchor(icon);
        }
    }
    info!(
        "loaded project '{}' from {} ({} quests, {} npcs)",
        project.name,
        path.display(),
        project.quests.len(),
        project.npcs.len()
    );
    Ok(project)
}

fn run_generate(project_path: &Path, config_path: Option<&Path>, out: Option<PathBuf>) -> Result<ExitCode> {
    let project = load_project(project_path)?;
    let mut config = match config_path {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(out) = out {
        config.output_dir = out;
    }

    let result = generate_project(&project, &config, &RealFs);
    for path in &result.generated_files {
        println!("  {}", path.display());
    }
    for warning in &result.warnings {
        println!("warning: {warning}");
    }
    for error in &result.errors {
        eprintln!("error: {error}");
    }
    println!(
        "{}: {} file(s), {} warning(s), {} error(s)",
        if result.success { "done" } else { "failed" },
        result.generated_files.len(),
        result.warnings.len(),
        result.errors.len()
    );
    Ok(if result.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_check(project_path: &Path) -> Result<ExitCode> {
    let project = load_project(project_path)?;
    let report = check_project(&project);
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    for error in &report.errors {
        eprintln!("error: {error}");
    }
    if report.errors.is_empty() {
        println!("{}: ok ({} warning(s))", project_path.display(), report.warnings.len());
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn print_triggers(entries: &[TriggerCatalogEntry]) {
    for entry in entries {
        let needs = match (entry.requires_npc_id, entry.requires_quest_id) {
            (true, _) => " [npc id]",
            (_, true) => " [quest id]",
            _ => "",
        };
        println!("{:<32} {:<7} {}{needs}", entry.action, entry.scope().as_str(), entry.signature());
        println!("    {}", entry.description);
    }
}
