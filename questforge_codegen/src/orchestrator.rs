//! Top-level generation run.
//!
//! [`generate_project`] never returns an error: structural problems and
//! whole-run failures become a result with `success == false`, and per-file
//! problems are collected as warnings or errors while the run continues.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use questforge_data::{Project, QuestBlueprint, validate_project};

use crate::class::{GeneratedClass, class_name_scope, generate_npc_class, generate_quest_class};
use crate::cleanup::{CleanupScope, DeletePlan};
use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::fsys::FileSystem;
use crate::ident::{ensure_unique_ignore_case, sanitize, sanitize_namespace};
use crate::resolve::resolve_quest;
use crate::resources::{copy_resources, manifest_resource_name, resource_file_name};
use crate::scaffold::{ClassRef, EmbeddedResource, ScaffoldInput, generate_scaffold};
use crate::syntax::check_syntax;

/// Fallback root namespace when the project name has no usable characters.
pub const DEFAULT_NAMESPACE: &str = "GeneratedMod";

/// Outcome of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResult {
    /// The run completed. Per-item errors may still be listed.
    pub success: bool,
    pub generated_files: Vec<PathBuf>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl GenerationResult {
    fn started() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    fn failed(message: String) -> Self {
        error!("{message}");
        Self {
            success: false,
            errors: vec![message],
            ..Self::default()
        }
    }

    /// Completed with no errors at all.
    pub fn is_clean(&self) -> bool {
        self.success && self.errors.is_empty()
    }

    fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.warnings.push(message);
    }

    fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!("{message}");
        self.errors.push(message);
    }
}

/// Problems found without writing anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Root namespace: the first quest's namespace, else the sanitized project name.
pub fn root_namespace(project: &Project) -> String {
    match project.quests.first() {
        Some(quest) if !quest.namespace.trim().is_empty() => sanitize_namespace(&quest.namespace, DEFAULT_NAMESPACE),
        _ => sanitize(&project.name, DEFAULT_NAMESPACE),
    }
}

fn check_structure(project: &Project) -> Result<(), GenerateError> {
    if project.name.trim().is_empty() {
        return Err(GenerateError::EmptyProjectName);
    }
    if project.quests.is_empty() && project.npcs.is_empty() {
        return Err(GenerateError::NothingToGenerate);
    }
    let problems = validate_project(project);
    if !problems.is_empty() {
        return Err(GenerateError::InvalidProject(problems));
    }
    Ok(())
}

/// Validate a project and resolve every quest's triggers without emitting files.
pub fn check_project(project: &Project) -> CheckReport {
    let mut report = CheckReport::default();
    match check_structure(project) {
        Err(GenerateError::InvalidProject(problems)) => {
            report.errors.extend(problems.iter().map(ToString::to_string));
        },
        Err(e) => report.errors.push(e.to_string()),
        Ok(()) => {},
    }
    for quest in &project.quests {
        let resolved = resolve_quest(quest, &mut HashSet::new());
        report.warnings.extend(resolved.warnings);
    }
    report
}

fn quest_class_name(quest: &QuestBlueprint, project: &Project, index: usize) -> String {
    let fallback = sanitize(&project.name, &format!("Quest{}", index + 1));
    let fallback = sanitize(&quest.title, &fallback);
    sanitize(&quest.class_name, &fallback)
}

fn icon_source(quest: &QuestBlueprint) -> Option<&Path> {
    quest.icon_path.as_deref().filter(|_| quest.custom_icon)
}

/// Declared resources plus quest icons, first occurrence wins.
fn resource_sources(project: &Project) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    project
        .resources
        .iter()
        .map(|r| r.path.as_path())
        .chain(project.quests.iter().filter_map(icon_source))
        .filter(|p| seen.insert(p.to_path_buf()))
        .map(Path::to_path_buf)
        .collect()
}

/// Write `contents` unless the file already holds exactly that.
///
/// Returns whether the file was written.
pub fn write_if_changed(fs: &dyn FileSystem, path: &Path, contents: &str) -> std::io::Result<bool> {
    if let Ok(existing) = fs.read(path)
        && existing == contents.as_bytes()
    {
        return Ok(false);
    }
    fs.write(path, contents.as_bytes())?;
    Ok(true)
}

fn create_dir(fs: &dyn FileSystem, path: &Path) -> Result<(), GenerateError> {
    fs.create_dir_all(path).map_err(|source| GenerateError::OutputDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Run the whole pipeline for `project` into `config.output_dir`.
pub fn generate_project(project: &Project, config: &GeneratorConfig, fs: &dyn FileSystem) -> GenerationResult {
    match run(project, config, fs) {
        Ok(result) => result,
        Err(e) => GenerationResult::failed(e.to_string()),
    }
}

fn run(project: &Project, config: &GeneratorConfig, fs: &dyn FileSystem) -> Result<GenerationResult, GenerateError> {
    check_structure(project)?;
    config.check_layout()?;
    let root = root_namespace(project);
    info!(
        "generating '{}' as {root}: {} quest(s), {} npc(s) into {}",
        project.name,
        project.quests.len(),
        project.npcs.len(),
        config.output_dir.display()
    );

    let quest_dir = config.quest_path();
    let npc_dir = config.npc_path();
    for dir in [&config.output_dir, &quest_dir, &npc_dir] {
        create_dir(fs, dir)?;
    }

    let mut result = GenerationResult::started();

    let sources = resource_sources(project);
    let report = copy_resources(fs, &sources, &config.resource_path(), config.copy_policy());
    for warning in report.warnings {
        result.warn(warning);
    }
    for err in report.errors {
        result.error(err);
    }
    let embedded: Vec<EmbeddedResource> = report
        .copied
        .iter()
        .map(|dest| EmbeddedResource {
            include: format!("{}\\{}", config.resource_dir, resource_file_name(dest)),
            logical_name: manifest_resource_name(&root, &config.resource_dir, dest),
        })
        .collect();
    result.generated_files.extend(report.copied);
    let icon_name = |quest: &QuestBlueprint| {
        icon_source(quest).map(|p| {
            let embedded = report.destinations.get(p).map_or(p, PathBuf::as_path);
            manifest_resource_name(&root, &config.resource_dir, embedded)
        })
    };

    let mut used_quests = class_name_scope();
    let mut quest_refs = Vec::new();
    let mut quest_files = Vec::new();
    for (index, quest) in project.quests.iter().enumerate() {
        let class_name =
            ensure_unique_ignore_case(&quest_class_name(quest, project, index), &mut used_quests, index + 1);
        let icon = icon_name(quest);
        let class = generate_quest_class(quest, &class_name, &root, icon.as_deref());
        quest_refs.push(ClassRef {
            class_name: class.class_name.clone(),
            namespace: class.namespace.clone(),
            id: quest.quest_id.clone(),
            auto_begin: quest.auto_begin && quest.start_triggers.is_empty(),
        });
        quest_files.push(class.file_name.clone());
        emit_class(&mut result, fs, config, &quest_dir, class);
    }

    let mut used_npcs = class_name_scope();
    let mut npc_refs = Vec::new();
    let mut npc_files = Vec::new();
    for (index, npc) in project.npcs.iter().enumerate() {
        let fallback = sanitize(&npc.first_name, &format!("Npc{}", index + 1));
        let class_name = ensure_unique_ignore_case(&sanitize(&npc.class_name, &fallback), &mut used_npcs, index + 1);
        let class = generate_npc_class(npc, &class_name, &root);
        npc_refs.push(ClassRef {
            class_name: class.class_name.clone(),
            namespace: class.namespace.clone(),
            id: npc.npc_id.clone(),
            auto_begin: false,
        });
        npc_files.push(class.file_name.clone());
        emit_class(&mut result, fs, config, &npc_dir, class);
    }

    let scopes = [
        CleanupScope::new(&quest_dir, quest_files),
        CleanupScope::new(&npc_dir, npc_files),
    ];
    match DeletePlan::scan(fs, &scopes) {
        Ok(plan) => {
            let cleanup = plan.apply(fs);
            for path in cleanup.deleted {
                result.warn(format!("removed stale file {}", path.display()));
            }
            for (path, e) in cleanup.failed {
                result.error(format!("could not remove stale file {}: {e}", path.display()));
            }
        },
        Err(e) => result.error(e.to_string()),
    }

    let input = ScaffoldInput {
        project,
        config,
        root_namespace: &root,
        quests: &quest_refs,
        npcs: &npc_refs,
        resources: &embedded,
    };
    for file in generate_scaffold(&input) {
        let path = config.output_dir.join(&file.file_name);
        if config.validate_syntax && path.extension().is_some_and(|e| e == "cs") {
            check_file(&mut result, &path, &file.contents);
        }
        write_file(&mut result, fs, &path, &file.contents);
    }

    info!(
        "generation finished: {} file(s), {} warning(s), {} error(s)",
        result.generated_files.len(),
        result.warnings.len(),
        result.errors.len()
    );
    Ok(result)
}

fn emit_class(
    result: &mut GenerationResult,
    fs: &dyn FileSystem,
    config: &GeneratorConfig,
    dir: &Path,
    class: GeneratedClass,
) {
    let path = dir.join(&class.file_name);
    for warning in class.warnings {
        result.warn(warning);
    }
    if config.validate_syntax {
        check_file(result, &path, &class.source);
    }
    write_file(result, fs, &path, &class.source);
}

fn check_file(result: &mut GenerationResult, path: &Path, source: &str) {
    if let Err(e) = check_syntax(source) {
        result.error(format!("{}: {e}", path.display()));
    }
}

fn write_file(result: &mut GenerationResult, fs: &dyn FileSystem, path: &Path, contents: &str) {
    match write_if_changed(fs, path, contents) {
        Ok(written) => {
            if !written {
                debug!("{} unchanged", path.display());
            }
            result.generated_files.push(path.to_path_buf());
        },
        Err(source) => {
            let e = GenerateError::Write {
                path: path.to_path_buf(),
                source,
            };
            result.error(e.to_string());
        },
    }
}
