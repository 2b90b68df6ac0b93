//! Error types for the generator.

use std::path::PathBuf;

use questforge_data::ValidationError;
use thiserror::Error;

/// A trigger that cannot be resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriggerError {
    #[error("trigger has no action")]
    MissingAction,
    #[error("unknown trigger action '{action}'")]
    UnknownAction { action: String },
    #[error("trigger '{action}' requires an npc id")]
    MissingNpcId { action: String },
    #[error("trigger '{action}' requires a quest id")]
    MissingQuestId { action: String },
}

/// Emitted text that does not parse as a token tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at {line}:{column}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Failures that abort a whole generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("project name is empty")]
    EmptyProjectName,
    #[error("project has no quests or npcs to generate")]
    NothingToGenerate,
    #[error("project failed validation:\n{}", join_lines(.0))]
    InvalidProject(Vec<ValidationError>),
    #[error("invalid output layout: {0}")]
    Layout(String),
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Problems loading a generator configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

fn join_lines(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}
