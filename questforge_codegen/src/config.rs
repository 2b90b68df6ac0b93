//! Generator settings loaded from TOML.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GenerateError};
use crate::resources::CopyPolicy;

/// Output locations and build settings for one generation run.
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub output_dir: PathBuf,
    pub target_framework: String,
    pub lang_version: String,
    /// Game install directory; reference hint paths point below it.
    pub game_dir: PathBuf,
    /// Directory holding reference assemblies, overriding `game_dir`.
    pub custom_reference_path: Option<PathBuf>,
    pub game_developer: String,
    pub game_name: String,
    pub copy_retries: u32,
    pub copy_backoff_ms: u64,
    pub validate_syntax: bool,
    pub quest_dir: String,
    pub npc_dir: String,
    pub resource_dir: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("generated"),
            target_framework: "netstandard2.1".to_string(),
            lang_version: "latest".to_string(),
            game_dir: PathBuf::from("Schedule I"),
            custom_reference_path: None,
            game_developer: "TVGS".to_string(),
            game_name: "Schedule I".to_string(),
            copy_retries: 3,
            copy_backoff_ms: 100,
            validate_syntax: true,
            quest_dir: "Quests".to_string(),
            npc_dir: "NPCs".to_string(),
            resource_dir: "Resources".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Parse a config from TOML text.
    ///
    /// # Errors
    /// Returns the `toml` parse error for malformed input.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load a config file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`] naming the file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded generator config from {}", path.display());
        Ok(config)
    }

    /// Directory holding the game's managed assemblies.
    pub fn reference_dir(&self) -> PathBuf {
        match &self.custom_reference_path {
            Some(path) => path.clone(),
            None => self.game_dir.join("MelonLoader").join("Il2CppAssemblies"),
        }
    }

    pub fn uses_custom_reference_path(&self) -> bool {
        self.custom_reference_path.is_some()
    }

    pub fn copy_policy(&self) -> CopyPolicy {
        CopyPolicy {
            attempts: self.copy_retries.max(1),
            backoff: Duration::from_millis(self.copy_backoff_ms),
        }
    }

    /// Check that the quest, NPC and resource directories are distinct
    /// relative subdirectories of the output directory.
    ///
    /// Stale-file cleanup treats every source file in the quest and NPC
    /// directories as generator-owned, so those directories must not be the
    /// output root, each other, or nested in one another.
    ///
    /// # Errors
    /// Returns [`GenerateError::Layout`] naming the offending keys.
    pub fn check_layout(&self) -> Result<(), GenerateError> {
        let dirs = [
            ("quest_dir", &self.quest_dir),
            ("npc_dir", &self.npc_dir),
            ("resource_dir", &self.resource_dir),
        ];
        let mut parsed = Vec::with_capacity(dirs.len());
        for (key, dir) in dirs {
            let parts = subdirectory_parts(dir).ok_or_else(|| {
                GenerateError::Layout(format!("{key} {dir:?} must be a relative subdirectory of the output directory"))
            })?;
            parsed.push((key, dir, parts));
        }
        for (i, (key, dir, parts)) in parsed.iter().enumerate() {
            for (other_key, other_dir, other_parts) in &parsed[i + 1..] {
                if parts.starts_with(other_parts) || other_parts.starts_with(parts) {
                    return Err(GenerateError::Layout(format!(
                        "{key} {dir:?} and {other_key} {other_dir:?} overlap; each needs its own directory"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn quest_path(&self) -> PathBuf {
        self.output_dir.join(&self.quest_dir)
    }

    pub fn npc_path(&self) -> PathBuf {
        self.output_dir.join(&self.npc_dir)
    }

    pub fn resource_path(&self) -> PathBuf {
        self.output_dir.join(&self.resource_dir)
    }
}

/// Lowercased path components of a relative subdirectory, or `None` for an
/// empty, absolute or parent-relative path.
fn subdirectory_parts(dir: &str) -> Option<Vec<String>> {
    let mut parts = Vec::new();
    for component in Path::new(dir).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().to_ascii_lowercase()),
            Component::CurDir => {},
            _ => return None,
        }
    }
    (!parts.is_empty()).then_some(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = GeneratorConfig::from_toml_str("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.target_framework, "netstandard2.1");
        assert_eq!(config.copy_policy().attempts, 3);
        assert!(config.validate_syntax);
    }

    #[test]
    fn partial_config_overrides_fields() {
        let config = GeneratorConfig::from_toml_str(
            r#"
output_dir = "mods/Demo"
custom_reference_path = "refs"
copy_retries = 0
copy_backoff_ms = 5
quest_dir = "Q"
"#,
        )
        .unwrap();
        assert_eq!(config.quest_path(), PathBuf::from("mods/Demo/Q"));
        assert_eq!(config.npc_path(), PathBuf::from("mods/Demo/NPCs"));
        assert!(config.uses_custom_reference_path());
        assert_eq!(config.reference_dir(), PathBuf::from("refs"));
        assert_eq!(config.copy_policy().attempts, 1);
        assert_eq!(config.copy_policy().backoff, Duration::from_millis(5));
    }

    #[test]
    fn default_layout_is_valid() {
        assert!(GeneratorConfig::default().check_layout().is_ok());
        let nested_ok = GeneratorConfig {
            quest_dir: "src/Quests".into(),
            npc_dir: "./src/NPCs".into(),
            ..GeneratorConfig::default()
        };
        assert!(nested_ok.check_layout().is_ok());
    }

    #[test]
    fn overlapping_or_root_class_dirs_are_rejected() {
        let layout = |quest: &str, npc: &str| {
            GeneratorConfig {
                quest_dir: quest.into(),
                npc_dir: npc.into(),
                ..GeneratorConfig::default()
            }
            .check_layout()
        };
        for (quest, npc) in [
            ("Classes", "Classes"),
            ("Classes", "classes"),
            ("", "NPCs"),
            (".", "NPCs"),
            ("../Quests", "NPCs"),
            ("Quests", "Quests/NPCs"),
            ("Quests", "Resources"),
        ] {
            let err = layout(quest, npc).unwrap_err();
            assert!(matches!(err, GenerateError::Layout(_)), "{quest:?} / {npc:?}: {err}");
        }
        let err = layout("Classes", "Classes").unwrap_err().to_string();
        assert!(err.contains("quest_dir") && err.contains("npc_dir"), "{err}");
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(GeneratorConfig::from_toml_str("copy_retries = \"many\"").is_err());
    }

    #[test]
    fn load_reports_the_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("codegen.toml");
        fs::write(&path, "validate_syntax = maybe").unwrap();
        let err = GeneratorConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("codegen.toml"));
        assert!(matches!(
            GeneratorConfig::load(&tmp.path().join("missing.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
