//! Removal of generated class files whose blueprint no longer exists.
//!
//! Cleanup is two-phase: [`DeletePlan`] is plain data computed from directory
//! listings, and only [`DeletePlan::apply`] touches the file system. A plan
//! never reaches outside the directories it was built for.

use std::collections::BTreeSet;
use std::path::PathBuf;

use log::{info, warn};

use crate::error::GenerateError;
use crate::fsys::FileSystem;

/// Extension of generated class files.
pub const SOURCE_EXTENSION: &str = "cs";

/// One directory the generator owns, with the file names it expects to find there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupScope {
    pub dir: PathBuf,
    pub expected: BTreeSet<String>,
}

impl CleanupScope {
    pub fn new(dir: impl Into<PathBuf>, expected: impl IntoIterator<Item = String>) -> Self {
        Self {
            dir: dir.into(),
            expected: expected.into_iter().collect(),
        }
    }
}

/// Files to delete, in deterministic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletePlan {
    pub stale: Vec<PathBuf>,
}

/// Outcome of applying a plan.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, std::io::Error)>,
}

/// Set difference between `present` and the scope's expected names.
///
/// Names compare ignoring ASCII case: on a case-insensitive file system a
/// class renamed from `foo` to `Foo` is written into the existing `foo.cs`,
/// which must not then be deleted. Paths outside `scope.dir` and files without
/// the source extension are never candidates, whatever `present` contains.
pub fn stale_files(scope: &CleanupScope, present: &[PathBuf]) -> Vec<PathBuf> {
    let mut stale: Vec<PathBuf> = present
        .iter()
        .filter(|p| p.parent() == Some(scope.dir.as_path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(SOURCE_EXTENSION))
        })
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| !scope.expected.iter().any(|e| e.eq_ignore_ascii_case(n)))
        })
        .cloned()
        .collect();
    stale.sort();
    stale.dedup();
    stale
}

impl DeletePlan {
    /// Build a plan from listings already gathered for each scope.
    pub fn from_listings<'a>(listings: impl IntoIterator<Item = (&'a CleanupScope, &'a [PathBuf])>) -> Self {
        let mut stale = Vec::new();
        for (scope, present) in listings {
            stale.extend(stale_files(scope, present));
        }
        Self { stale }
    }

    /// List each scope directory through `fs` and build the plan.
    ///
    /// # Errors
    /// Returns [`GenerateError::Scan`] when a directory cannot be listed.
    pub fn scan(fs: &dyn FileSystem, scopes: &[CleanupScope]) -> Result<Self, GenerateError> {
        let mut listings = Vec::with_capacity(scopes.len());
        for scope in scopes {
            let present = fs
                .list_files(&scope.dir, SOURCE_EXTENSION)
                .map_err(|source| GenerateError::Scan {
                    path: scope.dir.clone(),
                    source,
                })?;
            listings.push(present);
        }
        Ok(Self::from_listings(
            scopes.iter().zip(listings.iter().map(Vec::as_slice)),
        ))
    }

    pub fn is_empty(&self) -> bool {
        self.stale.is_empty()
    }

    /// Delete every planned file. Failures are collected, not fatal.
    pub fn apply(&self, fs: &dyn FileSystem) -> CleanupReport {
        let mut report = CleanupReport::default();
        for path in &self.stale {
            match fs.remove_file(path) {
                Ok(()) => {
                    info!("removed stale file {}", path.display());
                    report.deleted.push(path.clone());
                },
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    // Already gone; deleting twice is not an error.
                },
                Err(e) => {
                    warn!("could not remove stale file {}: {e}", path.display());
                    report.failed.push((path.clone(), e));
                },
            }
        }
        report
    }
}

/// File name for a generated class.
pub fn source_file_name(class_name: &str) -> String {
    format!("{class_name}.{SOURCE_EXTENSION}")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::fsys::MemoryFs;

    fn quests_scope(expected: &[&str]) -> CleanupScope {
        CleanupScope::new("out/Quests", expected.iter().map(|s| s.to_string()))
    }

    #[test]
    fn plan_is_set_difference() {
        let scope = quests_scope(&["Bar.cs"]);
        let present = vec![
            PathBuf::from("out/Quests/Foo.cs"),
            PathBuf::from("out/Quests/Bar.cs"),
        ];
        let plan = DeletePlan::from_listings([(&scope, present.as_slice())]);
        assert_eq!(plan.stale, vec![PathBuf::from("out/Quests/Foo.cs")]);
    }

    #[test]
    fn case_variant_of_expected_name_is_kept() {
        let scope = quests_scope(&["Foo.cs"]);
        let present = vec![
            PathBuf::from("out/Quests/foo.cs"),
            PathBuf::from("out/Quests/Other.cs"),
        ];
        assert_eq!(stale_files(&scope, &present), vec![PathBuf::from("out/Quests/Other.cs")]);
    }

    #[test]
    fn plan_never_leaves_its_directory() {
        let scope = quests_scope(&[]);
        let present = vec![
            PathBuf::from("out/Core.cs"),
            PathBuf::from("out/Quests/sub/Deep.cs"),
            PathBuf::from("out/Quests/readme.md"),
        ];
        assert!(stale_files(&scope, &present).is_empty());
    }

    #[test]
    fn apply_is_idempotent() {
        let fs = MemoryFs::new();
        fs.insert("out/Quests/Foo.cs", "old");
        fs.insert("out/Quests/Bar.cs", "keep");
        let scopes = [quests_scope(&["Bar.cs"])];

        let plan = DeletePlan::scan(&fs, &scopes).unwrap();
        let report = plan.apply(&fs);
        assert_eq!(report.deleted, vec![PathBuf::from("out/Quests/Foo.cs")]);
        assert!(fs.is_file(Path::new("out/Quests/Bar.cs")));

        let again = DeletePlan::scan(&fs, &scopes).unwrap();
        assert!(again.is_empty());
        let replay = plan.apply(&fs);
        assert!(replay.deleted.is_empty());
        assert!(replay.failed.is_empty());
    }

    #[test]
    fn npc_and_quest_scopes_are_independent() {
        let fs = MemoryFs::new();
        fs.insert("out/Quests/Kyle.cs", "quest named like an npc");
        fs.insert("out/NPCs/Kyle.cs", "npc");
        let scopes = [
            quests_scope(&[]),
            CleanupScope::new("out/NPCs", ["Kyle.cs".to_string()]),
        ];
        let plan = DeletePlan::scan(&fs, &scopes).unwrap();
        assert_eq!(plan.stale, vec![PathBuf::from("out/Quests/Kyle.cs")]);
    }
}
