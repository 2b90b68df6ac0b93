//! Validation and copying of declared resource files.
//!
//! Resources are best-effort: a missing or locked file is reported and the
//! rest of the run carries on. Every existing source gets its own destination
//! name; sources whose names collide are renamed, never overwritten.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};

use crate::fsys::FileSystem;
use crate::ident::sanitize;

/// Bounded linear-backoff retry policy for copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyPolicy {
    /// Total attempts per file, at least one.
    pub attempts: u32,
    /// Wait before retry `n` is `backoff * n`.
    pub backoff: Duration,
}

impl Default for CopyPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(100),
        }
    }
}

/// What happened to the resources of one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResourceReport {
    /// Destinations in place after the run, one per distinct file.
    pub copied: Vec<PathBuf>,
    /// Destination chosen for each existing source.
    pub destinations: BTreeMap<PathBuf, PathBuf>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Destination file name for a resource: sanitized stem plus the original extension.
pub fn resource_file_name(source: &Path) -> String {
    let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let stem = sanitize(stem, "resource");
    match source.extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{stem}.{}", ext.to_ascii_lowercase()),
        _ => stem,
    }
}

/// Reserve `wanted`, or `stem_1.ext`, `stem_2.ext`, ... if it is taken.
///
/// Names compare ignoring ASCII case; `used` holds lowercased names.
fn unique_resource_name(wanted: &str, used: &mut HashSet<String>) -> String {
    let (stem, ext) = match wanted.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (wanted, None),
    };
    let mut suffix = 0usize;
    loop {
        let candidate = match (suffix, ext) {
            (0, _) => wanted.to_string(),
            (n, Some(ext)) => format!("{stem}_{n}.{ext}"),
            (n, None) => format!("{stem}_{n}"),
        };
        if used.insert(candidate.to_ascii_lowercase()) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Name under which the build embeds a resource into the assembly.
pub fn manifest_resource_name(root_namespace: &str, resource_dir: &str, source: &Path) -> String {
    format!("{root_namespace}.{resource_dir}.{}", resource_file_name(source))
}

/// Every declared path that is not an existing file.
pub fn find_missing(fs: &dyn FileSystem, sources: &[PathBuf]) -> Vec<PathBuf> {
    sources.iter().filter(|p| !fs.is_file(p)).cloned().collect()
}

/// One error covering every missing resource, or `None` when all exist.
pub fn missing_resources_error(missing: &[PathBuf], dest_dir: &Path) -> Option<String> {
    if missing.is_empty() {
        return None;
    }
    let mut msg = format!("{} resource file(s) not found:", missing.len());
    for path in missing {
        msg.push_str(&format!(
            "\n  - {} (expected at {}, would be copied to {})",
            resource_file_name(path),
            path.display(),
            dest_dir.join(resource_file_name(path)).display()
        ));
    }
    Some(msg)
}

/// Validate all sources first, then copy the ones that exist into `dest_dir`.
pub fn copy_resources(fs: &dyn FileSystem, sources: &[PathBuf], dest_dir: &Path, policy: CopyPolicy) -> ResourceReport {
    let mut report = ResourceReport::default();
    if sources.is_empty() {
        return report;
    }

    let missing = find_missing(fs, sources);
    if let Some(error) = missing_resources_error(&missing, dest_dir) {
        warn!("{error}");
        report.errors.push(error);
    }

    if let Err(e) = fs.create_dir_all(dest_dir) {
        let error = format!("cannot create resource directory {}: {e}", dest_dir.display());
        warn!("{error}");
        report.errors.push(error);
        return report;
    }

    let mut used_names = HashSet::new();
    let mut placed: Vec<(PathBuf, PathBuf)> = Vec::new();
    for source in sources.iter().filter(|p| !missing.contains(*p)) {
        let canonical = fs.canonical(source);
        if let Some((_, dest)) = placed.iter().find(|(seen, _)| *seen == canonical) {
            debug!("resource {} is the same file as {}", source.display(), dest.display());
            report.destinations.insert(source.clone(), dest.clone());
            continue;
        }

        let wanted = resource_file_name(source);
        let name = unique_resource_name(&wanted, &mut used_names);
        if name != wanted {
            report.warnings.push(format!(
                "resource {} embedded as {name}: another resource already uses {wanted}",
                source.display()
            ));
        }
        let dest = dest_dir.join(&name);
        placed.push((canonical.clone(), dest.clone()));
        report.destinations.insert(source.clone(), dest.clone());

        if canonical == fs.canonical(&dest) {
            debug!("resource {} is already in place", source.display());
            report
                .warnings
                .push(format!("resource {} already in place; not copied", dest.display()));
            report.copied.push(dest);
            continue;
        }
        if let (Ok(src), Ok(existing)) = (fs.read(source), fs.read(&dest))
            && src == existing
        {
            report
                .warnings
                .push(format!("resource {} already up to date", dest.display()));
            report.copied.push(dest);
            continue;
        }
        match copy_with_retry(fs, source, &dest, policy) {
            Ok(bytes) => {
                info!("copied resource {} -> {} ({bytes} bytes)", source.display(), dest.display());
                report.copied.push(dest);
            },
            Err(error) => {
                warn!("{error}");
                report.errors.push(error);
            },
        }
    }
    report
}

/// Copy one file, retrying transient failures with linear backoff.
///
/// # Errors
/// Returns a message naming both paths and the last failure once every
/// attempt has been used.
pub fn copy_with_retry(fs: &dyn FileSystem, from: &Path, to: &Path, policy: CopyPolicy) -> Result<u64, String> {
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match fs.copy(from, to) {
            Ok(bytes) => return Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound || attempt >= attempts => {
                return Err(format!(
                    "failed to copy {} to {} after {attempt} attempt(s): {e}",
                    from.display(),
                    to.display()
                ));
            },
            Err(e) => {
                debug!("copy attempt {attempt} for {} failed: {e}", to.display());
                fs.sleep(policy.backoff * attempt);
                attempt += 1;
            },
        }
    }
}
