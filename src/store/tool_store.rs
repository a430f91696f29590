//! Tool Store / Self-Rewrite Coordinator
//!
//! The registry's persisted seed lives in an external JSON file rather
//! than the program's own source. `load_registry` rebuilds the registry
//! from it at process start; `commit` merges newly proposed tools and
//! rewrites the file wholesale, atomically, so the next process start is
//! seeded with the full accumulated set.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::StoreError;
use crate::tools::builtins::builtin_tools;
use crate::tools::registry::ToolRegistry;
use crate::types::ToolSpec;

use super::history::write_atomic;

/// Rebuild the registry from the persisted seed at `path`.
///
/// A missing file means first run: the registry is seeded with the
/// built-ins and the seed file is written so later commits have a valid
/// rewrite target. A present-but-invalid file is a configuration error
/// and fatal at startup.
pub fn load_registry(path: &str) -> Result<ToolRegistry, StoreError> {
    if !Path::new(path).exists() {
        let seed = builtin_tools();
        persist(path, &seed)?;
        info!(path, tools = seed.len(), "seeded fresh tool registry");
        return Ok(ToolRegistry::new(seed));
    }

    let seed = read_seed(path)?;
    Ok(ToolRegistry::new(seed))
}

/// Merge `new_tools` into the registry and rewrite the persisted seed with
/// the full current set. Returns how many tools were actually added.
///
/// Tools whose name already exists in the registry are skipped, so a
/// replayed turn that re-proposes a known tool cannot grow the registry or
/// trigger another restart.
///
/// Precondition: the seed file must exist and parse. If it does not, or
/// the rewrite itself fails, the commit aborts with an error and both the
/// registry and the persisted set are left untouched; the process keeps
/// running with the old behavior and the tools may be re-proposed later.
pub fn commit(
    path: &str,
    registry: &mut ToolRegistry,
    new_tools: &[ToolSpec],
) -> Result<usize, StoreError> {
    // Verify the rewrite target before touching anything.
    read_seed(path)?;

    let mut fresh: Vec<ToolSpec> = Vec::new();
    for tool in new_tools {
        if registry.contains(&tool.name) || fresh.iter().any(|t| t.name == tool.name) {
            info!(name = %tool.name, "skipping duplicate tool proposal");
            continue;
        }
        fresh.push(tool.clone());
    }

    if fresh.is_empty() {
        return Ok(0);
    }

    // Persist first. The registry is only mutated once the seed rewrite
    // has landed, so a failed write leaves no partially applied commit.
    let mut full = registry.export();
    full.extend(fresh.iter().cloned());
    persist(path, &full)?;

    let committed = fresh.len();
    for tool in fresh {
        registry.register(tool);
    }
    info!(path, committed, total = registry.len(), "committed new tools");

    Ok(committed)
}

fn read_seed(path: &str) -> Result<Vec<ToolSpec>, StoreError> {
    let contents = fs::read_to_string(path).map_err(|source| StoreError::SeedUnreadable {
        path: path.to_string(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| StoreError::SeedCorrupt {
        path: path.to_string(),
        source,
    })
}

fn persist(path: &str, tools: &[ToolSpec]) -> Result<(), StoreError> {
    let target = Path::new(path);
    if let Some(parent) = target.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| StoreError::WriteFailed {
                path: path.to_string(),
                source,
            })?;
        }
    }

    let json =
        serde_json::to_string_pretty(tools).map_err(|source| StoreError::SeedSerialize {
            path: path.to_string(),
            source,
        })?;
    write_atomic(target, &json).map_err(|source| StoreError::WriteFailed {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn proposal(name: &str) -> ToolSpec {
        ToolSpec {
            name: name.to_string(),
            description: format!("proposed tool {name}"),
            implementation: "arg0".to_string(),
        }
    }

    #[test]
    fn test_first_run_seeds_builtins_and_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tools.json").to_string_lossy().to_string();

        let registry = load_registry(&path).unwrap();
        assert_eq!(registry.len(), builtin_tools().len());
        assert!(Path::new(&path).exists());
    }

    #[test]
    fn test_commit_is_additive_and_order_preserving() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tools.json").to_string_lossy().to_string();

        let mut registry = load_registry(&path).unwrap();
        let before = registry.export();

        let committed = commit(&path, &mut registry, &[proposal("echo")]).unwrap();
        assert_eq!(committed, 1);

        let mut expected = before;
        expected.push(proposal("echo"));
        assert_eq!(registry.export(), expected);
    }

    #[test]
    fn test_reload_reconstructs_committed_registry() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tools.json").to_string_lossy().to_string();

        let mut registry = load_registry(&path).unwrap();
        commit(&path, &mut registry, &[proposal("echo")]).unwrap();

        let reloaded = load_registry(&path).unwrap();
        assert_eq!(reloaded.export(), registry.export());
    }

    #[test]
    fn test_commit_dedupes_by_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tools.json").to_string_lossy().to_string();

        let mut registry = load_registry(&path).unwrap();
        let committed = commit(&path, &mut registry, &[proposal("read_file")]).unwrap();

        assert_eq!(committed, 0);
        assert_eq!(registry.len(), builtin_tools().len());
    }

    #[test]
    fn test_commit_aborts_when_seed_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tools.json").to_string_lossy().to_string();

        let mut registry = load_registry(&path).unwrap();
        fs::write(&path, "}}} not json").unwrap();

        let err = commit(&path, &mut registry, &[proposal("echo")]).unwrap_err();
        assert!(matches!(err, StoreError::SeedCorrupt { .. }));
        // The in-memory registry is untouched.
        assert_eq!(registry.len(), builtin_tools().len());
    }

    #[test]
    fn test_failed_write_leaves_registry_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tools.json").to_string_lossy().to_string();

        let mut registry = load_registry(&path).unwrap();
        let before = registry.export();

        // Block the atomic-write temp path so the seed rewrite fails.
        let tmp = dir.path().join("tools.tmp");
        fs::create_dir(&tmp).unwrap();

        let err = commit(&path, &mut registry, &[proposal("echo")]).unwrap_err();
        assert!(matches!(err, StoreError::WriteFailed { .. }));
        assert_eq!(registry.export(), before);

        // The disk problem was transient: the same proposal commits once
        // the write path is clear again.
        fs::remove_dir(&tmp).unwrap();
        let committed = commit(&path, &mut registry, &[proposal("echo")]).unwrap();
        assert_eq!(committed, 1);
        assert!(load_registry(&path).unwrap().contains("echo"));
    }

    #[test]
    fn test_commit_dedupes_within_one_proposal_batch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tools.json").to_string_lossy().to_string();

        let mut registry = load_registry(&path).unwrap();
        let committed =
            commit(&path, &mut registry, &[proposal("echo"), proposal("echo")]).unwrap();

        assert_eq!(committed, 1);
        assert_eq!(registry.len(), builtin_tools().len() + 1);
    }

    #[test]
    fn test_commit_aborts_when_seed_is_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tools.json").to_string_lossy().to_string();

        let mut registry = ToolRegistry::new(builtin_tools());
        let err = commit(&path, &mut registry, &[proposal("echo")]).unwrap_err();
        assert!(matches!(err, StoreError::SeedUnreadable { .. }));
    }

    #[test]
    fn test_startup_with_corrupt_seed_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tools.json").to_string_lossy().to_string();
        fs::write(&path, "[{\"bad\": true]").unwrap();

        assert!(load_registry(&path).is_err());
    }
}
