//! Dependency closure resolution.
//!
//! Depth-first over the registry, preserving each record's declared
//! dependency order. A visited set keyed by component id is threaded through
//! the whole traversal so diamond-shaped graphs contribute each file exactly
//! once, and an explicit on-path stack turns cyclic graphs into a reported
//! error instead of unbounded recursion.

use crate::registry::Registry;
use common::ComponentId;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

/// Who demanded a component that could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirer {
    /// The architecture's own declared dependency list.
    Architecture,
    /// A component already in the closure.
    Component(ComponentId),
}

impl fmt::Display for Requirer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirer::Architecture => write!(f, "the architecture"),
            Requirer::Component(id) => write!(f, "component {id}"),
        }
    }
}

/// Errors from closure resolution.
#[derive(Debug, thiserror::Error)]
pub enum ClosureError {
    #[error("component {id} required by {required_by} is not in the component library")]
    MissingDependency {
        id: ComponentId,
        required_by: Requirer,
    },
    #[error("dependency cycle detected: {}", format_cycle(.path))]
    DependencyCycle { path: Vec<ComponentId> },
}

fn format_cycle(path: &[ComponentId]) -> String {
    path.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Resolves the complete, deduplicated set of component files required by
/// `roots`, in depth-first emit order.
///
/// A component's file is emitted before its own dependencies are walked, so
/// for registry `{1: [], 2: [1]}` and roots `[2, 1]` the result is exactly
/// `[path(2), path(1)]`.
pub fn resolve_closure(
    roots: &[ComponentId],
    registry: &Registry,
) -> Result<Vec<PathBuf>, ClosureError> {
    let mut visited: HashSet<ComponentId> = HashSet::new();
    let mut on_path: Vec<ComponentId> = Vec::new();
    let mut files: Vec<PathBuf> = Vec::new();

    for &id in roots {
        visit(
            id,
            Requirer::Architecture,
            registry,
            &mut visited,
            &mut on_path,
            &mut files,
        )?;
    }

    Ok(files)
}

fn visit(
    id: ComponentId,
    required_by: Requirer,
    registry: &Registry,
    visited: &mut HashSet<ComponentId>,
    on_path: &mut Vec<ComponentId>,
    files: &mut Vec<PathBuf>,
) -> Result<(), ClosureError> {
    if let Some(start) = on_path.iter().position(|&p| p == id) {
        let mut path = on_path[start..].to_vec();
        path.push(id);
        return Err(ClosureError::DependencyCycle { path });
    }
    if !visited.insert(id) {
        // Already emitted via another branch of the graph.
        return Ok(());
    }

    let record = registry
        .get(id)
        .ok_or(ClosureError::MissingDependency { id, required_by })?;

    files.push(record.source_path.clone());

    on_path.push(id);
    for &dep in &record.dependencies {
        visit(dep, Requirer::Component(id), registry, visited, on_path, files)?;
    }
    on_path.pop();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::build_registry;
    use common::{HeaderStateParser, CIRCUIT_FILE};
    use std::fs;
    use std::path::Path;

    fn tmp_dir(name: &str) -> PathBuf {
        let d = std::env::temp_dir().join(name);
        fs::remove_dir_all(&d).ok();
        fs::create_dir_all(&d).ok();
        d
    }

    fn state_bytes(id: ComponentId, deps: &[ComponentId]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&id.to_le_bytes());
        bytes.extend_from_slice(&(deps.len() as u16).to_le_bytes());
        for dep in deps {
            bytes.extend_from_slice(&dep.to_le_bytes());
        }
        bytes
    }

    fn write_component(library: &Path, dir: &str, id: ComponentId, deps: &[ComponentId]) {
        let d = library.join(dir);
        fs::create_dir_all(&d).ok();
        fs::write(d.join(CIRCUIT_FILE), state_bytes(id, deps)).ok();
    }

    fn registry_from(library: &Path) -> Registry {
        build_registry(library, &HeaderStateParser, |_, _| {}).unwrap()
    }

    #[test]
    fn test_diamond_contributes_each_file_once() {
        let tmp = tmp_dir("test_closure_diamond");
        write_component(&tmp, "base", 1, &[]);
        write_component(&tmp, "left", 2, &[1]);
        write_component(&tmp, "right", 3, &[1]);
        // 4 depends on 2 and 3, both of which share 1.
        write_component(&tmp, "top", 4, &[2, 3]);
        let registry = registry_from(&tmp);
        let files = resolve_closure(&[4], &registry).unwrap();

        assert_eq!(files.len(), 4);
        let unique: HashSet<_> = files.iter().collect();
        assert_eq!(unique.len(), 4, "no file may appear twice");

        fs::remove_dir_all(tmp).ok();
    }

    #[test]
    fn test_direct_and_transitive_root_order() {
        // Registry {1: [], 2: [1]}, roots [2, 1]: 1 is reachable both
        // directly and via 2, and must appear exactly once, after 2.
        let tmp = tmp_dir("test_closure_order");
        write_component(&tmp, "one", 1, &[]);
        write_component(&tmp, "two", 2, &[1]);
        let registry = registry_from(&tmp);

        let files = resolve_closure(&[2, 1], &registry).unwrap();
        assert_eq!(
            files,
            vec![
                registry.get(2).unwrap().source_path.clone(),
                registry.get(1).unwrap().source_path.clone(),
            ]
        );

        fs::remove_dir_all(tmp).ok();
    }

    #[test]
    fn test_missing_root_dependency() {
        let tmp = tmp_dir("test_closure_missing_root");
        write_component(&tmp, "one", 1, &[]);
        let registry = registry_from(&tmp);

        let err = resolve_closure(&[99], &registry).unwrap_err();
        match err {
            ClosureError::MissingDependency { id, required_by } => {
                assert_eq!(id, 99);
                assert_eq!(required_by, Requirer::Architecture);
            }
            other => panic!("expected MissingDependency, got {other:?}"),
        }

        fs::remove_dir_all(tmp).ok();
    }

    #[test]
    fn test_missing_transitive_dependency_names_requirer() {
        let tmp = tmp_dir("test_closure_missing_transitive");
        write_component(&tmp, "two", 2, &[5]);
        let registry = registry_from(&tmp);

        let err = resolve_closure(&[2], &registry).unwrap_err();
        match err {
            ClosureError::MissingDependency { id, required_by } => {
                assert_eq!(id, 5);
                assert_eq!(required_by, Requirer::Component(2));
            }
            other => panic!("expected MissingDependency, got {other:?}"),
        }

        fs::remove_dir_all(tmp).ok();
    }

    #[test]
    fn test_cycle_reported_not_recursed() {
        let tmp = tmp_dir("test_closure_cycle");
        write_component(&tmp, "a", 1, &[2]);
        write_component(&tmp, "b", 2, &[1]);
        let registry = registry_from(&tmp);

        let err = resolve_closure(&[1], &registry).unwrap_err();
        match err {
            ClosureError::DependencyCycle { path } => {
                assert_eq!(path.first(), path.last());
                assert!(path.len() >= 3);
            }
            other => panic!("expected DependencyCycle, got {other:?}"),
        }

        fs::remove_dir_all(tmp).ok();
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let tmp = tmp_dir("test_closure_self");
        write_component(&tmp, "selfish", 3, &[3]);
        let registry = registry_from(&tmp);

        let err = resolve_closure(&[3], &registry).unwrap_err();
        assert!(matches!(
            err,
            ClosureError::DependencyCycle { ref path } if *path == vec![3, 3]
        ));

        fs::remove_dir_all(tmp).ok();
    }

    #[test]
    fn test_declared_order_preserved_depth_first() {
        let tmp = tmp_dir("test_closure_dfs_order");
        write_component(&tmp, "leaf_a", 10, &[]);
        write_component(&tmp, "leaf_b", 11, &[]);
        write_component(&tmp, "mid", 20, &[11, 10]);
        let registry = registry_from(&tmp);

        let files = resolve_closure(&[20, 10], &registry).unwrap();
        assert_eq!(
            files,
            vec![
                registry.get(20).unwrap().source_path.clone(),
                registry.get(11).unwrap().source_path.clone(),
                registry.get(10).unwrap().source_path.clone(),
            ]
        );

        fs::remove_dir_all(tmp).ok();
    }
}
