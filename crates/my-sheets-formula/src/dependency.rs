//! Dependency tracking for formula calculation

use ahash::RandomState;
use my_sheets_core::CellAddress;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

type AddressSet = HashSet<CellAddress, RandomState>;
type AddressMap<V> = HashMap<CellAddress, V, RandomState>;

/// A rejected edge and the cells that would have formed the loop
///
/// `path` starts at the reader and follows "reads" edges; the last cell reads
/// the first. A self-reference yields a single-element path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Circular reference: {}", DisplayPath(.path))]
pub struct CircularDependency {
    pub path: Vec<CellAddress>,
}

struct DisplayPath<'a>(&'a [CellAddress]);

impl fmt::Display for DisplayPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, addr) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}", addr)?;
        }
        if let Some(first) = self.0.first() {
            write!(f, " -> {}", first)?;
        }
        Ok(())
    }
}

/// Dependency graph for formula cells
///
/// Tracks which cells depend on which other cells,
/// enabling efficient recalculation. The graph never holds a cycle: every edge
/// is checked before it is inserted.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DependencyGraph {
    /// Cell → Cells it reads
    dependencies: AddressMap<AddressSet>,
    /// Cell → Cells that read it
    dependents: AddressMap<AddressSet>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `reader` reads `target`
    ///
    /// Fails without touching the graph if the edge would close a loop.
    pub fn try_add_dependency(
        &mut self,
        reader: CellAddress,
        target: CellAddress,
    ) -> Result<(), CircularDependency> {
        if reader == target {
            log::debug!("Rejected self-reference in {}", reader);
            return Err(CircularDependency { path: vec![reader] });
        }

        if let Some(path) = self.find_path(target, reader) {
            let mut cycle = Vec::with_capacity(path.len());
            cycle.push(reader);
            cycle.extend(path.into_iter().filter(|&addr| addr != reader));
            let err = CircularDependency { path: cycle };
            log::debug!("Rejected {} -> {}: {}", reader, target, err);
            return Err(err);
        }

        self.dependencies.entry(reader).or_default().insert(target);
        self.dependents.entry(target).or_default().insert(reader);
        Ok(())
    }

    /// Remove every edge where `reader` is the reader
    pub fn clear_dependencies(&mut self, reader: CellAddress) {
        let Some(targets) = self.dependencies.remove(&reader) else {
            return;
        };

        for target in targets {
            if let Some(readers) = self.dependents.get_mut(&target) {
                readers.remove(&reader);
                if readers.is_empty() {
                    self.dependents.remove(&target);
                }
            }
        }
    }

    /// Get cells that read the given cell
    pub fn dependents(&self, cell: CellAddress) -> impl Iterator<Item = CellAddress> + '_ {
        self.dependents
            .get(&cell)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Get cells that the given cell reads
    pub fn dependencies(&self, cell: CellAddress) -> impl Iterator<Item = CellAddress> + '_ {
        self.dependencies
            .get(&cell)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Whether any cell reads `cell`
    pub fn has_dependents(&self, cell: CellAddress) -> bool {
        self.dependents.contains_key(&cell)
    }

    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.dependencies.values().map(|set| set.len()).sum()
    }

    /// Whether the graph holds no edges
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Clear the entire graph
    pub fn clear(&mut self) {
        self.dependencies.clear();
        self.dependents.clear();
    }

    /// Get all cells that need to be recalculated when the given cells change
    ///
    /// Every transitive dependent appears once, after all of its inputs that
    /// are themselves in the list. The changed cells are not included.
    pub fn recalc_order(&self, changed: &[CellAddress]) -> Vec<CellAddress> {
        let mut result = Vec::new();
        let mut visited = AddressSet::default();

        for &cell in changed {
            self.topological_sort(cell, &mut result, &mut visited);
        }

        result.reverse();
        result.retain(|cell| !changed.contains(cell));
        result
    }

    /// Topological sort helper (DFS, post-order over dependents)
    ///
    /// Each frame holds a cell and the dependents still to visit, so chain
    /// depth is bounded by the heap rather than the call stack.
    fn topological_sort(
        &self,
        root: CellAddress,
        result: &mut Vec<CellAddress>,
        visited: &mut AddressSet,
    ) {
        if !visited.insert(root) {
            return;
        }

        let mut stack = vec![(root, self.pending_dependents(root))];
        while let Some((cell, pending)) = stack.last_mut() {
            if let Some(next) = pending.next() {
                if visited.insert(next) {
                    stack.push((next, self.pending_dependents(next)));
                }
            } else {
                let cell = *cell;
                stack.pop();
                result.push(cell);
            }
        }
    }

    fn pending_dependents(&self, cell: CellAddress) -> std::vec::IntoIter<CellAddress> {
        self.dependents(cell).collect::<Vec<_>>().into_iter()
    }

    /// Depth-first search along "reads" edges from `from` to `to`
    ///
    /// Returns the path `from, ..., to` if one exists.
    fn find_path(&self, from: CellAddress, to: CellAddress) -> Option<Vec<CellAddress>> {
        let mut parents: AddressMap<Option<CellAddress>> = AddressMap::default();
        let mut stack = vec![from];
        parents.insert(from, None);

        while let Some(current) = stack.pop() {
            if current == to {
                let mut path = vec![current];
                let mut cursor = current;
                while let Some(Some(parent)) = parents.get(&cursor) {
                    path.push(*parent);
                    cursor = *parent;
                }
                path.reverse();
                return Some(path);
            }

            for next in self.dependencies(current) {
                if !parents.contains_key(&next) {
                    parents.insert(next, Some(current));
                    stack.push(next);
                }
            }
        }

        None
    }
}
