//! Dependency tracking between fit fields
//!
//! [`DependencyGraph`] records which fields of a record have to be initialized
//! before which other fields. It is used while generating a fit specification
//! and discarded once the initialization order has been extracted.
//!
//! Cycles are checked in two phases. Adding an edge whose reverse edge already
//! exists fails immediately. Longer cycles can only be found once all edges are
//! known, so [`DependencyGraph::has_closed_cycles`] runs a full depth-first scan,
//! and [`DependencyGraph::init_order`] refuses to order a cyclic graph.

use crate::error::{FitParamsError, Result};
use ndarray::Array2;
use std::collections::HashMap;

/// Visit state of a node during the cycle scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// A directed "depends-on" graph over a fixed, ordered set of field names
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// The fields in declaration order
    fields: Vec<String>,

    /// Map from field name to its index in `fields`
    key_map: HashMap<String, usize>,

    /// `graph[[w, s]]` is set if field `w` depends on field `s`
    graph: Array2<bool>,

    /// Number of edges
    num_deps: usize,
}

impl DependencyGraph {
    /// Create a graph without edges over the given fields
    ///
    /// # Examples
    ///
    /// ```
    /// use fitparams_rs::depgraph::DependencyGraph;
    ///
    /// let graph = DependencyGraph::new(["a", "b", "c"]);
    /// assert_eq!(graph.len(), 3);
    /// assert_eq!(graph.dependency_count(), 0);
    /// ```
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        let n = fields.len();
        let key_map = fields
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Self {
            fields,
            key_map,
            graph: Array2::from_elem((n, n), false),
            num_deps: 0,
        }
    }

    /// The fields in declaration order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.key_map
            .get(name)
            .copied()
            .ok_or_else(|| FitParamsError::UnknownField {
                name: name.to_string(),
            })
    }

    /// Record that `which` cannot be initialized before `source`
    ///
    /// # Arguments
    ///
    /// * `which` - The field that depends
    /// * `source` - The field it depends on
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the edge was added, `Ok(false)` if it was already present.
    /// Fails with [`FitParamsError::InvalidDependency`] if `which == source` and
    /// with [`FitParamsError::CircularDependency`] if `source` already depends
    /// on `which`. The graph is left unchanged on failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use fitparams_rs::depgraph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new(["a", "b"]);
    /// assert!(graph.add_dependency("a", "b").unwrap());
    /// assert!(!graph.add_dependency("a", "b").unwrap());
    /// assert!(graph.add_dependency("b", "a").is_err());
    /// assert_eq!(graph.dependency_count(), 1);
    /// ```
    pub fn add_dependency(&mut self, which: &str, source: &str) -> Result<bool> {
        if which == source {
            return Err(FitParamsError::InvalidDependency {
                field: which.to_string(),
            });
        }

        let wi = self.index_of(which)?;
        let si = self.index_of(source)?;

        if self.graph[[wi, si]] {
            return Ok(false);
        }

        if self.graph[[si, wi]] {
            return Err(FitParamsError::CircularDependency {
                fields: vec![which.to_string(), source.to_string(), which.to_string()],
            });
        }

        self.graph[[wi, si]] = true;
        self.num_deps += 1;
        Ok(true)
    }

    /// Whether `which` directly depends on `source`
    pub fn depends_on(&self, which: &str, source: &str) -> bool {
        match (self.key_map.get(which), self.key_map.get(source)) {
            (Some(&wi), Some(&si)) => self.graph[[wi, si]],
            _ => false,
        }
    }

    /// The number of dependencies (edges in the graph)
    pub fn dependency_count(&self) -> usize {
        self.num_deps
    }

    /// Find a closed cycle of dependencies
    ///
    /// # Returns
    ///
    /// The fields along the first cycle found, starting and ending with the same
    /// field, or `None` if the graph is acyclic.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let n = self.len();
        let mut marks = vec![Mark::Unvisited; n];
        let mut path = Vec::new();

        for start in 0..n {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            if let Some(cycle) = self.visit(start, &mut marks, &mut path) {
                return Some(cycle.into_iter().map(|i| self.fields[i].clone()).collect());
            }
        }

        None
    }

    fn visit(&self, node: usize, marks: &mut [Mark], path: &mut Vec<usize>) -> Option<Vec<usize>> {
        marks[node] = Mark::InProgress;
        path.push(node);

        for (next, &edge) in self.graph.row(node).iter().enumerate() {
            if !edge {
                continue;
            }
            match marks[next] {
                Mark::InProgress => {
                    // `next` is on the current path, so the cycle starts there
                    let start = path.iter().position(|&i| i == next).unwrap_or(0);
                    let mut cycle = path[start..].to_vec();
                    cycle.push(next);
                    return Some(cycle);
                }
                Mark::Unvisited => {
                    if let Some(cycle) = self.visit(next, marks, path) {
                        return Some(cycle);
                    }
                }
                Mark::Done => {}
            }
        }

        path.pop();
        marks[node] = Mark::Done;
        None
    }

    /// Whether the dependency graph contains closed cycles
    pub fn has_closed_cycles(&self) -> bool {
        self.find_cycle().is_some()
    }

    /// Compute the order in which the fields have to be initialized
    ///
    /// Every field comes after all fields it depends on. Among the fields that
    /// are free at the same time, the one declared first is taken, so the
    /// result is deterministic and a graph without edges yields the declaration
    /// order unchanged.
    ///
    /// # Returns
    ///
    /// The field names in initialization order, or
    /// [`FitParamsError::CircularDependency`] if the graph contains a cycle.
    ///
    /// # Examples
    ///
    /// ```
    /// use fitparams_rs::depgraph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new(["a", "b", "c", "d"]);
    /// graph.add_dependency("a", "b").unwrap();
    /// graph.add_dependency("b", "d").unwrap();
    /// graph.add_dependency("c", "a").unwrap();
    /// graph.add_dependency("c", "d").unwrap();
    ///
    /// assert_eq!(graph.init_order().unwrap(), vec!["d", "b", "a", "c"]);
    /// ```
    pub fn init_order(&self) -> Result<Vec<String>> {
        if let Some(fields) = self.find_cycle() {
            return Err(FitParamsError::CircularDependency { fields });
        }

        let n = self.len();

        // Number of still unresolved fields each field depends on
        let mut pending: Vec<usize> = (0..n)
            .map(|i| self.graph.row(i).iter().filter(|&&edge| edge).count())
            .collect();

        let mut remaining: Vec<usize> = (0..n).collect();
        let mut order = Vec::with_capacity(n);

        while !remaining.is_empty() {
            let pos = remaining
                .iter()
                .position(|&i| pending[i] == 0)
                .ok_or_else(|| FitParamsError::CircularDependency {
                    fields: remaining.iter().map(|&i| self.fields[i].clone()).collect(),
                })?;
            let idx = remaining.remove(pos);

            for &i in &remaining {
                if self.graph[[i, idx]] {
                    pending[i] -= 1;
                }
            }

            order.push(self.fields[idx].clone());
        }

        Ok(order)
    }
}
