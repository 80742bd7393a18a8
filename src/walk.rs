//! Breadth-by-depth dependency traversal

use crate::error::{StarsError, StarsResult};
use std::collections::{BTreeMap, VecDeque};
use tracing::debug;

/// Supplies the direct dependencies of a package
pub trait DependencySource {
    fn dependencies(&self, name: &str) -> StarsResult<Vec<String>>;
}

/// Lower-cased package name to the depth it was first reached at (or less)
pub type DepthMap = BTreeMap<String, u32>;

/// Expands the dependency graph from a root package up to a depth bound
#[derive(Debug, Clone, Copy)]
pub struct DependencyWalker {
    max_depth: u32,
}

impl DependencyWalker {
    /// Reject negative depths before anything touches pip or the network
    pub fn new(max_depth: i64) -> StarsResult<Self> {
        let max_depth = u32::try_from(max_depth).map_err(|_| StarsError::InvalidDepth(max_depth))?;
        Ok(Self { max_depth })
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Walk from `root`, calling `on_depth` whenever the frontier moves one level deeper.
    ///
    /// A package is expanded once, at the depth it is first popped. Later
    /// sightings only lower the recorded depth; its dependencies are not
    /// re-enqueued.
    pub fn walk_with_progress<S, F>(
        &self,
        root: &str,
        source: &S,
        mut on_depth: F,
    ) -> StarsResult<DepthMap>
    where
        S: DependencySource + ?Sized,
        F: FnMut(u32),
    {
        let mut visited = DepthMap::new();
        let mut queue = VecDeque::from([(root.to_lowercase(), 0u32)]);
        let mut current_depth = 0;

        while let Some((name, depth)) = queue.pop_front() {
            if depth != current_depth {
                current_depth = depth;
                on_depth(depth);
            }

            if let Some(recorded) = visited.get_mut(&name) {
                debug!("skip: already checked: {}", name);
                *recorded = (*recorded).min(depth);
                continue;
            }

            visited.insert(name.clone(), depth);
            let dependencies = source.dependencies(&name)?;

            if depth < self.max_depth {
                queue.extend(
                    dependencies
                        .into_iter()
                        .map(|dep| (dep.to_lowercase(), depth + 1)),
                );
            }
        }

        Ok(visited)
    }

    pub fn walk<S>(&self, root: &str, source: &S) -> StarsResult<DepthMap>
    where
        S: DependencySource + ?Sized,
    {
        self.walk_with_progress(root, source, |_| {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Graph {
        edges: HashMap<&'static str, Vec<&'static str>>,
        fetched: RefCell<Vec<String>>,
    }

    impl Graph {
        fn new(edges: &[(&'static str, &[&'static str])]) -> Self {
            Self {
                edges: edges.iter().map(|(k, v)| (*k, v.to_vec())).collect(),
                fetched: RefCell::default(),
            }
        }

        fn fetched(&self) -> Vec<String> {
            self.fetched.borrow().clone()
        }
    }

    impl DependencySource for Graph {
        fn dependencies(&self, name: &str) -> StarsResult<Vec<String>> {
            self.fetched.borrow_mut().push(name.to_string());
            Ok(self
                .edges
                .get(name)
                .map(|deps| deps.iter().map(|d| d.to_string()).collect())
                .unwrap_or_default())
        }
    }

    #[test]
    fn negative_depth_is_rejected() {
        let err = DependencyWalker::new(-1).unwrap_err();
        assert!(matches!(err, StarsError::InvalidDepth(-1)));
        assert_eq!(err.exit_code(), 22);
    }

    #[test]
    fn depth_zero_fetches_root_only() {
        let graph = Graph::new(&[("root", &["a", "b"])]);
        let map = DependencyWalker::new(0).unwrap().walk("Root", &graph).unwrap();

        assert_eq!(map, DepthMap::from([("root".to_string(), 0)]));
        assert_eq!(graph.fetched(), vec!["root"]);
    }

    #[test]
    fn packages_are_expanded_once_case_insensitively() {
        let graph = Graph::new(&[
            ("root", &["A", "b"]),
            ("a", &["Shared"]),
            ("b", &["shared", "a"]),
            ("shared", &["leaf"]),
        ]);
        let map = DependencyWalker::new(5).unwrap().walk("root", &graph).unwrap();

        let mut fetched = graph.fetched();
        fetched.sort();
        let mut unique = fetched.clone();
        unique.dedup();
        assert_eq!(fetched, unique);

        assert_eq!(map["a"], 1);
        assert_eq!(map["shared"], 2);
        assert_eq!(map["leaf"], 3);
    }

    #[test]
    fn minimum_depth_is_kept_for_later_sightings() {
        // "deep" is reachable at depth 1 from root and at depth 2 via a
        let graph = Graph::new(&[("root", &["a", "deep"]), ("a", &["deep"])]);
        let map = DependencyWalker::new(3).unwrap().walk("root", &graph).unwrap();

        assert_eq!(map["deep"], 1);
        assert_eq!(
            graph.fetched().iter().filter(|n| *n == "deep").count(),
            1
        );
    }

    #[test]
    fn cycles_terminate() {
        let graph = Graph::new(&[("a", &["b"]), ("b", &["a"])]);
        let map = DependencyWalker::new(10).unwrap().walk("a", &graph).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], 0);
    }

    #[test]
    fn progress_reports_each_new_depth() {
        let graph = Graph::new(&[("root", &["a"]), ("a", &["b"])]);
        let mut depths = Vec::new();
        DependencyWalker::new(2)
            .unwrap()
            .walk_with_progress("root", &graph, |d| depths.push(d))
            .unwrap();
        assert_eq!(depths, vec![1, 2]);
    }

    #[test]
    fn errors_stop_the_walk() {
        struct Failing;
        impl DependencySource for Failing {
            fn dependencies(&self, name: &str) -> StarsResult<Vec<String>> {
                Err(StarsError::PackageNotInstalled {
                    name: name.to_string(),
                })
            }
        }

        let err = DependencyWalker::new(1).unwrap().walk("x", &Failing).unwrap_err();
        assert!(matches!(err, StarsError::PackageNotInstalled { .. }));
    }
}
