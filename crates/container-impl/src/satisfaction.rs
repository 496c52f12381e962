//! 依赖满足索引

use container_abstractions::{RecipeGraph, SatisfactionListener, Satisfiable};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// 依赖满足索引
///
/// 顶层组件 id 到其配方子树可达的外部依赖列表的映射。
/// 同一个依赖会出现在每个传递引用它的顶层组件之下。
#[derive(Default, Clone)]
pub struct SatisfactionIndex {
    entries: BTreeMap<String, Vec<Arc<dyn Satisfiable>>>,
}

impl SatisfactionIndex {
    /// 由配方图构建索引，每个顶层组件都有一项（可能为空列表）
    pub fn build(graph: &RecipeGraph) -> Self {
        let entries: BTreeMap<_, _> = graph
            .names()
            .map(|name| (name.to_string(), graph.satisfiables_of(name)))
            .collect();
        debug!("构建依赖满足索引: {} 个顶层组件", entries.len());
        Self { entries }
    }

    /// 索引是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 组件的外部依赖
    pub fn dependencies_of(&self, name: &str) -> &[Arc<dyn Satisfiable>] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 索引中的组件 id
    pub fn component_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// 所有依赖是否都已满足
    pub fn all_satisfied(&self) -> bool {
        self.distinct().iter().all(|s| s.is_satisfied())
    }

    /// 组件的所有依赖是否都已满足
    pub fn is_component_satisfied(&self, name: &str) -> bool {
        self.dependencies_of(name).iter().all(|s| s.is_satisfied())
    }

    /// 组件是否依赖指定名称的外部依赖
    pub fn depends_on(&self, name: &str, satisfiable: &str) -> bool {
        self.dependencies_of(name)
            .iter()
            .any(|s| s.name() == satisfiable)
    }

    /// 未满足依赖的过滤字符串，按名称去重
    pub fn missing_filters(&self) -> Vec<String> {
        self.distinct()
            .iter()
            .filter(|s| !s.is_satisfied())
            .map(|s| s.filter())
            .collect()
    }

    /// 启动所有依赖的跟踪，每个依赖只启动一次
    pub fn start_all(&self, listener: Arc<dyn SatisfactionListener>) {
        for satisfiable in self.distinct() {
            debug!("开始跟踪外部依赖: {}", satisfiable.name());
            satisfiable.start(Arc::clone(&listener));
        }
    }

    /// 停止所有依赖的跟踪
    pub fn stop_all(&self) {
        for satisfiable in self.distinct() {
            debug!("停止跟踪外部依赖: {}", satisfiable.name());
            satisfiable.stop();
        }
    }

    /// 不同依赖的数量
    pub fn distinct_count(&self) -> usize {
        self.distinct().len()
    }

    fn distinct(&self) -> Vec<Arc<dyn Satisfiable>> {
        let mut seen = HashSet::new();
        self.entries
            .values()
            .flatten()
            .filter(|s| seen.insert(s.name().to_string()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use container_abstractions::RecipeKind;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct Flag {
        name: &'static str,
        satisfied: AtomicBool,
        starts: AtomicUsize,
    }

    impl Flag {
        fn new(name: &'static str, satisfied: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                satisfied: AtomicBool::new(satisfied),
                starts: AtomicUsize::new(0),
            })
        }
    }

    impl Satisfiable for Flag {
        fn name(&self) -> &str {
            self.name
        }
        fn is_satisfied(&self) -> bool {
            self.satisfied.load(Ordering::SeqCst)
        }
        fn filter(&self) -> String {
            format!("(objectClass={})", self.name)
        }
        fn start(&self, _listener: Arc<dyn SatisfactionListener>) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }
        fn stop(&self) {}
    }

    struct Ignore;

    impl SatisfactionListener for Ignore {
        fn notify_satisfaction(&self, _name: &str) {}
    }

    /// a -> ref(r), b -> ref(r) + ref(q), c 无依赖
    fn graph(r: Arc<Flag>, q: Arc<Flag>) -> RecipeGraph {
        let mut graph = RecipeGraph::new();
        let r_id = graph.add_node(Some("r".into()), RecipeKind::Satisfiable(r));
        let q_id = graph.add_node(Some("q".into()), RecipeKind::Satisfiable(q));
        graph.set_top_level("r", r_id);
        graph.set_top_level("q", q_id);
        let wiring = [
            ("a", vec![("r", r_id)]),
            ("b", vec![("r", r_id), ("q", q_id)]),
            ("c", vec![]),
        ];
        for (name, targets) in wiring {
            let id = graph.add_node(Some(name.into()), RecipeKind::Bean { prototype: false });
            graph.set_top_level(name, id);
            for (target_name, target) in targets {
                let reference = graph.add_node(
                    None,
                    RecipeKind::Ref {
                        target: target_name.into(),
                    },
                );
                graph.add_nested(id, reference);
                graph.add_nested(reference, target);
            }
        }
        graph
    }

    #[test]
    fn test_shared_dependency_appears_under_each_component() {
        let r = Flag::new("r", false);
        let q = Flag::new("q", true);
        let index = SatisfactionIndex::build(&graph(r.clone(), q));

        assert!(index.depends_on("a", "r"));
        assert!(index.depends_on("b", "r"));
        assert!(index.depends_on("b", "q"));
        assert!(!index.depends_on("a", "q"));
        assert!(index.dependencies_of("c").is_empty());
        assert_eq!(index.distinct_count(), 2);

        assert!(!index.all_satisfied());
        assert_eq!(index.missing_filters(), vec!["(objectClass=r)"]);
        assert!(!index.is_component_satisfied("a"));
        assert!(index.is_component_satisfied("c"));

        r.satisfied.store(true, Ordering::SeqCst);
        assert!(index.all_satisfied());
        assert!(index.missing_filters().is_empty());
    }

    #[test]
    fn test_start_all_starts_each_dependency_once() {
        let r = Flag::new("r", true);
        let q = Flag::new("q", true);
        let index = SatisfactionIndex::build(&graph(r.clone(), q.clone()));
        index.start_all(Arc::new(Ignore));

        assert_eq!(r.starts.load(Ordering::SeqCst), 1);
        assert_eq!(q.starts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_graph_builds_empty_index() {
        let index = SatisfactionIndex::build(&RecipeGraph::new());
        assert!(index.is_empty());
        assert!(index.all_satisfied());
    }
}
