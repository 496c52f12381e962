//! 元数据到配方图的默认构建器

use container_abstractions::{
    RecipeBuilder, RecipeGraph, RecipeId, RecipeKind, SatisfiableFactory,
};
use container_common::{
    BeanScope, ComponentDefinitionRegistry, ContainerResult, Metadata, ServiceReferenceMetadata,
};
use std::sync::Arc;
use tracing::debug;

/// 元数据配方构建器
///
/// 每个元数据节点对应一个配方节点，子元数据成为嵌套配方。
/// 服务引用和引用集合通过 [`SatisfiableFactory`] 创建依赖跟踪器；
/// `Ref` 与 `depends-on` 在所有顶层节点建好之后连到目标顶层节点上。
pub struct MetadataRecipeBuilder {
    satisfiables: Arc<dyn SatisfiableFactory>,
}

impl MetadataRecipeBuilder {
    /// 创建构建器
    pub fn new(satisfiables: Arc<dyn SatisfiableFactory>) -> Self {
        Self { satisfiables }
    }

    fn add(
        &self,
        graph: &mut RecipeGraph,
        name: Option<&str>,
        metadata: &Metadata,
        links: &mut Vec<(RecipeId, String)>,
    ) -> ContainerResult<RecipeId> {
        let kind = match metadata {
            Metadata::Bean(bean) => RecipeKind::Bean {
                prototype: bean.scope == BeanScope::Prototype,
            },
            Metadata::Service(_) => RecipeKind::Service,
            Metadata::ServiceReference(reference) => {
                RecipeKind::Satisfiable(self.satisfiable(graph, name, reference)?)
            }
            Metadata::RefCollection(collection) => {
                RecipeKind::Satisfiable(self.satisfiable(graph, name, &collection.reference)?)
            }
            Metadata::Collection(_) => RecipeKind::Collection,
            Metadata::Map(_) | Metadata::Props(_) => RecipeKind::Map,
            Metadata::Ref(reference) => RecipeKind::Ref {
                target: reference.component_id.clone(),
            },
            Metadata::IdRef(reference) => RecipeKind::IdRef {
                target: reference.component_id.clone(),
            },
            Metadata::Value(_) | Metadata::Null => RecipeKind::Value,
        };
        let id = graph.add_node(name.map(str::to_string), kind);

        match metadata {
            Metadata::Ref(reference) => links.push((id, reference.component_id.clone())),
            Metadata::Bean(bean) => {
                for dependency in &bean.depends_on {
                    let edge = graph.add_node(
                        None,
                        RecipeKind::Ref {
                            target: dependency.clone(),
                        },
                    );
                    graph.add_nested(id, edge);
                    links.push((edge, dependency.clone()));
                }
            }
            _ => {}
        }

        for child in metadata.children() {
            let child_id = self.add(graph, None, child, links)?;
            graph.add_nested(id, child_id);
        }
        Ok(id)
    }

    fn satisfiable(
        &self,
        graph: &RecipeGraph,
        name: Option<&str>,
        reference: &ServiceReferenceMetadata,
    ) -> ContainerResult<Arc<dyn container_abstractions::Satisfiable>> {
        let name = match name {
            Some(name) => name.to_string(),
            None => format!(".reference-{}", graph.len()),
        };
        self.satisfiables.create(&name, reference)
    }
}

impl RecipeBuilder for MetadataRecipeBuilder {
    fn build(&self, registry: &ComponentDefinitionRegistry) -> ContainerResult<RecipeGraph> {
        let mut graph = RecipeGraph::new();
        let mut links = Vec::new();
        for (name, metadata) in registry.iter() {
            let id = self.add(&mut graph, Some(name), metadata, &mut links)?;
            graph.set_top_level(name, id);
        }
        for (node, target) in links {
            if let Some(target_id) = graph.top_level(&target) {
                graph.add_nested(node, target_id);
            }
        }
        debug!(
            "构建配方图: {} 个顶层组件, {} 个节点",
            registry.len(),
            graph.len()
        );
        Ok(graph)
    }
}
