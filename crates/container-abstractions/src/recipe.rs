//! 配方图
//!
//! 配方图以竞技场形式保存节点，节点之间通过 [`RecipeId`] 索引互相引用，
//! 允许出现回边（例如引用指向另一个顶层组件），遍历时使用已访问集合。

use crate::satisfiable::Satisfiable;
use container_common::{ComponentDefinitionRegistry, ContainerResult};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// 配方节点索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecipeId(pub usize);

/// 配方类别
#[derive(Clone)]
pub enum RecipeKind {
    /// Bean
    Bean {
        /// 是否为原型作用域
        prototype: bool,
    },
    /// 服务发布
    Service,
    /// 组件引用
    Ref {
        /// 目标组件 id
        target: String,
    },
    /// 组件 id 引用
    IdRef {
        /// 目标组件 id
        target: String,
    },
    /// 外部服务依赖（服务引用或引用集合）
    Satisfiable(Arc<dyn Satisfiable>),
    /// 集合
    Collection,
    /// 映射或属性表
    Map,
    /// 字面值
    Value,
}

impl fmt::Debug for RecipeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bean { prototype } => f.debug_struct("Bean").field("prototype", prototype).finish(),
            Self::Service => f.write_str("Service"),
            Self::Ref { target } => f.debug_struct("Ref").field("target", target).finish(),
            Self::IdRef { target } => f.debug_struct("IdRef").field("target", target).finish(),
            Self::Satisfiable(s) => f.debug_tuple("Satisfiable").field(&s.name()).finish(),
            Self::Collection => f.write_str("Collection"),
            Self::Map => f.write_str("Map"),
            Self::Value => f.write_str("Value"),
        }
    }
}

/// 配方节点
#[derive(Debug, Clone)]
pub struct RecipeNode {
    /// 节点名称（顶层组件即组件 id）
    pub name: Option<String>,
    /// 类别
    pub kind: RecipeKind,
    /// 嵌套配方
    pub nested: Vec<RecipeId>,
}

/// 配方图
#[derive(Debug, Clone, Default)]
pub struct RecipeGraph {
    nodes: Vec<RecipeNode>,
    top_level: BTreeMap<String, RecipeId>,
}

impl RecipeGraph {
    /// 创建空配方图
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加节点
    pub fn add_node(&mut self, name: Option<String>, kind: RecipeKind) -> RecipeId {
        let id = RecipeId(self.nodes.len());
        self.nodes.push(RecipeNode {
            name,
            kind,
            nested: Vec::new(),
        });
        id
    }

    /// 添加嵌套关系
    pub fn add_nested(&mut self, parent: RecipeId, child: RecipeId) {
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.nested.push(child);
        }
    }

    /// 把节点登记为顶层组件
    pub fn set_top_level(&mut self, name: impl Into<String>, id: RecipeId) {
        self.top_level.insert(name.into(), id);
    }

    /// 获取节点
    pub fn node(&self, id: RecipeId) -> Option<&RecipeNode> {
        self.nodes.get(id.0)
    }

    /// 顶层组件对应的节点
    pub fn top_level(&self, name: &str) -> Option<RecipeId> {
        self.top_level.get(name).copied()
    }

    /// 所有顶层组件名
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.top_level.keys().map(String::as_str)
    }

    /// 节点数量
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 从指定节点出发可达的所有节点（前序，包括自身）
    pub fn reachable_from(&self, start: RecipeId) -> Vec<RecipeId> {
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(node) = self.node(id) else {
                continue;
            };
            order.push(id);
            stack.extend(node.nested.iter().rev().copied());
        }
        order
    }

    /// 顶层组件可达的外部依赖，按名称去重并保持遍历顺序
    pub fn satisfiables_of(&self, name: &str) -> Vec<Arc<dyn Satisfiable>> {
        let Some(start) = self.top_level(name) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        self.reachable_from(start)
            .into_iter()
            .filter_map(|id| match &self.node(id)?.kind {
                RecipeKind::Satisfiable(s) => Some(Arc::clone(s)),
                _ => None,
            })
            .filter(|s| seen.insert(s.name().to_string()))
            .collect()
    }
}

/// 配方构建器
pub trait RecipeBuilder: Send + Sync {
    /// 由注册表构建配方图
    fn build(&self, registry: &ComponentDefinitionRegistry) -> ContainerResult<RecipeGraph>;
}
