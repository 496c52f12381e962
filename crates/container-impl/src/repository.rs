//! 组件实例仓库
//!
//! 仓库拥有当前配方图和已创建的实例，负责单例缓存、循环创建检测，
//! 以及按创建顺序的逆序销毁。

use container_abstractions::{
    BeanProcessor, ComponentInstance, Converter, DestroyableSink, ExecutionContext, HostBundle,
    InstanceResolver, ObjectFactory, RecipeGraph, RecipeKind,
};
use container_common::{ComponentDefinitionRegistry, ContainerError, ContainerResult};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// 创建组件时所需的环境
pub struct CreationEnv<'a> {
    pub host: &'a dyn HostBundle,
    pub registry: &'a ComponentDefinitionRegistry,
    pub bean_processors: &'a [Arc<dyn BeanProcessor>],
    pub converter: &'a dyn Converter,
    pub destroyables: &'a dyn DestroyableSink,
}

/// 组件实例仓库
pub struct Repository {
    graph: RecipeGraph,
    factory: Arc<dyn ObjectFactory>,
    instances: Mutex<HashMap<String, ComponentInstance>>,
    creation_order: Mutex<Vec<String>>,
    creating: Mutex<HashSet<String>>,
}

impl Repository {
    /// 创建仓库
    pub fn new(graph: RecipeGraph, factory: Arc<dyn ObjectFactory>) -> Self {
        Self {
            graph,
            factory,
            instances: Mutex::new(HashMap::new()),
            creation_order: Mutex::new(Vec::new()),
            creating: Mutex::new(HashSet::new()),
        }
    }

    /// 当前配方图
    pub fn graph(&self) -> &RecipeGraph {
        &self.graph
    }

    /// 已创建的实例
    pub fn instance(&self, name: &str) -> Option<ComponentInstance> {
        self.instances.lock().get(name).cloned()
    }

    /// 已创建的实例数量
    pub fn instance_count(&self) -> usize {
        self.instances.lock().len()
    }

    /// 放入已存在的实例
    pub fn put_instance(&self, name: impl Into<String>, instance: ComponentInstance) {
        let name = name.into();
        if self.instances.lock().insert(name.clone(), instance).is_none() {
            self.creation_order.lock().push(name);
        }
    }

    /// 以新的配方图替换当前配方图，只保留新图中仍存在的已创建实例
    ///
    /// 不再存在于新图中的实例按创建顺序的逆序销毁。
    pub fn rebuild(&mut self, graph: RecipeGraph, bean_processors: &[Arc<dyn BeanProcessor>]) {
        let (kept, retired): (Vec<String>, Vec<String>) =
            std::mem::take(self.creation_order.get_mut())
                .into_iter()
                .partition(|name| graph.top_level(name).is_some());
        let instances = self.instances.get_mut();
        let retired: Vec<(String, ComponentInstance)> = retired
            .into_iter()
            .filter_map(|name| instances.remove(&name).map(|instance| (name, instance)))
            .collect();
        *self.creation_order.get_mut() = kept;
        self.creating.get_mut().clear();
        debug!(
            "重建配方图，保留 {} 个已创建实例，销毁 {} 个",
            self.instances.get_mut().len(),
            retired.len()
        );
        self.graph = graph;
        destroy_in_reverse(retired, bean_processors);
    }

    /// 获取或创建组件实例
    ///
    /// 单例会被缓存，原型每次都重新创建。
    pub fn create(&self, name: &str, env: &CreationEnv<'_>) -> ContainerResult<ComponentInstance> {
        if let Some(instance) = self.instance(name) {
            return Ok(instance);
        }
        let node = self
            .graph
            .top_level(name)
            .and_then(|id| self.graph.node(id))
            .ok_or_else(|| ContainerError::no_such_component(name))?;
        let prototype = matches!(node.kind, RecipeKind::Bean { prototype: true });

        if !self.creating.lock().insert(name.to_string()) {
            return Err(ContainerError::definition(format!(
                "Circular dependency detected while creating component: {name}"
            )));
        }

        debug!("创建组件: {}", name);
        let resolver = RepositoryResolver { repository: self, env };
        let context = ExecutionContext {
            host: env.host,
            registry: env.registry,
            graph: &self.graph,
            bean_processors: env.bean_processors,
            converter: env.converter,
            resolver: &resolver,
            destroyables: env.destroyables,
        };
        let result = self.factory.create(name, &context);
        self.creating.lock().remove(name);
        let instance = result?;

        if !prototype {
            self.put_instance(name, instance.clone());
        }
        Ok(instance)
    }

    /// 依次创建一批组件，遇到第一个错误即停止
    pub fn create_all(
        &self,
        names: &[String],
        env: &CreationEnv<'_>,
    ) -> ContainerResult<Vec<(String, ComponentInstance)>> {
        names
            .iter()
            .map(|name| Ok((name.clone(), self.create(name, env)?)))
            .collect()
    }

    /// 按创建顺序的逆序销毁所有实例
    pub fn destroy(&self, bean_processors: &[Arc<dyn BeanProcessor>]) {
        let order = std::mem::take(&mut *self.creation_order.lock());
        let mut instances = std::mem::take(&mut *self.instances.lock());
        let created = order
            .into_iter()
            .filter_map(|name| instances.remove(&name).map(|instance| (name, instance)))
            .collect();
        destroy_in_reverse(created, bean_processors);
    }
}

/// 逆序执行销毁回调，前后调用 Bean 处理器的销毁钩子
fn destroy_in_reverse(
    created: Vec<(String, ComponentInstance)>,
    bean_processors: &[Arc<dyn BeanProcessor>],
) {
    for (name, instance) in created.iter().rev() {
        for processor in bean_processors {
            processor.before_destroy(instance.object(), name);
        }
        if let Some(callback) = instance.destroy_callback() {
            debug!("销毁组件: {}", name);
            if let Err(e) = callback() {
                warn!("组件 {} 销毁失败: {}", name, e);
            }
        }
        for processor in bean_processors {
            processor.after_destroy(instance.object(), name);
        }
    }
}

struct RepositoryResolver<'r, 'e> {
    repository: &'r Repository,
    env: &'r CreationEnv<'e>,
}

impl InstanceResolver for RepositoryResolver<'_, '_> {
    fn resolve(&self, name: &str) -> ContainerResult<ComponentInstance> {
        self.repository.create(name, self.env)
    }
}
