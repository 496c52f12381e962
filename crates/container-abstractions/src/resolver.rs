//! 实例解析与执行上下文
//!
//! 执行上下文在创建组件时显式传入对象工厂，不依赖任何线程局部状态。

use crate::converter::Converter;
use crate::host::HostBundle;
use crate::instance::{ComponentInstance, DestroyCallback};
use crate::processor::BeanProcessor;
use crate::recipe::RecipeGraph;
use container_common::{ComponentDefinitionRegistry, ContainerResult};
use std::sync::Arc;

/// 实例解析器
///
/// 对象工厂通过它获取嵌套引用的组件；解析器负责缓存与循环检测。
pub trait InstanceResolver {
    /// 按组件 id 获取或创建实例
    fn resolve(&self, name: &str) -> ContainerResult<ComponentInstance>;
}

/// 可销毁回调的收集器
pub trait DestroyableSink {
    /// 登记销毁回调，同名回调会被替换
    fn add_destroyable(&self, name: &str, callback: DestroyCallback);
}

/// 执行上下文
pub struct ExecutionContext<'a> {
    /// 宿主 bundle
    pub host: &'a dyn HostBundle,
    /// 组件定义
    pub registry: &'a ComponentDefinitionRegistry,
    /// 当前配方图
    pub graph: &'a RecipeGraph,
    /// 按顺序生效的 Bean 处理器
    pub bean_processors: &'a [Arc<dyn BeanProcessor>],
    /// 聚合类型转换器
    pub converter: &'a dyn Converter,
    /// 嵌套组件解析器
    pub resolver: &'a dyn InstanceResolver,
    /// 销毁回调收集器
    pub destroyables: &'a dyn DestroyableSink,
}
