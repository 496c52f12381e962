//! 对象工厂
//!
//! 对象工厂是配方引擎的入口，负责把一个顶层组件的配方求值为实例。

use crate::instance::ComponentInstance;
use crate::resolver::ExecutionContext;
use container_common::ContainerResult;

/// 对象工厂 trait
pub trait ObjectFactory: Send + Sync {
    /// 创建指定组件的实例
    ///
    /// 实现应在创建 Bean 时依次调用上下文中的 Bean 处理器，
    /// 并通过上下文中的解析器获取引用的其他组件。
    fn create(
        &self,
        name: &str,
        context: &ExecutionContext<'_>,
    ) -> ContainerResult<ComponentInstance>;
}
