//! 处理器扩展点

use crate::instance::ObjectRef;
use container_common::{BeanMetadata, ComponentDefinitionRegistry, ContainerResult};

/// 注册表处理器
///
/// 在急切创建之前被调用，可以增删或修改组件定义。
pub trait RegistryProcessor: Send + Sync {
    /// 处理注册表
    fn process(&self, registry: &mut ComponentDefinitionRegistry) -> ContainerResult<()>;
}

/// Bean 处理器
///
/// 对象工厂在每个 Bean 初始化前后调用，仓库在销毁前后调用。
pub trait BeanProcessor: Send + Sync {
    /// 初始化前
    fn before_init(
        &self,
        bean: ObjectRef,
        _name: &str,
        _metadata: &BeanMetadata,
    ) -> ContainerResult<ObjectRef> {
        Ok(bean)
    }

    /// 初始化后
    fn after_init(
        &self,
        bean: ObjectRef,
        _name: &str,
        _metadata: &BeanMetadata,
    ) -> ContainerResult<ObjectRef> {
        Ok(bean)
    }

    /// 销毁前
    fn before_destroy(&self, _bean: &ObjectRef, _name: &str) {}

    /// 销毁后
    fn after_destroy(&self, _bean: &ObjectRef, _name: &str) {}
}
