//! 组件实例
//!
//! 对象工厂创建的实例以类型擦除的 [`ObjectRef`] 表示，同时携带实例实现的
//! 扩展能力（处理器、类型转换器、服务发布、销毁回调）。

use crate::converter::Converter;
use crate::processor::{BeanProcessor, RegistryProcessor};
use container_common::{BoxError, ContainerResult};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 类型擦除的组件对象
pub type ObjectRef = Arc<dyn Any + Send + Sync>;

/// 销毁回调
pub type DestroyCallback = Arc<dyn Fn() -> Result<(), BoxError> + Send + Sync>;

/// 服务发布句柄
///
/// 由服务组件的实例提供，注册与注销都必须是幂等的。
pub trait ServicePublication: Send + Sync {
    /// 在宿主注册表中注册服务
    fn register(&self) -> ContainerResult<()>;

    /// 注销服务
    fn unregister(&self);

    /// 当前是否已注册
    fn is_registered(&self) -> bool;
}

/// 组件实例
#[derive(Clone)]
pub struct ComponentInstance {
    object: ObjectRef,
    registry_processor: Option<Arc<dyn RegistryProcessor>>,
    bean_processor: Option<Arc<dyn BeanProcessor>>,
    converter: Option<Arc<dyn Converter>>,
    publication: Option<Arc<dyn ServicePublication>>,
    destroy: Option<DestroyCallback>,
}

impl ComponentInstance {
    /// 包装对象
    pub fn new(object: ObjectRef) -> Self {
        Self {
            object,
            registry_processor: None,
            bean_processor: None,
            converter: None,
            publication: None,
            destroy: None,
        }
    }

    /// 由具体值创建
    pub fn from_value<T: Any + Send + Sync>(value: T) -> Self {
        Self::new(Arc::new(value))
    }

    /// 底层对象
    pub fn object(&self) -> &ObjectRef {
        &self.object
    }

    /// 尝试转换为具体类型
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.object).downcast::<T>().ok()
    }

    /// 声明注册表处理器能力
    pub fn with_registry_processor(mut self, processor: Arc<dyn RegistryProcessor>) -> Self {
        self.registry_processor = Some(processor);
        self
    }

    /// 声明 Bean 处理器能力
    pub fn with_bean_processor(mut self, processor: Arc<dyn BeanProcessor>) -> Self {
        self.bean_processor = Some(processor);
        self
    }

    /// 声明类型转换器能力
    pub fn with_converter(mut self, converter: Arc<dyn Converter>) -> Self {
        self.converter = Some(converter);
        self
    }

    /// 声明服务发布能力
    pub fn with_publication(mut self, publication: Arc<dyn ServicePublication>) -> Self {
        self.publication = Some(publication);
        self
    }

    /// 设置销毁回调
    pub fn with_destroy_callback(mut self, callback: DestroyCallback) -> Self {
        self.destroy = Some(callback);
        self
    }

    pub fn registry_processor(&self) -> Option<&Arc<dyn RegistryProcessor>> {
        self.registry_processor.as_ref()
    }

    pub fn bean_processor(&self) -> Option<&Arc<dyn BeanProcessor>> {
        self.bean_processor.as_ref()
    }

    pub fn converter(&self) -> Option<&Arc<dyn Converter>> {
        self.converter.as_ref()
    }

    pub fn publication(&self) -> Option<&Arc<dyn ServicePublication>> {
        self.publication.as_ref()
    }

    pub fn destroy_callback(&self) -> Option<&DestroyCallback> {
        self.destroy.as_ref()
    }
}

impl fmt::Debug for ComponentInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("registry_processor", &self.registry_processor.is_some())
            .field("bean_processor", &self.bean_processor.is_some())
            .field("converter", &self.converter.is_some())
            .field("publication", &self.publication.is_some())
            .field("destroy", &self.destroy.is_some())
            .finish_non_exhaustive()
    }
}
