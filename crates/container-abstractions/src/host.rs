//! 宿主模块框架

use crate::instance::ObjectRef;
use container_common::{BundleIdentity, ClassDescriptor, ContainerResult};
use std::collections::BTreeMap;

/// 服务属性
pub type ServiceProperties = BTreeMap<String, String>;

/// 宿主注册表中的服务注册
pub trait ServiceRegistrationHandle: Send + Sync {
    /// 注销服务
    fn unregister(&self);
}

/// 宿主 bundle
///
/// 提供头信息、类加载命名空间和服务注册表。
pub trait HostBundle: Send + Sync {
    /// bundle 身份
    fn identity(&self) -> BundleIdentity;

    /// 读取头
    fn header(&self, name: &str) -> Option<String>;

    /// 通过 bundle 自身的类加载器解析类
    fn load_class(&self, class_name: &str) -> ContainerResult<ClassDescriptor>;

    /// 注册服务
    fn register_service(
        &self,
        interfaces: &[String],
        service: ObjectRef,
        properties: ServiceProperties,
    ) -> ContainerResult<Box<dyn ServiceRegistrationHandle>>;
}
