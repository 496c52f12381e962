//! 宿主框架约定的名称常量

/// 宿主 bundle 符号名头
pub const BUNDLE_SYMBOLIC_NAME: &str = "Bundle-SymbolicName";

/// 宿主 bundle 版本头
pub const BUNDLE_VERSION: &str = "Bundle-Version";

/// 容器自身发布时使用的服务接口名
pub const CONTAINER_INTERFACE: &str = "org.osgi.service.blueprint.container.BlueprintContainer";

/// 容器服务属性：宿主符号名
pub const CONTAINER_SYMBOLIC_NAME_PROPERTY: &str = "osgi.blueprint.container.symbolicname";

/// 容器服务属性：宿主版本
pub const CONTAINER_VERSION_PROPERTY: &str = "osgi.blueprint.container.version";

/// 命名空间处理器的服务接口名
pub const NAMESPACE_HANDLER_INTERFACE: &str = "org.apache.aries.blueprint.NamespaceHandler";

/// 命名空间处理器服务属性
pub const NAMESPACE_ATTRIBUTE: &str = "osgi.service.blueprint.namespace";

/// 默认宽限期（毫秒）
pub const DEFAULT_TIMEOUT_MS: u64 = 300_000;

/// 头指令：宽限期
pub const TIMEOUT_DIRECTIVE: &str = "timeout";

/// 头指令：是否等待依赖
pub const WAIT_FOR_DEPENDENCIES_DIRECTIVE: &str = "wait-for-dependencies";

/// 头指令：是否校验文档
pub const XML_VALIDATION_DIRECTIVE: &str = "xml-validation";

/// 构造缺失命名空间处理器的宿主注册表过滤字符串
pub fn namespace_handler_filter(namespace: &str) -> String {
    format!("(&(objectClass={NAMESPACE_HANDLER_INTERFACE})({NAMESPACE_ATTRIBUTE}={namespace}))")
}
