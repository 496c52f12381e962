//! 命名空间处理器

use std::sync::Arc;

/// 命名空间处理器
///
/// 解析器用它来解释自定义命名空间中的元素。
pub trait NamespaceHandler: Send + Sync {
    /// 处理器负责的命名空间 URI
    fn namespace(&self) -> &str;
}

/// 监听器注册令牌
pub type ListenerToken = u64;

/// 命名空间处理器变化监听器
pub trait NamespaceListener: Send + Sync {
    /// 处理器已注册
    fn namespace_registered(&self, namespace: &str);

    /// 处理器已注销
    fn namespace_unregistered(&self, namespace: &str);
}

/// 命名空间处理器注册表
pub trait NamespaceHandlerRegistry: Send + Sync {
    /// 是否已有处理器
    fn has_handler(&self, namespace: &str) -> bool;

    /// 获取处理器
    fn handler(&self, namespace: &str) -> Option<Arc<dyn NamespaceHandler>>;

    /// 添加监听器
    fn add_listener(&self, listener: Arc<dyn NamespaceListener>) -> ListenerToken;

    /// 移除监听器
    fn remove_listener(&self, token: ListenerToken);
}
