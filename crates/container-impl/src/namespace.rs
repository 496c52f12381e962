//! 默认命名空间处理器注册表

use container_abstractions::{
    ListenerToken, NamespaceHandler, NamespaceHandlerRegistry, NamespaceListener,
};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// 命名空间处理器注册表实现
///
/// 注册或注销处理器时通知所有监听器。通知在不持有内部锁的情况下进行。
#[derive(Default)]
pub struct NamespaceHandlerRegistryImpl {
    handlers: DashMap<String, Arc<dyn NamespaceHandler>>,
    listeners: DashMap<ListenerToken, Arc<dyn NamespaceListener>>,
    next_token: AtomicU64,
}

impl NamespaceHandlerRegistryImpl {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册处理器
    pub fn register_handler(&self, handler: Arc<dyn NamespaceHandler>) {
        let namespace = handler.namespace().to_string();
        info!("注册命名空间处理器: {}", namespace);
        self.handlers.insert(namespace.clone(), handler);
        for listener in self.snapshot() {
            listener.namespace_registered(&namespace);
        }
    }

    /// 注销处理器
    pub fn unregister_handler(&self, namespace: &str) -> Option<Arc<dyn NamespaceHandler>> {
        let (_, handler) = self.handlers.remove(namespace)?;
        info!("注销命名空间处理器: {}", namespace);
        for listener in self.snapshot() {
            listener.namespace_unregistered(namespace);
        }
        Some(handler)
    }

    /// 已注册的命名空间
    pub fn namespaces(&self) -> Vec<String> {
        let mut namespaces: Vec<_> = self.handlers.iter().map(|e| e.key().clone()).collect();
        namespaces.sort();
        namespaces
    }

    /// 监听器数量
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn snapshot(&self) -> Vec<Arc<dyn NamespaceListener>> {
        self.listeners.iter().map(|e| Arc::clone(e.value())).collect()
    }
}

impl NamespaceHandlerRegistry for NamespaceHandlerRegistryImpl {
    fn has_handler(&self, namespace: &str) -> bool {
        self.handlers.contains_key(namespace)
    }

    fn handler(&self, namespace: &str) -> Option<Arc<dyn NamespaceHandler>> {
        self.handlers.get(namespace).map(|e| Arc::clone(e.value()))
    }

    fn add_listener(&self, listener: Arc<dyn NamespaceListener>) -> ListenerToken {
        let token = self.next_token.fetch_add(1, Ordering::SeqCst);
        self.listeners.insert(token, listener);
        debug!("添加命名空间监听器: {}", token);
        token
    }

    fn remove_listener(&self, token: ListenerToken) {
        if self.listeners.remove(&token).is_some() {
            debug!("移除命名空间监听器: {}", token);
        }
    }
}
