//! 生命周期事件发布

use container_abstractions::ContainerEventListener;
use container_common::{
    BundleIdentity, ContainerError, ContainerEvent, ContainerEventKind, FailureCause,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

/// 事件发布器
///
/// 为每个事件填充宿主与扩展器身份，并同步分发给所有监听器。
#[derive(Clone)]
pub struct EventEmitter {
    bundle: BundleIdentity,
    extender: BundleIdentity,
    listeners: Vec<Arc<dyn ContainerEventListener>>,
}

impl EventEmitter {
    /// 创建事件发布器
    pub fn new(bundle: BundleIdentity, extender: BundleIdentity) -> Self {
        Self {
            bundle,
            extender,
            listeners: Vec::new(),
        }
    }

    /// 添加监听器
    pub fn with_listener(mut self, listener: Arc<dyn ContainerEventListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// 宿主 bundle
    pub fn bundle(&self) -> &BundleIdentity {
        &self.bundle
    }

    fn event(&self, kind: ContainerEventKind) -> ContainerEvent {
        ContainerEvent::new(kind, self.bundle.clone(), self.extender.clone())
    }

    fn emit(&self, event: ContainerEvent) {
        debug!("发布事件 {:?}: {}", event.kind, self.bundle);
        for listener in &self.listeners {
            listener.on_event(&event);
        }
    }

    /// 开始创建
    pub fn creating(&self) {
        info!("开始创建容器: {}", self.bundle);
        self.emit(self.event(ContainerEventKind::Creating));
    }

    /// 等待依赖
    pub fn grace_period(&self, missing: Vec<String>) {
        info!("容器 {} 等待依赖: {:?}", self.bundle, missing);
        self.emit(
            self.event(ContainerEventKind::GracePeriod)
                .with_missing_dependencies(missing),
        );
    }

    /// 创建完成
    pub fn created(&self) {
        info!("容器创建完成: {}", self.bundle);
        self.emit(self.event(ContainerEventKind::Created));
    }

    /// 创建失败
    pub fn failure(&self, cause: &ContainerError, missing: Vec<String>) {
        error!("容器 {} 创建失败: {}", self.bundle, cause);
        self.emit(
            self.event(ContainerEventKind::Failure)
                .with_missing_dependencies(missing)
                .with_cause(FailureCause::from(cause)),
        );
    }

    /// 开始销毁
    pub fn destroying(&self) {
        info!("开始销毁容器: {}", self.bundle);
        self.emit(self.event(ContainerEventKind::Destroying));
    }

    /// 销毁完成
    pub fn destroyed(&self) {
        info!("容器已销毁: {}", self.bundle);
        self.emit(self.event(ContainerEventKind::Destroyed));
    }
}

/// 广播事件总线
///
/// [`tokio::sync::broadcast`] 的薄封装。发布从不阻塞，没有订阅者时事件被丢弃，
/// 落后的订阅者会收到 `RecvError::Lagged`。
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<ContainerEvent>,
}

impl EventBus {
    /// 创建事件总线，容量至少为 1
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// 发布事件
    pub fn publish(&self, event: ContainerEvent) {
        let _ = self.tx.send(event);
    }

    /// 订阅后续事件
    pub fn subscribe(&self) -> broadcast::Receiver<ContainerEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl ContainerEventListener for EventBus {
    fn on_event(&self, event: &ContainerEvent) {
        self.publish(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use container_common::ErrorKind;

    fn emitter_with_bus() -> (EventEmitter, EventBus) {
        let bus = EventBus::new(16);
        let emitter = EventEmitter::new(
            BundleIdentity::new(5, "com.example.app", "1.0.0"),
            BundleIdentity::new(1, "extender", "0.1.0"),
        )
        .with_listener(Arc::new(bus.clone()));
        (emitter, bus)
    }

    #[tokio::test]
    async fn test_events_reach_bus_subscribers() {
        let (emitter, bus) = emitter_with_bus();
        let mut rx = bus.subscribe();

        emitter.creating();
        emitter.grace_period(vec!["(objectClass=a)".to_string()]);
        emitter.failure(&ContainerError::Timeout { timeout_ms: 50 }, vec![]);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, ContainerEventKind::Creating);
        assert_eq!(first.bundle.symbolic_name, "com.example.app");

        let second = rx.recv().await.unwrap();
        assert_eq!(second.missing_dependencies, vec!["(objectClass=a)"]);

        let third = rx.recv().await.unwrap();
        assert_eq!(third.kind, ContainerEventKind::Failure);
        assert_eq!(third.cause_kind(), Some(ErrorKind::Timeout));
    }

    #[test]
    fn test_publish_without_subscribers_is_dropped() {
        let (emitter, _bus) = emitter_with_bus();
        emitter.destroyed();
    }
}
