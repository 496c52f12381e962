//! 生命周期事件监听

use container_common::ContainerEvent;

/// 容器事件监听器
pub trait ContainerEventListener: Send + Sync {
    /// 收到事件
    fn on_event(&self, event: &ContainerEvent);
}
