//! 外部服务依赖

use container_common::{ContainerResult, ServiceReferenceMetadata};
use std::sync::Arc;

/// 满足状态变化监听器
pub trait SatisfactionListener: Send + Sync {
    /// 依赖的满足状态发生了变化
    fn notify_satisfaction(&self, name: &str);
}

/// 可满足的外部服务依赖
///
/// 每个依赖有稳定的名称，启动后在状态翻转时回调监听器。
/// 回调中不得同步获取容器锁。
pub trait Satisfiable: Send + Sync {
    /// 稳定名称
    fn name(&self) -> &str;

    /// 当前是否满足
    fn is_satisfied(&self) -> bool;

    /// 宿主注册表过滤字符串
    fn filter(&self) -> String;

    /// 开始跟踪
    fn start(&self, listener: Arc<dyn SatisfactionListener>);

    /// 停止跟踪
    fn stop(&self);
}

/// 为服务引用元数据创建依赖跟踪器
pub trait SatisfiableFactory: Send + Sync {
    /// 创建跟踪器
    fn create(
        &self,
        name: &str,
        reference: &ServiceReferenceMetadata,
    ) -> ContainerResult<Arc<dyn Satisfiable>>;
}
