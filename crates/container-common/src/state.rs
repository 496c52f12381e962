//! 容器生命周期状态

use serde::{Deserialize, Serialize};
use std::fmt;

/// 容器生命周期状态
///
/// ```text
/// Unknown ─► WaitForNamespaceHandlers ─► Populated ─┬─► InitialReferencesSatisfied ─┬─► Create ─► Created
///                                                   └─► WaitForInitialReferences ───┘ └─► WaitForInitialReferences2 ─► Create
/// 任意状态 ──(错误 / 超时)──► Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ContainerState {
    /// 尚未开始
    #[default]
    Unknown,
    /// 等待文档引用的命名空间处理器
    WaitForNamespaceHandlers,
    /// 注册表已填充
    Populated,
    /// 等待初始服务引用满足
    WaitForInitialReferences,
    /// 初始服务引用已满足，准备执行处理器阶段
    InitialReferencesSatisfied,
    /// 处理器阶段之后再次等待服务引用
    WaitForInitialReferences2,
    /// 正在创建急切组件并发布服务
    Create,
    /// 创建完成（终态）
    Created,
    /// 失败（终态）
    Failed,
}

impl ContainerState {
    /// 全部状态，按驱动顺序排列
    pub const ALL: [ContainerState; 9] = [
        Self::Unknown,
        Self::WaitForNamespaceHandlers,
        Self::Populated,
        Self::WaitForInitialReferences,
        Self::InitialReferencesSatisfied,
        Self::WaitForInitialReferences2,
        Self::Create,
        Self::Created,
        Self::Failed,
    ];

    /// 是否为终态
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Created | Self::Failed)
    }

    /// 该状态下宽限期定时器是否应处于启动状态
    pub fn arms_grace_timer(self) -> bool {
        matches!(
            self,
            Self::Populated
                | Self::WaitForInitialReferences
                | Self::InitialReferencesSatisfied
                | Self::WaitForInitialReferences2
        )
    }

    /// 是否在等待服务引用满足
    pub fn is_waiting_for_references(self) -> bool {
        matches!(
            self,
            Self::WaitForInitialReferences | Self::WaitForInitialReferences2
        )
    }

    /// 紧凑编码，用于无锁读取的状态镜像
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// 从紧凑编码还原
    pub fn from_u8(value: u8) -> Self {
        Self::ALL
            .get(value as usize)
            .copied()
            .unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        let terminal: Vec<_> = ContainerState::ALL
            .iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(terminal, vec![&ContainerState::Created, &ContainerState::Failed]);
    }

    #[test]
    fn test_grace_timer_states() {
        assert!(!ContainerState::WaitForNamespaceHandlers.arms_grace_timer());
        assert!(ContainerState::Populated.arms_grace_timer());
        assert!(ContainerState::WaitForInitialReferences2.arms_grace_timer());
        assert!(!ContainerState::Create.arms_grace_timer());
        assert!(!ContainerState::Failed.arms_grace_timer());
    }

    #[test]
    fn test_u8_encoding() {
        for state in ContainerState::ALL {
            assert_eq!(ContainerState::from_u8(state.as_u8()), state);
        }
    }
}
