//! # Container Common
//!
//! 这个 crate 提供了组件容器各层共享的数据模型和工具。
//!
//! ## 核心组件
//!
//! - [`Metadata`] - 标签化的组件定义元数据及其访问者
//! - [`ComponentDefinitionRegistry`] - 顶层组件定义注册表
//! - [`ContainerState`] - 容器生命周期状态
//! - [`ContainerEvent`] - 生命周期事件
//! - [`ContainerDirectives`] - 宿主头指令
//! - [`ContainerError`] - 统一错误类型
//!
//! ## 设计原则
//!
//! - 元数据使用枚举加访问者，而不是运行时类型判断
//! - 所有错误都可以转换为可序列化的失败原因
//! - 不依赖异步运行时

pub mod constants;
pub mod directives;
pub mod errors;
pub mod events;
pub mod metadata;
pub mod registry;
pub mod state;

pub use constants::*;
pub use directives::*;
pub use errors::*;
pub use events::*;
pub use metadata::*;
pub use registry::*;
pub use state::*;
