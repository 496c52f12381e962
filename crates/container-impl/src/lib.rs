//! # Container Impl
//!
//! 组件容器的生命周期引擎及默认协作者实现。
//!
//! ## 核心组件
//!
//! - [`ComponentContainer`] - 依赖驱动的容器状态机
//! - [`Repository`] - 组件实例仓库
//! - [`SatisfactionIndex`] - 组件到外部依赖的满足状态索引
//! - [`MetadataRecipeBuilder`] - 由组件定义构建配方图
//! - [`NamespaceHandlerRegistryImpl`] - 命名空间处理器注册表
//! - [`EventEmitter`] / [`EventBus`] - 生命周期事件分发
//!
//! ## 线程模型
//!
//! 状态机在 tokio 阻塞线程池上运行，同一时刻最多一个运行持有容器锁；
//! 外部通知只合并调度请求，宽限期定时器在独立任务中等待。

pub mod container;
pub mod converter;
pub mod destroyables;
pub mod emitter;
pub mod namespace;
pub mod processors;
pub mod publication;
pub mod recipe_builder;
pub mod repository;
pub mod satisfaction;
pub mod timer;

pub use container::{ComponentContainer, ContainerConfig, ContainerContext, ContainerStats};
pub use converter::AggregateConverter;
pub use destroyables::DestroyableRegistry;
pub use emitter::{EventBus, EventEmitter};
pub use namespace::NamespaceHandlerRegistryImpl;
pub use processors::ProcessorPass;
pub use publication::ServicePublisher;
pub use recipe_builder::MetadataRecipeBuilder;
pub use repository::{CreationEnv, Repository};
pub use satisfaction::SatisfactionIndex;
pub use timer::GraceTimer;
