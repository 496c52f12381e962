//! # 容器组合层
//!
//! 这个 crate 负责把生命周期引擎和宿主提供的协作者组装成可运行的容器。
//!
//! ## 主要功能
//!
//! - **扩展器配置**: 从 TOML 文件和环境变量加载 [`ExtenderSettings`]
//! - **日志初始化**: [`LoggingConfig`] 的开发/生产预设
//! - **容器构建器**: 使用构建者模式装配 [`ComponentContainer`]
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use container_composition::{ContainerBuilder, ExtenderSettings, LoggingConfig};
//! # use std::sync::Arc;
//! # fn collaborators() -> (
//! #     Arc<dyn container_abstractions::HostBundle>,
//! #     Arc<dyn container_abstractions::ParserFactory>,
//! #     Arc<dyn container_abstractions::SatisfiableFactory>,
//! #     Arc<dyn container_abstractions::ObjectFactory>,
//! # ) { unimplemented!() }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = ExtenderSettings::load()?;
//!     let (host, parser, satisfiables, objects) = collaborators();
//!
//!     let builder = ContainerBuilder::new()
//!         .with_logging(settings.logging_config()?)
//!         .with_settings(settings);
//!     let events = builder.event_bus();
//!     let container = builder
//!         .add_listener(events.clone())
//!         .with_host(host)
//!         .add_document("file:///OSGI-INF/blueprint/context.xml".parse()?)
//!         .with_parser_factory(parser)
//!         .with_satisfiable_factory(satisfiables)
//!         .with_object_factory(objects)
//!         .start()?;
//!
//!     let mut receiver = events.subscribe();
//!     while let Ok(event) = receiver.recv().await {
//!         println!("{:?}: {}", event.kind, container.state());
//!     }
//!
//!     container.destroy();
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod error;
pub mod logging;
pub mod settings;

// 重新导出主要类型
pub use builder::ContainerBuilder;
pub use container_impl::{ComponentContainer, ContainerStats, EventBus};
pub use error::{CompositionError, CompositionResult};
pub use logging::LoggingConfig;
pub use settings::{ExtenderSettings, LoggingSettings};
