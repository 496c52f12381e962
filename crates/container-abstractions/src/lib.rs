//! # Container Abstractions
//!
//! 生命周期引擎所依赖的外部协作者接口。
//!
//! ## 核心接口
//!
//! - [`HostBundle`] - 宿主模块框架（头信息、类加载、服务注册表）
//! - [`DocumentParser`] - 组件定义文档解析器
//! - [`NamespaceHandlerRegistry`] - 命名空间处理器注册表
//! - [`Satisfiable`] - 外部服务依赖跟踪器
//! - [`RecipeBuilder`] / [`ObjectFactory`] - 配方图与对象创建
//! - [`RegistryProcessor`] / [`BeanProcessor`] / [`Converter`] - 用户扩展点
//! - [`ContainerEventListener`] - 生命周期事件监听

pub mod converter;
pub mod factory;
pub mod host;
pub mod instance;
pub mod listener;
pub mod namespace;
pub mod parser;
pub mod processor;
pub mod recipe;
pub mod resolver;
pub mod satisfiable;

pub use converter::*;
pub use factory::*;
pub use host::*;
pub use instance::*;
pub use listener::*;
pub use namespace::*;
pub use parser::*;
pub use processor::*;
pub use recipe::*;
pub use resolver::*;
pub use satisfiable::*;
