//! 错误类型定义

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 装箱的底层错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 容器错误类型
///
/// 生命周期驱动中出现的任何错误都会使容器进入 `Failed` 状态，
/// 查找接口则直接把错误返回给调用方。
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("Unresolved ref/idref to component: {component_id}")]
    UnresolvedReference { component_id: String },

    #[error("{message}")]
    ComponentDefinition {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Timed out after {timeout_ms}ms waiting for dependencies")]
    Timeout { timeout_ms: u64 },

    #[error("Failed to instantiate component {component_id}: {source}")]
    Instantiation {
        component_id: String,
        #[source]
        source: BoxError,
    },

    #[error("No component with id '{component_id}' could be found")]
    NoSuchComponent { component_id: String },

    #[error("Unable to parse component definitions: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Invalid value for directive {directive}: {value}")]
    InvalidDirective { directive: String, value: String },

    #[error("Class not found: {class_name}")]
    ClassNotFound { class_name: String },

    #[error("Host framework error: {message}")]
    Host { message: String },
}

impl ContainerError {
    /// 创建组件定义错误
    pub fn definition(message: impl Into<String>) -> Self {
        Self::ComponentDefinition {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带原因的组件定义错误
    pub fn definition_with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ComponentDefinition {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建未解析引用错误
    pub fn unresolved(component_id: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            component_id: component_id.into(),
        }
    }

    /// 创建组件不存在错误
    pub fn no_such_component(component_id: impl Into<String>) -> Self {
        Self::NoSuchComponent {
            component_id: component_id.into(),
        }
    }

    /// 创建实例化错误
    pub fn instantiation(component_id: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Instantiation {
            component_id: component_id.into(),
            source: source.into(),
        }
    }

    /// 创建解析错误
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            source: None,
        }
    }

    /// 创建宿主错误
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host {
            message: message.into(),
        }
    }

    /// 错误类别
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnresolvedReference { .. } => ErrorKind::UnresolvedReference,
            Self::ComponentDefinition { .. } => ErrorKind::ComponentDefinition,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Instantiation { .. } => ErrorKind::Instantiation,
            Self::NoSuchComponent { .. } => ErrorKind::NoSuchComponent,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::InvalidDirective { .. } => ErrorKind::InvalidDirective,
            Self::ClassNotFound { .. } => ErrorKind::ClassNotFound,
            Self::Host { .. } => ErrorKind::Host,
        }
    }

    /// 是否为组件定义错误（实例化时原样透传）
    pub fn is_definition_error(&self) -> bool {
        matches!(self, Self::ComponentDefinition { .. })
    }
}

/// 错误类别，随 `Failure` 事件一起发布
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnresolvedReference,
    ComponentDefinition,
    Timeout,
    Instantiation,
    NoSuchComponent,
    Parse,
    InvalidDirective,
    ClassNotFound,
    Host,
}

/// 结果类型别名
pub type ContainerResult<T> = Result<T, ContainerError>;
