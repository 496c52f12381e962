//! 容器生命周期事件

use crate::errors::{ContainerError, ErrorKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error as _;
use std::fmt;

/// Bundle 身份
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BundleIdentity {
    /// 宿主框架分配的 id
    pub id: u64,
    /// 符号名
    pub symbolic_name: String,
    /// 版本
    pub version: String,
}

impl BundleIdentity {
    /// 创建新的 bundle 身份
    pub fn new(id: u64, symbolic_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id,
            symbolic_name: symbolic_name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for BundleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} [{}]", self.symbolic_name, self.version, self.id)
    }
}

/// 事件类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerEventKind {
    Creating,
    GracePeriod,
    Created,
    Failure,
    Destroying,
    Destroyed,
}

/// 失败原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureCause {
    /// 错误类别
    pub kind: ErrorKind,
    /// 错误信息（包含原因链）
    pub message: String,
}

impl From<&ContainerError> for FailureCause {
    fn from(error: &ContainerError) -> Self {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self {
            kind: error.kind(),
            message,
        }
    }
}

/// 生命周期事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerEvent {
    /// 事件类别
    pub kind: ContainerEventKind,
    /// 宿主 bundle
    pub bundle: BundleIdentity,
    /// 扩展器 bundle
    pub extender: BundleIdentity,
    /// 尚未满足的依赖（宿主注册表过滤字符串）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_dependencies: Vec<String>,
    /// 失败原因
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<FailureCause>,
    /// 事件时间
    pub timestamp: DateTime<Utc>,
}

impl ContainerEvent {
    /// 创建事件
    pub fn new(kind: ContainerEventKind, bundle: BundleIdentity, extender: BundleIdentity) -> Self {
        Self {
            kind,
            bundle,
            extender,
            missing_dependencies: Vec::new(),
            cause: None,
            timestamp: Utc::now(),
        }
    }

    /// 设置缺失依赖
    pub fn with_missing_dependencies(mut self, missing: Vec<String>) -> Self {
        self.missing_dependencies = missing;
        self
    }

    /// 设置失败原因
    pub fn with_cause(mut self, cause: FailureCause) -> Self {
        self.cause = Some(cause);
        self
    }

    /// 失败原因类别
    pub fn cause_kind(&self) -> Option<ErrorKind> {
        self.cause.as_ref().map(|c| c.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identities() -> (BundleIdentity, BundleIdentity) {
        (
            BundleIdentity::new(7, "com.example.app", "1.0.0"),
            BundleIdentity::new(1, "container.extender", "0.1.0"),
        )
    }

    #[test]
    fn test_failure_cause_includes_source_chain() {
        let inner = ContainerError::instantiation("a", "boom");
        let err = ContainerError::definition_with_source("Unable to instantiate components", inner);
        let cause = FailureCause::from(&err);

        assert_eq!(cause.kind, ErrorKind::ComponentDefinition);
        assert!(cause.message.starts_with("Unable to instantiate components: "));
        assert!(cause.message.contains("boom"));
    }

    #[test]
    fn test_event_serialization() {
        let (bundle, extender) = identities();
        let event = ContainerEvent::new(ContainerEventKind::GracePeriod, bundle, extender)
            .with_missing_dependencies(vec!["(objectClass=com.example.Api)".to_string()]);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "grace_period");
        assert_eq!(json["bundle"]["symbolic_name"], "com.example.app");
        assert_eq!(json["missing_dependencies"][0], "(objectClass=com.example.Api)");
        assert!(json.get("cause").is_none());

        let back: ContainerEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind, ContainerEventKind::GracePeriod);
    }
}
