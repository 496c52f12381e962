//! 扩展器级配置
//!
//! 加载顺序：内置默认值，可选文件 `config/container`（TOML），
//! 然后是前缀为 `CONTAINER`、分隔符为 `__` 的环境变量，例如
//! `CONTAINER__DEFAULT_TIMEOUT_MS=60000`、`CONTAINER__LOGGING__LEVEL=debug`。

use crate::error::{CompositionError, CompositionResult};
use crate::logging::LoggingConfig;
use config::{Config, Environment, File, FileFormat};
use container_common::DEFAULT_TIMEOUT_MS;
use container_impl::ContainerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// 默认配置文件（不含扩展名）
pub const DEFAULT_SETTINGS_FILE: &str = "config/container";

/// 环境变量前缀
pub const ENV_PREFIX: &str = "CONTAINER";

/// 环境变量层级分隔符
pub const ENV_SEPARATOR: &str = "__";

/// 扩展器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtenderSettings {
    /// 宿主头未指定 `timeout` 时的宽限期（毫秒）
    pub default_timeout_ms: u64,
    /// 事件总线容量
    pub event_bus_capacity: usize,
    /// 日志配置
    pub logging: LoggingSettings,
}

/// 日志配置项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// 日志级别
    pub level: String,
    /// 是否输出 JSON
    pub json: bool,
}

impl Default for ExtenderSettings {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            event_bus_capacity: 1024,
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ExtenderSettings {
    /// 从默认文件和环境变量加载
    pub fn load() -> CompositionResult<Self> {
        let settings = Self::from_sources(
            File::with_name(DEFAULT_SETTINGS_FILE).required(false),
            Self::environment(),
        )?;
        info!("加载扩展器配置完成");
        Ok(settings)
    }

    /// 从指定 TOML 文件加载，环境变量仍然生效
    pub fn from_file<P: AsRef<Path>>(path: P) -> CompositionResult<Self> {
        let path = path.as_ref();
        debug!("从文件加载扩展器配置: {}", path.display());
        Self::from_sources(
            File::from(path).format(FileFormat::Toml).required(true),
            Self::environment(),
        )
    }

    /// 标准环境变量源
    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
    }

    /// 由文件源和环境变量源构建并校验配置
    pub fn from_sources<F>(file: F, environment: Environment) -> CompositionResult<Self>
    where
        F: config::Source + Send + Sync + 'static,
    {
        let settings: Self = Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        debug!("扩展器配置: {:?}", settings);
        Ok(settings)
    }

    /// 校验配置
    pub fn validate(&self) -> CompositionResult<()> {
        if self.default_timeout_ms == 0 {
            return Err(invalid("default_timeout_ms", "must be greater than zero"));
        }
        if self.event_bus_capacity == 0 {
            return Err(invalid("event_bus_capacity", "must be greater than zero"));
        }
        self.logging.level()?;
        Ok(())
    }

    /// 容器配置
    pub fn container_config(&self) -> ContainerConfig {
        ContainerConfig {
            default_timeout: Duration::from_millis(self.default_timeout_ms),
        }
    }

    /// 日志配置
    pub fn logging_config(&self) -> CompositionResult<LoggingConfig> {
        let base = if self.logging.json {
            LoggingConfig::production()
        } else {
            LoggingConfig::development()
        };
        Ok(LoggingConfig {
            level: self.logging.level()?,
            ..base
        })
    }

    /// 序列化为 TOML，便于输出生效配置
    pub fn to_toml(&self) -> CompositionResult<String> {
        toml::to_string_pretty(self).map_err(|e| invalid("settings", e.to_string()))
    }
}

impl LoggingSettings {
    /// 解析日志级别
    pub fn level(&self) -> CompositionResult<tracing::Level> {
        self.level
            .parse()
            .map_err(|_| invalid("logging.level", format!("unknown level '{}'", self.level)))
    }
}

fn invalid(key: &str, message: impl Into<String>) -> CompositionError {
    CompositionError::InvalidSetting {
        key: key.to_string(),
        message: message.into(),
    }
}
