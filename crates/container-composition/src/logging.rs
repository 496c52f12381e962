//! 日志初始化
//!
//! 库代码只通过 `tracing` 宏输出日志，订阅器由组合层按需安装。

use crate::error::{CompositionError, CompositionResult};
use tracing::info;

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 安装全局订阅器
    ///
    /// 已经安装过订阅器时返回错误，调用方可以忽略。
    pub fn init(&self) -> CompositionResult<()> {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(self.level)
            .with_target(self.show_target)
            .with_thread_ids(self.show_thread_ids)
            .with_file(self.show_file)
            .with_line_number(self.show_line_number);

        if self.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| CompositionError::Logging {
            message: e.to_string(),
        })?;

        info!("日志系统初始化完成: {}", self.level);
        Ok(())
    }
}
