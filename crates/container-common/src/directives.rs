//! 宿主头指令解析
//!
//! 头的格式为以 `,` 分隔的子句，每个子句由 `;` 分隔的路径、属性（`name=value`）
//! 和指令（`name:=value`）组成，值可以用双引号包裹。

use crate::constants::{
    DEFAULT_TIMEOUT_MS, TIMEOUT_DIRECTIVE, WAIT_FOR_DEPENDENCIES_DIRECTIVE,
    XML_VALIDATION_DIRECTIVE,
};
use crate::errors::{ContainerError, ContainerResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// 头子句
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderClause {
    /// 路径（通常只有一个，例如符号名）
    pub paths: Vec<String>,
    /// 属性
    pub attributes: BTreeMap<String, String>,
    /// 指令
    pub directives: BTreeMap<String, String>,
}

impl HeaderClause {
    /// 获取指令值
    pub fn directive(&self, name: &str) -> Option<&str> {
        self.directives.get(name).map(String::as_str)
    }

    /// 获取属性值
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// 解析头值
pub fn parse_header(header: &str) -> Vec<HeaderClause> {
    split_unquoted(header, ',')
        .into_iter()
        .filter(|clause| !clause.trim().is_empty())
        .map(|clause| parse_clause(&clause))
        .collect()
}

fn parse_clause(clause: &str) -> HeaderClause {
    let mut parsed = HeaderClause::default();
    for part in split_unquoted(clause, ';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some((name, value)) = part.split_once(":=") {
            parsed
                .directives
                .insert(name.trim().to_string(), unquote(value.trim()));
        } else if let Some((name, value)) = part.split_once('=') {
            parsed
                .attributes
                .insert(name.trim().to_string(), unquote(value.trim()));
        } else {
            parsed.paths.push(part.to_string());
        }
    }
    parsed
}

fn split_unquoted(input: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for ch in input.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                current.push(ch);
            }
            c if c == separator && !quoted => parts.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    parts.push(current);
    parts
}

fn unquote(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}

/// 宿主框架的布尔解析规则：仅 `true`（忽略大小写）为真
fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// 容器配置指令
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerDirectives {
    /// 宽限期（毫秒）
    pub timeout_ms: u64,
    /// 是否等待初始服务引用
    pub wait_for_dependencies: bool,
    /// 是否校验文档
    pub xml_validation: bool,
}

impl Default for ContainerDirectives {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            wait_for_dependencies: true,
            xml_validation: true,
        }
    }
}

impl ContainerDirectives {
    /// 以指定默认宽限期从符号名头解析
    ///
    /// 头缺失时使用默认值；宽限期不是整数时返回 `InvalidDirective`。
    pub fn from_symbolic_name_header(
        header: Option<&str>,
        default_timeout_ms: u64,
    ) -> ContainerResult<Self> {
        let mut directives = Self {
            timeout_ms: default_timeout_ms,
            ..Self::default()
        };
        let Some(header) = header else {
            return Ok(directives);
        };
        let Some(clause) = parse_header(header).into_iter().next() else {
            return Ok(directives);
        };

        if let Some(timeout) = clause.directive(TIMEOUT_DIRECTIVE) {
            directives.timeout_ms =
                timeout
                    .trim()
                    .parse()
                    .map_err(|_| ContainerError::InvalidDirective {
                        directive: TIMEOUT_DIRECTIVE.to_string(),
                        value: timeout.to_string(),
                    })?;
        }
        if let Some(wait) = clause.directive(WAIT_FOR_DEPENDENCIES_DIRECTIVE) {
            directives.wait_for_dependencies = parse_bool(wait);
        }
        if let Some(validation) = clause.directive(XML_VALIDATION_DIRECTIVE) {
            directives.xml_validation = parse_bool(validation);
        }
        Ok(directives)
    }

    /// 宽限期
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
