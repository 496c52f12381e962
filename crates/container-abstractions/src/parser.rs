//! 文档解析器

use crate::namespace::NamespaceHandlerRegistry;
use container_common::{ComponentDefinitionRegistry, ContainerResult};
use std::collections::BTreeSet;
use url::Url;

/// 组件定义文档解析器
pub trait DocumentParser: Send {
    /// 解析文档
    fn parse(&mut self, urls: &[Url]) -> ContainerResult<()>;

    /// 文档引用的命名空间
    fn namespaces(&self) -> BTreeSet<String>;

    /// 把解析结果填充到注册表
    fn populate(
        &self,
        handlers: &dyn NamespaceHandlerRegistry,
        registry: &mut ComponentDefinitionRegistry,
    ) -> ContainerResult<()>;
}

/// 解析器工厂
pub trait ParserFactory: Send + Sync {
    /// 创建解析器
    fn create_parser(&self, xml_validation: bool) -> Box<dyn DocumentParser>;
}
