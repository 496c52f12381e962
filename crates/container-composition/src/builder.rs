//! 容器构建器

use crate::error::{CompositionError, CompositionResult};
use crate::logging::LoggingConfig;
use crate::settings::ExtenderSettings;
use container_abstractions::{
    ContainerEventListener, HostBundle, NamespaceHandlerRegistry, ObjectFactory, ParserFactory,
    RecipeBuilder, SatisfiableFactory,
};
use container_common::BundleIdentity;
use container_impl::{
    ComponentContainer, ContainerContext, EventBus, MetadataRecipeBuilder,
    NamespaceHandlerRegistryImpl,
};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, info};
use url::Url;

/// 容器构建器
///
/// 使用建造者模式装配容器的协作者。宿主、解析器工厂和对象工厂是必需的；
/// 配方构建器可以直接给出，也可以由依赖跟踪器工厂生成默认的
/// [`MetadataRecipeBuilder`]。
pub struct ContainerBuilder {
    settings: ExtenderSettings,
    extender: BundleIdentity,
    host: Option<Arc<dyn HostBundle>>,
    urls: Vec<Url>,
    parser_factory: Option<Arc<dyn ParserFactory>>,
    namespace_registry: Option<Arc<dyn NamespaceHandlerRegistry>>,
    recipe_builder: Option<Arc<dyn RecipeBuilder>>,
    satisfiable_factory: Option<Arc<dyn SatisfiableFactory>>,
    object_factory: Option<Arc<dyn ObjectFactory>>,
    listeners: Vec<Arc<dyn ContainerEventListener>>,
    runtime: Option<Handle>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl ContainerBuilder {
    /// 创建新的容器构建器
    pub fn new() -> Self {
        Self {
            settings: ExtenderSettings::default(),
            extender: BundleIdentity::new(0, "container.extender", env!("CARGO_PKG_VERSION")),
            host: None,
            urls: Vec::new(),
            parser_factory: None,
            namespace_registry: None,
            recipe_builder: None,
            satisfiable_factory: None,
            object_factory: None,
            listeners: Vec::new(),
            runtime: None,
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 使用扩展器配置
    pub fn with_settings(mut self, settings: ExtenderSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 扩展器身份
    pub fn with_extender(mut self, extender: BundleIdentity) -> Self {
        self.extender = extender;
        self
    }

    /// 宿主 bundle
    pub fn with_host(mut self, host: Arc<dyn HostBundle>) -> Self {
        self.host = Some(host);
        self
    }

    /// 添加组件定义文档
    pub fn add_document(mut self, url: Url) -> Self {
        debug!("添加组件定义文档: {}", url);
        self.urls.push(url);
        self
    }

    /// 解析器工厂
    pub fn with_parser_factory(mut self, factory: Arc<dyn ParserFactory>) -> Self {
        self.parser_factory = Some(factory);
        self
    }

    /// 命名空间处理器注册表，未指定时使用空的默认实现
    pub fn with_namespace_registry(mut self, registry: Arc<dyn NamespaceHandlerRegistry>) -> Self {
        self.namespace_registry = Some(registry);
        self
    }

    /// 配方构建器
    pub fn with_recipe_builder(mut self, builder: Arc<dyn RecipeBuilder>) -> Self {
        self.recipe_builder = Some(builder);
        self
    }

    /// 依赖跟踪器工厂，用于默认配方构建器
    pub fn with_satisfiable_factory(mut self, factory: Arc<dyn SatisfiableFactory>) -> Self {
        self.satisfiable_factory = Some(factory);
        self
    }

    /// 对象工厂
    pub fn with_object_factory(mut self, factory: Arc<dyn ObjectFactory>) -> Self {
        self.object_factory = Some(factory);
        self
    }

    /// 添加事件监听器
    pub fn add_listener(mut self, listener: Arc<dyn ContainerEventListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// 驱动容器的运行时，未指定时使用当前运行时
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true; // 启用日志初始化
        self
    }

    /// 按扩展器配置创建事件总线
    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::new(EventBus::new(self.settings.event_bus_capacity))
    }

    /// 构建容器，不调度
    pub fn build(self) -> CompositionResult<ComponentContainer> {
        if self.logging_enabled {
            // 测试或宿主进程可能已经安装了订阅器
            if let Err(e) = self.logging_config.init() {
                debug!("跳过日志初始化: {}", e);
            }
        }

        let host = self
            .host
            .ok_or(CompositionError::MissingCollaborator { name: "host" })?;
        let parser_factory = self
            .parser_factory
            .ok_or(CompositionError::MissingCollaborator {
                name: "parser_factory",
            })?;
        let object_factory = self
            .object_factory
            .ok_or(CompositionError::MissingCollaborator {
                name: "object_factory",
            })?;
        let recipe_builder: Arc<dyn RecipeBuilder> =
            match (self.recipe_builder, self.satisfiable_factory) {
                (Some(builder), _) => builder,
                (None, Some(factory)) => Arc::new(MetadataRecipeBuilder::new(factory)),
                (None, None) => {
                    return Err(CompositionError::MissingCollaborator {
                        name: "recipe_builder",
                    })
                }
            };
        let namespace_registry: Arc<dyn NamespaceHandlerRegistry> = match self.namespace_registry {
            Some(registry) => registry,
            None => Arc::new(NamespaceHandlerRegistryImpl::new()),
        };
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|_| CompositionError::NoRuntime)?,
        };

        let bundle = host.identity();
        let context = ContainerContext {
            host,
            extender: self.extender,
            urls: self.urls,
            parser_factory,
            namespace_registry,
            recipe_builder,
            object_factory,
            listeners: self.listeners,
        };
        info!(
            "构建容器: {}，默认宽限期 {}ms",
            bundle, self.settings.default_timeout_ms
        );
        Ok(ComponentContainer::new(
            context,
            self.settings.container_config(),
            runtime,
        ))
    }

    /// 构建并调度容器
    pub fn start(self) -> CompositionResult<ComponentContainer> {
        let container = self.build()?;
        container.schedule();
        Ok(container)
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
