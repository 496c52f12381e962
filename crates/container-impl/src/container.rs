//! 组件容器生命周期驱动
//!
//! 容器的所有状态转换都在 [`ContainerInner::run`] 中执行：运行在 tokio 阻塞线程池上，
//! 持有容器的粗粒度锁，循环推进状态直到需要等待外部事件。
//! 外部通知（命名空间处理器变化、依赖满足状态翻转）只记录待处理信号并调用
//! [`ComponentContainer::schedule`]，从不同步获取粗粒度锁。

use crate::converter::AggregateConverter;
use crate::destroyables::DestroyableRegistry;
use crate::emitter::EventEmitter;
use crate::processors::ProcessorPass;
use crate::publication::ServicePublisher;
use crate::repository::{CreationEnv, Repository};
use crate::satisfaction::SatisfactionIndex;
use crate::timer::GraceTimer;
use container_abstractions::{
    BeanProcessor, ComponentInstance, ContainerEventListener, DestroyCallback, DocumentParser,
    HostBundle, ListenerToken, NamespaceHandlerRegistry, NamespaceListener, ObjectFactory,
    ParserFactory, RecipeBuilder, SatisfactionListener, ServiceProperties,
    ServiceRegistrationHandle,
};
use container_common::{
    namespace_handler_filter, BundleIdentity, ComponentDefinitionRegistry, ContainerDirectives,
    ContainerError, ContainerResult, ContainerState, Metadata, MetadataKind, BUNDLE_SYMBOLIC_NAME,
    BUNDLE_VERSION, CONTAINER_INTERFACE, CONTAINER_SYMBOLIC_NAME_PROPERTY,
    CONTAINER_VERSION_PROPERTY, DEFAULT_TIMEOUT_MS,
};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

/// 容器协作者
#[derive(Clone)]
pub struct ContainerContext {
    /// 宿主 bundle
    pub host: Arc<dyn HostBundle>,
    /// 扩展器身份
    pub extender: BundleIdentity,
    /// 组件定义文档
    pub urls: Vec<Url>,
    /// 解析器工厂
    pub parser_factory: Arc<dyn ParserFactory>,
    /// 命名空间处理器注册表
    pub namespace_registry: Arc<dyn NamespaceHandlerRegistry>,
    /// 配方构建器
    pub recipe_builder: Arc<dyn RecipeBuilder>,
    /// 对象工厂
    pub object_factory: Arc<dyn ObjectFactory>,
    /// 事件监听器
    pub listeners: Vec<Arc<dyn ContainerEventListener>>,
}

/// 容器配置
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// 宿主头未指定 `timeout` 时使用的宽限期
    pub default_timeout: Duration,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ContainerConfig {
    /// 默认宽限期（毫秒），超出 `u64` 范围时取最大值
    pub fn default_timeout_ms(&self) -> u64 {
        u64::try_from(self.default_timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default)]
pub struct ContainerStats {
    /// 已执行的运行次数
    pub runs: u64,
    /// 当前状态
    pub state: ContainerState,
    /// 已发布服务数量
    pub published_services: usize,
    /// Bean 处理器数量
    pub bean_processors: usize,
    /// 正在跟踪的外部依赖数量
    pub tracked_satisfiables: usize,
    /// 已创建实例数量
    pub instances: usize,
    /// 是否已销毁
    pub destroyed: bool,
}

/// 受粗粒度锁保护的容器状态
#[derive(Default)]
struct ContainerCore {
    directives: ContainerDirectives,
    parser: Option<Box<dyn DocumentParser>>,
    listener_token: Option<ListenerToken>,
    registry: ComponentDefinitionRegistry,
    repository: Option<Repository>,
    index: Option<SatisfactionIndex>,
    timer: Option<GraceTimer>,
    publisher: ServicePublisher,
    registration: Option<Box<dyn ServiceRegistrationHandle>>,
    bean_processors: Vec<Arc<dyn BeanProcessor>>,
}

pub(crate) struct ContainerInner {
    context: ContainerContext,
    config: ContainerConfig,
    emitter: EventEmitter,
    runtime: Handle,
    core: Mutex<ContainerCore>,
    scheduled: AtomicBool,
    destroyed: AtomicBool,
    state: AtomicU8,
    runs: AtomicU64,
    namespaces: RwLock<BTreeSet<String>>,
    namespace_lost: AtomicBool,
    pending_satisfaction: Mutex<BTreeSet<String>>,
    converter: AggregateConverter,
    destroyables: DestroyableRegistry,
}

/// 组件容器
///
/// 克隆得到的句柄共享同一个容器。
#[derive(Clone)]
pub struct ComponentContainer {
    inner: Arc<ContainerInner>,
}

impl std::fmt::Debug for ComponentContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentContainer").finish_non_exhaustive()
    }
}

impl ComponentContainer {
    /// 创建容器，状态为 `Unknown`，调用 [`schedule`](Self::schedule) 后开始推进
    pub fn new(context: ContainerContext, config: ContainerConfig, runtime: Handle) -> Self {
        let mut emitter = EventEmitter::new(context.host.identity(), context.extender.clone());
        for listener in &context.listeners {
            emitter = emitter.with_listener(Arc::clone(listener));
        }
        Self {
            inner: Arc::new(ContainerInner {
                context,
                config,
                emitter,
                runtime,
                core: Mutex::new(ContainerCore::default()),
                scheduled: AtomicBool::new(false),
                destroyed: AtomicBool::new(false),
                state: AtomicU8::new(ContainerState::Unknown.as_u8()),
                runs: AtomicU64::new(0),
                namespaces: RwLock::new(BTreeSet::new()),
                namespace_lost: AtomicBool::new(false),
                pending_satisfaction: Mutex::new(BTreeSet::new()),
                converter: AggregateConverter::new(),
                destroyables: DestroyableRegistry::new(),
            }),
        }
    }

    /// 请求运行状态机，并发请求会合并
    pub fn schedule(&self) {
        self.inner.schedule();
    }

    /// 销毁容器，重复调用无效果
    pub fn destroy(&self) {
        self.inner.destroy();
    }

    /// 当前状态
    pub fn state(&self) -> ContainerState {
        self.inner.state()
    }

    /// 是否已销毁
    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.load(Ordering::SeqCst)
    }

    /// 宿主 bundle
    pub fn bundle(&self) -> &BundleIdentity {
        self.inner.emitter.bundle()
    }

    /// 注册表中的所有组件 id
    pub fn component_ids(&self) -> Vec<String> {
        self.inner.core.lock().registry.names()
    }

    /// 获取或创建组件实例
    pub fn component_instance(&self, id: &str) -> ContainerResult<ComponentInstance> {
        let core = self.inner.core.lock();
        let repository = match &core.repository {
            Some(repository) if core.registry.contains(id) => repository,
            _ => return Err(ContainerError::no_such_component(id)),
        };
        let env = self.inner.env(&core.registry, &core.bean_processors);
        repository.create(id, &env).map_err(|e| match e {
            ContainerError::NoSuchComponent { .. } | ContainerError::ComponentDefinition { .. } => e,
            other => ContainerError::definition_with_source(
                format!("Could not create component instance for {id}"),
                other,
            ),
        })
    }

    /// 获取组件定义
    pub fn component_metadata(&self, id: &str) -> ContainerResult<Metadata> {
        self.inner
            .core
            .lock()
            .registry
            .get(id)
            .cloned()
            .ok_or_else(|| ContainerError::no_such_component(id))
    }

    /// 所有顶层组件可达的指定类别元数据
    pub fn metadata(&self, kind: MetadataKind) -> Vec<Metadata> {
        self.inner
            .core
            .lock()
            .registry
            .metadata_of_kind(kind)
            .into_iter()
            .cloned()
            .collect()
    }

    /// 登记销毁回调
    pub fn add_destroyable(&self, name: impl Into<String>, callback: DestroyCallback) {
        self.inner.destroyables.add(name, callback);
    }

    /// 统计信息
    pub fn stats(&self) -> ContainerStats {
        let core = self.inner.core.lock();
        ContainerStats {
            runs: self.inner.runs.load(Ordering::SeqCst),
            state: self.inner.state(),
            published_services: core.publisher.len(),
            bean_processors: core.bean_processors.len(),
            tracked_satisfiables: core
                .index
                .as_ref()
                .map(SatisfactionIndex::distinct_count)
                .unwrap_or(0),
            instances: core
                .repository
                .as_ref()
                .map(Repository::instance_count)
                .unwrap_or(0),
            destroyed: self.is_destroyed(),
        }
    }
}

impl ContainerInner {
    fn state(&self) -> ContainerState {
        ContainerState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, state: ContainerState) {
        debug!("容器 {} 状态: {} -> {}", self.emitter.bundle(), self.state(), state);
        self.state.store(state.as_u8(), Ordering::SeqCst);
    }

    fn signals(self: &Arc<Self>) -> Arc<ContainerSignals> {
        Arc::new(ContainerSignals {
            inner: Arc::downgrade(self),
        })
    }

    fn env<'a>(
        &'a self,
        registry: &'a ComponentDefinitionRegistry,
        bean_processors: &'a [Arc<dyn BeanProcessor>],
    ) -> CreationEnv<'a> {
        CreationEnv {
            host: self.context.host.as_ref(),
            registry,
            bean_processors,
            converter: &self.converter,
            destroyables: &self.destroyables,
        }
    }

    fn schedule(self: &Arc<Self>) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }
        if self
            .scheduled
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            let inner = Arc::clone(self);
            self.runtime.spawn_blocking(move || inner.run());
        }
    }

    fn run(self: &Arc<Self>) {
        let mut core = self.core.lock();
        // 持锁后再复位，运行期间到达的请求只会再排队一次
        self.scheduled.store(false, Ordering::SeqCst);
        self.runs.fetch_add(1, Ordering::SeqCst);
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }

        let pending = std::mem::take(&mut *self.pending_satisfaction.lock());
        if self.namespace_lost.swap(false, Ordering::SeqCst) {
            self.handle_namespace_loss(&mut core);
        }
        if let Err(err) = self.drive(&mut core, &pending) {
            self.fail(&mut core, err);
        }
    }

    fn drive(
        self: &Arc<Self>,
        core: &mut ContainerCore,
        pending: &BTreeSet<String>,
    ) -> ContainerResult<()> {
        loop {
            if self.destroyed.load(Ordering::SeqCst) {
                return Ok(());
            }
            let state = self.state();
            debug!("运行容器 {}: {}", self.emitter.bundle(), state);
            match state {
                ContainerState::Unknown => {
                    let header = self.context.host.header(BUNDLE_SYMBOLIC_NAME);
                    core.directives = ContainerDirectives::from_symbolic_name_header(
                        header.as_deref(),
                        self.config.default_timeout_ms(),
                    )?;
                    self.emitter.creating();
                    let mut parser = self
                        .context
                        .parser_factory
                        .create_parser(core.directives.xml_validation);
                    parser.parse(&self.context.urls)?;
                    let namespaces = parser.namespaces();
                    if !namespaces.is_empty() && core.listener_token.is_none() {
                        core.listener_token = Some(
                            self.context
                                .namespace_registry
                                .add_listener(self.signals()),
                        );
                    }
                    *self.namespaces.write() = namespaces;
                    core.parser = Some(parser);
                    self.set_state(ContainerState::WaitForNamespaceHandlers);
                }
                ContainerState::WaitForNamespaceHandlers => {
                    let missing: Vec<String> = self
                        .namespaces
                        .read()
                        .iter()
                        .filter(|ns| !self.context.namespace_registry.has_handler(ns))
                        .map(|ns| namespace_handler_filter(ns))
                        .collect();
                    if !missing.is_empty() {
                        self.emitter.grace_period(missing);
                        return Ok(());
                    }
                    let parser = core
                        .parser
                        .as_ref()
                        .ok_or_else(|| ContainerError::parse("documents have not been parsed"))?;
                    parser.populate(
                        self.context.namespace_registry.as_ref(),
                        &mut core.registry,
                    )?;
                    self.set_state(ContainerState::Populated);
                }
                ContainerState::Populated => {
                    check_references(&core.registry)?;
                    let graph = self.context.recipe_builder.build(&core.registry)?;
                    let index = SatisfactionIndex::build(&graph);
                    core.repository = Some(Repository::new(
                        graph,
                        Arc::clone(&self.context.object_factory),
                    ));
                    index.start_all(self.signals());
                    core.index = Some(index);
                    self.arm_timer(core);
                    self.advance_when_satisfied(
                        core,
                        ContainerState::InitialReferencesSatisfied,
                        ContainerState::WaitForInitialReferences,
                    );
                }
                ContainerState::WaitForInitialReferences => {
                    if !self.all_satisfied(core) {
                        return Ok(());
                    }
                    self.set_state(ContainerState::InitialReferencesSatisfied);
                }
                ContainerState::InitialReferencesSatisfied => {
                    self.run_processors(core)?;
                    if let Some(index) = core.index.take() {
                        index.stop_all();
                    }
                    let graph = self.context.recipe_builder.build(&core.registry)?;
                    let index = SatisfactionIndex::build(&graph);
                    match core.repository.as_mut() {
                        Some(repository) => {
                            repository.rebuild(graph, &core.bean_processors)
                        }
                        None => {
                            core.repository = Some(Repository::new(
                                graph,
                                Arc::clone(&self.context.object_factory),
                            ))
                        }
                    }
                    index.start_all(self.signals());
                    core.index = Some(index);
                    self.advance_when_satisfied(
                        core,
                        ContainerState::Create,
                        ContainerState::WaitForInitialReferences2,
                    );
                }
                ContainerState::WaitForInitialReferences2 => {
                    if !self.all_satisfied(core) {
                        return Ok(());
                    }
                    self.set_state(ContainerState::Create);
                }
                ContainerState::Create => {
                    self.cancel_timer(core);
                    self.instantiate_eager_components(core)?;
                    self.publish_satisfied_services(core)?;
                    self.register_container(core)?;
                    self.set_state(ContainerState::Created);
                    self.emitter.created();
                }
                ContainerState::Created => {
                    self.rebind_services(core, pending);
                    return Ok(());
                }
                ContainerState::Failed => return Ok(()),
            }
        }
    }

    fn all_satisfied(&self, core: &ContainerCore) -> bool {
        core.index
            .as_ref()
            .map(SatisfactionIndex::all_satisfied)
            .unwrap_or(true)
    }

    fn missing_filters(&self, core: &ContainerCore) -> Vec<String> {
        core.index
            .as_ref()
            .map(SatisfactionIndex::missing_filters)
            .unwrap_or_default()
    }

    fn advance_when_satisfied(
        &self,
        core: &ContainerCore,
        satisfied: ContainerState,
        waiting: ContainerState,
    ) {
        if !core.directives.wait_for_dependencies || self.all_satisfied(core) {
            self.set_state(satisfied);
        } else {
            self.emitter.grace_period(self.missing_filters(core));
            self.set_state(waiting);
        }
    }

    fn arm_timer(self: &Arc<Self>, core: &mut ContainerCore) {
        self.cancel_timer(core);
        let timeout = core.directives.timeout();
        let weak = Arc::downgrade(self);
        debug!("启动宽限期定时器: {:?}", timeout);
        core.timer = Some(GraceTimer::arm(&self.runtime, timeout, move |token| {
            if let Some(inner) = weak.upgrade() {
                inner.on_timeout(&token);
            }
        }));
    }

    fn cancel_timer(&self, core: &mut ContainerCore) {
        if let Some(timer) = core.timer.take() {
            timer.cancel();
        }
    }

    fn on_timeout(&self, token: &CancellationToken) {
        let mut core = self.core.lock();
        if token.is_cancelled()
            || self.destroyed.load(Ordering::SeqCst)
            || !self.state().arms_grace_timer()
        {
            return;
        }
        let err = ContainerError::Timeout {
            timeout_ms: core.directives.timeout_ms,
        };
        self.fail(&mut core, err);
    }

    fn run_processors(&self, core: &mut ContainerCore) -> ContainerResult<()> {
        let ContainerCore {
            registry,
            repository,
            bean_processors,
            ..
        } = core;
        let repository = repository
            .as_mut()
            .ok_or_else(|| ContainerError::definition("Recipe repository has not been built"))?;
        let pass = ProcessorPass {
            host: self.context.host.as_ref(),
            recipe_builder: self.context.recipe_builder.as_ref(),
            converter: &self.converter,
            destroyables: &self.destroyables,
        };
        pass.run(registry, repository, bean_processors)
    }

    fn instantiate_eager_components(&self, core: &ContainerCore) -> ContainerResult<()> {
        let eager: Vec<String> = core
            .registry
            .iter()
            .filter(|(_, metadata)| match metadata {
                Metadata::Service(_) => true,
                Metadata::Bean(bean) => bean.is_eager_singleton(),
                _ => false,
            })
            .map(|(id, _)| id.to_string())
            .collect();
        let Some(repository) = core.repository.as_ref() else {
            return Ok(());
        };
        debug!("急切创建组件: {:?}", eager);
        let env = self.env(&core.registry, &core.bean_processors);
        repository
            .create_all(&eager, &env)
            .map(|_| ())
            .map_err(|e| {
                if e.is_definition_error() {
                    e
                } else {
                    ContainerError::definition_with_source("Unable to instantiate components", e)
                }
            })
    }

    fn service_ids(core: &ContainerCore) -> Vec<String> {
        core.registry
            .iter()
            .filter(|(_, metadata)| matches!(metadata, Metadata::Service(_)))
            .map(|(id, _)| id.to_string())
            .collect()
    }

    fn publish_satisfied_services(&self, core: &mut ContainerCore) -> ContainerResult<()> {
        let services = Self::service_ids(core);
        let ContainerCore {
            repository,
            index,
            publisher,
            ..
        } = core;
        let (Some(repository), Some(index)) = (repository.as_ref(), index.as_ref()) else {
            return Ok(());
        };
        for id in services {
            if !index.is_component_satisfied(&id) {
                debug!("服务 {} 的依赖尚未满足，暂不发布", id);
                continue;
            }
            if let Some(instance) = repository.instance(&id) {
                publisher.publish(&id, &instance)?;
            }
        }
        Ok(())
    }

    fn rebind_services(&self, core: &mut ContainerCore, pending: &BTreeSet<String>) {
        if pending.is_empty() {
            return;
        }
        let services = Self::service_ids(core);
        let ContainerCore {
            repository,
            index,
            publisher,
            ..
        } = core;
        let (Some(repository), Some(index)) = (repository.as_ref(), index.as_ref()) else {
            return;
        };
        for id in services {
            if !pending.iter().any(|name| index.depends_on(&id, name)) {
                continue;
            }
            let Some(instance) = repository.instance(&id) else {
                continue;
            };
            if index.is_component_satisfied(&id) {
                if let Err(e) = publisher.publish(&id, &instance) {
                    warn!("重新发布服务 {} 失败: {}", id, e);
                }
            } else {
                publisher.unpublish(&id, &instance);
            }
        }
    }

    fn register_container(self: &Arc<Self>, core: &mut ContainerCore) -> ContainerResult<()> {
        let bundle = self.emitter.bundle();
        let version = self
            .context
            .host
            .header(BUNDLE_VERSION)
            .unwrap_or_else(|| bundle.version.clone());
        let mut properties = ServiceProperties::new();
        properties.insert(
            CONTAINER_SYMBOLIC_NAME_PROPERTY.to_string(),
            bundle.symbolic_name.clone(),
        );
        properties.insert(CONTAINER_VERSION_PROPERTY.to_string(), version);
        let service = Arc::new(ComponentContainer {
            inner: Arc::clone(self),
        });
        let registration = self.context.host.register_service(
            &[CONTAINER_INTERFACE.to_string()],
            service,
            properties,
        )?;
        core.registration = Some(registration);
        Ok(())
    }

    /// 注销服务、停止依赖跟踪、销毁实例并执行销毁回调
    fn teardown_components(&self, core: &mut ContainerCore) {
        if let Some(repository) = core.repository.as_ref() {
            core.publisher
                .unpublish_all(|name| repository.instance(name));
        }
        if let Some(index) = core.index.take() {
            index.stop_all();
        }
        if let Some(repository) = core.repository.take() {
            repository.destroy(&core.bean_processors);
        }
        core.bean_processors.clear();
        self.converter.clear();
        self.destroyables.run_all();
    }

    fn fail(&self, core: &mut ContainerCore, err: ContainerError) {
        let missing = self.missing_filters(core);
        self.set_state(ContainerState::Failed);
        self.cancel_timer(core);
        self.teardown_components(core);
        self.emitter.failure(&err, missing);
    }

    fn handle_namespace_loss(&self, core: &mut ContainerCore) {
        let state = self.state();
        if state.is_terminal() {
            warn!(
                "容器 {} 已处于终态 {}，忽略命名空间处理器注销",
                self.emitter.bundle(),
                state
            );
            return;
        }
        if state == ContainerState::Unknown || state == ContainerState::WaitForNamespaceHandlers {
            return;
        }
        info!("命名空间处理器已注销，容器 {} 回到等待状态", self.emitter.bundle());
        self.cancel_timer(core);
        self.teardown_components(core);
        core.registry.clear();
        self.set_state(ContainerState::WaitForNamespaceHandlers);
    }

    fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.emitter.destroying();
        let mut core = self.core.lock();
        self.cancel_timer(&mut core);
        if let Some(registration) = core.registration.take() {
            registration.unregister();
        }
        if let Some(token) = core.listener_token.take() {
            self.context.namespace_registry.remove_listener(token);
        }
        self.teardown_components(&mut core);
        core.parser = None;
        self.emitter.destroyed();
    }
}

/// 检查所有 `Ref` / `IdRef` 都指向已注册的组件
fn check_references(registry: &ComponentDefinitionRegistry) -> ContainerResult<()> {
    let mut unresolved = None;
    let mut check = |metadata: &Metadata| {
        if unresolved.is_some() {
            return;
        }
        if let Some(target) = metadata.reference_target() {
            if !registry.contains(target) {
                unresolved = Some(target.to_string());
            }
        }
    };
    for (_, metadata) in registry.iter() {
        metadata.walk(&mut check);
    }
    for metadata in registry.type_converters() {
        metadata.walk(&mut check);
    }
    match unresolved {
        Some(id) => Err(ContainerError::unresolved(id)),
        None => Ok(()),
    }
}

/// 外部通知入口
///
/// 只记录信号并调度运行，不获取容器锁。
struct ContainerSignals {
    inner: Weak<ContainerInner>,
}

impl SatisfactionListener for ContainerSignals {
    fn notify_satisfaction(&self, name: &str) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        if inner.destroyed.load(Ordering::SeqCst) {
            return;
        }
        let state = inner.state();
        debug!("外部依赖 {} 状态变化，容器状态 {}", name, state);
        match state {
            ContainerState::Populated
            | ContainerState::WaitForInitialReferences
            | ContainerState::InitialReferencesSatisfied
            | ContainerState::WaitForInitialReferences2
            | ContainerState::Create
            | ContainerState::Created => {
                inner.pending_satisfaction.lock().insert(name.to_string());
                inner.schedule();
            }
            _ => {}
        }
    }
}

impl NamespaceListener for ContainerSignals {
    fn namespace_registered(&self, namespace: &str) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        if inner.state() == ContainerState::WaitForNamespaceHandlers
            && inner.namespaces.read().contains(namespace)
        {
            inner.schedule();
        }
    }

    fn namespace_unregistered(&self, namespace: &str) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        if inner.namespaces.read().contains(namespace) {
            inner.namespace_lost.store(true, Ordering::SeqCst);
            inner.schedule();
        }
    }
}
