//! 集成测试使用的宿主、解析器、外部服务和对象工厂替身

#![allow(dead_code)]

use container_abstractions::{
    ComponentInstance, ContainerEventListener, DestroyCallback, DocumentParser, ExecutionContext,
    HostBundle, NamespaceHandler, NamespaceHandlerRegistry, ObjectFactory, ObjectRef,
    ParserFactory, RecipeGraph, RecipeId, RecipeKind, SatisfactionListener, Satisfiable,
    SatisfiableFactory, ServiceProperties, ServicePublication, ServiceRegistrationHandle,
};
use container_common::{
    Availability, BoxError, BundleIdentity, ClassDescriptor, ComponentDefinitionRegistry,
    ContainerError, ContainerEvent, ContainerEventKind, ContainerResult, ContainerState,
    Metadata, ServiceReferenceMetadata, BUNDLE_SYMBOLIC_NAME,
};
use container_impl::{
    ComponentContainer, ContainerConfig, ContainerContext, MetadataRecipeBuilder,
    NamespaceHandlerRegistryImpl,
};
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;
use tokio::runtime::Handle;
use url::Url;

static INIT: Once = Once::new();

/// 初始化测试日志
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// 轮询直到条件成立，超时则失败
pub async fn eventually<F>(description: &str, condition: F)
where
    F: Fn() -> bool,
{
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for: {description}");
}

/// 等待容器进入指定状态
pub async fn wait_for_state(container: &ComponentContainer, state: ContainerState) {
    eventually(&format!("state {state}"), || container.state() == state).await;
}

/// 让构造函数在容器锁内停住，直到测试放行
#[derive(Default)]
pub struct Gate {
    entered: AtomicBool,
    released: AtomicBool,
}

impl Gate {
    /// 在阻塞线程上等待放行，最多 5 秒
    pub fn wait(&self) {
        self.entered.store(true, Ordering::SeqCst);
        for _ in 0..5000 {
            if self.released.load(Ordering::SeqCst) {
                return;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    pub fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
    }

    pub fn is_entered(&self) -> bool {
        self.entered.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// 宿主

pub struct FakeRegistration {
    active: Arc<AtomicUsize>,
    done: AtomicBool,
}

impl ServiceRegistrationHandle for FakeRegistration {
    fn unregister(&self) {
        if !self.done.swap(true, Ordering::SeqCst) {
            self.active.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

pub struct FakeHost {
    identity: BundleIdentity,
    headers: Mutex<HashMap<String, String>>,
    classes: Mutex<HashMap<String, ClassDescriptor>>,
    active: Arc<AtomicUsize>,
    registered: Mutex<Vec<(Vec<String>, ObjectRef, ServiceProperties)>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            identity: BundleIdentity::new(42, "com.example.test", "1.0.0"),
            headers: Mutex::new(HashMap::new()),
            classes: Mutex::new(HashMap::new()),
            active: Arc::new(AtomicUsize::new(0)),
            registered: Mutex::new(Vec::new()),
        }
    }

    pub fn set_header(&self, name: &str, value: &str) {
        self.headers.lock().insert(name.to_string(), value.to_string());
    }

    pub fn set_class(&self, class: ClassDescriptor) {
        self.classes.lock().insert(class.name.clone(), class);
    }

    /// 仍处于注册状态的服务数量
    pub fn active_registrations(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// 最近一次注册的服务
    pub fn last_registration(&self) -> Option<(Vec<String>, ObjectRef, ServiceProperties)> {
        self.registered.lock().last().cloned()
    }
}

impl HostBundle for FakeHost {
    fn identity(&self) -> BundleIdentity {
        self.identity.clone()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers.lock().get(name).cloned()
    }

    fn load_class(&self, class_name: &str) -> ContainerResult<ClassDescriptor> {
        Ok(self
            .classes
            .lock()
            .get(class_name)
            .cloned()
            .unwrap_or_else(|| ClassDescriptor::new(class_name)))
    }

    fn register_service(
        &self,
        interfaces: &[String],
        service: ObjectRef,
        properties: ServiceProperties,
    ) -> ContainerResult<Box<dyn ServiceRegistrationHandle>> {
        self.registered
            .lock()
            .push((interfaces.to_vec(), service, properties));
        self.active.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeRegistration {
            active: Arc::clone(&self.active),
            done: AtomicBool::new(false),
        }))
    }
}

// ---------------------------------------------------------------------------
// 解析器

#[derive(Clone, Default)]
pub struct FakeDocuments {
    pub definitions: Vec<Metadata>,
    pub type_converters: Vec<Metadata>,
    pub namespaces: BTreeSet<String>,
    pub parse_error: Option<String>,
}

pub struct FakeParserFactory {
    documents: FakeDocuments,
}

struct FakeParser {
    documents: FakeDocuments,
    parsed: bool,
}

impl ParserFactory for FakeParserFactory {
    fn create_parser(&self, _xml_validation: bool) -> Box<dyn DocumentParser> {
        Box::new(FakeParser {
            documents: self.documents.clone(),
            parsed: false,
        })
    }
}

impl DocumentParser for FakeParser {
    fn parse(&mut self, _urls: &[Url]) -> ContainerResult<()> {
        if let Some(message) = &self.documents.parse_error {
            return Err(ContainerError::parse(message.clone()));
        }
        self.parsed = true;
        Ok(())
    }

    fn namespaces(&self) -> BTreeSet<String> {
        self.documents.namespaces.clone()
    }

    fn populate(
        &self,
        handlers: &dyn NamespaceHandlerRegistry,
        registry: &mut ComponentDefinitionRegistry,
    ) -> ContainerResult<()> {
        if !self.parsed {
            return Err(ContainerError::parse("populate before parse"));
        }
        for namespace in &self.documents.namespaces {
            if handlers.handler(namespace).is_none() {
                return Err(ContainerError::parse(format!(
                    "no handler for namespace {namespace}"
                )));
            }
        }
        for definition in &self.documents.definitions {
            registry.register(definition.clone())?;
        }
        for converter in &self.documents.type_converters {
            registry.register_type_converter(converter.clone())?;
        }
        Ok(())
    }
}

pub struct FakeNamespaceHandler(pub String);

impl NamespaceHandler for FakeNamespaceHandler {
    fn namespace(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// 外部服务

pub struct FakeSatisfiable {
    name: String,
    interface: String,
    filter: String,
    optional: bool,
    available: Arc<Mutex<HashSet<String>>>,
    listener: Mutex<Option<Arc<dyn SatisfactionListener>>>,
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
}

impl FakeSatisfiable {
    pub fn is_tracking(&self) -> bool {
        self.listener.lock().is_some()
    }
}

impl Satisfiable for FakeSatisfiable {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_satisfied(&self) -> bool {
        self.optional || self.available.lock().contains(&self.interface)
    }

    fn filter(&self) -> String {
        self.filter.clone()
    }

    fn start(&self, listener: Arc<dyn SatisfactionListener>) {
        self.starts.fetch_add(1, Ordering::SeqCst);
        *self.listener.lock() = Some(listener);
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.listener.lock().take();
    }
}

/// 外部服务注册表替身，按名称共享依赖跟踪器
#[derive(Default)]
pub struct ServiceWorld {
    available: Arc<Mutex<HashSet<String>>>,
    trackers: Mutex<HashMap<String, Arc<FakeSatisfiable>>>,
}

impl ServiceWorld {
    pub fn set_available(&self, interface: &str, available: bool) {
        {
            let mut set = self.available.lock();
            if available {
                set.insert(interface.to_string());
            } else {
                set.remove(interface);
            }
        }
        let listeners: Vec<(String, Arc<dyn SatisfactionListener>)> = self
            .trackers
            .lock()
            .values()
            .filter(|t| t.interface == interface)
            .filter_map(|t| Some((t.name.clone(), t.listener.lock().clone()?)))
            .collect();
        for (name, listener) in listeners {
            listener.notify_satisfaction(&name);
        }
    }

    pub fn tracker(&self, name: &str) -> Option<Arc<FakeSatisfiable>> {
        self.trackers.lock().get(name).cloned()
    }
}

impl SatisfiableFactory for ServiceWorld {
    fn create(
        &self,
        name: &str,
        reference: &ServiceReferenceMetadata,
    ) -> ContainerResult<Arc<dyn Satisfiable>> {
        let tracker = self
            .trackers
            .lock()
            .entry(name.to_string())
            .or_insert_with(|| {
                Arc::new(FakeSatisfiable {
                    name: name.to_string(),
                    interface: reference.interface.clone().unwrap_or_default(),
                    filter: reference.host_filter(),
                    optional: reference.availability == Availability::Optional,
                    available: Arc::clone(&self.available),
                    listener: Mutex::new(None),
                    starts: AtomicUsize::new(0),
                    stops: AtomicUsize::new(0),
                })
            })
            .clone();
        let tracker: Arc<dyn Satisfiable> = tracker;
        Ok(tracker)
    }
}

// ---------------------------------------------------------------------------
// 对象工厂

pub struct FakePublication {
    registered: AtomicBool,
    pub registers: AtomicUsize,
    pub unregisters: AtomicUsize,
}

impl ServicePublication for FakePublication {
    fn register(&self) -> ContainerResult<()> {
        if !self.registered.swap(true, Ordering::SeqCst) {
            self.registers.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn unregister(&self) {
        if self.registered.swap(false, Ordering::SeqCst) {
            self.unregisters.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_registered(&self) -> bool {
        self.registered.load(Ordering::SeqCst)
    }
}

pub type ClassBuilder = Arc<dyn Fn(&str) -> ContainerResult<ComponentInstance> + Send + Sync>;

/// 包装类构造闭包
pub fn class<F>(build: F) -> ClassBuilder
where
    F: Fn(&str) -> ContainerResult<ComponentInstance> + Send + Sync + 'static,
{
    Arc::new(build)
}

/// 包装销毁回调闭包
pub fn callback<F>(f: F) -> DestroyCallback
where
    F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// 按类名构造 Bean 的对象工厂
#[derive(Default)]
pub struct ClassMapFactory {
    classes: Mutex<HashMap<String, ClassBuilder>>,
    publications: Mutex<HashMap<String, Arc<FakePublication>>>,
    pub created: Mutex<Vec<String>>,
    pub destroyed: Arc<Mutex<Vec<String>>>,
}

impl ClassMapFactory {
    pub fn set_class(&self, class_name: &str, builder: ClassBuilder) {
        self.classes.lock().insert(class_name.to_string(), builder);
    }

    pub fn publication(&self, name: &str) -> Option<Arc<FakePublication>> {
        self.publications.lock().get(name).cloned()
    }

    pub fn is_published(&self, name: &str) -> bool {
        self.publication(name)
            .map(|p| p.is_registered())
            .unwrap_or(false)
    }

    pub fn created(&self) -> Vec<String> {
        self.created.lock().clone()
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().clone()
    }

    fn build_bean(
        &self,
        name: &str,
        class_name: Option<&str>,
    ) -> ContainerResult<ComponentInstance> {
        let builder = class_name.and_then(|c| self.classes.lock().get(c).cloned());
        let instance = match builder {
            Some(builder) => builder(name)?,
            None => ComponentInstance::from_value(name.to_string()),
        };
        if instance.destroy_callback().is_some() {
            return Ok(instance);
        }
        let log = Arc::clone(&self.destroyed);
        let owned = name.to_string();
        Ok(instance.with_destroy_callback(Arc::new(move || {
            log.lock().push(owned.clone());
            Ok::<(), BoxError>(())
        })))
    }
}

/// 节点直接引用的组件，不穿过引用节点向下展开
fn direct_references(graph: &RecipeGraph, start: RecipeId) -> Vec<String> {
    let mut targets = Vec::new();
    let mut stack: Vec<RecipeId> = graph
        .node(start)
        .map(|n| n.nested.clone())
        .unwrap_or_default();
    while let Some(id) = stack.pop() {
        let Some(node) = graph.node(id) else {
            continue;
        };
        match &node.kind {
            RecipeKind::Ref { target } => targets.push(target.clone()),
            _ => stack.extend(node.nested.iter().copied()),
        }
    }
    targets
}

impl ObjectFactory for ClassMapFactory {
    fn create(
        &self,
        name: &str,
        context: &ExecutionContext<'_>,
    ) -> ContainerResult<ComponentInstance> {
        let id = context
            .graph
            .top_level(name)
            .ok_or_else(|| ContainerError::no_such_component(name))?;
        for target in direct_references(context.graph, id) {
            context.resolver.resolve(&target)?;
        }

        let instance = match context.registry.get(name) {
            Some(Metadata::Bean(bean)) => {
                let instance = self.build_bean(name, bean.class_name.as_deref())?;
                for processor in context.bean_processors {
                    processor.before_init(Arc::clone(instance.object()), name, bean)?;
                    processor.after_init(Arc::clone(instance.object()), name, bean)?;
                }
                instance
            }
            Some(Metadata::Service(_)) => {
                let publication = Arc::new(FakePublication {
                    registered: AtomicBool::new(false),
                    registers: AtomicUsize::new(0),
                    unregisters: AtomicUsize::new(0),
                });
                self.publications
                    .lock()
                    .insert(name.to_string(), Arc::clone(&publication));
                ComponentInstance::from_value(name.to_string()).with_publication(publication)
            }
            _ => ComponentInstance::from_value(name.to_string()),
        };
        self.created.lock().push(name.to_string());
        Ok(instance)
    }
}

// ---------------------------------------------------------------------------
// 事件

#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<ContainerEvent>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<ContainerEvent> {
        self.events.lock().clone()
    }

    pub fn kinds(&self) -> Vec<ContainerEventKind> {
        self.events.lock().iter().map(|e| e.kind).collect()
    }

    pub fn last(&self, kind: ContainerEventKind) -> Option<ContainerEvent> {
        self.events
            .lock()
            .iter()
            .rev()
            .find(|e| e.kind == kind)
            .cloned()
    }

    pub fn count(&self, kind: ContainerEventKind) -> usize {
        self.events.lock().iter().filter(|e| e.kind == kind).count()
    }
}

impl ContainerEventListener for RecordingListener {
    fn on_event(&self, event: &ContainerEvent) {
        self.events.lock().push(event.clone());
    }
}

// ---------------------------------------------------------------------------
// 组装

pub const SYMBOLIC_NAME: &str = "com.example.test";

pub struct Fixture {
    pub host: Arc<FakeHost>,
    pub world: Arc<ServiceWorld>,
    pub factory: Arc<ClassMapFactory>,
    pub events: Arc<RecordingListener>,
    pub namespaces: Arc<NamespaceHandlerRegistryImpl>,
    pub documents: FakeDocuments,
}

impl Fixture {
    pub fn new() -> Self {
        init_tracing();
        let host = Arc::new(FakeHost::new());
        host.set_header(BUNDLE_SYMBOLIC_NAME, SYMBOLIC_NAME);
        Self {
            host,
            world: Arc::new(ServiceWorld::default()),
            factory: Arc::new(ClassMapFactory::default()),
            events: Arc::new(RecordingListener::default()),
            namespaces: Arc::new(NamespaceHandlerRegistryImpl::new()),
            documents: FakeDocuments::default(),
        }
    }

    /// 追加 `Bundle-SymbolicName` 指令
    pub fn with_directives(self, directives: &str) -> Self {
        self.host.set_header(
            BUNDLE_SYMBOLIC_NAME,
            &format!("{SYMBOLIC_NAME};{directives}"),
        );
        self
    }

    pub fn with_definition(mut self, metadata: impl Into<Metadata>) -> Self {
        self.documents.definitions.push(metadata.into());
        self
    }

    pub fn with_type_converter(mut self, metadata: impl Into<Metadata>) -> Self {
        self.documents.type_converters.push(metadata.into());
        self
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.documents.namespaces.insert(namespace.to_string());
        self
    }

    pub fn with_parse_error(mut self, message: &str) -> Self {
        self.documents.parse_error = Some(message.to_string());
        self
    }

    pub fn context(&self) -> ContainerContext {
        ContainerContext {
            host: self.host.clone(),
            extender: BundleIdentity::new(1, "com.example.extender", "1.0.0"),
            urls: vec![Url::parse("file:///OSGI-INF/blueprint/context.xml")
                .expect("valid url")],
            parser_factory: Arc::new(FakeParserFactory {
                documents: self.documents.clone(),
            }),
            namespace_registry: self.namespaces.clone(),
            recipe_builder: Arc::new(MetadataRecipeBuilder::new(self.world.clone())),
            object_factory: self.factory.clone(),
            listeners: vec![self.events.clone()],
        }
    }

    /// 创建并调度容器
    pub fn start(&self) -> ComponentContainer {
        let container =
            ComponentContainer::new(self.context(), ContainerConfig::default(), Handle::current());
        container.schedule();
        container
    }
}
