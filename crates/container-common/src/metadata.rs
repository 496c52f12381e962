//! 组件定义元数据
//!
//! 元数据是一棵标签化的树：顶层组件（Bean、Service、ServiceReference、
//! RefCollection）以 id 注册到注册表中，其余变体作为属性值、参数或集合元素嵌套出现。
//! 遍历通过 [`MetadataVisitor`] 完成，不依赖运行时类型判断。

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 类型能力
///
/// 宿主类加载器解析出的类可以实现以下扩展点。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// 注册表处理器，可在急切创建前改写组件定义注册表
    RegistryProcessor,
    /// Bean 处理器，在每个 Bean 创建时参与处理
    BeanProcessor,
    /// 类型转换器
    TypeConverter,
}

/// 运行时类描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    /// 类名
    pub name: String,
    /// 实现的扩展能力
    pub capabilities: BTreeSet<Capability>,
}

impl ClassDescriptor {
    /// 创建新的类描述
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capabilities: BTreeSet::new(),
        }
    }

    /// 添加能力
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    /// 是否可赋值给指定能力
    pub fn is_assignable_to(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Bean 作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BeanScope {
    /// 单例
    #[default]
    Singleton,
    /// 每次获取都重新创建
    Prototype,
}

/// 服务引用可用性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Mandatory,
    Optional,
}

/// 元数据类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataKind {
    Bean,
    Service,
    ServiceReference,
    RefCollection,
    Collection,
    Map,
    Props,
    Ref,
    IdRef,
    Value,
    Null,
}

/// 组件元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Metadata {
    Bean(BeanMetadata),
    Service(ServiceMetadata),
    ServiceReference(ServiceReferenceMetadata),
    RefCollection(RefCollectionMetadata),
    Collection(CollectionMetadata),
    Map(MapMetadata),
    Props(PropsMetadata),
    Ref(RefMetadata),
    IdRef(IdRefMetadata),
    Value(ValueMetadata),
    Null,
}

impl Metadata {
    /// 元数据类别
    pub fn kind(&self) -> MetadataKind {
        match self {
            Self::Bean(_) => MetadataKind::Bean,
            Self::Service(_) => MetadataKind::Service,
            Self::ServiceReference(_) => MetadataKind::ServiceReference,
            Self::RefCollection(_) => MetadataKind::RefCollection,
            Self::Collection(_) => MetadataKind::Collection,
            Self::Map(_) => MetadataKind::Map,
            Self::Props(_) => MetadataKind::Props,
            Self::Ref(_) => MetadataKind::Ref,
            Self::IdRef(_) => MetadataKind::IdRef,
            Self::Value(_) => MetadataKind::Value,
            Self::Null => MetadataKind::Null,
        }
    }

    /// 组件 id（仅组件类元数据可能带有 id）
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Bean(m) => m.id.as_deref(),
            Self::Service(m) => m.id.as_deref(),
            Self::ServiceReference(m) => m.id.as_deref(),
            Self::RefCollection(m) => m.reference.id.as_deref(),
            _ => None,
        }
    }

    /// 是否为可注册的组件元数据
    pub fn is_component(&self) -> bool {
        matches!(
            self,
            Self::Bean(_) | Self::Service(_) | Self::ServiceReference(_) | Self::RefCollection(_)
        )
    }

    /// 引用目标（`Ref` 与 `IdRef`）
    pub fn reference_target(&self) -> Option<&str> {
        match self {
            Self::Ref(m) => Some(&m.component_id),
            Self::IdRef(m) => Some(&m.component_id),
            _ => None,
        }
    }

    /// 创建值元数据
    pub fn value(value: impl Into<String>) -> Self {
        Self::Value(ValueMetadata::new(value))
    }

    /// 创建引用元数据
    pub fn reference(component_id: impl Into<String>) -> Self {
        Self::Ref(RefMetadata {
            component_id: component_id.into(),
        })
    }

    /// 创建 id 引用元数据
    pub fn id_reference(component_id: impl Into<String>) -> Self {
        Self::IdRef(IdRefMetadata {
            component_id: component_id.into(),
        })
    }

    /// 前序遍历：先访问自身，再按 [`Metadata::children`] 的顺序访问子元数据
    pub fn walk<V: MetadataVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit(self);
        for child in self.children() {
            child.walk(visitor);
        }
    }

    /// 收集树中所有指定类别的元数据（包括自身）
    pub fn collect_kind(&self, kind: MetadataKind) -> Vec<&Metadata> {
        let mut found = Vec::new();
        self.collect_into(kind, &mut found);
        found
    }

    fn collect_into<'a>(&'a self, kind: MetadataKind, found: &mut Vec<&'a Metadata>) {
        if self.kind() == kind {
            found.push(self);
        }
        for child in self.children() {
            child.collect_into(kind, found);
        }
    }

    /// 直接子元数据
    ///
    /// 下降路径：工厂组件、构造参数、属性、集合/映射/属性表的键和值、
    /// 引用监听器、引用集合比较器、服务组件、服务属性、注册监听器。
    pub fn children(&self) -> Vec<&Metadata> {
        let mut children = Vec::new();
        match self {
            Self::Bean(bean) => {
                if let Some(factory) = &bean.factory_component {
                    children.push(factory.as_ref());
                }
                children.extend(bean.arguments.iter().map(|a| &a.value));
                children.extend(bean.properties.iter().map(|p| &p.value));
            }
            Self::Collection(collection) => children.extend(collection.values.iter()),
            Self::Map(map) => push_entries(&map.entries, &mut children),
            Self::Props(props) => push_entries(&props.entries, &mut children),
            Self::ServiceReference(reference) => {
                children.extend(reference.reference_listeners.iter().map(|l| &l.listener_component));
            }
            Self::RefCollection(collection) => {
                children.extend(
                    collection
                        .reference
                        .reference_listeners
                        .iter()
                        .map(|l| &l.listener_component),
                );
                if let Some(comparator) = &collection.comparator {
                    children.push(comparator.as_ref());
                }
            }
            Self::Service(service) => {
                children.push(service.service_component.as_ref());
                push_entries(&service.service_properties, &mut children);
                children.extend(
                    service
                        .registration_listeners
                        .iter()
                        .map(|l| &l.listener_component),
                );
            }
            Self::Ref(_) | Self::IdRef(_) | Self::Value(_) | Self::Null => {}
        }
        children
    }
}

fn push_entries<'a>(entries: &'a [MapEntry], children: &mut Vec<&'a Metadata>) {
    for entry in entries {
        children.push(&entry.key);
        children.push(&entry.value);
    }
}

/// 元数据访问者
pub trait MetadataVisitor {
    /// 访问一个元数据节点
    fn visit(&mut self, metadata: &Metadata);
}

impl<F> MetadataVisitor for F
where
    F: FnMut(&Metadata),
{
    fn visit(&mut self, metadata: &Metadata) {
        self(metadata)
    }
}

/// Bean 元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BeanMetadata {
    /// 组件 id，内部 Bean 可以没有
    pub id: Option<String>,
    /// 类名
    pub class_name: Option<String>,
    /// 已解析的运行时类
    pub runtime_class: Option<ClassDescriptor>,
    /// 作用域
    pub scope: BeanScope,
    /// 是否延迟初始化
    pub lazy_init: bool,
    /// 构造参数
    pub arguments: Vec<BeanArgument>,
    /// 属性
    pub properties: Vec<BeanProperty>,
    /// 工厂组件
    pub factory_component: Option<Box<Metadata>>,
    /// 工厂方法
    pub factory_method: Option<String>,
    /// 初始化方法
    pub init_method: Option<String>,
    /// 销毁方法
    pub destroy_method: Option<String>,
    /// 显式依赖
    pub depends_on: Vec<String>,
}

impl BeanMetadata {
    /// 创建新的 Bean 元数据
    pub fn new(id: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            class_name: Some(class_name.into()),
            ..Self::default()
        }
    }

    /// 创建匿名内部 Bean
    pub fn inner(class_name: impl Into<String>) -> Self {
        Self {
            class_name: Some(class_name.into()),
            ..Self::default()
        }
    }

    /// 设置运行时类
    pub fn with_runtime_class(mut self, class: ClassDescriptor) -> Self {
        self.runtime_class = Some(class);
        self
    }

    /// 设置作用域
    pub fn with_scope(mut self, scope: BeanScope) -> Self {
        self.scope = scope;
        self
    }

    /// 标记为延迟初始化
    pub fn lazy(mut self) -> Self {
        self.lazy_init = true;
        self
    }

    /// 添加属性
    pub fn with_property(mut self, name: impl Into<String>, value: Metadata) -> Self {
        self.properties.push(BeanProperty {
            name: name.into(),
            value,
        });
        self
    }

    /// 添加构造参数
    pub fn with_argument(mut self, value: Metadata) -> Self {
        let index = self.arguments.len();
        self.arguments.push(BeanArgument {
            value,
            index: Some(index),
            value_type: None,
        });
        self
    }

    /// 设置工厂组件
    pub fn with_factory_component(mut self, factory: Metadata, method: impl Into<String>) -> Self {
        self.factory_component = Some(Box::new(factory));
        self.factory_method = Some(method.into());
        self
    }

    /// 设置销毁方法
    pub fn with_destroy_method(mut self, method: impl Into<String>) -> Self {
        self.destroy_method = Some(method.into());
        self
    }

    /// 是否为急切单例
    pub fn is_eager_singleton(&self) -> bool {
        self.scope == BeanScope::Singleton && !self.lazy_init
    }
}

impl From<BeanMetadata> for Metadata {
    fn from(value: BeanMetadata) -> Self {
        Self::Bean(value)
    }
}

/// Bean 构造参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeanArgument {
    pub value: Metadata,
    pub index: Option<usize>,
    pub value_type: Option<String>,
}

/// Bean 属性
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeanProperty {
    pub name: String,
    pub value: Metadata,
}

/// 服务发布元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceMetadata {
    /// 组件 id
    pub id: Option<String>,
    /// 服务实现组件
    pub service_component: Box<Metadata>,
    /// 发布的接口
    pub interfaces: Vec<String>,
    /// 服务属性
    pub service_properties: Vec<MapEntry>,
    /// 注册监听器
    pub registration_listeners: Vec<RegistrationListener>,
    /// 服务排序
    pub ranking: i32,
}

impl ServiceMetadata {
    /// 创建新的服务元数据
    pub fn new(id: impl Into<String>, service_component: Metadata) -> Self {
        Self {
            id: Some(id.into()),
            service_component: Box::new(service_component),
            interfaces: Vec::new(),
            service_properties: Vec::new(),
            registration_listeners: Vec::new(),
            ranking: 0,
        }
    }

    /// 添加接口
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// 添加服务属性
    pub fn with_service_property(mut self, key: Metadata, value: Metadata) -> Self {
        self.service_properties.push(MapEntry { key, value });
        self
    }

    /// 添加注册监听器
    pub fn with_registration_listener(mut self, listener: Metadata) -> Self {
        self.registration_listeners.push(RegistrationListener {
            listener_component: listener,
            registration_method: None,
            unregistration_method: None,
        });
        self
    }
}

impl From<ServiceMetadata> for Metadata {
    fn from(value: ServiceMetadata) -> Self {
        Self::Service(value)
    }
}

/// 服务注册监听器
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationListener {
    pub listener_component: Metadata,
    pub registration_method: Option<String>,
    pub unregistration_method: Option<String>,
}

/// 服务引用元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ServiceReferenceMetadata {
    /// 组件 id
    pub id: Option<String>,
    /// 引用的接口
    pub interface: Option<String>,
    /// 附加过滤条件
    pub filter: Option<String>,
    /// 限定的组件名
    pub component_name: Option<String>,
    /// 可用性
    pub availability: Availability,
    /// 绑定/解绑监听器
    pub reference_listeners: Vec<ReferenceListener>,
    /// 等待服务的超时时间（毫秒）
    pub timeout_ms: u64,
}

impl ServiceReferenceMetadata {
    /// 创建新的服务引用元数据
    pub fn new(id: impl Into<String>, interface: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            interface: Some(interface.into()),
            ..Self::default()
        }
    }

    /// 设置过滤条件
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// 设置为可选引用
    pub fn optional(mut self) -> Self {
        self.availability = Availability::Optional;
        self
    }

    /// 添加引用监听器
    pub fn with_reference_listener(mut self, listener: Metadata) -> Self {
        self.reference_listeners.push(ReferenceListener {
            listener_component: listener,
            bind_method: None,
            unbind_method: None,
        });
        self
    }

    /// 宿主注册表过滤字符串
    pub fn host_filter(&self) -> String {
        let mut clauses = Vec::new();
        if let Some(interface) = &self.interface {
            clauses.push(format!("(objectClass={interface})"));
        }
        if let Some(filter) = &self.filter {
            if filter.starts_with('(') {
                clauses.push(filter.clone());
            } else {
                clauses.push(format!("({filter})"));
            }
        }
        if let Some(component) = &self.component_name {
            clauses.push(format!("(osgi.service.blueprint.compname={component})"));
        }
        match clauses.len() {
            0 => "(objectClass=*)".to_string(),
            1 => clauses.remove(0),
            _ => format!("(&{})", clauses.concat()),
        }
    }
}

impl From<ServiceReferenceMetadata> for Metadata {
    fn from(value: ServiceReferenceMetadata) -> Self {
        Self::ServiceReference(value)
    }
}

/// 引用监听器
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceListener {
    pub listener_component: Metadata,
    pub bind_method: Option<String>,
    pub unbind_method: Option<String>,
}

/// 引用集合元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefCollectionMetadata {
    /// 底层服务引用
    pub reference: ServiceReferenceMetadata,
    /// 排序比较器
    pub comparator: Option<Box<Metadata>>,
    /// 成员类型（service-object 或 service-reference）
    pub member_type: Option<String>,
}

impl RefCollectionMetadata {
    /// 创建新的引用集合元数据
    pub fn new(reference: ServiceReferenceMetadata) -> Self {
        Self {
            reference,
            comparator: None,
            member_type: None,
        }
    }

    /// 设置比较器
    pub fn with_comparator(mut self, comparator: Metadata) -> Self {
        self.comparator = Some(Box::new(comparator));
        self
    }
}

impl From<RefCollectionMetadata> for Metadata {
    fn from(value: RefCollectionMetadata) -> Self {
        Self::RefCollection(value)
    }
}

/// 集合元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CollectionMetadata {
    pub collection_class: Option<String>,
    pub value_type: Option<String>,
    pub values: Vec<Metadata>,
}

impl CollectionMetadata {
    /// 由元素创建集合
    pub fn of(values: Vec<Metadata>) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }
}

impl From<CollectionMetadata> for Metadata {
    fn from(value: CollectionMetadata) -> Self {
        Self::Collection(value)
    }
}

/// 映射条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: Metadata,
    pub value: Metadata,
}

impl MapEntry {
    /// 创建映射条目
    pub fn new(key: Metadata, value: Metadata) -> Self {
        Self { key, value }
    }
}

/// 映射元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MapMetadata {
    pub key_type: Option<String>,
    pub value_type: Option<String>,
    pub entries: Vec<MapEntry>,
}

impl From<MapMetadata> for Metadata {
    fn from(value: MapMetadata) -> Self {
        Self::Map(value)
    }
}

/// 属性表元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PropsMetadata {
    pub entries: Vec<MapEntry>,
}

impl From<PropsMetadata> for Metadata {
    fn from(value: PropsMetadata) -> Self {
        Self::Props(value)
    }
}

/// 组件引用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefMetadata {
    pub component_id: String,
}

/// 组件 id 引用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRefMetadata {
    pub component_id: String,
}

/// 字面值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueMetadata {
    pub value: String,
    pub type_name: Option<String>,
}

impl ValueMetadata {
    /// 创建字面值
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            type_name: None,
        }
    }
}
