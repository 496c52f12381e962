//! 容器构建器的集成测试

use container_abstractions::{
    ComponentInstance, DocumentParser, ExecutionContext, HostBundle, NamespaceHandlerRegistry,
    ObjectFactory, ObjectRef, ParserFactory, Satisfiable, SatisfiableFactory, ServiceProperties,
    ServiceRegistrationHandle,
};
use container_common::{
    BundleIdentity, ClassDescriptor, ComponentDefinitionRegistry, ContainerError,
    ContainerEventKind, ContainerResult, ContainerState, ServiceReferenceMetadata,
};
use container_composition::{CompositionError, ContainerBuilder, ExtenderSettings};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

struct Host;

struct Registration;

impl ServiceRegistrationHandle for Registration {
    fn unregister(&self) {}
}

impl HostBundle for Host {
    fn identity(&self) -> BundleIdentity {
        BundleIdentity::new(7, "com.example.empty", "2.0.0")
    }

    fn header(&self, _name: &str) -> Option<String> {
        None
    }

    fn load_class(&self, class_name: &str) -> ContainerResult<ClassDescriptor> {
        Ok(ClassDescriptor::new(class_name))
    }

    fn register_service(
        &self,
        _interfaces: &[String],
        _service: ObjectRef,
        _properties: ServiceProperties,
    ) -> ContainerResult<Box<dyn ServiceRegistrationHandle>> {
        Ok(Box::new(Registration))
    }
}

struct EmptyParser;

impl DocumentParser for EmptyParser {
    fn parse(&mut self, _urls: &[Url]) -> ContainerResult<()> {
        Ok(())
    }

    fn namespaces(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    fn populate(
        &self,
        _handlers: &dyn NamespaceHandlerRegistry,
        _registry: &mut ComponentDefinitionRegistry,
    ) -> ContainerResult<()> {
        Ok(())
    }
}

struct Parsers;

impl ParserFactory for Parsers {
    fn create_parser(&self, _xml_validation: bool) -> Box<dyn DocumentParser> {
        Box::new(EmptyParser)
    }
}

struct NoServices;

impl SatisfiableFactory for NoServices {
    fn create(
        &self,
        name: &str,
        _reference: &ServiceReferenceMetadata,
    ) -> ContainerResult<Arc<dyn Satisfiable>> {
        Err(ContainerError::host(format!("no service registry for {name}")))
    }
}

struct NoObjects;

impl ObjectFactory for NoObjects {
    fn create(
        &self,
        name: &str,
        _context: &ExecutionContext<'_>,
    ) -> ContainerResult<ComponentInstance> {
        Err(ContainerError::no_such_component(name))
    }
}

fn complete_builder() -> ContainerBuilder {
    ContainerBuilder::new()
        .with_host(Arc::new(Host))
        .with_parser_factory(Arc::new(Parsers))
        .with_satisfiable_factory(Arc::new(NoServices))
        .with_object_factory(Arc::new(NoObjects))
}

#[test]
fn test_missing_collaborators_are_reported() {
    let err = ContainerBuilder::new().build().unwrap_err();
    assert!(matches!(
        err,
        CompositionError::MissingCollaborator { name: "host" }
    ));

    let err = ContainerBuilder::new()
        .with_host(Arc::new(Host))
        .with_parser_factory(Arc::new(Parsers))
        .with_object_factory(Arc::new(NoObjects))
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        CompositionError::MissingCollaborator {
            name: "recipe_builder"
        }
    ));
}

#[test]
fn test_build_requires_runtime() {
    let err = complete_builder().build().unwrap_err();
    assert!(matches!(err, CompositionError::NoRuntime));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_start_publishes_lifecycle_events() -> anyhow::Result<()> {
    let settings = ExtenderSettings {
        event_bus_capacity: 8,
        ..Default::default()
    };
    let builder = complete_builder().with_settings(settings);
    let bus = builder.event_bus();
    let mut events = bus.subscribe();

    let container = builder
        .add_listener(bus.clone())
        .add_document(Url::parse("file:///OSGI-INF/blueprint/empty.xml")?)
        .start()?;

    let first = tokio::time::timeout(Duration::from_secs(5), events.recv()).await??;
    let second = tokio::time::timeout(Duration::from_secs(5), events.recv()).await??;
    assert_eq!(first.kind, ContainerEventKind::Creating);
    assert_eq!(second.kind, ContainerEventKind::Created);
    assert_eq!(second.bundle.symbolic_name, "com.example.empty");
    assert_eq!(container.state(), ContainerState::Created);

    container.destroy();
    let destroying = tokio::time::timeout(Duration::from_secs(5), events.recv()).await??;
    assert_eq!(destroying.kind, ContainerEventKind::Destroying);
    assert!(container.stats().destroyed);
    Ok(())
}
