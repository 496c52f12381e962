//! 处理器阶段
//!
//! 在急切创建之前实例化类型转换器、注册表处理器和 Bean 处理器。
//! 注册表处理器可能改写任意组件定义，因此每个处理器生效后都会重建配方图，
//! 只保留已经创建的实例。

use crate::converter::AggregateConverter;
use crate::destroyables::DestroyableRegistry;
use crate::repository::{CreationEnv, Repository};
use container_abstractions::{BeanProcessor, HostBundle, RecipeBuilder};
use container_common::{
    Capability, ClassDescriptor, ComponentDefinitionRegistry, ContainerError, ContainerResult,
    Metadata, MetadataKind,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 处理器阶段
pub struct ProcessorPass<'a> {
    pub host: &'a dyn HostBundle,
    pub recipe_builder: &'a dyn RecipeBuilder,
    pub converter: &'a AggregateConverter,
    pub destroyables: &'a DestroyableRegistry,
}

impl ProcessorPass<'_> {
    /// 执行处理器阶段
    pub fn run(
        &self,
        registry: &mut ComponentDefinitionRegistry,
        repository: &mut Repository,
        bean_processors: &mut Vec<Arc<dyn BeanProcessor>>,
    ) -> ContainerResult<()> {
        self.register_type_converters(registry, repository, bean_processors)?;

        let mut processed = HashSet::new();
        while let Some(id) =
            self.next_processor(registry, &processed, Capability::RegistryProcessor)?
        {
            let instance = repository.create(&id, &self.env(registry, bean_processors))?;
            let processor = instance.registry_processor().cloned().ok_or_else(|| {
                ContainerError::definition(format!(
                    "Component {id} does not implement the registry processor interface"
                ))
            })?;
            info!("执行注册表处理器: {}", id);
            processor.process(registry)?;
            processed.insert(id);
            self.rebuild(registry, repository, bean_processors)?;
        }

        while let Some(id) =
            self.next_processor(registry, &processed, Capability::BeanProcessor)?
        {
            let instance = repository.create(&id, &self.env(registry, bean_processors))?;
            let processor = instance.bean_processor().cloned().ok_or_else(|| {
                ContainerError::definition(format!(
                    "Component {id} does not implement the bean processor interface"
                ))
            })?;
            info!("添加 Bean 处理器: {}", id);
            bean_processors.push(processor);
            processed.insert(id);
            self.rebuild(registry, repository, bean_processors)?;
        }
        Ok(())
    }

    fn env<'e>(
        &'e self,
        registry: &'e ComponentDefinitionRegistry,
        bean_processors: &'e [Arc<dyn BeanProcessor>],
    ) -> CreationEnv<'e> {
        CreationEnv {
            host: self.host,
            registry,
            bean_processors,
            converter: self.converter,
            destroyables: self.destroyables,
        }
    }

    fn register_type_converters(
        &self,
        registry: &ComponentDefinitionRegistry,
        repository: &Repository,
        bean_processors: &[Arc<dyn BeanProcessor>],
    ) -> ContainerResult<()> {
        for metadata in registry.type_converters() {
            let id = match metadata {
                Metadata::Bean(bean) => bean.id.clone(),
                Metadata::Ref(reference) => Some(reference.component_id.clone()),
                _ => None,
            }
            .ok_or_else(|| {
                ContainerError::definition(format!(
                    "Unexpected metadata for type converter: {:?}",
                    metadata.kind()
                ))
            })?;
            let instance = repository.create(&id, &self.env(registry, bean_processors))?;
            let converter = instance.converter().cloned().ok_or_else(|| {
                ContainerError::definition(format!(
                    "Type converter {id} does not implement the Converter interface"
                ))
            })?;
            debug!("注册类型转换器: {}", id);
            self.converter.register(converter);
        }
        Ok(())
    }

    /// 下一个尚未处理、且运行时类具有指定能力的 Bean
    fn next_processor(
        &self,
        registry: &ComponentDefinitionRegistry,
        processed: &HashSet<String>,
        capability: Capability,
    ) -> ContainerResult<Option<String>> {
        for metadata in registry.metadata_of_kind(MetadataKind::Bean) {
            let Metadata::Bean(bean) = metadata else {
                continue;
            };
            let Some(class) =
                self.runtime_class(bean.runtime_class.as_ref(), bean.class_name.as_deref())?
            else {
                continue;
            };
            if !class.is_assignable_to(capability) {
                continue;
            }
            if capability == Capability::BeanProcessor
                && class.is_assignable_to(Capability::RegistryProcessor)
            {
                continue;
            }
            match &bean.id {
                Some(id) if !processed.contains(id) => return Ok(Some(id.clone())),
                Some(_) => {}
                None => warn!("忽略匿名处理器 Bean: {:?}", bean.class_name),
            }
        }
        Ok(None)
    }

    /// 每次都经由宿主类加载器解析，不跨配方图重建缓存
    fn runtime_class(
        &self,
        runtime_class: Option<&ClassDescriptor>,
        class_name: Option<&str>,
    ) -> ContainerResult<Option<ClassDescriptor>> {
        match (runtime_class, class_name) {
            (Some(class), _) => Ok(Some(class.clone())),
            (None, Some(name)) => self.host.load_class(name).map(Some),
            (None, None) => Ok(None),
        }
    }

    fn rebuild(
        &self,
        registry: &ComponentDefinitionRegistry,
        repository: &mut Repository,
        bean_processors: &[Arc<dyn BeanProcessor>],
    ) -> ContainerResult<()> {
        repository.rebuild(self.recipe_builder.build(registry)?, bean_processors);
        Ok(())
    }
}
