//! 组件定义注册表
//!
//! 解析器把文档中的顶层组件填充到注册表中，注册表处理器可以在急切创建之前
//! 增删或修改其中的定义。

use crate::errors::{ContainerError, ContainerResult};
use crate::metadata::{Metadata, MetadataKind};
use std::collections::BTreeMap;
use tracing::debug;

/// 组件定义注册表
#[derive(Debug, Clone, Default)]
pub struct ComponentDefinitionRegistry {
    definitions: BTreeMap<String, Metadata>,
    type_converters: Vec<Metadata>,
}

impl ComponentDefinitionRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册顶层组件定义
    ///
    /// 定义必须带有 id，且 id 不能重复。
    pub fn register(&mut self, metadata: Metadata) -> ContainerResult<()> {
        if !metadata.is_component() {
            return Err(ContainerError::definition(format!(
                "Only component metadata can be registered, got {:?}",
                metadata.kind()
            )));
        }
        let id = metadata
            .id()
            .ok_or_else(|| ContainerError::definition("Component must have a valid id"))?
            .to_string();
        if self.definitions.contains_key(&id) {
            return Err(ContainerError::definition(format!(
                "Name '{id}' is already registered"
            )));
        }
        debug!("注册组件定义: {} ({:?})", id, metadata.kind());
        self.definitions.insert(id, metadata);
        Ok(())
    }

    /// 移除组件定义
    pub fn remove(&mut self, id: &str) -> Option<Metadata> {
        self.definitions.remove(id)
    }

    /// 获取组件定义
    pub fn get(&self, id: &str) -> Option<&Metadata> {
        self.definitions.get(id)
    }

    /// 获取可变组件定义
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Metadata> {
        self.definitions.get_mut(id)
    }

    /// 是否包含组件
    pub fn contains(&self, id: &str) -> bool {
        self.definitions.contains_key(id)
    }

    /// 所有组件 id，按字典序排列
    pub fn names(&self) -> Vec<String> {
        self.definitions.keys().cloned().collect()
    }

    /// 遍历所有顶层定义
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Metadata)> {
        self.definitions.iter().map(|(id, m)| (id.as_str(), m))
    }

    /// 组件数量
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// 注册类型转换器
    ///
    /// Bean 同时作为普通组件注册（匿名 Bean 获得生成的 id），以便由仓库创建。
    pub fn register_type_converter(&mut self, metadata: Metadata) -> ContainerResult<()> {
        let metadata = match metadata {
            Metadata::Bean(mut bean) => {
                if bean.id.is_none() {
                    bean.id = Some(format!(".converter-{}", self.type_converters.len()));
                }
                let metadata = Metadata::Bean(bean);
                self.register(metadata.clone())?;
                metadata
            }
            Metadata::Ref(reference) => Metadata::Ref(reference),
            other => {
                return Err(ContainerError::definition(format!(
                    "Unexpected metadata for type converter: {:?}",
                    other.kind()
                )))
            }
        };
        self.type_converters.push(metadata);
        Ok(())
    }

    /// 已声明的类型转换器
    pub fn type_converters(&self) -> &[Metadata] {
        &self.type_converters
    }

    /// 从所有顶层组件出发，收集指定类别的元数据
    pub fn metadata_of_kind(&self, kind: MetadataKind) -> Vec<&Metadata> {
        self.definitions
            .values()
            .flat_map(|m| m.collect_kind(kind))
            .collect()
    }

    /// 清空注册表
    pub fn clear(&mut self) {
        self.definitions.clear();
        self.type_converters.clear();
    }
}
