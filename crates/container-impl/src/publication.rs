//! 服务发布簿记

use container_abstractions::ComponentInstance;
use container_common::{ContainerError, ContainerResult};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// 服务发布器
///
/// 按组件 id 记录已发布的服务，保证发布与注销都是幂等的。
#[derive(Debug, Default)]
pub struct ServicePublisher {
    published: BTreeSet<String>,
}

impl ServicePublisher {
    /// 创建发布器
    pub fn new() -> Self {
        Self::default()
    }

    /// 发布服务，已发布时不做任何事；返回是否真正执行了注册
    pub fn publish(&mut self, name: &str, instance: &ComponentInstance) -> ContainerResult<bool> {
        if self.published.contains(name) {
            return Ok(false);
        }
        let publication = instance.publication().ok_or_else(|| {
            ContainerError::definition(format!("Component {name} is not a service publication"))
        })?;
        publication.register()?;
        info!("发布服务: {}", name);
        self.published.insert(name.to_string());
        Ok(true)
    }

    /// 注销服务，未发布时不做任何事；返回是否真正执行了注销
    pub fn unpublish(&mut self, name: &str, instance: &ComponentInstance) -> bool {
        if !self.published.remove(name) {
            return false;
        }
        if let Some(publication) = instance.publication() {
            publication.unregister();
        }
        info!("注销服务: {}", name);
        true
    }

    /// 注销所有服务
    pub fn unpublish_all<F>(&mut self, mut lookup: F)
    where
        F: FnMut(&str) -> Option<ComponentInstance>,
    {
        for name in std::mem::take(&mut self.published) {
            match lookup(&name) {
                Some(instance) => {
                    if let Some(publication) = instance.publication() {
                        publication.unregister();
                    }
                    info!("注销服务: {}", name);
                }
                None => debug!("已发布服务 {} 的实例不存在", name),
            }
        }
    }

    /// 是否已发布
    pub fn is_published(&self, name: &str) -> bool {
        self.published.contains(name)
    }

    /// 已发布服务数量
    pub fn len(&self) -> usize {
        self.published.len()
    }

    /// 是否没有已发布的服务
    pub fn is_empty(&self) -> bool {
        self.published.is_empty()
    }
}
