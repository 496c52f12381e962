//! 可销毁回调

use container_abstractions::{DestroyCallback, DestroyableSink};
use parking_lot::Mutex;
use tracing::{debug, warn};

/// 可销毁回调登记表
///
/// 回调按登记顺序执行，同名回调替换旧回调但保留原位置。
#[derive(Default)]
pub struct DestroyableRegistry {
    callbacks: Mutex<Vec<(String, DestroyCallback)>>,
}

impl DestroyableRegistry {
    /// 创建空登记表
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记回调
    pub fn add(&self, name: impl Into<String>, callback: DestroyCallback) {
        let name = name.into();
        let mut callbacks = self.callbacks.lock();
        match callbacks.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = callback,
            None => callbacks.push((name, callback)),
        }
    }

    /// 已登记的回调数量
    pub fn len(&self) -> usize {
        self.callbacks.lock().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.callbacks.lock().is_empty()
    }

    /// 执行并清空所有回调，单个回调失败只记录日志
    pub fn run_all(&self) {
        let callbacks = std::mem::take(&mut *self.callbacks.lock());
        for (name, callback) in callbacks {
            debug!("执行销毁回调: {}", name);
            if let Err(e) = callback() {
                warn!("销毁回调 {} 执行失败: {}", name, e);
            }
        }
    }
}

impl DestroyableSink for DestroyableRegistry {
    fn add_destroyable(&self, name: &str, callback: DestroyCallback) {
        self.add(name, callback);
    }
}
