//! 聚合类型转换器

use container_abstractions::{Converter, ObjectRef};
use container_common::{ContainerError, ContainerResult};
use parking_lot::RwLock;
use std::sync::Arc;

/// 聚合类型转换器
///
/// 按注册顺序依次询问已注册的转换器，第一个声明可以转换的转换器负责转换。
#[derive(Default)]
pub struct AggregateConverter {
    converters: RwLock<Vec<Arc<dyn Converter>>>,
}

impl AggregateConverter {
    /// 创建空的聚合转换器
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册转换器
    pub fn register(&self, converter: Arc<dyn Converter>) {
        self.converters.write().push(converter);
    }

    /// 已注册的转换器数量
    pub fn len(&self) -> usize {
        self.converters.read().len()
    }

    /// 是否没有注册任何转换器
    pub fn is_empty(&self) -> bool {
        self.converters.read().is_empty()
    }

    /// 清除所有转换器
    pub fn clear(&self) {
        self.converters.write().clear();
    }

    fn find(&self, value: &ObjectRef, target_type: &str) -> Option<Arc<dyn Converter>> {
        self.converters
            .read()
            .iter()
            .find(|c| c.can_convert(value, target_type))
            .cloned()
    }
}

impl Converter for AggregateConverter {
    fn can_convert(&self, value: &ObjectRef, target_type: &str) -> bool {
        self.find(value, target_type).is_some()
    }

    fn convert(&self, value: ObjectRef, target_type: &str) -> ContainerResult<ObjectRef> {
        match self.find(&value, target_type) {
            Some(converter) => converter.convert(value, target_type),
            None => Err(ContainerError::definition(format!(
                "Unable to convert value to type {target_type}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ToUpper;

    impl Converter for ToUpper {
        fn can_convert(&self, value: &ObjectRef, target_type: &str) -> bool {
            target_type == "upper" && value.is::<String>()
        }

        fn convert(&self, value: ObjectRef, _target_type: &str) -> ContainerResult<ObjectRef> {
            let text = value
                .downcast_ref::<String>()
                .ok_or_else(|| ContainerError::definition("not a string"))?;
            Ok(Arc::new(text.to_uppercase()))
        }
    }

    #[test]
    fn test_first_matching_converter_wins() {
        let aggregate = AggregateConverter::new();
        assert!(aggregate.is_empty());
        aggregate.register(Arc::new(ToUpper));

        let value: ObjectRef = Arc::new("abc".to_string());
        assert!(aggregate.can_convert(&value, "upper"));
        let converted = aggregate.convert(value, "upper").unwrap();
        assert_eq!(converted.downcast_ref::<String>().map(String::as_str), Some("ABC"));
    }

    #[test]
    fn test_unconvertible_value_fails() {
        let aggregate = AggregateConverter::new();
        aggregate.register(Arc::new(ToUpper));
        let value: ObjectRef = Arc::new(5_u32);
        assert!(aggregate.convert(value, "upper").is_err());
    }
}
