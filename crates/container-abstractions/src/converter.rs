//! 类型转换

use crate::instance::ObjectRef;
use container_common::ContainerResult;

/// 类型转换器
pub trait Converter: Send + Sync {
    /// 是否能够把值转换为目标类型
    fn can_convert(&self, value: &ObjectRef, target_type: &str) -> bool;

    /// 转换值
    fn convert(&self, value: ObjectRef, target_type: &str) -> ContainerResult<ObjectRef>;
}
