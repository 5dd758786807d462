use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 切面值：经过类型擦除的参数值 / 返回值
///
/// 同一个注册表要服务于任意签名的可调用对象，参数和返回值统一擦除为
/// `Arc<dyn AspectValue>`。要求 `Debug` 是为了让日志类通知能像记录
/// 普通调用一样打印参数和结果。
pub trait AspectValue: Any + fmt::Debug + Send + Sync {
    /// 以 `Any` 视角访问底层值，用于向下转型
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug + Send + Sync> AspectValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// 类型擦除后的单个值
pub type Value = Arc<dyn AspectValue>;

/// 一次调用的参数列表
pub type Args = Vec<Value>;

/// 将任意值擦除为 [`Value`]
pub fn value<T: Any + fmt::Debug + Send + Sync>(v: T) -> Value {
    Arc::new(v)
}

/// 尝试将 [`Value`] 还原为具体类型的引用
pub fn downcast_ref<T: Any>(value: &Value) -> Option<&T> {
    value.as_any().downcast_ref::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_roundtrip() {
        let v = value(String::from("hello"));
        assert_eq!(downcast_ref::<String>(&v).map(String::as_str), Some("hello"));
        assert!(downcast_ref::<i64>(&v).is_none());
    }

    #[test]
    fn test_value_debug() {
        let v = value(42i64);
        assert_eq!(format!("{:?}", v), "42");

        let args: Args = vec![value(1i64), value("two")];
        assert_eq!(format!("{:?}", args), r#"[1, "two"]"#);
    }

    #[test]
    fn test_args_empty() {
        let args = Args::new();
        assert!(args.is_empty());
    }
}
