/// args! 宏 - 构造类型擦除的参数列表
///
/// # 使用方式
///
/// ```ignore
/// // 空参数
/// let args = args![];
///
/// // 任意个参数，逐个擦除为 Value
/// let args = args![42i64, String::from("alice")];
/// woven.call(args)?;
/// ```
///
/// # 参数
///
/// 每个参数要求 `Any + Debug + Send + Sync`，
/// 等价于逐个调用 [`crate::aspect::value`]。
#[macro_export]
macro_rules! args {
    () => {
        $crate::aspect::Args::new()
    };

    ($($value:expr),+ $(,)?) => {
        vec![$($crate::aspect::value($value)),+]
    };
}

#[cfg(test)]
mod tests {
    use crate::aspect::downcast_ref;

    #[test]
    fn test_args_empty() {
        let args = args![];
        assert!(args.is_empty());
    }

    #[test]
    fn test_args_values() {
        let args = args![42i64, String::from("alice")];
        assert_eq!(args.len(), 2);
        assert_eq!(downcast_ref::<i64>(&args[0]), Some(&42));
        assert_eq!(
            downcast_ref::<String>(&args[1]).map(String::as_str),
            Some("alice")
        );
    }

    #[test]
    fn test_args_trailing_comma() {
        let args = args![1i64, 2i64,];
        assert_eq!(args.len(), 2);
    }
}
