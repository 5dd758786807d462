use thiserror::Error;

/// 切面框架统一错误类型
///
/// 框架自身的故障用该枚举表达；通知体和目标函数的业务错误
/// 走 `anyhow::Error` 通道，框架只透传，不吞没。
#[derive(Error, Debug)]
pub enum AspectError {
    /// 切点表达式无法编译
    #[error("无效的切点表达式 '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// 调用标识路径格式非法
    #[error("无效的调用标识 '{path}'")]
    InvalidIdentity { path: String },

    /// 选择器在匹配过程中求值失败（快速失败，绑定不会被静默跳过）
    #[error("选择器对 '{identity}' 求值失败")]
    SelectorEvaluation {
        identity: String,
        #[source]
        source: anyhow::Error,
    },

    /// 环绕通知对同一次调用多次调用 proceed
    #[error("'{identity}' 的 proceed 在一次环绕通知中被调用多次")]
    DoubleProceed { identity: String },
}
