use anyhow::Result;

use crate::aspect::advice::AfterThrowingAdvice;
use crate::aspect::join_point::JoinPoint;

/// 错误日志通知
///
/// 在匹配的调用失败时记录 error 级日志。只观察，不吞没：
/// 错误在通知执行后照常向调用方传播。
pub struct ErrorLoggingAdvice;

impl ErrorLoggingAdvice {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ErrorLoggingAdvice {
    fn default() -> Self {
        Self::new()
    }
}

impl AfterThrowingAdvice for ErrorLoggingAdvice {
    fn after_throwing(&self, join_point: &JoinPoint, error: &anyhow::Error) -> Result<()> {
        tracing::error!(
            operation = %join_point.identity(),
            error = ?error,
            duration_ms = join_point.elapsed().as_millis() as u64,
            "[AOP] {} failed: {}",
            join_point.identity(),
            error
        );
        Ok(())
    }
}
