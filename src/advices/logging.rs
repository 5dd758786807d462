use anyhow::Result;

use crate::aspect::advice::{AfterReturningAdvice, AfterThrowingAdvice, BeforeAdvice};
use crate::aspect::join_point::JoinPoint;
use crate::aspect::value::Value;

/// 日志通知
///
/// 同一个实例注册为前置 + 返回后 + 异常三种通知：
/// 调用前记 started，成功记 completed（含结果与耗时），
/// 失败记 failed（含错误与耗时）。成功与失败日志各自按采样率独立采样。
pub struct LoggingAdvice {
    info_sample_rate: f32,
    warn_sample_rate: f32,
}

impl LoggingAdvice {
    pub fn new(info_sample_rate: f32, warn_sample_rate: f32) -> Self {
        Self {
            info_sample_rate,
            warn_sample_rate,
        }
    }

    fn sampled(rate: f32) -> bool {
        rand::random::<f32>() < rate
    }
}

impl Default for LoggingAdvice {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl BeforeAdvice for LoggingAdvice {
    fn before(&self, join_point: &JoinPoint) -> Result<()> {
        if Self::sampled(self.info_sample_rate) {
            tracing::info!(
                operation = %join_point.identity(),
                args = ?join_point.args(),
                "[AOP] {} started",
                join_point.identity()
            );
        }
        Ok(())
    }
}

impl AfterReturningAdvice for LoggingAdvice {
    fn after_returning(&self, join_point: &JoinPoint, result: &Value) -> Result<()> {
        if Self::sampled(self.info_sample_rate) {
            tracing::info!(
                operation = %join_point.identity(),
                args = ?join_point.args(),
                result = ?result,
                status = "success",
                duration_ms = join_point.elapsed().as_millis() as u64,
                "[AOP] {} completed",
                join_point.identity()
            );
        }
        Ok(())
    }
}

impl AfterThrowingAdvice for LoggingAdvice {
    fn after_throwing(&self, join_point: &JoinPoint, error: &anyhow::Error) -> Result<()> {
        if Self::sampled(self.warn_sample_rate) {
            tracing::warn!(
                operation = %join_point.identity(),
                args = ?join_point.args(),
                error = ?error,
                status = "error",
                duration_ms = join_point.elapsed().as_millis() as u64,
                "[AOP] {} failed",
                join_point.identity()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::identity::CallableIdentity;
    use crate::aspect::value::value;
    use std::sync::Arc;

    fn join_point() -> JoinPoint {
        JoinPoint::new(
            Arc::new(CallableIdentity::new("service", "get_user")),
            vec![value("alice")],
        )
    }

    #[test]
    fn test_logging_advice_never_fails() {
        let advice = LoggingAdvice::default();
        let jp = join_point();

        advice.before(&jp).unwrap();
        advice.after_returning(&jp, &value(String::from("ok"))).unwrap();
        advice
            .after_throwing(&jp, &anyhow::anyhow!("db unreachable"))
            .unwrap();
    }

    #[test]
    fn test_zero_sample_rate_suppresses_everything() {
        // 采样率为 0 时所有分支都静默，但依旧成功返回
        let advice = LoggingAdvice::new(0.0, 0.0);
        let jp = join_point();

        advice.before(&jp).unwrap();
        advice.after_returning(&jp, &value(1i64)).unwrap();
        advice.after_throwing(&jp, &anyhow::anyhow!("boom")).unwrap();
    }
}
