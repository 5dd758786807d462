use std::time::{Duration, Instant};

use anyhow::Result;

use crate::aspect::advice::AroundAdvice;
use crate::aspect::join_point::ProceedingJoinPoint;
use crate::aspect::value::Value;

/// 计时通知
///
/// 环绕目标调用测量耗时：proceed 前取单调时钟，proceed 返回后
/// 计算非负耗时并上报。成功与失败都会经过 proceed 之后的测量点，
/// 失败的调用同样计时。配置了慢调用阈值时，超过阈值额外告警。
pub struct TimingAdvice {
    slow_threshold: Option<Duration>,
}

impl TimingAdvice {
    pub fn new(slow_threshold: Option<Duration>) -> Self {
        Self { slow_threshold }
    }
}

impl Default for TimingAdvice {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AroundAdvice for TimingAdvice {
    fn around(&self, mut pjp: ProceedingJoinPoint) -> Result<Value> {
        let identity = pjp.join_point().identity().path();
        let started = Instant::now();
        let outcome = pjp.proceed();
        let elapsed = started.elapsed();

        tracing::info!(
            operation = %identity,
            duration_ms = elapsed.as_millis() as u64,
            success = outcome.is_ok(),
            "Execution time: {} ms",
            elapsed.as_millis()
        );

        if let Some(threshold) = self.slow_threshold {
            if elapsed > threshold {
                tracing::warn!(
                    operation = %identity,
                    duration_ms = elapsed.as_millis() as u64,
                    threshold_ms = threshold.as_millis() as u64,
                    "Slow call: {} took {} ms (threshold: {} ms)",
                    identity,
                    elapsed.as_millis(),
                    threshold.as_millis()
                );
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::identity::CallableIdentity;
    use crate::aspect::selector::PatternSelector;
    use crate::aspect::value::{downcast_ref, value};
    use crate::weaver::registry::AspectRegistry;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_timing_preserves_success() {
        let mut registry = AspectRegistry::new();
        registry.register(
            Arc::new(PatternSelector::new("service::*").unwrap()),
            0,
            crate::aspect::advice::AdviceBody::Around(Arc::new(TimingAdvice::default())),
        );

        let woven = registry
            .wrap(CallableIdentity::new("service", "get_user"), |_args| {
                Ok(value(String::from("John Doe")))
            })
            .unwrap();

        let result = woven.call(vec![]).unwrap();
        assert_eq!(
            downcast_ref::<String>(&result).map(String::as_str),
            Some("John Doe")
        );
    }

    #[test]
    fn test_timing_measures_failing_calls_and_propagates_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = AspectRegistry::new();
        registry.register(
            Arc::new(PatternSelector::new("service::*").unwrap()),
            0,
            crate::aspect::advice::AdviceBody::Around(Arc::new(TimingAdvice::new(Some(
                Duration::from_millis(0),
            )))),
        );

        let calls_target = Arc::clone(&calls);
        let woven = registry
            .wrap(CallableIdentity::new("service", "get_user"), move |_args| {
                calls_target.fetch_add(1, Ordering::SeqCst);
                anyhow::bail!("db unreachable")
            })
            .unwrap();

        let err = woven.call(vec![]).unwrap_err();
        assert_eq!(err.to_string(), "db unreachable");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
