use std::sync::Arc;

use anyhow::Result;

use crate::aspect::identity::CallableIdentity;
use crate::aspect::join_point::{JoinPoint, ProceedingJoinPoint};
use crate::aspect::value::{Args, Value};
use crate::weaver::registry::AdvicePlan;

/// 被织入目标的擦除形态
pub type TargetFn = dyn Fn(Args) -> Result<Value> + Send + Sync;

/// 织入后的可调用对象
///
/// 与目标具有相同的擦除签名；持有解析好的通知计划快照与目标本体，
/// 全部以 `Arc` 共享，可在多线程间并发调用。
pub struct Woven {
    identity: Arc<CallableIdentity>,
    plan: Arc<AdvicePlan>,
    target: Arc<TargetFn>,
}

impl std::fmt::Debug for Woven {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Woven")
            .field("plan", &self.plan)
            .finish_non_exhaustive()
    }
}

impl Woven {
    pub(crate) fn new(
        identity: Arc<CallableIdentity>,
        plan: Arc<AdvicePlan>,
        target: Arc<TargetFn>,
    ) -> Self {
        Self {
            identity,
            plan,
            target,
        }
    }

    /// 目标标识
    pub fn identity(&self) -> &CallableIdentity {
        &self.identity
    }

    /// 解析好的通知计划
    pub fn plan(&self) -> &AdvicePlan {
        &self.plan
    }

    /// 执行一次带切面的调用
    ///
    /// 执行顺序：
    /// 1. 创建本次调用的连接点（参数快照 + 开始时刻）
    /// 2. 依序执行前置通知；前置通知失败视同目标调用失败，
    ///    跳过剩余前置通知和目标调用，直接进入异常路径
    /// 3. 由内向外嵌套环绕通知，最外层起调；每层通过 proceed
    ///    决定是否继续、改写参数或改写结果
    /// 4. 按最终结果分流：成功走返回后通知，失败走异常通知，
    ///    之后都执行后置通知；任何通知自身失败会中止同阶段的
    ///    剩余通知并向调用方传播
    /// 5. 返回最终结果或错误；目标的错误原样透传，绝不吞没
    pub fn call(&self, args: Args) -> Result<Value> {
        let join_point = Arc::new(JoinPoint::new(Arc::clone(&self.identity), args.clone()));

        let mut before_failure = None;
        for advice in &self.plan.before {
            if let Err(err) = advice.before(&join_point) {
                before_failure = Some(err);
                break;
            }
        }

        let result = match before_failure {
            Some(err) => Err(err),
            None => self.invoke_chain(&join_point, args),
        };

        match result {
            Ok(value) => {
                for advice in &self.plan.after_returning {
                    advice.after_returning(&join_point, &value)?;
                }
                for advice in &self.plan.after {
                    advice.after(&join_point)?;
                }
                Ok(value)
            }
            Err(err) => {
                for advice in &self.plan.after_throwing {
                    advice.after_throwing(&join_point, &err)?;
                }
                for advice in &self.plan.after {
                    advice.after(&join_point)?;
                }
                Err(err)
            }
        }
    }

    /// 构造并起调环绕链
    ///
    /// 从终端目标开始，按由内向外的顺序逐层包装；
    /// 计划中靠前（优先级小）的环绕通知位于更外层。
    fn invoke_chain(&self, join_point: &Arc<JoinPoint>, args: Args) -> Result<Value> {
        let mut next: Box<dyn FnOnce(Args) -> Result<Value> + Send> = {
            let target = Arc::clone(&self.target);
            Box::new(move |args| target(args))
        };

        for advice in self.plan.around.iter().rev() {
            let advice = Arc::clone(advice);
            let join_point = Arc::clone(join_point);
            let inner = next;
            next = Box::new(move |args| {
                let pjp = ProceedingJoinPoint::new(join_point, args, inner);
                advice.around(pjp)
            });
        }

        next(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::error::AspectError;
    use crate::aspect::selector::{ExactSelector, PatternSelector};
    use crate::aspect::value::{downcast_ref, value};
    use crate::weaver::registry::AspectRegistry;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn get_user() -> CallableIdentity {
        CallableIdentity::new("service", "get_user")
    }

    fn john_doe(_args: Args) -> Result<Value> {
        Ok(value(String::from("John Doe")))
    }

    #[test]
    fn test_no_advice_is_transparent() {
        let registry = AspectRegistry::new();
        let woven = registry.wrap(get_user(), john_doe).unwrap();

        for _ in 0..2 {
            let result = woven.call(vec![]).unwrap();
            assert_eq!(
                downcast_ref::<String>(&result).map(String::as_str),
                Some("John Doe")
            );
        }
    }

    #[test]
    fn test_before_runs_in_priority_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut registry = AspectRegistry::new();

        for (priority, label) in [(2, "second"), (1, "first")] {
            let order = Arc::clone(&order);
            registry.before(
                ExactSelector::new("service", "get_user"),
                priority,
                move |_jp: &JoinPoint| {
                    order.lock().unwrap().push(label);
                    Ok(())
                },
            );
        }

        let woven = registry.wrap(get_user(), john_doe).unwrap();
        woven.call(vec![]).unwrap();

        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_around_nesting_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut registry = AspectRegistry::new();

        for (priority, label) in [(1, "outer"), (2, "inner")] {
            let order = Arc::clone(&order);
            registry.around(
                ExactSelector::new("service", "get_user"),
                priority,
                move |mut pjp: ProceedingJoinPoint| {
                    order.lock().unwrap().push(format!("{}-pre", label));
                    let outcome = pjp.proceed();
                    order.lock().unwrap().push(format!("{}-post", label));
                    outcome
                },
            );
        }

        let order_target = Arc::clone(&order);
        let woven = registry
            .wrap(get_user(), move |args| {
                order_target.lock().unwrap().push("target".to_string());
                john_doe(args)
            })
            .unwrap();
        woven.call(vec![]).unwrap();

        assert_eq!(
            *order.lock().unwrap(),
            vec!["outer-pre", "inner-pre", "target", "inner-post", "outer-post"]
        );
    }

    #[test]
    fn test_around_short_circuit_skips_target() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = AspectRegistry::new();

        registry.around(
            ExactSelector::new("service", "get_user"),
            0,
            |_pjp: ProceedingJoinPoint| Ok(value(String::from("cached"))),
        );

        let calls_target = Arc::clone(&calls);
        let woven = registry
            .wrap(get_user(), move |args| {
                calls_target.fetch_add(1, Ordering::SeqCst);
                john_doe(args)
            })
            .unwrap();

        let result = woven.call(vec![]).unwrap();
        assert_eq!(
            downcast_ref::<String>(&result).map(String::as_str),
            Some("cached")
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_double_proceed_fails_and_target_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = AspectRegistry::new();

        registry.around(
            ExactSelector::new("service", "get_user"),
            0,
            |mut pjp: ProceedingJoinPoint| {
                pjp.proceed()?;
                pjp.proceed()
            },
        );

        let calls_target = Arc::clone(&calls);
        let woven = registry
            .wrap(get_user(), move |args| {
                calls_target.fetch_add(1, Ordering::SeqCst);
                john_doe(args)
            })
            .unwrap();

        let err = woven.call(vec![]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AspectError>(),
            Some(AspectError::DoubleProceed { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_error_path_advice_routing() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let mut registry = AspectRegistry::new();

        let s = Arc::clone(&stages);
        registry.after_returning(
            PatternSelector::new("service::*").unwrap(),
            0,
            move |_jp: &JoinPoint, _result: &Value| {
                s.lock().unwrap().push("after_returning");
                Ok(())
            },
        );
        let s = Arc::clone(&stages);
        registry.after_throwing(
            PatternSelector::new("service::*").unwrap(),
            0,
            move |_jp: &JoinPoint, _error: &anyhow::Error| {
                s.lock().unwrap().push("after_throwing");
                Ok(())
            },
        );
        let s = Arc::clone(&stages);
        registry.after(
            PatternSelector::new("service::*").unwrap(),
            0,
            move |_jp: &JoinPoint| {
                s.lock().unwrap().push("after");
                Ok(())
            },
        );

        let woven = registry
            .wrap(get_user(), |_args| anyhow::bail!("db unreachable"))
            .unwrap();
        let err = woven.call(vec![]).unwrap_err();
        assert_eq!(err.to_string(), "db unreachable");
        assert_eq!(*stages.lock().unwrap(), vec!["after_throwing", "after"]);

        stages.lock().unwrap().clear();
        let woven = registry.wrap(get_user(), john_doe).unwrap();
        woven.call(vec![]).unwrap();
        assert_eq!(*stages.lock().unwrap(), vec!["after_returning", "after"]);
    }

    #[test]
    fn test_before_failure_behaves_like_target_failure() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = AspectRegistry::new();

        let s = Arc::clone(&stages);
        registry.before(ExactSelector::new("service", "get_user"), 1, move |_jp: &JoinPoint| {
            s.lock().unwrap().push("precondition");
            anyhow::bail!("precondition failed")
        });
        let s = Arc::clone(&stages);
        registry.before(ExactSelector::new("service", "get_user"), 2, move |_jp: &JoinPoint| {
            s.lock().unwrap().push("skipped");
            Ok(())
        });
        let s = Arc::clone(&stages);
        registry.after_throwing(
            ExactSelector::new("service", "get_user"),
            0,
            move |_jp: &JoinPoint, error: &anyhow::Error| {
                s.lock().unwrap().push("after_throwing");
                assert_eq!(error.to_string(), "precondition failed");
                Ok(())
            },
        );

        let calls_target = Arc::clone(&calls);
        let woven = registry
            .wrap(get_user(), move |args| {
                calls_target.fetch_add(1, Ordering::SeqCst);
                john_doe(args)
            })
            .unwrap();

        let err = woven.call(vec![]).unwrap_err();
        assert_eq!(err.to_string(), "precondition failed");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            *stages.lock().unwrap(),
            vec!["precondition", "after_throwing"]
        );
    }

    #[test]
    fn test_after_stage_failure_halts_stage_and_propagates() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let mut registry = AspectRegistry::new();

        let s = Arc::clone(&stages);
        registry.after_returning(
            ExactSelector::new("service", "get_user"),
            1,
            move |_jp: &JoinPoint, _result: &Value| {
                s.lock().unwrap().push("broken");
                anyhow::bail!("advice misconfigured")
            },
        );
        let s = Arc::clone(&stages);
        registry.after_returning(
            ExactSelector::new("service", "get_user"),
            2,
            move |_jp: &JoinPoint, _result: &Value| {
                s.lock().unwrap().push("unreached");
                Ok(())
            },
        );

        let woven = registry.wrap(get_user(), john_doe).unwrap();
        let err = woven.call(vec![]).unwrap_err();
        assert_eq!(err.to_string(), "advice misconfigured");
        assert_eq!(*stages.lock().unwrap(), vec!["broken"]);
    }

    #[test]
    fn test_around_transforms_args_and_result() {
        let mut registry = AspectRegistry::new();

        registry.around(
            ExactSelector::new("calc", "double"),
            0,
            |mut pjp: ProceedingJoinPoint| {
                // 改写参数：10 -> 11
                let n = downcast_ref::<i64>(&pjp.args()[0]).copied().unwrap_or(0);
                let outcome = pjp.proceed_with(vec![value(n + 1)])?;
                // 改写结果：+100
                let doubled = downcast_ref::<i64>(&outcome).copied().unwrap_or(0);
                Ok(value(doubled + 100))
            },
        );

        let woven = registry
            .wrap(CallableIdentity::new("calc", "double"), |args| {
                let n = downcast_ref::<i64>(&args[0]).copied().unwrap_or(0);
                Ok(value(n * 2))
            })
            .unwrap();

        let result = woven.call(vec![value(10i64)]).unwrap();
        assert_eq!(downcast_ref::<i64>(&result), Some(&122));
    }

    #[test]
    fn test_join_point_sees_original_args() {
        let seen = Arc::new(Mutex::new(None));
        let mut registry = AspectRegistry::new();

        let seen_before = Arc::clone(&seen);
        registry.before(ExactSelector::new("calc", "double"), 0, move |jp: &JoinPoint| {
            *seen_before.lock().unwrap() = jp.arg::<i64>(0).copied();
            Ok(())
        });

        let woven = registry
            .wrap(CallableIdentity::new("calc", "double"), |args| {
                let n = downcast_ref::<i64>(&args[0]).copied().unwrap_or(0);
                Ok(value(n * 2))
            })
            .unwrap();

        woven.call(vec![value(21i64)]).unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(21));
    }
}
