use std::sync::Arc;

use anyhow::Result;

use crate::aspect::join_point::{JoinPoint, ProceedingJoinPoint};
use crate::aspect::value::Value;

/// 通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdviceKind {
    /// 前置通知
    Before,
    /// 返回后通知（仅成功时执行）
    AfterReturning,
    /// 异常通知（仅失败时执行）
    AfterThrowing,
    /// 后置通知（无论成功还是失败都执行）
    After,
    /// 环绕通知（完全控制目标调用）
    Around,
}

/// 前置通知
///
/// 在目标调用前执行，只读连接点（可见参数，尚无结果）。
/// 前置通知失败等价于目标调用失败：剩余前置通知和目标调用
/// 都被跳过，直接进入异常路径。
pub trait BeforeAdvice: Send + Sync {
    fn before(&self, join_point: &JoinPoint) -> Result<()>;
}

/// 返回后通知
///
/// 目标调用成功后执行，结果只读。
pub trait AfterReturningAdvice: Send + Sync {
    fn after_returning(&self, join_point: &JoinPoint, result: &Value) -> Result<()>;
}

/// 异常通知
///
/// 目标调用失败后执行，错误只读；错误照常向调用方传播，
/// 通知只观察不吞没。
pub trait AfterThrowingAdvice: Send + Sync {
    fn after_throwing(&self, join_point: &JoinPoint, error: &anyhow::Error) -> Result<()>;
}

/// 后置通知
///
/// 无论目标调用成功还是失败都执行。
pub trait AfterAdvice: Send + Sync {
    fn after(&self, join_point: &JoinPoint) -> Result<()>;
}

/// 环绕通知
///
/// 通过 [`ProceedingJoinPoint`] 完全控制目标调用：可以继续执行、
/// 改写参数、改写结果，或者不调用 proceed 直接短路整条链。
pub trait AroundAdvice: Send + Sync {
    fn around(&self, pjp: ProceedingJoinPoint) -> Result<Value>;
}

impl<F> BeforeAdvice for F
where
    F: Fn(&JoinPoint) -> Result<()> + Send + Sync,
{
    fn before(&self, join_point: &JoinPoint) -> Result<()> {
        self(join_point)
    }
}

impl<F> AfterReturningAdvice for F
where
    F: Fn(&JoinPoint, &Value) -> Result<()> + Send + Sync,
{
    fn after_returning(&self, join_point: &JoinPoint, result: &Value) -> Result<()> {
        self(join_point, result)
    }
}

impl<F> AfterThrowingAdvice for F
where
    F: Fn(&JoinPoint, &anyhow::Error) -> Result<()> + Send + Sync,
{
    fn after_throwing(&self, join_point: &JoinPoint, error: &anyhow::Error) -> Result<()> {
        self(join_point, error)
    }
}

impl<F> AfterAdvice for F
where
    F: Fn(&JoinPoint) -> Result<()> + Send + Sync,
{
    fn after(&self, join_point: &JoinPoint) -> Result<()> {
        self(join_point)
    }
}

impl<F> AroundAdvice for F
where
    F: Fn(ProceedingJoinPoint) -> Result<Value> + Send + Sync,
{
    fn around(&self, pjp: ProceedingJoinPoint) -> Result<Value> {
        self(pjp)
    }
}

/// 通知体
///
/// 变体即通知类型：注册时类型由枚举变体决定，
/// 不存在类型与通知体不一致的状态。
#[derive(Clone)]
pub enum AdviceBody {
    Before(Arc<dyn BeforeAdvice>),
    AfterReturning(Arc<dyn AfterReturningAdvice>),
    AfterThrowing(Arc<dyn AfterThrowingAdvice>),
    After(Arc<dyn AfterAdvice>),
    Around(Arc<dyn AroundAdvice>),
}

impl AdviceBody {
    /// 通知类型
    pub fn kind(&self) -> AdviceKind {
        match self {
            AdviceBody::Before(_) => AdviceKind::Before,
            AdviceBody::AfterReturning(_) => AdviceKind::AfterReturning,
            AdviceBody::AfterThrowing(_) => AdviceKind::AfterThrowing,
            AdviceBody::After(_) => AdviceKind::After,
            AdviceBody::Around(_) => AdviceKind::Around,
        }
    }
}

impl std::fmt::Debug for AdviceBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AdviceBody").field(&self.kind()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::identity::CallableIdentity;
    use crate::aspect::value::value;
    use std::sync::Arc;

    fn join_point() -> JoinPoint {
        JoinPoint::new(Arc::new(CallableIdentity::new("service", "get_user")), vec![])
    }

    #[test]
    fn test_body_kind() {
        let before = AdviceBody::Before(Arc::new(|_jp: &JoinPoint| -> Result<()> { Ok(()) }));
        assert_eq!(before.kind(), AdviceKind::Before);

        let around = AdviceBody::Around(Arc::new(|mut pjp: ProceedingJoinPoint| pjp.proceed()));
        assert_eq!(around.kind(), AdviceKind::Around);
    }

    #[test]
    fn test_closure_as_before_advice() {
        let advice: Arc<dyn BeforeAdvice> = Arc::new(|jp: &JoinPoint| -> Result<()> {
            assert_eq!(jp.identity().name(), "get_user");
            Ok(())
        });
        advice.before(&join_point()).unwrap();
    }

    #[test]
    fn test_closure_as_after_returning_advice() {
        let advice: Arc<dyn AfterReturningAdvice> =
            Arc::new(|_jp: &JoinPoint, result: &Value| -> Result<()> {
                assert_eq!(format!("{:?}", result), "1");
                Ok(())
            });
        advice.after_returning(&join_point(), &value(1i64)).unwrap();
    }

    #[test]
    fn test_body_debug() {
        let body = AdviceBody::After(Arc::new(|_jp: &JoinPoint| -> Result<()> { Ok(()) }));
        assert_eq!(format!("{:?}", body), "AdviceBody(After)");
    }
}
