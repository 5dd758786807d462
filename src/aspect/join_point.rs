use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::aspect::error::AspectError;
use crate::aspect::identity::CallableIdentity;
use crate::aspect::value::{downcast_ref, Args, Value};

/// 连接点：一次被拦截调用的运行期上下文
///
/// 每次调用创建一个，调用结束即废弃，绝不跨调用共享。
/// 持有标识、参数快照和调用开始时刻；结果以只读参数的形式
/// 单独传给各类后置通知。
#[derive(Clone)]
pub struct JoinPoint {
    identity: Arc<CallableIdentity>,
    args: Args,
    started_at: Instant,
}

impl JoinPoint {
    /// 创建连接点
    pub fn new(identity: Arc<CallableIdentity>, args: Args) -> Self {
        Self {
            identity,
            args,
            started_at: Instant::now(),
        }
    }

    /// 目标标识
    pub fn identity(&self) -> &CallableIdentity {
        &self.identity
    }

    /// 调用参数快照
    pub fn args(&self) -> &Args {
        &self.args
    }

    /// 尝试以具体类型读取第 index 个参数
    pub fn arg<T: Any>(&self, index: usize) -> Option<&T> {
        self.args.get(index).and_then(|value| downcast_ref(value))
    }

    /// 调用开始时刻
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// 从调用开始到现在的耗时
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl fmt::Debug for JoinPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinPoint")
            .field("identity", &self.identity.path())
            .field("args", &self.args)
            .finish()
    }
}

/// 环绕通知视角的连接点
///
/// 持有一个只能取走一次的 proceed 能力：
/// - 不调用 proceed 即短路整条链，目标函数和更内层的通知都不会执行
/// - 第二次调用返回 [`AspectError::DoubleProceed`]，目标函数绝不会重复执行
pub struct ProceedingJoinPoint {
    join_point: Arc<JoinPoint>,
    args: Args,
    proceed_fn: Option<Box<dyn FnOnce(Args) -> Result<Value> + Send>>,
}

impl ProceedingJoinPoint {
    pub(crate) fn new(
        join_point: Arc<JoinPoint>,
        args: Args,
        proceed_fn: Box<dyn FnOnce(Args) -> Result<Value> + Send>,
    ) -> Self {
        Self {
            join_point,
            args,
            proceed_fn: Some(proceed_fn),
        }
    }

    /// 连接点信息
    pub fn join_point(&self) -> &JoinPoint {
        &self.join_point
    }

    /// 当前参数
    pub fn args(&self) -> &Args {
        &self.args
    }

    /// 当前参数（可修改，proceed 时生效）
    pub fn args_mut(&mut self) -> &mut Args {
        &mut self.args
    }

    /// proceed 能力是否还可用
    pub fn can_proceed(&self) -> bool {
        self.proceed_fn.is_some()
    }

    /// 以当前参数继续执行链上剩余部分
    pub fn proceed(&mut self) -> Result<Value> {
        let args = std::mem::take(&mut self.args);
        self.proceed_with(args)
    }

    /// 以改写后的参数继续执行链上剩余部分
    pub fn proceed_with(&mut self, args: Args) -> Result<Value> {
        match self.proceed_fn.take() {
            Some(proceed) => proceed(args),
            None => Err(AspectError::DoubleProceed {
                identity: self.join_point.identity().path(),
            }
            .into()),
        }
    }
}

impl fmt::Debug for ProceedingJoinPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProceedingJoinPoint")
            .field("join_point", &*self.join_point)
            .field("can_proceed", &self.can_proceed())
            .finish()
    }
}
