//! 切面核心模型
//!
//! 定义织入所需的基础概念：
//! - [`CallableIdentity`]: 可调用对象的标识（作用域、名称、签名、标签）
//! - [`Selector`]: 判定通知是否适用于某个标识的纯谓词
//! - [`AdviceKind`] / [`AdviceBody`] 及各通知 trait: 横切行为本身
//! - [`JoinPoint`] / [`ProceedingJoinPoint`]: 一次被拦截调用的运行期上下文
//! - [`Value`] / [`Args`]: 类型擦除的参数与返回值表示
//!
//! 织入引擎（注册表、调用链执行）见 [`crate::weaver`]。

pub mod advice;
pub mod error;
pub mod identity;
pub mod join_point;
pub mod selector;
pub mod value;

pub use advice::{
    AdviceBody, AdviceKind, AfterAdvice, AfterReturningAdvice, AfterThrowingAdvice, AroundAdvice,
    BeforeAdvice,
};
pub use error::AspectError;
pub use identity::CallableIdentity;
pub use join_point::{JoinPoint, ProceedingJoinPoint};
pub use selector::{ExactSelector, PatternSelector, Selector, TagSelector};
pub use value::{downcast_ref, value, Args, AspectValue, Value};
