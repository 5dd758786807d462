//! AopX - 通用方法拦截（切面织入）框架
//!
//! 以声明式的方式把横切行为（日志、计时、错误处理等）附加到任意
//! 可调用对象上，而不修改目标本身：选择器按标识决定通知是否适用，
//! 注册表解析并缓存每个标识的通知计划，织入后的可调用对象按
//! before / around / after 的顺序执行整条调用链。
//!
//! ## 模块
//!
//! - **aspect**: 核心模型（标识、选择器、通知、连接点、值擦除）
//! - **weaver**: 织入引擎（注册表、调用链执行、配置层、管理器）
//! - **advices**: 内置通知（日志、计时、错误日志）
//!
//! ## 设计理念
//!
//! - 🧩 **组合而非替换**: 目标永远不被修改，只被包装；调用方显式使用织入结果
//! - 🔒 **注册期与调用期分离**: 注册需要 `&mut`，调用只需 `&`，借用规则天然保证先注册后织入
//! - ⚡ **一次解析，多次调用**: 通知计划按标识缓存，重复调用零解析开销
//! - 🛡️ **错误永不被吞没**: 目标错误原样透传，框架故障显式成错
//!
//! ## 快速开始
//!
//! ```ignore
//! use aopx::aspect::{value, CallableIdentity, PatternSelector};
//! use aopx::weaver::AspectRegistry;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut registry = AspectRegistry::new();
//!     registry.before(PatternSelector::new("service::*")?, 0, |jp| {
//!         println!("Executing method...");
//!         Ok(())
//!     });
//!
//!     let woven = registry.wrap(
//!         CallableIdentity::new("service", "get_user"),
//!         |_args| Ok(value(String::from("John Doe"))),
//!     )?;
//!
//!     let result = woven.call(aopx::args![])?;
//!     Ok(())
//! }
//! ```

pub mod advices;
pub mod aspect;
pub mod macros;
pub mod weaver;

// 重新导出主要的公共 API
pub use aspect::{
    downcast_ref, value, AdviceBody, AdviceKind, AfterAdvice, AfterReturningAdvice,
    AfterThrowingAdvice, Args, AroundAdvice, AspectError, AspectValue, BeforeAdvice,
    CallableIdentity, ExactSelector, JoinPoint, PatternSelector, ProceedingJoinPoint, Selector,
    TagSelector, Value,
};

pub use weaver::{
    AspectRegistry, ErrorLoggingAdviceConfig, LoggingAdviceConfig, RegistryConfig,
    RegistryCreateConfig, RegistryManager, RegistryManagerConfig, TimingAdviceConfig, Woven,
};

pub use advices::{ErrorLoggingAdvice, LoggingAdvice, TimingAdvice};
