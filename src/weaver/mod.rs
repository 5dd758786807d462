//! 织入引擎
//!
//! 把 [`crate::aspect`] 中的基础概念组合成可用的拦截管线：
//! - [`AspectRegistry`]: 持有有序绑定集合，解析并缓存通知计划，执行织入
//! - [`Woven`]: 织入后的可调用对象，执行 before/around/after 调用链
//! - [`RegistryCreateConfig`] 等: 声明式启用内置通知的配置层
//! - [`RegistryManager`]: 统一管理多个命名注册表实例
//!
//! # 使用示例
//!
//! ```ignore
//! use aopx::aspect::{value, CallableIdentity, PatternSelector};
//! use aopx::weaver::AspectRegistry;
//!
//! let mut registry = AspectRegistry::new();
//! registry.before(PatternSelector::new("service::*")?, 0, |jp| {
//!     println!("calling {}", jp.identity());
//!     Ok(())
//! });
//!
//! let woven = registry.wrap(
//!     CallableIdentity::new("service", "get_user"),
//!     |_args| Ok(value(String::from("John Doe"))),
//! )?;
//! let result = woven.call(vec![])?;
//! ```

pub mod config;
pub mod manager;
pub mod registry;
pub mod woven;

pub use config::{
    ErrorLoggingAdviceConfig, LoggingAdviceConfig, RegistryConfig, RegistryCreateConfig,
    TimingAdviceConfig,
};
pub use manager::{RegistryManager, RegistryManagerConfig};
pub use registry::{AdviceBinding, AdvicePlan, AspectRegistry};
pub use woven::{TargetFn, Woven};
