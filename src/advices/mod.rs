//! 内置通知
//!
//! 基于核心模型实现的常用横切行为，配合
//! [`crate::weaver::RegistryCreateConfig`] 可以声明式启用：
//! - [`LoggingAdvice`]: 调用开始 / 完成 / 失败日志，支持采样
//! - [`TimingAdvice`]: 耗时测量，成功失败都上报，支持慢调用告警
//! - [`ErrorLoggingAdvice`]: 失败时的 error 级日志
//!
//! 日志统一走 `tracing`，由宿主应用决定订阅方式。

pub mod error_logging;
pub mod logging;
pub mod timing;

pub use error_logging::ErrorLoggingAdvice;
pub use logging::LoggingAdvice;
pub use timing::TimingAdvice;
