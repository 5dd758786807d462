use garde::Validate;
use serde::Deserialize;
use smart_default::SmartDefault;

use crate::aspect::selector::PatternSelector;

/// 校验切点表达式可以编译
fn validate_pointcut(value: &str, _context: &()) -> garde::Result {
    PatternSelector::new(value)
        .map(|_| ())
        .map_err(|err| garde::Error::new(err.to_string()))
}

/// Logging 通知配置
///
/// 在匹配的调用前后记录开始 / 完成 / 失败日志（含参数、结果与耗时），
/// 成功与失败日志各自独立采样。
#[derive(Debug, Clone, Deserialize, SmartDefault, Validate)]
#[serde(default)]
pub struct LoggingAdviceConfig {
    /// 切点表达式，默认匹配所有调用
    #[default = "**"]
    #[garde(custom(validate_pointcut))]
    pub pointcut: String,

    /// 排序优先级，数值小的先执行
    #[garde(skip)]
    pub priority: i32,

    /// 成功日志的采样率（0.0 - 1.0），默认 1.0（总是记录）
    #[default = 1.0]
    #[garde(range(min = 0.0, max = 1.0))]
    pub info_sample_rate: f32,

    /// 失败日志的采样率（0.0 - 1.0），默认 1.0（总是记录）
    #[default = 1.0]
    #[garde(range(min = 0.0, max = 1.0))]
    pub warn_sample_rate: f32,
}

/// Timing 通知配置
///
/// 环绕匹配的调用测量耗时，成功失败都会上报；
/// 配置了慢调用阈值时，超过阈值额外告警。
#[derive(Debug, Clone, Deserialize, SmartDefault, Validate)]
#[serde(default)]
pub struct TimingAdviceConfig {
    /// 切点表达式，默认匹配所有调用
    #[default = "**"]
    #[garde(custom(validate_pointcut))]
    pub pointcut: String,

    /// 排序优先级，数值小的先执行（环绕通知中即更外层）
    #[garde(skip)]
    pub priority: i32,

    /// 慢调用阈值（毫秒），缺省不告警
    #[garde(skip)]
    pub slow_threshold_ms: Option<u64>,
}

/// ErrorLogging 通知配置
///
/// 在匹配的调用失败时记录 error 级日志。
#[derive(Debug, Clone, Deserialize, SmartDefault, Validate)]
#[serde(default)]
pub struct ErrorLoggingAdviceConfig {
    /// 切点表达式，默认匹配所有调用
    #[default = "**"]
    #[garde(custom(validate_pointcut))]
    pub pointcut: String,

    /// 排序优先级，数值小的先执行
    #[garde(skip)]
    pub priority: i32,
}

/// 注册表创建配置
///
/// 各小节声明式启用对应的内置通知，缺省即不启用。
#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct RegistryCreateConfig {
    /// Logging 通知配置
    pub logging: Option<LoggingAdviceConfig>,

    /// Timing 通知配置
    pub timing: Option<TimingAdviceConfig>,

    /// ErrorLogging 通知配置
    pub error_logging: Option<ErrorLoggingAdviceConfig>,
}

/// 注册表配置
///
/// 支持两种模式：
/// - Reference: 引用已存在的注册表实例（通过 $instance 字段）
/// - Create: 创建新的注册表实例
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RegistryConfig {
    /// 引用一个已存在的注册表实例
    Reference {
        /// 引用的注册表实例名称
        #[serde(rename = "$instance")]
        instance: String,
    },

    /// 创建新的注册表实例
    Create(RegistryCreateConfig),
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig::Create(RegistryCreateConfig::default())
    }
}
