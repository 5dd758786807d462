use anyhow::Result;
use glob::{MatchOptions, Pattern};

use crate::aspect::error::AspectError;
use crate::aspect::identity::CallableIdentity;

/// 选择器：判定某条通知是否适用于指定的可调用对象
///
/// 匹配必须是标识的纯函数：无副作用、必定终止、不依赖参数值。
/// 返回 `Result` 是为了让自定义实现能够上报求值失败，
/// 注册表解析时会将失败立即转化为
/// [`AspectError::SelectorEvaluation`]，绝不静默跳过绑定。
pub trait Selector: Send + Sync {
    fn matches(&self, identity: &CallableIdentity) -> Result<bool>;
}

/// 精确匹配选择器
///
/// 按作用域 + 名称做全等匹配，可选地再比较签名串。
#[derive(Debug, Clone)]
pub struct ExactSelector {
    scope: String,
    name: String,
    signature: Option<String>,
}

impl ExactSelector {
    pub fn new(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            name: name.into(),
            signature: None,
        }
    }

    /// 附加签名比较
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }
}

impl Selector for ExactSelector {
    fn matches(&self, identity: &CallableIdentity) -> Result<bool> {
        let mut matched = identity.scope() == self.scope && identity.name() == self.name;
        if let Some(ref signature) = self.signature {
            matched = matched && identity.signature() == signature;
        }
        Ok(matched)
    }
}

/// 通配符选择器
///
/// 模式作用在 "scope::name" 路径上，以 `::` 分段：
/// - `*` 匹配单个路径段（也可在段内做前缀/后缀匹配，如 `get*`）
/// - `**` 匹配任意深度的路径段
/// - 空模式等价于 `**`，匹配所有可调用对象
///
/// 模式在构造时编译，非法模式立即报
/// [`AspectError::InvalidPattern`]，匹配阶段不再失败。
#[derive(Debug, Clone)]
pub struct PatternSelector {
    raw: String,
    pattern: Pattern,
}

/// `*` 不跨段，`**` 跨段
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

impl PatternSelector {
    pub fn new(pattern: &str) -> Result<Self, AspectError> {
        let raw = if pattern.is_empty() { "**" } else { pattern };
        let normalized = raw.replace("::", "/");
        let compiled = Pattern::new(&normalized).map_err(|source| AspectError::InvalidPattern {
            pattern: raw.to_string(),
            source,
        })?;

        Ok(Self {
            raw: raw.to_string(),
            pattern: compiled,
        })
    }

    /// 原始模式串
    pub fn pattern(&self) -> &str {
        &self.raw
    }
}

impl Selector for PatternSelector {
    fn matches(&self, identity: &CallableIdentity) -> Result<bool> {
        let path = identity.path().replace("::", "/");
        Ok(self.pattern.matches_with(&path, MATCH_OPTIONS))
    }
}

/// 标签选择器
///
/// 匹配注册时显式附加了指定标签的可调用对象，
/// 对应注解式切点的场景。
#[derive(Debug, Clone)]
pub struct TagSelector {
    tag: String,
}

impl TagSelector {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl Selector for TagSelector {
    fn matches(&self, identity: &CallableIdentity) -> Result<bool> {
        Ok(identity.has_tag(&self.tag))
    }
}
