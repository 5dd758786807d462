use std::collections::BTreeSet;
use std::fmt;

use crate::aspect::error::AspectError;

/// 可调用对象的标识
///
/// 在注册时创建一次，之后不可变。由作用域（命名空间路径）、名称、
/// 签名串和一组显式标签组成。选择器只依赖标识做匹配，绝不依赖
/// 运行期的参数值，保证匹配结果在调用前就可判定。
///
/// 标签是注册方显式附加的元数据，对应注解式匹配的场景，
/// 不涉及任何运行期反射。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallableIdentity {
    /// 作用域，如 "service" 或 "service::user"，允许为空
    scope: String,

    /// 可调用对象名称
    name: String,

    /// 参数签名串，如 "(&str) -> String"，仅作展示与精确匹配用
    signature: String,

    /// 显式标签集合
    tags: BTreeSet<String>,
}

impl CallableIdentity {
    /// 创建标识
    pub fn new(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            name: name.into(),
            signature: String::new(),
            tags: BTreeSet::new(),
        }
    }

    /// 从 "scope::name" 形式的路径解析标识
    ///
    /// 最后一个 `::` 之后的部分作为名称，之前的部分作为作用域；
    /// 没有 `::` 时整体作为名称，作用域为空。
    pub fn parse(path: &str) -> Result<Self, AspectError> {
        let invalid = || AspectError::InvalidIdentity {
            path: path.to_string(),
        };

        if path.is_empty() {
            return Err(invalid());
        }

        match path.rfind("::") {
            Some(index) => {
                let scope = &path[..index];
                let name = &path[index + 2..];
                if scope.is_empty() || name.is_empty() {
                    return Err(invalid());
                }
                Ok(Self::new(scope, name))
            }
            None => Ok(Self::new("", path)),
        }
    }

    /// 设置签名串
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    /// 附加一个标签
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// 附加一组标签
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// 作用域
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// 名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 签名串
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// 标签集合
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// 是否携带指定标签
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// 完整路径："scope::name"，作用域为空时只有名称
    pub fn path(&self) -> String {
        if self.scope.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.scope, self.name)
        }
    }
}

impl fmt::Display for CallableIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
