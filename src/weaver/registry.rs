use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dashmap::DashMap;

use crate::advices::{ErrorLoggingAdvice, LoggingAdvice, TimingAdvice};
use crate::aspect::advice::{
    AdviceBody, AdviceKind, AfterAdvice, AfterReturningAdvice, AfterThrowingAdvice, AroundAdvice,
    BeforeAdvice,
};
use crate::aspect::error::AspectError;
use crate::aspect::identity::CallableIdentity;
use crate::aspect::join_point::{JoinPoint, ProceedingJoinPoint};
use crate::aspect::selector::{PatternSelector, Selector};
use crate::aspect::value::{Args, Value};
use crate::weaver::config::RegistryCreateConfig;
use crate::weaver::woven::Woven;

/// 一条通知绑定
///
/// 注册时创建，之后不可变，由注册表独占持有。
/// `seq` 记录注册顺序，同优先级时作为稳定的次序兜底。
pub struct AdviceBinding {
    selector: Arc<dyn Selector>,
    priority: i32,
    body: AdviceBody,
    seq: usize,
}

impl AdviceBinding {
    /// 通知类型
    pub fn kind(&self) -> AdviceKind {
        self.body.kind()
    }

    /// 排序优先级，数值小的先执行（环绕通知中即更外层）
    pub fn priority(&self) -> i32 {
        self.priority
    }
}

/// 解析后的通知计划：按类型分区、按 (priority, seq) 排好序的调用链
///
/// 同一标识的匹配结果在注册完成后不会变化，因此计划按标识缓存，
/// 同一可调用对象的多次调用共享同一份计划。
#[derive(Default)]
pub struct AdvicePlan {
    pub(crate) before: Vec<Arc<dyn BeforeAdvice>>,
    pub(crate) around: Vec<Arc<dyn AroundAdvice>>,
    pub(crate) after_returning: Vec<Arc<dyn AfterReturningAdvice>>,
    pub(crate) after_throwing: Vec<Arc<dyn AfterThrowingAdvice>>,
    pub(crate) after: Vec<Arc<dyn AfterAdvice>>,
}

impl std::fmt::Debug for AdvicePlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvicePlan")
            .field("before", &self.before.len())
            .field("around", &self.around.len())
            .field("after_returning", &self.after_returning.len())
            .field("after_throwing", &self.after_throwing.len())
            .field("after", &self.after.len())
            .finish()
    }
}

impl AdvicePlan {
    /// 指定类型的通知数量
    pub fn count(&self, kind: AdviceKind) -> usize {
        match kind {
            AdviceKind::Before => self.before.len(),
            AdviceKind::Around => self.around.len(),
            AdviceKind::AfterReturning => self.after_returning.len(),
            AdviceKind::AfterThrowing => self.after_throwing.len(),
            AdviceKind::After => self.after.len(),
        }
    }

    /// 全部通知数量
    pub fn advice_count(&self) -> usize {
        self.before.len()
            + self.around.len()
            + self.after_returning.len()
            + self.after_throwing.len()
            + self.after.len()
    }

    /// 是否没有任何通知匹配
    pub fn is_empty(&self) -> bool {
        self.advice_count() == 0
    }
}

/// 切面注册表 / 织入器
///
/// 持有有序的 (选择器, 通知) 绑定集合，负责按标识解析通知计划，
/// 并把目标可调用对象包装成带切面的 [`Woven`]。
///
/// 注册需要 `&mut self`，解析与包装只需要 `&self`：注册表一旦放进
/// `Arc` 共享，注册期与调用期就被所有权规则天然分隔开（先注册完、
/// 再包装调用）。已经织入的 [`Woven`] 持有解析时的计划快照，
/// 之后的注册不影响它们。
pub struct AspectRegistry {
    bindings: Vec<AdviceBinding>,
    plans: DashMap<CallableIdentity, Arc<AdvicePlan>>,
}

impl AspectRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            plans: DashMap::new(),
        }
    }

    /// 从配置创建注册表，声明式注册内置通知
    ///
    /// 各小节缺省即不注册对应通知；配置先经 garde 验证，
    /// 切点表达式在此处编译失败会立即报错。
    pub fn from_config(config: RegistryCreateConfig) -> Result<Self> {
        let mut registry = AspectRegistry::new();

        if let Some(cfg) = config.logging {
            garde::Validate::validate(&cfg)?;
            let selector: Arc<dyn Selector> = Arc::new(PatternSelector::new(&cfg.pointcut)?);
            let advice = Arc::new(LoggingAdvice::new(
                cfg.info_sample_rate,
                cfg.warn_sample_rate,
            ));
            registry.register(
                Arc::clone(&selector),
                cfg.priority,
                AdviceBody::Before(advice.clone()),
            );
            registry.register(
                Arc::clone(&selector),
                cfg.priority,
                AdviceBody::AfterReturning(advice.clone()),
            );
            registry.register(selector, cfg.priority, AdviceBody::AfterThrowing(advice));
        }

        if let Some(cfg) = config.timing {
            garde::Validate::validate(&cfg)?;
            let selector: Arc<dyn Selector> = Arc::new(PatternSelector::new(&cfg.pointcut)?);
            let advice = Arc::new(TimingAdvice::new(
                cfg.slow_threshold_ms.map(Duration::from_millis),
            ));
            registry.register(selector, cfg.priority, AdviceBody::Around(advice));
        }

        if let Some(cfg) = config.error_logging {
            garde::Validate::validate(&cfg)?;
            let selector: Arc<dyn Selector> = Arc::new(PatternSelector::new(&cfg.pointcut)?);
            registry.register(
                selector,
                cfg.priority,
                AdviceBody::AfterThrowing(Arc::new(ErrorLoggingAdvice::new())),
            );
        }

        Ok(registry)
    }

    /// 注册一条绑定
    ///
    /// 不会失败；允许重复注册，重复的绑定都会生效。
    /// 绑定集变化后，已缓存的通知计划全部失效。
    pub fn register(&mut self, selector: Arc<dyn Selector>, priority: i32, body: AdviceBody) {
        let seq = self.bindings.len();
        self.bindings.push(AdviceBinding {
            selector,
            priority,
            body,
            seq,
        });
        self.plans.clear();
    }

    /// 注册前置通知（闭包便捷形式）
    pub fn before<S, F>(&mut self, selector: S, priority: i32, advice: F)
    where
        S: Selector + 'static,
        F: Fn(&JoinPoint) -> Result<()> + Send + Sync + 'static,
    {
        self.register(Arc::new(selector), priority, AdviceBody::Before(Arc::new(advice)));
    }

    /// 注册环绕通知（闭包便捷形式）
    pub fn around<S, F>(&mut self, selector: S, priority: i32, advice: F)
    where
        S: Selector + 'static,
        F: Fn(ProceedingJoinPoint) -> Result<Value> + Send + Sync + 'static,
    {
        self.register(Arc::new(selector), priority, AdviceBody::Around(Arc::new(advice)));
    }

    /// 注册返回后通知（闭包便捷形式）
    pub fn after_returning<S, F>(&mut self, selector: S, priority: i32, advice: F)
    where
        S: Selector + 'static,
        F: Fn(&JoinPoint, &Value) -> Result<()> + Send + Sync + 'static,
    {
        self.register(
            Arc::new(selector),
            priority,
            AdviceBody::AfterReturning(Arc::new(advice)),
        );
    }

    /// 注册异常通知（闭包便捷形式）
    pub fn after_throwing<S, F>(&mut self, selector: S, priority: i32, advice: F)
    where
        S: Selector + 'static,
        F: Fn(&JoinPoint, &anyhow::Error) -> Result<()> + Send + Sync + 'static,
    {
        self.register(
            Arc::new(selector),
            priority,
            AdviceBody::AfterThrowing(Arc::new(advice)),
        );
    }

    /// 注册后置通知（闭包便捷形式）
    pub fn after<S, F>(&mut self, selector: S, priority: i32, advice: F)
    where
        S: Selector + 'static,
        F: Fn(&JoinPoint) -> Result<()> + Send + Sync + 'static,
    {
        self.register(Arc::new(selector), priority, AdviceBody::After(Arc::new(advice)));
    }

    /// 已注册的绑定数量
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// 是否没有任何绑定
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// 解析指定标识的通知计划
    ///
    /// 逐条求值选择器（失败立即中止并上报，绝不静默跳过），
    /// 匹配结果按 (priority, 注册顺序) 排序后按类型分区。
    /// 结果按标识缓存，重复解析共享同一份计划。
    pub fn resolve(&self, identity: &CallableIdentity) -> Result<Arc<AdvicePlan>, AspectError> {
        if let Some(plan) = self.plans.get(identity) {
            return Ok(Arc::clone(&*plan));
        }

        let mut matched: Vec<&AdviceBinding> = Vec::new();
        for binding in &self.bindings {
            let is_match =
                binding
                    .selector
                    .matches(identity)
                    .map_err(|source| AspectError::SelectorEvaluation {
                        identity: identity.path(),
                        source,
                    })?;
            if is_match {
                matched.push(binding);
            }
        }
        matched.sort_by_key(|binding| (binding.priority, binding.seq));

        let mut plan = AdvicePlan::default();
        for binding in matched {
            match &binding.body {
                AdviceBody::Before(advice) => plan.before.push(Arc::clone(advice)),
                AdviceBody::Around(advice) => plan.around.push(Arc::clone(advice)),
                AdviceBody::AfterReturning(advice) => {
                    plan.after_returning.push(Arc::clone(advice))
                }
                AdviceBody::AfterThrowing(advice) => plan.after_throwing.push(Arc::clone(advice)),
                AdviceBody::After(advice) => plan.after.push(Arc::clone(advice)),
            }
        }

        let plan = Arc::new(plan);
        self.plans.insert(identity.clone(), Arc::clone(&plan));
        Ok(plan)
    }

    /// 把目标可调用对象包装成带切面的 [`Woven`]
    ///
    /// 原可调用对象不会被修改，只是被组合进新的调用链；
    /// 返回的 [`Woven`] 与目标具有相同的擦除签名。
    pub fn wrap<F>(&self, identity: CallableIdentity, target: F) -> Result<Woven, AspectError>
    where
        F: Fn(Args) -> Result<Value> + Send + Sync + 'static,
    {
        let plan = self.resolve(&identity)?;
        Ok(Woven::new(Arc::new(identity), plan, Arc::new(target)))
    }
}

impl Default for AspectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
