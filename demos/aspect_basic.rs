use anyhow::Result;
use aopx::args;
use aopx::aspect::{
    downcast_ref, value, CallableIdentity, JoinPoint, PatternSelector, ProceedingJoinPoint,
};
use aopx::weaver::AspectRegistry;

// 模拟一个简单的用户服务
struct UserService {
    get_user: aopx::weaver::Woven,
    find_order: aopx::weaver::Woven,
}

impl UserService {
    // 对 service 作用域统一织入切面
    fn new(registry: &AspectRegistry) -> Result<Self> {
        let get_user = registry.wrap(
            CallableIdentity::new("service", "get_user").with_signature("() -> String"),
            |_args| Ok(value(String::from("John Doe"))),
        )?;

        let find_order = registry.wrap(
            CallableIdentity::new("service", "find_order").with_signature("(i64) -> String"),
            |args| {
                let order_id = downcast_ref::<i64>(&args[0]).copied().unwrap_or(0);
                if order_id <= 0 {
                    anyhow::bail!("order {} not found", order_id);
                }
                Ok(value(format!("order-{}", order_id)))
            },
        )?;

        Ok(Self {
            get_user,
            find_order,
        })
    }
}

fn main() -> Result<()> {
    let mut registry = AspectRegistry::new();

    // ===== 前置通知：任何 service 方法执行前打一行日志 =====
    registry.before(
        PatternSelector::new("service::*")?,
        0,
        |jp: &JoinPoint| {
            println!("Executing method... ({})", jp.identity());
            Ok(())
        },
    );

    // ===== 环绕通知：测量任何 service 方法的执行耗时 =====
    registry.around(
        PatternSelector::new("service::*")?,
        0,
        |mut pjp: ProceedingJoinPoint| {
            let started = std::time::Instant::now();
            let outcome = pjp.proceed();
            println!("Execution time: {} ms", started.elapsed().as_millis());
            outcome
        },
    );

    // ===== 异常通知：失败时观察错误（错误照常向上传播）=====
    registry.after_throwing(
        PatternSelector::new("service::*")?,
        0,
        |jp: &JoinPoint, error: &anyhow::Error| {
            println!("{} failed: {}", jp.identity(), error);
            Ok(())
        },
    );

    let service = UserService::new(&registry)?;

    // ===== 场景 1: 成功调用 =====
    println!("===== 场景 1: 成功调用 =====");
    let result = service.get_user.call(args![])?;
    println!(
        "Result: {}\n",
        downcast_ref::<String>(&result).map(String::as_str).unwrap_or("")
    );

    // ===== 场景 2: 失败调用（异常通知 + 计时仍然生效）=====
    println!("===== 场景 2: 失败调用 =====");
    match service.find_order.call(args![-1i64]) {
        Ok(_) => println!("unexpected success\n"),
        Err(err) => println!("Expected error: {}\n", err),
    }

    Ok(())
}
