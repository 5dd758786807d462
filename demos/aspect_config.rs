use anyhow::Result;
use aopx::args;
use aopx::aspect::{downcast_ref, value, CallableIdentity};
use aopx::weaver::{AspectRegistry, RegistryCreateConfig};

fn main() -> Result<()> {
    // 内置通知走 tracing，由宿主应用决定订阅方式
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // ===== 声明式启用内置通知 =====
    let config: RegistryCreateConfig = json5::from_str(
        r#"{
            logging: {
                pointcut: "service::**",
                info_sample_rate: 1.0,
                warn_sample_rate: 1.0
            },
            timing: {
                pointcut: "service::**",
                slow_threshold_ms: 100
            },
            error_logging: {
                pointcut: "service::**"
            }
        }"#,
    )?;
    let registry = AspectRegistry::from_config(config)?;

    let get_user = registry.wrap(
        CallableIdentity::new("service", "get_user").with_signature("() -> String"),
        |_args| Ok(value(String::from("John Doe"))),
    )?;

    let slow_report = registry.wrap(
        CallableIdentity::new("service", "monthly_report"),
        |_args| {
            // 模拟慢调用，触发慢调用告警
            std::thread::sleep(std::time::Duration::from_millis(150));
            Ok(value(String::from("report")))
        },
    )?;

    let broken = registry.wrap(CallableIdentity::new("service", "broken"), |_args| {
        anyhow::bail!("db unreachable")
    })?;

    // ===== 场景 1: 成功调用（started / completed / 耗时）=====
    println!("===== 场景 1: 成功调用 =====");
    let result = get_user.call(args![])?;
    println!(
        "Result: {}\n",
        downcast_ref::<String>(&result).map(String::as_str).unwrap_or("")
    );

    // ===== 场景 2: 慢调用（额外的慢调用告警）=====
    println!("===== 场景 2: 慢调用 =====");
    slow_report.call(args![])?;
    println!();

    // ===== 场景 3: 失败调用（failed + error 日志，错误照常传播）=====
    println!("===== 场景 3: 失败调用 =====");
    match broken.call(args![]) {
        Ok(_) => println!("unexpected success"),
        Err(err) => println!("Expected error: {}", err),
    }

    Ok(())
}
