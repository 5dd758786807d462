use anyhow::Result;
use aopx::args;
use aopx::aspect::{value, CallableIdentity};
use aopx::weaver::{RegistryManager, RegistryManagerConfig};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // ===== 统一管理多个命名注册表实例 =====
    //
    // main: 完整的日志 + 计时
    // api:  引用 main（共享同一个实例）
    // db:   只要错误日志
    let config: RegistryManagerConfig = json5::from_str(
        r#"{
            default: {
                logging: {}
            },
            registries: {
                main: {
                    logging: {
                        pointcut: "service::**"
                    },
                    timing: {
                        pointcut: "service::**"
                    }
                },
                api: { "$instance": "main" },
                db: {
                    error_logging: {
                        pointcut: "repo::**"
                    }
                }
            }
        }"#,
    )?;
    let manager = RegistryManager::new(config)?;

    println!("registries: {:?}", {
        let mut keys = manager.keys();
        keys.sort();
        keys
    });

    // ===== 场景 1: 命名实例 =====
    println!("\n===== 场景 1: main 实例（日志 + 计时）=====");
    let registry = manager.get_or_default("main");
    let get_user = registry.wrap(CallableIdentity::new("service", "get_user"), |_args| {
        Ok(value(String::from("John Doe")))
    })?;
    get_user.call(args![])?;

    // ===== 场景 2: 引用实例与被引用实例共享绑定 =====
    println!("\n===== 场景 2: api 引用 main =====");
    let api = manager.get("api").unwrap();
    println!(
        "api 与 main 是同一实例: {}",
        std::sync::Arc::ptr_eq(&api, &manager.get("main").unwrap())
    );

    // ===== 场景 3: db 实例只记错误 =====
    println!("\n===== 场景 3: db 实例（仅错误日志）=====");
    let db = manager.get_or_default("db");
    let find = db.wrap(CallableIdentity::new("repo", "find_user"), |_args| {
        anyhow::bail!("connection refused")
    })?;
    match find.call(args![]) {
        Ok(_) => println!("unexpected success"),
        Err(err) => println!("Expected error: {}", err),
    }

    Ok(())
}
