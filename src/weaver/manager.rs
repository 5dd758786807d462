use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::Result;
use serde::Deserialize;
use smart_default::SmartDefault;

use crate::weaver::config::RegistryConfig;
use crate::weaver::registry::AspectRegistry;

/// Registry Manager 配置
///
/// 用于统一管理多个注册表实例
#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct RegistryManagerConfig {
    /// 默认注册表配置（如果未配置则使用默认值）
    pub default: RegistryConfig,

    /// 命名注册表配置映射
    pub registries: HashMap<String, RegistryConfig>,
}

/// 注册表管理器
///
/// 统一维护一组命名的注册表实例和一个默认实例。
/// 管理器本身是应用显式创建并传递的对象，不存在任何全局单例：
/// 谁执行织入，谁持有管理器。
pub struct RegistryManager {
    registries: Arc<RwLock<HashMap<String, Arc<AspectRegistry>>>>,
    default: Arc<RwLock<Arc<AspectRegistry>>>,
}

impl RegistryManager {
    /// 从配置创建 RegistryManager
    pub fn new(config: RegistryManagerConfig) -> Result<Self> {
        let mut registries_map = HashMap::new();

        // 第一步：创建所有 Create 模式的注册表
        let mut reference_configs: Vec<(String, String)> = Vec::new();

        for (key, registry_config) in &config.registries {
            match registry_config {
                RegistryConfig::Reference { instance } => {
                    // 记录引用关系，稍后处理
                    reference_configs.push((key.clone(), instance.clone()));
                }
                RegistryConfig::Create(create_config) => {
                    let registry = Arc::new(AspectRegistry::from_config(create_config.clone())?);
                    registries_map.insert(key.clone(), registry);
                }
            }
        }

        // 第二步：处理所有 Reference 模式的配置
        for (key, instance) in reference_configs {
            let registry = Self::resolve_by_name(&instance, &registries_map)?;
            registries_map.insert(key, registry);
        }

        // 创建默认注册表（始终存在）
        let default_registry = match &config.default {
            RegistryConfig::Reference { instance } => {
                Self::resolve_by_name(instance, &registries_map)?
            }
            RegistryConfig::Create(create_config) => {
                Arc::new(AspectRegistry::from_config(create_config.clone())?)
            }
        };

        Ok(Self {
            registries: Arc::new(RwLock::new(registries_map)),
            default: Arc::new(RwLock::new(default_registry)),
        })
    }

    /// 根据名称解析注册表实例（仅在当前配置内解析，没有全局兜底）
    fn resolve_by_name(
        instance: &str,
        created: &HashMap<String, Arc<AspectRegistry>>,
    ) -> Result<Arc<AspectRegistry>> {
        created.get(instance).map(Arc::clone).ok_or_else(|| {
            anyhow::anyhow!("Registry instance '{}' not found in manager config", instance)
        })
    }

    /// 获取指定 key 的注册表
    ///
    /// 如果 key 不存在，返回 None
    pub fn get(&self, key: &str) -> Option<Arc<AspectRegistry>> {
        let registries = self.registries.read().unwrap();
        registries.get(key).cloned()
    }

    /// 获取指定 key 的注册表，如果不存在则返回默认注册表
    pub fn get_or_default(&self, key: &str) -> Arc<AspectRegistry> {
        self.get(key).unwrap_or_else(|| self.get_default())
    }

    /// 获取默认注册表
    pub fn get_default(&self) -> Arc<AspectRegistry> {
        let default = self.default.read().unwrap();
        Arc::clone(&default)
    }

    /// 设置默认注册表
    pub fn set_default(&self, registry: Arc<AspectRegistry>) {
        let mut default = self.default.write().unwrap();
        *default = registry;
    }

    /// 动态添加注册表
    pub fn add(&self, key: String, registry: AspectRegistry) {
        let mut registries = self.registries.write().unwrap();
        registries.insert(key, Arc::new(registry));
    }

    /// 检查指定 key 的注册表是否存在
    pub fn contains(&self, key: &str) -> bool {
        let registries = self.registries.read().unwrap();
        registries.contains_key(key)
    }

    /// 获取所有注册表的 key 列表
    pub fn keys(&self) -> Vec<String> {
        let registries = self.registries.read().unwrap();
        registries.keys().cloned().collect()
    }

    /// 移除指定 key 的注册表
    pub fn remove(&self, key: &str) -> Option<Arc<AspectRegistry>> {
        let mut registries = self.registries.write().unwrap();
        registries.remove(key)
    }
}
