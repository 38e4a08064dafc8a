use flux_logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// 路由服务全局配置
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RouterConfig {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 系统配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SystemConfig {
    pub name: String,
    pub version: String,
}

/// 准入服务监听地址
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Prometheus 指标监听端口，不设置则不导出
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_port: Option<u16>,
}

/// 状态回传配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RelayConfig {
    /// 结果队列容量，满时执行引擎阻塞
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// 接收规则状态的模块
    #[serde(default = "default_target_module")]
    pub target_module: String,

    /// 只处理一个事件后退出
    #[serde(default)]
    pub single_shot: bool,
}

// 默认值函数
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9443
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_target_module() -> String {
    "edgecontroller".to_string()
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            name: "FLUX IOT Rule Router".to_string(),
            version: "1.0.0".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            metrics_port: None,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            target_module: default_target_module(),
            single_shot: false,
        }
    }
}

impl RouterConfig {
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
