use anyhow::{anyhow, Result};
use config::{Config, Environment, File, FileFormat};
use std::path::{Path, PathBuf};

use crate::RouterConfig;

/// 环境变量覆盖前缀，如 `FLUX_ROUTER__RELAY__QUEUE_CAPACITY=2048`
pub const ENV_PREFIX: &str = "FLUX_ROUTER";

/// 配置加载器
pub struct ConfigLoader {
    config_path: PathBuf,
    use_env: bool,
}

impl ConfigLoader {
    /// 创建配置加载器
    pub fn new<P: AsRef<Path>>(config_path: P) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            use_env: true,
        }
    }

    /// 不读取环境变量覆盖
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// 加载并校验配置；文件不存在时使用默认配置
    pub fn load(&self) -> Result<RouterConfig> {
        let mut builder = Config::builder();

        if self.config_path.exists() {
            builder = builder.add_source(File::new(
                self.config_path
                    .to_str()
                    .ok_or_else(|| anyhow!("Invalid config path"))?,
                FileFormat::Toml,
            ));
        }

        if self.use_env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config: RouterConfig = builder.build()?.try_deserialize()?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// 验证配置
    pub fn validate(config: &RouterConfig) -> Result<()> {
        if config.relay.queue_capacity == 0 {
            return Err(anyhow!("relay.queue_capacity must be greater than 0"));
        }

        if config.relay.target_module.trim().is_empty() {
            return Err(anyhow!("relay.target_module must not be empty"));
        }

        if config.server.host.trim().is_empty() {
            return Err(anyhow!("server.host must not be empty"));
        }

        Ok(())
    }
}
