use crate::error::{FluxError, Result};
use flux_types::message::Message;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

/// 进程内模块总线：按模块名投递消息
#[derive(Clone, Default)]
pub struct ModuleBus {
    modules: Arc<RwLock<HashMap<String, mpsc::UnboundedSender<Message>>>>,
}

impl ModuleBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册模块，返回该模块的消息接收端
    pub fn register(&self, module: impl Into<String>) -> Result<mpsc::UnboundedReceiver<Message>> {
        let module = module.into();
        let mut modules = self
            .modules
            .write()
            .map_err(|e| FluxError::Internal(e.to_string()))?;

        if let Some(existing) = modules.get(&module) {
            if !existing.is_closed() {
                return Err(FluxError::ModuleAlreadyRegistered(module));
            }
        }

        let (tx, rx) = mpsc::unbounded_channel();
        modules.insert(module.clone(), tx);
        tracing::debug!(module = %module, "Module registered on bus");
        Ok(rx)
    }

    pub fn is_registered(&self, module: &str) -> bool {
        self.modules
            .read()
            .map(|modules| modules.get(module).map_or(false, |tx| !tx.is_closed()))
            .unwrap_or(false)
    }

    /// 向模块投递消息，不等待对方确认
    pub fn send(&self, module: &str, message: Message) -> Result<()> {
        let sender = {
            let modules = self
                .modules
                .read()
                .map_err(|e| FluxError::Internal(e.to_string()))?;
            modules
                .get(module)
                .cloned()
                .ok_or_else(|| FluxError::ModuleNotFound(module.to_string()))?
        };

        sender.send(message)?;
        Ok(())
    }
}

pub type SharedModuleBus = Arc<ModuleBus>;
