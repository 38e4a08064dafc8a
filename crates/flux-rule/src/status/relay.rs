use super::model::ExecResult;
use flux_core::bus::SharedModuleBus;
use flux_core::error::FluxError;
use flux_core::modules::{EDGE_CONTROLLER_MODULE_NAME, GROUP_RESOURCE, ROUTER_MODULE_NAME};
use flux_core::resource::{build_resource_for_router, RESOURCE_TYPE_RULE_STATUS};
use flux_types::message::{Message, UPDATE_OPERATION};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 结果队列默认容量
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// 结果提交失败，携带未能入队的结果
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("result queue is full")]
    Full(ExecResult),

    #[error("result queue is closed")]
    Closed(ExecResult),
}

/// 执行引擎侧的提交入口，可克隆给多个生产者
#[derive(Clone)]
pub struct ResultSubmitter {
    tx: mpsc::Sender<ExecResult>,
}

impl ResultSubmitter {
    /// 入队；队列满时等待消费者腾出空间
    pub async fn submit(&self, result: ExecResult) -> Result<(), SubmitError> {
        self.tx
            .send(result)
            .await
            .map_err(|e| SubmitError::Closed(e.0))
    }

    /// 非阻塞入队
    pub fn try_submit(&self, result: ExecResult) -> Result<(), SubmitError> {
        self.tx.try_send(result).map_err(|e| match e {
            mpsc::error::TrySendError::Full(r) => SubmitError::Full(r),
            mpsc::error::TrySendError::Closed(r) => SubmitError::Closed(r),
        })
    }

    /// 当前剩余容量
    pub fn available(&self) -> usize {
        self.tx.capacity()
    }
}

/// 结果队列的消费端，只交给一个 relay
pub struct ResultQueue {
    rx: mpsc::Receiver<ExecResult>,
}

/// 创建固定容量的结果队列
pub fn result_queue(capacity: usize) -> (ResultSubmitter, ResultQueue) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ResultSubmitter { tx }, ResultQueue { rx })
}

/// 循环模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayMode {
    /// 持续转发，直到收到停止信号或队列关闭
    #[default]
    Perpetual,
    /// 处理一个事件（结果或停止信号）后退出
    SingleShot,
}

/// 正在运行的 relay
pub struct RelayHandle {
    stop_tx: Option<watch::Sender<bool>>,
    task: JoinHandle<()>,
}

impl RelayHandle {
    /// 请求停止
    pub fn stop(&self) {
        if let Some(tx) = &self.stop_tx {
            let _ = tx.send(true);
        }
    }

    /// 关闭停止信号通道；relay 记录告警后继续运行
    pub fn close_stop_channel(&mut self) {
        self.stop_tx.take();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn join(self) {
        if let Err(e) = self.task.await {
            warn!("Status relay task failed: {}", e);
        }
    }
}

/// 构建规则状态更新消息
pub fn build_status_message(result: &ExecResult) -> Result<Message, FluxError> {
    let resource =
        build_resource_for_router(&result.project_id, RESOURCE_TYPE_RULE_STATUS, &result.rule_id)?;

    let message = Message::new()
        .build_router(ROUTER_MODULE_NAME, GROUP_RESOURCE, resource, UPDATE_OPERATION)
        .with_content(result)?;
    Ok(message)
}

/// 把规则执行结果转发给协调模块
pub struct StatusRelay {
    bus: SharedModuleBus,
    target_module: String,
    mode: RelayMode,
}

impl StatusRelay {
    pub fn new(bus: SharedModuleBus) -> Self {
        Self {
            bus,
            target_module: EDGE_CONTROLLER_MODULE_NAME.to_string(),
            mode: RelayMode::default(),
        }
    }

    pub fn with_target_module(mut self, module: impl Into<String>) -> Self {
        self.target_module = module.into();
        self
    }

    pub fn with_mode(mut self, mode: RelayMode) -> Self {
        self.mode = mode;
        self
    }

    /// 创建队列并启动 relay
    pub fn start(self, capacity: usize) -> (ResultSubmitter, RelayHandle) {
        let (submitter, queue) = result_queue(capacity);
        (submitter, self.spawn(queue))
    }

    pub fn spawn(self, queue: ResultQueue) -> RelayHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(queue.rx, stop_rx));
        RelayHandle {
            stop_tx: Some(stop_tx),
            task,
        }
    }

    async fn run(self, mut results: mpsc::Receiver<ExecResult>, mut stop: watch::Receiver<bool>) {
        info!(
            target_module = %self.target_module,
            mode = ?self.mode,
            "Starting status relay..."
        );
        let mut stop_open = true;

        loop {
            tokio::select! {
                received = results.recv() => match received {
                    Some(result) => self.relay(result),
                    None => {
                        info!("Result queue closed, status relay exiting");
                        break;
                    }
                },
                changed = stop.changed(), if stop_open => match changed {
                    Ok(()) => {
                        if *stop.borrow() {
                            info!("Status relay stop requested");
                            break;
                        }
                    }
                    Err(_) => {
                        warn!("Status relay stop channel is closed");
                        stop_open = false;
                    }
                },
            }

            if self.mode == RelayMode::SingleShot {
                warn!("Status relay running in single-shot mode, exiting after one event");
                break;
            }
        }
    }

    fn relay(&self, result: ExecResult) {
        let message = match build_status_message(&result) {
            Ok(message) => message,
            Err(e) => {
                warn!(
                    rule_id = %result.rule_id,
                    project_id = %result.project_id,
                    "build message resource failed with error: {}", e
                );
                return;
            }
        };

        let operation = message.operation().to_string();
        let resource = message.resource().to_string();
        if let Err(e) = self.bus.send(&self.target_module, message) {
            warn!(
                module = %self.target_module,
                resource = %resource,
                "send rule status message failed: {}", e
            );
            return;
        }

        debug!(operation = %operation, resource = %resource, "send message successfully");
    }
}
