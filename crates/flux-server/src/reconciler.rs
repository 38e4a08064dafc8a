use crate::metrics;
use flux_core::bus::ModuleBus;
use flux_core::resource::{parse_router_resource, RESOURCE_TYPE_RULE_STATUS};
use flux_rule::ExecResult;
use flux_types::message::Message;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;

/// 最近一次规则执行状态，按 (project, rule) 索引
#[derive(Clone, Default)]
pub struct RuleStatusBoard {
    statuses: Arc<RwLock<HashMap<(String, String), ExecResult>>>,
}

impl RuleStatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, project_id: &str, rule_id: &str) -> Option<ExecResult> {
        self.statuses
            .read()
            .await
            .get(&(project_id.to_string(), rule_id.to_string()))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.statuses.read().await.len()
    }

    async fn apply(&self, message: &Message) -> anyhow::Result<()> {
        let resource = parse_router_resource(message.resource())?;
        if resource.resource_type != RESOURCE_TYPE_RULE_STATUS {
            anyhow::bail!("unexpected resource type: {}", resource.resource_type);
        }

        let result: ExecResult = message.decode_content()?;
        metrics::record_status_reconciled(&result.status);

        if result.is_success() {
            tracing::info!(
                project_id = %resource.project_id,
                rule_id = %resource.resource_id,
                "Rule executed successfully"
            );
        } else {
            tracing::warn!(
                project_id = %resource.project_id,
                rule_id = %resource.resource_id,
                status = %result.status,
                detail = %result.error.detail,
                "Rule execution failed"
            );
        }

        self.statuses
            .write()
            .await
            .insert((resource.project_id, resource.resource_id), result);
        Ok(())
    }
}

/// 注册协调模块并开始消费规则状态消息
pub fn spawn_status_reconciler(
    bus: &ModuleBus,
    module: &str,
    board: RuleStatusBoard,
) -> anyhow::Result<JoinHandle<()>> {
    let rx = bus.register(module)?;
    Ok(tokio::spawn(run(rx, board)))
}

async fn run(mut rx: mpsc::UnboundedReceiver<Message>, board: RuleStatusBoard) {
    tracing::info!("Starting rule status reconciler...");

    while let Some(message) = rx.recv().await {
        tracing::debug!(
            resource = %message.resource(),
            operation = %message.operation(),
            "Reconciler received message"
        );
        if let Err(e) = board.apply(&message).await {
            tracing::warn!(resource = %message.resource(), "Dropping rule status message: {}", e);
        }
    }

    tracing::info!("Rule status reconciler stopped");
}
