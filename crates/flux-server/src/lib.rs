pub mod api;
pub mod metrics;
pub mod reconciler;

use flux_config::RouterConfig;
use flux_core::bus::SharedModuleBus;
use flux_rule::{
    AdmissionGate, InMemoryEndpointStore, RelayHandle, RelayMode, ResultSubmitter, RuleValidator,
    StatusRelay,
};
use reconciler::{spawn_status_reconciler, RuleStatusBoard};
use std::sync::Arc;
use tokio::task::JoinHandle;

// 定义 AppState（供 main.rs 和测试使用）
pub struct AppState {
    pub gate: AdmissionGate,
    pub store: InMemoryEndpointStore,
    pub results: ResultSubmitter,
    pub statuses: RuleStatusBoard,
}

/// 后台任务句柄
pub struct Workers {
    pub relay: RelayHandle,
    pub reconciler: JoinHandle<()>,
}

/// 按配置组装共享状态，并启动状态回传与协调模块
pub fn build_app(
    config: &RouterConfig,
    bus: SharedModuleBus,
) -> anyhow::Result<(Arc<AppState>, Workers)> {
    let store = InMemoryEndpointStore::new();
    let gate = AdmissionGate::new(RuleValidator::new(Arc::new(store.clone())));

    let statuses = RuleStatusBoard::new();
    let reconciler =
        spawn_status_reconciler(&bus, &config.relay.target_module, statuses.clone())?;

    let mode = if config.relay.single_shot {
        tracing::warn!("Status relay configured in single-shot mode");
        RelayMode::SingleShot
    } else {
        RelayMode::Perpetual
    };
    let (results, relay) = StatusRelay::new(bus)
        .with_target_module(config.relay.target_module.clone())
        .with_mode(mode)
        .start(config.relay.queue_capacity);
    crate::metrics::set_queue_capacity(config.relay.queue_capacity);

    let state = Arc::new(AppState {
        gate,
        store,
        results,
        statuses,
    });

    Ok((state, Workers { relay, reconciler }))
}
