use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// 初始化 Prometheus metrics exporter
pub fn init_metrics(addr: SocketAddr) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus exporter: {}", e))?;

    describe_metrics();

    tracing::info!("Metrics exporter started on http://{}/metrics", addr);
    Ok(())
}

/// 描述所有指标
fn describe_metrics() {
    // 准入相关指标
    describe_counter!(
        "flux_rule_admissions_total",
        "Total number of rule admission decisions"
    );

    // 状态回传相关指标
    describe_counter!(
        "flux_rule_status_submitted_total",
        "Total number of execution results submitted for relay"
    );
    describe_counter!(
        "flux_rule_status_rejected_total",
        "Execution results rejected because the queue was full or closed"
    );
    describe_counter!(
        "flux_rule_status_reconciled_total",
        "Rule status messages received by the reconciler module"
    );
    describe_gauge!("flux_rule_status_queue_capacity", "Result queue capacity");
}

/// 记录准入结果
pub fn record_admission(operation: &str, allowed: bool) {
    let verdict = if allowed { "allowed" } else { "denied" };
    counter!(
        "flux_rule_admissions_total",
        1,
        "operation" => operation.to_string(),
        "verdict" => verdict
    );
}

/// 记录结果入队
pub fn record_status_submitted() {
    counter!("flux_rule_status_submitted_total", 1);
}

/// 记录结果入队失败
pub fn record_status_rejected() {
    counter!("flux_rule_status_rejected_total", 1);
}

/// 记录协调模块收到的状态
pub fn record_status_reconciled(status: &str) {
    counter!("flux_rule_status_reconciled_total", 1, "status" => status.to_string());
}

/// 设置结果队列容量
pub fn set_queue_capacity(capacity: usize) {
    gauge!("flux_rule_status_queue_capacity", capacity as f64);
}
