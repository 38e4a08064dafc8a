//! 测试用的规则、端点与存储

use crate::error::StoreError;
use crate::store::{EndpointStore, InMemoryEndpointStore};
use async_trait::async_trait;
use flux_types::rule::{Rule, RuleEndpoint, RuleEndpointType, RuleSpec};
use std::collections::HashMap;

pub const NAMESPACE: &str = "default";
pub const REST_ENDPOINT: &str = "rest-test";
pub const EVENTBUS_ENDPOINT: &str = "eventbus-test";

fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// 已创建 rest 与 eventbus 端点的存储
pub async fn seeded_store() -> InMemoryEndpointStore {
    let store = InMemoryEndpointStore::new();
    store
        .put_endpoint(RuleEndpoint::new(NAMESPACE, REST_ENDPOINT, RuleEndpointType::Rest))
        .await;
    store
        .put_endpoint(RuleEndpoint::new(
            NAMESPACE,
            EVENTBUS_ENDPOINT,
            RuleEndpointType::Eventbus,
        ))
        .await;
    store
}

/// rest 源 -> eventbus 目标
pub fn rest_to_eventbus_rule(name: &str, path: &str) -> Rule {
    Rule::new(
        NAMESPACE,
        name,
        RuleSpec {
            source: REST_ENDPOINT.to_string(),
            source_resource: map(&[("path", path)]),
            target: EVENTBUS_ENDPOINT.to_string(),
            target_resource: map(&[("topic", "topic-test")]),
        },
    )
}

/// eventbus 源 -> rest 目标
pub fn eventbus_rule(name: &str, topic: &str, node_name: &str) -> Rule {
    Rule::new(
        NAMESPACE,
        name,
        RuleSpec {
            source: EVENTBUS_ENDPOINT.to_string(),
            source_resource: map(&[("topic", topic), ("node_name", node_name)]),
            target: REST_ENDPOINT.to_string(),
            target_resource: map(&[("resource", "http://127.0.0.1:8080/ccc")]),
        },
    )
}

/// 按需返回错误的存储
pub struct FailingStore {
    inner: InMemoryEndpointStore,
    fail_endpoints: bool,
}

impl FailingStore {
    /// 端点查询失败
    pub fn endpoints() -> Self {
        Self {
            inner: InMemoryEndpointStore::new(),
            fail_endpoints: true,
        }
    }

    /// 端点查询正常，规则列表失败
    pub async fn listing() -> Self {
        Self {
            inner: seeded_store().await,
            fail_endpoints: false,
        }
    }
}

#[async_trait]
impl EndpointStore for FailingStore {
    async fn get_rule_endpoint(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<RuleEndpoint>, StoreError> {
        if self.fail_endpoints {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.inner.get_rule_endpoint(namespace, name).await
    }

    async fn list_rules(&self, _namespace: &str) -> Result<Vec<Rule>, StoreError> {
        Err(StoreError::Backend("list rules timed out".to_string()))
    }
}
