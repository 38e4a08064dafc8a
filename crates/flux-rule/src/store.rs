use crate::error::StoreError;
use async_trait::async_trait;
use flux_types::rule::{Rule, RuleEndpoint};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// 规则与端点的只读视图，由外部存储层实现
#[async_trait]
pub trait EndpointStore: Send + Sync {
    /// 未找到时返回 `Ok(None)`
    async fn get_rule_endpoint(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<RuleEndpoint>, StoreError>;

    /// 列出命名空间下的所有规则
    async fn list_rules(&self, namespace: &str) -> Result<Vec<Rule>, StoreError>;
}

type ObjectKey = (String, String);

/// 规则存储（内存实现）
#[derive(Clone, Default)]
pub struct InMemoryEndpointStore {
    endpoints: Arc<RwLock<HashMap<ObjectKey, RuleEndpoint>>>,
    rules: Arc<RwLock<HashMap<ObjectKey, Rule>>>,
}

impl InMemoryEndpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_endpoint(&self, endpoint: RuleEndpoint) {
        let key = (
            endpoint.metadata.namespace.clone(),
            endpoint.metadata.name.clone(),
        );
        self.endpoints.write().await.insert(key, endpoint);
    }

    pub async fn remove_endpoint(&self, namespace: &str, name: &str) -> Option<RuleEndpoint> {
        self.endpoints
            .write()
            .await
            .remove(&(namespace.to_string(), name.to_string()))
    }

    pub async fn put_rule(&self, rule: Rule) {
        let key = (rule.metadata.namespace.clone(), rule.metadata.name.clone());
        self.rules.write().await.insert(key, rule);
    }

    pub async fn remove_rule(&self, namespace: &str, name: &str) -> Option<Rule> {
        self.rules
            .write()
            .await
            .remove(&(namespace.to_string(), name.to_string()))
    }
}

#[async_trait]
impl EndpointStore for InMemoryEndpointStore {
    async fn get_rule_endpoint(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<RuleEndpoint>, StoreError> {
        let endpoints = self.endpoints.read().await;
        Ok(endpoints
            .get(&(namespace.to_string(), name.to_string()))
            .cloned())
    }

    async fn list_rules(&self, namespace: &str) -> Result<Vec<Rule>, StoreError> {
        let rules = self.rules.read().await;
        Ok(rules
            .iter()
            .filter(|((ns, _), _)| ns == namespace)
            .map(|(_, rule)| rule.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flux_types::rule::{RuleEndpointType, RuleSpec};

    #[tokio::test]
    async fn test_get_endpoint() {
        let store = InMemoryEndpointStore::new();
        store
            .put_endpoint(RuleEndpoint::new("default", "rest-test", RuleEndpointType::Rest))
            .await;

        let found = store.get_rule_endpoint("default", "rest-test").await.unwrap();
        assert_eq!(found.unwrap().endpoint_type(), &RuleEndpointType::Rest);

        let missing = store.get_rule_endpoint("other", "rest-test").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_remove_endpoint() {
        let store = InMemoryEndpointStore::new();
        store
            .put_endpoint(RuleEndpoint::new("default", "rest-test", RuleEndpointType::Rest))
            .await;

        assert!(store.remove_endpoint("default", "rest-test").await.is_some());
        assert!(store.remove_endpoint("default", "rest-test").await.is_none());
        assert!(store
            .get_rule_endpoint("default", "rest-test")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_rules_by_namespace() {
        let store = InMemoryEndpointStore::new();
        store.put_rule(Rule::new("default", "a", RuleSpec::default())).await;
        store.put_rule(Rule::new("default", "b", RuleSpec::default())).await;
        store.put_rule(Rule::new("edge", "c", RuleSpec::default())).await;

        let mut names: Vec<String> = store
            .list_rules("default")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.metadata.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);

        store.remove_rule("default", "a").await;
        assert_eq!(store.list_rules("default").await.unwrap().len(), 1);
    }
}
