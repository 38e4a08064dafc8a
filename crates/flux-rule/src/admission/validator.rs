use super::schema::{check_required_keys, EndpointSchema};
use crate::error::{AdmissionError, EndpointRole};
use crate::store::EndpointStore;
use flux_types::rule::{Rule, RuleEndpoint};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// 准入结论
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Verdict {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

impl From<Result<(), AdmissionError>> for Verdict {
    fn from(result: Result<(), AdmissionError>) -> Self {
        match result {
            Ok(()) => Verdict::allow(),
            Err(err) => Verdict::deny(err.to_string().trim()),
        }
    }
}

/// 规则校验器
///
/// 先校验目标端点，再校验源端点，遇到第一个失败即返回。
/// 只读访问存储，可并发调用。
#[derive(Clone)]
pub struct RuleValidator {
    store: Arc<dyn EndpointStore>,
}

impl RuleValidator {
    pub fn new(store: Arc<dyn EndpointStore>) -> Self {
        Self { store }
    }

    pub async fn validate(&self, rule: &Rule) -> Verdict {
        self.check(rule).await.into()
    }

    pub async fn check(&self, rule: &Rule) -> Result<(), AdmissionError> {
        self.validate_target(rule).await?;
        self.validate_source(rule).await
    }

    async fn validate_target(&self, rule: &Rule) -> Result<(), AdmissionError> {
        let endpoint = self
            .resolve_endpoint(EndpointRole::Target, rule.namespace(), &rule.spec.target)
            .await?;

        check_required_keys(
            EndpointRole::Target,
            endpoint.endpoint_type().required_target_keys(),
            &rule.spec.target_resource,
        )
    }

    async fn validate_source(&self, rule: &Rule) -> Result<(), AdmissionError> {
        let endpoint = self
            .resolve_endpoint(EndpointRole::Source, rule.namespace(), &rule.spec.source)
            .await?;
        let endpoint_type = endpoint.endpoint_type();

        check_required_keys(
            EndpointRole::Source,
            endpoint_type.required_source_keys(),
            &rule.spec.source_resource,
        )?;

        let Some(identity) = endpoint_type.source_identity(&rule.spec.source_resource) else {
            return Ok(());
        };

        let existing = self
            .store
            .list_rules(rule.namespace())
            .await
            .map_err(|source| AdmissionError::RuleListing {
                namespace: rule.namespace().to_string(),
                source,
            })?;

        if let Some(conflict) = existing
            .iter()
            .find(|r| identity.is_claimed_by(&r.spec.source_resource))
        {
            debug!(
                rule = %rule.metadata.key(),
                conflicting_rule = %conflict.metadata.key(),
                "Source identity already claimed"
            );
            return Err(AdmissionError::SourceConflict(identity));
        }

        Ok(())
    }

    async fn resolve_endpoint(
        &self,
        role: EndpointRole,
        namespace: &str,
        name: &str,
    ) -> Result<RuleEndpoint, AdmissionError> {
        let key = format!("{}/{}", namespace, name);
        match self.store.get_rule_endpoint(namespace, name).await {
            Ok(Some(endpoint)) => Ok(endpoint),
            Ok(None) => Err(AdmissionError::EndpointNotCreated { role, key }),
            Err(source) => Err(AdmissionError::EndpointLookup { role, key, source }),
        }
    }
}
