use super::validator::RuleValidator;
use crate::error::AdmissionError;
use flux_types::rule::{Rule, RULE_KIND};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info, warn};

pub const ADMISSION_API_VERSION: &str = "admission.flux.io/v1";
pub const ADMISSION_REVIEW_KIND: &str = "AdmissionReview";

/// 变更请求的操作类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operation {
    Create,
    Update,
    Delete,
    Connect,
    Unknown(String),
}

impl From<String> for Operation {
    fn from(value: String) -> Self {
        match value.as_str() {
            "CREATE" => Operation::Create,
            "UPDATE" => Operation::Update,
            "DELETE" => Operation::Delete,
            "CONNECT" => Operation::Connect,
            _ => Operation::Unknown(value),
        }
    }
}

impl From<Operation> for String {
    fn from(value: Operation) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => f.write_str("CREATE"),
            Operation::Update => f.write_str("UPDATE"),
            Operation::Delete => f.write_str("DELETE"),
            Operation::Connect => f.write_str("CONNECT"),
            Operation::Unknown(op) => f.write_str(op),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionRequest {
    #[serde(default)]
    pub uid: String,
    pub operation: Operation,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub name: String,
    /// 待创建对象的原始内容
    #[serde(default)]
    pub object: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionResponse {
    pub uid: String,
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Status>,
}

impl AdmissionResponse {
    pub fn allow(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            allowed: true,
            result: None,
        }
    }

    pub fn deny(uid: impl Into<String>, message: &str) -> Self {
        Self {
            uid: uid.into(),
            allowed: false,
            result: Some(Status {
                message: message.trim().to_string(),
            }),
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.result.as_ref().map(|s| s.message.as_str())
    }
}

/// 准入请求/响应的外层包装
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionReview {
    #[serde(default = "default_review_api_version")]
    pub api_version: String,
    #[serde(default = "default_review_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<AdmissionRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<AdmissionResponse>,
}

impl AdmissionReview {
    pub fn respond(response: AdmissionResponse) -> Self {
        Self {
            api_version: default_review_api_version(),
            kind: default_review_kind(),
            request: None,
            response: Some(response),
        }
    }
}

/// 解码待创建的规则；对象未带命名空间时沿用请求的命名空间
pub fn decode_rule(request: &AdmissionRequest) -> Result<Rule, AdmissionError> {
    let mut rule = Rule::deserialize(&request.object)?;
    if rule.kind != RULE_KIND {
        return Err(AdmissionError::UnexpectedKind(rule.kind));
    }
    if rule.metadata.namespace.is_empty() {
        rule.metadata.namespace = request.namespace.clone();
    }
    Ok(rule)
}

/// 规则准入入口
#[derive(Clone)]
pub struct AdmissionGate {
    validator: RuleValidator,
}

impl AdmissionGate {
    pub fn new(validator: RuleValidator) -> Self {
        Self { validator }
    }

    pub async fn admit(&self, request: &AdmissionRequest) -> AdmissionResponse {
        match &request.operation {
            Operation::Create => self.admit_create(request).await,
            Operation::Delete | Operation::Connect => {
                info!(uid = %request.uid, operation = %request.operation, "admission validation passed!");
                AdmissionResponse::allow(request.uid.clone())
            }
            other => {
                let err = AdmissionError::UnsupportedOperation(other.to_string());
                warn!(uid = %request.uid, operation = %other, "Unsupported webhook operation");
                AdmissionResponse::deny(request.uid.clone(), &err.to_string())
            }
        }
    }

    async fn admit_create(&self, request: &AdmissionRequest) -> AdmissionResponse {
        let rule = match decode_rule(request) {
            Ok(rule) => rule,
            Err(err) => {
                error!(uid = %request.uid, error = %err, "validation failed with error");
                return AdmissionResponse::deny(request.uid.clone(), &err.to_string());
            }
        };

        match self.validator.check(&rule).await {
            Ok(()) => {
                info!(uid = %request.uid, rule = %rule.metadata.key(), "Rule admitted");
                AdmissionResponse::allow(request.uid.clone())
            }
            Err(err) => {
                warn!(uid = %request.uid, rule = %rule.metadata.key(), reason = %err, "Rule denied");
                AdmissionResponse::deny(request.uid.clone(), &err.to_string())
            }
        }
    }
}

fn default_review_api_version() -> String {
    ADMISSION_API_VERSION.to_string()
}

fn default_review_kind() -> String {
    ADMISSION_REVIEW_KIND.to_string()
}
