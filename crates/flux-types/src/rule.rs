use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const RULE_API_VERSION: &str = "rules.flux.io/v1";
pub const RULE_KIND: &str = "Rule";
pub const RULE_ENDPOINT_KIND: &str = "RuleEndpoint";

/// 对象元数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

impl ObjectMeta {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// `namespace/name`
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// 路由规则：把源端点上的资源绑定到目标端点上的资源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_rule_kind")]
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: RuleSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpec {
    /// 源端点名称
    pub source: String,
    #[serde(default)]
    pub source_resource: HashMap<String, String>,
    /// 目标端点名称
    pub target: String,
    #[serde(default)]
    pub target_resource: HashMap<String, String>,
}

impl Rule {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, spec: RuleSpec) -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_rule_kind(),
            metadata: ObjectMeta::new(namespace, name),
            spec,
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }
}

/// 规则端点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEndpoint {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_endpoint_kind")]
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: RuleEndpointSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEndpointSpec {
    pub rule_endpoint_type: RuleEndpointType,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl RuleEndpoint {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        rule_endpoint_type: RuleEndpointType,
    ) -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_endpoint_kind(),
            metadata: ObjectMeta::new(namespace, name),
            spec: RuleEndpointSpec {
                rule_endpoint_type,
                properties: HashMap::new(),
            },
        }
    }

    pub fn endpoint_type(&self) -> &RuleEndpointType {
        &self.spec.rule_endpoint_type
    }
}

/// 端点类型。未知类型原样保留，便于后续扩展
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleEndpointType {
    Rest,
    Eventbus,
    Servicebus,
    Other(String),
}

impl RuleEndpointType {
    pub fn as_str(&self) -> &str {
        match self {
            RuleEndpointType::Rest => "rest",
            RuleEndpointType::Eventbus => "eventbus",
            RuleEndpointType::Servicebus => "servicebus",
            RuleEndpointType::Other(s) => s,
        }
    }
}

impl From<String> for RuleEndpointType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "rest" => RuleEndpointType::Rest,
            "eventbus" => RuleEndpointType::Eventbus,
            "servicebus" => RuleEndpointType::Servicebus,
            _ => RuleEndpointType::Other(value),
        }
    }
}

impl From<&str> for RuleEndpointType {
    fn from(value: &str) -> Self {
        RuleEndpointType::from(value.to_string())
    }
}

impl From<RuleEndpointType> for String {
    fn from(value: RuleEndpointType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RuleEndpointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_api_version() -> String {
    RULE_API_VERSION.to_string()
}

fn default_rule_kind() -> String {
    RULE_KIND.to_string()
}

fn default_endpoint_kind() -> String {
    RULE_ENDPOINT_KIND.to_string()
}
