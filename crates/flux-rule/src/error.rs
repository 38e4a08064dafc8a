use crate::admission::schema::SourceIdentity;
use std::fmt;
use thiserror::Error;

/// 端点存储访问错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("store backend unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Backend(String),
}

/// 端点在规则中的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRole {
    Source,
    Target,
}

impl fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointRole::Source => f.write_str("source"),
            EndpointRole::Target => f.write_str("target"),
        }
    }
}

/// 准入拒绝原因，`Display` 即返回给调用方的文本
#[derive(Error, Debug)]
pub enum AdmissionError {
    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    #[error("object kind {0:?} is not Rule")]
    UnexpectedKind(String),

    #[error("cant get {role} ruleEndpoint {key}. reason: {source}")]
    EndpointLookup {
        role: EndpointRole,
        key: String,
        source: StoreError,
    },

    #[error("{role} ruleEndpoint {key} has not been created.")]
    EndpointNotCreated { role: EndpointRole, key: String },

    #[error("{role} properties do not find \"{property}\".")]
    MissingProperty {
        role: EndpointRole,
        property: &'static str,
    },

    #[error("cant list rules in namespace {namespace}. reason: {source}")]
    RuleListing { namespace: String, source: StoreError },

    #[error("source properties exist. {0}")]
    SourceConflict(SourceIdentity),

    #[error("Unsupported webhook operation!")]
    UnsupportedOperation(String),
}
