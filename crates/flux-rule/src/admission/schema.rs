use crate::error::{AdmissionError, EndpointRole};
use flux_types::rule::RuleEndpointType;
use std::collections::HashMap;
use std::fmt;

pub const KEY_RESOURCE: &str = "resource";
pub const KEY_TOPIC: &str = "topic";
pub const KEY_PATH: &str = "path";
pub const KEY_NODE_NAME: &str = "node_name";

/// 规则源在命名空间内的唯一标识
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceIdentity {
    /// rest 源：按路径区分
    Path(String),
    /// eventbus 源：按 (topic, node_name) 组合区分
    Topic { topic: String, node_name: String },
}

impl SourceIdentity {
    /// 已有规则的源资源是否占用了同一标识
    pub fn is_claimed_by(&self, resource: &HashMap<String, String>) -> bool {
        let value = |key: &str| resource.get(key).map(String::as_str).unwrap_or("");
        match self {
            SourceIdentity::Path(path) => value(KEY_PATH) == path.as_str(),
            SourceIdentity::Topic { topic, node_name } => {
                value(KEY_TOPIC) == topic.as_str() && value(KEY_NODE_NAME) == node_name.as_str()
            }
        }
    }
}

impl fmt::Display for SourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceIdentity::Path(path) => write!(f, "path: {}", path),
            SourceIdentity::Topic { topic, node_name } => {
                write!(f, "node_name: {}, topic: {}", node_name, topic)
            }
        }
    }
}

/// 各端点类型对源/目标资源的要求
pub trait EndpointSchema {
    /// 作为目标时必须出现的键，按检查顺序排列
    fn required_target_keys(&self) -> &'static [&'static str];

    /// 作为源时必须出现的键，按检查顺序排列
    fn required_source_keys(&self) -> &'static [&'static str];

    /// 源标识；返回 `None` 表示该类型不做唯一性约束
    fn source_identity(&self, resource: &HashMap<String, String>) -> Option<SourceIdentity>;
}

impl EndpointSchema for RuleEndpointType {
    fn required_target_keys(&self) -> &'static [&'static str] {
        match self {
            RuleEndpointType::Rest => &[KEY_RESOURCE],
            RuleEndpointType::Eventbus => &[KEY_TOPIC],
            _ => &[],
        }
    }

    fn required_source_keys(&self) -> &'static [&'static str] {
        match self {
            RuleEndpointType::Rest => &[KEY_PATH],
            RuleEndpointType::Eventbus => &[KEY_TOPIC, KEY_NODE_NAME],
            _ => &[],
        }
    }

    fn source_identity(&self, resource: &HashMap<String, String>) -> Option<SourceIdentity> {
        match self {
            RuleEndpointType::Rest => Some(SourceIdentity::Path(resource.get(KEY_PATH)?.clone())),
            RuleEndpointType::Eventbus => Some(SourceIdentity::Topic {
                topic: resource.get(KEY_TOPIC)?.clone(),
                node_name: resource.get(KEY_NODE_NAME)?.clone(),
            }),
            _ => None,
        }
    }
}

/// 检查必需键，返回第一个缺失的键对应的错误
pub fn check_required_keys(
    role: EndpointRole,
    keys: &'static [&'static str],
    resource: &HashMap<String, String>,
) -> Result<(), AdmissionError> {
    match keys.iter().copied().find(|key| !resource.contains_key(*key)) {
        Some(property) => Err(AdmissionError::MissingProperty { role, property }),
        None => Ok(()),
    }
}
