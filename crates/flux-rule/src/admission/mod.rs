//! 规则准入：创建前校验规则引用的端点及源标识唯一性

pub mod gate;
pub mod schema;
pub mod validator;

#[cfg(test)]
pub(crate) mod fixtures;

pub use gate::{
    decode_rule, AdmissionGate, AdmissionRequest, AdmissionResponse, AdmissionReview, Operation,
    Status,
};
pub use schema::{EndpointSchema, SourceIdentity};
pub use validator::{RuleValidator, Verdict};
