pub mod message;
pub mod rule;

pub use message::{Message, MessageHeader, MessageRoute};
pub use rule::{ObjectMeta, Rule, RuleEndpoint, RuleEndpointSpec, RuleEndpointType, RuleSpec};
