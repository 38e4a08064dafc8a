pub mod admission;
pub mod error;
pub mod status;
pub mod store;

pub use admission::{
    AdmissionGate, AdmissionRequest, AdmissionResponse, AdmissionReview, Operation, RuleValidator,
    Verdict,
};
pub use error::{AdmissionError, EndpointRole, StoreError};
pub use status::{
    result_queue, ErrorMsg, ExecResult, RelayHandle, RelayMode, ResultQueue, ResultSubmitter,
    StatusRelay, SubmitError, DEFAULT_QUEUE_CAPACITY,
};
pub use store::{EndpointStore, InMemoryEndpointStore};
