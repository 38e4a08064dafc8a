//! 规则执行结果回传

pub mod model;
pub mod relay;

pub use model::{ErrorMsg, ExecResult, STATUS_FAIL, STATUS_SUCCESS};
pub use relay::{
    build_status_message, result_queue, RelayHandle, RelayMode, ResultQueue, ResultSubmitter,
    StatusRelay, SubmitError, DEFAULT_QUEUE_CAPACITY,
};
