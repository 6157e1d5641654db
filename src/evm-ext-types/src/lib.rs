//! Payload types shared by the node's RPC extensions: raw batch calls and
//! their per-call outcomes, block tags, deployment-status classifications
//! and the error type the handlers report through.

pub mod call;
pub mod error;
pub mod status;
pub mod tag;

pub use call::{CallOutcome, RawCall};
pub use error::{ApiError, Result};
pub use status::DeployStatus;
pub use tag::BlockTag;
