//! Node-side RPC extensions: a batch executor that runs heterogeneous,
//! independently-failing calls in one round trip, and a resolver that
//! classifies the lifecycle of a contract-creation transaction.
//!
//! The chain, state and mempool are reached only through the collaborator
//! traits in [`backend`]; components receive them at construction time so
//! tests can substitute the in-memory backend.

pub mod backend;
pub mod rpc;

pub use rpc::balance::BalanceHandler;
pub use rpc::batch::BatchExecutor;
pub use rpc::deploy::DeployStatusResolver;
pub use rpc::registry::{CallError, MethodRegistry, RpcHandler};
