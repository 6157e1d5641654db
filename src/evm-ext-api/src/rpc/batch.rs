use tokio_util::sync::CancellationToken;

use evm_ext_types::{ApiError, CallOutcome, RawCall};

use super::registry::{CallError, MethodRegistry};

/// Runs a batch of independent RPC calls strictly in input order.
///
/// The reply holds one entry per input call, positions preserved; a
/// failing call produces an error value in its own slot and never
/// disturbs its neighbours. The executor itself fails only when the
/// caller's token is cancelled before a call starts.
pub struct BatchExecutor {
    registry: MethodRegistry,
}

impl BatchExecutor {
    pub fn new(registry: MethodRegistry) -> Self {
        Self { registry }
    }

    pub async fn execute_batch(
        &self,
        calls: Vec<RawCall>,
        cancel: &CancellationToken,
    ) -> Result<Vec<CallOutcome>, ApiError> {
        let mut reply = Vec::with_capacity(calls.len());

        for call in calls {
            if cancel.is_cancelled() {
                return Err(ApiError::Cancelled);
            }

            let outcome = match self.registry.get(&call.method) {
                None => CallOutcome::error(format!("unsupported method: {}", call.method)),
                Some(handler) => match handler.call(call.params).await {
                    Ok(payload) => CallOutcome::Success(payload),
                    Err(CallError::InvalidParams) => {
                        log::debug!("invalid params for {}", call.method);
                        CallOutcome::error("invalid params")
                    }
                    Err(CallError::Api(err)) => {
                        log::debug!("{} failed: {err}", call.method);
                        CallOutcome::error(err.to_string())
                    }
                },
            };

            reply.push(outcome);
        }

        Ok(reply)
    }
}
