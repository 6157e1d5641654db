use std::collections::HashMap;

use jsonrpc_core::Params;
use serde_json::Value;

use evm_ext_types::ApiError;

/// Failure of one call. `InvalidParams` keeps decode problems apart from
/// failures of the handler itself.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("invalid params")]
    InvalidParams,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A typed RPC method: a registered name plus a decode-then-invoke entry
/// point. Each handler owns its parameter shape and validates it before
/// touching any collaborator.
#[async_trait::async_trait]
pub trait RpcHandler: Send + Sync {
    /// Method name the handler registers under.
    fn method(&self) -> &'static str;

    async fn call(&self, params: Params) -> Result<Value, CallError>;
}

/// Maps method names to handlers. Lookup is pure; an unknown name is a
/// normal outcome for the caller to report, not a registry failure.
#[derive(Default)]
pub struct MethodRegistry {
    handlers: HashMap<&'static str, Box<dyn RpcHandler>>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Box<dyn RpcHandler>) {
        self.handlers.insert(handler.method(), handler);
    }

    pub fn get(&self, method: &str) -> Option<&dyn RpcHandler> {
        self.handlers.get(method).map(Box::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait::async_trait]
    impl RpcHandler for Echo {
        fn method(&self) -> &'static str {
            "test_echo"
        }

        async fn call(&self, params: Params) -> Result<Value, CallError> {
            let (payload,): (Value,) = params.parse().map_err(|_| CallError::InvalidParams)?;
            Ok(payload)
        }
    }

    #[test]
    fn lookup_is_by_registered_name() {
        let mut registry = MethodRegistry::new();
        registry.register(Box::new(Echo));

        assert!(registry.get("test_echo").is_some());
        assert!(registry.get("test_missing").is_none());
    }

    #[tokio::test]
    async fn handler_decodes_before_invoking() {
        let handler = Echo;

        let value = handler
            .call(Params::Array(vec![serde_json::json!("hi")]))
            .await
            .unwrap();
        assert_eq!(value, serde_json::json!("hi"));

        let err = handler.call(Params::None).await.unwrap_err();
        assert!(matches!(err, CallError::InvalidParams));
    }
}
