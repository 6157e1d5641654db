use std::sync::Arc;

use ethers_core::types::{Block, H160, H256, U256};
use jsonrpc_core::Params;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use evm_ext_api::backend::in_memory::InMemoryBackend;
use evm_ext_api::rpc::registry::{CallError, RpcHandler};
use evm_ext_api::{BalanceHandler, BatchExecutor, MethodRegistry};
use evm_ext_types::{ApiError, CallOutcome, RawCall};

const ALICE: [u8; 20] = [0xa1; 20];

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn block(number: u64, state_root: H256) -> Block<H256> {
    Block {
        number: Some(number.into()),
        hash: Some(H256::from_low_u64_be(0xb000 + number)),
        state_root,
        ..Default::default()
    }
}

fn executor(backend: &InMemoryBackend) -> BatchExecutor {
    let mut registry = MethodRegistry::new();
    registry.register(Box::new(BalanceHandler::new(
        Arc::new(backend.clone()),
        Arc::new(backend.clone()),
    )));
    BatchExecutor::new(registry)
}

fn balance_call(address: &str, tag: &str) -> RawCall {
    RawCall::new(
        "eth_getBalance",
        Params::Array(vec![json!(address), json!(tag)]),
    )
}

fn alice_hex() -> String {
    format!("0x{}", hex::encode(ALICE))
}

fn error_text(outcome: &CallOutcome) -> &str {
    match outcome {
        CallOutcome::Error { error } => error,
        CallOutcome::Success(value) => panic!("expected error entry, got {value}"),
    }
}

/// One chain with a single head block whose state holds a balance of 42
/// wei for Alice.
async fn seeded_backend() -> InMemoryBackend {
    let backend = InMemoryBackend::default();
    let root = H256::from_low_u64_be(0x500d);
    backend.insert_block(block(5, root), vec![]).await;
    backend
        .set_balance(root, H160::from(ALICE), U256::from(42))
        .await;
    backend
}

#[tokio::test]
async fn reply_matches_input_order_and_isolates_failures() {
    init_logger();
    let backend = seeded_backend().await;

    let calls = vec![
        RawCall::new("eth_call", Params::Array(vec![json!("0x")])),
        RawCall::new("eth_getBalance", Params::Array(vec![json!(alice_hex())])),
        balance_call(&alice_hex(), "latest"),
    ];

    let reply = executor(&backend)
        .execute_batch(calls, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(reply.len(), 3);
    assert_eq!(error_text(&reply[0]), "unsupported method: eth_call");
    assert_eq!(error_text(&reply[1]), "invalid params");
    assert_eq!(reply[2], CallOutcome::Success(Value::String("0x2a".into())));
}

#[tokio::test]
async fn historical_block_reads_that_blocks_state() {
    init_logger();
    let backend = seeded_backend().await;
    let old_root = H256::from_low_u64_be(0x300d);
    backend.insert_block(block(3, old_root), vec![]).await;
    backend
        .set_balance(old_root, H160::from(ALICE), U256::from(1000))
        .await;

    let calls = vec![
        balance_call(&alice_hex(), "0x3"),
        balance_call(&alice_hex(), "3"),
        balance_call(&alice_hex(), "latest"),
    ];

    let reply = executor(&backend)
        .execute_batch(calls, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(reply[0], CallOutcome::Success(Value::String("0x3e8".into())));
    assert_eq!(reply[1], reply[0]);
    assert_eq!(reply[2], CallOutcome::Success(Value::String("0x2a".into())));
}

#[tokio::test]
async fn block_hash_tag_resolves_to_that_block() {
    init_logger();
    let backend = seeded_backend().await;
    let head_hash = H256::from_low_u64_be(0xb005);

    let call = balance_call(&alice_hex(), &format!("0x{}", hex::encode(head_hash.as_bytes())));
    let reply = executor(&backend)
        .execute_batch(vec![call], &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(reply[0], CallOutcome::Success(Value::String("0x2a".into())));
}

#[tokio::test]
async fn unknown_account_reads_as_zero() {
    init_logger();
    let backend = seeded_backend().await;

    let stranger = format!("0x{}", "77".repeat(20));
    let reply = executor(&backend)
        .execute_batch(
            vec![balance_call(&stranger, "latest")],
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(reply[0], CallOutcome::Success(Value::String("0x0".into())));
}

#[tokio::test]
async fn bad_inputs_become_error_entries() {
    init_logger();
    let backend = seeded_backend().await;

    let calls = vec![
        balance_call(&alice_hex(), "bogus"),
        balance_call("0x1234", "latest"),
        balance_call(&alice_hex(), "0x9"),
    ];

    let reply = executor(&backend)
        .execute_batch(calls, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(reply.len(), 3);
    assert!(error_text(&reply[0]).starts_with("invalid block tag"));
    assert!(error_text(&reply[1]).starts_with("invalid address"));
    assert_eq!(error_text(&reply[2]), "block doesn't exist: 0x9");
}

#[tokio::test]
async fn pruned_state_is_an_error_entry() {
    init_logger();
    let backend = InMemoryBackend::default();
    // A head block whose state root has no snapshot behind it.
    backend
        .insert_block(block(5, H256::from_low_u64_be(0xdead)), vec![])
        .await;

    let reply = executor(&backend)
        .execute_batch(
            vec![balance_call(&alice_hex(), "latest")],
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(error_text(&reply[0]).starts_with("no state data for root"));
}

#[tokio::test]
async fn empty_batch_yields_empty_reply() {
    init_logger();
    let backend = seeded_backend().await;

    let reply = executor(&backend)
        .execute_batch(vec![], &CancellationToken::new())
        .await
        .unwrap();

    assert!(reply.is_empty());
}

/// Test handler that trips the caller's token when invoked, standing in
/// for a client that disconnects mid-batch.
struct CancelDuringCall {
    token: CancellationToken,
}

#[async_trait::async_trait]
impl RpcHandler for CancelDuringCall {
    fn method(&self) -> &'static str {
        "test_cancel"
    }

    async fn call(&self, _params: Params) -> Result<Value, CallError> {
        self.token.cancel();
        Ok(json!("ok"))
    }
}

#[tokio::test]
async fn cancellation_between_calls_stops_the_batch() {
    init_logger();
    let backend = seeded_backend().await;
    let token = CancellationToken::new();

    let mut registry = MethodRegistry::new();
    registry.register(Box::new(BalanceHandler::new(
        Arc::new(backend.clone()),
        Arc::new(backend.clone()),
    )));
    registry.register(Box::new(CancelDuringCall {
        token: token.clone(),
    }));

    let calls = vec![
        RawCall::new("test_cancel", Params::None),
        balance_call(&alice_hex(), "latest"),
    ];

    let err = BatchExecutor::new(registry)
        .execute_batch(calls, &token)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Cancelled));
}
