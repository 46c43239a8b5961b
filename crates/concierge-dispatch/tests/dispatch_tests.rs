// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end dispatch loop tests with a scripted provider and in-memory
//! store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use concierge_config::ConciergeConfig;
use concierge_core::{
    AlertPriority, ConciergeError, OrderRecord, ProviderResponse, RecordStore, RefundStatus,
    ToolCallRequest,
};
use concierge_dispatch::Dispatcher;
use concierge_refund::{RefundPolicy, RefundWorkflow};
use concierge_session::{PendingAction, SessionStore};
use concierge_tools::{
    CheckRefundEligibilityTool, EscalateToHumanTool, ProcessRefundTool, Tool, ToolRegistry,
};
use concierge_test_utils::{MemoryStore, MockProvider};

/// Classification stub standing in for the worker-backed tool.
struct StubClassify {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Tool for StubClassify {
    fn name(&self) -> &str {
        "classify"
    }

    fn description(&self) -> &str {
        "Classify a customer message"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {"text": {"type": "string"}},
            "required": ["text"]
        })
    }

    async fn invoke(
        &self,
        _arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ConciergeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({
            "intent": "order_support",
            "intent_confidence": 0.92,
            "sentiment": "neutral",
            "sentiment_confidence": 0.85
        }))
    }
}

/// Tool that always fails with a transport error.
struct BrokenTool;

#[async_trait]
impl Tool for BrokenTool {
    fn name(&self) -> &str {
        "lookup_order"
    }

    fn description(&self) -> &str {
        "Look up an order"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {"order_id": {"type": "string"}},
            "required": ["order_id"]
        })
    }

    async fn invoke(
        &self,
        _arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ConciergeError> {
        Err(ConciergeError::Transport {
            message: "worker process exited".to_string(),
            source: None,
        })
    }
}

/// Tool that fails with a protocol error on the first call, then succeeds.
struct FlakyTool {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Tool for FlakyTool {
    fn name(&self) -> &str {
        "lookup_order"
    }

    fn description(&self) -> &str {
        "Look up an order"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {"order_id": {"type": "string"}},
            "required": ["order_id"]
        })
    }

    async fn invoke(
        &self,
        _arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ConciergeError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(ConciergeError::Protocol {
                message: "garbled frame".to_string(),
            })
        } else {
            Ok(json!({"order_id": "ORD000032", "status": "shipped"}))
        }
    }
}

struct Harness {
    provider: Arc<MockProvider>,
    store: Arc<MemoryStore>,
    sessions: Arc<SessionStore>,
    dispatcher: Dispatcher,
    classify_calls: Arc<AtomicUsize>,
}

fn harness_with(extra: Option<Arc<dyn Tool>>) -> Harness {
    let config = ConciergeConfig::default();
    let provider = Arc::new(MockProvider::new());
    let store = Arc::new(MemoryStore::new());
    let sessions = Arc::new(SessionStore::new(&config.session));
    let classify_calls = Arc::new(AtomicUsize::new(0));

    let workflow = Arc::new(RefundWorkflow::new(
        Arc::clone(&store) as Arc<dyn RecordStore>,
        RefundPolicy::new(&config.refund),
    ));

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(StubClassify {
        calls: Arc::clone(&classify_calls),
    }));
    registry.register(Arc::new(CheckRefundEligibilityTool::new(Arc::clone(
        &workflow,
    ))));
    registry.register(Arc::new(ProcessRefundTool::new(workflow)));
    registry.register(Arc::new(EscalateToHumanTool::new(
        Arc::clone(&store) as Arc<dyn RecordStore>
    )));
    if let Some(tool) = extra {
        registry.register(tool);
    }

    let dispatcher = Dispatcher::new(
        Arc::clone(&provider) as _,
        Arc::new(registry),
        Arc::clone(&sessions),
        Arc::clone(&store) as Arc<dyn RecordStore>,
        &config,
    );

    Harness {
        provider,
        store,
        sessions,
        dispatcher,
        classify_calls,
    }
}

fn harness() -> Harness {
    harness_with(None)
}

fn order(id: &str, category: &str, value: f64) -> OrderRecord {
    OrderRecord {
        order_id: id.parse().unwrap(),
        product_category: category.to_string(),
        order_value: value,
        refund_status: RefundStatus::NotRequested,
        refund_amount: None,
        refund_reason: None,
        refund_date: None,
    }
}

#[tokio::test]
async fn plain_reply_persists_both_turns_and_classifies_once() {
    let h = harness();
    h.provider.push_text("Hello! How can I help you today?");

    let reply = h.dispatcher.handle_message("user-1", "hi there").await.unwrap();
    assert_eq!(reply, "Hello! How can I help you today?");
    assert_eq!(h.store.chat_len(), 2);
    assert_eq!(h.classify_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn classification_is_cached_within_a_session() {
    let h = harness();
    h.provider.push_text("Hello!");
    h.provider.push_text("Sure, what's the order id?");

    h.dispatcher.handle_message("user-1", "hi").await.unwrap();
    h.dispatcher
        .handle_message("user-1", "I want to check my order")
        .await
        .unwrap();

    assert_eq!(h.classify_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn eligibility_tool_result_reaches_the_synthesis_call() {
    let h = harness();
    h.store.insert_order(order("ORD000032", "Personal Care", 1651.0));
    h.provider.push_tool_call(
        "check_refund_eligibility",
        json!({"order_id": "ORD000032"}),
    );
    h.provider
        .push_text("You can get 1568.45 back after the shipping fee. Shall I proceed?");

    let reply = h
        .dispatcher
        .handle_message("user-1", "I want a refund for ORD000032")
        .await
        .unwrap();
    assert!(reply.contains("1568.45"));

    // The second provider request carries the tool result payload.
    let requests = h.provider.requests();
    assert_eq!(requests.len(), 2);
    let tool_payload = &requests[1].messages.last().unwrap().content;
    assert!(tool_payload.contains("1568.45"));
    assert!(tool_payload.contains("\"eligible\":true"));

    assert_eq!(
        h.sessions.pending_action("user-1"),
        PendingAction::AwaitingRefundConfirmation
    );
}

#[tokio::test]
async fn repeated_refund_surfaces_already_refunded_payload() {
    let h = harness();
    h.store.insert_order(order("ORD000032", "Personal Care", 1651.0));

    h.provider.push_tool_call(
        "process_refund",
        json!({"order_id": "ORD000032", "amount": 1568.45, "reason": "damaged"}),
    );
    h.provider.push_text("Your refund of 1568.45 is on its way.");
    h.dispatcher
        .handle_message("user-1", "yes, refund ORD000032")
        .await
        .unwrap();

    h.provider.push_tool_call(
        "process_refund",
        json!({"order_id": "ORD000032", "amount": 1568.45, "reason": "damaged"}),
    );
    h.provider
        .push_text("That order was already refunded earlier.");
    let reply = h
        .dispatcher
        .handle_message("user-1", "refund ORD000032 again")
        .await
        .unwrap();
    assert!(reply.contains("already refunded"));

    let requests = h.provider.requests();
    let tool_payload = &requests[3].messages.last().unwrap().content;
    assert!(tool_payload.contains("already_refunded"));
}

#[tokio::test]
async fn escalation_uses_session_identity_not_model_supplied() {
    let h = harness();
    h.provider.push_tool_call(
        "escalate_to_human",
        json!({"reason": "customer demands a human", "priority": "high", "user_id": "attacker"}),
    );
    h.provider
        .push_text("I've alerted our support team, someone will be with you shortly.");

    h.dispatcher
        .handle_message("user-9", "get me a real person now")
        .await
        .unwrap();

    let alerts = h.store.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].user_id, "user-9");
    assert_eq!(alerts[0].last_message, "get me a real person now");
    assert_eq!(alerts[0].priority, AlertPriority::High);
}

#[tokio::test]
async fn transport_failure_yields_generic_apology() {
    let h = harness_with(Some(Arc::new(BrokenTool) as Arc<dyn Tool>));
    h.provider
        .push_tool_call("lookup_order", json!({"order_id": "ORD000032"}));

    let reply = h
        .dispatcher
        .handle_message("user-1", "where is ORD000032?")
        .await
        .unwrap();
    assert!(reply.contains("try again"));
    // No synthesis call happened.
    assert_eq!(h.provider.requests().len(), 1);
    // The apology is still persisted as the assistant turn.
    assert_eq!(h.store.chat_len(), 2);
}

#[tokio::test]
async fn protocol_error_is_retried_once() {
    let flaky_calls = Arc::new(AtomicUsize::new(0));
    let h = harness_with(Some(Arc::new(FlakyTool {
        calls: Arc::clone(&flaky_calls),
    }) as Arc<dyn Tool>));
    h.provider
        .push_tool_call("lookup_order", json!({"order_id": "ORD000032"}));
    h.provider.push_text("Your order has shipped.");

    let reply = h
        .dispatcher
        .handle_message("user-1", "where is ORD000032?")
        .await
        .unwrap();
    assert_eq!(reply, "Your order has shipped.");
    assert_eq!(flaky_calls.load(Ordering::SeqCst), 2);

    let requests = h.provider.requests();
    assert!(requests[1].messages.last().unwrap().content.contains("shipped"));
}

#[tokio::test]
async fn missing_order_id_sets_pending_action_until_supplied() {
    let h = harness();
    h.provider
        .push_tool_call("check_refund_eligibility", json!({"order_id": ""}));
    h.provider
        .push_text("Could you share your order id? It looks like ORD followed by six digits.");

    h.dispatcher
        .handle_message("user-1", "I want a refund")
        .await
        .unwrap();
    assert_eq!(
        h.sessions.pending_action("user-1"),
        PendingAction::AwaitingOrderId
    );

    // Supplying the id on the next message clears the pending action.
    h.store.insert_order(order("ORD000123", "Personal Care", 100.0));
    h.provider.push_text("Thanks, checking ORD000123 now.");
    h.dispatcher
        .handle_message("user-1", "it's ord000123")
        .await
        .unwrap();
    assert_eq!(h.sessions.pending_action("user-1"), PendingAction::None);
    assert_eq!(
        h.sessions.extracted_order_id("user-1").as_deref(),
        Some("ORD000123")
    );
}

#[tokio::test]
async fn tool_requests_in_synthesis_response_are_ignored() {
    let h = harness();
    h.store.insert_order(order("ORD000032", "Personal Care", 1651.0));
    h.provider.push_tool_call(
        "check_refund_eligibility",
        json!({"order_id": "ORD000032"}),
    );
    // Synthesis response tries to call another tool; only its text is used.
    h.provider.push_response(ProviderResponse {
        text: Some("You're eligible for 1568.45.".to_string()),
        tool_calls: vec![ToolCallRequest {
            id: "call_extra".to_string(),
            name: "process_refund".to_string(),
            arguments: json!({"order_id": "ORD000032", "amount": 1568.45, "reason": "x"}),
        }],
    });

    let reply = h
        .dispatcher
        .handle_message("user-1", "refund ORD000032 please")
        .await
        .unwrap();
    assert_eq!(reply, "You're eligible for 1568.45.");
    assert_eq!(h.provider.requests().len(), 2);

    // The ignored process_refund never ran.
    let record = h
        .store
        .get_order(&"ORD000032".parse().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.refund_status, RefundStatus::NotRequested);
}
