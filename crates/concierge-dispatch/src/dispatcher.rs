// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestration of one conversation turn.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use concierge_config::ConciergeConfig;
use concierge_core::{
    ChatMessage, ChatRole, Classification, ConciergeError, PromptMessage, ProviderAdapter,
    ProviderRequest, RecordStore, ToolCallRequest,
};
use concierge_session::{ClassifyDecision, PendingAction, SessionStore};
use concierge_tools::ToolRegistry;

use crate::prompt;

const TRANSPORT_APOLOGY: &str =
    "I'm sorry, I'm having trouble reaching our systems right now. Please try again in a moment.";
const EMPTY_REPLY_FALLBACK: &str =
    "I'm sorry, I didn't quite get that. Could you rephrase your request?";

/// Tools that act on an order and therefore participate in the
/// awaiting-order-id flow.
fn is_order_tool(name: &str) -> bool {
    matches!(
        name,
        "lookup_order" | "check_refund_eligibility" | "process_refund"
    )
}

enum ToolOutcome {
    /// A payload for the model to read, success or explainable failure.
    Payload(String),
    /// The worker is unreachable; abort the turn with an apology.
    Abort,
}

pub struct Dispatcher {
    provider: Arc<dyn ProviderAdapter>,
    registry: Arc<ToolRegistry>,
    sessions: Arc<SessionStore>,
    store: Arc<dyn RecordStore>,
    agent_name: String,
    model: String,
    max_tokens: u32,
    history_limit: usize,
}

impl Dispatcher {
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        registry: Arc<ToolRegistry>,
        sessions: Arc<SessionStore>,
        store: Arc<dyn RecordStore>,
        config: &ConciergeConfig,
    ) -> Self {
        Self {
            provider,
            registry,
            sessions,
            store,
            agent_name: config.agent.name.clone(),
            model: config.groq.model.clone(),
            max_tokens: config.groq.max_tokens,
            history_limit: config.session.history_limit,
        }
    }

    /// Handle one inbound message and produce the assistant's reply.
    ///
    /// Tool side effects strictly precede reply generation: by the time the
    /// synthesis call runs, every requested tool has either executed or
    /// produced an explainable failure payload.
    pub async fn handle_message(
        &self,
        user_id: &str,
        text: &str,
    ) -> Result<String, ConciergeError> {
        let history = self
            .store
            .get_chat_history(user_id, self.history_limit)
            .await?;
        self.persist(user_id, ChatRole::User, text).await?;

        match self.sessions.begin_turn(user_id, text) {
            ClassifyDecision::RunFirstMessage | ClassifyDecision::RunSessionExpired => {
                self.run_classification(user_id, text).await;
            }
            ClassifyDecision::UseCached(_) => {
                debug!(user_id, "reusing cached classification");
            }
        }

        if self.sessions.pending_action(user_id) == PendingAction::AwaitingOrderId
            && self.sessions.extracted_order_id(user_id).is_some()
        {
            self.sessions.set_pending_action(user_id, PendingAction::None);
        }

        let classification = self.sessions.cached_classification(user_id);
        let order_id = self.sessions.extracted_order_id(user_id);
        let summary = prompt::context_summary(
            classification.as_ref(),
            self.sessions.pending_action(user_id),
            order_id.as_deref(),
        );

        let mut messages = vec![prompt::system_prompt(&self.agent_name, &summary)];
        messages.extend(prompt::history_messages(&history));
        messages.push(PromptMessage::user(text));

        let first = self
            .provider
            .complete(ProviderRequest {
                model: self.model.clone(),
                messages: messages.clone(),
                max_tokens: self.max_tokens,
                tools: self.registry.definitions(),
            })
            .await?;

        let reply = if first.tool_calls.is_empty() {
            first.text.unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string())
        } else {
            self.run_tools_and_synthesize(user_id, text, first.text, &first.tool_calls, messages)
                .await?
        };

        self.persist(user_id, ChatRole::Assistant, &reply).await?;
        Ok(reply)
    }

    /// Execute requested tools sequentially, then make the synthesis call.
    async fn run_tools_and_synthesize(
        &self,
        user_id: &str,
        text: &str,
        first_text: Option<String>,
        tool_calls: &[ToolCallRequest],
        mut messages: Vec<PromptMessage>,
    ) -> Result<String, ConciergeError> {
        messages.push(PromptMessage::assistant(first_text.unwrap_or_default()));

        let mut protocol_retried = false;
        for call in tool_calls {
            match self.execute_tool(user_id, text, call, &mut protocol_retried).await {
                ToolOutcome::Payload(payload) => {
                    messages.push(PromptMessage::tool_result(&call.id, payload));
                }
                ToolOutcome::Abort => {
                    return Ok(TRANSPORT_APOLOGY.to_string());
                }
            }
        }

        let second = self
            .provider
            .complete(ProviderRequest {
                model: self.model.clone(),
                messages,
                max_tokens: self.max_tokens,
                tools: Vec::new(),
            })
            .await?;
        if !second.tool_calls.is_empty() {
            debug!(
                count = second.tool_calls.len(),
                "ignoring tool requests in synthesis response"
            );
        }
        Ok(second.text.unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string()))
    }

    /// Execute one tool call and turn its outcome into a result payload.
    ///
    /// Every error class maps to either a payload the model can explain or
    /// an abort of the turn; nothing is swallowed and nothing hangs.
    async fn execute_tool(
        &self,
        user_id: &str,
        text: &str,
        call: &ToolCallRequest,
        protocol_retried: &mut bool,
    ) -> ToolOutcome {
        let mut arguments = call.arguments.clone();
        if call.name == "escalate_to_human" {
            // The session is the only source of identity here; a
            // model-supplied user_id is overwritten.
            if let Some(obj) = arguments.as_object_mut() {
                obj.insert("user_id".to_string(), json!(user_id));
                obj.insert("last_message".to_string(), json!(text));
            }
        }

        let mut result = self.registry.dispatch(&call.name, arguments.clone()).await;
        if matches!(result, Err(ConciergeError::Protocol { .. })) && !*protocol_retried {
            *protocol_retried = true;
            warn!(tool = %call.name, "protocol error, retrying tool call once");
            result = self.registry.dispatch(&call.name, arguments).await;
        }

        match result {
            Ok(value) => {
                self.observe_tool_success(user_id, &call.name, &value);
                ToolOutcome::Payload(value.to_string())
            }
            Err(ConciergeError::Validation { message }) => {
                if is_order_tool(&call.name)
                    && self.sessions.extracted_order_id(user_id).is_none()
                {
                    self.sessions
                        .set_pending_action(user_id, PendingAction::AwaitingOrderId);
                }
                ToolOutcome::Payload(
                    json!({
                        "error": "invalid_arguments",
                        "message": message,
                        "hint": "ask the customer for the missing or corrected information"
                    })
                    .to_string(),
                )
            }
            Err(ConciergeError::NotFound { resource }) => {
                info!(tool = %call.name, resource, "tool target not found");
                ToolOutcome::Payload(
                    json!({
                        "error": "not_found",
                        "message": format!("{resource} was not found")
                    })
                    .to_string(),
                )
            }
            Err(ConciergeError::AlreadyRefunded { order_id }) => ToolOutcome::Payload(
                json!({
                    "error": "already_refunded",
                    "message": format!("order {order_id} has already been refunded")
                })
                .to_string(),
            ),
            Err(err @ (ConciergeError::Transport { .. } | ConciergeError::Timeout { .. })) => {
                error!(tool = %call.name, error = %err, "tool transport failure, aborting turn");
                ToolOutcome::Abort
            }
            Err(ConciergeError::Protocol { message }) => {
                warn!(tool = %call.name, message, "protocol error persisted after retry");
                ToolOutcome::Payload(
                    json!({
                        "error": "transient",
                        "message": "a temporary issue prevented this action; apologize and suggest trying again"
                    })
                    .to_string(),
                )
            }
            Err(other) => {
                error!(tool = %call.name, error = %other, "tool failed");
                ToolOutcome::Payload(
                    json!({
                        "error": "internal",
                        "message": "something went wrong performing this action; apologize and offer to escalate"
                    })
                    .to_string(),
                )
            }
        }
    }

    /// Session bookkeeping driven by successful tool results.
    fn observe_tool_success(&self, user_id: &str, tool: &str, value: &serde_json::Value) {
        match tool {
            // Topic change requested by the model: the fresh result
            // overwrites the cache without resetting the session clock.
            "classify" => match serde_json::from_value::<Classification>(value.clone()) {
                Ok(classification) => {
                    self.sessions.store_classification(user_id, classification);
                }
                Err(e) => warn!(error = %e, "classify returned an unexpected shape"),
            },
            "check_refund_eligibility" => {
                if value["eligible"] == json!(true) {
                    self.sessions
                        .set_pending_action(user_id, PendingAction::AwaitingRefundConfirmation);
                }
            }
            "process_refund" => {
                self.sessions.set_pending_action(user_id, PendingAction::None);
            }
            _ => {}
        }
    }

    /// Run classification at the start of a turn. A failure here degrades
    /// context quality but never blocks the conversation.
    async fn run_classification(&self, user_id: &str, text: &str) {
        match self
            .registry
            .dispatch("classify", json!({"text": text}))
            .await
        {
            Ok(value) => self.observe_tool_success(user_id, "classify", &value),
            Err(e) => warn!(user_id, error = %e, "classification failed, continuing without it"),
        }
    }

    async fn persist(
        &self,
        user_id: &str,
        role: ChatRole,
        content: &str,
    ) -> Result<(), ConciergeError> {
        self.store
            .append_chat_message(&ChatMessage {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                role,
                content: content.to_string(),
                created_at: Utc::now().to_rfc3339(),
            })
            .await
    }
}
