// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive terminal session driving the full dispatch loop.

use std::sync::Arc;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use concierge_config::ConciergeConfig;
use concierge_core::{ConciergeError, OrderRecord, RecordStore, RefundStatus};
use concierge_dispatch::Dispatcher;
use concierge_groq::GroqClient;
use concierge_refund::{RefundPolicy, RefundWorkflow};
use concierge_session::SessionStore;
use concierge_tools::{
    CheckRefundEligibilityTool, ClassifyTool, EscalateToHumanTool, LookupOrderTool,
    ProcessRefundTool, ToolRegistry,
};
use concierge_store_sqlite::SqliteStore;
use concierge_worker::WorkerManager;

/// Wire the full stack together from configuration.
async fn build_dispatcher(config: &ConciergeConfig) -> Result<Dispatcher, ConciergeError> {
    let store: Arc<SqliteStore> = Arc::new(SqliteStore::open(&config.storage).await?);
    let worker = Arc::new(WorkerManager::new(config.worker.clone()));
    let workflow = Arc::new(RefundWorkflow::new(
        Arc::clone(&store) as Arc<dyn RecordStore>,
        RefundPolicy::new(&config.refund),
    ));

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(ClassifyTool::new(Arc::clone(&worker))));
    registry.register(Arc::new(LookupOrderTool::new(worker)));
    registry.register(Arc::new(CheckRefundEligibilityTool::new(Arc::clone(
        &workflow,
    ))));
    registry.register(Arc::new(ProcessRefundTool::new(workflow)));
    registry.register(Arc::new(EscalateToHumanTool::new(
        Arc::clone(&store) as Arc<dyn RecordStore>
    )));

    let provider = Arc::new(GroqClient::new(&config.groq)?);
    let sessions = Arc::new(SessionStore::new(&config.session));

    Ok(Dispatcher::new(
        provider,
        Arc::new(registry),
        sessions,
        store as Arc<dyn RecordStore>,
        config,
    ))
}

/// Read-eval-print loop: each line is one customer message.
pub async fn run(config: &ConciergeConfig, user: &str) -> Result<(), ConciergeError> {
    let dispatcher = build_dispatcher(config).await?;
    let mut editor = DefaultEditor::new()
        .map_err(|e| ConciergeError::Internal(format!("failed to start shell: {e}")))?;

    println!(
        "{} interactive session for {} (Ctrl-D to exit)",
        config.agent.name.bold(),
        user.cyan()
    );

    loop {
        match editor.readline(&format!("{} ", "you>".green())) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);
                match dispatcher.handle_message(user, line).await {
                    Ok(reply) => println!("{} {reply}", "agent>".blue()),
                    Err(e) => eprintln!("{} {e}", "error>".red()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("bye");
                break;
            }
            Err(e) => {
                return Err(ConciergeError::Internal(format!("shell input failed: {e}")));
            }
        }
    }
    Ok(())
}

/// Insert a handful of demo orders for local testing.
pub async fn seed(config: &ConciergeConfig) -> Result<(), ConciergeError> {
    let store = SqliteStore::open(&config.storage).await?;
    let demo = [
        ("ORD000003", "Beverages", 599.0),
        ("ORD000032", "Personal Care", 1651.0),
        ("ORD000123", "Electronics", 4999.0),
    ];
    for (id, category, value) in demo {
        let record = OrderRecord {
            order_id: id.parse()?,
            product_category: category.to_string(),
            order_value: value,
            refund_status: RefundStatus::NotRequested,
            refund_amount: None,
            refund_reason: None,
            refund_date: None,
        };
        if let Err(e) = store.insert_order(&record).await {
            info!(order_id = id, error = %e, "skipping existing demo order");
        }
    }
    println!("seeded {} demo orders", demo.len());
    Ok(())
}
