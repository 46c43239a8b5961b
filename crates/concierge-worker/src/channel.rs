// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A single child worker process speaking the NDJSON protocol.
//!
//! One channel owns one child. Concurrent invokes are multiplexed over the
//! same stdin/stdout pair by correlation id: each invoke registers a oneshot
//! under its id, a background reader task routes response frames to the
//! matching sender. If the child exits, every pending invoke fails with a
//! `Transport` error and the channel is marked dead; respawning is the
//! manager's job, not the channel's.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use concierge_config::model::WorkerConfig;
use concierge_core::ConciergeError;

use crate::protocol::{ReadyFrame, WireRequest, WireResponse};

type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<serde_json::Value, ConciergeError>>>>>;

pub struct WorkerChannel {
    command: String,
    next_id: AtomicU64,
    pending: PendingMap,
    stdin: tokio::sync::Mutex<ChildStdin>,
    child: Mutex<Option<Child>>,
    alive: Arc<AtomicBool>,
    invoke_timeout: Duration,
}

impl std::fmt::Debug for WorkerChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerChannel")
            .field("command", &self.command)
            .field("alive", &self.is_alive())
            .field("invoke_timeout", &self.invoke_timeout)
            .finish_non_exhaustive()
    }
}

impl WorkerChannel {
    /// Spawn the configured worker command and wait for its ready frame.
    ///
    /// The child is created with piped stdin/stdout and `kill_on_drop`, so an
    /// abandoned channel does not leak a process. Fails with `Transport` if
    /// the command cannot be spawned, `Protocol` if the first stdout line is
    /// not `{"event":"ready"}`, and `Timeout` if no line arrives within
    /// `worker.handshake_timeout_secs`.
    pub async fn spawn(config: &WorkerConfig) -> Result<Arc<Self>, ConciergeError> {
        let mut child = Command::new(&config.command)
            .args(&config.args)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ConciergeError::transport(
                    format!("failed to spawn worker command {:?}", config.command),
                    e,
                )
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ConciergeError::Protocol {
                message: "worker stdin was not captured".to_string(),
            })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ConciergeError::Protocol {
                message: "worker stdout was not captured".to_string(),
            })?;
        let stderr = child.stderr.take();

        let mut lines = BufReader::new(stdout).lines();

        let handshake = Duration::from_secs(config.handshake_timeout_secs);
        let first_line = tokio::time::timeout(handshake, lines.next_line())
            .await
            .map_err(|_| ConciergeError::Timeout {
                duration: handshake,
            })?
            .map_err(|e| ConciergeError::transport("failed reading worker handshake", e))?
            .ok_or_else(|| ConciergeError::Protocol {
                message: "worker exited before sending ready frame".to_string(),
            })?;

        let ready: ReadyFrame =
            serde_json::from_str(&first_line).map_err(|_| ConciergeError::Protocol {
                message: format!("expected ready frame, got: {first_line}"),
            })?;
        if !ready.is_ready() {
            return Err(ConciergeError::Protocol {
                message: format!("unexpected handshake event: {}", ready.event),
            });
        }

        debug!(command = %config.command, "worker ready");

        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let alive = Arc::new(AtomicBool::new(true));

        // Forward worker stderr lines into our log stream.
        if let Some(stderr) = stderr {
            let command = config.command.clone();
            tokio::spawn(async move {
                let mut err_lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = err_lines.next_line().await {
                    warn!(worker = %command, "{line}");
                }
            });
        }

        // Reader task: route response frames to pending invokes until EOF.
        {
            let pending = Arc::clone(&pending);
            let alive = Arc::clone(&alive);
            tokio::spawn(async move {
                loop {
                    match lines.next_line().await {
                        Ok(Some(line)) => route_response(&pending, &line),
                        Ok(None) => break,
                        Err(e) => {
                            warn!(error = %e, "worker stdout read failed");
                            break;
                        }
                    }
                }
                alive.store(false, Ordering::SeqCst);
                fail_all_pending(&pending);
            });
        }

        Ok(Arc::new(Self {
            command: config.command.clone(),
            next_id: AtomicU64::new(1),
            pending,
            stdin: tokio::sync::Mutex::new(stdin),
            child: Mutex::new(Some(child)),
            alive,
            invoke_timeout: Duration::from_secs(config.invoke_timeout_secs),
        }))
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Send one tool invocation and await its correlated response.
    ///
    /// A fresh id is assigned per call; a late or duplicate response for an
    /// id with no waiter is logged and dropped. Timing out removes the
    /// pending entry so the eventual response (if any) is discarded rather
    /// than delivered to a later call.
    pub async fn invoke(
        &self,
        tool_name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ConciergeError> {
        if !self.is_alive() {
            return Err(ConciergeError::Transport {
                message: "worker process has exited".to_string(),
                source: None,
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            pending.insert(id, tx);
        }

        let request = WireRequest {
            id,
            tool_name: tool_name.to_string(),
            arguments,
        };
        let mut line = serde_json::to_string(&request).map_err(|e| {
            ConciergeError::Internal(format!("failed to encode request frame: {e}"))
        })?;
        line.push('\n');

        {
            let mut stdin = self.stdin.lock().await;
            if let Err(e) = stdin.write_all(line.as_bytes()).await {
                self.remove_pending(id);
                self.alive.store(false, Ordering::SeqCst);
                return Err(ConciergeError::transport("failed writing to worker stdin", e));
            }
            if let Err(e) = stdin.flush().await {
                self.remove_pending(id);
                self.alive.store(false, Ordering::SeqCst);
                return Err(ConciergeError::transport("failed flushing worker stdin", e));
            }
        }

        debug!(id, tool = tool_name, "worker request sent");

        match tokio::time::timeout(self.invoke_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(ConciergeError::Transport {
                message: "worker exited while request was in flight".to_string(),
                source: None,
            }),
            Err(_) => {
                self.remove_pending(id);
                Err(ConciergeError::Timeout {
                    duration: self.invoke_timeout,
                })
            }
        }
    }

    /// Kill the child and fail any in-flight invokes.
    pub async fn close(&self) {
        self.alive.store(false, Ordering::SeqCst);
        let child = {
            let mut slot = self.child.lock().unwrap_or_else(|e| e.into_inner());
            slot.take()
        };
        if let Some(mut child) = child {
            if let Err(e) = child.kill().await {
                warn!(error = %e, "failed to kill worker process");
            }
        }
        fail_all_pending(&self.pending);
    }

    fn remove_pending(&self, id: u64) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.remove(&id);
    }
}

/// Parse one stdout line and deliver it to the waiting invoke, if any.
fn route_response(pending: &PendingMap, line: &str) {
    let frame: WireResponse = match serde_json::from_str(line) {
        Ok(frame) => frame,
        Err(e) => {
            deliver_malformed(pending, line, &e);
            return;
        }
    };

    let sender = {
        let mut pending = pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.remove(&frame.id)
    };
    let Some(sender) = sender else {
        debug!(id = frame.id, "dropping response with no waiter");
        return;
    };

    let outcome = match (frame.result, frame.error) {
        (Some(result), None) => Ok(result),
        (None, Some(err)) => Err(map_wire_error(err.kind.as_str(), err.message)),
        _ => Err(ConciergeError::Protocol {
            message: format!(
                "response frame {} must carry exactly one of result/error",
                frame.id
            ),
        }),
    };
    // Receiver may have timed out already; nothing to do then.
    let _ = sender.send(outcome);
}

/// A frame that is not a valid response may still carry a usable id (for
/// example an `error` field of the wrong shape). Fail that waiter with a
/// `Protocol` error right away instead of letting it run out its timeout;
/// only a line with no recoverable id is logged and dropped.
fn deliver_malformed(pending: &PendingMap, line: &str, cause: &serde_json::Error) {
    let id = serde_json::from_str::<serde_json::Value>(line)
        .ok()
        .and_then(|value| value.get("id").and_then(serde_json::Value::as_u64));
    let Some(id) = id else {
        warn!(error = %cause, line, "discarding unparseable worker frame");
        return;
    };

    let sender = {
        let mut pending = pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.remove(&id)
    };
    let Some(sender) = sender else {
        warn!(error = %cause, id, line, "dropping malformed frame with no waiter");
        return;
    };
    let _ = sender.send(Err(ConciergeError::Protocol {
        message: format!("malformed response frame for id {id}: {cause}"),
    }));
}

fn map_wire_error(kind: &str, message: String) -> ConciergeError {
    match kind {
        "not_found" => ConciergeError::NotFound { resource: message },
        "invalid_params" => ConciergeError::Validation { message },
        other => ConciergeError::Internal(format!("worker error ({other}): {message}")),
    }
}

fn fail_all_pending(pending: &PendingMap) {
    let drained: Vec<_> = {
        let mut pending = pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.drain().collect()
    };
    for (_, sender) in drained {
        let _ = sender.send(Err(ConciergeError::Transport {
            message: "worker process exited".to_string(),
            source: None,
        }));
    }
}
