// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for config loading, defaults, and strictness.

use concierge_config::{load_and_validate_str, load_config_from_str, ConfigError};

#[test]
fn empty_config_yields_all_defaults() {
    let config = load_config_from_str("").unwrap();
    assert_eq!(config.agent.name, "concierge");
    assert_eq!(config.agent.log_level, "info");
    assert_eq!(config.worker.invoke_timeout_secs, 30);
    assert_eq!(config.session.gap_hours, 24);
    assert_eq!(config.session.history_limit, 20);
    assert_eq!(config.refund.shipping_fee_rate, 0.05);
    assert!(config
        .refund
        .non_refundable_categories
        .iter()
        .any(|c| c == "Beverages"));
}

#[test]
fn sections_override_defaults() {
    let toml = r#"
[agent]
name = "support-bot"
log_level = "debug"

[worker]
command = "python3"
args = ["worker/main.py"]
invoke_timeout_secs = 10

[refund]
non_refundable_categories = ["Beverages"]
shipping_fee_rate = 0.10

[session]
gap_hours = 12
"#;
    let config = load_config_from_str(toml).unwrap();
    assert_eq!(config.agent.name, "support-bot");
    assert_eq!(config.worker.command, "python3");
    assert_eq!(config.worker.args, vec!["worker/main.py"]);
    assert_eq!(config.worker.invoke_timeout_secs, 10);
    assert_eq!(config.refund.non_refundable_categories, vec!["Beverages"]);
    assert_eq!(config.refund.shipping_fee_rate, 0.10);
    assert_eq!(config.session.gap_hours, 12);
    // Untouched sections keep defaults.
    assert_eq!(config.groq.max_tokens, 1024);
}

#[test]
fn unknown_keys_are_rejected() {
    let toml = r#"
[agent]
name = "x"
bogus_key = true
"#;
    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[telepathy]
enabled = true
"#;
    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn validation_errors_surface_through_load_and_validate() {
    let toml = r#"
[refund]
shipping_fee_rate = 2.0
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("shipping_fee_rate"))
    ));
}

#[test]
fn default_config_passes_validation() {
    let config = load_and_validate_str("").unwrap();
    assert_eq!(config.worker.command, "concierge-worker");
}
