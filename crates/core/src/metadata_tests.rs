// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn equality_ignores_key_order() {
    let a = Metadata::new(json!({"entrypoint": "main.py", "scheduler": {"trigger": "interval", "seconds": 60}}));
    let b = Metadata::new(json!({"scheduler": {"seconds": 60, "trigger": "interval"}, "entrypoint": "main.py"}));
    assert_eq!(a, b);
}

#[test]
fn content_change_is_detected() {
    let a = Metadata::new(json!({"scheduler": {"trigger": "interval", "seconds": 60}}));
    let b = Metadata::new(json!({"scheduler": {"trigger": "interval", "seconds": 90}}));
    assert_ne!(a, b);
}

#[test]
fn entrypoint_accessor() {
    let with = Metadata::new(json!({"entrypoint": "run.sh"}));
    let without = Metadata::new(json!({"scheduler": {}}));
    assert_eq!(with.entrypoint(), Some("run.sh"));
    assert_eq!(without.entrypoint(), None);
}
