// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    default = { "localhost", &["localhost:8484"] },
    explicit_port = { "farm1:9000", &["farm1:9000"] },
    mixed = { "farm1,farm2:9000", &["farm1:8484", "farm2:9000"] },
    spaced = { " farm1 , farm2 ", &["farm1:8484", "farm2:8484"] },
)]
fn hosts_are_normalized(raw: &str, expect: &[&str]) {
    assert_eq!(normalize_hosts(raw), expect);
}

#[test]
fn empty_entries_are_dropped() {
    assert_eq!(normalize_hosts("farm1,,"), vec!["farm1:8484"]);
    assert!(normalize_hosts("").is_empty());
    assert!(normalize_hosts(" , ").is_empty());
}

#[test]
fn poll_errors_read_like_operator_messages() {
    let err = PollError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.to_string(), "supervisor answered 500 Internal Server Error");
}
