// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_returns_nonzero_time() {
    let clock = SystemClock;
    assert!(clock.epoch_ms() > 0);
}

#[test]
fn system_clock_seconds_derive_from_millis() {
    let clock = SystemClock;
    let ms = clock.epoch_ms();
    assert!(clock.epoch_secs() >= ms / 1000);
}

#[test]
fn fake_clock_can_be_advanced() {
    let clock = FakeClock::at(5_000);
    clock.advance_ms(60_000);
    assert_eq!(clock.epoch_ms(), 65_000);
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::at(1_000);
    let clock2 = clock1.clone();
    clock2.advance_ms(30_000);
    assert_eq!(clock1.epoch_ms(), 31_000);
}

#[test]
fn fake_clock_set() {
    let clock = FakeClock::default();
    clock.set_epoch_ms(42);
    assert_eq!(clock.epoch_ms(), 42);
    assert_eq!(clock.epoch_secs(), 0);
}
