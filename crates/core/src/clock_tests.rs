// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_stands_still_until_advanced() {
    let clock = FakeClock::new();
    let t0 = clock.now_utc();
    assert_eq!(clock.now_utc(), t0);

    clock.advance(Duration::from_secs(90));
    assert_eq!(clock.now_utc(), t0 + chrono::Duration::seconds(90));
}

#[test]
fn fake_clock_instant_tracks_wall_clock() {
    let clock = FakeClock::new();
    let i0 = clock.now();
    clock.advance(Duration::from_secs(10));
    assert_eq!(clock.now() - i0, Duration::from_secs(10));
}

#[test]
fn clones_share_the_same_timeline() {
    let clock = FakeClock::new();
    let other = clock.clone();
    clock.advance(Duration::from_secs(5));
    assert_eq!(other.now_utc(), clock.now_utc());
}
