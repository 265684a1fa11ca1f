//! Integration tests for the event profiler
//!
//! # Test Coverage
//!
//! - Bare `set_time` records carry no reference
//! - `set_time_relative` durations against the linked event
//! - Last write wins, distinct tags do not interfere
//! - Wall-clock measurement with `MonotonicClock`
//! - A clock shared between profilers through `Arc`

use anyhow::Result;
use eprofiler::{
    declare_tags, unique_scope, Clock, MonotonicClock, Profiler, Resolver, TickClock,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

unique_scope!(Frame);

declare_tags! {
    static FRAME_TAGS: [Frame] = {
        TAG1 = "Tag1",
        TAG2 = "Tag2",
        TAG3 = "Tag3",
    };
}

fn frame_profiler(clock: TickClock) -> Result<Profiler<Frame, TickClock>> {
    let mut resolver = Resolver::new();
    resolver.declare(FRAME_TAGS);
    let layout = resolver.finalize()?;
    Ok(Profiler::new(&layout, clock)?)
}

#[test]
fn test_bare_set_time_has_no_duration() -> Result<()> {
    let mut profiler = frame_profiler(TickClock::new())?;

    profiler.set_time(&TAG1); // t = 0
    profiler.set_time(&TAG2); // t = 1
    profiler.set_time(&TAG3); // t = 2

    assert_eq!(profiler.get_duration(&TAG1), 0);
    assert_eq!(profiler.get_duration(&TAG2), 0);
    assert_eq!(profiler.get_duration(&TAG3), 0);
    assert_eq!(profiler.get_duration_between(&TAG1, &TAG3), 2);
    assert_eq!(profiler.clock().current(), 3);
    Ok(())
}

#[test]
fn test_relative_duration() -> Result<()> {
    let mut profiler = frame_profiler(TickClock::new())?;

    profiler.set_time(&TAG1); // t = 0
    profiler.set_time_relative(&TAG1, &TAG2); // t = 1
    profiler.set_time(&TAG3); // t = 2

    assert_eq!(profiler.get_duration(&TAG2), 1);
    assert_eq!(profiler.get_duration(&TAG3), 0);
    assert_eq!(profiler.reference(&TAG2), Some(profiler.get_id(&TAG1)));
    Ok(())
}

#[test]
fn test_relative_duration_tracks_reference_rewrites() -> Result<()> {
    let mut profiler = frame_profiler(TickClock::new())?;

    profiler.set_time(&TAG1); // t = 0
    profiler.set_time(&TAG3); // t = 1
    profiler.set_time_relative(&TAG1, &TAG2); // t = 2
    assert_eq!(profiler.get_duration(&TAG2), 2);

    // Durations are computed on read, so moving the reference moves them
    profiler.set_time(&TAG1); // t = 3
    assert_eq!(profiler.get_duration(&TAG2), -1);
    Ok(())
}

#[test]
fn test_last_write_wins() -> Result<()> {
    let mut profiler = frame_profiler(TickClock::with_value(10))?;

    profiler.set_time(&TAG1); // t = 10
    profiler.set_time(&TAG2); // t = 11
    profiler.set_time(&TAG1); // t = 12

    assert_eq!(profiler.time(&TAG1), 12);
    assert_eq!(profiler.time(&TAG2), 11);
    assert_eq!(profiler.time(&TAG3), 10); // never written, reads origin
    Ok(())
}

#[test]
fn test_get_time_is_writable() -> Result<()> {
    let mut profiler = frame_profiler(TickClock::new())?;

    *profiler.get_time(&TAG1) = 100;
    *profiler.get_time(&TAG2) = 250;

    assert_eq!(profiler.get_duration_between(&TAG1, &TAG2), 150);
    assert_eq!(profiler.get_duration_between(&TAG2, &TAG2), 0);
    Ok(())
}

#[test]
fn test_durations_report() -> Result<()> {
    let mut profiler = frame_profiler(TickClock::new().with_step(5))?;

    profiler.set_time(&TAG1); // t = 0
    profiler.set_time_relative(&TAG1, &TAG2); // t = 5
    profiler.set_time_relative(&TAG1, &TAG3); // t = 10

    let report: Vec<(&str, i64)> = profiler.durations().collect();
    assert_eq!(report, vec![("Tag1", 0), ("Tag2", 5), ("Tag3", 10)]);

    assert_eq!(profiler.keys(), &["Tag1", "Tag2", "Tag3"]);
    assert_eq!(profiler.len(), 3);
    assert_eq!(profiler.offset(), 0);
    Ok(())
}

#[test]
fn test_monotonic_clock_measures_sleep() -> Result<()> {
    unique_scope!(Wall);
    declare_tags! {
        static WALL_TAGS: [Wall] = { BEFORE = "before", AFTER = "after" };
    }

    let mut resolver = Resolver::new();
    resolver.declare(WALL_TAGS);
    let layout = resolver.finalize()?;
    let mut profiler: Profiler<Wall, MonotonicClock> =
        Profiler::new(&layout, MonotonicClock::new())?;

    profiler.set_time(&BEFORE);
    thread::sleep(Duration::from_millis(10));
    profiler.set_time_relative(&BEFORE, &AFTER);

    let elapsed = profiler.get_duration(&AFTER);
    assert!(elapsed >= Duration::from_millis(10), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(5), "elapsed {:?}", elapsed);
    assert_eq!(profiler.get_duration(&BEFORE), Duration::ZERO);
    Ok(())
}

#[test]
fn test_shared_clock_orders_events_across_profilers() -> Result<()> {
    unique_scope!(Input);
    unique_scope!(Render);
    declare_tags! {
        static INPUT_TAGS: [Input] = { POLL = "poll" };
    }
    declare_tags! {
        static RENDER_TAGS: [Render] = { PRESENT = "present" };
    }

    let mut resolver = Resolver::new();
    resolver.declare(INPUT_TAGS).declare(RENDER_TAGS);
    let layout = resolver.finalize()?;

    let clock = Arc::new(TickClock::new());
    let mut input: Profiler<Input, Arc<TickClock>> = Profiler::new(&layout, Arc::clone(&clock))?;
    let mut render: Profiler<Render, Arc<TickClock>> = Profiler::new(&layout, Arc::clone(&clock))?;

    input.set_time(&POLL);
    render.set_time(&PRESENT);

    assert!(input.time(&POLL) < render.time(&PRESENT));
    assert_eq!(clock.now(), 2);
    assert_ne!(input.offset(), render.offset());
    Ok(())
}
