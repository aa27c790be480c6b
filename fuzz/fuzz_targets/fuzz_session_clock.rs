#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use prepper_core::{
    format_remaining, remaining_at, SessionClock, SESSION_TIMEOUT_MS, WARNING_WINDOW_MS,
};

#[derive(Arbitrary, Debug)]
struct Input {
    stored: String,
    now_millis: i64,
}

fuzz_target!(|input: Input| {
    // Whatever another writer left in storage must not panic the loader
    let Some(clock) = SessionClock::parse(&input.stored) else {
        assert_eq!(remaining_at(None, input.now_millis), 0);
        return;
    };

    let remaining = clock.remaining(input.now_millis);
    assert!(remaining <= SESSION_TIMEOUT_MS);
    assert_eq!(
        remaining,
        remaining_at(Some(clock.start_epoch_millis), input.now_millis)
    );

    if clock.is_stale(input.now_millis) {
        assert_eq!(remaining, 0);
        assert!(clock.is_expired(input.now_millis));
    }
    if remaining <= WARNING_WINDOW_MS {
        assert!(clock.is_warning(input.now_millis));
    }

    // Deadlines from extreme stored values saturate instead of wrapping
    assert!(clock.expires_at() >= clock.warning_at());

    let formatted = format_remaining(remaining);
    assert!(formatted.ends_with('m'));
});
