#![no_main]

use libfuzzer_sys::fuzz_target;
use prepper_core::history::RECENT_CHALLENGE_LIMIT;
use prepper_core::{ChallengeHistory, UserStats};

fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };

    // Malformed payloads are errors, never panics
    if let Ok(history) = ChallengeHistory::from_json(body) {
        let stats = UserStats::from_history(&history);

        assert!(stats.recent_challenges.len() <= RECENT_CHALLENGE_LIMIT);
        assert_eq!(
            stats.topic_breakdown.values().sum::<u64>(),
            history.challenges.len() as u64
        );
        assert!(
            stats.difficulty_breakdown.values().sum::<u64>() <= history.challenges.len() as u64
        );

        for challenge in &history.challenges {
            let _ = challenge.created_at();
        }
    }
});
