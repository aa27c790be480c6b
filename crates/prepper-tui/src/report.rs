//! Plain-text output for the non-interactive subcommands

use prepper_core::{
    format_remaining, get_remaining, Clock, KeyValueStore, SessionClock, UserStats,
};

/// Lines printed by `prepper-tui status`
pub fn status_lines(store: &dyn KeyValueStore, clock: &dyn Clock) -> Vec<String> {
    let Some(session) = SessionClock::load(store) else {
        return vec!["No active session".to_string()];
    };

    let now = clock.now_millis();
    let mut lines = vec![format!(
        "Session: {}",
        format_remaining(get_remaining(store, clock))
    )];

    if session.is_stale(now) {
        lines.push("Expired; the next start signs out".to_string());
    } else if session.is_warning(now) {
        lines.push("Inside the expiry warning window".to_string());
    }

    let started = chrono::DateTime::from_timestamp_millis(session.start_epoch_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| session.start_epoch_millis.to_string());
    lines.push(format!("Idle since: {}", started));

    lines
}

/// Lines printed by `prepper-tui stats`
pub fn stats_lines(stats: &UserStats) -> Vec<String> {
    let mut lines = vec![
        format!("Total challenges: {}", stats.total_challenges),
        format!("  Interview: {}", stats.interview_challenges),
        format!("  Scenario:  {}", stats.scenario_challenges),
    ];

    if let Some((topic, count)) = stats.top_topic() {
        lines.push(format!("Top topic: {} ({})", topic, count));
    }

    lines.push("Difficulty:".to_string());
    for (level, count) in &stats.difficulty_breakdown {
        lines.push(format!("  {:<6} {}", level, count));
    }

    if !stats.recent_challenges.is_empty() {
        lines.push("Recent:".to_string());
        for challenge in &stats.recent_challenges {
            let title = challenge.title.as_deref().unwrap_or(&challenge.topic);
            let mut line = format!(
                "  #{} [{}] {} ({})",
                challenge.id, challenge.kind, title, challenge.difficulty
            );
            if let Some(created) = challenge.created_at() {
                line.push_str(&created.format(" %Y-%m-%d").to_string());
            }
            lines.push(line);
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use prepper_core::{ChallengeHistory, ManualClock, MemoryStore, SESSION_STORAGE_KEY};
    use rstest::rstest;

    const START: i64 = 1_700_000_000_000;
    const MINUTE: i64 = 60_000;

    #[test]
    fn test_status_without_session() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(START);
        assert_eq!(status_lines(&store, &clock), vec!["No active session"]);
    }

    #[rstest]
    #[case(MINUTE, "Session: 14m", None)]
    #[case(14 * MINUTE, "Session: 1m", Some("Inside the expiry warning window"))]
    #[case(20 * MINUTE, "Session: 0m", Some("Expired; the next start signs out"))]
    fn test_status_lines(
        #[case] elapsed: i64,
        #[case] first: &str,
        #[case] note: Option<&str>,
    ) {
        let store = MemoryStore::new();
        store.set(SESSION_STORAGE_KEY, &START.to_string()).unwrap();
        let clock = ManualClock::new(START + elapsed);

        let lines = status_lines(&store, &clock);
        assert_eq!(lines[0], first);
        match note {
            Some(note) => assert_eq!(lines[1], note),
            None => assert!(lines[1].starts_with("Idle since: 2023-11-14")),
        }
    }

    #[test]
    fn test_stats_lines() {
        let history = ChallengeHistory::from_json(
            r#"{"challenges": [
                {"id": 2, "type": "scenario", "topic": "MLOps", "difficulty": "Hard", "title": "Drift", "date_created": "2025-03-02T10:00:00"},
                {"id": 1, "type": "interview", "topic": "CNNs", "difficulty": "Easy"}
            ], "total_count": 2, "interview_count": 1, "scenario_count": 1}"#,
        )
        .unwrap();

        let lines = stats_lines(&UserStats::from_history(&history));
        assert_eq!(lines[0], "Total challenges: 2");
        assert!(lines.contains(&"Top topic: CNNs (1)".to_string()));
        assert!(lines.contains(&"  #2 [scenario] Drift (Hard) 2025-03-02".to_string()));
        assert!(lines.contains(&"  #1 [interview] CNNs (Easy)".to_string()));
    }
}
