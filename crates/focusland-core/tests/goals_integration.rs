//! Integration tests for goal, streak and achievement queries over a SQLite store.

use chrono::{Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use focusland_core::{
    AchievementTracker, AggregateStats, DailyGoal, FocusSession, GoalAnalyzer, GoalStatus,
    RestDayPolicy, SessionDatabase, SessionStore, TimerConfiguration,
};

// March 2026: Sunday 1st, Monday 2nd.
fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn seed(db: &SessionDatabase, day: u32, hour: u32, pomodoros: u32) {
    for i in 0..pomodoros {
        let at = Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap() + Duration::minutes(30 * i as i64);
        db.append(&FocusSession::completed(25, at)).unwrap();
    }
}

fn config() -> TimerConfiguration {
    TimerConfiguration {
        daily_goal: DailyGoal::Pomodoros(4),
        ..Default::default()
    }
}

#[test]
fn day_bounds_select_exactly_one_local_day() {
    let db = SessionDatabase::open_memory().unwrap();
    // UTC+9: 14:59 UTC is still the 2nd locally, 15:00 UTC is the 3rd.
    db.append(&FocusSession::completed(25, Utc.with_ymd_and_hms(2026, 3, 2, 14, 59, 0).unwrap()))
        .unwrap();
    db.append(&FocusSession::completed(25, Utc.with_ymd_and_hms(2026, 3, 2, 15, 0, 0).unwrap()))
        .unwrap();

    let cfg = config();
    let tz = FixedOffset::east_opt(9 * 3600).unwrap();
    let analyzer = GoalAnalyzer::with_timezone(&cfg, tz);

    let (start, end) = analyzer.day_bounds(date(3));
    let day = db.query_range(start, end).unwrap();
    assert_eq!(day.len(), 1);
    assert_eq!(analyzer.goal_for(date(3), &day).completed_minutes, 25);
    assert_eq!(analyzer.goal_for(date(2), &db.all().unwrap()).completed_minutes, 25);
}

#[test]
fn work_week_feeds_goals_streaks_and_achievements() {
    let db = SessionDatabase::open_memory().unwrap();
    seed(&db, 2, 9, 4); // Mon: met
    seed(&db, 3, 9, 4); // Tue: met
    seed(&db, 4, 9, 4); // Wed: met
    seed(&db, 5, 9, 2); // Thu: behind
    seed(&db, 7, 9, 6); // Sat: rest day, still counts toward hours

    let cfg = config();
    let analyzer = GoalAnalyzer::with_timezone(&cfg, Utc);
    let sessions = db.all().unwrap();

    let week = analyzer.week(date(7), &sessions);
    let statuses: Vec<_> = week.iter().map(|g| g.status()).collect();
    assert_eq!(
        statuses,
        vec![
            GoalStatus::Rest,
            GoalStatus::Met,
            GoalStatus::Met,
            GoalStatus::Met,
            GoalStatus::Behind,
            GoalStatus::Behind,
            GoalStatus::Rest,
        ]
    );

    assert_eq!(analyzer.current_streak(date(5), &sessions), 3);
    assert_eq!(analyzer.current_streak(date(6), &sessions), 0);
    assert_eq!(analyzer.longest_streak(&sessions), 3);

    let stats = AggregateStats::collect(&analyzer, date(5), &sessions);
    assert_eq!(stats.total_completed_sessions, 20);
    assert!((stats.total_completed_hours - 500.0 / 60.0).abs() < 1e-9);
    assert_eq!(stats.goals_met_count, 3);

    let tracker = AchievementTracker::new();
    let first = tracker.evaluate(&stats);
    // Recomputing from the same history gives the same answer.
    assert_eq!(first, tracker.evaluate(&stats));
    let unlocked: Vec<_> = tracker.unlocked(&stats).iter().map(|s| s.achievement.id).collect();
    assert_eq!(unlocked, vec!["streak3", "sessions10"]);

    // Wiping the history re-locks everything.
    assert_eq!(db.delete_all().unwrap(), 20);
    let empty = AggregateStats::collect(&analyzer, date(5), &db.all().unwrap());
    assert!(tracker.unlocked(&empty).is_empty());
}

#[test]
fn rest_day_policy_decides_monday_morning() {
    let db = SessionDatabase::open_memory().unwrap();
    seed(&db, 5, 9, 4);
    seed(&db, 6, 9, 4);
    let sessions = db.all().unwrap();

    let bridge = config();
    let strict = TimerConfiguration {
        rest_day_policy: RestDayPolicy::Break,
        ..config()
    };

    let monday = date(9);
    assert_eq!(
        GoalAnalyzer::with_timezone(&bridge, Utc).current_streak(monday, &sessions),
        2
    );
    assert_eq!(
        GoalAnalyzer::with_timezone(&strict, Utc).current_streak(monday, &sessions),
        0
    );
}
