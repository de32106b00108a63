//! crates/study_tracker_core/src/analytics.rs
//!
//! Read-only summaries derived from the in-memory practice sessions.
//!
//! Every function here is pure: it never mutates its input, never fails, and
//! returns zero-valued aggregates for empty input. Stored values are taken as
//! they are; nothing checks that `questions_solved <= questions_target` or
//! that accuracy lies in 0..=100.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::week_floor;
use crate::domain::{PracticeSession, Subject, Target};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub questions_total: u64,
    /// Minutes.
    pub time_total: u64,
    pub sessions_count: u32,
}

impl Totals {
    fn add(mut self, session: &PracticeSession) -> Self {
        self.questions_total += u64::from(session.questions_solved);
        self.time_total += u64::from(session.time_spent);
        self.sessions_count += 1;
        self
    }

    fn of<'a>(sessions: impl Iterator<Item = &'a PracticeSession>) -> Self {
        sessions.fold(Totals::default(), Totals::add)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SubjectTotals {
    pub subject: Subject,
    pub totals: Totals,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SubjectAccuracy {
    pub subject: Subject,
    pub average_accuracy: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub date: NaiveDate,
    pub today: Totals,
    pub week: Totals,
    pub overall: Totals,
    pub per_subject: Vec<SubjectTotals>,
    pub average_accuracy: Option<f64>,
    pub subject_accuracy: Vec<SubjectAccuracy>,
    pub streak_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TargetProgress {
    pub target: Target,
    pub questions_done: u64,
    pub time_done: u64,
    /// Capped at 100.
    pub questions_percent: f64,
    /// Capped at 100.
    pub time_percent: f64,
    pub achieved: bool,
}

/// Sessions dated exactly `today`.
pub fn today_totals(sessions: &[PracticeSession], today: NaiveDate) -> Totals {
    Totals::of(sessions.iter().filter(|s| s.date == today))
}

/// Sessions dated on or after `today - 7 days`.
pub fn week_totals(sessions: &[PracticeSession], today: NaiveDate) -> Totals {
    let floor = week_floor(today);
    Totals::of(sessions.iter().filter(|s| s.date >= floor))
}

pub fn overall_totals(sessions: &[PracticeSession]) -> Totals {
    Totals::of(sessions.iter())
}

/// One entry per subject, in `Subject::ALL` order, including empty subjects.
pub fn per_subject(sessions: &[PracticeSession]) -> Vec<SubjectTotals> {
    Subject::ALL
        .iter()
        .map(|&subject| SubjectTotals {
            subject,
            totals: Totals::of(sessions.iter().filter(|s| s.subject == subject)),
        })
        .collect()
}

/// Mean accuracy over the sessions that recorded one. Sessions without an
/// accuracy are excluded from both the sum and the count.
pub fn average_accuracy<'a>(sessions: impl IntoIterator<Item = &'a PracticeSession>) -> Option<f64> {
    let (sum, count) = sessions
        .into_iter()
        .filter_map(|s| s.accuracy_percentage)
        .fold((0.0_f64, 0_u32), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / f64::from(count))
}

pub fn subject_accuracy(sessions: &[PracticeSession]) -> Vec<SubjectAccuracy> {
    Subject::ALL
        .iter()
        .map(|&subject| SubjectAccuracy {
            subject,
            average_accuracy: average_accuracy(sessions.iter().filter(|s| s.subject == subject)),
        })
        .collect()
}

/// Consecutive practice days ending today. A streak that ended yesterday still
/// counts, since today may simply not be logged yet.
pub fn practice_streak(sessions: &[PracticeSession], today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = sessions.iter().map(|s| s.date).collect();

    let mut cursor = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}

pub fn summary(sessions: &[PracticeSession], today: NaiveDate) -> AnalyticsSummary {
    AnalyticsSummary {
        date: today,
        today: today_totals(sessions, today),
        week: week_totals(sessions, today),
        overall: overall_totals(sessions),
        per_subject: per_subject(sessions),
        average_accuracy: average_accuracy(sessions),
        subject_accuracy: subject_accuracy(sessions),
        streak_days: practice_streak(sessions, today),
    }
}

/// Progress of every target active on `today`, counting the sessions inside the
/// target's date range and subject scope.
pub fn target_progress(
    targets: &[Target],
    sessions: &[PracticeSession],
    today: NaiveDate,
) -> Vec<TargetProgress> {
    targets
        .iter()
        .filter(|t| t.is_active(today))
        .map(|target| {
            let done = Totals::of(sessions.iter().filter(|s| {
                target.start_date <= s.date
                    && s.date <= target.end_date
                    && target.subject.includes(s.subject)
            }));
            let questions_percent = percent(done.questions_total, target.questions_goal);
            let time_percent = percent(done.time_total, target.time_goal);
            TargetProgress {
                target: target.clone(),
                questions_done: done.questions_total,
                time_done: done.time_total,
                questions_percent,
                time_percent,
                achieved: done.questions_total >= u64::from(target.questions_goal)
                    && done.time_total >= u64::from(target.time_goal),
            }
        })
        .collect()
}

fn percent(done: u64, goal: u32) -> f64 {
    if goal == 0 {
        return 100.0;
    }
    (done as f64 / f64::from(goal) * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewSession, NewTarget, PracticeSource, SubjectScope, TargetType};
    use chrono::Utc;
    use uuid::Uuid;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn session(date: &str, subject: Subject, solved: u32, minutes: u32) -> PracticeSession {
        NewSession {
            date: day(date),
            subject,
            chapter_name: "Mechanics".to_string(),
            source: PracticeSource::Module,
            source_details: None,
            questions_target: 0,
            questions_solved: solved,
            time_spent: minutes,
            difficulty: None,
            accuracy_percentage: None,
            notes: None,
        }
        .into_session(Uuid::nil(), Utc::now())
    }

    fn with_accuracy(mut s: PracticeSession, accuracy: f64) -> PracticeSession {
        s.accuracy_percentage = Some(accuracy);
        s
    }

    #[test]
    fn empty_input_yields_zeroes() {
        let today = day("2024-03-10");
        let none: Vec<PracticeSession> = Vec::new();
        assert_eq!(today_totals(&none, today), Totals::default());
        assert_eq!(week_totals(&none, today), Totals::default());
        assert_eq!(average_accuracy(&none), None);
        assert_eq!(practice_streak(&none, today), 0);
        assert!(per_subject(&none).iter().all(|s| s.totals == Totals::default()));
    }

    #[test]
    fn today_counts_only_that_date() {
        let sessions = vec![session("2024-03-10", Subject::Physics, 10, 30)];

        let on_day = today_totals(&sessions, day("2024-03-10"));
        assert_eq!(
            on_day,
            Totals {
                questions_total: 10,
                time_total: 30,
                sessions_count: 1
            }
        );
        assert_eq!(today_totals(&sessions, day("2024-03-11")), Totals::default());
    }

    #[test]
    fn week_has_closed_lower_bound() {
        let sessions = vec![
            session("2024-03-03", Subject::Physics, 1, 1),
            session("2024-03-02", Subject::Physics, 100, 100),
            session("2024-03-10", Subject::Chemistry, 2, 2),
        ];
        let week = week_totals(&sessions, day("2024-03-10"));
        assert_eq!(week.questions_total, 3);
        assert_eq!(week.sessions_count, 2);

        let floor = week_floor(day("2024-03-10"));
        assert_eq!(floor, day("2024-03-03"));
        let edge = vec![session("2024-03-03", Subject::Physics, 4, 4)];
        assert_eq!(week_totals(&edge, day("2024-03-10")).questions_total, 4);
        assert_eq!(week_totals(&edge, day("2024-03-11")), Totals::default());
    }

    #[test]
    fn subject_parts_sum_to_whole() {
        let sessions = vec![
            session("2024-03-01", Subject::Physics, 10, 30),
            session("2024-03-02", Subject::Chemistry, 7, 20),
            session("2024-03-02", Subject::Mathematics, 5, 15),
            session("2024-03-03", Subject::Biology, 3, 9),
            session("2024-03-04", Subject::Physics, 1, 2),
        ];
        let parts = per_subject(&sessions);
        let whole = overall_totals(&sessions);

        assert_eq!(parts.len(), Subject::ALL.len());
        assert_eq!(parts.iter().map(|p| p.totals.questions_total).sum::<u64>(), whole.questions_total);
        assert_eq!(parts.iter().map(|p| p.totals.time_total).sum::<u64>(), whole.time_total);
        assert_eq!(parts.iter().map(|p| p.totals.sessions_count).sum::<u32>(), whole.sessions_count);
    }

    #[test]
    fn accuracy_average_skips_missing_values() {
        let sessions = vec![
            with_accuracy(session("2024-03-01", Subject::Physics, 1, 1), 80.0),
            session("2024-03-01", Subject::Physics, 1, 1),
            with_accuracy(session("2024-03-01", Subject::Chemistry, 1, 1), 60.0),
        ];
        assert_eq!(average_accuracy(&sessions), Some(70.0));

        let by_subject = subject_accuracy(&sessions);
        assert_eq!(by_subject[0].average_accuracy, Some(80.0));
        assert_eq!(by_subject[1].average_accuracy, Some(60.0));
        assert_eq!(by_subject[2].average_accuracy, None);
    }

    #[test]
    fn streak_counts_back_from_today_or_yesterday() {
        let sessions = vec![
            session("2024-03-07", Subject::Physics, 1, 1),
            session("2024-03-08", Subject::Physics, 1, 1),
            session("2024-03-09", Subject::Physics, 1, 1),
            session("2024-03-09", Subject::Biology, 1, 1),
            session("2024-03-05", Subject::Physics, 1, 1),
        ];
        assert_eq!(practice_streak(&sessions, day("2024-03-09")), 3);
        assert_eq!(practice_streak(&sessions, day("2024-03-10")), 3);
        assert_eq!(practice_streak(&sessions, day("2024-03-11")), 0);
    }

    #[test]
    fn target_progress_respects_range_and_scope() {
        let target = NewTarget {
            target_type: TargetType::Weekly,
            subject: SubjectScope::Only(Subject::Physics),
            questions_goal: 20,
            time_goal: 60,
            start_date: day("2024-03-04"),
            end_date: day("2024-03-10"),
        }
        .into_target(Uuid::nil(), Utc::now());
        let expired = NewTarget {
            target_type: TargetType::Weekly,
            subject: SubjectScope::All,
            questions_goal: 1,
            time_goal: 1,
            start_date: day("2024-02-01"),
            end_date: day("2024-02-07"),
        }
        .into_target(Uuid::nil(), Utc::now());

        let sessions = vec![
            session("2024-03-05", Subject::Physics, 15, 40),
            session("2024-03-06", Subject::Physics, 10, 40),
            session("2024-03-06", Subject::Chemistry, 50, 50),
            session("2024-03-01", Subject::Physics, 50, 50),
        ];

        let progress = target_progress(&[target, expired], &sessions, day("2024-03-08"));
        assert_eq!(progress.len(), 1);
        let p = &progress[0];
        assert_eq!((p.questions_done, p.time_done), (25, 80));
        assert_eq!(p.questions_percent, 100.0);
        assert_eq!(p.time_percent, 100.0);
        assert!(p.achieved);
    }
}
