//! Due-date estimate heuristic.
//!
//! Cards carry no point estimate of their own, so one is derived from how
//! far away the due date is: the closer the deadline, the smaller the
//! story is assumed to be. The heuristic is a pure function of the due date
//! and an injected "now".

use super::Estimate;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// How the day gap between "now" and a due date is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatePolicy {
    /// Whole days elapsed between the two instants, rounded toward zero.
    #[default]
    ElapsedDays,
    /// Difference of the day-of-month numbers only, ignoring month and
    /// year. Kept for parity with boards synced by earlier deployments.
    DayOfMonth,
}

impl EstimatePolicy {
    /// Returns the day gap from `now` to `due` under this policy.
    #[must_use]
    pub fn delta_days(self, due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        match self {
            Self::ElapsedDays => (due - now).num_days(),
            Self::DayOfMonth => i64::from(due.day()) - i64::from(now.day()),
        }
    }
}

/// Maps a day gap onto the estimate scale.
///
/// Defined for every `i64`: overdue and same-day gaps yield zero points.
#[must_use]
pub const fn estimate_for_delta(delta_days: i64) -> Estimate {
    match delta_days {
        i64::MIN..=1 => Estimate::ZERO,
        2 => Estimate::ONE,
        3 | 4 => Estimate::TWO,
        _ => Estimate::THREE,
    }
}

/// Derives an estimate from an optional due date.
///
/// Cards without a due date are estimated at zero points.
#[must_use]
pub fn estimate_from_due(
    due: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    policy: EstimatePolicy,
) -> Estimate {
    due.map_or(Estimate::ZERO, |due_at| {
        estimate_for_delta(policy.delta_days(due_at, now))
    })
}
