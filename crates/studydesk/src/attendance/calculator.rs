//! Attendance arithmetic around the 75% eligibility threshold.
//!
//! Pure and synchronous, no I/O. All threshold searches use integer
//! closed forms derived from `(attended + x) / (held + x) >= 3/4`, so
//! the results are exact and minimality/maximality holds without any
//! floating point tolerance.

use crate::api::types::Subject;

const THRESHOLD_NUM: u64 = 3;
const THRESHOLD_DEN: u64 = 4;

/// Attendance percentage. Returns `0` for zero classes held and is
/// deliberately not clamped above 100; inconsistent counters are
/// reported as-is and only clamped visually by display layers.
pub fn percentage(held: u32, attended: u32) -> f64 {
    if held == 0 {
        return 0.0;
    }
    (attended as f64 / held as f64) * 100.0
}

/// Smallest number of consecutive attended classes that lifts the
/// record to at least 75%. Zero when the record is already there.
///
/// Solving `(attended + x) / (held + x) >= 0.75` gives
/// `x >= 3*held - 4*attended`.
pub fn classes_needed_for_75(held: u32, attended: u32) -> u32 {
    if percentage(held, attended) >= 75.0 {
        return 0;
    }
    let needed = THRESHOLD_NUM as i64 * held as i64 - THRESHOLD_DEN as i64 * attended as i64;
    needed.max(0) as u32
}

/// Largest number of future classes that can be skipped while staying
/// at or above 75%. Zero when the record is already below the line.
///
/// Solving `attended / (held + x) >= 0.75` gives
/// `x <= attended/0.75 - held`, i.e. `floor(4*attended/3) - held`.
pub fn bunkable_for_75(held: u32, attended: u32) -> u32 {
    if percentage(held, attended) < 75.0 || attended == 0 {
        return 0;
    }
    let bunkable = (THRESHOLD_DEN as i64 * attended as i64) / THRESHOLD_NUM as i64 - held as i64;
    bunkable.max(0) as u32
}

/// Outcome of projecting the record over a known number of upcoming
/// classes.
#[derive(Debug, Clone, PartialEq)]
pub struct FutureProjection {
    /// Minimum number of the upcoming classes that must be attended to
    /// finish at or above 75% of the projected total. Not capped at
    /// `future_classes`; compare with `impossible`.
    pub needed: u32,
    /// Number of the upcoming classes that can be skipped while still
    /// finishing at or above 75%. Zero when the target is unreachable.
    pub bunkable: u32,
    /// True when even perfect attendance over the upcoming classes
    /// cannot reach 75%.
    pub impossible: bool,
    /// Final percentage when exactly `needed` upcoming classes are
    /// attended, or when all of them are in the impossible case.
    pub final_percentage: f64,
}

/// Projects attendance across `future_classes` additional occurrences.
/// The minimum total attendance for eligibility is
/// `ceil(0.75 * (held + future_classes))`, computed exactly as
/// `(3 * total + 3) / 4` in integer arithmetic.
pub fn project_future_attendance(held: u32, attended: u32, future_classes: u32) -> FutureProjection {
    let total = held as u64 + future_classes as u64;
    if total == 0 {
        return FutureProjection {
            needed: 0,
            bunkable: 0,
            impossible: false,
            final_percentage: 0.0,
        };
    }

    let min_total_attended = (THRESHOLD_NUM * total).div_ceil(THRESHOLD_DEN);
    let needed = min_total_attended.saturating_sub(attended as u64);
    let impossible = needed > future_classes as u64;

    let attended_final = attended as u64 + needed.min(future_classes as u64);
    let final_percentage = (attended_final as f64 / total as f64) * 100.0;

    FutureProjection {
        needed: needed as u32,
        bunkable: if impossible {
            0
        } else {
            (future_classes as u64 - needed) as u32
        },
        impossible,
        final_percentage,
    }
}

/// Aggregate percentage across all subjects, weighted by classes held.
pub fn overall_percentage(subjects: &[Subject]) -> f64 {
    let held: u32 = subjects.iter().map(|s| s.total_classes_held).sum();
    let attended: u32 = subjects.iter().map(|s| s.total_classes_attended).sum();
    percentage(held, attended)
}
