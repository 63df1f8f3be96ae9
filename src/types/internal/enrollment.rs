use crate::errors::internal::EnrollmentError;
use crate::types::db::enrollment;
use crate::types::internal::course::Course;

pub const MAX_PROGRESS: i32 = 100;

/// Lifecycle of an enrollment
///
/// `Active` holds progress strictly below 100; reaching 100 is `Completed`.
/// Moving progress back below 100 returns to `Active`, so the stored pair
/// (progress, completed) always satisfies `progress == 100 <=> completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentState {
    Active { progress: i32 },
    Completed,
}

impl EnrollmentState {
    /// Fresh enrollment
    pub fn new() -> Self {
        EnrollmentState::Active { progress: 0 }
    }

    /// State for an explicit progress value, rejecting anything outside 0..=100
    pub fn with_progress(progress: i32) -> Result<Self, EnrollmentError> {
        if !(0..=MAX_PROGRESS).contains(&progress) {
            return Err(EnrollmentError::ProgressOutOfRange { progress });
        }
        if progress == MAX_PROGRESS {
            Ok(EnrollmentState::Completed)
        } else {
            Ok(EnrollmentState::Active { progress })
        }
    }

    pub fn progress(&self) -> i32 {
        match self {
            EnrollmentState::Active { progress } => *progress,
            EnrollmentState::Completed => MAX_PROGRESS,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, EnrollmentState::Completed)
    }
}

impl Default for EnrollmentState {
    fn default() -> Self {
        Self::new()
    }
}

/// Enrollment row with its course embedded for listing responses
///
/// `course` is None only if the course row disappeared underneath.
#[derive(Debug, Clone)]
pub struct EnrollmentWithCourse {
    pub enrollment: enrollment::Model,
    pub course: Option<Course>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_enrollment_is_active_at_zero() {
        let state = EnrollmentState::new();
        assert_eq!(state.progress(), 0);
        assert!(!state.is_completed());
    }

    #[test]
    fn test_progress_100_completes() {
        let state = EnrollmentState::with_progress(100).unwrap();
        assert_eq!(state, EnrollmentState::Completed);
        assert_eq!(state.progress(), 100);
    }

    #[test]
    fn test_progress_99_stays_active() {
        let state = EnrollmentState::with_progress(99).unwrap();
        assert!(!state.is_completed());
        assert_eq!(state.progress(), 99);
    }

    #[test]
    fn test_out_of_range_progress_rejected() {
        assert!(matches!(
            EnrollmentState::with_progress(101),
            Err(EnrollmentError::ProgressOutOfRange { progress: 101 })
        ));
        assert!(matches!(
            EnrollmentState::with_progress(-1),
            Err(EnrollmentError::ProgressOutOfRange { progress: -1 })
        ));
    }

    #[test]
    fn test_moving_down_from_completed_uncompletes() {
        let completed = EnrollmentState::with_progress(100).unwrap();
        assert!(completed.is_completed());

        let lowered = EnrollmentState::with_progress(50).unwrap();
        assert!(!lowered.is_completed());
        assert_eq!(lowered.progress(), 50);
    }

    #[test]
    fn test_completed_invariant_holds_for_every_valid_progress() {
        for p in 0..=100 {
            let state = EnrollmentState::with_progress(p).unwrap();
            assert_eq!(state.progress() == 100, state.is_completed(), "progress {}", p);
        }
    }
}
