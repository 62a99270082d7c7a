//! Submission lifecycle of the review form.
//!
//! The machine never touches timers or the DOM itself. Transitions return the
//! effects the component has to carry out, and scheduled resets carry the
//! generation they were issued for so a stale timer cannot reset a newer
//! submission.
use std::time::Duration;

/// Delay before re-reading the list after a successful write.
pub const REFRESH_DELAY: Duration = Duration::from_millis(1_000);
/// How long a success or error message stays up.
pub const RESET_DELAY: Duration = Duration::from_millis(5_000);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error(String),
}

impl SubmissionStatus {
    pub fn message(&self) -> Option<&str> {
        match self {
            SubmissionStatus::Idle => None,
            SubmissionStatus::Submitting => Some("Submitting your review..."),
            SubmissionStatus::Success => Some("Thank you! Your review has been submitted."),
            SubmissionStatus::Error(message) => Some(message.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ClearForm,
    ScheduleRefresh { after: Duration },
    ScheduleReset { after: Duration, generation: u64 },
}

#[derive(Debug, Default)]
pub struct SubmissionMachine {
    status: SubmissionStatus,
    generation: u64,
}

impl SubmissionMachine {
    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_busy(&self) -> bool {
        self.status == SubmissionStatus::Submitting
    }

    /// Starts a submission. Returns false while one is already in flight.
    pub fn submit(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.generation += 1;
        self.status = SubmissionStatus::Submitting;
        true
    }

    pub fn succeeded(&mut self) -> Vec<Effect> {
        if !self.is_busy() {
            return Vec::new();
        }
        self.status = SubmissionStatus::Success;
        vec![
            Effect::ClearForm,
            Effect::ScheduleRefresh {
                after: REFRESH_DELAY,
            },
            Effect::ScheduleReset {
                after: RESET_DELAY,
                generation: self.generation,
            },
        ]
    }

    /// The form keeps its contents on failure so the user can retry.
    pub fn failed(&mut self, message: impl Into<String>) -> Vec<Effect> {
        if !self.is_busy() {
            return Vec::new();
        }
        self.status = SubmissionStatus::Error(message.into());
        vec![Effect::ScheduleReset {
            after: RESET_DELAY,
            generation: self.generation,
        }]
    }

    /// The list has been re-read after a success; the message can go.
    pub fn refreshed(&mut self) -> bool {
        if self.status == SubmissionStatus::Success {
            self.status = SubmissionStatus::Idle;
            return true;
        }
        false
    }

    pub fn reset(&mut self, generation: u64) -> bool {
        let finished = matches!(
            self.status,
            SubmissionStatus::Success | SubmissionStatus::Error(_)
        );
        if finished && generation == self.generation {
            self.status = SubmissionStatus::Idle;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_clears_form_and_schedules_refresh_then_reset() {
        let mut machine = SubmissionMachine::default();
        assert!(machine.submit());
        assert_eq!(machine.status(), &SubmissionStatus::Submitting);

        let effects = machine.succeeded();
        assert_eq!(machine.status(), &SubmissionStatus::Success);
        assert_eq!(
            effects,
            vec![
                Effect::ClearForm,
                Effect::ScheduleRefresh {
                    after: REFRESH_DELAY
                },
                Effect::ScheduleReset {
                    after: RESET_DELAY,
                    generation: 1
                },
            ]
        );

        assert!(machine.refreshed());
        assert_eq!(machine.status(), &SubmissionStatus::Idle);
        // the scheduled reset then finds nothing to do
        assert!(!machine.reset(1));
    }

    #[test]
    fn failure_keeps_form_and_resets_later() {
        let mut machine = SubmissionMachine::default();
        machine.submit();
        let effects = machine.failed("Failed to save review");
        assert!(!effects.contains(&Effect::ClearForm));
        assert_eq!(machine.status().message(), Some("Failed to save review"));

        assert!(machine.reset(1));
        assert_eq!(machine.status(), &SubmissionStatus::Idle);
    }

    #[test]
    fn no_double_submission() {
        let mut machine = SubmissionMachine::default();
        assert!(machine.submit());
        assert!(!machine.submit());
    }

    #[test]
    fn stale_reset_does_not_touch_newer_submission() {
        let mut machine = SubmissionMachine::default();
        machine.submit();
        machine.failed("boom");
        // user retries before the first reset fires
        assert!(machine.submit());
        machine.failed("boom again");

        assert!(!machine.reset(1));
        assert_eq!(machine.status(), &SubmissionStatus::Error("boom again".into()));
        assert!(machine.reset(2));
    }

    #[test]
    fn resubmitting_after_success_starts_a_new_generation() {
        let mut machine = SubmissionMachine::default();
        machine.submit();
        machine.succeeded();
        assert!(machine.submit());
        assert!(machine.is_busy());
        // the first success's reset must not end the second submission
        assert!(!machine.reset(1));
        assert_eq!(machine.status(), &SubmissionStatus::Submitting);
    }

    #[test]
    fn outcomes_outside_submitting_are_ignored() {
        let mut machine = SubmissionMachine::default();
        assert!(machine.succeeded().is_empty());
        assert!(machine.failed("late").is_empty());
        assert_eq!(machine.status(), &SubmissionStatus::Idle);
    }
}
