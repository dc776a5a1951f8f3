//! Sleep-timer state shared by both playback surfaces.

use crate::time_utils::format_clock;

/// Durations offered in the timer picker, in minutes.
pub const TIMER_CHOICES_MIN: [u32; 4] = [15, 30, 45, 60];

/// The fade runs 50 steps 100 ms apart: a five-second ramp to silence.
pub const FADE_STEPS: u32 = 50;
pub const FADE_INTERVAL_MS: u64 = 100;

pub const COUNTDOWN_INTERVAL_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerMode {
    #[default]
    Off,
    Counting {
        seconds_remaining: u32,
    },
    FadingOut {
        step: u32,
    },
}

/// Optional sleep timer attached to a playback session. Torn down whenever
/// the session's source changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SleepTimer {
    pub mode: TimerMode,
    /// Minutes the user picked; display only once the countdown is running.
    pub selected_minutes: Option<u32>,
}

impl SleepTimer {
    pub fn is_active(&self) -> bool {
        !matches!(self.mode, TimerMode::Off)
    }

    pub fn reset(&mut self) {
        *self = SleepTimer::default();
    }

    /// One-line description for the timer row.
    pub fn label(&self) -> String {
        match self.mode {
            TimerMode::Off => "Sleep timer off".to_string(),
            TimerMode::Counting { seconds_remaining } => {
                format!("{} remaining", format_clock(f64::from(seconds_remaining)))
            }
            TimerMode::FadingOut { .. } => "Fading out...".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SleepTimer, TimerMode};

    #[test]
    fn labels_follow_the_mode() {
        let mut timer = SleepTimer::default();
        assert_eq!(timer.label(), "Sleep timer off");
        assert!(!timer.is_active());

        timer.mode = TimerMode::Counting {
            seconds_remaining: 899,
        };
        assert_eq!(timer.label(), "14:59 remaining");
        assert!(timer.is_active());

        timer.mode = TimerMode::FadingOut { step: 12 };
        assert_eq!(timer.label(), "Fading out...");
    }

    #[test]
    fn reset_clears_the_selection() {
        let mut timer = SleepTimer {
            mode: TimerMode::Counting {
                seconds_remaining: 60,
            },
            selected_minutes: Some(1),
        };
        timer.reset();
        assert_eq!(timer, SleepTimer::default());
    }
}
