//! Narration playback with an optional sleep timer and fade-to-silence.
//!
//! [`PlaybackTimerController`] owns transport state for one source at a time
//! and layers the sleep-timer countdown and fade ramp on top of it. The audio
//! backend and the clock are both injected, so the same state machine drives
//! file narration and synthesized speech alike and runs under a simulated
//! clock in tests.

mod backend;
mod controller;
mod engine;
mod scheduler;
mod session;
mod sleep_timer;

pub use backend::RodioPlayback;
pub use controller::PlaybackTimerController;
pub use engine::{AudioEngine, AudioSource, EngineStatus, SourceHandle};
pub use scheduler::{ScheduleHandle, Scheduler, ThreadScheduler};
pub use session::PlaybackSession;
pub use sleep_timer::{
    FADE_INTERVAL_MS, FADE_STEPS, SleepTimer, TIMER_CHOICES_MIN, TimerMode,
};
