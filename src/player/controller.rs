//! Transport control with a sleep-timer/fade overlay.
//!
//! The controller mediates between raw transport operations (play, pause,
//! seek) and the optional sleep timer so the two never conflict. All public
//! operations are synchronous state transitions that never fail outward:
//! engine errors are logged and absorbed, and the timer bookkeeping always
//! runs to completion so the display cannot get stuck mid-countdown against
//! a dead source.
//!
//! Countdown ticks and fade steps arrive through the injected scheduler.
//! Every scheduled callback carries the epoch it was created under; `load`,
//! `unload`, and timer changes bump the epoch, so a callback that was already
//! queued when its session was torn down notices the mismatch and no-ops.

use super::engine::{AudioEngine, AudioSource, EngineStatus};
use super::scheduler::{ScheduleHandle, Scheduler};
use super::session::PlaybackSession;
use super::sleep_timer::{
    COUNTDOWN_INTERVAL_MS, FADE_INTERVAL_MS, FADE_STEPS, SleepTimer, TimerMode,
};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tracing::{debug, info, warn};

struct ControllerState<E: AudioEngine> {
    engine: E,
    session: PlaybackSession,
    timer: SleepTimer,
    epoch: u64,
    countdown_task: Option<ScheduleHandle>,
    fade_task: Option<ScheduleHandle>,
}

impl<E: AudioEngine> ControllerState<E> {
    /// Bump the epoch and cancel outstanding timer callbacks. Anything still
    /// in flight will see a stale epoch and discard itself.
    fn invalidate_pending(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if let Some(task) = self.countdown_task.take() {
            task.cancel();
        }
        if let Some(task) = self.fade_task.take() {
            task.cancel();
        }
    }

    fn apply_volume(&mut self, volume: f32) {
        self.session.volume = volume;
        if let Some(handle) = self.session.handle {
            if let Err(err) = self.engine.set_volume(handle, volume) {
                warn!("Engine volume change failed: {err:#}");
            }
        }
    }

    fn restore_volume(&mut self) {
        self.apply_volume(1.0);
    }
}

pub struct PlaybackTimerController<E: AudioEngine> {
    state: Arc<Mutex<ControllerState<E>>>,
    scheduler: Arc<dyn Scheduler>,
}

impl<E: AudioEngine + 'static> PlaybackTimerController<E> {
    pub fn new(engine: E, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ControllerState {
                engine,
                session: PlaybackSession::default(),
                timer: SleepTimer::default(),
                epoch: 0,
                countdown_task: None,
                fade_task: None,
            })),
            scheduler,
        }
    }

    fn locked(&self) -> MutexGuard<'_, ControllerState<E>> {
        lock_state(&self.state)
    }

    /// Replace whatever is loaded with `source`. The previous session is
    /// torn down first, including any running sleep timer, so no two sources
    /// are ever owned at once. The new source starts stopped.
    pub fn load(&self, source: AudioSource) {
        let mut state = self.locked();
        state.invalidate_pending();
        state.timer.reset();
        if let Some(handle) = state.session.handle.take() {
            state.engine.release(handle);
        }
        state.session = PlaybackSession::default();
        match state.engine.load(source) {
            Ok(handle) => {
                state.session.handle = Some(handle);
                if let Some(status) = state.engine.status(handle) {
                    state.session.duration_seconds = status.duration_seconds;
                }
                info!(
                    duration_seconds = state.session.duration_seconds,
                    "Loaded narration source"
                );
            }
            Err(err) => warn!("Failed to load narration source: {err:#}"),
        }
    }

    /// Pause if playing, resume if paused. No-op without a source; leaves the
    /// sleep timer alone either way.
    pub fn toggle_play(&self) {
        let mut state = self.locked();
        let Some(handle) = state.session.handle else {
            debug!("Ignoring play toggle with no source loaded");
            return;
        };
        if state.session.is_playing {
            if let Err(err) = state.engine.pause(handle) {
                warn!("Engine pause failed: {err:#}");
            }
            state.session.is_playing = false;
            debug!("Paused");
        } else {
            match state.engine.play(handle) {
                Ok(()) => {
                    state.session.is_playing = true;
                    debug!("Playing");
                }
                Err(err) => warn!("Engine resume failed: {err:#}"),
            }
        }
    }

    /// Start a scrub: engine status stops driving the position until the
    /// scrub ends.
    pub fn begin_scrub(&self) {
        self.locked().session.is_scrubbing = true;
    }

    /// Move the displayed position while scrubbing. Does not touch the
    /// engine.
    pub fn update_scrub_position(&self, seconds: f64) {
        let mut state = self.locked();
        if !state.session.is_scrubbing {
            debug!("Ignoring scrub update outside a scrub");
            return;
        }
        state.session.position_seconds = clamp_position(seconds, state.session.duration_seconds);
    }

    /// Finish a scrub at `seconds`: the engine is reconciled with one
    /// explicit seek and its status callbacks take the position back over.
    pub fn end_scrub(&self, seconds: f64) {
        let mut state = self.locked();
        state.session.is_scrubbing = false;
        let Some(handle) = state.session.handle else {
            debug!("Ignoring scrub end with no source loaded");
            return;
        };
        let target = clamp_position(seconds, state.session.duration_seconds);
        state.session.position_seconds = target;
        if let Err(err) = state.engine.seek(handle, target) {
            warn!(seconds = target, "Engine seek failed: {err:#}");
        }
    }

    /// Feed one engine status notification into the session. Position updates
    /// are ignored mid-scrub; a finished track clears `is_playing` but leaves
    /// any sleep timer running on its own clock.
    pub fn on_engine_status(&self, status: EngineStatus) {
        let mut state = self.locked();
        if state.session.handle.is_none() {
            return;
        }
        if !state.session.is_scrubbing {
            state.session.position_seconds = status.position_seconds;
        }
        if status.duration_seconds > 0.0 {
            state.session.duration_seconds = status.duration_seconds;
        }
        if status.did_finish && state.session.is_playing {
            state.session.is_playing = false;
            debug!("Narration finished");
        }
    }

    /// Ask the engine for its current status and apply it.
    pub fn poll_engine(&self) {
        let status = {
            let state = self.locked();
            let Some(handle) = state.session.handle else {
                return;
            };
            state.engine.status(handle)
        };
        if let Some(status) = status {
            self.on_engine_status(status);
        }
    }

    /// Arm, rearm, or cancel the sleep timer. The latest call always wins:
    /// any in-flight countdown or fade is invalidated and full volume is
    /// restored before the new state is established.
    pub fn set_sleep_timer(&self, minutes: Option<u32>) {
        let mut state = self.locked();
        state.invalidate_pending();
        state.restore_volume();
        match minutes {
            None => {
                if state.timer.is_active() {
                    info!("Sleep timer cancelled");
                }
                state.timer.reset();
            }
            Some(minutes) => {
                state.timer = SleepTimer {
                    mode: TimerMode::Counting {
                        seconds_remaining: minutes.saturating_mul(60),
                    },
                    selected_minutes: Some(minutes),
                };
                info!(minutes, "Sleep timer armed");
                let epoch = state.epoch;
                drop(state);
                self.start_countdown(epoch);
            }
        }
    }

    /// Tear the controller down: cancel timers, release the clip, reset all
    /// fields.
    pub fn unload(&self) {
        let mut state = self.locked();
        state.invalidate_pending();
        state.timer.reset();
        if let Some(handle) = state.session.handle.take() {
            state.engine.release(handle);
        }
        state.session = PlaybackSession::default();
        debug!("Controller unloaded");
    }

    /// Copy of the observable session fields, for display layers.
    pub fn session(&self) -> PlaybackSession {
        self.locked().session
    }

    pub fn timer(&self) -> SleepTimer {
        self.locked().timer
    }

    pub fn has_source(&self) -> bool {
        self.locked().session.has_source()
    }

    fn start_countdown(&self, epoch: u64) {
        let weak = Arc::downgrade(&self.state);
        let scheduler = Arc::clone(&self.scheduler);
        let task = self.scheduler.schedule_repeating(
            Duration::from_millis(COUNTDOWN_INTERVAL_MS),
            Box::new(move || Self::countdown_tick(&weak, &scheduler, epoch)),
        );
        let mut state = self.locked();
        if state.epoch == epoch {
            state.countdown_task = Some(task);
        } else {
            // the timer was replaced while this one was being scheduled
            task.cancel();
        }
    }

    fn countdown_tick(
        state: &Weak<Mutex<ControllerState<E>>>,
        scheduler: &Arc<dyn Scheduler>,
        epoch: u64,
    ) {
        let Some(state) = state.upgrade() else {
            return;
        };
        let mut locked = lock_state(&state);
        if locked.epoch != epoch {
            debug!("Discarding stale countdown tick");
            return;
        }
        let TimerMode::Counting { seconds_remaining } = locked.timer.mode else {
            return;
        };
        let remaining = seconds_remaining.saturating_sub(1);
        if remaining > 0 {
            locked.timer.mode = TimerMode::Counting {
                seconds_remaining: remaining,
            };
            return;
        }

        // countdown expired: stop ticking and start the fade ramp
        if let Some(task) = locked.countdown_task.take() {
            task.cancel();
        }
        locked.timer.mode = TimerMode::FadingOut { step: 0 };
        info!("Sleep timer expired; fading out");
        let weak = Arc::downgrade(&state);
        let task = scheduler.schedule_repeating(
            Duration::from_millis(FADE_INTERVAL_MS),
            Box::new(move || Self::fade_tick(&weak, epoch)),
        );
        locked.fade_task = Some(task);
    }

    fn fade_tick(state: &Weak<Mutex<ControllerState<E>>>, epoch: u64) {
        let Some(state) = state.upgrade() else {
            return;
        };
        let mut locked = lock_state(&state);
        if locked.epoch != epoch {
            debug!("Discarding stale fade step");
            return;
        }
        let TimerMode::FadingOut { step } = locked.timer.mode else {
            return;
        };

        let step = step + 1;
        let volume = (1.0 - step as f32 / FADE_STEPS as f32).max(0.0);
        locked.apply_volume(volume);
        if step < FADE_STEPS {
            locked.timer.mode = TimerMode::FadingOut { step };
            return;
        }

        // silence reached: stop playback and rearm full volume so a later
        // replay is audible
        if let Some(task) = locked.fade_task.take() {
            task.cancel();
        }
        if let Some(handle) = locked.session.handle {
            if let Err(err) = locked.engine.pause(handle) {
                warn!("Engine pause at end of fade failed: {err:#}");
            }
        }
        locked.session.is_playing = false;
        locked.restore_volume();
        locked.timer.reset();
        info!("Fade complete; playback paused");
    }
}

impl<E: AudioEngine> Drop for PlaybackTimerController<E> {
    fn drop(&mut self) {
        // stop the tickers; a callback already in flight sees a dead Weak
        lock_state(&self.state).invalidate_pending();
    }
}

fn lock_state<E: AudioEngine>(
    state: &Arc<Mutex<ControllerState<E>>>,
) -> MutexGuard<'_, ControllerState<E>> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn clamp_position(seconds: f64, duration_seconds: f64) -> f64 {
    let floor = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    if duration_seconds > 0.0 {
        floor.min(duration_seconds)
    } else {
        floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::engine::SourceHandle;
    use anyhow::{Result, anyhow};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum EngineCall {
        Load,
        Play,
        Pause,
        Seek(f64),
        SetVolume(f32),
        Release,
    }

    #[derive(Clone, Default)]
    struct MockEngine {
        calls: Arc<Mutex<Vec<EngineCall>>>,
        next_handle: Arc<Mutex<u64>>,
        status: Arc<Mutex<Option<EngineStatus>>>,
        fail_load: Arc<Mutex<bool>>,
        fail_play: Arc<Mutex<bool>>,
        fail_pause: Arc<Mutex<bool>>,
        fail_volume: Arc<Mutex<bool>>,
    }

    impl MockEngine {
        fn calls(&self) -> Vec<EngineCall> {
            self.calls.lock().expect("calls lock should be available").clone()
        }

        fn record(&self, call: EngineCall) {
            self.calls
                .lock()
                .expect("calls lock should be available")
                .push(call);
        }

        fn volume_ramp(&self) -> Vec<f32> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    EngineCall::SetVolume(volume) => Some(volume),
                    _ => None,
                })
                .collect()
        }

        fn set_flag(flag: &Arc<Mutex<bool>>, value: bool) {
            *flag.lock().expect("flag lock should be available") = value;
        }

        fn flag(flag: &Arc<Mutex<bool>>) -> bool {
            *flag.lock().expect("flag lock should be available")
        }
    }

    impl AudioEngine for MockEngine {
        fn load(&mut self, _source: AudioSource) -> Result<SourceHandle> {
            self.record(EngineCall::Load);
            if Self::flag(&self.fail_load) {
                return Err(anyhow!("simulated load failure"));
            }
            let mut next = self
                .next_handle
                .lock()
                .expect("handle lock should be available");
            *next += 1;
            Ok(SourceHandle(*next))
        }

        fn play(&mut self, _handle: SourceHandle) -> Result<()> {
            self.record(EngineCall::Play);
            if Self::flag(&self.fail_play) {
                return Err(anyhow!("simulated play failure"));
            }
            Ok(())
        }

        fn pause(&mut self, _handle: SourceHandle) -> Result<()> {
            self.record(EngineCall::Pause);
            if Self::flag(&self.fail_pause) {
                return Err(anyhow!("simulated pause failure"));
            }
            Ok(())
        }

        fn seek(&mut self, _handle: SourceHandle, seconds: f64) -> Result<()> {
            self.record(EngineCall::Seek(seconds));
            Ok(())
        }

        fn set_volume(&mut self, _handle: SourceHandle, volume: f32) -> Result<()> {
            self.record(EngineCall::SetVolume(volume));
            if Self::flag(&self.fail_volume) {
                return Err(anyhow!("simulated volume failure"));
            }
            Ok(())
        }

        fn release(&mut self, _handle: SourceHandle) {
            self.record(EngineCall::Release);
        }

        fn status(&self, _handle: SourceHandle) -> Option<EngineStatus> {
            *self.status.lock().expect("status lock should be available")
        }
    }

    struct ScheduledTask {
        callback: Box<dyn FnMut() + Send>,
        handle: ScheduleHandle,
    }

    /// Scheduler driven by the test instead of a clock.
    #[derive(Clone, Default)]
    struct ManualScheduler {
        tasks: Arc<Mutex<Vec<ScheduledTask>>>,
    }

    impl Scheduler for ManualScheduler {
        fn schedule_repeating(
            &self,
            _interval: Duration,
            callback: Box<dyn FnMut() + Send>,
        ) -> ScheduleHandle {
            let handle = ScheduleHandle::new();
            self.tasks
                .lock()
                .expect("scheduler lock should be available")
                .push(ScheduledTask {
                    callback,
                    handle: handle.clone(),
                });
            handle
        }
    }

    impl ManualScheduler {
        /// Fire every live task once, honoring cancellation the way a real
        /// timer would. Tasks scheduled from inside a callback fire on the
        /// next tick.
        fn tick(&self) {
            let mut current = {
                let mut guard = self
                    .tasks
                    .lock()
                    .expect("scheduler lock should be available");
                std::mem::take(&mut *guard)
            };
            for task in current.iter_mut() {
                if !task.handle.is_cancelled() {
                    (task.callback)();
                }
            }
            let mut guard = self
                .tasks
                .lock()
                .expect("scheduler lock should be available");
            let newly_scheduled = std::mem::take(&mut *guard);
            current.retain(|task| !task.handle.is_cancelled());
            current.extend(newly_scheduled);
            *guard = current;
        }

        fn tick_n(&self, count: usize) {
            for _ in 0..count {
                self.tick();
            }
        }

        /// Fire every task even if its handle was cancelled, standing in for
        /// a callback that was already queued when cancellation happened.
        fn fire_all_even_if_cancelled(&self) {
            let mut current = {
                let mut guard = self
                    .tasks
                    .lock()
                    .expect("scheduler lock should be available");
                std::mem::take(&mut *guard)
            };
            for task in current.iter_mut() {
                (task.callback)();
            }
            let mut guard = self
                .tasks
                .lock()
                .expect("scheduler lock should be available");
            let newly_scheduled = std::mem::take(&mut *guard);
            current.extend(newly_scheduled);
            *guard = current;
        }

        fn live_task_count(&self) -> usize {
            self.tasks
                .lock()
                .expect("scheduler lock should be available")
                .iter()
                .filter(|task| !task.handle.is_cancelled())
                .count()
        }
    }

    fn controller_with_mocks() -> (
        PlaybackTimerController<MockEngine>,
        MockEngine,
        ManualScheduler,
    ) {
        let engine = MockEngine::default();
        let scheduler = ManualScheduler::default();
        let controller =
            PlaybackTimerController::new(engine.clone(), Arc::new(scheduler.clone()));
        (controller, engine, scheduler)
    }

    fn status(position: f64, duration: f64, did_finish: bool) -> EngineStatus {
        EngineStatus {
            position_seconds: position,
            duration_seconds: duration,
            did_finish,
        }
    }

    #[test]
    fn rearming_the_timer_leaves_exactly_one_countdown() {
        let (controller, _engine, scheduler) = controller_with_mocks();
        controller.load(AudioSource::Memory(vec![1, 2, 3]));

        for minutes in [15u32, 30, 45, 60] {
            controller.set_sleep_timer(Some(minutes));
            controller.set_sleep_timer(Some(30));
            assert_eq!(scheduler.live_task_count(), 1);
            scheduler.tick();
            assert_eq!(
                controller.timer().mode,
                TimerMode::Counting {
                    seconds_remaining: 30 * 60 - 1
                }
            );
            controller.set_sleep_timer(None);
        }
    }

    #[test]
    fn cancelling_an_off_timer_changes_nothing() {
        let (controller, engine, scheduler) = controller_with_mocks();
        let before_session = controller.session();
        let before_timer = controller.timer();

        controller.set_sleep_timer(None);
        controller.set_sleep_timer(None);

        assert_eq!(controller.session(), before_session);
        assert_eq!(controller.timer(), before_timer);
        assert_eq!(scheduler.live_task_count(), 0);
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn fade_runs_fifty_steps_then_restores_full_volume() {
        let (controller, engine, scheduler) = controller_with_mocks();
        controller.load(AudioSource::Memory(vec![0; 16]));
        controller.toggle_play();
        controller.set_sleep_timer(Some(1));

        scheduler.tick_n(60);
        assert_eq!(controller.timer().mode, TimerMode::FadingOut { step: 0 });

        scheduler.tick_n(49);
        assert_eq!(controller.timer().mode, TimerMode::FadingOut { step: 49 });
        assert!(controller.session().is_playing());

        scheduler.tick();
        assert_eq!(controller.timer().mode, TimerMode::Off);
        assert!(!controller.session().is_playing());
        assert_eq!(controller.session().volume(), 1.0);

        // one restore when the timer was armed, then 50 ramp steps down to
        // silence, then the final restore
        let ramp = engine.volume_ramp();
        assert_eq!(ramp.len(), 52);
        assert_eq!(ramp[0], 1.0);
        assert_eq!(ramp[1], 1.0 - 1.0 / 50.0);
        assert_eq!(ramp[50], 0.0);
        assert_eq!(ramp[51], 1.0);
        assert!(ramp[1..=50].windows(2).all(|pair| pair[1] < pair[0]));
        assert!(engine.calls().contains(&EngineCall::Pause));
    }

    #[test]
    fn scrubbing_blocks_engine_position_updates() {
        let (controller, engine, _scheduler) = controller_with_mocks();
        controller.load(AudioSource::Memory(vec![0; 16]));

        controller.on_engine_status(status(10.0, 300.0, false));
        assert_eq!(controller.session().position_seconds(), 10.0);

        controller.begin_scrub();
        controller.update_scrub_position(42.0);
        for tick in 0..5 {
            controller.on_engine_status(status(11.0 + f64::from(tick), 300.0, false));
        }
        assert_eq!(controller.session().position_seconds(), 42.0);

        controller.end_scrub(50.0);
        assert!(engine.calls().contains(&EngineCall::Seek(50.0)));
        controller.on_engine_status(status(51.0, 300.0, false));
        assert_eq!(controller.session().position_seconds(), 51.0);
    }

    #[test]
    fn scrub_positions_clamp_to_the_track() {
        let (controller, _engine, _scheduler) = controller_with_mocks();
        controller.load(AudioSource::Memory(vec![0; 16]));
        controller.on_engine_status(status(0.0, 120.0, false));

        controller.begin_scrub();
        controller.update_scrub_position(500.0);
        assert_eq!(controller.session().position_seconds(), 120.0);
        controller.update_scrub_position(-3.0);
        assert_eq!(controller.session().position_seconds(), 0.0);
    }

    #[test]
    fn loading_a_new_source_tears_down_the_timer() {
        let (controller, engine, scheduler) = controller_with_mocks();
        controller.load(AudioSource::Memory(vec![0; 16]));
        controller.set_sleep_timer(Some(5));
        assert_eq!(
            controller.timer().mode,
            TimerMode::Counting {
                seconds_remaining: 300
            }
        );

        controller.load(AudioSource::Memory(vec![0; 32]));
        assert_eq!(controller.timer().mode, TimerMode::Off);
        assert_eq!(scheduler.live_task_count(), 0);
        assert!(engine.calls().contains(&EngineCall::Release));

        // a tick already queued at cancellation time must not revive anything
        scheduler.fire_all_even_if_cancelled();
        assert_eq!(controller.timer().mode, TimerMode::Off);
    }

    #[test]
    fn full_sleep_timer_scenario() {
        let (controller, _engine, scheduler) = controller_with_mocks();
        assert!(!controller.has_source());

        controller.load(AudioSource::File("story.mp3".into()));
        assert!(controller.has_source());

        controller.toggle_play();
        assert!(controller.session().is_playing());

        controller.set_sleep_timer(Some(15));
        assert_eq!(
            controller.timer().mode,
            TimerMode::Counting {
                seconds_remaining: 900
            }
        );

        scheduler.tick_n(899);
        assert_eq!(
            controller.timer().mode,
            TimerMode::Counting {
                seconds_remaining: 1
            }
        );

        scheduler.tick();
        assert_eq!(controller.timer().mode, TimerMode::FadingOut { step: 0 });

        scheduler.tick_n(50);
        assert_eq!(controller.timer().mode, TimerMode::Off);
        assert!(!controller.session().is_playing());
        assert_eq!(controller.session().volume(), 1.0);
    }

    #[test]
    fn seeking_during_a_fade_leaves_the_fade_running() {
        let (controller, _engine, scheduler) = controller_with_mocks();
        controller.load(AudioSource::Memory(vec![0; 16]));
        controller.toggle_play();
        controller.set_sleep_timer(Some(1));
        scheduler.tick_n(60);
        scheduler.tick_n(10);
        assert_eq!(controller.timer().mode, TimerMode::FadingOut { step: 10 });

        controller.end_scrub(3.0);
        assert_eq!(controller.timer().mode, TimerMode::FadingOut { step: 10 });

        scheduler.tick_n(40);
        assert_eq!(controller.timer().mode, TimerMode::Off);
        assert!(!controller.session().is_playing());
    }

    #[test]
    fn cancelling_mid_fade_restores_volume_immediately() {
        let (controller, engine, scheduler) = controller_with_mocks();
        controller.load(AudioSource::Memory(vec![0; 16]));
        controller.toggle_play();
        controller.set_sleep_timer(Some(1));
        scheduler.tick_n(60);
        scheduler.tick_n(20);
        assert_eq!(controller.timer().mode, TimerMode::FadingOut { step: 20 });

        controller.set_sleep_timer(None);
        assert_eq!(controller.timer().mode, TimerMode::Off);
        assert_eq!(controller.session().volume(), 1.0);
        assert_eq!(engine.volume_ramp().last().copied(), Some(1.0));
        // the fade never paused playback
        assert!(controller.session().is_playing());

        scheduler.fire_all_even_if_cancelled();
        assert_eq!(controller.timer().mode, TimerMode::Off);
        assert_eq!(controller.session().volume(), 1.0);
    }

    #[test]
    fn engine_failures_do_not_stall_the_fade_bookkeeping() {
        let (controller, engine, scheduler) = controller_with_mocks();
        controller.load(AudioSource::Memory(vec![0; 16]));
        controller.toggle_play();
        controller.set_sleep_timer(Some(1));
        MockEngine::set_flag(&engine.fail_pause, true);
        MockEngine::set_flag(&engine.fail_volume, true);

        scheduler.tick_n(60 + 50);
        assert_eq!(controller.timer().mode, TimerMode::Off);
        assert!(!controller.session().is_playing());
        assert_eq!(controller.session().volume(), 1.0);
    }

    #[test]
    fn transport_without_a_source_is_a_silent_no_op() {
        let (controller, engine, _scheduler) = controller_with_mocks();
        controller.toggle_play();
        controller.end_scrub(12.0);
        assert!(engine.calls().is_empty());
        assert!(!controller.session().is_playing());
    }

    #[test]
    fn load_failure_leaves_the_controller_empty_but_usable() {
        let (controller, engine, _scheduler) = controller_with_mocks();
        MockEngine::set_flag(&engine.fail_load, true);
        controller.load(AudioSource::File("missing.mp3".into()));
        assert!(!controller.has_source());
        controller.toggle_play();
        assert!(!controller.session().is_playing());

        MockEngine::set_flag(&engine.fail_load, false);
        controller.load(AudioSource::File("story.mp3".into()));
        assert!(controller.has_source());
    }

    #[test]
    fn play_failure_keeps_the_session_paused() {
        let (controller, engine, _scheduler) = controller_with_mocks();
        controller.load(AudioSource::Memory(vec![0; 16]));
        MockEngine::set_flag(&engine.fail_play, true);
        controller.toggle_play();
        assert!(!controller.session().is_playing());
    }

    #[test]
    fn natural_finish_stops_playback_but_not_the_timer() {
        let (controller, _engine, scheduler) = controller_with_mocks();
        controller.load(AudioSource::Memory(vec![0; 16]));
        controller.toggle_play();
        controller.set_sleep_timer(Some(15));
        scheduler.tick_n(10);

        controller.on_engine_status(status(300.0, 300.0, true));
        assert!(!controller.session().is_playing());
        assert_eq!(
            controller.timer().mode,
            TimerMode::Counting {
                seconds_remaining: 890
            }
        );
    }

    #[test]
    fn unload_releases_the_clip_and_discards_queued_ticks() {
        let (controller, engine, scheduler) = controller_with_mocks();
        controller.load(AudioSource::Memory(vec![0; 16]));
        controller.toggle_play();
        controller.set_sleep_timer(Some(30));

        controller.unload();
        assert!(!controller.has_source());
        assert_eq!(controller.timer().mode, TimerMode::Off);
        assert!(engine.calls().contains(&EngineCall::Release));

        scheduler.fire_all_even_if_cancelled();
        assert_eq!(controller.timer().mode, TimerMode::Off);
        assert_eq!(scheduler.live_task_count(), 0);
    }
}

