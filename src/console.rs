//! Line-driven console front end for the narration player.
//!
//! Commands arrive on stdin; between commands the loop polls the engine so
//! the position display and end-of-track detection keep up with playback.

use crate::config::AppConfig;
use crate::player::{
    AudioEngine, AudioSource, PlaybackTimerController, TIMER_CHOICES_MIN,
};
use crate::time_utils::format_clock;
use anyhow::{Context, Result, bail};
use std::io::{self, BufRead};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::info;

pub fn run<E: AudioEngine + 'static>(
    controller: PlaybackTimerController<E>,
    source: AudioSource,
    config: &AppConfig,
) -> Result<()> {
    controller.load(source);
    if !controller.has_source() {
        bail!("could not load the narration audio");
    }

    let quit = Arc::new(AtomicBool::new(false));
    {
        let quit = Arc::clone(&quit);
        ctrlc::set_handler(move || quit.store(true, Ordering::Release))
            .context("Installing Ctrl-C handler")?;
    }

    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    print_help();
    print_status(&controller);
    let poll = Duration::from_millis(config.status_poll_interval_ms);
    loop {
        if quit.load(Ordering::Acquire) {
            info!("Interrupted; shutting down");
            break;
        }
        match line_rx.recv_timeout(poll) {
            Ok(line) => {
                if handle_command(&controller, line.trim()) {
                    break;
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => controller.poll_engine(),
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
    controller.unload();
    Ok(())
}

/// Apply one command line; returns true when the session should end.
fn handle_command<E: AudioEngine + 'static>(
    controller: &PlaybackTimerController<E>,
    line: &str,
) -> bool {
    let mut parts = line.split_whitespace();
    match parts.next() {
        None => false,
        Some("play") | Some("pause") | Some("p") => {
            controller.toggle_play();
            print_status(controller);
            false
        }
        Some("seek") => {
            match parts.next().and_then(|raw| raw.parse::<f64>().ok()) {
                Some(seconds) => {
                    controller.end_scrub(seconds);
                    print_status(controller);
                }
                None => println!("usage: seek <seconds>"),
            }
            false
        }
        Some("timer") => {
            match parts.next() {
                Some("off") => controller.set_sleep_timer(None),
                Some(raw) => match raw.parse::<u32>() {
                    Ok(minutes) if TIMER_CHOICES_MIN.contains(&minutes) => {
                        controller.set_sleep_timer(Some(minutes));
                    }
                    _ => println!("usage: timer <{}> | off", timer_choices()),
                },
                None => println!("usage: timer <{}> | off", timer_choices()),
            }
            print_status(controller);
            false
        }
        Some("status") | Some("s") => {
            controller.poll_engine();
            print_status(controller);
            false
        }
        Some("quit") | Some("q") => true,
        Some(other) => {
            println!("unknown command: {other}");
            print_help();
            false
        }
    }
}

fn print_status<E: AudioEngine + 'static>(controller: &PlaybackTimerController<E>) {
    let session = controller.session();
    let state = if session.is_playing() {
        "playing"
    } else {
        "paused"
    };
    println!(
        "[{state}] {} / {}  |  {}",
        format_clock(session.position_seconds()),
        format_clock(session.duration_seconds()),
        controller.timer().label()
    );
}

fn print_help() {
    println!("commands:");
    println!("  play | pause      toggle playback");
    println!("  seek <seconds>    jump to a position");
    println!("  timer <{}>  arm the sleep timer", timer_choices());
    println!("  timer off         cancel the sleep timer");
    println!("  status            show position and timer");
    println!("  quit              exit");
}

fn timer_choices() -> String {
    TIMER_CHOICES_MIN
        .iter()
        .map(|minutes| minutes.to_string())
        .collect::<Vec<_>>()
        .join("|")
}
