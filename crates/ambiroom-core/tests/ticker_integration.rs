//! Ticker and driver tests on tokio's paused clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ambiroom_core::{
    AmbientApp, Config, Event, MemoryNotifier, SharedApp, SilentPlayer, Ticker, TimerDriver,
    TimerMode,
};
use tokio::sync::mpsc;

fn shared_app(config: &Config, mode: TimerMode, time_left: i64) -> SharedApp {
    let mut app = AmbientApp::new(config, Arc::new(MemoryNotifier::new()), Arc::new(SilentPlayer));
    app.timer.set_mode(mode);
    app.timer.set_time_left(time_left);
    Arc::new(Mutex::new(app))
}

fn time_left(app: &SharedApp) -> i64 {
    app.lock().unwrap().timer.time_left()
}

#[tokio::test(start_paused = true)]
async fn ticks_once_per_second_while_running() {
    let app = shared_app(&Config::default(), TimerMode::Countup, 0);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut driver = TimerDriver::new(Arc::clone(&app), tx);

    app.lock().unwrap().timer.start();
    driver.sync();
    assert!(driver.is_ticking());

    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert_eq!(time_left(&app), 3);

    let mut ticks = 0;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, Event::Ticked { .. }) {
            ticks += 1;
        }
    }
    assert_eq!(ticks, 3);
}

#[tokio::test(start_paused = true)]
async fn pause_cancels_the_ticker() {
    let app = shared_app(&Config::default(), TimerMode::Countup, 0);
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut driver = TimerDriver::new(Arc::clone(&app), tx);

    app.lock().unwrap().timer.start();
    driver.sync();
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(time_left(&app), 2);

    app.lock().unwrap().timer.pause();
    driver.sync();
    assert!(!driver.is_ticking());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(time_left(&app), 2);
}

#[tokio::test(start_paused = true)]
async fn cancel_when_a_tick_is_due_stops_at_once() {
    let app = shared_app(&Config::default(), TimerMode::Countup, 0);
    app.lock().unwrap().timer.start();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut ticker = Ticker::spawn(Arc::clone(&app), Duration::from_secs(1), tx);

    // Wake at the same instant the first tick falls due.
    tokio::time::sleep(Duration::from_secs(1)).await;
    let delivered = std::iter::from_fn(|| rx.try_recv().ok()).count() as i64;
    ticker.cancel();
    assert!(!ticker.is_alive());

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(time_left(&app), delivered);
    assert!(rx.try_recv().is_err());
    ticker.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn phase_end_without_auto_start_stops_ticking() {
    let app = shared_app(&Config::default(), TimerMode::Pomodoro, 2);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut driver = TimerDriver::new(Arc::clone(&app), tx);

    app.lock().unwrap().timer.start();
    driver.sync();
    tokio::time::sleep(Duration::from_secs(5)).await;

    {
        let app = app.lock().unwrap();
        assert!(app.timer.is_break());
        assert!(!app.timer.is_running());
        assert_eq!(app.timer.time_left(), 600);
    }
    assert!(!driver.is_ticking());

    let mut phase_changes = 0;
    while let Ok(event) = rx.try_recv() {
        if event.is_phase_change() {
            phase_changes += 1;
        }
    }
    assert_eq!(phase_changes, 1);
}

#[tokio::test(start_paused = true)]
async fn auto_start_keeps_one_ticker_across_phases() {
    let mut config = Config::default();
    config.timer.auto_start = true;
    config.timer.break_time = 3;
    let app = shared_app(&config, TimerMode::Pomodoro, 1);
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut driver = TimerDriver::new(Arc::clone(&app), tx);

    app.lock().unwrap().timer.start();
    driver.sync();
    driver.sync();

    // 1s: focus ends and the 3s break loads. 2s, 3s: 3 -> 1. 4s: back to focus.
    tokio::time::sleep(Duration::from_millis(4500)).await;
    let app_guard = app.lock().unwrap();
    assert!(!app_guard.timer.is_break());
    assert_eq!(app_guard.timer.time_left(), 1500);
    assert!(app_guard.timer.is_running());
    drop(app_guard);
    assert!(driver.is_ticking());

    driver.shutdown().await;
    assert!(!driver.is_ticking());
}

#[tokio::test(start_paused = true)]
async fn restart_after_self_stop_spawns_a_new_ticker() {
    let app = shared_app(&Config::default(), TimerMode::Pomodoro, 1);
    let (tx, _rx) = mpsc::unbounded_channel();
    let mut driver = TimerDriver::new(Arc::clone(&app), tx);

    app.lock().unwrap().timer.start();
    driver.sync();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(!app.lock().unwrap().timer.is_running());

    app.lock().unwrap().timer.start();
    driver.sync();
    assert!(driver.is_ticking());
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(time_left(&app), 598);
}
