//! Integration tests for the full work/break cycle.
//!
//! Drives a `SessionController` through complete intervals, both by calling
//! `tick()` directly and through the tokio `IntervalTicker` on a paused clock.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use pomocycle_core::{
    CapabilityError, Capabilities, Database, Event, IntervalTicker, IntervalType, MemoryStore,
    NotificationPermission, Notifier, SessionController, Settings, SettingsStore, SilentPlayer,
    TickSource,
};

#[derive(Clone, Default)]
struct Inbox {
    bodies: Rc<RefCell<Vec<String>>>,
}

impl Notifier for Inbox {
    fn permission_state(&self) -> NotificationPermission {
        NotificationPermission::Granted
    }

    fn request_permission(&self) -> Result<(), CapabilityError> {
        Ok(())
    }

    fn show(&self, _title: &str, body: &str) -> Result<(), CapabilityError> {
        self.bodies.borrow_mut().push(body.to_string());
        Ok(())
    }
}

struct NullTicker;

impl TickSource for NullTicker {
    fn arm(&self) {}
    fn disarm(&self) {}
}

fn controller_with(
    settings: Settings,
    ticker: Box<dyn TickSource>,
    inbox: &Inbox,
) -> SessionController {
    let store = SettingsStore::new(MemoryStore::new());
    store.save(&settings).unwrap();
    SessionController::new(
        store,
        Capabilities {
            ticker,
            sound: Box::new(SilentPlayer),
            notifier: Box::new(inbox.clone()),
        },
    )
}

fn one_minute_work() -> Settings {
    Settings {
        work_duration: 1,
        short_break_duration: 1,
        long_break_duration: 1,
        long_break_interval: 4,
        ..Settings::default()
    }
}

/// Tick until the current interval completes, counting ticks.
fn finish_interval(controller: &mut SessionController) -> (Event, u64) {
    controller.start();
    let mut ticks = 0;
    loop {
        ticks += 1;
        if let Some(event) = controller.tick() {
            return (event, ticks);
        }
        assert!(ticks < 10_000, "interval never completed");
    }
}

#[test]
fn test_first_work_interval_completes_after_sixty_ticks() {
    let inbox = Inbox::default();
    let mut controller = controller_with(one_minute_work(), Box::new(NullTicker), &inbox);

    let (event, ticks) = finish_interval(&mut controller);
    assert_eq!(ticks, 60);
    assert!(matches!(
        event,
        Event::IntervalCompleted {
            next: IntervalType::ShortBreak,
            completed_work: 1,
            ..
        }
    ));
    assert_eq!(controller.current_interval(), IntervalType::ShortBreak);
    assert_eq!(controller.completed_work(), 1);
    assert!(inbox.bodies.borrow()[0].contains("Short Break"));
}

#[test]
fn test_fourth_work_completion_leads_to_long_break() {
    let inbox = Inbox::default();
    let mut controller = controller_with(one_minute_work(), Box::new(NullTicker), &inbox);

    let mut sequence = Vec::new();
    for _ in 0..8 {
        let (event, _) = finish_interval(&mut controller);
        if let Event::IntervalCompleted { next, .. } = event {
            sequence.push(next);
        }
    }

    assert_eq!(
        sequence,
        vec![
            IntervalType::ShortBreak,
            IntervalType::Work,
            IntervalType::ShortBreak,
            IntervalType::Work,
            IntervalType::ShortBreak,
            IntervalType::Work,
            IntervalType::LongBreak,
            IntervalType::Work,
        ]
    );
    assert_eq!(controller.completed_work(), 4);
    assert!(inbox.bodies.borrow()[6].contains("Long Break"));
}

#[test]
fn test_completed_work_is_not_persisted() {
    let db = Database::open_memory().unwrap();
    let store = SettingsStore::new(db);
    store.save(&one_minute_work()).unwrap();
    let inbox = Inbox::default();
    let mut controller = SessionController::new(
        store,
        Capabilities {
            ticker: Box::new(NullTicker),
            sound: Box::new(SilentPlayer),
            notifier: Box::new(inbox),
        },
    );
    finish_interval(&mut controller);
    assert_eq!(controller.completed_work(), 1);

    let fresh = controller_with(one_minute_work(), Box::new(NullTicker), &Inbox::default());
    assert_eq!(fresh.completed_work(), 0);
    assert_eq!(fresh.current_interval(), IntervalType::Work);
}

#[tokio::test(start_paused = true)]
async fn test_interval_ticker_drives_a_full_interval() {
    let (mut ticker, handle) = IntervalTicker::new(Duration::from_secs(1));
    let inbox = Inbox::default();
    let mut controller = controller_with(
        Settings {
            auto_start_breaks: false,
            ..one_minute_work()
        },
        Box::new(handle.clone()),
        &inbox,
    );

    controller.start();
    assert!(handle.is_armed());
    let started = tokio::time::Instant::now();

    let event = loop {
        ticker.tick().await;
        if let Some(event) = controller.tick() {
            break event;
        }
    };

    assert_eq!(started.elapsed(), Duration::from_secs(60));
    assert!(matches!(event, Event::IntervalCompleted { auto_started: false, .. }));
    assert!(!handle.is_armed());

    // Disarmed after completion: no stray tick arrives.
    let waited = tokio::time::timeout(Duration::from_secs(5), ticker.tick()).await;
    assert!(waited.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_pause_cancels_ticks_until_restart() {
    let (mut ticker, handle) = IntervalTicker::new(Duration::from_secs(1));
    let mut controller =
        controller_with(one_minute_work(), Box::new(handle.clone()), &Inbox::default());

    controller.start();
    for _ in 0..10 {
        ticker.tick().await;
        controller.tick();
    }
    controller.pause();
    assert_eq!(controller.remaining_secs(), 50);

    let waited = tokio::time::timeout(Duration::from_secs(3), ticker.tick()).await;
    assert!(waited.is_err());
    assert_eq!(controller.remaining_secs(), 50);

    controller.start();
    ticker.tick().await;
    controller.tick();
    assert_eq!(controller.remaining_secs(), 49);
}
