use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use projman::app::App;
use projman::engine::label::{IconSet, StyleClass};
use projman::engine::orchestrator::{CloneExecutor, CloneOrchestrator};
use projman::engine::scheduler::{DisplaySurface, RenderFrame, RenderScheduler};
use projman::engine::{ItemList, ItemStatus};
use projman::input::Action;

/// Succeeds or fails per identifier after a short, varying delay.
struct Scripted {
    failures: HashSet<String>,
    calls: AtomicUsize,
    destinations: Mutex<Vec<PathBuf>>,
}

impl Scripted {
    fn new(failures: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            failures: failures.iter().map(|s| s.to_string()).collect(),
            calls: AtomicUsize::new(0),
            destinations: Mutex::new(Vec::new()),
        })
    }
}

impl CloneExecutor for Scripted {
    fn clone_repo(&self, identifier: &str, destination: &Path) -> bool {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.destinations
            .lock()
            .unwrap()
            .push(destination.to_path_buf());
        thread::sleep(Duration::from_millis(5 + (n as u64 % 4) * 10));
        !self.failures.contains(identifier)
    }
}

#[derive(Default)]
struct Recorder {
    frames: Vec<RenderFrame>,
}

impl DisplaySurface for Recorder {
    fn redraw(&mut self, frame: &RenderFrame) -> Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

fn rank(class: StyleClass) -> u8 {
    match class {
        StyleClass::Normal | StyleClass::Focused => 0,
        StyleClass::Selected => 1,
        StyleClass::Cloning => 2,
        StyleClass::Success | StyleClass::Error => 3,
    }
}

fn run_until_settled(app: &mut App, scheduler: &mut RenderScheduler, surface: &mut Recorder) {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        scheduler
            .tick(&app.list, surface, Instant::now())
            .unwrap();
        if app.list.summary().cloning == 0 {
            break;
        }
        assert!(Instant::now() < deadline, "clones never settled");
        thread::sleep(Duration::from_millis(3));
    }
    app.orchestrator.join_all();
}

#[test]
fn test_selected_items_clone_and_others_stay_idle() {
    let executor = Scripted::new(&[]);
    let orchestrator = CloneOrchestrator::new(executor.clone(), "/work");
    let mut app = App::new(
        vec!["a".to_string(), "b".to_string(), "c".to_string()],
        orchestrator,
    );
    app.apply(Action::ToggleSelection);
    app.apply(Action::FocusLast);
    app.apply(Action::ToggleSelection);
    app.apply(Action::StartClone);
    app.orchestrator.join_all();

    assert_eq!(executor.calls.load(Ordering::SeqCst), 2);
    let mut destinations = executor.destinations.lock().unwrap().clone();
    destinations.sort();
    assert_eq!(
        destinations,
        vec![PathBuf::from("/work/a"), PathBuf::from("/work/c")]
    );
    assert_eq!(app.list.get("b").unwrap().status(), ItemStatus::Idle);
    assert_eq!(app.list.get("a").unwrap().status(), ItemStatus::Cloned);
    assert_eq!(app.list.get("c").unwrap().status(), ItemStatus::Cloned);
}

#[test]
fn test_render_ticks_during_flight_show_consistent_progress() {
    let names: Vec<String> = (0..12).map(|i| format!("repo{i}")).collect();
    let executor = Scripted::new(&["repo4", "repo8"]);
    let orchestrator = CloneOrchestrator::new(executor.clone(), "/work");
    let mut app = App::new(names.clone(), orchestrator);

    // Select every other repository.
    for _ in 0..6 {
        app.apply(Action::ToggleSelection);
        app.apply(Action::FocusNext);
        app.apply(Action::FocusNext);
    }

    let mut scheduler = RenderScheduler::new(Duration::from_millis(10), IconSet::Ascii);
    let mut surface = Recorder::default();
    scheduler.tick(&app.list, &mut surface, Instant::now()).unwrap();

    app.apply(Action::StartClone);
    // A second start while workers run launches nothing new.
    assert_eq!(app.orchestrator.start(&app.list), 0);
    run_until_settled(&mut app, &mut scheduler, &mut surface);

    assert_eq!(executor.calls.load(Ordering::SeqCst), 6);

    let mut last_rank: HashMap<String, u8> = HashMap::new();
    for frame in &surface.frames {
        let ids: HashSet<&str> = frame.rows.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids.len(), frame.rows.len(), "duplicate rows in a frame");

        for row in &frame.rows {
            let r = rank(row.class);
            let prev = last_rank.insert(row.identifier.clone(), r).unwrap_or(0);
            assert!(r >= prev, "{} went backwards: {prev} -> {r}", row.identifier);
        }
        let terminal = frame.summary.cloned + frame.summary.errored;
        assert!(terminal <= 6);
    }

    let summary = app.list.summary();
    assert_eq!(summary.cloned, 4);
    assert_eq!(summary.errored, 2);
    assert_eq!(summary.idle, 6);
    assert_eq!(app.list.get("repo4").unwrap().status(), ItemStatus::Errored);
    assert_eq!(app.list.get("repo1").unwrap().status(), ItemStatus::Idle);
}

#[test]
fn test_terminal_items_are_frozen() {
    let executor = Scripted::new(&["b"]);
    let orchestrator = CloneOrchestrator::new(executor.clone(), "/work");
    let mut app = App::new(vec!["a".to_string(), "b".to_string()], orchestrator);
    app.apply(Action::ToggleSelection);
    app.apply(Action::FocusNext);
    app.apply(Action::ToggleSelection);
    app.apply(Action::StartClone);
    app.orchestrator.join_all();

    let before: Vec<_> = app.list.items().iter().map(|i| i.state()).collect();

    let mut scheduler = RenderScheduler::new(Duration::from_millis(1), IconSet::Nerd);
    let mut surface = Recorder::default();
    let t0 = Instant::now();
    for i in 0..10 {
        scheduler
            .tick(&app.list, &mut surface, t0 + Duration::from_millis(i * 5))
            .unwrap();
        app.apply(Action::ToggleSelection);
        app.apply(Action::StartClone);
    }

    let after: Vec<_> = app.list.items().iter().map(|i| i.state()).collect();
    assert_eq!(before, after);
    assert_eq!(executor.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_navigation_after_everything_finishes() {
    let executor = Scripted::new(&[]);
    let orchestrator = CloneOrchestrator::new(executor, "/work");
    let names: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
    let mut app = App::new(names, orchestrator);
    for _ in 0..3 {
        app.apply(Action::ToggleSelection);
        app.apply(Action::FocusNext);
    }
    app.apply(Action::StartClone);
    app.orchestrator.join_all();

    // j/k cannot move when every item is terminal.
    let focus = app.list.focus();
    app.apply(Action::FocusPrev);
    app.apply(Action::FocusNext);
    assert_eq!(app.list.focus(), focus);

    // g/G still jump.
    app.apply(Action::FocusFirst);
    assert_eq!(app.list.focus(), Some(0));
    app.apply(Action::FocusLast);
    assert_eq!(app.list.focus(), Some(2));
}

#[test]
fn test_empty_candidate_list() {
    let list = ItemList::new(Vec::<String>::new());
    let mut orchestrator = CloneOrchestrator::new(Scripted::new(&[]), "/work");
    assert_eq!(orchestrator.start(&list), 0);

    let scheduler = RenderScheduler::new(Duration::from_millis(100), IconSet::Ascii);
    let frame = scheduler.compose(&list);
    assert!(frame.rows.is_empty());
    assert_eq!(frame.focus, None);
}
