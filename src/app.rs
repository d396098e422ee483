use tracing::debug;

use crate::engine::item_list::{Direction, ItemList};
use crate::engine::orchestrator::CloneOrchestrator;
use crate::input::Action;

pub struct App {
    pub list: ItemList,
    pub orchestrator: CloneOrchestrator,
    pub should_quit: bool,
}

impl App {
    pub fn new(candidates: Vec<String>, orchestrator: CloneOrchestrator) -> Self {
        Self {
            list: ItemList::new(candidates),
            orchestrator,
            should_quit: false,
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::FocusNext => {
                self.list.move_focus(Direction::Forward);
            }
            Action::FocusPrev => {
                self.list.move_focus(Direction::Backward);
            }
            Action::FocusFirst => self.list.jump_first(),
            Action::FocusLast => self.list.jump_last(),
            Action::ToggleSelection => {
                self.list.toggle_at_focus();
            }
            Action::StartClone => {
                let launched = self.orchestrator.start(&self.list);
                debug!(launched, "start requested");
            }
            Action::Quit => self.should_quit = true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;

    use crate::engine::item::ItemStatus;
    use crate::engine::orchestrator::CloneExecutor;

    struct AlwaysOk;

    impl CloneExecutor for AlwaysOk {
        fn clone_repo(&self, _identifier: &str, _destination: &Path) -> bool {
            true
        }
    }

    fn app(names: &[&str]) -> App {
        let orchestrator = CloneOrchestrator::new(Arc::new(AlwaysOk), "/projects");
        App::new(names.iter().map(|s| s.to_string()).collect(), orchestrator)
    }

    #[test]
    fn test_select_and_clone_flow() {
        let mut app = app(&["a", "b", "c"]);
        app.apply(Action::ToggleSelection);
        app.apply(Action::FocusLast);
        app.apply(Action::ToggleSelection);
        app.apply(Action::StartClone);
        app.orchestrator.join_all();

        let statuses: Vec<ItemStatus> = app.list.items().iter().map(|i| i.status()).collect();
        assert_eq!(
            statuses,
            vec![ItemStatus::Cloned, ItemStatus::Idle, ItemStatus::Cloned]
        );
    }

    #[test]
    fn test_navigation_skips_cloned_items_after_start() {
        let mut app = app(&["a", "b", "c"]);
        app.apply(Action::FocusNext);
        app.apply(Action::ToggleSelection);
        app.apply(Action::StartClone);
        app.orchestrator.join_all();

        app.apply(Action::FocusFirst);
        app.apply(Action::FocusNext);
        assert_eq!(app.list.focus(), Some(2));
        app.apply(Action::FocusPrev);
        assert_eq!(app.list.focus(), Some(0));
    }

    #[test]
    fn test_toggle_after_clone_is_ignored() {
        let mut app = app(&["a"]);
        app.apply(Action::ToggleSelection);
        app.apply(Action::StartClone);
        app.orchestrator.join_all();
        app.apply(Action::ToggleSelection);
        app.apply(Action::StartClone);
        assert_eq!(app.orchestrator.in_flight(), 0);
        assert_eq!(app.list.items()[0].status(), ItemStatus::Cloned);
    }

    #[test]
    fn test_quit_sets_flag() {
        let mut app = app(&[]);
        assert!(!app.should_quit);
        app.apply(Action::FocusNext);
        app.apply(Action::Quit);
        assert!(app.should_quit);
    }
}
