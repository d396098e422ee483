use std::collections::HashSet;
use std::sync::Arc;

use crate::engine::item::{Item, ItemStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Per-status counts, taken in one pass over the list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub idle: usize,
    pub selected: usize,
    pub cloning: usize,
    pub cloned: usize,
    pub errored: usize,
}

impl Summary {
    pub(crate) fn record(&mut self, status: ItemStatus) {
        match status {
            ItemStatus::Idle => self.idle += 1,
            ItemStatus::Selected => self.selected += 1,
            ItemStatus::Cloning => self.cloning += 1,
            ItemStatus::Cloned => self.cloned += 1,
            ItemStatus::Errored => self.errored += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.idle + self.selected + self.cloning + self.cloned + self.errored
    }
}

pub struct ItemList {
    items: Vec<Item>,
    focus: Option<usize>,
}

impl ItemList {
    /// Builds the list in feed order. Duplicate identifiers keep their first
    /// occurrence.
    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let mut seen = HashSet::new();
        let items: Vec<Item> = identifiers
            .into_iter()
            .map(Into::into)
            .filter(|id: &Arc<str>| seen.insert(Arc::clone(id)))
            .map(Item::new)
            .collect();
        let focus = if items.is_empty() { None } else { Some(0) };
        Self { items, focus }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn focused(&self) -> Option<&Item> {
        self.focus.and_then(|i| self.items.get(i))
    }

    pub fn get(&self, identifier: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.identifier() == identifier)
    }

    /// Steps to the nearest non-terminal item in `direction`. Focus stays put
    /// when there is none.
    pub fn move_focus(&mut self, direction: Direction) -> bool {
        let Some(current) = self.focus else {
            return false;
        };
        let target = match direction {
            Direction::Forward => (current + 1..self.items.len())
                .find(|&i| !self.items[i].status().is_terminal()),
            Direction::Backward => (0..current)
                .rev()
                .find(|&i| !self.items[i].status().is_terminal()),
        };
        match target {
            Some(index) => {
                self.focus = Some(index);
                true
            }
            None => false,
        }
    }

    /// Unlike `move_focus`, jumps land on the first item even if it is
    /// terminal.
    pub fn jump_first(&mut self) {
        if !self.items.is_empty() {
            self.focus = Some(0);
        }
    }

    pub fn jump_last(&mut self) {
        if !self.items.is_empty() {
            self.focus = Some(self.items.len() - 1);
        }
    }

    pub fn toggle_at_focus(&mut self) -> bool {
        self.focused().is_some_and(Item::toggle)
    }

    pub fn selected(&self) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .filter(|item| item.status() == ItemStatus::Selected)
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for item in &self.items {
            summary.record(item.status());
        }
        summary
    }
}
