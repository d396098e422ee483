use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ItemStatus {
    Idle = 0,
    Selected = 1,
    Cloning = 2,
    Cloned = 3,
    Errored = 4,
}

impl ItemStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ItemStatus::Cloned | ItemStatus::Errored)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Idle => "idle",
            ItemStatus::Selected => "selected",
            ItemStatus::Cloning => "cloning",
            ItemStatus::Cloned => "cloned",
            ItemStatus::Errored => "errored",
        }
    }

    fn from_bits(bits: u32) -> Self {
        match bits & STATUS_MASK {
            1 => ItemStatus::Selected,
            2 => ItemStatus::Cloning,
            3 => ItemStatus::Cloned,
            4 => ItemStatus::Errored,
            _ => ItemStatus::Idle,
        }
    }
}

/// One consistent observation of an item: status and spinner frame are read
/// together from a single atomic word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemState {
    pub status: ItemStatus,
    pub frame: u32,
}

const STATUS_MASK: u32 = 0xff;
const FRAME_SHIFT: u32 = 8;

impl ItemState {
    const IDLE: ItemState = ItemState {
        status: ItemStatus::Idle,
        frame: 0,
    };

    fn pack(self) -> u32 {
        (self.frame << FRAME_SHIFT) | self.status as u32
    }

    fn unpack(bits: u32) -> Self {
        Self {
            status: ItemStatus::from_bits(bits),
            frame: bits >> FRAME_SHIFT,
        }
    }
}

/// A candidate repository. Cloning an `Item` yields another handle to the same
/// state cell, which is how a worker thread reports back without any lock
/// shared between items.
#[derive(Clone, Debug)]
pub struct Item {
    identifier: Arc<str>,
    cell: Arc<AtomicU32>,
}

impl Item {
    pub fn new(identifier: impl Into<Arc<str>>) -> Self {
        Self {
            identifier: identifier.into(),
            cell: Arc::new(AtomicU32::new(ItemState::IDLE.pack())),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn state(&self) -> ItemState {
        ItemState::unpack(self.cell.load(Ordering::Acquire))
    }

    pub fn status(&self) -> ItemStatus {
        self.state().status
    }

    /// Idle <-> Selected. Returns false (and changes nothing) once the item
    /// has entered the clone pipeline.
    pub fn toggle(&self) -> bool {
        self.transition(|state| match state.status {
            ItemStatus::Idle => Some(ItemState {
                status: ItemStatus::Selected,
                ..state
            }),
            ItemStatus::Selected => Some(ItemState {
                status: ItemStatus::Idle,
                ..state
            }),
            _ => None,
        })
    }

    /// Selected -> Cloning with the spinner reset. Only one caller can win
    /// this transition, so a successful return grants ownership of the clone.
    pub fn begin_clone(&self) -> bool {
        self.transition(|state| match state.status {
            ItemStatus::Selected => Some(ItemState {
                status: ItemStatus::Cloning,
                frame: 0,
            }),
            _ => None,
        })
    }

    /// Cloning -> Cloned / Errored.
    pub fn finish(&self, success: bool) -> bool {
        let status = if success {
            ItemStatus::Cloned
        } else {
            ItemStatus::Errored
        };
        self.transition(|state| match state.status {
            ItemStatus::Cloning => Some(ItemState { status, ..state }),
            _ => None,
        })
    }

    /// Moves the spinner `steps` frames forward, wrapping at `frames`. Fails
    /// without effect unless the item is still cloning, so a tick racing a
    /// worker's final transition cannot overwrite the terminal state.
    pub fn advance_frame(&self, steps: u32, frames: u32) -> bool {
        if steps == 0 || frames == 0 {
            return false;
        }
        self.transition(|state| match state.status {
            ItemStatus::Cloning => Some(ItemState {
                frame: (state.frame + steps % frames) % frames,
                ..state
            }),
            _ => None,
        })
    }

    fn transition(&self, mut step: impl FnMut(ItemState) -> Option<ItemState>) -> bool {
        self.cell
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                step(ItemState::unpack(bits)).map(ItemState::pack)
            })
            .is_ok()
    }
}
