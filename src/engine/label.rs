use crate::engine::item::{ItemState, ItemStatus};

/// Length of the spinner cycle shown while an item is cloning.
pub const SPINNER_FRAMES: u32 = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleClass {
    Normal,
    Focused,
    Selected,
    Cloning,
    Success,
    Error,
}

impl StyleClass {
    pub fn for_status(status: ItemStatus, focused: bool) -> Self {
        match status {
            ItemStatus::Idle if focused => StyleClass::Focused,
            ItemStatus::Idle => StyleClass::Normal,
            ItemStatus::Selected => StyleClass::Selected,
            ItemStatus::Cloning => StyleClass::Cloning,
            ItemStatus::Cloned => StyleClass::Success,
            ItemStatus::Errored => StyleClass::Error,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconSet {
    Nerd,
    Ascii,
}

struct Glyphs {
    unchecked: &'static str,
    checked: &'static str,
    failed: &'static str,
    spinner: [&'static str; SPINNER_FRAMES as usize],
}

const NERD: Glyphs = Glyphs {
    unchecked: "\u{f0c8}",
    checked: "\u{f14a}",
    failed: "\u{f057}",
    spinner: ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦"],
};

const ASCII: Glyphs = Glyphs {
    unchecked: "[ ]",
    checked: "[x]",
    failed: "[!]",
    spinner: ["[|]", "[/]", "[-]", "[\\]", "[|]", "[/]", "[-]"],
};

impl IconSet {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "nerd" => Some(IconSet::Nerd),
            "ascii" => Some(IconSet::Ascii),
            _ => None,
        }
    }

    fn glyphs(self) -> &'static Glyphs {
        match self {
            IconSet::Nerd => &NERD,
            IconSet::Ascii => &ASCII,
        }
    }
}

/// Display text for an item, derived only from its identifier and current
/// state.
pub fn label(identifier: &str, state: ItemState, icons: IconSet) -> String {
    let glyphs = icons.glyphs();
    match state.status {
        ItemStatus::Idle => format!("{} {identifier}", glyphs.unchecked),
        ItemStatus::Selected => format!("{} {identifier}", glyphs.checked),
        ItemStatus::Cloning => {
            let spinner = glyphs.spinner[(state.frame % SPINNER_FRAMES) as usize];
            format!("{spinner} {identifier} (cloning...)")
        }
        ItemStatus::Cloned => format!("{} {identifier} (cloned)", glyphs.checked),
        ItemStatus::Errored => format!("{} {identifier} (error)", glyphs.failed),
    }
}
