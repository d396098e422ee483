use std::time::{Duration, Instant};

use anyhow::Result;

use crate::engine::item_list::{ItemList, Summary};
use crate::engine::label::{self, IconSet, SPINNER_FRAMES, StyleClass};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderRow {
    pub identifier: String,
    pub label: String,
    pub class: StyleClass,
}

/// Everything a display surface needs for one redraw.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderFrame {
    pub rows: Vec<RenderRow>,
    pub focus: Option<usize>,
    pub summary: Summary,
}

pub trait DisplaySurface {
    fn redraw(&mut self, frame: &RenderFrame) -> Result<()>;
}

/// Drives spinner animation and redraws from one periodic tick. Workers only
/// ever write item state; this is the only reader that turns it into output.
pub struct RenderScheduler {
    spinner_interval: Duration,
    icons: IconSet,
    last_tick: Option<Instant>,
    carry: Duration,
}

impl RenderScheduler {
    pub fn new(spinner_interval: Duration, icons: IconSet) -> Self {
        Self {
            spinner_interval: spinner_interval.max(Duration::from_millis(1)),
            icons,
            last_tick: None,
            carry: Duration::ZERO,
        }
    }

    /// Advances animation by the time elapsed since the previous tick, then
    /// redraws.
    pub fn tick<S>(&mut self, list: &ItemList, surface: &mut S, now: Instant) -> Result<()>
    where
        S: DisplaySurface + ?Sized,
    {
        self.advance_animation(list, now);
        self.redraw(list, surface)
    }

    /// Redraws current state without touching animation.
    pub fn redraw<S>(&self, list: &ItemList, surface: &mut S) -> Result<()>
    where
        S: DisplaySurface + ?Sized,
    {
        surface.redraw(&self.compose(list))
    }

    /// Returns the number of spinner steps applied to cloning items.
    pub fn advance_animation(&mut self, list: &ItemList, now: Instant) -> u32 {
        let Some(last) = self.last_tick.replace(now) else {
            return 0;
        };
        let elapsed = self.carry + now.saturating_duration_since(last);
        let interval = self.spinner_interval.as_nanos();
        let steps = elapsed.as_nanos() / interval;
        self.carry = Duration::from_nanos((elapsed.as_nanos() % interval) as u64);

        let steps = (steps % u128::from(SPINNER_FRAMES)) as u32;
        if steps > 0 {
            for item in list.items() {
                item.advance_frame(steps, SPINNER_FRAMES);
            }
        }
        steps
    }

    pub fn compose(&self, list: &ItemList) -> RenderFrame {
        let focus = list.focus();
        let mut summary = Summary::default();
        let rows = list
            .items()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let state = item.state();
                summary.record(state.status);
                RenderRow {
                    identifier: item.identifier().to_string(),
                    label: label::label(item.identifier(), state, self.icons),
                    class: StyleClass::for_status(state.status, focus == Some(i)),
                }
            })
            .collect();
        RenderFrame {
            rows,
            focus,
            summary,
        }
    }
}
