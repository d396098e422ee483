use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::engine::scheduler::{DisplaySurface, RenderFrame};
use crate::ui::components::checklist::Checklist;
use crate::ui::layout::{AppLayout, pack_hint_lines};
use crate::ui::theme::Theme;

const HINTS: [&str; 5] = [
    "[j/k] Move",
    "[g/G] First/Last",
    "[Space] Select",
    "[Enter] Clone selected",
    "[q] Quit",
];

/// Terminal implementation of the display surface: header with counts, the
/// checklist, and key hints.
pub struct TerminalSurface<B: Backend> {
    terminal: Terminal<B>,
    theme: &'static Theme,
}

impl<B: Backend> TerminalSurface<B> {
    pub fn new(terminal: Terminal<B>, theme: &'static Theme) -> Self {
        Self { terminal, theme }
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }
}

impl<B> DisplaySurface for TerminalSurface<B>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    fn redraw(&mut self, frame: &RenderFrame) -> Result<()> {
        let theme = self.theme;
        self.terminal.draw(|f| render(f, frame, theme))?;
        Ok(())
    }
}

fn render(f: &mut ratatui::Frame, frame: &RenderFrame, theme: &Theme) {
    let area = f.area();
    let colors = &theme.colors;

    f.render_widget(Block::default().style(Style::default().bg(colors.bg())), area);

    let hint_lines = pack_hint_lines(&HINTS, area.width as usize);
    let layout = AppLayout::new(area, hint_lines.len() as u16);

    let s = &frame.summary;
    let mut header_info = format!(" {} available", s.total());
    for (count, what) in [
        (s.selected, "selected"),
        (s.cloning, "cloning"),
        (s.cloned, "cloned"),
        (s.errored, "failed"),
    ] {
        if count > 0 {
            header_info.push_str(&format!(" | {count} {what}"));
        }
    }
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " projman ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_info,
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    f.render_widget(header, layout.header);

    f.render_widget(Checklist::new(frame, theme), layout.main);

    let footer: Vec<Line> = hint_lines
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.muted()))))
        .collect();
    f.render_widget(Paragraph::new(footer), layout.footer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    use crate::engine::item_list::{ItemList, Summary};
    use crate::engine::label::IconSet;
    use crate::engine::scheduler::RenderScheduler;
    use std::time::Duration;

    fn screen_text(surface: &mut TerminalSurface<TestBackend>) -> String {
        let buf = surface.terminal_mut().backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn surface() -> TerminalSurface<TestBackend> {
        let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
        let terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        TerminalSurface::new(terminal, theme)
    }

    #[test]
    fn test_redraw_shows_header_rows_and_hints() {
        let list = ItemList::new(["api", "web"]);
        list.get("web").unwrap().toggle();
        let scheduler = RenderScheduler::new(Duration::from_millis(100), IconSet::Ascii);

        let mut surface = surface();
        scheduler.redraw(&list, &mut surface).unwrap();
        let text = screen_text(&mut surface);

        assert!(text.contains("projman"));
        assert!(text.contains("2 available | 1 selected"));
        assert!(text.contains("> [ ] api"));
        assert!(text.contains("  [x] web"));
        assert!(text.contains("[Enter] Clone selected"));
    }

    #[test]
    fn test_redraw_reflects_worker_progress() {
        let list = ItemList::new(["api"]);
        let item = list.get("api").unwrap();
        item.toggle();
        item.begin_clone();
        let scheduler = RenderScheduler::new(Duration::from_millis(100), IconSet::Ascii);
        let mut surface = surface();

        scheduler.redraw(&list, &mut surface).unwrap();
        assert!(screen_text(&mut surface).contains("api (cloning...)"));

        item.finish(false);
        scheduler.redraw(&list, &mut surface).unwrap();
        let text = screen_text(&mut surface);
        assert!(text.contains("[!] api (error)"));
        assert!(text.contains("1 failed"));
    }

    #[test]
    fn test_empty_frame_renders() {
        let mut surface = surface();
        surface
            .redraw(&RenderFrame {
                rows: Vec::new(),
                focus: None,
                summary: Summary::default(),
            })
            .unwrap();
        assert!(screen_text(&mut surface).contains("0 available"));
    }
}
