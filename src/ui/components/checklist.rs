use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::label::StyleClass;
use crate::engine::scheduler::RenderFrame;
use crate::ui::layout::scroll_offset;
use crate::ui::theme::Theme;

pub struct Checklist<'a> {
    pub frame: &'a RenderFrame,
    pub theme: &'a Theme,
}

impl<'a> Checklist<'a> {
    pub fn new(frame: &'a RenderFrame, theme: &'a Theme) -> Self {
        Self { frame, theme }
    }
}

impl Widget for Checklist<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Repositories ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let rows = &self.frame.rows;
        if rows.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "Nothing to clone: every repository is already checked out.",
                Style::default().fg(colors.muted()),
            )))
            .alignment(Alignment::Center)
            .render(inner, buf);
            return;
        }

        let height = inner.height as usize;
        let offset = scroll_offset(self.frame.focus, rows.len(), height);

        for (line, (i, row)) in rows.iter().enumerate().skip(offset).take(height).enumerate() {
            let y = inner.y + line as u16;
            let is_focused = self.frame.focus == Some(i);
            let mut style = self.theme.style(row.class);
            if is_focused && row.class != StyleClass::Focused {
                style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
            }

            let indicator = if is_focused { ">" } else { " " };
            let text = format!("{indicator} {}", row.label);

            let row_area = Rect::new(inner.x, y, inner.width, 1);
            buf.set_style(row_area, style);
            buf.set_stringn(inner.x, y, &text, inner.width as usize, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::item_list::Summary;
    use crate::engine::scheduler::RenderRow;

    fn row(id: &str, class: StyleClass) -> RenderRow {
        RenderRow {
            identifier: id.to_string(),
            label: format!("[ ] {id}"),
            class,
        }
    }

    fn line_text(buf: &Buffer, y: u16) -> String {
        (buf.area.x..buf.area.x + buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_renders_rows_with_focus_marker() {
        let frame = RenderFrame {
            rows: vec![row("api", StyleClass::Normal), row("web", StyleClass::Focused)],
            focus: Some(1),
            summary: Summary::default(),
        };
        let theme = Theme::default();
        let area = Rect::new(0, 0, 30, 5);
        let mut buf = Buffer::empty(area);
        Checklist::new(&frame, &theme).render(area, &mut buf);

        assert!(line_text(&buf, 1).contains("  [ ] api"));
        assert!(line_text(&buf, 2).contains("> [ ] web"));
    }

    #[test]
    fn test_scrolls_to_keep_focus_visible() {
        let rows: Vec<RenderRow> = (0..20)
            .map(|i| row(&format!("repo{i:02}"), StyleClass::Normal))
            .collect();
        let frame = RenderFrame {
            rows,
            focus: Some(15),
            summary: Summary::default(),
        };
        let theme = Theme::default();
        let area = Rect::new(0, 0, 30, 7);
        let mut buf = Buffer::empty(area);
        Checklist::new(&frame, &theme).render(area, &mut buf);

        // Five visible rows ending at the focused one.
        assert!(line_text(&buf, 1).contains("repo11"));
        assert!(line_text(&buf, 5).contains("> [ ] repo15"));
    }

    #[test]
    fn test_empty_list_shows_message() {
        let frame = RenderFrame::default();
        let theme = Theme::default();
        let area = Rect::new(0, 0, 80, 5);
        let mut buf = Buffer::empty(area);
        Checklist::new(&frame, &theme).render(area, &mut buf);
        let text: String = (0..5).map(|y| line_text(&buf, y)).collect();
        assert!(text.contains("Nothing to clone"));
    }
}
