use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use time::{macros::format_description, OffsetDateTime};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::state::{AppState, ModeKind};
use crate::config::ThemeName;
use crate::editor::CaretDisplay;

/// Styles the renderer needs: two selection styles (idle and editing) and
/// the inline caret.
#[derive(Debug, Clone)]
pub struct Palette {
    pub header: Style,
    pub idle_selection: Style,
    pub edit_selection: Style,
    pub editing_text: Style,
    pub caret: Style,
    pub muted: Style,
}

impl Palette {
    pub fn for_theme(theme: ThemeName) -> Self {
        match theme {
            ThemeName::Dark => Self {
                header: Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                idle_selection: Style::default().fg(Color::Yellow),
                edit_selection: Style::default().fg(Color::Green),
                editing_text: Style::default().fg(Color::Yellow),
                caret: Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
                muted: Style::default().fg(Color::Gray),
            },
            ThemeName::Light => Self {
                header: Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
                idle_selection: Style::default().fg(Color::Blue),
                edit_selection: Style::default().fg(Color::Magenta),
                editing_text: Style::default().fg(Color::Blue),
                caret: Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
                muted: Style::default().fg(Color::DarkGray),
            },
            ThemeName::HighContrast => Self {
                header: Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                idle_selection: Style::default().add_modifier(Modifier::REVERSED),
                edit_selection: Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
                editing_text: Style::default().fg(Color::White),
                caret: Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                muted: Style::default().fg(Color::White),
            },
        }
    }
}

pub fn draw_app(
    frame: &mut Frame,
    state: &AppState,
    list_state: &mut ListState,
    palette: &Palette,
    header: &str,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(10),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(20), Constraint::Percentage(80)])
        .split(rows[1]);

    let header_widget = Paragraph::new(Line::from(Span::styled(
        format!(" {header}"),
        palette.header,
    )))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header_widget, rows[0]);

    let title_width = usize::from(columns[0].width.saturating_sub(2));
    let items: Vec<ListItem> = (0..state.len())
        .filter_map(|idx| state.list_title(idx))
        .map(|title| ListItem::new(clip_to_width(&title.replace('\n', " "), title_width)))
        .collect();
    let selection_style = if state.is_editing() {
        palette.edit_selection
    } else {
        palette.idle_selection
    };
    let list = List::new(items)
        .block(Block::default().title("Notes").borders(Borders::ALL))
        .highlight_style(selection_style);
    frame.render_stateful_widget(list, columns[0], list_state);

    let content_title = match state.selected() {
        Some(note) if !note.date.trim().is_empty() => format!("Content · {}", note.date.trim()),
        _ => "Content".to_string(),
    };
    let body = match state.edit_session() {
        Some(session) if state.mode_kind() == ModeKind::EditBody => {
            caret_text(&session.display(), palette.editing_text, palette.caret)
        }
        _ => state
            .selected()
            .map(|note| Text::from(note.content.clone()))
            .unwrap_or_default(),
    };
    let content = Paragraph::new(body)
        .block(Block::default().title(content_title).borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(content, columns[1]);

    frame.render_widget(Paragraph::new(status_line(state, palette)), rows[2]);
}

fn status_line(state: &AppState, palette: &Palette) -> Line<'static> {
    let mode = state.mode_kind();
    let mode_style = match mode {
        ModeKind::Browse => palette.idle_selection,
        ModeKind::EditBody | ModeKind::EditTitle => palette.edit_selection,
    };
    let mut spans = vec![
        Span::styled(format!(" {mode} "), mode_style.add_modifier(Modifier::BOLD)),
        Span::styled(format!("| {} notes ", state.len()), palette.muted),
    ];
    if let Some(synced) = state.last_synced() {
        spans.push(Span::styled(
            format!("| synced {} ", format_time_short(synced)),
            palette.muted,
        ));
    }
    if let Some(message) = state.status_message() {
        spans.push(Span::raw(format!("| {message} ")));
    }
    let keys = match mode {
        ModeKind::Browse => "| ↑/↓ select • Enter edit • e rename • n new • d delete • r refresh • q quit",
        ModeKind::EditBody => "| ←/→ move • Esc save",
        ModeKind::EditTitle => "| ←/→ move • Enter/Esc save",
    };
    spans.push(Span::styled(keys, palette.muted));
    Line::from(spans)
}

fn format_time_short(dt: OffsetDateTime) -> String {
    dt.format(&format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_else(|_| dt.unix_timestamp().to_string())
}

/// Splits the caret display into styled lines. A caret on a line break is
/// drawn as a marked blank cell at the end of that line.
fn caret_text(display: &CaretDisplay, base: Style, caret: Style) -> Text<'static> {
    let mut lines = Vec::new();
    let mut current = Vec::new();
    push_segment(&display.before, base, &mut lines, &mut current);
    if display.marked == '\n' {
        current.push(Span::styled("_", caret));
        lines.push(Line::from(std::mem::take(&mut current)));
    } else {
        current.push(Span::styled(display.marked.to_string(), caret));
    }
    push_segment(&display.after, base, &mut lines, &mut current);
    lines.push(Line::from(current));
    Text::from(lines)
}

fn push_segment(
    text: &str,
    style: Style,
    lines: &mut Vec<Line<'static>>,
    current: &mut Vec<Span<'static>>,
) {
    for (idx, part) in text.split('\n').enumerate() {
        if idx > 0 {
            lines.push(Line::from(std::mem::take(current)));
        }
        if !part.is_empty() {
            current.push(Span::styled(part.to_string(), style));
        }
    }
}

fn clip_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut clipped = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        clipped.push(ch);
        used += w;
    }
    clipped.push('…');
    clipped
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::app::Input;
    use crate::config::DEFAULT_TITLE;
    use crate::editor::{CaretStyle, TextBuffer};
    use crate::store::memory::MemoryStore;

    fn rendered_rows(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer.get(x, y).symbol())
                    .collect()
            })
            .collect()
    }

    fn render(state: &AppState) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).expect("terminal");
        let mut list_state = ListState::default();
        list_state.select(Some(state.selected));
        let palette = Palette::for_theme(ThemeName::Dark);
        terminal
            .draw(|frame| draw_app(frame, state, &mut list_state, &palette, "My Notebook"))
            .expect("draw");
        rendered_rows(&terminal)
    }

    #[test]
    fn caret_text_styles_only_the_marked_cell() {
        let base = Style::default().fg(Color::Yellow);
        let caret = Style::default().fg(Color::Green);
        let display = TextBuffer::seeded("ab\ncd", 4).display(CaretStyle::Highlight);
        let text = caret_text(&display, base, caret);
        assert_eq!(text.lines.len(), 2);
        let second: Vec<(&str, Style)> = text.lines[1]
            .spans
            .iter()
            .map(|span| (span.content.as_ref(), span.style))
            .collect();
        assert_eq!(second, vec![("c", base), ("d", caret), (" ", base)]);
    }

    #[test]
    fn caret_on_line_break_marks_end_of_line() {
        let display = TextBuffer::seeded("ab\ncd", 2).display(CaretStyle::Highlight);
        let text = caret_text(&display, Style::default(), Style::default());
        assert_eq!(text.lines.len(), 2);
        assert_eq!(text.lines[0].spans.last().map(|s| s.content.as_ref()), Some("_"));
    }

    #[test]
    fn clipping_respects_display_width() {
        assert_eq!(clip_to_width("short", 10), "short");
        assert_eq!(clip_to_width("a long title", 6), "a lon…");
        assert_eq!(clip_to_width("anything", 0), "");
    }

    #[test]
    fn palettes_distinguish_idle_and_edit_selection() {
        for theme in [ThemeName::Dark, ThemeName::Light, ThemeName::HighContrast] {
            let palette = Palette::for_theme(theme);
            assert_ne!(palette.idle_selection, palette.edit_selection, "{theme}");
        }
    }

    #[test]
    fn draws_header_titles_and_selected_content() {
        let store = MemoryStore::with_titles(&["alpha", "beta"]);
        let state = AppState::load(&store, DEFAULT_TITLE, 3).expect("load");
        let rows = render(&state);
        assert!(rows.iter().any(|row| row.contains("My Notebook")));
        assert!(rows.iter().any(|row| row.contains("alpha")));
        assert!(rows.iter().any(|row| row.contains("beta")));
        assert!(rows.iter().any(|row| row.contains("alpha body")));
        assert!(rows.iter().any(|row| row.contains("BROWSE")));
    }

    #[test]
    fn title_edit_shows_insertion_bar_in_list() {
        let store = MemoryStore::with_titles(&["alpha"]);
        let mut state = AppState::load(&store, DEFAULT_TITLE, 3).expect("load");
        state.handle_input(Input::Char('e'), &store).expect("rename");
        let rows = render(&state);
        assert!(rows.iter().any(|row| row.contains("alpha|")));
        assert!(rows.iter().any(|row| row.contains("EDIT TITLE")));
    }
}
