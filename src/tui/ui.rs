//! UI rendering

use super::app::{App, Focus, Mode};
use super::help::{get_about_help, get_commands_help, get_help_text};
use super::keymap::status_hint;
use cohort_engine::{AgeRange, Facet, Field, SortDirection};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

pub(crate) const SUMMARY_BAR_HEIGHT: u16 = 3;
pub(crate) const TABLE_MIN_HEIGHT: u16 = 6;
pub(crate) const STATUS_BAR_HEIGHT: u16 = 1;
pub(crate) const FILTER_PANEL_WIDTH: u16 = 32;

/// Display widths per field, in display order.
const COLUMN_WIDTHS: [u16; 9] = [12, 12, 8, 14, 5, 10, 16, 24, 10];

pub(crate) fn split_main_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(SUMMARY_BAR_HEIGHT),
            Constraint::Min(TABLE_MIN_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

fn split_body(area: Rect) -> [Rect; 2] {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(FILTER_PANEL_WIDTH), Constraint::Min(20)])
        .split(area);
    [chunks[0], chunks[1]]
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let [summary_area, body_area, status_area] = split_main_chunks(f.area());
    let [filter_area, table_area] = split_body(body_area);

    // borders + header row
    app.visible_rows = (table_area.height.saturating_sub(3) as usize).max(1);
    app.update_viewport();

    draw_summary_bar(f, app, summary_area);
    draw_filter_panel(f, app, filter_area);
    draw_table(f, app, table_area);
    draw_status_bar(f, app, status_area);

    if app.help_modal {
        draw_help_modal(f, app);
    }
}

fn draw_summary_bar(f: &mut Frame, app: &App, area: Rect) {
    let stats = app.session.stats();
    let average = stats
        .average_age
        .map(|age| age.to_string())
        .unwrap_or_else(|| "-".to_string());

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let mut spans = vec![
        Span::styled("Records ", label),
        Span::styled(stats.total.to_string(), value),
        Span::styled("  Showing ", label),
        Span::styled(stats.filtered.to_string(), value),
        Span::styled("  Countries ", label),
        Span::styled(stats.countries.to_string(), value),
        Span::styled("  Avg age ", label),
        Span::styled(average, value),
        Span::styled("  Active ", label),
        Span::styled(stats.active.to_string(), Style::default().fg(Color::Green)),
        Span::styled("  Inactive ", label),
        Span::styled(stats.inactive.to_string(), Style::default().fg(Color::Red)),
    ];

    let active_filters = app.session.active_filter_count();
    if active_filters > 0 {
        spans.push(Span::styled(
            format!("  {} active", active_filters),
            Style::default().fg(Color::Yellow),
        ));
    }
    if stats.is_filtered() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            " Filtered ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
    }

    let title = match (app.session.source_name(), app.session.pending_upload()) {
        (_, Some(pending)) => format!(" Cohort: loading {}... ", pending),
        (Some(name), None) => format!(" Cohort: {} ", name),
        (None, None) => " Cohort ".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn format_bound(value: i64) -> String {
    if value == AgeRange::FULL.min || value == AgeRange::FULL.max {
        "any".to_string()
    } else {
        value.to_string()
    }
}

fn draw_filter_panel(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Filters;
    let filters = app.session.filters();
    let heading = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let search = if filters.search.is_empty() {
        "-".to_string()
    } else {
        filters.search.clone()
    };
    let mut lines = vec![
        Line::from(vec![Span::styled("Search ", heading), Span::raw(search)]),
        Line::from(vec![
            Span::styled("Age    ", heading),
            Span::raw(format!(
                "{} to {}",
                format_bound(filters.age_range.min),
                format_bound(filters.age_range.max)
            )),
        ]),
    ];

    let mut cursor_line = 0;
    let mut current: Option<Facet> = None;
    for (idx, (facet, value)) in app.filter_entries().into_iter().enumerate() {
        if current != Some(facet) {
            current = Some(facet);
            lines.push(Line::from(""));
            let count = filters.values(facet).len();
            let title = if count > 0 {
                format!("{} ({})", facet.field(), count)
            } else {
                facet.field().to_string()
            };
            lines.push(Line::from(Span::styled(title, heading)));
        }

        let selected = filters.is_selected(facet, &value);
        let marker = if selected { "[x] " } else { "[ ] " };
        let mut style = if selected {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        if focused && idx == app.filter_cursor {
            cursor_line = lines.len();
            style = style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(Span::styled(format!("{}{}", marker, value), style)));
    }

    let inner_height = area.height.saturating_sub(2) as usize;
    let scroll = (cursor_line + 1).saturating_sub(inner_height);
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Filters ")
        .border_style(Style::default().fg(border));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    f.render_widget(paragraph, area);
}

fn draw_table(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Table;
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Records ")
        .border_style(Style::default().fg(border));

    let view = app.view();
    if view.is_empty() {
        let message = if app.session.is_empty() {
            "No data loaded. Use :open <file> to load a spreadsheet."
        } else {
            "No records match the current filters. Press c to clear them."
        };
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let sort = app.session.sort_state();
    let header = Row::new(Field::ALL.iter().enumerate().map(|(col, field)| {
        let arrow = match (sort.field == *field, sort.direction) {
            (true, SortDirection::Ascending) => " ▲",
            (true, SortDirection::Descending) => " ▼",
            (false, _) => "",
        };
        let mut style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        if col == app.cursor_col {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        Cell::from(format!("{}{}", field, arrow)).style(style)
    }));

    let rows = view
        .iter()
        .enumerate()
        .skip(app.viewport_row)
        .take(app.visible_rows)
        .map(|(idx, record)| {
            let cells = Field::ALL.iter().map(|field| {
                let text = field.value(record).into_owned();
                match field {
                    Field::Status if record.is_active() => {
                        Cell::from(text).style(Style::default().fg(Color::Green))
                    }
                    Field::Status => Cell::from(text).style(Style::default().fg(Color::Red)),
                    _ => Cell::from(text),
                }
            });
            let row = Row::new(cells);
            if focused && idx == app.cursor_row {
                row.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                row
            }
        });

    let widths = COLUMN_WIDTHS.map(Constraint::Length);
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(block);
    f.render_widget(table, area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match app.mode {
        Mode::Command => {
            let (before, after) = app.command_buffer.split_at(app.command_cursor);
            (format!(":{}│{}", before, after), Style::default().fg(Color::White))
        }
        Mode::Search => {
            let (before, after) = app.search_buffer.split_at(app.search_cursor);
            (format!("/{}│{}", before, after), Style::default().fg(Color::White))
        }
        Mode::Normal if app.status_message.starts_with("Error") => {
            (app.status_message.clone(), Style::default().fg(Color::Red))
        }
        Mode::Normal if !app.status_message.is_empty() => {
            (app.status_message.clone(), Style::default().fg(Color::Yellow))
        }
        Mode::Normal => (status_hint().to_string(), Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(Paragraph::new(Line::from(Span::styled(text, style))), area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn help_line(text: String, title: &str) -> Line<'static> {
    let style = if text == title {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else if text.starts_with("  ") {
        Style::default().fg(Color::White)
    } else {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    };
    Line::from(Span::styled(text, style))
}

fn draw_help_modal(f: &mut Frame, app: &App) {
    let area = centered_rect(80, 85, f.area());
    let modal_style = Style::default().fg(Color::White).bg(Color::Black);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help (Esc to close) ")
        .border_style(Style::default().fg(Color::Green))
        .style(modal_style);

    let mut lines: Vec<Line> = Vec::new();
    lines.extend(get_about_help().into_iter().map(|t| help_line(t, "About Cohort")));
    lines.push(Line::from(""));
    lines.extend(get_help_text().into_iter().map(|t| help_line(t, "")));
    lines.push(Line::from(""));
    lines.extend(get_commands_help().into_iter().map(|t| help_line(t, "Commands")));

    let viewport_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(viewport_height);
    let effective_scroll = app.help_scroll.min(max_scroll);
    let scroll_y = u16::try_from(effective_scroll).unwrap_or(u16::MAX);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(modal_style)
        .scroll((scroll_y, 0))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use cohort_core::Session;
    use cohort_engine::{Age, Record};
    use ratatui::{Terminal, backend::TestBackend};

    fn record(first: &str, status: &str) -> Record {
        Record {
            first_name: first.into(),
            last_name: "Tadesse".into(),
            gender: "Male".into(),
            nationality: "Ethiopia".into(),
            age: Age::Years(25),
            degree: "BSc".into(),
            qualification: "Chemistry".into(),
            email: String::new(),
            status: status.into(),
        }
    }

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(180, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_records_and_summary() {
        let session = Session::with_records(
            vec![record("Dawit", "Active"), record("Selam", "Alumni")],
            Some("youth.csv".into()),
        );
        let mut app = App::new(session, Config::default());
        let screen = render(&mut app);
        assert!(screen.contains("Cohort: youth.csv"));
        assert!(screen.contains("Dawit"));
        assert!(screen.contains("Selam"));
        assert!(screen.contains("First Name ▲"));
        assert!(!screen.contains(" Filtered "));
    }

    #[test]
    fn test_filtered_badge_and_empty_message() {
        let session = Session::with_records(vec![record("Dawit", "Active")], None);
        let mut app = App::new(session, Config::default());
        app.session.set_search("nobody");
        let screen = render(&mut app);
        assert!(screen.contains(" Filtered "));
        assert!(screen.contains("1 active"));
        assert!(screen.contains("No records match"));
    }

    #[test]
    fn test_visible_rows_track_table_height() {
        let mut app = App::new(Session::new(), Config::default());
        render(&mut app);
        // 30 rows - summary 3 - status 1 - borders 2 - header 1
        assert_eq!(app.visible_rows, 23);
    }

    #[test]
    fn test_format_bound() {
        assert_eq!(format_bound(i64::MIN), "any");
        assert_eq!(format_bound(18), "18");
    }
}
