//! UI rendering for the TUI

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::app::App;
use super::components::{Button, DateInput, MetricCard};
use crate::client::FetchError;
use crate::models::Priority;
use crate::palette::{priority_style, tag_style};
use crate::render::{
    counts_header, error_headline, CountsRow, CrossTagRow, Dashboard, PriorityAverageRow,
    CROSS_TAG_TITLE, PRIORITY_AVERAGES_TITLE, STATUS_ROWS, STATUS_TABLE_TITLE, TAG_TABLE_TITLE,
};
use crate::view::DateField;

/// Main colors
const PRIMARY: Color = Color::Cyan;
const SECONDARY: Color = Color::Magenta;
const SUCCESS: Color = Color::Green;
const WARNING: Color = Color::Yellow;
const ERROR: Color = Color::Red;
const MUTED: Color = Color::DarkGray;

/// Draw the entire UI
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Date inputs + buttons
            Constraint::Min(6),    // Metrics
            Constraint::Length(1), // Status bar
        ])
        .split(frame.size());

    let title = Paragraph::new("Support Metrics")
        .style(Style::default().fg(PRIMARY).bold())
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_form(frame, app, chunks[1]);
    draw_content(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    if app.show_help {
        draw_help_overlay(frame);
    }
}

fn draw_form(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ])
        .split(area);

    for (field, chunk) in [(DateField::Start, chunks[0]), (DateField::End, chunks[1])] {
        DateInput::new(field.label(), app.view.date(field))
            .focused(app.focus == field)
            .render(frame, chunk);
    }

    let loading = app.view.is_loading();
    Button::new("Reset", "r")
        .color(Color::White)
        .enabled(!loading)
        .render(frame, chunks[2]);
    Button::new(if loading { "Loading..." } else { "Get Metrics" }, "Enter")
        .enabled(!loading)
        .render(frame, chunks[3]);
}

fn draw_content(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(err) = app.view.error() {
        draw_error(frame, err, area);
    } else if let Some(metrics) = app.view.metrics() {
        draw_dashboard(frame, &Dashboard::from_metrics(metrics), area);
    } else {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from("Enter a start and end date, then press Enter to fetch metrics."),
            Line::from("Leave a date empty to let the service choose the bound.")
                .style(Style::default().fg(MUTED)),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(hint, area);
    }
}

fn draw_error(frame: &mut Frame, err: &FetchError, area: Rect) {
    let text = vec![
        Line::from(error_headline(err)).style(Style::default().fg(ERROR).bold()),
        Line::from(""),
        Line::from(err.to_string()),
        Line::from(""),
        Line::from("Press Enter to retry or r to reset.").style(Style::default().fg(MUTED)),
    ];

    let banner = Paragraph::new(text)
        .block(
            Block::default()
                .title("Error")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ERROR)),
        )
        .wrap(Wrap { trim: true });

    let height = area.height.min(7);
    frame.render_widget(banner, Rect { height, ..area });
}

fn draw_dashboard(frame: &mut Frame, dashboard: &Dashboard, area: Rect) {
    let tag_height = table_height(dashboard.tag_table.len());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),          // Summary cards
            Constraint::Length(tag_height), // Tag + status tables
            Constraint::Min(4),             // Optional sections
        ])
        .split(area);

    draw_cards(frame, dashboard, chunks[0]);

    let counts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    draw_counts_table(frame, TAG_TABLE_TITLE, "Tag", &dashboard.tag_table, counts[0]);
    draw_counts_table(frame, STATUS_TABLE_TITLE, "Status", &dashboard.status_table, counts[1]);

    match (&dashboard.cross_tag, &dashboard.priority_averages) {
        (Some(cross), Some(averages)) => {
            let halves = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[2]);
            draw_cross_tag(frame, cross, halves[0]);
            draw_priority_averages(frame, averages, halves[1]);
        }
        (Some(cross), None) => draw_cross_tag(frame, cross, chunks[2]),
        (None, Some(averages)) => draw_priority_averages(frame, averages, chunks[2]),
        (None, None) => {}
    }
}

fn draw_cards(frame: &mut Frame, dashboard: &Dashboard, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let colors = [PRIMARY, SUCCESS, WARNING];
    for ((card, color), chunk) in dashboard.cards.iter().zip(colors).zip(chunks.iter()) {
        MetricCard::new(card.title, &card.value)
            .color(color)
            .render(frame, *chunk);
    }
}

fn draw_counts_table(
    frame: &mut Frame,
    title: &str,
    first: &'static str,
    rows: &[CountsRow],
    area: Rect,
) {
    let header = Row::new(counts_header(first))
        .style(Style::default().fg(PRIMARY).bold())
        .height(1);

    let rows: Vec<Row> = rows
        .iter()
        .map(|row| {
            let mut cells = vec![
                Cell::from(badge(&row.label, 22)).style(tag_style(&row.label)),
                Cell::from(row.counts.total.to_string()).style(Style::default().bold()),
            ];
            cells.extend(Priority::ALL.map(|p| {
                Cell::from(format!(" {} ", row.counts.get(p))).style(priority_style(p.label()))
            }));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Min(14), Constraint::Length(6)];
    widths.extend([Constraint::Length(5); 5]);

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(MUTED)),
    );

    frame.render_widget(table, area);
}

fn draw_cross_tag(frame: &mut Frame, rows: &[CrossTagRow], area: Rect) {
    let mut header_cells = vec!["Primary Tag"];
    header_cells.extend(STATUS_ROWS);
    header_cells.push("Total");
    let header = Row::new(header_cells)
        .style(Style::default().fg(PRIMARY).bold())
        .height(1);

    let rows: Vec<Row> = rows
        .iter()
        .map(|row| {
            let mut cells = vec![Cell::from(badge(&row.tag, 22)).style(tag_style(&row.tag))];
            cells.extend(row.statuses.iter().map(|n| Cell::from(n.to_string())));
            cells.push(Cell::from(row.total.to_string()).style(Style::default().bold()));
            Row::new(cells)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(18),
            Constraint::Percentage(17),
            Constraint::Percentage(20),
            Constraint::Percentage(15),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(CROSS_TAG_TITLE)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(MUTED)),
    );

    frame.render_widget(table, area);
}

fn draw_priority_averages(frame: &mut Frame, rows: &[PriorityAverageRow], area: Rect) {
    let header = Row::new(vec!["Priority", "Closure (h)", "Response (h)", "Closures", "Responses"])
        .style(Style::default().fg(PRIMARY).bold())
        .height(1);

    let rows: Vec<Row> = rows
        .iter()
        .map(|row| {
            Row::new(vec![
                Cell::from(badge(&row.priority, 8)).style(priority_style(&row.priority)),
                Cell::from(row.avg_closure_time.clone()),
                Cell::from(row.avg_response_time.clone()),
                Cell::from(row.closure_count.to_string()),
                Cell::from(row.response_count.to_string()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(16),
            Constraint::Percentage(22),
            Constraint::Percentage(22),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(PRIORITY_AVERAGES_TITLE)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(MUTED)),
    );

    frame.render_widget(table, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let left_text = app
        .get_status()
        .unwrap_or("Enter Fetch | r Reset | Tab Switch date | ? Help | q Quit");
    let left = Paragraph::new(left_text).style(Style::default().fg(MUTED));
    frame.render_widget(left, chunks[0]);

    let mut right = vec![Span::raw(format!("Range: {}", app.view.range()))];
    if let Some(at) = app.view.fetched_at() {
        right.push(Span::raw(format!(" | Last: {}", at.format("%H:%M:%S"))));
    }
    if app.view.is_loading() {
        right.push(Span::styled(" | Loading", Style::default().fg(SECONDARY)));
    }
    let right = Paragraph::new(Line::from(right))
        .style(Style::default().fg(MUTED))
        .alignment(Alignment::Right);
    frame.render_widget(right, chunks[1]);
}

fn draw_help_overlay(frame: &mut Frame) {
    let area = centered_rect(60, 60, frame.size());

    // Clear the background
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from("Keyboard Shortcuts").style(Style::default().fg(PRIMARY).bold()),
        Line::from(""),
        Line::from("Dates:").style(Style::default().fg(SECONDARY)),
        Line::from("  0-9 and -          Type into the focused date"),
        Line::from("  Backspace          Delete last character"),
        Line::from("  Tab / ↑ / ↓        Switch between start and end"),
        Line::from(""),
        Line::from("Actions:").style(Style::default().fg(SECONDARY)),
        Line::from("  Enter / g          Get metrics"),
        Line::from("  r                  Reset dates and results"),
        Line::from(""),
        Line::from("General:").style(Style::default().fg(SECONDARY)),
        Line::from("  ?                  Toggle this help"),
        Line::from("  q / Esc / Ctrl+C   Quit"),
        Line::from(""),
        Line::from("Press any key to close").style(Style::default().fg(MUTED).italic()),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(PRIMARY)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help, area);
}

// Helper functions

/// Table height for `rows` body rows plus header and borders
fn table_height(rows: usize) -> u16 {
    u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(3)
}

/// Padded label for a coloured badge cell
fn badge(label: &str, max_len: usize) -> String {
    format!(" {} ", truncate(label, max_len))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
