//! Reusable TUI components
//!
//! This module contains reusable widget components for the TUI.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// A metric card widget showing a single value with a label
pub struct MetricCard<'a> {
    title: &'a str,
    value: &'a str,
    color: Color,
}

impl<'a> MetricCard<'a> {
    pub fn new(title: &'a str, value: &'a str) -> Self {
        Self {
            title,
            value,
            color: Color::White,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        let paragraph = Paragraph::new(Span::styled(
            self.value,
            Style::default().fg(self.color).add_modifier(Modifier::BOLD),
        ))
        .block(block)
        .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
    }
}

/// Single-line text input with a title
pub struct DateInput<'a> {
    label: &'a str,
    value: &'a str,
    focused: bool,
}

impl<'a> DateInput<'a> {
    pub fn new(label: &'a str, value: &'a str) -> Self {
        Self {
            label,
            value,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let border = if self.focused { Color::Cyan } else { Color::DarkGray };

        let mut spans = vec![if self.value.is_empty() && !self.focused {
            Span::styled("YYYY-MM-DD", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(self.value)
        }];
        if self.focused {
            spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
        }

        let paragraph = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title(self.label)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );

        frame.render_widget(paragraph, area);
    }
}

/// Action button that greys out while disabled
pub struct Button<'a> {
    label: &'a str,
    hotkey: &'a str,
    enabled: bool,
    color: Color,
}

impl<'a> Button<'a> {
    pub fn new(label: &'a str, hotkey: &'a str) -> Self {
        Self {
            label,
            hotkey,
            enabled: true,
            color: Color::Indexed(105),
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let style = if self.enabled {
            Style::default().fg(self.color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let line = Line::from(vec![
            Span::styled(self.label, style),
            Span::styled(format!(" [{}]", self.hotkey), Style::default().fg(Color::DarkGray)),
        ]);

        let paragraph = Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(style));

        frame.render_widget(paragraph, area);
    }
}
