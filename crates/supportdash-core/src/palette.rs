//! Category colours
//!
//! Tag and priority labels map to colour swatches through static tables.
//! Labels missing from a table get the table's neutral fallback, so a new
//! category from the service renders without code changes and a new colour
//! is one more table row.

use ratatui::style::{Color, Modifier, Style};

/// Foreground/background pair for a label badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    /// Text colour
    pub fg: Color,
    /// Badge background
    pub bg: Color,
}

impl Swatch {
    const fn rgb(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> Self {
        Self {
            fg: Color::Rgb(fg.0, fg.1, fg.2),
            bg: Color::Rgb(bg.0, bg.1, bg.2),
        }
    }

    /// Badge style for this swatch
    pub fn style(self) -> Style {
        Style::default()
            .fg(self.fg)
            .bg(self.bg)
            .add_modifier(Modifier::BOLD)
    }
}

/// Lookup table from label to swatch with a fallback
#[derive(Debug)]
pub struct Palette {
    entries: &'static [(&'static str, Swatch)],
    fallback: Swatch,
}

impl Palette {
    /// Swatch for `label`, or the fallback when the label is unknown
    pub fn swatch(&self, label: &str) -> Swatch {
        self.entries
            .iter()
            .find(|(name, _)| *name == label)
            .map_or(self.fallback, |(_, swatch)| *swatch)
    }

    /// Badge style for `label`
    pub fn style(&self, label: &str) -> Style {
        self.swatch(label).style()
    }

    /// Whether `label` has its own entry
    pub fn is_known(&self, label: &str) -> bool {
        self.entries.iter().any(|(name, _)| *name == label)
    }
}

const WHITE: (u8, u8, u8) = (255, 255, 255);

/// Tag and status labels
pub static TAGS: Palette = Palette {
    entries: &[
        ("Resources", Swatch::rgb((107, 33, 168), (243, 232, 255))),
        ("Resolved", Swatch::rgb((22, 101, 52), (220, 252, 231))),
        ("Bug", Swatch::rgb((153, 27, 27), (254, 226, 226))),
        ("Knowledge Gap", Swatch::rgb((30, 64, 175), (219, 234, 254))),
        ("In Process", Swatch::rgb((133, 77, 14), (254, 249, 195))),
        ("New Feature", Swatch::rgb((17, 94, 89), (236, 252, 203))),
        ("Documentation update", Swatch::rgb((157, 23, 77), (252, 231, 243))),
    ],
    fallback: Swatch::rgb((31, 41, 55), (243, 244, 246)),
};

/// Priority labels
pub static PRIORITIES: Palette = Palette {
    entries: &[
        ("P0", Swatch::rgb(WHITE, (239, 68, 68))),
        ("P1", Swatch::rgb(WHITE, (249, 115, 22))),
        ("P2", Swatch::rgb(WHITE, (234, 179, 8))),
        ("P3", Swatch::rgb(WHITE, (34, 197, 94))),
        ("P4", Swatch::rgb(WHITE, (59, 130, 246))),
    ],
    fallback: Swatch::rgb(WHITE, (107, 114, 128)),
};

/// Badge style for a tag or status label
pub fn tag_style(tag: &str) -> Style {
    TAGS.style(tag)
}

/// Badge style for a priority label
pub fn priority_style(priority: &str) -> Style {
    PRIORITIES.style(priority)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Bug", Color::Rgb(254, 226, 226))]
    #[case("Resolved", Color::Rgb(220, 252, 231))]
    #[case("Documentation update", Color::Rgb(252, 231, 243))]
    #[case("Pending from Org", Color::Rgb(243, 244, 246))]
    #[case("bug", Color::Rgb(243, 244, 246))]
    fn test_tag_swatches(#[case] tag: &str, #[case] bg: Color) {
        assert_eq!(TAGS.swatch(tag).bg, bg);
    }

    #[rstest]
    #[case("P0", Color::Rgb(239, 68, 68))]
    #[case("P4", Color::Rgb(59, 130, 246))]
    #[case("P9", Color::Rgb(107, 114, 128))]
    #[case("", Color::Rgb(107, 114, 128))]
    fn test_priority_swatches(#[case] priority: &str, #[case] bg: Color) {
        assert_eq!(PRIORITIES.swatch(priority).bg, bg);
    }

    #[test]
    fn test_unknown_labels_share_fallback() {
        assert!(!TAGS.is_known("Escalated"));
        assert_eq!(tag_style("Escalated"), tag_style("Something else"));
        assert_ne!(tag_style("Escalated"), tag_style("Bug"));
    }
}
