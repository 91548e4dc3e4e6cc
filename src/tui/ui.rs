use crate::core::listing::{Band, ListingLine, Segment, Tone};
use crate::tui::render::View;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

pub const PROMPT: &str = "Search> ";

pub fn draw_ui(frame: &mut Frame, view: &View) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Min(0), Length(1)]);
    let [listing_area, prompt_area] = layout.areas(frame.area());

    let lines: Vec<Line> = view.listing.iter().map(listing_line).collect();
    let listing = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });
    frame.render_widget(listing, listing_area);

    let prompt = Line::from(vec![
        Span::styled(PROMPT, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(view.input.as_str()),
        Span::styled(view.suggestion.as_str(), muted_style()),
    ]);
    frame.render_widget(Paragraph::new(prompt), prompt_area);

    frame.set_cursor_position(cursor_position(prompt_area, &view.input));
}

/// Just after the typed text, never on the suggestion.
pub fn cursor_position(prompt_area: Rect, input: &str) -> Position {
    let offset = (PROMPT.width() + input.width()).min(u16::MAX as usize) as u16;
    let max_x = prompt_area.right().saturating_sub(1);
    Position::new(
        prompt_area.x.saturating_add(offset).min(max_x),
        prompt_area.y,
    )
}

fn listing_line(line: &ListingLine) -> Line<'_> {
    let spans: Vec<Span> = line
        .segments
        .iter()
        .map(|segment| segment_span(segment, line.band))
        .collect();
    Line::from(spans)
}

fn segment_span(segment: &Segment, band: Band) -> Span<'_> {
    Span::styled(segment.text.as_str(), tone_style(segment.tone, band))
}

fn tone_style(tone: Tone, band: Band) -> Style {
    match tone {
        Tone::Plain => Style::default(),
        Tone::Reference => Style::default().fg(Color::Black).bg(band_color(band)),
        Tone::Found => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        Tone::Summary => Style::default().fg(Color::Cyan),
        Tone::Notice => Style::default().fg(Color::Red),
    }
}

fn band_color(band: Band) -> Color {
    match band {
        Band::Even => Color::Yellow,
        Band::Odd => Color::Blue,
    }
}

fn muted_style() -> Style {
    Style::default().fg(Color::DarkGray)
}
