use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::metrics::CharState;
use crate::time_series::WpmSample;
use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// X (seconds) and Y (WPM) bounds for the results chart.
pub fn compute_chart_params(samples: &[WpmSample]) -> (f64, f64) {
    let highest_wpm = samples
        .iter()
        .map(|s| s.wpm)
        .minmax()
        .into_option()
        .map(|(_, max)| max.round())
        .unwrap_or(0.0);

    let overall_duration = match samples.last() {
        Some(s) => s.secs.max(1.0),
        None => 1.0,
    };

    (overall_duration, highest_wpm)
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        let snapshot = session.snapshot();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);
        let underlined_dim_bold_style = Style::default()
            .patch(dim_bold_style)
            .add_modifier(Modifier::UNDERLINED);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let magenta_style = Style::default().fg(Color::Magenta);

        if !session.has_finished() {
            let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
            let mut prompt_occupied_lines =
                ((session.reference().width() as f64 / max_chars_per_line as f64).ceil() + 1.0)
                    as u16;

            if session.reference().width() <= max_chars_per_line as usize {
                prompt_occupied_lines = 1;
            }

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .horizontal_margin(HORIZONTAL_MARGIN)
                .constraints(
                    [
                        Constraint::Length(
                            ((area.height as f64 - prompt_occupied_lines as f64) / 2.0) as u16,
                        ),
                        Constraint::Length(2),
                        Constraint::Length(prompt_occupied_lines),
                        Constraint::Length(2),
                        Constraint::Min(0),
                    ]
                    .as_ref(),
                )
                .split(area);

            let typed: Vec<char> = session.typed().chars().collect();
            let spans = session
                .reference()
                .chars()
                .enumerate()
                .map(|(idx, expected)| match snapshot.classes[idx] {
                    CharState::Correct => Span::styled(expected.to_string(), green_bold_style),
                    CharState::Incorrect => Span::styled(
                        match typed.get(idx).copied() {
                            Some(' ') | None => "·".to_owned(),
                            Some(c) => c.to_string(),
                        },
                        red_bold_style,
                    ),
                    CharState::Current => {
                        Span::styled(expected.to_string(), underlined_dim_bold_style)
                    }
                    CharState::Pending => Span::styled(expected.to_string(), dim_bold_style),
                })
                .collect::<Vec<Span>>();

            let timer = Paragraph::new(Span::styled(
                format!("{}", snapshot.clock_remaining),
                dim_bold_style,
            ))
            .alignment(Alignment::Center);
            timer.render(chunks[1], buf);

            let prompt = Paragraph::new(Line::from(spans))
                .alignment(if prompt_occupied_lines == 1 {
                    // single-line prompts read best centered
                    Alignment::Center
                } else {
                    Alignment::Left
                })
                .wrap(Wrap { trim: true });
            prompt.render(chunks[2], buf);

            let live = Paragraph::new(Span::styled(
                format!(
                    "{} wpm   {}% acc   {} errors",
                    snapshot.metrics.wpm, snapshot.metrics.accuracy, snapshot.metrics.error_count
                ),
                italic_style,
            ))
            .alignment(Alignment::Center);
            live.render(chunks[3], buf);
        } else {
            let show_settings = matches!(self.state, AppState::Results);

            let constraints = if show_settings {
                vec![
                    Constraint::Min(1),    // chart
                    Constraint::Length(1), // stats
                    Constraint::Length(1), // padding
                    Constraint::Length(2), // settings info
                    Constraint::Length(1), // legend
                ]
            } else {
                vec![
                    Constraint::Min(1),
                    Constraint::Length(1),
                    Constraint::Length(1),
                    Constraint::Length(1),
                ]
            };

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .horizontal_margin(HORIZONTAL_MARGIN)
                .vertical_margin(VERTICAL_MARGIN)
                .constraints(constraints.as_slice())
                .split(area);

            let (overall_duration, highest_wpm) = compute_chart_params(session.wpm_samples());

            let tuples: Vec<(f64, f64)> = session
                .wpm_samples()
                .iter()
                .map(|s| (s.secs, s.wpm))
                .collect();
            let datasets = vec![Dataset::default()
                .marker(ratatui::symbols::Marker::Braille)
                .style(magenta_style)
                .graph_type(GraphType::Line)
                .data(&tuples)];

            let chart = Chart::new(datasets)
                .x_axis(
                    Axis::default()
                        .title("seconds")
                        .bounds([1.0, overall_duration])
                        .labels(vec![
                            Span::styled("1", bold_style),
                            Span::styled(format_label(overall_duration), bold_style),
                        ]),
                )
                .y_axis(
                    Axis::default()
                        .title("wpm")
                        .bounds([0.0, highest_wpm])
                        .labels(vec![
                            Span::styled("0", bold_style),
                            Span::styled(format_label(highest_wpm), bold_style),
                        ]),
                );
            chart.render(chunks[0], buf);

            let stats = Paragraph::new(Span::styled(
                format!(
                    "{} wpm   {}% acc   {} errors",
                    snapshot.metrics.wpm, snapshot.metrics.accuracy, snapshot.metrics.error_count
                ),
                bold_style,
            ))
            .alignment(Alignment::Center);
            stats.render(chunks[1], buf);

            if show_settings {
                let settings_text = format!(
                    "Difficulty: {} | Duration: {}s\n(1) easy (2) medium (3) hard",
                    self.difficulty, self.duration_secs
                );
                let settings = Paragraph::new(settings_text)
                    .style(
                        Style::default()
                            .fg(Color::Gray)
                            .add_modifier(Modifier::ITALIC),
                    )
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true });
                settings.render(chunks[3], buf);
            }

            let legend_chunk_index = if show_settings { 4 } else { 3 };
            let legend = Paragraph::new(Span::styled(
                String::from("(r)etry / (n)ew / (esc)ape"),
                italic_style,
            ));
            legend.render(chunks[legend_chunk_index], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::Difficulty;

    fn test_app(reference: &str) -> App {
        App::with_reference(reference.to_string(), Difficulty::Easy, 60)
    }

    #[test]
    fn chart_params_empty_samples() {
        let (x, y) = compute_chart_params(&[]);
        assert_eq!(x, 1.0);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn chart_params_track_last_sample_and_peak() {
        let samples = vec![
            WpmSample::new(1.0, 24.0),
            WpmSample::new(2.0, 36.0),
            WpmSample::new(3.0, 30.0),
        ];
        let (x, y) = compute_chart_params(&samples);
        assert_eq!(x, 3.0);
        assert_eq!(y, 36.0);
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(1.0), "1");
        assert_eq!(format_label(1.2345), "1.23");
    }

    #[test]
    fn typing_screen_renders_without_panic() {
        let mut app = test_app("hello world");
        app.push_char('h');
        app.push_char('x');

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        (&app).render(area, &mut buf);

        let content: String = buf.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("60"));
        assert!(content.contains("errors"));
    }

    #[test]
    fn results_screen_renders_final_stats() {
        let mut app = test_app("hi");
        app.push_char('h');
        app.push_char('i');
        assert!(app.session.has_finished());
        app.state = AppState::Results;

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        (&app).render(area, &mut buf);

        let content: String = buf.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("wpm"));
        assert!(content.contains("Difficulty"));
    }

    #[test]
    fn narrow_terminal_does_not_underflow() {
        let app = test_app("a reasonably long reference text for wrapping");
        let area = Rect::new(0, 0, 8, 6);
        let mut buf = Buffer::empty(area);
        (&app).render(area, &mut buf);
    }
}
