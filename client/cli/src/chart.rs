use crate::api::types::ChartSeries;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, BarChart, Block, Borders, Chart, Dataset, GraphType, Widget},
};

pub const DEFAULT_WIDTH: u16 = 48;
pub const DEFAULT_HEIGHT: u16 = 12;

const DEMO_LABELS: [&str; 4] = ["Jan", "Feb", "Mar", "Apr"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub data: Vec<u64>,
    pub color: (u8, u8, u8),
}

impl ChartSpec {
    /// Sample series shown on the folder chart when no metrics source is set.
    pub fn folder_demo() -> Self {
        Self {
            kind: ChartKind::Bar,
            title: "Folders Created".to_string(),
            labels: DEMO_LABELS.iter().map(|s| s.to_string()).collect(),
            data: vec![10, 20, 15, 30],
            color: (54, 162, 235),
        }
    }

    /// Sample series shown on the user activity chart when no metrics source is set.
    pub fn activity_demo() -> Self {
        Self {
            kind: ChartKind::Line,
            title: "User Activity".to_string(),
            labels: DEMO_LABELS.iter().map(|s| s.to_string()).collect(),
            data: vec![5, 15, 10, 25],
            color: (255, 99, 132),
        }
    }

    /// Same chart with a fetched series, or `None` if the series is unusable.
    pub fn with_series(&self, series: ChartSeries) -> Option<Self> {
        if series.data.is_empty() || series.labels.len() != series.data.len() {
            return None;
        }
        Some(Self {
            labels: series.labels,
            data: series.data,
            ..self.clone()
        })
    }
}

/// Draw a chart off-screen and return its rows with trailing blanks trimmed.
pub fn render_lines(spec: &ChartSpec, width: u16, height: u16) -> Vec<String> {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    let (r, g, b) = spec.color;
    let style = Style::default().fg(Color::Rgb(r, g, b));
    let block = Block::default()
        .borders(Borders::ALL)
        .title(spec.title.as_str());

    match spec.kind {
        ChartKind::Bar => {
            let bars: Vec<(&str, u64)> = spec
                .labels
                .iter()
                .map(String::as_str)
                .zip(spec.data.iter().copied())
                .collect();
            let slots = bars.len().max(1) as u16;
            let bar_width = (width.saturating_sub(2) / slots).saturating_sub(1).clamp(1, 9);
            BarChart::default()
                .block(block)
                .bar_width(bar_width)
                .bar_gap(1)
                .bar_style(style)
                .data(bars.as_slice())
                .render(area, &mut buf);
        }
        ChartKind::Line => {
            let points: Vec<(f64, f64)> = spec
                .data
                .iter()
                .enumerate()
                .map(|(i, v)| (i as f64, *v as f64))
                .collect();
            let y_max = spec.data.iter().copied().max().unwrap_or(0).max(1);
            let x_max = points.len().saturating_sub(1).max(1) as f64;
            let x_labels: Vec<Span> = spec.labels.iter().map(|l| Span::raw(l.as_str())).collect();
            let y_labels = vec![Span::raw("0"), Span::raw(y_max.to_string())];

            let dataset = Dataset::default()
                .name(spec.title.as_str())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(style)
                .data(&points);
            Chart::new(vec![dataset])
                .block(block)
                .x_axis(Axis::default().bounds([0.0, x_max]).labels(x_labels))
                .y_axis(Axis::default().bounds([0.0, y_max as f64]).labels(y_labels))
                .render(area, &mut buf);
        }
    }

    buf.content
        .chunks(width as usize)
        .map(|row| {
            row.iter()
                .map(|cell| cell.symbol())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_series() {
        let folders = ChartSpec::folder_demo();
        assert_eq!(folders.kind, ChartKind::Bar);
        assert_eq!(folders.data, [10, 20, 15, 30]);
        assert_eq!(folders.labels, ["Jan", "Feb", "Mar", "Apr"]);

        let activity = ChartSpec::activity_demo();
        assert_eq!(activity.kind, ChartKind::Line);
        assert_eq!(activity.data, [5, 15, 10, 25]);
    }

    #[test]
    fn test_with_series_rejects_mismatched_lengths() {
        let spec = ChartSpec::folder_demo();
        let bad = ChartSeries {
            labels: vec!["Jan".into()],
            data: vec![1, 2],
        };
        assert!(spec.with_series(bad).is_none());

        let good = ChartSeries {
            labels: vec!["May".into(), "Jun".into()],
            data: vec![4, 8],
        };
        let updated = spec.with_series(good).unwrap();
        assert_eq!(updated.data, [4, 8]);
        assert_eq!(updated.title, "Folders Created");
    }

    #[test]
    fn test_bar_chart_renders_title_and_labels() {
        let lines = render_lines(&ChartSpec::folder_demo(), DEFAULT_WIDTH, DEFAULT_HEIGHT);
        assert_eq!(lines.len(), DEFAULT_HEIGHT as usize);
        assert!(lines[0].contains("Folders Created"));
        let body = lines.join("\n");
        assert!(body.contains("Jan"));
        assert!(body.contains("Apr"));
    }

    #[test]
    fn test_line_chart_draws_points() {
        let lines = render_lines(&ChartSpec::activity_demo(), DEFAULT_WIDTH, DEFAULT_HEIGHT);
        assert!(lines[0].contains("User Activity"));
        let braille = lines
            .iter()
            .flat_map(|l| l.chars())
            .filter(|c| ('\u{2801}'..='\u{28ff}').contains(c))
            .count();
        assert!(braille > 0);
    }
}
