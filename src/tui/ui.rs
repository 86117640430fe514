//! Dashboard rendering - author bar chart over a sentiment trend chart

use crate::aggregate::AggregateSnapshot;
use ratatui::{
    prelude::*,
    widgets::{
        block::Title, Axis, BarChart, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph,
    },
};

/// Minimum bar width for the author chart
const MIN_BAR_WIDTH: u16 = 3;
/// Upper bound on bar width so a handful of authors does not fill the screen
const MAX_BAR_WIDTH: u16 = 12;
const BAR_GAP: u16 = 1;

/// Line colors, cycled per category
const SERIES_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::LightRed,
    Color::LightBlue,
];

/// Static text around the charts
pub struct Header<'a> {
    pub source: &'a str,
    pub updated_at: &'a str,
}

/// Draw the whole dashboard from one snapshot.
pub fn render(frame: &mut Frame, header: &Header<'_>, snapshot: &AggregateSnapshot<'_>) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),      // status bar
            Constraint::Percentage(50), // author counts
            Constraint::Min(8),         // sentiment trend
            Constraint::Length(1),      // help bar
        ])
        .split(frame.area());

    let status = format!(
        " tailchart │ {} │ Messages: {} │ Rejected: {} │ Updated: {}",
        header.source, snapshot.message_index, snapshot.rejected, header.updated_at
    );
    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::Blue).fg(Color::White));
    frame.render_widget(status_bar, vertical[0]);

    render_author_counts(frame, vertical[1], snapshot);
    render_sentiment_trend(frame, vertical[2], snapshot);

    let help = Paragraph::new(" [q/Esc/Ctrl-C] quit ").style(Style::default().bg(Color::DarkGray));
    frame.render_widget(help, vertical[3]);
}

fn render_author_counts(frame: &mut Frame, area: Rect, snapshot: &AggregateSnapshot<'_>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Real-Time Author Message Counts ")
        .title(
            Title::from(format!(" Last msg: {} ", snapshot.last_timestamp.unwrap_or("-")))
                .alignment(Alignment::Right),
        )
        .border_style(Style::default().fg(Color::Green));

    let bars: Vec<(&str, u64)> = snapshot
        .author_counts
        .iter()
        .map(|(author, count)| (author.as_str(), *count))
        .collect();

    let inner_width = area.width.saturating_sub(2);
    let slots = (bars.len() as u16).max(1);
    let bar_width = (inner_width / slots)
        .saturating_sub(BAR_GAP)
        .clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH);

    let chart = BarChart::default()
        .block(block)
        .data(bars.as_slice())
        .bar_width(bar_width)
        .bar_gap(BAR_GAP)
        .bar_style(Style::default().fg(Color::Green))
        .value_style(Style::default().fg(Color::Black).bg(Color::Green))
        .label_style(Style::default().fg(Color::White));

    frame.render_widget(chart, area);
}

fn render_sentiment_trend(frame: &mut Frame, area: Rect, snapshot: &AggregateSnapshot<'_>) {
    let points: Vec<(&str, Vec<(f64, f64)>)> = snapshot
        .category_series
        .iter()
        .map(|(category, series)| {
            let data = series.points().iter().map(|(i, s)| (*i as f64, *s)).collect();
            (category.as_str(), data)
        })
        .collect();

    let datasets: Vec<Dataset> = points
        .iter()
        .enumerate()
        .map(|(i, (category, data))| {
            Dataset::default()
                .name(*category)
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()]))
                .data(data)
        })
        .collect();

    let x_max = snapshot.max_series_index().max(2) as f64;

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Sentiment Trend by Category "),
        )
        .x_axis(
            Axis::default()
                .title("Message #")
                .style(Style::default().fg(Color::Gray))
                .bounds([1.0, x_max])
                .labels(vec![
                    Span::raw("1"),
                    Span::raw(format!("{:.0}", (1.0 + x_max) / 2.0)),
                    Span::raw(format!("{:.0}", x_max)),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Sentiment")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, 1.0])
                .labels(vec![Span::raw("0.0"), Span::raw("0.5"), Span::raw("1.0")]),
        )
        .legend_position(Some(LegendPosition::TopRight))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

    frame.render_widget(chart, area);
}
