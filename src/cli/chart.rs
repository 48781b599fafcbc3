//! Terminal rendering of the historical trend chart.

use crate::cli::ui::{self, StyleType};
use crate::core::history::HistoricalSeries;
use crate::core::i18n::{self, Language, Text};
use crate::core::theme::Theme;

const CHART_HEIGHT: usize = 10;
const MAX_WIDTH: usize = 60;

/// Plots one line series into a character grid and returns the whole block.
///
/// Each call fully replaces the previous chart output. The y-axis spans the
/// data's own [min, max] rather than starting at zero, so small fluctuations
/// stay visible.
pub fn render(series: &HistoricalSeries, language: Language, theme: Theme) -> String {
    if series.is_empty() {
        let placeholder = i18n::lookup(language, Text::NoChartData);
        return format!("{}\n", ui::style_text(placeholder, StyleType::Subtle, theme));
    }

    let width = series.len().min(MAX_WIDTH);
    let sampled: Vec<_> = (0..width)
        .map(|col| {
            let index = if width == 1 {
                0
            } else {
                col * (series.len() - 1) / (width - 1)
            };
            series.points[index]
        })
        .collect();

    let min = sampled.iter().map(|p| p.rate).fold(f64::INFINITY, f64::min);
    let max = sampled
        .iter()
        .map(|p| p.rate)
        .fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    let mut grid = vec![vec![' '; width]; CHART_HEIGHT];
    for (col, point) in sampled.iter().enumerate() {
        let row = if span == 0.0 {
            CHART_HEIGHT / 2
        } else {
            let scaled = (point.rate - min) / span * (CHART_HEIGHT - 1) as f64;
            CHART_HEIGHT - 1 - scaled.round() as usize
        };
        grid[row][col] = '•';
    }

    let top_label = format!("{max:.4}");
    let bottom_label = format!("{min:.4}");
    let label_width = top_label.len().max(bottom_label.len());

    let mut out = String::new();
    let header = format!("{} to {}", series.from, series.to);
    out.push_str(&ui::style_text(&header, StyleType::Label, theme));
    out.push('\n');

    for (i, row) in grid.iter().enumerate() {
        let label = if i == 0 {
            top_label.as_str()
        } else if i == CHART_HEIGHT - 1 {
            bottom_label.as_str()
        } else {
            ""
        };
        let line: String = row.iter().collect();
        out.push_str(&format!("{label:>label_width$} ┤{line}\n"));
    }

    out.push_str(&format!("{:>label_width$} └{}\n", "", "─".repeat(width)));

    let start = sampled[0].date.format("%m-%d").to_string();
    let mid = sampled[width / 2].date.format("%m-%d").to_string();
    let end = sampled[width - 1].date.format("%m-%d").to_string();
    let axis = if width >= start.len() + end.len() + 2 {
        axis_labels(width, &start, &mid, &end)
    } else {
        // Too narrow to align labels under the columns
        format!("{start} .. {end}")
    };
    out.push_str(&format!("{:>label_width$}  {axis}\n", ""));

    if let Some(latest) = series.latest() {
        let caption = format!("1 {} = {:.4} {}", series.from, latest.rate, series.to);
        out.push_str(&ui::style_text(&caption, StyleType::Value, theme));
        out.push('\n');
    }

    out
}

fn axis_labels(width: usize, start: &str, mid: &str, end: &str) -> String {
    let mut line = vec![' '; width];
    overlay(&mut line, 0, start);
    if width >= start.len() + mid.len() + end.len() + 4 {
        overlay(&mut line, (width - mid.len()) / 2, mid);
    }
    if width >= start.len() + end.len() + 2 {
        overlay(&mut line, width - end.len(), end);
    }
    line.into_iter().collect::<String>().trim_end().to_string()
}

fn overlay(line: &mut [char], at: usize, text: &str) {
    for (i, c) in text.chars().enumerate() {
        if let Some(slot) = line.get_mut(at + i) {
            *slot = c;
        }
    }
}
