//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - original (monthly) points: `o`
//! - resampled bucket means: `#`

use chrono::NaiveDate;

/// Render an original series with its resampled overlay.
pub fn render_series_plot(
    original: &[(NaiveDate, f64)],
    resampled: &[(NaiveDate, f64)],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((d_min, d_max)) = date_range(original, resampled) else {
        return "Plot: no points\n".to_string();
    };
    let (y_min, y_max) = value_range(original, resampled).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    for &(date, value) in original {
        let x = map_x(date, d_min, d_max, width);
        let y = map_y(value, y_min, y_max, height);
        grid[y][x] = 'o';
    }
    // Overlay second so bucket means stay visible.
    for &(date, value) in resampled {
        let x = map_x(date, d_min, d_max, width);
        let y = map_y(value, y_min, y_max, height);
        grid[y][x] = '#';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: dates=[{d_min}, {d_max}] | y=[{y_min:.2}, {y_max:.2}] | o=monthly #=resampled\n"
    ));
    for row in grid {
        out.push('|');
        out.extend(row);
        out.push_str("|\n");
    }
    out.push('+');
    out.push_str(&"-".repeat(width));
    out.push_str("+\n");
    out
}

fn date_range(
    a: &[(NaiveDate, f64)],
    b: &[(NaiveDate, f64)],
) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = a.iter().chain(b.iter()).map(|&(d, _)| d);
    let first = dates.next()?;
    let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some((min, max))
}

fn value_range(a: &[(NaiveDate, f64)], b: &[(NaiveDate, f64)]) -> Option<(f64, f64)> {
    let mut values = a
        .iter()
        .chain(b.iter())
        .map(|&(_, v)| v)
        .filter(|v| v.is_finite());
    let first = values.next()?;
    let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    Some((min, max))
}

fn pad_range(min: f64, max: f64, pad: f64) -> (f64, f64) {
    if (max - min).abs() < 1e-12 {
        return (min - 0.5, max + 0.5);
    }
    let span = max - min;
    (min - span * pad, max + span * pad)
}

fn map_x(date: NaiveDate, d_min: NaiveDate, d_max: NaiveDate, width: usize) -> usize {
    let span = (d_max - d_min).num_days().max(1) as f64;
    let offset = (date - d_min).num_days() as f64;
    let u = (offset / span).clamp(0.0, 1.0);
    ((u * (width as f64 - 1.0)).round() as usize).min(width - 1)
}

fn map_y(value: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((value - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top of the grid.
    let from_bottom = (u * (height as f64 - 1.0)).round() as usize;
    height - 1 - from_bottom.min(height - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn plot_has_requested_dimensions() {
        let original = vec![(d(2020, 1, 1), 100.0), (d(2020, 12, 1), 120.0)];
        let plot = render_series_plot(&original, &[], 40, 10);

        let lines: Vec<&str> = plot.lines().collect();
        // Header + grid rows + bottom border.
        assert_eq!(lines.len(), 1 + 10 + 1);
        assert!(lines[1].len() >= 40 + 2);
    }

    #[test]
    fn extreme_points_land_in_corners() {
        let original = vec![(d(2020, 1, 1), 0.0), (d(2020, 12, 1), 10.0)];
        let plot = render_series_plot(&original, &[], 20, 5);
        let lines: Vec<&str> = plot.lines().collect();

        // Low first point sits on the bottom row, high last point on top.
        assert!(lines[1].contains('o'));
        assert!(lines[5].contains('o'));
    }

    #[test]
    fn resampled_overlay_wins_collisions() {
        let original = vec![(d(2020, 6, 1), 5.0), (d(2021, 6, 1), 5.0)];
        let resampled = vec![(d(2020, 6, 1), 5.0)];
        let plot = render_series_plot(&original, &resampled, 20, 5);
        assert!(plot.contains('#'));
    }

    #[test]
    fn empty_input_renders_placeholder() {
        assert_eq!(render_series_plot(&[], &[], 20, 5), "Plot: no points\n");
    }
}
