//! Text renderings of the two charts: cumulative totals and per-asset deltas.

use crate::currency::{format_currency, format_date_with_weekday, format_signed};
use crate::ledger::DerivedEntry;

const TOTAL_GLYPH: char = '█';
const ASSET1_GLYPH: char = '█';
const ASSET2_GLYPH: char = '▓';
const AXIS: char = '|';

/// One bar per entry, scaled between the smallest and largest total in view
/// so day-to-day movement stays visible on large balances.
pub fn render_total_chart(entries: &[DerivedEntry], currency: &str, width: usize) -> Vec<String> {
    let width = width.max(2);
    let totals: Vec<f64> = entries.iter().map(|entry| finite(entry.total)).collect();
    let min = totals.iter().copied().fold(f64::INFINITY, f64::min);
    let max = totals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    entries
        .iter()
        .zip(&totals)
        .map(|(entry, total)| {
            let length = if span > 0.0 {
                1 + ((total - min) / span * (width - 1) as f64).round() as usize
            } else {
                width
            };
            format!(
                "{}  {:<width$}  {}",
                format_date_with_weekday(entry.date),
                bar(TOTAL_GLYPH, length),
                format_currency(*total, currency),
            )
        })
        .collect()
}

/// Two rows per entry (one per asset) with bars growing left of the axis for
/// losses and right of it for gains.
pub fn render_delta_chart(
    entries: &[DerivedEntry],
    labels: (&str, &str),
    currency: &str,
    width: usize,
) -> Vec<String> {
    let half = (width / 2).max(1);
    let max_abs = entries
        .iter()
        .flat_map(|entry| [finite(entry.delta1).abs(), finite(entry.delta2).abs()])
        .fold(0.0, f64::max);
    let label_width = labels.0.chars().count().max(labels.1.chars().count());

    let mut lines = Vec::with_capacity(entries.len() * 2);
    for entry in entries {
        let date = format_date_with_weekday(entry.date);
        let blank = " ".repeat(date.chars().count());
        let rows = [
            (&date, labels.0, ASSET1_GLYPH, entry.delta1),
            (&blank, labels.1, ASSET2_GLYPH, entry.delta2),
        ];
        for (prefix, label, glyph, delta) in rows {
            let delta = finite(delta);
            let length = if max_abs > 0.0 {
                (delta.abs() / max_abs * half as f64).round() as usize
            } else {
                0
            };
            let (left, right) = if delta < 0.0 {
                (bar(glyph, length), String::new())
            } else {
                (String::new(), bar(glyph, length))
            };
            lines.push(format!(
                "{prefix}  {label:<label_width$}  {left:>half$}{AXIS}{right:<half$}  {}",
                format_signed(delta, currency),
            ));
        }
    }
    lines
}

fn bar(glyph: char, length: usize) -> String {
    std::iter::repeat(glyph).take(length).collect()
}

fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{derive_entries, RawEntry};
    use chrono::NaiveDate;

    fn series() -> Vec<DerivedEntry> {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        derive_entries(&[
            RawEntry::new(day(1), 100.0, 50.0),
            RawEntry::new(day(2), 110.0, 40.0),
            RawEntry::new(day(3), 130.0, 70.0),
        ])
    }

    #[test]
    fn total_chart_scales_between_min_and_max() {
        let lines = render_total_chart(&series(), "TWD", 10);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("2024-01-01 (Mon)"));
        assert_eq!(lines[0].matches(TOTAL_GLYPH).count(), 1);
        assert_eq!(lines[2].matches(TOTAL_GLYPH).count(), 10);
        assert!(lines[2].ends_with("NT$200"));
    }

    #[test]
    fn flat_totals_fill_the_width() {
        let entries = &series()[..2];
        let lines = render_total_chart(entries, "TWD", 6);
        assert!(lines
            .iter()
            .all(|line| line.matches(TOTAL_GLYPH).count() == 6));
    }

    #[test]
    fn delta_chart_places_losses_left_of_axis() {
        let lines = render_delta_chart(&series(), ("A1", "A2"), "TWD", 20);
        assert_eq!(lines.len(), 6);
        // 2024-01-02: asset1 +10, asset2 -10; the largest delta is +30.
        let gain = &lines[2];
        let loss = &lines[3];
        let gain_axis = gain.find(AXIS).unwrap();
        let loss_axis = loss.find(AXIS).unwrap();
        assert!(gain[gain_axis..].contains(ASSET1_GLYPH));
        assert!(loss[..loss_axis].contains(ASSET2_GLYPH));
        assert!(gain.ends_with("+NT$10"));
        assert!(loss.ends_with("-NT$10"));
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert!(render_total_chart(&[], "TWD", 10).is_empty());
        assert!(render_delta_chart(&[], ("a", "b"), "TWD", 10).is_empty());
    }
}
