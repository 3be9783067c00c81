use super::entry::{DerivedEntry, RawEntry};

/// Sorts `raw` by date and computes totals plus deltas against the preceding
/// entry. The earliest entry always carries zero deltas.
///
/// The sort is stable: entries sharing a date keep their input order, so the
/// one given later is treated as the later observation. Duplicates are not
/// removed.
pub fn derive_entries(raw: &[RawEntry]) -> Vec<DerivedEntry> {
    let mut sorted = raw.to_vec();
    sorted.sort_by_key(|entry| entry.date);

    let mut previous: Option<(f64, f64, f64)> = None;
    sorted
        .into_iter()
        .map(|entry| {
            let total = entry.asset1 + entry.asset2;
            let (delta1, delta2, delta_total) = match previous {
                Some((asset1, asset2, prior_total)) => (
                    entry.asset1 - asset1,
                    entry.asset2 - asset2,
                    total - prior_total,
                ),
                None => (0.0, 0.0, 0.0),
            };
            previous = Some((entry.asset1, entry.asset2, total));
            DerivedEntry {
                date: entry.date,
                asset1: entry.asset1,
                asset2: entry.asset2,
                total,
                delta1,
                delta2,
                delta_total,
            }
        })
        .collect()
}
