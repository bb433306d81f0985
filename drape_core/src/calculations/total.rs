//! Project total: the sum of every window's grand total.

use crate::window::WindowRecord;

/// Sum the grand totals of `windows`. Non-finite totals count as zero and an
/// empty collection totals zero.
pub fn aggregate<'a, I>(windows: I) -> f64
where
    I: IntoIterator<Item = &'a WindowRecord>,
{
    windows
        .into_iter()
        .map(|w| w.costs.grand_total)
        .filter(|total| total.is_finite())
        .sum()
}
