//! Percentage distributions that always close to exactly 100.

/// Percentages are computed in hundredths of a percent.
const WHOLE: u64 = 10_000;

/// One named bucket of a distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    pub name: String,
    pub count: usize,
    pub hundredths: i64,
}

impl Share {
    pub fn percentage(&self) -> f64 {
        self.hundredths as f64 / 100.0
    }
}

/// Rounds `num / den` half-up.
fn round_ratio(num: u64, den: u64) -> i64 {
    ((2 * num + den) / (2 * den)) as i64
}

/// Converts raw counts to shares ordered by count descending, then name.
///
/// Each share is rounded to two decimals; whatever rounding residual remains
/// is added to the first (largest) share so the total is exactly 100.00.
/// Zero counts are dropped. An empty or all-zero input yields no shares.
///
/// With many buckets of equal count the residual can exceed the first
/// share and push it below zero: 160 buckets of one each round to 0.63
/// apiece, leaving a residual of -0.80 and a first share of -0.17.
pub fn distribute<I>(counts: I) -> Vec<Share>
where
    I: IntoIterator<Item = (String, usize)>,
{
    let mut shares: Vec<Share> = counts
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(name, count)| Share { name, count, hundredths: 0 })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

    let total: u64 = shares.iter().map(|s| s.count as u64).sum();
    if total == 0 {
        return Vec::new();
    }

    for share in &mut shares {
        share.hundredths = round_ratio(share.count as u64 * WHOLE, total);
    }
    let residual = WHOLE as i64 - shares.iter().map(|s| s.hundredths).sum::<i64>();
    if residual != 0 {
        shares[0].hundredths += residual;
    }
    shares
}
