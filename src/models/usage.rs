use crate::config::Target;

/// Used-space percentage for one target, taken during the current run.
#[derive(Debug, Clone, Copy)]
pub struct UsageSample<'a> {
    pub target:   &'a Target,
    pub used_pct: u8,
}

impl<'a> UsageSample<'a> {
    pub fn new(target: &'a Target, used_pct: u8) -> Self {
        Self { target, used_pct }
    }
}

/// Used percentage the way df(1) reports it: used / (used + avail), rounded up.
///
/// Reserved root blocks are excluded from the denominator, so a filesystem
/// can read 100% while `free` is still non-zero.
pub fn df_percent(used_bytes: u64, avail_bytes: u64) -> u8 {
    let denom = used_bytes as u128 + avail_bytes as u128;
    if denom == 0 { return 0; }
    let pct = (used_bytes as u128 * 100).div_ceil(denom);
    pct.min(100) as u8
}
