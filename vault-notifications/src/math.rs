/// Significant decimals shown for an asset of the given precision.
///
/// Balances below the last significant digit render as zero in the dashboard,
/// so anything smaller is treated as dust.
pub fn default_significant_decimals(asset_decimals: u8) -> u8 {
    match asset_decimals {
        18 => 6,
        8 => 5,
        6 => 2,
        other => other.min(4),
    }
}

/// Whether `amount` (raw base units) is indistinguishable from zero at
/// `significant_decimals` of precision.
///
/// Formula: amount < 10^(asset_decimals - significant_decimals)
///
/// When the margin exceeds `u128::MAX` every representable amount is dust.
pub fn is_practically_zero(amount: u128, asset_decimals: u8, significant_decimals: u8) -> bool {
    if significant_decimals >= asset_decimals {
        return amount == 0;
    }

    let exponent = u32::from(asset_decimals - significant_decimals);
    match 10u128.checked_pow(exponent) {
        Some(margin) => amount < margin,
        None => true,
    }
}
