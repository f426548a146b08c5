//! Fixed business rates.
//!
//! Every conversion and markup figure in the crate reads from here. Documents,
//! print views and profit projections must never carry their own copies.

/// USD to JOD conversion applied to every secondary-currency figure.
pub const USD_TO_JOD_RATE: f64 = 0.710;

/// Markup multiplier for bulk buyers (100% markup).
pub const BULK_MARKUP: f64 = 2.0;

/// Markup multiplier for distributors (150% markup).
pub const DISTRIBUTOR_MARKUP: f64 = 2.5;

/// Markup multiplier for retail buyers (200% markup).
pub const RETAIL_MARKUP: f64 = 3.0;

/// Convert a USD amount to JOD.
#[inline]
pub fn to_jod(usd: f64) -> f64 {
    usd * USD_TO_JOD_RATE
}
