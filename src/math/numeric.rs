//! Scalar helpers shared by the collision code.

/// Decimal places kept by [`round_for_floating_point`].
const ROUNDING_SCALE: f64 = 1000.0;

/// Inclusive (`min <= num <= max`) or exclusive range check.
pub fn is_in_range(min: f64, num: f64, max: f64, inclusive: bool) -> bool {
    if inclusive {
        num >= min && num <= max
    } else {
        num > min && num < max
    }
}

/// Real roots of `a*t^2 + b*t + c`. NaN roots (negative discriminant, `a == 0`
/// with `b == 0`) are dropped.
pub fn quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    let discriminant_root = (b * b - 4.0 * a * c).sqrt();
    [
        (-b + discriminant_root) / (2.0 * a),
        (-b - discriminant_root) / (2.0 * a),
    ]
    .into_iter()
    .filter(|root| !root.is_nan())
    .collect()
}

/// Rounds to three decimals, halves toward positive infinity.
///
/// Every time-of-impact comparison goes through this so that bodies which are
/// currently touching land on exactly `0.0`.
pub fn round_for_floating_point(num: f64) -> f64 {
    (num * ROUNDING_SCALE + 0.5).floor() / ROUNDING_SCALE
}
