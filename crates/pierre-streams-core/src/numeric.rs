// ABOUTME: Rounding and JSON number helpers shared by statistics and sample encoding
// ABOUTME: Keeps integral values as JSON integers so compact output stays token-minimal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::{Number, Value};

/// Largest magnitude at which every integer is exactly representable as `f64`
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Round to a fixed number of decimal places
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
    (value * factor).round() / factor
}

/// Convert a sample value to a JSON number
///
/// Integral values serialize without a fractional part (`120`, not `120.0`).
/// Non-finite values have no JSON representation and become `null`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn json_number(value: f64) -> Value {
    if !value.is_finite() {
        return Value::Null;
    }
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        // Safe: integral and within the exactly-representable range checked above
        return Value::Number(Number::from(value as i64));
    }
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}
