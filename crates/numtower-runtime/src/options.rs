use serde::{Deserialize, Serialize};

/// Numerical knobs shared by every operation of an [`crate::Engine`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Equality holds when `|a - b| <= tolerance * max(1, |a|, |b|)`.
    pub equality_tolerance: f64,
    /// Components smaller than `zero_snap` times the result's magnitude are set to zero
    /// after transcendental evaluation.
    pub zero_snap: f64,
    /// Largest integer exponent evaluated by repeated squaring for matrix powers.
    pub max_power_exponent: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            equality_tolerance: 1.0e-10,
            zero_snap: 1.0e-12,
            max_power_exponent: 1_000_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let opts: EngineOptions = serde_json::from_str(r#"{"zero_snap": 0.0}"#).unwrap();
        assert_eq!(opts.zero_snap, 0.0);
        assert_eq!(opts.equality_tolerance, 1.0e-10);
        assert_eq!(opts.max_power_exponent, 1_000_000);
    }
}
