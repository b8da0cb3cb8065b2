//! Statistics over a [`NumberList`].
//!
//! Sums and means run through the dispatch engine and so accept every scalar kind.
//! Order statistics need the cached ascending view of the list, which only exists for
//! real-valued data.

use std::fmt;
use std::str::FromStr;

use numtower_builtins::{NumberList, Outcome, TowerError, Value};
use tracing::trace;

use crate::{arithmetic, Engine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    Mean,
    Median,
    Mode,
    Variance,
    StandardDeviation,
    Midrange,
    Range,
    Min,
    Max,
    Sum,
    Count,
    /// Percentile rank of the extra operand within the data.
    PercentileOf,
    /// Value at the percentile given by the extra operand.
    PercentileIn,
}

impl Statistic {
    pub const ALL: [Statistic; 13] = [
        Statistic::Mean,
        Statistic::Median,
        Statistic::Mode,
        Statistic::Variance,
        Statistic::StandardDeviation,
        Statistic::Midrange,
        Statistic::Range,
        Statistic::Min,
        Statistic::Max,
        Statistic::Sum,
        Statistic::Count,
        Statistic::PercentileOf,
        Statistic::PercentileIn,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Median => "median",
            Statistic::Mode => "mode",
            Statistic::Variance => "variance",
            Statistic::StandardDeviation => "std",
            Statistic::Midrange => "midrange",
            Statistic::Range => "range",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Sum => "sum",
            Statistic::Count => "count",
            Statistic::PercentileOf => "percentileOf",
            Statistic::PercentileIn => "percentileIn",
        }
    }

    pub fn takes_extra(&self) -> bool {
        matches!(self, Statistic::PercentileOf | Statistic::PercentileIn)
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Statistic {
    type Err = TowerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "standardDeviation" {
            return Ok(Statistic::StandardDeviation);
        }
        Statistic::ALL
            .into_iter()
            .find(|stat| stat.name() == s)
            .ok_or_else(|| TowerError::UnknownFunction(s.to_string()))
    }
}

/// Scalar arithmetic never reports Undefined; treat it as a broken invariant of the data.
fn scalar_result(op: &str, outcome: Outcome<Value>) -> Result<Value, TowerError> {
    match outcome {
        Outcome::Defined(v) => Ok(v),
        Outcome::Undefined => Err(TowerError::domain(format!("`{op}` is not defined for list elements"))),
    }
}

fn sum(list: &NumberList) -> Result<Value, TowerError> {
    list.iter().try_fold(Value::Int(0), |acc, x| {
        scalar_result("+", arithmetic::add(&acc, x)?)
    })
}

fn mean(engine: &Engine, list: &NumberList) -> Result<Value, TowerError> {
    if list.is_empty() {
        return Err(TowerError::EmptyCollection);
    }
    let total = sum(list)?;
    scalar_result("/", arithmetic::div(engine, &total, &Value::Int(list.len() as i64))?)
}

/// Sample variance over magnitudes, `Σ|xᵢ − x̄|² / (n − 1)`.
fn variance(engine: &Engine, list: &NumberList) -> Result<f64, TowerError> {
    let n = list.len();
    if n < 2 {
        return Err(TowerError::InsufficientData { needed: 2, found: n });
    }
    let centre = mean(engine, list)?;
    let mut acc = 0.0;
    for x in list {
        let deviation = scalar_result("-", arithmetic::sub(x, &centre)?)?
            .to_scalar()
            .ok_or_else(|| TowerError::domain("list deviation is not a scalar"))?;
        acc += deviation.abs_sqr();
    }
    Ok(acc / (n - 1) as f64)
}

/// Ascending reals, checking emptiness before orderability.
fn ordered(list: &NumberList) -> Result<&[f64], TowerError> {
    if list.is_empty() {
        return Err(TowerError::EmptyCollection);
    }
    list.sorted_reals()
}

fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// All values of maximal multiplicity, ascending.
fn mode(sorted: &[f64]) -> Vec<f64> {
    let mut modes = Vec::new();
    let mut best = 0;
    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        let run = sorted[i..].iter().take_while(|x| **x == value).count();
        if run > best {
            best = run;
            modes.clear();
            modes.push(value);
        } else if run == best {
            modes.push(value);
        }
        i += run;
    }
    modes
}

fn percentile_of(sorted: &[f64], x: f64) -> f64 {
    let below = sorted.iter().filter(|v| **v < x).count() as f64;
    let equal = sorted.iter().filter(|v| **v == x).count() as f64;
    100.0 * (below + 0.5 * equal) / sorted.len() as f64
}

/// Linear interpolation between closest ranks.
fn percentile_in(sorted: &[f64], p: f64) -> Result<f64, TowerError> {
    if !(0.0..=100.0).contains(&p) {
        return Err(TowerError::domain(format!("percentile {p} is outside [0, 100]")));
    }
    let h = (sorted.len() - 1) as f64 * p / 100.0;
    let lo = h.floor() as usize;
    let frac = h - lo as f64;
    Ok(match sorted.get(lo + 1) {
        Some(hi) if frac > 0.0 => sorted[lo] + frac * (hi - sorted[lo]),
        _ => sorted[lo],
    })
}

fn real_extra(stat: Statistic, extra: Option<&Value>) -> Result<f64, TowerError> {
    extra
        .and_then(Value::as_real)
        .ok_or_else(|| TowerError::domain(format!("{stat} requires a real operand")))
}

pub(crate) fn statistic(
    engine: &Engine,
    stat: Statistic,
    list: &NumberList,
    extra: Option<&Value>,
) -> Result<Value, TowerError> {
    if extra.is_some() && !stat.takes_extra() {
        return Err(TowerError::domain(format!("{stat} takes no extra operand")));
    }
    trace!(statistic = %stat, len = list.len(), "collection statistic");
    Ok(match stat {
        Statistic::Count => Value::Int(list.len() as i64),
        Statistic::Sum => sum(list)?,
        Statistic::Mean => mean(engine, list)?,
        Statistic::Variance => Value::Real(variance(engine, list)?),
        Statistic::StandardDeviation => Value::Real(variance(engine, list)?.sqrt()),
        Statistic::Median => Value::Real(median(ordered(list)?)),
        Statistic::Mode => {
            let modes = mode(ordered(list)?).into_iter().map(Value::Real).collect();
            Value::List(NumberList::new(modes)?)
        }
        Statistic::Min => Value::Real(ordered(list)?[0]),
        Statistic::Max => Value::Real(ordered(list)?[list.len() - 1]),
        Statistic::Range => {
            let sorted = ordered(list)?;
            Value::Real(sorted[sorted.len() - 1] - sorted[0])
        }
        Statistic::Midrange => {
            let sorted = ordered(list)?;
            Value::Real((sorted[0] + sorted[sorted.len() - 1]) / 2.0)
        }
        Statistic::PercentileOf => {
            let x = real_extra(stat, extra)?;
            Value::Real(percentile_of(ordered(list)?, x))
        }
        Statistic::PercentileIn => {
            let p = real_extra(stat, extra)?;
            Value::Real(percentile_in(ordered(list)?, p)?)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_alias() {
        for stat in Statistic::ALL {
            assert_eq!(stat.name().parse::<Statistic>().unwrap(), stat);
        }
        assert_eq!(
            "standardDeviation".parse::<Statistic>().unwrap(),
            Statistic::StandardDeviation
        );
        assert!(matches!("kurtosis".parse::<Statistic>(), Err(TowerError::UnknownFunction(_))));
    }

    #[test]
    fn mode_runs() {
        assert_eq!(mode(&[1.0, 2.0, 2.0, 3.0, 3.0]), vec![2.0, 3.0]);
        assert_eq!(mode(&[1.0, 1.0, 1.0, 2.0, 2.0]), vec![1.0]);
        assert_eq!(mode(&[4.0, 5.0, 6.0]), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn percentiles() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile_of(&data, 2.0), 37.5);
        assert_eq!(percentile_in(&data, 50.0).unwrap(), 2.5);
        assert_eq!(percentile_in(&data, 100.0).unwrap(), 4.0);
        assert_eq!(percentile_in(&data, 0.0).unwrap(), 1.0);
        assert!(matches!(percentile_in(&data, 101.0), Err(TowerError::Domain(_))));
    }

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median(&[1.0, 3.0, 8.0]), 3.0);
        assert_eq!(median(&[1.0, 3.0, 8.0, 10.0]), 5.5);
    }
}
