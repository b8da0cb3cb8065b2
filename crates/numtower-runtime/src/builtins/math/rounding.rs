//! Component-wise `ceil`, `floor` and `round`.

use numtower_builtins::{NumberList, TowerError, Value};

fn componentwise(v: &Value, f: fn(f64) -> f64) -> Result<Value, TowerError> {
    Ok(match v {
        Value::Int(i) => Value::Int(*i),
        Value::Real(x) => Value::Real(f(*x)),
        Value::Complex(z) => Value::Complex(num_complex::Complex64::new(f(z.re), f(z.im))),
        Value::Quaternion(q) => Value::Quaternion(q.map(f)),
        Value::Vector(vec) => Value::Vector(vec.map(f)),
        Value::Matrix(m) => Value::Matrix(m.map_entries(|e| e.map_components(f))),
        Value::List(list) => {
            let values = list
                .iter()
                .map(|item| componentwise(item, f))
                .collect::<Result<Vec<_>, _>>()?;
            Value::List(NumberList::new(values)?)
        }
    })
}

pub fn ceil_value(v: &Value) -> Result<Value, TowerError> {
    componentwise(v, f64::ceil)
}

pub fn floor_value(v: &Value) -> Result<Value, TowerError> {
    componentwise(v, f64::floor)
}

/// Half-away-from-zero.
pub fn round_value(v: &Value) -> Result<Value, TowerError> {
    componentwise(v, f64::round)
}
