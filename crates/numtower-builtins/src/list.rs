//! Ordered numeric collections backing the statistics functions.

use once_cell::sync::OnceCell;

use crate::error::{Result, TowerError};
use crate::Value;

/// Sequence of scalar tower values with a lazily computed ascending view.
///
/// The sorted view is only available when every element is real. Any mutation drops it.
#[derive(Debug, Default)]
pub struct NumberList {
    values: Vec<Value>,
    sorted: OnceCell<Vec<f64>>,
}

impl NumberList {
    pub fn new(values: Vec<Value>) -> Result<Self> {
        for v in &values {
            check_element(v)?;
        }
        Ok(NumberList {
            values,
            sorted: OnceCell::new(),
        })
    }

    pub fn empty() -> Self {
        NumberList::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn push(&mut self, value: Value) -> Result<()> {
        check_element(&value)?;
        self.values.push(value);
        self.invalidate();
        Ok(())
    }

    pub fn insert(&mut self, index: usize, value: Value) -> Result<()> {
        check_element(&value)?;
        if index > self.values.len() {
            return Err(TowerError::domain(format!(
                "insert index {index} out of bounds for list of length {}",
                self.values.len()
            )));
        }
        self.values.insert(index, value);
        self.invalidate();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<Value> {
        if index >= self.values.len() {
            return None;
        }
        let removed = self.values.remove(index);
        self.invalidate();
        Some(removed)
    }

    pub fn extend(&mut self, values: impl IntoIterator<Item = Value>) -> Result<()> {
        for v in values {
            check_element(&v)?;
            self.values.push(v);
        }
        self.invalidate();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.invalidate();
    }

    /// Ascending copy of the elements as reals, cached until the next mutation.
    pub fn sorted_reals(&self) -> Result<&[f64]> {
        if let Some(sorted) = self.sorted.get() {
            return Ok(sorted.as_slice());
        }
        let mut reals = self
            .values
            .iter()
            .map(|v| v.as_real().ok_or(TowerError::Unorderable))
            .collect::<Result<Vec<f64>>>()?;
        if reals.iter().any(|x| x.is_nan()) {
            return Err(TowerError::Unorderable);
        }
        reals.sort_by(f64::total_cmp);
        Ok(self.sorted.get_or_init(|| reals).as_slice())
    }

    pub fn is_sorted_cached(&self) -> bool {
        self.sorted.get().is_some()
    }

    /// Element-wise image under `f`, which must map scalars to scalars.
    /// Apply a kind-preserving scalar map to every element.
    pub fn map_values(&self, f: impl Fn(&Value) -> Value) -> NumberList {
        NumberList {
            values: self.values.iter().map(f).collect(),
            sorted: OnceCell::new(),
        }
    }

    fn invalidate(&mut self) {
        self.sorted = OnceCell::new();
    }
}

fn check_element(value: &Value) -> Result<()> {
    if value.is_scalar() {
        Ok(())
    } else {
        Err(TowerError::domain(format!(
            "list elements must be scalars, got {}",
            value.kind()
        )))
    }
}

impl Clone for NumberList {
    fn clone(&self) -> Self {
        NumberList {
            values: self.values.clone(),
            sorted: OnceCell::new(),
        }
    }
}

impl PartialEq for NumberList {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<'a> IntoIterator for &'a NumberList {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Complex64, Vector};

    #[test]
    fn sorted_view_is_cached_and_invalidated() {
        let mut list = NumberList::new(vec![Value::Real(3.0), Value::Int(1), Value::Real(2.0)]).unwrap();
        assert!(!list.is_sorted_cached());
        assert_eq!(list.sorted_reals().unwrap(), &[1.0, 2.0, 3.0]);
        assert!(list.is_sorted_cached());
        list.push(Value::Real(0.5)).unwrap();
        assert!(!list.is_sorted_cached());
        assert_eq!(list.sorted_reals().unwrap(), &[0.5, 1.0, 2.0, 3.0]);
        list.remove(0);
        assert!(!list.is_sorted_cached());
    }

    #[test]
    fn complex_elements_are_unorderable() {
        let list = NumberList::new(vec![Value::Real(1.0), Value::Complex(Complex64::new(0.0, 1.0))]).unwrap();
        assert_eq!(list.sorted_reals().unwrap_err(), TowerError::Unorderable);
    }

    #[test]
    fn rejects_non_scalar_elements() {
        let err = NumberList::new(vec![Value::Vector(Vector::new(vec![1.0]))]).unwrap_err();
        assert!(matches!(err, TowerError::Domain(_)));
    }

    #[test]
    fn equality_ignores_cache() {
        let a = NumberList::new(vec![Value::Int(2), Value::Int(1)]).unwrap();
        let b = a.clone();
        a.sorted_reals().unwrap();
        assert_eq!(a, b);
    }
}
