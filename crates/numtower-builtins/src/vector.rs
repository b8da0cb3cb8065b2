/// Fixed-length sequence of reals. Two vectors interoperate only when lengths match.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vector {
    pub data: Vec<f64>,
}

impl Vector {
    pub fn new(data: Vec<f64>) -> Self {
        Vector { data }
    }

    pub fn zeros(len: usize) -> Self {
        Vector {
            data: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.data.get(index).copied()
    }

    pub fn magnitude(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Vector {
        Vector::new(self.data.iter().map(|&x| f(x)).collect())
    }

    /// Component-wise combination; `None` when lengths differ.
    pub fn zip_with(&self, other: &Vector, f: impl Fn(f64, f64) -> f64) -> Option<Vector> {
        if self.len() != other.len() {
            return None;
        }
        Some(Vector::new(
            self.data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        ))
    }

    pub fn dot(&self, other: &Vector) -> Option<f64> {
        if self.len() != other.len() {
            return None;
        }
        Some(
            self.data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| a * b)
                .sum(),
        )
    }

    /// Cross product, defined for length-3 vectors only.
    pub fn cross(&self, other: &Vector) -> Option<Vector> {
        match (self.data.as_slice(), other.data.as_slice()) {
            ([a1, a2, a3], [b1, b2, b3]) => Some(Vector::new(vec![
                a2 * b3 - a3 * b2,
                a3 * b1 - a1 * b3,
                a1 * b2 - a2 * b1,
            ])),
            _ => None,
        }
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Vector::new(data)
    }
}
