//! Reader for the canonical text forms produced by `Display`.
//!
//! Accepts `3`, `-2.5`, `3-2i`, `1+2i+3j+4k`, bare units such as `i` or `-j`,
//! `<1,2,3>`, `[[1,2],[3,4]]` and `{1,2,3}`, with optional whitespace. Integer text
//! without a decimal point or exponent reads as `Int`; the narrowest kind holding the
//! written axes is chosen otherwise.

use std::str::FromStr;

use num_complex::Complex64;

use crate::error::{Result, TowerError};
use crate::list::NumberList;
use crate::matrix::Matrix;
use crate::quaternion::Quaternion;
use crate::vector::Vector;
use crate::Value;

impl FromStr for Value {
    type Err = TowerError;

    fn from_str(s: &str) -> Result<Self> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        parse_value(&compact)
    }
}

fn parse_error(text: &str, why: &str) -> TowerError {
    TowerError::Parse(format!("`{text}`: {why}"))
}

fn parse_value(text: &str) -> Result<Value> {
    if text.is_empty() {
        return Err(parse_error(text, "empty literal"));
    }
    if let Some(inner) = enclosed(text, '<', '>') {
        return parse_vector(inner).map(Value::Vector);
    }
    if let Some(inner) = enclosed(text, '[', ']') {
        return parse_matrix(inner).map(Value::Matrix);
    }
    if let Some(inner) = enclosed(text, '{', '}') {
        let items = split_top_level(inner)?
            .into_iter()
            .map(parse_scalar)
            .collect::<Result<Vec<_>>>()?;
        return NumberList::new(items).map(Value::List);
    }
    parse_scalar(text)
}

fn enclosed(text: &str, open: char, close: char) -> Option<&str> {
    text.strip_prefix(open)?.strip_suffix(close)
}

/// Split on commas that are not nested inside brackets.
fn split_top_level(text: &str) -> Result<Vec<&str>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        match c {
            '[' | '<' | '{' => depth += 1,
            ']' | '>' | '}' => {
                depth -= 1;
                if depth < 0 {
                    return Err(parse_error(text, "unbalanced brackets"));
                }
            }
            ',' if depth == 0 => {
                parts.push(&text[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(parse_error(text, "unbalanced brackets"));
    }
    parts.push(&text[start..]);
    Ok(parts)
}

fn parse_vector(inner: &str) -> Result<Vector> {
    let data = split_top_level(inner)?
        .into_iter()
        .map(|item| match parse_scalar(item)? {
            Value::Int(i) => Ok(i as f64),
            Value::Real(x) => Ok(x),
            other => Err(parse_error(item, &format!("vector components must be real, got {}", other.kind()))),
        })
        .collect::<Result<Vec<f64>>>()?;
    Ok(Vector::new(data))
}

fn parse_matrix(inner: &str) -> Result<Matrix> {
    let rows = split_top_level(inner)?
        .into_iter()
        .map(|row| {
            let row_inner = enclosed(row, '[', ']')
                .ok_or_else(|| parse_error(row, "matrix rows must be bracketed"))?;
            split_top_level(row_inner)?
                .into_iter()
                .map(|item| {
                    parse_scalar(item)?
                        .to_scalar()
                        .ok_or_else(|| parse_error(item, "matrix entries must be scalars"))
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    Matrix::from_rows(rows).map_err(|e| parse_error(inner, &e.to_string()))
}

/// Split a scalar literal into signed terms. A sign directly after an exponent marker
/// or another sign belongs to the current term.
fn split_terms(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut terms = Vec::new();
    let mut start = 0;
    for idx in 1..bytes.len() {
        let c = bytes[idx];
        if (c == b'+' || c == b'-') && !matches!(bytes[idx - 1], b'e' | b'E' | b'+' | b'-') {
            terms.push(&text[start..idx]);
            start = idx;
        }
    }
    terms.push(&text[start..]);
    terms
}

fn parse_coefficient(body: &str, term: &str) -> Result<f64> {
    match body {
        "" | "+" => Ok(1.0),
        "-" => Ok(-1.0),
        _ => f64::from_str(body).map_err(|_| parse_error(term, "invalid number")),
    }
}

fn parse_scalar(text: &str) -> Result<Value> {
    if text.is_empty() {
        return Err(parse_error(text, "empty literal"));
    }
    let terms = split_terms(text);
    if let [single] = terms.as_slice() {
        if let Ok(i) = i64::from_str(single) {
            return Ok(Value::Int(i));
        }
    }

    // re, i, j, k
    let mut axes: [Option<f64>; 4] = [None; 4];
    for term in terms {
        let (slot, body) = match term.chars().last() {
            Some('i') => (1, &term[..term.len() - 1]),
            Some('j') => (2, &term[..term.len() - 1]),
            Some('k') => (3, &term[..term.len() - 1]),
            _ => (0, term),
        };
        let coef = parse_coefficient(body, term)?;
        if axes[slot].replace(coef).is_some() {
            return Err(parse_error(text, "axis written twice"));
        }
    }

    let [re, i, j, k] = axes.map(|a| a.unwrap_or(0.0));
    Ok(if axes[2].is_some() || axes[3].is_some() {
        Value::Quaternion(Quaternion::new(re, i, j, k))
    } else if axes[1].is_some() {
        Value::Complex(Complex64::new(re, i))
    } else {
        Value::Real(re)
    })
}
