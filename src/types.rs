//! Value types for the analyzed language
//!
//! A value type is either a primitive scalar, or an array: a primitive
//! element type plus a non-empty ordered list of positive dimension sizes.
//! Types are compared structurally; the canonical textual form (used for
//! both comparison fallback and diagnostics) is `"<prim>"` for scalars and
//! `"<prim> [d1][d2]..."` for arrays.

use std::fmt;

/// Primitive scalar type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Integer,
    Real,
    Boolean,
    String,
    Void,
}

impl Primitive {
    pub fn as_str(self) -> &'static str {
        match self {
            Primitive::Integer => "integer",
            Primitive::Real => "real",
            Primitive::Boolean => "boolean",
            Primitive::String => "string",
            Primitive::Void => "void",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "integer" => Some(Primitive::Integer),
            "real" => Some(Primitive::Real),
            "boolean" => Some(Primitive::Boolean),
            "string" => Some(Primitive::String),
            "void" => Some(Primitive::Void),
            _ => None,
        }
    }

    /// Whether this primitive is one of the four scalar types that may be
    /// printed, read, assigned, returned, or passed as an argument.
    pub fn is_scalar_value(self) -> bool {
        matches!(
            self,
            Primitive::Integer | Primitive::Real | Primitive::Boolean | Primitive::String
        )
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A value type: a primitive, optionally with array dimensions.
///
/// `dims` is always non-empty when this represents an array; an empty
/// `dims` means a plain scalar. Invariant: every element of `dims` that
/// was validated by declaration analysis is a positive integer, but the
/// type itself does not enforce this - callers that construct a
/// `ValueType` directly (e.g. from declared-but-invalid array sizes) may
/// still carry non-positive entries; those are rejected at the point of
/// declaration, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueType {
    pub scalar: Primitive,
    pub dims: Vec<i64>,
}

impl ValueType {
    pub fn scalar(prim: Primitive) -> Self {
        ValueType {
            scalar: prim,
            dims: Vec::new(),
        }
    }

    pub fn array(prim: Primitive, dims: Vec<i64>) -> Self {
        ValueType { scalar: prim, dims }
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn is_array(&self) -> bool {
        !self.dims.is_empty()
    }

    /// Canonical textual form: `"<prim>"` or `"<prim> [d1][d2]..."`.
    pub fn canonical(&self) -> String {
        if self.dims.is_empty() {
            self.scalar.as_str().to_string()
        } else {
            let mut s = String::from(self.scalar.as_str());
            s.push(' ');
            for d in &self.dims {
                s.push('[');
                s.push_str(&d.to_string());
                s.push(']');
            }
            s
        }
    }

    /// Parse a canonical type string back into a `ValueType`.
    ///
    /// Used when a declaration's raw type text needs validating: dimensions
    /// are parsed left to right, accumulating digits between `[` and `]`.
    /// Returns `None` only if the scalar prefix isn't a known primitive;
    /// non-positive or unparsable dimensions are reported by the caller,
    /// not rejected here, so that the declaration can still be inserted.
    pub fn parse_canonical(text: &str) -> Option<(Primitive, Vec<DimResult>)> {
        let mut parts = text.splitn(2, ' ');
        let scalar = Primitive::from_str(parts.next()?)?;
        let rest = parts.next();
        let mut dims = Vec::new();
        if let Some(rest) = rest {
            let mut cur = String::new();
            for c in rest.chars() {
                match c {
                    '[' => cur.clear(),
                    ']' => {
                        dims.push(match cur.parse::<i64>() {
                            Ok(n) if n > 0 => DimResult::Valid(n),
                            Ok(n) => DimResult::NonPositive(n),
                            Err(_) => DimResult::Unparsable,
                        });
                    }
                    _ => cur.push(c),
                }
            }
        }
        Some((scalar, dims))
    }

    /// Drop the leading `count` dimensions, keeping the trailing ones -
    /// used when a subscript expression has fewer indices than the
    /// declared rank (partial/rank-reducing subscript).
    pub fn with_leading_dims_dropped(&self, count: usize) -> ValueType {
        ValueType {
            scalar: self.scalar,
            dims: self.dims[count..].to_vec(),
        }
    }

    /// Parse a canonical type string whose dimensions are already known to
    /// be valid (i.e. declaration analysis has run and raised no error for
    /// it). Unparsable input falls back to a void scalar rather than
    /// panicking.
    pub fn from_canonical(text: &str) -> ValueType {
        match ValueType::parse_canonical(text) {
            Some((scalar, dims)) => {
                let dims = dims
                    .into_iter()
                    .filter_map(|d| match d {
                        DimResult::Valid(n) => Some(n),
                        DimResult::NonPositive(_) | DimResult::Unparsable => None,
                    })
                    .collect();
                ValueType { scalar, dims }
            }
            None => ValueType::scalar(Primitive::Void),
        }
    }
}

/// Outcome of parsing one `[n]` dimension token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimResult {
    Valid(i64),
    NonPositive(i64),
    Unparsable,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_scalar() {
        let t = ValueType::scalar(Primitive::Integer);
        assert_eq!(t.canonical(), "integer");
    }

    #[test]
    fn canonical_array_round_trips() {
        let t = ValueType::array(Primitive::Real, vec![3, 4]);
        let text = t.canonical();
        assert_eq!(text, "real [3][4]");
        let (scalar, dims) = ValueType::parse_canonical(&text).unwrap();
        assert_eq!(scalar, Primitive::Real);
        assert_eq!(dims, vec![DimResult::Valid(3), DimResult::Valid(4)]);
    }

    #[test]
    fn parse_rejects_non_positive_dimension() {
        let (_, dims) = ValueType::parse_canonical("integer [0]").unwrap();
        assert_eq!(dims, vec![DimResult::NonPositive(0)]);
        let (_, dims) = ValueType::parse_canonical("integer [-1]").unwrap();
        assert_eq!(dims, vec![DimResult::NonPositive(-1)]);
    }

    #[test]
    fn with_leading_dims_dropped_keeps_trailing() {
        let t = ValueType::array(Primitive::Integer, vec![2, 3, 4]);
        let reduced = t.with_leading_dims_dropped(1);
        assert_eq!(reduced.dims, vec![3, 4]);
    }

    #[test]
    fn from_canonical_round_trips_a_valid_array() {
        let t = ValueType::from_canonical("integer [3][4]");
        assert_eq!(t, ValueType::array(Primitive::Integer, vec![3, 4]));
    }

    #[test]
    fn is_array_distinguishes_scalars_from_arrays() {
        assert!(!ValueType::scalar(Primitive::Boolean).is_array());
        assert!(ValueType::array(Primitive::Boolean, vec![5]).is_array());
    }
}
