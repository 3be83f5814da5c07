use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::evaluator::core::EvalResult,
    util::num::i64_to_usize_checked,
};

/// Represents a runtime value in the interpreter.
///
/// This enum models all the types a binding can hold: integers, strings and
/// tuples. Tuples are reference counted so that concatenation and selection
/// never deep-copy shared element storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A 64-bit signed integer.
    Integer(i64),
    /// A string of text.
    Text(String),
    /// An ordered sequence of values, selectable by 1-based index.
    Tuple(Rc<Vec<Self>>),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Tuple(Rc::new(v))
    }
}

impl Value {
    /// A short name for the value's type, used in type-error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "number",
            Self::Text(_) => "string",
            Self::Tuple(_) => "tuple",
        }
    }

    /// Returns the integer held by the value, or a type error.
    ///
    /// # Parameters
    /// - `line`: Source code line number for error reporting.
    pub fn as_integer(&self, line: usize) -> EvalResult<i64> {
        match self {
            Self::Integer(n) => Ok(*n),
            _ => Err(RuntimeError::TypeError { details: format!("expected a number, found a {}",
                                                                self.type_name()),
                                               line }),
        }
    }

    /// Returns the elements held by the value, or a type error.
    ///
    /// # Parameters
    /// - `line`: Source code line number for error reporting.
    pub fn as_tuple(&self, line: usize) -> EvalResult<&[Self]> {
        match self {
            Self::Tuple(elements) => Ok(elements),
            _ => Err(RuntimeError::TypeError { details: format!("expected a tuple, found a {}",
                                                                self.type_name()),
                                               line }),
        }
    }

    /// Adds two numbers, or concatenates two strings.
    ///
    /// # Example
    /// ```
    /// use tupla::interpreter::value::Value;
    ///
    /// let sum = Value::Integer(2).add(&Value::Integer(3), 1).unwrap();
    /// assert_eq!(sum, Value::Integer(5));
    ///
    /// let text = Value::from("foo").add(&Value::from("bar"), 1).unwrap();
    /// assert_eq!(text, Value::from("foobar"));
    /// ```
    pub fn add(&self, other: &Self, line: usize) -> EvalResult<Self> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => {
                a.checked_add(*b)
                 .map(Self::Integer)
                 .ok_or(RuntimeError::Overflow { line })
            },
            (Self::Text(a), Self::Text(b)) => {
                let mut joined = a.clone();
                joined.push_str(b);
                Ok(Self::Text(joined))
            },
            _ => Err(RuntimeError::TypeError { details: format!("cannot add a {} and a {}",
                                                                self.type_name(),
                                                                other.type_name()),
                                               line }),
        }
    }

    /// Subtracts one number from another.
    pub fn sub(&self, other: &Self, line: usize) -> EvalResult<Self> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => {
                a.checked_sub(*b)
                 .map(Self::Integer)
                 .ok_or(RuntimeError::Overflow { line })
            },
            _ => Err(RuntimeError::TypeError { details: format!("cannot subtract a {} from a {}",
                                                                other.type_name(),
                                                                self.type_name()),
                                               line }),
        }
    }

    /// Multiplies two numbers.
    pub fn mul(&self, other: &Self, line: usize) -> EvalResult<Self> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => {
                a.checked_mul(*b)
                 .map(Self::Integer)
                 .ok_or(RuntimeError::Overflow { line })
            },
            _ => Err(RuntimeError::TypeError { details: format!("cannot multiply a {} and a {}",
                                                                self.type_name(),
                                                                other.type_name()),
                                               line }),
        }
    }

    /// Divides one number by another, truncating toward zero.
    ///
    /// # Example
    /// ```
    /// use tupla::interpreter::value::Value;
    ///
    /// let q = Value::Integer(7).div(&Value::Integer(2), 1).unwrap();
    /// assert_eq!(q, Value::Integer(3));
    ///
    /// assert!(Value::Integer(1).div(&Value::Integer(0), 1).is_err());
    /// ```
    pub fn div(&self, other: &Self, line: usize) -> EvalResult<Self> {
        match (self, other) {
            (Self::Integer(_), Self::Integer(0)) => Err(RuntimeError::DivisionByZero { line }),
            (Self::Integer(a), Self::Integer(b)) => {
                a.checked_div(*b)
                 .map(Self::Integer)
                 .ok_or(RuntimeError::Overflow { line })
            },
            _ => Err(RuntimeError::TypeError { details: format!("cannot divide a {} by a {}",
                                                                self.type_name(),
                                                                other.type_name()),
                                               line }),
        }
    }

    /// Concatenates two tuples into a new tuple.
    pub fn concat(&self, other: &Self, line: usize) -> EvalResult<Self> {
        match (self, other) {
            (Self::Tuple(a), Self::Tuple(b)) => {
                let mut joined = Vec::with_capacity(a.len() + b.len());
                joined.extend_from_slice(a);
                joined.extend_from_slice(b);
                Ok(joined.into())
            },
            _ => Err(RuntimeError::TypeError { details: format!("cannot concatenate a {} and a {}",
                                                                self.type_name(),
                                                                other.type_name()),
                                               line }),
        }
    }

    /// Negates a number.
    pub fn negate(&self, line: usize) -> EvalResult<Self> {
        match self {
            Self::Integer(n) => {
                n.checked_neg()
                 .map(Self::Integer)
                 .ok_or(RuntimeError::Overflow { line })
            },
            _ => Err(RuntimeError::TypeError { details: format!("cannot negate a {}",
                                                                self.type_name()),
                                               line }),
        }
    }

    /// Selects the `index`-th element of this tuple, counting from 1.
    ///
    /// # Example
    /// ```
    /// use tupla::interpreter::value::Value;
    ///
    /// let tuple: Value = vec![Value::Integer(10), Value::Integer(20)].into();
    /// assert_eq!(tuple.select(&Value::Integer(2), 1).unwrap(), Value::Integer(20));
    /// assert!(tuple.select(&Value::Integer(0), 1).is_err());
    /// assert!(tuple.select(&Value::Integer(3), 1).is_err());
    /// ```
    pub fn select(&self, index: &Self, line: usize) -> EvalResult<Self> {
        let elements = self.as_tuple(line)?;
        let requested = index.as_integer(line)?;

        if requested < 1 || i64_to_usize_checked(requested, RuntimeError::LiteralTooLarge { line })?
                            > elements.len()
        {
            return Err(RuntimeError::IndexOutOfBounds { max:   elements.len(),
                                                        found: requested,
                                                        line });
        }

        let position = i64_to_usize_checked(requested - 1,
                                            RuntimeError::LiteralTooLarge { line })?;
        Ok(elements[position].clone())
    }

    /// Builds the inclusive integer sequence from `self` to `end`.
    ///
    /// An empty start/end inversion yields an empty tuple.
    pub fn span(&self, end: &Self, line: usize) -> EvalResult<Self> {
        let start = self.as_integer(line)?;
        let last = end.as_integer(line)?;

        if start > last {
            return Ok(Vec::new().into());
        }

        let count = i128::from(last) - i128::from(start) + 1;
        let count = usize::try_from(count).map_err(|_| RuntimeError::LiteralTooLarge { line })?;

        let mut elements = Vec::with_capacity(count);
        for n in start..=last {
            elements.push(Self::Integer(n));
        }
        Ok(elements.into())
    }

    /// Builds a sequence of length `self` with every element equal to
    /// `value`. A count of zero or below yields an empty tuple.
    pub fn repeat(&self, value: &Self, line: usize) -> EvalResult<Self> {
        let count = self.as_integer(line)?;

        if count <= 0 {
            return Ok(Vec::new().into());
        }

        let count = i64_to_usize_checked(count, RuntimeError::LiteralTooLarge { line })?;
        Ok(vec![value.clone(); count].into())
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Tuple(elements) => {
                write!(f, "[")?;

                for (index, value) in elements.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }

                    write!(f, "{value}")?;
                }

                write!(f, "]")
            },
        }
    }
}
