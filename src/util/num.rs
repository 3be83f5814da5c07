/// Safely converts an `i64` to a `usize` if and only if it can be represented
/// exactly.
///
/// ## Errors
/// Returns `Err(error)` if the value is negative or exceeds the maximum
/// representable `usize`.
///
/// ## Parameters
/// - `value`: The integer to convert.
/// - `error`: The error to return if conversion is not lossless.
///
/// ## Example
/// ```
/// use tupla::util::num::i64_to_usize_checked;
///
/// let v = i64_to_usize_checked(42, "negative!").unwrap();
/// assert_eq!(v, 42);
///
/// assert!(i64_to_usize_checked(-1, "negative!").is_err());
/// ```
pub fn i64_to_usize_checked<E>(value: i64, error: E) -> Result<usize, E> {
    usize::try_from(value).map_err(|_| error)
}
