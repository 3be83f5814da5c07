/// Safe numeric conversion helpers.
///
/// Conversions between `i64` and `usize` that never silently lose data; used
/// by tuple selection and repeat construction.
pub mod num;
