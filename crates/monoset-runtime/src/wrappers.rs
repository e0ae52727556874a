//! Wrapper type names
//!
//! Aliases that let callers request specializations with the familiar
//! wrapper names (`Integer`, `Long`, ...). Generated sources import this
//! module, so a list specialized for `Integer` stores plain `i32` values.

pub type Boolean = bool;
pub type Byte = i8;
pub type Short = i16;
pub type Integer = i32;
pub type Long = i64;
pub type Float = f32;
pub type Double = f64;
pub type Character = char;
