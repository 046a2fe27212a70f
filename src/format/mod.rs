//! # Cell Formatting
//!
//! Turns Arrow columns into serialized CSV cells.
//!
//! 1. [`ColumnKind::of`] maps an Arrow data type onto the closed set of
//!    supported kinds, rejecting nested types.
//! 2. [`format_column`] renders every slot of a column: plain kinds through
//!    Arrow's locale-independent display encoding, string and binary kinds as
//!    their raw bytes, nulls as the configured null string.
//! 3. The [`quote`] engine wraps and escapes each non-null cell according to
//!    its [`TypeCategory`].
//!
//! All buffers are charged against a [`ScratchPool`].

mod column;
mod kind;
pub mod quote;
mod scratch;

pub use column::{format_column, FormattedColumn};
pub use kind::{ColumnKind, TypeCategory};
pub use scratch::ScratchPool;
