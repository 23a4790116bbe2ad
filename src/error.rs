//! Error types shared across the syntax, matching, and schema layers.

mod asn1;
mod schema;
mod syntax;

pub use self::{asn1::Asn1Error, schema::SchemaError, syntax::SyntaxError};

/// Alias for a `Result` with a [`SyntaxError`].
pub type SyntaxResult<T> = core::result::Result<T, SyntaxError>;
/// Alias for a `Result` with a [`SchemaError`].
pub type SchemaResult<T> = core::result::Result<T, SchemaError>;
/// Alias for a `Result` with an [`Asn1Error`].
pub type Asn1Result<T> = core::result::Result<T, Asn1Error>;
