use snafu::Snafu;

/// The reasons a value can be rejected by a syntax checker.
#[derive(Snafu, Debug, Clone, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum SyntaxError {
    /// The value is shorter or longer than the syntax permits.
    #[snafu(display("{syntax}: value of length {length} outside permitted bounds"))]
    BadLength { syntax: &'static str, length: usize },

    /// The incoming variant is not one of the accepted input kinds.
    #[snafu(display("{syntax}: unsupported input kind ({kind})"))]
    BadType {
        syntax: &'static str,
        kind: &'static str,
    },

    /// The value does not conform to the named syntax.
    #[snafu(display("{syntax}: {detail}"))]
    BadSyntax {
        syntax: &'static str,
        detail: String,
    },
}

impl SyntaxError {
    /// Shorthand constructor for the common [`SyntaxError::BadSyntax`] case.
    pub(crate) fn bad(syntax: &'static str, detail: impl Into<String>) -> Self {
        SyntaxError::BadSyntax {
            syntax,
            detail: detail.into(),
        }
    }
}
