use snafu::Snafu;

/// Failures raised by the subschema registry and the definition parsers.
#[derive(Snafu, Debug, Clone, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum SchemaError {
    /// A registration references a dependency that is not yet registered.
    #[snafu(display("unknown {kind} reference '{identifier}'"))]
    UnknownReference {
        kind: &'static str,
        identifier: String,
    },

    /// The numeric OID or rule ID is already present in the target collection.
    #[snafu(display("duplicate registration of {kind} '{identifier}'"))]
    DuplicateRegistration {
        kind: &'static str,
        identifier: String,
    },

    /// Mutually exclusive clauses, or a cross-reference of the wrong class.
    #[snafu(display("consistency violation: {detail}"))]
    ConsistencyViolation { detail: String },

    /// Unregistration refused because removal would dangle a reference.
    #[snafu(display("cannot unregister {kind} '{identifier}': referenced by {dependent}"))]
    DependentExists {
        kind: &'static str,
        identifier: String,
        dependent: String,
    },

    /// The definition tokenizer met an unknown keyword or malformed sequence.
    #[snafu(display("invalid {kind} definition: {detail}"))]
    InvalidDefinition {
        kind: &'static str,
        detail: String,
    },
}
