//! Error types for model extraction.

use thiserror::Error;

/// Errors that abort a model extraction run.
///
/// Extraction is all-or-nothing: any of these unwinds the whole run and the
/// caller receives no partial model. Degraded-but-recoverable conditions
/// (an unrecognized association cardinality, for instance) are logged via
/// `tracing` instead and never surface here.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// XML parsing error in one of the input documents.
    #[error("XML error: {0}")]
    Xml(String),

    /// IO error while reading an input document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing required element or attribute.
    #[error("Missing required {kind}: {name}")]
    Missing { kind: &'static str, name: String },

    /// Identifier reference to an entity an earlier pass should have
    /// registered, but did not.
    #[error("Unresolved {kind} reference: {id}")]
    UnresolvedReference { kind: &'static str, id: String },

    /// An attribute names a domain that is not in the catalog.
    #[error("Domain {domain} not found for attribute {attribute} of class {class}")]
    UnknownDomain {
        domain: String,
        attribute: String,
        class: String,
    },

    /// A connector carries no association name.
    #[error("Association between {source_class} and {target} has no name")]
    UnnamedAssociation { source_class: String, target: String },

    /// A domain was read before its generic type name was ever set.
    #[error("GenericType undefined for domain {0}")]
    MissingTypeName(String),

    /// A class came out of the pipeline without a name or owning package.
    #[error("Class {0} was never annotated with a name and package")]
    IncompleteClass(String),
}

impl ExtractError {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Create a missing element error.
    pub fn missing_element(name: impl Into<String>) -> Self {
        Self::Missing {
            kind: "element",
            name: name.into(),
        }
    }

    /// Create a missing attribute error.
    pub fn missing_attribute(name: impl Into<String>) -> Self {
        Self::Missing {
            kind: "attribute",
            name: name.into(),
        }
    }

    /// Create an unresolved reference error.
    pub fn unresolved(kind: &'static str, id: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            kind,
            id: id.into(),
        }
    }
}
