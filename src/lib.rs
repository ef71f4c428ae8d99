//! # umx-base
//!
//! Core library for UML/XMI class-model extraction. Reads a class model
//! exported from Enterprise Architect (an XMI 2.1 document plus the tool's
//! type-metadata export) and produces an in-memory, cross-referenced model
//! of packages, classes, attributes, domains and bidirectional
//! associations, for code and SQL generators to query.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! reader    → extraction passes (metadata, structure, annotations, connectors)
//!   ↓
//! model     → Domain/Package/Class/Attribute/Association, Model registry
//!   ↓
//! xml       → in-memory document tree and traversal helpers
//!   ↓
//! error     → ExtractError taxonomy
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use umx::XmiReader;
//!
//! # fn main() -> Result<(), umx::ExtractError> {
//! let model = XmiReader::new().read_files("model.xml", "metadata.xml")?;
//! for package in model.packages() {
//!     for class in package.classes.iter().filter_map(|id| model.class(id)) {
//!         println!("{}.{}", package.name, class.name);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// Extraction errors: fatal conditions that abort a run.
pub mod error;

/// The extracted, cross-referenced class model.
pub mod model;

/// XMI extraction: four sequential passes over the input documents.
pub mod reader;

/// In-memory XML tree and read-only traversal helpers.
pub mod xml;

pub use error::ExtractError;
pub use model::{
    Association, AssociationId, Attribute, Class, Domain, ElementId, Model, Package,
};
pub use reader::XmiReader;
pub use xml::{XmiType, XmlNode};
