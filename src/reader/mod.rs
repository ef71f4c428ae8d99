//! XMI model extraction.
//!
//! [`XmiReader`] drives four strictly sequential passes over two in-memory
//! document trees and threads one mutable set of registries through them:
//!
//! ```text
//! metadata document ──▶ metadata    (Domain catalog, by name)
//! model document    ──▶ structure   (Package/Class/Attribute stubs, by id)
//! xmi:Extension     ──▶ annotations (names, comments, types, flags)
//! xmi:Extension     ──▶ connectors  (directional association pairs)
//!                       finish      (invariant check, sealed Model)
//! ```
//!
//! Earlier passes write entries that later passes look up by identifier; a
//! lookup that misses means the input is inconsistent and the whole run
//! aborts. The caller never sees a partially extracted [`Model`].

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::error;

use crate::error::ExtractError;
use crate::model::{Association, AssociationId, Attribute, Class, Domain, ElementId, Model, Package};
use crate::xml;

mod annotations;
mod connectors;
mod metadata;
mod structure;
mod style;

/// Reader for an XMI 2.1 model document plus its type-metadata document,
/// as exported by Enterprise Architect.
#[derive(Debug, Default)]
pub struct XmiReader {
    domains: IndexMap<Arc<str>, Domain>,
    packages: IndexMap<Arc<str>, Package>,
    classes: IndexMap<ElementId, ClassRecord>,
    associations: Vec<Association>,
}

/// Class registry entry while extraction is in flight.
///
/// Pass 1 registers the id and attribute stubs; pass 2 fills in the rest.
/// [`XmiReader::finish`] refuses to seal a record that was never annotated.
#[derive(Debug, Default)]
struct ClassRecord {
    name: Option<Arc<str>>,
    comment: Option<String>,
    package: Option<Arc<str>>,
    attribute_stubs: Vec<AttributeStub>,
    attributes: Vec<Attribute>,
    associations: Vec<AssociationId>,
}

impl ClassRecord {
    /// Best available name for diagnostics: the annotated name, or the id
    /// if annotation has not reached this class yet.
    fn display_name<'a>(&'a self, id: &'a ElementId) -> &'a str {
        self.name.as_deref().unwrap_or(id.as_str())
    }
}

/// Attribute registered by the structural pass, before annotation.
///
/// Only the data available in pass 1 is captured here; everything else
/// (name, domain, nullability, primary key) arrives with the extension
/// block.
#[derive(Debug)]
struct AttributeStub {
    id: ElementId,
    readonly: bool,
}

impl XmiReader {
    /// Create a reader with empty registries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract a model from in-memory documents.
    pub fn read(self, model: &[u8], metadata: &[u8]) -> Result<Model, ExtractError> {
        self.read_inner(model, metadata)
            .inspect_err(|e| error!("model extraction failed: {e}"))
    }

    /// Extract a model from files on disk.
    pub fn read_files(
        self,
        model_path: impl AsRef<Path>,
        metadata_path: impl AsRef<Path>,
    ) -> Result<Model, ExtractError> {
        let model = std::fs::read(model_path)?;
        let metadata = std::fs::read(metadata_path)?;
        self.read(&model, &metadata)
    }

    fn read_inner(mut self, model: &[u8], metadata: &[u8]) -> Result<Model, ExtractError> {
        let metadata_doc = xml::parse(metadata)?;
        self.load_metadata(&metadata_doc);

        let model_doc = xml::parse(model)?;
        self.extract_structure(&model_doc)?;

        let extension = model_doc
            .descendants_with_tag("xmi:Extension")
            .next()
            .ok_or_else(|| ExtractError::missing_element("xmi:Extension"))?;
        self.annotate(extension)?;
        self.resolve_connectors(extension)?;

        self.finish()
    }

    /// Seal the registries into a read-only [`Model`], enforcing that every
    /// class was annotated with a name and an owning package.
    fn finish(self) -> Result<Model, ExtractError> {
        let Self {
            domains,
            packages,
            classes,
            associations,
        } = self;

        let mut sealed = IndexMap::with_capacity(classes.len());
        for (id, record) in classes {
            let ClassRecord {
                name,
                comment,
                package,
                attributes,
                associations: outbound,
                ..
            } = record;
            let (Some(name), Some(package)) = (name, package) else {
                return Err(ExtractError::IncompleteClass(id.to_string()));
            };
            sealed.insert(
                id.clone(),
                Class {
                    id,
                    name,
                    comment,
                    package,
                    attributes,
                    associations: outbound,
                },
            );
        }

        Ok(Model {
            domains,
            packages,
            classes: sealed,
            associations,
        })
    }
}
