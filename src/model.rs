//! Cross-referenced class model produced by extraction.
//!
//! The [`Model`] owns every entity; cross-links between entities are plain
//! keys or indices back into it, never owning pointers:
//!
//! ```text
//! Model
//! ├── domains:      IndexMap<name, Domain>
//! ├── packages:     IndexMap<name, Package>   (classes: Vec<ElementId>)
//! ├── classes:      IndexMap<id, Class>       (attributes owned,
//! │                                            associations: Vec<AssociationId>)
//! └── associations: Vec<Association>          (opposite: AssociationId)
//! ```
//!
//! `IndexMap` keeps insertion order, so iterating a model extracted twice
//! from the same input visits entities in the same order.
//!
//! A `Model` is read-only once extraction returns it: there is no mutation
//! API on this type.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::ExtractError;

// ============================================================================
// IDS
// ============================================================================

/// Identifier of a model element, from the document's `xmi:id`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(Arc<str>);

impl ElementId {
    /// Create a new element ID.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Handle to an [`Association`] in the model's association arena.
///
/// Associations are created in forward/reverse pairs that reference each
/// other; an index avoids the reference cycle an owning pointer would make.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AssociationId(pub(crate) usize);

impl std::fmt::Display for AssociationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "assoc#{}", self.0)
    }
}

// ============================================================================
// DOMAIN
// ============================================================================

/// A named, reusable type-constraint definition from the metadata document.
///
/// Immutable once cataloged. Attributes reference domains by name; they
/// never own them.
#[derive(Clone, Debug, PartialEq)]
pub struct Domain {
    name: Arc<str>,
    type_name: Option<Arc<str>>,
    max_length: Option<Arc<str>>,
    precision: Option<Arc<str>>,
    scale: Option<Arc<str>>,
}

impl Domain {
    pub(crate) fn new(
        name: impl Into<Arc<str>>,
        type_name: Option<&str>,
        max_length: Option<&str>,
        precision: Option<&str>,
        scale: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.map(Arc::from),
            max_length: max_length.map(Arc::from),
            precision: precision.map(Arc::from),
            scale: scale.map(Arc::from),
        }
    }

    /// Catalog key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target generic type name.
    ///
    /// The metadata row may legally omit `GenericType`; that only becomes
    /// an error when a consumer actually asks for the type.
    pub fn type_name(&self) -> Result<&str, ExtractError> {
        self.type_name
            .as_deref()
            .ok_or_else(|| ExtractError::MissingTypeName(self.name.to_string()))
    }

    /// Maximum length constraint, as exported.
    pub fn max_length(&self) -> Option<&str> {
        self.max_length.as_deref()
    }

    /// Numeric precision constraint, as exported.
    pub fn precision(&self) -> Option<&str> {
        self.precision.as_deref()
    }

    /// Numeric scale constraint, as exported.
    pub fn scale(&self) -> Option<&str> {
        self.scale.as_deref()
    }
}

impl std::fmt::Display for Domain {
    /// `NAME(type)` followed by whichever constraints are set and non-`"0"`
    /// (the exporter writes `0` for "no constraint").
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.type_name.as_deref().unwrap_or("?"))?;
        for (label, value) in [
            ("maxLength", &self.max_length),
            ("precision", &self.precision),
            ("scale", &self.scale),
        ] {
            if let Some(value) = value.as_deref() {
                if value != "0" {
                    write!(f, " {label}={value}")?;
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// PACKAGE / CLASS / ATTRIBUTE
// ============================================================================

/// A code package: a `packagedElement` whose name is a dotted namespace.
#[derive(Clone, Debug, PartialEq)]
pub struct Package {
    /// `xmi:id` of the package element.
    pub id: ElementId,
    /// Dotted namespace name; registry key.
    pub name: Arc<str>,
    /// Newline-joined bodies of the package's comment children.
    pub comment: Option<String>,
    /// Member classes in the order annotation discovered them.
    pub classes: Vec<ElementId>,
}

/// A class of the model, fully annotated.
#[derive(Clone, Debug, PartialEq)]
pub struct Class {
    pub id: ElementId,
    pub name: Arc<str>,
    pub comment: Option<String>,
    /// Name of the owning package (key into [`Model::package`]).
    pub package: Arc<str>,
    /// Plain attributes in document order. Association-derived attribute
    /// ends are not in this list; they live on [`Association`]s.
    pub attributes: Vec<Attribute>,
    /// Outbound associations (handles into [`Model::association`]).
    pub associations: Vec<AssociationId>,
}

impl Class {
    /// Find an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name.as_ref() == name)
    }
}

/// A plain (non-association) attribute of a class.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub id: ElementId,
    pub name: Arc<str>,
    pub comment: Option<String>,
    /// Name of this attribute's domain (key into [`Model::domain`]).
    /// Resolution was checked during extraction, so the lookup succeeds on
    /// any model that extraction returned.
    pub domain: Arc<str>,
    pub is_not_null: bool,
    pub is_primary_key: bool,
    pub is_readonly: bool,
}

// ============================================================================
// ASSOCIATION
// ============================================================================

/// One direction of a resolved connector.
///
/// Every connector yields two of these, mutually linked through
/// [`Association::opposite`]. All `target_*` fields describe the end this
/// direction points at. Immutable once resolution has produced the pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Association {
    pub name: Arc<str>,
    pub source: ElementId,
    pub target: ElementId,
    pub target_multiple: bool,
    pub target_nullable: bool,
    pub target_navigable: bool,
    /// Whether the target end is the owned side, the one materialized as a
    /// foreign key in generated output. Exactly one direction of every pair
    /// has this set.
    pub target_owned: bool,
    /// Foreign-key column name, from the end's `alias=` style token.
    pub fk_column: Option<Arc<str>>,
    /// Foreign-key object/role name, from the end's role element.
    pub fk_role: Option<Arc<str>>,
    /// The reverse direction of the same connector.
    pub opposite: AssociationId,
}

// ============================================================================
// MODEL
// ============================================================================

/// The extracted model: registries for domains, packages and classes, plus
/// the association arena.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    pub(crate) domains: IndexMap<Arc<str>, Domain>,
    pub(crate) packages: IndexMap<Arc<str>, Package>,
    pub(crate) classes: IndexMap<ElementId, Class>,
    pub(crate) associations: Vec<Association>,
}

impl Model {
    /// Look up a domain by catalog name.
    pub fn domain(&self, name: &str) -> Option<&Domain> {
        self.domains.get(name)
    }

    /// Look up a package by dotted name.
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    /// Look up a class by element ID.
    pub fn class(&self, id: &ElementId) -> Option<&Class> {
        self.classes.get(id)
    }

    /// Look up an association by handle.
    pub fn association(&self, id: AssociationId) -> Option<&Association> {
        self.associations.get(id.0)
    }

    /// The reverse direction of an association.
    pub fn opposite(&self, assoc: &Association) -> Option<&Association> {
        self.association(assoc.opposite)
    }

    /// Iterate domains in catalog order.
    pub fn domains(&self) -> impl Iterator<Item = &Domain> {
        self.domains.values()
    }

    /// Iterate packages in discovery order.
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    /// Iterate classes in discovery order.
    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.classes.values()
    }

    /// All directional associations, in resolution order.
    pub fn associations(&self) -> &[Association] {
        &self.associations
    }

    /// Iterate a class's outbound associations.
    pub fn associations_of<'a>(
        &'a self,
        class: &'a Class,
    ) -> impl Iterator<Item = &'a Association> + 'a {
        class
            .associations
            .iter()
            .filter_map(move |id| self.association(*id))
    }
}
