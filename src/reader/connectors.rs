//! Association resolution from the extension block's `connectors` section.
//!
//! Every connector becomes a pair of directional [`Association`]s, forward
//! and reverse, cross-linked as opposites. A direction's `target_*` fields
//! describe the end it points at, so the forward (source→target) record is
//! read from the connector's `target` child and the reverse record from
//! its `source` child.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{XmiReader, style};
use crate::error::ExtractError;
use crate::model::{Association, AssociationId, ElementId};
use crate::xml::XmlNode;

/// Per-end data decoded from a connector's `source` or `target` child.
#[derive(Debug, Default)]
struct ResolvedEnd {
    multiple: bool,
    nullable: bool,
    navigable: bool,
    owned: bool,
    fk_column: Option<Arc<str>>,
    fk_role: Option<Arc<str>>,
}

impl XmiReader {
    /// Pass 3: resolve connectors into cross-linked association pairs.
    pub(super) fn resolve_connectors(&mut self, extension: &XmlNode) -> Result<(), ExtractError> {
        let connectors = extension
            .first_child_with_tag("connectors")
            .ok_or_else(|| ExtractError::missing_element("connectors"))?;

        for connector in connectors.children_with_tag("connector") {
            self.resolve_connector(connector)?;
        }

        debug!(
            "resolved {} directional associations",
            self.associations.len()
        );
        Ok(())
    }

    fn resolve_connector(&mut self, node: &XmlNode) -> Result<(), ExtractError> {
        let source_node = node
            .first_child_with_tag("source")
            .ok_or_else(|| ExtractError::missing_element("source"))?;
        let target_node = node
            .first_child_with_tag("target")
            .ok_or_else(|| ExtractError::missing_element("target"))?;

        let source_id = end_class_id(source_node)?;
        let target_id = end_class_id(target_node)?;
        let source_name = self.registered_class_name(&source_id)?;
        let target_name = self.registered_class_name(&target_id)?;

        let name: Arc<str> = node
            .first_child_with_tag("labels")
            .and_then(|labels| labels.attr("mt"))
            .ok_or(ExtractError::UnnamedAssociation {
                source_class: source_name,
                target: target_name,
            })?
            .into();

        let forward_end = resolve_end(target_node);
        let reverse_end = resolve_end(source_node);
        let (forward_owned, reverse_owned) = tie_break(forward_end.owned, reverse_end.owned);

        let forward_id = AssociationId(self.associations.len());
        let reverse_id = AssociationId(self.associations.len() + 1);
        self.associations.push(directed(
            name.clone(),
            source_id.clone(),
            target_id.clone(),
            forward_end,
            forward_owned,
            reverse_id,
        ));
        self.associations.push(directed(
            name,
            target_id.clone(),
            source_id.clone(),
            reverse_end,
            reverse_owned,
            forward_id,
        ));

        // Each class lists only its own outbound direction.
        self.outbound_of(&source_id)?.push(forward_id);
        self.outbound_of(&target_id)?.push(reverse_id);
        Ok(())
    }

    fn registered_class_name(&self, id: &ElementId) -> Result<String, ExtractError> {
        self.classes
            .get(id)
            .map(|record| record.display_name(id).to_string())
            .ok_or_else(|| ExtractError::unresolved("class", id.as_str()))
    }

    fn outbound_of(&mut self, id: &ElementId) -> Result<&mut Vec<AssociationId>, ExtractError> {
        self.classes
            .get_mut(id)
            .map(|record| &mut record.associations)
            .ok_or_else(|| ExtractError::unresolved("class", id.as_str()))
    }
}

fn end_class_id(end_node: &XmlNode) -> Result<ElementId, ExtractError> {
    end_node
        .id_ref()
        .map(ElementId::new)
        .ok_or_else(|| ExtractError::missing_attribute("xmi:idref"))
}

/// Decode the end-facing fields from one end node.
fn resolve_end(end_node: &XmlNode) -> ResolvedEnd {
    let multiplicity = end_node
        .first_child_with_tag("type")
        .and_then(|t| t.attr("multiplicity"));
    let (multiple, nullable) = cardinality_flags(multiplicity);

    let navigable = end_node
        .first_child_with_tag("modifiers")
        .and_then(|m| m.attr("isNavigable"))
        == Some("true");

    let fk_role = end_node
        .first_child_with_tag("role")
        .and_then(|r| r.attr("name"))
        .map(Arc::from);

    let end_style = end_node
        .first_child_with_tag("style")
        .and_then(|s| s.attr("value"))
        .map(style::parse_end_style)
        .unwrap_or_default();

    ResolvedEnd {
        multiple,
        nullable,
        navigable,
        owned: end_style.owned.unwrap_or(false),
        fk_column: end_style.alias.map(Arc::from),
        fk_role,
    }
}

/// Map a multiplicity literal to (is-multiple, is-nullable).
///
/// Anything outside the four literals the tool exports is a data-quality
/// problem in one connector, not a reason to abort: log it and leave both
/// flags unset.
fn cardinality_flags(multiplicity: Option<&str>) -> (bool, bool) {
    match multiplicity {
        Some("1") => (false, false),
        Some("0..1") => (false, true),
        Some("0..*") => (true, true),
        Some("1..*") => (true, false),
        other => {
            warn!(
                "unrecognized association cardinality '{}', leaving multiplicity flags unset",
                other.unwrap_or("")
            );
            (false, false)
        }
    }
}

/// Exactly one direction of a pair must own its target end. EA exports
/// symmetric or absent `Owned` markers for 1:1 and n:m connectors; when
/// both directions claim ownership, or neither does, the forward direction
/// takes it.
fn tie_break(forward_owned: bool, reverse_owned: bool) -> (bool, bool) {
    if forward_owned == reverse_owned {
        (true, false)
    } else {
        (forward_owned, reverse_owned)
    }
}

fn directed(
    name: Arc<str>,
    source: ElementId,
    target: ElementId,
    end: ResolvedEnd,
    target_owned: bool,
    opposite: AssociationId,
) -> Association {
    Association {
        name,
        source,
        target,
        target_multiple: end.multiple,
        target_nullable: end.nullable,
        target_navigable: end.navigable,
        target_owned,
        fk_column: end.fk_column,
        fk_role: end.fk_role,
        opposite,
    }
}
