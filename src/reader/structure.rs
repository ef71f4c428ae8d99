//! Structural pass over the main document.
//!
//! Discovers code packages and registers Class/Attribute stubs by `xmi:id`
//! so the extension block can refer back to them. Names, comments, types
//! and flags other than `isReadOnly` are not available at this level of the
//! document; the annotation pass fills them in.

use tracing::debug;

use super::{AttributeStub, ClassRecord, XmiReader};
use crate::error::ExtractError;
use crate::model::{ElementId, Package};
use crate::xml::{XmiType, XmlNode};

impl XmiReader {
    /// Pass 1: register packages, class stubs and attribute stubs.
    pub(super) fn extract_structure(&mut self, doc: &XmlNode) -> Result<(), ExtractError> {
        for node in doc.descendants_with_tag("packagedElement") {
            if node.xmi_type() != XmiType::Package {
                continue;
            }
            // Only dotted names are code packages; EA also exports flat
            // organizational folders at this level, which carry no code.
            let Some(name) = node.name() else { continue };
            if !name.contains('.') {
                continue;
            }
            self.extract_package(node, name)?;
        }

        debug!(
            "discovered {} packages and {} classes",
            self.packages.len(),
            self.classes.len()
        );
        Ok(())
    }

    fn extract_package(&mut self, node: &XmlNode, name: &str) -> Result<(), ExtractError> {
        let id = node
            .id()
            .ok_or_else(|| ExtractError::missing_attribute("xmi:id"))?;

        let comments: Vec<&str> = node
            .children_with_tag_and_type("ownedComment", XmiType::Comment)
            .filter_map(XmlNode::body)
            .collect();
        let comment = (!comments.is_empty()).then(|| comments.join("\n"));

        for class_node in node.children_with_tag_and_type("packagedElement", XmiType::Class) {
            self.init_class(class_node)?;
        }

        // Same dotted name twice is not expected in EA exports; if it does
        // happen the later package wins.
        self.packages.insert(
            name.into(),
            Package {
                id: ElementId::new(id),
                name: name.into(),
                comment,
                classes: Vec::new(),
            },
        );
        Ok(())
    }

    fn init_class(&mut self, node: &XmlNode) -> Result<(), ExtractError> {
        let id = node
            .id()
            .ok_or_else(|| ExtractError::missing_attribute("xmi:id"))?;
        let mut record = ClassRecord::default();

        for attr_node in node.children_with_tag_and_type("ownedAttribute", XmiType::Property) {
            // Attribute ends synthesized from an association are resolved
            // by the connector pass, not registered as plain attributes.
            if attr_node.attr("association").is_some() {
                continue;
            }
            let attr_id = attr_node
                .id()
                .ok_or_else(|| ExtractError::missing_attribute("xmi:id"))?;
            record.attribute_stubs.push(AttributeStub {
                id: ElementId::new(attr_id),
                readonly: attr_node.attr("isReadOnly") == Some("true"),
            });
        }

        self.classes.insert(ElementId::new(id), record);
        Ok(())
    }
}
