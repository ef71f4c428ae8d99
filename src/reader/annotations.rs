//! Annotation pass over the extension block's `elements` section.
//!
//! The extension block carries the authoritative name, comment, type,
//! nullability and primary-key data, keyed back to the structural stubs by
//! `xmi:idref`. A back-reference that does not resolve means the two parts
//! of the document disagree, and the run aborts rather than skip silently.

use std::sync::Arc;

use indexmap::IndexMap;

use super::{ClassRecord, XmiReader, style};
use crate::error::ExtractError;
use crate::model::{Attribute, Domain, ElementId};
use crate::xml::{XmiType, XmlNode};

impl XmiReader {
    /// Pass 2: enrich class and attribute stubs from the extension block.
    pub(super) fn annotate(&mut self, extension: &XmlNode) -> Result<(), ExtractError> {
        let elements = extension
            .first_child_with_tag("elements")
            .ok_or_else(|| ExtractError::missing_element("elements"))?;

        for element in elements.children_with_tag_and_type("element", XmiType::Class) {
            self.annotate_class(element)?;
        }
        Ok(())
    }

    fn annotate_class(&mut self, node: &XmlNode) -> Result<(), ExtractError> {
        let id_ref = node
            .id_ref()
            .ok_or_else(|| ExtractError::missing_attribute("xmi:idref"))?;
        let id = ElementId::new(id_ref);

        let Self {
            packages,
            classes,
            domains,
            ..
        } = self;
        let record = classes
            .get_mut(&id)
            .ok_or_else(|| ExtractError::unresolved("class", id_ref))?;

        record.name = node.name().map(Arc::from);

        let extended = node
            .first_child_with_tag("extendedProperties")
            .ok_or_else(|| ExtractError::missing_element("extendedProperties"))?;
        let package_name = extended
            .attr("package_name")
            .ok_or_else(|| ExtractError::missing_attribute("package_name"))?;
        let package = packages
            .get_mut(package_name)
            .ok_or_else(|| ExtractError::unresolved("package", package_name))?;
        package.classes.push(id.clone());
        record.package = Some(package.name.clone());

        if let Some(properties) = node.first_child_with_tag("properties") {
            if let Some(documentation) = properties.attr("documentation") {
                record.comment = Some(documentation.to_string());
            }
        }

        if let Some(attributes) = node.first_child_with_tag("attributes") {
            for attr_node in attributes.children_with_tag("attribute") {
                annotate_attribute(domains, record, &id, attr_node)?;
            }
        }
        Ok(())
    }
}

/// Enrich one attribute stub and append it to the class in document order.
fn annotate_attribute(
    domains: &IndexMap<Arc<str>, Domain>,
    record: &mut ClassRecord,
    class_id: &ElementId,
    node: &XmlNode,
) -> Result<(), ExtractError> {
    let id_ref = node
        .id_ref()
        .ok_or_else(|| ExtractError::missing_attribute("xmi:idref"))?;
    // Only plain attributes were registered in pass 1; an unknown idref
    // here is inconsistent input, not an association-derived end.
    let stub = record
        .attribute_stubs
        .iter()
        .find(|s| s.id.as_str() == id_ref)
        .ok_or_else(|| ExtractError::unresolved("attribute", id_ref))?;
    let id = stub.id.clone();
    let is_readonly = stub.readonly;

    let name = node
        .name()
        .ok_or_else(|| ExtractError::missing_attribute("name"))?;

    let properties = node
        .first_child_with_tag("properties")
        .ok_or_else(|| ExtractError::missing_element("properties"))?;
    let domain_name = properties
        .attr("type")
        .ok_or_else(|| ExtractError::missing_attribute("type"))?;
    if !domains.contains_key(domain_name) {
        return Err(ExtractError::UnknownDomain {
            domain: domain_name.to_string(),
            attribute: name.to_string(),
            class: record.display_name(class_id).to_string(),
        });
    }

    let comment = node
        .first_child_with_tag("style")
        .and_then(|s| s.attr("value"))
        .map(str::to_string);

    // Multiplicity lower bound doubles as the null flag: lower="0" means
    // the value may be absent, anything else (bounds missing included)
    // means not-null.
    let lower = node
        .first_child_with_tag("bounds")
        .and_then(|b| b.attr("lower"));
    let is_not_null = lower != Some("0");

    let is_primary_key = node
        .first_child_with_tag("xrefs")
        .and_then(|x| x.attr("value"))
        .is_some_and(style::has_identity_marker);

    record.attributes.push(Attribute {
        id,
        name: name.into(),
        comment,
        domain: domain_name.into(),
        is_not_null,
        is_primary_key,
        is_readonly,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml;
    use rstest::rstest;

    const MODEL: &str = r#"<xmi:XMI>
          <packagedElement xmi:type="uml:Package" xmi:id="p1" name="a.b">
            <packagedElement xmi:type="uml:Class" xmi:id="cls1" name="Person">
              <ownedAttribute xmi:type="uml:Property" xmi:id="att1" name="id"/>
            </packagedElement>
          </packagedElement>
        </xmi:XMI>"#;

    const METADATA: &str = r#"<RefData>
          <DataRow>
            <Column name="ProductName" value="Java"/>
            <Column name="DataType" value="DO_ID"/>
            <Column name="GenericType" value="Long"/>
          </DataRow>
        </RefData>"#;

    fn annotated(extension: &str) -> Result<XmiReader, ExtractError> {
        let mut reader = XmiReader::new();
        reader.load_metadata(&xml::parse(METADATA.as_bytes()).unwrap());
        reader
            .extract_structure(&xml::parse(MODEL.as_bytes()).unwrap())
            .unwrap();
        let extension = xml::parse(extension.as_bytes()).unwrap();
        reader.annotate(&extension)?;
        Ok(reader)
    }

    fn extension_with_bounds(bounds: &str) -> String {
        format!(
            r#"<xmi:Extension>
                 <elements>
                   <element xmi:idref="cls1" xmi:type="uml:Class" name="Person">
                     <extendedProperties package_name="a.b"/>
                     <attributes>
                       <attribute xmi:idref="att1" name="id">
                         <properties type="DO_ID"/>
                         {bounds}
                       </attribute>
                     </attributes>
                   </element>
                 </elements>
               </xmi:Extension>"#
        )
    }

    #[rstest]
    #[case::lower_zero_is_nullable(r#"<bounds lower="0" upper="1"/>"#, false)]
    #[case::lower_one_is_not_null(r#"<bounds lower="1" upper="1"/>"#, true)]
    #[case::no_bounds_is_not_null("", true)]
    fn test_not_null_follows_lower_bound(#[case] bounds: &str, #[case] expected: bool) {
        let reader = annotated(&extension_with_bounds(bounds)).unwrap();
        let record = &reader.classes[&ElementId::new("cls1")];
        assert_eq!(record.attributes[0].is_not_null, expected);
    }

    #[test]
    fn test_unknown_domain_aborts_naming_attribute_and_class() {
        let extension = r#"<xmi:Extension>
              <elements>
                <element xmi:idref="cls1" xmi:type="uml:Class" name="Person">
                  <extendedProperties package_name="a.b"/>
                  <attributes>
                    <attribute xmi:idref="att1" name="id">
                      <properties type="DO_UNCATALOGED"/>
                    </attribute>
                  </attributes>
                </element>
              </elements>
            </xmi:Extension>"#;

        match annotated(extension) {
            Err(ExtractError::UnknownDomain {
                domain,
                attribute,
                class,
            }) => {
                assert_eq!(domain, "DO_UNCATALOGED");
                assert_eq!(attribute, "id");
                assert_eq!(class, "Person");
            }
            other => panic!("expected UnknownDomain, got {other:?}"),
        }
    }

    #[test]
    fn test_unregistered_class_reference_aborts() {
        let extension = r#"<xmi:Extension>
              <elements>
                <element xmi:idref="ghost" xmi:type="uml:Class" name="Ghost">
                  <extendedProperties package_name="a.b"/>
                </element>
              </elements>
            </xmi:Extension>"#;

        assert!(matches!(
            annotated(extension),
            Err(ExtractError::UnresolvedReference { kind: "class", .. })
        ));
    }
}
