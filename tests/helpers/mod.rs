//! Fixture builders: minimal documents shaped like Enterprise Architect's
//! XMI 2.1 and reference-data exports.

#![allow(dead_code)]

use umx::{ExtractError, Model, XmiReader};

/// Metadata export with two Java domains and one row for another product.
pub const METADATA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<RefData version="1.0" exporter="Enterprise Architect">
  <DataSet name="Model Data Types - Code and DDL" table="t_datatypes">
    <DataRow>
      <Column name="ProductName" value="Java"/>
      <Column name="DataType" value="DO_ID"/>
      <Column name="GenericType" value="Long"/>
      <Column name="MaxLen" value="0"/>
      <Column name="DefaultPrec" value="0"/>
      <Column name="DefaultScale" value="0"/>
    </DataRow>
    <DataRow>
      <Column name="ProductName" value="Java"/>
      <Column name="DataType" value="DO_LIBELLE"/>
      <Column name="GenericType" value="String"/>
      <Column name="MaxLen" value="255"/>
    </DataRow>
    <DataRow>
      <Column name="ProductName" value="Oracle"/>
      <Column name="DataType" value="NUMBER"/>
      <Column name="GenericType" value="NUMBER"/>
    </DataRow>
  </DataSet>
</RefData>"#;

/// Wrap model content and extension content into a full XMI document.
pub fn document(model_body: &str, extension_body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<xmi:XMI xmi:version="2.1" xmlns:uml="http://schema.omg.org/spec/UML/2.1" xmlns:xmi="http://schema.omg.org/spec/XMI/2.1">
  <xmi:Documentation exporter="Enterprise Architect" exporterVersion="6.5"/>
  <uml:Model xmi:type="uml:Model" name="EA_Model">
{model_body}
  </uml:Model>
  <xmi:Extension extender="Enterprise Architect" extenderID="6.5">
{extension_body}
  </xmi:Extension>
</xmi:XMI>"#
    )
}

/// Structural half of the Person/Address fixture: one dotted package, two
/// classes, and one association-derived attribute end that pass 1 must
/// skip.
pub const PEOPLE_PACKAGE: &str = r#"
    <packagedElement xmi:type="uml:Package" xmi:id="EAPK_1" name="com.example.people">
      <ownedComment xmi:type="uml:Comment" xmi:id="EAID_C1" body="People management."/>
      <ownedComment xmi:type="uml:Comment" xmi:id="EAID_C2" body="Second paragraph."/>
      <packagedElement xmi:type="uml:Class" xmi:id="EAID_PERSON" name="Person">
        <ownedAttribute xmi:type="uml:Property" xmi:id="EAID_PERSON_ID" name="id" isReadOnly="true"/>
        <ownedAttribute xmi:type="uml:Property" xmi:id="EAID_PERSON_NAME" name="name"/>
        <ownedAttribute xmi:type="uml:Property" xmi:id="EAID_PERSON_HOME" name="homeAddress" association="EAID_HOME"/>
      </packagedElement>
      <packagedElement xmi:type="uml:Class" xmi:id="EAID_ADDRESS" name="Address">
        <ownedAttribute xmi:type="uml:Property" xmi:id="EAID_ADDRESS_ID" name="id"/>
      </packagedElement>
    </packagedElement>"#;

/// Annotation half of the Person/Address fixture.
pub const PEOPLE_ELEMENTS: &str = r#"
    <elements>
      <element xmi:idref="EAID_PERSON" xmi:type="uml:Class" name="Person" scope="public">
        <properties documentation="A person known to the system" isSpecification="false" sType="Class"/>
        <extendedProperties tagged="0" package_name="com.example.people"/>
        <attributes>
          <attribute xmi:idref="EAID_PERSON_ID" name="id" scope="Private">
            <properties type="DO_ID" derived="0" collection="false"/>
            <style value="Technical identifier"/>
            <bounds lower="1" upper="1"/>
            <xrefs value="$XREFPROP=$XID={3C6F55AC-762C-4339-AEA5-6B85C4EEFAB8}$XID;$NAM=CustomProperties$NAM;$TYP=attribute property$TYP;$DES=@PROP=@NAME=isID@ENDNAME;@TYPE=Boolean@ENDTYPE;@VALU=1@ENDVALU;@PRMT=@ENDPRMT;@ENDPROP;$DES;$ENDXREF;"/>
          </attribute>
          <attribute xmi:idref="EAID_PERSON_NAME" name="name" scope="Private">
            <properties type="DO_LIBELLE"/>
            <style value="Display name"/>
            <bounds lower="0" upper="1"/>
          </attribute>
        </attributes>
      </element>
      <element xmi:idref="EAID_ADDRESS" xmi:type="uml:Class" name="Address" scope="public">
        <extendedProperties tagged="0" package_name="com.example.people"/>
        <attributes>
          <attribute xmi:idref="EAID_ADDRESS_ID" name="id">
            <properties type="DO_ID"/>
            <bounds lower="1" upper="1"/>
          </attribute>
        </attributes>
      </element>
    </elements>"#;

/// The HOME connector: `Owned=0` on the source end, `Owned=1` and an alias
/// on the target end.
pub const HOME_CONNECTOR: &str = r#"
    <connectors>
      <connector xmi:idref="EAID_HOME">
        <source xmi:idref="EAID_PERSON">
          <type multiplicity="0..*" aggregation="none"/>
          <modifiers isOrdered="false" isNavigable="false"/>
          <style value="Union=0;Derived=0;Owned=0;"/>
        </source>
        <target xmi:idref="EAID_ADDRESS">
          <type multiplicity="0..1" aggregation="none"/>
          <modifiers isOrdered="false" isNavigable="true"/>
          <role name="homeAddress" targetScope="instance"/>
          <style value="Union=0;Owned=1;alias=home_address_id;"/>
        </target>
        <labels mt="HOME"/>
      </connector>
    </connectors>"#;

/// The Person/Address model with a custom connectors section.
pub fn people_document(connectors: &str) -> String {
    document(
        PEOPLE_PACKAGE,
        &format!("{PEOPLE_ELEMENTS}\n{connectors}"),
    )
}

/// Extract against the standard [`METADATA`] catalog.
pub fn extract(model: &str) -> Result<Model, ExtractError> {
    XmiReader::new().read(model.as_bytes(), METADATA.as_bytes())
}
