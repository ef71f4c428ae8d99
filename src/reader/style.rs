//! Decoders for the packed string formats the modeling tool exports.
//!
//! Two formats live here, kept bit-for-bit compatible with the tool's
//! output and isolated so nothing else has to know about them:
//!
//! - association-end style strings: `;`-delimited `key=value` tokens, e.g.
//!   `Union=0;Derived=0;Owned=1;Navigable=Navigable;alias=workplace_id;`
//! - attribute cross-reference strings: a packed custom-property dump in
//!   which a primary-key attribute carries the `isID` boolean marker.

/// Marker a primary-key attribute carries inside its `xrefs` value: the
/// packed form of a boolean custom property named `isID` set to true.
const IDENTITY_MARKER: &str =
    "$DES=@PROP=@NAME=isID@ENDNAME;@TYPE=Boolean@ENDTYPE;@VALU=1@ENDVALU;";

/// Whether a packed cross-reference string marks its attribute as a
/// primary key. Substring test, not structured parsing: the surrounding
/// record format is undocumented and only this marker is stable.
pub(super) fn has_identity_marker(xrefs: &str) -> bool {
    xrefs.contains(IDENTITY_MARKER)
}

/// Fields decoded from one association end's style string.
#[derive(Debug, Default, PartialEq)]
pub(super) struct EndStyle {
    /// Foreign-key column name, from an `alias=` token.
    pub alias: Option<String>,
    /// Ownership claim, from an `Owned=` token: `true` when the token's
    /// value is `1`. Absent token leaves `None`.
    pub owned: Option<bool>,
}

/// Decode a `;`-delimited style string. Unknown tokens are ignored; an
/// `alias=` token with an empty value counts as no alias.
pub(super) fn parse_end_style(value: &str) -> EndStyle {
    let mut style = EndStyle::default();
    for token in value.split(';') {
        if let Some(alias) = token.strip_prefix("alias=") {
            if !alias.is_empty() {
                style.alias = Some(alias.to_string());
            }
        } else if let Some(owned) = token.strip_prefix("Owned=") {
            style.owned = Some(owned == "1");
        }
    }
    style
}
