//! Domain catalog loading from the type-metadata document.
//!
//! The metadata document is a flat reference-data export: `DataRow`
//! elements holding `Column name=... value=...` pairs. Only rows whose
//! `ProductName` column matches [`PRODUCT_NAME`] describe domains for the
//! target language; everything else in the export is ignored.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use super::XmiReader;
use crate::model::Domain;
use crate::xml::XmlNode;

/// Product discriminator of the rows carrying target-language domains.
const PRODUCT_NAME: &str = "Java";

impl XmiReader {
    /// Populate the domain catalog from a parsed metadata document.
    pub(super) fn load_metadata(&mut self, doc: &XmlNode) {
        for row in doc.descendants_with_tag("DataRow") {
            let mut columns: FxHashMap<&str, &str> = FxHashMap::default();
            for column in row.children_with_tag("Column") {
                if let (Some(name), Some(value)) = (column.attr("name"), column.attr("value")) {
                    columns.insert(name, value);
                }
            }

            if columns.get("ProductName").copied() != Some(PRODUCT_NAME) {
                continue;
            }

            let Some(name) = columns.get("DataType").copied() else {
                warn!("skipping {PRODUCT_NAME} metadata row without a DataType column");
                continue;
            };

            // GenericType may be absent here; Domain::type_name reports it
            // when the domain is actually used.
            let domain = Domain::new(
                name,
                columns.get("GenericType").copied(),
                columns.get("MaxLen").copied(),
                columns.get("DefaultPrec").copied(),
                columns.get("DefaultScale").copied(),
            );
            self.domains.insert(name.into(), domain);
        }

        debug!("cataloged {} domains", self.domains.len());
    }
}
