// src/specs/racks.rs
//! Rack allocation: the row and rack links in the "Rackspace allocation"
//! heading on the View tab.
//!
//! Output shape (two lines per record):
//! ```text
//! 'row_name': '<row>',
//! 'rack_number': '<rack>'
//! ```

use super::{Extractor, ExtractorSpec};
use crate::page::{AdapterError, Field, FolderTab, PageAdapter};

pub const SPEC: ExtractorSpec = ExtractorSpec {
    key: "racks",
    output: "results_racks.txt",
    tab: FolderTab { position: 1, keyword: "View" },
    field: Field::SectionLinks {
        heading: "rackspace allocation",
        hrefs: &["page=row", "page=rack"],
    },
};

pub struct Racks;

impl Extractor for Racks {
    fn spec(&self) -> &ExtractorSpec {
        &SPEC
    }

    fn read(&self, page: &mut dyn PageAdapter) -> Result<String, AdapterError> {
        let parts = page.read_field(&SPEC.field)?;
        match parts.as_slice() {
            [row, rack] => Ok(format_allocation(row.trim(), rack.trim())),
            _ => Err(AdapterError::Empty { what: "rack allocation links".to_string() }),
        }
    }
}

pub fn format_allocation(row: &str, rack: &str) -> String {
    format!("'row_name': '{row}',\n'rack_number': '{rack}'")
}
