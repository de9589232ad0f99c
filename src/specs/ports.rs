// src/specs/ports.rs
//! Port and link details: the "Ports and Links" block on the View tab.
//! Output is the block's text as rendered, trimmed.

use super::{read_trimmed, Extractor, ExtractorSpec};
use crate::page::{AdapterError, Field, FolderTab, PageAdapter};

pub const SPEC: ExtractorSpec = ExtractorSpec {
    key: "ports",
    output: "results_ports.txt",
    tab: FolderTab { position: 1, keyword: "View" },
    field: Field::Section { heading: "ports and links" },
};

pub struct Ports;

impl Extractor for Ports {
    fn spec(&self) -> &ExtractorSpec {
        &SPEC
    }

    fn read(&self, page: &mut dyn PageAdapter) -> Result<String, AdapterError> {
        read_trimmed(page, &SPEC)
    }
}
