// src/specs/rackspace.rs
//! Rack number from the Rackspace tab (fourth folder tab), shown as the
//! first centered heading.

use super::{read_trimmed, Extractor, ExtractorSpec};
use crate::page::{AdapterError, Field, FolderTab, PageAdapter};

pub const SPEC: ExtractorSpec = ExtractorSpec {
    key: "rackspace",
    output: "rack_numbers.txt",
    tab: FolderTab { position: 4, keyword: "Rackspace" },
    field: Field::Element { css: "center > h2" },
};

pub struct Rackspace;

impl Extractor for Rackspace {
    fn spec(&self) -> &ExtractorSpec {
        &SPEC
    }

    fn read(&self, page: &mut dyn PageAdapter) -> Result<String, AdapterError> {
        read_trimmed(page, &SPEC)
    }
}
