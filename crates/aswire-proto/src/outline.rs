//! `analysis.outline`: the declaration tree of a file.

use crate::common::FileKind;
use crate::element::Element;
use aswire_core::{
    protocol_object, ObjectReader, ObjectWriter, Result, TextRange, Tree, TreePayload,
};

/// One node of an outline. Children and the parent link live in the
/// enclosing `Tree`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Outline {
    pub element: Element,
    /// Range of the whole declaration, including its documentation comment.
    pub offset: i64,
    pub length: i64,
    /// Range of the declaration itself.
    pub code_offset: i64,
    pub code_length: i64,
}

impl Outline {
    #[must_use]
    pub fn new(element: Element, offset: i64, length: i64) -> Self {
        Self {
            element,
            offset,
            length,
            code_offset: offset,
            code_length: length,
        }
    }
}

impl TreePayload for Outline {
    const TYPE_NAME: &'static str = "Outline";

    fn decode(reader: &ObjectReader<'_, '_>) -> Result<Self> {
        Ok(Self {
            element: reader.required("element")?,
            offset: reader.required("offset")?,
            length: reader.required("length")?,
            code_offset: reader.required("codeOffset")?,
            code_length: reader.required("codeLength")?,
        })
    }

    fn encode(&self, writer: &mut ObjectWriter) {
        writer.put("element", &self.element);
        writer.put("offset", &self.offset);
        writer.put("length", &self.length);
        writer.put("codeOffset", &self.code_offset);
        writer.put("codeLength", &self.code_length);
    }

    fn range(&self) -> TextRange {
        TextRange::new(self.offset, self.length)
    }
}

protocol_object! {
    /// Params of the `analysis.outline` notification.
    #[derive(Eq, Hash)]
    pub struct AnalysisOutlineParams {
        required file: String = "file",
        required kind: FileKind = "kind",
        optional library_name: String = "libraryName",
        required outline: Tree<Outline> = "outline",
    }
}
