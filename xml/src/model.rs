//! The document root of the Native DICOM Model.
use sxd_document::dom::{Document, Element};

use crate::dataset::DicomDataSet;
use crate::dom::{append_element, expect_element};
use crate::error::Result;

/// Name of the document element.
pub const ROOT_ELEMENT: &str = "NativeDicomModel";

/// A whole Native DICOM Model document:
/// a single top-level data set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NativeDicomModel {
    dataset: DicomDataSet,
}

impl NativeDicomModel {
    pub fn new(dataset: DicomDataSet) -> Self {
        NativeDicomModel { dataset }
    }

    /// Parse a `NativeDicomModel` element and everything in it.
    pub fn parse(element: Element<'_>) -> Result<Self> {
        expect_element(element, ROOT_ELEMENT)?;
        let dataset = DicomDataSet::parse(element)?;
        Ok(NativeDicomModel { dataset })
    }

    /// Write the model as a `NativeDicomModel` element,
    /// appended to `parent` or, if `None`, to the document root.
    pub fn serialize<'d>(&self, doc: Document<'d>, parent: Option<Element<'d>>) {
        let node = append_element(doc, parent, ROOT_ELEMENT);
        self.dataset.serialize(doc, Some(node));
    }

    /// The top-level data set.
    pub fn dataset(&self) -> &DicomDataSet {
        &self.dataset
    }

    pub fn into_dataset(self) -> DicomDataSet {
        self.dataset
    }
}

impl From<DicomDataSet> for NativeDicomModel {
    fn from(dataset: DicomDataSet) -> Self {
        NativeDicomModel::new(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{child_elements, document_element, local_name};
    use crate::error::Error;
    use sxd_document::{parser, Package};

    #[test]
    fn wrong_root_element() {
        let package = parser::parse(r#"<NativeDicomModle/>"#).unwrap();
        let doc = package.as_document();
        let err = NativeDicomModel::parse(document_element(doc).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedElement {
                expected: "NativeDicomModel",
                ref found,
                ..
            } if found == "NativeDicomModle"
        ));
    }

    #[test]
    fn empty_model() {
        let package = parser::parse(r#"<NativeDicomModel/>"#).unwrap();
        let doc = package.as_document();
        let model = NativeDicomModel::parse(document_element(doc).unwrap()).unwrap();
        assert!(model.dataset().is_empty());

        let out = Package::new();
        let out_doc = out.as_document();
        model.serialize(out_doc, None);
        let root = document_element(out_doc).unwrap();
        assert_eq!(local_name(root), ROOT_ELEMENT);
        assert!(child_elements(root).is_empty());
    }
}
