//! DICOM data sets: ordered collections of attributes with unique tags.
use std::collections::HashMap;

use dicom_core::Tag;
use snafu::ensure;
use sxd_document::dom::{Document, Element};

use crate::attribute::DicomAttribute;
use crate::dom::child_elements;
use crate::error::{DuplicateTagSnafu, Result};
use crate::tag::TagValue;

/// An ordered collection of DICOM attributes,
/// in which no two attributes share the same tag.
///
/// The attributes are kept in the order in which they were given
/// (document order, when parsed),
/// and are written back in that same order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DicomDataSet {
    attributes: Vec<DicomAttribute>,
    /// index into `attributes` by tag
    index: HashMap<Tag, usize>,
}

impl DicomDataSet {
    /// Create a data set from a sequence of attributes.
    ///
    /// Fails if two of the attributes have the same tag.
    pub fn new(attributes: Vec<DicomAttribute>) -> Result<Self> {
        let mut index = HashMap::with_capacity(attributes.len());
        for (i, attribute) in attributes.iter().enumerate() {
            let tag = attribute.tag();
            ensure!(index.insert(tag, i).is_none(), DuplicateTagSnafu { tag });
        }
        Ok(DicomDataSet { attributes, index })
    }

    /// Parse each child element of the given element
    /// as an attribute of a new data set.
    ///
    /// This is used both for the root of the document
    /// and for sequence items.
    pub fn parse(element: Element<'_>) -> Result<Self> {
        let attributes = child_elements(element)
            .into_iter()
            .map(DicomAttribute::parse)
            .collect::<Result<Vec<_>>>()?;
        Self::new(attributes)
    }

    /// Write all attributes as children of the given element, in order.
    pub fn serialize<'d>(&self, doc: Document<'d>, parent: Option<Element<'d>>) {
        for attribute in &self.attributes {
            attribute.serialize(doc, parent);
        }
    }

    /// Look up an attribute by tag.
    ///
    /// The tag may be given in any form accepted by [`TagValue`],
    /// including attribute keywords.
    /// Returns `None` if there is no such attribute
    /// or the tag could not be resolved.
    pub fn get_attribute_by_tag(&self, tag: impl TagValue) -> Option<&DicomAttribute> {
        let tag = tag.to_tag()?;
        self.index.get(&tag).map(|&i| &self.attributes[i])
    }

    /// The attributes, in order.
    pub fn attributes(&self) -> &[DicomAttribute] {
        &self.attributes
    }

    /// Iterate over the attributes, in order.
    pub fn iter(&self) -> std::slice::Iter<'_, DicomAttribute> {
        self.attributes.iter()
    }

    /// The number of attributes in the data set.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Take the attributes out of the data set, in order.
    pub fn into_attributes(self) -> Vec<DicomAttribute> {
        self.attributes
    }
}

impl<'a> IntoIterator for &'a DicomDataSet {
    type Item = &'a DicomAttribute;
    type IntoIter = std::slice::Iter<'a, DicomAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

impl IntoIterator for DicomDataSet {
    type Item = DicomAttribute;
    type IntoIter = std::vec::IntoIter<DicomAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.into_iter()
    }
}
