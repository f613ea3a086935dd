//! DICOM Native Model XML module
//!
//!
//! This library provides decoding of XML documents
//! in the Native DICOM Model format
//! into a typed in-memory data set, and encoding back to XML,
//! as per the [DICOM standard part 19 section A.1][1].
//!
//! [1]: https://dicom.nema.org/medical/dicom/current/output/chtml/part19/chapter_A.html
//!
//! The easiest path is in using the functions
//! [`from_str`] and [`to_string`].
//! Every node of the model can also be parsed from
//! and serialized into an existing [`sxd_document`] tree
//! through its own `parse` and `serialize` methods.
//!
//! # Example
//!
//! ```rust
//! # use dicom_core::VR;
//! # use dicom_dictionary_std::tags;
//! use dicom_xml::{DicomAttribute, DicomDataSet, NativeDicomModel, Value};
//!
//! let dataset = DicomDataSet::new(vec![
//!     DicomAttribute::new(tags::SERIES_DATE, VR::DA, Some(vec![Value::new(1, "20230610").into()]))
//!         .with_keyword("SeriesDate"),
//!     DicomAttribute::new(tags::INSTANCE_NUMBER, VR::IS, Some(vec![Value::new(1, "5").into()])),
//! ])?;
//! let xml = dicom_xml::to_string(&NativeDicomModel::new(dataset))?;
//!
//! let model = dicom_xml::from_str(&xml)?;
//! let series_date = model.dataset().get_attribute_by_tag("SeriesDate").unwrap();
//! assert_eq!(series_date.get_value()?.text, "20230610");
//! assert_eq!(series_date.keyword(), Some("SeriesDate"));
//!
//! Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Decoding stops at the first irregularity found.
//! See [`Error::category`] for a coarse classification of failures.
use std::io::{Read, Write};

use snafu::{OptionExt, ResultExt};
use sxd_document::{parser, Package};

pub mod attribute;
pub mod dataset;
mod dom;
pub mod error;
pub mod model;
pub mod person_name;
pub mod tag;
pub mod value;
pub mod vr;

pub use crate::attribute::{DicomAttribute, ExtractedValue};
pub use crate::dataset::DicomDataSet;
pub use crate::error::{AccessError, Error, ErrorCategory, Result};
pub use crate::model::NativeDicomModel;
pub use crate::person_name::{NameComponents, PersonName};
pub use crate::tag::TagValue;
pub use crate::value::{BulkData, DicomValue, InlineBinary, Item, Value, ValueKind};

use crate::dom::document_element;
use crate::error::{MissingRootSnafu, ParseXmlSnafu, ReadXmlSnafu, WriteXmlSnafu};

/// Decode a Native DICOM Model document from a string of XML.
pub fn from_str(xml: &str) -> Result<NativeDicomModel> {
    let package = parser::parse(xml).context(ParseXmlSnafu)?;
    let doc = package.as_document();
    let root = document_element(doc).context(MissingRootSnafu)?;
    NativeDicomModel::parse(root)
}

/// Decode a Native DICOM Model document from a reader.
///
/// The whole input is read before decoding starts.
pub fn from_reader<R: Read>(mut reader: R) -> Result<NativeDicomModel> {
    let mut xml = String::new();
    reader.read_to_string(&mut xml).context(ReadXmlSnafu)?;
    from_str(&xml)
}

/// Encode a Native DICOM Model document into a writer.
pub fn to_writer<W: Write>(mut writer: W, model: &NativeDicomModel) -> Result<()> {
    let package = Package::new();
    let doc = package.as_document();
    model.serialize(doc, None);
    sxd_document::writer::format_document(&doc, &mut writer).context(WriteXmlSnafu)
}

/// Encode a Native DICOM Model document into a string of XML.
pub fn to_string(model: &NativeDicomModel) -> Result<String> {
    let mut out = Vec::new();
    to_writer(&mut out, model)?;
    String::from_utf8(out)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        .context(WriteXmlSnafu)
}
