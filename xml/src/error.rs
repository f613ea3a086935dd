//! Error types for decoding Native DICOM Model documents
//! and for reading attribute values.
use dicom_core::Tag;
use snafu::{Backtrace, Snafu};

use crate::value::ValueKind;

/// Type alias for a result from this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error which may occur when decoding or encoding
/// a Native DICOM Model document.
///
/// Decoding is fail-fast:
/// the first irregularity found aborts the whole operation.
/// Errors emerging from inside an attribute or sequence item
/// are wrapped in [`InAttribute`](Error::InAttribute)
/// and [`InItem`](Error::InItem),
/// so that the report describes where in the tree the problem is.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// Expected element <{expected}>, found <{found}>
    UnexpectedElement {
        expected: &'static str,
        found: String,
        backtrace: Backtrace,
    },
    /// Missing attribute `{name}` in <{element}>
    MissingAttribute {
        element: &'static str,
        name: &'static str,
        backtrace: Backtrace,
    },
    /// Invalid attribute tag `{value}`
    InvalidTag { value: String, backtrace: Backtrace },
    /// Invalid number `{value}` in <{element}>
    InvalidNumber {
        element: &'static str,
        value: String,
        source: std::num::ParseIntError,
        backtrace: Backtrace,
    },
    /// Invalid value representation `{vr}`
    InvalidVr { vr: String, backtrace: Backtrace },
    /// Duplicate attribute tag {tag} in data set
    DuplicateTag { tag: Tag, backtrace: Backtrace },
    /// Heterogeneous values: found <{other}> after <{first}>
    HeterogeneousValue {
        first: String,
        other: String,
        backtrace: Backtrace,
    },
    /// Unknown value element <{name}>
    UnknownValueKind { name: String, backtrace: Backtrace },
    /// Expected a single <{kind}> element, found {count}
    MultipleBinaryValues {
        kind: ValueKind,
        count: usize,
        backtrace: Backtrace,
    },
    #[snafu(display(
        "<BulkData> must have either `uuid` or `uri`, {}",
        if *both { "found both" } else { "found neither" }
    ))]
    BulkDataExclusivity { both: bool, backtrace: Backtrace },
    /// <InlineBinary> must not be empty
    EmptyInlineBinary { backtrace: Backtrace },
    /// More than one <{name}> in <{parent}>
    NotUnique {
        parent: String,
        name: &'static str,
        backtrace: Backtrace,
    },
    /// In attribute {tag}
    InAttribute {
        tag: Tag,
        #[snafu(source(from(Error, Box::new)))]
        source: Box<Error>,
    },
    /// In item #{number}
    InItem {
        number: u32,
        #[snafu(source(from(Error, Box::new)))]
        source: Box<Error>,
    },
    /// XML document has no root element
    MissingRoot { backtrace: Backtrace },
    /// Could not parse XML document
    ParseXml {
        source: sxd_document::parser::Error,
        backtrace: Backtrace,
    },
    /// Could not read XML document
    ReadXml {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    /// Could not write XML document
    WriteXml {
        source: std::io::Error,
        backtrace: Backtrace,
    },
}

/// The broad category of a decoding error,
/// independent of where in the tree it happened.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// An element or one of its required attributes
    /// does not have the expected shape.
    ShapeMismatch,
    /// A value representation outside of the known vocabulary.
    InvalidVr,
    /// Two attributes in one data set share the same tag.
    DuplicateTag,
    /// The values of one attribute are not all of the same kind.
    HeterogeneousValue,
    /// Bulk data with both or neither of `uuid` and `uri`.
    MutualExclusionViolation,
    /// Required text content is missing or empty.
    EmptyValue,
    /// An element which may only appear once appeared more than once.
    NotUnique,
    /// The XML document itself could not be read, parsed or written.
    Document,
}

impl Error {
    /// Obtain the category of this error,
    /// looking through attribute and item context.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::UnexpectedElement { .. }
            | Error::MissingAttribute { .. }
            | Error::InvalidTag { .. }
            | Error::InvalidNumber { .. }
            | Error::UnknownValueKind { .. }
            | Error::MultipleBinaryValues { .. } => ErrorCategory::ShapeMismatch,
            Error::InvalidVr { .. } => ErrorCategory::InvalidVr,
            Error::DuplicateTag { .. } => ErrorCategory::DuplicateTag,
            Error::HeterogeneousValue { .. } => ErrorCategory::HeterogeneousValue,
            Error::BulkDataExclusivity { .. } => ErrorCategory::MutualExclusionViolation,
            Error::EmptyInlineBinary { .. } => ErrorCategory::EmptyValue,
            Error::NotUnique { .. } => ErrorCategory::NotUnique,
            Error::InAttribute { source, .. } | Error::InItem { source, .. } => source.category(),
            Error::MissingRoot { .. } => ErrorCategory::ShapeMismatch,
            Error::ParseXml { .. } | Error::ReadXml { .. } | Error::WriteXml { .. } => {
                ErrorCategory::Document
            }
        }
    }

    /// Obtain the innermost error,
    /// skipping attribute and item context.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::InAttribute { source, .. } | Error::InItem { source, .. } => source.root_cause(),
            e => e,
        }
    }
}

/// An error which may occur when reading
/// the values of an attribute through one of its typed accessors,
/// such as [`get_value`](crate::DicomAttribute::get_value).
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum AccessError {
    /// Attribute has no value, requested {requested}
    NoValue {
        requested: ValueKind,
        backtrace: Backtrace,
    },
    /// Requested a single {requested} value, but attribute has {len}
    NotSingle {
        requested: ValueKind,
        len: usize,
        backtrace: Backtrace,
    },
    /// Requested {requested} value, but found {got}
    WrongKind {
        requested: ValueKind,
        got: ValueKind,
        backtrace: Backtrace,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use snafu::GenerateImplicitData;

    #[test]
    fn category_looks_through_context() {
        let inner = Error::InvalidVr {
            vr: "XX".to_string(),
            backtrace: Backtrace::generate(),
        };
        let err = Error::InAttribute {
            tag: Tag(0x0040, 0xA730),
            source: Box::new(Error::InItem {
                number: 2,
                source: Box::new(inner),
            }),
        };

        assert_eq!(err.category(), ErrorCategory::InvalidVr);
        assert!(matches!(err.root_cause(), Error::InvalidVr { vr, .. } if vr == "XX"));
    }

    #[test]
    fn bulk_data_error_message() {
        let err = Error::BulkDataExclusivity {
            both: true,
            backtrace: Backtrace::generate(),
        };
        assert_eq!(
            err.to_string(),
            "<BulkData> must have either `uuid` or `uri`, found both"
        );
    }
}
