//! The values which a DICOM attribute may hold
//! in the Native DICOM Model.
//!
//! All values of one attribute are of the same kind,
//! which is one of the variants of [`DicomValue`].
use std::fmt;

use base64::Engine;
use snafu::{ensure, ResultExt};
use sxd_document::dom::{Document, Element};

use crate::dataset::DicomDataSet;
use crate::dom::{
    append_element, expect_element, parse_number, set_text, text_content, NUMBER_ATTRIBUTE,
};
use crate::error::{BulkDataExclusivitySnafu, EmptyInlineBinarySnafu, InItemSnafu, Result};
use crate::person_name::PersonName;

/// Element name of bulk data references.
pub const BULK_DATA_ELEMENT: &str = "BulkData";
/// Element name of base64 encoded binary values.
pub const INLINE_BINARY_ELEMENT: &str = "InlineBinary";
/// Element name of textual values.
pub const VALUE_ELEMENT: &str = "Value";
/// Element name of sequence items.
pub const ITEM_ELEMENT: &str = "Item";
/// Element name of person name values.
pub const PERSON_NAME_ELEMENT: &str = "PersonName";

/// The kind of a DICOM attribute value,
/// one for each element name allowed under `DicomAttribute`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    BulkData,
    InlineBinary,
    Value,
    Item,
    PersonName,
}

impl ValueKind {
    /// The name of the XML element holding a value of this kind.
    pub fn element_name(self) -> &'static str {
        match self {
            ValueKind::BulkData => BULK_DATA_ELEMENT,
            ValueKind::InlineBinary => INLINE_BINARY_ELEMENT,
            ValueKind::Value => VALUE_ELEMENT,
            ValueKind::Item => ITEM_ELEMENT,
            ValueKind::PersonName => PERSON_NAME_ELEMENT,
        }
    }

    /// Identify the value kind from the name of an XML element.
    pub fn from_element_name(name: &str) -> Option<Self> {
        match name {
            BULK_DATA_ELEMENT => Some(ValueKind::BulkData),
            INLINE_BINARY_ELEMENT => Some(ValueKind::InlineBinary),
            VALUE_ELEMENT => Some(ValueKind::Value),
            ITEM_ELEMENT => Some(ValueKind::Item),
            PERSON_NAME_ELEMENT => Some(ValueKind::PersonName),
            _ => None,
        }
    }

    /// Whether an attribute may only hold a single value of this kind.
    pub fn is_single(self) -> bool {
        matches!(self, ValueKind::BulkData | ValueKind::InlineBinary)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_name())
    }
}

/// A single value of a DICOM attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum DicomValue {
    /// a reference to bulk data kept elsewhere
    BulkData(BulkData),
    /// binary data encoded in base64
    InlineBinary(InlineBinary),
    /// a textual value
    Value(Value),
    /// a sequence item
    Item(Item),
    /// a person name
    PersonName(PersonName),
}

impl DicomValue {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            DicomValue::BulkData(_) => ValueKind::BulkData,
            DicomValue::InlineBinary(_) => ValueKind::InlineBinary,
            DicomValue::Value(_) => ValueKind::Value,
            DicomValue::Item(_) => ValueKind::Item,
            DicomValue::PersonName(_) => ValueKind::PersonName,
        }
    }

    /// Parse a value of the given kind from its element.
    pub fn parse(kind: ValueKind, element: Element<'_>) -> Result<Self> {
        match kind {
            ValueKind::BulkData => BulkData::parse(element).map(DicomValue::BulkData),
            ValueKind::InlineBinary => InlineBinary::parse(element).map(DicomValue::InlineBinary),
            ValueKind::Value => Value::parse(element).map(DicomValue::Value),
            ValueKind::Item => Item::parse(element).map(DicomValue::Item),
            ValueKind::PersonName => PersonName::parse(element).map(DicomValue::PersonName),
        }
    }

    /// Write this value as a child of the given element.
    pub fn serialize<'d>(&self, doc: Document<'d>, parent: Option<Element<'d>>) {
        match self {
            DicomValue::BulkData(v) => v.serialize(doc, parent),
            DicomValue::InlineBinary(v) => v.serialize(doc, parent),
            DicomValue::Value(v) => v.serialize(doc, parent),
            DicomValue::Item(v) => v.serialize(doc, parent),
            DicomValue::PersonName(v) => v.serialize(doc, parent),
        }
    }
}

impl From<BulkData> for DicomValue {
    fn from(value: BulkData) -> Self {
        DicomValue::BulkData(value)
    }
}

impl From<InlineBinary> for DicomValue {
    fn from(value: InlineBinary) -> Self {
        DicomValue::InlineBinary(value)
    }
}

impl From<Value> for DicomValue {
    fn from(value: Value) -> Self {
        DicomValue::Value(value)
    }
}

impl From<Item> for DicomValue {
    fn from(value: Item) -> Self {
        DicomValue::Item(value)
    }
}

impl From<PersonName> for DicomValue {
    fn from(value: PersonName) -> Self {
        DicomValue::PersonName(value)
    }
}

/// A reference to bulk data,
/// identified either by a UUID or by a URI, never both.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BulkData {
    /// bulk data identified by UUID
    Uuid(String),
    /// bulk data retrievable at the given URI
    Uri(String),
}

impl BulkData {
    /// Create a bulk data reference by UUID.
    pub fn from_uuid(uuid: impl Into<String>) -> Self {
        BulkData::Uuid(uuid.into())
    }

    /// Create a bulk data reference by URI.
    pub fn from_uri(uri: impl Into<String>) -> Self {
        BulkData::Uri(uri.into())
    }

    /// The UUID of the bulk data, if identified by UUID.
    pub fn uuid(&self) -> Option<&str> {
        match self {
            BulkData::Uuid(uuid) => Some(uuid),
            BulkData::Uri(_) => None,
        }
    }

    /// The URI of the bulk data, if identified by URI.
    pub fn uri(&self) -> Option<&str> {
        match self {
            BulkData::Uri(uri) => Some(uri),
            BulkData::Uuid(_) => None,
        }
    }

    /// Parse a `BulkData` element.
    ///
    /// Exactly one of the attributes `uuid` and `uri` must be present.
    pub fn parse(element: Element<'_>) -> Result<Self> {
        expect_element(element, BULK_DATA_ELEMENT)?;
        match (
            element.attribute_value("uuid"),
            element.attribute_value("uri"),
        ) {
            (Some(uuid), None) => Ok(BulkData::Uuid(uuid.to_string())),
            (None, Some(uri)) => Ok(BulkData::Uri(uri.to_string())),
            (uuid, _) => BulkDataExclusivitySnafu {
                both: uuid.is_some(),
            }
            .fail(),
        }
    }

    pub fn serialize<'d>(&self, doc: Document<'d>, parent: Option<Element<'d>>) {
        let node = append_element(doc, parent, BULK_DATA_ELEMENT);
        match self {
            BulkData::Uuid(uuid) => node.set_attribute_value("uuid", uuid),
            BulkData::Uri(uri) => node.set_attribute_value("uri", uri),
        };
    }
}

/// Binary data, encoded in base64.
///
/// The encoded text is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InlineBinary(String);

impl InlineBinary {
    /// Wrap base64 encoded text.
    ///
    /// Fails if the text is empty.
    pub fn new(encoded: impl Into<String>) -> Result<Self> {
        let encoded = encoded.into();
        ensure!(!encoded.is_empty(), EmptyInlineBinarySnafu);
        Ok(InlineBinary(encoded))
    }

    /// Encode the given bytes in base64.
    ///
    /// Fails if there are no bytes to encode.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::new(base64::engine::general_purpose::STANDARD.encode(data))
    }

    /// The base64 encoded text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the binary data.
    ///
    /// Whitespace in the encoded text is ignored.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        let compact: String = self.0.chars().filter(|c| !c.is_whitespace()).collect();
        base64::engine::general_purpose::STANDARD.decode(compact)
    }

    /// Parse an `InlineBinary` element.
    ///
    /// Its text content must not be empty.
    pub fn parse(element: Element<'_>) -> Result<Self> {
        expect_element(element, INLINE_BINARY_ELEMENT)?;
        Self::new(text_content(element))
    }

    pub fn serialize<'d>(&self, doc: Document<'d>, parent: Option<Element<'d>>) {
        let node = append_element(doc, parent, INLINE_BINARY_ELEMENT);
        set_text(doc, node, &self.0);
    }
}

/// A textual value, with its 1-based position in the attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Value {
    /// the ordinal number of the value
    pub number: u32,
    /// the value's text, possibly empty
    pub text: String,
}

impl Value {
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Value {
            number,
            text: text.into(),
        }
    }

    /// Parse a `Value` element.
    ///
    /// The text content may be empty.
    pub fn parse(element: Element<'_>) -> Result<Self> {
        expect_element(element, VALUE_ELEMENT)?;
        let number = parse_number(element, VALUE_ELEMENT)?;
        Ok(Value {
            number,
            text: text_content(element),
        })
    }

    pub fn serialize<'d>(&self, doc: Document<'d>, parent: Option<Element<'d>>) {
        let node = append_element(doc, parent, VALUE_ELEMENT);
        node.set_attribute_value(NUMBER_ATTRIBUTE, &self.number.to_string());
        set_text(doc, node, &self.text);
    }
}

/// A sequence item, holding a nested data set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Item {
    /// the ordinal number of the item
    pub number: u32,
    /// the item's data set
    pub dataset: DicomDataSet,
}

impl Item {
    pub fn new(number: u32, dataset: DicomDataSet) -> Self {
        Item { number, dataset }
    }

    /// Parse an `Item` element,
    /// including the data set nested in it.
    pub fn parse(element: Element<'_>) -> Result<Self> {
        expect_element(element, ITEM_ELEMENT)?;
        let number = parse_number(element, ITEM_ELEMENT)?;
        let dataset = DicomDataSet::parse(element).context(InItemSnafu { number })?;
        Ok(Item { number, dataset })
    }

    pub fn serialize<'d>(&self, doc: Document<'d>, parent: Option<Element<'d>>) {
        let node = append_element(doc, parent, ITEM_ELEMENT);
        node.set_attribute_value(NUMBER_ATTRIBUTE, &self.number.to_string());
        self.dataset.serialize(doc, Some(node));
    }
}
