//! DICOM attributes, as `DicomAttribute` elements,
//! and typed access to their values.
use dicom_core::{Tag, VR};
use snafu::{ensure, OptionExt, ResultExt};
use sxd_document::dom::{Document, Element};

use crate::dom::{append_element, child_elements, expect_element, local_name, required_attribute};
use crate::error::{
    AccessError, HeterogeneousValueSnafu, InAttributeSnafu, MultipleBinaryValuesSnafu,
    NoValueSnafu, NotSingleSnafu, Result, UnknownValueKindSnafu, WrongKindSnafu,
};
use crate::person_name::PersonName;
use crate::tag::{format_tag_attribute, parse_tag_attribute};
use crate::value::{BulkData, DicomValue, InlineBinary, Item, Value, ValueKind};
use crate::vr::{parse_vr, value_class, ValueClass};

/// Element name of DICOM attributes.
pub const ATTRIBUTE_ELEMENT: &str = "DicomAttribute";

/// A DICOM attribute:
/// a tag, a value representation,
/// and an optional sequence of values of a single kind.
#[derive(Debug, Clone, PartialEq)]
pub struct DicomAttribute {
    tag: Tag,
    vr: VR,
    keyword: Option<String>,
    private_creator: Option<String>,
    value: Option<Vec<DicomValue>>,
}

/// The value of an attribute,
/// converted according to its value representation.
///
/// See [`DicomAttribute::extract_value`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ExtractedValue<'a> {
    /// a floating point number,
    /// or NaN if the text was not a number
    Float(f64),
    /// an integer
    Integer(i64),
    /// an unsigned integer too large for `Integer`
    Unsigned(u64),
    /// the text of the value as is
    Text(&'a str),
}

impl ExtractedValue<'_> {
    /// Whether this is the result of extracting a malformed number.
    pub fn is_nan(&self) -> bool {
        matches!(self, ExtractedValue::Float(v) if v.is_nan())
    }
}

impl DicomAttribute {
    /// Create a new attribute.
    ///
    /// A value of `None` means that the attribute has no value,
    /// which is not the same as having an empty list of values.
    pub fn new(tag: Tag, vr: VR, value: Option<Vec<DicomValue>>) -> Self {
        DicomAttribute {
            tag,
            vr,
            keyword: None,
            private_creator: None,
            value,
        }
    }

    /// Set the attribute keyword.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Set the private creator of this attribute.
    pub fn with_private_creator(mut self, private_creator: impl Into<String>) -> Self {
        self.private_creator = Some(private_creator.into());
        self
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn vr(&self) -> VR {
        self.vr
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn private_creator(&self) -> Option<&str> {
        self.private_creator.as_deref()
    }

    /// All values of the attribute, if it has any.
    pub fn value(&self) -> Option<&[DicomValue]> {
        self.value.as_deref()
    }

    /// The kind of the attribute's values, if it has any.
    pub fn value_kind(&self) -> Option<ValueKind> {
        self.value.as_ref()?.first().map(DicomValue::kind)
    }

    /// Parse a `DicomAttribute` element.
    ///
    /// The attributes `tag` and `vr` are required.
    /// All child elements must have the same name,
    /// which determines the kind of the attribute's values.
    /// An element without children yields an attribute without a value.
    pub fn parse(element: Element<'_>) -> Result<Self> {
        expect_element(element, ATTRIBUTE_ELEMENT)?;
        let tag = parse_tag_attribute(required_attribute(element, ATTRIBUTE_ELEMENT, "tag")?)?;
        Self::parse_with_tag(element, tag).context(InAttributeSnafu { tag })
    }

    fn parse_with_tag(element: Element<'_>, tag: Tag) -> Result<Self> {
        let vr = parse_vr(required_attribute(element, ATTRIBUTE_ELEMENT, "vr")?)?;
        let keyword = element.attribute_value("keyword").map(String::from);
        let private_creator = element.attribute_value("privateCreator").map(String::from);

        let children = child_elements(element);
        let value = if children.is_empty() {
            None
        } else {
            let name = local_name(children[0]);
            if let Some(other) = children.iter().map(|e| local_name(*e)).find(|n| *n != name) {
                return HeterogeneousValueSnafu { first: name, other }.fail();
            }
            let kind = ValueKind::from_element_name(name).context(UnknownValueKindSnafu { name })?;
            ensure!(
                !kind.is_single() || children.len() == 1,
                MultipleBinaryValuesSnafu {
                    kind,
                    count: children.len()
                }
            );
            let values = children
                .into_iter()
                .map(|e| DicomValue::parse(kind, e))
                .collect::<Result<Vec<_>>>()?;
            Some(values)
        };

        Ok(DicomAttribute {
            tag,
            vr,
            keyword,
            private_creator,
            value,
        })
    }

    /// Write this attribute as a `DicomAttribute` element.
    ///
    /// The keyword and private creator are only written if present.
    pub fn serialize<'d>(&self, doc: Document<'d>, parent: Option<Element<'d>>) {
        let node = append_element(doc, parent, ATTRIBUTE_ELEMENT);
        node.set_attribute_value("tag", &format_tag_attribute(self.tag));
        node.set_attribute_value("vr", self.vr.to_string());
        if let Some(keyword) = &self.keyword {
            node.set_attribute_value("keyword", keyword);
        }
        if let Some(private_creator) = &self.private_creator {
            node.set_attribute_value("privateCreator", private_creator);
        }
        for value in self.value.iter().flatten() {
            value.serialize(doc, Some(node));
        }
    }

    /// Fetch the single textual value of this attribute.
    pub fn get_value(&self) -> Result<&Value, AccessError> {
        match self.single(ValueKind::Value)? {
            DicomValue::Value(v) => Ok(v),
            other => wrong_kind(ValueKind::Value, other),
        }
    }

    /// Fetch all textual values of this attribute.
    pub fn get_values(&self) -> Result<Vec<&Value>, AccessError> {
        self.all(ValueKind::Value, |v| match v {
            DicomValue::Value(v) => Some(v),
            _ => None,
        })
    }

    /// Fetch the single bulk data reference of this attribute.
    pub fn get_bulk_data(&self) -> Result<&BulkData, AccessError> {
        match self.single(ValueKind::BulkData)? {
            DicomValue::BulkData(v) => Ok(v),
            other => wrong_kind(ValueKind::BulkData, other),
        }
    }

    /// Fetch the single inline binary value of this attribute.
    pub fn get_inline_binary(&self) -> Result<&InlineBinary, AccessError> {
        match self.single(ValueKind::InlineBinary)? {
            DicomValue::InlineBinary(v) => Ok(v),
            other => wrong_kind(ValueKind::InlineBinary, other),
        }
    }

    /// Fetch all sequence items of this attribute.
    pub fn get_items(&self) -> Result<Vec<&Item>, AccessError> {
        self.all(ValueKind::Item, |v| match v {
            DicomValue::Item(v) => Some(v),
            _ => None,
        })
    }

    /// Fetch the single person name of this attribute.
    pub fn get_person_name(&self) -> Result<&PersonName, AccessError> {
        match self.single(ValueKind::PersonName)? {
            DicomValue::PersonName(v) => Ok(v),
            other => wrong_kind(ValueKind::PersonName, other),
        }
    }

    /// Fetch the single textual value of this attribute,
    /// converted according to the value representation:
    ///
    /// - OF, OD, FL, FD and DS are read as floating point numbers;
    /// - OL, OV, SL, SS, SV, UL, US and UV are read as integers;
    /// - all others are returned as text.
    ///
    /// Leading and trailing spaces are ignored when reading numbers.
    /// Integers above `i64::MAX` are returned as [`ExtractedValue::Unsigned`].
    /// Text which is not a number results in
    /// [`ExtractedValue::Float`] with NaN,
    /// for integers and floating point numbers alike.
    pub fn extract_value(&self) -> Result<ExtractedValue<'_>, AccessError> {
        let text = self.get_value()?.text.as_str();
        Ok(match value_class(self.vr) {
            ValueClass::Float => ExtractedValue::Float(text.trim().parse().unwrap_or(f64::NAN)),
            ValueClass::Integer => {
                let text = text.trim();
                match text.parse::<i64>() {
                    Ok(v) => ExtractedValue::Integer(v),
                    Err(_) => text
                        .parse::<u64>()
                        .map(ExtractedValue::Unsigned)
                        .unwrap_or(ExtractedValue::Float(f64::NAN)),
                }
            }
            ValueClass::Text => ExtractedValue::Text(text),
        })
    }

    fn single(&self, requested: ValueKind) -> Result<&DicomValue, AccessError> {
        let values = self.value.as_deref().context(NoValueSnafu { requested })?;
        match values {
            [value] => Ok(value),
            _ => NotSingleSnafu {
                requested,
                len: values.len(),
            }
            .fail(),
        }
    }

    fn all<'a, T: 'a>(
        &'a self,
        requested: ValueKind,
        f: impl Fn(&'a DicomValue) -> Option<&'a T>,
    ) -> Result<Vec<&'a T>, AccessError> {
        let values = self.value.as_deref().context(NoValueSnafu { requested })?;
        values
            .iter()
            .map(|v| {
                f(v).context(WrongKindSnafu {
                    requested,
                    got: v.kind(),
                })
            })
            .collect()
    }
}

fn wrong_kind<T>(requested: ValueKind, got: &DicomValue) -> Result<T, AccessError> {
    WrongKindSnafu {
        requested,
        got: got.kind(),
    }
    .fail()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::document_element;
    use crate::error::{Error, ErrorCategory};
    use crate::person_name::NameComponents;
    use dicom_dictionary_std::tags;
    use pretty_assertions::assert_eq;
    use sxd_document::{parser, Package};

    fn parse_attribute(xml: &str) -> Result<DicomAttribute> {
        let package = parser::parse(xml).unwrap();
        let doc = package.as_document();
        DicomAttribute::parse(document_element(doc).unwrap())
    }

    fn single_value(vr: VR, text: &str) -> DicomAttribute {
        DicomAttribute::new(Tag(0x0028, 0x0010), vr, Some(vec![Value::new(1, text).into()]))
    }

    #[test]
    fn parse_attribute_with_values() {
        let attr = parse_attribute(
            r#"<DicomAttribute tag="00080061" vr="CS" keyword="ModalitiesInStudy">
                <Value number="1">CT</Value>
                <Value number="2">PET</Value>
            </DicomAttribute>"#,
        )
        .unwrap();

        assert_eq!(attr.tag(), tags::MODALITIES_IN_STUDY);
        assert_eq!(attr.vr(), VR::CS);
        assert_eq!(attr.keyword(), Some("ModalitiesInStudy"));
        assert_eq!(attr.private_creator(), None);
        assert_eq!(attr.value_kind(), Some(ValueKind::Value));

        let values: Vec<_> = attr
            .get_values()
            .unwrap()
            .into_iter()
            .map(|v| (v.number, v.text.as_str()))
            .collect();
        assert_eq!(values, vec![(1, "CT"), (2, "PET")]);
    }

    #[test]
    fn parse_attribute_without_value() {
        let attr = parse_attribute(
            r#"<DicomAttribute tag="00091002" vr="UN" privateCreator="ACME 1.1"></DicomAttribute>"#,
        )
        .unwrap();
        assert_eq!(attr.tag(), Tag(0x0009, 0x1002));
        assert_eq!(attr.private_creator(), Some("ACME 1.1"));
        assert_eq!(attr.keyword(), None);
        assert!(attr.value().is_none());
        assert!(matches!(
            attr.get_value(),
            Err(AccessError::NoValue {
                requested: ValueKind::Value,
                ..
            })
        ));
    }

    #[test]
    fn required_attributes() {
        let err = parse_attribute(r#"<DicomAttribute vr="CS"/>"#).unwrap_err();
        assert!(matches!(err, Error::MissingAttribute { name: "tag", .. }));

        let err = parse_attribute(r#"<DicomAttribute tag="00080060"/>"#).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ShapeMismatch);
        assert!(matches!(
            err.root_cause(),
            Error::MissingAttribute { name: "vr", .. }
        ));

        let err = parse_attribute(r#"<DicomAttribute tag="Modality" vr="CS"/>"#).unwrap_err();
        assert!(matches!(err, Error::InvalidTag { .. }));

        let err = parse_attribute(r#"<Attribute tag="00080060" vr="CS"/>"#).unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedElement {
                expected: "DicomAttribute",
                ..
            }
        ));
    }

    #[test]
    fn vr_must_be_known() {
        let err = parse_attribute(r#"<DicomAttribute tag="00180050" vr="XX"/>"#).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::InvalidVr);
        assert!(matches!(
            &err,
            Error::InAttribute { tag, .. } if *tag == Tag(0x0018, 0x0050)
        ));

        let attr = parse_attribute(
            r#"<DicomAttribute tag="00180050" vr="DS"><Value number="1">0.5</Value></DicomAttribute>"#,
        )
        .unwrap();
        assert_eq!(attr.vr(), VR::DS);
    }

    #[test]
    fn values_must_be_homogeneous() {
        let err = parse_attribute(
            r#"<DicomAttribute tag="00081115" vr="SQ">
                <Value number="1">x</Value>
                <Item number="1"/>
            </DicomAttribute>"#,
        )
        .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::HeterogeneousValue);
        assert!(matches!(
            err.root_cause(),
            Error::HeterogeneousValue { first, other, .. } if first == "Value" && other == "Item"
        ));
    }

    #[test]
    fn unknown_value_element() {
        let err = parse_attribute(
            r#"<DicomAttribute tag="00100010" vr="PN"><Alphabetic/></DicomAttribute>"#,
        )
        .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ShapeMismatch);
        assert!(matches!(
            err.root_cause(),
            Error::UnknownValueKind { name, .. } if name == "Alphabetic"
        ));
    }

    #[test]
    fn binary_values_are_single() {
        let err = parse_attribute(
            r#"<DicomAttribute tag="7FE00010" vr="OW">
                <BulkData uri="http://localhost/a"/>
                <BulkData uri="http://localhost/b"/>
            </DicomAttribute>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err.root_cause(),
            Error::MultipleBinaryValues {
                kind: ValueKind::BulkData,
                count: 2,
                ..
            }
        ));
    }

    #[test]
    fn typed_accessors() {
        let bulk = DicomAttribute::new(
            tags::PIXEL_DATA,
            VR::OW,
            Some(vec![BulkData::from_uri("http://localhost/bulk").into()]),
        );
        assert_eq!(bulk.get_bulk_data().unwrap().uri(), Some("http://localhost/bulk"));
        assert!(matches!(
            bulk.get_value(),
            Err(AccessError::WrongKind {
                requested: ValueKind::Value,
                got: ValueKind::BulkData,
                ..
            })
        ));
        assert!(matches!(
            bulk.get_items(),
            Err(AccessError::WrongKind { .. })
        ));

        let binary = DicomAttribute::new(
            Tag(0x0009, 0x1002),
            VR::UN,
            Some(vec![InlineBinary::new("z0x9c8v7").unwrap().into()]),
        );
        assert_eq!(binary.get_inline_binary().unwrap().as_str(), "z0x9c8v7");
        assert!(binary.get_person_name().is_err());

        let name = DicomAttribute::new(
            tags::PATIENT_NAME,
            VR::PN,
            Some(vec![PersonName::new(1)
                .with_alphabetic(NameComponents::new("Doe", "John"))
                .into()]),
        );
        assert_eq!(name.get_person_name().unwrap().to_string(), "Doe^John");

        let values = DicomAttribute::new(
            tags::IMAGE_TYPE,
            VR::CS,
            Some(vec![
                Value::new(1, "ORIGINAL").into(),
                Value::new(2, "PRIMARY").into(),
            ]),
        );
        assert_eq!(values.get_values().unwrap().len(), 2);
        assert!(matches!(
            values.get_value(),
            Err(AccessError::NotSingle { len: 2, .. })
        ));

        let items = DicomAttribute::new(
            tags::REFERENCED_SERIES_SEQUENCE,
            VR::SQ,
            Some(vec![Item::default().into(), Item::default().into()]),
        );
        assert_eq!(items.get_items().unwrap().len(), 2);
        assert!(matches!(
            items.get_values(),
            Err(AccessError::WrongKind {
                got: ValueKind::Item,
                ..
            })
        ));
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn extract_values_by_vr() {
        assert_eq!(
            single_value(VR::US, "42").extract_value().unwrap(),
            ExtractedValue::Integer(42)
        );
        assert_eq!(
            single_value(VR::SL, " -7 ").extract_value().unwrap(),
            ExtractedValue::Integer(-7)
        );
        assert_eq!(
            single_value(VR::DS, "3.14").extract_value().unwrap(),
            ExtractedValue::Float(3.14)
        );
        assert_eq!(
            single_value(VR::FD, "1e3").extract_value().unwrap(),
            ExtractedValue::Float(1000.)
        );
        assert_eq!(
            single_value(VR::LO, "hello").extract_value().unwrap(),
            ExtractedValue::Text("hello")
        );
        assert_eq!(
            single_value(VR::IS, " 12").extract_value().unwrap(),
            ExtractedValue::Text(" 12")
        );

        assert!(single_value(VR::DS, "abc").extract_value().unwrap().is_nan());
        assert!(single_value(VR::UL, "4.5").extract_value().unwrap().is_nan());
        assert!(!single_value(VR::UL, "4").extract_value().unwrap().is_nan());

        let empty = DicomAttribute::new(Tag(0x0028, 0x0010), VR::US, None);
        assert!(empty.extract_value().is_err());
    }

    #[test]
    fn extract_large_unsigned_integers() {
        assert_eq!(
            single_value(VR::UV, "18446744073709551615").extract_value().unwrap(),
            ExtractedValue::Unsigned(u64::MAX)
        );
        assert_eq!(
            single_value(VR::UV, " 9223372036854775808 ").extract_value().unwrap(),
            ExtractedValue::Unsigned(9_223_372_036_854_775_808)
        );
        assert_eq!(
            single_value(VR::UV, "9223372036854775807").extract_value().unwrap(),
            ExtractedValue::Integer(i64::MAX)
        );
        assert!(!single_value(VR::UV, "18446744073709551615")
            .extract_value()
            .unwrap()
            .is_nan());
        // beyond u64 and below i64 are still malformed
        assert!(single_value(VR::UV, "18446744073709551616")
            .extract_value()
            .unwrap()
            .is_nan());
        assert!(single_value(VR::SV, "-9223372036854775809")
            .extract_value()
            .unwrap()
            .is_nan());
    }

    #[test]
    fn serialize_attribute() {
        let package = Package::new();
        let doc = package.as_document();

        let attr = DicomAttribute::new(
            Tag(0x0009, 0x1010),
            VR::LO,
            Some(vec![Value::new(1, "x").into()]),
        )
        .with_private_creator("ACME 1.1");
        attr.serialize(doc, None);

        let node = document_element(doc).unwrap();
        assert_eq!(node.attribute_value("tag"), Some("00091010"));
        assert_eq!(node.attribute_value("vr"), Some("LO"));
        assert_eq!(node.attribute_value("keyword"), None);
        assert_eq!(node.attribute_value("privateCreator"), Some("ACME 1.1"));
        assert_eq!(child_elements(node).len(), 1);

        assert_eq!(DicomAttribute::parse(node).unwrap(), attr);
    }
}
