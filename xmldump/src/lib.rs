//! DICOM Native Model XML dump library
//!
//! This is a helper library
//! for dumping the contents of Native DICOM Model XML documents
//! in a human readable way,
//! one line per attribute,
//! with sequence items nested by indentation.
//!
//! # Example
//!
//! ```no_run
//! # let xml = "";
//! let model = dicom_xml::from_str(xml)?;
//! dicom_xmldump::dump_model(&model)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
use dicom_core::dictionary::{DataDictionary, DataDictionaryEntry};
use dicom_dictionary_std::StandardDataDictionary;
use dicom_xml::{BulkData, DicomAttribute, DicomDataSet, DicomValue, NativeDicomModel};
use std::io::{stdout, Result as IoResult, Write};

/// Dump the whole model to standard output.
pub fn dump_model(model: &NativeDicomModel) -> IoResult<()> {
    let stdout = stdout();
    let mut to = stdout.lock();
    dump_model_to(&mut to, model)
}

/// Dump the whole model to the given writer.
pub fn dump_model_to(mut to: impl Write, model: &NativeDicomModel) -> IoResult<()> {
    dump(&mut to, model.dataset(), 0)
}

fn dump<W>(to: &mut W, dataset: &DicomDataSet, depth: u32) -> IoResult<()>
where
    W: ?Sized + Write,
{
    for attribute in dataset {
        dump_attribute(&mut *to, attribute, depth)?;
    }
    Ok(())
}

/// Dump a single attribute at the given nesting depth,
/// followed by the contents of its sequence items, if any.
pub fn dump_attribute<W>(to: &mut W, attribute: &DicomAttribute, depth: u32) -> IoResult<()>
where
    W: ?Sized + Write,
{
    let indent = "  ".repeat(depth as usize);
    let dict = StandardDataDictionary;
    let keyword = attribute
        .keyword()
        .filter(|k| !k.is_empty())
        .or_else(|| dict.by_tag(attribute.tag()).map(DataDictionaryEntry::alias))
        .unwrap_or("«Unknown Attribute»");

    writeln!(
        to,
        "{}{} {} {} {}",
        indent,
        attribute.tag(),
        keyword,
        attribute.vr(),
        value_summary(attribute.value()),
    )?;

    for value in attribute.value().into_iter().flatten() {
        if let DicomValue::Item(item) = value {
            writeln!(to, "{}  Item #{}", indent, item.number)?;
            dump(&mut *to, &item.dataset, depth + 2)?;
        }
    }
    Ok(())
}

fn value_summary(values: Option<&[DicomValue]>) -> String {
    let values = match values {
        None | Some([]) => return "(no value)".to_string(),
        Some(values) => values,
    };

    match &values[0] {
        DicomValue::Item(_) => {
            let n = values.len();
            format!("({} Item{})", n, if n == 1 { "" } else { "s" })
        }
        DicomValue::BulkData(BulkData::Uri(uri)) => format!("BulkData uri={}", uri),
        DicomValue::BulkData(BulkData::Uuid(uuid)) => format!("BulkData uuid={}", uuid),
        DicomValue::InlineBinary(binary) => match binary.decode() {
            Ok(data) => format!("InlineBinary ({} bytes)", data.len()),
            Err(_) => format!("InlineBinary ({} characters, not base64)", binary.as_str().len()),
        },
        DicomValue::Value(_) | DicomValue::PersonName(_) => {
            let parts: Vec<String> = values
                .iter()
                .filter_map(|v| match v {
                    DicomValue::Value(v) => Some(format!("{:?}", v.text)),
                    DicomValue::PersonName(pn) => Some(pn.to_string()),
                    _ => None,
                })
                .collect();
            format!("[{}]", parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOCUMENT: &str = r#"<NativeDicomModel>
        <DicomAttribute tag="00080060" vr="CS"><Value number="1">SR</Value></DicomAttribute>
        <DicomAttribute tag="00100010" vr="PN">
            <PersonName number="1">
                <Alphabetic><FamilyName>Doe</FamilyName><GivenName>Jane</GivenName></Alphabetic>
            </PersonName>
        </DicomAttribute>
        <DicomAttribute tag="0040A730" vr="SQ" keyword="ContentSequence">
            <Item number="1">
                <DicomAttribute tag="0040A040" vr="CS"><Value number="1">TEXT</Value></DicomAttribute>
            </Item>
        </DicomAttribute>
        <DicomAttribute tag="00091010" vr="LO" privateCreator="ACME"/>
        <DicomAttribute tag="7FE00010" vr="OW"><BulkData uri="http://localhost/1"/></DicomAttribute>
        <DicomAttribute tag="00282000" vr="OB"><InlineBinary>AAECAw==</InlineBinary></DicomAttribute>
    </NativeDicomModel>"#;

    #[test]
    fn dump_model_to_covers_all_kinds() {
        let model = dicom_xml::from_str(DOCUMENT).unwrap();

        let mut out = Vec::new();
        dump_model_to(&mut out, &model).unwrap();

        let text = std::str::from_utf8(&out).expect("output is not valid UTF-8");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"(0008,0060) Modality CS ["SR"]"#,
                "(0010,0010) PatientName PN [Doe^Jane]",
                "(0040,A730) ContentSequence SQ (1 Item)",
                "  Item #1",
                r#"    (0040,A040) ValueType CS ["TEXT"]"#,
                "(0009,1010) «Unknown Attribute» LO (no value)",
                "(7FE0,0010) PixelData OW BulkData uri=http://localhost/1",
                "(0028,2000) ICCProfile OB InlineBinary (4 bytes)",
            ]
        );
    }
}
