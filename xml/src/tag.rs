//! Conversion between DICOM tags and their textual forms.
//!
//! In a Native DICOM Model document,
//! the `tag` attribute holds the tag as a string of hexadecimal digits,
//! the group part followed by the element part (`"GGGGEEEE"`).
use dicom_core::dictionary::DataDictionary;
use dicom_core::Tag;
use dicom_dictionary_std::StandardDataDictionary;
use snafu::{ensure, OptionExt};

use crate::error::{InvalidTagSnafu, Result};

/// Obtain the 32-bit integer form of a tag (`0xGGGGEEEE`).
#[inline]
pub fn tag_to_u32(tag: Tag) -> u32 {
    (u32::from(tag.group()) << 16) | u32::from(tag.element())
}

/// Build a tag from its 32-bit integer form (`0xGGGGEEEE`).
#[inline]
pub fn tag_from_u32(value: u32) -> Tag {
    Tag((value >> 16) as u16, value as u16)
}

/// Parse the `tag` attribute of a `DicomAttribute` element.
///
/// Up to 8 hexadecimal digits are accepted, in either case.
/// Leading zeros may be omitted,
/// so both `"00080005"` and `"80005"` resolve to _Specific Character Set_.
pub fn parse_tag_attribute(text: &str) -> Result<Tag> {
    let digits = text.trim();
    ensure!(
        !digits.is_empty() && digits.len() <= 8 && digits.bytes().all(|b| b.is_ascii_hexdigit()),
        InvalidTagSnafu { value: text }
    );
    let value = u32::from_str_radix(digits, 16)
        .ok()
        .context(InvalidTagSnafu { value: text })?;
    Ok(tag_from_u32(value))
}

/// Print a tag in the form of a `tag` attribute:
/// eight uppercase hexadecimal digits.
pub fn format_tag_attribute(tag: Tag) -> String {
    let Tag(g, e) = tag;
    format!("{:04X}{:04X}", g, e)
}

/// A type which can be interpreted as a DICOM attribute tag
/// when looking up attributes in a data set.
///
/// Text is resolved in this order:
/// the `tag` attribute form (`"0020000D"`),
/// a tag expression (`"(0020,000D)"` or `"0020,000D"`),
/// and finally an attribute keyword in the standard data dictionary
/// (`"StudyInstanceUID"`).
pub trait TagValue {
    /// Resolve the tag, or `None` if it cannot be resolved.
    fn to_tag(&self) -> Option<Tag>;
}

impl TagValue for Tag {
    fn to_tag(&self) -> Option<Tag> {
        Some(*self)
    }
}

impl TagValue for u32 {
    fn to_tag(&self) -> Option<Tag> {
        Some(tag_from_u32(*self))
    }
}

impl TagValue for (u16, u16) {
    fn to_tag(&self) -> Option<Tag> {
        Some(Tag(self.0, self.1))
    }
}

impl TagValue for [u16; 2] {
    fn to_tag(&self) -> Option<Tag> {
        Some(Tag(self[0], self[1]))
    }
}

impl TagValue for str {
    fn to_tag(&self) -> Option<Tag> {
        parse_tag_attribute(self)
            .ok()
            .or_else(|| StandardDataDictionary.parse_tag(self.trim()))
    }
}

impl TagValue for String {
    fn to_tag(&self) -> Option<Tag> {
        self.as_str().to_tag()
    }
}

impl<T> TagValue for &T
where
    T: TagValue + ?Sized,
{
    fn to_tag(&self) -> Option<Tag> {
        (**self).to_tag()
    }
}
