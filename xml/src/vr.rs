//! The value representation vocabulary.
//!
//! Only the value representations known to the DICOM standard
//! are accepted in the `vr` attribute of a `DicomAttribute` element.
//! The vocabulary is the closed [`VR`] enumeration.
use dicom_core::VR;
use snafu::OptionExt;

use crate::error::{InvalidVrSnafu, Result};

/// Parse the `vr` attribute of a `DicomAttribute` element.
///
/// The code must match one of the known value representations exactly
/// (two uppercase letters, no padding).
pub fn parse_vr(text: &str) -> Result<VR> {
    text.parse::<VR>().ok().context(InvalidVrSnafu { vr: text })
}

/// How the text of a value is interpreted
/// when extracted according to its value representation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ValueClass {
    /// floating point numbers (OF, OD, FL, FD, DS)
    Float,
    /// integers (OL, OV, SL, SS, SV, UL, US, UV)
    Integer,
    /// everything else, taken as is
    Text,
}

/// Determine the value class of a value representation.
pub fn value_class(vr: VR) -> ValueClass {
    match vr {
        VR::OF | VR::OD | VR::FL | VR::FD | VR::DS => ValueClass::Float,
        VR::OL | VR::OV | VR::SL | VR::SS | VR::SV | VR::UL | VR::US | VR::UV => {
            ValueClass::Integer
        }
        _ => ValueClass::Text,
    }
}
