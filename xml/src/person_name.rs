//! Person name values and their name components.
use std::fmt;

use sxd_document::dom::{Document, Element};
use tracing::warn;

use crate::dom::{
    append_element, append_text_element, child_elements, expect_element, local_name,
    parse_number, text_content, unique_child, NUMBER_ATTRIBUTE,
};
use crate::error::Result;
use crate::value::PERSON_NAME_ELEMENT;

const ALPHABETIC: &str = "Alphabetic";
const IDEOGRAPHIC: &str = "Ideographic";
const PHONETIC: &str = "Phonetic";

const FAMILY_NAME: &str = "FamilyName";
const GIVEN_NAME: &str = "GivenName";
const MIDDLE_NAME: &str = "MiddleName";
const NAME_PREFIX: &str = "NamePrefix";
const NAME_SUFFIX: &str = "NameSuffix";

/// A person name value,
/// with up to three component groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PersonName {
    /// the ordinal number of the value
    pub number: u32,
    /// the name in alphabetic characters
    pub alphabetic: Option<NameComponents>,
    /// the name in ideographic characters
    pub ideographic: Option<NameComponents>,
    /// the name in phonetic characters
    pub phonetic: Option<NameComponents>,
}

impl PersonName {
    /// Create a person name with no component groups.
    pub fn new(number: u32) -> Self {
        PersonName {
            number,
            ..Default::default()
        }
    }

    /// Set the alphabetic component group.
    pub fn with_alphabetic(mut self, components: NameComponents) -> Self {
        self.alphabetic = Some(components);
        self
    }

    /// Set the ideographic component group.
    pub fn with_ideographic(mut self, components: NameComponents) -> Self {
        self.ideographic = Some(components);
        self
    }

    /// Set the phonetic component group.
    pub fn with_phonetic(mut self, components: NameComponents) -> Self {
        self.phonetic = Some(components);
        self
    }

    /// Parse a `PersonName` element.
    ///
    /// Each of the component groups may appear at most once.
    pub fn parse(element: Element<'_>) -> Result<Self> {
        expect_element(element, PERSON_NAME_ELEMENT)?;
        let number = parse_number(element, PERSON_NAME_ELEMENT)?;

        let children = child_elements(element);
        for child in &children {
            let name = local_name(*child);
            if ![ALPHABETIC, IDEOGRAPHIC, PHONETIC].contains(&name) {
                warn!("Ignoring unexpected element <{}> in <PersonName>", name);
            }
        }

        let group = |name: &'static str| -> Result<_> {
            unique_child(&children, PERSON_NAME_ELEMENT, name)?
                .map(NameComponents::parse)
                .transpose()
        };

        Ok(PersonName {
            number,
            alphabetic: group(ALPHABETIC)?,
            ideographic: group(IDEOGRAPHIC)?,
            phonetic: group(PHONETIC)?,
        })
    }

    pub fn serialize<'d>(&self, doc: Document<'d>, parent: Option<Element<'d>>) {
        let node = append_element(doc, parent, PERSON_NAME_ELEMENT);
        node.set_attribute_value(NUMBER_ATTRIBUTE, &self.number.to_string());
        if let Some(alphabetic) = &self.alphabetic {
            alphabetic.serialize(doc, append_element(doc, Some(node), ALPHABETIC));
        }
        if let Some(ideographic) = &self.ideographic {
            ideographic.serialize(doc, append_element(doc, Some(node), IDEOGRAPHIC));
        }
        if let Some(phonetic) = &self.phonetic {
            phonetic.serialize(doc, append_element(doc, Some(node), PHONETIC));
        }
    }
}

/// Prints the person name in its DICOM PN form,
/// such as `Doe^John` or `Yamada^Tarou=山田^太郎=やまだ^たろう`.
impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups = [&self.alphabetic, &self.ideographic, &self.phonetic]
            .map(|group| group.as_ref().map(|c| c.to_string()).unwrap_or_default());
        let len = groups
            .iter()
            .rposition(|g| !g.is_empty())
            .map(|i| i + 1)
            .unwrap_or(0);
        f.write_str(&groups[..len].join("="))
    }
}

/// The components of one group of a person name.
///
/// Each component is optional;
/// absent components are not written out at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NameComponents {
    pub family_name: Option<String>,
    pub given_name: Option<String>,
    pub middle_name: Option<String>,
    pub name_prefix: Option<String>,
    pub name_suffix: Option<String>,
}

impl NameComponents {
    /// Create name components from a family name and a given name.
    pub fn new(family_name: impl Into<String>, given_name: impl Into<String>) -> Self {
        NameComponents {
            family_name: Some(family_name.into()),
            given_name: Some(given_name.into()),
            ..Default::default()
        }
    }

    /// Parse a component group element
    /// (`Alphabetic`, `Ideographic` or `Phonetic`).
    /// Errors name the group by the element's own name.
    ///
    /// Each of the components may appear at most once.
    pub fn parse(element: Element<'_>) -> Result<Self> {
        let parent = local_name(element);
        let children = child_elements(element);
        for child in &children {
            let name = local_name(*child);
            if ![FAMILY_NAME, GIVEN_NAME, MIDDLE_NAME, NAME_PREFIX, NAME_SUFFIX].contains(&name) {
                warn!("Ignoring unexpected element <{}> in <{}>", name, parent);
            }
        }

        let component = |name: &'static str| -> Result<_> {
            Ok(unique_child(&children, parent, name)?.map(text_content))
        };

        Ok(NameComponents {
            family_name: component(FAMILY_NAME)?,
            given_name: component(GIVEN_NAME)?,
            middle_name: component(MIDDLE_NAME)?,
            name_prefix: component(NAME_PREFIX)?,
            name_suffix: component(NAME_SUFFIX)?,
        })
    }

    /// Write the present components into the given group element,
    /// always in the same order.
    pub fn serialize<'d>(&self, doc: Document<'d>, parent: Element<'d>) {
        let components = [
            (FAMILY_NAME, &self.family_name),
            (GIVEN_NAME, &self.given_name),
            (MIDDLE_NAME, &self.middle_name),
            (NAME_PREFIX, &self.name_prefix),
            (NAME_SUFFIX, &self.name_suffix),
        ];
        for (name, value) in components {
            if let Some(value) = value {
                append_text_element(doc, parent, name, value);
            }
        }
    }
}

impl fmt::Display for NameComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let components = [
            &self.family_name,
            &self.given_name,
            &self.middle_name,
            &self.name_prefix,
            &self.name_suffix,
        ]
        .map(|c| c.as_deref().unwrap_or_default());
        let len = components
            .iter()
            .rposition(|c| !c.is_empty())
            .map(|i| i + 1)
            .unwrap_or(0);
        f.write_str(&components[..len].join("^"))
    }
}
