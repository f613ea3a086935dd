//! Reading and writing helpers over the XML document tree.
//!
//! The codec only ever looks at element names, attributes,
//! child elements and text content.
//! Namespaces, comments and processing instructions are ignored.
use snafu::{ensure, OptionExt, ResultExt};
use sxd_document::dom::{ChildOfElement, ChildOfRoot, Document, Element};

use crate::error::{
    InvalidNumberSnafu, MissingAttributeSnafu, NotUniqueSnafu, Result, UnexpectedElementSnafu,
};

/// Name of the attribute holding the ordinal of a value, item or person name.
pub(crate) const NUMBER_ATTRIBUTE: &str = "number";

/// The document element, if the document has one.
pub(crate) fn document_element<'d>(doc: Document<'d>) -> Option<Element<'d>> {
    doc.root().children().into_iter().find_map(|child| match child {
        ChildOfRoot::Element(e) => Some(e),
        _ => None,
    })
}

/// The local name of the element.
pub(crate) fn local_name<'d>(element: Element<'d>) -> &'d str {
    element.name().local_part()
}

/// Check that the element has the expected name.
pub(crate) fn expect_element(element: Element<'_>, expected: &'static str) -> Result<()> {
    let found = local_name(element);
    ensure!(found == expected, UnexpectedElementSnafu { expected, found });
    Ok(())
}

/// Fetch an attribute which must be present.
pub(crate) fn required_attribute<'d>(
    element: Element<'d>,
    element_name: &'static str,
    name: &'static str,
) -> Result<&'d str> {
    element.attribute_value(name).context(MissingAttributeSnafu {
        element: element_name,
        name,
    })
}

/// Fetch and parse the `number` attribute.
pub(crate) fn parse_number(element: Element<'_>, element_name: &'static str) -> Result<u32> {
    let value = required_attribute(element, element_name, NUMBER_ATTRIBUTE)?;
    value.trim().parse().context(InvalidNumberSnafu {
        element: element_name,
        value,
    })
}

/// Collect the direct child elements, in document order.
pub(crate) fn child_elements<'d>(element: Element<'d>) -> Vec<Element<'d>> {
    element
        .children()
        .into_iter()
        .filter_map(|child| match child {
            ChildOfElement::Element(e) => Some(e),
            _ => None,
        })
        .collect()
}

/// Find the child element with the given name,
/// failing if there is more than one.
pub(crate) fn unique_child<'d>(
    children: &[Element<'d>],
    parent: &str,
    name: &'static str,
) -> Result<Option<Element<'d>>> {
    let mut found = children.iter().filter(|e| local_name(**e) == name);
    let first = found.next().copied();
    ensure!(found.next().is_none(), NotUniqueSnafu { parent, name });
    Ok(first)
}

/// The concatenation of all text nodes below the element.
pub(crate) fn text_content(element: Element<'_>) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    out
}

fn collect_text(element: Element<'_>, out: &mut String) {
    for child in element.children() {
        match child {
            ChildOfElement::Text(text) => out.push_str(text.text()),
            ChildOfElement::Element(e) => collect_text(e, out),
            _ => {}
        }
    }
}

/// Create a new element and attach it
/// to the given parent, or to the document root if none.
pub(crate) fn append_element<'d>(
    doc: Document<'d>,
    parent: Option<Element<'d>>,
    name: &'static str,
) -> Element<'d> {
    let node = doc.create_element(name);
    match parent {
        Some(parent) => parent.append_child(node),
        None => doc.root().append_child(node),
    }
    node
}

/// Create a new element with the given text content
/// and attach it to the parent.
pub(crate) fn append_text_element<'d>(
    doc: Document<'d>,
    parent: Element<'d>,
    name: &'static str,
    text: &str,
) -> Element<'d> {
    let node = append_element(doc, Some(parent), name);
    set_text(doc, node, text);
    node
}

/// Set the text content of a freshly created element.
pub(crate) fn set_text<'d>(doc: Document<'d>, element: Element<'d>, text: &str) {
    if !text.is_empty() {
        element.append_child(doc.create_text(text));
    }
}
