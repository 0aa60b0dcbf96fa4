//! DOM helpers used by rules.
//!
//! Rules receive a [`scraper::ElementRef`]. [`ElementExt`] adds the handful of
//! DOM-style lookups (tag name, classes, siblings, outer HTML) that rule
//! filters and replacements need, so rule code reads close to the DOM API.

use ego_tree::NodeRef;
use scraper::{ElementRef, Node};

use crate::utilities::is_block;

/// DOM-style accessors for an element
pub trait ElementExt<'a> {
    /// Get the tag name (lowercase)
    fn tag_name(&self) -> &'a str;

    /// Get an attribute value by name
    fn attribute(&self, name: &str) -> Option<&'a str>;

    /// Check if an attribute exists
    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Check if the class list contains `class`
    fn has_class_name(&self, class: &str) -> bool;

    /// Get the parent element's tag name
    fn parent_tag(&self) -> Option<&'a str>;

    /// Get all text content from this element and descendants
    fn text_content(&self) -> String;

    /// Serialize the element including its own tag
    fn outer_html(&self) -> String;

    /// Whether the element has any child node at all
    fn has_first_child(&self) -> bool;

    /// Whether the element is the last element child of its parent
    fn is_last_element_child(&self) -> bool;

    /// Position among the parent's element children (0-based)
    fn element_index(&self) -> usize;

    /// Whether this is a block-level element
    fn is_block(&self) -> bool {
        is_block(self.tag_name())
    }
}

impl<'a> ElementExt<'a> for ElementRef<'a> {
    fn tag_name(&self) -> &'a str {
        self.value().name()
    }

    fn attribute(&self, name: &str) -> Option<&'a str> {
        self.value().attr(name)
    }

    fn has_class_name(&self, class: &str) -> bool {
        self.value().classes().any(|c| c == class)
    }

    fn parent_tag(&self) -> Option<&'a str> {
        self.parent()
            .and_then(|parent| parent.value().as_element())
            .map(|element| element.name())
    }

    fn text_content(&self) -> String {
        self.text().collect()
    }

    fn outer_html(&self) -> String {
        self.html()
    }

    fn has_first_child(&self) -> bool {
        self.first_child().is_some()
    }

    fn is_last_element_child(&self) -> bool {
        !self.next_siblings().any(|sibling| sibling.value().is_element())
    }

    fn element_index(&self) -> usize {
        self.prev_siblings()
            .filter(|sibling| sibling.value().is_element())
            .count()
    }
}

/// Check if a node is a block-level element
pub fn is_block_node(node: NodeRef<'_, Node>) -> bool {
    node.value()
        .as_element()
        .is_some_and(|element| is_block(element.name()))
}
