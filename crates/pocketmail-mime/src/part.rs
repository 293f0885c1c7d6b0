//! The message part tree and its renderer.

/// One node of a message body: leaf text, leaf opaque content, or a
/// composite with ordered children.
///
/// The tree is built once (children are appended at construction and
/// never reparented) and is immutable from the renderer's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePart {
    /// Displayable text content.
    Text {
        /// Content subtype (e.g. `plain`).
        subtype: String,
        /// Decoded text content.
        content: String,
    },
    /// Content the client cannot display.
    Unsupported {
        /// Top-level type (e.g. `image`).
        kind: String,
        /// Subtype (e.g. `png`).
        subtype: String,
    },
    /// Composite holding ordered children. The composite itself emits no
    /// rendered element.
    Multi {
        /// Composite subtype (e.g. `mixed`, `alternative`).
        subtype: String,
        /// Children in display order.
        children: Vec<MessagePart>,
    },
}

impl MessagePart {
    /// Leaf text part.
    #[must_use]
    pub fn text(subtype: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Text {
            subtype: subtype.into(),
            content: content.into(),
        }
    }

    /// Leaf part for content the client cannot display.
    #[must_use]
    pub fn unsupported(kind: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self::Unsupported {
            kind: kind.into(),
            subtype: subtype.into(),
        }
    }

    /// Composite part with its children fixed up front.
    #[must_use]
    pub fn multi(subtype: impl Into<String>, children: Vec<Self>) -> Self {
        Self::Multi {
            subtype: subtype.into(),
            children,
        }
    }

    /// Number of leaf parts under this node (the composite itself does
    /// not count).
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Text { .. } | Self::Unsupported { .. } => 1,
            Self::Multi { children, .. } => children.iter().map(Self::leaf_count).sum(),
        }
    }
}

/// One displayable element produced by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedElement {
    /// A run of text to display.
    Text(String),
}

/// Flattens a part tree into its ordered display elements.
///
/// The walk is pre-order, left-to-right: a text leaf yields its content
/// verbatim, an unsupported leaf yields a placeholder naming the
/// type/subtype, and a composite yields nothing of its own. Output order
/// is fully determined by the tree shape; isomorphic trees render
/// identically.
#[must_use]
pub fn render(part: &MessagePart) -> Vec<RenderedElement> {
    let mut elements = Vec::with_capacity(part.leaf_count());
    visit(part, &mut elements);
    elements
}

fn visit(part: &MessagePart, out: &mut Vec<RenderedElement>) {
    match part {
        MessagePart::Text { content, .. } => {
            out.push(RenderedElement::Text(content.clone()));
        }
        MessagePart::Unsupported { kind, subtype } => {
            out.push(RenderedElement::Text(format!(
                "Unsupported type: {kind}/{subtype}"
            )));
        }
        MessagePart::Multi { children, .. } => {
            for child in children {
                visit(child, out);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn text_of(el: &RenderedElement) -> &str {
        let RenderedElement::Text(s) = el;
        s
    }

    #[test]
    fn mixed_parts_render_in_stored_order() {
        let tree = MessagePart::multi(
            "mixed",
            vec![
                MessagePart::text("plain", "some text"),
                MessagePart::unsupported("text", "html"),
            ],
        );
        let elements = render(&tree);
        assert_eq!(elements.len(), 2);
        assert_eq!(text_of(&elements[0]), "some text");
        assert!(text_of(&elements[1]).starts_with("Unsupported"));
        assert_eq!(text_of(&elements[1]), "Unsupported type: text/html");
    }

    #[test]
    fn nested_composites_render_depth_first() {
        // Three levels, four leaves: the traversal order is the document
        // order of the leaves, not grouping by depth.
        let tree = MessagePart::multi(
            "mixed",
            vec![
                MessagePart::text("plain", "1"),
                MessagePart::multi(
                    "alternative",
                    vec![
                        MessagePart::text("plain", "2"),
                        MessagePart::multi(
                            "related",
                            vec![MessagePart::text("plain", "3")],
                        ),
                    ],
                ),
                MessagePart::text("plain", "4"),
            ],
        );
        let contents: Vec<_> = render(&tree).iter().map(|e| text_of(e).to_owned()).collect();
        assert_eq!(contents, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn composite_emits_nothing_for_itself() {
        let tree = MessagePart::multi("mixed", vec![]);
        assert!(render(&tree).is_empty());
    }

    #[test]
    fn isomorphic_trees_render_identically() {
        let build = || {
            MessagePart::multi(
                "mixed",
                vec![
                    MessagePart::unsupported("audio", "amr"),
                    MessagePart::multi("related", vec![MessagePart::text("plain", "x")]),
                ],
            )
        };
        assert_eq!(render(&build()), render(&build()));
    }

    #[test]
    fn leaf_count_matches_rendered_length() {
        let tree = MessagePart::multi(
            "mixed",
            vec![
                MessagePart::text("plain", "a"),
                MessagePart::multi(
                    "mixed",
                    vec![
                        MessagePart::text("plain", "b"),
                        MessagePart::unsupported("video", "3gpp"),
                    ],
                ),
            ],
        );
        assert_eq!(tree.leaf_count(), render(&tree).len());
    }
}
