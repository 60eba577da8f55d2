//! Typed message content elements.
//!
//! A message's content is an ordered sequence of [`Element`]s. The closed set
//! below covers every shape an adapter may emit; there is no open escape
//! hatch, so consumers can match exhaustively.
//!
//! # Wire format
//!
//! Elements serialize adjacently tagged, kebab-cased:
//!
//! ```json
//! { "type": "mention", "data": { "userId": "u1", "name": "alice" } }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use braze_core::Element;
//!
//! let elements = vec![
//!     Element::mention_named("u1", "alice"),
//!     Element::text("hello"),
//! ];
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single unit of message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum Element {
    /// Plain text.
    Text { content: String },
    /// An @-mention of a user.
    #[serde(rename_all = "camelCase")]
    Mention {
        user_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// An image attachment, resolved to a URL.
    Image {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// An audio attachment, resolved to a URL.
    Audio {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// A video attachment, resolved to a URL.
    Video {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// A generic file attachment, resolved to a URL.
    File {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// A hyperlink card.
    Link {
        href: String,
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        thumbnail: Option<String>,
    },
    /// A shared contact card.
    ContactCard { id: String, name: String },
}

impl Element {
    /// Creates a plain text element.
    pub fn text(content: impl Into<String>) -> Self {
        Element::Text {
            content: content.into(),
        }
    }

    /// Creates a mention element without a display name.
    pub fn mention(user_id: impl Into<String>) -> Self {
        Element::Mention {
            user_id: user_id.into(),
            name: None,
        }
    }

    /// Creates a mention element with a display name.
    pub fn mention_named(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Element::Mention {
            user_id: user_id.into(),
            name: Some(name.into()),
        }
    }

    /// Creates an image element.
    pub fn image(url: impl Into<String>, name: Option<String>) -> Self {
        Element::Image {
            url: url.into(),
            name,
        }
    }

    /// Creates an audio element.
    pub fn audio(url: impl Into<String>, name: Option<String>) -> Self {
        Element::Audio {
            url: url.into(),
            name,
        }
    }

    /// Creates a video element.
    pub fn video(url: impl Into<String>, name: Option<String>) -> Self {
        Element::Video {
            url: url.into(),
            name,
        }
    }

    /// Creates a file element.
    pub fn file(url: impl Into<String>, name: Option<String>) -> Self {
        Element::File {
            url: url.into(),
            name,
        }
    }

    /// Creates a link element with only href and title set.
    pub fn link(href: impl Into<String>, title: impl Into<String>) -> Self {
        Element::Link {
            href: href.into(),
            title: title.into(),
            description: None,
            thumbnail: None,
        }
    }

    /// Creates a contact card element.
    pub fn contact_card(id: impl Into<String>, name: impl Into<String>) -> Self {
        Element::ContactCard {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Returns the kebab-case tag of this element.
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Text { .. } => "text",
            Element::Mention { .. } => "mention",
            Element::Image { .. } => "image",
            Element::Audio { .. } => "audio",
            Element::Video { .. } => "video",
            Element::File { .. } => "file",
            Element::Link { .. } => "link",
            Element::ContactCard { .. } => "contact-card",
        }
    }

    /// Returns the inner text for text elements.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Element::Text { content } => Some(content),
            _ => None,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Text { content } => write!(f, "{content}"),
            Element::Mention { user_id, name } => {
                write!(f, "@{}", name.as_deref().unwrap_or(user_id))
            }
            Element::Image { url, name } => {
                write!(f, "[image:{}]", name.as_deref().unwrap_or(url))
            }
            Element::Audio { url, name } => {
                write!(f, "[audio:{}]", name.as_deref().unwrap_or(url))
            }
            Element::Video { url, name } => {
                write!(f, "[video:{}]", name.as_deref().unwrap_or(url))
            }
            Element::File { url, name } => {
                write!(f, "[file:{}]", name.as_deref().unwrap_or(url))
            }
            Element::Link {
                title, description, ..
            } => match description {
                Some(description) => write!(f, "{title}\n{description}"),
                None => write!(f, "{title}"),
            },
            Element::ContactCard { name, .. } => write!(f, "[contact:{name}]"),
        }
    }
}

/// Flattens an element sequence into its string rendering.
pub fn render(elements: &[Element]) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    for element in elements {
        // Display on String never fails.
        let _ = write!(out, "{element}");
    }
    out
}
