//! snippet — locate, parse, cross-reference and list annotated code snippets.
//!
//! A snippet is a plain-text fragment of code. Lines of the form
//! `// snippet: <directive>: <value>` carry metadata rather than code:
//!
//! | Directive (synonyms) | Meaning |
//! |----------------------|---------|
//! | `note` (`notes`, `doc`, `docs`) | how the snippet should be used |
//! | `imports` (`import`) | packages the snippet needs |
//! | `expects` (`expect`, `comesbefore`) | snippets used with this one |
//! | `follows` (`follow`, `comesafter`) | snippets that must come first (also expected) |
//! | `tag` (`tags`) | free-form `name: value` pairs |
//!
//! [`Cache`] loads snippets by name from an ordered list of snippet
//! directories; [`ListConfig`] walks those directories, rendering every
//! snippet it finds and recording problems in a [`Diagnostics`] sink.

mod cache;
mod compare;
mod error;
mod list;
mod model;
mod parser;
mod render;

pub use cache::{read_snippet_file, Cache};
pub use compare::{cmp_slice, cmp_tags, Mismatch};
pub use error::{Category, Diagnostics, Result, SnippetError};
pub use list::{list, ListConfig};
pub use model::{valid_parts, Part, Snippet};
pub use parser::{parse, tidy_slice, COMMENT_STR};
pub use render::FormatConfig;
