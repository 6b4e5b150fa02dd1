pub mod document;
pub mod errors;
pub mod value;

pub use document::{Document, Group, MergeDirective, NamedRecord};
pub use errors::{ConflictSection, ExpandError, MergeConflict, ParseError, RenderError, Result};
