//! Source-text parsing primitives shared by the markdown dialects.

pub mod frontmatter;
