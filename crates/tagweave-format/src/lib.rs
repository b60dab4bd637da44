//! # tagweave-format
//!
//! Builds formatting block trees for markup documents. A block tree tells a
//! layout engine where each piece of the document starts and ends, how it
//! may wrap, what it aligns with and how far it is indented. The layout
//! engine itself lives elsewhere.
//!
//! Embedded dialects (`<script>`, `<style>`, scriptlets) are handed to a
//! [`ForeignFormatter`] from the [`FormatterRegistry`] and mounted back as
//! [`BlockKind::Foreign`] blocks. In template files, regions that the
//! template tree only sees as opaque text are built from the Html tree of
//! the same file, and the other way around.
//!
//! ## Module Structure
//!
//! ```text
//! tagweave-format/
//! ├── lib.rs          # This file - public API and format_file()
//! ├── span.rs         # Half-open byte spans and their predicates
//! ├── block.rs        # Block, FormatBlock, Wrap, Alignment, Indent, Spacing
//! ├── error.rs        # FormatError
//! ├── policy.rs       # MarkupPolicy trait and the settings-backed policy
//! ├── context.rs      # BuildContext: file, policy, registry, root binding
//! ├── locator.rs      # Cross-tree lookups by offset
//! ├── builder.rs      # The host block builder
//! ├── foreign.rs      # Foreign formatters, registry and adapter
//! ├── lines.rs        # Line spans over an xi-rope
//! └── snapshot/       # Test rendering and structural checks
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use tagweave_config::FormatterSettings;
//! use tagweave_format::{FormatterRegistry, format_file};
//! use tagweave_syntax::{FileKind, SourceFile};
//!
//! let file = SourceFile::parse("<div><script>var x=1;</script></div>", FileKind::Html);
//! let block = format_file(&file, &FormatterSettings::default(), &FormatterRegistry::default())?;
//!
//! let div = &block.children[0];
//! assert_eq!(div.tag_name(), Some("div"));
//! assert!(div.children.iter().any(|b| b.foreign().is_some()));
//! # Ok::<(), tagweave_format::FormatError>(())
//! ```

pub mod block;
pub mod builder;
pub mod context;
pub mod error;
pub mod foreign;
pub mod lines;
pub mod locator;
pub mod policy;
pub mod snapshot;
pub mod span;

pub use block::{
    Alignment, Block, BlockKind, ForeignBlock, FormatBlock, Indent, LineBreakHint, Spacing, Wrap,
    WrapType,
};
pub use builder::{BuildBlock, Layout, MarkupBuilder, build};
pub use context::{BuildContext, RootBinding};
pub use error::{FormatError, Result};
pub use foreign::{
    ForeignBlockAdapter, ForeignContext, ForeignFormatter, ForeignModel, FormatterRegistry,
    LinesFormatter,
};
pub use policy::{MarkupPolicy, SettingsPolicy, WrapContext};
pub use span::Span;

use tagweave_config::FormatterSettings;
use tagweave_syntax::SourceFile;

/// Builds the block tree for the primary tree of `file`.
pub fn format_file(
    file: &SourceFile,
    settings: &FormatterSettings,
    registry: &FormatterRegistry,
) -> Result<Block> {
    let policy = SettingsPolicy::new(settings.clone());
    let cx = BuildContext::new(file, &policy, registry);
    let root = cx
        .primary()
        .cloned()
        .ok_or_else(|| FormatError::InvariantViolation("file has no syntax tree".into()))?;

    log::info!(
        "Building blocks for a {:?} file ({} bytes)",
        file.kind(),
        file.text().len()
    );
    build(&cx, &root, None, None, Some(Indent::None))
}
