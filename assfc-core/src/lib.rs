//! assfc-core: font dependency analysis for ASS subtitles
//!
//! Given a batch of Advanced SubStation (`.ass`) subtitle files, this
//! library works out every font family each file references, checks those
//! families against the fonts installed on the host, and answers the three
//! questions a release checker actually asks:
//!
//! - which fonts does this batch need, and are they installed?
//! - which files use a given font?
//! - which fonts does a given file use?
//!
//! ## How it fits together
//!
//! - [`enumerate`]: backends that list installed fonts, either by asking
//!   fontconfig's `fc-list` or by reading name tables straight out of the
//!   font files on disk.
//! - [`index::FontIndex`]: normalized family name → installed file
//!   locations, rebuildable on demand.
//! - [`extract`]: the line scanner that pulls family names out of one ASS
//!   document (style definitions plus inline `\fn` overrides).
//! - [`registry::DependencyRegistry`]: tracks subtitle files, scans them in
//!   parallel, and holds the file→fonts and font→files views.
//! - [`facade::QueryFacade`]: sorted, read-only accessors for presentation
//!   layers.
//!
//! ## A sample session
//!
//! ```rust,no_run
//! use assfc_core::enumerate::FcListEnumeration;
//! use assfc_core::index::FontIndex;
//! use assfc_core::registry::DependencyRegistry;
//!
//! let index = FontIndex::build(&FcListEnumeration);
//! let mut registry = DependencyRegistry::new(index);
//! registry.add_file("episode01.ass");
//! registry.scan();
//!
//! for (family, status) in registry.queries().list_fonts() {
//!     println!("{status:?}: {family}");
//! }
//! ```
//!
//! Every failure at the host boundary degrades instead of erroring: a
//! broken `fc-list` yields an empty index (everything reports missing), an
//! unreadable subtitle file yields an empty font set flagged unreadable,
//! and malformed ASS lines are skipped. `scan()` always completes.

pub mod discovery;
pub mod enumerate;
pub mod extract;
pub mod facade;
pub mod index;
pub mod normalize;
pub mod output;
pub mod registry;
