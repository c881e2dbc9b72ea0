// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::private_intra_doc_links)]
#![warn(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![warn(unused_results)]
#![warn(unused_qualifications)]
// Cast hygiene
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
// Test modules use unwrap freely
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

//! Zoomable, animated track renderer for annotated biological sequences.
//!
//! Seqview draws a residue axis, a stack of independently toggled
//! annotation tracks and a navigation panel for reordering them. Every
//! geometry change can be animated through one shared, self-tuning
//! scheduler.
//!
//! # Key entry points
//!
//! - [`engine::SequenceRenderer`] - the renderer facade readers and
//!   widgets talk to
//! - [`scene::Surface`] / [`scene::PrimitiveSet`] - the retained scene
//!   graph and batched attribute writes
//! - [`animation::AnimationScheduler`] - adaptive-rate transition driver
//! - [`options::Options`] - runtime configuration (layout, zoom, animation,
//!   drag)
//!
//! # Architecture
//!
//! Everything runs on the host's thread. The host calls
//! [`engine::SequenceRenderer::tick`] with the current time; the zoom
//! settle debounce, the drag preview timers and the scheduler all advance
//! from there, and notifications queue up as
//! [`engine::RendererEvent`]s. Track metadata comes from the host through
//! the [`registry::TrackRegistry`] trait.

pub mod animation;
pub mod drag;
pub mod engine;
pub mod error;
pub mod input;
pub mod layout;
pub mod options;
pub mod registry;
pub mod scene;
pub mod util;
pub mod viewport;

pub use engine::{RendererCommand, RendererEvent, SequenceRenderer};
pub use error::SeqViewError;
pub use options::Options;
