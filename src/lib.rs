//! # pixtray
//!
//! A batch image editor engine: load multiple images into an in-memory tray,
//! resize a selected subset to a target shortest-side dimension, crop an
//! individually chosen image from a display-space rectangle, and export all
//! processed results as a single zip archive.
//!
//! # Architecture: Core Engine Behind a Thin CLI
//!
//! The crate is split so every editing rule is testable without a UI, a
//! filesystem, or even a real codec:
//!
//! ```text
//! upload files → Tray (records, selection, active pointer)
//!                  │
//!       Session (busy guard, orchestration)
//!                  │
//!     ImageCodec (identify / resize / crop)  →  processed variants
//!                  │
//!          export (zip bundle of processed variants)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Pure dimension math, the `ImageCodec` seam, and the production codec |
//! | [`source`] | `DataRef` — self-contained base64 data-URL image references |
//! | [`collection`] | `Tray`: ordered records, selection set, active-image pointer |
//! | [`session`] | Busy-guarded façade: upload, batch resize, crop, export, download |
//! | [`export`] | Zip archive over processed variants |
//! | [`upload`] | Filesystem boundary: files/directories → `(name, bytes)` pairs |
//! | [`config`] | `EditorConfig` TOML loading with stock defaults |
//! | [`output`] | CLI display formatting — indexed records with context lines |
//!
//! # Design Decisions
//!
//! ## JPEG-Only Output
//!
//! Every transform serializes to JPEG at quality 90, whatever the input
//! format was. One lossy output format keeps the export uniform
//! (`processed-<name>.jpg` entries) and sidesteps per-format encoder knobs.
//!
//! ## Codec Behind a Trait
//!
//! All pixel work goes through the [`imaging::ImageCodec`] trait. The
//! production implementation sits on the `image` crate; tests drive the
//! orchestration with a recording mock, so batch semantics (all-or-nothing
//! write-back, selection handling) are verified without encoding a single
//! pixel.
//!
//! ## All-or-Nothing Batches
//!
//! Batch operations fan out one rayon task per selected record, join every
//! result, and only then reconcile the tray in a single synchronous pass. A
//! failure anywhere discards the whole batch — no interleaved partial writes,
//! no rollback machinery.
//!
//! ## Self-Contained Records
//!
//! A record carries its pixels as a base64 data reference, not a path. Once
//! uploaded, the tray has no filesystem ties: transforms re-decode from the
//! reference and exports decode it back to bytes. This is what makes the
//! whole engine drivable from memory in tests.

pub mod collection;
pub mod config;
pub mod export;
pub mod imaging;
pub mod output;
pub mod session;
pub mod source;
pub mod upload;

pub use collection::{ImageRecord, Tray};
pub use config::EditorConfig;
pub use export::ExportBundle;
pub use imaging::{CropRect, ImageCodec, Quality, RustCodec};
pub use session::{Session, SessionError};
pub use source::DataRef;
pub use upload::UploadFile;
