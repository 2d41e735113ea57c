//! Editing session: the façade every caller drives.
//!
//! A [`Session`] owns the [`Tray`] and funnels every operation — upload,
//! batch resize, crop apply, export, single download — through one place so
//! the re-entrancy guard and the write-back discipline hold:
//!
//! - The concurrent phase of a batch (decode → compute → encode, one rayon
//!   task per selected record) never touches the tray. Results are joined and
//!   reconciled in a single synchronous pass, so a failure anywhere discards
//!   the whole batch and no partial writes are observable.
//! - A `processing` flag rejects (not queues) a second batch request while
//!   one is in flight. There is no cancellation and no timeout: a started
//!   batch runs to completion or failure.

use crate::collection::Tray;
use crate::config::EditorConfig;
use crate::export::{self, ExportBundle, ExportError};
use crate::imaging::{CodecError, CropRect, ImageCodec, Quality, crop_mapping, resize_dimensions};
use crate::source::{DataRef, SourceError};
use crate::upload::UploadFile;
use rayon::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("a batch operation is already in progress")]
    Busy,
    #[error("no active image")]
    NoActiveImage,
    #[error("crop rectangle has no area")]
    EmptyCrop,
    #[error("could not load {name}: {source}")]
    UndecodableUpload { name: String, source: CodecError },
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// An editing session over one image tray.
pub struct Session {
    tray: Tray,
    quality: Quality,
    pixel_ratio: f64,
    processing: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(&EditorConfig::default())
    }

    pub fn with_config(config: &EditorConfig) -> Self {
        Self {
            tray: Tray::new(),
            quality: Quality::new(config.quality),
            pixel_ratio: config.pixel_ratio,
            processing: false,
        }
    }

    pub fn tray(&self) -> &Tray {
        &self.tray
    }

    pub fn tray_mut(&mut self) -> &mut Tray {
        &mut self.tray
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Default density multiplier for crops, from config.
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn guard(&mut self) -> Result<(), SessionError> {
        if self.processing {
            return Err(SessionError::Busy);
        }
        self.processing = true;
        Ok(())
    }

    /// Upload a batch of files, returning the new record ids.
    ///
    /// All-or-nothing: every file must decode before any record is added, so
    /// one corrupt upload fails the entire call with an untouched tray.
    pub fn upload(
        &mut self,
        codec: &impl ImageCodec,
        files: Vec<UploadFile>,
    ) -> Result<Vec<String>, SessionError> {
        self.guard()?;
        let result = Self::validate_uploads(codec, &files);
        self.processing = false;

        let validated = result?;
        log::info!("uploaded {} images", validated.len());
        Ok(self.tray.insert_batch(validated))
    }

    fn validate_uploads(
        codec: &impl ImageCodec,
        files: &[UploadFile],
    ) -> Result<Vec<(String, DataRef)>, SessionError> {
        files
            .par_iter()
            .map(|file| {
                codec
                    .identify(&file.bytes)
                    .map_err(|source| SessionError::UndecodableUpload {
                        name: file.name.clone(),
                        source,
                    })?;
                Ok((file.name.clone(), DataRef::from_bytes(&file.bytes)))
            })
            .collect()
    }

    /// Resize every selected record so its shortest side equals
    /// `shortest_side`, replacing each record's processed variant.
    ///
    /// No-op returning `Ok(0)` when the selection is empty or the target is
    /// zero. Per-record work runs concurrently with no ordering guarantee;
    /// the tray is updated in one pass only after every record succeeds.
    pub fn resize_selected(
        &mut self,
        codec: &impl ImageCodec,
        shortest_side: u32,
    ) -> Result<usize, SessionError> {
        if shortest_side == 0 || self.tray.selected_ids().is_empty() {
            return Ok(0);
        }
        self.guard()?;
        let result = Self::run_resize_batch(&self.tray, codec, shortest_side, self.quality);
        self.processing = false;

        let updates = result?;
        let count = updates.len();
        self.tray.apply_processed(updates);
        log::info!("resized {count} images to shortest side {shortest_side}");
        Ok(count)
    }

    fn run_resize_batch(
        tray: &Tray,
        codec: &impl ImageCodec,
        shortest_side: u32,
        quality: Quality,
    ) -> Result<Vec<(String, DataRef)>, SessionError> {
        let selected: Vec<_> = tray
            .records()
            .iter()
            .filter(|r| tray.is_selected(&r.id))
            .collect();

        selected
            .par_iter()
            .map(|record| {
                let bytes = record.original.to_bytes()?;
                let dims = codec.identify(&bytes)?;
                let (width, height) = resize_dimensions((dims.width, dims.height), shortest_side);
                let out = codec.resize(&bytes, width, height, quality)?;
                Ok((record.id.clone(), DataRef::jpeg(&out)))
            })
            .collect()
    }

    /// Crop the active record using a display-space rectangle.
    ///
    /// `displayed` is the on-screen size the rectangle was drawn against;
    /// `pixel_ratio` the density multiplier for the output. Single-image and
    /// synchronous — there is no partial-failure case.
    pub fn apply_crop(
        &mut self,
        codec: &impl ImageCodec,
        rect: &CropRect,
        displayed: (f64, f64),
        pixel_ratio: f64,
    ) -> Result<(), SessionError> {
        if !rect.has_area() {
            return Err(SessionError::EmptyCrop);
        }
        self.guard()?;
        let result: Result<(String, DataRef), SessionError> = (|| {
            let record = self.tray.active().ok_or(SessionError::NoActiveImage)?;
            let bytes = record.original.to_bytes()?;
            let dims = codec.identify(&bytes)?;
            let mapping = crop_mapping(rect, (dims.width, dims.height), displayed, pixel_ratio);
            let out = codec.crop(&bytes, &mapping, self.quality)?;
            Ok((record.id.clone(), DataRef::jpeg(&out)))
        })();
        self.processing = false;

        let (id, processed) = result?;
        self.tray.set_processed(&id, processed);
        Ok(())
    }

    /// Bundle every processed variant into a zip archive.
    ///
    /// Returns `Ok(None)` without invoking the exporter when nothing has been
    /// processed yet.
    pub fn export_archive(&mut self) -> Result<Option<ExportBundle>, SessionError> {
        if !self.tray.has_processed() {
            return Ok(None);
        }
        self.guard()?;
        let result = export::build_archive(self.tray.records());
        self.processing = false;
        Ok(Some(result?))
    }

    /// The active record's processed variant as a `(filename, bytes)` download,
    /// or `None` when the active record has no processed variant.
    pub fn download_active(&self) -> Result<Option<(String, Vec<u8>)>, SessionError> {
        let Some(record) = self.tray.active() else {
            return Ok(None);
        };
        let Some(processed) = &record.processed else {
            return Ok(None);
        };
        let bytes = processed.to_bytes()?;
        Ok(Some((format!("processed-{}.jpg", record.name), bytes)))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Dimensions;
    use crate::imaging::codec::tests::{MockCodec, RecordedOp};

    fn file(name: &str, bytes: &[u8]) -> UploadFile {
        UploadFile {
            name: name.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    fn loaded_session(codec: &MockCodec, names: &[&str]) -> (Session, Vec<String>) {
        let mut session = Session::new();
        let files = names.iter().map(|n| file(n, n.as_bytes())).collect();
        let ids = session.upload(codec, files).unwrap();
        (session, ids)
    }

    #[test]
    fn upload_validates_and_inserts() {
        let codec = MockCodec::with_dimensions(dims(100, 100));
        let (session, ids) = loaded_session(&codec, &["a.jpg", "b.jpg"]);

        assert_eq!(session.tray().len(), 2);
        assert_eq!(session.tray().active_id(), Some(ids[0].as_str()));
    }

    #[test]
    fn upload_is_all_or_nothing() {
        let codec = MockCodec {
            dimensions: std::sync::Mutex::new(vec![dims(100, 100)]),
            poison: Some(b"corrupt".to_vec()),
            ..MockCodec::default()
        };

        let mut session = Session::new();
        let err = session
            .upload(&codec, vec![file("ok.jpg", b"fine"), file("bad.jpg", b"corrupt")])
            .unwrap_err();

        assert!(matches!(
            err,
            SessionError::UndecodableUpload { ref name, .. } if name == "bad.jpg"
        ));
        // No partial records, and the guard was released
        assert!(session.tray().is_empty());
        assert!(!session.is_processing());
    }

    #[test]
    fn resize_selected_updates_every_selected_record() {
        let codec = MockCodec::with_dimensions(dims(1600, 900));
        let (mut session, _) = loaded_session(&codec, &["a.jpg", "b.jpg"]);
        session.tray_mut().toggle_select_all();

        let count = session.resize_selected(&codec, 800).unwrap();
        assert_eq!(count, 2);
        assert!(session.tray().records().iter().all(|r| r.processed.is_some()));
        assert_eq!(session.tray().len(), 2);

        // Both resizes asked for the computed shortest-side dimensions
        let resizes: Vec<_> = codec
            .get_operations()
            .into_iter()
            .filter(|op| matches!(op, RecordedOp::Resize { .. }))
            .collect();
        assert_eq!(resizes.len(), 2);
        for op in resizes {
            assert!(matches!(
                op,
                RecordedOp::Resize {
                    width: 1422,
                    height: 800,
                    quality: 90,
                }
            ));
        }
    }

    #[test]
    fn resize_with_empty_selection_is_a_no_op() {
        let codec = MockCodec::with_dimensions(dims(100, 100));
        let (mut session, _) = loaded_session(&codec, &["a.jpg"]);

        let count = session.resize_selected(&codec, 800).unwrap();
        assert_eq!(count, 0);
        assert!(session.tray().records()[0].processed.is_none());
    }

    #[test]
    fn resize_with_zero_target_is_a_no_op() {
        let codec = MockCodec::with_dimensions(dims(100, 100));
        let (mut session, _) = loaded_session(&codec, &["a.jpg"]);
        session.tray_mut().toggle_select_all();

        assert_eq!(session.resize_selected(&codec, 0).unwrap(), 0);
    }

    #[test]
    fn resize_failure_discards_all_sibling_results() {
        let codec = MockCodec {
            dimensions: std::sync::Mutex::new(vec![dims(1600, 900)]),
            poison: None,
            ..MockCodec::default()
        };
        let (mut session, _) = loaded_session(&codec, &["good.jpg", "bad.jpg"]);
        session.tray_mut().toggle_select_all();

        // Poison the second record after upload so only the batch phase fails
        let codec = MockCodec {
            dimensions: std::sync::Mutex::new(vec![dims(1600, 900)]),
            poison: Some(b"bad.jpg".to_vec()),
            ..MockCodec::default()
        };
        let err = session.resize_selected(&codec, 800).unwrap_err();
        assert!(matches!(err, SessionError::Codec(_)));

        // Write-back happens only after the whole batch resolves
        assert!(session.tray().records().iter().all(|r| r.processed.is_none()));
        assert!(!session.is_processing());
    }

    #[test]
    fn reapplying_resize_replaces_processed_variant() {
        let codec = MockCodec::with_dimensions(dims(1000, 500));
        let (mut session, ids) = loaded_session(&codec, &["a.jpg"]);
        session.tray_mut().toggle_selected(&ids[0]);

        session.resize_selected(&codec, 100).unwrap();
        let first = session.tray().records()[0].processed.clone().unwrap();

        session.resize_selected(&codec, 200).unwrap();
        let second = session.tray().records()[0].processed.clone().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn crop_targets_the_active_record() {
        let codec = MockCodec::with_dimensions(dims(800, 600));
        let (mut session, ids) = loaded_session(&codec, &["a.jpg", "b.jpg"]);
        session.tray_mut().activate(&ids[1]);

        let rect = CropRect {
            x: 10.0,
            y: 10.0,
            width: 100.0,
            height: 50.0,
        };
        session
            .apply_crop(&codec, &rect, (400.0, 300.0), 2.0)
            .unwrap();

        assert!(session.tray().records()[0].processed.is_none());
        assert!(session.tray().records()[1].processed.is_some());
        assert!(codec.get_operations().iter().any(|op| matches!(
            op,
            RecordedOp::Crop {
                output_width: 400,
                output_height: 200,
                quality: 90,
            }
        )));
    }

    #[test]
    fn crop_rejects_empty_rectangle() {
        let codec = MockCodec::with_dimensions(dims(800, 600));
        let (mut session, _) = loaded_session(&codec, &["a.jpg"]);

        let rect = CropRect {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 50.0,
        };
        let err = session
            .apply_crop(&codec, &rect, (800.0, 600.0), 1.0)
            .unwrap_err();
        assert!(matches!(err, SessionError::EmptyCrop));
    }

    #[test]
    fn crop_without_active_record_errors() {
        let codec = MockCodec::with_dimensions(dims(800, 600));
        let mut session = Session::new();

        let rect = CropRect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        };
        let err = session
            .apply_crop(&codec, &rect, (800.0, 600.0), 1.0)
            .unwrap_err();
        assert!(matches!(err, SessionError::NoActiveImage));
        assert!(!session.is_processing());
    }

    #[test]
    fn export_skips_when_nothing_processed() {
        let codec = MockCodec::with_dimensions(dims(100, 100));
        let (mut session, _) = loaded_session(&codec, &["a.jpg"]);

        assert!(session.export_archive().unwrap().is_none());
    }

    #[test]
    fn export_bundles_processed_variants() {
        let codec = MockCodec::with_dimensions(dims(1600, 900));
        let (mut session, _) = loaded_session(&codec, &["a.jpg", "b.jpg"]);
        session.tray_mut().toggle_select_all();
        session.resize_selected(&codec, 400).unwrap();

        let bundle = session.export_archive().unwrap().unwrap();
        assert_eq!(bundle.entry_count(), 2);
        assert!(!session.is_processing());
    }

    #[test]
    fn download_active_requires_processed_variant() {
        let codec = MockCodec::with_dimensions(dims(1600, 900));
        let (mut session, ids) = loaded_session(&codec, &["a.jpg"]);

        assert!(session.download_active().unwrap().is_none());

        session.tray_mut().toggle_selected(&ids[0]);
        session.resize_selected(&codec, 400).unwrap();

        let (name, bytes) = session.download_active().unwrap().unwrap();
        assert_eq!(name, "processed-a.jpg.jpg");
        assert!(!bytes.is_empty());
    }

    #[test]
    fn custom_quality_flows_to_codec() {
        let config = EditorConfig {
            quality: 75,
            ..EditorConfig::default()
        };
        let codec = MockCodec::with_dimensions(dims(1000, 1000));
        let mut session = Session::with_config(&config);
        session
            .upload(&codec, vec![file("a.jpg", b"a")])
            .unwrap();
        session.tray_mut().toggle_select_all();
        session.resize_selected(&codec, 100).unwrap();

        assert!(codec
            .get_operations()
            .iter()
            .any(|op| matches!(op, RecordedOp::Resize { quality: 75, .. })));
    }
}
