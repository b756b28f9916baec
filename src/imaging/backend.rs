//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the album build
//! needs from an image library: rasterize a thumbnail and apply a named
//! effect to it in place.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the `MockBackend` defined below.

use super::params::{EffectParams, RasterizeParams};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
    #[error("Unknown effect: {0:?}")]
    UnknownEffect(String),
}

/// Trait for image processing backends.
///
/// Both operations write their result atomically: the output file is either
/// fully written or left untouched.
pub trait ImageBackend: Sync {
    /// Scale `source` to fit the bounding box and write it to `output`.
    fn rasterize(&self, params: &RasterizeParams) -> Result<(), BackendError>;

    /// Replace the image at `params.path` with the effect applied to it.
    fn apply_effect(&self, params: &EffectParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::effects::Effect;
    use std::path::Path;
    use std::sync::Mutex;

    /// Mock backend that records operations and writes placeholder files.
    #[derive(Default)]
    pub struct MockBackend {
        pub operations: Mutex<Vec<RecordedOp>>,
        /// Sources whose rasterization fails.
        pub failing_sources: Mutex<Vec<String>>,
        /// Every known effect fails after rasterization succeeded.
        pub fail_effects: bool,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Rasterize {
            source: String,
            output: String,
            max_width: u32,
            max_height: u32,
        },
        ApplyEffect {
            path: String,
            effect: String,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Backend whose rasterization fails for sources with this file name.
        pub fn failing_on(name: &str) -> Self {
            Self {
                failing_sources: Mutex::new(vec![name.to_string()]),
                ..Self::default()
            }
        }

        /// Backend whose known effects fail.
        pub fn failing_effects() -> Self {
            Self {
                fail_effects: true,
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn rasterize_count(&self) -> usize {
            self.get_operations()
                .iter()
                .filter(|op| matches!(op, RecordedOp::Rasterize { .. }))
                .count()
        }

        pub fn effects(&self) -> Vec<String> {
            self.get_operations()
                .into_iter()
                .filter_map(|op| match op {
                    RecordedOp::ApplyEffect { effect, .. } => Some(effect),
                    _ => None,
                })
                .collect()
        }
    }

    fn file_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    impl ImageBackend for MockBackend {
        fn rasterize(&self, params: &RasterizeParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Rasterize {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                max_width: params.max_width,
                max_height: params.max_height,
            });

            let source_name = file_name(&params.source);
            if self.failing_sources.lock().unwrap().contains(&source_name) {
                return Err(BackendError::ProcessingFailed(format!(
                    "mock failure for {source_name}"
                )));
            }
            if let Some(parent) = params.output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&params.output, format!("thumb of {source_name}"))?;
            Ok(())
        }

        fn apply_effect(&self, params: &EffectParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::ApplyEffect {
                path: params.path.to_string_lossy().to_string(),
                effect: params.effect.clone(),
            });
            if Effect::from_name(&params.effect).is_none() {
                return Err(BackendError::UnknownEffect(params.effect.clone()));
            }
            if self.fail_effects {
                return Err(BackendError::ProcessingFailed(format!(
                    "mock failure for {}",
                    params.effect
                )));
            }
            Ok(())
        }
    }

    #[test]
    fn mock_records_rasterize_and_writes_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("thumbnails/th_a.jpg");
        let backend = MockBackend::new();

        backend
            .rasterize(&RasterizeParams {
                source: "/album/a.jpg".into(),
                output: output.clone(),
                max_width: 256,
                max_height: 200,
                blur: 0.25,
            })
            .unwrap();

        assert!(output.exists());
        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Rasterize {
                max_width: 256,
                max_height: 200,
                ..
            }
        ));
    }

    #[test]
    fn mock_failing_source_errors_without_output() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("th_bad.jpg");
        let backend = MockBackend::failing_on("bad.jpg");

        let result = backend.rasterize(&RasterizeParams {
            source: "/album/bad.jpg".into(),
            output: output.clone(),
            max_width: 10,
            max_height: 10,
            blur: 0.0,
        });

        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[test]
    fn mock_rejects_unknown_effect() {
        let backend = MockBackend::new();
        let result = backend.apply_effect(&EffectParams {
            path: "/x.jpg".into(),
            effect: "sepia".to_string(),
            background: Default::default(),
        });
        assert!(matches!(result, Err(BackendError::UnknownEffect(name)) if name == "sepia"));
        assert_eq!(backend.effects(), vec!["sepia"]);
    }
}
