//! End-to-end image classifier.
//!
//! [`Classifier`] chains the Image Normalizer, an [`InferenceEngine`] and the
//! label ranker. One instance is built at startup and shared by every
//! request; all of its state is read-only after construction.

use super::normalizer::ImageNormalizer;
use crate::core::config::{ClassifierConfig, ConfigValidator};
use crate::core::{ClassifyError, InferenceEngine, OrtInfer};
use crate::domain::{ClassifyResult, LabelTable};
use crate::processors::{ImageFormatHint, rank};
use std::path::Path;
use tracing::{debug, info, warn};

/// Image classifier: normalize -> infer -> rank.
#[derive(Debug)]
pub struct Classifier {
    normalizer: ImageNormalizer,
    engine: Box<dyn InferenceEngine>,
    labels: LabelTable,
    top_n: usize,
}

impl Classifier {
    /// Starts building a classifier.
    pub fn builder() -> ClassifierBuilder {
        ClassifierBuilder::new()
    }

    /// Classifies one compressed image.
    ///
    /// `source` names the image in the result (file name or URL). Errors
    /// from every stage are returned unchanged.
    pub fn classify(
        &self,
        bytes: &[u8],
        format: ImageFormatHint,
        source: &str,
    ) -> Result<ClassifyResult, ClassifyError> {
        let input = self.normalizer.normalize(bytes, format)?;
        let probabilities = self.engine.infer(&input)?;
        let labels = rank(&probabilities, self.labels.as_slice(), self.top_n)?;
        debug!(
            source,
            outputs = probabilities.len(),
            best = labels.first().map(|l| l.label.as_str()).unwrap_or(""),
            "classified image"
        );
        Ok(ClassifyResult::new(source, labels))
    }

    /// Label vocabulary in output order.
    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Number of labels returned per image.
    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Description of the inference engine.
    pub fn engine_info(&self) -> String {
        self.engine.engine_info()
    }
}

/// Builder for [`Classifier`].
///
/// ```rust,no_run
/// use oar_classify::domain::LabelTable;
/// use oar_classify::models::Classifier;
///
/// let classifier = Classifier::builder()
///     .top_n(5)
///     .session_pool_size(2)
///     .labels(LabelTable::from_file("imagenet_comp_graph_label_strings.txt")?)
///     .build_from_file("tensorflow_inception_graph.onnx")?;
/// # Ok::<(), oar_classify::core::ClassifyError>(())
/// ```
#[derive(Debug, Default)]
pub struct ClassifierBuilder {
    config: ClassifierConfig,
    labels: Option<LabelTable>,
    engine: Option<Box<dyn InferenceEngine>>,
}

impl ClassifierBuilder {
    /// Creates a builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClassifierConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the number of labels returned per image.
    pub fn top_n(mut self, top_n: usize) -> Self {
        self.config.top_n = top_n;
        self
    }

    /// Sets the ONNX Runtime session pool size.
    pub fn session_pool_size(mut self, size: usize) -> Self {
        self.config.session_pool_size = size;
        self
    }

    /// Sets the label vocabulary.
    pub fn labels(mut self, labels: LabelTable) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Uses a custom inference engine instead of ONNX Runtime.
    pub fn engine(mut self, engine: Box<dyn InferenceEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Builds with an ONNX Runtime engine over an in-memory graph.
    pub fn build_from_bytes(self, model_bytes: &[u8]) -> Result<Classifier, ClassifyError> {
        self.config.validate()?;
        let engine = OrtInfer::from_bytes(model_bytes, &self.config)?;
        check_input_shape(&engine, &self.config);
        self.engine(Box::new(engine)).build()
    }

    /// Builds with an ONNX Runtime engine over a graph file.
    pub fn build_from_file(
        self,
        model_path: impl AsRef<Path>,
    ) -> Result<Classifier, ClassifyError> {
        self.config.validate()?;
        let engine = OrtInfer::from_file(model_path, &self.config)?;
        check_input_shape(&engine, &self.config);
        self.engine(Box::new(engine)).build()
    }

    /// Builds with the engine set through [`ClassifierBuilder::engine`].
    pub fn build(self) -> Result<Classifier, ClassifyError> {
        self.config.validate()?;
        let engine = self.engine.ok_or_else(|| {
            ClassifyError::config_error("an inference engine must be provided")
        })?;
        let labels = self.labels.ok_or(ClassifyError::InsufficientLabels)?;
        let normalizer = ImageNormalizer::new(&self.config.model)?;

        info!(
            engine = %engine.engine_info(),
            labels = labels.len(),
            top_n = self.config.top_n,
            "classifier ready"
        );

        Ok(Classifier {
            normalizer,
            engine,
            labels,
            top_n: self.config.top_n,
        })
    }
}

/// Warns when the graph declares a fixed input shape other than the
/// configured one. Negative dimensions are dynamic and match anything.
fn check_input_shape(engine: &OrtInfer, config: &ClassifierConfig) {
    let Some(declared) = engine.primary_input_shape() else {
        return;
    };
    let expected = config.model.tensor_shape();
    let matches = declared.len() == expected.len()
        && declared
            .iter()
            .zip(expected)
            .all(|(&d, e)| d < 0 || d as usize == e);
    let input = engine.input_name();
    if matches {
        debug!(input, ?declared, "graph input shape matches configuration");
    } else {
        warn!(
            input,
            ?declared,
            ?expected,
            "graph input shape differs from configured model input"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::OpaqueError;
    use crate::core::{ProbabilityVector, Tensor4D};
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    /// Softmax over fixed logits shifted by the mean of the red channel.
    #[derive(Debug)]
    struct MockEngine {
        outputs: usize,
    }

    impl InferenceEngine for MockEngine {
        fn infer(&self, input: &Tensor4D) -> Result<ProbabilityVector, ClassifyError> {
            if input.shape() != [1, 224, 224, 3] {
                return Err(ClassifyError::inference_failure(
                    "mock",
                    "infer",
                    input.shape(),
                    "unexpected input shape",
                    OpaqueError("shape mismatch".to_string()),
                ));
            }
            let red = input
                .index_axis(ndarray::Axis(3), 0)
                .mean()
                .unwrap_or(0.0);
            let logits: Vec<f32> = (0..self.outputs)
                .map(|i| ((i as f32) - red / 40.0).sin() * 3.0)
                .collect();
            let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            let exp: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
            let sum: f32 = exp.iter().sum();
            Ok(exp.into_iter().map(|e| e / sum).collect())
        }

        fn engine_info(&self) -> String {
            format!("Mock({} outputs)", self.outputs)
        }
    }

    #[derive(Debug)]
    struct FailingEngine;

    impl InferenceEngine for FailingEngine {
        fn infer(&self, input: &Tensor4D) -> Result<ProbabilityVector, ClassifyError> {
            Err(ClassifyError::inference_failure(
                "failing",
                "run",
                input.shape(),
                "session run failed",
                OpaqueError("boom".to_string()),
            ))
        }

        fn engine_info(&self) -> String {
            "Failing".to_string()
        }
    }

    fn labels(n: usize) -> LabelTable {
        LabelTable::new((0..n).map(|i| format!("label{i}")).collect()).unwrap()
    }

    fn classifier(outputs: usize, n_labels: usize) -> Classifier {
        Classifier::builder()
            .labels(labels(n_labels))
            .engine(Box::new(MockEngine { outputs }))
            .build()
            .unwrap()
    }

    fn red_png() -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::from_pixel(224, 224, Rgb([255, 0, 0])))
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_classify_returns_sorted_top_five() {
        let classifier = classifier(1008, 1008);
        let result = classifier
            .classify(&red_png(), ImageFormatHint::Png, "red.png")
            .unwrap();

        assert_eq!(result.filename, "red.png");
        assert_eq!(result.labels.len(), 5);
        for pair in result.labels.windows(2) {
            assert!(pair[0].probability >= pair[1].probability);
        }
        for label in &result.labels {
            assert!((0.0..=1.0).contains(&label.probability));
            assert!(label.label.starts_with("label"));
        }
    }

    #[test]
    fn test_classify_is_idempotent() {
        let classifier = classifier(100, 100);
        let bytes = red_png();
        let first = classifier.classify(&bytes, ImageFormatHint::Png, "a").unwrap();
        let second = classifier.classify(&bytes, ImageFormatHint::Png, "a").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_concurrent_requests_match_sequential() {
        let classifier = classifier(100, 100);
        let bytes = red_png();
        let expected = classifier.classify(&bytes, ImageFormatHint::Png, "x").unwrap();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| classifier.classify(&bytes, ImageFormatHint::Png, "x")))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap().unwrap(), expected);
            }
        });
    }

    #[test]
    fn test_result_length_bounded_by_labels_and_outputs() {
        let few_labels = classifier(100, 3);
        let result = few_labels
            .classify(&red_png(), ImageFormatHint::Png, "r")
            .unwrap();
        assert_eq!(result.labels.len(), 3);

        let few_outputs = classifier(2, 100);
        let result = few_outputs
            .classify(&red_png(), ImageFormatHint::Png, "r")
            .unwrap();
        assert_eq!(result.labels.len(), 2);
    }

    #[test]
    fn test_errors_pass_through() {
        let classifier = classifier(10, 10);
        assert!(matches!(
            classifier.classify(b"garbage", ImageFormatHint::Jpeg, "g"),
            Err(ClassifyError::InvalidImage { .. })
        ));

        let failing = Classifier::builder()
            .labels(labels(10))
            .engine(Box::new(FailingEngine))
            .build()
            .unwrap();
        let err = failing
            .classify(&red_png(), ImageFormatHint::Png, "r")
            .unwrap_err();
        assert!(matches!(err, ClassifyError::InferenceFailure { .. }));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_builder_requirements() {
        assert!(matches!(
            Classifier::builder()
                .engine(Box::new(MockEngine { outputs: 1 }))
                .build(),
            Err(ClassifyError::InsufficientLabels)
        ));
        assert!(Classifier::builder().labels(labels(1)).build().is_err());
        assert!(
            Classifier::builder()
                .top_n(0)
                .labels(labels(1))
                .engine(Box::new(MockEngine { outputs: 1 }))
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_build_from_invalid_model_bytes() {
        let err = Classifier::builder()
            .labels(labels(3))
            .build_from_bytes(b"definitely not onnx")
            .unwrap_err();
        assert!(matches!(err, ClassifyError::ModelLoad { .. }));
    }
}
