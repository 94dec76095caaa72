use super::*;
use crate::core::config::{
    ClassifierConfig, OrtExecutionProvider, OrtGraphOptimizationLevel, OrtSessionConfig,
};
use ort::execution_providers::ExecutionProviderDispatch;
use ort::logging::LogLevel;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use std::path::Path;
use tracing::{debug, info, warn};

impl OrtInfer {
    /// Imports a serialized graph and creates `session_pool_size` sessions bound to it.
    ///
    /// Node names come from `config.model`. When the configured output node is
    /// not declared by the graph, the first declared output is used instead;
    /// the same fallback applies to the input node.
    pub fn from_bytes(
        model_bytes: &[u8],
        config: &ClassifierConfig,
    ) -> Result<Self, ClassifyError> {
        let model_name = config.model_name.as_str();
        require_sessions(model_name, config.session_pool_size)?;
        if model_bytes.is_empty() {
            return Err(ClassifyError::model_load_error(
                model_name,
                "model definition is empty",
                Some("verify the model file is a serialized ONNX graph"),
                "zero-length model payload",
            ));
        }

        let mut sessions = Vec::with_capacity(config.session_pool_size);
        for _ in 0..config.session_pool_size {
            let session =
                Self::build_session(model_bytes, config.ort_session.as_ref(), model_name)?;
            sessions.push(Mutex::new(session));
        }

        let (input_name, output_name) = {
            let first = sessions[0].lock().map_err(|_| {
                ClassifyError::model_load_error(
                    model_name,
                    "session lock poisoned during construction",
                    None,
                    "poisoned lock",
                )
            })?;
            let inputs: Vec<String> = first.inputs.iter().map(|i| i.name.clone()).collect();
            let outputs: Vec<String> = first.outputs.iter().map(|o| o.name.clone()).collect();
            (
                Self::resolve_node(model_name, "input", &config.model.input_name, &inputs)?,
                Self::resolve_node(model_name, "output", &config.model.output_name, &outputs)?,
            )
        };

        info!(
            "Loaded model '{}' with {} session(s), input '{}', output '{}'",
            model_name, config.session_pool_size, input_name, output_name
        );

        Ok(OrtInfer {
            sessions,
            next_idx: AtomicUsize::new(0),
            input_name,
            output_name,
            model_path: None,
            model_name: model_name.to_string(),
        })
    }

    /// Reads a serialized graph from disk and delegates to [`OrtInfer::from_bytes`].
    pub fn from_file(
        model_path: impl AsRef<Path>,
        config: &ClassifierConfig,
    ) -> Result<Self, ClassifyError> {
        let path = model_path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            ClassifyError::model_load_error(
                &config.model_name,
                &format!("failed to read model file '{}'", path.display()),
                Some("verify model file exists and is readable"),
                e,
            )
        })?;
        let mut infer = Self::from_bytes(&bytes, config)?;
        infer.model_path = Some(path.to_path_buf());
        debug!(path = ?infer.model_path(), "model graph read from disk");
        Ok(infer)
    }

    fn resolve_node(
        model_name: &str,
        kind: &str,
        wanted: &str,
        declared: &[String],
    ) -> Result<String, ClassifyError> {
        if declared.iter().any(|name| name == wanted) {
            return Ok(wanted.to_string());
        }
        match declared.first() {
            Some(first) => {
                warn!(
                    "Model '{}' declares no {} node '{}', using '{}' (declared: {:?})",
                    model_name, kind, wanted, first, declared
                );
                Ok(first.clone())
            }
            None => Err(ClassifyError::model_load_error(
                model_name,
                &format!("model declares no {kind} nodes"),
                Some("model may be invalid or corrupted"),
                format!("no {kind} named '{wanted}'"),
            )),
        }
    }

    fn build_session(
        model_bytes: &[u8],
        ort_config: Option<&OrtSessionConfig>,
        model_name: &str,
    ) -> Result<Session, ClassifyError> {
        let load_err = |context: &str, e: &dyn std::fmt::Display| {
            ClassifyError::model_load_error(
                model_name,
                context,
                Some("check execution provider configuration and model file"),
                e.to_string(),
            )
        };

        let builder = Session::builder()
            .map_err(|e| load_err("failed to create ONNX session builder", &e))?;
        let builder = match ort_config {
            Some(cfg) => Self::apply_ort_config(builder, cfg, model_name)?,
            // Set default log level to Error to suppress ORT logs
            None => builder
                .with_log_level(LogLevel::Error)
                .map_err(|e| load_err("failed to set ONNX Runtime log level", &e))?,
        };
        builder
            .commit_from_memory(model_bytes)
            .map_err(|e| load_err("failed to create ONNX session", &e))
    }

    fn apply_ort_config(
        mut builder: SessionBuilder,
        cfg: &OrtSessionConfig,
        model_name: &str,
    ) -> Result<SessionBuilder, ClassifyError> {
        let cfg_err = |setting: &str, e: &dyn std::fmt::Display| {
            ClassifyError::model_load_error(
                model_name,
                &format!("failed to apply ONNX Runtime setting '{setting}'"),
                Some("check the ort_session configuration"),
                e.to_string(),
            )
        };

        builder = builder
            .with_log_level(LogLevel::Error)
            .map_err(|e| cfg_err("log_level", &e))?;
        if let Some(intra) = cfg.intra_threads {
            builder = builder
                .with_intra_threads(intra)
                .map_err(|e| cfg_err("intra_threads", &e))?;
        }
        if let Some(inter) = cfg.inter_threads {
            builder = builder
                .with_inter_threads(inter)
                .map_err(|e| cfg_err("inter_threads", &e))?;
        }
        if let Some(par) = cfg.parallel_execution {
            builder = builder
                .with_parallel_execution(par)
                .map_err(|e| cfg_err("parallel_execution", &e))?;
        }
        if let Some(level) = cfg.optimization_level {
            use OrtGraphOptimizationLevel as OG;
            let mapped = match level {
                OG::DisableAll => GraphOptimizationLevel::Disable,
                OG::Level1 => GraphOptimizationLevel::Level1,
                OG::Level2 => GraphOptimizationLevel::Level2,
                OG::Level3 | OG::All => GraphOptimizationLevel::Level3,
            };
            builder = builder
                .with_optimization_level(mapped)
                .map_err(|e| cfg_err("optimization_level", &e))?;
        }
        if let Some(enable) = cfg.enable_mem_pattern {
            builder = builder
                .with_memory_pattern(enable)
                .map_err(|e| cfg_err("enable_mem_pattern", &e))?;
        }
        if let Some(eps) = &cfg.execution_providers {
            let providers = Self::build_execution_providers(eps, cfg.enable_cpu_mem_arena);
            if !providers.is_empty() {
                builder = builder
                    .with_execution_providers(providers)
                    .map_err(|e| cfg_err("execution_providers", &e))?;
            }
        }
        Ok(builder)
    }

    fn build_execution_providers(
        eps: &[OrtExecutionProvider],
        cpu_arena: Option<bool>,
    ) -> Vec<ExecutionProviderDispatch> {
        let mut providers = Vec::new();
        for ep in eps {
            match ep {
                OrtExecutionProvider::CPU => {
                    let mut cpu = ort::execution_providers::CPUExecutionProvider::default();
                    if let Some(arena) = cpu_arena {
                        cpu = cpu.with_arena_allocator(arena);
                    }
                    providers.push(cpu.build());
                }
                #[cfg(feature = "cuda")]
                OrtExecutionProvider::CUDA { device_id } => {
                    let mut cuda = ort::execution_providers::CUDAExecutionProvider::default();
                    if let Some(id) = device_id {
                        cuda = cuda.with_device_id(*id);
                    }
                    providers.push(cuda.build());
                }
                #[cfg(not(feature = "cuda"))]
                OrtExecutionProvider::CUDA { .. } => {
                    debug!("CUDA execution provider requested but the `cuda` feature is disabled");
                }
            }
        }
        providers
    }
}
