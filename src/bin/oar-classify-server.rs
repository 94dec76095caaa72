//! The `oar-classify-server` command line tool.
//!
//! Loads the inference graph and label table once, then serves
//! classification requests over HTTP. See `oar-classify-server --help`.

use clap::Parser;
use oar_classify::core::config::{AppConfig, ConfigValidator};
use oar_classify::core::{ClassifyError, init_tracing};
use oar_classify::domain::LabelTable;
use oar_classify::models::Classifier;
use oar_classify::server::{self, AppState};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

/// Image classification server
#[derive(Parser, Debug)]
#[command(name = "oar-classify-server", version)]
struct Args {
    /// ONNX inference graph
    #[arg(long, default_value = "/model/tensorflow_inception_graph.onnx")]
    model: PathBuf,

    /// Newline-delimited label file, one label per graph output
    #[arg(long, default_value = "/model/imagenet_comp_graph_label_strings.txt")]
    labels: PathBuf,

    /// JSON configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on [default: 0.0.0.0:8080]
    #[arg(long)]
    bind: Option<String>,

    /// Number of labels returned per image [default: 5]
    #[arg(long)]
    top_n: Option<usize>,

    /// Number of ONNX Runtime sessions serving requests [default: 1]
    #[arg(long)]
    session_pool_size: Option<usize>,
}

impl Args {
    fn app_config(&self) -> Result<AppConfig, ClassifyError> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_json_file(path)?,
            None => AppConfig::default(),
        };
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(top_n) = self.top_n {
            config.classifier.top_n = top_n;
        }
        if let Some(size) = self.session_pool_size {
            config.classifier.session_pool_size = size;
        }
        config.validate()?;
        Ok(config)
    }
}

async fn run(args: Args) -> Result<(), ClassifyError> {
    let config = args.app_config()?;

    info!(path = %args.labels.display(), "loading labels");
    let labels = LabelTable::from_file(&args.labels)?;

    info!(path = %args.model.display(), "loading model");
    let classifier = Classifier::builder()
        .config(config.classifier)
        .labels(labels)
        .build_from_file(&args.model)?;

    let state = AppState::new(Arc::new(classifier), config.server)?;
    server::serve(state).await
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(
                error = %e,
                source = ?std::error::Error::source(&e),
                "oar-classify-server failed"
            );
            ExitCode::FAILURE
        }
    }
}
