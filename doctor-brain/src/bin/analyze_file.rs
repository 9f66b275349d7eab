use anyhow::Result;
use clap::Parser;
use doctor_brain::{AnalysisRequest, Settings, TriageService};
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Run one triage analysis from the command line and print the JSON result.
#[derive(Parser, Debug)]
#[command(name = "analyze_file")]
struct Args {
    /// Patient question
    query: String,

    /// Optional image, PDF, Word or text file to attach
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Override the content type guessed from the file extension
    #[arg(long)]
    content_type: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Example: export OPENROUTER_API_KEY='your_key_here'");
            std::process::exit(1);
        }
    };

    let service = TriageService::from_settings(&settings)?;
    info!("Using model {} ({:?} retrieval)", settings.model, settings.retrieval);

    let mut request = AnalysisRequest::new(args.query);
    if let Some(path) = &args.file {
        let bytes = tokio::fs::read(path).await?;
        let content_type = args.content_type.clone().or_else(|| {
            mime_guess::from_path(path)
                .first()
                .map(|mime| mime.essence_str().to_string())
        });
        info!("Attaching {} ({:?})", path.display(), content_type);
        request = request.with_file(bytes, content_type);
    }

    let result = service.analyze(request).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
