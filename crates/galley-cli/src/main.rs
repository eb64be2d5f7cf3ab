use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use galley_compile::{CompileMode, EngineConfig, PdfService, TexEngine};
use galley_core::validator;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "galley")]
#[command(about = "galley compilation pipeline tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a LaTeX file to PDF
    Build {
        /// Path to the .tex file
        #[arg(value_name = "FILE")]
        path: PathBuf,
        /// Where to write the PDF (defaults to the input with a .pdf extension)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
        /// Force one compilation variant instead of the debug-then-standard policy
        #[arg(long, value_enum, conflicts_with = "remote")]
        mode: Option<ModeArg>,
        /// Compiler executable to invoke
        #[arg(long, value_name = "PROG", conflicts_with = "remote")]
        engine: Option<PathBuf>,
        /// Compile via a remote endpoint instead of a local engine
        #[arg(long, value_name = "URL")]
        remote: Option<String>,
    },
    /// Validate environment balance without compiling
    Check {
        /// Path to the .tex file
        #[arg(value_name = "FILE")]
        path: PathBuf,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Scan a compiler log and emit JSON events
    Diagnose {
        /// Path to the .log file
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Standard,
    Debug,
}

impl From<ModeArg> for CompileMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Standard => CompileMode::Standard,
            ModeArg::Debug => CompileMode::Debug,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            path,
            output,
            mode,
            engine,
            remote,
        } => {
            let markup = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let out = output.unwrap_or_else(|| path.with_extension("pdf"));

            let bytes = match (remote, mode) {
                (Some(endpoint), _) => {
                    PdfService::remote(endpoint).compile_markup(&markup).await?
                }
                (None, Some(mode)) => {
                    let engine = TexEngine::new(engine_config(engine));
                    let result = engine.compile(&markup, mode.into()).await?;
                    let bytes = result.workspace.read_artifact()?;
                    result.workspace.close();
                    bytes
                }
                (None, None) => {
                    PdfService::local(engine_config(engine))
                        .compile_markup(&markup)
                        .await?
                }
            };

            fs::write(&out, &bytes)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("wrote {} ({} bytes)", out.display(), bytes.len());
        }
        Commands::Check { path, json } => {
            let markup = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let report = validator::validate(&markup);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.is_valid() {
                println!("{}: OK", path.display());
            } else {
                for message in report.messages() {
                    eprintln!("{}: {message}", path.display());
                }
            }
            if !report.is_valid() {
                std::process::exit(1);
            }
        }
        Commands::Diagnose { path } => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let events = galley_log::scan(&content);
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
    }
    Ok(())
}

fn engine_config(program: Option<PathBuf>) -> EngineConfig {
    match program {
        Some(program) => EngineConfig { program },
        None => EngineConfig::discover(),
    }
}
