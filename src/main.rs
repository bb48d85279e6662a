use clap::Parser;
use std::path::{Path, PathBuf};

use docx_compose::Document;

#[derive(Parser)]
#[command(name = "docx-compose", about = "Compose a DOCX file from a JSON document description")]
struct Args {
    /// Input JSON document description
    input: PathBuf,
    /// Output DOCX file (defaults to input with .docx extension)
    output: Option<PathBuf>,
    /// Print a plain-text preview instead of writing a file
    #[arg(long)]
    text: bool,
}

fn load(path: &Path) -> Result<Document, String> {
    let data = std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&data).map_err(|e| format!("invalid document {}: {e}", path.display()))
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if !args.input.exists() {
        eprintln!("Error: file not found: {}", args.input.display());
        std::process::exit(1);
    }
    if !args.input.is_file() {
        eprintln!("Error: not a file: {}", args.input.display());
        std::process::exit(1);
    }

    let doc = match load(&args.input) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if args.text {
        match docx_compose::render_text(&doc) {
            Ok(text) => print!("{text}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("docx"));

    if let Err(e) = docx_compose::write_docx(&doc, &output) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    log::info!("wrote {}", output.display());
}
