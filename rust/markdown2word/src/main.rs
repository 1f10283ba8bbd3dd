use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use log::warn;
use markdown2word::{ConvertOptions, Converter, PageSize};

#[derive(Parser, Debug)]
#[command(author, about = "Convert Markdown documents to Word (.docx)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a Markdown file to .docx.
    Convert(ConvertArgs),
    /// Print the version number.
    Version,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input Markdown file.
    input: PathBuf,

    /// Output .docx path (defaults to the input path with a .docx extension).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Body font family.
    #[arg(long, default_value = "Calibri")]
    font_family: String,

    /// Body font size in points.
    #[arg(long, default_value_t = 11.0)]
    font_size: f64,

    /// Font family for inline code and code blocks.
    #[arg(long, default_value = "Consolas")]
    code_font_family: String,

    /// Code font size in points.
    #[arg(long, default_value_t = 10.0)]
    code_font_size: f64,

    /// Page size: letter, a4 or legal. Unknown names fall back to letter.
    #[arg(long, default_value = "letter")]
    page_size: String,

    /// Top margin in inches.
    #[arg(long, default_value_t = 1.0)]
    margin_top: f64,

    /// Bottom margin in inches.
    #[arg(long, default_value_t = 1.0)]
    margin_bottom: f64,

    /// Left margin in inches.
    #[arg(long, default_value_t = 1.0)]
    margin_left: f64,

    /// Right margin in inches.
    #[arg(long, default_value_t = 1.0)]
    margin_right: f64,
}

impl ConvertArgs {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            code_font_family: self.code_font_family.clone(),
            code_font_size: self.code_font_size,
            margin_top: self.margin_top,
            margin_bottom: self.margin_bottom,
            margin_left: self.margin_left,
            margin_right: self.margin_right,
            page_size: PageSize::from_name(&self.page_size),
        }
    }

    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("docx"))
    }
}

fn has_markdown_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "md" | "markdown"))
        .unwrap_or(false)
}

fn run_convert(args: &ConvertArgs) -> Result<()> {
    if !args.input.exists() {
        bail!("input file does not exist: {}", args.input.display());
    }
    if !has_markdown_extension(&args.input) {
        warn!(
            "input file {} does not have a .md or .markdown extension",
            args.input.display()
        );
    }

    let output = args.output_path();
    let page_size = args.page_size.trim().to_ascii_lowercase();
    if !matches!(page_size.as_str(), "letter" | "a4" | "legal") {
        warn!("unknown page size {:?}, using letter", args.page_size);
    }

    println!(
        "Converting {} to {}...",
        args.input.display(),
        output.display()
    );
    Converter::new(args.options())
        .convert_file(&args.input, &output)
        .with_context(|| format!("failed to convert {}", args.input.display()))?;
    println!("Successfully converted to {}", output.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Convert(args)) => run_convert(&args),
        Some(Command::Version) => {
            println!("markdown2word version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}
