use clap::{Parser, Subcommand, ValueEnum};
use devnotes::clipboard::{Clipboard, ClipboardProvider};
use devnotes::code::CodeBlockProps;
use devnotes::components::{Components, extract_code_blocks};
use devnotes::copy::{CopyButton, CopyOptions, CopyState};
use devnotes::generate::{self, Document, DocumentKind};
use devnotes::highlight::LineHighlighter;
use devnotes::{check, config, output};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "devnotes")]
#[command(about = "Render developer notes with annotated code blocks")]
#[command(long_about = "\
Render developer notes with annotated code blocks

Posts and pages are markdown files. Fenced code blocks take a language,
optional parameters and optional line emphasis on the opening fence:

  ```js:title=copy.js {2,4-6}
  ```noLineNumbers
  ```rust:title=main.rs&noLineNumbers {1}

Site structure:

  ./
  ├── config.toml                       # Site config (optional)
  └── content/
      ├── posts/
      │   └── 2021-03-04-copy-to-clipboard.md   # Dated post → /copy-to-clipboard/
      └── pages/
          └── about.md                  # Page → /about/

Run 'devnotes gen-config' to generate a documented config.toml.
Set RUST_LOG=debug for diagnostic logging.")]
#[command(version)]
struct Cli {
    /// Site root containing config.toml and content
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Post,
    Page,
}

impl From<KindArg> for DocumentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Post => DocumentKind::Post,
            KindArg::Page => DocumentKind::Page,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Render markdown files to <output>/<slug>/index.html
    Render {
        /// Markdown files to render
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Document kind: posts show their date, pages do not
        #[arg(long, value_enum, default_value = "post")]
        kind: KindArg,
    },
    /// Validate posts and pages without writing anything
    Check,
    /// Copy a code block to the clipboard
    Copy {
        /// Markdown file containing the block
        file: PathBuf,
        /// 1-based index of the code block in the file
        #[arg(long, default_value_t = 1)]
        block: usize,
    },
    /// Print parsed code block annotations as JSON
    Inspect {
        /// Class attribute, e.g. language-js:title=app.js
        #[arg(long)]
        class: Option<String>,
        /// Meta string, e.g. {1,3-5}
        #[arg(long, default_value = "")]
        meta: String,
        /// Number of lines to evaluate the emphasis against
        #[arg(long, default_value_t = 20)]
        lines: usize,
    },
    /// Print the web app manifest as JSON
    Manifest,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Render { files, kind } => {
            let site_config = config::load_config(&cli.root)?;
            let components = Components::new(&site_config)?;
            let mut generated = Vec::with_capacity(files.len());
            for file in &files {
                generated.push(generate::generate_with(
                    file,
                    &cli.output,
                    kind.into(),
                    &site_config,
                    &components,
                )?);
            }
            output::print_render_output(&generated);
        }
        Command::Check => {
            let site_config = config::load_config(&cli.root)?;
            let components = Components::new(&site_config)?;
            println!("==> Checking {}", cli.root.display());
            let report = check::check_site(&cli.root, &site_config, &components)?;
            output::print_check_output(&report);
            report.ensure_clean()?;
        }
        Command::Copy { file, block } => {
            let site_config = config::load_config(&cli.root)?;
            let doc = Document::load(&file, DocumentKind::Post)?;
            let blocks = extract_code_blocks(&doc.body);
            let Some(props) = block.checked_sub(1).and_then(|i| blocks.get(i)) else {
                return Err(format!(
                    "{} has {} code block(s), no block {}",
                    file.display(),
                    blocks.len(),
                    block
                )
                .into());
            };
            copy_block(props, &site_config.code).await?;
        }
        Command::Inspect { class, meta, lines } => {
            let props = CodeBlockProps {
                code: String::new(),
                class_name: class,
                metastring: meta,
                no_line_numbers: false,
            };
            let params = props.block_params();
            let highlighter = LineHighlighter::compile(&props.metastring);
            let report = serde_json::json!({
                "language": params.language,
                "title": params.title(),
                "params": params.params,
                "highlighted_lines": highlighter.highlighted_lines(lines),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Manifest => {
            let site_config = config::load_config(&cli.root)?;
            println!("{}", config::manifest_json(&site_config.manifest)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Copy one block and hold the clipboard until the button resets.
///
/// The native clipboard on X11 and Wayland is served by this process, so
/// exiting right after the write would lose the copied text.
async fn copy_block(
    props: &CodeBlockProps,
    code: &config::CodeConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let provider = Arc::new(Clipboard::detect()?);
    let options = CopyOptions {
        reset_delay: code.copy_duration(),
        file_name: props.block_params().title().to_string(),
        trim: code.trim_copied_text,
    };
    let line_count = props.lines().len();
    let button = CopyButton::new(props.code.clone(), options, Arc::clone(&provider));
    let mut states = button.subscribe();

    button.activate().await?;
    output::print_copy_output(provider.name(), line_count, &button.label());

    states.wait_for(|state| *state == CopyState::Idle).await?;
    println!("{}", output::format_copy_reset(code.copy_duration()));
    Ok(())
}
