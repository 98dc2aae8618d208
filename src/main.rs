use clap::{Parser, Subcommand};
use portfolio_builder::artifact::PdfFactory;
use portfolio_builder::document::{self, Document, DocumentData};
use portfolio_builder::export::{self, ExportGuard, ExportRequest};
use portfolio_builder::raster::{self, BlankRasterizer, Rasterizer};
use portfolio_builder::theme::{Palette, Theme};
use portfolio_builder::{config, output, render};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Theme and palette overrides shared by commands that render.
#[derive(clap::Args, Clone)]
struct StyleArgs {
    /// Theme: professional, creative, minimal, modern (default from config)
    #[arg(long)]
    theme: Option<Theme>,

    /// Palette: blue, green, purple, red, orange (default from config)
    #[arg(long)]
    palette: Option<Palette>,
}

impl StyleArgs {
    fn resolve(&self, config: &config::BuilderConfig) -> (Theme, Palette) {
        (
            self.theme.unwrap_or(config.preview.theme),
            self.palette.unwrap_or(config.preview.palette),
        )
    }
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "portfolio-builder")]
#[command(about = "Resume and portfolio preview and PDF export")]
#[command(long_about = "\
Resume and portfolio preview and PDF export

A document is a JSON file with the form's fields. Every key is optional:

  {
    \"fullName\": \"Jane Doe\",
    \"title\": \"Engineer\",
    \"email\": \"jane@example.com\",
    \"phone\": \"\", \"location\": \"\", \"website\": \"https://jane.dev\",
    \"summary\": \"...\",
    \"technicalSkills\": \"Rust, SQL\",
    \"softSkills\": \"Mentoring\",
    \"experience\": [{ \"company\": \"Acme\", \"position\": \"Dev\",
                      \"duration\": \"2020 - Present\", \"location\": \"\",
                      \"description\": \"\" }],
    \"education\":  [{ \"institution\": \"\", \"degree\": \"\", \"year\": \"\", \"gpa\": \"\" }],
    \"projects\":   [{ \"name\": \"\", \"technologies\": \"\", \"description\": \"\" }]
  }

Run 'portfolio-builder demo' for a filled-in sample and
'portfolio-builder gen-config' for a documented builder.toml.

Set RUST_LOG=portfolio_builder=debug to trace the export pipeline.")]
#[command(version = version_string())]
struct Cli {
    /// Builder configuration file (defaults apply when missing)
    #[arg(long, default_value = "builder.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a document to a standalone HTML page
    Render {
        /// Document JSON file
        document: PathBuf,
        /// Output HTML file
        #[arg(short, long, default_value = "resume.html")]
        output: PathBuf,
        #[command(flatten)]
        style: StyleArgs,
    },
    /// Export a document to PDF
    Export {
        /// Document JSON file
        document: PathBuf,
        /// Directory the PDF is written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Use a blank page instead of a browser (pipeline dry run)
        #[arg(long)]
        blank: bool,
        #[command(flatten)]
        style: StyleArgs,
    },
    /// Print the sample document as JSON
    Demo {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show a document's contents and export readiness
    Check {
        /// Document JSON file
        document: PathBuf,
    },
    /// Render the theme comparison page for the sample document
    Compare {
        /// Output HTML file
        #[arg(short, long, default_value = "compare.html")]
        output: PathBuf,
    },
    /// Print a stock builder.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}=warn", env!("CARGO_CRATE_NAME")))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            document,
            output,
            style,
        } => {
            let config = config::load_config(&cli.config)?;
            let doc = document::load_document(&document)?;
            let (theme, palette) = style.resolve(&config);
            let css = render::page_css(&config);
            let page = render::standalone_page(
                &render::page_title(&doc),
                &css,
                render::render(&doc, theme, palette),
            );
            write_output(&output, &page.into_string())?;
            output::print_render_output(&output, theme, palette);
        }
        Command::Export {
            document,
            out_dir,
            blank,
            style,
        } => {
            let config = config::load_config(&cli.config)?;
            let doc = document::load_document(&document)?;
            let (theme, palette) = style.resolve(&config);
            let rasterizer: Box<dyn Rasterizer> = if blank {
                Box::new(BlankRasterizer::default())
            } else {
                raster::default_rasterizer()
            };

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_export_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = export::run_export(
                rasterizer.as_ref(),
                &PdfFactory,
                &ExportGuard::new(),
                &ExportRequest {
                    doc: &doc,
                    theme,
                    palette,
                    output_dir: &out_dir,
                },
                &config,
                Some(&tx),
            );
            drop(tx);
            printer.join().ok();
            if let Err(e) = result {
                eprintln!("{}", e.user_message());
                return Err(e.into());
            }
        }
        Command::Demo { output } => {
            let json = serde_json::to_string_pretty(&DocumentData::demo())?;
            match output {
                Some(path) => write_output(&path, &json)?,
                None => println!("{}", json),
            }
        }
        Command::Check { document } => {
            let config = config::load_config(&cli.config)?;
            let doc: Document = document::load_document(&document)?;
            println!("==> Checking {}", document.display());
            output::print_document(&doc, Some(&document), &config);
            output::print_check(&doc, &config);
        }
        Command::Compare { output } => {
            let config = config::load_config(&cli.config)?;
            let css = render::page_css(&config);
            let page = render::standalone_page(
                "Theme Comparison",
                &css,
                render::render_comparison(&DocumentData::demo()),
            );
            write_output(&output, &page.into_string())?;
            println!("Rendered → {}", output.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Write `content` to `path`, creating parent directories.
fn write_output(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}
