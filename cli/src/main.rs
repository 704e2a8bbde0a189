//! sowdoc CLI - Statement of Work export tool
//!
//! A command-line tool for exporting saved proposal projects to DOCX,
//! Markdown, and JSON.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use sowdoc::defaults::DEFAULT_FALLBACK_PROMPT;
use sowdoc::{
    populate_prompt_template, validate_config, CleanupOptions, ExportFormat, Project,
    RenderOptions, SectionStatus, SowExporter,
};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Statement of Work export to DOCX, Markdown, and JSON
#[derive(Parser)]
#[command(
    name = "sowdoc",
    version,
    about = "Export Statement of Work projects to DOCX and Markdown",
    long_about = "sowdoc - Statement of Work export tool.\n\n\
                  Reads a project file (configuration plus generated sections) and\n\
                  renders the sections marked success or modified.\n\n\
                  Usage:\n  \
                  sowdoc docx <project.json>          Write {client}_{project}_SOW.docx\n  \
                  sowdoc md <project.json> -o out.md  Write Markdown\n  \
                  sowdoc validate <project.json>      Check the configuration"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a project to DOCX
    Docx {
        /// Project file path
        input: PathBuf,

        /// Output directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        export: ExportArgs,

        /// Font family
        #[arg(long, default_value = "Arial")]
        font: String,
    },

    /// Export a project to Markdown
    #[command(visible_alias = "md")]
    Markdown {
        /// Project file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        export: ExportArgs,

        /// Omit {#anchor} ids on section headings
        #[arg(long)]
        no_anchors: bool,

        /// Maximum heading level (1-6)
        #[arg(long, default_value = "6")]
        max_heading: u8,
    },

    /// Dump the assembled document tree as JSON
    Json {
        /// Project file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Check a project's configuration
    Validate {
        /// Project file path
        input: PathBuf,
    },

    /// Print the generation prompt for a section
    Prompt {
        /// Project file path
        input: PathBuf,

        /// Section title
        #[arg(short, long)]
        section: String,

        /// Prompt template file (default: built-in template)
        #[arg(short, long)]
        template: Option<PathBuf>,
    },

    /// Show project information
    Info {
        /// Project file path
        input: PathBuf,
    },
}

/// Options shared by the export commands.
#[derive(clap::Args)]
struct ExportArgs {
    /// Title page date (default: today)
    #[arg(long)]
    date: Option<String>,

    /// Omit the table of contents
    #[arg(long)]
    no_toc: bool,

    /// Content cleanup mode
    #[arg(long, default_value = "standard")]
    cleanup: CleanupMode,
}

/// Cleanup mode
#[derive(Clone, ValueEnum)]
enum CleanupMode {
    /// Normalization and whitespace only; keeps trailing `---` content
    Minimal,
    /// Also drops trailing commentary and boilerplate (default)
    Standard,
}

impl From<CleanupMode> for CleanupOptions {
    fn from(mode: CleanupMode) -> Self {
        match mode {
            CleanupMode::Minimal => CleanupOptions::minimal(),
            CleanupMode::Standard => CleanupOptions::default(),
        }
    }
}

impl ExportArgs {
    fn exporter(&self, format: ExportFormat, render: RenderOptions) -> SowExporter {
        let render = if self.no_toc { render.without_toc() } else { render };
        let mut exporter = SowExporter::new()
            .with_format(format)
            .with_render_options(render)
            .with_cleanup(self.cleanup.clone().into());
        if let Some(date) = &self.date {
            exporter = exporter.with_date(date.clone());
        }
        exporter
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Docx {
            input,
            output,
            export,
            font,
        } => {
            let pb = create_spinner("Loading project...");
            let project = load_project(&input)?;

            pb.set_message("Rendering DOCX...");
            let render = RenderOptions::default().with_font(font);
            let result = export
                .exporter(ExportFormat::Docx, render)
                .export(&project.config, &project.sections)?;
            let path = result.write_to(&output)?;

            pb.finish_and_clear();
            println!(
                "{} Exported {} sections to DOCX: {}",
                "✓".green().bold(),
                result.document().sections.len(),
                path.display()
            );
        }

        Commands::Markdown {
            input,
            output,
            export,
            no_anchors,
            max_heading,
        } => {
            let pb = create_spinner("Loading project...");
            let project = load_project(&input)?;

            pb.set_message("Rendering to Markdown...");
            let mut render = RenderOptions::default().with_max_heading_level(max_heading);
            if no_anchors {
                render = render.without_anchors();
            }
            let result = export
                .exporter(ExportFormat::Markdown, render)
                .export(&project.config, &project.sections)?;

            pb.finish_and_clear();
            write_output(output.as_deref(), result.as_text().unwrap_or_default())?;

            if let Some(path) = output {
                println!(
                    "{} Exported to Markdown: {}",
                    "✓".green().bold(),
                    path.display()
                );
            }
        }

        Commands::Json {
            input,
            output,
            compact,
            export,
        } => {
            let pb = create_spinner("Loading project...");
            let project = load_project(&input)?;

            pb.set_message("Assembling document...");
            let document = export
                .exporter(ExportFormat::Markdown, RenderOptions::default())
                .assemble(&project.config, &project.sections);

            let json = if compact {
                serde_json::to_string(&document)?
            } else {
                document.to_json()?
            };

            pb.finish_and_clear();
            write_output(output.as_deref(), &json)?;

            if let Some(path) = output {
                println!("{} Wrote JSON: {}", "✓".green().bold(), path.display());
            }
        }

        Commands::Validate { input } => {
            let project = load_project(&input)?;
            let issues = validate_config(&project.config);

            if issues.is_empty() {
                println!("{} Configuration is valid", "✓".green().bold());
            } else {
                println!("{}", "Configuration Issues".red().bold());
                println!("{}", "─".repeat(40));
                for issue in &issues {
                    println!("  {} {}: {}", "✗".red(), issue.field.bold(), issue.message);
                }
                return Err(format!("{} issue(s) found", issues.len()).into());
            }
        }

        Commands::Prompt {
            input,
            section,
            template,
        } => {
            let project = load_project(&input)?;
            let template = match template {
                Some(path) => fs::read_to_string(path)?,
                None => DEFAULT_FALLBACK_PROMPT.to_string(),
            };

            let prompt = populate_prompt_template(&template, &project.config, &section);
            write_output(None, &prompt)?;
        }

        Commands::Info { input } => {
            let project = load_project(&input)?;
            let config = &project.config;

            println!("{}", "Project Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!("{}: {}", "Project".bold(), config.project.title);
            println!("{}: {}", "Client".bold(), config.client_company.name);
            println!("{}: {}", "Prepared by".bold(), config.your_company.name);

            println!("\n{}", "Sections".cyan().bold());
            println!("{}", "─".repeat(40));
            for section in &project.sections {
                let status = match section.status {
                    SectionStatus::Success | SectionStatus::Modified => {
                        section.status.to_string().green()
                    }
                    SectionStatus::Error => section.status.to_string().red(),
                    _ => section.status.to_string().yellow(),
                };
                println!("  [{}] {}", status, section.title);
            }

            let exportable = project.sections.iter().filter(|s| s.is_exportable()).count();
            println!(
                "\n{}: {} of {}",
                "Exportable".bold(),
                exportable,
                project.sections.len()
            );
            println!(
                "{}: {}",
                "DOCX file".bold(),
                sowdoc::export_file_name(config, ExportFormat::Docx)
            );
        }
    }

    Ok(())
}

fn load_project(path: &Path) -> Result<Project, Box<dyn std::error::Error>> {
    let project = Project::load(path)?;
    tracing::debug!(
        path = %path.display(),
        sections = project.sections.len(),
        "loaded project"
    );
    Ok(project)
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_markdown_alias() {
        let cli = Cli::try_parse_from(["sowdoc", "md", "project.json", "--no-toc"]).unwrap();
        match cli.command {
            Commands::Markdown { export, .. } => assert!(export.no_toc),
            _ => panic!("expected markdown command"),
        }
    }

    #[test]
    fn test_verbose_count() {
        let cli = Cli::try_parse_from(["sowdoc", "-vv", "validate", "p.json"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.md");
        write_output(Some(&path), "# Title").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "# Title");
    }
}
