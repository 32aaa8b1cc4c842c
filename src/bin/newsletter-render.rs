use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand, ValueHint};
use newsletter_html::{
    parse_template, validate_blocks, NewsletterError, NewsletterResult, RenderOptions, Severity,
    Theme,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Compile newsletter editor templates into email-safe HTML.
#[derive(Debug, Parser)]
#[command(name = "newsletter-render", version, about = "Newsletter HTML compiler")]
struct CliArgs {
    /// Log more detail; repeat for trace output.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a template to an HTML document.
    Render(RenderArgs),
    /// Lint one or more templates.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct RenderArgs {
    /// Template JSON file, or `-` for stdin.
    #[arg(value_name = "TEMPLATE", value_hint = ValueHint::FilePath)]
    template: String,

    /// Theme file (JSON or YAML); replaces the template's theme.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    theme: Option<PathBuf>,

    /// Render options YAML file.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Write HTML here instead of stdout.
    #[arg(short, long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    out: Option<PathBuf>,

    /// Override the document title.
    #[arg(long)]
    title: Option<String>,

    /// Pin the footer copyright year.
    #[arg(long)]
    year: Option<i32>,

    /// Leave out the quiz scoring script.
    #[arg(long = "no-scripts", action = clap::ArgAction::SetTrue)]
    no_scripts: bool,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Template JSON files.
    #[arg(value_name = "TEMPLATE", required = true, value_hint = ValueHint::FilePath)]
    templates: Vec<String>,
}

fn main() {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    let exit_code = match args.command {
        Command::Render(render) => match run_render(&render) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("✗ {}", e);
                1
            }
        },
        Command::Check(check) => run_check(&check),
    };

    process::exit(exit_code);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().compact().with_target(false).with_writer(io::stderr))
        .try_init();
}

fn run_render(args: &RenderArgs) -> NewsletterResult<()> {
    let template_json = read_input(&args.template)?;
    let mut template = parse_template(&template_json)?;

    if let Some(path) = &args.theme {
        template.theme = load_theme(path)?;
    }

    let mut options = match &args.config {
        Some(path) => RenderOptions::from_yaml_str(&read_path(path)?)?,
        None => RenderOptions::default(),
    };
    if let Some(title) = &args.title {
        options.title = title.clone();
    }
    if let Some(year) = args.year {
        options.copyright_year = Some(year);
    }
    if args.no_scripts {
        options.include_scripts = false;
    }

    tracing::debug!(blocks = template.blocks.len(), template = %args.template, "rendering template");
    let html = template.render(&options);

    match &args.out {
        Some(path) => fs::write(path, html)
            .map_err(|e| NewsletterError::io(path.display().to_string(), e))?,
        None => io::stdout()
            .write_all(html.as_bytes())
            .map_err(|e| NewsletterError::io("<stdout>", e))?,
    }
    Ok(())
}

fn run_check(args: &CheckArgs) -> i32 {
    let mut exit_code = 0;

    for file_path in &args.templates {
        let template = match read_input(file_path).and_then(|json| parse_template(&json)) {
            Ok(template) => template,
            Err(e) => {
                eprintln!("✗ {} has errors:", file_path);
                eprintln!("  {}", e);
                exit_code = 1;
                continue;
            }
        };

        let diagnostics = validate_blocks(&template.blocks);
        let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
        if has_errors {
            eprintln!("✗ {} has errors:", file_path);
            exit_code = 1;
        } else {
            println!("✓ {} is valid", file_path);
        }
        for diagnostic in &diagnostics {
            if has_errors {
                eprintln!("  {}", diagnostic);
            } else {
                println!("  {}", diagnostic);
            }
        }
    }

    exit_code
}

fn read_input(source: &str) -> NewsletterResult<String> {
    if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| NewsletterError::io("<stdin>", e))?;
        return Ok(buf);
    }
    read_path(Path::new(source))
}

fn read_path(path: &Path) -> NewsletterResult<String> {
    fs::read_to_string(path).map_err(|e| NewsletterError::io(path.display().to_string(), e))
}

fn load_theme(path: &Path) -> NewsletterResult<Theme> {
    let content = read_path(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(serde_yaml::from_str(&content)?)
    }
}
