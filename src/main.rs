use std::io::{self, Read, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use md2html::config::Config;
use md2html::math::{
    CachedRenderer, CodeCogsRenderer, FallbackRenderer, MathRenderer, MathmlRenderer,
    NoMathRenderer,
};
use md2html::preview::preview_document;
use md2html::profiles::Background;
use md2html::{ConvertOptions, Converter, SyntectHighlighter, Theme};
use tracing_subscriber::EnvFilter;

const MATH_CACHE_SIZE: usize = 256;

/// Markdown to inline-styled HTML for WeChat articles
#[derive(Parser, Debug)]
#[command(name = "md2html")]
#[command(version)]
#[command(about = "Convert Markdown to WeChat-safe, inline-styled HTML", long_about = None)]
struct Args {
    /// Input markdown file (use "-" for stdin)
    #[arg(value_name = "INPUT", required_unless_present = "completions")]
    input: Option<PathBuf>,

    /// Output file path (stdout if omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Built-in theme id (see md2html-themes)
    #[arg(long, value_name = "ID")]
    theme: Option<String>,

    /// Code highlighting theme id
    #[arg(long, value_name = "ID")]
    code_theme: Option<String>,

    /// Font size profile: small, medium or large
    #[arg(long, value_name = "ID")]
    font_size: Option<String>,

    /// Page background profile: warm, grid or none
    #[arg(long, value_name = "ID")]
    background: Option<String>,

    /// Custom theme file (TOML or YAML); overrides --theme
    #[arg(long, value_name = "PATH")]
    theme_file: Option<PathBuf>,

    /// Settings file (TOML)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Render formulas locally instead of calling the math web service
    #[arg(long)]
    no_math_service: bool,

    /// Emit a complete HTML page with the selected background
    #[arg(long, conflicts_with = "json")]
    preview: bool,

    /// Emit the conversion result as JSON
    #[arg(long)]
    json: bool,

    /// Log pipeline details to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        let mut command = Args::command();
        clap_complete::generate(shell, &mut command, "md2html", &mut io::stdout());
        return Ok(());
    }

    init_tracing(args.verbose);

    let config = match args.config {
        Some(ref path) => Config::load(path)
            .map_err(|e| format!("Failed to load config {}: {}", path.display(), e))?,
        None => Config::default(),
    };

    let options = ConvertOptions {
        theme: args.theme.clone().unwrap_or(config.defaults.theme.clone()),
        code_theme: args
            .code_theme
            .clone()
            .unwrap_or(config.defaults.code_theme.clone()),
        font_size: args
            .font_size
            .clone()
            .unwrap_or(config.defaults.font_size.clone()),
        background: args
            .background
            .clone()
            .unwrap_or(config.defaults.background.clone()),
    };

    let theme = match args.theme_file {
        Some(ref path) => load_theme_file(path)?,
        None => Theme::resolve(&options.theme),
    };

    let input = args.input.as_deref().ok_or("No input file given")?;
    let markdown = read_input(input)?;

    let converter = Converter::new(
        math_renderer(&config, args.no_math_service),
        SyntectHighlighter::shared(),
    );
    let conversion = converter.convert_with_theme(&markdown, &theme, &options);

    let rendered = if args.json {
        conversion
            .to_json()
            .map_err(|e| format!("Failed to serialize result: {}", e))?
    } else if args.preview {
        let title = input
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| *s != "-")
            .unwrap_or("md2html");
        preview_document(
            &conversion.html,
            title,
            &Background::resolve(&conversion.background),
        )
    } else {
        conversion.html
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, rendered).map_err(|e| format!("Failed to write HTML: {}", e))?;
            eprintln!("HTML saved to: {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| format!("Failed to write to stdout: {}", e))?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "md2html=debug" } else { "md2html=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_theme_file(path: &Path) -> Result<Theme, String> {
    if !path.is_file() {
        return Err(format!("Theme file not found: {}", path.display()));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read theme file: {}", e))?;
    let id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("custom");
    Theme::from_file_content(id, &content)
        .map_err(|e| format!("Failed to parse theme file as TOML or YAML: {}", e))
}

fn read_input(input: &Path) -> Result<String, String> {
    if input.to_str() == Some("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(input).map_err(|e| format!("Failed to read input file: {}", e))
    }
}

fn math_renderer(config: &Config, local_only: bool) -> Box<dyn MathRenderer> {
    if !config.math.enabled {
        return Box::new(NoMathRenderer);
    }
    if local_only {
        return Box::new(MathmlRenderer::default());
    }
    let service = CodeCogsRenderer::new(
        config.math.endpoint.clone(),
        config.math.dpi,
        Duration::from_secs(config.math.timeout_secs),
    );
    let capacity = NonZeroUsize::new(MATH_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
    Box::new(CachedRenderer::new(
        FallbackRenderer {
            primary: service,
            secondary: MathmlRenderer::default(),
        },
        capacity,
    ))
}
