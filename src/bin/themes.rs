use clap::Parser;
use md2html::profiles::{BACKGROUNDS, CODE_THEMES, FONT_SIZES};
use md2html::theme::Theme;
use serde::{Serialize, Serializer};
use std::path::PathBuf;

/// Dump the built-in theme catalog as JSON
#[derive(Parser, Debug)]
#[command(name = "md2html-themes")]
#[command(version)]
#[command(about = "Print every built-in theme, code theme, font size and background as JSON", long_about = None)]
struct Args {
    /// Output file path (stdout if omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Single-line JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

/// Serializes `(id, value)` pairs as a JSON object in table order.
struct Ordered<'a, T>(Vec<(&'a str, &'a T)>);

impl<T: Serialize> Serialize for Ordered<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(id, value)| (*id, *value)))
    }
}

#[derive(Serialize)]
struct Catalog<'a> {
    themes: Ordered<'a, Theme>,
    code_themes: Ordered<'a, md2html::CodeTheme>,
    font_sizes: Ordered<'a, md2html::FontSize>,
    backgrounds: Ordered<'a, md2html::Background>,
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    let themes = Theme::builtins();
    let catalog = Catalog {
        themes: Ordered(themes.iter().map(|t| (t.id.as_str(), t)).collect()),
        code_themes: Ordered(CODE_THEMES.iter().map(|t| (t.id, t)).collect()),
        font_sizes: Ordered(FONT_SIZES.iter().map(|f| (f.id, f)).collect()),
        backgrounds: Ordered(BACKGROUNDS.iter().map(|b| (b.id, b)).collect()),
    };

    let json = if args.compact {
        serde_json::to_string(&catalog)
    } else {
        serde_json::to_string_pretty(&catalog)
    }
    .map_err(|e| format!("Failed to serialize catalog: {}", e))?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, json + "\n")
                .map_err(|e| format!("Failed to write catalog: {}", e))?;
            eprintln!("Catalog saved to: {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
