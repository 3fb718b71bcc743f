//! Markdown to inline-styled HTML for WeChat official-account articles.
//!
//! ```no_run
//! use md2html::{ConvertOptions, convert_markdown};
//!
//! let conversion = convert_markdown("# Hello\n\n$E = mc^2$", &ConvertOptions::default());
//! println!("{}", conversion.html);
//! ```

pub mod blocks;
pub mod color;
pub mod config;
pub mod error;
pub mod highlight;
pub mod html;
pub mod inliner;
pub mod math;
pub mod pipeline;
pub mod preview;
pub mod profiles;
pub mod style;
pub mod theme;
pub mod vault;

pub use color::{ColorError, HexColor, Rgb};
pub use config::{Config, MathConfig};
pub use error::{Error, Result};
pub use highlight::{CodeHighlighter, PlainHighlighter, SyntectHighlighter};
pub use math::{
    CachedRenderer, CodeCogsRenderer, FallbackRenderer, MathColors, MathRenderer, MathmlRenderer,
    NoMathRenderer,
};
pub use pipeline::{ConvertOptions, Conversion, Converter, convert_markdown};
pub use profiles::{Background, CodeTheme, FontSize};
pub use style::ResolvedStyles;
pub use theme::Theme;
