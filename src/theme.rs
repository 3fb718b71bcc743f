use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::error::{Error, Result};

pub const DEFAULT_THEME: &str = "default";

const DEFAULT_TEXT_COLOR: &str = "#333";
const DEFAULT_SECONDARY_TEXT_COLOR: &str = "#666";
const DEFAULT_BORDER_RADIUS: &str = "6px";
const DEFAULT_SHADOW: &str = "0 2px 8px rgba(0,0,0,0.06)";

const BUILTIN_THEMES: &[(&str, &str)] = &[
    ("default", include_str!("../themes/default.toml")),
    ("sport", include_str!("../themes/sport.toml")),
    ("chinese", include_str!("../themes/chinese.toml")),
    ("cyberpunk", include_str!("../themes/cyberpunk.toml")),
    ("ocean", include_str!("../themes/ocean.toml")),
    ("forest", include_str!("../themes/forest.toml")),
    ("sunset", include_str!("../themes/sunset.toml")),
    ("lavender", include_str!("../themes/lavender.toml")),
    ("coffee", include_str!("../themes/coffee.toml")),
    ("minimalist", include_str!("../themes/minimalist.toml")),
    ("tech", include_str!("../themes/tech.toml")),
    ("retro", include_str!("../themes/retro.toml")),
    ("government", include_str!("../themes/government.toml")),
    ("finance", include_str!("../themes/finance.toml")),
];

/// Declares a closed set of heading style variants keyed by their theme-file name.
///
/// Unknown keys resolve to the level's default variant when a theme is loaded,
/// so a render never has to deal with an unrecognised name.
macro_rules! style_variants {
    ($(#[$meta:meta])* $name:ident, heading = $heading:literal, default = $default:ident, {
        $($variant:ident => $key:literal),+ $(,)?
    }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            pub fn parse(key: &str) -> Option<Self> {
                match key.trim() {
                    $($key => Some($name::$variant),)+
                    _ => None,
                }
            }

            pub fn from_key(key: &str) -> Self {
                Self::parse(key).unwrap_or_else(|| {
                    tracing::warn!(
                        heading = $heading,
                        key,
                        fallback = $name::$default.key(),
                        "unknown heading style variant"
                    );
                    $name::$default
                })
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::from_key(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.key().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.key())
            }
        }
    };
}

style_variants!(
    /// `h1` decorations.
    H1Variant, heading = "h1", default = BottomBorder, {
        BottomBorder => "bottom_border",
        DoubleBottom => "double_bottom",
        Background => "background",
        Neon => "neon",
        GradientBottom => "gradient_bottom",
        Ribbon => "ribbon",
        WaveBottom => "wave_bottom",
        LeafDeco => "leaf_deco",
        ThinBottom => "thin_bottom",
        LeftBottom => "left_bottom",
        Government => "government",
        Finance => "finance",
    }
);

style_variants!(
    /// `h2` decorations.
    H2Variant, heading = "h2", default = LeftBorder, {
        LeftBorder => "left_border",
        DoubleLeft => "double_left",
        Background => "background",
        GradientBg => "gradient_bg",
        ThickLeft => "thick_left",
        GradientBottom => "gradient_bottom",
        ThinLeft => "thin_left",
        LeftBottom => "left_bottom",
        DoubleBottom => "double_bottom",
        Government => "government",
        Finance => "finance",
    }
);

style_variants!(
    /// `h3` decorations, also used for `h4`-`h6`.
    H3Variant, heading = "h3", default = Plain, {
        Plain => "plain",
        BottomBorder => "bottom_border",
        LeftBorder => "left_border",
        DottedBottom => "dotted_bottom",
        DashedBottom => "dashed_bottom",
    }
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeStyles {
    pub bg_color: HexColor,
    pub blockquote_bg: String,
    pub code_bg: HexColor,
    #[serde(default = "default_border_radius")]
    pub border_radius: String,
    #[serde(default = "default_shadow")]
    pub shadow: String,
    #[serde(default)]
    pub h1_style: H1Variant,
    #[serde(default)]
    pub h2_style: H2Variant,
    #[serde(default)]
    pub h3_style: H3Variant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_text: Option<String>,
}

fn default_border_radius() -> String {
    DEFAULT_BORDER_RADIUS.to_string()
}
fn default_shadow() -> String {
    DEFAULT_SHADOW.to_string()
}

impl ThemeStyles {
    pub fn text_color(&self) -> &str {
        self.text_color.as_deref().unwrap_or(DEFAULT_TEXT_COLOR)
    }

    pub fn secondary_text(&self) -> &str {
        self.secondary_text
            .as_deref()
            .unwrap_or(DEFAULT_SECONDARY_TEXT_COLOR)
    }
}

/// A page theme: three-color palette plus the style descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub name: String,
    pub colors: [HexColor; 3],
    #[serde(default)]
    pub description: String,
    pub styles: ThemeStyles,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_builtin(DEFAULT_THEME).expect("built-in default theme must parse")
    }
}

impl Theme {
    pub fn primary(&self) -> &HexColor {
        &self.colors[0]
    }

    pub fn secondary(&self) -> &HexColor {
        &self.colors[1]
    }

    pub fn accent(&self) -> &HexColor {
        &self.colors[2]
    }

    /// Whether the page background is dark enough to need light-on-dark styling.
    pub fn is_dark(&self) -> bool {
        self.styles.bg_color.is_dark()
    }

    pub fn from_builtin(name: &str) -> Result<Self> {
        let normalized = normalize_id(name);
        let content = BUILTIN_THEMES
            .iter()
            .find(|(n, _)| *n == normalized)
            .map(|(_, c)| *c)
            .ok_or_else(|| Error::UnknownBuiltin {
                name: name.to_string(),
                available: Self::list_builtins().join(", "),
            })?;
        let mut theme = Self::from_toml(content)?;
        theme.id = normalized;
        Ok(theme)
    }

    /// Looks up a built-in theme, falling back to the default one for unknown ids.
    pub fn resolve(name: &str) -> Self {
        match Self::from_builtin(name) {
            Ok(theme) => theme,
            Err(err) => {
                tracing::warn!(theme = name, fallback = DEFAULT_THEME, %err, "unknown theme");
                Self::default()
            }
        }
    }

    pub fn list_builtins() -> Vec<&'static str> {
        BUILTIN_THEMES.iter().map(|(n, _)| *n).collect()
    }

    pub fn builtins() -> Vec<Theme> {
        Self::list_builtins()
            .into_iter()
            .map(Self::from_builtin)
            .collect::<Result<Vec<_>>>()
            .expect("built-in themes must parse")
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(Error::ThemeToml)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(Error::ThemeYaml)
    }

    /// Parses a user theme file, trying TOML first and then YAML.
    pub fn from_file_content(id: &str, content: &str) -> Result<Self> {
        let mut theme = match Self::from_toml(content) {
            Ok(theme) => theme,
            Err(toml_err) => Self::from_yaml(content).map_err(|yaml_err| {
                tracing::debug!(%toml_err, "theme file is not TOML");
                yaml_err
            })?,
        };
        theme.id = id.to_string();
        Ok(theme)
    }
}

fn normalize_id(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_parses() {
        for name in Theme::list_builtins() {
            let theme = Theme::from_builtin(name).unwrap_or_else(|e| panic!("{name}: {e}"));
            assert_eq!(theme.id, name);
            assert!(!theme.name.is_empty());
        }
    }

    #[test]
    fn from_builtin_is_case_insensitive() {
        let lower = Theme::from_builtin("ocean").expect("lowercase");
        let upper = Theme::from_builtin(" Ocean ").expect("mixed case");
        assert_eq!(lower.styles.bg_color, upper.styles.bg_color);
    }

    #[test]
    fn unknown_builtin_lists_alternatives() {
        let err = Theme::from_builtin("vaporwave").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("vaporwave"));
        assert!(message.contains("cyberpunk"));
    }

    #[test]
    fn resolve_falls_back_to_default() {
        assert_eq!(Theme::resolve("nope").id, DEFAULT_THEME);
        assert_eq!(Theme::resolve("forest").id, "forest");
    }

    #[test]
    fn only_cyberpunk_is_dark() {
        let dark: Vec<_> = Theme::builtins()
            .into_iter()
            .filter(Theme::is_dark)
            .map(|t| t.id)
            .collect();
        assert_eq!(dark, vec!["cyberpunk".to_string()]);
    }

    #[test]
    fn unknown_variant_keys_fall_back_at_load_time() {
        let theme = Theme::from_toml(
            r##"
name = "Custom"
colors = ["#112233", "#445566", "#778899"]

[styles]
bg_color = "#ffffff"
blockquote_bg = "#fafafa"
code_bg = "#f5f5f5"
h1_style = "sparkles"
h2_style = "zigzag"
h3_style = "underline"
"##,
        )
        .expect("custom theme");
        assert_eq!(theme.styles.h1_style, H1Variant::BottomBorder);
        assert_eq!(theme.styles.h2_style, H2Variant::LeftBorder);
        assert_eq!(theme.styles.h3_style, H3Variant::Plain);
        assert_eq!(theme.styles.border_radius, "6px");
        assert_eq!(theme.styles.text_color(), "#333");
    }

    #[test]
    fn palette_must_have_three_colors() {
        let err = Theme::from_toml(
            r##"
name = "Two"
colors = ["#112233", "#445566"]

[styles]
bg_color = "#ffffff"
blockquote_bg = "#fafafa"
code_bg = "#f5f5f5"
"##,
        );
        assert!(err.is_err());
    }

    #[test]
    fn malformed_hex_is_rejected() {
        let err = Theme::from_toml(
            r##"
name = "Bad"
colors = ["#112233", "#445566", "blue"]

[styles]
bg_color = "#ffffff"
blockquote_bg = "#fafafa"
code_bg = "#f5f5f5"
"##,
        );
        assert!(err.is_err());
    }

    #[test]
    fn hashless_palette_emits_valid_css() {
        use crate::profiles::{CodeTheme, FontSize};
        use crate::style::ResolvedStyles;

        let theme = Theme::from_toml(
            r##"
name = "Bare"
colors = ["3f3f3f", "5a5a5a", "1e88e5"]

[styles]
bg_color = "ffffff"
blockquote_bg = "#fafafa"
code_bg = "f5f5f5"
"##,
        )
        .expect("hashless theme");
        assert_eq!(theme.primary().as_str(), "#3f3f3f");

        let styles = ResolvedStyles::resolve(
            &theme,
            &CodeTheme::resolve("github"),
            &FontSize::resolve("medium"),
        );
        assert!(styles.h1.contains("solid #3f3f3f"));
        assert!(!styles.h1.contains("solid 3f3f3f"));
        assert!(styles.wrapper.contains("background-color: #ffffff;"));
    }

    #[test]
    fn yaml_theme_files_are_accepted() {
        let theme = Theme::from_file_content(
            "mine",
            r##"
name: Mine
colors: ["#123456", "#654321", "#abcdef"]
styles:
  bg_color: "#101010"
  blockquote_bg: "#202020"
  code_bg: "#000000"
  h1_style: neon
  text_color: "#eeeeee"
"##,
        )
        .expect("yaml theme");
        assert_eq!(theme.id, "mine");
        assert_eq!(theme.styles.h1_style, H1Variant::Neon);
        assert!(theme.is_dark());
    }

    #[test]
    fn variant_keys_round_trip() {
        for variant in H1Variant::ALL {
            assert_eq!(H1Variant::parse(variant.key()), Some(*variant));
        }
        for variant in H2Variant::ALL {
            assert_eq!(H2Variant::parse(variant.key()), Some(*variant));
        }
        for variant in H3Variant::ALL {
            assert_eq!(H3Variant::parse(variant.key()), Some(*variant));
        }
    }
}
