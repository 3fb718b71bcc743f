//! Placeholder protection for spans the generic Markdown parser must not see.
//!
//! Fenced code, Mermaid sources and `<!...>` slider blocks are swapped for
//! opaque tokens before parsing and swapped back, fully rendered, afterwards.
//! A vault lives for exactly one conversion and is consumed by [`PlaceholderVault::restore`].

use std::sync::LazyLock;

use regex::{Captures, Regex};

const TOKEN_SUFFIX: &str = "ENDPLACEHOLDER";

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```([\w.+#-]*)\s*\n(.*?)\n```").unwrap());
static SLIDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<(!.+?)>").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Code,
    Mermaid,
    Slider,
}

impl BlockKind {
    /// Restoration order: Mermaid and slider markup must be inserted after code.
    pub const RESTORE_ORDER: [BlockKind; 3] = [BlockKind::Code, BlockKind::Mermaid, BlockKind::Slider];

    fn token_prefix(self) -> &'static str {
        match self {
            BlockKind::Code => "CODEBLOCKPLACEHOLDER",
            BlockKind::Mermaid => "MERMAIDPLACEHOLDER",
            BlockKind::Slider => "SLIDERPLACEHOLDER",
        }
    }

    pub fn token(self, index: usize) -> String {
        format!("{}{index}{TOKEN_SUFFIX}", self.token_prefix())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtectedBlock {
    Code { language: String, source: String },
    Mermaid { source: String },
    /// Inner markup of a `<!...>` block, starting at the `!`.
    Slider { raw: String },
}

impl ProtectedBlock {
    pub fn kind(&self) -> BlockKind {
        match self {
            ProtectedBlock::Code { .. } => BlockKind::Code,
            ProtectedBlock::Mermaid { .. } => BlockKind::Mermaid,
            ProtectedBlock::Slider { .. } => BlockKind::Slider,
        }
    }

    /// The Markdown text this block was extracted from.
    pub fn original(&self) -> String {
        match self {
            ProtectedBlock::Code { language, source } => format!("```{language}\n{source}\n```"),
            ProtectedBlock::Mermaid { source } => format!("```mermaid\n{source}\n```"),
            ProtectedBlock::Slider { raw } => format!("<{raw}>"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub token: String,
    pub block: ProtectedBlock,
}

#[derive(Debug, Default)]
pub struct PlaceholderVault {
    entries: Vec<Entry>,
}

impl PlaceholderVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn count(&self, kind: BlockKind) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.block.kind() == kind)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn stash(&mut self, block: ProtectedBlock) -> String {
        let kind = block.kind();
        let token = kind.token(self.count(kind));
        self.entries.push(Entry {
            token: token.clone(),
            block,
        });
        token
    }

    /// Replaces `<!...>` blocks outside fenced code with slider tokens.
    pub fn extract_sliders(&mut self, markdown: &str) -> String {
        map_outside_fences(markdown, |segment| {
            SLIDER_RE
                .replace_all(segment, |caps: &Captures| {
                    self.stash(ProtectedBlock::Slider {
                        raw: caps[1].to_string(),
                    })
                })
                .into_owned()
        })
    }

    /// Replaces fenced code blocks with code or Mermaid tokens.
    pub fn extract_code_blocks(&mut self, markdown: &str) -> String {
        FENCE_RE
            .replace_all(markdown, |caps: &Captures| {
                let language = caps[1].to_string();
                let source = caps[2].to_string();
                if language.eq_ignore_ascii_case("mermaid") {
                    self.stash(ProtectedBlock::Mermaid { source })
                } else {
                    self.stash(ProtectedBlock::Code { language, source })
                }
            })
            .into_owned()
    }

    /// Swaps every token in `html` for its rendered block, code first, then
    /// Mermaid, then sliders.
    pub fn restore(self, html: &str, mut render: impl FnMut(&ProtectedBlock) -> String) -> String {
        let mut output = html.to_string();
        for kind in BlockKind::RESTORE_ORDER {
            for entry in self.entries.iter().filter(|entry| entry.block.kind() == kind) {
                let rendered = render(&entry.block);
                output = replace_token(&output, &entry.token, &rendered);
            }
        }
        output
    }
}

/// Replaces the paragraph the parser wrapped around `token`, then any bare
/// occurrence left inside other markup.
pub fn replace_token(html: &str, token: &str, replacement: &str) -> String {
    let wrapped = format!("<p>{token}</p>");
    html.replace(&wrapped, replacement).replace(token, replacement)
}

/// Applies `rewrite` to the text between fenced code blocks, copying the
/// fences themselves through untouched.
pub fn map_outside_fences(markdown: &str, mut rewrite: impl FnMut(&str) -> String) -> String {
    let mut output = String::with_capacity(markdown.len());
    let mut last = 0;
    for fence in FENCE_RE.find_iter(markdown) {
        output.push_str(&rewrite(&markdown[last..fence.start()]));
        output.push_str(fence.as_str());
        last = fence.end();
    }
    output.push_str(&rewrite(&markdown[last..]));
    output
}

/// True if `text` still holds a token of any kind.
pub fn contains_token(text: &str) -> bool {
    static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?:CODEBLOCK|MERMAID|SLIDER)PLACEHOLDER\d+ENDPLACEHOLDER").unwrap()
    });
    TOKEN_RE.is_match(text)
}
