//! Content loading and rendering for the viewer.
//!
//! [TextFile::load] reads a file as UTF-8 text, rejecting anything that looks
//! binary. A [ContentRenderer] turns the text into tagged lines: [RichRenderer]
//! frames markdown and tags source tokens, [PlainRenderer] keeps structure with
//! ASCII markers only. [select_renderer] picks one at startup.
//!
//! A [Document] splits the rendered lines into pages for the viewer.

use crate::config::Theme;
use crate::core::error::{FsError, FsResult, IoResultExt};

use phf::phf_map;
use unicode_width::UnicodeWidthStr;

use std::fs;
use std::path::{Path, PathBuf};

/// Files larger than this are treated as binary.
pub const MAX_TEXT_SIZE: u64 = 10 * 1024 * 1024;
const SNIFF_LEN: usize = 1024;
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Visual role of a piece of rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Plain,
    Keyword,
    Str,
    Comment,
    Number,
    Heading(u8),
    Code,
    Fence,
    Emphasis,
    Strong,
    Bullet,
    Quote,
    Rule,
    Link,
    LineNumber,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub tag: Tag,
}

impl Segment {
    pub fn new(text: impl Into<String>, tag: Tag) -> Self {
        Self {
            text: text.into(),
            tag,
        }
    }
}

/// One rendered line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    segments: Vec<Segment>,
}

impl StyledLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::tagged(text, Tag::Plain)
    }

    pub fn tagged(text: impl Into<String>, tag: Tag) -> Self {
        let text = text.into();
        let mut line = Self::default();
        line.push(text, tag);
        line
    }

    /// Appends text, merging with the previous segment when the tag matches.
    pub fn push(&mut self, text: impl Into<String>, tag: Tag) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(last) if last.tag == tag => last.text.push_str(&text),
            _ => self.segments.push(Segment::new(text, tag)),
        }
    }

    fn extend(&mut self, segments: Vec<Segment>) {
        for s in segments {
            self.push(s.text, s.tag);
        }
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The line's text with tags dropped.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// UTF-8 text read from disk, with the details needed to write it back unchanged.
#[derive(Debug, Clone)]
pub struct TextFile {
    path: PathBuf,
    text: String,
    had_bom: bool,
}

impl TextFile {
    /// Reads `path` as text.
    ///
    /// Oversized files, a NUL byte near the start, a PDF header or invalid UTF-8
    /// all yield [FsError::DecodeError]. A UTF-8 BOM is stripped and remembered.
    pub fn load(path: &Path) -> FsResult<Self> {
        let meta = fs::metadata(path).at(path)?;
        if meta.is_dir() {
            return Err(FsError::invalid(path, "is a directory"));
        }
        if meta.len() > MAX_TEXT_SIZE {
            return Err(FsError::DecodeError(path.to_path_buf()));
        }

        let mut bytes = fs::read(path).at(path)?;
        if looks_binary(&bytes) {
            return Err(FsError::DecodeError(path.to_path_buf()));
        }
        let had_bom = bytes.starts_with(UTF8_BOM);
        if had_bom {
            bytes.drain(..UTF8_BOM.len());
        }
        let text = String::from_utf8(bytes).map_err(|_| FsError::DecodeError(path.to_path_buf()))?;
        Ok(Self {
            path: path.to_path_buf(),
            text,
            had_bom,
        })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn had_bom(&self) -> bool {
        self.had_bom
    }

    /// True if any line ends in CRLF. One is enough to save the whole file as CRLF.
    pub fn uses_crlf(&self) -> bool {
        self.text.contains("\r\n")
    }

    pub fn ends_with_newline(&self) -> bool {
        self.text.ends_with('\n')
    }

    /// Lines without their terminators.
    pub fn lines(&self) -> Vec<String> {
        self.text.lines().map(str::to_string).collect()
    }
}

fn looks_binary(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    head.contains(&0) || head.starts_with(b"%PDF-")
}

/// Per-language token rules for source highlighting.
#[derive(Debug)]
pub struct Syntax {
    keywords: &'static [&'static str],
    line_comment: Option<&'static str>,
    block_comment: Option<(&'static str, &'static str)>,
    quotes: &'static [char],
}

static RUST: Syntax = Syntax {
    keywords: &[
        "as", "async", "await", "break", "const", "continue", "crate", "else", "enum", "extern",
        "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
        "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
        "type", "unsafe", "use", "where", "while", "dyn",
    ],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    quotes: &['"'],
};

static PYTHON: Syntax = Syntax {
    keywords: &[
        "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
        "elif", "else", "except", "False", "finally", "for", "from", "global", "if", "import",
        "in", "is", "lambda", "None", "nonlocal", "not", "or", "pass", "raise", "return", "True",
        "try", "while", "with", "yield",
    ],
    line_comment: Some("#"),
    block_comment: None,
    quotes: &['"', '\''],
};

static C_LIKE: Syntax = Syntax {
    keywords: &[
        "auto", "bool", "break", "case", "char", "class", "const", "continue", "default",
        "delete", "do", "double", "else", "enum", "extends", "extern", "false", "final", "float",
        "for", "if", "implements", "import", "int", "interface", "long", "namespace", "new",
        "null", "nullptr", "package", "private", "protected", "public", "return", "short",
        "sizeof", "static", "struct", "switch", "template", "this", "throw", "true", "try",
        "typedef", "union", "unsigned", "using", "virtual", "void", "while",
    ],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\''],
};

static JAVASCRIPT: Syntax = Syntax {
    keywords: &[
        "async", "await", "break", "case", "catch", "class", "const", "continue", "default",
        "delete", "else", "export", "extends", "false", "finally", "for", "function", "if",
        "import", "in", "instanceof", "interface", "let", "new", "null", "return", "switch",
        "this", "throw", "true", "try", "type", "typeof", "undefined", "var", "while", "yield",
    ],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\'', '`'],
};

static GO: Syntax = Syntax {
    keywords: &[
        "break", "case", "chan", "const", "continue", "default", "defer", "else", "false",
        "for", "func", "go", "if", "import", "interface", "map", "nil", "package", "range",
        "return", "select", "struct", "switch", "true", "type", "var",
    ],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '`'],
};

static SHELL: Syntax = Syntax {
    keywords: &[
        "case", "do", "done", "echo", "elif", "else", "esac", "exit", "export", "fi", "for",
        "function", "if", "in", "local", "return", "then", "while",
    ],
    line_comment: Some("#"),
    block_comment: None,
    quotes: &['"', '\''],
};

static CONFIG: Syntax = Syntax {
    keywords: &["true", "false", "null", "yes", "no"],
    line_comment: Some("#"),
    block_comment: None,
    quotes: &['"', '\''],
};

static JSON: Syntax = Syntax {
    keywords: &["true", "false", "null"],
    line_comment: None,
    block_comment: None,
    quotes: &['"'],
};

static SQL: Syntax = Syntax {
    keywords: &[
        "SELECT", "FROM", "WHERE", "INSERT", "INTO", "VALUES", "UPDATE", "SET", "DELETE",
        "CREATE", "TABLE", "DROP", "ALTER", "JOIN", "LEFT", "RIGHT", "INNER", "ON", "AND", "OR",
        "NOT", "NULL", "ORDER", "BY", "GROUP", "AS", "LIMIT", "select", "from", "where",
        "insert", "into", "values", "update", "set", "delete", "create", "table", "join", "on",
        "and", "or", "not", "null", "order", "by", "group", "as", "limit",
    ],
    line_comment: Some("--"),
    block_comment: Some(("/*", "*/")),
    quotes: &['\''],
};

static MARKUP: Syntax = Syntax {
    keywords: &[],
    line_comment: None,
    block_comment: Some(("<!--", "-->")),
    quotes: &['"'],
};

static CSS: Syntax = Syntax {
    keywords: &["important", "inherit", "initial", "none", "auto"],
    line_comment: None,
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\''],
};

static BATCH: Syntax = Syntax {
    keywords: &[
        "echo", "set", "if", "else", "goto", "call", "exit", "for", "in", "do", "not", "exist",
        "function", "param", "return", "foreach",
    ],
    line_comment: Some("REM"),
    block_comment: None,
    quotes: &['"'],
};

static INI: Syntax = Syntax {
    keywords: &["true", "false", "yes", "no", "on", "off"],
    line_comment: Some(";"),
    block_comment: None,
    quotes: &['"'],
};

static SYNTAX_BY_EXT: phf::Map<&'static str, &'static Syntax> = phf_map! {
    "rs" => &RUST,
    "py" => &PYTHON,
    "c" => &C_LIKE,
    "h" => &C_LIKE,
    "cpp" => &C_LIKE,
    "hpp" => &C_LIKE,
    "java" => &C_LIKE,
    "js" => &JAVASCRIPT,
    "ts" => &JAVASCRIPT,
    "go" => &GO,
    "sh" => &SHELL,
    "toml" => &CONFIG,
    "yml" => &CONFIG,
    "yaml" => &CONFIG,
    "conf" => &CONFIG,
    "cfg" => &CONFIG,
    "ini" => &INI,
    "json" => &JSON,
    "sql" => &SQL,
    "html" => &MARKUP,
    "xml" => &MARKUP,
    "css" => &CSS,
    "bat" => &BATCH,
    "ps1" => &BATCH,
};

/// How a file's text is interpreted.
#[derive(Debug, Clone, Copy)]
pub enum DocKind {
    Markdown,
    Source(&'static Syntax),
    Text,
}

impl DocKind {
    /// Picks the kind from the file extension, case-insensitively.
    pub fn for_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "md" | "markdown" => DocKind::Markdown,
            e => SYNTAX_BY_EXT
                .get(e)
                .copied()
                .map(DocKind::Source)
                .unwrap_or(DocKind::Text),
        }
    }
}

/// Turns text into tagged lines.
pub trait ContentRenderer {
    fn name(&self) -> &'static str;
    fn render_markdown(&self, text: &str) -> Vec<StyledLine>;
    fn render_source(&self, text: &str, syntax: &Syntax) -> Vec<StyledLine>;

    /// Whether the output carries tags worth styling.
    fn is_rich(&self) -> bool {
        false
    }

    fn render_text(&self, text: &str) -> Vec<StyledLine> {
        text.lines().map(StyledLine::plain).collect()
    }

    fn render(&self, kind: DocKind, text: &str) -> Vec<StyledLine> {
        match kind {
            DocKind::Markdown => self.render_markdown(text),
            DocKind::Source(syntax) => self.render_source(text, syntax),
            DocKind::Text => self.render_text(text),
        }
    }
}

/// True when colored output should be used.
pub fn rich_supported(color_count: u16, no_color: bool, plain_theme: bool) -> bool {
    color_count >= 8 && !no_color && !plain_theme
}

/// Chooses the renderer once at startup from terminal capabilities and theme.
pub fn select_renderer(theme: &Theme) -> Box<dyn ContentRenderer> {
    let colors = crossterm::style::available_color_count();
    let no_color = std::env::var_os("NO_COLOR").is_some();
    if rich_supported(colors, no_color, theme.is_plain()) {
        tracing::debug!(colors, "rich renderer selected");
        Box::new(RichRenderer)
    } else {
        tracing::debug!(colors, no_color, "plain renderer selected");
        Box::new(PlainRenderer)
    }
}

/// Pairs of fence line indices. Unterminated fences are left out.
fn fence_pairs(lines: &[&str]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    let mut open: Option<usize> = None;
    for (i, line) in lines.iter().enumerate() {
        if line.trim_start().starts_with("```") {
            match open.take() {
                Some(start) => pairs.push((start, i)),
                None => open = Some(i),
            }
        }
    }
    pairs
}

/// Structural classification of one markdown line outside a fence.
enum Block<'a> {
    Heading(u8, &'a str),
    Bullet(&'a str, &'a str),
    Ordered(&'a str, &'a str, &'a str),
    Quote(&'a str),
    Rule,
    Paragraph(&'a str),
}

fn classify(line: &str) -> Block<'_> {
    let trimmed = line.trim_start();
    let indent = &line[..line.len() - trimmed.len()];

    let hashes = trimmed.bytes().take_while(|&b| b == b'#').count();
    if (1..=6).contains(&hashes) {
        let rest = &trimmed[hashes..];
        if rest.is_empty() || rest.starts_with(' ') {
            return Block::Heading(hashes as u8, rest.trim());
        }
    }

    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() >= 3
        && let Some(first) = compact.chars().next()
        && matches!(first, '-' | '*' | '_')
        && compact.chars().all(|c| c == first)
    {
        return Block::Rule;
    }

    for marker in ["- ", "* ", "+ "] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return Block::Bullet(indent, rest);
        }
    }

    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 && trimmed[digits..].starts_with(". ") {
        return Block::Ordered(indent, &trimmed[..digits + 1], &trimmed[digits + 2..]);
    }

    if let Some(rest) = trimmed.strip_prefix('>') {
        return Block::Quote(rest.strip_prefix(' ').unwrap_or(rest));
    }

    Block::Paragraph(line)
}

/// Colored, framed rendering.
#[derive(Debug, Default, Clone, Copy)]
pub struct RichRenderer;

impl RichRenderer {
    const RULE_WIDTH: usize = 40;
}

impl ContentRenderer for RichRenderer {
    fn name(&self) -> &'static str {
        "rich"
    }

    fn is_rich(&self) -> bool {
        true
    }

    fn render_markdown(&self, text: &str) -> Vec<StyledLine> {
        let lines: Vec<&str> = text.lines().collect();
        let fences = fence_pairs(&lines);
        let mut out = Vec::with_capacity(lines.len());
        let mut i = 0;

        while i < lines.len() {
            if let Some(&(start, end)) = fences.iter().find(|(s, _)| *s == i) {
                let info = lines[start].trim_start().trim_start_matches('`').trim();
                let title = if info.is_empty() {
                    "─ code ".to_string()
                } else {
                    format!("─ code ({}) ", info)
                };
                let body = &lines[start + 1..end];
                let width = body
                    .iter()
                    .map(|l| l.width())
                    .max()
                    .unwrap_or(0)
                    .max(title.width())
                    + 2;
                out.push(StyledLine::tagged(
                    format!("┌{}{}", title, "─".repeat(width - title.width())),
                    Tag::Fence,
                ));
                for code in body {
                    let mut line = StyledLine::tagged("│ ", Tag::Fence);
                    line.push(*code, Tag::Code);
                    out.push(line);
                }
                out.push(StyledLine::tagged(format!("└{}", "─".repeat(width)), Tag::Fence));
                i = end + 1;
                continue;
            }

            match classify(lines[i]) {
                Block::Heading(level, title) => {
                    let tag = Tag::Heading(level);
                    match level {
                        1 => {
                            let upper = title.to_uppercase();
                            let w = upper.width();
                            out.push(StyledLine::tagged(upper, tag));
                            out.push(StyledLine::tagged("═".repeat(w), tag));
                        }
                        2 => {
                            out.push(StyledLine::tagged(title, tag));
                            out.push(StyledLine::tagged("─".repeat(title.width()), tag));
                        }
                        _ => {
                            let mut line = StyledLine::tagged(format!("{} ", "▸".repeat(level as usize - 2)), tag);
                            line.extend(inline_spans(title, tag));
                            out.push(line);
                        }
                    }
                }
                Block::Bullet(indent, rest) => {
                    let mut line = StyledLine::plain(indent);
                    line.push("• ", Tag::Bullet);
                    line.extend(inline_spans(rest, Tag::Plain));
                    out.push(line);
                }
                Block::Ordered(indent, number, rest) => {
                    let mut line = StyledLine::plain(indent);
                    line.push(format!("{} ", number), Tag::Bullet);
                    line.extend(inline_spans(rest, Tag::Plain));
                    out.push(line);
                }
                Block::Quote(rest) => {
                    let mut line = StyledLine::tagged("▌ ", Tag::Quote);
                    line.extend(inline_spans(rest, Tag::Quote));
                    out.push(line);
                }
                Block::Rule => out.push(StyledLine::tagged("─".repeat(Self::RULE_WIDTH), Tag::Rule)),
                Block::Paragraph(text) => {
                    let mut line = StyledLine::default();
                    line.extend(inline_spans(text, Tag::Plain));
                    out.push(line);
                }
            }
            i += 1;
        }
        out
    }

    fn render_source(&self, text: &str, syntax: &Syntax) -> Vec<StyledLine> {
        let mut in_block = false;
        text.lines()
            .map(|l| highlight_line(l, syntax, &mut in_block))
            .collect()
    }
}

/// ASCII-only rendering for terminals without color.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainRenderer;

impl ContentRenderer for PlainRenderer {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn render_markdown(&self, text: &str) -> Vec<StyledLine> {
        let lines: Vec<&str> = text.lines().collect();
        let fences = fence_pairs(&lines);
        let mut out = Vec::with_capacity(lines.len());
        let mut i = 0;

        while i < lines.len() {
            if let Some(&(start, end)) = fences.iter().find(|(s, _)| *s == i) {
                let info = lines[start].trim_start().trim_start_matches('`').trim();
                let header = if info.is_empty() {
                    "+-- code --+".to_string()
                } else {
                    format!("+-- code ({}) --+", info)
                };
                out.push(StyledLine::plain(header));
                for code in &lines[start + 1..end] {
                    out.push(StyledLine::plain(format!("| {}", code)));
                }
                out.push(StyledLine::plain("+--+"));
                i = end + 1;
                continue;
            }

            let line = match classify(lines[i]) {
                Block::Heading(1, title) => format!("== {} ==", title.to_uppercase()),
                Block::Heading(2, title) => format!("-- {} --", title),
                Block::Heading(_, title) => format!("# {}", title),
                Block::Bullet(indent, rest) => format!("{}* {}", indent, rest),
                Block::Ordered(indent, number, rest) => format!("{}{} {}", indent, number, rest),
                Block::Quote(rest) => format!("> {}", rest),
                Block::Rule => "-".repeat(RichRenderer::RULE_WIDTH),
                Block::Paragraph(text) => text.to_string(),
            };
            out.push(StyledLine::plain(line));
            i += 1;
        }
        out
    }

    fn render_source(&self, text: &str, _syntax: &Syntax) -> Vec<StyledLine> {
        self.render_text(text)
    }
}

/// Splits inline markdown into tagged spans. Unbalanced markers stay literal.
fn inline_spans(text: &str, base: Tag) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut plain = String::new();
    let mut rest = text;
    let mut prev: Option<char> = None;

    while let Some(c) = rest.chars().next() {
        let span = match c {
            '`' => delimited(rest, "`", Tag::Code),
            '*' if rest.starts_with("**") => delimited(rest, "**", Tag::Strong),
            '*' => delimited(rest, "*", Tag::Emphasis),
            '_' if !prev.is_some_and(char::is_alphanumeric) => delimited(rest, "_", Tag::Emphasis),
            '[' => link(rest),
            _ => None,
        };
        match span {
            Some((segment, len)) => {
                if !plain.is_empty() {
                    out.push(Segment::new(std::mem::take(&mut plain), base));
                }
                prev = segment.text.chars().last();
                out.push(segment);
                rest = &rest[len..];
            }
            None => {
                plain.push(c);
                prev = Some(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    if !plain.is_empty() {
        out.push(Segment::new(plain, base));
    }
    out
}

fn delimited(rest: &str, marker: &str, tag: Tag) -> Option<(Segment, usize)> {
    let body = &rest[marker.len()..];
    let close = body.find(marker)?;
    let inner = &body[..close];
    if inner.is_empty() || inner.starts_with(' ') || inner.ends_with(' ') {
        return None;
    }
    Some((Segment::new(inner, tag), marker.len() * 2 + close))
}

fn link(rest: &str) -> Option<(Segment, usize)> {
    let close = rest.find("](")?;
    let end = rest[close..].find(')')? + close;
    let label = &rest[1..close];
    if label.is_empty() || label.contains('[') {
        return None;
    }
    Some((Segment::new(label, Tag::Link), end + 1))
}

/// Tags one source line. `in_block` carries an open block comment across lines.
fn highlight_line(line: &str, syntax: &Syntax, in_block: &mut bool) -> StyledLine {
    let mut out = StyledLine::default();
    let mut rest = line;

    while !rest.is_empty() {
        if *in_block {
            let Some((_, close)) = syntax.block_comment else {
                *in_block = false;
                continue;
            };
            match rest.find(close) {
                Some(pos) => {
                    out.push(&rest[..pos + close.len()], Tag::Comment);
                    rest = &rest[pos + close.len()..];
                    *in_block = false;
                }
                None => {
                    out.push(rest, Tag::Comment);
                    rest = "";
                }
            }
            continue;
        }

        if let Some(marker) = syntax.line_comment
            && rest.starts_with(marker)
        {
            out.push(rest, Tag::Comment);
            break;
        }
        if let Some((open, _)) = syntax.block_comment
            && rest.starts_with(open)
        {
            out.push(open, Tag::Comment);
            rest = &rest[open.len()..];
            *in_block = true;
            continue;
        }

        let Some(c) = rest.chars().next() else {
            break;
        };

        if syntax.quotes.contains(&c) {
            let len = string_len(rest, c);
            out.push(&rest[..len], Tag::Str);
            rest = &rest[len..];
        } else if c.is_ascii_digit() {
            let len = rest
                .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '.' || ch == '_'))
                .unwrap_or(rest.len());
            out.push(&rest[..len], Tag::Number);
            rest = &rest[len..];
        } else if c.is_alphabetic() || c == '_' {
            let len = rest
                .find(|ch: char| !(ch.is_alphanumeric() || ch == '_'))
                .unwrap_or(rest.len());
            let word = &rest[..len];
            let tag = if syntax.keywords.contains(&word) {
                Tag::Keyword
            } else {
                Tag::Plain
            };
            out.push(word, tag);
            rest = &rest[len..];
        } else {
            out.push(c.to_string(), Tag::Plain);
            rest = &rest[c.len_utf8()..];
        }
    }
    out
}

/// Byte length of a quoted string starting at `rest`, up to the closing quote or end of line.
fn string_len(rest: &str, quote: char) -> usize {
    let mut escaped = false;
    for (i, ch) in rest.char_indices().skip(1) {
        match ch {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            c if c == quote => return i + c.len_utf8(),
            _ => {}
        }
    }
    rest.len()
}

/// A rendered file split into pages.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    lines: Vec<StyledLine>,
}

/// One screenful of a [Document].
#[derive(Debug)]
pub struct Page<'a> {
    pub number: usize,
    pub total: usize,
    pub lines: &'a [StyledLine],
}

impl Document {
    /// Loads and renders `path`. Calling this again re-reads the file.
    pub fn open(path: &Path, renderer: &dyn ContentRenderer) -> FsResult<Self> {
        let file = TextFile::load(path)?;
        Ok(Self::from_text(path, file.text(), renderer))
    }

    pub fn from_text(path: &Path, text: &str, renderer: &dyn ContentRenderer) -> Self {
        Self {
            path: path.to_path_buf(),
            lines: renderer.render(DocKind::for_path(path), text),
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn lines(&self) -> &[StyledLine] {
        &self.lines
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn page_count(&self, height: usize) -> usize {
        self.lines.len().div_ceil(height.max(1)).max(1)
    }

    /// Lazily yields pages of `height` lines. Always yields at least one page.
    pub fn pages(&self, height: usize) -> impl Iterator<Item = Page<'_>> {
        let height = height.max(1);
        let total = self.page_count(height);
        (0..total).map(move |i| {
            let start = (i * height).min(self.lines.len());
            let end = (start + height).min(self.lines.len());
            Page {
                number: i + 1,
                total,
                lines: &self.lines[start..end],
            }
        })
    }

    /// Indices of lines containing `term`, case-insensitively.
    pub fn find(&self, term: &str) -> Vec<usize> {
        let needle = term.to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.text().to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error;
    use tempfile::tempdir;

    fn texts(lines: &[StyledLine]) -> Vec<String> {
        lines.iter().map(StyledLine::text).collect()
    }

    #[test]
    fn binary_content_is_rejected() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let nul = dir.path().join("a.bin");
        fs::write(&nul, b"abc\0def")?;
        let pdf = dir.path().join("doc.txt");
        fs::write(&pdf, b"%PDF-1.7 rest")?;
        let latin1 = dir.path().join("latin1.txt");
        fs::write(&latin1, [0x63, 0x61, 0x66, 0xE9])?;

        for p in [&nul, &pdf, &latin1] {
            assert!(matches!(TextFile::load(p), Err(FsError::DecodeError(_))));
        }
        Ok(())
    }

    #[test]
    fn bom_and_line_endings_are_reported() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let p = dir.path().join("win.txt");
        fs::write(&p, b"\xEF\xBB\xBFone\r\ntwo\r\n")?;
        let file = TextFile::load(&p)?;
        assert!(file.had_bom());
        assert!(file.uses_crlf());
        assert!(file.ends_with_newline());
        assert_eq!(file.lines(), ["one", "two"]);
        Ok(())
    }

    #[test]
    fn plain_markdown_keeps_structure_markers() {
        let md = "# Title\n## Sub\n### Deep\n- item\n```rust\nlet x = 1;\n```\n*em* stays";
        let lines = PlainRenderer.render_markdown(md);
        assert_eq!(
            texts(&lines),
            [
                "== TITLE ==",
                "-- Sub --",
                "# Deep",
                "* item",
                "+-- code (rust) --+",
                "| let x = 1;",
                "+--+",
                "*em* stays",
            ]
        );
    }

    #[test]
    fn rich_markdown_tags_inline_spans() {
        let lines = RichRenderer.render_markdown("use **bold** and `code` or _em_ in snake_case_name");
        let segs = lines[0].segments();
        assert!(segs.iter().any(|s| s.tag == Tag::Strong && s.text == "bold"));
        assert!(segs.iter().any(|s| s.tag == Tag::Code && s.text == "code"));
        assert!(segs.iter().any(|s| s.tag == Tag::Emphasis && s.text == "em"));
        assert!(lines[0].text().ends_with("snake_case_name"));
    }

    #[test]
    fn malformed_markdown_degrades_to_text() {
        let md = "```python\nprint('never closed')\n**unbalanced and *open";
        for renderer in [&RichRenderer as &dyn ContentRenderer, &PlainRenderer] {
            let lines = renderer.render_markdown(md);
            assert_eq!(lines.len(), 3);
            assert_eq!(lines[2].text(), "**unbalanced and *open");
        }
    }

    #[test]
    fn rich_fence_is_framed() {
        let lines = RichRenderer.render_markdown("```sh\necho hi\n```");
        assert_eq!(lines.len(), 3);
        assert!(lines[0].text().starts_with("┌─ code (sh)"));
        assert_eq!(lines[1].segments()[1], Segment::new("echo hi", Tag::Code));
        assert!(lines[2].text().starts_with('└'));
    }

    #[test]
    fn source_tokens_are_tagged() {
        let lines = RichRenderer.render_source(
            "fn main() { let s = \"hi // not\"; } // done\n/* open\nstill */ 42",
            &RUST,
        );
        let first = lines[0].segments();
        assert_eq!(first[0], Segment::new("fn", Tag::Keyword));
        assert!(first.iter().any(|s| s.tag == Tag::Str && s.text == "\"hi // not\""));
        assert_eq!(first.last().map(|s| s.tag), Some(Tag::Comment));
        assert_eq!(lines[1].segments()[0].tag, Tag::Comment);
        assert!(lines[2].segments().iter().any(|s| s.tag == Tag::Number && s.text == "42"));
        assert_eq!(lines[0].text(), "fn main() { let s = \"hi // not\"; } // done");
    }

    #[test]
    fn pages_cover_every_line_once() {
        let text: String = (0..23).map(|i| format!("line {}\n", i)).collect();
        let doc = Document::from_text(Path::new("a.txt"), &text, &PlainRenderer);
        let pages: Vec<_> = doc.pages(10).collect();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[2].lines.len(), 3);
        assert_eq!(pages[1].number, 2);
        assert_eq!(pages.iter().map(|p| p.lines.len()).sum::<usize>(), 23);

        let empty = Document::from_text(Path::new("e.txt"), "", &PlainRenderer);
        assert_eq!(empty.pages(10).count(), 1);
    }

    #[test]
    fn search_is_case_insensitive() {
        let doc = Document::from_text(Path::new("a.txt"), "Alpha\nbeta\nALPHABET", &PlainRenderer);
        assert_eq!(doc.find("alpha"), [0, 2]);
        assert!(doc.find("").is_empty());
    }

    #[test]
    fn capability_check() {
        assert!(rich_supported(256, false, false));
        assert!(!rich_supported(2, false, false));
        assert!(!rich_supported(256, true, false));
        assert!(!rich_supported(256, false, true));
    }

    #[test]
    fn only_rich_renderer_styles() {
        let strategies: [&dyn ContentRenderer; 2] = [&RichRenderer, &PlainRenderer];
        let rich: Vec<bool> = strategies.iter().map(|r| r.is_rich()).collect();
        assert_eq!(rich, [true, false]);
    }

    #[test]
    fn kind_from_extension() {
        assert!(matches!(DocKind::for_path(Path::new("README.MD")), DocKind::Markdown));
        assert!(matches!(DocKind::for_path(Path::new("main.rs")), DocKind::Source(_)));
        assert!(matches!(DocKind::for_path(Path::new("notes")), DocKind::Text));
    }
}
