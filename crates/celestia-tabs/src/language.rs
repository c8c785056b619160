//! Language resolution
//!
//! Maps a document name to the language tag handed to the editing widget.
//! ```text
//! lua         -> lua
//! js, jsx     -> javascript
//! ts, tsx     -> typescript
//! json, html, css
//! md          -> markdown
//! py          -> python
//! (other)     -> plaintext
//! (no dot)    -> lua
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Lua,
    JavaScript,
    TypeScript,
    Json,
    Html,
    Css,
    Markdown,
    Python,
    PlainText,
}

impl Language {
    /// Resolve the language for a document name.
    ///
    /// Names without any extension are scripts, so they resolve to Lua rather
    /// than plain text.
    pub fn from_name(name: &str) -> Self {
        match name.rsplit_once('.') {
            Some((_, ext)) => Self::from_extension(ext),
            None => Language::Lua,
        }
    }

    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "lua" => Language::Lua,
            "js" | "jsx" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "json" => Language::Json,
            "html" => Language::Html,
            "css" => Language::Css,
            "md" => Language::Markdown,
            "py" => Language::Python,
            _ => Language::PlainText,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Lua => "lua",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Json => "json",
            Language::Html => "html",
            Language::Css => "css",
            Language::Markdown => "markdown",
            Language::Python => "python",
            Language::PlainText => "plaintext",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lua" => Ok(Language::Lua),
            "javascript" => Ok(Language::JavaScript),
            "typescript" => Ok(Language::TypeScript),
            "json" => Ok(Language::Json),
            "html" => Ok(Language::Html),
            "css" => Ok(Language::Css),
            "markdown" => Ok(Language::Markdown),
            "python" => Ok(Language::Python),
            "plaintext" => Ok(Language::PlainText),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}
