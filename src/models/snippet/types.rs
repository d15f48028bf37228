use serde::{Deserialize, Serialize};

/// Languages the highlighter knows how to label.
pub const LANGUAGE_CHOICES: &[&str] = &[
    "c", "cpp", "css", "go", "html", "java", "javascript", "json", "markdown",
    "python", "ruby", "rust", "shell", "sql", "text", "yaml",
];

/// Stylesheet families for the rendered markup.
pub const STYLE_CHOICES: &[&str] = &[
    "autumn", "colorful", "default", "emacs", "friendly", "monokai", "vim",
];

pub const DEFAULT_LANGUAGE: &str = "python";
pub const DEFAULT_STYLE: &str = "friendly";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub code: String,
    pub linenos: bool,
    pub language: String,
    pub style: String,
    pub highlighted: String,
    pub owner_id: i64,
    pub created: String,
}

/// Snippet as serialized by the API; `owner` is the owning username and the
/// stored `highlighted` document is exposed through its own endpoint.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SnippetPayload {
    pub id: i64,
    pub title: String,
    pub code: String,
    pub linenos: bool,
    pub language: String,
    pub style: String,
    pub owner: String,
    pub created: String,
}

/// Create/update request body. Only `code` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct SnippetInput {
    #[serde(default)]
    pub title: String,
    pub code: String,
    #[serde(default)]
    pub linenos: bool,
    pub language: Option<String>,
    pub style: Option<String>,
}
