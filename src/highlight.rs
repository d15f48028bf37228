//! Render snippet code to a small standalone HTML document.
//!
//! The markup mirrors the classic highlighter output: a `div.highlight`
//! wrapper carrying style and language classes, a `pre` with the escaped
//! source, and an optional line-number gutter. Styling is left to a
//! stylesheet keyed on those classes.

pub fn escape(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    for c in code.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render(code: &str, language: &str, style: &str, linenos: bool) -> String {
    let mut body = String::new();
    if linenos {
        let width = code.lines().count().max(1).to_string().len();
        for (i, line) in code.lines().enumerate() {
            body.push_str(&format!(
                "<span class=\"lineno\">{:>width$}</span> {}\n",
                i + 1,
                escape(line),
            ));
        }
    } else {
        body = escape(code);
        if !body.ends_with('\n') {
            body.push('\n');
        }
    }

    format!(
        "<div class=\"highlight {style}\"><pre><code class=\"language-{language}\">{body}</code></pre></div>\n"
    )
}
