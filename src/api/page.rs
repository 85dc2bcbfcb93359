use lazy_static::lazy_static;

use crate::languages;

const TEMPLATE: &str = include_str!("../../templates/index.html");
const OPTIONS_PLACEHOLDER: &str = "{{ language_options }}";

lazy_static! {
    static ref INDEX_HTML: String = render(TEMPLATE);
}

/// The front-end page with the language table filled in.
pub fn index_html() -> &'static str {
    INDEX_HTML.as_str()
}

fn render(template: &str) -> String {
    template.replace(OPTIONS_PLACEHOLDER, &language_options())
}

fn language_options() -> String {
    languages::ordered()
        .map(|(code, name)| {
            format!(
                "<option value=\"{}\">{}</option>",
                escape_html(code),
                escape_html(name)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
