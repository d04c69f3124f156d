//! Helpers deriving task fields from the open message.

use std::sync::OnceLock;

use htmd::options::{BulletListMarker, CodeBlockStyle, HeadingStyle, Options};
use htmd::HtmlToMarkdown;
use regex::Regex;
use tracing::warn;

use crate::ports::MessageContext;

const DEEPLINK_BASE: &str = "https://outlook.office.com/mail/deeplink/message/";

/// Deep link that reopens the message in the web mail client.
#[must_use]
pub fn message_url(item_id: &str) -> String {
    format!("{DEEPLINK_BASE}{item_id}")
}

/// Default task title: the sender upper-cased, a dash, then the subject.
#[must_use]
pub fn default_title(message: &MessageContext) -> String {
    format!("{} - {}", message.sender.to_uppercase(), message.subject)
}

/// Renders the markdown details header followed by the message body.
///
/// Missing sender, recipients or subject are replaced by placeholders.
#[must_use]
pub fn format_details(message: &MessageContext, recipients: &[String], content: &str) -> String {
    let sender = non_empty(&message.sender).unwrap_or("Unknown");
    let subject = non_empty(&message.subject).unwrap_or("No subject");
    let to = if recipients.is_empty() { "No recipients".to_string() } else { recipients.join(", ") };
    let date = message.created_at.format("%Y-%m-%d %H:%M UTC");

    format!(
        "## Email Details\n**From:** {sender}\n**To:** {to}\n**Subject:** {subject}\n**Date:** {date}\n\n---\n\n## Email Content\n\n{}",
        tidy_body(content)
    )
}

/// Trims trailing whitespace per line and collapses runs of blank lines to one.
#[must_use]
pub fn tidy_body(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut blank_run = 0;
    for line in content.trim().lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(line);
    }
    out
}

/// Converts an HTML message body to markdown.
///
/// Style, script and comment markup is dropped and `&nbsp;` becomes a plain
/// space before conversion. Headings are `#`-prefixed and bullets use `-`;
/// `<pre>` becomes a fenced block. If conversion fails the HTML is returned
/// as is.
#[must_use]
pub fn html_to_markdown(html: &str) -> String {
    let cleaned = noise_regex().replace_all(html, "").replace("&nbsp;", " ");
    match converter().convert(&cleaned) {
        Ok(markdown) => tidy_body(&markdown),
        Err(e) => {
            warn!(error = %e, "Failed to convert HTML body, keeping it as is");
            html.to_string()
        }
    }
}

fn noise_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?is)<style[^>]*>.*?</style>|<script[^>]*>.*?</script>|<!--.*?-->")
            .expect("noise pattern should compile")
    })
}

fn converter() -> HtmlToMarkdown {
    HtmlToMarkdown::builder()
        .options(Options {
            heading_style: HeadingStyle::Atx,
            bullet_list_marker: BulletListMarker::Dash,
            code_block_style: CodeBlockStyle::Fenced,
            ..Options::default()
        })
        .build()
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}
