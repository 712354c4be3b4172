//! Text renderers for annotated unit sequences.
//!
//! Container formats with native ruby support consume [`AnnotatedUnit`]s
//! directly. The renderers here cover the plain-text cases: inline HTML ruby
//! and the two bracketed fallbacks.
//!
//! # Examples
//!
//! ```
//! use furigana::render::{HtmlRuby, Parenthetical, render};
//! use furigana::splice::AnnotatedUnit;
//!
//! let units = vec![
//!     AnnotatedUnit::RubyPair {
//!         base: "漢".to_string(),
//!         reading: "かん".to_string(),
//!         base_formatting: (),
//!         reading_formatting: (),
//!     },
//!     AnnotatedUnit::plain("です", ()),
//! ];
//! assert_eq!(render(&HtmlRuby, &units), "<ruby>漢<rt>かん</rt></ruby>です");
//! assert_eq!(render(&Parenthetical, &units), "漢(かん)です");
//! ```

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::FuriganaError;
use crate::splice::AnnotatedUnit;

lazy_static! {
    static ref RUBY_MARKUP: Regex = Regex::new(r"(?is)<ruby\b[^>]*>.*?</ruby\s*>").unwrap();
}

/// True if `text` already carries inline `<ruby>` markup.
pub fn has_ruby_markup(text: &str) -> bool {
    RUBY_MARKUP.is_match(text)
}

/// Writes annotated units as text.
pub trait Renderer: Send + Sync {
    /// Append one ruby pair.
    fn write_ruby(&self, out: &mut String, base: &str, reading: &str);

    /// Append unannotated text.
    fn write_plain(&self, out: &mut String, text: &str) {
        out.push_str(text);
    }

    /// Get the name of this renderer.
    fn name(&self) -> &'static str;
}

/// Render a unit sequence to a string.
pub fn render<H>(renderer: &dyn Renderer, units: &[AnnotatedUnit<H>]) -> String {
    let mut out = String::new();
    for unit in units {
        match unit {
            AnnotatedUnit::PlainText { text, .. } => renderer.write_plain(&mut out, text),
            AnnotatedUnit::RubyPair { base, reading, .. } => renderer.write_ruby(&mut out, base, reading),
        }
    }
    out
}

/// `<ruby>漢<rt>かん</rt></ruby>`
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlRuby;

impl Renderer for HtmlRuby {
    fn write_ruby(&self, out: &mut String, base: &str, reading: &str) {
        out.push_str("<ruby>");
        escape_html_into(out, base);
        out.push_str("<rt>");
        escape_html_into(out, reading);
        out.push_str("</rt></ruby>");
    }

    /// Plain text is copied verbatim. Input lines may already be HTML
    /// (`<p>` around the Japanese text) and that markup must survive; only
    /// the text placed inside the generated `<ruby>` element is escaped.
    fn write_plain(&self, out: &mut String, text: &str) {
        out.push_str(text);
    }

    fn name(&self) -> &'static str {
        "html"
    }
}

/// `漢(かん)`
#[derive(Clone, Copy, Debug, Default)]
pub struct Parenthetical;

impl Renderer for Parenthetical {
    fn write_ruby(&self, out: &mut String, base: &str, reading: &str) {
        out.push_str(base);
        out.push('(');
        out.push_str(reading);
        out.push(')');
    }

    fn name(&self) -> &'static str {
        "paren"
    }
}

/// `漢[かん]`
#[derive(Clone, Copy, Debug, Default)]
pub struct Bracket;

impl Renderer for Bracket {
    fn write_ruby(&self, out: &mut String, base: &str, reading: &str) {
        out.push_str(base);
        out.push('[');
        out.push_str(reading);
        out.push(']');
    }

    fn name(&self) -> &'static str {
        "bracket"
    }
}

fn escape_html_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// The available renderers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    #[default]
    Html,
    Paren,
    Bracket,
}

impl RenderStyle {
    pub fn renderer(&self) -> Box<dyn Renderer> {
        match self {
            RenderStyle::Html => Box::new(HtmlRuby),
            RenderStyle::Paren => Box::new(Parenthetical),
            RenderStyle::Bracket => Box::new(Bracket),
        }
    }
}

impl fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.renderer().name())
    }
}

impl FromStr for RenderStyle {
    type Err = FuriganaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(RenderStyle::Html),
            "paren" | "parenthetical" => Ok(RenderStyle::Paren),
            "bracket" => Ok(RenderStyle::Bracket),
            other => Err(FuriganaError::invalid_argument(format!(
                "Unknown render style '{other}' (expected html, paren or bracket)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<AnnotatedUnit<()>> {
        vec![
            AnnotatedUnit::plain("「", ()),
            AnnotatedUnit::RubyPair {
                base: "寿司".to_string(),
                reading: "すし".to_string(),
                base_formatting: (),
                reading_formatting: (),
            },
            AnnotatedUnit::plain("」", ()),
        ]
    }

    #[test]
    fn test_renderers() {
        let units = sample();
        assert_eq!(render(&HtmlRuby, &units), "「<ruby>寿司<rt>すし</rt></ruby>」");
        assert_eq!(render(&Parenthetical, &units), "「寿司(すし)」");
        assert_eq!(render(&Bracket, &units), "「寿司[すし]」");
    }

    #[test]
    fn test_html_escapes_reading() {
        let mut out = String::new();
        HtmlRuby.write_ruby(&mut out, "A&B", "<x>");
        assert_eq!(out, "<ruby>A&amp;B<rt>&lt;x&gt;</rt></ruby>");
    }

    #[test]
    fn test_html_keeps_surrounding_markup() {
        let units = vec![
            AnnotatedUnit::plain("<p>", ()),
            AnnotatedUnit::RubyPair {
                base: "寿司".to_string(),
                reading: "すし".to_string(),
                base_formatting: (),
                reading_formatting: (),
            },
            AnnotatedUnit::plain(" &amp; お茶</p>", ()),
        ];
        assert_eq!(
            render(&HtmlRuby, &units),
            "<p><ruby>寿司<rt>すし</rt></ruby> &amp; お茶</p>"
        );
    }

    #[test]
    fn test_has_ruby_markup() {
        assert!(has_ruby_markup("<ruby>漢<rt>かん</rt></ruby>字"));
        assert!(has_ruby_markup("<RUBY class=\"x\">漢\n<rt>かん</rt></RUBY>"));
        assert!(!has_ruby_markup("漢字(かんじ)"));
        assert!(!has_ruby_markup("<rubyx>漢</rubyx>"));
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("HTML".parse::<RenderStyle>().unwrap(), RenderStyle::Html);
        assert_eq!("paren".parse::<RenderStyle>().unwrap(), RenderStyle::Paren);
        assert_eq!("bracket".parse::<RenderStyle>().unwrap(), RenderStyle::Bracket);
        assert!("xml".parse::<RenderStyle>().is_err());
        assert_eq!(RenderStyle::Bracket.to_string(), "bracket");
    }
}
