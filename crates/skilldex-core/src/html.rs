//! Minimal HTML text helpers.
//!
//! Views build markup with `write!` into a `String`; every piece of data text
//! goes through [`Escaped`] first.

use std::fmt::{self, Write};

/// `Display` adapter that escapes on write, for use inside `format!`.
#[derive(Debug, Clone, Copy)]
pub struct Escaped<'a>(pub &'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut start = 0;
        for (i, c) in self.0.char_indices() {
            let entity = match c {
                '&' => "&amp;",
                '<' => "&lt;",
                '>' => "&gt;",
                '"' => "&quot;",
                '\'' => "&#39;",
                _ => continue,
            };
            f.write_str(&self.0[start..i])?;
            f.write_str(entity)?;
            start = i + c.len_utf8();
        }
        f.write_str(&self.0[start..])
    }
}

/// A `<p>` per item, each with an optional class.
pub fn paragraphs<'a>(out: &mut String, items: impl IntoIterator<Item = &'a str>, class: Option<&str>) {
    for item in items {
        match class {
            Some(class) => {
                let _ = write!(out, r#"<p class="{}">{}</p>"#, Escaped(class), Escaped(item));
            }
            None => {
                let _ = write!(out, "<p>{}</p>", Escaped(item));
            }
        }
    }
}
