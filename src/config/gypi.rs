//! Normalisation of gyp include files (`.gypi`) into JSON text.
//!
//! A generated `config.gypi` is a Python literal: `#` comments and
//! single-quoted strings. Stripping the former and swapping the quote style
//! turns it into JSON that [`serde_json`] can read.

/// Convert gypi text to JSON text.
///
/// Everything from a `#` to the end of its line is dropped, then every single
/// quote becomes a double quote. Quotes inside values are not escaped, which
/// matches what the configure script emits.
#[must_use]
pub fn to_json(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let code = line.split_once('#').map_or(line, |(code, _)| code);
        out.push_str(code);
        out.push('\n');
    }
    out.replace('\'', "\"")
}
