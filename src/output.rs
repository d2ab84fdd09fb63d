//! Serializers for the three generated artifacts.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use tracing::info;

use crate::extract::ColorEntry;

/// Romanized key -> hex table, ASCII-only JSON.
pub const PINYIN_TABLE_FILE: &str = "cht-colors-pinyin.json";
/// Display name -> hex table, JSON with literal non-ASCII names.
pub const NAME_TABLE_FILE: &str = "cht-colors.json";
/// Stylesheet variable declarations.
pub const STYLESHEET_FILE: &str = "cht-colors-pinyin.scss";

/// Romanized key -> hex, in order of first appearance. A repeated key keeps its
/// first position and takes the later hex.
pub fn pinyin_table(entries: &[ColorEntry]) -> IndexMap<&str, &str> {
    entries
        .iter()
        .map(|entry| (entry.romanized_key.as_str(), entry.hex.as_str()))
        .collect()
}

/// Display name -> hex, with the same ordering rules as [`pinyin_table`].
pub fn name_table(entries: &[ColorEntry]) -> IndexMap<&str, &str> {
    entries
        .iter()
        .map(|entry| (entry.name.as_str(), entry.hex.as_str()))
        .collect()
}

/// JSON text of [`pinyin_table`], every non-ASCII character escaped.
pub fn render_pinyin_table(entries: &[ColorEntry]) -> Result<String> {
    render_json(&pinyin_table(entries), AsciiFormatter::default())
}

/// JSON text of [`name_table`], non-ASCII characters kept literally.
pub fn render_name_table(entries: &[ColorEntry]) -> Result<String> {
    render_json(&name_table(entries), PrettyFormatter::with_indent(b"  "))
}

/// One `$KEY: #hex;` line per entry, in document order, without deduplication.
pub fn render_stylesheet_variables(entries: &[ColorEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("${}: {};\n", entry.romanized_key.to_uppercase(), entry.hex))
        .collect()
}

fn render_json<T: Serialize, F: Formatter>(value: &T, formatter: F) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(String::from_utf8(buf)?)
}

/// Write the three artifacts into `out_dir`, returning the written paths.
pub fn write_outputs(entries: &[ColorEntry], out_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    let artifacts = [
        (PINYIN_TABLE_FILE, render_pinyin_table(entries)?),
        (NAME_TABLE_FILE, render_name_table(entries)?),
        (STYLESHEET_FILE, render_stylesheet_variables(entries)),
    ];

    let mut written = Vec::with_capacity(artifacts.len());
    for (file_name, contents) in artifacts {
        let path = out_dir.join(file_name);
        fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), count = entries.len(), "wrote artifact");
        written.push(path);
    }
    Ok(written)
}

/// Two-space pretty printer that escapes every non-ASCII character as `\uXXXX`.
struct AsciiFormatter {
    pretty: PrettyFormatter<'static>,
}

impl Default for AsciiFormatter {
    fn default() -> Self {
        Self {
            pretty: PrettyFormatter::with_indent(b"  "),
        }
    }
}

impl Formatter for AsciiFormatter {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        for c in fragment.chars() {
            if c.is_ascii() {
                writer.write_all(&[c as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}
