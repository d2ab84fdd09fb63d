//! Catalog extraction and cross-validation.
//!
//! Every entry states its color three times: an `RGB: r,g,b` literal, a
//! `HEX: #rrggbb` literal and the swatch's inline background color. The RGB
//! literal is authoritative; disagreement from the other two is reported as a
//! [`Warning`] and never stops the run. Structural problems (missing container,
//! labels or patterns) are fatal [`ExtractError`]s.

use std::{collections::HashMap, fmt, sync::LazyLock};

use regex::{Captures, Regex};
use tracing::debug;

use crate::{
    color::{Decoded, Rgb, decode_hex},
    document::{Document, Element},
    error::ExtractError,
    romanize::{RomanizationOverrides, default_key},
};

/// Identifier of the element that holds every entry.
pub const COLOR_LIST_ID: &str = "colorList";

static RGB_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"RGB: (\d+),(\d+),(\d+)").expect("valid RGB literal pattern"));
static HEX_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"HEX: (#[0-9a-f]{6})").expect("valid HEX literal pattern"));
static SWATCH_RGB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"rgb\((\d+),\s*(\d+),\s*(\d+)\)").expect("valid swatch color pattern")
});

/// One named color of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorEntry {
    /// Display name, e.g. `銀紅`.
    pub name: String,
    /// Latin identifier used as lookup key and stylesheet variable name.
    pub romanized_key: String,
    /// Color as stated by the `RGB:` literal.
    pub rgb: Rgb,
    /// Color as stated by the `HEX:` literal, `#` included.
    pub hex: String,
}

/// Advisory findings raised while extracting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The swatch background differs from the RGB literal.
    RgbMismatch {
        /// Entry name.
        name: String,
        /// RGB literal.
        rgb: Rgb,
        /// Swatch background color.
        box_rgb: Rgb,
    },
    /// The HEX literal does not decode to the RGB literal.
    HexMismatch {
        /// Entry name.
        name: String,
        /// RGB literal.
        rgb: Rgb,
        /// HEX literal.
        hex: String,
        /// Decoded HEX literal, `None` when it is not a color.
        decoded: Option<Rgb>,
    },
    /// The default key of `name` was already taken by `previous`.
    KeyConflict {
        /// Name that first claimed the key.
        previous: String,
        /// Name whose default key collided.
        name: String,
    },
    /// Two names resolved to the same final key; the later one wins in the
    /// keyed table.
    DuplicateKey {
        /// Shared key.
        key: String,
        /// Name that first claimed the key.
        previous: String,
        /// Name that claimed it again.
        name: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::RgbMismatch { name, rgb, box_rgb } => {
                write!(f, "name={name} rgb_literal({rgb})!=background_color({box_rgb})")
            }
            Warning::HexMismatch {
                name,
                rgb,
                hex,
                decoded,
            } => write!(
                f,
                "name={name} rgb_literal=({rgb})!=hex({hex}={})",
                Decoded(*decoded)
            ),
            Warning::KeyConflict { previous, name } => {
                write!(f, "Conflict pinyin {previous} / {name}")
            }
            Warning::DuplicateKey {
                key,
                previous,
                name,
            } => write!(f, "Duplicate resolved pinyin {key}: {previous} / {name}"),
        }
    }
}

/// Result of a successful extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Entries in document order.
    pub entries: Vec<ColorEntry>,
    /// Validation findings in the order they were raised.
    pub warnings: Vec<Warning>,
}

/// The three labeled children of one entry block.
struct EntryNodes {
    name_label: Element,
    swatch: Element,
    value_label: Element,
}

impl EntryNodes {
    fn locate(index: usize, block: &Element) -> Result<Self, ExtractError> {
        let child = |tag: &str, class: &str| {
            block.find(tag, class).ok_or_else(|| {
                ExtractError::malformed(index, format!("missing <{tag} class=\"{class}\">"))
            })
        };
        Ok(Self {
            name_label: child("dt", "colorName")?,
            swatch: child("dd", "colorBox")?,
            value_label: child("dd", "colorValue")?,
        })
    }
}

/// Extract every entry of `document`, validating and keying each one.
///
/// Keys come from `overrides` when the name is curated there, else from
/// [`default_key`]. Collisions are detected on the default key against the
/// keys already resolved, then on the resolved key itself.
pub fn extract(
    document: &Document,
    overrides: &RomanizationOverrides,
) -> Result<Extraction, ExtractError> {
    let list = document
        .element_by_id(COLOR_LIST_ID)
        .ok_or_else(|| ExtractError::MissingContainer {
            id: COLOR_LIST_ID.into(),
        })?;

    let mut extraction = Extraction::default();
    // resolved key -> name that claimed it
    let mut seen: HashMap<String, String> = HashMap::new();

    for (index, block) in list.descendants().filter(|el| el.tag() == "dl").enumerate() {
        let nodes = EntryNodes::locate(index, &block)?;

        let name = nodes.name_label.text().trim().to_owned();
        let value = nodes.value_label.text();
        let rgb = RGB_LITERAL
            .captures(&value)
            .ok_or_else(|| {
                ExtractError::malformed(index, format!("no `RGB: r,g,b` in {value:?}"))
            })
            .and_then(|caps| triple(index, &caps))?;
        let hex = HEX_LITERAL
            .captures(&value)
            .map(|caps| caps[1].to_owned())
            .ok_or_else(|| {
                ExtractError::malformed(index, format!("no `HEX: #rrggbb` in {value:?}"))
            })?;

        let style = nodes
            .swatch
            .attr("style")
            .ok_or_else(|| ExtractError::malformed(index, "swatch has no style attribute"))?;
        let box_rgb = SWATCH_RGB
            .captures(&style)
            .ok_or_else(|| {
                ExtractError::malformed(index, format!("no rgb(r, g, b) in {style:?}"))
            })
            .and_then(|caps| triple(index, &caps))?;

        if rgb != box_rgb {
            extraction.warnings.push(Warning::RgbMismatch {
                name: name.clone(),
                rgb,
                box_rgb,
            });
        }
        let decoded = decode_hex(&hex);
        if decoded != Some(rgb) {
            extraction.warnings.push(Warning::HexMismatch {
                name: name.clone(),
                rgb,
                hex: hex.clone(),
                decoded,
            });
        }

        let default = default_key(&name);
        let conflict = seen.get(&default).cloned();
        if let Some(previous) = &conflict {
            extraction.warnings.push(Warning::KeyConflict {
                previous: previous.clone(),
                name: name.clone(),
            });
        }

        let key = overrides.resolve(&name, &default).to_owned();
        if conflict.is_none() {
            if let Some(previous) = seen.get(&key) {
                extraction.warnings.push(Warning::DuplicateKey {
                    key: key.clone(),
                    previous: previous.clone(),
                    name: name.clone(),
                });
            }
        }
        seen.insert(key.clone(), name.clone());

        debug!(%name, %key, %hex, "extracted color entry");
        extraction.entries.push(ColorEntry {
            name,
            romanized_key: key,
            rgb,
            hex,
        });
    }

    Ok(extraction)
}

fn triple(index: usize, caps: &Captures<'_>) -> Result<Rgb, ExtractError> {
    let channel = |group: usize| {
        caps[group].parse::<u8>().map_err(|_| {
            let component = &caps[group];
            ExtractError::malformed(index, format!("color component {component} exceeds 255"))
        })
    };
    Ok(Rgb::new(channel(1)?, channel(2)?, channel(3)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// `(name, swatch style, value label text)`
    type Block<'a> = (&'a str, &'a str, &'a str);

    fn catalog(blocks: &[Block<'_>]) -> Document {
        let mut html = String::from("<html><body><div id=\"colorList\">\n");
        for (name, style, value) in blocks {
            html.push_str(&format!(
                "<dl>\n  <dt class=\"colorName\">{name}</dt>\n  \
                 <dd class=\"colorBox\" style=\"{style}\"></dd>\n  \
                 <dd class=\"colorValue\">{value}</dd>\n</dl>\n"
            ));
        }
        html.push_str("</div></body></html>");
        Document::parse(&html).unwrap()
    }

    fn run(blocks: &[Block<'_>]) -> Extraction {
        extract(&catalog(blocks), &RomanizationOverrides::default()).unwrap()
    }

    #[test]
    fn extracts_entries_in_document_order() {
        let extraction = run(&[
            (
                " 紅 ",
                "background-color: rgb(255, 0, 0)",
                "CMYK: 0,100,100,0<br>RGB: 255,0,0<br>HEX: #ff0000",
            ),
            (
                "銀紅",
                "background-color: rgb(240,86,84)",
                "RGB: 240,86,84 HEX: #f05654",
            ),
        ]);

        assert!(extraction.warnings.is_empty());
        assert_eq!(
            extraction.entries,
            vec![
                ColorEntry {
                    name: "紅".into(),
                    romanized_key: "hong".into(),
                    rgb: Rgb::new(255, 0, 0),
                    hex: "#ff0000".into(),
                },
                ColorEntry {
                    name: "銀紅".into(),
                    romanized_key: "yinhong2".into(),
                    rgb: Rgb::new(240, 86, 84),
                    hex: "#f05654".into(),
                },
            ]
        );
    }

    #[test]
    fn swatch_mismatch_is_reported_and_entry_kept() {
        let extraction = run(&[(
            "紅",
            "background-color: rgb(254, 0, 0)",
            "RGB: 255,0,0 HEX: #ff0000",
        )]);

        let messages: Vec<String> =
            extraction.warnings.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec!["name=紅 rgb_literal([255, 0, 0])!=background_color([254, 0, 0])"]
        );
        assert_eq!(extraction.entries[0].rgb, Rgb::new(255, 0, 0));
        assert_eq!(extraction.entries[0].hex, "#ff0000");
    }

    #[test]
    fn hex_mismatch_is_reported() {
        let extraction = run(&[(
            "紅",
            "background-color: rgb(255, 0, 0)",
            "RGB: 255,0,0 HEX: #fe0000",
        )]);

        let messages: Vec<String> =
            extraction.warnings.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec!["name=紅 rgb_literal=([255, 0, 0])!=hex(#fe0000=[254, 0, 0])"]
        );
    }

    #[test]
    fn uncurated_collision_shares_one_key() {
        let extraction = run(&[
            ("紅", "rgb(255, 0, 0)", "RGB: 255,0,0 HEX: #ff0000"),
            ("紅", "rgb(1, 2, 3)", "RGB: 1,2,3 HEX: #010203"),
        ]);

        assert_eq!(
            extraction.warnings,
            vec![Warning::KeyConflict {
                previous: "紅".into(),
                name: "紅".into(),
            }]
        );
        assert_eq!(extraction.entries.len(), 2);
        assert!(
            extraction
                .entries
                .iter()
                .all(|entry| entry.romanized_key == "hong")
        );
    }

    #[test]
    fn curated_names_do_not_conflict_with_each_other() {
        let extraction = run(&[
            ("殷紅", "rgb(190, 0, 47)", "RGB: 190,0,47 HEX: #be002f"),
            ("銀紅", "rgb(240, 86, 84)", "RGB: 240,86,84 HEX: #f05654"),
        ]);

        assert!(extraction.warnings.is_empty());
        let keys: Vec<&str> = extraction
            .entries
            .iter()
            .map(|entry| entry.romanized_key.as_str())
            .collect();
        assert_eq!(keys, vec!["yinhong1", "yinhong2"]);
    }

    #[test]
    fn default_key_conflicts_with_earlier_override() {
        let overrides: RomanizationOverrides = [("紅", "lan")].into_iter().collect();
        let document = catalog(&[
            ("紅", "rgb(255, 0, 0)", "RGB: 255,0,0 HEX: #ff0000"),
            ("藍", "rgb(0, 0, 255)", "RGB: 0,0,255 HEX: #0000ff"),
        ]);

        let extraction = extract(&document, &overrides).unwrap();
        // the default key of 藍 collides with the resolved key of 紅
        assert_eq!(
            extraction.warnings,
            vec![Warning::KeyConflict {
                previous: "紅".into(),
                name: "藍".into(),
            }]
        );
    }

    #[test]
    fn duplicate_resolved_key_is_surfaced() {
        let overrides: RomanizationOverrides = [("藍", "hong")].into_iter().collect();
        let document = catalog(&[
            ("紅", "rgb(255, 0, 0)", "RGB: 255,0,0 HEX: #ff0000"),
            ("藍", "rgb(0, 0, 255)", "RGB: 0,0,255 HEX: #0000ff"),
        ]);

        let extraction = extract(&document, &overrides).unwrap();
        assert_eq!(
            extraction
                .warnings
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            vec!["Duplicate resolved pinyin hong: 紅 / 藍"]
        );
    }

    #[test]
    fn missing_container_is_fatal() {
        let document =
            Document::parse("<html><body><div id=\"other\"></div></body></html>").unwrap();
        let err = extract(&document, &RomanizationOverrides::default()).unwrap_err();
        assert!(matches!(err, ExtractError::MissingContainer { .. }));
    }

    #[test]
    fn empty_container_yields_no_entries() {
        let extraction = run(&[]);
        assert_eq!(extraction, Extraction::default());
    }

    #[test]
    fn missing_label_is_fatal() {
        let document = Document::parse(
            "<div id=\"colorList\"><dl><dt class=\"colorName\">紅</dt>\
             <dd class=\"colorValue\">RGB: 255,0,0 HEX: #ff0000</dd></dl></div>",
        )
        .unwrap();
        let err = extract(&document, &RomanizationOverrides::default()).unwrap_err();
        assert!(
            matches!(err, ExtractError::MalformedEntry { index: 0, ref reason }
                if reason.contains("colorBox"))
        );
    }

    #[test]
    fn unmatched_value_pattern_is_fatal() {
        let document = catalog(&[("紅", "rgb(255, 0, 0)", "RGB: 255,0,0 HEX: #FF0000")]);
        let err = extract(&document, &RomanizationOverrides::default()).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedEntry { index: 0, .. }));

        let document = catalog(&[("紅", "rgb(255, 0, 0)", "RGB: 256,0,0 HEX: #ff0000")]);
        let err = extract(&document, &RomanizationOverrides::default()).unwrap_err();
        assert!(err.to_string().contains("256"));
    }

    #[test]
    fn extraction_is_deterministic() {
        let blocks = [
            ("紅", "rgb(254, 0, 0)", "RGB: 255,0,0 HEX: #ff0000"),
            ("紅", "rgb(1, 2, 3)", "RGB: 1,2,3 HEX: #010203"),
        ];
        assert_eq!(run(&blocks), run(&blocks));
    }
}
