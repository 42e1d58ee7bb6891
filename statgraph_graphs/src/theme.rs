// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading a [`Theme`] from JSON.

use hashbrown::HashSet;
use peniko::Color;
use serde_json::{Map, Value};
use statgraph_charts::Theme;

use crate::error::{Error, Result};

/// Keys a theme object must define.
pub const THEME_KEYS: [&str; 9] = [
    "background",
    "f_high",
    "f_med",
    "f_low",
    "f_inv",
    "b_high",
    "b_med",
    "b_low",
    "b_inv",
];

/// Parses a theme from JSON text.
pub fn parse_theme(json: &str) -> Result<Theme> {
    let value: Value = serde_json::from_str(json)?;
    theme_from_value(&value)
}

/// Builds a theme from a JSON object of `#RGB`/`#RRGGBB` strings.
///
/// Every absent or `null` key is reported at once through [`Error::ThemeIncomplete`];
/// a malformed color fails with [`Error::InvalidThemeColor`].
pub fn theme_from_value(value: &Value) -> Result<Theme> {
    let empty = Map::new();
    let object = value.as_object().unwrap_or(&empty);

    let known: HashSet<&str> = THEME_KEYS.into_iter().collect();
    for key in object.keys().filter(|k| !known.contains(k.as_str())) {
        tracing::debug!(key = %key, "ignoring unknown theme key");
    }

    let missing: Vec<String> = THEME_KEYS
        .iter()
        .filter(|key| object.get(**key).is_none_or(Value::is_null))
        .map(|key| (*key).to_owned())
        .collect();
    if !missing.is_empty() {
        return Err(Error::ThemeIncomplete { missing });
    }

    let color = |key: &str| -> Result<Color> {
        let value = object.get(key).unwrap_or(&Value::Null);
        value
            .as_str()
            .and_then(parse_hex)
            .ok_or_else(|| Error::InvalidThemeColor {
                key: key.to_owned(),
                value: match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            })
    };

    Ok(Theme {
        background: color("background")?,
        f_high: color("f_high")?,
        f_med: color("f_med")?,
        f_low: color("f_low")?,
        f_inv: color("f_inv")?,
        b_high: color("b_high")?,
        b_med: color("b_med")?,
        b_low: color("b_low")?,
        b_inv: color("b_inv")?,
    })
}

/// Parses `#RGB` or `#RRGGBB`, case-insensitively.
pub fn parse_hex(value: &str) -> Option<Color> {
    let digits = value.strip_prefix('#')?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let hex = |range: core::ops::Range<usize>| u8::from_str_radix(digits.get(range)?, 16).ok();
    match digits.len() {
        3 => {
            let (r, g, b) = (hex(0..1)?, hex(1..2)?, hex(2..3)?);
            Some(Color::from_rgb8(r * 17, g * 17, b * 17))
        }
        6 => Some(Color::from_rgb8(hex(0..2)?, hex(2..4)?, hex(4..6)?)),
        _ => None,
    }
}
