use std::collections::HashMap;

use crate::error::Error;
use crate::model::{LevelFormat, NumberingDefinition, NumberingLevel};

/// Deepest list level WordprocessingML can express.
pub const MAX_LEVEL: u8 = 8;

/// Label produced for one list item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListLabel {
    pub text: String,
    /// Counter value; always 0 for bullet levels.
    pub ordinal: u32,
}

/// Counters per (definition, level), advanced in document order.
///
/// Counters are never reset: reusing a definition in a second, physically
/// separate list continues the sequence where the first list stopped.
pub struct NumberingEngine<'a> {
    definitions: &'a [NumberingDefinition],
    counters: HashMap<(&'a str, u8), u32>,
}

impl<'a> NumberingEngine<'a> {
    pub fn new(definitions: &'a [NumberingDefinition]) -> Self {
        NumberingEngine { definitions, counters: HashMap::new() }
    }

    fn find(&self, reference: &str, level: u8) -> Result<(&'a NumberingDefinition, &'a NumberingLevel), Error> {
        let unknown = || Error::UnknownNumbering { reference: reference.to_string(), level };
        let def = self
            .definitions
            .iter()
            .find(|d| d.reference == reference)
            .ok_or_else(unknown)?;
        let lvl = def.level(level).ok_or_else(unknown)?;
        Ok((def, lvl))
    }

    /// Every reference must be unique and every level within `0..=MAX_LEVEL`.
    /// Errors point at the definition as `numbering[i]`.
    pub fn validate(&self) -> Result<(), Error> {
        for (i, def) in self.definitions.iter().enumerate() {
            let result = if self.definitions[..i].iter().any(|d| d.reference == def.reference) {
                Err(Error::DuplicateNumbering(def.reference.clone()))
            } else if let Some(lvl) = def.levels.iter().find(|l| l.level > MAX_LEVEL) {
                Err(Error::LevelOutOfRange { reference: def.reference.clone(), level: lvl.level })
            } else {
                Ok(())
            };
            result.map_err(|e| e.at(&format!("numbering[{i}]")))?;
        }
        Ok(())
    }

    /// Check a reference without advancing anything.
    pub fn check(&self, reference: &str, level: u8) -> Result<(), Error> {
        self.find(reference, level).map(|_| ())
    }

    pub fn next(&mut self, reference: &str, level: u8) -> Result<ListLabel, Error> {
        let (def, lvl) = self.find(reference, level)?;
        if lvl.format == LevelFormat::Bullet {
            return Ok(ListLabel { text: lvl.text.clone(), ordinal: 0 });
        }

        let key = (def.reference.as_str(), level);
        let ordinal = match self.counters.get(&key) {
            Some(count) => count.checked_add(1).ok_or_else(|| Error::CounterOverflow {
                reference: reference.to_string(),
                level,
            })?,
            None => lvl.start,
        };
        self.counters.insert(key, ordinal);

        Ok(ListLabel {
            text: self.render(def, lvl, ordinal),
            ordinal,
        })
    }

    /// Substitute `%N` with the counter of level N-1, formatted per that level.
    fn render(&self, def: &NumberingDefinition, current: &NumberingLevel, ordinal: u32) -> String {
        let mut text = current.text.clone();
        for n in (1..=9u8).rev() {
            let placeholder = format!("%{n}");
            if !text.contains(&placeholder) {
                continue;
            }
            let level = n - 1;
            let value = if level == current.level {
                format_ordinal(current.format, ordinal)
            } else {
                let other = def.level(level);
                let count = self
                    .counters
                    .get(&(def.reference.as_str(), level))
                    .copied()
                    .or(other.map(|l| l.start))
                    .unwrap_or(1);
                format_ordinal(other.map_or(LevelFormat::Decimal, |l| l.format), count)
            };
            text = text.replace(&placeholder, &value);
        }
        text
    }
}

pub(crate) fn format_ordinal(format: LevelFormat, n: u32) -> String {
    match format {
        LevelFormat::Bullet | LevelFormat::Decimal => n.to_string(),
        LevelFormat::LowerLetter => to_letters(n),
        LevelFormat::UpperLetter => to_letters(n).to_uppercase(),
        LevelFormat::LowerRoman => to_roman(n).to_lowercase(),
        LevelFormat::UpperRoman => to_roman(n),
    }
}

// a..z, aa..zz, aaa.. as word processors repeat the letter
fn to_letters(n: u32) -> String {
    if n == 0 {
        return String::new();
    }
    let letter = (b'a' + ((n - 1) % 26) as u8) as char;
    let repeat = ((n - 1) / 26 + 1) as usize;
    std::iter::repeat_n(letter, repeat).collect()
}

fn to_roman(mut n: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (value, glyph) in TABLE {
        while n >= value {
            out.push_str(glyph);
            n -= value;
        }
    }
    out
}
