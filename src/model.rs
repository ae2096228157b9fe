use crate::error::{LayoutError, LayoutResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::warn;

/// Position the special row falls back to for its flexible key when no
/// space key exists.
pub const DEFAULT_SPACE_INDEX: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyId(pub u32);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    Character,
    SpecialCharacter,
    Period,
    Space,
    Return,
    Shift,
    Backspace,
    ModeChange,
    KeyboardChange,
    Other,
}

impl KeyType {
    /// Typable keys that belong in a character run.
    pub fn is_character(self) -> bool {
        matches!(
            self,
            KeyType::Character | KeyType::SpecialCharacter | KeyType::Period
        )
    }
}

/// A key as written in a keyboard definition, before it has an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyDef {
    #[serde(rename = "type")]
    pub kind: KeyType,
    #[serde(default)]
    pub lowercase_keycap: Option<String>,
    #[serde(default)]
    pub uppercase_keycap: Option<String>,
    #[serde(default)]
    pub lowercase_output: Option<String>,
    #[serde(default)]
    pub uppercase_output: Option<String>,
    #[serde(default)]
    pub to_mode: Option<usize>,
}

impl KeyDef {
    pub fn new(kind: KeyType) -> Self {
        Self {
            kind,
            lowercase_keycap: None,
            uppercase_keycap: None,
            lowercase_output: None,
            uppercase_output: None,
            to_mode: None,
        }
    }

    /// A letter key: lowercase and uppercase caps and outputs derived from `letter`.
    pub fn character(letter: &str) -> Self {
        Self::new(KeyType::Character).with_letter(letter)
    }

    /// A non-letter typable key whose cap and output never change with case.
    pub fn special_character(symbol: &str) -> Self {
        Self::new(KeyType::SpecialCharacter).with_output(symbol)
    }

    pub fn mode_change(label: &str, to_mode: usize) -> Self {
        let mut def = Self::new(KeyType::ModeChange).with_cap(label);
        def.to_mode = Some(to_mode);
        def
    }

    pub fn with_letter(mut self, letter: &str) -> Self {
        self.lowercase_keycap = Some(letter.to_lowercase());
        self.uppercase_keycap = Some(letter.to_uppercase());
        self.lowercase_output = Some(letter.to_lowercase());
        self.uppercase_output = Some(letter.to_uppercase());
        self
    }

    pub fn with_output(mut self, output: &str) -> Self {
        self.lowercase_keycap = Some(output.to_string());
        self.uppercase_keycap = Some(output.to_string());
        self.lowercase_output = Some(output.to_string());
        self.uppercase_output = Some(output.to_string());
        self
    }

    /// Sets the visible label only; output stays untouched.
    pub fn with_cap(mut self, label: &str) -> Self {
        self.lowercase_keycap = Some(label.to_string());
        self.uppercase_keycap = Some(label.to_string());
        self
    }
}

/// An immutable key with a keyboard-wide identity. Two keys are equal iff
/// they are the same logical key, regardless of their caps.
#[derive(Debug, Clone, Serialize)]
pub struct Key {
    pub id: KeyId,
    pub kind: KeyType,
    pub lowercase_keycap: Option<String>,
    pub uppercase_keycap: Option<String>,
    pub lowercase_output: Option<String>,
    pub uppercase_output: Option<String>,
    pub to_mode: Option<usize>,
}

impl Key {
    fn from_def(id: KeyId, def: KeyDef) -> Self {
        Self {
            id,
            kind: def.kind,
            lowercase_keycap: def.lowercase_keycap,
            uppercase_keycap: def.uppercase_keycap,
            lowercase_output: def.lowercase_output,
            uppercase_output: def.uppercase_output,
            to_mode: def.to_mode,
        }
    }

    pub fn is_character(&self) -> bool {
        self.kind.is_character()
    }

    pub fn keycap_for_case(&self, uppercase: bool) -> Option<&str> {
        if uppercase {
            self.uppercase_keycap
                .as_deref()
                .or(self.lowercase_keycap.as_deref())
        } else {
            self.lowercase_keycap
                .as_deref()
                .or(self.uppercase_keycap.as_deref())
        }
    }

    pub fn output_for_case(&self, uppercase: bool) -> &str {
        let output = if uppercase {
            self.uppercase_output
                .as_deref()
                .or(self.lowercase_output.as_deref())
        } else {
            self.lowercase_output
                .as_deref()
                .or(self.uppercase_output.as_deref())
        };
        output.unwrap_or("")
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Which row layout algorithm a row uses. Derived from the row's shape once,
/// when the keyboard is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowKind {
    /// Only typable characters: uniform width, centered.
    Character,
    /// Flexible end keys around a character run (shift ... backspace).
    DoubleSided,
    /// Sized by area ratios around a flexible key (space, return, mode change).
    Special { space_index: usize },
}

impl RowKind {
    pub fn classify(keys: &[Key]) -> Self {
        if keys.first().is_some_and(Key::is_character) {
            RowKind::Character
        } else if keys.len() >= 3 && !keys[0].is_character() && keys[1].is_character() {
            RowKind::DoubleSided
        } else {
            let space_index = match keys.iter().position(|k| k.kind == KeyType::Space) {
                Some(i) => i,
                None => {
                    let fallback = DEFAULT_SPACE_INDEX.min(keys.len().saturating_sub(1));
                    warn!(
                        "Special row has no space key; using key {} as the flexible key",
                        fallback
                    );
                    fallback
                }
            };
            RowKind::Special { space_index }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Row {
    pub keys: Vec<Key>,
    pub kind: RowKind,
}

impl Row {
    fn new(keys: Vec<Key>) -> Self {
        let kind = RowKind::classify(&keys);
        Self { keys, kind }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub name: Option<String>,
    pub rows: Vec<Row>,
}

impl Page {
    pub fn most_keys_in_row(&self) -> usize {
        self.rows.iter().map(Row::len).max().unwrap_or(0)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.rows.iter().flat_map(|r| r.keys.iter())
    }
}

/// Immutable keyboard model: pages of rows of keys.
#[derive(Debug, Clone, Serialize)]
pub struct Keyboard {
    pub name: String,
    pub pages: Vec<Page>,
    // KeyId -> (page, row, column)
    #[serde(skip)]
    positions: Vec<(usize, usize, usize)>,
}

impl Keyboard {
    pub fn builder(name: &str) -> KeyboardBuilder {
        KeyboardBuilder::new(name)
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn key(&self, id: KeyId) -> Option<&Key> {
        let &(p, r, c) = self.positions.get(id.0 as usize)?;
        Some(&self.pages[p].rows[r].keys[c])
    }

    /// Page, row and column of a key.
    pub fn position(&self, id: KeyId) -> Option<(usize, usize, usize)> {
        self.positions.get(id.0 as usize).copied()
    }

    pub fn key_count(&self) -> usize {
        self.positions.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.pages.iter().flat_map(Page::keys)
    }
}

#[derive(Debug, Default)]
struct PageDraft {
    name: Option<String>,
    rows: Vec<Vec<KeyDef>>,
}

/// Collects keys by page and row; [`build`](KeyboardBuilder::build) freezes
/// the model, assigns identities and classifies every row.
#[derive(Debug, Default)]
pub struct KeyboardBuilder {
    name: String,
    pages: Vec<PageDraft>,
}

impl KeyboardBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            pages: Vec::new(),
        }
    }

    pub fn name_page(&mut self, page: usize, name: &str) -> &mut Self {
        self.ensure(page, 0);
        self.pages[page].name = Some(name.to_string());
        self
    }

    pub fn add_key(&mut self, key: KeyDef, row: usize, page: usize) -> &mut Self {
        self.ensure(page, row + 1);
        self.pages[page].rows[row].push(key);
        self
    }

    pub fn add_row(&mut self, keys: Vec<KeyDef>, page: usize) -> &mut Self {
        self.ensure(page, 0);
        self.pages[page].rows.push(keys);
        self
    }

    fn ensure(&mut self, page: usize, rows: usize) {
        if self.pages.len() <= page {
            self.pages.resize_with(page + 1, PageDraft::default);
        }
        let draft = &mut self.pages[page];
        if draft.rows.len() < rows {
            draft.rows.resize_with(rows, Vec::new);
        }
    }

    pub fn build(self) -> Keyboard {
        let mut positions = Vec::new();
        let mut pages = Vec::with_capacity(self.pages.len());

        for (p, draft) in self.pages.into_iter().enumerate() {
            let mut rows = Vec::with_capacity(draft.rows.len());
            for (r, defs) in draft.rows.into_iter().enumerate() {
                let keys = defs
                    .into_iter()
                    .enumerate()
                    .map(|(c, def)| {
                        let id = KeyId(positions.len() as u32);
                        positions.push((p, r, c));
                        Key::from_def(id, def)
                    })
                    .collect();
                rows.push(Row::new(keys));
            }
            pages.push(Page {
                name: draft.name,
                rows,
            });
        }

        Keyboard {
            name: self.name,
            pages,
            positions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDefinition {
    #[serde(default)]
    pub name: Option<String>,
    pub rows: Vec<Vec<KeyDef>>,
}

/// JSON form of a keyboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardDefinition {
    pub name: String,
    pub pages: Vec<PageDefinition>,
}

impl KeyboardDefinition {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LayoutResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> LayoutResult<Self> {
        let def: KeyboardDefinition = serde_json::from_str(content)?;
        def.validate()?;
        Ok(def)
    }

    pub fn validate(&self) -> LayoutResult<()> {
        if self.pages.is_empty() {
            return Err(LayoutError::Validation(format!(
                "Keyboard '{}' has no pages",
                self.name
            )));
        }

        for (p, page) in self.pages.iter().enumerate() {
            if page.rows.is_empty() {
                return Err(LayoutError::Validation(format!("Page {} has no rows", p)));
            }
            for (r, row) in page.rows.iter().enumerate() {
                if row.is_empty() {
                    return Err(LayoutError::Validation(format!(
                        "Page {} row {} is empty",
                        p, r
                    )));
                }
                for key in row {
                    if let Some(to) = key.to_mode {
                        if to >= self.pages.len() {
                            return Err(LayoutError::Validation(format!(
                                "Page {} row {}: mode change targets missing page {}",
                                p, r, to
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn into_keyboard(self) -> Keyboard {
        let mut builder = KeyboardBuilder::new(&self.name);
        for (p, page) in self.pages.into_iter().enumerate() {
            if let Some(name) = &page.name {
                builder.name_page(p, name);
            }
            for row in page.rows {
                builder.add_row(row, p);
            }
        }
        builder.build()
    }
}

/// Shift key state as seen by the key caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ShiftState {
    #[default]
    Disabled,
    Enabled,
    Locked,
}

impl ShiftState {
    pub fn uppercase(self) -> bool {
        matches!(self, ShiftState::Enabled | ShiftState::Locked)
    }
}
