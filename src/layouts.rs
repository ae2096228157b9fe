use crate::model::{KeyDef, KeyType, Keyboard, KeyboardBuilder};
use std::collections::HashMap;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum KnownKeyboard {
    Qwerty,
    Qwertz,
    Azerty,
}

pub const LETTERS_PAGE: usize = 0;
pub const NUMBERS_PAGE: usize = 1;
pub const SYMBOLS_PAGE: usize = 2;

impl KnownKeyboard {
    /// Letter rows, top to bottom. The last row sits between shift and backspace.
    pub fn letter_rows(&self) -> [&'static str; 3] {
        match self {
            Self::Qwerty => ["qwertyuiop", "asdfghjkl", "zxcvbnm"],
            Self::Qwertz => ["qwertzuiop", "asdfghjkl", "yxcvbnm"],
            // Azerty carries ten letters on the home row and an apostrophe on the bottom row
            Self::Azerty => ["azertyuiop", "qsdfghjklm", "wxcvbn'"],
        }
    }

    pub fn build(&self) -> Keyboard {
        let mut builder = Keyboard::builder(&self.to_string());
        builder
            .name_page(LETTERS_PAGE, "letters")
            .name_page(NUMBERS_PAGE, "numbers")
            .name_page(SYMBOLS_PAGE, "symbols");

        let [top, home, bottom] = self.letter_rows();
        builder.add_row(top.chars().map(letter).collect(), LETTERS_PAGE);
        builder.add_row(home.chars().map(letter).collect(), LETTERS_PAGE);

        let mut shift_row = vec![KeyDef::new(KeyType::Shift)];
        shift_row.extend(bottom.chars().map(letter));
        shift_row.push(KeyDef::new(KeyType::Backspace));
        builder.add_row(shift_row, LETTERS_PAGE);
        builder.add_row(bottom_row("123", NUMBERS_PAGE), LETTERS_PAGE);

        add_symbol_page(
            &mut builder,
            NUMBERS_PAGE,
            ["1234567890", "-/:;()$&@\""],
            ("#+=", SYMBOLS_PAGE),
        );
        add_symbol_page(
            &mut builder,
            SYMBOLS_PAGE,
            ["[]{}#%^*+=", "_\\|~<>€£¥•"],
            ("123", NUMBERS_PAGE),
        );

        builder.build()
    }
}

fn letter(c: char) -> KeyDef {
    if c.is_alphabetic() {
        KeyDef::character(&c.to_string())
    } else {
        KeyDef::special_character(&c.to_string())
    }
}

fn symbol(c: char) -> KeyDef {
    KeyDef::special_character(&c.to_string())
}

fn bottom_row(mode_label: &str, mode_page: usize) -> Vec<KeyDef> {
    vec![
        KeyDef::mode_change(mode_label, mode_page),
        KeyDef::new(KeyType::KeyboardChange),
        KeyDef::new(KeyType::Space).with_output(" ").with_cap("space"),
        KeyDef::new(KeyType::Return).with_output("\n").with_cap("return"),
    ]
}

fn add_symbol_page(
    builder: &mut KeyboardBuilder,
    page: usize,
    rows: [&str; 2],
    (alt_label, alt_page): (&str, usize),
) {
    for row in rows {
        builder.add_row(row.chars().map(symbol).collect(), page);
    }

    let mut punctuation = vec![KeyDef::mode_change(alt_label, alt_page)];
    punctuation.push(KeyDef::new(KeyType::Period).with_output("."));
    punctuation.extend(",?!'".chars().map(symbol));
    punctuation.push(KeyDef::new(KeyType::Backspace));
    builder.add_row(punctuation, page);

    builder.add_row(bottom_row("ABC", LETTERS_PAGE), page);
}

pub fn get_all_keyboards() -> HashMap<KnownKeyboard, Keyboard> {
    let mut map = HashMap::new();
    for known in KnownKeyboard::iter() {
        map.insert(known, known.build());
    }
    map
}
