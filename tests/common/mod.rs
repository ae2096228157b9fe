#![allow(dead_code)]

use keylayout::config::{DeviceProfile, LayoutConstants};
use keylayout::coordinator::LayoutCoordinator;
use keylayout::engine::{KeyFrames, LayoutEngine};
use keylayout::geometry::Frame;
use keylayout::layouts::KnownKeyboard;
use keylayout::model::{KeyDef, KeyId, KeyType, Keyboard};
use keylayout::surface::HeadlessSurface;
use std::sync::Arc;

pub const PHONE_PORTRAIT: Frame = Frame::new(0.0, 0.0, 375.0, 216.0);
pub const PHONE_LANDSCAPE: Frame = Frame::new(0.0, 0.0, 812.0, 375.0);

pub fn engine() -> LayoutEngine {
    LayoutEngine::new(LayoutConstants::default(), DeviceProfile::default())
}

pub fn pad_engine() -> LayoutEngine {
    let device = DeviceProfile {
        is_pad: true,
        screen_width: 768.0,
        ..DeviceProfile::default()
    };
    LayoutEngine::new(LayoutConstants::default(), device)
}

/// One page: ten letters, shift + nine letters + backspace, 123 + space + return.
pub fn three_row_keyboard() -> Keyboard {
    let mut builder = Keyboard::builder("three_row");
    builder.add_row("abcdefghij".chars().map(letter).collect(), 0);

    let mut middle = vec![KeyDef::new(KeyType::Shift)];
    middle.extend("klmnopqrs".chars().map(letter));
    middle.push(KeyDef::new(KeyType::Backspace));
    builder.add_row(middle, 0);

    builder.add_row(
        vec![
            KeyDef::mode_change("123", 0),
            KeyDef::new(KeyType::Space).with_output(" ").with_cap("space"),
            KeyDef::new(KeyType::Return).with_output("\n").with_cap("return"),
        ],
        0,
    );
    builder.build()
}

pub fn qwerty() -> Keyboard {
    KnownKeyboard::Qwerty.build()
}

pub fn letter(c: char) -> KeyDef {
    KeyDef::character(&c.to_string())
}

/// Frames of one row, in key order.
pub fn row_frames(keyboard: &Keyboard, frames: &KeyFrames, page: usize, row: usize) -> Vec<Frame> {
    keyboard.pages[page].rows[row]
        .keys
        .iter()
        .filter_map(|k| frames.get(k.id))
        .collect()
}

/// Id of the first key on `page` whose lowercase cap is `cap`.
pub fn key_with_cap(keyboard: &Keyboard, page: usize, cap: &str) -> KeyId {
    keyboard.pages[page]
        .keys()
        .find(|k| k.lowercase_keycap.as_deref() == Some(cap))
        .map(|k| k.id)
        .unwrap_or_else(|| panic!("no key '{}' on page {}", cap, page))
}

pub fn key_of_type(keyboard: &Keyboard, page: usize, kind: KeyType) -> KeyId {
    keyboard.pages[page]
        .keys()
        .find(|k| k.kind == kind)
        .map(|k| k.id)
        .unwrap_or_else(|| panic!("no {} key on page {}", kind, page))
}

pub fn coordinator(keyboard: Keyboard, bounds: Frame) -> LayoutCoordinator<HeadlessSurface> {
    LayoutCoordinator::new(
        Arc::new(keyboard),
        HeadlessSurface::new(bounds),
        LayoutConstants::default(),
        false,
        false,
    )
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
