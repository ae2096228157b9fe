mod common;

use common::*;
use keylayout::appearance::Color;
use keylayout::geometry::{Direction, Frame, Point};
use keylayout::layouts::{LETTERS_PAGE, NUMBERS_PAGE};
use keylayout::model::{KeyType, ShiftState};
use keylayout::shapes::ShapeKind;

#[test]
fn test_first_pass_creates_every_view() {
    let mut c = coordinator(qwerty(), PHONE_PORTRAIT);
    let stats = c
        .layout_keys(LETTERS_PAGE, false, false, ShiftState::Disabled)
        .unwrap();

    assert_eq!(stats.keys, 32);
    assert_eq!(stats.created, 32);
    assert_eq!(stats.reused_exact, 0);
    assert_eq!(c.pool().len(), 32);
    assert_eq!(c.surface().view_count(), 32);
}

#[test]
fn test_relayout_reuses_exact_sizes() {
    let mut c = coordinator(qwerty(), PHONE_PORTRAIT);
    c.layout_keys(LETTERS_PAGE, false, false, ShiftState::Disabled);
    let stats = c
        .layout_keys(LETTERS_PAGE, false, false, ShiftState::Disabled)
        .unwrap();

    assert_eq!(stats.reused_exact, 32);
    assert_eq!(stats.reused_other, 0);
    assert_eq!(stats.created, 0);
}

#[test]
fn test_page_switch_recycles_views() {
    let mut c = coordinator(qwerty(), PHONE_PORTRAIT);
    c.layout_keys(LETTERS_PAGE, false, false, ShiftState::Disabled);
    let stats = c
        .layout_keys(NUMBERS_PAGE, false, false, ShiftState::Disabled)
        .unwrap();

    assert_eq!(stats.keys, 31);
    // two full character rows and the bottom row keep their sizes
    assert_eq!(stats.reused_exact, 24);
    assert_eq!(stats.reused_other, 7);
    assert_eq!(stats.created, 0);
    assert_eq!(c.pool().len(), 32);

    let leftovers: Vec<_> = c.pool().handles().filter(|h| c.pool().is_pooled(*h)).collect();
    assert_eq!(leftovers.len(), 1);
    for h in leftovers {
        assert_eq!(c.key_for_view(h), None);
        assert!(!c.view(h).unwrap().visible);
    }
}

#[test]
fn test_key_and_view_maps_agree() {
    let mut c = coordinator(qwerty(), PHONE_PORTRAIT);
    c.layout_keys(LETTERS_PAGE, false, false, ShiftState::Disabled);

    let keyboard = c.keyboard().clone();
    for key in keyboard.pages[LETTERS_PAGE].keys() {
        let handle = c.view_for_key(key.id).unwrap();
        assert_eq!(c.key_for_view(handle), Some(key.id));
        assert!(c.view(handle).unwrap().visible);
    }

    let other_page = keyboard.pages[NUMBERS_PAGE].keys().next().unwrap();
    assert_eq!(c.view_for_key(other_page.id), None);
}

#[test]
fn test_views_get_the_engine_frames() {
    let mut c = coordinator(qwerty(), PHONE_PORTRAIT);
    c.layout_keys(LETTERS_PAGE, false, false, ShiftState::Disabled);

    let keyboard = c.keyboard().clone();
    let frames = engine()
        .compute_frames(&keyboard, PHONE_PORTRAIT, LETTERS_PAGE)
        .unwrap();
    for (id, frame) in frames.iter() {
        let handle = c.view_for_key(id).unwrap();
        assert_eq!(c.view(handle).unwrap().frame, frame);
    }
}

#[test]
fn test_zero_bounds_leave_views_alone() {
    for bounds in [
        Frame::new(0.0, 0.0, 0.0, 216.0),
        Frame::new(0.0, 0.0, 375.0, -216.0),
    ] {
        let mut c = coordinator(qwerty(), bounds);
        assert!(c
            .layout_keys(LETTERS_PAGE, false, false, ShiftState::Disabled)
            .is_none());
        assert_eq!(c.pool().len(), 0);
        assert_eq!(c.surface().completed_batches(), 0);
    }
}

#[test]
fn test_layout_is_one_batch() {
    let mut c = coordinator(qwerty(), PHONE_PORTRAIT);
    c.layout_keys(LETTERS_PAGE, false, false, ShiftState::Disabled);

    let surface = c.surface();
    assert_eq!(surface.batch_depth(), 0);
    assert_eq!(surface.completed_batches(), 1);
    assert!(surface.max_batch_depth() >= 2);
    assert_eq!(surface.unbatched_writes(), 0);
    assert_eq!(surface.committed_views().count(), 32);
}

#[test]
fn test_explicit_batch_defers_commit() {
    let mut c = coordinator(qwerty(), PHONE_PORTRAIT);
    {
        let mut batch = c.batch();
        batch.layout_keys(LETTERS_PAGE, false, false, ShiftState::Disabled);
        batch.update_key_caps(false, true, true, ShiftState::Enabled);
        assert_eq!(batch.surface().completed_batches(), 0);
        assert_eq!(batch.surface().committed_views().count(), 0);
    }

    let keyboard = c.keyboard().clone();
    let q = key_with_cap(&keyboard, LETTERS_PAGE, "q");
    let handle = c.view_for_key(q).unwrap();
    assert_eq!(c.surface().completed_batches(), 1);
    assert_eq!(c.surface().committed(handle).unwrap().text, "Q");
}

#[test]
fn test_caps_follow_case() {
    let mut c = coordinator(qwerty(), PHONE_PORTRAIT);
    c.layout_keys(LETTERS_PAGE, false, false, ShiftState::Disabled);

    let keyboard = c.keyboard().clone();
    let q = c.view_for_key(key_with_cap(&keyboard, LETTERS_PAGE, "q")).unwrap();
    let mode = c.view_for_key(key_with_cap(&keyboard, LETTERS_PAGE, "123")).unwrap();
    let space = c.view_for_key(key_of_type(&keyboard, LETTERS_PAGE, KeyType::Space)).unwrap();

    assert_eq!(c.view(q).unwrap().text, "q");
    assert_eq!(c.view(mode).unwrap().text, "123");
    assert_eq!(c.view(space).unwrap().text, "space");

    // letters uppercase while the rest of the keyboard stays lowercase
    c.update_key_caps(false, false, true, ShiftState::Disabled);
    assert_eq!(c.view(q).unwrap().text, "Q");
    assert_eq!(c.view(mode).unwrap().text, "123");
}

#[test]
fn test_glyph_keys_share_shapes() {
    let mut c = coordinator(qwerty(), PHONE_PORTRAIT);
    c.layout_keys(LETTERS_PAGE, false, false, ShiftState::Disabled);

    let keyboard = c.keyboard().clone();
    let shift = c.view_for_key(key_of_type(&keyboard, LETTERS_PAGE, KeyType::Shift)).unwrap();
    let globe = c
        .view_for_key(key_of_type(&keyboard, LETTERS_PAGE, KeyType::KeyboardChange))
        .unwrap();

    let shift_view = c.view(shift).unwrap();
    assert_eq!(shift_view.shape.as_ref().unwrap().kind(), ShapeKind::Shift);
    assert!(shift_view.text.is_empty());
    assert_eq!(c.view(globe).unwrap().shape.as_ref().unwrap().kind(), ShapeKind::Globe);
    assert_eq!(c.shapes().len(), 3);

    c.layout_keys(NUMBERS_PAGE, false, false, ShiftState::Disabled);
    assert_eq!(c.shapes().len(), 3);
}

#[test]
fn test_shift_lock_highlights_and_locks() {
    let mut c = coordinator(qwerty(), PHONE_PORTRAIT);
    c.layout_keys(LETTERS_PAGE, true, true, ShiftState::Locked);

    let keyboard = c.keyboard().clone();
    let shift = c.view_for_key(key_of_type(&keyboard, LETTERS_PAGE, KeyType::Shift)).unwrap();
    let view = c.view(shift).unwrap();
    assert!(view.highlighted);
    assert!(view.shape.as_ref().unwrap().with_lock());

    c.update_key_caps(false, true, true, ShiftState::Enabled);
    let view = c.view(shift).unwrap();
    assert!(view.highlighted);
    assert!(!view.shape.as_ref().unwrap().with_lock());

    c.update_key_caps(false, false, false, ShiftState::Disabled);
    assert!(!c.view(shift).unwrap().highlighted);
}

#[test]
fn test_dark_and_solid_modes_recolor() {
    let mut c = coordinator(qwerty(), PHONE_PORTRAIT);
    c.layout_keys(LETTERS_PAGE, false, false, ShiftState::Disabled);

    let keyboard = c.keyboard().clone();
    let q = c.view_for_key(key_with_cap(&keyboard, LETTERS_PAGE, "q")).unwrap();
    assert_eq!(c.view(q).unwrap().appearance.color, Color::WHITE);

    c.set_dark_mode(true);
    c.update_key_appearance();
    assert_eq!(c.view(q).unwrap().appearance.color, Color::WHITE.with_alpha(0.3));

    c.set_solid_color_mode(true);
    c.update_key_appearance();
    assert_eq!(c.view(q).unwrap().appearance.color, Color::rgb8(83, 83, 83));
}

#[test]
fn test_popup_on_top_row_flips_down() {
    let mut c = coordinator(qwerty(), PHONE_PORTRAIT);
    c.layout_keys(LETTERS_PAGE, false, false, ShiftState::Disabled);

    let keyboard = c.keyboard().clone();
    let q = c.view_for_key(key_with_cap(&keyboard, LETTERS_PAGE, "q")).unwrap();
    let p = c.view_for_key(key_with_cap(&keyboard, LETTERS_PAGE, "p")).unwrap();
    let z = c.view_for_key(key_with_cap(&keyboard, LETTERS_PAGE, "z")).unwrap();

    let placed = c.will_show_popup(q, Direction::Up).unwrap();
    // clipped on the left: aligned with the key instead
    assert_eq!(placed.frame, Frame::new(3.0, 3.0, 57.5, 57.0));
    assert_eq!(placed.attached, Direction::Down);
    assert_eq!(c.view(q).unwrap().popup, Some(placed));

    let placed = c.will_show_popup(p, Direction::Up).unwrap();
    assert_eq!(placed.frame.max_x(), 372.0);

    let placed = c.will_show_popup(z, Direction::Up).unwrap();
    assert_eq!(placed.attached, Direction::Up);
    assert!(!placed.hide_direction_is_opposite);
    assert_eq!(placed.frame.y, 118.0 - 57.0 - 8.0);

    c.will_hide_popup(q);
    assert_eq!(c.view(q).unwrap().popup, None);

    c.layout_keys(LETTERS_PAGE, false, false, ShiftState::Disabled);
    assert_eq!(c.view(p).unwrap().popup, None);
}

#[test]
fn test_frame_for_popup_is_relative_to_key() {
    let mut c = coordinator(qwerty(), PHONE_PORTRAIT);
    c.layout_keys(LETTERS_PAGE, false, false, ShiftState::Disabled);

    let keyboard = c.keyboard().clone();
    let q = c.view_for_key(key_with_cap(&keyboard, LETTERS_PAGE, "q")).unwrap();
    let down = c.frame_for_popup(q, Direction::Down).unwrap();
    assert_eq!(down, Frame::new(-13.0, 51.0, 57.5, 57.0));
}

#[test]
fn test_nearest_key_resolves_gaps() {
    let mut c = coordinator(qwerty(), PHONE_PORTRAIT);
    c.layout_keys(LETTERS_PAGE, false, false, ShiftState::Disabled);

    let keyboard = c.keyboard().clone();
    let q = key_with_cap(&keyboard, LETTERS_PAGE, "q");
    let w = key_with_cap(&keyboard, LETTERS_PAGE, "w");

    assert_eq!(c.nearest_key(Point::new(10.0, 20.0)), Some(q));
    // gap between q (ends 34.5) and w (starts 40.5)
    assert_eq!(c.nearest_key(Point::new(36.0, 20.0)), Some(q));
    assert_eq!(c.nearest_key(Point::new(39.5, 20.0)), Some(w));
    // above the top row, inside the surface
    assert_eq!(c.nearest_key(Point::new(50.0, 2.0)), Some(w));
    assert_eq!(c.nearest_key(Point::new(400.0, 20.0)), None);
    assert_eq!(c.nearest_key(Point::new(-1.0, 20.0)), None);
}

#[test]
fn test_nearest_key_ignores_previous_page() {
    let mut c = coordinator(qwerty(), PHONE_PORTRAIT);
    c.layout_keys(LETTERS_PAGE, false, false, ShiftState::Disabled);
    c.layout_keys(NUMBERS_PAGE, false, false, ShiftState::Disabled);

    let keyboard = c.keyboard().clone();
    let one = key_with_cap(&keyboard, NUMBERS_PAGE, "1");
    assert_eq!(c.nearest_key(Point::new(10.0, 20.0)), Some(one));
}
