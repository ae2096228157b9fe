use criterion::{criterion_group, criterion_main, Criterion};
use keylayout::config::{DeviceProfile, LayoutConstants};
use keylayout::coordinator::LayoutCoordinator;
use keylayout::engine::LayoutEngine;
use keylayout::geometry::Frame;
use keylayout::layouts::{KnownKeyboard, LETTERS_PAGE, NUMBERS_PAGE};
use keylayout::model::ShiftState;
use keylayout::surface::HeadlessSurface;
use std::hint::black_box;
use std::sync::Arc;

fn criterion_benchmark(c: &mut Criterion) {
    let keyboard = Arc::new(KnownKeyboard::Qwerty.build());
    let bounds = Frame::new(0.0, 0.0, 375.0, 216.0);
    let engine = LayoutEngine::new(LayoutConstants::default(), DeviceProfile::default());

    c.bench_function("compute_frames (qwerty letters)", |b| {
        b.iter(|| engine.compute_frames(black_box(&keyboard), black_box(bounds), LETTERS_PAGE))
    });

    let mut coordinator = LayoutCoordinator::new(
        keyboard.clone(),
        HeadlessSurface::new(bounds),
        LayoutConstants::default(),
        false,
        false,
    );
    let mut page = LETTERS_PAGE;

    c.bench_function("layout_keys (page switch)", |b| {
        b.iter(|| {
            page = if page == LETTERS_PAGE { NUMBERS_PAGE } else { LETTERS_PAGE };
            coordinator.layout_keys(black_box(page), false, false, ShiftState::Disabled)
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
