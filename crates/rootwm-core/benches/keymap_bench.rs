//! Criterion benchmarks for key resolution on the dispatch hot path.
//!
//! Measures base-keysym lookup in the keymap table and matching against the
//! binding table; both run once per key press.
//!
//! Run with:
//! ```bash
//! cargo bench --package rootwm-core --bench keymap_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rootwm_core::keymap::{KEYCODE_COUNT, MAX_KEYCODE, MIN_KEYCODE};
use rootwm_core::{KeyBindings, KeyMapTable, KeySym, ModifierMask};

/// Key codes of a typical burst of presses (letters, BackSpace, modifiers).
const BENCH_CODES: &[u8] = &[22, 24, 25, 26, 27, 28, 37, 38, 50, 64, 65, 105, 133];

fn bench_table() -> KeyMapTable {
    let stride = 4u8;
    let flat = (MIN_KEYCODE..=MAX_KEYCODE)
        .flat_map(|code| (0..u32::from(stride)).map(move |level| KeySym((u32::from(code) << 4) | level)))
        .collect::<Vec<_>>();
    debug_assert_eq!(flat.len(), usize::from(KEYCODE_COUNT) * usize::from(stride));
    KeyMapTable::from_reply(stride, flat).expect("bench table")
}

fn bench_keymap_lookup(c: &mut Criterion) {
    let table = bench_table();
    let mut group = c.benchmark_group("keymap_lookup");

    group.bench_function("base_symbol_single", |b| {
        b.iter(|| table.base_symbol(black_box(22)))
    });

    group.bench_function("base_symbol_batch_13", |b| {
        b.iter(|| {
            BENCH_CODES
                .iter()
                .filter_map(|&code| table.base_symbol(black_box(code)))
                .count()
        })
    });

    group.bench_function("symbols_for_reserved", |b| {
        b.iter(|| table.symbols_for(black_box(3)).len())
    });

    group.finish();
}

fn bench_binding_match(c: &mut Criterion) {
    let bindings = KeyBindings::default();
    let mut group = c.benchmark_group("binding_match");

    group.bench_function("quit_hit", |b| {
        b.iter(|| {
            bindings.matches(
                black_box(KeySym::BACKSPACE),
                black_box(ModifierMask::CONTROL | ModifierMask::MOD1),
            )
        })
    });

    group.bench_function("plain_letter_miss", |b| {
        b.iter(|| bindings.matches(black_box(KeySym(0x0061)), black_box(ModifierMask::NONE)))
    });

    group.finish();
}

criterion_group!(benches, bench_keymap_lookup, bench_binding_match);
criterion_main!(benches);
