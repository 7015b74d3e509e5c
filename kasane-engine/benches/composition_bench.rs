//! Benchmarks for composition insertion throughput
//!
//! Run with: cargo bench

use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kasane_engine::{Composition, CompositionInput, Table, Transliterator};

const SENTENCE: &str = "watashihamainichigakkouheitte,tomodachitohanashimasu.";

fn bench_insert(c: &mut Criterion) {
    let table = Arc::clone(Table::shared_default());

    c.bench_function("type_sentence_at_end", |b| {
        b.iter(|| {
            let mut composition = Composition::new(Arc::clone(&table));
            composition.set_input_transliterator(Transliterator::Hiragana);
            let mut pos = 0;
            for ch in black_box(SENTENCE).chars() {
                pos = composition
                    .insert_input(pos, CompositionInput::from_raw(ch.to_string(), false));
            }
            composition.get_string()
        })
    });

    c.bench_function("type_then_edit_middle", |b| {
        b.iter(|| {
            let mut composition = Composition::new(Arc::clone(&table));
            composition.set_input_transliterator(Transliterator::Hiragana);
            let mut pos = 0;
            for ch in black_box("kakikukeko").chars() {
                pos = composition
                    .insert_input(pos, CompositionInput::from_raw(ch.to_string(), false));
            }
            for _ in 0..3 {
                composition.insert_input(2, CompositionInput::from_raw("a", false));
                composition.delete_at(2);
            }
            composition.get_string()
        })
    });

    c.bench_function("lookup_heavy_prefixes", |b| {
        let table = Table::shared_default();
        b.iter(|| {
            let mut hits = 0usize;
            for query in ["k", "ky", "kya", "n", "nn", "ch", "chi", "xtsu", "zzz"] {
                let looked = table.lookup(black_box(query));
                if looked.rule.is_some() || looked.has_longer_prefix {
                    hits += 1;
                }
            }
            hits
        })
    });
}

criterion_group!(benches, bench_insert);
criterion_main!(benches);
