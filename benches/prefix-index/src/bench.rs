//! Benches of the prefix index over synthetic qualified names.

use divan::Bencher;
use lectern_index::PrefixIndex;

fn main() {
    // Run registered benchmarks.
    divan::main();
}

/// Names shaped like `Mod3::Class12#method7`, sharing long prefixes.
fn names(count: usize) -> Vec<String> {
    (0..count)
        .map(|idx| format!("Mod{}::Class{}#method{}", idx % 10, idx % 100, idx))
        .collect()
}

fn build(names: &[String]) -> PrefixIndex<usize> {
    let mut index = PrefixIndex::new();
    for (idx, name) in names.iter().enumerate() {
        index.insert(name, idx);
    }
    index
}

// Checks insertion performance, which splits edges on divergence
#[divan::bench(args = [1_000, 10_000])]
fn insert(bencher: Bencher, count: usize) {
    let names = names(count);
    bencher.bench_local(|| build(&names));
}

// Checks search performance of a prefix matching about a tenth of the keys
#[divan::bench(args = [1_000, 10_000])]
fn search_namespace(bencher: Bencher, count: usize) {
    let index = build(&names(count));
    bencher.bench_local(|| index.search("Mod3::").len());
}

// Checks lookup performance of exact keys
#[divan::bench(args = [1_000, 10_000])]
fn get(bencher: Bencher, count: usize) {
    let names = names(count);
    let index = build(&names);
    bencher.bench_local(|| names.iter().filter(|name| index.contains_key(name)).count());
}

// Checks deletion performance, which prunes emptied branches
#[divan::bench(args = [1_000, 10_000])]
fn delete(bencher: Bencher, count: usize) {
    let names = names(count);
    bencher
        .with_inputs(|| build(&names))
        .bench_local_values(|mut index| {
            for name in &names {
                index.delete(name);
            }
            index
        });
}
