use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ihash::{HashIndex, HashLink, Indexed, WordKey};

struct Node<'a> {
    key: i32,
    link: HashLink<'a, Node<'a>>,
}

impl<'a> Node<'a> {
    fn new(key: i32) -> Self {
        Self {
            key,
            link: HashLink::new(),
        }
    }
}

impl<'a> Indexed<'a> for Node<'a> {
    type Key = i32;
    fn key(&self) -> &i32 {
        &self.key
    }
    fn hash_link(&self) -> &HashLink<'a, Self> {
        &self.link
    }
}

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn pool<'a>(seed: u64, n: usize) -> Vec<Node<'a>> {
    lcg(seed).take(n).map(|x| Node::new(x as i32)).collect()
}

fn bench_insert_with_growth(c: &mut Criterion) {
    let nodes = pool(1, 10_000);
    c.bench_function("ihash_insert_10k", |b| {
        b.iter(|| {
            let mut idx = HashIndex::new(64, WordKey);
            for n in &nodes {
                idx.insert(n);
            }
            black_box(idx.len())
        })
    });
}

fn bench_find_hit(c: &mut Criterion) {
    let nodes = pool(7, 20_000);
    let mut idx = HashIndex::new(64, WordKey);
    for n in &nodes {
        idx.insert(n);
    }
    c.bench_function("ihash_find_hit", |b| {
        let mut it = nodes.iter().cycle();
        b.iter(|| {
            let n = it.next().unwrap();
            black_box(idx.find(&n.key));
        })
    });
}

fn bench_find_miss(c: &mut Criterion) {
    let nodes = pool(11, 10_000);
    let mut idx = HashIndex::new(64, WordKey);
    for n in &nodes {
        idx.insert(n);
    }
    c.bench_function("ihash_find_miss", |b| {
        // Probe keys from a disjoint stream; collisions with the pool are
        // possible but rare enough not to matter.
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            let k = miss.next().unwrap() as i32;
            black_box(idx.find(&k));
        })
    });
}

fn bench_remove_reinsert(c: &mut Criterion) {
    let nodes = pool(13, 10_000);
    let mut idx = HashIndex::new(64, WordKey);
    for n in &nodes {
        idx.insert(n);
    }
    c.bench_function("ihash_remove_reinsert", |b| {
        let mut it = nodes.iter().cycle();
        b.iter(|| {
            let n = it.next().unwrap();
            idx.remove(n).unwrap();
            idx.insert(n);
            black_box(idx.len());
        })
    });
}

fn bench_iterate(c: &mut Criterion) {
    let nodes = pool(17, 10_000);
    let mut idx = HashIndex::new(64, WordKey);
    for n in &nodes {
        idx.insert(n);
    }
    c.bench_function("ihash_iterate_10k", |b| {
        b.iter(|| black_box(idx.iter().count()))
    });
}

criterion_group!(
    benches,
    bench_insert_with_growth,
    bench_find_hit,
    bench_find_miss,
    bench_remove_reinsert,
    bench_iterate
);
criterion_main!(benches);
