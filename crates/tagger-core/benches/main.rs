
use criterion::{criterion_group, criterion_main};

criterion_group!(benches, filter::criterion_benchmark);

criterion_main!(benches);
