//! Benchmarks for cleaning, classification and merge throughput.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use rulecast::classifier::classify;
use rulecast::cleaner::clean_line;
use rulecast::formatter::render;
use rulecast::merger::merge_sources;
use rulecast::rule::RuleFamily;
use rulecast::task::TaskSpec;

/// AdGuard-style source with comments and some noise
fn generate_adguard(count: usize) -> String {
    let mut out = String::from("! Title: bench\n");
    for i in 0..count {
        match i % 10 {
            0 => out.push_str(&format!("@@||allow{}.example.com^\n", i)),
            1 => out.push_str("! comment\n"),
            _ => out.push_str(&format!("||ads{}.example.com^\n", i)),
        }
    }
    out
}

/// Clash classical source overlapping the AdGuard one
fn generate_clash(count: usize) -> String {
    let mut out = String::from("payload:\n");
    for i in 0..count {
        match i % 3 {
            0 => out.push_str(&format!("  - DOMAIN-SUFFIX,ads{}.example.com\n", i)),
            1 => out.push_str(&format!("  - 'DOMAIN,host{}.example.org'\n", i)),
            _ => out.push_str(&format!("  - IP-CIDR,10.{}.{}.0/24,no-resolve\n", (i / 256) % 256, i % 256)),
        }
    }
    out
}

fn bench_clean_classify(c: &mut Criterion) {
    let lines = [
        "  - 'DOMAIN-SUFFIX,example.com' # comment",
        "||ads.example.com^",
        "IP-CIDR6,2001:db8::/32,no-resolve",
        "+.example.org",
        "example.net",
    ];

    c.bench_function("clean_classify", |b| {
        b.iter(|| {
            for line in &lines {
                black_box(classify(&clean_line(black_box(line)), true));
            }
        })
    });
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    let task = TaskSpec::new("bench", "Reject", RuleFamily::Domain, true, vec![]);

    for size in [1_000, 10_000, 100_000] {
        let sources = [generate_adguard(size), generate_clash(size)];
        group.bench_with_input(BenchmarkId::new("two_sources", size), &sources, |b, sources| {
            b.iter(|| black_box(merge_sources(&task, sources)))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let task = TaskSpec::new("bench", "Reject", RuleFamily::Domain, true, vec![]);
    let outcome = merge_sources(&task, &[generate_adguard(50_000)]);

    c.bench_function("render_50k", |b| {
        b.iter(|| black_box(render(&outcome.table, &task.policy)))
    });
}

criterion_group!(benches, bench_clean_classify, bench_merge, bench_render);
criterion_main!(benches);
