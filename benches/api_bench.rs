// Criterion benchmark suite for the public API.
//
// Run: cargo bench
// Specific group: cargo bench -- replace
// HTML report: target/criterion/report/index.html

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rubex::{Regex, Template};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_log_line(i: usize) -> String {
    let level = ["INFO", "WARN", "DEBUG"][i % 3];
    format!(
        "2025-06-{:02} 12:{:02}:{:02} {} worker-{} request id={} duration={}ms user=ユーザー{}\n",
        i % 28 + 1,
        i % 60,
        (i * 7) % 60,
        level,
        i % 8,
        i,
        (i * 13) % 500,
        i % 100
    )
}

fn make_log_text(num_lines: usize) -> String {
    (0..num_lines).map(make_log_line).collect()
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("compile failed for {:?}: {}", pattern, e))
}

// ---------------------------------------------------------------------------
// 1. compile
// ---------------------------------------------------------------------------

fn bench_compile(c: &mut Criterion) {
    let patterns: &[(&str, &str)] = &[
        ("literal", "hello world"),
        ("alternation", "alpha|beta|gamma|delta"),
        ("char_class", "[a-zA-Z0-9_]+"),
        ("quantifier", "a{2,5}b+c?d*"),
        ("named_capture", r"(?<year>\d{4})-(?<month>\d{2})-(?<day>\d{2})"),
    ];

    let mut group = c.benchmark_group("compile");
    for (name, pat) in patterns {
        group.bench_with_input(BenchmarkId::from_parameter(name), pat, |b, pat| {
            b.iter(|| black_box(compile(black_box(pat))));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 2. find -- leftmost match over a log
// ---------------------------------------------------------------------------

fn bench_find(c: &mut Criterion) {
    let text = make_log_text(100);
    let cases: &[(&str, &str)] = &[
        ("literal", "worker-7"),
        ("timestamp", r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}"),
        ("no_match", "CRITICAL_ERROR"),
    ];

    let mut group = c.benchmark_group("find");
    for (name, pat) in cases {
        let re = compile(pat);
        group.bench_with_input(BenchmarkId::from_parameter(name), &text, |b, text| {
            b.iter(|| black_box(re.find_str_index(black_box(text))));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 3. find_all -- cursor iteration
// ---------------------------------------------------------------------------

fn bench_find_all(c: &mut Criterion) {
    let text = make_log_text(100);
    let cases: &[(&str, &str)] = &[
        ("field", r"duration=(\d+)ms"),
        ("words", r"\w+"),
        ("empty", "x*"),
    ];

    let mut group = c.benchmark_group("find_all");
    for (name, pat) in cases {
        let re = compile(pat);
        group.bench_with_input(BenchmarkId::new("index", name), &text, |b, text| {
            b.iter(|| black_box(re.find_all_str_index(black_box(text), -1)));
        });
        group.bench_with_input(BenchmarkId::new("submatch", name), &text, |b, text| {
            b.iter(|| black_box(re.find_all_str_submatch(black_box(text), -1)));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 4. replace -- template, literal and closure producers
// ---------------------------------------------------------------------------

fn bench_replace(c: &mut Criterion) {
    let text = make_log_text(100);
    let re = compile(r"(?<key>\w+)=(?<value>\w+)");

    let mut group = c.benchmark_group("replace");
    group.bench_function("template", |b| {
        b.iter(|| black_box(re.replace_all_str(black_box(&text), "${value}:$key")));
    });
    group.bench_function("literal", |b| {
        b.iter(|| black_box(re.replace_all_literal_str(black_box(&text), "$redacted")));
    });
    group.bench_function("func", |b| {
        b.iter(|| black_box(re.replace_all_str_func(black_box(&text), |m| m.to_uppercase())));
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// 5. template -- parse once, expand per match
// ---------------------------------------------------------------------------

fn bench_template(c: &mut Criterion) {
    let text = make_log_text(20);
    let re = compile(r"id=(?<id>\d+) duration=(?<ms>\d+)ms");

    let mut group = c.benchmark_group("template");
    group.bench_function("parse", |b| {
        b.iter(|| black_box(Template::parse(black_box(b"request ${id} took $ms ms ($$)"))));
    });
    group.bench_function("expand", |b| {
        let template = Template::from("request ${id} took $ms ms");
        b.iter(|| {
            let mut out = Vec::new();
            for caps in re.captures_iter(text.as_bytes()) {
                template.expand(&caps, &mut out);
            }
            black_box(out)
        });
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// 6. split
// ---------------------------------------------------------------------------

fn bench_split(c: &mut Criterion) {
    let text = make_log_text(100);
    let cases: &[(&str, &str)] = &[("lines", "\n"), ("spaces", r"\s+")];

    let mut group = c.benchmark_group("split");
    for (name, pat) in cases {
        let re = compile(pat);
        group.bench_with_input(BenchmarkId::from_parameter(name), &text, |b, text| {
            b.iter(|| black_box(re.split_str(black_box(text), -1)));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Criterion harness
// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    bench_compile,
    bench_find,
    bench_find_all,
    bench_replace,
    bench_template,
    bench_split,
);
criterion_main!(benches);
