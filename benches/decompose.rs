use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scspell::checker::tokenizer::Tokenizer;

const SOURCE: &str = r#"
static int parse_config_file(const char *path, struct ConfigEntry *entries) {
    int maxRetryCount = MAX_RETRY_COUNT;
    for (int i = 0; i < maxRetryCount; i++) {
        if (readHTTPHeader(path, entries, 0x1F) == ERR_TIMEOUT) {
            continue;
        }
    }
    return v2Config_parse(entries);
}
"#;

fn bench_decompose(c: &mut Criterion) {
    let tokenizer = Tokenizer::new();
    let tokens = [
        "maxRetryCount",
        "MAX_RETRY_COUNT",
        "readHTTPHeader",
        "v2Config_parse",
    ];

    c.bench_function("decompose identifiers", |b| {
        b.iter(|| {
            for token in tokens {
                black_box(tokenizer.decompose(black_box(token)));
            }
        })
    });
}

fn bench_scan(c: &mut Criterion) {
    let tokenizer = Tokenizer::new();
    let data = SOURCE.repeat(64).into_bytes();

    c.bench_function("scan buffer", |b| {
        b.iter(|| {
            let mut pos = 0;
            let mut count = 0;
            while let Some(token) = tokenizer.next_token(black_box(&data), pos) {
                pos = token.end();
                count += tokenizer.decompose(&token.text).len();
            }
            count
        })
    });
}

criterion_group!(benches, bench_decompose, bench_scan);
criterion_main!(benches);
