//! Performance benchmarks for article-finder.
//!
//! Run with: `cargo bench`
//!
//! Benchmarks include:
//! - Snapshot parsing of a synthetic annotated page
//! - Article search alone, and a full reader session, over pages of growing size

use article_finder::{annotated, extract, ArticleFinder, Options};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const PROSE: &str = "This paragraph belongs to the body of the article and is long enough \
                     to be counted by the scoring, with a comma or two, like real prose.";

/// An article of `paragraphs` paragraphs between a navigation bar, a sidebar
/// and a footer, with layout annotations.
fn synthetic_page(paragraphs: usize) -> String {
    let mut html = String::from(
        r#"<html><head><title>Sample Article - Example News</title></head>
<body data-rect="0,0,1200,20000">
<nav data-rect="0,0,1200,60"><a href="/" data-rect="0,0,80,60">Home</a><a href="/about" data-rect="80,0,80,60">About</a></nav>
<h1 data-rect="100,100,760,60" data-style="font-size: 32px">Sample Article</h1>
"#,
    );
    let height = paragraphs * 120;
    html.push_str(&format!(r#"<div class="entry-content" data-rect="100,200,760,{height}">"#));
    for i in 0..paragraphs {
        let top = 200 + i * 120;
        html.push_str(&format!(r#"<p data-rect="100,{top},760,120">{PROSE} {PROSE}</p>"#));
    }
    let next_top = 200 + height + 20;
    html.push_str(&format!(
        r#"</div>
<div data-rect="100,{next_top},760,30"><a href="/news/sample-2" data-rect="100,{next_top},100,30">Next</a></div>
<aside data-rect="900,200,300,600"><ul data-rect="900,200,300,600"><li data-rect="900,200,300,30"><a href="/r1">Related article</a></li></ul></aside>
<footer data-rect="0,{next_top},1200,100"><p>Copyright 2024</p></footer>
</body></html>"#
    ));
    html
}

fn bench_parse(c: &mut Criterion) {
    let html = synthetic_page(20);
    c.bench_function("annotated_parse", |b| {
        b.iter(|| annotated::parse(black_box(&html), Some("https://example.com/news/sample")));
    });
}

fn bench_find_article(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_article");
    for paragraphs in [10, 100, 500] {
        let html = synthetic_page(paragraphs);
        let Ok(doc) = annotated::parse(&html, Some("https://example.com/news/sample")) else {
            continue;
        };
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(paragraphs), &doc, |b, doc| {
            b.iter(|| ArticleFinder::new(black_box(doc), Options::default()).article_node(false));
        });
    }
    group.finish();
}

fn bench_reader_session(c: &mut Criterion) {
    let html = synthetic_page(100);
    let Ok(doc) = annotated::parse(&html, Some("https://example.com/news/sample")) else {
        return;
    };
    let options = Options::default();
    c.bench_function("reader_session", |b| {
        b.iter(|| extract(black_box(&doc), black_box(&options)));
    });
}

criterion_group!(benches, bench_parse, bench_find_article, bench_reader_session);
criterion_main!(benches);
