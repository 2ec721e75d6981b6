use article_finder::extractor::{Context, TreeCleaner};
use article_finder::geometry::GeometryCache;
use article_finder::{annotated, Document, Options};

const SENTENCE: &str = "The survey team logged every culvert along the old canal towpath.";

fn load(generator: &str, article: &str) -> Document {
    let html = format!(
        r#"<html><head><meta name="generator" content="{generator}"></head>
        <body data-rect="0,0,1000,2000"><div id="article" data-rect="0,0,800,900">{article}</div></body></html>"#
    );
    match annotated::parse(&html, Some("https://wiki.example/Canal")) {
        Ok(doc) => doc,
        Err(err) => panic!("expected a snapshot, got Err({err:?})"),
    }
}

fn clean(doc: &Document) -> String {
    let geometry = GeometryCache::new();
    let options = Options::default();
    let ctx = Context::new(doc, &geometry, &options);
    let article = doc.element_by_id("article").expect("article");
    let (out, root) = TreeCleaner::new(ctx, "", None).clean(article, false).expect("cleaned");
    out.outer_html(root)
}

const SECTION: &str = r#"<h2 data-rect="0,0,800,40">History<span class="editsection" data-rect="700,0,100,40">[edit]</span></h2>"#;

#[test]
fn media_wiki_edit_links_are_dropped() {
    let article = format!(r#"{SECTION}<p data-rect="0,40,800,100">{SENTENCE}</p>"#);

    let wiki = clean(&load("MediaWiki 1.41", &article));
    assert!(!wiki.contains("[edit]"));
    assert!(wiki.contains("History"));

    let other = clean(&load("Hugo 0.120", &article));
    assert!(other.contains("[edit]"));
}

#[test]
fn hidden_nodes_are_dropped() {
    let article = format!(
        r#"<p data-rect="0,0,800,100">{SENTENCE}</p>
        <p data-rect="0,0,0,0" data-style="display: none">Subscribe to our newsletter</p>"#
    );
    let cleaned = clean(&load("", &article));
    assert!(cleaned.contains(SENTENCE));
    assert!(!cleaned.contains("Subscribe"));
}

#[test]
fn computed_font_weight_is_kept_inline() {
    let article = format!(
        r#"<p data-rect="0,0,800,100"><span data-rect="0,0,200,20" data-style="font-weight: 700">Update:</span> {SENTENCE}</p>
        <p data-rect="0,100,800,100"><b data-rect="0,100,200,20">Note:</b> {SENTENCE}</p>"#
    );
    let cleaned = clean(&load("", &article));
    assert!(cleaned.contains(r#"<span style="font-weight: 700;">Update:</span>"#));
    assert!(cleaned.contains("<b>Note:</b>"));
}
