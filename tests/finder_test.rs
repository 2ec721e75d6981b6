use article_finder::{annotated, ArticleFinder, Document, Options};

const PROSE: &str = "The committee published its findings on Monday, describing in detail how the \
                     project ran over budget and what the city plans to do about it next year.";

fn paragraph(left: u32, top: u32, width: u32, height: u32, text: &str) -> String {
    format!(r#"<p data-rect="{left},{top},{width},{height}">{text} {PROSE} {PROSE}</p>"#)
}

fn load(html: &str) -> Document {
    match annotated::parse(html, Some("https://news.example/city/budget")) {
        Ok(doc) => doc,
        Err(err) => panic!("expected a snapshot, got Err({err:?})"),
    }
}

#[test]
fn single_article_element_wins_over_denser_sidebar() {
    let story: String = (0..3).map(|i| paragraph(100, 100 + i * 150, 800, 150, "Story.")).collect();
    let side: String = (0..5).map(|i| paragraph(920, 100 + i * 200, 300, 200, "Side.")).collect();
    let html = format!(
        r#"<html><body data-rect="0,0,1300,2000">
        <article id="story" data-rect="100,100,800,600">{story}</article>
        <div id="side" data-rect="920,100,300,1000">{side}</div>
        </body></html>"#
    );
    let doc = load(&html);
    let mut finder = ArticleFinder::new(&doc, Options::default());

    let article = finder.article_node(false).expect("article");
    assert_eq!(doc.id_attr(article), "story");
}

fn teaser(id: &str, top: u32) -> String {
    let body: String = (0..2).map(|i| paragraph(100, top + 60 + i * 150, 800, 150, "Teaser.")).collect();
    format!(
        r#"<div id="{id}" class="teaser" data-rect="100,{top},800,400">
        <h2 class="teaser-title" data-rect="100,{top},800,60">Headline</h2>{body}
        <p class="teaser-footer" data-rect="100,{},800,40">Read more</p>
        </div>"#,
        top + 360
    )
}

#[test]
fn near_identical_teasers_are_not_an_article() {
    let html = format!(
        r#"<html><body data-rect="0,0,1000,2000">{}{}</body></html>"#,
        teaser("first", 100),
        teaser("second", 520)
    );
    let doc = load(&html);
    let mut finder = ArticleFinder::new(&doc, Options::default());

    assert!(finder.article_node(false).is_none());
    assert!(!finder.is_reader_mode_available());

    // A forced search skips the index-page checks.
    let forced = finder.article_node(true).expect("forced article");
    assert_eq!(doc.id_attr(forced), "first");
}

fn story_with_lead() -> String {
    let story: String = (0..4).map(|i| paragraph(100, 300 + i * 150, 800, 150, "Story.")).collect();
    format!(
        r#"<html><head><title>Budget overrun - City</title></head><body data-rect="0,0,1000,2000">
        <h1 data-rect="100,60,800,60" data-style="font-size: 32px">Budget overrun</h1>
        <div id="lead" data-rect="100,150,800,100">{}</div>
        <div id="story" data-rect="100,300,800,600">{story}</div>
        </body></html>"#,
        paragraph(100, 150, 800, 100, "Lead.")
    )
}

#[test]
fn extra_article_never_overlaps_article() {
    let doc = load(&story_with_lead());
    let mut finder = ArticleFinder::new(&doc, Options::default());

    let article = finder.article_node(false).expect("article");
    let extra = finder.extra_article_node().expect("extra article");
    let lead = doc.element_by_id("lead").expect("lead");

    assert_eq!(doc.id_attr(article), "story");
    assert!(doc.contains(lead, extra));
    assert!(!doc.contains(article, extra));
    assert!(!doc.contains(extra, article));

    let text = finder.article_text_content().expect("text");
    assert!(text.starts_with("Lead."));
    assert!(text.contains("Story."));
}

#[test]
fn results_are_cached_and_deterministic() {
    let doc = load(&story_with_lead());
    let mut finder = ArticleFinder::new(&doc, Options::default());

    let first = finder.article_node(false);
    let html = finder.adoptable_article_html(false);
    assert_eq!(finder.article_node(false), first);
    assert_eq!(finder.adoptable_article_html(false), html);

    let mut again = ArticleFinder::new(&doc, Options::default());
    assert_eq!(again.article_node(false), first);
    assert_eq!(again.adoptable_article_html(false), html);
    assert_eq!(again.article_title(), "Budget overrun");
}

#[test]
fn cleaned_output_drops_scripts_and_attributes() {
    let doc = load(&story_with_lead().replace(
        r#"<div id="story" data-rect="100,300,800,600">"#,
        r#"<div id="story" class="x" style="color: red" data-rect="100,300,800,600"><script>track()</script>"#,
    ));
    let mut finder = ArticleFinder::new(&doc, Options::default());

    let html = finder.adoptable_article_html(false).expect("html");
    assert!(!html.contains("<script"));
    assert!(!html.contains("style="));
    assert!(!html.contains("id="));
    assert!(!html.contains("Budget overrun<"));
}

#[test]
fn no_article_falls_back_to_document_title() {
    let doc = load(
        r#"<html><head><title>Front page</title></head>
        <body data-rect="0,0,1000,800"><p data-rect="0,0,1000,20">Welcome</p></body></html>"#,
    );
    let mut finder = ArticleFinder::new(&doc, Options::default());

    assert!(finder.article_node(false).is_none());
    assert!(finder.adoptable_article(false).is_none());
    assert!(finder.next_page_url().is_none());
    assert_eq!(finder.article_title(), "Front page");
    assert!(finder.article_is_ltr());
}

/// A short lead paragraph followed by a nested list of long items. The list
/// text sits too deep to count towards the story's own score.
fn story_with_list(item: &str) -> String {
    let items: String = (0..3)
        .map(|i| {
            let top = 250 + i * 80;
            format!(r#"<li data-rect="100,{top},800,80">{item} {PROSE} {PROSE}</li>"#)
        })
        .collect();
    format!(
        r#"<html><body data-rect="0,0,1000,2000">
        <div id="story" data-rect="100,100,800,500">
            <p data-rect="100,100,800,100">{PROSE}</p>
            <section data-rect="100,250,800,240"><ul data-rect="100,250,800,240">{items}</ul></section>
        </div>
        </body></html>"#
    )
}

#[test]
fn plain_text_list_rescues_sparse_article() {
    let doc = load(&story_with_list("Step."));
    let mut finder = ArticleFinder::new(&doc, Options::default());

    let article = finder.article_node(false).expect("article");
    assert_eq!(doc.id_attr(article), "story");
    assert!(finder.is_reader_mode_available());
}

#[test]
fn linked_list_does_not_rescue_sparse_article() {
    let doc = load(&story_with_list(r#"<a href="/step">Step.</a>"#));
    let mut finder = ArticleFinder::new(&doc, Options::default());

    assert!(finder.article_node(false).is_none());
    let forced = finder.article_node(true).expect("forced article");
    assert_eq!(doc.id_attr(forced), "story");
}
