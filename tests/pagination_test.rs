use article_finder::{annotated, ArticleFinder, Document, Options};

const PROSE: &str = "The second part of the series follows the crew into the tunnels, where \
                     the old maps turned out to be wrong in almost every detail that mattered.";

fn page(url: &str, generator: &str, links: &str) -> Document {
    let paragraphs: String = (0..3)
        .map(|i| {
            let top = 100 + i * 150;
            format!(r#"<p data-rect="100,{top},800,150">{PROSE} {PROSE}</p>"#)
        })
        .collect();
    let html = format!(
        r#"<html><head><meta name="generator" content="{generator}"></head>
        <body data-rect="0,0,1000,2000">
        <div id="main" data-rect="100,100,800,500">{paragraphs}</div>
        <div class="pager" data-rect="100,620,800,20">{links}</div>
        </body></html>"#
    );
    match annotated::parse(&html, Some(url)) {
        Ok(doc) => doc,
        Err(err) => panic!("expected a snapshot, got Err({err:?})"),
    }
}

const PAGER: &str = r#"<a href="/news/story-1" data-rect="100,620,20,20">1</a>
    <a href="/news/5" data-rect="130,620,20,20">5</a>
    <a href="/news/story-3" data-rect="160,620,20,20">3</a>"#;

#[test]
fn next_ordinal_link_is_the_next_page() {
    let doc = page("https://example.com/news/story-2", "", PAGER);
    let mut finder = ArticleFinder::new(&doc, Options::default());
    finder.set_page_number(2);

    let next = finder.next_page_url().expect("next page");
    assert_eq!(next.as_str(), "https://example.com/news/story-3");
    assert_eq!(finder.page_number(), 2);
}

#[test]
fn media_wiki_pages_have_no_next_page() {
    let doc = page("https://example.com/news/story-2", "MediaWiki 1.41", PAGER);
    let mut finder = ArticleFinder::new(&doc, Options::default());

    assert!(finder.is_media_wiki_page());
    assert!(finder.article_node(false).is_some());
    assert!(finder.next_page_url().is_none());
}

#[test]
fn links_far_below_the_article_are_ignored() {
    let far = r#"<a href="/news/story-3" data-rect="100,900,20,20">3</a>"#;
    let doc = page("https://example.com/news/story-2", "", far);
    let mut finder = ArticleFinder::new(&doc, Options::default());

    assert!(finder.next_page_url().is_none());
}

#[test]
fn page_parameter_advances() {
    let links = r#"<a href="/read?id=7&amp;page=3" data-rect="100,620,60,20">Next</a>"#;
    let doc = page("https://example.com/read?id=7&page=2", "", links);
    let mut finder = ArticleFinder::new(&doc, Options::default());
    finder.set_page_number(2);

    let next = finder.next_page_url().expect("next page");
    assert_eq!(next.as_str(), "https://example.com/read?id=7&page=3");
}
