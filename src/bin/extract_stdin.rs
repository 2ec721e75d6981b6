//! Simple CLI that reads an annotated snapshot from stdin and outputs JSON to stdout.
//!
//! Usage: `extract_stdin [URL] < snapshot.html`
//!
//! The optional URL is the address the snapshot was taken from; it is needed
//! for next-page detection. Set `RUST_LOG=article_finder=debug` to see the
//! finder's decisions on stderr.

use std::io::{self, Read};

use article_finder::{annotated, extract, Options};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
#[serde(untagged)]
enum Output {
    Article {
        html: String,
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        next_page_url: Option<String>,
    },
    Failure {
        error: String,
    },
}

fn run(html: &str, url: Option<&str>) -> Output {
    let doc = match annotated::parse(html, url) {
        Ok(doc) => doc,
        Err(e) => return Output::Failure { error: e.to_string() },
    };
    match extract(&doc, &Options::default()) {
        Some(article) => Output::Article {
            html: article.html,
            title: article.title,
            next_page_url: article.next_page_url,
        },
        None => Output::Failure { error: article_finder::Error::NoArticle.to_string() },
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let url = std::env::args().nth(1);

    let mut html = String::new();
    if io::stdin().read_to_string(&mut html).is_err() {
        eprintln!("Failed to read from stdin");
        std::process::exit(1);
    }

    let output = run(&html, url.as_deref());
    match serde_json::to_string(&output) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to serialize output: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_without_article_serializes_an_error() {
        let json = serde_json::to_string(&run("<p>Hi</p>", None)).unwrap();
        assert_eq!(json, r#"{"error":"not able to find article"}"#);
    }
}
