//! Configuration options for article detection.
//!
//! The heuristics are tuned empirically. Every threshold that a caller may
//! reasonably want to recalibrate lives here as a named field instead of a
//! literal buried in the scoring code.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration options for article detection.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings. Deserializing a partial JSON object fills the
/// missing fields from the defaults.
///
/// # Example
///
/// ```rust
/// use article_finder::Options;
///
/// let options = Options {
///     scan_budget_ms: 250,
///     minimum_score_density: 3.5,
///     ..Options::default()
/// };
/// assert_eq!(options.candidate_min_width, 280.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Wall-clock budget for the whole-document candidate scan, in milliseconds.
    ///
    /// A scan that runs out of time yields no candidates at all.
    ///
    /// Default: `1000`
    pub scan_budget_ms: u64,

    /// How many times better a candidate must score than a look-alike element
    /// carrying the same class before the look-alike stops disqualifying it.
    ///
    /// Default: `15.0`
    pub minimum_advantage: f64,

    /// Minimum score density for a candidate to count as prose.
    ///
    /// Default: `4.25`
    pub minimum_score_density: f64,

    /// Minimum candidate width.
    ///
    /// Default: `280.0`
    pub candidate_min_width: f64,

    /// Minimum candidate height, also applied to the adjusted height.
    ///
    /// Default: `295.0`
    pub candidate_min_height: f64,

    /// Minimum candidate area.
    ///
    /// Default: `170000.0`
    pub candidate_min_area: f64,

    /// Candidates starting below this vertical position are ignored.
    ///
    /// Default: `1300.0`
    pub candidate_max_top: f64,

    /// Portion of the candidate width a form or list must span before its
    /// height is subtracted from the candidate's adjusted height.
    ///
    /// Default: `0.5`
    pub indicator_width_portion: f64,

    /// Lists whose items average fewer lines than this are treated as
    /// navigation-like and subtracted from the adjusted height.
    ///
    /// Default: `4.0`
    pub min_list_item_line_count: f64,

    /// Minimum height of a block prepended to the article.
    ///
    /// Default: `50.0`
    pub prepended_min_height: f64,

    /// Minimum height of a block appended to the article.
    ///
    /// Default: `200.0`
    pub appended_min_height: f64,

    /// Maximum gap between the article bottom and an appended block.
    ///
    /// Default: `150.0`
    pub appended_max_distance: f64,

    /// Minimum average spacing between full-width horizontal rules.
    ///
    /// Default: `400.0`
    pub min_hr_spacing: f64,

    /// Minimum average spacing between linked headers.
    ///
    /// Default: `400.0`
    pub min_header_spacing: f64,

    /// Portion of the candidate height ignored at the top and bottom when
    /// counting linked headers.
    ///
    /// Default: `0.1`
    pub header_check_margin: f64,

    /// Score multiplier for text led by Chinese, Japanese or Korean characters.
    ///
    /// Default: `3.0`
    pub cjk_score_multiplier: f64,

    /// Images taller than this may be excluded from the density area.
    ///
    /// Default: `200.0`
    pub content_image_min_height: f64,

    /// Images at least this portion of the candidate width may be excluded
    /// from the density area.
    ///
    /// Default: `0.5`
    pub content_image_min_width_ratio: f64,

    /// Images covering more than this portion of the candidate area are not
    /// excluded from the density area.
    ///
    /// Default: `0.2`
    pub content_image_max_area_ratio: f64,

    /// Score at which a candidate found by replaying a cached route is trusted
    /// over a fresh scan, and below which a fresh winner loses to it.
    ///
    /// No calibrated value exists, so route candidates are only used when the
    /// scan finds nothing unless this is set.
    ///
    /// Default: `None`
    pub route_success_score: Option<f64>,

    /// Maximum vertical distance between the article and a next-page link.
    ///
    /// Default: `200.0`
    pub link_max_vertical_distance: f64,

    /// Minimum similarity between the document path and a same-length
    /// next-page path that earned no semantic bonus.
    ///
    /// Default: `0.75`
    pub link_min_url_similarity: f64,

    /// Headers closer than this to the article top are checked against the
    /// title for duplication.
    ///
    /// Default: `200.0`
    pub header_min_distance_from_article_top: f64,

    /// Edit distance, as a portion of the header length, under which a header
    /// duplicates the title.
    ///
    /// Default: `0.75`
    pub header_levenshtein_ratio: f64,

    /// Floated blocks shorter than this (with at most one child) do not start
    /// a float run.
    ///
    /// Default: `130.0`
    pub float_min_height: f64,

    /// Images smaller than this in both dimensions are tagged as tiny.
    ///
    /// Default: `32.0`
    pub image_size_tiny: f64,

    /// Images wider than this portion of the article are tagged as large.
    ///
    /// Default: `0.5`
    pub image_width_to_parent_ratio: f64,

    /// Minimum leading image height.
    ///
    /// Default: `250.0`
    pub leading_image_min_height: f64,

    /// Minimum leading image width as a portion of the article width.
    ///
    /// Default: `0.5`
    pub leading_image_min_width_ratio: f64,

    /// Number of ancestors above the article searched for a leading image.
    ///
    /// Default: `3`
    pub leading_image_ancestor_count: usize,
}

impl Options {
    /// The candidate scan budget as a `Duration`.
    #[must_use]
    pub fn scan_budget(&self) -> Duration {
        Duration::from_millis(self.scan_budget_ms)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            scan_budget_ms: 1000,
            minimum_advantage: 15.0,
            minimum_score_density: 4.25,
            candidate_min_width: 280.0,
            candidate_min_height: 295.0,
            candidate_min_area: 170_000.0,
            candidate_max_top: 1300.0,
            indicator_width_portion: 0.5,
            min_list_item_line_count: 4.0,
            prepended_min_height: 50.0,
            appended_min_height: 200.0,
            appended_max_distance: 150.0,
            min_hr_spacing: 400.0,
            min_header_spacing: 400.0,
            header_check_margin: 0.1,
            cjk_score_multiplier: 3.0,
            content_image_min_height: 200.0,
            content_image_min_width_ratio: 0.5,
            content_image_max_area_ratio: 0.2,
            route_success_score: None,
            link_max_vertical_distance: 200.0,
            link_min_url_similarity: 0.75,
            header_min_distance_from_article_top: 200.0,
            header_levenshtein_ratio: 0.75,
            float_min_height: 130.0,
            image_size_tiny: 32.0,
            image_width_to_parent_ratio: 0.5,
            leading_image_min_height: 250.0,
            leading_image_min_width_ratio: 0.5,
            leading_image_ancestor_count: 3,
        }
    }
}
