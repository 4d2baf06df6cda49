//! Tracker homepage and search page parser
//!
//! Turns the leaderboard table into [`RowFragment`]s and reads the
//! release names of the "newest" strip. Both views live under the same
//! base cell of the page layout; any change to that layout breaks these
//! selectors.

use scraper::{ElementRef, Html, Selector};

use crate::error::{LeaderboardError, Result};

/// Cell that holds both the newest strip and the leaderboard table
const BASE_SELECTOR: &str = "table:nth-child(6) td:nth-child(2)";

/// Release link of each leaderboard row
const ROW_SELECTOR: &str = "table.lista2t tr.lista2 td:nth-child(2) a:nth-child(1)";

/// Poster links of the newest strip
const NEWEST_SELECTOR: &str = "tr:nth-child(2) div:nth-child(1) table tbody tr td a";

/// Everything the extractor needs from one leaderboard row
///
/// Plain data, so extraction can be exercised with synthetic rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFragment {
    /// Release name shown in the row
    pub release: String,
    /// Relative link to the detail page
    pub href: Option<String>,
    /// Hover handler that embeds the poster image
    pub onmouseover: Option<String>,
    /// Concatenated text of the link's sibling elements (genres, rating)
    pub sibling_text: String,
    /// Sibling link carrying the `imdb=` search parameter
    pub imdb_href: Option<String>,
    /// Text of the size column
    pub size: Option<String>,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| LeaderboardError::ParseError(format!("Invalid selector: {:?}", e)))
}

/// Parses the leaderboard rows of a homepage or search result page
///
/// # Returns
/// Rows in document order, empty if the table is missing
///
/// # Errors
/// - `StructuralParse` if a row has no release name
/// - `ParseError` if a selector is invalid
pub fn parse_leaderboard_rows(html: &str) -> Result<Vec<RowFragment>> {
    let document = Html::parse_document(html);
    let row_selector = selector(&format!("{} {}", BASE_SELECTOR, ROW_SELECTOR))?;

    document
        .select(&row_selector)
        .enumerate()
        .map(|(index, link)| parse_row(index, &link))
        .collect()
}

fn parse_row(index: usize, link: &ElementRef) -> Result<RowFragment> {
    let text = link.text().collect::<String>();
    let release = match text.trim() {
        "" => link.value().attr("title").map(str::trim).unwrap_or_default(),
        trimmed => trimmed,
    };
    if release.is_empty() {
        return Err(LeaderboardError::StructuralParse(format!(
            "leaderboard row {} has no release name: {}",
            index + 1,
            link.html()
        )));
    }

    let siblings = sibling_elements(link);
    let sibling_text = siblings
        .iter()
        .flat_map(|el| el.text())
        .collect::<String>();
    let imdb_href = siblings
        .iter()
        .filter_map(|el| el.value().attr("href"))
        .find(|href| href.contains("imdb="))
        .map(str::to_string);

    let size = link
        .parent()
        .and_then(ElementRef::wrap)
        .map(|cell| {
            sibling_elements(&cell)
                .iter()
                .filter(|el| el.value().attr("width") == Some("100px"))
                .flat_map(|el| el.text())
                .collect::<String>()
        })
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());

    Ok(RowFragment {
        release: release.to_string(),
        href: link.value().attr("href").map(str::to_string),
        onmouseover: link.value().attr("onmouseover").map(str::to_string),
        sibling_text,
        imdb_href,
        size,
    })
}

/// Element siblings of `element` in document order, excluding itself
fn sibling_elements<'a>(element: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let Some(parent) = element.parent() else {
        return Vec::new();
    };
    parent
        .children()
        .filter(|node| node.id() != element.id())
        .filter_map(ElementRef::wrap)
        .collect()
}

/// Parses the release names of the "newest" strip, in document order
///
/// # Errors
/// - `StructuralParse` if a link has no `title` attribute
/// - `ParseError` if a selector is invalid
pub fn parse_newest_titles(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let newest_selector = selector(&format!("{} {}", BASE_SELECTOR, NEWEST_SELECTOR))?;

    document
        .select(&newest_selector)
        .map(|link| match link.value().attr("title") {
            Some(title) => Ok(title.trim().to_string()),
            None => Err(LeaderboardError::StructuralParse(format!(
                "newest entry has no title attribute: {}",
                link.html()
            ))),
        })
        .collect()
}
