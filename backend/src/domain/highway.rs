//! Highway classification heuristics.
//!
//! Pure functions over provider output: an OSM-style road category and a
//! free-text road name. No I/O and no error path.

/// OSM highway grades treated as controlled-access roads.
pub const HIGHWAY_CATEGORIES: [&str; 4] = ["motorway", "trunk", "motorway_link", "trunk_link"];

/// Road-name fragments that mark a highway regardless of category.
pub const HIGHWAY_ROAD_KEYWORDS: [&str; 3] = ["高速", "高速公路", "Expressway"];

/// Road-name fragments for expressways and national roads.
const MOTORWAY_NAME_KEYWORDS: [&str; 4] = ["高速", "高速公路", "G", "国道"];

/// Road-name fragments for provincial, county and township roads.
const TRUNK_NAME_KEYWORDS: [&str; 3] = ["省道", "县道", "乡道"];

/// Category reported when a road name matches no keyword tier.
pub const GENERIC_ROAD_CATEGORY: &str = "road";

/// Decide whether a geocoded road is a highway.
///
/// The category check wins; otherwise the road name is scanned for
/// [`HIGHWAY_ROAD_KEYWORDS`].
///
/// # Examples
/// ```
/// use snapreport_backend::domain::classify_highway;
///
/// assert!(classify_highway("motorway_link", ""));
/// assert!(classify_highway("", "沪宁高速公路"));
/// assert!(!classify_highway("", "深南大道"));
/// ```
#[must_use]
pub fn classify_highway(category: &str, road: &str) -> bool {
    if HIGHWAY_CATEGORIES.contains(&category) {
        return true;
    }
    contains_any(road, &HIGHWAY_ROAD_KEYWORDS)
}

/// Infer an OSM-style category from a road name for providers that do not
/// report one.
///
/// Expressway and national-road names map to `motorway`, provincial, county
/// and township roads to `trunk`, anything else to
/// [`GENERIC_ROAD_CATEGORY`].
///
/// # Examples
/// ```
/// use snapreport_backend::domain::infer_road_category;
///
/// assert_eq!(infer_road_category("G15沈海高速"), "motorway");
/// assert_eq!(infer_road_category("S122省道"), "trunk");
/// assert_eq!(infer_road_category("深南大道"), "road");
/// ```
#[must_use]
pub fn infer_road_category(road: &str) -> &'static str {
    if contains_any(road, &MOTORWAY_NAME_KEYWORDS) {
        "motorway"
    } else if contains_any(road, &TRUNK_NAME_KEYWORDS) {
        "trunk"
    } else {
        GENERIC_ROAD_CATEGORY
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
