//! Accent- and case-insensitive name filter over the roster.
//!
//! Both the query and every display name are folded the same way: canonical
//! decomposition (NFD), removal of the Combining Diacritical Marks block
//! (U+0300..=U+036F) and lowercasing. A record matches when its folded name
//! contains the folded query. The empty query matches everything.

use crate::types::TicketRecord;
use unicode_normalization::UnicodeNormalization;

const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036F}';

/// Fold a string for matching: NFD, strip combining marks, lowercase.
///
/// Idempotent: `fold(&fold(s)) == fold(s)`.
#[must_use]
pub fn fold(input: &str) -> String {
    input
        .nfd()
        .filter(|c| !COMBINING_MARKS.contains(c))
        .collect::<String>()
        .to_lowercase()
}

/// Whether `name` matches the already folded query.
#[must_use]
pub fn matches_folded(name: &str, folded_query: &str) -> bool {
    folded_query.is_empty() || fold(name).contains(folded_query)
}

/// Lazily filter records by display name.
///
/// Re-evaluated on every call; the roster order is preserved.
pub fn filter<'a>(
    query: &str,
    records: &'a [TicketRecord],
) -> impl Iterator<Item = &'a TicketRecord> + use<'a> {
    let folded_query = fold(query);
    records
        .iter()
        .filter(move |record| matches_folded(&record.full_name, &folded_query))
}
