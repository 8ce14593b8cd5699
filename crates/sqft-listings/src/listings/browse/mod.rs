//! Pure browse-view evaluation: text search, facet filters, and sorting over a
//! batch of listings already fetched from the store.

mod criteria;
mod evaluator;
mod facets;

#[cfg(test)]
mod tests;

pub use criteria::{FilterCriteria, SortKey, SortKeyError, PRICE_PRESETS};
pub use evaluator::evaluate;
pub use facets::distinct_neighborhoods;
