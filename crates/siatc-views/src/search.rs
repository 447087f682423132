use siatc_core::{matches_query, Record};

/// Indices of the records matching `query`, in data order.
pub(crate) fn filter_indices(data: &[Record], query: &str) -> Vec<usize> {
    data.iter()
        .enumerate()
        .filter(|(_, r)| matches_query(r, query))
        .map(|(i, _)| i)
        .collect()
}
