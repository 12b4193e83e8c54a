//! This module contains the pure, stateless kernel for decoding the
//! delimiter-joined strings produced by the recipes' SQL-side `LIST(...)`
//! aggregations.
//!
//! Each element is either a value rendered as text or the null token. The
//! kernel only splits; element coercion is the transformer's job.

use crate::types::tokens::{DELIM_TOKEN, NULL_TOKEN};

/// Splits a `LIST(...)` value into its elements, mapping the null token to `None`.
///
/// A blank source yields no elements. Elements are compared to the null token
/// after trimming, since some drivers pad list output with spaces.
pub fn split_delimited(source: &str) -> Vec<Option<&str>> {
    if source.trim().is_empty() {
        return Vec::new();
    }
    source
        .split(DELIM_TOKEN)
        .map(|element| {
            if element.trim() == NULL_TOKEN {
                None
            } else {
                Some(element)
            }
        })
        .collect()
}
