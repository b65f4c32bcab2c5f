//! Batch partitioning for API-limit-sized calls.

/// Error returned for unusable slicing inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SliceError {
    /// There is nothing to slice
    #[error("length must be at least 1, got {0}")]
    EmptyRange(usize),

    /// Batches of zero can never cover anything
    #[error("batch size must be at least 1, got {0}")]
    EmptyBatch(usize),
}

/// Partition `[0, length)` into ordered `[start, end)` spans of at most
/// `max_batch` elements.
///
/// Spans are contiguous, non-overlapping, and ascending; all spans are
/// exactly `max_batch` long except a shorter final span when `length`
/// is not a multiple of `max_batch`. This is what keeps every distance
/// API call within the provider's destinations-per-request limit.
///
/// # Examples
///
/// ```
/// use hike_server::matrix::slice_indices;
///
/// assert_eq!(slice_indices(19, 7).unwrap(), vec![(0, 7), (7, 14), (14, 19)]);
/// assert_eq!(slice_indices(5, 7).unwrap(), vec![(0, 5)]);
/// assert!(slice_indices(0, 7).is_err());
/// ```
pub fn slice_indices(length: usize, max_batch: usize) -> Result<Vec<(usize, usize)>, SliceError> {
    if length == 0 {
        return Err(SliceError::EmptyRange(length));
    }
    if max_batch == 0 {
        return Err(SliceError::EmptyBatch(max_batch));
    }

    let mut spans = Vec::with_capacity(length.div_ceil(max_batch));
    let mut start = 0;
    while start < length {
        let end = usize::min(start + max_batch, length);
        spans.push((start, end));
        start = end;
    }

    Ok(spans)
}
