//! Request options for listing and retrieval.

use chrono::{DateTime, Utc};
use derive_getters::Getters;

/// Default page size when no `max_results` is requested.
pub const DEFAULT_MAX_RESULTS: usize = 1000;

/// Options controlling a container listing.
///
/// The default listing is hierarchical (delimiter roll-up at the top level),
/// summary-mode (no user metadata), and paginated at
/// [`DEFAULT_MAX_RESULTS`] entries.
///
/// # Example
///
/// ```
/// use nimbus_blobstore::ListContainerOptions;
///
/// let options = ListContainerOptions::default()
///     .with_prefix("photos/2024")
///     .with_max_results(100usize)
///     .with_recursive(true);
///
/// assert_eq!(options.max_results(), &Some(100));
/// ```
#[derive(Debug, Clone, Default, Getters, derive_setters::Setters)]
#[setters(prefix = "with_", strip_option, into)]
pub struct ListContainerOptions {
    /// Resume cursor: only entries with names strictly greater than the
    /// marker are returned
    marker: Option<String>,
    /// Directory prefix: only entries under this prefix are returned, never
    /// the prefix itself
    prefix: Option<String>,
    /// Page size cap; defaults to [`DEFAULT_MAX_RESULTS`]
    max_results: Option<usize>,
    /// Disable delimiter roll-up and list every nested key
    recursive: bool,
    /// Retain user metadata on returned entries
    detailed: bool,
}

/// Typed byte-range specifier for partial retrieval.
///
/// Bounds are zero-based byte offsets; `Bounded` is inclusive on both ends,
/// HTTP style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ByteRange {
    /// The last `n` bytes of the payload
    #[display("-{}", _0)]
    Tail(u64),
    /// Everything from this offset to the end
    #[display("{}-", _0)]
    From(u64),
    /// The closed interval `[first, last]`
    #[display("{}-{}", _0, _1)]
    Bounded(u64, u64),
}

/// Options controlling a single-blob retrieval: HTTP-style conditional
/// requests and partial content.
///
/// # Example
///
/// ```
/// use nimbus_blobstore::GetOptions;
///
/// let options = GetOptions::default()
///     .with_if_none_match("d41d8cd98f00b204e9800998ecf8427e")
///     .with_range(0, 1023);
///
/// assert_eq!(options.ranges().len(), 1);
/// ```
#[derive(Debug, Clone, Default, Getters, derive_setters::Setters)]
#[setters(prefix = "with_", strip_option, into)]
pub struct GetOptions {
    /// Succeed only when the stored ETag equals this value
    if_match: Option<String>,
    /// Succeed only when the stored ETag differs from this value
    if_none_match: Option<String>,
    /// Succeed only when the blob changed at or after this instant
    if_modified_since: Option<DateTime<Utc>>,
    /// Succeed only when the blob has not changed since this instant
    if_unmodified_since: Option<DateTime<Utc>>,
    /// Byte ranges to return, concatenated in request order
    #[setters(skip)]
    ranges: Vec<ByteRange>,
}

impl GetOptions {
    /// Request the closed byte interval `[first, last]`.
    pub fn with_range(mut self, first: u64, last: u64) -> Self {
        self.ranges.push(ByteRange::Bounded(first, last));
        self
    }

    /// Request everything from `offset` to the end of the payload.
    pub fn with_start_at(mut self, offset: u64) -> Self {
        self.ranges.push(ByteRange::From(offset));
        self
    }

    /// Request the last `n` bytes of the payload.
    pub fn with_tail(mut self, n: u64) -> Self {
        self.ranges.push(ByteRange::Tail(n));
        self
    }
}

/// Options controlling container creation.
#[derive(Debug, Clone, Copy, Default, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct CreateContainerOptions {
    /// Request anonymous read access (not supported by local backends)
    public_read: bool,
}
