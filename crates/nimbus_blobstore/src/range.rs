//! Byte-range slicing for partial retrieval.

use crate::ByteRange;
use nimbus_error::{BlobStoreError, BlobStoreErrorKind};

/// Concatenate the requested ranges of `data`, in request order.
///
/// High bounds clamp to the payload length; low bounds never clamp. A
/// descending interval or a low bound beyond the payload end fails fast
/// with an invalid-range error.
pub(crate) fn apply_ranges(data: &[u8], ranges: &[ByteRange]) -> Result<Vec<u8>, BlobStoreError> {
    let len = data.len() as u64;
    let mut out = Vec::new();
    for range in ranges {
        match *range {
            ByteRange::Tail(n) => {
                let take = n.min(len);
                out.extend_from_slice(&data[(len - take) as usize..]);
            }
            ByteRange::From(offset) => {
                if offset > len {
                    return Err(invalid(range, len));
                }
                out.extend_from_slice(&data[offset as usize..]);
            }
            ByteRange::Bounded(first, last) => {
                if first > last || first >= len {
                    return Err(invalid(range, len));
                }
                // closed interval, +1 to convert to a half-open slice
                let end = last.min(len - 1) + 1;
                out.extend_from_slice(&data[first as usize..end as usize]);
            }
        }
    }
    Ok(out)
}

fn invalid(range: &ByteRange, len: u64) -> BlobStoreError {
    BlobStoreError::new(BlobStoreErrorKind::InvalidRange(format!(
        "{} cannot be taken from a {} byte payload",
        range, len
    )))
}
