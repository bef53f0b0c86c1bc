//! Shared index-stream resolution used by both format parsers.

use thiserror::Error;

/// Index numbering used by a format's index streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IndexBase {
    /// COLLADA streams index their pools from zero.
    Zero,
    /// Wavefront OBJ faces index their pools from one.
    One,
}

impl IndexBase {
    fn offset(self) -> u32 {
        match self {
            IndexBase::Zero => 0,
            IndexBase::One => 1,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("{kind} index {index} does not fit a pool of {pool_len} entries")]
pub(crate) struct OutOfBounds {
    pub(crate) kind: &'static str,
    pub(crate) index: u32,
    pub(crate) pool_len: usize,
}

/// Flattens one index stream against its attribute pool.
///
/// Appends `pool[index - base]` in stream order, one output entry per
/// stream entry. No reordering, filtering or welding; corners shared
/// between triangles come out duplicated.
pub(crate) fn resolve<T: Copy>(
    kind: &'static str,
    pool: &[T],
    stream: &[u32],
    base: IndexBase,
) -> Result<Vec<T>, OutOfBounds> {
    let offset = base.offset();
    let mut flat = Vec::with_capacity(stream.len());

    for &index in stream {
        let slot = index
            .checked_sub(offset)
            .map(|i| i as usize)
            .filter(|&i| i < pool.len())
            .ok_or(OutOfBounds {
                kind,
                index,
                pool_len: pool.len(),
            })?;
        flat.push(pool[slot]);
    }

    Ok(flat)
}
