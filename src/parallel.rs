use crate::array::Array;
use crate::buffer::Storage;
use crate::config;
use crate::error::Result;
use crate::range_distributor::RangeDistributor;
use crate::types::Numeric;

/// Scalar operation applied by [`par_apply_scalar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ScalarOp {
    fn apply<T: Numeric>(self, data: &mut [T], rhs: T) {
        match self {
            ScalarOp::Add => data.iter_mut().for_each(|a| *a += rhs),
            ScalarOp::Sub => data.iter_mut().for_each(|a| *a -= rhs),
            ScalarOp::Mul => data.iter_mut().for_each(|a| *a *= rhs),
            ScalarOp::Div => data.iter_mut().for_each(|a| *a /= rhs),
        }
    }
}

/// Apply `op` with `rhs` to every element of `array` on `threads` workers
/// (default: [`config::global`]). Each worker owns one disjoint interval of
/// the linear storage, so no locking is involved.
pub fn par_apply_scalar<T, S>(
    array: &mut Array<T, S>,
    op: ScalarOp,
    rhs: T,
    threads: Option<usize>,
) -> Result<()>
where
    T: Numeric,
    S: Storage<T>,
{
    let threads = threads.unwrap_or_else(|| config::global().arithmetic_threads);
    let dist = RangeDistributor::new(threads, array.size())?;

    let mut rest = array.as_mut_slice();
    let mut chunks = Vec::with_capacity(dist.parts());
    for range in &dist {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
        chunks.push((range, head));
        rest = tail;
    }

    let joined = crossbeam::thread::scope(|s| {
        for (range, chunk) in chunks.into_iter().filter(|(r, _)| !r.is_empty()) {
            s.spawn(move |_| {
                tracing::trace!(start = range.start, end = range.end, ?op, "worker range");
                op.apply(chunk, rhs);
            });
        }
    });
    if let Err(panic) = joined {
        std::panic::resume_unwind(panic);
    }
    Ok(())
}
