//! Parallel batch generation.
//!
//! `count` requests are split into contiguous shards, one scoped thread per
//! shard. Each thread owns the output slots of its shard, so slot `i` always
//! holds the token of request `i` whatever order the threads finish in.

use std::mem;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tracing::debug;

use crate::error::BatchError;
use crate::producer::TokenProducer;

/// Split `0..count` into at most `workers` contiguous shards whose sizes differ
/// by at most one; the first `count % workers` shards take the extra unit.
pub fn shards(count: usize, workers: usize) -> Vec<Range<usize>> {
    if count == 0 {
        return Vec::new();
    }

    let workers = workers.clamp(1, count);
    let base = count / workers;
    let extra = count % workers;

    let mut start = 0;
    (0..workers)
        .map(|shard| {
            let len = base + usize::from(shard < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}

/// Generate `count` tokens using every available CPU.
pub fn generate<P>(count: usize, producer: &P) -> Result<Vec<String>, BatchError>
where
    P: TokenProducer + ?Sized,
{
    generate_with_workers(count, 0, producer)
}

/// Generate `count` tokens on `workers` threads (`0` picks the CPU count).
///
/// The first failure stops every worker after the unit it is working on; the
/// error of the lowest failing shard is returned and no tokens are.
pub fn generate_with_workers<P>(
    count: usize,
    workers: usize,
    producer: &P,
) -> Result<Vec<String>, BatchError>
where
    P: TokenProducer + ?Sized,
{
    if count == 0 {
        return Ok(Vec::new());
    }

    let workers = if workers == 0 { num_cpus::get() } else { workers };
    let plan = shards(count, workers);
    debug!(count, workers = plan.len(), "dispatching token batch");

    let mut tokens = vec![String::new(); count];
    let abort = AtomicBool::new(false);

    let failure = thread::scope(|scope| {
        let mut rest = tokens.as_mut_slice();
        let handles: Vec<_> = plan
            .into_iter()
            .enumerate()
            .map(|(shard, range)| {
                let (slots, tail) = mem::take(&mut rest).split_at_mut(range.len());
                rest = tail;
                let abort = &abort;
                scope.spawn(move || run_shard(shard, range, slots, producer, abort))
            })
            .collect();

        // Join in shard order so the lowest failing shard wins.
        let mut failure = None;
        for handle in handles {
            match handle.join() {
                Ok(Err(err)) if failure.is_none() => failure = Some(err),
                Ok(_) => {}
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        failure
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(tokens),
    }
}

fn run_shard<P>(
    shard: usize,
    range: Range<usize>,
    slots: &mut [String],
    producer: &P,
    abort: &AtomicBool,
) -> Result<(), BatchError>
where
    P: TokenProducer + ?Sized,
{
    for (index, slot) in range.zip(slots.iter_mut()) {
        if abort.load(Ordering::Relaxed) {
            break;
        }
        match producer.produce() {
            Ok(token) => *slot = token,
            Err(source) => {
                abort.store(true, Ordering::Relaxed);
                return Err(BatchError {
                    shard,
                    index,
                    source,
                });
            }
        }
    }
    Ok(())
}
