// src/probe/window.rs
// =============================================================================
// Bounded-concurrency mapping: run an async function over many items with at
// most `limit` of them in flight, and hand the results back in input order.
//
// The quick way to do this is `stream::iter(..).buffer_unordered(n)`. We use
// the same engine (FuturesUnordered is what buffer_unordered uses inside)
// but drive it by hand so the window is explicit:
//
//   - an item STARTS when it is pushed into the window
//   - an item SETTLES when the window yields it back from next()
//
// next() tells us exactly which operation finished (by its index), so a slot
// is freed the moment its operation settles and never before.
//
// Failure policy: results are captured per item. If the mapped function is
// fallible, make it return a Result; a failed item still settles, frees its
// slot, and its Err sits at its own index. One bad item never aborts the batch.
// =============================================================================

use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use tracing::trace;

/// Maps `f` over `items` with at most `limit` futures in flight.
///
/// The output has one entry per input, in input order. The call returns only
/// once every item has settled. A `limit` of 0 is treated as 1.
pub async fn map_bounded<I, T, R, F, Fut>(items: I, limit: usize, mut f: F) -> Vec<R>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = R>,
{
    let limit = limit.max(1);
    let mut pending = items.into_iter().enumerate();
    let mut window = FuturesUnordered::new();
    let mut slots: Vec<Option<R>> = Vec::new();

    loop {
        // Admit new work while there is a free slot
        while window.len() < limit {
            let Some((index, item)) = pending.next() else {
                break;
            };
            slots.push(None);
            let operation = f(item);
            window.push(async move { (index, operation.await) });
            trace!(index, in_flight = window.len(), "operation started");
        }

        // Wait for one settlement; an empty window means we're done
        match window.next().await {
            Some((index, result)) => {
                slots[index] = Some(result);
                trace!(index, in_flight = window.len(), "operation settled");
            }
            None => break,
        }
    }

    debug_assert!(slots.iter().all(Option::is_some));
    slots.into_iter().flatten().collect()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is FuturesUnordered?
//    - A set of futures polled together
//    - next() resolves with whichever future finishes first
//    - len() is the number of futures still inside (our in-flight count)
//
// 2. Why not just buffer_unordered(n) and sort?
//    - It would work, but the window would be hidden inside the stream
//    - Driving it by hand makes "start" and "settle" two visible lines of code
//
// 3. Why Vec<Option<R>>?
//    - Results arrive out of order
//    - Each one is parked at its input index, so the output order is the input order
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::{Cell, RefCell};

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
    }

    // Stand-in for a network call: give control back to the scheduler a few times
    async fn pretend_io(ticks: usize) {
        for _ in 0..ticks {
            tokio::task::yield_now().await;
        }
    }

    proptest! {
        #[test]
        fn window_never_exceeds_limit(
            limit in 1usize..8,
            ticks in proptest::collection::vec(0usize..6, 0..40),
        ) {
            let in_flight = Cell::new(0usize);
            let peak = Cell::new(0usize);
            let n = ticks.len();

            let results = runtime().block_on(map_bounded(ticks.clone().into_iter().enumerate(), limit, |(i, t)| {
                let in_flight = &in_flight;
                let peak = &peak;
                async move {
                    in_flight.set(in_flight.get() + 1);
                    peak.set(peak.get().max(in_flight.get()));
                    pretend_io(t).await;
                    in_flight.set(in_flight.get() - 1);
                    i * 10
                }
            }));

            prop_assert!(peak.get() <= limit);
            prop_assert_eq!(results.len(), n);
            prop_assert_eq!(results, (0..n).map(|i| i * 10).collect::<Vec<_>>());
            prop_assert_eq!(in_flight.get(), 0);
        }

        #[test]
        fn window_fills_up_to_limit(limit in 1usize..8, n in 1usize..30) {
            let in_flight = Cell::new(0usize);
            let peak = Cell::new(0usize);

            runtime().block_on(map_bounded(0..n, limit, |_| {
                let in_flight = &in_flight;
                let peak = &peak;
                async move {
                    in_flight.set(in_flight.get() + 1);
                    peak.set(peak.get().max(in_flight.get()));
                    pretend_io(3).await;
                    in_flight.set(in_flight.get() - 1);
                }
            }));

            prop_assert_eq!(peak.get(), limit.min(n));
        }
    }

    #[tokio::test]
    async fn test_empty_input() {
        let results: Vec<u32> = map_bounded(Vec::<u32>::new(), 4, |x| async move { x }).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_zero_limit_still_runs_everything() {
        let results = map_bounded(vec![1, 2, 3], 0, |x| async move { x * 2 }).await;
        assert_eq!(results, vec![2, 4, 6]);
    }

    #[tokio::test]
    async fn test_slow_item_does_not_hold_up_the_rest() {
        let finished = RefCell::new(Vec::new());

        map_bounded(vec![0usize, 1, 2, 3, 4], 2, |i| {
            let finished = &finished;
            async move {
                pretend_io(if i == 0 { 50 } else { 1 }).await;
                finished.borrow_mut().push(i);
            }
        })
        .await;

        // The slow item keeps one slot busy while the others cycle through the other
        assert_eq!(finished.into_inner(), vec![1, 2, 3, 4, 0]);
    }

    #[tokio::test]
    async fn test_failures_are_captured_per_item() {
        let results = map_bounded(vec![1, 2, 3, 4], 2, |x| async move {
            pretend_io(x).await;
            if x == 2 {
                Err(format!("item {} failed", x))
            } else {
                Ok(x)
            }
        })
        .await;

        assert_eq!(results.len(), 4);
        assert_eq!(results[0], Ok(1));
        assert_eq!(results[1], Err("item 2 failed".to_string()));
        assert_eq!(results[2], Ok(3));
        assert_eq!(results[3], Ok(4));
    }
}
