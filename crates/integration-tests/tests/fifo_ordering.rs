//! FIFO Ordering Tests
//!
//! Workers finish in any order; reads must still come out in insertion order.

mod common;

use common::{init_tracing, IDLE_TIMEOUT};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use workpool_core::{OrderedWorkList, ProcessOutcome};

fn jittered_doubler(workers: usize) -> anyhow::Result<OrderedWorkList<u64>> {
    let list = OrderedWorkList::builder()
        .processor(|n: &u64| {
            let micros = rand::thread_rng().gen_range(0..500);
            thread::sleep(Duration::from_micros(micros));
            ProcessOutcome::keep(n * 2)
        })
        .workers(workers)
        .build()?;
    Ok(list)
}

/// Scenario: "a", "b", "c" through a single identity worker
#[test]
fn test_single_worker_identity_returns_input() -> anyhow::Result<()> {
    init_tracing();
    let list = OrderedWorkList::builder()
        .processor(|s: &String| ProcessOutcome::keep(s.clone()))
        .workers(1)
        .build()?;

    for s in ["a", "b", "c"] {
        list.insert(s.to_string());
    }

    assert!(list.wait_idle(IDLE_TIMEOUT));
    assert_eq!(list.read(None), vec!["a", "b", "c"]);
    list.join()?;
    Ok(())
}

/// Output order is insertion order regardless of worker count
#[test]
fn test_order_independent_of_worker_count() -> anyhow::Result<()> {
    init_tracing();
    let input: Vec<u64> = (0..300).collect();
    let expected: Vec<u64> = input.iter().map(|n| n * 2).collect();

    for workers in [1, 2, 4, 8, 16] {
        let list = jittered_doubler(workers)?;
        for n in &input {
            list.insert(*n);
        }

        assert!(list.wait_idle(IDLE_TIMEOUT), "workers={} never went idle", workers);
        assert_eq!(list.read(None), expected, "workers={}", workers);
        list.join()?;
    }
    Ok(())
}

/// A slow oldest item holds back every newer finished item
#[test]
fn test_no_premature_delivery() -> anyhow::Result<()> {
    init_tracing();
    let gate = Arc::new(AtomicBool::new(false));
    let processor_gate = Arc::clone(&gate);

    let list = OrderedWorkList::builder()
        .processor(move |n: &u32| {
            if *n == 0 {
                while !processor_gate.load(Ordering::Acquire) {
                    thread::sleep(Duration::from_millis(1));
                }
            }
            ProcessOutcome::keep(*n)
        })
        .workers(4)
        .build()?;

    for n in 0..6 {
        list.insert(n);
    }

    // Everything but the gated head finishes
    let deadline = Instant::now() + IDLE_TIMEOUT;
    while list.stats().processed < 5 {
        assert!(Instant::now() < deadline, "newer items never finished");
        thread::sleep(Duration::from_millis(2));
    }
    assert_eq!(list.pending(), 1);
    assert!(list.read(None).is_empty());
    assert_eq!(list.len(), 6);

    gate.store(true, Ordering::Release);
    assert!(list.wait_idle(IDLE_TIMEOUT));
    assert_eq!(list.read(None), vec![0, 1, 2, 3, 4, 5]);
    list.join()?;
    Ok(())
}

/// Second read with nothing new inserted is empty
#[test]
fn test_drain_is_idempotent() -> anyhow::Result<()> {
    init_tracing();
    let list = jittered_doubler(4)?;
    for n in 0..50 {
        list.insert(n);
    }

    assert!(list.wait_idle(IDLE_TIMEOUT));
    assert_eq!(list.read(None).len(), 50);
    assert!(list.read(None).is_empty());
    assert!(list.is_empty());
    list.join()?;
    Ok(())
}

/// Bounded reads hand out consecutive slices of the same ordered stream
#[test]
fn test_bounded_reads_concatenate_in_order() -> anyhow::Result<()> {
    init_tracing();
    let list = jittered_doubler(4)?;
    for n in 0..100 {
        list.insert(n);
    }
    assert!(list.wait_idle(IDLE_TIMEOUT));

    let mut out = Vec::new();
    loop {
        let batch = list.read(Some(7));
        assert!(batch.len() <= 7);
        if batch.is_empty() {
            break;
        }
        out.extend(batch);
    }

    let expected: Vec<u64> = (0..100).map(|n| n * 2).collect();
    assert_eq!(out, expected);
    list.join()?;
    Ok(())
}

/// Consumer reading while the producer is still inserting sees one ordered stream
#[test]
fn test_concurrent_read_while_inserting() -> anyhow::Result<()> {
    init_tracing();
    let list = Arc::new(jittered_doubler(8)?);
    const TOTAL: u64 = 2_000;

    let producer = {
        let list = Arc::clone(&list);
        thread::spawn(move || {
            for n in 0..TOTAL {
                list.insert(n);
                if n % 100 == 0 {
                    thread::yield_now();
                }
            }
        })
    };

    let deadline = Instant::now() + IDLE_TIMEOUT;
    let mut out = Vec::with_capacity(TOTAL as usize);
    while out.len() < TOTAL as usize {
        assert!(Instant::now() < deadline, "drained only {} items", out.len());
        let batch = list.read(None);
        if batch.is_empty() {
            thread::sleep(Duration::from_millis(1));
        }
        out.extend(batch);
    }
    producer.join().map_err(|_| anyhow::anyhow!("producer panicked"))?;

    let expected: Vec<u64> = (0..TOTAL).map(|n| n * 2).collect();
    assert_eq!(out, expected);
    list.join()?;
    Ok(())
}
