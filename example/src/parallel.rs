use std::{
    ops::Range,
    sync::Barrier,
    time::{Duration, Instant},
};

use memostream::{
    sources::IteratorSource, task_spawner::ThreadSpawner, Admission, CacheParameter,
    ContendedCache, MemoCache, MemoizeExt,
};

#[cfg_attr(test, test)]
pub fn main() {
    println!("----- parallel example -----\n");

    let count = 10000;
    let workers = 20;

    let contended = ContendedCache::with_parameter(
        IteratorSource::new(0..count),
        CacheParameter::default().with_label("contended"),
    );
    let (sum, elapsed) = run(&contended, workers);
    println!("contended sum: {} elapsed: {:?}", sum, elapsed);
    println!("{:?}", contended.stats());
    println!();

    let preloading = IteratorSource::new(0..count).preload(ThreadSpawner);
    let (sum, elapsed) = run(&preloading, workers);
    println!("preloading sum: {} elapsed: {:?}", sum, elapsed);
    println!("{:?}", preloading.stats());
    println!();

    assert_eq!(sum, (0..count).sum());
}

fn run<A>(cache: &MemoCache<A>, workers: usize) -> (u64, Duration)
where
    A: Admission<Source = IteratorSource<Range<u64>>> + Send + Sync,
{
    let barrier = Barrier::new(workers);
    let start = Instant::now();

    let sums: Vec<u64> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let cursor = cache.cursor().expect("cache is open");
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    cursor
                        .blocking()
                        .map(|entry| *entry.expect("source never fails"))
                        .sum::<u64>()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker panicked"))
            .collect()
    });

    assert!(sums.windows(2).all(|w| w[0] == w[1]));
    (sums[0], start.elapsed())
}
