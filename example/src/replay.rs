use std::time::{Duration, Instant};

use memostream::{sources::from_fn, MemoizeExt, Never};

#[cfg_attr(test, test)]
pub fn main() {
    println!("----- replay example -----\n");

    let mut produced = 0;
    let cache = from_fn(move || {
        produced += 1;
        let item = (produced <= 3).then_some(produced - 1);
        async move {
            if item.is_some() {
                std::thread::sleep(Duration::from_millis(50));
            }
            Ok::<_, Never>(item)
        }
    })
    .memoize();

    for pass in ["first", "second"] {
        let start = Instant::now();
        let mut cursor = cache.cursor().expect("cache is open");
        let mut items = Vec::new();
        while let Some(entry) = pollster::block_on(cursor.advance()).expect("source never fails") {
            items.push(*entry);
        }
        let elapsed = start.elapsed();

        println!("{} pass: {:?}", pass, items);
        println!("elapsed: {:?}", elapsed);
        println!("source calls: {}", cache.stats().source_calls());
        println!();
    }
}
