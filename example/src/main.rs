#![cfg_attr(test, cfg(test))]

mod parallel;
mod replay;

#[cfg_attr(test, test)]
fn main() {
    replay::main();
    parallel::main();
}
