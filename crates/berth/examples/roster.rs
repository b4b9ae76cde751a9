//! Roster demo: queue three people in a 1 KiB arena, list them, then
//! process them in arrival order.
//!
//! Set `RUST_LOG=berth_arena=debug` to watch the arena place and release
//! each node block.

use berth::prelude::*;
use berth_test_utils::{roster, Person};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init()?;

    let arena = FixedArena::new(ArenaConfig::default())?;
    let mut people: ArenaQueue<'_, Person> = ArenaQueue::new(&arena);
    people.try_extend(roster())?;

    println!("Person queue for task verification:");
    println!("Total in queue: {} persons\n", people.len());
    if let (Some(first), Some(last)) = (people.front(), people.back()) {
        println!("First: {first}");
        println!("Last: {last}");
    }

    println!("\nQueue traversal:");
    for (pos, person) in people.iter().enumerate() {
        println!("{}. {person}", pos + 1);
    }

    while let Some(current) = people.dequeue() {
        println!("Processing: {current}");
        println!("Remaining: {} persons", people.len());
        if let Some(next) = people.front() {
            println!("Next: {next}\n");
        }
    }

    println!("All persons processed.");
    Ok(())
}
