//! Prints which node owns each of the keys `A..=Z` while cluster membership
//! changes: four nodes, then one node removed, then another node added.
//!
//! Run with `RUST_LOG=vnring=debug` to see membership changes logged.

use {
    std::{collections::BTreeMap, error::Error},
    tracing_subscriber::EnvFilter,
    vnring::HashRing,
};

fn print_report(title: &str, report: &BTreeMap<&str, Vec<String>>) {
    println!("{title}");
    for (node, keys) in report {
        println!("{node}: {}", keys.join(","));
    }
    println!();
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let keys = ('A'..='Z').map(String::from).collect::<Vec<_>>();
    let ring = HashRing::with_nodes(["n1", "n2", "n3", "n4"])?;
    print_report("nodes: n1, n2, n3, n4", &ring.assignments(keys.clone())?);

    ring.remove(&"n4")?;
    print_report("nodes: n1, n2, n3", &ring.assignments(keys.clone())?);

    ring.add("n5")?;
    print_report("nodes: n1, n2, n3, n5", &ring.assignments(keys)?);

    Ok(())
}
