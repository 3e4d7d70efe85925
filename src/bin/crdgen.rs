//! CRD YAML Generator
//!
//! Prints the Kubernetes CRD manifest for the Memcached resource. Registering
//! the schema is a one-time install step, run before the operator starts.
//!
//! Usage: cargo run --bin crdgen > deploy/crds/memcached.yaml

use memcached_operator::crd::generate_crds;

fn main() -> anyhow::Result<()> {
    for crd in generate_crds()? {
        println!("---");
        print!("{}", crd);
    }
    Ok(())
}
