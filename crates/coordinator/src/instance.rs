//! Per-process identity used as the prefix of every lease holder id.

use uuid::Uuid;

/// Generate an instance id unique across processes and restarts.
///
/// The pid keeps ids readable in the `locks` table; the uuid keeps them
/// unique across hosts and pid reuse.
pub fn generate_instance_id() -> String {
    format!("{}-{}", std::process::id(), Uuid::new_v4().simple())
}

/// Build the holder id for a single lease taken by this instance.
///
/// Each lease gets its own nonce so two tasks of the same instance never
/// share a holder id and cannot release each other's leases.
pub fn lease_holder_id(instance_id: &str) -> String {
    format!("{instance_id}:{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_ids_are_unique() {
        assert_ne!(generate_instance_id(), generate_instance_id());
    }

    #[test]
    fn instance_id_starts_with_pid() {
        let id = generate_instance_id();
        assert!(id.starts_with(&format!("{}-", std::process::id())));
    }

    #[test]
    fn holder_ids_are_scoped_to_the_instance_and_unique() {
        let a = lease_holder_id("node-a");
        let b = lease_holder_id("node-a");
        assert!(a.starts_with("node-a:"));
        assert_ne!(a, b);
    }
}
