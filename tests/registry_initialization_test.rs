//! Process-wide registry initialization tests
//!
//! Kept in their own test binary: the global registry is built at most once
//! per process, so no other test may touch it first.

use schemachat::function::{
    get_registry, initialize_registry, DefinitionProvider, FunctionDefinition, RegistryResult,
};
use schemachat::tools::{Lint, List};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

static DISCOVERIES: AtomicUsize = AtomicUsize::new(0);

/// Counts how often it is asked for definitions.
struct Counting;

impl DefinitionProvider for Counting {
    fn name(&self) -> &str {
        "counting"
    }

    fn discover(&self) -> RegistryResult<Vec<FunctionDefinition>> {
        DISCOVERIES.fetch_add(1, Ordering::SeqCst);
        // Widen the window in which other threads race the build.
        thread::sleep(Duration::from_millis(20));
        Ok(vec![FunctionDefinition::of::<List>(), FunctionDefinition::of::<Lint>()])
    }
}

#[test]
fn test_concurrent_initialization_builds_once() {
    let addresses: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    let registry = initialize_registry(&[&Counting]).unwrap();
                    registry as *const _ as usize
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    assert_eq!(DISCOVERIES.load(Ordering::SeqCst), 1);
    assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));

    // Later callers see the first registry, whatever they ask for.
    let registry = get_registry().unwrap();
    assert_eq!(registry as *const _ as usize, addresses[0]);
    assert!(std::ptr::eq(registry, initialize_registry(&[]).unwrap()));
    assert_eq!(registry.names(), vec!["lint", "list"]);
    assert_eq!(DISCOVERIES.load(Ordering::SeqCst), 1);
}
