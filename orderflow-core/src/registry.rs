use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use crate::{CoreError, CoreResult};

/// Zero-argument constructor for a capability instance
pub type Factory<C> = Arc<dyn Fn() -> Box<C> + Send + Sync>;

/// Runtime mapping from a tag to the factory producing a capability.
///
/// Registration takes `&mut self`, so a registry is filled during startup
/// and then shared behind an `Arc`, where only lookups are possible.
/// Factories run on every [`create`](Self::create); instances are never cached.
pub struct CapabilityRegistry<K, C: ?Sized> {
    kind: &'static str,
    factories: BTreeMap<K, Factory<C>>,
}

impl<K, C> CapabilityRegistry<K, C>
where
    K: Ord + Clone + fmt::Display,
    C: ?Sized,
{
    /// `kind` names the capability in errors and logs (e.g. "payment method")
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            factories: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Register a factory for `tag`. An existing factory for the same tag is replaced.
    pub fn register<F>(&mut self, tag: K, factory: F) -> &mut Self
    where
        F: Fn() -> Box<C> + Send + Sync + 'static,
    {
        if self.factories.insert(tag.clone(), Arc::new(factory)).is_some() {
            warn!(kind = self.kind, tag = %tag, "Replaced previously registered factory");
        } else {
            debug!(kind = self.kind, tag = %tag, "Registered factory");
        }
        self
    }

    /// Build a fresh capability for `tag`
    pub fn create(&self, tag: &K) -> CoreResult<Box<C>> {
        let factory = self
            .factories
            .get(tag)
            .ok_or_else(|| CoreError::UnregisteredCapability {
                kind: self.kind,
                tag: tag.to_string(),
            })?;
        Ok(factory())
    }

    /// Instantiate every registered capability, in tag order
    pub fn create_all(&self) -> Vec<(K, Box<C>)> {
        self.factories
            .iter()
            .map(|(tag, factory)| (tag.clone(), factory()))
            .collect()
    }

    pub fn tags(&self) -> Vec<K> {
        self.factories.keys().cloned().collect()
    }

    pub fn contains(&self, tag: &K) -> bool {
        self.factories.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<K: Clone, C: ?Sized> Clone for CapabilityRegistry<K, C> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            factories: self.factories.clone(),
        }
    }
}

impl<K: fmt::Debug, C: ?Sized> fmt::Debug for CapabilityRegistry<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("kind", &self.kind)
            .field("tags", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct Fixed(&'static str);

    impl Greeter for Fixed {
        fn greet(&self) -> String {
            self.0.to_string()
        }
    }

    fn registry() -> CapabilityRegistry<String, dyn Greeter> {
        CapabilityRegistry::new("greeter")
    }

    #[test]
    fn test_create_uses_registered_factory() {
        let mut reg = registry();
        reg.register("hello".to_string(), || Box::new(Fixed("hi")));

        let greeter = reg.create(&"hello".to_string()).unwrap();
        assert_eq!(greeter.greet(), "hi");
    }

    #[test]
    fn test_unregistered_tag_fails() {
        let reg = registry();
        let err = reg.create(&"missing".to_string()).err().unwrap();
        match err {
            CoreError::UnregisteredCapability { kind, tag } => {
                assert_eq!(kind, "greeter");
                assert_eq!(tag, "missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_last_registration_wins() {
        let mut reg = registry();
        reg.register("hello".to_string(), || Box::new(Fixed("first")))
            .register("hello".to_string(), || Box::new(Fixed("second")));

        assert_eq!(reg.len(), 1);
        assert_eq!(reg.create(&"hello".to_string()).unwrap().greet(), "second");
    }

    #[test]
    fn test_factory_runs_on_every_create() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut reg = registry();
        reg.register("hello".to_string(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::new(Fixed("hi"))
        });

        reg.create(&"hello".to_string()).unwrap();
        reg.create(&"hello".to_string()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_tags_and_create_all() {
        let mut reg = registry();
        assert!(reg.is_empty());
        reg.register("b".to_string(), || Box::new(Fixed("b")))
            .register("a".to_string(), || Box::new(Fixed("a")));

        assert_eq!(reg.tags(), vec!["a".to_string(), "b".to_string()]);
        assert!(reg.contains(&"a".to_string()));
        assert!(!reg.contains(&"c".to_string()));

        let greetings: Vec<String> = reg
            .create_all()
            .into_iter()
            .map(|(_, greeter)| greeter.greet())
            .collect();
        assert_eq!(greetings, vec!["a", "b"]);
    }

    #[test]
    fn test_shared_registry_concurrent_lookups() {
        let mut reg = registry();
        reg.register("hello".to_string(), || Box::new(Fixed("hi")));
        let shared = Arc::new(reg);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = shared.clone();
                std::thread::spawn(move || reg.create(&"hello".to_string()).unwrap().greet())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "hi");
        }
    }
}
