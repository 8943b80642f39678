//=========================================================================
// Service Registry
//=========================================================================
//
// Capability lookup for collaborators that are wired at startup.
//
// Architecture:
//   register::<dyn C>(Rc<impl C>) → HashMap<TypeId, Box<dyn Any>>
//                                        ↓
//   get::<dyn C>() ← Rc<dyn C> (shared) or ServiceNotFound
//
// The registry is an ordinary value owned by the composition root
// (`Session`), never a process-wide static.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::error::ServiceError;

//=== ServiceRegistry =====================================================

/// Maps a capability type (usually a trait object) to one shared instance.
///
/// Each entry stores an `Rc<C>` behind `dyn Any`, keyed by `TypeId::of::<C>()`.
/// Lookups clone the `Rc`, so every consumer shares the same instance.
///
/// ```
/// use std::rc::Rc;
/// use campsite::core::registry::ServiceRegistry;
///
/// trait Greeter { fn greet(&self) -> &'static str; }
/// struct Hello;
/// impl Greeter for Hello { fn greet(&self) -> &'static str { "hello" } }
///
/// let mut registry = ServiceRegistry::new();
/// registry.register::<dyn Greeter>(Rc::new(Hello));
/// assert_eq!(registry.get::<dyn Greeter>().unwrap().greet(), "hello");
/// ```
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<TypeId, Box<dyn Any>>,
}

impl ServiceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers `instance` as the provider of capability `C`.
    ///
    /// A second registration for the same capability replaces the first.
    pub fn register<C: ?Sized + 'static>(&mut self, instance: Rc<C>) {
        let name = std::any::type_name::<C>();
        if self
            .services
            .insert(TypeId::of::<C>(), Box::new(instance))
            .is_some()
        {
            warn!("Service {} was already registered and has been replaced", name);
        } else {
            debug!("Registered service {}", name);
        }
    }

    //--- Lookup -----------------------------------------------------------

    /// Resolves the provider of `C`.
    ///
    /// Fails with [`ServiceError::ServiceNotFound`] if `C` was never registered.
    pub fn get<C: ?Sized + 'static>(&self) -> Result<Rc<C>, ServiceError> {
        self.services
            .get(&TypeId::of::<C>())
            .and_then(|boxed| boxed.downcast_ref::<Rc<C>>())
            .cloned()
            .ok_or_else(ServiceError::not_found::<C>)
    }

    /// Returns true if a provider of `C` is registered.
    pub fn contains<C: ?Sized + 'static>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<C>())
    }

    /// Returns the number of registered capabilities.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    trait Counter {
        fn bump(&self) -> u32;
    }

    struct CellCounter(Cell<u32>);

    impl Counter for CellCounter {
        fn bump(&self) -> u32 {
            self.0.set(self.0.get() + 1);
            self.0.get()
        }
    }

    trait Unused {}

    #[test]
    fn new_registry_is_empty() {
        let registry = ServiceRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.contains::<dyn Counter>());
    }

    #[test]
    fn get_unregistered_fails_with_not_found() {
        let registry = ServiceRegistry::new();
        let result = registry.get::<dyn Unused>();
        assert!(matches!(result, Err(ServiceError::ServiceNotFound { .. })));
    }

    #[test]
    fn lookups_share_one_instance() {
        let mut registry = ServiceRegistry::new();
        registry.register::<dyn Counter>(Rc::new(CellCounter(Cell::new(0))));

        let first = registry.get::<dyn Counter>().unwrap();
        let second = registry.get::<dyn Counter>().unwrap();
        assert_eq!(first.bump(), 1);
        assert_eq!(second.bump(), 2);
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn concrete_and_trait_object_keys_are_distinct() {
        let mut registry = ServiceRegistry::new();
        registry.register(Rc::new(CellCounter(Cell::new(7))));

        assert!(registry.contains::<CellCounter>());
        assert!(registry.get::<dyn Counter>().is_err());
    }

    #[test]
    fn register_twice_replaces() {
        let mut registry = ServiceRegistry::new();
        registry.register::<dyn Counter>(Rc::new(CellCounter(Cell::new(0))));
        registry.register::<dyn Counter>(Rc::new(CellCounter(Cell::new(10))));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get::<dyn Counter>().unwrap().bump(), 11);
    }
}
