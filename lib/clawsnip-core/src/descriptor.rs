//! Insertion-ordered storage of documentation descriptors.

use indexmap::IndexMap;

use crate::SnippetError;

/// A caller-supplied description of one documented item (a field or a link).
pub trait Descriptor {
    /// The identifying key: a field path or a link relation.
    fn key(&self) -> &str;

    /// The human readable description.
    fn description(&self) -> &str;

    /// Whether the item may be absent from the exchange.
    fn is_optional(&self) -> bool;
}

/// Descriptors keyed by [`Descriptor::key`], iterated in registration order.
///
/// Registering a key a second time replaces the earlier descriptor *and* moves it to the
/// position of the latest registration.
#[derive(Debug, Clone)]
pub struct DescriptorRegistry<D> {
    entries: IndexMap<String, D>,
}

impl<D> Default for DescriptorRegistry<D> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<D: Descriptor> DescriptorRegistry<D> {
    /// Builds a registry from a sequence of descriptors.
    ///
    /// # Errors
    ///
    /// See [`DescriptorRegistry::register`].
    pub fn new(descriptors: impl IntoIterator<Item = D>) -> Result<Self, SnippetError> {
        let mut registry = Self::default();
        registry.register(descriptors)?;
        Ok(registry)
    }

    /// Validates then stores every descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::InvalidDescriptor`] naming the index and key of the first
    /// descriptor with an empty key or description. Nothing is stored in that case.
    pub fn register(&mut self, descriptors: impl IntoIterator<Item = D>) -> Result<(), SnippetError> {
        let descriptors = descriptors.into_iter().collect::<Vec<_>>();

        for (index, descriptor) in descriptors.iter().enumerate() {
            let reason = if descriptor.key().trim().is_empty() {
                "key must not be empty"
            } else if descriptor.description().trim().is_empty() {
                "description must not be empty"
            } else {
                continue;
            };
            return Err(SnippetError::InvalidDescriptor {
                index,
                key: descriptor.key().to_string(),
                reason: reason.to_string(),
            });
        }

        for descriptor in descriptors {
            let key = descriptor.key().to_string();
            self.entries.shift_remove(&key);
            self.entries.insert(key, descriptor);
        }
        Ok(())
    }

    /// Looks up the descriptor registered for `key`.
    pub fn get(&self, key: &str) -> Option<&D> {
        self.entries.get(key)
    }

    /// Returns `true` when `key` has been registered.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &D> {
        self.entries.values()
    }

    /// Iterates over registered keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over descriptors that must be present in the exchange.
    pub fn required(&self) -> impl Iterator<Item = &D> {
        self.iter().filter(|descriptor| !descriptor.is_optional())
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Named(&'static str, &'static str, bool);

    impl Descriptor for Named {
        fn key(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            self.1
        }

        fn is_optional(&self) -> bool {
            self.2
        }
    }

    #[test]
    fn should_keep_registration_order() {
        let registry = DescriptorRegistry::new([
            Named("c", "third", false),
            Named("a", "first", false),
            Named("b", "second", true),
        ])
        .expect("valid descriptors");

        assert_eq!(registry.keys().collect::<Vec<_>>(), ["c", "a", "b"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn should_move_duplicate_to_last_position() {
        let registry = DescriptorRegistry::new([
            Named("a", "first", false),
            Named("b", "second", false),
            Named("a", "replaced", true),
        ])
        .expect("valid descriptors");

        assert_eq!(registry.keys().collect::<Vec<_>>(), ["b", "a"]);
        let replaced = registry.get("a").expect("registered");
        assert_eq!(replaced.description(), "replaced");
        assert!(replaced.is_optional());
    }

    #[test]
    fn should_list_required_descriptors() {
        let registry = DescriptorRegistry::new([
            Named("self", "Self link", false),
            Named("next", "Next page", true),
        ])
        .expect("valid descriptors");

        let required: Vec<_> = registry.required().map(Descriptor::key).collect();
        assert_eq!(required, ["self"]);
    }

    #[test]
    fn should_reject_empty_description_with_index() {
        let error = DescriptorRegistry::new([Named("a", "ok", false), Named("b", " ", false)])
            .expect_err("should fail");

        insta::assert_snapshot!(error, @"Invalid descriptor #1 ('b'): description must not be empty");
    }

    #[test]
    fn should_reject_empty_key_and_store_nothing() {
        let mut registry = DescriptorRegistry::default();
        let result = registry.register([Named("a", "ok", false), Named("", "empty", false)]);

        assert!(matches!(
            result,
            Err(SnippetError::InvalidDescriptor { index: 1, .. })
        ));
        assert!(registry.is_empty());
    }
}
