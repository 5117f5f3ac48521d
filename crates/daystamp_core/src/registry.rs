//! Named value transforms a tooltip can refer to.
//!
//! A tooltip configuration names its transform (`"transform": "secondsToYMD"`)
//! instead of embedding code. The renderer owns a [`TransformRegistry`] and
//! resolves that name when it draws the tooltip. Loading never replaces an
//! existing registry or its other entries, but it always reassigns
//! `secondsToYMD`, so the most recent load decides which time reference the
//! tooltip uses.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::date::seconds_to_ymd;
use crate::reference::TimeReference;

/// Registry key of the epoch-seconds to `YYYY-MM-DD` transform.
pub const SECONDS_TO_YMD: &str = "secondsToYMD";

/// A value transform: raw slider value in, display text out.
pub type Transform = Arc<dyn Fn(f64) -> String + Send + Sync>;

/// Transform that formats epoch seconds in `reference`.
pub fn seconds_to_ymd_transform(reference: TimeReference) -> Transform {
    Arc::new(move |value| seconds_to_ymd(value, reference))
}

/// Lookup table of named transforms.
#[derive(Clone, Default)]
pub struct TransformRegistry {
    transforms: BTreeMap<String, Transform>,
}

impl TransformRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in transforms for `reference`.
    pub fn with_builtins(reference: TimeReference) -> Self {
        let mut registry = Self::new();
        registry.register_builtins(reference);
        registry
    }

    /// Create the registry in `namespace` if it is absent, then assign
    /// [`SECONDS_TO_YMD`] for `reference`.
    ///
    /// An existing registry and its other entries are kept. The
    /// `secondsToYMD` entry is always reassigned: the last load wins.
    pub fn load(namespace: &mut Option<Self>, reference: TimeReference) -> &mut Self {
        if namespace.is_none() {
            log::debug!("creating transform registry");
        }
        let registry = namespace.get_or_insert_with(Self::new);
        if registry
            .replace(SECONDS_TO_YMD, seconds_to_ymd_transform(reference))
            .is_some()
        {
            log::debug!("reassigned '{}' for {} time", SECONDS_TO_YMD, reference);
        }
        registry
    }

    /// Add the built-in transforms that are not registered yet.
    pub fn register_builtins(&mut self, reference: TimeReference) {
        self.register(SECONDS_TO_YMD, seconds_to_ymd_transform(reference));
    }

    /// Register `transform` under `name` unless the name is taken.
    ///
    /// Returns `true` if the transform was inserted.
    pub fn register(&mut self, name: impl Into<String>, transform: Transform) -> bool {
        let name = name.into();
        if self.transforms.contains_key(&name) {
            log::debug!("transform '{}' already registered, keeping existing", name);
            return false;
        }
        self.transforms.insert(name, transform);
        true
    }

    /// Register `transform` under `name`, replacing any previous entry.
    ///
    /// Returns the replaced transform.
    pub fn replace(&mut self, name: impl Into<String>, transform: Transform) -> Option<Transform> {
        self.transforms.insert(name.into(), transform)
    }

    /// Look up a transform by name.
    pub fn get(&self, name: &str) -> Option<&Transform> {
        self.transforms.get(name)
    }

    /// Apply the transform registered under `name` to `value`.
    ///
    /// Returns `None` if no transform has that name.
    pub fn apply(&self, name: &str, value: f64) -> Option<String> {
        self.get(name).map(|transform| transform(value))
    }

    /// Whether a transform is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.transforms.keys().map(String::as_str)
    }

    /// Number of registered transforms.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("transforms", &self.transforms.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn constant(text: &'static str) -> Transform {
        Arc::new(move |_| text.to_string())
    }

    #[test]
    fn builtins_format_seconds() {
        let registry = TransformRegistry::with_builtins(TimeReference::Utc);
        assert!(registry.contains(SECONDS_TO_YMD));
        assert_eq!(
            registry.apply(SECONDS_TO_YMD, 1_700_000_000.0).as_deref(),
            Some("2023-11-14")
        );
        assert_eq!(
            registry.apply(SECONDS_TO_YMD, f64::NAN).as_deref(),
            Some("NaN-NaN-NaN")
        );
    }

    #[test]
    fn apply_unknown_name() {
        let registry = TransformRegistry::with_builtins(TimeReference::Utc);
        assert_eq!(registry.apply("secondsToHMS", 0.0), None);
    }

    #[test]
    fn load_creates_missing_namespace() {
        let mut namespace = None;
        TransformRegistry::load(&mut namespace, TimeReference::Utc);

        let registry = namespace.unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec![SECONDS_TO_YMD]);
    }

    #[test]
    fn load_keeps_existing_namespace() {
        let mut existing = TransformRegistry::new();
        existing.register("percent", constant("50%"));
        let mut namespace = Some(existing);

        TransformRegistry::load(&mut namespace, TimeReference::Local);
        TransformRegistry::load(&mut namespace, TimeReference::Utc);

        let registry = namespace.unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.apply("percent", 0.5).as_deref(), Some("50%"));
        assert_eq!(registry.apply(SECONDS_TO_YMD, 0.0).as_deref(), Some("1970-01-01"));
    }

    #[test]
    fn load_reassigns_seconds_to_ymd() {
        let mut namespace = Some(TransformRegistry::new());
        namespace
            .as_mut()
            .unwrap()
            .register(SECONDS_TO_YMD, constant("custom"));

        TransformRegistry::load(&mut namespace, TimeReference::Utc);
        assert_eq!(
            namespace.as_ref().unwrap().apply(SECONDS_TO_YMD, 0.0).as_deref(),
            Some("1970-01-01")
        );

        // 2023-11-14 22:13:20 UTC; the +09:00 load is the one that sticks.
        let tokyo = TimeReference::Offset(FixedOffset::east_opt(9 * 3600).unwrap());
        TransformRegistry::load(&mut namespace, tokyo);
        let registry = namespace.unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.apply(SECONDS_TO_YMD, 1_700_000_000.0).as_deref(),
            Some("2023-11-15")
        );
    }

    #[test]
    fn register_does_not_overwrite_but_replace_does() {
        let mut registry = TransformRegistry::new();
        assert!(registry.register("label", constant("first")));
        assert!(!registry.register("label", constant("second")));
        assert_eq!(registry.apply("label", 0.0).as_deref(), Some("first"));

        assert!(registry.replace("label", constant("third")).is_some());
        assert_eq!(registry.apply("label", 0.0).as_deref(), Some("third"));
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TransformRegistry>();

        let registry = Arc::new(TransformRegistry::with_builtins(TimeReference::Utc));
        let handle = {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || registry.apply(SECONDS_TO_YMD, 0.0))
        };
        assert_eq!(handle.join().unwrap().as_deref(), Some("1970-01-01"));
    }

    #[test]
    fn debug_lists_names() {
        let registry = TransformRegistry::with_builtins(TimeReference::Utc);
        assert!(format!("{:?}", registry).contains(SECONDS_TO_YMD));
    }
}
