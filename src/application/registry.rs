//! Central registry of documented message codes.
//!
//! The registry owns every `MessageDefinition`, keyed by code, and remembers
//! the order in which codes were registered for catalog listings.

use crate::domain::message::MessageDefinition;
use crate::domain::template::TemplateError;
use ahash::RandomState;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Error returned by registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A definition with this code is already registered
    DuplicateCode(String),
    /// No definition is registered under this code
    UnknownCode(String),
    /// The format template of a new definition is malformed
    InvalidTemplate { code: String, source: TemplateError },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateCode(code) => {
                write!(f, "logging code '{}' is already registered", code)
            }
            RegistryError::UnknownCode(code) => {
                write!(f, "logging code '{}' is missing", code)
            }
            RegistryError::InvalidTemplate { code, source } => {
                write!(f, "invalid format for logging code '{}': {}", code, source)
            }
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::InvalidTemplate { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Catalog {
    definitions: Vec<Arc<MessageDefinition>>,
    index: HashMap<Arc<str>, usize, RandomState>,
}

/// Registry of message definitions.
///
/// Registration normally happens during setup, before concurrent logging
/// starts. A read-write lock keeps later registrations safe anyway.
#[derive(Debug, Default)]
pub struct MessageRegistry {
    catalog: RwLock<Catalog>,
}

impl MessageRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition.
    ///
    /// # Errors
    /// Returns `RegistryError::DuplicateCode` if the code is taken. The
    /// existing definition is left untouched.
    pub fn register(
        &self,
        definition: MessageDefinition,
    ) -> Result<Arc<MessageDefinition>, RegistryError> {
        let mut catalog = self.catalog.write().unwrap_or_else(PoisonError::into_inner);

        if catalog.index.contains_key(definition.code()) {
            return Err(RegistryError::DuplicateCode(definition.code().to_string()));
        }

        let definition = Arc::new(definition);
        let position = catalog.definitions.len();
        catalog.index.insert(definition.code_key(), position);
        catalog.definitions.push(Arc::clone(&definition));
        Ok(definition)
    }

    /// Look up a definition by code.
    ///
    /// # Errors
    /// Returns `RegistryError::UnknownCode` if nothing is registered under it.
    pub fn lookup(&self, code: &str) -> Result<Arc<MessageDefinition>, RegistryError> {
        let catalog = self.catalog.read().unwrap_or_else(PoisonError::into_inner);
        catalog
            .index
            .get(code)
            .map(|&position| Arc::clone(&catalog.definitions[position]))
            .ok_or_else(|| RegistryError::UnknownCode(code.to_string()))
    }

    /// All definitions in registration order.
    pub fn list_all(&self) -> Vec<Arc<MessageDefinition>> {
        self.catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .definitions
            .clone()
    }

    /// Check if a code is registered.
    pub fn contains(&self, code: &str) -> bool {
        self.catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .index
            .contains_key(code)
    }

    /// Get the number of registered codes.
    pub fn len(&self) -> usize {
        self.catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .definitions
            .len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::severity::Severity;
    use std::thread;

    fn definition(code: &str, description: &str) -> MessageDefinition {
        MessageDefinition::new(code, Severity::Info, description, Some("Test message: {}"))
            .unwrap()
    }

    #[test]
    fn test_registry_creation() {
        let registry = MessageRegistry::new();
        assert_eq!(registry.len(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = MessageRegistry::new();
        registry.register(definition("TEST-001", "first")).unwrap();

        let found = registry.lookup("TEST-001").unwrap();
        assert_eq!(found.code(), "TEST-001");
        assert_eq!(found.description(), "first");
        assert!(registry.contains("TEST-001"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_keeps_original() {
        let registry = MessageRegistry::new();
        registry.register(definition("TEST-001", "original")).unwrap();

        let err = registry
            .register(definition("TEST-001", "duplicate"))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateCode("TEST-001".to_string()));
        assert_eq!(err.to_string(), "logging code 'TEST-001' is already registered");

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("TEST-001").unwrap().description(), "original");
    }

    #[test]
    fn test_unknown_code() {
        let registry = MessageRegistry::new();
        let err = registry.lookup("TEST-999").unwrap_err();
        assert_eq!(err, RegistryError::UnknownCode("TEST-999".to_string()));
        assert_eq!(err.to_string(), "logging code 'TEST-999' is missing");
    }

    #[test]
    fn test_list_all_keeps_registration_order() {
        let registry = MessageRegistry::new();
        for code in ["C", "A", "B"] {
            registry.register(definition(code, code)).unwrap();
        }

        let codes: Vec<String> = registry
            .list_all()
            .iter()
            .map(|d| d.code().to_string())
            .collect();
        assert_eq!(codes, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_concurrent_registration() {
        let registry = Arc::new(MessageRegistry::new());
        let mut handles = vec![];

        for i in 0..10 {
            let registry_clone = Arc::clone(&registry);
            let handle = thread::spawn(move || {
                for j in 0..20 {
                    let code = format!("MSG-{}-{}", i, j);
                    registry_clone.register(definition(&code, "x")).unwrap();
                }
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 200);
        assert!(registry.lookup("MSG-9-19").is_ok());
    }
}
