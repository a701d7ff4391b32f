//! # App Registry
//!
//! The fixed table of applications the shell can open, keyed by internal code.
//! Built once at startup through [`RegistryBuilder`] and read-only afterwards.
//!
//! Resolving an unknown code is not an error here. It is a plain miss
//! (`None`) and the caller decides how to present it.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::core::loader::LoadError;
use crate::core::view::RenderableUnit;

/// Future returned by a module factory.
pub type ModuleFuture = BoxFuture<'static, Result<Arc<dyn RenderableUnit>, LoadError>>;

/// Zero-argument factory that lazily instantiates a module.
pub type ModuleFactory = Arc<dyn Fn() -> ModuleFuture + Send + Sync>;

/// Registry entry: an internal code, its display title and the factory.
#[derive(Clone)]
pub struct AppDescriptor {
    code: String,
    title: String,
    factory: ModuleFactory,
}

impl AppDescriptor {
    pub fn new<F, Fut>(code: impl Into<String>, title: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Arc<dyn RenderableUnit>, LoadError>> + Send + 'static,
    {
        Self {
            code: code.into(),
            title: title.into(),
            factory: Arc::new(move || factory().boxed()),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Start a fresh instantiation. Nothing runs until the future is polled.
    pub fn instantiate(&self) -> ModuleFuture {
        (self.factory)()
    }
}

impl fmt::Debug for AppDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppDescriptor")
            .field("code", &self.code)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Startup-time registry configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateCode(String),
    EmptyCode { title: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateCode(code) => {
                write!(f, "application code '{code}' is registered more than once")
            }
            RegistryError::EmptyCode { title } => {
                write!(f, "application '{title}' has an empty code")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

// ============================================================================
// Registry
// ============================================================================

#[derive(Debug, Default)]
pub struct AppRegistry {
    entries: Vec<AppDescriptor>,
    index: HashMap<String, usize>,
}

impl AppRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// O(1) lookup by exact code.
    pub fn resolve(&self, code: &str) -> Option<&AppDescriptor> {
        self.index.get(code).map(|&i| &self.entries[i])
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> &[AppDescriptor] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<AppDescriptor>,
}

impl RegistryBuilder {
    pub fn register(mut self, descriptor: AppDescriptor) -> Self {
        self.entries.push(descriptor);
        self
    }

    /// Freeze the table. Fails on the first duplicate or empty code.
    pub fn build(self) -> Result<AppRegistry, RegistryError> {
        let mut index = HashMap::with_capacity(self.entries.len());
        for (i, descriptor) in self.entries.iter().enumerate() {
            if descriptor.code.trim().is_empty() {
                return Err(RegistryError::EmptyCode {
                    title: descriptor.title.clone(),
                });
            }
            if index.insert(descriptor.code.clone(), i).is_some() {
                return Err(RegistryError::DuplicateCode(descriptor.code.clone()));
            }
        }
        Ok(AppRegistry {
            entries: self.entries,
            index,
        })
    }
}
