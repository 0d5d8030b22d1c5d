//! Renderer dispatch.
//!
//! The presentation layer registers one renderer per [`ModuleType`];
//! composed descriptors are then rendered in order.

use std::collections::HashMap;
use tracing::warn;

use crate::error::DispatchError;
use crate::types::{ModuleDescriptor, ModuleType};

/// Something that can present a module.
pub trait ModuleRenderer<O>: Send + Sync {
    fn render(&self, descriptor: &ModuleDescriptor) -> O;
}

impl<O, F> ModuleRenderer<O> for F
where
    F: Fn(&ModuleDescriptor) -> O + Send + Sync,
{
    fn render(&self, descriptor: &ModuleDescriptor) -> O {
        self(descriptor)
    }
}

/// Maps module types to their renderers.
pub struct DispatchTable<O> {
    renderers: HashMap<ModuleType, Box<dyn ModuleRenderer<O>>>,
}

impl<O> DispatchTable<O> {
    pub fn new() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Register the renderer for a type. A second registration for the same
    /// type is rejected.
    pub fn register(
        &mut self,
        module_type: ModuleType,
        renderer: impl ModuleRenderer<O> + 'static,
    ) -> Result<(), DispatchError> {
        if self.renderers.contains_key(&module_type) {
            return Err(DispatchError::DuplicateHandler(module_type));
        }
        self.renderers.insert(module_type, Box::new(renderer));
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(
        mut self,
        module_type: ModuleType,
        renderer: impl ModuleRenderer<O> + 'static,
    ) -> Result<Self, DispatchError> {
        self.register(module_type, renderer)?;
        Ok(self)
    }

    pub fn has(&self, module_type: ModuleType) -> bool {
        self.renderers.contains_key(&module_type)
    }

    /// Module types with no renderer.
    pub fn missing_types(&self) -> Vec<ModuleType> {
        ModuleType::ALL
            .into_iter()
            .filter(|t| !self.renderers.contains_key(t))
            .collect()
    }

    /// Render one descriptor.
    pub fn render(&self, descriptor: &ModuleDescriptor) -> Option<O> {
        self.renderers
            .get(&descriptor.module_type)
            .map(|renderer| renderer.render(descriptor))
    }

    /// Render a composed sequence in order. Descriptors without a renderer
    /// are skipped.
    pub fn dispatch(&self, descriptors: &[ModuleDescriptor]) -> Vec<O> {
        descriptors
            .iter()
            .filter_map(|descriptor| {
                let rendered = self.render(descriptor);
                if rendered.is_none() {
                    warn!(
                        module_id = %descriptor.id,
                        module_type = %descriptor.module_type,
                        "No renderer registered"
                    );
                }
                rendered
            })
            .collect()
    }
}

impl<O> Default for DispatchTable<O> {
    fn default() -> Self {
        Self::new()
    }
}
