//! The ordered set of validators run on every pass.

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::diagnostic::Diagnostic;
use crate::document::TextDocument;
use crate::settings::DocumentSettings;
use crate::validator::{
    BlockAssignmentValidator, FilterEqualsValidator, ImportanceSeverityValidator,
    LowerComparisonValidator, NestedLowerValidator, NumberConcatValidator, Validator,
    WhitelistKeyValidator, WhitelistNameValidator,
};

/// Validators in registration order. Output order follows this order, then
/// match order within each validator.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in validator.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(LowerComparisonValidator));
        registry.register(Box::new(NestedLowerValidator));
        registry.register(Box::new(BlockAssignmentValidator));
        registry.register(Box::new(NumberConcatValidator));
        registry.register(Box::new(FilterEqualsValidator));
        registry.register(Box::new(WhitelistKeyValidator));
        registry.register(Box::new(WhitelistNameValidator));
        registry.register(Box::new(ImportanceSeverityValidator));
        registry
    }

    pub fn register(&mut self, validator: Box<dyn Validator>) {
        self.validators.push(validator);
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Validator> {
        self.validators.iter().map(|v| v.as_ref())
    }

    /// Run every validator against `document` and concatenate the results.
    ///
    /// A validator that panics contributes nothing; the failure is logged and
    /// the remaining validators still run.
    pub fn run(&self, document: &TextDocument, settings: &DocumentSettings) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for validator in self.iter() {
            match catch_unwind(AssertUnwindSafe(|| validator.validate(document, settings))) {
                Ok(found) => diagnostics.extend(found),
                Err(panic) => {
                    let reason = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    log::error!(
                        "validator {} failed on {}: {reason}",
                        validator.rule(),
                        document.uri()
                    );
                }
            }
        }

        diagnostics
    }
}
