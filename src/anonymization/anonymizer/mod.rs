//! Placeholder allocation
//!
//! Every unique original value receives exactly one placeholder per session:
//! an opaque `<TYPE_xxxxxxxx>` token, or a semantic alias for names,
//! organizations, products and places when semantic aliasing is on.

pub mod aliases;
pub mod tokenization;

pub use aliases::{AliasPools, SemanticAliasGenerator};
pub use tokenization::OpaqueTokenStrategy;

use crate::anonymization::config::AliasConfig;
use crate::anonymization::mapping::PiiMapping;
use crate::anonymization::models::PiiType;
use crate::anonymization::rewriter;
use crate::domain::Result;

/// Assigns placeholders and records them in the mapping
#[derive(Debug, Clone)]
pub struct PlaceholderAllocator {
    semantic_enabled: bool,
    opaque: OpaqueTokenStrategy,
    aliases: SemanticAliasGenerator,
}

impl PlaceholderAllocator {
    /// Create an allocator from alias settings
    pub fn new(config: &AliasConfig) -> Self {
        Self {
            semantic_enabled: config.semantic,
            opaque: OpaqueTokenStrategy::new(),
            aliases: SemanticAliasGenerator::new(config.pools.clone(), config.seed),
        }
    }

    /// Placeholder for `original`, allocating one on first sight
    ///
    /// A value that is already mapped keeps its placeholder regardless of the
    /// type it is detected as now. New placeholders never appear as a word in
    /// `source`, the text being anonymized, so restore cannot mistake a
    /// literal token of the input for a placeholder.
    pub fn allocate(
        &mut self,
        original: &str,
        pii_type: &PiiType,
        source: &str,
        mapping: &mut PiiMapping,
    ) -> Result<String> {
        if let Some(existing) = mapping.placeholder_for(original) {
            return Ok(existing.to_string());
        }

        let semantic = if self.semantic_enabled {
            self.aliases.generate(pii_type, |alias| {
                mapping.contains_placeholder(alias) || rewriter::contains_token(source, alias)
            })
        } else {
            None
        };

        let placeholder = match semantic {
            Some(alias) => alias,
            None => self.fresh_token(pii_type, source, mapping),
        };

        mapping.insert(original, &placeholder)?;
        tracing::trace!(pii_type = %pii_type, "Allocated placeholder");
        Ok(placeholder)
    }

    fn fresh_token(&self, pii_type: &PiiType, source: &str, mapping: &PiiMapping) -> String {
        loop {
            let token = self.opaque.generate(pii_type);
            if !mapping.contains_placeholder(&token) && !source.contains(&token) {
                return token;
            }
        }
    }

    /// Type of a placeholder, from its opaque label or its alias shape
    pub fn placeholder_type(&self, placeholder: &str) -> Option<String> {
        if let Some(label) = OpaqueTokenStrategy::type_of(placeholder) {
            return Some(label.to_string());
        }
        self.aliases
            .classify_alias(placeholder)
            .map(|pii_type| pii_type.as_str().to_string())
    }

    pub fn semantic_enabled(&self) -> bool {
        self.semantic_enabled
    }

    /// Forget alias counters and issued aliases
    pub fn reset(&mut self) {
        self.aliases.reset();
    }
}
