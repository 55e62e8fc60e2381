use crate::config::ExtractionConfig;

/// Coarse per-category VAS flags. Packaging always carries a generic
/// placeholder that the normalizer turns into a special-requirements
/// note; real packaging detail comes from a human pass or the engine's
/// order-type rules.
#[derive(Debug, Clone)]
pub struct RawCategoryRule {
    pub hanging_required: bool,
    pub ticketing_required: bool,
    pub packaging_note: String,
}

const PACKAGING_PLACEHOLDER: &str = "Extracted from source";

/// Whole-text presence tests for each known category key. Intentionally
/// coarse: "hang" anywhere flags hanging for every category, "ticket" or
/// "price" flags ticketing. Precision is not guaranteed at this stage.
pub struct CategoryExtractor<'a> {
    config: &'a ExtractionConfig,
}

impl<'a> CategoryExtractor<'a> {
    pub fn new(config: &'a ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn extract(&self, text: &str) -> Vec<(String, RawCategoryRule)> {
        self.config
            .category_keys
            .iter()
            .map(|category| {
                (
                    category.clone(),
                    RawCategoryRule {
                        hanging_required: text.contains("hang"),
                        ticketing_required: text.contains("ticket") || text.contains("price"),
                        packaging_note: PACKAGING_PLACEHOLDER.to_string(),
                    },
                )
            })
            .collect()
    }
}
