use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// The schema version stamped on every extracted rule set.
/// Bump this when the output shape changes.
pub const SCHEMA_VERSION: &str = "0.1.0";

// ===== PRODUCT DESCRIPTOR =====
// Immutable input to one analysis. Created by the caller; the engine
// never retains it beyond the report it produces.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDescriptor {
    pub category: ProductCategory,
    pub segment: DemographicSegment,
    /// Garment size string ("xs".."3xl"). Kept as a free string because
    /// guides reference sizes the fixed scale doesn't cover; an
    /// unrecognized size resolves to the no-tuck presentation.
    pub size: String,
    pub order_type: OrderType,
    pub destination: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductCategory {
    ApparelTops,
    ApparelBottoms,
    Footwear,
    Accessories,
    Equipment,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::ApparelTops => "apparel-tops",
            ProductCategory::ApparelBottoms => "apparel-bottoms",
            ProductCategory::Footwear => "footwear",
            ProductCategory::Accessories => "accessories",
            ProductCategory::Equipment => "equipment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemographicSegment {
    Mens,
    Womens,
    Youth,
    Toddler,
}

impl DemographicSegment {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemographicSegment::Mens => "mens",
            DemographicSegment::Womens => "womens",
            DemographicSegment::Youth => "youth",
            DemographicSegment::Toddler => "toddler",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    Bulk,
    SingleStore,
    DirectToStore,
    Ecommerce,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Bulk => "bulk",
            OrderType::SingleStore => "single-store",
            OrderType::DirectToStore => "direct-to-store",
            OrderType::Ecommerce => "ecommerce",
        }
    }

    /// All order types the extractor probes for, in stable order.
    pub fn all() -> [OrderType; 4] {
        [
            OrderType::Bulk,
            OrderType::SingleStore,
            OrderType::DirectToStore,
            OrderType::Ecommerce,
        ]
    }
}

/// Ordered garment size scale used for tucking resolution.
/// Index 0-1 take a single tuck, index 2+ a double tuck.
pub const SIZE_ORDER: [&str; 7] = ["xs", "s", "m", "l", "xl", "xxl", "3xl"];

// ===== HANGER CHART =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    None,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Presentation {
    Standard,
    Closed,
    #[default]
    Unset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TuckingType {
    Double,
    Single,
    None,
    #[default]
    Unset,
}

/// One entry of the retailer's hanger chart, keyed by its 3-4 digit code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HangerSpec {
    pub code: String,
    pub display_name: String,
    pub description: String,
    /// Ordered use-tags ("Mens Tops", "Youth", ...). The engine matches
    /// hangers by substring containment against these joined tags.
    pub used_for: Vec<String>,
    pub sizer_required: bool,
    #[serde(default)]
    pub presentation: Presentation,
    #[serde(default)]
    pub tucking_required: bool,
    #[serde(default)]
    pub tucking_type: TuckingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    pub confidence: Confidence,
    pub provenance: String,
}

/// Insertion-ordered hanger chart. Iteration order is insertion order so
/// the engine's first-match hanger lookup stays reproducible; inserting a
/// code that already exists replaces the entry in place (last match wins
/// without reordering).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HangerChart {
    entries: Vec<HangerSpec>,
}

impl HangerChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, spec: HangerSpec) {
        match self.entries.iter_mut().find(|e| e.code == spec.code) {
            Some(existing) => *existing = spec,
            None => self.entries.push(spec),
        }
    }

    pub fn get(&self, code: &str) -> Option<&HangerSpec> {
        self.entries.iter().find(|e| e.code == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HangerSpec> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ===== CANONICAL VAS RULES =====
// Every optional concept carries an explicit default, applied once by the
// normalizer. The engine never branches on "missing vs false".

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VasRule {
    pub hanging: HangingRule,
    pub ticketing: TicketingRule,
    pub packaging: PackagingRule,
}

impl VasRule {
    /// Engine-wide conservative default: nothing hung, nothing ticketed.
    pub fn conservative_default() -> Self {
        Self {
            hanging: HangingRule {
                required: false,
                ..HangingRule::default()
            },
            ticketing: TicketingRule {
                required: false,
                ..TicketingRule::default()
            },
            packaging: PackagingRule {
                special_requirements: Some("Follow product-specific guidelines".to_string()),
                ..PackagingRule::default()
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HangingRule {
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hanger_type_code: Option<String>,
    /// Defaults to true: a sizer is assumed unless the guide explicitly
    /// waives it.
    pub sizer_required: bool,
    pub presentation: Presentation,
    pub tucking_required: bool,
    pub tucking_type: TuckingType,
}

impl Default for HangingRule {
    fn default() -> Self {
        Self {
            required: false,
            hanger_type_code: None,
            sizer_required: true,
            presentation: Presentation::Unset,
            tucking_required: false,
            tucking_type: TuckingType::Unset,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketingRule {
    pub required: bool,
    pub location: String,
    /// Defaults to true: price verification is assumed unless explicitly
    /// waived.
    pub retail_price_required: bool,
}

pub const DEFAULT_TICKET_LOCATION: &str = "hang tag near UPC";

impl Default for TicketingRule {
    fn default() -> Self {
        Self {
            required: false,
            location: DEFAULT_TICKET_LOCATION.to_string(),
            retail_price_required: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackagingRule {
    pub individual_polybag_required: bool,
    pub bladder_bag_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polybag_warning_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_carton_weight_lbs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requirements: Option<String>,
}

/// VAS rules for one product category, keyed by demographic segment with
/// `"all"` as the wildcard entry.
pub type CategoryRuleSet = HashMap<String, VasRule>;

pub const WILDCARD_SEGMENT: &str = "all";

// ===== ORDER TYPE RULES =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackingMode {
    #[default]
    Standard,
    MixedUpcAllowed,
    SingleUpcPerCarton,
}

/// Additional requirements for one order type. A missing order-type key
/// means no additional requirements, represented by the default value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderTypeRule {
    pub packing_mode: PackingMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub casepack_rule: Option<String>,
    pub mixing_allowed: bool,
    pub packing_slip_required: bool,
    pub carton_marking_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_weight_lbs: Option<u32>,
    pub polybag_required: bool,
}

// ===== PENALTY CLAUSES =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PenaltyUnit {
    Unit,
    Carton,
    Shipment,
    Invoice,
}

impl PenaltyUnit {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unit" => Some(PenaltyUnit::Unit),
            "carton" => Some(PenaltyUnit::Carton),
            "shipment" => Some(PenaltyUnit::Shipment),
            "invoice" => Some(PenaltyUnit::Invoice),
            _ => None,
        }
    }
}

/// A penalty clause mined from the guide. Clauses are kept in source
/// order and never deduplicated — the same dollar figure can appear for
/// several violation categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenaltyClause {
    pub amount_usd: f64,
    pub unit: PenaltyUnit,
    pub description: String,
    pub violation_category: String,
}

// ===== RULE SET (AGGREGATE ROOT) =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleSource {
    Empty,
    Pdf,
    PreLoaded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSetMetadata {
    pub source: RuleSource,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_at: Option<DateTime<Utc>>,
    pub total_rules_count: usize,
    /// First ~200 chars of the source text, kept for debugging/audit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_sample: Option<String>,
    /// Non-fatal extraction notes (skipped pages etc.), aggregated here
    /// instead of thrown.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processing_notes: Vec<String>,
}

/// The complete rule set one analysis runs against. Built once per
/// extraction (or pre-loaded) and replaced wholesale — never partially
/// mutated — so readers always see a consistent hanger chart and product
/// rule table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    pub schema_version: String,
    pub hanger_chart: HangerChart,
    pub product_rules: HashMap<String, CategoryRuleSet>,
    pub penalty_rules: Vec<PenaltyClause>,
    pub order_type_rules: HashMap<String, OrderTypeRule>,
    pub metadata: RuleSetMetadata,
}

impl RuleSet {
    /// The empty sentinel: no rules known, nothing extracted.
    pub fn empty() -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            hanger_chart: HangerChart::new(),
            product_rules: HashMap::new(),
            penalty_rules: Vec::new(),
            order_type_rules: HashMap::new(),
            metadata: RuleSetMetadata {
                source: RuleSource::Empty,
                confidence: Confidence::None,
                extracted_at: None,
                total_rules_count: 0,
                text_sample: None,
                processing_notes: Vec::new(),
            },
        }
    }

    /// True iff the engine has something real to work with. Callers
    /// should check this before `analyze`; the engine itself falls back
    /// to conservative defaults rather than raising.
    pub fn has_usable_rules(&self) -> bool {
        !self.hanger_chart.is_empty() || !self.product_rules.is_empty()
    }
}

// ===== CHECKLIST + RISK =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChecklistCategory {
    Hanging,
    Ticketing,
    Packaging,
    Documentation,
    Labeling,
}

/// One compliance requirement. Produced fresh per analysis; never
/// persisted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub category: ChecklistCategory,
    pub requirement: String,
    pub critical: bool,
    /// Literal penalty text from the guide; the estimator parses this
    /// back into a cost formula.
    pub penalty_if_missed: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub critical_requirement_count: usize,
    pub total_requirement_count: usize,
    /// Flat per-critical-item average, deliberately decoupled from the
    /// precise per-item sums the penalty estimator computes. The two
    /// figures answer different questions and are kept as distinct,
    /// separately-named outputs.
    pub estimated_penalty_exposure_usd: f64,
}

/// Full output of one `analyze` call. Deterministic for identical inputs
/// apart from `analysis_id` and `timestamp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub product: ProductDescriptor,
    pub vas_requirements: VasRule,
    pub order_requirements: OrderTypeRule,
    pub checklist: Vec<ChecklistItem>,
    pub risk_assessment: RiskAssessment,
    pub data_source: RuleSource,
    pub timestamp: DateTime<Utc>,
}

// ===== PENALTY ESTIMATION =====

/// Shipment quantities the estimator scales penalty rates by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShipmentQuantities {
    pub units: u32,
    pub cartons: u32,
    pub shipments: u32,
}

impl Default for ShipmentQuantities {
    fn default() -> Self {
        Self {
            units: 100,
            cartons: 10,
            shipments: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenaltyLineItem {
    pub checklist_index: usize,
    pub requirement: String,
    pub cost_usd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenaltyEstimate {
    pub line_items: Vec<PenaltyLineItem>,
    pub total_usd: f64,
    /// Projection if the same violations recur every month.
    pub annual_if_monthly_usd: f64,
    /// Projection if the same violations recur every week.
    pub annual_if_weekly_usd: f64,
}
