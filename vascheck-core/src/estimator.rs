//! Penalty Estimator
//!
//! Parses the literal penalty strings attached to checklist items back
//! into cost formulas and scales them by shipment quantities. The
//! penalty text is the single source of truth: the estimator never
//! consults the rule set, only the strings the engine produced.

use anyhow::Result;
use regex::Regex;
use std::collections::BTreeMap;

use crate::types::{ChecklistItem, PenaltyEstimate, PenaltyLineItem, ShipmentQuantities};

/// Flat charge assumed when a penalty string carries no dollar figure at
/// all. Matches the standard service fee retailers tack onto chargeback
/// notices.
const FALLBACK_FLAT_FEE_USD: f64 = 250.0;

pub struct PenaltyEstimator {
    per_unit_pattern: Regex,
    per_carton_pattern: Regex,
    single_amount_pattern: Regex,
}

impl PenaltyEstimator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            per_unit_pattern: Regex::new(r"\$(\d+(?:\.\d+)?)\s*per unit.*?\$(\d+)")?,
            per_carton_pattern: Regex::new(r"\$(\d+(?:\.\d+)?)\s*per carton.*?\$(\d+)")?,
            single_amount_pattern: Regex::new(r"\$(\d+(?:\.\d+)?)")?,
        })
    }

    /// Sum the cost of every violated checklist item. `violations` maps
    /// checklist index to whether that requirement was missed; indexes
    /// out of range are ignored. Idempotent: the same inputs always
    /// produce the same estimate.
    pub fn estimate(
        &self,
        checklist: &[ChecklistItem],
        violations: &BTreeMap<usize, bool>,
        quantities: ShipmentQuantities,
    ) -> PenaltyEstimate {
        let mut line_items = Vec::new();
        let mut total_usd = 0.0;

        for (&index, &violated) in violations {
            if !violated {
                continue;
            }
            let Some(item) = checklist.get(index) else {
                continue;
            };
            let cost_usd = self.item_cost(&item.penalty_if_missed, quantities);
            total_usd += cost_usd;
            line_items.push(PenaltyLineItem {
                checklist_index: index,
                requirement: item.requirement.clone(),
                cost_usd,
            });
        }

        PenaltyEstimate {
            line_items,
            total_usd,
            annual_if_monthly_usd: total_usd * 12.0,
            annual_if_weekly_usd: total_usd * 52.0,
        }
    }

    /// Cost of one missed requirement, from its literal penalty string.
    fn item_cost(&self, penalty: &str, quantities: ShipmentQuantities) -> f64 {
        if penalty == "N/A" {
            return 0.0;
        }

        if penalty.contains("per unit") {
            if let Some(captures) = self.per_unit_pattern.captures(penalty) {
                let rate = parse_amount(&captures, 1);
                let fee = parse_amount(&captures, 2);
                return rate * f64::from(quantities.units) + fee;
            }
        }

        if penalty.contains("per carton") {
            if let Some(captures) = self.per_carton_pattern.captures(penalty) {
                let rate = parse_amount(&captures, 1);
                let fee = parse_amount(&captures, 2);
                return rate * f64::from(quantities.cartons) + fee;
            }
        }

        if penalty.contains("per shipment") || penalty.contains("per bill of lading") {
            if let Some(captures) = self.single_amount_pattern.captures(penalty) {
                return parse_amount(&captures, 1) * f64::from(quantities.shipments);
            }
        }

        // Unrecognized shape: first dollar figure as a flat charge, or
        // the standard service fee when there is none.
        self.single_amount_pattern
            .captures(penalty)
            .map(|captures| parse_amount(&captures, 1))
            .unwrap_or(FALLBACK_FLAT_FEE_USD)
    }
}

fn parse_amount(captures: &regex::Captures<'_>, group: usize) -> f64 {
    captures
        .get(group)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}
