use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// Import from vascheck-core
use vascheck_core::{
    analyze, retailer_rule_set, AnalysisReport, ExtractionConfig, GuideProcessor,
    PenaltyEstimator, ProductDescriptor, RuleSet, ShipmentQuantities,
};

#[derive(Parser)]
#[command(name = "vascheck")]
#[command(about = "Routing guide compliance checker: extract rules, analyze products, estimate penalties")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a rule set from a routing guide document (text or XHTML)
    Extract {
        /// Path to the guide file to process
        #[arg(short, long)]
        input: PathBuf,

        /// Path to custom extraction config file (YAML format)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file path (if not specified, auto-generated based on input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Cache directory for extracted rule sets
        #[arg(long, default_value = "cache")]
        cache_dir: String,

        /// Enable detailed profiling of all pipeline steps
        #[arg(long)]
        profile: bool,

        /// Skip cache and force fresh extraction (useful for development/testing)
        #[arg(long)]
        skip_cache: bool,
    },

    /// Analyze a product/order against a rule set and emit a compliance checklist
    Analyze {
        /// Path to a rule set JSON produced by `extract` (built-in retailer rules if omitted)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Product category: apparel-tops, apparel-bottoms, footwear, accessories, equipment
        #[arg(long)]
        category: String,

        /// Demographic segment: mens, womens, youth, toddler
        #[arg(long)]
        segment: String,

        /// Garment size (xs, s, m, l, xl, xxl, 3xl, or free-form)
        #[arg(long, default_value = "m")]
        size: String,

        /// Order type: bulk, single-store, direct-to-store, ecommerce
        #[arg(long, default_value = "bulk")]
        order_type: String,

        /// Destination identifier (DC or store number)
        #[arg(long, default_value = "unspecified")]
        destination: String,

        /// Output file path for the full analysis report
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Estimate penalty cost for violated checklist items of a saved report
    Estimate {
        /// Path to an analysis report JSON produced by `analyze`
        #[arg(short, long)]
        report: PathBuf,

        /// Comma-separated checklist indexes that were violated (all items if omitted)
        #[arg(long)]
        violations: Option<String>,

        /// Units in the shipment
        #[arg(long, default_value_t = 100)]
        units: u32,

        /// Cartons in the shipment
        #[arg(long, default_value_t = 10)]
        cartons: u32,

        /// Shipments (bills of lading)
        #[arg(long, default_value_t = 1)]
        shipments: u32,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("🦀 Vascheck Routing Guide Compliance");

    match args.command {
        Command::Extract {
            input,
            config,
            output,
            cache_dir,
            profile,
            skip_cache,
        } => run_extract(&input, config.as_deref(), output, &cache_dir, profile, skip_cache),
        Command::Analyze {
            rules,
            category,
            segment,
            size,
            order_type,
            destination,
            output,
        } => run_analyze(
            rules.as_deref(),
            &category,
            &segment,
            &size,
            &order_type,
            &destination,
            output,
        ),
        Command::Estimate {
            report,
            violations,
            units,
            cartons,
            shipments,
        } => run_estimate(
            &report,
            violations.as_deref(),
            ShipmentQuantities {
                units,
                cartons,
                shipments,
            },
        ),
    }
}

fn run_extract(
    input: &Path,
    config_path: Option<&Path>,
    output: Option<PathBuf>,
    cache_dir: &str,
    profile: bool,
    skip_cache: bool,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input guide not found at: {}", input.display());
    }

    let config = match config_path {
        Some(path) => {
            println!("📋 Loaded config from: {}", path.display());
            ExtractionConfig::load_from_file(path)?
        }
        None => {
            println!("📋 Using default config");
            ExtractionConfig::default()
        }
    };

    let processor = GuideProcessor::new_cli(input, cache_dir, config)?;
    let rule_set = processor.process_guide_with_profiling(input, profile, skip_cache)?;

    println!("✅ Successfully extracted rule set");
    println!("📊 Rule set metrics:");
    println!("   - Hanger chart entries: {}", rule_set.hanger_chart.len());
    println!("   - Product rule categories: {}", rule_set.product_rules.len());
    println!("   - Penalty clauses: {}", rule_set.penalty_rules.len());
    println!("   - Order type rules: {}", rule_set.order_type_rules.len());
    println!("   - Confidence: {:?}", rule_set.metadata.confidence);

    let output_path = output.unwrap_or_else(|| derived_output(input, "ruleset"));
    save_json(&rule_set, &output_path)?;
    println!("💾 Rule set saved to: {}", output_path.display());
    Ok(())
}

fn run_analyze(
    rules_path: Option<&Path>,
    category: &str,
    segment: &str,
    size: &str,
    order_type: &str,
    destination: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let rules: RuleSet = match rules_path {
        Some(path) => {
            println!("📋 Loaded rule set from: {}", path.display());
            load_json(path)?
        }
        None => {
            println!("📋 Using built-in retailer rule set");
            retailer_rule_set()
        }
    };

    let product = ProductDescriptor {
        category: parse_enum(category).context("invalid --category")?,
        segment: parse_enum(segment).context("invalid --segment")?,
        size: size.to_string(),
        order_type: parse_enum(order_type).context("invalid --order-type")?,
        destination: destination.to_string(),
    };

    let report = analyze(&rules, &product);

    println!(
        "✅ Analysis complete: {} requirements ({} critical)",
        report.risk_assessment.total_requirement_count,
        report.risk_assessment.critical_requirement_count
    );
    println!("📋 Checklist:");
    for (index, item) in report.checklist.iter().enumerate() {
        let flag = if item.critical { "❗" } else { "  " };
        println!(
            "   {index:>2}. {flag} [{:?}] {} (missed: {})",
            item.category, item.requirement, item.penalty_if_missed
        );
    }
    println!(
        "⚠️  Risk: {:?} (estimated exposure ${:.2})",
        report.risk_assessment.risk_level,
        report.risk_assessment.estimated_penalty_exposure_usd
    );

    if let Some(output_path) = output {
        save_json(&report, &output_path)?;
        println!("💾 Analysis report saved to: {}", output_path.display());
    }
    Ok(())
}

fn run_estimate(
    report_path: &Path,
    violations: Option<&str>,
    quantities: ShipmentQuantities,
) -> Result<()> {
    let report: AnalysisReport = load_json(report_path)?;
    println!("📋 Loaded analysis report: {}", report.analysis_id);

    let violated: BTreeMap<usize, bool> = match violations {
        Some(list) => list
            .split(',')
            .map(|index| {
                let index: usize = index
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid checklist index: {index}"))?;
                Ok((index, true))
            })
            .collect::<Result<_>>()?,
        None => (0..report.checklist.len()).map(|i| (i, true)).collect(),
    };

    let estimator = PenaltyEstimator::new()?;
    let estimate = estimator.estimate(&report.checklist, &violated, quantities);

    println!(
        "📊 Penalty estimate ({} units, {} cartons, {} shipments):",
        quantities.units, quantities.cartons, quantities.shipments
    );
    for line in &estimate.line_items {
        println!(
            "   {:>2}. ${:>8.2}  {}",
            line.checklist_index, line.cost_usd, line.requirement
        );
    }
    println!("   Total this shipment: ${:.2}", estimate.total_usd);
    println!("   Annual if monthly:   ${:.2}", estimate.annual_if_monthly_usd);
    println!("   Annual if weekly:    ${:.2}", estimate.annual_if_weekly_usd);
    Ok(())
}

/// Parse a kebab/lowercase CLI token into one of the serde-tagged enums.
fn parse_enum<T: serde::de::DeserializeOwned>(token: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(token.to_string()))
        .with_context(|| format!("unrecognized value: {token}"))
}

fn derived_output(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    PathBuf::from(format!("{stem}_{suffix}.json"))
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

fn save_json<T: serde::Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vascheck_core::{OrderType, ProductCategory};

    #[test]
    fn enum_tokens_parse_via_serde_renames() {
        let category: ProductCategory = parse_enum("apparel-bottoms").unwrap();
        assert_eq!(category, ProductCategory::ApparelBottoms);
        let order: OrderType = parse_enum("direct-to-store").unwrap();
        assert_eq!(order, OrderType::DirectToStore);
        assert!(parse_enum::<OrderType>("warp-drive").is_err());
    }

    #[test]
    fn derived_output_uses_input_stem() {
        assert_eq!(
            derived_output(Path::new("guides/dsg_2024.txt"), "ruleset"),
            PathBuf::from("dsg_2024_ruleset.json")
        );
    }
}
