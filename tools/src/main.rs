//! funnel-report: headless funnel metrics runner.
//!
//! Usage:
//!   funnel-report --seed 42 --records 2000 --group-by day
//!   funnel-report --input sends.jsonl --compare camp-a camp-b --metric open --json

use anyhow::Result;
use funnel_core::{
    aggregate,
    config::{MetricsConfig, DEFAULT_CONFIG_PATH},
    engine::{FunnelReport, KeyedReport, MetricsEngine},
    filter::RecordFilter,
    percent::format_percent,
    sample::generate_sample,
    source::load_records,
    EventRecord, Metric, VariantComparison,
};
use serde::Serialize;
use std::env;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupBy {
    Campaign,
    Day,
    Status,
}

impl GroupBy {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "campaign" => Some(Self::Campaign),
            "day"      => Some(Self::Day),
            "status"   => Some(Self::Status),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct GroupRow {
    key:    String,
    report: FunnelReport,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ComparisonOutput {
    variant_a:  String,
    variant_b:  String,
    comparison: VariantComparison,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunOutput {
    source:     String,
    group_by:   &'static str,
    overall:    FunnelReport,
    groups:     Vec<GroupRow>,
    comparison: Option<ComparisonOutput>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let json = args.iter().any(|a| a == "--json");
    let config_path = flag_value(&args, "--config").unwrap_or(DEFAULT_CONFIG_PATH);
    let input = flag_value(&args, "--input");

    let group_by = match flag_value(&args, "--group-by") {
        Some(s) => GroupBy::parse(s)
            .ok_or_else(|| anyhow::anyhow!("Unknown --group-by '{s}' (campaign|day|status)"))?,
        None => GroupBy::Campaign,
    };
    let metric = match flag_value(&args, "--metric") {
        Some(s) => Some(
            Metric::parse(s)
                .ok_or_else(|| anyhow::anyhow!("Unknown --metric '{s}' (open|click|conversion)"))?,
        ),
        None => None,
    };
    let compare_pair = args
        .windows(3)
        .find(|w| w[0] == "--compare")
        .map(|w| (w[1].clone(), w[2].clone()));

    let mut config = if Path::new(config_path).exists() {
        MetricsConfig::load(config_path)?
    } else {
        log::warn!("config {config_path} not found, using defaults");
        MetricsConfig::default()
    };
    if let Some(n) = flag_value(&args, "--records").and_then(|s| s.parse().ok()) {
        config.sample.records = n;
    }

    let (records, source) = match input {
        Some(path) => (load_records(path)?, path.to_string()),
        None => (
            generate_sample(seed, &config.sample),
            format!("sample(seed={seed}, records={})", config.sample.records),
        ),
    };

    let engine = MetricsEngine::new(config);
    let overall = engine.report(&records);
    let groups = group_rows(&engine, &records, group_by);
    let comparison = compare_pair
        .map(|(a, b)| compare_campaigns(&engine, &records, a, b, metric));

    if json {
        let output = RunOutput {
            source,
            group_by: group_name(group_by),
            overall,
            groups,
            comparison,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let decimals = engine.config.display.percent_decimals;
        println!("funnel-report");
        println!("  source:    {source}");
        println!("  group by:  {}", group_name(group_by));
        println!();
        print_overall(&overall, decimals);
        print_groups(&groups, decimals);
        if let Some(c) = &comparison {
            print_comparison(c, decimals);
        }
    }

    Ok(())
}

fn group_rows(engine: &MetricsEngine, records: &[EventRecord], group_by: GroupBy) -> Vec<GroupRow> {
    match group_by {
        GroupBy::Campaign => rows(engine.campaign_reports(records), |k| k.clone()),
        GroupBy::Day      => rows(engine.daily_reports(records), |k| k.to_string()),
        GroupBy::Status   => rows(engine.status_reports(records), |k| k.name().to_string()),
    }
}

fn rows<K>(reports: Vec<KeyedReport<K>>, label: impl Fn(&K) -> String) -> Vec<GroupRow> {
    reports
        .into_iter()
        .map(|r| GroupRow {
            key: label(&r.key),
            report: r.report,
        })
        .collect()
}

fn compare_campaigns(
    engine: &MetricsEngine,
    records: &[EventRecord],
    variant_a: String,
    variant_b: String,
    metric: Option<Metric>,
) -> ComparisonOutput {
    let counts_a = aggregate(RecordFilter::campaign(variant_a.as_str()).apply(records));
    let counts_b = aggregate(RecordFilter::campaign(variant_b.as_str()).apply(records));
    if counts_a.is_empty() || counts_b.is_empty() {
        log::warn!("compare: {variant_a} or {variant_b} has no records");
    }
    ComparisonOutput {
        comparison: engine.compare(&counts_a, &counts_b, metric),
        variant_a,
        variant_b,
    }
}

fn print_overall(report: &FunnelReport, decimals: u32) {
    let c = &report.counts;
    let r = &report.rates;
    println!("=== OVERALL ===");
    println!("  sent:          {}", c.total);
    println!("  delivered:     {} ({})", c.delivered, format_percent(r.delivery_rate, decimals));
    println!("  opened:        {} ({})", c.opened, format_percent(r.open_rate, decimals));
    println!("  clicked:       {} ({})", c.clicked, format_percent(r.click_rate, decimals));
    println!("  replied:       {} ({})", c.replied, format_percent(r.reply_rate, decimals));
    println!("  bounced:       {} ({})", c.bounced, format_percent(r.bounce_rate, decimals));
    println!("  unsubscribed:  {}", c.unsubscribed);
    println!("  converted:     {} ({})", c.converted, format_percent(r.conversion_rate, decimals));
    println!(
        "  click-through of opens: {}",
        format_percent(report.click_through_of_opens, decimals)
    );

    println!();
    println!("=== FUNNEL ===");
    for stage in &report.funnel {
        println!(
            "  {:<10} {:>7} | of total {:>7} | of previous {:>7} | drop-off {:>7}",
            stage.name.name(),
            stage.count,
            format_percent(stage.percent_of_total / 100.0, decimals),
            format_percent(stage.percent_of_previous / 100.0, decimals),
            format_percent(stage.drop_off / 100.0, decimals),
        );
    }
    println!();
}

fn print_groups(groups: &[GroupRow], decimals: u32) {
    println!("=== GROUPS ===");
    if groups.is_empty() {
        println!("  (no records)");
    }
    for row in groups {
        let c = &row.report.counts;
        let r = &row.report.rates;
        println!(
            "  {:<16} sent {:>6} | open {:>7} | click {:>7} | reply {:>7} | conv {:>7}",
            row.key,
            c.total,
            format_percent(r.open_rate, decimals),
            format_percent(r.click_rate, decimals),
            format_percent(r.reply_rate, decimals),
            format_percent(r.conversion_rate, decimals),
        );
    }
    println!();
}

fn print_comparison(output: &ComparisonOutput, decimals: u32) {
    let c = &output.comparison;
    println!("=== A/B: {} vs {} ({}) ===", output.variant_a, output.variant_b, c.metric.name());
    println!("  open rate delta:       {}", format_percent(c.open_rate_delta, decimals));
    println!("  click rate delta:      {}", format_percent(c.click_rate_delta, decimals));
    println!("  conversion rate delta: {}", format_percent(c.conversion_rate_delta, decimals));
    println!("  confidence:            {:.1}%", c.confidence);
    println!("  winner:                {:?}", c.winner);
}

fn group_name(group_by: GroupBy) -> &'static str {
    match group_by {
        GroupBy::Campaign => "campaign",
        GroupBy::Day      => "day",
        GroupBy::Status   => "status",
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    flag_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
