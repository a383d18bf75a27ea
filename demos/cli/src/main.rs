use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use shiftview_core::{ActivityAggregator, Shift, ShiftViewConfig, ShiftViewSummary};
use shiftview_records::{
    nursing_checklist_catalog, parse_catalog_str, parse_config_str, parse_records_str,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "shiftview-cli",
    about = "Tổng hợp checklist hoạt động điều dưỡng theo ca từ file JSON."
)]
struct Args {
    /// Đường dẫn tới file JSON chứa danh sách bản ghi.
    #[arg(short, long)]
    input: PathBuf,

    /// Danh mục hoạt động tùy chỉnh (mặc định: checklist điều dưỡng chuẩn).
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Quy tắc dựng chi tiết (trường specify, trường ghi chú, tên mặc định).
    #[arg(long)]
    config: Option<PathBuf>,

    /// In bảng tổng hợp dạng JSON.
    #[arg(long)]
    json: bool,

    /// Bật log debug ra stderr.
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Không đọc được file {path:?}"))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let records = parse_records_str(&read_file(&args.input)?)
        .with_context(|| format!("Danh sách bản ghi không hợp lệ: {:?}", args.input))?;

    let catalog = match &args.catalog {
        Some(path) => parse_catalog_str(&read_file(path)?)
            .with_context(|| format!("Danh mục không hợp lệ: {path:?}"))?,
        None => nursing_checklist_catalog(),
    };

    let config = match &args.config {
        Some(path) => parse_config_str(&read_file(path)?)
            .with_context(|| format!("Config không hợp lệ: {path:?}"))?,
        None => ShiftViewConfig::default(),
    };

    let summary = ActivityAggregator::new(Some(records.as_slice()), &config).summarize(&catalog);
    info!(
        total_records = summary.total_records,
        activities = catalog.len(),
        "đã tổng hợp theo ca"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &ShiftViewSummary) {
    println!("Nursing Activities Checklist - Shift View");
    let legend: Vec<String> = Shift::ALL
        .iter()
        .map(|shift| format!("{} = {} ({})", shift.code(), shift.label(), shift.hours()))
        .collect();
    println!("{}", legend.join(", "));

    if !summary.has_records {
        println!("No nursing activities records found.");
        return;
    }

    println!("Showing {} total activity record(s).", summary.total_records);
    let totals: Vec<String> = Shift::ALL
        .iter()
        .map(|shift| format!("{}: {} record(s)", shift.label(), summary.shift_totals.get(*shift)))
        .collect();
    println!("{}", totals.join("  "));

    for section in &summary.sections {
        println!();
        println!("{}", section.title);
        println!("{:<45} {:<7} {:<7} {:<7} Remarks", "Activity", "M", "A", "N");
        for row in &section.rows {
            println!(
                "{:<45} {:<7} {:<7} {:<7} {}",
                row.label,
                row.morning.mark(),
                row.afternoon.mark(),
                row.night.mark(),
                row.remarks.as_deref().unwrap_or("—")
            );
        }
    }
}
