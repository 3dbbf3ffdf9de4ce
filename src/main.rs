//! CLI wrapper:
//!   booking-status status --bookings bookings.csv --payments payments.csv > statuses.csv
//!   booking-status price --input selection.json --format text

use anyhow::{Context, Result};
use booking_status::board::{BookingRow, PaymentRow, StatusBoard};
use booking_status::numeric::{floor_for_display, format_money};
use booking_status::{SelectableLineItemSet, StatusFilter, aggregate, validate_for_submission};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use csv::{ReaderBuilder, WriterBuilder};
use rust_decimal::Decimal;
use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
};
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn cli() -> Command {
    Command::new("booking-status")
        .about("Derive booking statuses and price receipt selections")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Log at debug level"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("status")
                .about("Derive the display status of every booking")
                .arg(
                    Arg::new("bookings")
                        .long("bookings")
                        .value_name("FILE")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Bookings CSV (booking,grand_total,deposit_total_1,deposit_total_2,issued_reference)"),
                )
                .arg(
                    Arg::new("payments")
                        .long("payments")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .help("Payments CSV (booking,amount)"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .help("Output CSV (defaults to stdout)"),
                )
                .arg(
                    Arg::new("status")
                        .long("status")
                        .value_name("KEY")
                        .default_value("all")
                        .help("Only emit bookings in this status (e.g. awaiting_deposit)"),
                ),
        )
        .subcommand(
            Command::new("price")
                .about("Price a passenger / extras selection")
                .arg(
                    Arg::new("input")
                        .long("input")
                        .value_name("FILE")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Selection JSON"),
                )
                .arg(
                    Arg::new("vat")
                        .long("vat")
                        .value_name("PERCENT")
                        .help("Override the selection's VAT percent"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["json", "text"])
                        .default_value("json"),
                ),
        )
}

fn main() -> Result<()> {
    let matches = cli().get_matches();

    // ---------------------------------------------------------------- logging
    // logs → stderr, keeping stdout clean for CSV / JSON
    let level = if matches.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_target(false)
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    match matches.subcommand() {
        Some(("status", sub)) => run_status(sub),
        Some(("price", sub)) => run_price(sub),
        _ => unreachable!("subcommand_required"),
    }
}

fn run_status(args: &ArgMatches) -> Result<()> {
    let filter: StatusFilter = args
        .get_one::<String>("status")
        .map(String::as_str)
        .unwrap_or("all")
        .parse()
        .map_err(anyhow::Error::msg)?;

    // ---------------------------------------------------------------- ingest
    let mut board = StatusBoard::new();

    let bookings_path = args
        .get_one::<PathBuf>("bookings")
        .context("--bookings is required")?;
    let mut rdr = csv_reader(bookings_path)?;
    for (idx, row) in rdr.deserialize::<BookingRow>().enumerate() {
        match row {
            Ok(row) => {
                if let Err(reason) = board.add_booking(row) {
                    debug!(row = idx + 1, ?reason, "booking-skipped");
                }
            }
            Err(e) => error!(row = idx + 1, %e, "csv-deserialize"),
        }
    }

    if let Some(payments_path) = args.get_one::<PathBuf>("payments") {
        let mut rdr = csv_reader(payments_path)?;
        for (idx, row) in rdr.deserialize::<PaymentRow>().enumerate() {
            match row {
                Ok(row) => {
                    if let Err(reason) = board.add_payment(row) {
                        debug!(row = idx + 1, ?reason, "payment-skipped");
                    }
                }
                Err(e) => error!(row = idx + 1, %e, "csv-deserialize"),
            }
        }
    }
    info!("Finished ingest: {} bookings", board.len());

    // ---------------------------------------------------------------- emit
    let sink: Box<dyn Write> = match args.get_one::<PathBuf>("output") {
        Some(p) => Box::new(File::create(p).with_context(|| format!("creating {}", p.display()))?),
        None => Box::new(io::stdout()),
    };
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(sink);
    wtr.write_record(["booking", "status", "label", "color", "total_paid"])?;

    let lines = board.statuses(filter);
    debug!(emitted = lines.len(), ?filter, "status-filter");
    for line in lines {
        wtr.write_record(&[
            line.booking,
            line.status.kind().to_string(),
            line.status.label().to_owned(),
            line.status.color().to_string(),
            format!("{:.2}", line.total_paid),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn run_price(args: &ArgMatches) -> Result<()> {
    let input = args
        .get_one::<PathBuf>("input")
        .context("--input is required")?;
    let file = File::open(input).with_context(|| format!("opening {}", input.display()))?;
    let mut items: SelectableLineItemSet = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", input.display()))?;

    if let Some(raw) = args.get_one::<String>("vat") {
        items.vat_percent = raw
            .trim()
            .parse::<Decimal>()
            .with_context(|| format!("invalid --vat {raw:?}"))?;
    }

    if let Err(e) = validate_for_submission(&items) {
        warn!(%e, "selection cannot be submitted");
    }

    let breakdown = aggregate(&items);
    info!(
        passengers = items.selected_passenger_count(),
        partial = breakdown.partial_selection,
        "priced selection"
    );

    let mut out = io::stdout().lock();
    match args.get_one::<String>("format").map(String::as_str) {
        Some("text") => {
            let counts = breakdown.tier_counts;
            let totals = breakdown.tier_totals;
            writeln!(out, "Tier 1 x{:<3} {:>16}", counts.tier1, format_money(totals.tier1))?;
            writeln!(out, "Tier 2 x{:<3} {:>16}", counts.tier2, format_money(totals.tier2))?;
            writeln!(out, "Tier 3 x{:<3} {:>16}", counts.tier3, format_money(totals.tier3))?;
            writeln!(out, "Extras      {:>16}", format_money(breakdown.extras_subtotal))?;
            writeln!(out, "Subtotal    {:>16}", format_money(breakdown.subtotal))?;
            writeln!(
                out,
                "VAT {:>5}%  {:>16}",
                items.vat_percent.normalize().to_string(),
                format_money(floor_for_display(breakdown.vat_amount))
            )?;
            writeln!(out, "Total       {:>16}", format_money(breakdown.total))?;
        }
        _ => {
            serde_json::to_writer_pretty(&mut out, &breakdown)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn csv_reader(path: &Path) -> Result<csv::Reader<File>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(ReaderBuilder::new().trim(csv::Trim::All).from_reader(file))
}
