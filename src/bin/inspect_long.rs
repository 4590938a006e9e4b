use anyhow::Result;
use gdpmelt::export::read_long_parquet;
use gdpmelt::table::LongTable;
use prettytable::{format, Cell, Row, Table};
use std::{env, path::Path, process::exit};
use tracing_subscriber::{fmt, EnvFilter};

const PREVIEW_ROWS: usize = 5;

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Expect exactly one CLI argument: path to a long-format Parquet export.
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <PARQUET_FILE>", args[0]);
        exit(1);
    }
    if let Err(e) = inspect(Path::new(&args[1])) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

/// Read the export back and print its columns, row count and a head/tail preview.
fn inspect(path: &Path) -> Result<()> {
    let parsed = read_long_parquet(path)?;
    let table = &parsed.table;

    println!("=== Long-format export: {} ===", path.display());
    println!("Total rows:       {}", table.len());
    println!("Missing values:   {}", table.missing_count());
    match table.records().iter().map(|r| r.year).min().zip(table.max_year()) {
        Some((lo, hi)) => println!("Years:            {}-{}", lo, hi),
        None => println!("Years:            <none>"),
    }
    println!();

    println!("=== Columns ===");
    for name in &parsed.fields {
        println!("- {}", name);
    }
    println!();

    println!("=== Head ===");
    preview(table, &parsed.fields, true).printstd();
    println!("=== Tail ===");
    preview(table, &parsed.fields, false).printstd();
    Ok(())
}

fn preview(table: &LongTable, fields: &[String], head: bool) -> Table {
    let rows = if head {
        table.head(PREVIEW_ROWS)
    } else {
        table.tail(PREVIEW_ROWS)
    };

    let mut out = Table::new();
    out.set_format(*format::consts::FORMAT_BOX_CHARS);
    out.set_titles(Row::new(
        fields.iter().map(|f| Cell::new(f).style_spec("bFg")).collect(),
    ));
    for r in rows {
        out.add_row(Row::new(vec![
            Cell::new(&r.entity.name),
            Cell::new(&r.entity.code),
            Cell::new(&r.entity.indicator_name),
            Cell::new(&r.entity.indicator_code),
            Cell::new(&r.year.to_string()).style_spec("r"),
            Cell::new(&r.value.map(|v| v.to_string()).unwrap_or_default()).style_spec("r"),
        ]));
    }
    out
}
