use std::path::Path;

use seriesfit::{FitKind, Series};

fn parse_line(line: &str) -> Option<(f64, f64)> {
    let mut parts = line.split(',').map(str::trim);
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    Some((x, y))
}

fn main() {
    //
    // First argument is the path to a CSV or JSON file with (x, y) data points.
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Please provide a path to a CSV or JSON file with (x, y) data points.");
        std::process::exit(1);
    };
    let path = Path::new(&path);

    let mut order = 2;
    for arg in std::env::args().skip(2) {
        if let Some(option) = arg.strip_prefix("order=") {
            let Ok(value) = option.parse::<usize>() else {
                eprintln!("Invalid order value: {option}");
                std::process::exit(1);
            };
            order = value;
        }

        if arg == "help" || arg == "--help" || arg == "-h" {
            eprintln!("Usage: fit_report <path> [order=<polynomial order>]");
            std::process::exit(0);
        }
    }

    let Ok(contents) = std::fs::read_to_string(path) else {
        eprintln!("Failed to read file: {}", path.display());
        std::process::exit(1);
    };

    let mut data: Vec<(f64, f64)> = match path.extension().and_then(|s| s.to_str()) {
        Some("csv") => {
            let mut lines = contents.lines().enumerate().peekable();
            let mut data = Vec::new();

            //
            // A first line that does not parse is a header
            if let Some((_, first)) = lines.peek() {
                if parse_line(first).is_none() {
                    lines.next();
                }
            }

            for (i, line) in lines {
                if line.trim().is_empty() {
                    continue;
                }
                match parse_line(line) {
                    Some(point) => data.push(point),
                    None => {
                        eprintln!("Failed to parse line {}: {line}", i + 1);
                        std::process::exit(1);
                    }
                }
            }

            data
        }
        Some("json") => serde_json::from_str(&contents).unwrap_or_else(|err| {
            eprintln!("Failed to parse JSON: {err}");
            std::process::exit(1);
        }),

        _ => {
            eprintln!("Unsupported file format: {}", path.display());
            std::process::exit(1);
        }
    };

    // Rows may come in any order; a series needs them sorted by x
    data.sort_by(|a, b| a.0.total_cmp(&b.0));
    let series = match Series::from_points(&data) {
        Ok(series) => series,
        Err(err) => {
            eprintln!("Invalid data: {err}");
            std::process::exit(1);
        }
    };

    println!(
        "{} samples, x in [{}, {}], y in [{}, {}], mean {:.4}, stdev {:.4}",
        series.len(),
        series.x().first().copied().unwrap_or(f64::NAN),
        series.x().last().copied().unwrap_or(f64::NAN),
        series.min(),
        series.max(),
        series.mean(),
        series.st_dev(),
    );

    for kind in FitKind::ALL {
        let report = series
            .fit(kind, order)
            .and_then(|fit| Ok((fit.r_squared(&series)?, fit)));
        match report {
            Ok((r2, fit)) => println!("R² = {r2:>8.5}  {fit}"),
            Err(err) => println!("{kind:>21}: {err}"),
        }
    }
}
