//! sheetshift CLI
//!
//! ```text
//! sheetshift <input> <output>   入力を判定して、出力の拡張子の形式で書き出す
//! sheetshift detect <file>      判定した形式 (csv / xlsx / xls / json) を表示する
//! ```

use std::path::Path;
use std::process;

use sheetshift::{OutputFormat, SheetShiftError};
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("sheetshift");

    match args.get(1).map(String::as_str) {
        None => {
            print_usage(program);
            process::exit(1);
        }
        Some("detect") => {
            let Some(file) = args.get(2) else {
                eprintln!("Usage: {} detect <file>", program);
                process::exit(1);
            };
            match sheetshift::detect(file) {
                Ok(format) => println!("{}", format),
                Err(e) => {
                    handle_error(e);
                    process::exit(1);
                }
            }
        }
        Some(input) => {
            let Some(output) = args.get(2) else {
                eprintln!("Usage: {} <input> <output>", program);
                process::exit(1);
            };
            if let Err(e) = run_convert(input, output) {
                handle_error(e);
                process::exit(1);
            }
        }
    }
}

/// `RUST_LOG`が未設定の場合は警告以上のみを標準エラーに出力する
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_usage(program: &str) {
    println!("Usage: {} <input> <output>", program);
    println!("       {} detect <file>", program);
    println!("\nThe input format is detected from the file content.");
    println!("The output format is chosen by the output extension: .csv, .json, .xlsx");
    println!("\nExamples:");
    println!("  {} report.xls report.json", program);
    println!("  {} export.csv export.xlsx", program);
    println!("  {} detect unknown.dat", program);
}

fn run_convert(input: &str, output: &str) -> Result<(), SheetShiftError> {
    if !Path::new(input).exists() {
        return Err(SheetShiftError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input file not found: {}", input),
        )));
    }

    if OutputFormat::from_path(output).is_none() {
        let ext = Path::new(output)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_else(|| output.to_string());
        return Err(SheetShiftError::UnsupportedOutput(ext));
    }

    let rows = sheetshift::convert(input, output)?;
    println!("converted: {} ({} rows)", output, rows);
    Ok(())
}

fn handle_error(error: SheetShiftError) {
    match error {
        SheetShiftError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
            eprintln!("Please check that the file exists and you have permission to access it.");
        }
        SheetShiftError::Parse(parse_err) => {
            eprintln!("Parse Error: {}", parse_err);
            eprintln!("The file may not be a valid spreadsheet or may be corrupted.");
        }
        SheetShiftError::Json(json_err) => {
            eprintln!("JSON Error: {}", json_err);
            eprintln!("JSON input must be an array of objects.");
        }
        SheetShiftError::Csv(csv_err) => {
            eprintln!("CSV Error: {}", csv_err);
        }
        SheetShiftError::Xlsx(xlsx_err) => {
            eprintln!("XLSX Write Error: {}", xlsx_err);
        }
        SheetShiftError::Detection(msg) => {
            eprintln!("Detection Error: not supported ({})", msg);
        }
        SheetShiftError::EmptyData(kind) => {
            eprintln!("Empty Data: {}", kind);
        }
        SheetShiftError::MalformedRecord { line, message } => {
            eprintln!("Malformed Record at line {}: {}", line, message);
        }
        SheetShiftError::UnsupportedFormat(msg) => {
            eprintln!("Unsupported Input Format: {}", msg);
        }
        SheetShiftError::UnsupportedOutput(ext) => {
            eprintln!("Unsupported Output Format: {}", ext);
            eprintln!("Supported output extensions: .csv, .json, .xlsx");
        }
        SheetShiftError::Config(msg) => {
            eprintln!("Configuration Error: {}", msg);
        }
    }
}
