use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, macros::date};

use salesledger_rs::{Sale, count_sales, create_sale, initialize_db};

/// A utility for creating a test database for the salesledger_rs web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The number of sample sales to create.
    #[arg(long, default_value_t = 120)]
    sale_count: i64,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating sample sales...");

    let base_date = date!(2023 - 01 - 01);
    for i in 1..=args.sale_count {
        create_sale(
            Sale {
                id: i,
                store_code: format!("S{:03}", (i % 7) + 1),
                // Spread the amounts out so the formatted values vary.
                amount: 995 + i * 137,
                date: base_date + Duration::days(i % 90),
            },
            &conn,
        )?;
    }

    println!("Success! Created {} sales.", count_sales(&conn)?);

    Ok(())
}
