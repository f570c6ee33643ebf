use process_insight::{EventTable, Importable};
use std::env;
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <path_to_event_csv>", args[0]);
        std::process::exit(1);
    }

    let path = PathBuf::from(&args[1]);
    println!("Importing event table from {:?}", path);

    let table = EventTable::import_from_path(&path)?;
    println!("Successfully imported event table.");
    println!("Number of cases: {}", table.num_cases());
    println!("Total number of events: {}", table.num_events());
    println!("Distinct activities: {}", table.activities().len());

    if !table.is_empty() {
        let avg_events = table.num_events() as f64 / table.num_cases() as f64;
        println!("Average events per case: {:.2}", avg_events);
    }
    Ok(())
}
