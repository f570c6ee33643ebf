use process_insight::{
    analyze_bottlenecks, discover_dfg, export_dfg_to_dot, sample_event_table, BottleneckOptions,
};
use std::env;
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <output_dot_path>", args[0]);
        std::process::exit(1);
    }
    let output_path = PathBuf::from(&args[1]);

    println!("Loading built-in invoice sample...");
    let table = sample_event_table()?;

    println!("Discovering directly-follows graph...");
    let dfg = discover_dfg(&table);
    println!(
        "Discovered DFG with {} activities and {} relations.",
        dfg.activities.len(),
        dfg.directly_follows_relations.len()
    );

    let bottlenecks = analyze_bottlenecks(&table, &BottleneckOptions::default());
    for (activity, mean) in bottlenecks.mean_rows() {
        println!("{activity}: {mean:.2} {}", bottlenecks.unit.suffix());
    }

    println!("Exporting DOT to {:?}", output_path);
    std::fs::write(&output_path, export_dfg_to_dot(&dfg, Some(&bottlenecks)))?;

    println!("Done!");
    Ok(())
}
