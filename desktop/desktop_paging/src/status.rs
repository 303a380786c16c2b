use paging_sim::{PolicyComparison, SimulationSummary, StepClassification, StepReport};

pub fn print_step(report: &StepReport) {
    let page = match report.page {
        Some(page) => page.to_string(),
        None => format!("<invalid {}>", report.reference),
    };

    let outcome = match report.classification {
        StepClassification::Hit => "hit".to_string(),
        StepClassification::MissNoEviction => "miss".to_string(),
        StepClassification::MissWithEviction => {
            let victims: Vec<String> = report.evicted.iter().map(|id| id.to_string()).collect();
            format!("miss, evicted {}", victims.join(", "))
        }
        StepClassification::InvalidReference => "skipped".to_string(),
    };

    println!(
        "[{:>4}] {:<8} {:<24} memory {:>9} ({} pages) | vm {:>9} ({} pages) | faults {}",
        report.tick,
        page,
        outcome,
        report.memory.to_string(),
        report.resident_page_count,
        report.virtual_memory.to_string(),
        report.backing_page_count,
        report.cumulative_fault_count
    );
}

pub fn print_summary(summary: &SimulationSummary) {
    println!("----------------------------------------------------");
    println!("MEMORY ALLOCATION ({})", summary.policy);
    println!("Memory State/Capacity: {}", summary.memory);
    println!("Virtual Memory State/Capacity: {}", summary.virtual_memory);
    println!(
        "Is Memory Fragmented?: {}",
        if summary.memory_fragmented { "yes" } else { "no" }
    );
    println!(
        "Pages Free/Allocated: {}/{}",
        summary.free_page_slots, summary.resident_page_count
    );
    println!("Swapped Out Pages: {}", summary.backing_page_count);
    println!(
        "References: {} | Hits: {} | Page Faults: {} | Evictions: {} | Hit Ratio: {:.2}",
        summary.references,
        summary.hits,
        summary.fault_count,
        summary.evictions,
        summary.hit_ratio()
    );
    if !summary.invalid_references.is_empty() {
        println!("Skipped References: {:?}", summary.invalid_references);
    }
}

pub fn print_comparison(comparison: &PolicyComparison) {
    print_summary(&comparison.fifo);
    print_summary(&comparison.lru);
    println!("----------------------------------------------------");

    let (fifo, lru) = (comparison.fifo.fault_count, comparison.lru.fault_count);
    match fifo.cmp(&lru) {
        std::cmp::Ordering::Less => println!("FIFO caused {} fewer page faults", lru - fifo),
        std::cmp::Ordering::Greater => println!("LRU caused {} fewer page faults", fifo - lru),
        std::cmp::Ordering::Equal => println!("Both policies caused {} page faults", fifo),
    }
}
