/*
 *  Copyright (C) 2025  Markus Elias Gerber
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

mod process_file;
mod status;

use std::{fs, path::PathBuf, process};

use clap::Parser;
use env_logger::{Builder, Env};
use paging_sim::{
    compare_policies, ConfigurationError, PageReferenceSimulator, PagingConfig, PagingError,
    Process, ProcessRecord, ReferenceSequence,
};
use thiserror::Error;

use process_file::{load_process_records, ProcessFileError};

/// Used if no process file is given
const DEMO_PROCESSES: [ProcessRecord; 4] = [
    ProcessRecord { id: 1, size: 8 },
    ProcessRecord { id: 2, size: 6 },
    ProcessRecord { id: 3, size: 12 },
    ProcessRecord { id: 4, size: 5 },
];

#[derive(Parser, Debug)]
#[command(
    name = "desktop_paging",
    about = "Simulates FIFO and LRU page replacement on a memory backed by virtual memory"
)]
struct Args {
    /// File with one "<id> <size>" process record per line
    #[arg(long)]
    processes: Option<PathBuf>,

    /// JSON file with a paging config, the other options override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Max memory size
    #[arg(long, allow_negative_numbers = true)]
    memory: Option<i64>,

    /// Max virtual memory size
    #[arg(long, allow_negative_numbers = true)]
    virtual_memory: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    page_size: Option<i64>,

    /// fifo (1) or lru (2)
    #[arg(long)]
    policy: Option<String>,

    /// Number of generated references
    #[arg(long)]
    references: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Explicit reference sequence (page indices), e.g. 0,1,2,0
    #[arg(long, value_delimiter = ',')]
    sequence: Option<Vec<usize>>,

    /// Print reports as JSON, one object per line
    #[arg(long)]
    json: bool,

    /// Run FIFO and LRU over the same sequence
    #[arg(long)]
    compare: bool,
}

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    ProcessFile(#[from] ProcessFileError),

    #[error("could not read config file: {0}")]
    ConfigFile(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Paging(#[from] PagingError),
}

fn main() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_module_path(false)
        .init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), AppError> {
    let config = build_config(args)?;

    let records = match &args.processes {
        Some(path) => load_process_records(path)?,
        None => DEMO_PROCESSES.to_vec(),
    };
    let processes = records
        .iter()
        .map(Process::from_record)
        .collect::<Result<Vec<_>, _>>()?;

    let mut sim = PageReferenceSimulator::from_config(config.clone(), &processes)?;
    let sequence = match &args.sequence {
        Some(indices) => ReferenceSequence::from_indices(indices.clone()),
        None => sim.generate_references(),
    };

    if args.compare {
        let comparison = compare_policies(&config, &processes, &sequence)?;
        if args.json {
            println!("{}", serde_json::to_string(&comparison)?);
        } else {
            status::print_comparison(&comparison);
        }
        return Ok(());
    }

    let json = args.json;
    let result = sim.run_with(&sequence, |report| {
        if json {
            match serde_json::to_string(report) {
                Ok(line) => println!("{}", line),
                Err(err) => log::error!("Could not serialize step report: {}", err),
            }
        } else {
            status::print_step(report);
        }
    });

    // on a fatal error the summary shows the state at the moment of failure
    let summary = match &result {
        Ok(summary) => summary.clone(),
        Err(_) => sim.summary(),
    };
    if json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        status::print_summary(&summary);
    }

    result.map(|_| ()).map_err(AppError::from)
}

fn build_config(args: &Args) -> Result<PagingConfig, AppError> {
    let base = match &args.config {
        Some(path) => serde_json::from_str::<PagingConfig>(&fs::read_to_string(path)?)?,
        None => PagingConfig::default(),
    };

    let policy = args.policy.clone().unwrap_or_else(|| base.policy.to_string());
    let mut config = PagingConfig::from_raw(
        args.memory.unwrap_or(base.max_memory_size as i64),
        args.virtual_memory.unwrap_or(base.max_virtual_memory_size as i64),
        args.page_size.unwrap_or(base.page_size as i64),
        &policy,
    )?;

    config.reference_count = args.references.unwrap_or(base.reference_count);
    config.seed = args.seed.unwrap_or(base.seed);

    Ok(config)
}
