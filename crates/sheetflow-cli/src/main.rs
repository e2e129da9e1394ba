//! sheetflow CLI - CSV ⇄ workbook conversion tool.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use sheetflow::SheetflowError;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            inputs,
            output_dir,
            to,
            sheet,
            merge,
            plain,
            chunk_threshold_mb,
            force,
            json,
        } => commands::convert::run(
            inputs,
            output_dir,
            to,
            sheet,
            merge,
            plain,
            chunk_threshold_mb,
            force,
            json,
            cli.verbose,
        ),

        Commands::Validate {
            inputs,
            output_dir,
            to,
            merge,
            json,
        } => commands::validate::run(inputs, output_dir, to, merge, json, cli.verbose),

        Commands::Estimate { inputs, json } => commands::estimate::run(inputs, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(err) = e.downcast_ref::<SheetflowError>() {
            if let Some(hint) = err.remediation() {
                eprintln!("{} {}", "Hint:".yellow(), hint);
            }
        }
        std::process::exit(1);
    }
}
