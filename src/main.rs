use std::process::ExitCode;

use xsd_check::{Cli, SourceLines, ValidationEngine, format_diagnostics};

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let engine = ValidationEngine::new();

    match engine.validate_files(&cli.xml, &cli.xsd) {
        Ok(report) if report.is_valid() => {
            println!("XML is valid.");
            ExitCode::SUCCESS
        }
        Ok(report) => {
            // One re-read of the document as text, deferred until there is
            // something to excerpt. An unreadable file degrades the blocks
            // to their header lines.
            let source = SourceLines::from_path(&cli.xml);
            for block in format_diagnostics(&report.diagnostics, source.as_ref()) {
                println!("{}", block);
            }
            println!("XML is invalid.");
            ExitCode::from(1)
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::from(2)
        }
    }
}
