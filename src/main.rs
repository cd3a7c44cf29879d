//! Surefire Launch CLI
//!
//! Runs the tests described by a TOML launch manifest.

use std::path::PathBuf;

use surefire_launch::{
    CommandBooter, ExecutionOutcome, LaunchManifest, Launcher, LocalRepositoryResolver, Validate,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let (check_only, manifest_arg) = match args.get(1..).unwrap_or_default() {
        [flag, path] if flag == "--check" => (true, path),
        [path] => (false, path),
        _ => {
            eprintln!("Usage: {} [--check] <manifest.toml>", args[0]);
            eprintln!("\nPlans and runs the tests described by a launch manifest.");
            eprintln!("\nOptions:");
            eprintln!("  --check  Validate the manifest options without running tests");
            std::process::exit(2);
        }
    };

    let manifest = match LaunchManifest::load(&PathBuf::from(manifest_arg)) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("Failed to load manifest: {}", e);
            std::process::exit(2);
        }
    };

    if check_only {
        match manifest.options.validate().into_result() {
            Ok(warnings) => {
                for warning in warnings {
                    println!("warning: {}", warning);
                }
                println!("Manifest is valid.");
                return;
            }
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
    }

    let launcher = Launcher::new(LocalRepositoryResolver::new(), CommandBooter::new());

    let outcome = match launcher
        .execute_tests(&manifest.project, &manifest.options)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Test launch failed: {}", e);
            std::process::exit(1);
        }
    };

    match &outcome {
        ExecutionOutcome::Success => println!("Tests passed."),
        ExecutionOutcome::Skipped(reason) => println!("Tests not run: {:?}", reason),
        ExecutionOutcome::Failure { ignored: true } => {
            println!("There are test failures (ignored).")
        }
        ExecutionOutcome::Failure { ignored: false } | ExecutionOutcome::LaunchFault(_) => {}
    }

    if let Err(e) = outcome.into_result() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
