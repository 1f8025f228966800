#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "refwalk", about = "Reference extraction and content checksums for serialized asset objects")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Walk objects and print their checksums.
	Walk(cmd::walk::Args),
	/// Print references discovered while walking objects.
	Refs(cmd::refs::Args),
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> refwalk::asset::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Walk(args) => cmd::walk::run(args),
		Commands::Refs(args) => cmd::refs::run(args),
	}
}
