use crate::demo::{run_demo, run_rank, DemoArgs, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use recruit_ai::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "recruit-ai-api",
    about = "Evaluate, rank, and track job candidates from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Rank one or more job batches from a JSON file and print the results
    Rank(RankArgs),
    /// Run an end-to-end demo with a built-in job and candidate pool
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// JSON file of `{job_id, criteria, candidates}` batches loaded at startup
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rank(args) => run_rank(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["recruit-ai-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn rank_requires_a_batch_file() {
        assert!(Cli::try_parse_from(["recruit-ai-api", "rank"]).is_err());

        let cli = Cli::try_parse_from([
            "recruit-ai-api",
            "rank",
            "--batch",
            "jobs.json",
            "--candidates-csv",
            "export.csv",
            "--json",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Rank(args)) => {
                assert_eq!(args.batch, PathBuf::from("jobs.json"));
                assert_eq!(args.candidates_csv, Some(PathBuf::from("export.csv")));
                assert!(args.json);
            }
            other => panic!("expected rank command, got {other:?}"),
        }
    }

    #[test]
    fn serve_accepts_overrides_and_seed() {
        let cli = Cli::try_parse_from([
            "recruit-ai-api",
            "serve",
            "--port",
            "9090",
            "--seed",
            "seed.json",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.port, Some(9090));
                assert!(args.host.is_none());
                assert_eq!(args.seed, Some(PathBuf::from("seed.json")));
            }
            other => panic!("expected serve command, got {other:?}"),
        }
    }
}
