use clap::Parser;
use taskflow::cli::commands::{Cli, Commands};
use taskflow::cli::handlers;
use taskflow::logging;

fn main() {
    let cli = Cli::parse();
    let board_dir = cli.board_dir.clone();

    let result = match cli.command {
        // No subcommand → launch TUI (logs go to the board's log file)
        None => taskflow::tui::run(board_dir.as_deref()),
        Some(Commands::Init(args)) => {
            logging::init_stderr();
            // Init is handled before board discovery
            handlers::cmd_init(args, board_dir.as_deref())
        }
        Some(_) => {
            logging::init_stderr();
            handlers::dispatch(cli)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
