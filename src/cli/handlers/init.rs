use crate::cli::commands::InitArgs;
use crate::io::board_io;

/// Infer a board name from a directory name: hyphens and underscores become
/// spaces, each word title-cased.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// User ids end up in every todo row; keep them to one printable token.
fn validate_user_id(user: &str) -> Result<(), String> {
    if user.is_empty() {
        return Err("user id cannot be empty".to_string());
    }
    if user.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(format!("invalid user id \"{}\" (no whitespace)", user));
    }
    Ok(())
}

pub fn cmd_init(args: InitArgs, board_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let root = match board_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            std::fs::canonicalize(dir)?
        }
        None => std::env::current_dir()?,
    };

    // Warn when nesting inside another board
    if let Some(parent) = root.parent()
        && let Ok(parent_root) = board_io::discover_board(parent)
    {
        eprintln!(
            "Note: parent board found at {}/",
            parent_root.join(board_io::BOARD_DIR).display()
        );
    }

    let user = args.user.unwrap_or_else(|| "local".to_string());
    validate_user_id(&user)?;

    let name = args.name.unwrap_or_else(|| {
        root.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Todos".to_string())
    });

    let board = board_io::init_board(&root, &name, &user, args.force)?;
    println!("Initialized taskflow board: {}", board.config.board.name);
    println!("  {}", board.board_dir.display());
    Ok(())
}
