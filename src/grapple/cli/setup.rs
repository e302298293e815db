use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "grapple",
    bin_name = "grapple",
    version = get_version(),
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Project-aware file marks for quick navigation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Scope marks to the current git branch
    #[arg(short, long, global = true, help_heading = "Options")]
    pub branch: bool,

    /// Project directory (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub cwd: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Mark,
    Navigate,
    List,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Mark => "Marking:",
            CommandGroup::Navigate => "Navigation:",
            CommandGroup::List => "Mark List:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "add" | "rm" | "toggle" | "set-at" | "leave" => Some(CommandGroup::Mark),
            "get" | "goto" | "next" | "prev" | "status" => Some(CommandGroup::Navigate),
            "list" | "edit" | "export" | "clear" => Some(CommandGroup::List),
            "config" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::Mark,
            CommandGroup::Navigate,
            CommandGroup::List,
            CommandGroup::Misc,
        ]
    }
}

pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("grapple {version}\n"));
    output.push_str("Project-aware file marks for quick navigation\n");
    output.push('\n');
    output.push_str("Usage: grapple [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();

    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let name = sc.get_name();
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", name, about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("  -b, --branch     Scope marks to the current git branch\n");
    output.push_str("      --cwd <DIR>  Project directory\n");
    output.push_str("  -v, --verbose    Verbose output\n");
    output.push_str("  -h, --help       Print help\n");
    output.push_str("  -V, --version    Print version\n");

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

/// Prints help for a command by name, falling back to the grouped help.
pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();

    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name {
            let help = subcmd.render_help();
            print!("{}", help);
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

/// The buffer being marked: a path plus where the cursor is.
#[derive(Args, Debug, Clone)]
pub struct FocusArgs {
    /// File to act on
    pub file: String,

    /// Cursor row (1-based)
    #[arg(long, default_value_t = 1)]
    pub row: usize,

    /// Cursor column (0-based)
    #[arg(long, default_value_t = 0)]
    pub col: usize,

    /// Filetype reported by the editor (checked against excluded_filetypes)
    #[arg(long)]
    pub filetype: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mark a file
    #[command(alias = "a", display_order = 1)]
    Add(FocusArgs),

    /// Remove a mark by index or filename, leaving a hole
    #[command(display_order = 2)]
    Rm {
        /// Mark index or filename
        id: String,
    },

    /// Mark a file, or unmark it if it is already marked
    #[command(alias = "t", display_order = 3)]
    Toggle(FocusArgs),

    /// Put a file at a specific index
    #[command(name = "set-at", display_order = 4)]
    SetAt {
        /// Index to place the file at
        index: usize,

        #[command(flatten)]
        focus: FocusArgs,
    },

    /// Record the cursor position for a marked file
    #[command(display_order = 5)]
    Leave(FocusArgs),

    /// Print a mark as filename:row:col
    #[command(display_order = 10)]
    Get {
        /// Mark index or filename
        id: String,
    },

    /// Resolve a mark to a path, optionally opening it
    #[command(alias = "g", display_order = 11)]
    Goto {
        /// Mark index or filename
        id: String,

        /// Open the file in $EDITOR at the stored row
        #[arg(long)]
        open: bool,
    },

    /// The mark after the current file (wraps around)
    #[command(display_order = 12)]
    Next {
        /// The file currently open
        #[arg(long, default_value = "")]
        from: String,
    },

    /// The mark before the current file (wraps around)
    #[command(display_order = 13)]
    Prev {
        /// The file currently open
        #[arg(long, default_value = "")]
        from: String,
    },

    /// Statusline tag for a file (M<index>)
    #[command(display_order = 14)]
    Status {
        /// File to look up
        file: String,
    },

    /// List marks with their stable indexes
    #[command(alias = "ls", display_order = 20)]
    List,

    /// Edit the mark list in $EDITOR
    #[command(alias = "e", display_order = 21)]
    Edit,

    /// Print the marks densely numbered, for quickfix-style consumers
    #[command(display_order = 22)]
    Export {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Remove every mark of the project
    #[command(display_order = 23)]
    Clear,

    /// Show effective settings and known projects
    #[command(display_order = 30)]
    Config,

    /// Print help for grapple or a subcommand
    #[command(display_order = 31)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}
