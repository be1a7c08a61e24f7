use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Browse a spreadsheet-backed course catalog from the terminal
#[derive(Parser)]
#[command(name = "coursedeck")]
#[command(about = "Course catalog browser backed by Google Sheets", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Read the catalog from a local JSON file instead of Google Sheets
    #[arg(long, global = true)]
    pub offline: Option<PathBuf>,

    /// Database URL for purchases and settings
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List courses with price and thumbnail
    Courses,
    /// Print the full course/module/lesson hierarchy
    Tree,
    /// Replay a key sequence and print every view as JSON
    Browse {
        /// Comma separated keys: up,down,left,right,enter,space,esc
        #[arg(long, value_delimiter = ',')]
        keys: Vec<String>,
    },
    /// Buy a course
    Buy {
        course_id: String,
    },
    /// List purchased course ids
    Purchases,
    /// Show or set the theme token
    Theme {
        token: Option<String>,
    },
}
