use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// valscope - print strings and typed values out of target memory images
#[derive(Debug, Parser)]
#[command(name = "valscope", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Limit on string chars or array elements to print (0 for unlimited).
    #[arg(long, global = true, value_name = "N")]
    pub elements: Option<usize>,

    /// Threshold for repeated print elements (0 to never compress).
    #[arg(long, global = true, value_name = "N")]
    pub repeats: Option<usize>,

    /// Output radix: 8, 10 or 16.
    #[arg(long, global = true, value_name = "RADIX")]
    pub radix: Option<u32>,

    /// Print structures one member per line.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Do not print target addresses.
    #[arg(long, global = true)]
    pub no_addresses: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the string stored at an address.
    String {
        /// Path to the JSON memory image.
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Start address (hex like 0x1000 or decimal).
        #[arg(value_name = "ADDRESS")]
        address: String,

        /// Fetch exactly this many bytes instead of stopping at a NUL terminator.
        #[arg(short, long, value_name = "N", default_value_t = 0)]
        length: usize,
    },

    /// Print a typed value stored at an address.
    Value {
        /// Path to the JSON memory image.
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Address of the value (hex like 0x1000 or decimal).
        #[arg(value_name = "ADDRESS")]
        address: String,

        /// Value type: i8..i64, i128, u8..u128, f32, f64, char, char*.
        #[arg(short, long, value_name = "TYPE")]
        r#type: String,

        /// Print this many consecutive values as one repeated value.
        #[arg(long, value_name = "N", default_value_t = 1)]
        repeat: usize,

        /// Format letter: d, u, x, o, b, h, w or g.
        #[arg(short, long, value_name = "LETTER")]
        format: Option<char>,
    },

    /// Apply print settings commands and show the resulting settings.
    Settings {
        /// Commands such as "set print elements 20" or "set radix 16".
        #[arg(value_name = "COMMAND")]
        commands: Vec<String>,
    },
}
