//! The `lectern` binary answers language queries over parsed source trees.
//!
//! Sources are read from JSON files holding `{"path", "text", "root"}`, where
//! `root` is the syntax tree produced by a parser. Every query prints its
//! result as pretty JSON in the shape of the matching LSP response.

mod args;
mod query;

use clap::Parser;
use lectern_std::error::prelude::*;

use crate::args::*;

/// The main entry point.
fn main() -> Result<()> {
    // Parses command line arguments
    let args = CliArguments::parse();

    // Starts logging
    let _ = {
        use log::LevelFilter::*;

        let base_level = if args.global.verbose { Debug } else { Info };

        env_logger::builder()
            .filter_module("lectern", base_level)
            .filter_module("lectern_analysis", base_level)
            .filter_module("lectern_query", base_level)
            .filter_module("lectern_index", base_level)
            .parse_default_env()
            .try_init()
    };

    crate::query::query_main(args)
}
