use std::path::PathBuf;

#[derive(Debug, Clone, clap::Parser)]
#[clap(name = "lectern", author, version, about)]
pub struct CliArguments {
    /// Arguments shared by every query.
    #[clap(flatten)]
    pub global: GlobalArgs,

    /// The query to run
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::Parser)]
pub struct GlobalArgs {
    /// The source trees to load, as JSON files.
    #[clap(long = "input", value_name = "TREE_JSON", num_args = 1.., global = true)]
    pub inputs: Vec<PathBuf>,

    /// The query configuration, as a TOML file.
    #[clap(long, value_name = "CONFIG_TOML", env = "LECTERN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Logs debug messages of the analysis.
    #[clap(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, clap::Subcommand)]
#[clap(rename_all = "kebab-case")]
pub enum Commands {
    /// Lists workspace symbols whose qualified name starts with a prefix
    Index(IndexArgs),
    /// Highlights the occurrences of the symbol at a position
    Highlight(PositionArgs),
    /// Finds the definitions of the constant or method at a position
    Definition(PositionArgs),
    /// Lists the symbols of a document as a hierarchy
    Symbols(DocumentArgs),
    /// Lists the folding ranges of a document
    Folding(DocumentArgs),
    /// Lists the selection ranges around a position
    Selection(PositionArgs),
}

#[derive(Debug, Clone, clap::Parser)]
pub struct IndexArgs {
    /// The prefix of the qualified names to list. Lists every symbol if
    /// omitted.
    #[clap(long, default_value = "")]
    pub prefix: String,
}

#[derive(Debug, Clone, clap::Parser)]
pub struct DocumentArgs {
    /// The path of the document to query, as recorded in its tree. Defaults
    /// to the first input.
    #[clap(long)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, clap::Parser)]
pub struct PositionArgs {
    /// The document to query.
    #[clap(flatten)]
    pub document: DocumentArgs,

    /// The byte offset to query.
    #[clap(long, conflicts_with_all = ["line", "character"])]
    pub offset: Option<usize>,

    /// The zero-based line to query.
    #[clap(long, requires = "character")]
    pub line: Option<u32>,

    /// The zero-based character to query, counted in the configured position
    /// encoding.
    #[clap(long, requires = "line")]
    pub character: Option<u32>,
}
