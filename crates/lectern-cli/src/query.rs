use ecow::EcoString;
use lectern_analysis::{LspPosition, Source};
use lectern_query::*;
use lectern_std::error::prelude::*;

use crate::args::*;

/// Loads the inputs, answers the query and prints the response.
pub fn query_main(args: CliArguments) -> Result<()> {
    let config = match &args.global.config {
        Some(path) => QueryConfig::load(path)?,
        None => QueryConfig::default(),
    };

    let mut ctx = AnalysisContext::new(config);
    let mut first = None;
    for input in &args.global.inputs {
        let source = Source::load(input)?;
        log::info!("loaded {} from {}", source.path(), input.display());
        first.get_or_insert_with(|| source.path().clone());
        ctx.add_source(source);
    }
    log::info!("indexed {} symbols", ctx.index().len());

    let req = match args.command {
        Commands::Index(args) => QueryRequest::WorkspaceSymbol(WorkspaceSymbolRequest {
            pattern: Some(args.prefix),
        }),
        Commands::Highlight(args) => {
            let (path, position) = locate(&ctx, first, args)?;
            QueryRequest::DocumentHighlight(DocumentHighlightRequest { path, position })
        }
        Commands::Definition(args) => {
            let (path, position) = locate(&ctx, first, args)?;
            QueryRequest::GotoDefinition(GotoDefinitionRequest { path, position })
        }
        Commands::Symbols(args) => QueryRequest::DocumentSymbol(DocumentSymbolRequest {
            path: document(first, args)?,
        }),
        Commands::Folding(args) => QueryRequest::FoldingRange(FoldingRangeRequest {
            path: document(first, args)?,
        }),
        Commands::Selection(args) => {
            let (path, position) = locate(&ctx, first, args)?;
            QueryRequest::SelectionRange(SelectionRangeRequest {
                path,
                positions: vec![position],
            })
        }
    };

    let res = ctx.query(req);
    let res = serde_json::to_string_pretty(&res).context("serialize query response")?;
    println!("{res}");

    Ok(())
}

/// The document a query is about.
fn document(first: Option<EcoString>, args: DocumentArgs) -> Result<EcoString> {
    args.path
        .map(EcoString::from)
        .or(first)
        .context("no document to query")
}

/// The document and position a query is about.
fn locate(
    ctx: &AnalysisContext,
    first: Option<EcoString>,
    args: PositionArgs,
) -> Result<(EcoString, LspPosition)> {
    let path = document(first, args.document)?;
    let source = ctx.source_by_path(&path)?;

    let position = match (args.offset, args.line, args.character) {
        (Some(offset), ..) => {
            if offset > source.len_bytes() {
                bail!("offset {offset} is past the end of {path}");
            }
            ctx.to_lsp_pos(offset, source)
        }
        (None, Some(line), Some(character)) => LspPosition::new(line, character),
        _ => bail!("a position is required, pass --offset or --line and --character"),
    };

    Ok((path, position))
}
