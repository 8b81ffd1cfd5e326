// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// The entry point for all user interaction. It uses the `clap`
// crate to parse command line arguments; all business logic is
// delegated to Layer 2 (application) and Layer 4 (data).
//
// This layer is the only place that prints to stdout. It hands
// user-entered record fields to the store as plain strings —
// validation and type conversion are the store's job, so every
// front end fails the same way on the same input.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;

use commands::{
    AddArgs, Commands, EditArgs, ImportArgs, PredictArgs, RemoveArgs, SeedArgs, TrainArgs,
};

use crate::application::predict_use_case::{PredictQuery, PredictUseCase};
use crate::application::train_use_case::TrainUseCase;
use crate::data::catalog::CatalogStore;
use crate::data::generator;
use crate::domain::record::{Record, RecordDraft, RecordPatch};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "livraria-ml",
    version = "0.1.0",
    about = "Manage a CSV book catalog and train price prediction models."
)]
pub struct Cli {
    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use
    /// case. This keeps the CLI layer thin — it only routes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::List(args) => run_list(args),
            Commands::Add(args) => run_add(args),
            Commands::Edit(args) => run_edit(args),
            Commands::Remove(args) => run_remove(args),
            Commands::Train(args) => run_train(args),
            Commands::Predict(args) => run_predict(args),
            Commands::Import(args) => run_import(args),
            Commands::Seed(args) => run_seed(args),
        }
    }
}

fn open_store(opts: &commands::CatalogOpts, create_missing: bool) -> Result<CatalogStore> {
    Ok(CatalogStore::open(
        &opts.catalog,
        &opts.backup_dir,
        create_missing,
    )?)
}

fn run_list(args: commands::CatalogOpts) -> Result<()> {
    let store = open_store(&args, false)?;
    let records = store.list()?;
    if records.is_empty() {
        println!("Catalog is empty.");
        return Ok(());
    }
    print_table(&records);
    println!("{} record(s)", records.len());
    Ok(())
}

fn run_add(args: AddArgs) -> Result<()> {
    let store = open_store(&args.catalog, true)?;
    let draft = RecordDraft {
        titulo: args.titulo,
        autor: args.autor,
        genero: args.genero,
        ano_publicacao: args.ano_publicacao,
        paginas: args.paginas,
        avaliacao: args.avaliacao,
        preco: args.preco,
        estoque: args.estoque,
    };
    let record = store.create(&draft)?;
    println!("Created record {} ('{}').", record.id, record.titulo);
    Ok(())
}

fn run_edit(args: EditArgs) -> Result<()> {
    let store = open_store(&args.catalog, false)?;
    let patch = RecordPatch {
        titulo: args.titulo,
        autor: args.autor,
        genero: args.genero,
        ano_publicacao: args.ano_publicacao,
        paginas: args.paginas,
        avaliacao: args.avaliacao,
        preco: args.preco,
        estoque: args.estoque,
    };
    if patch.is_empty() {
        println!("Nothing to change — pass at least one field flag.");
        return Ok(());
    }
    let record = store.update(args.id, &patch)?;
    println!("Updated record {} ('{}').", record.id, record.titulo);
    Ok(())
}

fn run_remove(args: RemoveArgs) -> Result<()> {
    let store = open_store(&args.catalog, false)?;
    store.delete(args.id)?;
    println!("Removed record {}.", args.id);
    Ok(())
}

fn run_train(args: TrainArgs) -> Result<()> {
    let use_case = TrainUseCase::new(args.into());
    let report = use_case.execute()?;
    println!(
        "Trained {} model on {} rows ({} train / {} test).",
        report.kind, report.rows_total, report.rows_train, report.rows_test
    );
    println!("Held-out R² score: {:.4}", report.r2);
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let use_case = PredictUseCase::new(&args.artifacts_dir);
    let query = PredictQuery {
        genero: args.genero,
        paginas: args.paginas,
        avaliacao: args.avaliacao,
        ano_publicacao: args.ano_publicacao,
    };
    let preco = use_case.execute(&query)?;
    println!("Predicted preco: {preco:.2}");
    Ok(())
}

fn run_import(args: ImportArgs) -> Result<()> {
    let store = open_store(&args.catalog, true)?;
    let count = store.import_from(std::path::Path::new(&args.file))?;
    println!("Imported {} record(s) from '{}'.", count, args.file);
    Ok(())
}

fn run_seed(args: SeedArgs) -> Result<()> {
    let store = open_store(&args.catalog, true)?;
    let records = generator::generate(args.count, args.seed);
    store.replace_all(&records)?;
    println!("Catalog seeded with {} synthetic record(s).", records.len());
    Ok(())
}

/// Fixed-width listing, wide fields truncated to keep rows on
/// one terminal line.
fn print_table(records: &[Record]) {
    println!(
        "{:>4}  {:<24} {:<16} {:<18} {:>5} {:>7} {:>5} {:>8} {:>7}",
        "id", "titulo", "autor", "genero", "ano", "paginas", "nota", "preco", "estoque"
    );
    for r in records {
        println!(
            "{:>4}  {:<24} {:<16} {:<18} {:>5} {:>7} {:>5.1} {:>8.2} {:>7}",
            r.id,
            clip(&r.titulo, 24),
            clip(&r.autor, 16),
            clip(&r.genero, 18),
            r.ano_publicacao,
            r.paginas,
            r.avaliacao,
            r.preco,
            r.estoque,
        );
    }
}

fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let cut: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
