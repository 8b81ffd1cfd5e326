// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → u32, f64, etc.)
//
// Record fields (titulo, preco, ...) deliberately stay String
// here: the catalog store owns their validation, so the CLI and
// any future front end fail with the same messages.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every record in the catalog
    List(CatalogOpts),

    /// Add a new record to the catalog
    Add(AddArgs),

    /// Edit fields of an existing record
    Edit(EditArgs),

    /// Remove a record from the catalog
    Remove(RemoveArgs),

    /// Train a price prediction model from the catalog
    Train(TrainArgs),

    /// Predict a price from the trained model
    Predict(PredictArgs),

    /// Replace the active catalog with another CSV file
    Import(ImportArgs),

    /// Fill the catalog with synthetic records
    Seed(SeedArgs),
}

/// Flags shared by every command that touches the catalog.
#[derive(Args, Debug, Clone)]
pub struct CatalogOpts {
    /// Path of the active catalog CSV
    #[arg(long, default_value = "dados.csv")]
    pub catalog: String,

    /// Directory receiving pre-mutation backup snapshots
    #[arg(long, default_value = "backups")]
    pub backup_dir: String,
}

/// All fields of a new record. Values are validated and
/// type-converted by the catalog store, not here.
#[derive(Args, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub catalog: CatalogOpts,

    #[arg(long)]
    pub titulo: String,
    #[arg(long)]
    pub autor: String,
    #[arg(long)]
    pub genero: String,
    #[arg(long)]
    pub ano_publicacao: String,
    #[arg(long)]
    pub paginas: String,
    #[arg(long)]
    pub avaliacao: String,
    #[arg(long)]
    pub preco: String,
    #[arg(long)]
    pub estoque: String,
}

/// Partial edit: only the flags actually passed are changed.
#[derive(Args, Debug)]
pub struct EditArgs {
    #[command(flatten)]
    pub catalog: CatalogOpts,

    /// Id of the record to edit
    #[arg(long)]
    pub id: u64,

    #[arg(long)]
    pub titulo: Option<String>,
    #[arg(long)]
    pub autor: Option<String>,
    #[arg(long)]
    pub genero: Option<String>,
    #[arg(long)]
    pub ano_publicacao: Option<String>,
    #[arg(long)]
    pub paginas: Option<String>,
    #[arg(long)]
    pub avaliacao: Option<String>,
    #[arg(long)]
    pub preco: Option<String>,
    #[arg(long)]
    pub estoque: Option<String>,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub catalog: CatalogOpts,

    /// Id of the record to remove
    #[arg(long)]
    pub id: u64,
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub catalog: CatalogOpts,

    /// Directory holding the model/encoder artifacts
    #[arg(long, default_value = "modelos")]
    pub artifacts_dir: String,

    /// Model kind: linear, random-forest or knn.
    /// Anything else is rejected — there is no silent default.
    #[arg(long, default_value = "random-forest")]
    pub model: String,

    /// Fraction of rows used for fitting; the rest is held out
    /// for the R² score
    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,

    /// Fix the split/bootstrap seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of trees in the random forest
    #[arg(long, default_value_t = 60)]
    pub trees: usize,

    /// Maximum depth of each regression tree
    #[arg(long, default_value_t = 10)]
    pub max_depth: usize,

    /// Minimum rows per tree leaf
    #[arg(long, default_value_t = 2)]
    pub min_leaf: usize,

    /// Neighbours consulted by the knn model
    #[arg(long, default_value_t = 5)]
    pub neighbors: usize,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 — the
/// application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            catalog_path: a.catalog.catalog,
            backup_dir: a.catalog.backup_dir,
            artifacts_dir: a.artifacts_dir,
            model: a.model,
            train_fraction: a.train_fraction,
            seed: a.seed,
            trees: a.trees,
            max_depth: a.max_depth,
            min_leaf: a.min_leaf,
            neighbors: a.neighbors,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Directory holding the model/encoder artifacts
    #[arg(long, default_value = "modelos")]
    pub artifacts_dir: String,

    /// Genero of the hypothetical record (must have been seen
    /// during training)
    #[arg(long)]
    pub genero: String,

    #[arg(long)]
    pub paginas: u32,

    #[arg(long)]
    pub avaliacao: f64,

    #[arg(long)]
    pub ano_publicacao: i32,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    #[command(flatten)]
    pub catalog: CatalogOpts,

    /// CSV file to install as the new active catalog
    #[arg(long)]
    pub file: String,
}

#[derive(Args, Debug)]
pub struct SeedArgs {
    #[command(flatten)]
    pub catalog: CatalogOpts,

    /// How many synthetic records to generate
    #[arg(long, default_value_t = 1000)]
    pub count: usize,

    /// Fix the generator seed for reproducible data
    #[arg(long)]
    pub seed: Option<u64>,
}
