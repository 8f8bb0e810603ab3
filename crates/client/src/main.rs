//! `bpcatalog`: command-line front-end for the product catalog.
//!
//! ```bash
//! BPCATALOG_API_URL=http://localhost:3002 bpcatalog list --search tarjeta
//! bpcatalog create --id trj-crd --name "Tarjeta Credito" \
//!     --description "Tarjeta de consumo" --logo https://example.com/logo.png \
//!     --date-release 2030-01-01
//! bpcatalog delete trj-crd
//! ```

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use bpcatalog_client::list::delete_message;
use bpcatalog_client::{
    CatalogApi, ClientConfig, FormError, HttpCatalogClient, ProductFormController, ProductListController, RowAction,
};
use bpcatalog_core::{DATE_FORMAT, Field, Product};
use bpcatalog_products::{next_revision_date, parse_date};

#[derive(Parser)]
#[command(name = "bpcatalog")]
#[command(version)]
#[command(about = "Administer the financial product catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products, optionally filtered by name or description
    List {
        /// Case-insensitive text matched against name and description
        #[arg(long, short)]
        search: Option<String>,

        /// Rows to show (defaults to BPCATALOG_PAGE_SIZE)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show one product as JSON
    Show { id: String },

    /// Report whether an identifier is already taken
    CheckId { id: String },

    /// Register a new product
    Create {
        #[arg(long)]
        id: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Change an existing product (identifier cannot change)
    Update {
        id: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete a product after confirmation
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Args)]
struct FieldArgs {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    logo: Option<String>,

    /// YYYY-MM-DD
    #[arg(long)]
    date_release: Option<String>,

    /// YYYY-MM-DD; defaults to one year after the release date
    #[arg(long)]
    date_revision: Option<String>,
}

impl FieldArgs {
    fn apply<C: CatalogApi>(self, form: &mut ProductFormController<C>) {
        let date_revision = self.date_revision.or_else(|| {
            let release = parse_date(self.date_release.as_deref()?)?;
            Some(next_revision_date(release)?.format(DATE_FORMAT).to_string())
        });

        let values = [
            (Field::Name, self.name),
            (Field::Description, self.description),
            (Field::Logo, self.logo),
            (Field::DateRelease, self.date_release),
            (Field::DateRevision, date_revision),
        ];
        for (field, value) in values {
            if let Some(value) = value {
                form.set_field(field, value);
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    bpcatalog_observability::init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = ClientConfig::from_env().context("loading configuration")?;
    let catalog = HttpCatalogClient::from_config(&config);
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::List { search, page_size } => {
            let page_size = page_size.unwrap_or(config.page_size);
            if page_size == 0 {
                bail!("--page-size must be a positive integer");
            }
            let mut list = ProductListController::new(catalog).with_page_size(page_size);
            list.load().await?;
            if let Some(search) = search {
                list.set_search_text(&search);
            }
            print_table(list.displayed());
            println!("{} resultados", list.total_products());
        }

        Commands::Show { id } => {
            let product = catalog.get_product(&id).await?;
            println!("{}", serde_json::to_string_pretty(&product)?);
        }

        Commands::CheckId { id } => {
            let exists = catalog.check_id_exists(&id).await?;
            println!("{}", if exists { "taken" } else { "available" });
        }

        Commands::Create { id, fields } => {
            let mut form = ProductFormController::new(catalog, today);
            form.set_field(Field::Id, id);
            form.blur_id().await;
            fields.apply(&mut form);

            let route = form.submit_create().await.map_err(report)?;
            println!("producto registrado ({route})");
        }

        Commands::Update { id, fields } => {
            let mut form = ProductFormController::new(catalog, today);
            form.enter_edit(&id).await?;
            fields.apply(&mut form);

            match form.submit_update().await.map_err(report)? {
                Some(route) => println!("producto actualizado ({route})"),
                None => bail!("the backend did not acknowledge the update"),
            }
        }

        Commands::Delete { id, yes } => {
            let mut list = ProductListController::new(catalog);
            list.load().await?;
            let name = list
                .products()
                .iter()
                .find(|p| p.id.as_str() == id.trim())
                .map(|p| p.name.clone())
                .with_context(|| format!("no product with id {id:?}"))?;

            list.select_action(RowAction::Delete, &id, &name);
            if !yes && !confirm(&delete_message(&name))? {
                list.cancel_delete();
                println!("cancelado");
                return Ok(());
            }

            if list.confirm_delete().await? {
                println!("producto eliminado");
            } else {
                bail!("the backend did not acknowledge the deletion");
            }
        }
    }

    Ok(())
}

/// Print every field error before handing the failure to `anyhow`.
fn report(err: FormError) -> anyhow::Error {
    if let FormError::Invalid(errors) = &err {
        for (field, messages) in errors {
            for message in messages {
                eprintln!("  {field}: {message}");
            }
        }
    }
    err.into()
}

fn confirm(message: &str) -> Result<bool> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{message} [s/N] ")?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "s" | "si" | "sí" | "y" | "yes"))
}

fn print_table(products: &[Product]) {
    println!("{:<10}  {:<24}  {:<10}  {:<10}", "ID", "NOMBRE", "LIBERACION", "REVISION");
    for p in products {
        println!(
            "{:<10}  {:<24}  {:<10}  {:<10}",
            p.id.as_str(),
            truncate(&p.name, 24),
            p.date_release.format(DATE_FORMAT),
            p.date_revision.format(DATE_FORMAT),
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{head}…")
}
