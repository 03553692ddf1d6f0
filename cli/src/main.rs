//! Clinical decision support CLI.
//!
//! Scriptable access to the same flows the TUI drives: one subcommand per
//! backend capability, plain-text output.
//!
//! Usage:
//!   cargo run -p cds-cli -- health
//!   cargo run -p cds-cli -- query "65-year-old male with chest pain" --age 65
//!   cargo run -p cds-cli -- interactions Warfarin Aspirin
//!   cargo run -p cds-cli -- interactions Warfarin Amiodarone --age 78 --kidney-function moderate
//!   cargo run -p cds-cli -- alerts drug warfarin
//!   cargo run -p cds-cli -- guidelines specialty cardiology
//!   cargo run -p cds-cli -- repository export doc-1 doc-2 --output refs.bib

mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cds_client::HttpClinicalApi;
use cds_config::ClientConfig;
use cds_contracts::{
    clinical::{QueryType, Urgency},
    drug::PatientFactors,
    error::{CdsError, CdsResult},
};
use cds_core::{
    alerts,
    interactions::{run_patient_check, MedicationList},
    traits::ClinicalApi,
    DrugInteractionChecker, GuidelineExplorer, QueryFlow, RepositoryExplorer,
};

// ── CLI definition ───────────────────────────────────────────────────────────

/// Clinical decision support client.
#[derive(Parser)]
#[command(
    name = "cds",
    about = "Clinical decision support client",
    long_about = "Submits clinical questions, checks drug interactions, and browses\n\
                  guidelines and the knowledge repository on a CDS backend."
)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL; overrides the config file and CDS_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the backend is up.
    Health,
    /// List the specialties the backend supports.
    Specialties,
    /// List the query types the backend accepts.
    QueryTypes,
    /// Ask a clinical question.
    Query(QueryArgs),
    /// Check interactions between two or more medications.
    ///
    /// Any patient factor switches to the patient-specific check, which adds
    /// age and organ-function cautions but skips the per-drug profiles.
    Interactions {
        #[arg(required = true)]
        medications: Vec<String>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long, value_enum)]
        kidney_function: Option<OrganFunction>,
        #[arg(long, value_enum)]
        liver_function: Option<OrganFunction>,
    },
    /// Clinical alerts for a drug or a specialty.
    #[command(subcommand)]
    Alerts(AlertCommand),
    /// Browse clinical practice guidelines.
    #[command(subcommand)]
    Guidelines(GuidelineCommand),
    /// Browse the knowledge repository.
    #[command(subcommand)]
    Repository(RepositoryCommand),
}

#[derive(Args)]
struct QueryArgs {
    /// The clinical question.
    text: String,
    #[arg(long)]
    age: Option<u32>,
    #[arg(long)]
    gender: Option<String>,
    #[arg(long)]
    weight_kg: Option<f64>,
    #[arg(long)]
    height_cm: Option<f64>,
    /// Current medication; repeat for several.
    #[arg(long = "medication")]
    medications: Vec<String>,
    /// Known condition; repeat for several.
    #[arg(long = "condition")]
    conditions: Vec<String>,
    /// Allergy; repeat for several.
    #[arg(long = "allergy")]
    allergies: Vec<String>,
    #[arg(long, value_enum, default_value_t = QueryTypeArg::General)]
    query_type: QueryTypeArg,
    #[arg(long, value_enum, default_value_t = UrgencyArg::Routine)]
    urgency: UrgencyArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum QueryTypeArg {
    General,
    Diagnosis,
    Treatment,
    DrugInteraction,
    Dosing,
    Monitoring,
}

impl From<QueryTypeArg> for QueryType {
    fn from(arg: QueryTypeArg) -> Self {
        match arg {
            QueryTypeArg::General => QueryType::General,
            QueryTypeArg::Diagnosis => QueryType::Diagnosis,
            QueryTypeArg::Treatment => QueryType::Treatment,
            QueryTypeArg::DrugInteraction => QueryType::DrugInteraction,
            QueryTypeArg::Dosing => QueryType::Dosing,
            QueryTypeArg::Monitoring => QueryType::Monitoring,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum UrgencyArg {
    Routine,
    Urgent,
    Emergent,
}

impl From<UrgencyArg> for Urgency {
    fn from(arg: UrgencyArg) -> Self {
        match arg {
            UrgencyArg::Routine => Urgency::Routine,
            UrgencyArg::Urgent => Urgency::Urgent,
            UrgencyArg::Emergent => Urgency::Emergent,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OrganFunction {
    Normal,
    Mild,
    Moderate,
    Severe,
}

impl OrganFunction {
    fn as_str(self) -> &'static str {
        match self {
            OrganFunction::Normal => "normal",
            OrganFunction::Mild => "mild",
            OrganFunction::Moderate => "moderate",
            OrganFunction::Severe => "severe",
        }
    }
}

#[derive(Subcommand)]
enum AlertCommand {
    /// Contraindicated and major interactions of one drug.
    Drug { name: String },
    /// Strong recommendations, contraindications and monitoring for a specialty.
    Specialty { name: String },
}

#[derive(Subcommand)]
enum GuidelineCommand {
    /// Full-text search, optionally narrowed to a specialty.
    Search {
        #[arg(default_value = "")]
        query: String,
        #[arg(long)]
        specialty: Option<String>,
    },
    /// Show one guideline in full.
    Show { id: String },
    /// List the guidelines of one specialty.
    Specialty { name: String },
    /// Guideline database statistics.
    Stats,
}

#[derive(Subcommand)]
enum RepositoryCommand {
    /// Repository overview statistics.
    Overview,
    /// Search documents.
    Search {
        #[arg(default_value = "")]
        query: String,
        #[arg(long)]
        specialty: Option<String>,
        #[arg(long)]
        document_type: Option<String>,
        #[arg(long)]
        evidence_level: Option<String>,
        #[arg(long)]
        access_level: Option<String>,
    },
    /// Show one document in full.
    Show { id: String },
    /// Repository quality report.
    Quality,
    /// Usage analytics.
    Usage,
    /// Export a bibliography for the given documents.
    Export {
        #[arg(required = true)]
        document_ids: Vec<String>,
        /// bibtex, apa, mla, ... (defaults to the configured format)
        #[arg(long)]
        format: Option<String>,
        /// Write to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

// ── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Set RUST_LOG=debug to see every request.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e.user_message());
        if !e.is_validation() {
            eprintln!("  ({})", e);
        }
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> CdsResult<ClientConfig> {
    let config = ClientConfig::resolve(cli.config.as_deref())?;
    match &cli.api_url {
        Some(url) => config.with_base_url(url.clone()),
        None => Ok(config),
    }
}

async fn run(cli: Cli) -> CdsResult<()> {
    let config = load_config(&cli)?;
    let api = HttpClinicalApi::from_config(&config)?;
    info!(base_url = %api.base_url(), "using backend");

    match cli.command {
        Command::Health => {
            let status = api.health().await?;
            output::print_health(&status);
        }
        Command::Specialties => {
            for specialty in api.specialties().await? {
                println!("{}", specialty);
            }
        }
        Command::QueryTypes => {
            let query_types = api.query_types().await?;
            output::print_query_types(&query_types);
        }
        Command::Query(args) => run_query(&api, &config, args).await?,
        Command::Interactions {
            medications,
            age,
            kidney_function,
            liver_function,
        } => {
            let factors = PatientFactors {
                age,
                kidney_function: kidney_function.map(|f| f.as_str().to_string()),
                liver_function: liver_function.map(|f| f.as_str().to_string()),
            };
            if factors.is_empty() {
                run_interactions(&api, medications).await?
            } else {
                let medications = MedicationList::from_names(medications);
                let check = run_patient_check(&api, &medications, &factors).await?;
                output::print_patient_check(&check);
            }
        }
        Command::Alerts(AlertCommand::Drug { name }) => {
            let found = alerts::drug_alerts(&api, &name).await?;
            output::print_drug_alerts(&found);
        }
        Command::Alerts(AlertCommand::Specialty { name }) => {
            let found = alerts::specialty_alerts(&api, &name).await?;
            output::print_specialty_alerts(&found);
        }
        Command::Guidelines(cmd) => run_guidelines(&api, &config, cmd).await?,
        Command::Repository(cmd) => run_repository(&api, &config, cmd).await?,
    }
    Ok(())
}

// ── Command dispatch ─────────────────────────────────────────────────────────

async fn run_query(api: &dyn ClinicalApi, config: &ClientConfig, args: QueryArgs) -> CdsResult<()> {
    let mut flow = QueryFlow::new(config.query.history_capacity);
    flow.form.query = args.text;
    flow.form.query_type = args.query_type.into();
    flow.form.urgency = args.urgency.into();

    let ctx = &mut flow.form.patient_context;
    ctx.age = args.age;
    ctx.gender = args.gender;
    ctx.weight_kg = args.weight_kg;
    ctx.height_cm = args.height_cm;
    ctx.allergies = args.allergies;
    ctx.medical_conditions = args.conditions;
    for medication in args.medications {
        ctx.add_medication(medication);
    }

    let response = flow.submit(api).await?;
    output::print_response(&response);
    Ok(())
}

async fn run_interactions(api: &dyn ClinicalApi, medications: Vec<String>) -> CdsResult<()> {
    let mut checker = DrugInteractionChecker::new();
    checker.medications = MedicationList::from_names(medications);
    checker.check(api).await?;
    output::print_check(&checker);
    Ok(())
}

async fn run_guidelines(
    api: &dyn ClinicalApi,
    config: &ClientConfig,
    cmd: GuidelineCommand,
) -> CdsResult<()> {
    let mut explorer = GuidelineExplorer::new(config.guidelines.max_results);
    match cmd {
        GuidelineCommand::Search { query, specialty } => {
            explorer.query = query;
            explorer.specialty = specialty;
            let found = explorer.search(api).await?;
            output::print_guidelines(found);
        }
        GuidelineCommand::Specialty { name } => {
            explorer.specialty = Some(name);
            let found = explorer.search(api).await?;
            output::print_guidelines(found);
        }
        GuidelineCommand::Show { id } => {
            let detail = explorer.open(api, &id).await?;
            output::print_guideline_detail(detail);
        }
        GuidelineCommand::Stats => {
            explorer.load_stats(api).await?;
            if let Some(stats) = explorer.stats().value() {
                output::print_guideline_stats(stats);
            }
        }
    }
    Ok(())
}

async fn run_repository(
    api: &dyn ClinicalApi,
    config: &ClientConfig,
    cmd: RepositoryCommand,
) -> CdsResult<()> {
    let mut explorer = RepositoryExplorer::new(
        config.repository.max_results,
        config.repository.bibliography_format.clone(),
    );
    match cmd {
        RepositoryCommand::Overview => {
            explorer.load_overview(api).await?;
            if let Some(stats) = explorer.overview().value() {
                output::print_repository_stats(stats);
            }
        }
        RepositoryCommand::Search {
            query,
            specialty,
            document_type,
            evidence_level,
            access_level,
        } => {
            let filters = &mut explorer.filters;
            filters.query = query;
            filters.specialty = specialty.unwrap_or_default();
            filters.document_type = document_type.unwrap_or_default();
            filters.evidence_level = evidence_level.unwrap_or_default();
            filters.access_level = access_level.unwrap_or_default();
            let documents = explorer.search(api).await?;
            output::print_documents(documents);
        }
        RepositoryCommand::Show { id } => {
            explorer.open(api, &id).await?;
            if let Some(detail) = explorer.detail().value() {
                output::print_document_detail(detail);
            }
        }
        RepositoryCommand::Quality => {
            explorer.load_quality(api).await?;
            if let Some(report) = explorer.quality().value() {
                output::print_quality_report(report);
            }
        }
        RepositoryCommand::Usage => {
            explorer.load_usage(api).await?;
            if let Some(usage) = explorer.usage().value() {
                output::print_usage(usage);
            }
        }
        RepositoryCommand::Export {
            document_ids,
            format,
            output: path,
        } => {
            if let Some(format) = format {
                explorer.set_bibliography_format(format);
            }
            for id in &document_ids {
                if !explorer.selection.contains(id) {
                    explorer.selection.toggle(id);
                }
            }
            let bibliography = explorer.export_bibliography(api).await?;
            let text = bibliography.to_text();
            match path {
                Some(path) => {
                    std::fs::write(&path, &text)
                        .map_err(|e| CdsError::io(path.display(), e))?;
                    println!(
                        "Wrote {} entries to {}",
                        bibliography.entry_count(),
                        path.display()
                    );
                }
                None => print!("{}", text),
            }
        }
    }
    Ok(())
}
