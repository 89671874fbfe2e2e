#![forbid(unsafe_code)]
use anyhow::Result;
use gardes::{
    absence::{resolve_absences, AbsenceIndex},
    config::{export_config_json, load_config_from_file, PlanConfig},
    io,
    report::{load_rows, roster_rows, RosterRenderer, TextTable},
    scheduler::{detect_conflicts, plan_period, ConflictKind, Shuffled},
    storage::{JsonStorage, Storage},
};
use clap::{Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de répartition des gardes
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Configuration JSON (période, services, poids) ; défaut intégré sinon
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Répartir les gardes de la période
    Plan {
        /// CSV de l'historique (mois précédent)
        #[arg(long)]
        history: String,
        /// CSV des absences (optionnel)
        #[arg(long)]
        absences: Option<String>,
        /// Graine du mélange quotidien des services
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out_csv: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        loads_csv: Option<String>,
    },

    /// Vérifier un résultat sauvegardé
    Check {
        /// JSON produit par `plan --out-json`
        #[arg(long)]
        outcome: String,
        #[arg(long)]
        absences: Option<String>,
    },

    /// Écrire la configuration par défaut
    InitConfig {
        #[arg(long)]
        out: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let config = match &cli.config {
        Some(path) => load_config_from_file(path)?,
        None => PlanConfig::default(),
    };

    let code = match cli.cmd {
        Commands::Plan {
            history,
            absences,
            seed,
            out_csv,
            out_json,
            loads_csv,
        } => {
            let records = io::import_history_csv(&history, &config.services)?;
            let absence_rows = absences.map(io::import_absences_csv).transpose()?;
            let mut ordering = match seed {
                Some(seed) => Shuffled::seeded(seed),
                None => config.ordering(),
            };
            let outcome = plan_period(&records, absence_rows.as_deref(), &config, &mut ordering)?;

            let renderer = TextTable;
            let rows = roster_rows(&outcome, &config.unfilled_marker);
            println!("{}", renderer.render_roster(&outcome.services, &rows));
            println!();
            println!("{}", renderer.render_loads(&load_rows(&outcome)));

            if let Some(path) = out_csv {
                io::export_roster_csv(path, &outcome, &config.unfilled_marker)?;
            }
            if let Some(path) = loads_csv {
                io::export_loads_csv(path, &outcome)?;
            }
            if let Some(path) = out_json {
                JsonStorage::open(path)?.save(&outcome)?;
            }

            let unfilled = outcome.roster.unfilled_count();
            if unfilled == 0 {
                0
            } else {
                eprintln!("{unfilled} slot(s) left unfilled");
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Check { outcome, absences } => {
            let outcome = JsonStorage::open(&outcome)?.load()?;
            let index = match absences {
                Some(path) => {
                    let rows = io::import_absences_csv(path)?;
                    resolve_absences(Some(rows.as_slice()), &outcome.period, &config.absence)
                }
                None => AbsenceIndex::default(),
            };
            let conflicts = detect_conflicts(&outcome.roster, &index, config.options.rest_days);
            if conflicts.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!("Found {} conflict(s)", conflicts.len());
                for c in &conflicts {
                    let kind = match c.kind {
                        ConflictKind::DoubleBooking => "double",
                        ConflictKind::RestViolation => "rest",
                        ConflictKind::AbsenceViolation => "absence",
                    };
                    println!("{} | {} | {} | {}", c.clinician, c.date_a, c.date_b, kind);
                }
                2
            }
        }
        Commands::InitConfig { out } => {
            export_config_json(&out, &config)?;
            println!("Config written to {out}");
            0
        }
    };

    std::process::exit(code);
}
