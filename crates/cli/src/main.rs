use chrono::Local;
use clap::{Parser, Subcommand};
use clinic_core::config::EnvValues;
use clinic_core::constants::DEFAULT_PAGE_SIZE;
use clinic_core::datetime::parse_date;
use clinic_core::models::{Appointment, BillingItem, PatientScope};
use clinic_core::{
    parse_history, ClinicServices, CoreConfig, FontStyle, PageLoad, PatientListModel, RecordId,
    Theme,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic workflow CLI")]
struct Cli {
    /// Directory holding the YAML data files (default: $CLINIC_DATA_DIR, else demo data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List patients, one page or the whole roster
    Patients {
        /// Print only this 1-indexed page
        #[arg(long)]
        page: Option<usize>,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
        /// `mine` or `all`
        #[arg(long, default_value = "all")]
        scope: String,
    },
    /// Filter patients by name
    Search {
        query: String,
        #[arg(long, default_value = "all")]
        scope: String,
    },
    /// Appointments on a date, ordered by time
    Schedule {
        /// Date (YYYY-MM-DD or "October 17, 2026"); default today
        #[arg(long)]
        date: Option<String>,
    },
    /// Upcoming open appointments
    Upcoming {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Billing items and totals
    Billing {
        /// Restrict to one patient
        #[arg(long)]
        patient: Option<String>,
    },
    /// Mark a billing item as paid
    MarkPaid {
        /// Billing item ID
        id: String,
    },
    /// Journal, medications and reports for a patient
    Chart { patient_id: String },
    /// Show preferences, updating any that are given
    Settings {
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        font_style: Option<String>,
        #[arg(long)]
        text_size: Option<f32>,
        #[arg(long)]
        language: Option<String>,
    },
    /// Print the texts in a transcript history JSON file
    History { file: PathBuf },
}

fn config(data_dir: Option<PathBuf>) -> anyhow::Result<CoreConfig> {
    let cfg = CoreConfig::from_env_values(EnvValues::read())?;
    Ok(match data_dir {
        Some(dir) => cfg.with_data_dir(dir),
        None => cfg,
    })
}

fn print_appointment(a: &Appointment) {
    println!(
        "{}  {:>8}  {:>3} min  {:<13} {:<11} {} ({})  [{}]",
        a.display_date(),
        a.time,
        a.duration_minutes,
        a.kind,
        a.status,
        a.patient_name,
        a.patient_id,
        a.id
    );
}

fn print_billing_item(item: &BillingItem) {
    println!(
        "{}  {}  {:<40} {:>10}  {:<12} {}  [{}]",
        item.date,
        item.patient_id,
        item.description,
        item.amount,
        item.category,
        if item.paid { "paid" } else { "unpaid" },
        item.id
    );
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'clinic --help' for commands");
        return Ok(());
    };

    // Transcript files need no services.
    if let Commands::History { file } = &command {
        let body = std::fs::read_to_string(file)?;
        for text in parse_history(&body)? {
            println!("{}", text);
        }
        return Ok(());
    }

    let services = ClinicServices::open(Arc::new(config(cli.data_dir)?))?;

    match command {
        Commands::Patients {
            page,
            page_size,
            scope,
        } => {
            let scope = scope.parse::<PatientScope>()?;
            let patients = match page {
                Some(page) => services.directory.get_patients(page, page_size, scope)?,
                None => {
                    let mut list =
                        PatientListModel::with_page_size(services.directory.clone(), scope, page_size);
                    list.load_all()?;
                    list.visible()
                }
            };
            if patients.is_empty() {
                println!("No patients found.");
            }
            for p in patients {
                println!(
                    "ID: {}, Name: {}, Age: {}, Gender: {}, Doctor: {}",
                    p.id, p.name, p.age, p.gender, p.doctor_id
                );
            }
        }
        Commands::Search { query, scope } => {
            let scope = scope.parse::<PatientScope>()?;
            let mut list = PatientListModel::new(services.directory.clone(), scope);
            while let PageLoad::Loaded(_) = list.load_next_page()? {}
            list.set_query(query);
            let matches = list.visible();
            if matches.is_empty() {
                println!("No patients match '{}'.", list.query());
            }
            for p in matches {
                println!("{}  {}", p.id, p.name);
            }
        }
        Commands::Schedule { date } => {
            let date = match date {
                Some(raw) => parse_date(&raw).ok_or_else(|| anyhow::anyhow!("invalid date: {raw}"))?,
                None => Local::now().date_naive(),
            };
            let appointments = services.schedule.appointments_for_date_by_time(date)?;
            if appointments.is_empty() {
                println!("No appointments on {}.", date);
            }
            appointments.iter().for_each(print_appointment);
        }
        Commands::Upcoming { limit } => {
            services
                .schedule
                .upcoming_appointments(limit)?
                .iter()
                .for_each(print_appointment);
        }
        Commands::Billing { patient } => {
            let items = match patient.as_deref() {
                Some(id) => services.ledger.items_for_patient(id)?,
                None => services.ledger.all_items()?,
            };
            items.iter().for_each(print_billing_item);
            let summary = services.ledger.summary(patient.as_deref())?;
            println!(
                "Outstanding: {}  Paid last month: {}",
                summary.outstanding, summary.paid_last_month
            );
        }
        Commands::MarkPaid { id } => {
            let id = RecordId::parse(&id)?;
            match services.ledger.mark_as_paid(id) {
                Ok(item) => println!("Marked as paid: {} ({})", item.description, item.amount),
                Err(e) => eprintln!("Error marking item as paid: {}", e),
            }
        }
        Commands::Chart { patient_id } => {
            let patient = services.require_patient(&patient_id)?;
            println!("{} ({}, {})", patient.name, patient.age, patient.gender);

            println!("\nJournal:");
            for entry in services.chart.journal(&patient_id)? {
                println!("  {}  {}", entry.date, entry.text);
            }
            println!("\nMedications:");
            for m in services.chart.medications(&patient_id)? {
                println!("  {} {}, {} ({})", m.name, m.dosage, m.frequency, m.purpose);
            }
            println!("\nReports:");
            for r in services.chart.reports(&patient_id)? {
                println!("  {}  {}  {}", r.date, r.title, r.author);
            }
        }
        Commands::Settings {
            theme,
            font_style,
            text_size,
            language,
        } => {
            let mut settings = services.preferences.load()?;
            let changed = theme.is_some()
                || font_style.is_some()
                || text_size.is_some()
                || language.is_some();
            if let Some(theme) = theme {
                settings.theme = theme.parse::<Theme>()?;
            }
            if let Some(font_style) = font_style {
                settings.font_style = font_style.parse::<FontStyle>()?;
            }
            if let Some(text_size) = text_size {
                settings.text_size = text_size;
            }
            if let Some(language) = language {
                settings.language = language.trim().to_ascii_lowercase();
            }
            if changed {
                services.preferences.save(&settings)?;
            }
            println!("Theme: {}", settings.theme);
            println!("Font style: {}", settings.font_style);
            println!("Text size: {}", settings.text_size);
            println!("Language: {}", settings.language);
        }
        Commands::History { .. } => {}
    }

    Ok(())
}
