use clap::{Parser, Subcommand};
use referral_core::config::{resolve_reference_data, webhook_timeout_from_env_value};
use referral_core::{
    CoverageResolver, IntentClassifier, PatientContext, Referral, ReferralConfig,
    ReferralOutcome, ReferralService, Specialty, DEFAULT_PATIENT_NAME, DEFAULT_PLAN,
};
use referral_forms::{render, FormInsurance, FormOutput, FormProvider, ReferralForm, RenderStamp};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "referral")]
#[command(about = "Transcript to specialist referral CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the specialty mentioned in a transcript
    Classify {
        /// Transcript text
        text: String,
    },
    /// Check whether a plan covers a specialty
    Coverage {
        /// Specialty identifier, e.g. cardiology
        specialty: String,
        /// Insurance plan (defaults to REFERRAL_DEFAULT_PLAN)
        #[arg(long)]
        plan: Option<String>,
    },
    /// Run the full referral pipeline, notifying the webhook if one is configured
    Process {
        /// Transcript text
        text: String,
        #[arg(long)]
        patient_name: Option<String>,
        #[arg(long)]
        plan: Option<String>,
        /// Contact address forwarded with the referral
        #[arg(long)]
        email: Option<String>,
        /// Also render a referral form for the result
        #[arg(long)]
        form: bool,
        /// Directory for the rendered form
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Render a referral form from a JSON file of form fields
    RenderForm {
        /// Path to the JSON fields document
        fields: PathBuf,
        /// Directory for the rendered form
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("referral=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Classify { text }) => {
            let reference = resolve_reference_data(reference_override())?;
            match IntentClassifier::new(&reference).classify(&text) {
                Some(specialty) => println!("{} ({})", specialty, specialty.title()),
                None => println!("No actionable medical intent found."),
            }
        }
        Some(Commands::Coverage { specialty, plan }) => {
            let cfg = config_from_env()?;
            let reference = resolve_reference_data(reference_override())?;
            let specialty: Specialty = specialty.parse()?;
            let plan = plan.unwrap_or_else(|| cfg.default_plan().to_string());

            let outcome = CoverageResolver::new(&reference).resolve(&specialty, &plan);
            println!(
                "{}: {} under {} (copay: {})",
                specialty.title(),
                outcome.status,
                outcome.plan,
                outcome.copay_or_full_cost
            );
        }
        Some(Commands::Process {
            text,
            patient_name,
            plan,
            email,
            form,
            out_dir,
        }) => {
            let cfg = config_from_env()?;
            let reference = Arc::new(resolve_reference_data(reference_override())?);
            let service = ReferralService::new(reference, cfg.notifier()?);
            let patient = cfg.patient_context(patient_name, plan, email);

            match service.process(&text, &patient).await {
                Ok(ReferralOutcome::Ignored) => println!("No actionable medical intent found."),
                Ok(ReferralOutcome::Referred(referral)) => {
                    println!(
                        "Referral to {} with {} at {}: {} (copay: {})",
                        referral.assessment.specialty.title(),
                        referral.payload.provider_name,
                        referral.payload.facility,
                        referral.payload.coverage_status,
                        referral.payload.copay
                    );
                    println!(
                        "Notification {}",
                        if referral.notified {
                            "delivered"
                        } else {
                            "not delivered"
                        }
                    );

                    if form {
                        let fields = form_from_referral(&referral, &patient, &text);
                        deliver_form(&fields, out_dir)?;
                    }
                }
                Err(e) => eprintln!("Error processing transcript: {}", e),
            }
        }
        Some(Commands::RenderForm { fields, out_dir }) => {
            let raw = std::fs::read_to_string(&fields)?;
            let form: ReferralForm = serde_json::from_str(&raw)?;
            deliver_form(&form, out_dir)?;
        }
        None => {
            println!("Use 'referral --help' for commands");
        }
    }

    Ok(())
}

fn reference_override() -> Option<PathBuf> {
    std::env::var("REFERRAL_REFERENCE_DATA")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

fn config_from_env() -> Result<ReferralConfig, Box<dyn std::error::Error>> {
    let timeout =
        webhook_timeout_from_env_value(std::env::var("REFERRAL_WEBHOOK_TIMEOUT_SECS").ok())?;
    let default_plan =
        std::env::var("REFERRAL_DEFAULT_PLAN").unwrap_or_else(|_| DEFAULT_PLAN.into());
    let default_patient =
        std::env::var("REFERRAL_DEFAULT_PATIENT").unwrap_or_else(|_| DEFAULT_PATIENT_NAME.into());

    Ok(ReferralConfig::new(
        std::env::var("REFERRAL_WEBHOOK_URL").ok(),
        timeout,
        default_plan,
        default_patient,
        std::env::var("REFERRAL_NOTIFY_EMAIL").ok(),
    )?)
}

/// `--out-dir`, then `REFERRAL_FORM_OUTPUT_DIR`, then the current directory.
fn output_dir(flag: Option<PathBuf>, env_value: Option<String>) -> PathBuf {
    flag.or_else(|| {
        env_value
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    })
    .unwrap_or_else(|| PathBuf::from("."))
}

fn form_from_referral(
    referral: &Referral,
    patient: &PatientContext,
    transcript: &str,
) -> ReferralForm {
    let assessment = &referral.assessment;
    ReferralForm {
        patient_name: Some(patient.patient_name.to_string()),
        complaint: Some(transcript.trim().to_string()),
        specialty: Some(assessment.specialty.to_string()),
        provider: FormProvider {
            name: Some(assessment.provider.name.clone()),
            npi: Some(assessment.provider.npi.clone()),
            clinic: Some(assessment.provider.facility.clone()),
        },
        insurance: FormInsurance {
            plan: Some(assessment.coverage.plan.clone()),
            status: Some(assessment.coverage.status.to_string()),
            copay: Some(assessment.coverage.copay_or_full_cost.clone()),
        },
        ..ReferralForm::default()
    }
}

fn deliver_form(
    form: &ReferralForm,
    out_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = render(form, &RenderStamp::now());
    for failure in &report.section_errors {
        eprintln!("Section '{}' omitted: {}", failure.section, failure.reason);
    }

    let Some(document) = report.document else {
        return Err("referral form could not be produced".into());
    };

    let target = output_dir(out_dir, std::env::var("REFERRAL_FORM_OUTPUT_DIR").ok());
    let artifact = FormOutput::Directory(target).deliver(document)?;
    if let Some(path) = artifact.path {
        println!("Wrote referral form: {}", path.display());
    }
    Ok(())
}
