//! care-sherpa - line-oriented front end for the assessment engine.
//!
//! Free text is submitted as a symptom turn. Slash commands:
//!
//! - `/image <path>` stage a photo for the next turn
//! - `/reset` start a new interview
//! - `/records [query]` list or search the timeline
//! - `/triage` run the emergency screen
//! - `/guide <name>` walk through a first-aid guide
//! - `/quit`
//!
//! Configuration comes from `CARE_SHERPA__*` environment variables; see
//! [`care_sherpa::config::AppConfig`].

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use care_sherpa::adapters::{
    GeminiClient, GeminiOracle, ImageMediaNormalizer, InMemoryRecordStore,
    OracleSpecialistLookup,
};
use care_sherpa::application::{
    ListTimelineHandler, ListTimelineQuery, LoadGuideCommand, LoadGuideHandler,
    LogEmergencyCallCommand, LogEmergencyCallHandler, SymptomAssessmentEngine, TurnContext,
    TurnOutcome,
};
use care_sherpa::config::{AppConfig, LoggingConfig};
use care_sherpa::domain::conversation::{AssessmentSession, SpecialistStatus};
use care_sherpa::domain::emergency::{
    EmergencyFlow, EmergencyMode, TriageOutcome, COMMON_EMERGENCIES, EMERGENCY_NUMBER,
};
use care_sherpa::domain::foundation::ProfileId;
use care_sherpa::domain::patient::{Language, PatientCategory, PatientContext};
use care_sherpa::ports::{DiagnosticOracle, RecordStore};

type Engine = SymptomAssessmentEngine<GeminiOracle, InMemoryRecordStore, OracleSpecialistLookup>;
type Input = Lines<BufReader<Stdin>>;

struct App {
    engine: Engine,
    normalizer: ImageMediaNormalizer,
    timeline: ListTimelineHandler,
    guides: LoadGuideHandler,
    calls: LogEmergencyCallHandler,
    ctx: TurnContext,
    language: Language,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging);
    config.validate()?;

    let language = config.language();
    let client = Arc::new(GeminiClient::new(config.oracle.gemini()?)?);
    let oracle = Arc::new(GeminiOracle::new(client.clone()));
    let lookup = Arc::new(OracleSpecialistLookup::new(client));
    let store = Arc::new(InMemoryRecordStore::new());

    let session =
        AssessmentSession::new().with_max_empty_completions(config.engine.max_empty_completions);
    let engine = SymptomAssessmentEngine::with_session(oracle.clone(), store.clone(), lookup, session);

    let profile_id = ProfileId::new("self")?;
    let patient = PatientContext::new(profile_id, "Me", PatientCategory::SelfCare)?;

    let dyn_oracle: Arc<dyn DiagnosticOracle> = oracle;
    let dyn_store: Arc<dyn RecordStore> = store;
    let app = App {
        engine,
        normalizer: config.media.normalizer(),
        timeline: ListTimelineHandler::new(dyn_store.clone()),
        guides: LoadGuideHandler::new(dyn_oracle),
        calls: LogEmergencyCallHandler::new(dyn_store),
        ctx: TurnContext::new(patient, language).with_location(config.engine.location()),
        language,
    };

    tracing::info!(
        model = %config.oracle.complex_model,
        language = language.code(),
        "care-sherpa ready"
    );
    println!("Describe your symptoms. Type /quit to exit.");

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = input.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };
        match command {
            "/quit" | "/exit" => break,
            "/reset" => {
                app.engine.reset().await;
                println!("Started a new assessment.");
            }
            "/image" => app.stage_image(arg).await,
            "/records" => app.list_records(arg).await,
            "/triage" => app.run_triage(&mut input).await?,
            "/guide" => app.run_guide(arg, &mut input).await?,
            _ if command.starts_with('/') => println!("Unknown command: {command}"),
            _ => app.submit(line).await,
        }
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(logging.env_filter());
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

impl App {
    async fn submit(&self, text: &str) {
        match self.engine.submit_turn(text, Vec::new(), &self.ctx).await {
            Ok(TurnOutcome::Finalized {
                assessment,
                persisted,
                specialist_lookup,
                ..
            }) => {
                println!("\n{}\n", assessment.summary);
                println!("{}", assessment.to_markdown());
                if assessment.triage_level.is_emergency() {
                    println!("\nThis may be an emergency. Call {EMERGENCY_NUMBER} now.");
                } else if assessment.triage_level.requires_professional() {
                    println!("\nPlease see a healthcare professional soon.");
                }
                println!("\n{}", assessment.disclaimer);
                if !persisted {
                    println!("(The record could not be saved.)");
                }
                if let Some(handle) = specialist_lookup {
                    if handle.await.is_ok() {
                        self.print_specialists().await;
                    }
                }
            }
            Ok(outcome) => {
                if let Some(text) = outcome.assistant_text() {
                    println!("{text}");
                }
            }
            Err(err) => println!("{err}"),
        }
    }

    async fn print_specialists(&self) {
        match self.engine.snapshot().await.specialist {
            SpecialistStatus::Ready { specialty, listings } if !listings.is_empty() => {
                println!("\n{specialty} near you:");
                for doctor in listings {
                    let rating = doctor.rating.as_deref().unwrap_or("-");
                    println!("  {} ({rating}) {}", doctor.name, doctor.address);
                }
            }
            SpecialistStatus::Ready { specialty, .. } | SpecialistStatus::Unavailable { specialty } => {
                println!("\nNo {specialty} listings found nearby.");
            }
            _ => {}
        }
    }

    async fn stage_image(&self, path: &str) {
        if path.is_empty() {
            println!("Usage: /image <path>");
            return;
        }
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                println!("Cannot read {path}: {err}");
                return;
            }
        };
        match self.engine.stage_image(&self.normalizer, &bytes).await {
            Ok(reference) => println!("Attached {reference}. It will be sent with your next message."),
            Err(err) => println!("{err}"),
        }
    }

    async fn list_records(&self, query: &str) {
        let profile_id = self.ctx.patient.profile_id.clone();
        let query = if query.is_empty() {
            ListTimelineQuery::all(profile_id)
        } else {
            ListTimelineQuery::search(profile_id, query)
        };
        match self.timeline.handle(query).await {
            Ok(records) if records.is_empty() => println!("No records."),
            Ok(records) => {
                for record in records {
                    println!(
                        "{}  [{}] {}",
                        record.created_at().as_datetime().format("%Y-%m-%d %H:%M"),
                        record.kind().as_str(),
                        record.summary()
                    );
                }
            }
            Err(err) => println!("{err}"),
        }
    }

    async fn run_triage(&self, input: &mut Input) -> Result<(), Box<dyn Error>> {
        let mut flow = EmergencyFlow::new();
        flow.start_triage()?;

        while let Some(question) = flow.current_question() {
            println!("{} [y/n]", question.text);
            let Some(answer) = input.next_line().await? else {
                return Ok(());
            };
            let yes = match answer.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => true,
                "n" | "no" => false,
                _ => continue,
            };
            match flow.answer(yes)? {
                TriageOutcome::NextQuestion(_) => {}
                TriageOutcome::AllClear => {
                    println!("No critical signs. Continue with the assessment if needed.");
                }
                TriageOutcome::RedAlert => self.red_alert(&mut flow, input).await?,
            }
        }
        Ok(())
    }

    async fn red_alert(
        &self,
        flow: &mut EmergencyFlow,
        input: &mut Input,
    ) -> Result<(), Box<dyn Error>> {
        println!("CALL {EMERGENCY_NUMBER} NOW. Type 'call' to log the call or 'back' if this was a mistake.");
        while flow.mode() == EmergencyMode::RedAlert {
            let Some(line) = input.next_line().await? else {
                break;
            };
            match line.trim() {
                "call" => {
                    let cmd = LogEmergencyCallCommand::emergency_services(
                        self.ctx.patient.profile_id.clone(),
                    )
                    .with_reason("Critical triage answer");
                    match self.calls.handle(cmd).await {
                        Ok(_) => println!("Call logged to your timeline."),
                        Err(err) => println!("{err}"),
                    }
                    flow.go_back();
                }
                "back" => flow.go_back(),
                _ => println!("Type 'call' or 'back'."),
            }
        }
        Ok(())
    }

    async fn run_guide(&self, name: &str, input: &mut Input) -> Result<(), Box<dyn Error>> {
        if name.is_empty() {
            let names: Vec<&str> = COMMON_EMERGENCIES.iter().map(|e| e.id).collect();
            println!("Usage: /guide <name>  ({})", names.join(", "));
            return Ok(());
        }

        let guide = match self
            .guides
            .handle(LoadGuideCommand::new(name, self.language))
            .await
        {
            Ok(guide) => guide,
            Err(err) => {
                println!("{}", err.instruction());
                return Ok(());
            }
        };

        let mut flow = EmergencyFlow::new();
        flow.open_guide(guide)?;
        print_step(&flow);
        println!("[n]ext, [p]revious, [t]imer, [q]uit");

        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        while flow.mode() == EmergencyMode::Guide {
            tokio::select! {
                _ = ticker.tick() => flow.tick(),
                line = input.next_line() => {
                    let Some(line) = line? else { break };
                    let Some(walk) = flow.guide_mut() else { break };
                    match line.trim() {
                        "n" => {
                            if walk.next() {
                                walk.timer_mut().stop();
                                print_step(&flow);
                            } else if let Some(walk) = flow.guide() {
                                for item in &walk.guide().post_emergency {
                                    println!("  - {item}");
                                }
                            }
                        }
                        "p" => {
                            if walk.previous() {
                                walk.timer_mut().stop();
                                print_step(&flow);
                            }
                        }
                        "t" => {
                            walk.timer_mut().toggle();
                            let state = if walk.timer().is_running() { "running" } else { "stopped" };
                            println!("Timer {state} at {}", walk.timer().display());
                        }
                        "q" => flow.go_back(),
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }
}

fn print_step(flow: &EmergencyFlow) {
    let Some(walk) = flow.guide() else { return };
    let step = walk.current_step();
    println!("\n{} - {}", walk.guide().title, walk.progress_label());
    println!("{}: {}", step.title, step.instruction);
    if let Some(warning) = &step.warning {
        println!("Warning: {warning}");
    }
    if let Some(seconds) = step.timer_seconds.filter(|_| step.has_timer) {
        println!("Timed step: {seconds}s");
    }
}
