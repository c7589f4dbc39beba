//! Interactive terminal front end for the onboarding flow.
//!
//! Usage: `signup-flow [USER_ID]`. The user id defaults to
//! `SIGNUP_FLOW_USER`, then to `local-user`. Documents and photos are kept on
//! disk under the configured directories, so quitting and relaunching
//! resumes at the first unanswered screen.

use std::error::Error;
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use signup_flow::adapters::{
    FileDocumentStore, InMemoryEmailVerifier, LocalPhotoStorage, StaticSessionProvider,
    SystemClock,
};
use signup_flow::application::{
    CompleteScreenCommand, CompleteScreenHandler, FlowDriver, FlowHandle, OnboardingError,
    PhotoUploadHandler, RegisterUserHandler, ResumeOnboardingHandler, ScreenGate,
    SendVerificationCodeCommand, SendVerificationCodeHandler, StartPhotoUploadCommand,
};
use signup_flow::config::{AppConfig, LogFormat};
use signup_flow::domain::foundation::UserId;
use signup_flow::domain::profile::{
    Children, DateOfBirthInput, DatingIntention, DatingIntentionDetail, Education, Ethnicity,
    FamilyPlans, Gender, GenderDetail, Habit, InterestedIn, PhotoAsset, Politics, Refinement,
    Religion, ScreenSubmission, Sexuality, TwoLevelChoice, UserDraftProfile,
};
use signup_flow::domain::signup::{Screen, Step};
use signup_flow::ports::{ProgressSubscriber, UserDocumentStore};

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config);

    let user_id = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SIGNUP_FLOW_USER").ok())
        .unwrap_or_else(|| "local-user".to_string());
    let user_id = UserId::new(user_id)?;

    let store = Arc::new(FileDocumentStore::new(
        &config.store.data_dir,
        &config.store.collection,
    ));
    let storage = Arc::new(LocalPhotoStorage::new(&config.storage.photo_dir));
    let verifier = Arc::new(InMemoryEmailVerifier::new());
    let clock = Arc::new(SystemClock);
    let session = Arc::new(StaticSessionProvider::signed_in(user_id.clone()));
    let gate = ScreenGate::new();

    let registered = RegisterUserHandler::new(session.clone(), store.clone(), clock.clone())
        .handle()
        .await?;
    if registered.created {
        tracing::info!(user_id = %registered.user_id, "Created onboarding document");
    }

    let resumed = ResumeOnboardingHandler::new(session.clone(), store.clone())
        .handle()
        .await?;
    if resumed.controller.is_handed_off() {
        welcome(&resumed.draft);
        return Ok(());
    }

    let (driver, flow) = FlowDriver::new(resumed.controller);
    let forwarder = flow.forward_remote(store.subscribe(&user_id));
    let driver_task = driver.spawn();

    let screens = CompleteScreenHandler::new(
        session.clone(),
        store.clone(),
        verifier.clone(),
        clock,
        gate.clone(),
        config.onboarding.minimum_age,
    )
    .with_flow_events(flow.events());
    let photos = PhotoUploadHandler::new(
        session.clone(),
        store.clone(),
        storage,
        gate,
        config.storage.photo_rules(),
    )
    .with_flow_events(flow.events());
    let codes = SendVerificationCodeHandler::new(session, verifier.clone());

    let mut console = Console::new();
    let wizard = Wizard {
        console: &mut console,
        flow: &flow,
        screens: &screens,
        photos: &photos,
        codes: &codes,
        verifier: &verifier,
    };
    let finished = wizard.run().await?;

    drop(flow);
    forwarder.abort();
    let controller = driver_task.await?;

    if finished && controller.is_handed_off() {
        let draft = match store.load_document(&user_id).await? {
            Some(doc) => UserDraftProfile::from_document(&doc).unwrap_or_default(),
            None => UserDraftProfile::default(),
        };
        welcome(&draft);
    } else {
        println!("\nProgress saved. Run again to pick up where you left off.");
    }
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn welcome(draft: &UserDraftProfile) {
    match draft.display_name() {
        Some(name) => println!("\nYou're all set, {}. Welcome in!", name),
        None => println!("\nYou're all set. Welcome in!"),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Console input
// ════════════════════════════════════════════════════════════════════════════════

struct Console {
    lines: Lines<BufReader<Stdin>>,
}

impl Console {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Reads one trimmed line; `None` at end of input.
    async fn ask(&mut self, prompt: &str) -> Result<Option<String>, BoxError> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(format!("{}: ", prompt).as_bytes()).await?;
        stdout.flush().await?;
        Ok(self.lines.next_line().await?.map(|l| l.trim().to_string()))
    }

    async fn pick_one<T: Copy + Display>(
        &mut self,
        prompt: &str,
        options: &[T],
    ) -> Result<Option<Option<T>>, BoxError> {
        list_options(options);
        let Some(answer) = self.ask(prompt).await? else {
            return Ok(None);
        };
        Ok(Some(parse_indices(&answer, options).into_iter().next()))
    }

    async fn pick_many<T: Copy + Display>(
        &mut self,
        prompt: &str,
        options: &[T],
    ) -> Result<Option<Vec<T>>, BoxError> {
        list_options(options);
        let Some(answer) = self.ask(prompt).await? else {
            return Ok(None);
        };
        Ok(Some(parse_indices(&answer, options)))
    }

    async fn pick_two_level<D>(
        &mut self,
        categories: &[D::Category],
        details: &[D],
    ) -> Result<Option<TwoLevelChoice<D>>, BoxError>
    where
        D: Refinement + Display,
        D::Category: Display,
    {
        let mut choice = TwoLevelChoice::new();
        let Some(category) = self.pick_one("Choose one", categories).await? else {
            return Ok(None);
        };
        let Some(category) = category else {
            return Ok(Some(choice));
        };
        choice.select_category(category);

        let refinements: Vec<D> = details
            .iter()
            .copied()
            .filter(|d| d.category() == category)
            .collect();
        if !refinements.is_empty() {
            let Some(detail) = self
                .pick_one("Be more specific (optional, blank to skip)", &refinements)
                .await?
            else {
                return Ok(None);
            };
            if let Some(detail) = detail {
                choice.select_detail(detail);
            }
        }
        Ok(Some(choice))
    }
}

fn list_options<T: Display>(options: &[T]) {
    for (i, option) in options.iter().enumerate() {
        println!("  {:>2}) {}", i + 1, option);
    }
}

/// Parses "1, 3" into the matching options, ignoring anything unparseable.
fn parse_indices<T: Copy>(answer: &str, options: &[T]) -> Vec<T> {
    answer
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter_map(|part| part.parse::<usize>().ok())
        .filter_map(|n| n.checked_sub(1).and_then(|i| options.get(i)).copied())
        .collect()
}

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Wizard
// ════════════════════════════════════════════════════════════════════════════════

struct Wizard<'a> {
    console: &'a mut Console,
    flow: &'a FlowHandle,
    screens: &'a CompleteScreenHandler,
    photos: &'a PhotoUploadHandler,
    codes: &'a SendVerificationCodeHandler,
    verifier: &'a InMemoryEmailVerifier,
}

impl Wizard<'_> {
    /// Shows screens until hand-off. Returns false if input ended early.
    async fn run(self) -> Result<bool, BoxError> {
        let Wizard {
            console,
            flow,
            screens,
            photos,
            codes,
            verifier,
        } = self;
        let mut steps = flow.steps();
        // Kept after a failed save so the user can resend it unchanged.
        let mut unsaved: Option<ScreenSubmission> = None;

        loop {
            let step = *steps.borrow_and_update();
            if step.is_terminal() {
                return Ok(true);
            }
            let screen = step.screen();
            println!(
                "\n── Step {} of {}: {} ──",
                step.index() + 1,
                Step::count() - 1,
                screen.title()
            );

            let completed = if screen == Screen::Photos {
                match photo_screen(console, photos).await? {
                    Some(done) => done,
                    None => return Ok(false),
                }
            } else {
                let retry = match resendable(unsaved.take(), screen) {
                    Some(previous) => {
                        match console
                            .ask("Press enter to send the same answers again, or type 'edit'")
                            .await?
                        {
                            None => return Ok(false),
                            Some(answer) if answer.eq_ignore_ascii_case("edit") => None,
                            Some(_) => Some(previous),
                        }
                    }
                    None => None,
                };
                let submission = match retry {
                    Some(previous) => previous,
                    None => match collect(console, screen, codes, verifier).await? {
                        Some(submission) => submission,
                        None => return Ok(false),
                    },
                };
                if !screens.can_continue(&submission) {
                    if let Err(e) = submission.validate(&screens.validation_context()) {
                        println!("Can't continue yet: {}", e);
                    }
                    continue;
                }
                // Progress may have moved on elsewhere while we read input.
                if steps.borrow().screen() != screen {
                    println!("This step was already completed. Moving on.");
                    continue;
                }
                let cmd = CompleteScreenCommand {
                    current: screen.entry_progress(),
                    submission: submission.clone(),
                };
                match screens.handle(cmd).await {
                    Ok(_) => true,
                    Err(e) => {
                        report(&e);
                        if !e.is_local() {
                            unsaved = Some(submission);
                        }
                        false
                    }
                }
            };

            if completed {
                // The driver moves the wizard; wait for it to publish.
                steps.wait_for(|s| s.screen() != screen).await?;
            }
        }
    }
}

fn report(error: &OnboardingError) {
    println!("{}", error.user_message());
}

/// The submission kept after a failed save, if it belongs to `screen`.
fn resendable(unsaved: Option<ScreenSubmission>, screen: Screen) -> Option<ScreenSubmission> {
    unsaved.filter(|submission| submission.screen() == screen)
}

/// Gathers one screen's input. `None` means stdin was closed.
async fn collect(
    console: &mut Console,
    screen: Screen,
    codes: &SendVerificationCodeHandler,
    verifier: &InMemoryEmailVerifier,
) -> Result<Option<ScreenSubmission>, BoxError> {
    macro_rules! ask {
        ($prompt:expr) => {
            match console.ask($prompt).await? {
                Some(answer) => answer,
                None => return Ok(None),
            }
        };
    }
    macro_rules! one {
        ($prompt:expr, $options:expr) => {
            match console.pick_one($prompt, $options).await? {
                Some(answer) => answer,
                None => return Ok(None),
            }
        };
    }
    macro_rules! many {
        ($prompt:expr, $options:expr) => {
            match console.pick_many($prompt, $options).await? {
                Some(answer) => answer,
                None => return Ok(None),
            }
        };
    }

    let submission = match screen {
        Screen::NameEntry => ScreenSubmission::NameEntry {
            first_name: ask!("First name"),
            last_name: ask!("Last name"),
        },
        Screen::EmailVerify => {
            let email = ask!("Email");
            match codes
                .handle(SendVerificationCodeCommand {
                    email: email.clone(),
                })
                .await
            {
                Ok(address) => {
                    if let Some(code) = verifier.sent_code(&address).await {
                        println!("(inbox) Your verification code is {}", code);
                    }
                }
                Err(e) => report(&e),
            }
            ScreenSubmission::EmailVerify {
                email,
                code: ask!("Verification code"),
            }
        }
        Screen::DateOfBirth => ScreenSubmission::DateOfBirth(DateOfBirthInput::new(
            ask!("Day (DD)"),
            ask!("Month (MM)"),
            ask!("Year (YYYY)"),
        )),
        Screen::Gender => match console
            .pick_two_level(Gender::all(), GenderDetail::all())
            .await?
        {
            Some(choice) => ScreenSubmission::Gender(choice),
            None => return Ok(None),
        },
        Screen::Sexuality => ScreenSubmission::Sexuality(one!("Choose one", Sexuality::all())),
        Screen::SexualityPreference => ScreenSubmission::SexualityPreference(many!(
            "Choose all that apply (e.g. 1,3)",
            InterestedIn::all()
        )),
        Screen::Height => {
            let answer = ask!("Height in inches");
            ScreenSubmission::Height(answer.parse::<u16>().into_iter().collect())
        }
        Screen::DatingIntention => match console
            .pick_two_level(DatingIntention::all(), DatingIntentionDetail::all())
            .await?
        {
            Some(choice) => ScreenSubmission::DatingIntention(choice),
            None => return Ok(None),
        },
        Screen::Children => ScreenSubmission::Children(one!("Choose one", Children::all())),
        Screen::FamilyPlans => {
            ScreenSubmission::FamilyPlans(one!("Choose one", FamilyPlans::all()))
        }
        Screen::Education => ScreenSubmission::Education(one!("Choose one", Education::all())),
        Screen::Religion => ScreenSubmission::Religion(one!("Choose one", Religion::all())),
        Screen::Ethnicity => ScreenSubmission::Ethnicity(many!(
            "Choose all that apply (e.g. 1,3)",
            Ethnicity::all()
        )),
        Screen::Drinking => ScreenSubmission::Drinking(one!("Do you drink?", Habit::all())),
        Screen::Smoking => ScreenSubmission::Smoking(one!("Do you smoke?", Habit::all())),
        Screen::Politics => ScreenSubmission::Politics(one!("Choose one", Politics::all())),
        Screen::Drugs => ScreenSubmission::Drugs(one!("Do you use drugs?", Habit::all())),
        Screen::Location => ScreenSubmission::Location {
            latitude: ask!("Latitude").parse().unwrap_or(f64::NAN),
            longitude: ask!("Longitude").parse().unwrap_or(f64::NAN),
            locality: Some(ask!("Town or city (optional)")),
        },
        Screen::Review => {
            ask!("Press enter to finish your profile");
            ScreenSubmission::Review
        }
        Screen::Photos | Screen::Complete => return Ok(None),
    };
    Ok(Some(submission))
}

/// Runs the photo screen. `Some(true)` once photos are saved, `Some(false)`
/// to show the screen again, `None` when input ended.
async fn photo_screen(
    console: &mut Console,
    handler: &PhotoUploadHandler,
) -> Result<Option<bool>, BoxError> {
    let rules = handler.rules();
    let Some(answer) = console
        .ask(&format!(
            "Photo files, comma separated ({} to {})",
            rules.min_photos, rules.max_photos
        ))
        .await?
    else {
        return Ok(None);
    };

    let mut assets = Vec::new();
    for path in answer.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let path = Path::new(path);
        match tokio::fs::read(path).await {
            Ok(bytes) => assets.push(PhotoAsset::new(content_type_for(path), bytes)),
            Err(e) => {
                println!("Couldn't read {}: {}", path.display(), e);
                return Ok(Some(false));
            }
        }
    }

    let session = match handler.start(StartPhotoUploadCommand {
        current: Screen::Photos.entry_progress(),
        assets,
    }) {
        Ok(session) => session,
        Err(e) => {
            report(&e);
            return Ok(Some(false));
        }
    };

    // Ctrl-C while uploading leaves the screen and cancels what is in flight.
    let mut interrupt = Box::pin(tokio::signal::ctrl_c());
    while session.in_flight_count() > 0 {
        tokio::select! {
            _ = &mut interrupt => {
                let report = session.abandon().await;
                println!(
                    "Cancelled {} upload(s); nothing was saved.",
                    report.cancelled.len()
                );
                return Ok(None);
            }
            _ = tokio::time::sleep(Duration::from_millis(50)) => {}
        }
    }

    match session.finish().await {
        Ok(result) => {
            println!("Saved {} photo(s).", result.locators.len());
            Ok(Some(true))
        }
        Err(e) => {
            report(&e);
            Ok(Some(false))
        }
    }
}
