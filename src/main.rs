//! Console front-end for the LAMPY client.
//!
//! The flows are UI-agnostic; this binary is one presentation layer over
//! them, reading from stdin and acting on the outcomes they return.
//! Device capabilities are stand-ins: coordinates are typed in, photos
//! are JPEG files read from disk.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use lampy_client::api::{ApiClient, Counsellor};
use lampy_client::config::ClientConfig;
use lampy_client::device::{
    Address, CapturedPhoto, Coordinates, LocationProvider, Permission, PhotoSource,
};
use lampy_client::error::DeviceError;
use lampy_client::flows::account::{AccountFlow, RegistrationForm};
use lampy_client::flows::counsellors::CounsellorsFlow;
use lampy_client::flows::location::{DetectedLocation, LocationFlow};
use lampy_client::flows::preferences::{
    CONSULTATION_TOPICS, PreferenceSelection, PreferencesFlow, Toggle,
};
use lampy_client::flows::sessions::SessionsFlow;
use lampy_client::flows::uploads::{
    AgeVerificationFlow, PhotoSelection, PoseVerificationFlow, ProfilePhotoFlow,
};
use lampy_client::flows::{OnboardingStep, Outcome};
use lampy_client::store::{FileSessionStore, SessionStore};

/// What a step handler tells the driver loop to do next.
enum StepResult {
    Advance,
    /// Session token went missing; start over at the entry screen.
    Restart,
}

/// Line-based console shared by the prompts and the device stand-ins.
struct Console {
    lines: tokio::sync::Mutex<Lines<BufReader<Stdin>>>,
}

impl Console {
    fn new() -> Self {
        Self {
            lines: tokio::sync::Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    async fn prompt(&self, label: &str) -> String {
        eprint!("{label}");
        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) => line.trim().to_string(),
            // EOF or a read error: there is no user to recover with.
            _ => {
                eprintln!("\nInput closed. Exiting.");
                std::process::exit(0);
            }
        }
    }

    async fn confirm(&self, label: &str) -> bool {
        let answer = self.prompt(label).await;
        matches!(answer.as_str(), "y" | "Y" | "yes")
    }
}

/// Location stand-in: permission is a y/n prompt, the fix is typed in,
/// and there is no geocoder, so flows fall back to coordinate strings.
struct ConsoleLocation {
    console: Arc<Console>,
}

#[async_trait]
impl LocationProvider for ConsoleLocation {
    async fn request_permission(&self) -> Permission {
        if self.console.confirm("Share your location? [y/N] ").await {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    async fn current_position(&self) -> Result<Coordinates, DeviceError> {
        let latitude = self.console.prompt("Latitude: ").await;
        let longitude = self.console.prompt("Longitude: ").await;
        match (latitude.parse(), longitude.parse()) {
            (Ok(latitude), Ok(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err(DeviceError::PositionUnavailable(
                "coordinates must be decimal numbers".into(),
            )),
        }
    }

    async fn reverse_geocode(
        &self,
        _position: Coordinates,
    ) -> Result<Option<Address>, DeviceError> {
        Ok(None)
    }
}

/// Photo stand-in: a photo is a JPEG file path typed at the prompt.
struct ConsolePhotos {
    console: Arc<Console>,
}

impl ConsolePhotos {
    async fn read_photo(&self) -> Result<Option<CapturedPhoto>, DeviceError> {
        let path = self
            .console
            .prompt("Path to a JPEG file (blank to cancel): ")
            .await;
        if path.is_empty() {
            return Ok(None);
        }
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| DeviceError::CaptureFailed(e.to_string()))?;
        let file_name = Path::new(&path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo.jpg")
            .to_string();
        Ok(Some(CapturedPhoto::new(bytes, file_name)))
    }
}

#[async_trait]
impl PhotoSource for ConsolePhotos {
    async fn request_camera_permission(&self) -> Permission {
        Permission::Granted
    }

    async fn request_library_permission(&self) -> Permission {
        Permission::Granted
    }

    async fn take_photo(&self) -> Result<Option<CapturedPhoto>, DeviceError> {
        self.read_photo().await
    }

    async fn pick_photo(&self) -> Result<Option<CapturedPhoto>, DeviceError> {
        self.read_photo().await
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ClientConfig::from_env();
    eprintln!("LAMPY client v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API:  {}", config.base_url);
    eprintln!("   Data: {}\n", config.data_dir.display());

    let api = Arc::new(ApiClient::new(&config));
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(config.data_dir.clone()));
    let console = Arc::new(Console::new());
    let location_device = ConsoleLocation {
        console: Arc::clone(&console),
    };
    let photo_device = ConsolePhotos {
        console: Arc::clone(&console),
    };

    let mut step = if store.token().await.is_some() {
        eprintln!("Existing session found, jumping to the counsellor list.\n");
        OnboardingStep::Counsellors
    } else {
        OnboardingStep::Register
    };

    while !step.is_terminal() {
        let result = match step {
            OnboardingStep::Register => {
                register(&console, Arc::clone(&api), Arc::clone(&store)).await
            }
            OnboardingStep::Location => {
                location(&console, &location_device, Arc::clone(&api), Arc::clone(&store)).await
            }
            OnboardingStep::ProfilePhoto => {
                profile_photo(&console, &photo_device, Arc::clone(&api), Arc::clone(&store)).await
            }
            OnboardingStep::PoseVerification => {
                pose_verification(&console, &photo_device, Arc::clone(&api), Arc::clone(&store))
                    .await
            }
            OnboardingStep::AgeVerification => {
                age_verification(&console, &photo_device, Arc::clone(&api), Arc::clone(&store))
                    .await
            }
            OnboardingStep::Preferences => {
                preferences(&console, Arc::clone(&api), Arc::clone(&store)).await
            }
            OnboardingStep::Counsellors => {
                counsellors(&console, Arc::clone(&api), Arc::clone(&store)).await
            }
            OnboardingStep::Complete => StepResult::Advance,
        };

        step = match result {
            StepResult::Advance => step.next().unwrap_or(OnboardingStep::Complete),
            StepResult::Restart => {
                eprintln!("Session expired. Please sign in again.\n");
                OnboardingStep::Register
            }
        };
    }

    eprintln!("All done. Goodbye!");
    Ok(())
}

async fn register(
    console: &Console,
    api: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
) -> StepResult {
    let flow = AccountFlow::new(api, store);
    loop {
        eprintln!("== Create your account ==");
        if console.confirm("Already registered? Log in instead [y/N] ").await {
            let email = console.prompt("Email: ").await;
            let password = console.prompt("Password: ").await;
            match flow.login(&email, &password).await {
                Outcome::Proceed(user) => {
                    eprintln!("Welcome back, {}!\n", user.name);
                    return StepResult::Advance;
                }
                Outcome::Retry(message) => eprintln!("{message}\n"),
                Outcome::Redirect => return StepResult::Restart,
            }
            continue;
        }

        let form = RegistrationForm {
            name: console.prompt("Name: ").await,
            email: console.prompt("Email: ").await,
            password: console.prompt("Password (min 6 characters): ").await,
        };
        match flow.register(&form).await {
            Outcome::Proceed(user) => {
                eprintln!("Account created. Welcome to LAMPY, {}!\n", user.name);
                return StepResult::Advance;
            }
            Outcome::Retry(message) => eprintln!("{message}\n"),
            Outcome::Redirect => return StepResult::Restart,
        }
    }
}

async fn location(
    console: &Console,
    device: &ConsoleLocation,
    api: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
) -> StepResult {
    let flow = LocationFlow::new(api, store);
    loop {
        eprintln!("== Location ==");
        let detected = match flow.detect(device).await {
            Ok(DetectedLocation::Detected(display)) => display,
            Ok(DetectedLocation::PermissionDenied) => {
                eprintln!("Location helps us recommend counsellors near you.");
                if console.confirm("Skip this step? [y/N] ").await {
                    let _ = flow.skip().await;
                    return StepResult::Advance;
                }
                continue;
            }
            Err(e) => {
                eprintln!("{e}\n");
                continue;
            }
        };

        eprintln!("Detected location: {detected}");
        match flow.submit(&detected).await {
            Outcome::Proceed(()) => {
                eprintln!("Location saved.\n");
                return StepResult::Advance;
            }
            Outcome::Retry(message) => eprintln!("{message}\n"),
            Outcome::Redirect => return StepResult::Restart,
        }
    }
}

async fn profile_photo(
    console: &Console,
    device: &ConsolePhotos,
    api: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
) -> StepResult {
    let mut flow = ProfilePhotoFlow::new(api, store);
    loop {
        eprintln!("== Profile photo ==");
        match flow.pick_from_library(device).await {
            PhotoSelection::Selected => {}
            PhotoSelection::Cancelled if flow.photo().is_none() => {
                eprintln!("A profile photo is required to continue.\n");
                continue;
            }
            PhotoSelection::Cancelled => {}
            PhotoSelection::PermissionDenied => {
                eprintln!("Please allow access to your photos.\n");
                continue;
            }
            PhotoSelection::Failed(message) => {
                eprintln!("{message}\n");
                continue;
            }
        }

        match flow.upload().await {
            Outcome::Proceed(_) => {
                eprintln!("Profile photo uploaded.\n");
                return StepResult::Advance;
            }
            Outcome::Retry(message) => eprintln!("{message}\n"),
            Outcome::Redirect => return StepResult::Restart,
        }
    }
}

async fn pose_verification(
    console: &Console,
    device: &ConsolePhotos,
    api: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
) -> StepResult {
    let mut flow = PoseVerificationFlow::new(api, store);
    loop {
        eprintln!("== Pose verification ==");
        eprintln!("Copy the reference pose; face clearly visible, good lighting.");
        if console.confirm("Skip verification for now? [y/N] ").await {
            let _ = flow.skip();
            return StepResult::Advance;
        }

        match flow.take_photo(device).await {
            PhotoSelection::Selected => {}
            PhotoSelection::Cancelled => continue,
            PhotoSelection::PermissionDenied => {
                eprintln!("Please allow camera access to take your verification photo.\n");
                continue;
            }
            PhotoSelection::Failed(message) => {
                eprintln!("{message}\n");
                continue;
            }
        }

        match flow.upload().await {
            Outcome::Proceed(_) => {
                eprintln!("Photo submitted for verification.\n");
                return StepResult::Advance;
            }
            Outcome::Retry(message) => eprintln!("{message}\n"),
            Outcome::Redirect => return StepResult::Restart,
        }
    }
}

async fn age_verification(
    console: &Console,
    device: &ConsolePhotos,
    api: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
) -> StepResult {
    let mut flow = AgeVerificationFlow::new(api, store);
    loop {
        eprintln!("== Age verification ==");
        eprintln!("Upload a valid ID with your photo and date of birth.");
        match flow.pick_from_library(device).await {
            PhotoSelection::Selected => {}
            PhotoSelection::Cancelled => continue,
            PhotoSelection::PermissionDenied => {
                eprintln!("Please allow access to your photos.\n");
                continue;
            }
            PhotoSelection::Failed(message) => {
                eprintln!("{message}\n");
                continue;
            }
        }

        match flow.upload().await {
            Outcome::Proceed(_) => {
                eprintln!("ID document submitted for review.\n");
                return StepResult::Advance;
            }
            Outcome::Retry(message) => eprintln!("{message}\n"),
            Outcome::Redirect => return StepResult::Restart,
        }
    }
}

async fn preferences(
    console: &Console,
    api: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
) -> StepResult {
    let flow = PreferencesFlow::new(api, store);
    let mut selection = PreferenceSelection::new();
    loop {
        eprintln!("== Why do you want to meet a counselor? (up to 3) ==");
        for (index, topic) in CONSULTATION_TOPICS.iter().enumerate() {
            let mark = if selection.contains(topic) { "x" } else { " " };
            eprintln!("  [{mark}] {}. {topic}", index + 1);
        }

        let answer = console
            .prompt("Toggle 1-7, [d]one, or [s]kip: ")
            .await;
        match answer.as_str() {
            "s" | "S" => {
                let _ = flow.skip().await;
                return StepResult::Advance;
            }
            "d" | "D" => match flow.submit(&selection).await {
                Outcome::Proceed(()) => {
                    eprintln!("Preferences saved.\n");
                    return StepResult::Advance;
                }
                Outcome::Retry(message) => eprintln!("{message}\n"),
                Outcome::Redirect => return StepResult::Restart,
            },
            _ => {
                let choice = answer.parse::<usize>().ok().filter(|n| (1..=7).contains(n));
                match choice {
                    Some(n) => {
                        if selection.toggle(CONSULTATION_TOPICS[n - 1]) == Toggle::LimitReached {
                            eprintln!("You can only choose up to 3 options.\n");
                        }
                    }
                    None => eprintln!("Enter a number from 1 to 7.\n"),
                }
            }
        }
    }
}

async fn counsellors(
    console: &Console,
    api: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
) -> StepResult {
    let directory = CounsellorsFlow::new(Arc::clone(&api), Arc::clone(&store));
    let sessions = SessionsFlow::new(api, store);
    loop {
        eprintln!("== Available counsellors ==");
        let list = match directory.fetch().await {
            Outcome::Proceed(list) => list,
            Outcome::Retry(message) => {
                eprintln!("{message}");
                if console.confirm("Retry? [y/N] ").await {
                    continue;
                }
                return StepResult::Advance;
            }
            Outcome::Redirect => return StepResult::Restart,
        };

        if list.is_empty() {
            eprintln!("No counsellors available at the moment.");
        }
        for counsellor in &list {
            print_counsellor(counsellor);
        }

        let answer = console
            .prompt("Counsellor id to book, or blank to finish: ")
            .await;
        if answer.is_empty() {
            return StepResult::Advance;
        }
        let Ok(id) = answer.parse::<u64>() else {
            eprintln!("Enter a numeric counsellor id.\n");
            continue;
        };

        match sessions.book(id).await {
            Outcome::Proceed(session) => {
                eprintln!(
                    "Session booked for {} ({} minutes).\n",
                    session.session_date, session.duration
                );
                return StepResult::Advance;
            }
            Outcome::Retry(message) => eprintln!("{message}\n"),
            Outcome::Redirect => return StepResult::Restart,
        }
    }
}

fn print_counsellor(counsellor: &Counsellor) {
    eprintln!(
        "  #{} {} | {} | {} | rating {} ({} ratings)",
        counsellor.id,
        counsellor.name,
        counsellor.role,
        counsellor.qualification,
        counsellor.rating,
        counsellor.total_ratings,
    );
    if !counsellor.specialties.is_empty() {
        eprintln!("      Specialties: {}", counsellor.specialties.join(", "));
    }
    if !counsellor.price.is_empty() {
        eprintln!("      Session starting at {}", counsellor.price);
    }
}
