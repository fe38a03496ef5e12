//! Dependency injection container for the melodiq application.
//!
//! Centralizes creation and wiring of infrastructure dependencies. The
//! container owns the Q-table repository and injects it, together with the
//! caller's renderer and feedback collaborators, into session controllers.

use std::sync::Arc;

use crate::{
    Result,
    adapters::MsgPackRepository,
    ports::{FeedbackSource, QTableRepository, TrackRenderer},
    session::{SessionConfig, SessionController},
};

/// Default directory for persisted Q-tables.
const DEFAULT_STORE_DIR: &str = "q_tables";

/// Application container with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```no_run
/// use melodiq::adapters::{NullRenderer, QueuedFeedback};
/// use melodiq::app::App;
/// use melodiq::session::SessionConfig;
///
/// let app = App::new();
/// let config = SessionConfig::new("000000").with_seed(42);
/// let session = app.create_session(
///     config,
///     Box::new(NullRenderer::new()),
///     Box::new(QueuedFeedback::new([7, 3])),
/// )?;
/// # Ok::<(), melodiq::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use melodiq::adapters::InMemoryRepository;
/// use melodiq::app::App;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for Q-table persistence
    repository: Arc<dyn QTableRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create an app with production defaults: MessagePack persistence
    /// under `q_tables/`, no default seed.
    pub fn new() -> Self {
        Self {
            repository: Arc::new(MsgPackRepository::new(DEFAULT_STORE_DIR)),
            default_seed: None,
        }
    }

    /// Create a builder for constructing an app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// The Q-table repository.
    pub fn repository(&self) -> Arc<dyn QTableRepository + Send + Sync> {
        Arc::clone(&self.repository)
    }

    /// Create a session controller wired with the container's repository.
    ///
    /// The config seed takes precedence over the container default.
    pub fn create_session(
        &self,
        mut config: SessionConfig,
        renderer: Box<dyn TrackRenderer>,
        feedback: Box<dyn FeedbackSource>,
    ) -> Result<SessionController> {
        if config.seed.is_none() {
            config.seed = self.default_seed;
        }
        SessionController::new(config, Arc::clone(&self.repository), renderer, feedback)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing an app with custom dependencies.
pub struct AppBuilder {
    repository: Option<Arc<dyn QTableRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self {
            repository: None,
            default_seed: None,
        }
    }

    /// Set a custom Q-table repository.
    pub fn with_repository<R: QTableRepository + Send + Sync + 'static>(
        mut self,
        repository: R,
    ) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Set a default random seed for all sessions created by this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app. Falls back to MessagePack persistence if no
    /// repository was supplied.
    pub fn build(self) -> App {
        App {
            repository: self
                .repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new(DEFAULT_STORE_DIR))),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
