use std::sync::Arc;

use services::{ApiClient, AuthService, TakeQuizService};

/// Services the UI needs from the composition root.
pub trait UiApp: Send + Sync {
    fn api(&self) -> ApiClient;
    fn auth(&self) -> Arc<AuthService>;
    fn take_quiz(&self) -> Arc<TakeQuizService>;
}

#[derive(Clone)]
pub struct AppContext {
    api: ApiClient,
    auth: Arc<AuthService>,
    take_quiz: Arc<TakeQuizService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            api: app.api(),
            auth: app.auth(),
            take_quiz: app.take_quiz(),
        }
    }

    #[must_use]
    pub fn api(&self) -> ApiClient {
        self.api.clone()
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn take_quiz(&self) -> Arc<TakeQuizService> {
        Arc::clone(&self.take_quiz)
    }
}
