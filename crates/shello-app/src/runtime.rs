//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: client state machine
//! - [`Driver`]: platform-specific I/O

use crate::{App, AppAction, Driver};

/// Generic runtime that orchestrates the App and a Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
pub struct Runtime<D: Driver> {
    driver: D,
    app: App<D::Env>,
}

impl<D: Driver> Runtime<D> {
    /// Create a new runtime with the given driver and app.
    pub fn new(driver: D, app: App<D::Env>) -> Self {
        Self { driver, app }
    }

    /// Run the main event loop until the app quits.
    ///
    /// This is the core orchestration loop that:
    /// 1. Starts the first connection attempt
    /// 2. Polls the driver for input, transport and tick events
    /// 3. Feeds each event to the App
    /// 4. Executes the resulting actions through the driver
    ///
    /// On quit the reconnect timer is cancelled and the transport closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        let actions = self.app.start();
        let mut should_quit = self.execute(actions).await?;

        while !should_quit {
            let Some(event) = self.driver.poll_event().await? else {
                continue;
            };
            let actions = self.app.handle(event);
            should_quit = self.execute(actions).await?;
        }

        let actions = self.app.shutdown();
        self.execute(actions).await?;
        self.driver.stop();
        Ok(())
    }

    /// Execute actions returned by the App.
    ///
    /// Returns `true` if the app asked to quit.
    async fn execute(&mut self, actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut quit = false;

        for action in actions {
            match action {
                AppAction::Render => self.driver.render(&self.app)?,
                AppAction::Quit => quit = true,
                AppAction::Open => self.driver.open().await?,
                AppAction::Send(request) => match request.to_json() {
                    Ok(text) => self.driver.send(text).await?,
                    Err(e) => tracing::error!(func = %request.func(), error = %e, "encode failed"),
                },
                AppAction::Close => self.driver.close(),
            }
        }

        Ok(quit)
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App<D::Env> {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App<D::Env> {
        &mut self.app
    }
}
