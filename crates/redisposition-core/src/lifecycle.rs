//! Startup/shutdown sequencing and dispatch of host events.

use crate::config::RedispositionConfig;
use crate::disposition::Mode;
use crate::host::{ResponseChannel, StyleSheetService, WindowHandle, WindowId, WindowRegistry};
use crate::interceptor::ResponseInterceptor;
use crate::prefs::{PrefBranch, PreferenceStore};
use crate::settings::{Settings, ENCODINGS};
use crate::ui::{UiController, UserAction};

/// Host services the extension binds to at startup.
pub struct HostServices {
    pub responses: Box<dyn ResponseChannel>,
    pub windows: Box<dyn WindowRegistry>,
    pub stylesheets: Box<dyn StyleSheetService>,
    pub prefs: Box<dyn PreferenceStore>,
}

/// A running extension instance.
///
/// Owns the settings record and every component; the host calls the `on_*`
/// methods from its single callback context. Each event's effects (persistence,
/// mode, interceptor subscription, UI) are complete when the method returns.
pub struct Extension {
    config: RedispositionConfig,
    prefs: PrefBranch,
    settings: Settings,
    interceptor: ResponseInterceptor,
    ui: UiController,
    windows: Box<dyn WindowRegistry>,
    stylesheets: Box<dyn StyleSheetService>,
    watching_windows: bool,
    running: bool,
}

impl Extension {
    pub fn startup(config: RedispositionConfig, host: HostServices) -> Self {
        let HostServices {
            responses,
            mut windows,
            mut stylesheets,
            prefs,
        } = host;

        if !stylesheets.is_registered(&config.stylesheet_uri) {
            if let Err(e) = stylesheets.register(&config.stylesheet_uri) {
                tracing::warn!("could not register stylesheet: {}", e);
            }
        }

        let mut prefs = PrefBranch::new(config.preference_branch.clone(), prefs);
        let mut settings = Settings::load(&mut prefs, &config.default_encodings);

        let mut interceptor = ResponseInterceptor::new(responses);
        sync_interceptor(&mut interceptor, &mut settings, &mut prefs);

        let mut ui = UiController::new(config.preferences_uri.clone());
        for window in windows.open_windows() {
            ui.attach(&window, &settings);
        }

        let watching_windows = match windows.watch_openings() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("could not watch for new windows: {}", e);
                false
            }
        };

        tracing::info!("redisposition started in mode {}", settings.mode());
        Self {
            config,
            prefs,
            settings,
            interceptor,
            ui,
            windows,
            stylesheets,
            watching_windows,
            running: true,
        }
    }

    /// Undoes everything `startup` did and flushes settings. Idempotent.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;

        let uri = &self.config.stylesheet_uri;
        if self.stylesheets.is_registered(uri) {
            if let Err(e) = self.stylesheets.unregister(uri) {
                tracing::warn!("could not unregister stylesheet: {}", e);
            }
        }

        self.ui.detach_all();

        if self.watching_windows {
            self.watching_windows = false;
            if let Err(e) = self.windows.unwatch_openings() {
                tracing::warn!("could not stop watching windows: {}", e);
            }
        }

        self.interceptor.set_active(false);
        self.settings.save(&mut self.prefs);
        tracing::info!("redisposition shut down");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> &Mode {
        self.settings.mode()
    }

    /// Whether the response interceptor is currently subscribed.
    pub fn is_intercepting(&self) -> bool {
        self.interceptor.is_active()
    }

    pub fn ui(&self) -> &UiController {
        &self.ui
    }

    pub fn prefs(&self) -> &PrefBranch {
        &self.prefs
    }

    pub fn on_window_opened(&mut self, window: &WindowHandle) {
        if !self.running || !self.watching_windows {
            return;
        }
        self.ui.attach(window, &self.settings);
    }

    pub fn on_window_closed(&mut self, id: WindowId) {
        self.ui.detach(id);
    }

    /// Host notification that preference `key` (full name) changed.
    ///
    /// Only outside edits of `encodings` matter; echoes of our own writes
    /// are dropped.
    pub fn on_preference_changed(&mut self, key: &str) {
        if !self.running || self.prefs.take_own_echo(key) {
            return;
        }
        if self.prefs.relative_key(key) != Some(ENCODINGS) {
            return;
        }
        if self
            .settings
            .reload_catalog(&mut self.prefs, &self.config.default_encodings)
        {
            self.apply_settings();
        }
    }

    /// Handles a toolbar event coming from window `window`.
    pub fn on_user_action(&mut self, window: WindowId, action: UserAction) {
        if !self.running {
            return;
        }
        if action == UserAction::OpenPreferences {
            self.ui.open_preferences(window);
            return;
        }
        tracing::debug!("user action {:?} in window {}", action, window);
        self.settings.apply_action(&action);
        self.settings.save(&mut self.prefs);
        self.settings.reconcile(&mut self.prefs);
        self.apply_settings();
    }

    fn apply_settings(&mut self) {
        sync_interceptor(&mut self.interceptor, &mut self.settings, &mut self.prefs);
        self.ui.refresh_all(&self.settings);
    }
}

/// Applies the settings' mode to the interceptor. If the host refuses the
/// subscription, the extension is switched off so the mode stays disabled
/// whenever nothing is intercepted.
fn sync_interceptor(
    interceptor: &mut ResponseInterceptor,
    settings: &mut Settings,
    prefs: &mut PrefBranch,
) {
    if interceptor.apply_mode(settings.mode()) {
        return;
    }
    tracing::warn!("interception unavailable; deactivating");
    settings.deactivate(prefs);
    interceptor.apply_mode(settings.mode());
}

impl Drop for Extension {
    fn drop(&mut self) {
        self.shutdown();
    }
}
