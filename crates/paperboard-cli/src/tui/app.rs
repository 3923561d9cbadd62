//! TUI application state and logic.

use std::path::Path;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle as TokioHandle;
use tokio::sync::watch;
use tracing::warn;

use paperboard_core::{AuthMachine, FeedStore};
use paperboard_gateway::{
    ChangeNotification, ChangeWatcher, DocumentClient, GatewayConfig, IdentityClient,
};
use paperboard_models::Importance;
use paperboard_persistence::SessionStore;

/// How often the change watcher polls the collection.
const WATCH_INTERVAL: Duration = Duration::from_secs(3);

/// The authenticated tab set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// The news list.
    #[default]
    Feed,
    /// The item submission form.
    Add,
    /// The signed-in account screen.
    Account,
}

impl Tab {
    /// Returns the next tab, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Tab::Feed => Tab::Add,
            Tab::Add => Tab::Account,
            Tab::Account => Tab::Feed,
        }
    }

    /// Tab title for the tab bar.
    pub fn title(self) -> &'static str {
        match self {
            Tab::Feed => "Feed",
            Tab::Add => "Add",
            Tab::Account => "Account",
        }
    }

    /// Index into the tab bar.
    pub fn index(self) -> usize {
        match self {
            Tab::Feed => 0,
            Tab::Add => 1,
            Tab::Account => 2,
        }
    }
}

/// Which login field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    /// The email input.
    #[default]
    Email,
    /// The password input.
    Password,
}

impl LoginField {
    /// Switches focus to the other field.
    pub fn toggle(self) -> Self {
        match self {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        }
    }
}

/// Login form state.
#[derive(Debug, Default)]
pub struct LoginForm {
    /// Email input text.
    pub email: String,
    /// Password input text.
    pub password: String,
    /// Focused field.
    pub focus: LoginField,
}

/// Add form state.
#[derive(Debug)]
pub struct AddForm {
    /// News text input.
    pub text: String,
    /// Selected importance level.
    pub importance: Importance,
}

impl Default for AddForm {
    fn default() -> Self {
        Self {
            text: String::new(),
            importance: Importance::Critical,
        }
    }
}

/// TUI application state.
pub struct App {
    // Remote plumbing
    /// Document store client, shared with the change watcher.
    pub documents: Arc<DocumentClient>,
    /// Identity provider client.
    pub identity: IdentityClient,
    /// Persisted session storage.
    pub session_store: SessionStore,
    /// Handle into the tokio runtime driving gateway calls.
    runtime: TokioHandle,

    // State components
    /// Authentication state machine; which screen set is visible follows
    /// this alone.
    pub machine: AuthMachine,
    /// Derived read cache of the remote collection.
    pub feed: FeedStore,

    // Live subscription
    changes: Option<Receiver<ChangeNotification>>,
    watcher_shutdown: Option<watch::Sender<bool>>,

    // UI state
    /// Active tab while authenticated.
    pub tab: Tab,
    /// Login form state.
    pub login: LoginForm,
    /// Add form state.
    pub add: AddForm,
    /// Selected row in the feed list.
    pub selected: usize,
    /// Blocking alert message, if one is up.
    pub alert: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates the app, restoring a persisted session if one exists.
    ///
    /// A restored session is trusted without re-authenticating; the feed
    /// and the change watcher start immediately in that case.
    pub fn new(config: GatewayConfig, state_dir: &Path, runtime: TokioHandle) -> Self {
        let session_store = SessionStore::new(state_dir);
        let restored = match session_store.load() {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "failed to load persisted session");
                None
            }
        };

        let mut app = Self {
            documents: Arc::new(DocumentClient::new(config.clone())),
            identity: IdentityClient::new(config),
            session_store,
            runtime,

            machine: AuthMachine::restored(restored),
            feed: FeedStore::new(),

            changes: None,
            watcher_shutdown: None,

            tab: Tab::Feed,
            login: LoginForm::default(),
            add: AddForm::default(),
            selected: 0,
            alert: None,
            should_quit: false,
        };

        if app.machine.is_authenticated() {
            app.start_watcher();
            app.refresh();
        }

        app
    }

    // ==================== Authentication ====================

    /// Submits the login form.
    pub fn sign_in(&mut self) {
        let email = self.login.email.clone();
        let password = self.login.password.clone();

        let result = self.runtime.block_on(self.identity.sign_in(&email, &password));
        match result {
            Ok(session) => {
                if let Err(e) = self.session_store.save(&session) {
                    // The session still works for this run; only the
                    // restore on next launch is lost.
                    warn!(error = %e, "failed to persist session");
                }
                self.machine.signed_in(session);
                self.login = LoginForm::default();
                self.tab = Tab::Feed;
                self.start_watcher();
                self.refresh();
            }
            Err(e) => self.machine.sign_in_failed(e.to_string()),
        }
    }

    /// Signs out and returns to the login screen.
    pub fn sign_out(&mut self) {
        if let Err(e) = self.identity.sign_out(&self.session_store) {
            self.set_alert(e.to_string());
            return;
        }

        self.stop_watcher();
        self.machine.signed_out();
        self.feed.clear();
        self.selected = 0;
        self.tab = Tab::Feed;
    }

    // ==================== Feed ====================

    /// Fetches a fresh listing and replaces the cache with it.
    pub fn refresh(&mut self) {
        let Some(session) = self.machine.session().cloned() else {
            return;
        };

        self.feed.begin_refresh();
        let result = self.runtime.block_on(self.documents.list_items(&session));
        match result {
            Ok(items) => {
                self.feed.apply_listing(items);
                self.clamp_selection();
            }
            Err(e) => {
                self.feed.refresh_failed(e.to_string());
                self.set_alert(e.to_string());
            }
        }
    }

    /// Submits the add form.
    ///
    /// On success the form clears and the view returns to the feed; the
    /// change watcher brings the new item in with the next confirmed read
    /// (the cache is never patched optimistically).
    pub fn submit_add(&mut self) {
        let text = self.add.text.trim().to_string();
        if text.is_empty() {
            self.set_alert("News text is empty!");
            return;
        }
        let Some(session) = self.machine.session().cloned() else {
            return;
        };
        let importance = self.add.importance;

        let result = self
            .runtime
            .block_on(self.documents.add_item(&session, &text, importance));
        match result {
            Ok(_) => {
                self.add = AddForm::default();
                self.tab = Tab::Feed;
            }
            Err(e) => self.set_alert(e.to_string()),
        }
    }

    /// Deletes the selected feed item and re-reads the listing.
    pub fn delete_selected(&mut self) {
        let Some(item) = self.feed.get(self.selected) else {
            return;
        };
        let id = item.id.clone();
        let Some(session) = self.machine.session().cloned() else {
            return;
        };

        let result = self
            .runtime
            .block_on(self.documents.delete_item(&session, &id));
        match result {
            Ok(()) => self.refresh(),
            Err(e) => self.set_alert(e.to_string()),
        }
    }

    /// Drains pending change notifications; any of them triggers one
    /// fresh listing (full reload, no diffing).
    pub fn poll_changes(&mut self) {
        let mut changed = false;
        if let Some(rx) = &self.changes {
            while rx.try_recv().is_ok() {
                changed = true;
            }
        }
        if changed {
            self.refresh();
        }
    }

    // ==================== Live subscription ====================

    /// Spawns the change watcher for the current session.
    fn start_watcher(&mut self) {
        let Some(session) = self.machine.session().cloned() else {
            return;
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let watcher = ChangeWatcher::new(
            Arc::clone(&self.documents),
            session,
            WATCH_INTERVAL,
            shutdown_rx,
        );
        self.changes = Some(watcher.subscribe());
        self.watcher_shutdown = Some(shutdown_tx);
        self.runtime.spawn(watcher.run());
    }

    /// Stops the change watcher and releases the subscription.
    pub fn stop_watcher(&mut self) {
        if let Some(tx) = self.watcher_shutdown.take() {
            let _ = tx.send(true);
        }
        self.changes = None;
    }

    /// True while a live subscription is held.
    pub fn is_watching(&self) -> bool {
        self.changes.is_some()
    }

    // ==================== Input ====================

    /// Routes a typed character to whichever input is active.
    pub fn input_char(&mut self, c: char) {
        if !self.machine.is_authenticated() {
            match self.login.focus {
                LoginField::Email => self.login.email.push(c),
                LoginField::Password => self.login.password.push(c),
            }
        } else if self.tab == Tab::Add {
            self.add.text.push(c);
        }
    }

    /// Deletes the last character of the active input.
    pub fn input_backspace(&mut self) {
        if !self.machine.is_authenticated() {
            match self.login.focus {
                LoginField::Email => {
                    self.login.email.pop();
                }
                LoginField::Password => {
                    self.login.password.pop();
                }
            }
        } else if self.tab == Tab::Add {
            self.add.text.pop();
        }
    }

    /// Moves login focus to the other field.
    pub fn toggle_login_focus(&mut self) {
        self.login.focus = self.login.focus.toggle();
    }

    /// Cycles the add form's importance level.
    pub fn cycle_importance(&mut self) {
        self.add.importance = self.add.importance.next_selectable();
    }

    /// Switches to the next tab.
    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    // ==================== Selection ====================

    /// Moves the feed selection up.
    pub fn select_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Moves the feed selection down.
    pub fn select_down(&mut self) {
        if self.selected + 1 < self.feed.len() {
            self.selected += 1;
        }
    }

    /// Keeps the selection inside the current listing.
    fn clamp_selection(&mut self) {
        if self.selected >= self.feed.len() {
            self.selected = self.feed.len().saturating_sub(1);
        }
    }

    // ==================== Alerts ====================

    /// Raises a blocking alert.
    pub fn set_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
    }

    /// Dismisses the alert, if one is up.
    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperboard_models::{NewsItem, Session};
    use tokio::runtime::Runtime;

    fn test_config() -> GatewayConfig {
        // Closed local port so accidental network calls fail fast.
        GatewayConfig::new("key", "proj")
            .with_identity_url("http://127.0.0.1:1")
            .with_firestore_url("http://127.0.0.1:1")
    }

    fn test_app(runtime: &Runtime, dir: &Path) -> App {
        App::new(test_config(), dir, runtime.handle().clone())
    }

    fn item(id: &str, millis: i64) -> NewsItem {
        NewsItem::new(id, "text", Importance::Mild, millis)
    }

    #[test]
    fn test_starts_anonymous_without_persisted_session() {
        let runtime = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();

        let app = test_app(&runtime, dir.path());
        assert!(!app.machine.is_authenticated());
        assert!(!app.is_watching());
    }

    #[test]
    fn test_restored_session_is_authenticated_and_watching() {
        let runtime = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();

        SessionStore::new(dir.path())
            .save(&Session::new("tok", "ref", "a@b.c", "uid"))
            .unwrap();

        let mut app = test_app(&runtime, dir.path());
        assert!(app.machine.is_authenticated());
        assert!(app.is_watching());
        // The startup refresh hit the closed port and raised an alert.
        assert!(app.alert.is_some());

        app.stop_watcher();
        assert!(!app.is_watching());
    }

    #[test]
    fn test_login_form_editing() {
        let runtime = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&runtime, dir.path());

        for c in "me@example.com".chars() {
            app.input_char(c);
        }
        app.toggle_login_focus();
        for c in "secret".chars() {
            app.input_char(c);
        }
        app.input_backspace();

        assert_eq!(app.login.email, "me@example.com");
        assert_eq!(app.login.password, "secre");
    }

    #[test]
    fn test_sign_in_with_empty_fields_sets_exact_errors() {
        let runtime = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&runtime, dir.path());

        app.sign_in();
        assert_eq!(
            app.machine.last_error(),
            "Email and pass inputs are empty!"
        );

        app.login.email = "me@example.com".to_string();
        app.sign_in();
        assert_eq!(app.machine.last_error(), "Pass input is empty!");

        app.login.email.clear();
        app.login.password = "secret".to_string();
        app.sign_in();
        assert_eq!(app.machine.last_error(), "Email input is empty!");

        assert!(!app.machine.is_authenticated());
    }

    #[test]
    fn test_tab_cycling() {
        let runtime = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&runtime, dir.path());

        assert_eq!(app.tab, Tab::Feed);
        app.next_tab();
        assert_eq!(app.tab, Tab::Add);
        app.next_tab();
        assert_eq!(app.tab, Tab::Account);
        app.next_tab();
        assert_eq!(app.tab, Tab::Feed);
    }

    #[test]
    fn test_selection_follows_listing() {
        let runtime = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&runtime, dir.path());

        app.feed
            .apply_listing(vec![item("a", 3), item("b", 2), item("c", 1)]);

        app.select_down();
        app.select_down();
        assert_eq!(app.selected, 2);
        app.select_down();
        assert_eq!(app.selected, 2);

        app.select_up();
        assert_eq!(app.selected, 1);

        // A shrunken listing pulls the selection back in range.
        app.selected = 2;
        app.feed.apply_listing(vec![item("a", 3)]);
        app.clamp_selection();
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_importance_cycles_through_selectable_levels() {
        let runtime = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&runtime, dir.path());

        assert_eq!(app.add.importance, Importance::Critical);
        app.cycle_importance();
        assert_eq!(app.add.importance, Importance::Mild);
        app.cycle_importance();
        assert_eq!(app.add.importance, Importance::Informational);
        app.cycle_importance();
        assert_eq!(app.add.importance, Importance::Critical);
    }

    #[test]
    fn test_empty_add_text_raises_alert_without_network() {
        let runtime = Runtime::new().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&runtime, dir.path());

        app.add.text = "   ".to_string();
        app.submit_add();
        assert_eq!(app.alert.as_deref(), Some("News text is empty!"));

        app.dismiss_alert();
        assert!(app.alert.is_none());
    }
}
