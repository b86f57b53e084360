//! Application state and core logic

use crate::backend::SubmitBackend;
use crate::keymap::Shortcut;
use crate::state::{FieldId, FormController, Store, SubmitReceipt, SubmitTicket};
use crate::ui::fields::{FieldWidget, TextAreaInput, TextInput};
use crate::ui::island::select_input::{self, SelectProps};
use crate::ui::island::{IslandEvent, IslandFactory, MountAdapter};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Backend answer delivered back to the UI loop
type Completion = (SubmitTicket, Result<SubmitReceipt>);

/// What currently has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(FieldId),
    Submit,
    Reset,
}

impl Focus {
    /// Tab order
    pub const ORDER: [Focus; 6] = [
        Focus::Field(FieldId::Name),
        Focus::Field(FieldId::Email),
        Focus::Field(FieldId::Country),
        Focus::Field(FieldId::Message),
        Focus::Submit,
        Focus::Reset,
    ];

    fn position(&self) -> usize {
        Self::ORDER.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(&self) -> Self {
        let pos = self.position();
        if pos == 0 {
            Self::ORDER[Self::ORDER.len() - 1]
        } else {
            Self::ORDER[pos - 1]
        }
    }
}

/// Main application struct
pub struct App {
    pub store: Store,
    pub controller: FormController,
    backend: Arc<dyn SubmitBackend>,
    /// Expected backend latency, drives the progress animation
    submit_delay: Duration,
    pub name_input: TextInput,
    pub email_input: TextInput,
    pub message_input: TextAreaInput,
    /// Adapter site hosting the country select island
    pub country_site: MountAdapter,
    country_factory: IslandFactory,
    country_props: Value,
    pub focus: Focus,
    /// Transient message for the status bar
    pub status_message: Option<String>,
    /// When the in-flight submission started
    pub submit_started: Option<Instant>,
    completion_tx: UnboundedSender<Completion>,
    completion_rx: UnboundedReceiver<Completion>,
    quit: bool,
}

impl App {
    /// Create a new App instance
    pub fn new(backend: Arc<dyn SubmitBackend>, submit_delay: Duration) -> Result<Self> {
        let store = Store::new();
        let (completion_tx, completion_rx) = unbounded_channel();

        let mut app = Self {
            controller: FormController::new(store.clone()),
            backend,
            submit_delay,
            name_input: TextInput::name(store.clone()),
            email_input: TextInput::email(store.clone()),
            message_input: TextAreaInput::message(store.clone()),
            country_site: MountAdapter::default(),
            country_factory: select_input::factory(store.clone()),
            country_props: SelectProps::default().to_value(),
            store,
            focus: Focus::Field(FieldId::Name),
            status_message: None,
            submit_started: None,
            completion_tx,
            completion_rx,
            quit: false,
        };
        app.sync_islands()?;
        app.name_input.focus();
        Ok(app)
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Mount or remount islands whose factory or props changed
    pub fn sync_islands(&mut self) -> Result<()> {
        if self
            .country_site
            .sync(&self.country_factory, &self.country_props)?
            .is_some()
            && self.focus == Focus::Field(FieldId::Country)
        {
            self.country_site.container().dispatch(&IslandEvent::Focus);
        }
        Ok(())
    }

    /// Tear down the country island and mount a fresh instance
    pub fn remount_country(&mut self) -> Result<()> {
        if let Some(handle) = self.country_site.current() {
            self.country_site.unmount(handle);
        }
        self.sync_islands()?;
        tracing::debug!(
            subscribers = self.store.subscriber_count(),
            "country island remounted"
        );
        self.status_message = Some("Country widget remounted".to_string());
        Ok(())
    }

    fn host_widget(&mut self, field: FieldId) -> Option<&mut dyn FieldWidget> {
        match field {
            FieldId::Name => Some(&mut self.name_input),
            FieldId::Email => Some(&mut self.email_input),
            FieldId::Message => Some(&mut self.message_input),
            FieldId::Country => None,
        }
    }

    /// Move focus, blurring what had it and focusing the target
    pub fn set_focus(&mut self, target: Focus) {
        if target == self.focus {
            return;
        }
        match self.focus {
            Focus::Field(FieldId::Country) => {
                self.country_site.container().dispatch(&IslandEvent::Blur);
            }
            Focus::Field(field) => {
                if let Some(widget) = self.host_widget(field) {
                    widget.blur();
                }
            }
            Focus::Submit | Focus::Reset => {}
        }
        self.focus = target;
        match target {
            Focus::Field(FieldId::Country) => {
                self.country_site.container().dispatch(&IslandEvent::Focus);
            }
            Focus::Field(field) => {
                if let Some(widget) = self.host_widget(field) {
                    widget.focus();
                }
            }
            Focus::Submit | Focus::Reset => {}
        }
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return Ok(());
        }

        if let Some(shortcut) = Shortcut::from_key(&key) {
            match shortcut {
                Shortcut::Submit => self.submit(),
                Shortcut::Reset => self.reset(),
                Shortcut::CopyResults => self.copy_results(),
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Tab => {
                self.set_focus(self.focus.next());
                return Ok(());
            }
            KeyCode::BackTab => {
                self.set_focus(self.focus.prev());
                return Ok(());
            }
            KeyCode::F(5) => return self.remount_country(),
            _ => {}
        }

        let consumed = match self.focus {
            Focus::Field(FieldId::Country) => self
                .country_site
                .container()
                .dispatch(&IslandEvent::Key(key)),
            Focus::Field(field) => self
                .host_widget(field)
                .is_some_and(|widget| widget.handle_key(key)),
            Focus::Submit => {
                if key.code == KeyCode::Enter {
                    self.submit();
                    true
                } else {
                    false
                }
            }
            Focus::Reset => {
                if key.code == KeyCode::Enter {
                    self.reset();
                    true
                } else {
                    false
                }
            }
        };

        if !consumed && key.code == KeyCode::Esc {
            self.quit = true;
        }
        Ok(())
    }

    /// Start a submission if the form allows it
    pub fn submit(&mut self) {
        let Some(ticket) = self.controller.begin_submit() else {
            let submission = self.store.submission();
            self.status_message = Some(if submission.is_submitting() {
                "Already submitting...".to_string()
            } else if submission.is_submitted() {
                format!("Already submitted, {} to start over", Shortcut::Reset.label())
            } else {
                "Complete every field before submitting".to_string()
            });
            return;
        };

        self.submit_started = Some(Instant::now());
        self.status_message = None;
        let backend = Arc::clone(&self.backend);
        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = backend.submit(ticket.data.clone()).await;
            if tx.send((ticket, result)).is_err() {
                tracing::debug!("app closed before submission completed");
            }
        });
    }

    /// Apply any finished submissions. Called once per loop iteration.
    pub fn poll_submissions(&mut self) {
        while let Ok((ticket, result)) = self.completion_rx.try_recv() {
            self.apply_completion(ticket, result);
        }
    }

    fn apply_completion(&mut self, ticket: SubmitTicket, result: Result<SubmitReceipt>) {
        if !self.controller.complete_submit(ticket, result) {
            return;
        }
        self.submit_started = None;
        let submission = self.store.submission();
        self.status_message = Some(match submission.failure() {
            Some(message) => message.to_string(),
            None => "Form submitted successfully!".to_string(),
        });
    }

    /// Clear the form
    pub fn reset(&mut self) {
        self.controller.reset();
        self.submit_started = None;
        self.status_message = Some("Form reset".to_string());
    }

    /// Eased progress of the in-flight submission (0.0..=1.0)
    pub fn submit_progress(&self) -> Option<f64> {
        let started = self.submit_started?;
        if !self.store.submission().is_submitting() {
            return None;
        }
        let total = self.submit_delay.as_secs_f32();
        let linear = if total > 0.0 {
            (started.elapsed().as_secs_f32() / total).min(1.0)
        } else {
            1.0
        };
        Some(f64::from(simple_easing::cubic_out(linear)))
    }

    /// Submitted record as pretty JSON, if the form has been submitted
    pub fn results_json(&self) -> Option<String> {
        let submission = self.store.submission();
        let submitted = submission.submitted()?;
        serde_json::to_string_pretty(submitted).ok()
    }

    fn copy_results(&mut self) {
        let Some(text) = self.results_json() else {
            self.status_message = Some("Nothing submitted yet".to_string());
            return;
        };
        self.status_message = Some(match copy_to_clipboard(&text) {
            Ok(()) => format!("Copied {} chars", text.len()),
            Err(err) => {
                tracing::warn!(error = %err, "clipboard unavailable");
                "Clipboard unavailable".to_string()
            }
        });
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    use arboard::Clipboard;
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}
