//! Sign-in screen -- email/password form with field-level validation
//! and an inline failure banner (no blocking dialogs).

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use secrecy::SecretString;
use tokio::sync::mpsc::UnboundedSender;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use esimly_core::{CoreError, SessionState, validate};

use crate::action::Action;
use crate::app::centered_rect;
use crate::component::Component;
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Email,
    Password,
}

pub struct LoginScreen {
    action_tx: Option<UnboundedSender<Action>>,
    email: Input,
    password: Input,
    focus: Field,
    email_error: Option<String>,
    password_error: Option<String>,
    /// Server-side failure (wrong credentials, network), shown as an
    /// inline banner above the form.
    banner: Option<String>,
    submitting: bool,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self {
            action_tx: None,
            email: Input::default(),
            password: Input::default(),
            focus: Field::Email,
            email_error: None,
            password_error: None,
            banner: None,
            submitting: false,
        }
    }

    fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Email => Field::Password,
            Field::Password => Field::Email,
        };
    }

    /// Validate both fields. A failure never issues a network request.
    fn submit(&mut self) -> Option<Action> {
        self.email_error = validation_message(validate::email(self.email.value()));
        self.password_error =
            validation_message(validate::password_present(self.password.value()));

        if self.email_error.is_some() || self.password_error.is_some() {
            return None;
        }

        self.banner = None;
        self.submitting = true;
        Some(Action::SubmitLogin {
            email: self.email.value().trim().to_owned(),
            password: SecretString::from(self.password.value().to_owned()),
        })
    }

    fn reset(&mut self) {
        self.password = Input::default();
        self.email_error = None;
        self.password_error = None;
        self.banner = None;
        self.submitting = false;
    }
}

fn validation_message(result: Result<(), CoreError>) -> Option<String> {
    match result {
        Ok(()) => None,
        Err(CoreError::Validation { message, .. }) => Some(message),
        Err(other) => Some(other.to_string()),
    }
}

impl Component for LoginScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn capturing(&self) -> bool {
        // The form owns all keys; 'q' must be typeable in an email.
        true
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.submitting {
            return Ok(None);
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
                self.cycle_focus();
                Ok(None)
            }
            KeyCode::Enter => Ok(self.submit()),
            _ => {
                let field = match self.focus {
                    Field::Email => &mut self.email,
                    Field::Password => &mut self.password,
                };
                field.handle_event(&crossterm::event::Event::Key(key));
                Ok(None)
            }
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::LoginFailed(message) => {
                self.banner = Some(message.clone());
                self.submitting = false;
            }
            Action::SessionChanged(SessionState::Authenticated(_)) => self.reset(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let form = centered_rect(area, 48, 14);

        let block = Block::default()
            .title(Span::styled(" esimly · sign in ", theme::title()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);
        let inner = block.inner(form);
        frame.render_widget(block, form);

        let [banner_area, email_label, email_area, email_err, pw_label, pw_area, pw_err, _, hint] =
            Layout::vertical([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(inner);

        if let Some(ref banner) = self.banner {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(banner.as_str(), theme::error()))),
                banner_area,
            );
        }

        render_field(
            frame,
            "Email",
            &self.email,
            self.focus == Field::Email,
            false,
            self.email_error.as_deref(),
            email_label,
            email_area,
            email_err,
        );
        render_field(
            frame,
            "Password",
            &self.password,
            self.focus == Field::Password,
            true,
            self.password_error.as_deref(),
            pw_label,
            pw_area,
            pw_err,
        );

        let hint_text = if self.submitting {
            "signing in…"
        } else {
            "[tab] switch field   [enter] sign in   [ctrl+c] quit"
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(hint_text, theme::muted()))),
            hint,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn render_field(
    frame: &mut Frame,
    label: &str,
    input: &Input,
    focused: bool,
    mask: bool,
    error: Option<&str>,
    label_area: Rect,
    input_area: Rect,
    error_area: Rect,
) {
    let label_style = if focused {
        theme::title()
    } else {
        theme::muted()
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(label.to_owned(), label_style))),
        label_area,
    );

    let shown = if mask {
        "•".repeat(input.value().chars().count())
    } else {
        input.value().to_owned()
    };
    let cursor = if focused { "█" } else { "" };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("> "),
            Span::raw(shown),
            Span::styled(cursor, theme::title()),
        ])),
        input_area,
    );

    if let Some(error) = error {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(error.to_owned(), theme::error()))),
            error_area,
        );
    }
}
