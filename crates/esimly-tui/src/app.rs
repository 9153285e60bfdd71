//! Application core -- event loop, screen routing, action dispatch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use esimly_core::model::EsimRequestStatus;
use esimly_core::{ConnectionStatus, GuardDecision, Portal, Role, SessionState, guard};

use crate::action::{Action, ConfirmAction, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

/// How long a toast stays up before auto-dismissing.
const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Top-level application state and event loop.
pub struct App {
    portal: Portal,
    /// Current active screen.
    active_screen: ScreenId,
    /// All screen components, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Whether the app should keep running.
    running: bool,
    /// Role of the signed-in user (drives the tab bar).
    role: Option<Role>,
    /// Backend reachability, as last probed.
    connection: ConnectionStatus,
    /// Action sender -- components dispatch actions through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver -- main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Cancellation token for the data bridge task.
    data_cancel: CancellationToken,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<ConfirmAction>,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
}

impl App {
    pub fn new(portal: Portal, storefront_origin: String) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens = create_screens(storefront_origin);

        Self {
            portal,
            active_screen: ScreenId::Login,
            screens,
            running: true,
            role: None,
            connection: ConnectionStatus::Unknown,
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
            pending_confirm: None,
            notification: None,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        // Data bridge: store/session watch channels → actions.
        {
            let portal = self.portal.clone();
            let tx = self.action_tx.clone();
            let cancel = self.data_cancel.clone();
            tokio::spawn(async move {
                crate::data_bridge::spawn_data_bridge(portal, tx, cancel).await;
            });
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(50),  // 20 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            // Drain and process all queued actions.
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Key handling ─────────────────────────────────────────────────

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Ctrl+C always quits.
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        // Confirmation dialog captures all input.
        if self.pending_confirm.is_some() {
            return match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => Ok(Some(Action::ConfirmYes)),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Ok(Some(Action::ConfirmNo)),
                _ => Ok(None),
            };
        }

        // Screens with an open form/modal capture everything (text input
        // must win over global hotkeys).
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            if screen.capturing() {
                return screen.handle_key_event(key);
            }
        }

        // Global keys.
        match key.code {
            KeyCode::Char('q') => return Ok(Some(Action::Quit)),
            KeyCode::Char('L') => return Ok(Some(Action::Logout)),
            KeyCode::Char(c @ '1'..='4') => {
                if let Some(id) = c.to_digit(10).and_then(|n| {
                    u8::try_from(n).ok().and_then(ScreenId::from_number)
                }) {
                    return Ok(Some(Action::SwitchScreen(id)));
                }
            }
            _ => {}
        }

        // Delegate to the active screen.
        match self.screens.get_mut(&self.active_screen) {
            Some(screen) => screen.handle_key_event(key),
            None => Ok(None),
        }
    }

    // ── Action processing ────────────────────────────────────────────

    #[allow(clippy::too_many_lines)]
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Tick => {
                if let Some((_, shown_at)) = self.notification {
                    if shown_at.elapsed() > NOTIFICATION_TTL {
                        self.notification = None;
                    }
                }
            }

            Action::SwitchScreen(target) => self.switch_screen(*target),

            Action::SessionChanged(state) => self.route_session(state),

            Action::Logout => {
                self.portal.session().logout();
                self.notify(Notification::success("Signed out"));
            }

            Action::SubmitLogin { email, password } => {
                let session = self.portal.session().clone();
                let tx = self.action_tx.clone();
                let email = email.clone();
                let password = password.clone();
                tokio::spawn(async move {
                    if let Err(e) = session.login(&email, &password).await {
                        // Success routes via SessionChanged; only failures
                        // need an explicit action.
                        let _ = tx.send(Action::LoginFailed(e.to_string()));
                    }
                });
            }

            Action::RefreshRetailer => {
                let portal = self.portal.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    portal.refresh_retailer().await;
                    let _ = tx.send(Action::RefreshDone(ScreenId::Shop));
                });
            }

            Action::RefreshAdmin => {
                let portal = self.portal.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = portal.refresh_admin().await {
                        let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                    }
                    let _ = tx.send(Action::RefreshDone(ScreenId::Admin));
                });
            }

            Action::RefreshStock => {
                let portal = self.portal.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = portal.refresh_stock().await {
                        let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                    }
                    let _ = tx.send(Action::RefreshDone(ScreenId::Stock));
                });
            }

            Action::RefreshEsim(filter) => {
                let portal = self.portal.clone();
                let tx = self.action_tx.clone();
                let filter = *filter;
                tokio::spawn(async move {
                    if let Err(e) = portal.refresh_esim_requests(filter).await {
                        let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                    }
                    let _ = tx.send(Action::RefreshDone(ScreenId::Approvals));
                });
            }

            Action::SubmitPurchase {
                bundle_id,
                quantity,
            } => {
                let portal = self.portal.clone();
                let tx = self.action_tx.clone();
                let bundle_id = bundle_id.clone();
                let quantity = *quantity;
                tokio::spawn(async move {
                    match portal.purchase(&bundle_id, quantity).await {
                        Ok(outcome) => {
                            let message = outcome
                                .message
                                .unwrap_or_else(|| "Purchase complete".into());
                            let _ = tx.send(Action::PurchaseSucceeded(message));
                        }
                        Err(e) => {
                            let _ = tx.send(Action::PurchaseFailed(e.to_string()));
                        }
                    }
                });
            }

            Action::RequestConfirm(confirm) => {
                self.pending_confirm = Some(confirm.clone());
            }

            Action::ConfirmNo => self.pending_confirm = None,

            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.run_confirmed(confirm);
                }
            }

            Action::RejectEsim { id, reason } => {
                let portal = self.portal.clone();
                let tx = self.action_tx.clone();
                let id = id.clone();
                let reason = reason.clone();
                tokio::spawn(async move {
                    let result = portal
                        .reject_esim_request(&id, &reason, Some(EsimRequestStatus::Pending))
                        .await;
                    let notification = match result {
                        Ok(message) => Notification::success(
                            message.unwrap_or_else(|| "Request rejected".into()),
                        ),
                        Err(e) => Notification::error(e.to_string()),
                    };
                    let _ = tx.send(Action::Notify(notification));
                });
            }

            Action::Notify(notification) => self.notify(notification.clone()),
            Action::DismissNotification => self.notification = None,

            Action::ConnectionChanged(status) => self.connection = *status,

            _ => {}
        }

        // Screens see every action (data updates must reach inactive
        // screens too, so switching tabs shows current data).
        let mut follow_ups = Vec::new();
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                follow_ups.push(follow_up);
            }
        }
        for follow_up in follow_ups {
            self.action_tx.send(follow_up)?;
        }

        Ok(())
    }

    /// Route a session transition: signed-out lands on Login, signed-in
    /// lands on the role's home screen.
    fn route_session(&mut self, state: &SessionState) {
        match state {
            SessionState::Authenticated(session) => {
                let role = session.user.role;
                let was = self.role.replace(role);
                if was != Some(role) || self.active_screen == ScreenId::Login {
                    debug!(%role, "session authenticated, routing to home screen");
                    self.switch_screen(ScreenId::home_for(role));
                }
            }
            SessionState::Unauthenticated => {
                self.role = None;
                self.switch_screen(ScreenId::Login);
            }
            SessionState::Loading => {}
        }
    }

    /// Switch screens through the route guard. Wrong-role targets bounce
    /// to a neutral place instead of rendering forbidden data.
    fn switch_screen(&mut self, target: ScreenId) {
        let state = self.portal.session().state();
        let decision = match target.required_role() {
            Some(required) => guard::require_role(&state, required),
            None => GuardDecision::Allow,
        };

        let destination = match decision {
            GuardDecision::Allow => target,
            GuardDecision::Wait => return,
            GuardDecision::RedirectToLogin => ScreenId::Login,
            GuardDecision::RedirectToNeutral => {
                self.notify(Notification::warning(format!(
                    "{} requires the {} role",
                    target.label(),
                    target.required_role().map(|r| r.to_string()).unwrap_or_default()
                )));
                return;
            }
        };

        if let Some(previous) = self.screens.get_mut(&self.active_screen) {
            previous.set_focused(false);
        }
        self.active_screen = destination;
        if let Some(next) = self.screens.get_mut(&self.active_screen) {
            next.set_focused(true);
        }

        // Entering a data screen kicks off its refresh.
        let refresh = match destination {
            ScreenId::Shop => Some(Action::RefreshRetailer),
            ScreenId::Admin => Some(Action::RefreshAdmin),
            ScreenId::Stock => Some(Action::RefreshStock),
            ScreenId::Approvals => Some(Action::RefreshEsim(Some(EsimRequestStatus::Pending))),
            ScreenId::Login => None,
        };
        if let Some(refresh) = refresh {
            let _ = self.action_tx.send(refresh);
        }
    }

    /// Execute a confirmed admin action: mutate, then the portal
    /// re-fetches the affected list; the outcome lands as a toast.
    fn run_confirmed(&mut self, confirm: ConfirmAction) {
        let portal = self.portal.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let (label, result) = match confirm {
                ConfirmAction::ApproveUser { id, .. } => {
                    ("User approved", portal.approve_user(&id).await)
                }
                ConfirmAction::RejectUser { id, .. } => {
                    ("User rejected", portal.reject_user(&id).await)
                }
                ConfirmAction::SuspendUser { id, .. } => {
                    ("User suspended", portal.suspend_user(&id).await)
                }
                ConfirmAction::ActivateUser { id, .. } => {
                    ("User re-activated", portal.activate_user(&id).await)
                }
                ConfirmAction::DeleteUser { id, .. } => {
                    ("User deleted", portal.delete_user(&id).await)
                }
                ConfirmAction::ApproveEsim { id, .. } => (
                    "Request approved",
                    portal
                        .approve_esim_request(&id, Some(EsimRequestStatus::Pending))
                        .await,
                ),
            };

            let notification = match result {
                Ok(message) => Notification::success(message.unwrap_or_else(|| label.into())),
                Err(e) => Notification::error(e.to_string()),
            };
            let _ = tx.send(Action::Notify(notification));
        });
    }

    fn notify(&mut self, notification: Notification) {
        self.notification = Some((notification, Instant::now()));
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.render_header(frame, header);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, body);
        }

        self.render_footer(frame, footer);

        if let Some(ref confirm) = self.pending_confirm {
            self.render_confirm(frame, confirm);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let visible: Vec<ScreenId> = ScreenId::ALL
            .iter()
            .copied()
            .filter(|id| match (id.required_role(), self.role) {
                (Some(required), Some(role)) => required == role,
                (Some(_), None) => false,
                (None, _) => true,
            })
            .collect();

        if visible.is_empty() {
            let title = Paragraph::new(Line::from(Span::styled(" esimly", theme::title())));
            frame.render_widget(title, area);
            return;
        }

        let titles: Vec<Line> = visible
            .iter()
            .map(|id| Line::from(format!(" {id} ")))
            .collect();
        let selected = visible
            .iter()
            .position(|id| *id == self.active_screen)
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .select(selected)
            .highlight_style(theme::selected())
            .divider("│");
        frame.render_widget(tabs, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        if let Some((ref notification, _)) = self.notification {
            let style = match notification.level {
                NotificationLevel::Success => theme::success(),
                NotificationLevel::Warning => theme::warning(),
                NotificationLevel::Error => theme::error(),
                NotificationLevel::Info => Style::default(),
            };
            let toast = Paragraph::new(Line::from(Span::styled(
                format!(" {}", notification.message),
                style,
            )));
            frame.render_widget(toast, area);
            return;
        }

        let mut spans = vec![Span::styled(" q", theme::title()), Span::raw(" quit")];
        if self.connection == ConnectionStatus::Offline {
            spans.push(Span::styled("  ● backend unreachable", theme::error()));
        }
        if self.role.is_some() {
            spans.push(Span::styled("  L", theme::title()));
            spans.push(Span::raw(" sign out"));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_confirm(&self, frame: &mut Frame, confirm: &ConfirmAction) {
        let area = centered_rect(frame.area(), 50, 5);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Confirm ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::warning());
        let text = Paragraph::new(vec![
            Line::from(confirm.to_string()),
            Line::from(""),
            Line::from(Span::styled("[y] yes    [n] no", theme::muted())),
        ])
        .block(block)
        .centered();
        frame.render_widget(text, area);
    }
}

/// A centered rect of fixed size, clamped to the frame.
pub fn centered_rect(frame_area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(frame_area.width);
    let height = height.min(frame_area.height);
    Rect {
        x: frame_area.x + (frame_area.width - width) / 2,
        y: frame_area.y + (frame_area.height - height) / 2,
        width,
        height,
    }
}
