//! eSIM approvals screen -- status-filtered queue with approve (behind
//! a confirmation) and reject (requires a non-blank free-text reason
//! entered in a modal).

use std::sync::Arc;
use std::time::Instant;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs,
};
use tokio::sync::mpsc::UnboundedSender;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use esimly_core::model::{EsimRequest, EsimRequestStatus};
use esimly_core::portal::LOADING_FAILSAFE;
use esimly_core::validate;

use crate::action::{Action, ConfirmAction};
use crate::app::centered_rect;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;

struct RejectModal {
    request_id: String,
    customer: String,
    reason: Input,
    /// Validation message when the reason is blank.
    error: Option<String>,
}

pub struct ApprovalsScreen {
    action_tx: Option<UnboundedSender<Action>>,
    status_tab: EsimRequestStatus,
    requests: Arc<Vec<Arc<EsimRequest>>>,
    table_state: TableState,
    reject_modal: Option<RejectModal>,
    loading: bool,
    loading_since: Option<Instant>,
}

const TABS: [EsimRequestStatus; 3] = [
    EsimRequestStatus::Pending,
    EsimRequestStatus::Approved,
    EsimRequestStatus::Rejected,
];

impl ApprovalsScreen {
    pub fn new() -> Self {
        Self {
            action_tx: None,
            status_tab: EsimRequestStatus::Pending,
            requests: Arc::new(Vec::new()),
            table_state: TableState::default(),
            reject_modal: None,
            loading: false,
            loading_since: None,
        }
    }

    fn cycle_tab(&mut self, delta: isize) -> Action {
        let idx = TABS
            .iter()
            .position(|&t| t == self.status_tab)
            .unwrap_or(0);
        #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::as_conversions)]
        {
            let next = (idx as isize + delta).rem_euclid(TABS.len() as isize) as usize;
            self.status_tab = TABS[next];
        }
        self.table_state.select(None);
        self.loading = true;
        self.loading_since = Some(Instant::now());
        // Each tab switch re-fetches that filter's list from the server.
        Action::RefreshEsim(Some(self.status_tab))
    }

    fn selected_request(&self) -> Option<&Arc<EsimRequest>> {
        self.requests.get(self.table_state.selected()?)
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.requests.len();
        if len == 0 {
            return;
        }
        #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::as_conversions)]
        {
            let current = self.table_state.selected().unwrap_or(0) as isize;
            let next = (current + delta).clamp(0, len as isize - 1);
            self.table_state.select(Some(next as usize));
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Option<Action> {
        let modal = self.reject_modal.as_mut()?;

        match key.code {
            KeyCode::Esc => {
                self.reject_modal = None;
                None
            }
            KeyCode::Enter => {
                let reason = modal.reason.value().to_owned();
                // Blank or whitespace-only reasons never leave the modal,
                // and never reach the reject endpoint.
                if let Err(e) = validate::rejection_reason(&reason) {
                    modal.error = Some(e.to_string());
                    return None;
                }
                let action = Action::RejectEsim {
                    id: modal.request_id.clone(),
                    reason,
                };
                self.reject_modal = None;
                Some(action)
            }
            _ => {
                modal.reason.handle_event(&crossterm::event::Event::Key(key));
                modal.error = None;
                None
            }
        }
    }
}

impl Component for ApprovalsScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn capturing(&self) -> bool {
        self.reject_modal.is_some()
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.reject_modal.is_some() {
            return Ok(self.handle_modal_key(key));
        }

        match key.code {
            KeyCode::Tab | KeyCode::Char(']') => Ok(Some(self.cycle_tab(1))),
            KeyCode::BackTab | KeyCode::Char('[') => Ok(Some(self.cycle_tab(-1))),
            KeyCode::Char('r') => {
                self.loading = true;
                self.loading_since = Some(Instant::now());
                Ok(Some(Action::RefreshEsim(Some(self.status_tab))))
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(-1);
                Ok(None)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(1);
                Ok(None)
            }
            KeyCode::Char('a') if self.status_tab == EsimRequestStatus::Pending => {
                let action = self.selected_request().map(|r| {
                    Action::RequestConfirm(ConfirmAction::ApproveEsim {
                        id: r.id.clone(),
                        customer: r
                            .customer_full_name
                            .clone()
                            .unwrap_or_else(|| r.id.clone()),
                    })
                });
                Ok(action)
            }
            KeyCode::Char('x') if self.status_tab == EsimRequestStatus::Pending => {
                if let Some(request) = self.selected_request() {
                    self.reject_modal = Some(RejectModal {
                        request_id: request.id.clone(),
                        customer: request
                            .customer_full_name
                            .clone()
                            .unwrap_or_else(|| request.id.clone()),
                        reason: Input::default(),
                        error: None,
                    });
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::EsimRequestsUpdated(requests) => {
                self.requests = Arc::clone(requests);
                let len = self.requests.len();
                if len == 0 {
                    self.table_state.select(None);
                } else if self.table_state.selected().is_none() {
                    self.table_state.select(Some(0));
                }
            }
            Action::RefreshDone(ScreenId::Approvals) => {
                self.loading = false;
                self.loading_since = None;
            }
            Action::Tick => {
                if let Some(since) = self.loading_since {
                    if since.elapsed() > LOADING_FAILSAFE {
                        self.loading = false;
                        self.loading_since = None;
                    }
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [tabs_area, body] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).areas(area);

        let titles: Vec<Line> = TABS
            .iter()
            .map(|t| Line::from(format!(" {t} ")))
            .collect();
        let selected = TABS
            .iter()
            .position(|&t| t == self.status_tab)
            .unwrap_or(0);
        frame.render_widget(
            Tabs::new(titles)
                .select(selected)
                .highlight_style(theme::selected())
                .divider("·"),
            tabs_area,
        );

        self.render_queue(frame, body);

        if let Some(ref modal) = self.reject_modal {
            render_reject_modal(frame, modal);
        }
    }
}

impl ApprovalsScreen {
    fn render_queue(&self, frame: &mut Frame, area: Rect) {
        let hint = match self.status_tab {
            EsimRequestStatus::Pending => "[a]pprove  [x] reject  [r] refresh",
            _ => "[r] refresh",
        };
        let title = if self.loading {
            format!(" {} (refreshing…) ", self.status_tab)
        } else {
            format!(" {}  {hint} ", self.status_tab)
        };
        let block = Block::default()
            .title(Span::styled(title, theme::title()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);

        if self.requests.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!("no {} requests", self.status_tab.to_string().to_lowercase()),
                    theme::muted(),
                ))),
                inner,
            );
            return;
        }

        let header = Row::new(vec!["Customer", "Email", "ID", "Serial", "Reason"])
            .style(theme::muted());
        let rows = self.requests.iter().map(|r| {
            Row::new(vec![
                Cell::from(r.customer_full_name.clone().unwrap_or_default()),
                Cell::from(r.customer_email.clone().unwrap_or_default()),
                Cell::from(format!(
                    "{} {}",
                    r.id_type.clone().unwrap_or_default(),
                    r.id_number.clone().unwrap_or_default()
                )),
                Cell::from(r.assigned_esim_serial.clone().unwrap_or_default()),
                Cell::from(r.rejection_reason.clone().unwrap_or_default()),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Min(18),
                Constraint::Min(22),
                Constraint::Min(14),
                Constraint::Length(14),
                Constraint::Min(12),
            ],
        )
        .header(header)
        .row_highlight_style(theme::selected())
        .block(block);

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }
}

fn render_reject_modal(frame: &mut Frame, modal: &RejectModal) {
    let area = centered_rect(frame.area(), 56, 8);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(" Reject request ", theme::title()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::error());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(format!("Rejecting eSIM request for {}", modal.customer)),
        Line::from(""),
        Line::from(vec![
            Span::styled("reason: ", theme::muted()),
            Span::raw(modal.reason.value().to_owned()),
            Span::styled("█", theme::title()),
        ]),
        Line::from(""),
    ];
    if let Some(ref error) = modal.error {
        lines.push(Line::from(Span::styled(error.clone(), theme::error())));
    } else {
        lines.push(Line::from(Span::styled(
            "[enter] reject   [esc] cancel",
            theme::muted(),
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}
