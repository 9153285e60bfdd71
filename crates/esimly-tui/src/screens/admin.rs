//! Admin screen -- tabbed back-office shell.
//!
//! Sub-tabs: overview (derived statistics with the catalog → CSV-stock
//! fallback), users (lifecycle actions behind confirmations), business
//! registrations, and enquiries. A failed connectivity probe renders an
//! explicit offline banner instead of misleading empty tables.

use std::sync::Arc;
use std::time::Instant;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Tabs};
use tokio::sync::mpsc::UnboundedSender;

use esimly_core::model::{BusinessRegistration, Bundle, Enquiry, StockItem, User, UserStatus};
use esimly_core::portal::LOADING_FAILSAFE;
use esimly_core::{ConnectionStatus, stats};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SubTab {
    #[default]
    Overview,
    Users,
    Registrations,
    Enquiries,
}

impl SubTab {
    const ALL: [SubTab; 4] = [
        Self::Overview,
        Self::Users,
        Self::Registrations,
        Self::Enquiries,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Users => "Users",
            Self::Registrations => "Registrations",
            Self::Enquiries => "Enquiries",
        }
    }

    fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

pub struct AdminScreen {
    action_tx: Option<UnboundedSender<Action>>,
    sub_tab: SubTab,
    users: Arc<Vec<Arc<User>>>,
    registrations: Arc<Vec<Arc<BusinessRegistration>>>,
    enquiries: Arc<Vec<Arc<Enquiry>>>,
    bundles: Arc<Vec<Arc<Bundle>>>,
    stock_items: Arc<Vec<Arc<StockItem>>>,
    connection: ConnectionStatus,
    user_table: TableState,
    loading: bool,
    loading_since: Option<Instant>,
}

impl AdminScreen {
    pub fn new() -> Self {
        Self {
            action_tx: None,
            sub_tab: SubTab::default(),
            users: Arc::new(Vec::new()),
            registrations: Arc::new(Vec::new()),
            enquiries: Arc::new(Vec::new()),
            bundles: Arc::new(Vec::new()),
            stock_items: Arc::new(Vec::new()),
            connection: ConnectionStatus::Unknown,
            user_table: TableState::default(),
            loading: false,
            loading_since: None,
        }
    }

    fn selected_user(&self) -> Option<&Arc<User>> {
        self.users.get(self.user_table.selected()?)
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.users.len();
        if len == 0 {
            return;
        }
        #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::as_conversions)]
        {
            let current = self.user_table.selected().unwrap_or(0) as isize;
            let next = (current + delta).clamp(0, len as isize - 1);
            self.user_table.select(Some(next as usize));
        }
    }

    /// Map a user-action key to a confirmation request. Every mutation
    /// passes through the confirm dialog; success/failure arrives as a
    /// toast and the list is re-fetched by the portal.
    fn user_action(&self, key: char) -> Option<Action> {
        let user = self.selected_user()?;
        let id = user.id.clone();
        let name = user.display_name();
        let confirm = match key {
            'a' if user.status == UserStatus::Pending => ConfirmAction::ApproveUser { id, name },
            'x' if user.status == UserStatus::Pending => ConfirmAction::RejectUser { id, name },
            's' if user.status == UserStatus::Active => ConfirmAction::SuspendUser { id, name },
            'v' if user.status == UserStatus::Suspended => {
                ConfirmAction::ActivateUser { id, name }
            }
            'd' => ConfirmAction::DeleteUser { id, name },
            _ => return None,
        };
        Some(Action::RequestConfirm(confirm))
    }
}

impl Component for AdminScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Tab | KeyCode::Char(']') => {
                self.sub_tab = self.sub_tab.next();
                Ok(None)
            }
            KeyCode::BackTab | KeyCode::Char('[') => {
                self.sub_tab = self.sub_tab.prev();
                Ok(None)
            }
            KeyCode::Char('r') => {
                self.loading = true;
                self.loading_since = Some(Instant::now());
                Ok(Some(Action::RefreshAdmin))
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(-1);
                Ok(None)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(1);
                Ok(None)
            }
            KeyCode::Char(c @ ('a' | 'x' | 's' | 'v' | 'd')) if self.sub_tab == SubTab::Users => {
                Ok(self.user_action(c))
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::UsersUpdated(users) => {
                self.users = Arc::clone(users);
                if self.user_table.selected().is_none() && !self.users.is_empty() {
                    self.user_table.select(Some(0));
                }
            }
            Action::RegistrationsUpdated(r) => self.registrations = Arc::clone(r),
            Action::EnquiriesUpdated(e) => self.enquiries = Arc::clone(e),
            Action::BundlesUpdated(b) => self.bundles = Arc::clone(b),
            Action::StockItemsUpdated(items) => self.stock_items = Arc::clone(items),
            Action::ConnectionChanged(status) => self.connection = *status,
            Action::RefreshAdmin => {
                if self.loading_since.is_none() {
                    self.loading = true;
                    self.loading_since = Some(Instant::now());
                }
            }
            Action::RefreshDone(ScreenId::Admin) => {
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
        let [tabs_area, banner_area, body] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .areas(area);

        let titles: Vec<Line> = SubTab::ALL
            .iter()
            .map(|t| Line::from(format!(" {} ", t.label())))
            .collect();
        let selected = SubTab::ALL
            .iter()
            .position(|&t| t == self.sub_tab)
            .unwrap_or(0);
        frame.render_widget(
            Tabs::new(titles)
                .select(selected)
                .highlight_style(theme::selected())
                .divider("·"),
            tabs_area,
        );

        if self.connection == ConnectionStatus::Offline {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    " backend unreachable -- showing empty data, press r to retry",
                    theme::error(),
                ))),
                banner_area,
            );
        } else if self.loading {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(" refreshing…", theme::muted()))),
                banner_area,
            );
        }

        match self.sub_tab {
            SubTab::Overview => self.render_overview(frame, body),
            SubTab::Users => self.render_users(frame, body),
            SubTab::Registrations => self.render_registrations(frame, body),
            SubTab::Enquiries => self.render_enquiries(frame, body),
        }
    }
}

impl AdminScreen {
    fn render_overview(&self, frame: &mut Frame, area: Rect) {
        let block = bordered(" Overview ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Catalog first; CSV stock items when the catalog is empty.
        let figures = stats::overview_statistics(&self.bundles, &self.stock_items);

        let lines = vec![
            Line::from(format!("Total bundles:   {}", figures.total_bundles)),
            Line::from(format!("Active bundles:  {}", figures.active_bundles)),
            Line::from(format!("Units sold:      {}", figures.total_units_sold)),
            Line::from(format!("Revenue:         R{:.2}", figures.total_revenue)),
            Line::from(""),
            Line::from(format!("Users:           {}", self.users.len())),
            Line::from(format!("Registrations:   {}", self.registrations.len())),
            Line::from(format!("Open enquiries:  {}", self.enquiries.len())),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_users(&self, frame: &mut Frame, area: Rect) {
        let block = bordered(" Users  [a]pprove [x]reject [s]uspend [v]activate [d]elete ");

        if self.users.is_empty() {
            render_empty(frame, area, block, "no users");
            return;
        }

        let header = Row::new(vec!["Name", "Email", "Role", "Status"])
            .style(theme::muted())
            .height(1);
        let rows = self.users.iter().map(|u| {
            let status_style = match u.status {
                UserStatus::Active => theme::success(),
                UserStatus::Pending => theme::warning(),
                UserStatus::Suspended | UserStatus::Rejected => theme::error(),
            };
            Row::new(vec![
                Cell::from(u.display_name()),
                Cell::from(u.email.clone()),
                Cell::from(u.role.to_string()),
                Cell::from(Span::styled(u.status.to_string(), status_style)),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Min(20),
                Constraint::Min(24),
                Constraint::Length(10),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .row_highlight_style(theme::selected())
        .block(block);

        let mut state = self.user_table.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_registrations(&self, frame: &mut Frame, area: Rect) {
        let block = bordered(" Business registrations ");
        if self.registrations.is_empty() {
            render_empty(frame, area, block, "no pending registrations");
            return;
        }

        let rows = self.registrations.iter().map(|r| {
            Row::new(vec![
                Cell::from(r.business_name.clone().unwrap_or_default()),
                Cell::from(r.contact_name.clone().unwrap_or_default()),
                Cell::from(r.email.clone()),
                Cell::from(r.status.clone().unwrap_or_default()),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Min(20),
                Constraint::Min(16),
                Constraint::Min(24),
                Constraint::Length(10),
            ],
        )
        .header(
            Row::new(vec!["Business", "Contact", "Email", "Status"]).style(theme::muted()),
        )
        .block(block);
        frame.render_widget(table, area);
    }

    fn render_enquiries(&self, frame: &mut Frame, area: Rect) {
        let block = bordered(" Enquiries ");
        if self.enquiries.is_empty() {
            render_empty(frame, area, block, "no enquiries");
            return;
        }

        let rows = self.enquiries.iter().map(|e| {
            Row::new(vec![
                Cell::from(e.name.clone().unwrap_or_else(|| e.email.clone())),
                Cell::from(e.subject.clone().unwrap_or_default()),
                Cell::from(
                    e.created_at
                        .map(|t| t.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                ),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Min(20),
                Constraint::Min(30),
                Constraint::Length(12),
            ],
        )
        .header(Row::new(vec!["From", "Subject", "Date"]).style(theme::muted()))
        .block(block);
        frame.render_widget(table, area);
    }
}

fn bordered(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(title.to_owned(), theme::title()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
}

fn render_empty(frame: &mut Frame, area: Rect, block: Block<'_>, message: &str) {
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            message.to_owned(),
            theme::muted(),
        ))),
        inner,
    );
}
