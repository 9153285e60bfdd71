//! Stock screen -- pool table, per-pool item drill-down, and the
//! activation-QR view for eSIM items.

use std::sync::Arc;
use std::time::Instant;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState,
};
use tokio::sync::mpsc::UnboundedSender;

use esimly_core::activation;
use esimly_core::model::{ItemStatus, StockItem, StockPool, StockType};
use esimly_core::portal::LOADING_FAILSAFE;

use crate::action::Action;
use crate::app::centered_rect;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;

#[derive(Default)]
enum View {
    #[default]
    Pools,
    Items {
        pool_id: String,
    },
}

pub struct StockScreen {
    action_tx: Option<UnboundedSender<Action>>,
    storefront_origin: String,
    pools: Arc<Vec<Arc<StockPool>>>,
    items: Arc<Vec<Arc<StockItem>>>,
    view: View,
    pool_table: TableState,
    item_table: TableState,
    /// QR overlay for the selected eSIM item: (serial, rendered QR, url).
    qr: Option<(String, String, String)>,
    loading: bool,
    loading_since: Option<Instant>,
}

impl StockScreen {
    pub fn new(storefront_origin: String) -> Self {
        Self {
            action_tx: None,
            storefront_origin,
            pools: Arc::new(Vec::new()),
            items: Arc::new(Vec::new()),
            view: View::default(),
            pool_table: TableState::default(),
            item_table: TableState::default(),
            qr: None,
            loading: false,
            loading_since: None,
        }
    }

    fn visible_items(&self) -> Vec<Arc<StockItem>> {
        match self.view {
            View::Pools => Vec::new(),
            View::Items { ref pool_id } => self
                .items
                .iter()
                .filter(|i| i.pool_id.as_deref() == Some(pool_id.as_str()))
                .cloned()
                .collect(),
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let (state, len) = match self.view {
            View::Pools => (&mut self.pool_table, self.pools.len()),
            View::Items { .. } => {
                let len = match self.view {
                    View::Items { ref pool_id } => self
                        .items
                        .iter()
                        .filter(|i| i.pool_id.as_deref() == Some(pool_id.as_str()))
                        .count(),
                    View::Pools => 0,
                };
                (&mut self.item_table, len)
            }
        };
        if len == 0 {
            return;
        }
        #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::as_conversions)]
        {
            let current = state.selected().unwrap_or(0) as isize;
            let next = (current + delta).clamp(0, len as isize - 1);
            state.select(Some(next as usize));
        }
    }

    /// Open the QR overlay for the selected eSIM item. The activation
    /// URL is a pure function of the item -- reproducible for any QR
    /// already in print.
    fn open_qr(&mut self) {
        let items = self.visible_items();
        let Some(item) = self.item_table.selected().and_then(|i| items.get(i)) else {
            return;
        };
        let (Some(code), Some(serial)) = (&item.item_data, &item.serial_number) else {
            return;
        };

        let url = activation::activation_url(&self.storefront_origin, code, serial);
        if let Ok(qr) = activation::activation_qr_text(&url) {
            self.qr = Some((serial.clone(), qr, url));
        }
    }
}

impl Component for StockScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.qr.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.qr = None;
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('r') => {
                self.loading = true;
                self.loading_since = Some(Instant::now());
                Ok(Some(Action::RefreshStock))
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(-1);
                Ok(None)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(1);
                Ok(None)
            }
            KeyCode::Enter => {
                match self.view {
                    View::Pools => {
                        if let Some(pool) = self
                            .pool_table
                            .selected()
                            .and_then(|i| self.pools.get(i))
                        {
                            self.view = View::Items {
                                pool_id: pool.id.clone(),
                            };
                            self.item_table.select(Some(0));
                        }
                    }
                    View::Items { .. } => self.open_qr(),
                }
                Ok(None)
            }
            KeyCode::Esc => {
                self.view = View::Pools;
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::StockPoolsUpdated(pools) => {
                self.pools = Arc::clone(pools);
                if self.pool_table.selected().is_none() && !self.pools.is_empty() {
                    self.pool_table.select(Some(0));
                }
            }
            Action::StockItemsUpdated(items) => self.items = Arc::clone(items),
            Action::RefreshStock => {
                if self.loading_since.is_none() {
                    self.loading = true;
                    self.loading_since = Some(Instant::now());
                }
            }
            Action::RefreshDone(ScreenId::Stock) => {
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
        match self.view {
            View::Pools => self.render_pools(frame, area),
            View::Items { .. } => self.render_items(frame, area),
        }

        if let Some((ref serial, ref qr, ref url)) = self.qr {
            render_qr_overlay(frame, serial, qr, url);
        }
    }
}

impl StockScreen {
    fn render_pools(&self, frame: &mut Frame, area: Rect) {
        let title = if self.loading {
            " Stock pools (refreshing…) "
        } else {
            " Stock pools  [enter] items  [r] refresh "
        };
        let block = Block::default()
            .title(Span::styled(title, theme::title()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);

        if self.pools.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled("no stock pools", theme::muted()))),
                inner,
            );
            return;
        }

        let header = Row::new(vec!["Name", "Type", "Total", "Available", "Used", "Reserved"])
            .style(theme::muted());
        let rows = self.pools.iter().map(|p| {
            Row::new(vec![
                Cell::from(p.name.clone()),
                Cell::from(p.stock_type.to_string()),
                Cell::from(p.total_quantity.to_string()),
                Cell::from(p.available_quantity.to_string()),
                Cell::from(p.used_quantity.to_string()),
                Cell::from(p.reserved_quantity.to_string()),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Min(24),
                Constraint::Length(6),
                Constraint::Length(7),
                Constraint::Length(10),
                Constraint::Length(6),
                Constraint::Length(9),
            ],
        )
        .header(header)
        .row_highlight_style(theme::selected())
        .block(block);

        let mut state = self.pool_table.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_items(&self, frame: &mut Frame, area: Rect) {
        let pool_name = match self.view {
            View::Items { ref pool_id } => self
                .pools
                .iter()
                .find(|p| &p.id == pool_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| pool_id.clone()),
            View::Pools => String::new(),
        };
        let is_esim = match self.view {
            View::Items { ref pool_id } => self
                .pools
                .iter()
                .find(|p| &p.id == pool_id)
                .is_some_and(|p| p.stock_type == StockType::Esim),
            View::Pools => false,
        };

        let hint = if is_esim {
            "[enter] QR  [esc] back"
        } else {
            "[esc] back"
        };
        let block = Block::default()
            .title(Span::styled(
                format!(" {pool_name}  {hint} "),
                theme::title(),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);

        let items = self.visible_items();
        if items.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "no items in this pool",
                    theme::muted(),
                ))),
                inner,
            );
            return;
        }

        let header = Row::new(vec!["Serial", "Status", "Price", "Notes"]).style(theme::muted());
        let rows = items.iter().map(|i| {
            let status_style = match i.status {
                ItemStatus::Available => theme::success(),
                ItemStatus::Assigned => theme::warning(),
                ItemStatus::Used => theme::muted(),
            };
            Row::new(vec![
                Cell::from(i.serial_number.clone().unwrap_or_default()),
                Cell::from(Span::styled(i.status.to_string(), status_style)),
                Cell::from(i.price.map(|p| format!("R{p:.2}")).unwrap_or_default()),
                Cell::from(i.notes.clone().unwrap_or_default()),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Min(18),
                Constraint::Length(10),
                Constraint::Length(9),
                Constraint::Min(12),
            ],
        )
        .header(header)
        .row_highlight_style(theme::selected())
        .block(block);

        let mut state = self.item_table.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }
}

fn render_qr_overlay(frame: &mut Frame, serial: &str, qr: &str, url: &str) {
    let qr_lines: Vec<&str> = qr.lines().collect();
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    let height = (qr_lines.len() as u16).saturating_add(4);
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    let width = qr_lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(url.len() + 2) as u16
        + 4;

    let area = centered_rect(frame.area(), width, height);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(
            format!(" eSIM activation · {serial} "),
            theme::title(),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = qr_lines.iter().map(|l| Line::from((*l).to_owned())).collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(url.to_owned(), theme::muted())));
    frame.render_widget(Paragraph::new(lines).centered(), inner);
}
