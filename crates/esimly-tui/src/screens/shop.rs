//! Retailer shop screen -- the credit/purchase dashboard.
//!
//! Price-filtered catalog grid, credit standing with usage gauge, the
//! server-derived credit-level ladder, and the purchase modal with its
//! clamped quantity picker. A purchase success shows an inline banner
//! that auto-dismisses; a failure stays inside the still-open modal so
//! the user can retry without re-selecting the bundle.

use std::sync::Arc;
use std::time::Instant;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState,
};
use tokio::sync::mpsc::UnboundedSender;

use esimly_core::model::{Bundle, CreditLevel, CreditStatus};
use esimly_core::portal::{LOADING_FAILSAFE, SUCCESS_BANNER_TTL};
use esimly_core::{PriceFilter, QuantityPicker, catalog};

use crate::action::Action;
use crate::app::centered_rect;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;

struct PurchaseModal {
    bundle: Arc<Bundle>,
    picker: QuantityPicker,
    /// Server failure shown inside the modal; retry keeps the state.
    error: Option<String>,
    submitting: bool,
}

pub struct ShopScreen {
    action_tx: Option<UnboundedSender<Action>>,
    focused: bool,
    bundles: Arc<Vec<Arc<Bundle>>>,
    credit: Option<Arc<CreditStatus>>,
    levels: Arc<Vec<CreditLevel>>,
    /// 0 = All, i = buckets[i-1].
    filter_idx: usize,
    buckets: Vec<f64>,
    filtered: Vec<Arc<Bundle>>,
    table_state: TableState,
    modal: Option<PurchaseModal>,
    success_banner: Option<(String, Instant)>,
    loading: bool,
    loading_since: Option<Instant>,
}

impl ShopScreen {
    pub fn new() -> Self {
        Self {
            action_tx: None,
            focused: false,
            bundles: Arc::new(Vec::new()),
            credit: None,
            levels: Arc::new(Vec::new()),
            filter_idx: 0,
            buckets: Vec::new(),
            filtered: Vec::new(),
            table_state: TableState::default(),
            modal: None,
            success_banner: None,
            loading: false,
            loading_since: None,
        }
    }

    fn active_filter(&self) -> PriceFilter {
        if self.filter_idx == 0 {
            PriceFilter::All
        } else {
            self.buckets
                .get(self.filter_idx - 1)
                .copied()
                .map_or(PriceFilter::All, PriceFilter::Exact)
        }
    }

    fn recompute(&mut self) {
        self.buckets = catalog::price_buckets(&self.bundles);
        if self.filter_idx > self.buckets.len() {
            self.filter_idx = 0;
        }
        self.filtered = catalog::filter_bundles(&self.bundles, self.active_filter());

        let len = self.filtered.len();
        let selected = self.table_state.selected().unwrap_or(0);
        self.table_state
            .select(if len == 0 { None } else { Some(selected.min(len - 1)) });
    }

    fn cycle_filter(&mut self, delta: isize) {
        let count = self.buckets.len() + 1;
        #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::as_conversions)]
        {
            let next = (self.filter_idx as isize + delta).rem_euclid(count as isize);
            self.filter_idx = next as usize;
        }
        self.filtered = catalog::filter_bundles(&self.bundles, self.active_filter());
        self.table_state
            .select(if self.filtered.is_empty() { None } else { Some(0) });
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.filtered.len();
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

    fn open_modal(&mut self) {
        let Some(selected) = self.table_state.selected() else {
            return;
        };
        let Some(bundle) = self.filtered.get(selected) else {
            return;
        };
        let blocked = self.credit.as_ref().is_some_and(|c| c.is_blocked);
        if blocked {
            return;
        }
        self.modal = Some(PurchaseModal {
            bundle: Arc::clone(bundle),
            picker: QuantityPicker::new(bundle.stock_quantity),
            error: None,
            submitting: false,
        });
    }

    fn start_refresh(&mut self) -> Option<Action> {
        self.loading = true;
        self.loading_since = Some(Instant::now());
        Some(Action::RefreshRetailer)
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Option<Action> {
        let modal = self.modal.as_mut()?;
        if modal.submitting {
            return None;
        }

        match key.code {
            KeyCode::Esc => {
                self.modal = None;
                None
            }
            KeyCode::Char('+') | KeyCode::Up | KeyCode::Right => {
                modal.picker.increment();
                None
            }
            KeyCode::Char('-') | KeyCode::Down | KeyCode::Left => {
                modal.picker.decrement();
                None
            }
            // Direct numeric input, clamped on every change.
            KeyCode::Char(c @ '0'..='9') => {
                let typed = modal.picker.quantity() * 10 + u32::from(c) - u32::from('0');
                modal.picker.set(typed);
                None
            }
            KeyCode::Backspace => {
                modal.picker.set(modal.picker.quantity() / 10);
                None
            }
            KeyCode::Enter => {
                if !modal.picker.can_submit() {
                    return None;
                }
                modal.submitting = true;
                modal.error = None;
                Some(Action::SubmitPurchase {
                    bundle_id: modal.bundle.id.clone(),
                    quantity: modal.picker.quantity(),
                })
            }
            _ => None,
        }
    }
}

impl Component for ShopScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn capturing(&self) -> bool {
        self.modal.is_some()
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.modal.is_some() {
            return Ok(self.handle_modal_key(key));
        }

        match key.code {
            KeyCode::Char('r') => Ok(self.start_refresh()),
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(-1);
                Ok(None)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(1);
                Ok(None)
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.cycle_filter(-1);
                Ok(None)
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.cycle_filter(1);
                Ok(None)
            }
            KeyCode::Enter => {
                self.open_modal();
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::BundlesUpdated(bundles) => {
                self.bundles = Arc::clone(bundles);
                self.recompute();
            }
            Action::CreditStatusUpdated(credit) => self.credit = credit.clone(),
            Action::CreditLevelsUpdated(levels) => self.levels = Arc::clone(levels),

            Action::RefreshRetailer => {
                if self.loading_since.is_none() {
                    self.loading = true;
                    self.loading_since = Some(Instant::now());
                }
            }
            Action::RefreshDone(ScreenId::Shop) => {
                self.loading = false;
                self.loading_since = None;
            }

            Action::PurchaseSucceeded(message) => {
                self.modal = None;
                self.success_banner = Some((message.clone(), Instant::now()));
            }
            Action::PurchaseFailed(message) => {
                if let Some(ref mut modal) = self.modal {
                    modal.error = Some(message.clone());
                    modal.submitting = false;
                }
            }

            Action::Tick => {
                // Success banner auto-dismisses.
                if let Some((_, shown_at)) = self.success_banner {
                    if shown_at.elapsed() > SUCCESS_BANNER_TTL {
                        self.success_banner = None;
                    }
                }
                // Loading failsafe: the indicator is bounded even when a
                // request hangs (the request itself is not aborted).
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

    #[allow(clippy::too_many_lines)]
    fn render(&self, frame: &mut Frame, area: Rect) {
        let [credit_area, banner_area, filter_area, main] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .areas(area);

        self.render_credit(frame, credit_area);

        if let Some((ref message, _)) = self.success_banner {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!(" ✓ {message}"),
                    theme::success(),
                ))),
                banner_area,
            );
        }

        self.render_filter_bar(frame, filter_area);

        let [catalog_area, ladder_area] =
            Layout::horizontal([Constraint::Min(40), Constraint::Length(28)]).areas(main);
        self.render_catalog(frame, catalog_area);
        self.render_ladder(frame, ladder_area);

        if let Some(ref modal) = self.modal {
            render_purchase_modal(frame, modal);
        }
    }
}

impl ShopScreen {
    fn render_credit(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(Span::styled(" Credit ", theme::title()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(ref credit) = self.credit else {
            let text = if self.loading {
                "loading…"
            } else {
                "credit status unavailable"
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(text, theme::muted()))),
                inner,
            );
            return;
        };

        let [line_area, gauge_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(inner);

        let mut spans = vec![
            Span::raw(format!(
                "limit R{:.2}   used R{:.2}   available R{:.2}",
                credit.credit_limit, credit.used_credit, credit.available_credit
            )),
        ];
        if let Some(ref level) = credit.current_level_name {
            spans.push(Span::styled(format!("   [{level}]"), theme::title()));
        }
        if credit.is_blocked {
            spans.push(Span::styled("   BLOCKED", theme::error()));
        } else if credit.needs_warning {
            spans.push(Span::styled("   near limit", theme::warning()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), line_area);

        let ratio = (credit.usage_percentage / 100.0).clamp(0.0, 1.0);
        let gauge_color = if credit.is_blocked || credit.needs_warning {
            theme::WARNING
        } else {
            theme::ACCENT
        };
        let gauge = Gauge::default()
            .ratio(ratio)
            .gauge_style(Style::default().fg(gauge_color))
            .label(format!("{:.1}% used", credit.usage_percentage));
        frame.render_widget(gauge, gauge_area);
    }

    fn render_filter_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(" price: ", theme::muted())];
        let all_style = if self.filter_idx == 0 {
            theme::selected()
        } else {
            Style::default()
        };
        spans.push(Span::styled(" All Bundles ", all_style));
        for (i, price) in self.buckets.iter().enumerate() {
            let style = if self.filter_idx == i + 1 {
                theme::selected()
            } else {
                Style::default()
            };
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!(" R{price:.0} "), style));
        }
        if self.loading {
            spans.push(Span::styled("  refreshing…", theme::muted()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_catalog(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(Span::styled(" Bundles ", theme::title()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);

        if self.filtered.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let text = if self.loading {
                "loading…"
            } else {
                "no bundles in this price bucket"
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(text, theme::muted()))),
                inner,
            );
            return;
        }

        let header = Row::new(vec!["Name", "Type", "Price", "Stock", "Sold"])
            .style(theme::muted())
            .height(1);
        let rows = self.filtered.iter().map(|b| {
            let stock_style = if b.stock_quantity == 0 {
                theme::error()
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(b.name.clone()),
                Cell::from(b.product_type.to_string()),
                Cell::from(format!("R{:.2}", b.base_price)),
                Cell::from(Span::styled(b.stock_quantity.to_string(), stock_style)),
                Cell::from(b.sold_quantity.to_string()),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Min(24),
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(7),
                Constraint::Length(7),
            ],
        )
        .header(header)
        .row_highlight_style(theme::selected())
        .block(block);

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_ladder(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(Span::styled(" Credit levels ", theme::title()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Entirely server-derived: which rung is current, which are
        // still locked. No tier arithmetic happens here.
        let lines: Vec<Line> = self
            .levels
            .iter()
            .map(|level| {
                let marker = if level.is_current_level { "● " } else { "  " };
                let style = if level.is_current_level {
                    theme::success()
                } else if level.is_available {
                    Style::default()
                } else {
                    theme::muted()
                };
                let limit = level
                    .credit_limit
                    .map(|l| format!("  R{l:.0}"))
                    .unwrap_or_default();
                let lock = if level.is_available { "" } else { " (locked)" };
                Line::from(Span::styled(
                    format!("{marker}{}{limit}{lock}", level.name),
                    style,
                ))
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn render_purchase_modal(frame: &mut Frame, modal: &PurchaseModal) {
    let area = centered_rect(frame.area(), 52, 10);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(" Purchase ", theme::title()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::title());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let picker = &modal.picker;
    let total = modal.bundle.base_price * f64::from(picker.quantity());

    let mut lines = vec![
        Line::from(Span::styled(modal.bundle.name.clone(), theme::title())),
        Line::from(format!(
            "unit R{:.2}   stock {}",
            modal.bundle.base_price,
            picker.stock()
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("quantity:  "),
            Span::styled("[-] ", theme::muted()),
            Span::styled(format!(" {} ", picker.quantity()), theme::selected()),
            Span::styled(" [+]", theme::muted()),
            Span::raw(format!("   total R{total:.2}")),
        ]),
        Line::from(""),
    ];

    if let Some(ref error) = modal.error {
        lines.push(Line::from(Span::styled(error.clone(), theme::error())));
    } else if modal.submitting {
        lines.push(Line::from(Span::styled("purchasing…", theme::muted())));
    } else if picker.can_submit() {
        lines.push(Line::from(Span::styled(
            "[enter] confirm   [esc] cancel",
            theme::muted(),
        )));
    } else {
        lines.push(Line::from(Span::styled("out of stock", theme::error())));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
