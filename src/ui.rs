use crate::client::AppSnapshot;
use color_eyre::eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use itertools::Itertools;
use ratatui::prelude::*;
use ratatui::widgets::*;
use rollbox::rarity::Rarity;
use rollbox::shop::ShopItem;
use std::io::stdout;
use tokio::sync::mpsc;
use unicode_width::UnicodeWidthStr;

pub enum UserEvent {
    Quit,
    Roll,
    Sell { rarity: Rarity, amount: u64 },
    Purchase(ShopItem),
    Redraw,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum Screen {
    #[default]
    Home,
    Inventory,
    Shop,
}

#[derive(Debug)]
pub struct UiState {
    screen: Screen,
    terminal: Option<Terminal<CrosstermBackend<std::io::Stdout>>>,
    // cache of the sellable rows currently on screen, rarest first
    owned: Vec<(Rarity, u64)>,
    sell_idx: usize,
    sell_amount: u64,
    shop_idx: usize,
    roll_flash: u8,
    last_total_rolls: u64,
}

impl Default for UiState {
    fn default() -> Self {
        UiState {
            screen: Screen::Home,
            terminal: None,
            owned: Vec::new(),
            sell_idx: 0,
            sell_amount: 1,
            shop_idx: 0,
            roll_flash: 0,
            last_total_rolls: 0,
        }
    }
}

impl UiState {
    /// Decay the just-rolled highlight; driven by the host's one-second tick.
    pub fn tick_flash(&mut self) {
        self.roll_flash = self.roll_flash.saturating_sub(1);
    }
}

pub type InputEvents = mpsc::UnboundedReceiver<Event>;

/// Pump crossterm events from a dedicated thread into a channel so the
/// event loop can select over input and the cooldown ticker at once.
pub fn input_event_stream() -> InputEvents {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
    rx
}

pub fn terminal_enter(state: &mut UiState) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    // Create a single persistent Terminal to preserve buffers across draws
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    state.terminal = Some(terminal);
    Ok(())
}

pub fn terminal_exit() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::event::DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    Ok(())
}

pub fn draw(state: &mut UiState, snap: &AppSnapshot) -> Result<()> {
    state.owned = snap.inventory.clone();
    if state.sell_idx >= state.owned.len() {
        state.sell_idx = state.owned.len().saturating_sub(1);
    }
    if snap.total_rolls != state.last_total_rolls {
        state.last_total_rolls = snap.total_rolls;
        state.roll_flash = 1;
    }
    if let Some(mut term) = state.terminal.take() {
        term.draw(|f| ui(f, state, snap))?;
        state.terminal = Some(term);
    }
    Ok(())
}

pub async fn next_event(state: &mut UiState, input: &mut InputEvents) -> Result<UserEvent> {
    loop {
        let Some(ev) = input.recv().await else {
            return Ok(UserEvent::Quit);
        };
        let Event::Key(k) = ev else { continue };
        if k.kind != KeyEventKind::Press {
            continue;
        }
        if let KeyCode::Char('q') = k.code {
            return Ok(UserEvent::Quit);
        }
        match state.screen {
            Screen::Home => {
                return Ok(match k.code {
                    KeyCode::Char('r') => UserEvent::Roll,
                    KeyCode::Char('i') => {
                        state.screen = Screen::Inventory;
                        state.sell_amount = 1;
                        UserEvent::Redraw
                    }
                    KeyCode::Char('s') => {
                        state.screen = Screen::Shop;
                        UserEvent::Redraw
                    }
                    _ => continue,
                });
            }
            Screen::Inventory => {
                return Ok(match k.code {
                    KeyCode::Esc | KeyCode::Char('h') => {
                        state.screen = Screen::Home;
                        UserEvent::Redraw
                    }
                    KeyCode::Char('r') => UserEvent::Roll,
                    KeyCode::Up => {
                        if state.sell_idx > 0 {
                            state.sell_idx -= 1;
                            state.sell_amount = 1;
                        }
                        UserEvent::Redraw
                    }
                    KeyCode::Down => {
                        let max = state.owned.len().saturating_sub(1);
                        if state.sell_idx < max {
                            state.sell_idx += 1;
                            state.sell_amount = 1;
                        }
                        UserEvent::Redraw
                    }
                    KeyCode::Char('+') => {
                        state.sell_amount = state.sell_amount.saturating_add(1);
                        UserEvent::Redraw
                    }
                    KeyCode::Char('-') => {
                        state.sell_amount = state.sell_amount.saturating_sub(1);
                        UserEvent::Redraw
                    }
                    KeyCode::Backspace => {
                        state.sell_amount /= 10;
                        UserEvent::Redraw
                    }
                    KeyCode::Char(c) if c.is_ascii_digit() => {
                        let d = u64::from(c.to_digit(10).unwrap_or(0));
                        state.sell_amount = state.sell_amount.saturating_mul(10).saturating_add(d);
                        UserEvent::Redraw
                    }
                    KeyCode::Enter => {
                        if let Some((rarity, _)) = state.owned.get(state.sell_idx).copied() {
                            // an emptied amount field sells one, not zero
                            let amount = state.sell_amount.max(1);
                            state.sell_amount = 1;
                            UserEvent::Sell { rarity, amount }
                        } else {
                            UserEvent::Redraw
                        }
                    }
                    _ => continue,
                });
            }
            Screen::Shop => {
                return Ok(match k.code {
                    KeyCode::Esc | KeyCode::Char('h') => {
                        state.screen = Screen::Home;
                        UserEvent::Redraw
                    }
                    KeyCode::Char('r') => UserEvent::Roll,
                    KeyCode::Up => {
                        if state.shop_idx > 0 {
                            state.shop_idx -= 1;
                        }
                        UserEvent::Redraw
                    }
                    KeyCode::Down => {
                        state.shop_idx = (state.shop_idx + 1).min(ShopItem::ALL.len() - 1);
                        UserEvent::Redraw
                    }
                    KeyCode::Enter => match ShopItem::ALL.get(state.shop_idx) {
                        Some(item) => UserEvent::Purchase(*item),
                        None => UserEvent::Redraw,
                    },
                    _ => continue,
                });
            }
        }
    }
}

fn ui(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    // Clear the whole frame to avoid leftover fragments
    f.render_widget(Clear, f.area());
    match state.screen {
        Screen::Home => draw_home(f, state, snap),
        Screen::Inventory => draw_inventory(f, state, snap),
        Screen::Shop => draw_shop(f, state, snap),
    }
}

fn draw_status(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let cooldown = if snap.cooldown_secs > 0 {
        format!("{}s", snap.cooldown_secs)
    } else {
        String::from("ready")
    };
    let mut badges: Vec<String> = Vec::new();
    if snap.boosts.luck_rolls > 0 {
        badges.push(format!("Luck Boost: {} rolls", snap.boosts.luck_rolls));
    }
    if snap.boosts.coin_multiplier_rolls > 0 {
        badges.push(format!("2x Coins: {} rolls", snap.boosts.coin_multiplier_rolls));
    }
    let boosts_line = if badges.is_empty() {
        String::from("none")
    } else {
        badges.iter().join(" | ")
    };
    let status = Paragraph::new(format!(
        "Coins: {} | Rolls: {} | Cooldown: {} | Boosts: {}\n{}",
        snap.coins, snap.total_rolls, cooldown, boosts_line, snap.status
    ))
    .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

fn draw_home(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // status
            Constraint::Length(5), // last roll
            Constraint::Length(3), // roll button
            Constraint::Length(4), // stats
            Constraint::Min(10),   // drop rates
            Constraint::Length(3), // help
        ])
        .split(f.area());

    draw_status(f, chunks[0], snap);
    draw_last_roll(f, state, chunks[1], snap);
    draw_roll_button(f, chunks[2], snap);
    draw_stats(f, chunks[3], snap);
    draw_drop_rates(f, chunks[4]);
    draw_help(f, chunks[5], "r roll | i inventory | s shop | q quit");
}

fn draw_last_roll(f: &mut Frame, state: &UiState, area: Rect, snap: &AppSnapshot) {
    let block = Block::default().borders(Borders::ALL).title("Last Roll");
    match snap.last_roll {
        Some(outcome) => {
            let style = if state.roll_flash > 0 {
                tier_style(outcome.rarity).add_modifier(Modifier::BOLD)
            } else {
                tier_style(outcome.rarity)
            };
            let lines = vec![
                Line::styled(
                    format!("{} {}!", tier_icon(outcome.rarity), outcome.rarity),
                    style,
                ),
                Line::from(format!("Value: ${}", outcome.value)),
                Line::from(format!("+{} coins", outcome.coins_awarded)),
            ];
            f.render_widget(Paragraph::new(lines).block(block), area);
        }
        None => {
            f.render_widget(
                Paragraph::new("Nothing yet. Hit the roll button!").block(block),
                area,
            );
        }
    }
}

fn draw_roll_button(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let (label, style) = if snap.cooldown_secs > 0 {
        (
            format!("Cooling down... {}s", snap.cooldown_secs),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (
            String::from("* ROLL! (r) *"),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )
    };
    let button = Paragraph::new(label)
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(button, area);
}

fn draw_stats(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let items = Paragraph::new(format!("{}", snap.total_items))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Total Items"));
    f.render_widget(items, halves[0]);
    let value = Paragraph::new(format!("${}", snap.inventory_value.floor() as u64))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Inventory Value"),
        );
    f.render_widget(value, halves[1]);
}

fn draw_drop_rates(f: &mut Frame, area: Rect) {
    let name_width = Rarity::ALL
        .iter()
        .map(|r| r.name().width())
        .max()
        .unwrap_or(0);
    let mut lines = Vec::new();
    for rarity in Rarity::ALL {
        let (lo, hi) = rarity.value_range();
        lines.push(Line::styled(
            format!(
                "{} {:name_width$}  {:>5}%  (${lo}-${hi})",
                tier_icon(rarity),
                rarity.name(),
                rarity.base_chance(),
            ),
            tier_style(rarity),
        ));
    }
    let rates =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Drop Rates"));
    f.render_widget(rates, area);
}

fn draw_inventory(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // status
            Constraint::Min(8),    // items
            Constraint::Length(6), // sell panel
            Constraint::Length(3), // help
        ])
        .split(f.area());

    draw_status(f, chunks[0], snap);

    let mut lines = Vec::new();
    if snap.inventory.is_empty() {
        lines.push(Line::from("Your inventory is empty!"));
        lines.push(Line::styled(
            "Go roll some items!",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        for (i, (rarity, count)) in snap.inventory.iter().enumerate() {
            let cursor = if i == state.sell_idx { ">" } else { " " };
            let (lo, hi) = rarity.value_range();
            let entry_total = (rarity.average_value() * *count as f64).floor() as u64;
            lines.push(Line::styled(
                format!(
                    "{cursor} {} {} x{count}  (${lo}-${hi} each, total ${entry_total})",
                    tier_icon(*rarity),
                    rarity,
                ),
                tier_style(*rarity),
            ));
        }
    }
    let title = format!("Inventory (${} total)", snap.inventory_value.floor() as u64);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
        chunks[1],
    );

    draw_sell_panel(f, state, chunks[2]);
    draw_help(
        f,
        chunks[3],
        "up/down select | digits amount | Enter sell | h home | q quit",
    );
}

fn draw_sell_panel(f: &mut Frame, state: &UiState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Sell Items");
    let mut lines = Vec::new();
    match state.owned.get(state.sell_idx) {
        Some((rarity, count)) => {
            // preview applies the sale formula to the raw pending amount
            let preview = (rarity.average_value() * state.sell_amount as f64).floor() as u64;
            lines.push(Line::from(format!("Selling: {rarity} (x{count} owned)")));
            lines.push(Line::from(format!("Amount: {}", state.sell_amount)));
            lines.push(Line::from(format!("Sell for ${preview}")));
        }
        None => {
            lines.push(Line::from("Nothing to sell"));
        }
    }
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_shop(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // status
            Constraint::Min(9),    // catalog
            Constraint::Length(3), // help
        ])
        .split(f.area());

    draw_status(f, chunks[0], snap);

    let mut lines = Vec::new();
    for (i, item) in ShopItem::ALL.iter().enumerate() {
        let cursor = if i == state.shop_idx { ">" } else { " " };
        let affordable = snap.coins >= item.price();
        let tag = if affordable { "Purchase" } else { "Not enough" };
        let header = format!("{cursor} {item} ({} coins) [{tag}]", item.price());
        let detail = format!("     {}", item.description());
        if affordable {
            lines.push(Line::from(header));
            lines.push(Line::from(detail));
        } else {
            lines.push(Line::styled(header, Style::default().fg(Color::DarkGray)));
            lines.push(Line::styled(detail, Style::default().fg(Color::DarkGray)));
        }
        lines.push(Line::from(""));
    }
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Shop")),
        chunks[1],
    );

    draw_help(f, chunks[2], "up/down select | Enter buy | h home | q quit");
}

fn draw_help(f: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help, area);
}

// Per-tier presentation lookups. Styling metadata lives here in the
// rendering layer, keyed by tier; the engine knows nothing about it.

fn tier_style(rarity: Rarity) -> Style {
    match rarity {
        Rarity::Common => Style::default().fg(Color::Gray),
        Rarity::Uncommon => Style::default().fg(Color::Green),
        Rarity::Rare => Style::default().fg(Color::Blue),
        Rarity::Epic => Style::default().fg(Color::Magenta),
        Rarity::Legendary => Style::default().fg(Color::LightRed),
        Rarity::Mythic => Style::default().fg(Color::Red),
        Rarity::Secret => Style::default().fg(Color::LightMagenta),
        Rarity::Divine => Style::default().fg(Color::Yellow),
    }
}

fn tier_icon(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Common => "⚪",
        Rarity::Uncommon => "🟢",
        Rarity::Rare => "🔵",
        Rarity::Epic => "🟣",
        Rarity::Legendary => "🟠",
        Rarity::Mythic => "🔴",
        Rarity::Secret => "💎",
        Rarity::Divine => "⭐",
    }
}
