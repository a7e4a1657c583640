use crate::ui;
use chrono::{DateTime, Utc};
use color_eyre::eyre::{Result, WrapErr};
use rollbox::engine::{Boosts, RollEngine, RollOutcome};
use rollbox::rarity::Rarity;
use rollbox::rng::EntropySource;
use rollbox::shop::ShopItem;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time;
use tracing::info;

pub struct AppConfig {
    pub seed: Option<u64>,
    pub starting_coins: u64,
    pub log_dir: PathBuf,
}

/// Everything the screens need for one draw, rebuilt after each mutation.
#[derive(Clone, Debug)]
pub struct AppSnapshot {
    pub coins: u64,
    pub total_rolls: u64,
    pub cooldown_secs: u32,
    pub boosts: Boosts,
    pub last_roll: Option<RollOutcome>,
    /// Owned tiers with counts, rarest first (display order).
    pub inventory: Vec<(Rarity, u64)>,
    pub total_items: u64,
    pub inventory_value: f64,
    pub status: String,
}

pub struct AppController {
    engine: RollEngine,
    source: EntropySource,
    seed: Option<u64>,
    status: String,
}

impl AppController {
    pub fn new(config: &AppConfig) -> Self {
        let source = match config.seed {
            Some(seed) => EntropySource::seeded(seed),
            None => EntropySource::from_os(),
        };
        Self {
            engine: RollEngine::with_coins(config.starting_coins),
            source,
            seed: config.seed,
            status: String::from("Ready"),
        }
    }

    pub fn snapshot(&self) -> AppSnapshot {
        let inventory: Vec<(Rarity, u64)> = self
            .engine
            .inventory()
            .iter()
            .rev()
            .map(|(rarity, count)| (*rarity, *count))
            .collect();
        AppSnapshot {
            coins: self.engine.coins(),
            total_rolls: self.engine.total_rolls(),
            cooldown_secs: self.engine.cooldown_secs(),
            boosts: self.engine.boosts(),
            last_roll: self.engine.last_roll(),
            inventory,
            total_items: self.engine.total_items(),
            inventory_value: self.engine.inventory_value(),
            status: self.status.clone(),
        }
    }

    pub fn on_cooldown(&self) -> bool {
        self.engine.on_cooldown()
    }

    pub fn tick(&mut self) {
        self.engine.tick(1);
    }

    pub fn roll(&mut self) {
        match self.engine.roll(&mut self.source) {
            Some(outcome) => {
                self.status = format!(
                    "Rolled {} worth ${} (+{} coins)",
                    outcome.rarity, outcome.value, outcome.coins_awarded
                );
            }
            None => {
                self.status = format!(
                    "Still cooling down ({}s)",
                    self.engine.cooldown_secs()
                );
            }
        }
    }

    pub fn sell(&mut self, rarity: Rarity, amount: u64) {
        let receipt = self.engine.sell(rarity, amount);
        if receipt.sold == 0 {
            self.status = format!("Nothing to sell for {rarity}");
        } else {
            self.status = format!(
                "Sold {} {} for {} coins",
                receipt.sold, rarity, receipt.coins_gained
            );
        }
    }

    pub fn purchase(&mut self, item: ShopItem) {
        match self.engine.purchase(item, &mut self.source) {
            Some(purchase) => {
                self.status = match purchase.bonus_roll {
                    Some(outcome) => format!(
                        "{} rolled a bonus {} (+{} coins)",
                        item, outcome.rarity, outcome.coins_awarded
                    ),
                    None => format!("Bought {item}"),
                };
            }
            None => {
                self.status = format!(
                    "Not enough coins for {item} (costs {})",
                    item.price()
                );
            }
        }
    }

    fn write_session_recap(&self, config: &AppConfig) -> Result<()> {
        let recap = SessionRecap {
            finished_at: Utc::now(),
            seed: self.seed,
            total_rolls: self.engine.total_rolls(),
            coins: self.engine.coins(),
            unspent_boosts: self.engine.boosts(),
            inventory: self.engine.inventory().clone(),
            inventory_value: self.engine.inventory_value().floor() as u64,
        };
        fs::create_dir_all(&config.log_dir).wrap_err("Failed to create log directory")?;
        let path = config.log_dir.join("last-session.json");
        let json = serde_json::to_vec_pretty(&recap).wrap_err("Failed to encode session recap")?;
        fs::write(&path, json).wrap_err("Failed to write session recap")?;
        info!(path = %path.display(), "wrote session recap");
        Ok(())
    }
}

/// Write-only summary of the finished session. Exported for inspection,
/// never read back.
#[derive(Debug, Serialize)]
struct SessionRecap {
    finished_at: DateTime<Utc>,
    seed: Option<u64>,
    total_rolls: u64,
    coins: u64,
    unspent_boosts: Boosts,
    inventory: BTreeMap<Rarity, u64>,
    inventory_value: u64,
}

pub async fn run_app(config: AppConfig) -> Result<()> {
    let mut controller = AppController::new(&config);
    let mut ui_state = ui::UiState::default();
    let mut input_events = ui::input_event_stream();

    // UI bootstrap
    ui::terminal_enter(&mut ui_state)?;
    let res = run_loop(&mut controller, &mut ui_state, &mut input_events).await;
    ui::terminal_exit()?;
    controller.write_session_recap(&config)?;
    res
}

async fn run_loop(
    controller: &mut AppController,
    ui_state: &mut ui::UiState,
    input_events: &mut ui::InputEvents,
) -> Result<()> {
    let mut ticker = time::interval(Duration::from_millis(1000));
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
    let mut snapshot = controller.snapshot();
    ui::draw(ui_state, &snapshot)?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => { break; }
            // the cooldown clock only runs while something is cooling down;
            // an idle ticker stays unpolled
            _ = ticker.tick(), if controller.on_cooldown() => {
                controller.tick();
                ui_state.tick_flash();
                snapshot = controller.snapshot();
                ui::draw(ui_state, &snapshot)?;
            }
            ev = ui::next_event(ui_state, input_events) => {
                let was_ready = !controller.on_cooldown();
                match ev? {
                    ui::UserEvent::Quit => break,
                    ui::UserEvent::Roll => controller.roll(),
                    ui::UserEvent::Sell { rarity, amount } => controller.sell(rarity, amount),
                    ui::UserEvent::Purchase(item) => controller.purchase(item),
                    ui::UserEvent::Redraw => {
                        // UI-only update; redraw from the cached snapshot
                        ui::draw(ui_state, &snapshot)?;
                        continue;
                    }
                }
                if was_ready && controller.on_cooldown() {
                    // line the first countdown tick up a full second out
                    ticker.reset();
                }
                snapshot = controller.snapshot();
                ui::draw(ui_state, &snapshot)?;
            }
        }
    }
    info!(
        total_rolls = controller.engine.total_rolls(),
        coins = controller.engine.coins(),
        "session over"
    );
    Ok(())
}
