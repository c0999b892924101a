//! `gesture-input` command-line tool.
//!
//! Runs one input action through the same [`InputService`] the surrounding
//! service uses, which makes it handy for checking a machine's capabilities
//! and driver chain by hand:
//!
//! ```text
//! gesture-input status
//! gesture-input move 640 480 --immediate
//! gesture-input click left
//! gesture-input scroll down 5
//! gesture-input combo CTRL+C
//! gesture-input gesture scroll_up --amount 2
//! GESTURE_INPUT_HEADLESS=1 gesture-input click right
//! ```
//!
//! The tool plays the caller's role: it turns names into typed commands and
//! exits non-zero on an unknown name or an unsuccessful result.
//!
//! # Startup
//!
//! 1. Arguments are parsed with `clap`.
//! 2. The config is loaded from `--config` or the platform config directory,
//!    then environment overrides and `--headless` are applied.
//! 3. `tracing_subscriber` is initialised from `RUST_LOG`, falling back to the
//!    config's `log_level`.
//! 4. The platform is probed and the service built on this tokio runtime.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gesture_core::{
    CommandError, GestureArgs, InputCommand, KeyCode, MouseButton, ScrollDirection,
    domain::command::DEFAULT_SCROLL_AMOUNT,
};
use gesture_input::infrastructure::build_input_service;
use gesture_input::infrastructure::config::{
    load_config, load_default_config, ConfigError, InputConfig,
};
use gesture_input::InputService;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Drive the local pointer and keyboard through the input subsystem.
#[derive(Debug, Parser)]
#[command(name = "gesture-input", version)]
struct Cli {
    /// Config file; defaults to the platform config directory.
    #[arg(long, env = "GESTURE_INPUT_CONFIG")]
    config: Option<PathBuf>,

    /// Pretend no display is attached (simulation driver only).
    #[arg(long)]
    headless: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the capability snapshot, driver order and screen info.
    Status,
    /// Move the pointer (smoothed unless --immediate).
    Move {
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
        #[arg(long)]
        immediate: bool,
    },
    /// Click `left` or `right`.
    Click { button: String },
    /// Double left click.
    DoubleClick,
    /// Scroll `up` or `down` by AMOUNT notches.
    Scroll {
        direction: String,
        amount: Option<u32>,
    },
    /// Press a single key, e.g. `ESC`, `F5`, `a`.
    Key { name: String },
    /// Press a `+`-separated combination, e.g. `CTRL+C`.
    Combo { combo: String },
    /// Run a recognizer gesture by name, e.g. `left_click`, `scroll_up`.
    Gesture {
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        x: Option<i32>,
        #[arg(long, allow_negative_numbers = true)]
        y: Option<i32>,
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<i32>,
    },
}

impl Command {
    /// Converts the subcommand into a facade command; `None` for `status`.
    ///
    /// # Errors
    ///
    /// Any [`CommandError`] from name parsing.
    fn to_input_command(&self) -> Result<Option<InputCommand>, CommandError> {
        let command = match self {
            Command::Status => return Ok(None),
            Command::Move { x, y, immediate } => {
                let (x, y) = (*x, *y);
                if *immediate {
                    InputCommand::MoveImmediate { x, y }
                } else {
                    InputCommand::Move { x, y }
                }
            }
            Command::Click { button } => InputCommand::Click {
                button: button.parse::<MouseButton>()?,
            },
            Command::DoubleClick => InputCommand::DoubleClick,
            Command::Scroll { direction, amount } => InputCommand::Scroll {
                direction: direction.parse::<ScrollDirection>()?,
                amount: amount.filter(|&n| n > 0).unwrap_or(DEFAULT_SCROLL_AMOUNT),
            },
            Command::Key { name } => InputCommand::KeyPress {
                code: name.parse::<KeyCode>()?,
            },
            Command::Combo { combo } => InputCommand::KeyCombo {
                codes: KeyCode::parse_combo(combo)?,
            },
            Command::Gesture { name, x, y, amount } => InputCommand::from_gesture(
                name,
                GestureArgs {
                    x: *x,
                    y: *y,
                    amount: *amount,
                },
            )?,
        };
        Ok(Some(command))
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<InputConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => match load_default_config() {
            Ok(config) => config,
            Err(ConfigError::NoPlatformConfigDir) => InputConfig::default(),
            Err(e) => return Err(e).context("failed to load default config"),
        },
    };
    config.apply_env_overrides();
    if cli.headless {
        config.platform.force_headless = true;
    }
    Ok(config)
}

fn print_status(service: &InputService) {
    let caps = service.capabilities();
    let info = service.screen_info();
    println!("os:        {}", caps.os_family);
    println!("gui:       {}", caps.gui_available);
    println!("native:    {}", caps.native_api_available);
    println!(
        "drivers:   {}",
        service
            .driver_order()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    );
    println!("screen:    {}x{}", info.width, info.height);
    println!("cursor:    ({}, {})", info.cursor_x, info.cursor_y);
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str())),
        )
        .init();

    let command = cli.command.to_input_command()?;
    let service = build_input_service(&config).context("failed to start input service")?;

    let Some(command) = command else {
        print_status(&service);
        return Ok(());
    };

    info!(action = %command.action_tag(), "executing");
    let result = service.execute(&command).await;
    println!("{}", result.message);
    if !result.success {
        anyhow::bail!("{} did not execute: {}", command.action_tag(), result.message);
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
