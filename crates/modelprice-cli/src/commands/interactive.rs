use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use modelprice_core::*;
use modelprice_report::terminal;
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::debug;

use super::{split_list, AppContext};

#[derive(Args)]
pub struct InteractiveArgs {
    /// Usage preset to start from
    #[arg(long)]
    pub preset: Option<String>,

    /// Comma-separated model ids selected at start
    #[arg(long)]
    pub models: Option<String>,

    /// Quiet period in milliseconds before recalculating (defaults to config)
    #[arg(long)]
    pub debounce_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set(UsageField, String),
    Preset(String),
    Toggle(String),
    Provider(String),
    All,
    None,
    Show,
    Help,
    Quit,
}

const HELP: &str = "\
  input N        input tokens per month
  output N       output tokens per month
  requests N     requests per month
  preset NAME    small, medium, large, enterprise
  toggle ID      select or deselect a model
  provider ID    select or deselect a provider's models
  all | none     select every priced model / clear the selection
  show           recalculate now
  quit";

pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = parts.collect();
    let arg = |what: &str| -> Result<String> {
        if rest.is_empty() {
            anyhow::bail!("'{}' needs {}", head, what);
        }
        Ok(rest.join(" "))
    };

    let cmd = match head.to_lowercase().as_str() {
        "input" | "output" | "requests" => {
            let field: UsageField = head.parse()?;
            Command::Set(field, arg("a number")?)
        }
        "set" => {
            let (name, value) = rest
                .split_first()
                .context("'set' needs a field and a value")?;
            Command::Set(name.parse()?, value.join(" "))
        }
        "preset" => Command::Preset(arg("a preset name")?),
        "toggle" | "t" => Command::Toggle(arg("a model id")?),
        "provider" | "p" => Command::Provider(arg("a provider id")?),
        "all" => Command::All,
        "none" | "clear" => Command::None,
        "show" | "calc" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => anyhow::bail!("unknown command '{}' (try 'help')", other),
    };
    Ok(Some(cmd))
}

/// Apply a mutating command. Returns whether a recalculation is due.
pub fn apply(calc: &mut PriceCalculator, cmd: Command) -> Result<bool> {
    match cmd {
        Command::Set(field, raw) => {
            let result = calc.set_usage(field, &raw);
            terminal::print_validation(&result);
        }
        Command::Preset(name) => {
            calc.apply_preset(&name)?;
        }
        Command::Toggle(id) => {
            if !calc.catalog().contains_model(&id) {
                anyhow::bail!("unknown model '{}'", id);
            }
            calc.toggle_model(&id)?;
        }
        Command::Provider(id) => {
            if calc.catalog().models_by_provider(&id).is_empty() {
                anyhow::bail!("unknown provider '{}'", id);
            }
            match calc.toggle_provider(&id)? {
                ProviderToggle::Selected(n) => eprintln!("{} {} models selected", "✓".green(), n),
                ProviderToggle::Deselected(n) => eprintln!("{} {} models deselected", "✓".green(), n),
            }
        }
        Command::All => {
            calc.select_all()?;
        }
        Command::None => calc.deselect_all(),
        Command::Show | Command::Help | Command::Quit => return Ok(false),
    }
    Ok(true)
}

fn render(calc: &PriceCalculator) {
    terminal::print_selection(calc.selection(), calc.catalog());
    terminal::print_projection(&calc.project(), calc.catalog());
}

/// Drive a session from command lines on `rx`. Mutations are coalesced:
/// `render` runs once `window` has passed without another mutation, or
/// immediately on `show`. Returns on `quit` or when the sender hangs up,
/// flushing a pending render first in the latter case.
pub fn session<R>(calc: &mut PriceCalculator, rx: Receiver<String>, window: Duration, mut render: R)
where
    R: FnMut(&PriceCalculator),
{
    let mut debouncer = Debouncer::new(window);

    loop {
        let received = match debouncer.time_remaining(Instant::now()) {
            Some(wait) => rx.recv_timeout(wait),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(line) => match parse_command(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(Command::Help)) => println!("{}", HELP),
                Ok(Some(Command::Show)) => {
                    debouncer.cancel();
                    render(calc);
                }
                Ok(Some(cmd)) => match apply(calc, cmd) {
                    Ok(true) => debouncer.touch(Instant::now()),
                    Ok(false) => {}
                    Err(e) => eprintln!("{} {:#}", "!".yellow().bold(), e),
                },
                Ok(None) => {}
                Err(e) => eprintln!("{} {:#}", "!".yellow().bold(), e),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                if debouncer.is_pending() {
                    render(calc);
                }
                break;
            }
        }

        if debouncer.fire_if_due(Instant::now()) {
            debug!("debounce window elapsed, recalculating");
            render(calc);
        }
    }
}

pub fn run(args: InteractiveArgs, ctx: &AppContext) -> Result<()> {
    let mut calc = PriceCalculator::new(ctx.catalog.clone());
    if let Some(preset) = args.preset.as_deref().or(ctx.settings.default_preset.as_deref()) {
        calc.apply_preset(preset)?;
    }
    for id in args.models.as_deref().map(split_list).unwrap_or_default() {
        if let Err(e) = apply(&mut calc, Command::Toggle(id)) {
            eprintln!("{} {:#}", "!".yellow().bold(), e);
        }
    }

    let window = args
        .debounce_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| ctx.settings.debounce_window());

    let (tx, rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    eprintln!("{} type 'help' for commands", "→".cyan());
    render(&calc);
    session(&mut calc, rx, window, render);
    Ok(())
}
