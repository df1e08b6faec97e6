//! Playable terminal frontend: maps key presses to directional moves,
//! renders the grid after every accepted move, and persists the best score
//! to a JSON file.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use env_logger::Env;
use log::debug;
use rand::Rng;

use twenty48_core::engine::Move;
use twenty48_core::game::Game;
use twenty48_core::store::JsonFileStore;

#[derive(Debug, Parser)]
#[command(author, version, about = "Play 2048 on a 4x4 grid in the terminal")]
struct Cli {
    /// Seed for tile spawning (random if omitted)
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// File holding the persisted best score
    #[arg(long, value_name = "FILE", default_value = "twenty48-best.json")]
    best_file: PathBuf,
}

struct App {
    game: Game<JsonFileStore>,
    should_quit: bool,
}

impl App {
    fn run(&mut self, out: &mut impl Write) -> Result<()> {
        self.render(out)?;
        while !self.should_quit {
            if let Event::Key(key) = event::read().context("failed to read terminal input")? {
                self.handle_key(key, out)?;
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, out: &mut impl Write) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        let dir = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                return Ok(());
            }
            KeyCode::Char('n') => {
                debug!("new game");
                self.game.new_game();
                return self.render(out);
            }
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Move::Up,
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Move::Down,
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Move::Left,
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Move::Right,
            _ => return Ok(()),
        };
        let outcome = self.game.step(dir)?;
        debug!(
            "move {dir:?}: moved={} points={}",
            outcome.moved, outcome.points
        );
        if outcome.moved {
            self.render(out)?;
        }
        Ok(())
    }

    fn render(&self, out: &mut impl Write) -> Result<()> {
        execute!(out, MoveTo(0, 0), Clear(ClearType::All))?;
        write!(
            out,
            "score {:>8}   best {:>8}\r\n\r\n",
            self.game.score(),
            self.game.best_score()
        )?;
        for line in self.game.board().to_string().lines() {
            write!(out, "{line}\r\n")?;
        }
        write!(out, "\r\n")?;
        if self.game.is_game_over() {
            write!(out, "game over - press n for a new game, q to quit\r\n")?;
        } else {
            write!(out, "arrows move, n new game, q quit\r\n")?;
        }
        out.flush()?;
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let seed = cli.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let game = Game::new(JsonFileStore::new(&cli.best_file), seed)
        .with_context(|| format!("failed to load best score from {}", cli.best_file.display()))?;

    enable_raw_mode().context("failed to enable raw terminal mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let mut app = App {
        game,
        should_quit: false,
    };
    let res = app.run(&mut stdout);

    // restore the terminal even when the loop errored
    let _ = disable_raw_mode();
    let _ = execute!(stdout, LeaveAlternateScreen);

    res
}
