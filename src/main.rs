use clap::{Parser, ValueEnum};
use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, Event, KeyCode, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use std::fs::File;
use std::io::{stdout, BufWriter, Stdout, Write};
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

mod character;
mod config;
mod easing;
mod effects;
mod error;
mod firework;
mod input;
mod manager;
mod particles;
mod presenter;
mod sprites;
mod surface;

use config::{DEFAULT_BG_COLOR, FACE_IMAGE_PATH, FPS, HEART_IMAGE_PATH, HEIGHT, WIDTH};
use effects::{Effect, Settings};
use surface::{Canvas, Rgb};

static BG_COLOR: OnceLock<Rgb> = OnceLock::new();

pub fn get_bg_color() -> Rgb {
    *BG_COLOR.get().unwrap_or(&DEFAULT_BG_COLOR)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EffectName {
    /// Interactive toy: hop the characters and launch fireworks from the keyboard
    Show,
    /// Fireworks go up on their own
    Salute,
}

#[derive(Parser, Debug)]
#[command(
    name = "heartworks",
    about = "Hopping faces and heart fireworks in your terminal",
    after_help = "Controls: SPACE = hearts, P = pixels, K+G = combo, LEFT/RIGHT = hop\nPress 'q', ESC, or Ctrl+C to exit"
)]
struct Cli {
    #[arg(value_enum, default_value_t = EffectName::Show)]
    effect: EffectName,

    /// Background color as hex (e.g. 1a1b26)
    #[arg(long, value_name = "RRGGBB", value_parser = parse_hex_color)]
    bg_color: Option<Rgb>,

    /// Image used for heart particles
    #[arg(long, default_value = HEART_IMAGE_PATH)]
    heart_image: PathBuf,

    /// Image used for the character faces
    #[arg(long, default_value = FACE_IMAGE_PATH)]
    face_image: PathBuf,

    /// Seed for the firework random generator
    #[arg(long)]
    seed: Option<u64>,

    /// Write log output here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_hex_color(hex: &str) -> Result<Rgb, String> {
    let hex = hex.trim_start_matches('#');
    let invalid = || format!("invalid hex color '{}', expected RRGGBB (e.g. 1a1b26)", hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok((channel(0)?, channel(2)?, channel(4)?))
}

fn init_logging(log_file: Option<&PathBuf>) -> std::io::Result<()> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn frame_loop<E: Effect>(effect: &mut E, stdout: &mut BufWriter<Stdout>) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut presenter = presenter::Presenter::new(cols as usize, rows as usize);
    let mut canvas = Canvas::new(WIDTH as usize, HEIGHT as usize);

    let start = Instant::now();
    let mut last_frame = start;
    let mut accumulator = 0.0f32;
    let fixed_dt = 1.0 / FPS as f32;

    loop {
        if event::poll(Duration::from_millis(1))? {
            let event = event::read()?;
            match &event {
                Event::Key(key_event) => {
                    if key_event.kind == KeyEventKind::Press
                        && (key_event.code == KeyCode::Char('q')
                            || key_event.code == KeyCode::Esc
                            || (key_event.code == KeyCode::Char('c')
                                && key_event.modifiers.contains(KeyModifiers::CONTROL)))
                    {
                        return Ok(());
                    }
                    effect.handle_event(&event);
                }
                Event::Resize(cols, rows) => {
                    presenter.resize(*cols as usize, *rows as usize);
                    execute!(stdout, Clear(ClearType::All))?;
                }
                _ => {
                    effect.handle_event(&event);
                }
            }
        }

        let now = Instant::now();
        let frame_time = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        accumulator += frame_time;
        if accumulator > fixed_dt * 3.0 {
            accumulator = fixed_dt * 3.0;
        }

        // One tick per fixed step
        while accumulator >= fixed_dt {
            effect.tick(start.elapsed().as_millis() as u64);
            accumulator -= fixed_dt;
        }

        effect.render(&mut canvas);
        presenter.present(&canvas, stdout)?;
    }
}

fn run_effect<E: Effect>(mut settings: Settings) -> std::io::Result<()> {
    settings.release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);

    // Assets load before the alternate screen so fallback warnings stay readable
    let mut effect = E::new(&settings);

    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
    if settings.release_events {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }

    let result = frame_loop(&mut effect, &mut stdout);
    let restored = restore_terminal(&mut stdout, settings.release_events, terminal::disable_raw_mode);

    result.and(restored)
}

/// Undoes the terminal setup. Every step runs even if an earlier one fails;
/// the first error is returned.
fn restore_terminal<W: Write>(
    out: &mut W,
    pop_flags: bool,
    disable_raw_mode: impl FnOnce() -> std::io::Result<()>,
) -> std::io::Result<()> {
    let mut restored = Ok(());
    if pop_flags {
        restored = restored.and(execute!(out, PopKeyboardEnhancementFlags));
    }
    restored = restored.and(execute!(out, Show, LeaveAlternateScreen));
    restored.and(disable_raw_mode())
}

fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    if let Some(color) = cli.bg_color {
        let _ = BG_COLOR.set(color);
    }

    let settings = Settings {
        heart_image: cli.heart_image,
        face_image: cli.face_image,
        seed: cli.seed,
        release_events: false,
    };

    info!("starting {:?}", cli.effect);
    let result = match cli.effect {
        EffectName::Show => run_effect::<effects::show::ShowEffect>(settings),
        EffectName::Salute => run_effect::<effects::salute::SaluteEffect>(settings),
    };
    info!("shutting down");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_restore_runs_every_step() {
        let raw_disabled = Cell::new(false);
        let result = restore_terminal(&mut BrokenPipe, true, || {
            raw_disabled.set(true);
            Ok(())
        });
        assert_eq!(result.unwrap_err().kind(), std::io::ErrorKind::BrokenPipe);
        assert!(raw_disabled.get());
    }

    #[test]
    fn test_restore_leaves_alternate_screen() {
        let mut out = Vec::new();
        restore_terminal(&mut out, false, || Ok(())).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("\x1b[?25h"));
        assert!(written.contains("\x1b[?1049l"));
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("1a1b26"), Ok((0x1a, 0x1b, 0x26)));
        assert_eq!(parse_hex_color("#FF0080"), Ok((255, 0, 128)));
        assert!(parse_hex_color("fff").is_err());
        assert!(parse_hex_color("zz0000").is_err());
        assert!(parse_hex_color("ééé").is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["heartworks"]).unwrap();
        assert_eq!(cli.effect, EffectName::Show);
        assert_eq!(cli.heart_image, PathBuf::from(HEART_IMAGE_PATH));
        assert!(cli.bg_color.is_none());
    }

    #[test]
    fn test_cli_options() {
        let cli = Cli::try_parse_from(["heartworks", "salute", "--bg-color", "102030", "--seed", "9"]).unwrap();
        assert_eq!(cli.effect, EffectName::Salute);
        assert_eq!(cli.bg_color, Some((0x10, 0x20, 0x30)));
        assert_eq!(cli.seed, Some(9));
        assert!(Cli::try_parse_from(["heartworks", "--bg-color", "nope"]).is_err());
    }
}
