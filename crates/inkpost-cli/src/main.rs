mod fragment;
mod view;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use inkpost_config::Config;
use inkpost_engine::{Converter, EngineKind, Toc};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{io::stdout, path::PathBuf};

#[derive(Parser)]
#[command(name = "inkpost", version, about = "Render blog Markdown to HTML with a table of contents")]
struct Cli {
    /// Config file to use instead of ~/.config/inkpost/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the converted HTML fragment
    Render {
        file: PathBuf,
        /// Conversion engine: builtin or pulldown
        #[arg(long, value_parser = parse_engine)]
        engine: Option<EngineKind>,
    },
    /// Print the table of contents
    Toc {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Read a post in the terminal with a live table of contents
    View { file: PathBuf },
}

fn parse_engine(s: &str) -> Result<EngineKind, String> {
    match s {
        "builtin" => Ok(EngineKind::Builtin),
        "pulldown" => Ok(EngineKind::Pulldown),
        other => Err(format!("unknown engine '{other}', expected builtin or pulldown")),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            let path = Config::expand_path(path);
            match Config::load_from_path(&path)? {
                Some(config) => Ok(config),
                None => bail!("Config file '{}' does not exist", path.display()),
            }
        }
        None => {
            let config = Config::load()?;
            if config.is_none() {
                log::debug!(
                    "no config at {}, using defaults",
                    Config::config_path().display()
                );
            }
            Ok(config.unwrap_or_default())
        }
    }
}

fn read_post(file: &PathBuf) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("Failed to read '{}'", file.display()))
}

fn toc_outline(toc: &Toc) -> String {
    toc.entries()
        .iter()
        .map(|e| format!("{}- {} (#{})\n", "  ".repeat(e.indent as usize), e.text, e.id))
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Render { file, engine } => {
            let mut options = config.render;
            if let Some(engine) = engine {
                options.engine = engine;
            }
            let source = read_post(&file)?;
            println!("{}", Converter::new(options).convert(&source).html);
        }
        Command::Toc { file, json } => {
            let source = read_post(&file)?;
            let toc = Converter::new(config.render).convert(&source).toc;
            if json {
                println!("{}", serde_json::to_string_pretty(&toc)?);
            } else {
                print!("{}", toc_outline(&toc));
            }
        }
        Command::View { file } => {
            let source = read_post(&file)?;
            let conversion = Converter::new(config.render).convert(&source);
            let title = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut app = view::App::new(
                title,
                conversion,
                config.viewer.toc_width,
                &config.viewer.observer_options(),
            );

            // Setup terminal
            enable_raw_mode()?;
            let mut stdout = stdout();
            execute!(stdout, EnterAlternateScreen)?;
            let backend = CrosstermBackend::new(stdout);
            let mut terminal = Terminal::new(backend)?;

            let res = view::run_app(&mut terminal, &mut app);
            app.close();

            // Restore terminal
            disable_raw_mode()?;
            execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
            terminal.show_cursor()?;

            res?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpost_engine::{RenderOptions, convert};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("builtin", Ok(EngineKind::Builtin))]
    #[case("pulldown", Ok(EngineKind::Pulldown))]
    #[case("comrak", Err(()))]
    fn engine_names(#[case] name: &str, #[case] expected: Result<EngineKind, ()>) {
        assert_eq!(parse_engine(name).map_err(|_| ()), expected);
    }

    #[test]
    fn outline_indents_by_level() {
        let toc = convert("## A\n### B\n## C", &RenderOptions::default()).toc;
        assert_eq!(
            toc_outline(&toc),
            "- A (#heading-0)\n  - B (#heading-1)\n- C (#heading-2)\n"
        );
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["inkpost", "render", "post.md", "--engine", "pulldown"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Render {
                engine: Some(EngineKind::Pulldown),
                ..
            }
        ));

        let cli = Cli::try_parse_from(["inkpost", "--config", "c.toml", "toc", "--json", "p.md"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert!(matches!(cli.command, Command::Toc { json: true, .. }));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let path = PathBuf::from("/nonexistent/inkpost/config.toml");
        assert!(load_config(Some(&path)).is_err());
    }
}
