//! Command dispatch

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::TourSession;
use crate::application::{lock_engine, StepObserver};
use crate::cli::args::{Cli, Commands, ConfigCommands, RunArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::render::{self, TreeNodeConvert};
use crate::cli::shell::{ShellCommand, HELP};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Generation, Point, Region};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::{ChannelListener, InfraError};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Solve { points, run }) => cmd_solve(cli, points, *run),
        Some(Commands::Random {
            count,
            region,
            seed,
            run,
        }) => cmd_random(cli, *count, *region, *seed, *run),
        Some(Commands::Shell) => cmd_shell(cli),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        None => Err(CliError::Usage(
            "no command given, try 'tspdraw --help'".to_string(),
        )),
    }
}

fn settings_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| CliError::from(InfraError::io("current directory", e))),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = settings_dir(cli)?;
    let mut settings = Settings::load(Some(&dir))?;
    if let Some(ms) = cli.interval_ms {
        settings.step_interval_ms = ms;
        settings.validate()?;
    }
    debug!(?settings, "settings loaded");
    Ok(settings)
}

fn step_printer(run: RunArgs) -> Option<StepObserver> {
    if run.quiet {
        None
    } else {
        let observer: StepObserver = Arc::new(render::print_step);
        Some(observer)
    }
}

#[instrument(skip(cli))]
fn cmd_solve(cli: &Cli, points: &[Point], run: RunArgs) -> CliResult<()> {
    let container = ServiceContainer::new(load_settings(cli)?);
    let (listener, results) = ChannelListener::channel();
    let mut session = container.session(Box::new(listener), step_printer(run));

    for point in points {
        session.add_point(point.x(), point.y())?;
    }
    drive(&mut session, run)?;
    finish(&session, &results, run)
}

#[instrument(skip(cli))]
fn cmd_random(
    cli: &Cli,
    count: usize,
    region: Option<Region>,
    seed: Option<u64>,
    run: RunArgs,
) -> CliResult<()> {
    let mut settings = load_settings(cli)?;
    settings.seed = seed.or(settings.seed);
    let container = ServiceContainer::new(settings);
    let (listener, results) = ChannelListener::channel();
    let mut session = container.session(Box::new(listener), step_printer(run));

    let generation = session.generate_random(count, region)?;
    report_generation(&generation);
    drive(&mut session, run)?;
    finish(&session, &results, run)
}

fn report_generation(generation: &Generation) {
    if generation.is_partial() {
        output::warning(&format!(
            "only {} of {} random points found within the attempt budget",
            generation.generated, generation.requested
        ));
    } else {
        output::action("generated", &format!("{} points", generation.generated));
    }
}

/// Run the tour to its end, on the timer or back to back.
fn drive(session: &mut TourSession, run: RunArgs) -> CliResult<()> {
    if run.auto {
        session.start_auto()?;
        session.wait();
    } else {
        session.run_to_completion()?;
    }
    Ok(())
}

fn finish(session: &TourSession, results: &Receiver<String>, run: RunArgs) -> CliResult<()> {
    if !run.quiet {
        render::print_snapshot(&session.snapshot()?);
    }
    if run.tree {
        output::info(&lock_engine(session.engine())?.to_tree_string());
    }
    let mut reported = false;
    for result in results.try_iter() {
        output::success(&result);
        reported = true;
    }
    if !reported {
        // zero-cost cycles are not reported by the engine
        output::success("Cost: 0");
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_shell(cli: &Cli) -> CliResult<()> {
    let container = ServiceContainer::new(load_settings(cli)?);
    let listener = |result: &str| output::success(result);
    let printer: StepObserver = Arc::new(render::print_step);
    let mut session = container.session(Box::new(listener), Some(printer));

    output::header("tspdraw shell, 'help' lists commands");
    let stdin = io::stdin();
    run_shell(&mut session, stdin.lock())
}

/// Read commands from `input` until end of input or `quit`.
pub fn run_shell<R: BufRead>(session: &mut TourSession, mut input: R) -> CliResult<()> {
    let mut line = String::new();
    loop {
        output::prompt(">");
        line.clear();
        let read = input
            .read_line(&mut line)
            .map_err(|e| CliError::from(InfraError::io("read command", e)))?;
        if read == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let command = match trimmed.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(e) => {
                output::error(&e);
                continue;
            }
        };
        match apply(session, command) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => output::error(&e),
        }
    }
    session.stop_auto();
    Ok(())
}

/// Apply one shell command. Returns false on `quit`.
pub fn apply(session: &mut TourSession, command: ShellCommand) -> CliResult<bool> {
    debug!(?command, "shell command");
    match command {
        ShellCommand::Add(point) => {
            session.add_point(point.x(), point.y())?;
            output::detail(&format!("added {point}"));
        }
        ShellCommand::Step(n) => {
            for _ in 0..n {
                if session.step()?.is_terminal() {
                    break;
                }
            }
        }
        ShellCommand::Undo => {
            session.undo()?;
            render::print_snapshot(&session.snapshot()?);
        }
        ShellCommand::Reset => {
            session.reset()?;
            output::detail("cleared");
        }
        ShellCommand::Random { count, region } => {
            let generation = session.generate_random(count, region)?;
            report_generation(&generation);
        }
        ShellCommand::Auto => session.start_auto()?,
        ShellCommand::Stop => session.stop_auto(),
        ShellCommand::Show => render::print_snapshot(&session.snapshot()?),
        ShellCommand::Tree => output::info(&lock_engine(session.engine())?.to_tree_string()),
        ShellCommand::Help => output::info(HELP),
        ShellCommand::Quit => return Ok(false),
    }
    Ok(true)
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let local = local_config_path(&settings_dir(cli)?);
            match global_config_path() {
                Some(global) => output::action("global", &describe_path(&global)),
                None => output::action("global", "unavailable (no home directory)"),
            }
            output::action("local", &describe_path(&local));
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("no global config directory available".to_string())
                })?
            } else {
                local_config_path(&settings_dir(cli)?)
            };
            Settings::write_template(&path)?;
            output::success(&format!("created {}", path.display()));
        }
    }
    Ok(())
}

fn describe_path(path: &std::path::Path) -> String {
    if path.exists() {
        format!("{} (exists)", path.display())
    } else {
        format!("{} (not found)", path.display())
    }
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::{Phase, TourEngine};

    fn quiet_session() -> TourSession {
        let settings = Settings {
            seed: Some(1),
            step_interval_ms: 5,
            ..Default::default()
        };
        TourSession::new(TourEngine::new(), &settings, None)
    }

    #[test]
    fn test_run_shell_executes_script() {
        let mut session = quiet_session();
        let script = "add 0 0\nadd 10,0\n# comment\n\nadd 0 10\nstep 10\nbogus\nquit\nadd 5 5\n";

        run_shell(&mut session, script.as_bytes()).unwrap();

        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.points.len(), 3, "commands after quit are ignored");
        assert_eq!(snapshot.phase, Phase::Complete);
    }

    #[test]
    fn test_apply_undo_and_random() {
        let mut session = quiet_session();
        apply(&mut session, ShellCommand::Add(Point::new(1, 1))).unwrap();
        apply(&mut session, ShellCommand::Add(Point::new(2, 2))).unwrap();
        apply(&mut session, ShellCommand::Undo).unwrap();
        assert_eq!(session.snapshot().unwrap().points, vec![Point::new(1, 1)]);

        apply(
            &mut session,
            ShellCommand::Random {
                count: 4,
                region: Some(Region::new(0, 0, 50, 50)),
            },
        )
        .unwrap();
        assert_eq!(session.snapshot().unwrap().points.len(), 4);
    }

    #[test]
    fn test_apply_random_with_bad_region_is_an_error() {
        let mut session = quiet_session();
        let result = apply(
            &mut session,
            ShellCommand::Random {
                count: 5,
                region: Some(Region::new(0, 0, 1, 1)),
            },
        );
        assert!(result.is_err());
    }
}
