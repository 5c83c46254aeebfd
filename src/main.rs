use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use oxide_thermostat::{
    BoxedSimulation, CommandMode, ConsoleRenderer, Input, Simulation, SimulationConfig,
    ThermostatResult, ThermostatRuntime, View,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oxide-thermostat")]
#[command(about = "Smart thermostat simulation: MVC vs. event-driven mediator", long_about = None)]
struct Cli {
    /// Which orchestration to run
    #[arg(short, long, value_enum, default_value_t = Mode::Both)]
    architecture: Mode,
    /// Number of cycles to run
    #[arg(short, long, default_value_t = 20)]
    cycles: u64,
    /// Delay between cycles in milliseconds
    #[arg(long, default_value_t = 500)]
    interval_ms: u64,
    /// Initial target temperature (°C); overrides the config file
    #[arg(short, long)]
    target: Option<f64>,
    /// YAML file with simulation constants
    #[arg(long)]
    config: Option<PathBuf>,
    /// Noise seed; overrides the config file
    #[arg(long)]
    seed: Option<u64>,
    /// Let the mediator re-send "on" commands while heating
    #[arg(long)]
    keep_alive: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Mvc,
    Eda,
    Both,
}

fn main() -> ThermostatResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let simulations = build_simulations(&config, cli.architecture)?;
    let (mut runtime, emitter) = ThermostatRuntime::new(simulations);

    let cycles = cli.cycles;
    let interval = Duration::from_millis(cli.interval_ms);
    let ticker = thread::spawn(move || {
        for _ in 0..cycles {
            emitter.emit(Input::Tick);
            thread::sleep(interval);
        }
    });

    futures::executor::block_on(runtime.run());
    if ticker.join().is_err() {
        tracing::error!("tick thread panicked");
    }
    Ok(())
}

/// Merge command-line overrides into the configuration and validate the result.
fn resolve_config(cli: &Cli) -> ThermostatResult<SimulationConfig> {
    let mut config = match &cli.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(target) = cli.target {
        config.initial_target = target;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.keep_alive {
        config.command_mode = CommandMode::KeepAlive;
    }
    config.validate()?;
    Ok(config)
}

fn build_simulations(
    config: &SimulationConfig,
    mode: Mode,
) -> ThermostatResult<Vec<BoxedSimulation>> {
    let mut simulations: Vec<BoxedSimulation> = Vec::new();
    if matches!(mode, Mode::Mvc | Mode::Both) {
        let mut mvc = config.build_mvc()?;
        mvc.attach_observer(Box::new(View::new(ConsoleRenderer::stdout("MVC"))));
        simulations.push(Box::new(mvc));
    }
    if matches!(mode, Mode::Eda | Mode::Both) {
        let mut eda = config.build_eda()?;
        eda.attach_observer(Box::new(View::new(ConsoleRenderer::stdout("EDA"))));
        simulations.push(Box::new(eda));
    }
    Ok(simulations)
}
