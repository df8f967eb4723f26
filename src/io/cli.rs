//! Command-line interface: generate one layout, run its placement passes and export it

use crate::algorithm::{
    job::JobStatus,
    layout::{GenerationReport, LayoutConfig, LayoutGenerator},
    registry::{EventQueue, LayoutId, PassOutcome, PlacerRegistry},
};
use crate::io::configuration::{DEFAULT_IMAGE_SCALE, DEFAULT_SEED};
use crate::io::error::{DungeonError, Result};
use crate::io::image::export_layout_png;
use crate::io::progress::GenerationProgress;
use crate::io::settings::DungeonSettings;
use clap::Parser;
use log::{LevelFilter, info, warn};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "roomstamp")]
#[command(
    author,
    version,
    about = "Generate room-and-corridor dungeons and stamp tile patterns onto them"
)]
/// Command-line arguments for the layout generator
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// JSON settings file with layout parameters and placement passes
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Random seed for reproducible generation (overrides the settings file)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Grid width in cells
    #[arg(short = 'W', long)]
    pub width: Option<usize>,

    /// Grid height in cells
    #[arg(short = 'H', long)]
    pub height: Option<usize>,

    /// Number of rooms to place
    #[arg(short, long)]
    pub rooms: Option<usize>,

    /// Maximum generation attempts
    #[arg(short = 'm', long)]
    pub max_retry: Option<u32>,

    /// Write the layout as a PNG image
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pixels per cell in the PNG image
    #[arg(long, default_value_t = DEFAULT_IMAGE_SCALE)]
    pub scale: u32,

    /// Print the layout as ASCII to stdout
    #[arg(short, long)]
    pub ascii: bool,

    /// Drive generation in chunks with a progress spinner
    #[arg(long)]
    pub chunked: bool,

    /// Suppress progress output and non-error logs
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log level implied by `--quiet` and `--verbose`
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Apply command-line overrides on top of `config`
    pub fn apply_overrides(&self, config: &mut LayoutConfig) {
        if self.width.is_some() || self.height.is_some() {
            let width = self.width.unwrap_or_else(|| config.width());
            let height = self.height.unwrap_or_else(|| config.height());
            config.set_size(width, height);
        }
        if let Some(rooms) = self.rooms {
            config.set_room_count(rooms);
        }
        if let Some(max_retry) = self.max_retry {
            config.set_max_retry(max_retry);
        }
    }
}

/// Summary of one command-line run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Layout generation report
    pub report: GenerationReport,
    /// Pass outcomes, empty when generation failed
    pub passes: Vec<PassOutcome>,
}

/// Orchestrates settings loading, generation, placement and export
pub struct DungeonRunner {
    cli: Cli,
    settings: DungeonSettings,
    generator: LayoutGenerator,
    registry: PlacerRegistry,
    layout: LayoutId,
}

impl DungeonRunner {
    /// Load settings and prepare the generator and pass registry
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be read or a pass is invalid
    pub fn new(cli: Cli) -> Result<Self> {
        let settings = match &cli.config {
            Some(path) => DungeonSettings::load(path)?,
            None => DungeonSettings::default(),
        };

        let mut config = settings.layout_config();
        cli.apply_overrides(&mut config);

        let layout = LayoutId(0);
        let mut registry = PlacerRegistry::new();
        for pass in settings.placement_passes()? {
            registry.register(layout, pass);
        }

        Ok(Self {
            cli,
            settings,
            generator: LayoutGenerator::new(config),
            registry,
            layout,
        })
    }

    /// Seed in force: command line, then settings file, then the default
    pub fn seed(&self) -> u64 {
        self.cli.seed.or(self.settings.seed).unwrap_or(DEFAULT_SEED)
    }

    /// Generated layout
    pub const fn generator(&self) -> &LayoutGenerator {
        &self.generator
    }

    /// Generate, place and export according to the command line
    ///
    /// # Errors
    ///
    /// Returns an error if generation, placement or export fails
    pub fn run(&mut self) -> Result<RunSummary> {
        let seed = self.seed();
        let (report, passes) = if self.cli.chunked {
            self.run_chunked(seed)?
        } else {
            self.registry
                .regenerate(self.layout, &mut self.generator, seed)?
        };

        for outcome in &passes {
            match &outcome.placement {
                Some(result) => info!(
                    "pass '{}': {} placements, {}/{} cells covered",
                    outcome.name,
                    result.placements.len(),
                    result.covered_cells,
                    result.target_coverage
                ),
                None => info!("pass '{}': {} cells painted", outcome.name, outcome.cells.len()),
            }
        }

        if !report.success {
            warn!("exporting the last rejected attempt");
        }

        if let Some(path) = &self.cli.output {
            let overlays: Vec<_> = passes.iter().map(|outcome| outcome.cells.clone()).collect();
            export_layout_png(self.generator.grid(), &overlays, self.cli.scale, path)?;
            info!("wrote {}", path.display());
        }

        if self.cli.ascii {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(self.generator.grid().to_ascii().as_bytes())
                .map_err(|source| DungeonError::FileSystem {
                    path: PathBuf::from("<stdout>"),
                    operation: "write layout",
                    source,
                })?;
        }

        Ok(RunSummary { report, passes })
    }

    fn run_chunked(&mut self, seed: u64) -> Result<(GenerationReport, Vec<PassOutcome>)> {
        let progress = self
            .cli
            .should_show_progress()
            .then(|| GenerationProgress::new(self.generator.config().attempt_budget()));

        self.registry.begin_manual(self.layout);
        let mut queue = EventQueue::default();
        let mut job = self.generator.start_job(seed)?;

        let report = loop {
            match job.resume(&mut self.generator, &mut queue) {
                JobStatus::Pending(phase) => {
                    if let Some(ref progress) = progress {
                        progress.update(job.attempt(), phase);
                    }
                }
                JobStatus::Done(report) => break report,
                JobStatus::Cancelled => {
                    if let Some(ref progress) = progress {
                        progress.abandon();
                    }
                    return Err(DungeonError::GenerationInProgress);
                }
            }
        };

        if let Some(ref progress) = progress {
            progress.finish(&report);
        }

        let mut passes = Vec::new();
        for event in queue.drain() {
            if let Some(ran) =
                self.registry
                    .dispatch(self.layout, event, self.generator.grid_mut(), seed)?
            {
                passes = ran;
            }
        }
        Ok((report, passes))
    }
}
