mod input;
mod logging;
mod model;
mod pipeline;
mod report;
mod scans;

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::input::InputError;
use crate::input::closures::load_eval_inputs;
use crate::model::metrics::{ThresholdResult, best_f1};
use crate::model::thresholds::{
    EvalProfile, OVERLAP_CUTOFF, ProfileError, SWEEP_START, SWEEP_STEP, SWEEP_STOP,
};
use crate::pipeline::convert::{ConvertSummary, convert, kitti_output_dir};
use crate::pipeline::sweep::sweep;
use crate::report::json::{GroundTruthSummary, MetricsSummary, write_summary_json};
use crate::report::table::render_metrics_table;
use crate::report::{FILE_WIDTH, METRICS_JSON, METRICS_TXT, ReportError, dataset_name, write_text};
use crate::scans::ScanDirectory;

#[derive(Debug, Parser)]
#[command(
    name = "kira-closureqc",
    version,
    about = "Loop-closure precision/recall evaluation and KITTI scan conversion"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sweep score thresholds over predicted closures and report precision/recall/F1.
    Eval(EvalArgs),
    /// Rewrite every scan in a directory as a KITTI `.bin` file.
    Convert(ConvertArgs),
}

#[derive(Debug, Args)]
struct EvalArgs {
    /// Dataset directory holding `loop_closure/` and `predicted_closures.txt`.
    datadir: PathBuf,
    /// Ground-truth pairs need an overlap strictly above this value.
    #[arg(long, default_value_t = OVERLAP_CUTOFF)]
    overlap_cutoff: f64,
    #[arg(long, default_value_t = SWEEP_START)]
    sweep_start: f64,
    /// Exclusive upper bound of the sweep.
    #[arg(long, default_value_t = SWEEP_STOP)]
    sweep_stop: f64,
    #[arg(long, default_value_t = SWEEP_STEP)]
    sweep_step: f64,
    /// Also write `metrics.json` next to `metrics.txt`.
    #[arg(long)]
    json: bool,
}

impl EvalArgs {
    fn profile(&self) -> EvalProfile {
        EvalProfile {
            overlap_cutoff: self.overlap_cutoff,
            sweep_start: self.sweep_start,
            sweep_stop: self.sweep_stop,
            sweep_step: self.sweep_step,
        }
    }
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// Directory of scans (.bin, .pcd, .ply, .xyz/.txt).
    datadir: PathBuf,
    /// Output directory; defaults to `<datadir>_kitti` beside the input.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("invalid evaluation profile: {0}")]
    Profile(#[from] ProfileError),
}

fn main() {
    logging::init_tracing();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), RunError> {
    match cli.command {
        Command::Eval(args) => {
            let datadir = absolute(&args.datadir)?;
            let mut stdout = std::io::stdout().lock();
            evaluate(&datadir, &args.profile(), args.json, &mut stdout)?;
        }
        Command::Convert(args) => {
            let datadir = absolute(&args.datadir)?;
            let out_dir = match &args.out {
                Some(out) => out.clone(),
                None => kitti_output_dir(&datadir),
            };
            run_convert(&datadir, &out_dir)?;
        }
    }
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf, InputError> {
    std::path::absolute(path).map_err(|e| InputError::io(path, e))
}

/// Loads, sweeps and renders one dataset. Nothing is written unless every input loads.
fn evaluate(
    datadir: &Path,
    profile: &EvalProfile,
    json: bool,
    console: &mut dyn Write,
) -> Result<Vec<ThresholdResult>, RunError> {
    profile.validate()?;
    let inputs = load_eval_inputs(datadir, profile.overlap_cutoff)?;
    let thresholds = profile.thresholds();
    let results = sweep(&inputs.ground_truth, &inputs.predictions, &thresholds);

    let name = dataset_name(datadir);
    let console_table = render_metrics_table(&name, &results, None);
    console
        .write_all(console_table.as_bytes())
        .and_then(|_| console.flush())
        .map_err(|source| ReportError::Write {
            path: PathBuf::from("<stdout>"),
            source,
        })?;

    let metrics_path = datadir.join(METRICS_TXT);
    write_text(
        &metrics_path,
        &render_metrics_table(&name, &results, Some(FILE_WIDTH)),
    )?;
    info!("wrote {}", metrics_path.display());

    if json {
        let json_path = datadir.join(METRICS_JSON);
        let summary = MetricsSummary::new(
            &name,
            GroundTruthSummary {
                records: inputs.ground_truth.records_read(),
                closures: inputs.ground_truth.len(),
            },
            inputs.predictions.len(),
            profile,
            &results,
        );
        write_summary_json(&summary, &json_path)?;
        info!("wrote {}", json_path.display());
    }

    if let Some(best) = best_f1(&results) {
        info!(
            threshold = best.threshold,
            f1 = best.f1,
            precision = best.precision,
            recall = best.recall,
            "best F1"
        );
    }

    Ok(results)
}

fn run_convert(datadir: &Path, out_dir: &Path) -> Result<ConvertSummary, RunError> {
    let source = ScanDirectory::open(datadir)?;
    info!(
        format = ?source.format,
        scans = source.files.len(),
        "discovered scans in {}",
        source.dir.display()
    );
    Ok(convert(&source, out_dir)?)
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
