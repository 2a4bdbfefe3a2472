use clap::{Parser, Subcommand};
use fb_app::{
    AppResult, DetachedGeometryPort, LinkageSession, Pacing, drive_playback, project_service,
};
use fb_linkage::{LinkRole, NullView};
use std::path::{Path, PathBuf};
use tracing::debug;

type HeadlessSession = LinkageSession<DetachedGeometryPort, NullView>;

#[derive(Parser)]
#[command(name = "fb-cli")]
#[command(about = "FourBar CLI - spring-damper four-bar linkage simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and parameters
    Validate {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// Print the equation of motion for a project
    Eom {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// Solve the free response and export it as CSV
    Simulate {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Initial input angle in degrees (clamped to the bounds)
        #[arg(long, allow_negative_numbers = true)]
        angle: Option<f64>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Apply an input angle through the clamp and report the result
    Clamp {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Proposed input angle in degrees
        #[arg(allow_negative_numbers = true)]
        angle: f64,
    },
    /// Simulate and play the trajectory back tick by tick
    Play {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Initial input angle in degrees (clamped to the bounds)
        #[arg(long, allow_negative_numbers = true)]
        angle: Option<f64>,
        /// Sleep one tick period between samples
        #[arg(long)]
        realtime: bool,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Eom { project_path } => cmd_eom(&project_path),
        Commands::Simulate {
            project_path,
            angle,
            output,
        } => cmd_simulate(&project_path, angle, output.as_deref()),
        Commands::Clamp {
            project_path,
            angle,
        } => cmd_clamp(&project_path, angle),
        Commands::Play {
            project_path,
            angle,
            realtime,
        } => cmd_play(&project_path, angle, realtime),
    }
}

fn open_session(project_path: &Path, angle: Option<f64>) -> AppResult<HeadlessSession> {
    let project = project_service::load_project(project_path)?;
    let mut session = LinkageSession::from_project(&project, DetachedGeometryPort, NullView)?;
    if let Some(proposed) = angle {
        let enforced = session.set_input_angle_deg(proposed)?;
        if enforced != proposed {
            println!("Initial angle {} clamped to {}", proposed, enforced);
        }
    }
    Ok(session)
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    project_service::validate_project(&project)?;
    println!("✓ Project is valid");
    Ok(())
}

fn cmd_eom(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let summary = project_service::summarize(&project)?;
    let session = LinkageSession::from_project(&project, DetachedGeometryPort, NullView)?;
    let eom = session.equation_of_motion()?;

    println!("Project: {} (version {})", summary.name, summary.version);
    println!(
        "  {:.6} θ'' + {:.6} θ' + {:.6} (θ - {}) = 0",
        eom.effective_inertia, eom.damping, eom.stiffness, eom.equilibrium_angle_deg
    );
    println!("  Effective inertia:  {:.6} kg·m²", summary.effective_inertia);
    println!("  Natural frequency:  {:.6} rad/s", summary.natural_frequency);
    println!("  Damping ratio:      {:.6}", summary.damping_ratio);
    println!(
        "  Angle bounds:       [{}, {}] deg",
        summary.angle_bounds_deg.0, summary.angle_bounds_deg.1
    );
    println!("  Initial angle:      {} deg", session.input_angle_deg());
    println!("  Samples per run:    {}", summary.sample_count);
    Ok(())
}

fn cmd_simulate(project_path: &Path, angle: Option<f64>, output: Option<&Path>) -> AppResult<()> {
    let mut session = open_session(project_path, angle)?;
    let trajectory = session.simulate()?;

    // Build CSV
    let mut csv = String::from("time_s,angle_deg\n");
    for sample in trajectory.samples() {
        csv.push_str(&format!("{},{}\n", sample.time_s, sample.angle_deg));
    }

    // Write to file or stdout
    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} samples to {}",
            trajectory.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}

fn cmd_clamp(project_path: &Path, angle: f64) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let mut session = LinkageSession::from_project(&project, DetachedGeometryPort, NullView)?;
    let bounds = session.parameters().bounds();

    let enforced = session.set_input_angle_deg(angle)?;
    println!(
        "Proposed {} deg, bounds [{}, {}] -> enforced {} deg",
        angle,
        bounds.min_deg(),
        bounds.max_deg(),
        enforced
    );
    let linkage = session.controller().linkage();
    for role in LinkRole::ALL {
        let link = linkage.link(role);
        println!(
            "  {:<8} ({:.6}, {:.6}) -> ({:.6}, {:.6})",
            role.to_string(),
            link.start.x,
            link.start.y,
            link.end.x,
            link.end.y
        );
    }
    Ok(())
}

fn cmd_play(project_path: &Path, angle: Option<f64>, realtime: bool) -> AppResult<()> {
    let mut session = open_session(project_path, angle)?;
    let samples = session.simulate_and_play()?;
    let pacing = if realtime {
        Pacing::RealTime
    } else {
        Pacing::Immediate
    };
    println!(
        "Playing {} samples at {} Hz ({} ms timer)",
        samples,
        session.tick_rate().frequency(),
        session.tick_rate().timer_interval_ms()
    );

    let report = drive_playback(&mut session, pacing, |outcome| {
        debug!(
            index = outcome.index,
            time_s = outcome.time_s,
            angle_deg = outcome.enforced_deg,
            "tick"
        );
        if realtime {
            println!("{:8.3} s  {:10.4} deg", outcome.time_s, outcome.enforced_deg);
        }
    })?;

    println!(
        "✓ Playback finished after {} ticks, final angle {:.4} deg",
        report.ticks, report.final_angle_deg
    );
    Ok(())
}
