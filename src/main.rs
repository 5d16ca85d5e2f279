use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kepler_sim::api::{self, SimulateRequest, SimulateResponse, ValidateResponse};
use kepler_sim::io::{csv, json};
use kepler_sim::orbital::{PresetCatalog, RawElements};
use kepler_sim::physics::MU_EARTH;
use kepler_sim::sim::{sample, SimConfig};
use kepler_sim::Analysis;

#[derive(Parser)]
#[command(name = "kepler-sim")]
#[command(about = "Two-body Keplerian orbit propagation with impact detection")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Propagate an orbit and print its analysis
    Simulate {
        /// Preset key (see `presets`)
        #[arg(short, long, conflicts_with = "request", conflicts_with_all = ELEMENT_FLAGS)]
        preset: Option<String>,

        /// JSON file holding {elements, duration, timestep}
        #[arg(short, long, conflicts_with_all = ELEMENT_FLAGS)]
        request: Option<PathBuf>,

        #[command(flatten)]
        elements: ElementArgs,

        /// Simulated span, s
        #[arg(short, long)]
        duration: Option<f64>,

        /// Sample spacing, s
        #[arg(short, long)]
        timestep: Option<f64>,

        /// Reject requests needing more samples than this
        #[arg(long, default_value_t = SimConfig::default().max_samples)]
        max_samples: usize,

        /// Central body radius used for impact detection, km
        #[arg(long, default_value_t = SimConfig::default().body_radius)]
        body_radius: f64,

        /// Also write the trajectory as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the full JSON response instead of the report
        #[arg(long)]
        json: bool,
    },

    /// Validate and normalize an element set
    Validate {
        #[command(flatten)]
        elements: ElementArgs,

        #[arg(long)]
        json: bool,
    },

    /// List the builtin presets
    Presets {
        #[arg(long)]
        json: bool,
    },
}

/// Ids of the `ElementArgs` flags; a preset or request file supplies its own elements.
const ELEMENT_FLAGS: [&str; 7] = ["sma", "ecc", "inc", "argp", "raan", "m0", "mu"];

#[derive(Args)]
struct ElementArgs {
    /// Semi-major axis, km
    #[arg(long, allow_negative_numbers = true)]
    sma: Option<f64>,
    /// Eccentricity
    #[arg(long, allow_negative_numbers = true)]
    ecc: Option<f64>,
    /// Inclination, deg
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    inc: f64,
    /// Argument of periapsis, deg
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    argp: f64,
    /// Longitude of ascending node, deg
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    raan: f64,
    /// Mean anomaly at epoch, deg
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    m0: f64,
    /// Gravitational parameter, km^3/s^2
    #[arg(long, default_value_t = MU_EARTH)]
    mu: f64,
}

impl ElementArgs {
    fn to_raw(&self) -> Result<RawElements> {
        let (Some(sma), Some(ecc)) = (self.sma, self.ecc) else {
            bail!("--sma and --ecc are required unless --preset or --request is given");
        };
        Ok(RawElements::new(sma, ecc, self.inc, self.argp, self.raan, self.m0).with_mu(self.mu))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Simulate {
            preset,
            request,
            elements,
            duration,
            timestep,
            max_samples,
            body_radius,
            csv: csv_path,
            json: as_json,
        } => {
            let base = SimConfig::default()
                .with_max_samples(max_samples)
                .with_body_radius(body_radius);

            let (label, mut req) = if let Some(key) = preset {
                let p = PresetCatalog::global().get(&key)?;
                if let Some(w) = p.warning {
                    tracing::warn!(preset = p.key, "{w}");
                }
                let req = SimulateRequest::new(p.elements.to_raw(), base.duration, base.timestep);
                (p.name.to_string(), req)
            } else if let Some(path) = request {
                let file = std::fs::File::open(&path)
                    .with_context(|| format!("opening request {}", path.display()))?;
                let req: SimulateRequest = serde_json::from_reader(std::io::BufReader::new(file))
                    .with_context(|| format!("parsing request {}", path.display()))?;
                (path.display().to_string(), req)
            } else {
                let req = SimulateRequest::new(elements.to_raw()?, base.duration, base.timestep);
                ("Custom orbit".to_string(), req)
            };
            if let Some(d) = duration {
                req.duration = d;
            }
            if let Some(dt) = timestep {
                req.timestep = dt;
            }

            let config = req.config(&base);
            let validated = req.elements.validate()?;
            let trajectory = sample(&validated, &config)?;
            let response = api::respond(&validated, &trajectory, &config);

            if let Some(path) = csv_path {
                csv::write_trajectory_file(&path, &trajectory, config.body_radius)
                    .with_context(|| format!("writing {}", path.display()))?;
                tracing::info!(path = %path.display(), rows = trajectory.len(), "trajectory written");
            }

            if as_json {
                json::write_json(&mut std::io::stdout().lock(), &response)?;
            } else {
                print_report(&label, &config, &response);
            }
        }

        Commands::Validate { elements, json: as_json } => {
            let outcome = api::validate(&elements.to_raw()?);
            if as_json {
                json::write_json(&mut std::io::stdout().lock(), &outcome)?;
            }
            match outcome {
                ValidateResponse::Valid { elements } => {
                    if !as_json {
                        println!(
                            "valid: a={} km  e={}  i={} deg  omega={} deg  Omega={} deg  M0={} deg  mu={}",
                            elements.sma(),
                            elements.ecc(),
                            elements.inc_deg(),
                            elements.argp_deg(),
                            elements.raan_deg(),
                            elements.mean_anom_deg(),
                            elements.mu()
                        );
                    }
                }
                ValidateResponse::Invalid { violations } => {
                    if !as_json {
                        for v in &violations {
                            println!("  {v}");
                        }
                    }
                    bail!("{} invalid field(s)", violations.len());
                }
            }
        }

        Commands::Presets { json: as_json } => {
            let presets = api::list_presets();
            if as_json {
                json::write_json(&mut std::io::stdout().lock(), &presets)?;
            } else {
                for (key, p) in presets {
                    let el = &p.elements;
                    println!(
                        "  {:<14} {:<30} a={:>8.1} km  e={:<6}  i={:>5.1} deg",
                        key,
                        p.name,
                        el.sma(),
                        el.ecc(),
                        el.inc_deg()
                    );
                    println!("  {:<14} {}", "", p.description);
                    if let Some(w) = p.warning {
                        println!("  {:<14} WARNING: {}", "", w);
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_report(label: &str, config: &SimConfig, response: &SimulateResponse) {
    let el = &response.elements;
    let info = &response.orbital_info;
    let a: &Analysis = &response.analysis;

    println!();
    println!("====================================================================");
    println!("  ORBIT PROPAGATION — {}", label);
    println!("====================================================================");
    println!();
    println!("  Elements");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  a:             {:>10.1} km    e:            {:>10.5}",
        el.sma(),
        el.ecc()
    );
    println!(
        "  i:             {:>10.2} deg   omega:        {:>10.2} deg",
        el.inc_deg(),
        el.argp_deg()
    );
    println!(
        "  Omega:         {:>10.2} deg   M0:           {:>10.2} deg",
        el.raan_deg(),
        el.mean_anom_deg()
    );
    println!();

    println!("  Orbit");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Period:        {:>10.1} s     ({:.2} min, {:.3} h)",
        a.period, info.period_minutes, info.period_hours
    );
    println!(
        "  PERIAPSIS     r={:>9.1} km   alt={:>9.1} km   v={:>6.3} km/s",
        a.periapsis.radius, a.periapsis.altitude, a.periapsis.speed
    );
    println!(
        "  APOAPSIS      r={:>9.1} km   alt={:>9.1} km   v={:>6.3} km/s",
        a.apoapsis.radius, a.apoapsis.altitude, a.apoapsis.speed
    );
    println!();

    println!("  Sampled");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Min altitude:  {:>10.1} km    Max altitude: {:>10.1} km",
        a.min_altitude, a.max_altitude
    );
    println!("  Avg speed:     {:>10.3} km/s", a.avg_speed);
    match &a.impact {
        Some(impact) => println!(
            "  IMPACT    t={:>8.1}s   sample {}   depth={:.1} km",
            impact.time, impact.index, impact.depth
        ),
        None if a.will_impact => println!("  Periapsis is below the surface but was not reached"),
        None => println!("  No surface impact"),
    }
    println!();

    for w in &response.warnings {
        println!("  WARNING: {}", w);
    }

    println!(
        "  Propagation: {} samples, dt={} s, duration={} s",
        a.samples, config.timestep, config.duration
    );
    println!("====================================================================");
    println!();
}
