//! probit-demo — simulate, fit, and report a probit model from the command line.
use anyhow::{Context, Result};
use clap::Parser;
use probit_mle::{
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Method, Tolerances},
    probit::{
        Evaluator, GradientMode, ProbitModel, ProbitOptions, Saturation, SimulationSpec,
        simulate_entropy, simulate_seeded,
    },
};

#[derive(Parser)]
#[command(
    name = "probit-demo",
    about = "Fit a probit model to synthetic data and print the inference table",
    long_about = "Draws a sample from a probit data-generating process with known \
                  coefficients, maximizes the log-likelihood, and reports standard \
                  errors from the numerical Hessian."
)]
struct Cli {
    /// Number of observations to simulate
    #[arg(long, default_value = "1000")]
    n: usize,

    /// RNG seed; omit to draw from the thread-local generator
    #[arg(long)]
    seed: Option<u64>,

    /// Solver: nelder-mead, bfgs, or lbfgs
    #[arg(long, default_value = "nelder-mead")]
    method: String,

    /// Line search for bfgs/lbfgs: morethuente or hagerzhang
    #[arg(long, default_value = "morethuente")]
    line_search: String,

    /// Noise scale of the latent outcome
    #[arg(long, default_value = "2.0")]
    sigma: f64,

    /// Threshold applied to the latent outcome
    #[arg(long, default_value = "0.5")]
    cutoff: f64,

    /// Iteration cap for the solver
    #[arg(long, default_value = "300")]
    max_iter: usize,

    /// Objective form: naive or vectorized
    #[arg(long, default_value = "vectorized")]
    evaluator: String,

    /// Clamp probabilities away from 0 and 1
    #[arg(long)]
    clamp: bool,

    /// Attach the optimizer progress logger (needs the obs_slog feature)
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let base = SimulationSpec::default();
    let spec = SimulationSpec::new(
        cli.n,
        base.mixing,
        cli.sigma,
        [base.constant, base.b1, base.b2],
        cli.cutoff,
    )
    .context("invalid simulation settings")?;
    let sim = match cli.seed {
        Some(seed) => simulate_seeded(&spec, seed),
        None => simulate_entropy(&spec),
    }
    .context("simulation failed")?;

    let options = build_options(&cli)?;
    let mut model = ProbitModel::new(options);
    model.fit_from_zero(&sim.data).context("estimation failed")?;
    let outcome = model.results.clone().context("estimation produced no result")?;

    println!("n = {}, share of y = 1: {:.3}", sim.data.n_obs(), sim.data.positive_share());
    println!("implied true beta: {}", spec.implied_beta());
    println!(
        "method = {}, converged = {}, status = {}, iterations = {}, loglik = {:.6}",
        model.options.mle_opts.method,
        outcome.converged,
        outcome.status,
        outcome.iterations,
        outcome.value
    );

    let report = model.infer(&sim.data).context("inference failed")?;
    println!("{report}");
    if !report.is_well_conditioned() {
        eprintln!("warning: Hessian is {}; standard errors are not available", report.condition);
    }
    Ok(())
}

fn build_options(cli: &Cli) -> Result<ProbitOptions> {
    let method: Method = cli.method.parse()?;
    let line_searcher: LineSearcher = cli.line_search.parse()?;
    let evaluator: Evaluator = cli.evaluator.parse()?;
    let saturation = if cli.clamp { Saturation::Clamp } else { Saturation::Propagate };
    let tols = Tolerances::new(Some(1e-6), None, Some(cli.max_iter))?;
    let mle_opts =
        MLEOptions::new(tols, method, line_searcher, None)?.with_verbose(cli.verbose);
    Ok(ProbitOptions::new(evaluator, saturation, GradientMode::Analytic, mle_opts))
}
