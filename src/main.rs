use std::{process::ExitCode, time::Instant};

use log::info;

use tsp_route_core::{Result, Solver, SolverInput, SolverOptions, logging, write_solution};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let now = Instant::now();
    let options = SolverOptions::from_args()?;
    logging::init_logger(&options)?;
    let input = SolverInput::from_options(&options)?;

    info!("input: {input}");
    info!("options: {options}");

    let solver = Solver::from_options(&options)?;
    let solution = solver.solve(input.matrix(), options.start)?;
    write_solution(&options, &solution)?;

    info!(
        "output: n={} algorithm={} time={:.2}s",
        input.n(),
        solution.algorithm,
        now.elapsed().as_secs_f32()
    );

    solution.metrics(input.matrix(), options.spike_factor);

    Ok(())
}
