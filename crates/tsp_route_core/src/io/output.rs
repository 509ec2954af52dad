use std::{
    fs::File,
    io::{BufWriter, Write},
};

use crate::{Error, Result, Solution, options::SolverOptions, utils::format_cost};

/// Writes the solution to `--output`, or stdout when unset.
pub fn write_solution(options: &SolverOptions, solution: &Solution) -> Result<()> {
    match options.output_path() {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                Error::other(format!(
                    "failed to create output file {}: {e}",
                    path.display()
                ))
            })?;
            let mut out = BufWriter::new(file);
            write_solution_to(&mut out, solution)?;
            out.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            write_solution_to(&mut out, solution)?;
            out.flush()?;
        }
    }
    Ok(())
}

/// Header line `algorithm=<label> distance=<cost>`, then one route index per line.
pub fn write_solution_to<W: Write>(out: &mut W, solution: &Solution) -> Result<()> {
    writeln!(
        out,
        "algorithm={} distance={}",
        solution.algorithm,
        format_cost(solution.distance)
    )?;
    for idx in &solution.route {
        writeln!(out, "{idx}")?;
    }
    Ok(())
}
