use std::{fs, io::Read};

use tsp_route_derive::KvDisplay;

use crate::{
    CostMatrix, Error, Result,
    geo::point::GeoPoint,
    options::{InputFormat, SolverOptions},
};

/// A validated problem read from a file or stdin.
#[derive(Clone, Debug, KvDisplay)]
pub struct SolverInput {
    pub(crate) format: InputFormat,
    #[kv(fmt = "len")]
    pub(crate) points: Vec<GeoPoint>,
    pub(crate) matrix: CostMatrix,
}

impl SolverInput {
    /// Reads `--input` (or stdin) and parses it as `--input-format`.
    pub fn from_options(options: &SolverOptions) -> Result<Self> {
        let raw = match options.input_path() {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                Error::other(format!("failed to read input file {}: {e}", path.display()))
            })?,
            None => {
                let mut raw = String::new();
                std::io::stdin().read_to_string(&mut raw)?;
                raw
            }
        };
        Self::parse(options.input_format, &raw)
    }

    pub fn parse(format: InputFormat, raw: &str) -> Result<Self> {
        match format {
            InputFormat::Matrix => Ok(Self {
                format,
                points: Vec::new(),
                matrix: CostMatrix::new(parse_matrix_rows(raw)?)?,
            }),
            InputFormat::Points => {
                let points = parse_points(raw)?;
                let matrix = CostMatrix::from_points(&points)?;
                Ok(Self {
                    format,
                    points,
                    matrix,
                })
            }
        }
    }

    pub fn matrix(&self) -> &CostMatrix {
        &self.matrix
    }

    /// Empty for matrix input.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn n(&self) -> usize {
        self.matrix.n()
    }
}

/// One row per non-empty line; entries split on whitespace and commas.
fn parse_matrix_rows(input: &str) -> Result<Vec<Vec<f64>>> {
    let mut rows = Vec::new();
    for (line_idx, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let row = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|tok| !tok.is_empty())
            .map(|tok| {
                tok.parse::<f64>().map_err(|_| {
                    Error::invalid_input(format!("Line {}: invalid cost: {tok}", line_idx + 1))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

fn parse_points(input: &str) -> Result<Vec<GeoPoint>> {
    let mut points = Vec::new();
    for (idx, tok) in input.split_whitespace().enumerate() {
        let mut it = tok.split(',');
        let lat_s = it
            .next()
            .ok_or_else(|| Error::invalid_input(format!("Token {}: missing latitude", idx + 1)))?;
        let lng_s = it
            .next()
            .ok_or_else(|| Error::invalid_input(format!("Token {}: missing longitude", idx + 1)))?;

        if it.next().is_some() {
            return Err(Error::invalid_input(format!(
                "Token {}: expected 'lat,lng' but got extra comma fields: {tok}",
                idx + 1
            )));
        }

        let lat: f64 = lat_s.parse().map_err(|_| {
            Error::invalid_input(format!("Token {}: invalid latitude: {lat_s}", idx + 1))
        })?;
        let lng: f64 = lng_s.parse().map_err(|_| {
            Error::invalid_input(format!("Token {}: invalid longitude: {lng_s}", idx + 1))
        })?;

        points.push(GeoPoint::new(lat, lng));
    }

    Ok(points)
}
