use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use npyz::{DType, NpyFile, Order, TypeChar};

use super::Precision;
use crate::io::{Format, error::Error};
use crate::model::matrix::Matrix;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredMatrix {
    pub matrix: Matrix,
    pub precision: Precision,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredVector {
    pub values: Vec<f64>,
    pub precision: Precision,
}

pub fn read_matrix(path: &Path) -> Result<StoredMatrix, Error> {
    let (shape, values, precision) = read_array(path)?;
    let [rows, cols] = shape[..] else {
        return Err(unsupported(
            path,
            format!("expected a 2-D array, found shape {shape:?}"),
        ));
    };
    let matrix = Matrix::from_vec(rows, cols, values).map_err(|e| unsupported(path, e.to_string()))?;
    Ok(StoredMatrix { matrix, precision })
}

pub fn read_vector(path: &Path) -> Result<StoredVector, Error> {
    let (shape, values, precision) = read_array(path)?;
    if shape.len() != 1 {
        return Err(unsupported(
            path,
            format!("expected a 1-D array, found shape {shape:?}"),
        ));
    }
    Ok(StoredVector { values, precision })
}

fn read_array(path: &Path) -> Result<(Vec<usize>, Vec<f64>, Precision), Error> {
    let file = File::open(path).map_err(|e| Error::open(Format::Npy, path, e))?;
    let npy = NpyFile::new(BufReader::new(file))?;

    if matches!(npy.order(), Order::Fortran) {
        return Err(unsupported(path, "Fortran-ordered arrays are not supported"));
    }
    let shape: Vec<usize> = npy.shape().iter().map(|&d| d as usize).collect();

    let precision = match npy.dtype() {
        DType::Plain(ts) if matches!(ts.type_char(), TypeChar::Float) && ts.size_field() == 4 => {
            Precision::Single
        }
        DType::Plain(ts) if matches!(ts.type_char(), TypeChar::Float) && ts.size_field() == 8 => {
            Precision::Double
        }
        other => {
            return Err(unsupported(
                path,
                format!("dtype {} is not a float32/float64", other.descr()),
            ));
        }
    };

    let values = match precision {
        Precision::Single => npy
            .into_vec::<f32>()?
            .into_iter()
            .map(f64::from)
            .collect(),
        Precision::Double => npy.into_vec::<f64>()?,
    };

    Ok((shape, values, precision))
}

fn unsupported(path: &Path, details: impl Into<String>) -> Error {
    Error::UnsupportedArray {
        path: path.to_path_buf(),
        details: details.into(),
    }
}
