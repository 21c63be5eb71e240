use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use npyz::WriterBuilder;

use super::Precision;
use crate::io::error::Error;
use crate::model::matrix::Matrix;

pub fn write_matrix(path: &Path, matrix: &Matrix, precision: Precision) -> Result<(), Error> {
    let shape = [matrix.rows() as u64, matrix.cols() as u64];
    write_array(path, &shape, matrix.as_slice(), precision)
}

pub fn write_vector(path: &Path, values: &[f64], precision: Precision) -> Result<(), Error> {
    write_array(path, &[values.len() as u64], values, precision)
}

fn write_array(
    path: &Path,
    shape: &[u64],
    values: &[f64],
    precision: Precision,
) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    match precision {
        Precision::Single => encode(&mut out, shape, values.iter().map(|&v| v as f32))?,
        Precision::Double => encode(&mut out, shape, values.iter().copied())?,
    }
    out.flush()?;
    Ok(())
}

fn encode<W, T, I>(out: W, shape: &[u64], values: I) -> std::io::Result<()>
where
    W: Write,
    T: npyz::AutoSerialize,
    I: IntoIterator<Item = T>,
{
    let mut writer: npyz::NpyWriter<T, W> = npyz::WriteOptions::new()
        .default_dtype()
        .shape(shape)
        .writer(out)
        .begin_nd()?;
    writer.extend(values)?;
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::npy::{read_matrix, read_vector};

    fn sample() -> Matrix {
        Matrix::from_vec(2, 3, vec![0.1, -2.5, 1e-7, 3.0, 1.0 / 3.0, 7.25]).unwrap()
    }

    #[test]
    fn double_precision_roundtrip_is_bit_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coord.npy");
        write_matrix(&path, &sample(), Precision::Double).unwrap();

        let stored = read_matrix(&path).unwrap();
        assert_eq!(stored.precision, Precision::Double);
        assert_eq!(stored.matrix, sample());
    }

    #[test]
    fn single_precision_roundtrip_rounds_to_f32() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("force.npy");
        write_matrix(&path, &sample(), Precision::Single).unwrap();

        let stored = read_matrix(&path).unwrap();
        assert_eq!(stored.precision, Precision::Single);
        let expected: Vec<f64> = sample()
            .as_slice()
            .iter()
            .map(|&v| v as f32 as f64)
            .collect();
        assert_eq!(stored.matrix.as_slice(), expected.as_slice());
        assert_ne!(stored.matrix, sample());
    }

    #[test]
    fn vector_keeps_one_dimension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("energy.npy");
        write_vector(&path, &[-1.5, -2.25], Precision::Double).unwrap();

        let stored = read_vector(&path).unwrap();
        assert_eq!(stored.values, vec![-1.5, -2.25]);
        assert!(read_matrix(&path).is_err());
    }

    #[test]
    fn writes_empty_arrays_with_their_width() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("box.npy");
        write_matrix(&path, &Matrix::empty(9), Precision::Single).unwrap();

        let stored = read_matrix(&path).unwrap();
        assert_eq!(stored.matrix.shape(), (0, 9));
    }
}
